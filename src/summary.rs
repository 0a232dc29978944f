use std::fmt::{self, Display};

use serde::Serialize;

use crate::{classify::ClassificationResult, color::color_for, dome::DomeParams};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupSummary {
    pub signature: String,
    pub count: usize,
    pub area: f64,
    pub edges: [f64; 3],
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeSummary {
    pub length: f64,
    // Edge uses, once per accepted triangle containing the edge.
    pub count: usize,
    // Physical edges.
    pub distinct: usize,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedSummary {
    pub signature: String,
    pub reason: String,
}

// Report of one generation run: every congruence group and every edge length.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DomeSummary {
    pub radius: f64,
    pub frequency: usize,
    pub mode: String,
    pub generated: usize,
    pub accepted: usize,
    pub groups: Vec<GroupSummary>,
    pub edges: Vec<EdgeSummary>,
    pub skipped: Vec<SkippedSummary>,
}

impl DomeSummary {
    pub fn new(params: &DomeParams, generated: usize, result: &ClassificationResult) -> Self {
        let groups = result
            .groups
            .iter()
            .map(|(signature, group)| {
                let key = signature.to_string();
                GroupSummary {
                    count: group.count,
                    area: group.area,
                    edges: signature.side_lengths(),
                    color: color_for(&key),
                    signature: key,
                }
            })
            .collect();

        let edges = result
            .edge_counts
            .iter()
            .map(|(length, &count)| EdgeSummary {
                length: length.value(),
                count,
                distinct: result.distinct_edge_counts.get(length).copied().unwrap_or(0),
                color: color_for(&length.to_string()),
            })
            .collect();

        let skipped = result
            .rejected
            .iter()
            .map(|rejected| SkippedSummary {
                signature: rejected.signature.to_string(),
                reason: rejected.error.to_string(),
            })
            .collect();

        DomeSummary {
            radius: params.radius,
            frequency: params.frequency,
            mode: params.mode.to_string(),
            generated,
            accepted: result.triangle_count(),
            groups,
            edges,
            skipped,
        }
    }
}

impl Display for DomeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Geodesic dome ({}), radius {} m, frequency {}: {} of {} triangles",
            self.mode, self.radius, self.frequency, self.accepted, self.generated
        )?;

        writeln!(f, "Congruent triangle groups:")?;
        for group in self.groups.iter() {
            let [a, b, c] = group.edges;
            writeln!(
                f,
                "  {} triangles with area {:.3} m² (sides: {:.3}, {:.3}, {:.3} m)",
                group.count, group.area, a, b, c
            )?;
        }

        writeln!(f, "Equal side counts:")?;
        for edge in self.edges.iter() {
            writeln!(
                f,
                "  {} sides with length {:.3} m ({} distinct)",
                edge.count, edge.length, edge.distinct
            )?;
        }

        for skipped in self.skipped.iter() {
            writeln!(f, "Skipped {}: {}", skipped.signature, skipped.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use nalgebra::Vector3;

    use super::DomeSummary;
    use crate::{
        classify::classify,
        clip::ClipMode,
        dome::{Dome, DomeParams},
    };

    fn icosahedron() -> Dome {
        Dome::generate(DomeParams {
            radius: 1.,
            frequency: 1,
            mode: ClipMode::FullSphere,
        })
        .unwrap()
    }

    #[test]
    fn reports_groups_and_edges() {
        let summary = icosahedron().summary();

        assert_eq!(summary.generated, 20);
        assert_eq!(summary.accepted, 20);
        assert_eq!(summary.groups.len(), 1);
        let group = &summary.groups[0];
        assert_eq!(group.signature, "1.051-1.051-1.051");
        assert_eq!(group.count, 20);
        assert_eq!(group.edges, [1.051; 3]);
        assert_eq!(group.area, 0.478);

        assert_eq!(summary.edges.len(), 1);
        assert_eq!(summary.edges[0].count, 60);
        assert_eq!(summary.edges[0].distinct, 30);
        assert!(summary.skipped.is_empty());
    }

    #[test]
    fn text_report_lists_every_line() {
        let text = icosahedron().summary().to_string();

        assert!(text.contains("full sphere"));
        assert!(text.contains("  20 triangles with area 0.478 m² (sides: 1.051, 1.051, 1.051 m)\n"));
        assert!(text.contains("  60 sides with length 1.051 m (30 distinct)\n"));
    }

    #[test]
    fn json_report_carries_colors() {
        let json = serde_json::to_value(icosahedron().summary()).unwrap();

        assert_eq!(json["mode"], "full sphere");
        assert_eq!(json["groups"][0]["count"], 20);
        assert_eq!(json["edges"][0]["count"], 60);
        let color = json["groups"][0]["color"].as_str().unwrap();
        assert_eq!(color.len(), 7);
    }

    #[test]
    fn rejected_triangles_are_listed_as_skipped() {
        let verts = [
            Vector3::new(0., 0., 0.),
            Vector3::new(0.5004, 0., 0.),
            Vector3::new(1.0008, 0., 0.),
        ];
        let result = classify(&[[0, 1, 2]], &verts);
        let summary = DomeSummary::new(&DomeParams::default(), 1, &result);

        assert!(summary.groups.is_empty());
        assert!(summary.edges.is_empty());
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].signature, "0.500-0.500-1.001");

        let text = summary.to_string();
        assert!(text.contains("Skipped 0.500-0.500-1.001: degenerate triangle with sides"));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["skipped"][0]["signature"], "0.500-0.500-1.001");
    }
}
