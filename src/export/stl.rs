use std::fmt::Write;

use nalgebra::Vector3;

use super::{ensure_nonempty, Document, Exporter};
use crate::{
    classify::ClassificationResult,
    error::DomeError,
    helper::triangle_normal,
    unfold::{Layout, PanelLayout},
};

fn write_facet(
    out: &mut String,
    normal: &Vector3<f64>,
    corners: &[Vector3<f64>; 3],
) -> std::fmt::Result {
    writeln!(out, "facet normal {} {} {}", normal[0], normal[1], normal[2])?;
    writeln!(out, "  outer loop")?;
    for v in corners.iter() {
        writeln!(out, "    vertex {} {} {}", v[0], v[1], v[2])?;
    }
    writeln!(out, "  endloop")?;
    writeln!(out, "endfacet")
}

// Plain-text STL with one facet per accepted triangle, each in its true 3d position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiStl {
    pub name: String,
}

impl Default for AsciiStl {
    fn default() -> Self {
        AsciiStl {
            name: "geodesic".to_owned(),
        }
    }
}

impl AsciiStl {
    pub fn to_text(&self, result: &ClassificationResult) -> Result<String, DomeError> {
        ensure_nonempty(result)?;

        let mut out = String::new();
        writeln!(out, "solid {}", self.name)?;
        for tri in result.triangles() {
            write_facet(&mut out, &triangle_normal(tri), tri)?;
        }
        writeln!(out, "endsolid {}", self.name)?;
        Ok(out)
    }
}

impl Exporter for AsciiStl {
    fn export(&self, result: &ClassificationResult) -> Result<Document, DomeError> {
        let text = self.to_text(result)?;
        Ok(Document::complete(text.into_bytes()))
    }
}

// Binary STL: an 80 byte header, a little endian facet count, then 50 bytes per facet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryStl {
    // Truncated or zero padded to fill the header.
    pub header: String,
}

impl Default for BinaryStl {
    fn default() -> Self {
        BinaryStl {
            header: "geodesic".to_owned(),
        }
    }
}

impl BinaryStl {
    const HEADER_LEN: usize = 80;
    const FACET_LEN: usize = 50;
}

impl Exporter for BinaryStl {
    fn export(&self, result: &ClassificationResult) -> Result<Document, DomeError> {
        ensure_nonempty(result)?;

        let facets = result.triangle_count();
        let mut out = self.header.as_bytes().to_vec();
        out.resize(Self::HEADER_LEN, 0);
        out.reserve(4 + facets * Self::FACET_LEN);
        out.extend_from_slice(&(facets as u32).to_le_bytes());

        for tri in result.triangles() {
            // Normal first, then the corners, all as f32.
            let normal = triangle_normal(tri);
            for v in std::iter::once(&normal).chain(tri.iter()) {
                for x in v.iter() {
                    out.extend_from_slice(&(*x as f32).to_le_bytes());
                }
            }
            out.extend_from_slice(&[0, 0]);
        }
        Ok(Document::complete(out))
    }
}

// One flat panel per congruence group in the z=0 plane, each in its own solid whose name
// line carries the real side lengths and angles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanelStl {
    pub layout: PanelLayout,
}

impl PanelStl {
    pub fn to_text(&self, layout: &Layout) -> Result<String, DomeError> {
        let mut out = String::new();
        for panel in layout.panels.iter() {
            let name = format!(
                "geodesic_group_{}",
                panel.signature.to_string().replace('.', "_")
            );
            let [a, b, c] = panel.shape.sides;
            let [at_1, at_2, at_3] = panel.shape.vertex_angles();
            writeln!(
                out,
                "solid {} A={:.3} B={:.3} C={:.3} angles={:.2},{:.2},{:.2} scale={}",
                name, a, b, c, at_1, at_2, at_3, self.layout.scale
            )?;

            let v = &panel.placed.vertices;
            let corners = [
                Vector3::new(v[0][0], v[0][1], 0.),
                Vector3::new(v[1][0], v[1][1], 0.),
                Vector3::new(v[2][0], v[2][1], 0.),
            ];
            write_facet(&mut out, &Vector3::z(), &corners)?;
            writeln!(out, "endsolid {}", name)?;
        }
        Ok(out)
    }
}

impl Exporter for PanelStl {
    fn export(&self, result: &ClassificationResult) -> Result<Document, DomeError> {
        let layout = self.layout.lay_out(result)?;
        let text = self.to_text(&layout)?;
        Ok(Document {
            bytes: text.into_bytes(),
            skipped: layout.skipped,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{classify::classify, geodesic_polyhedron::generate_polyhedron};

    fn icosahedron() -> ClassificationResult {
        let (verts, tris) = generate_polyhedron(1., 1).unwrap();
        classify(&tris, &verts)
    }

    #[test]
    fn ascii_stl_has_one_facet_per_triangle() {
        let text = AsciiStl::default().to_text(&icosahedron()).unwrap();
        assert!(text.starts_with("solid geodesic\n"));
        assert!(text.ends_with("endsolid geodesic\n"));
        assert_eq!(text.matches("facet normal").count(), 20);
        assert_eq!(text.matches("endfacet").count(), 20);
        assert_eq!(text.matches("    vertex ").count(), 60);
    }

    #[test]
    fn ascii_stl_normals_are_unit_and_outward() {
        let result = icosahedron();
        let text = AsciiStl::default().to_text(&result).unwrap();
        let normals: Vec<Vector3<f64>> = text
            .lines()
            .filter_map(|line| line.strip_prefix("facet normal "))
            .map(|rest| {
                let n: Vec<f64> = rest.split(' ').map(|x| x.parse().unwrap()).collect();
                Vector3::new(n[0], n[1], n[2])
            })
            .collect();
        for (normal, tri) in normals.iter().zip(result.triangles()) {
            assert!((normal.magnitude() - 1.).abs() < 1e-9);
            assert!(normal.dot(&(tri[0] + tri[1] + tri[2])) > 0.);
        }
    }

    #[test]
    fn binary_stl_has_expected_size_and_triangle_count() {
        let bytes = BinaryStl::default().export(&icosahedron()).unwrap().bytes;

        assert_eq!(bytes.len(), 84 + 20 * 50);
        assert_eq!(&bytes[..8], b"geodesic");
        assert!(bytes[8..80].iter().all(|&b| b == 0));
        let tri_count = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
        assert_eq!(tri_count, 20);
    }

    #[test]
    fn binary_stl_facets_match_triangles() {
        let result = icosahedron();
        let bytes = BinaryStl::default().export(&result).unwrap().bytes;

        let read = |at: usize| f32::from_le_bytes(bytes[at..at + 4].try_into().unwrap()) as f64;
        for (i, tri) in result.triangles().enumerate() {
            let facet = 84 + i * 50;
            let normal = triangle_normal(tri);
            for k in 0..3 {
                assert!((read(facet + 4 * k) - normal[k]).abs() < 1e-6);
                for (c, corner) in tri.iter().enumerate() {
                    assert!((read(facet + 12 + 12 * c + 4 * k) - corner[k]).abs() < 1e-6);
                }
            }
            assert_eq!(&bytes[facet + 48..facet + 50], &[0, 0]);
        }
    }

    #[test]
    fn long_binary_header_is_truncated() {
        let stl = BinaryStl {
            header: "x".repeat(100),
        };
        let bytes = stl.export(&icosahedron()).unwrap().bytes;
        assert_eq!(bytes.len(), 84 + 20 * 50);
        assert!(bytes[..80].iter().all(|&b| b == b'x'));
    }

    #[test]
    fn panel_stl_has_one_solid_per_group() {
        let (verts, tris) = generate_polyhedron(1., 2).unwrap();
        let document = PanelStl::default().export(&classify(&tris, &verts)).unwrap();
        assert!(document.skipped.is_empty());
        let text = String::from_utf8(document.bytes).unwrap();

        assert_eq!(text.matches("endsolid ").count(), 2);
        assert!(text.starts_with(
            "solid geodesic_group_0_547-0_547-0_618 A=0.547 B=0.547 C=0.618 angles="
        ));
        assert!(text.contains("endsolid geodesic_group_0_618-0_618-0_618\n"));
        assert_eq!(text.matches("facet normal 0 0 1\n").count(), 2);
        assert!(text.contains("    vertex 0 0 0\n"));
    }
}
