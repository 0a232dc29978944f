use std::{
    collections::{BTreeMap, HashSet},
    fmt::{self, Display},
};

use log::{info, warn};
use nalgebra::Vector3;

use crate::{
    error::DomeError,
    geodesic_polyhedron::Face,
    helper::{distance, round_scaled},
};

// Relative slack for negative Heron radicands produced by rounding on (near-)flat triangles.
const HERON_TOLERANCE: f64 = 1e-12;
// Group areas are stored to the same number of places as the edge lengths they come from.
const AREA_PRECISION: u32 = 3;

// An edge length rounded to `EdgeLength::PRECISION` decimal places, stored as an integer
// count of thousandths so that equal lengths compare exactly. Two edges with the same
// rounded length are congruent wherever they sit on the sphere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeLength(i64);

impl EdgeLength {
    pub const PRECISION: u32 = 3;

    pub fn from_length(length: f64) -> Self {
        EdgeLength(round_scaled(length, Self::PRECISION))
    }

    pub fn from_thousandths(thousandths: i64) -> Self {
        EdgeLength(thousandths)
    }

    pub fn value(self) -> f64 {
        self.0 as f64 / 10f64.powi(Self::PRECISION as i32)
    }
}

impl Display for EdgeLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", Self::PRECISION as usize, self.value())
    }
}

// The ascending triple of a triangle's rounded edge lengths. Relabeling or rotating the
// triangle's vertices permutes its edges, which sorting undoes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriangleSignature([EdgeLength; 3]);

impl TriangleSignature {
    pub fn new(mut edges: [EdgeLength; 3]) -> Self {
        edges.sort();
        TriangleSignature(edges)
    }

    pub fn of_triangle(corners: &[Vector3<f64>; 3]) -> Self {
        Self::new(edge_lengths(corners))
    }

    pub fn edges(&self) -> [EdgeLength; 3] {
        self.0
    }

    pub fn side_lengths(&self) -> [f64; 3] {
        [self.0[0].value(), self.0[1].value(), self.0[2].value()]
    }
}

// Formats as "a-b-c", e.g. "0.547-0.547-0.618".
impl Display for TriangleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.0[0], self.0[1], self.0[2])
    }
}

// Rounded lengths of the edges (c0,c1), (c1,c2) and (c2,c0), in that order.
pub fn edge_lengths(corners: &[Vector3<f64>; 3]) -> [EdgeLength; 3] {
    let mut lengths = [EdgeLength(0); 3];
    for (j, length) in lengths.iter_mut().enumerate() {
        *length = EdgeLength::from_length(distance(&corners[j], &corners[(j + 1) % 3]));
    }
    lengths
}

// Area of a triangle from its side lengths by Heron's formula. Radicands that are only
// negative through rounding are clamped to a zero area.
pub fn heron_area(a: f64, b: f64, c: f64) -> Result<f64, DomeError> {
    let s = (a + b + c) / 2.;
    let radicand = s * (s - a) * (s - b) * (s - c);
    if radicand >= 0. {
        Ok(radicand.sqrt())
    } else if radicand >= -HERON_TOLERANCE * s.powi(4) {
        Ok(0.)
    } else {
        Err(DomeError::DegenerateGeometry { a, b, c, radicand })
    }
}

// All accepted triangles sharing one signature.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleGroup {
    pub count: usize,
    pub area: f64,
    pub edges: [EdgeLength; 3],
    // The 3d corners of every member, in their original winding.
    pub instances: Vec<[Vector3<f64>; 3]>,
}

impl TriangleGroup {
    fn new(signature: TriangleSignature) -> Self {
        TriangleGroup {
            count: 0,
            area: 0.,
            edges: signature.edges(),
            instances: Vec::new(),
        }
    }
}

// A triangle left out of the groups because its rounded sides do not form a triangle.
#[derive(Debug)]
pub struct Rejected {
    pub signature: TriangleSignature,
    pub error: DomeError,
}

#[derive(Debug, Default)]
pub struct ClassificationResult {
    pub groups: BTreeMap<TriangleSignature, TriangleGroup>,
    // Edge uses: an edge shared by two accepted triangles is counted once for each.
    pub edge_counts: BTreeMap<EdgeLength, usize>,
    // Physical edges, each counted once however many accepted triangles share it.
    pub distinct_edge_counts: BTreeMap<EdgeLength, usize>,
    pub rejected: Vec<Rejected>,
}

impl ClassificationResult {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.groups.values().map(|group| group.count).sum()
    }

    // Every classified triangle, group by group.
    pub fn triangles(&self) -> impl Iterator<Item = &[Vector3<f64>; 3]> + '_ {
        self.groups.values().flat_map(|group| group.instances.iter())
    }
}

// Groups the accepted faces by congruence and counts their edges by length.
pub fn classify(faces: &[Face], vertices: &[Vector3<f64>]) -> ClassificationResult {
    let mut result = ClassificationResult::default();
    let mut seen_edges = HashSet::new();

    for face in faces.iter() {
        let corners = [vertices[face[0]], vertices[face[1]], vertices[face[2]]];
        let lengths = edge_lengths(&corners);
        let signature = TriangleSignature::new(lengths);

        let [a, b, c] = signature.side_lengths();
        let area = match heron_area(a, b, c) {
            Ok(area) => area,
            Err(error) => {
                warn!("skipping triangle {:?} ({}): {}", face, signature, error);
                result.rejected.push(Rejected { signature, error });
                continue;
            }
        };

        for (j, length) in lengths.iter().enumerate() {
            *result.edge_counts.entry(*length).or_insert(0) += 1;

            let (start, end) = (face[j], face[(j + 1) % 3]);
            if seen_edges.insert((start.min(end), start.max(end))) {
                *result.distinct_edge_counts.entry(*length).or_insert(0) += 1;
            }
        }

        let group = result
            .groups
            .entry(signature)
            .or_insert_with(|| TriangleGroup::new(signature));
        group.count += 1;
        // Recomputed for every member; congruent members agree up to rounding.
        group.area =
            round_scaled(area, AREA_PRECISION) as f64 / 10f64.powi(AREA_PRECISION as i32);
        group.instances.push(corners);
    }

    info!(
        "classified {} triangles into {} groups with {} edge lengths",
        result.triangle_count(),
        result.groups.len(),
        result.edge_counts.len()
    );
    result
}
