use log::warn;
use nalgebra::Vector2;

use crate::{
    classify::{ClassificationResult, TriangleSignature},
    error::DomeError,
    helper::{acos_degrees, midpoint},
};

// Relative slack on the squared height before a triangle counts as impossible.
const UNFOLD_TOLERANCE: f64 = 1e-9;

// A triangle flattened from its side lengths alone. Side a runs from the first to the
// second vertex along the x axis, b from the second to the third and c from the third
// back to the first, so the third vertex sits above the x axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarTriangle {
    pub vertices: [Vector2<f64>; 3],
    pub sides: [f64; 3],
    // Interior angles in degrees, each opposite the side of the same index.
    pub angles: [f64; 3],
}

impl PlanarTriangle {
    // Interior angle at each vertex in degrees, in vertex order.
    pub fn vertex_angles(&self) -> [f64; 3] {
        // The first vertex lies between sides a and c, so it faces b, and so on.
        [self.angles[1], self.angles[2], self.angles[0]]
    }

    // Midpoints of sides a, b and c.
    pub fn side_midpoints(&self) -> [Vector2<f64>; 3] {
        let v = &self.vertices;
        [
            midpoint(&v[0], &v[1]),
            midpoint(&v[1], &v[2]),
            midpoint(&v[2], &v[0]),
        ]
    }

    // Copy scaled about the origin and then shifted by offset.
    pub fn placed(&self, scale: f64, offset: Vector2<f64>) -> Self {
        let mut out = *self;
        for v in out.vertices.iter_mut() {
            *v = *v * scale + offset;
        }
        for s in out.sides.iter_mut() {
            *s *= scale;
        }
        out
    }
}

/*
Lays a triangle with sides a, b, c flat. The first vertex goes to the origin and the
second to (a, 0). The third vertex is c away from the first and b away from the second,
so projecting it onto the x axis gives
    x = (a^2 + c^2 - b^2) / 2a
by the law of cosines, and its height is then sqrt(c^2 - x^2). The angle opposite each
side also follows from the law of cosines, with the last one taken as the remainder
of 180 degrees so the three always sum exactly.
*/
pub fn unfold(a: f64, b: f64, c: f64) -> Result<PlanarTriangle, DomeError> {
    let invalid = |reason| DomeError::InvalidTriangle { a, b, c, reason };
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return Err(invalid("side lengths must be finite"));
    }
    if a <= 0. || b <= 0. || c <= 0. {
        return Err(invalid("side lengths must be positive"));
    }

    let x = (a * a + c * c - b * b) / (2. * a);
    let height_sq = c * c - x * x;
    if height_sq < -UNFOLD_TOLERANCE * c * c {
        return Err(invalid("side lengths violate the triangle inequality"));
    }
    let height = height_sq.max(0.).sqrt();

    let angle_a = acos_degrees((b * b + c * c - a * a) / (2. * b * c));
    let angle_b = acos_degrees((a * a + c * c - b * b) / (2. * a * c));
    let angle_c = 180. - angle_a - angle_b;

    Ok(PlanarTriangle {
        vertices: [
            Vector2::new(0., 0.),
            Vector2::new(a, 0.),
            Vector2::new(x, height),
        ],
        sides: [a, b, c],
        angles: [angle_a, angle_b, angle_c],
    })
}

// Scale and spacing of the flattened panel row, in output units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelLayout {
    // Output units per unit of length.
    pub scale: f64,
    // Gap left after each panel's scaled side a.
    pub spacing: f64,
}

impl PanelLayout {
    pub const DEFAULT_SCALE: f64 = 100.;
    pub const DEFAULT_SPACING: f64 = 300.;
}

impl Default for PanelLayout {
    fn default() -> Self {
        PanelLayout {
            scale: Self::DEFAULT_SCALE,
            spacing: Self::DEFAULT_SPACING,
        }
    }
}

// One congruence group's representative, flattened and placed in the row.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    pub signature: TriangleSignature,
    // Unscaled sides and angles, as the labels report them.
    pub shape: PlanarTriangle,
    // Scaled and shifted into place.
    pub placed: PlanarTriangle,
}

// A group left out of the panel row, with the reason its sides could not be laid flat.
#[derive(Debug)]
pub struct SkippedGroup {
    pub signature: TriangleSignature,
    pub error: DomeError,
}

#[derive(Debug)]
pub struct Layout {
    pub panels: Vec<Panel>,
    pub skipped: Vec<SkippedGroup>,
    // Distance from the first panel's origin to the end of the last panel's side a.
    pub width: f64,
}

impl PanelLayout {
    // Places one panel per group left to right along the x axis, starting at the origin.
    pub fn lay_out(&self, result: &ClassificationResult) -> Result<Layout, DomeError> {
        if result.is_empty() {
            return Err(DomeError::EmptyResult);
        }

        let mut panels = Vec::with_capacity(result.groups.len());
        let mut skipped = Vec::new();
        let mut x_offset = 0.;
        for signature in result.groups.keys() {
            let [a, b, c] = signature.side_lengths();
            let shape = match unfold(a, b, c) {
                Ok(shape) => shape,
                Err(error) => {
                    warn!("skipping panel for group {}: {}", signature, error);
                    skipped.push(SkippedGroup {
                        signature: *signature,
                        error,
                    });
                    continue;
                }
            };

            let placed = shape.placed(self.scale, Vector2::new(x_offset, 0.));
            x_offset += placed.sides[0] + self.spacing;
            panels.push(Panel {
                signature: *signature,
                shape,
                placed,
            });
        }

        if panels.is_empty() {
            return Err(DomeError::EmptyResult);
        }

        Ok(Layout {
            panels,
            skipped,
            width: x_offset - self.spacing,
        })
    }
}
