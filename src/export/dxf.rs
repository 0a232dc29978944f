use dxf::{
    entities::{Entity, EntityType, Line},
    Drawing, Point,
};
use nalgebra::Vector3;

use super::{ensure_nonempty, Document, Exporter};
use crate::{classify::ClassificationResult, error::DomeError};

// A drawing with one LINE entity per triangle edge. Edges shared by two triangles appear
// once for each, matching the edge use counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dxf {
    pub layer: String,
}

impl Default for Dxf {
    fn default() -> Self {
        Dxf {
            layer: "0".to_owned(),
        }
    }
}

fn to_point(v: &Vector3<f64>) -> Point {
    Point::new(v[0], v[1], v[2])
}

impl Dxf {
    pub fn drawing(&self, result: &ClassificationResult) -> Result<Drawing, DomeError> {
        ensure_nonempty(result)?;

        let mut drawing = Drawing::new();
        for tri in result.triangles() {
            for j in 0..3 {
                let line = Line::new(to_point(&tri[j]), to_point(&tri[(j + 1) % 3]));
                let mut entity = Entity::new(EntityType::Line(line));
                entity.common.layer = self.layer.clone();
                drawing.add_entity(entity);
            }
        }
        Ok(drawing)
    }
}

impl Exporter for Dxf {
    fn export(&self, result: &ClassificationResult) -> Result<Document, DomeError> {
        let drawing = self.drawing(result)?;
        let mut buffer = Vec::new();
        drawing.save(&mut buffer)?;
        Ok(Document::complete(buffer))
    }
}
