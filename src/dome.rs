use log::info;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    classify::{classify, ClassificationResult},
    clip::{clip_faces, ClipMode},
    error::DomeError,
    export::{Document, Exporter},
    geodesic_polyhedron::{self, generate_polyhedron, Face},
    summary::DomeSummary,
};

// Inputs of one generation run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomeParams {
    pub radius: f64,
    pub frequency: usize,
    pub mode: ClipMode,
}

impl Default for DomeParams {
    fn default() -> Self {
        DomeParams {
            radius: 1.,
            frequency: 2,
            mode: ClipMode::FullSphere,
        }
    }
}

impl DomeParams {
    pub fn validate(&self) -> Result<(), DomeError> {
        geodesic_polyhedron::validate(self.radius, self.frequency)
    }
}

// The result of running the whole pipeline once. Regenerating builds a new `Dome`, so
// nothing from an earlier run can leak into the groups of a later one.
#[derive(Debug)]
pub struct Dome {
    pub params: DomeParams,
    pub vertices: Vec<Vector3<f64>>,
    pub faces: Vec<Face>,
    // Faces surviving the clip, in generation order.
    pub accepted: Vec<Face>,
    pub classification: ClassificationResult,
}

impl Dome {
    // Generates, clips and classifies. Invalid parameters are rejected before any
    // geometry is built; a clip that keeps nothing is not an error here, but every
    // export of the resulting dome reports `DomeError::EmptyResult`.
    pub fn generate(params: DomeParams) -> Result<Dome, DomeError> {
        params.validate()?;

        let (vertices, faces) = generate_polyhedron(params.radius, params.frequency)?;
        let accepted = clip_faces(&vertices, &faces, params.mode, params.radius);
        info!(
            "{} dome, radius {}, frequency {}: kept {} of {} triangles",
            params.mode,
            params.radius,
            params.frequency,
            accepted.len(),
            faces.len()
        );
        let classification = classify(&accepted, &vertices);

        Ok(Dome {
            params,
            vertices,
            faces,
            accepted,
            classification,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.classification.is_empty()
    }

    pub fn summary(&self) -> DomeSummary {
        DomeSummary::new(&self.params, self.faces.len(), &self.classification)
    }

    pub fn export(&self, exporter: &dyn Exporter) -> Result<Document, DomeError> {
        exporter.export(&self.classification)
    }
}

#[cfg(test)]
mod test {
    use super::{Dome, DomeParams};
    use crate::{clip::ClipMode, error::ErrorKind, export::Format};

    #[test]
    fn params_load_from_json() {
        let params: DomeParams =
            serde_json::from_str(r#"{"radius": 2.5, "frequency": 3, "mode": "5/8"}"#).unwrap();
        assert_eq!(
            params,
            DomeParams {
                radius: 2.5,
                frequency: 3,
                mode: ClipMode::Dome { eighths: 5 },
            }
        );

        let defaults: DomeParams = serde_json::from_str(r#"{"mode": "sphere"}"#).unwrap();
        assert_eq!(defaults, DomeParams::default());
    }

    #[test]
    fn params_reject_bad_mode_in_json() {
        assert!(serde_json::from_str::<DomeParams>(r#"{"mode": "half"}"#).is_err());
    }

    #[test]
    fn invalid_params_build_nothing() {
        for params in [
            DomeParams { radius: 0., ..Default::default() },
            DomeParams { frequency: 7, ..Default::default() },
        ] {
            let err = Dome::generate(params).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn regenerating_starts_fresh() {
        let sphere = Dome::generate(DomeParams::default()).unwrap();
        let dome = Dome::generate(DomeParams {
            mode: ClipMode::Dome { eighths: 4 },
            ..Default::default()
        })
        .unwrap();
        assert_eq!(sphere.classification.triangle_count(), 80);
        assert_eq!(dome.classification.triangle_count(), 36);
        assert_eq!(dome.accepted.len(), 36);
    }

    #[test]
    fn empty_dome_exports_nothing() {
        let dome = Dome::generate(DomeParams {
            mode: ClipMode::Dome { eighths: 0 },
            ..Default::default()
        })
        .unwrap();
        assert!(dome.is_empty());
        for format in Format::ALL.iter() {
            let err = dome.export(format.exporter().as_ref()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EmptyResult);
        }
    }
}
