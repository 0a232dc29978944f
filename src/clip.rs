use std::{
    f64::consts::PI,
    fmt::{self, Display},
    str::FromStr,
};

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{error::DomeError, geodesic_polyhedron::Face};

// Domes are cut in eighths of a turn from the top of the sphere.
pub const DOME_DIVISIONS: u32 = 8;

// Vertices exactly on the cutoff plane (e.g. the equator at 4/8) must not be lost to the
// rounding of cos(kπ/8), so the cutoff is relaxed by this fraction of the radius.
const CUTOFF_TOLERANCE: f64 = 1e-9;

// Which part of the sphere survives clipping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClipMode {
    FullSphere,
    // Keep the cap down to the polar angle kπ/8, written "k/8".
    Dome { eighths: u32 },
}

impl ClipMode {
    // Height (second coordinate) every vertex of an accepted face must reach.
    pub fn cutoff(&self, radius: f64) -> Option<f64> {
        match *self {
            ClipMode::FullSphere => None,
            ClipMode::Dome { eighths } => {
                Some(radius * (PI * eighths as f64 / DOME_DIVISIONS as f64).cos())
            }
        }
    }
}

impl Default for ClipMode {
    fn default() -> Self {
        ClipMode::FullSphere
    }
}

impl FromStr for ClipMode {
    type Err = DomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "full sphere" || s == "sphere" {
            return Ok(ClipMode::FullSphere);
        }

        let bad_mode = || {
            DomeError::invalid_parameter(format!(
                "mode must be \"full sphere\" or \"<k>/{}\", got {:?}",
                DOME_DIVISIONS, s
            ))
        };
        let (num, den) = s.split_once('/').ok_or_else(bad_mode)?;
        let eighths: u32 = num.trim().parse().map_err(|_| bad_mode())?;
        let den: u32 = den.trim().parse().map_err(|_| bad_mode())?;
        if den != DOME_DIVISIONS {
            return Err(bad_mode());
        }
        if eighths > DOME_DIVISIONS {
            return Err(DomeError::invalid_parameter(format!(
                "dome fraction {}/{} exceeds a full sphere",
                eighths, DOME_DIVISIONS
            )));
        }
        Ok(ClipMode::Dome { eighths })
    }
}

impl TryFrom<String> for ClipMode {
    type Error = DomeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ClipMode> for String {
    fn from(mode: ClipMode) -> Self {
        mode.to_string()
    }
}

impl Display for ClipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipMode::FullSphere => write!(f, "full sphere"),
            ClipMode::Dome { eighths } => write!(f, "{}/{}", eighths, DOME_DIVISIONS),
        }
    }
}

// Selects the faces whose three vertices all lie at or above the cutoff height. Faces
// straddling the cutoff are dropped whole, never re-triangulated.
pub fn clip_faces(
    vertices: &[Vector3<f64>],
    faces: &[Face],
    mode: ClipMode,
    radius: f64,
) -> Vec<Face> {
    let cutoff = match mode.cutoff(radius) {
        None => return faces.to_vec(),
        Some(cutoff) => cutoff - CUTOFF_TOLERANCE * radius,
    };

    let accepted: Vec<Face> = faces
        .iter()
        .filter(|face| face.iter().all(|&v| vertices[v][1] >= cutoff))
        .copied()
        .collect();
    debug!(
        "clip {} kept {} of {} faces (cutoff {})",
        mode,
        accepted.len(),
        faces.len(),
        cutoff
    );
    accepted
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use super::{clip_faces, ClipMode};
    use crate::{error::ErrorKind, geodesic_polyhedron::generate_polyhedron};

    #[test]
    fn parses_modes() {
        assert_eq!("full sphere".parse::<ClipMode>().unwrap(), ClipMode::FullSphere);
        assert_eq!("sphere".parse::<ClipMode>().unwrap(), ClipMode::FullSphere);
        assert_eq!(
            " 3/8 ".parse::<ClipMode>().unwrap(),
            ClipMode::Dome { eighths: 3 }
        );
        assert_eq!(ClipMode::Dome { eighths: 5 }.to_string(), "5/8");
    }

    #[test]
    fn rejects_malformed_modes() {
        for bad in ["", "half", "3/4", "x/8", "-1/8", "9/8", "3/8/8"] {
            let err = bad.parse::<ClipMode>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter, "{:?}", bad);
        }
    }

    #[test]
    fn equator_cutoff_is_zero() {
        assert_abs_diff_eq!(
            ClipMode::Dome { eighths: 4 }.cutoff(2.).unwrap(),
            0.,
            epsilon = 1e-12
        );
        assert_eq!(ClipMode::FullSphere.cutoff(2.), None);
    }

    #[test]
    fn full_sphere_accepts_everything() {
        let (verts, tris) = generate_polyhedron(1., 3).unwrap();
        assert_eq!(clip_faces(&verts, &tris, ClipMode::FullSphere, 1.), tris);
        assert_eq!(
            clip_faces(&verts, &tris, ClipMode::Dome { eighths: 8 }, 1.).len(),
            tris.len()
        );
    }

    #[test]
    fn hemisphere_keeps_upper_faces_only() {
        let (verts, tris) = generate_polyhedron(2., 2).unwrap();
        let accepted = clip_faces(&verts, &tris, ClipMode::Dome { eighths: 4 }, 2.);
        assert_eq!(accepted.len(), 36);
        for face in accepted.iter() {
            assert!(face.iter().all(|&v| verts[v][1] >= -1e-9));
        }
    }

    #[test]
    fn icosahedron_hemisphere_includes_equator_vertices() {
        let (verts, tris) = generate_polyhedron(1., 1).unwrap();
        let accepted = clip_faces(&verts, &tris, ClipMode::Dome { eighths: 4 }, 1.);
        assert_eq!(accepted.len(), 8);
    }

    #[test]
    fn zero_eighths_accepts_nothing() {
        let (verts, tris) = generate_polyhedron(1., 2).unwrap();
        assert!(clip_faces(&verts, &tris, ClipMode::Dome { eighths: 0 }, 1.).is_empty());
    }
}
