// Numerics calls for a few non-standard names, e.g. φ
#![allow(non_upper_case_globals)]
pub mod classify;
pub mod clip;
pub mod color;
pub mod dome;
pub mod error;
pub mod export;
pub mod geodesic_polyhedron;
pub mod helper;
pub mod summary;
pub mod unfold;

pub use dome::{Dome, DomeParams};
pub use error::{DomeError, ErrorKind};
