use std::{fmt, io};

use thiserror::Error;

// Coarse classification of a `DomeError`, for callers that branch on the kind
// rather than the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    InvalidTriangle,
    DegenerateGeometry,
    EmptyResult,
    Output,
}

#[derive(Debug, Error)]
pub enum DomeError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid triangle with sides {a}, {b}, {c}: {reason}")]
    InvalidTriangle {
        a: f64,
        b: f64,
        c: f64,
        reason: &'static str,
    },
    #[error("degenerate triangle with sides {a}, {b}, {c} (Heron radicand {radicand})")]
    DegenerateGeometry { a: f64, b: f64, c: f64, radicand: f64 },
    #[error("nothing to export: no triangles were accepted")]
    EmptyResult,
    #[error("failed to format document")]
    Format(#[from] fmt::Error),
    #[error("failed to build DXF drawing: {0}")]
    Dxf(#[from] dxf::DxfError),
    #[error("failed to write document: {0}")]
    Io(#[from] io::Error),
}

impl DomeError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        DomeError::InvalidParameter(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomeError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            DomeError::InvalidTriangle { .. } => ErrorKind::InvalidTriangle,
            DomeError::DegenerateGeometry { .. } => ErrorKind::DegenerateGeometry,
            DomeError::EmptyResult => ErrorKind::EmptyResult,
            DomeError::Format(_) | DomeError::Dxf(_) | DomeError::Io(_) => ErrorKind::Output,
        }
    }
}
