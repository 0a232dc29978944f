use std::{fs, path::Path, str::FromStr};

use log::{info, warn};

use crate::{classify::ClassificationResult, error::DomeError, unfold::SkippedGroup};

use self::{
    dxf::Dxf,
    stl::{AsciiStl, BinaryStl, PanelStl},
    svg::Svg,
};

pub mod dxf;
pub mod stl;
pub mod svg;

// One complete output file, and the groups that had to be left out of it.
#[derive(Debug)]
pub struct Document {
    pub bytes: Vec<u8>,
    // Only panel layouts skip groups; the 3d exporters always leave this empty.
    pub skipped: Vec<SkippedGroup>,
}

impl Document {
    fn complete(bytes: Vec<u8>) -> Self {
        Document {
            bytes,
            skipped: Vec::new(),
        }
    }
}

// A serializer from classified triangles to one complete document. Exporters are pure:
// the same groups always give the same bytes, and no groups give `DomeError::EmptyResult`
// rather than an empty shell of a document.
pub trait Exporter {
    fn export(&self, result: &ClassificationResult) -> Result<Document, DomeError>;
}

pub(crate) fn ensure_nonempty(result: &ClassificationResult) -> Result<(), DomeError> {
    if result.is_empty() {
        Err(DomeError::EmptyResult)
    } else {
        Ok(())
    }
}

// Assembles the whole document before touching the filesystem, so a failed export
// never leaves a partial file behind. Returns the groups missing from the written file.
pub fn write_document(
    path: &Path,
    exporter: &dyn Exporter,
    result: &ClassificationResult,
) -> Result<Vec<SkippedGroup>, DomeError> {
    let document = exporter.export(result)?;
    fs::write(path, &document.bytes)?;
    info!("wrote {} bytes to {}", document.bytes.len(), path.display());
    for skipped in document.skipped.iter() {
        warn!(
            "{} is missing group {}: {}",
            path.display(),
            skipped.signature,
            skipped.error
        );
    }
    Ok(document.skipped)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Stl,
    BinaryStl,
    Dxf,
    PanelStl,
    Svg,
    CutSvg,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::Stl,
        Format::BinaryStl,
        Format::Dxf,
        Format::PanelStl,
        Format::Svg,
        Format::CutSvg,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Stl => "stl",
            Format::BinaryStl => "stl-binary",
            Format::Dxf => "dxf",
            Format::PanelStl => "panels-stl",
            Format::Svg => "svg",
            Format::CutSvg => "svg-cut",
        }
    }

    // The exporter for this format with its default settings.
    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            Format::Stl => Box::new(AsciiStl::default()),
            Format::BinaryStl => Box::new(BinaryStl::default()),
            Format::Dxf => Box::new(Dxf::default()),
            Format::PanelStl => Box::new(PanelStl::default()),
            Format::Svg => Box::new(Svg::annotated()),
            Format::CutSvg => Box::new(Svg::cut_layer()),
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            Format::Stl | Format::BinaryStl => "geodesic.stl",
            Format::Dxf => "geodesic.dxf",
            Format::PanelStl => "geodesic_panels.stl",
            Format::Svg => "geodesic_panels.svg",
            Format::CutSvg => "geodesic_panels_cut.svg",
        }
    }
}

impl FromStr for Format {
    type Err = DomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .iter()
            .copied()
            .find(|format| format.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Format::ALL.iter().map(|f| f.name()).collect();
                DomeError::invalid_parameter(format!(
                    "unknown format {:?}, expected one of {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}
