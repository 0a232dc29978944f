use nalgebra::Vector2;
use svg::node::element::{path::Data, Group, Path, Polygon, Text};

use super::{Document, Exporter};
use crate::{
    classify::ClassificationResult,
    error::DomeError,
    unfold::{Layout, PanelLayout},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SvgStyle {
    // Polygon outlines with side lengths at the edge midpoints and angles at the corners.
    Annotated,
    // Bare closed paths on a single Inkscape layer, ready for a cutter.
    CutLayer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgCanvas {
    pub width: f64,
    pub height: f64,
}

// Flattened panels drawn left to right, centred horizontally on the canvas with their
// bases on its horizontal midline.
#[derive(Clone, Debug, PartialEq)]
pub struct Svg {
    pub style: SvgStyle,
    pub canvas: SvgCanvas,
    pub layout: PanelLayout,
}

const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
const SIDE_LABEL_COLOR: &str = "blue";
const ANGLE_LABEL_COLOR: &str = "green";
const FONT_SIZE: u32 = 12;
// Angle labels sit this far above their corner.
const ANGLE_LABEL_RISE: f64 = 10.;

fn label(text: String, pos: Vector2<f64>, color: &str) -> Text {
    Text::new(text)
        .set("x", pos[0])
        .set("y", pos[1])
        .set("fill", color)
        .set("font-size", FONT_SIZE)
        .set("text-anchor", "middle")
}

impl Svg {
    pub fn annotated() -> Self {
        Svg {
            style: SvgStyle::Annotated,
            canvas: SvgCanvas {
                width: 3000.,
                height: 1000.,
            },
            layout: PanelLayout::default(),
        }
    }

    pub fn cut_layer() -> Self {
        Svg {
            style: SvgStyle::CutLayer,
            canvas: SvgCanvas {
                width: 2000.,
                height: 1000.,
            },
            layout: PanelLayout::default(),
        }
    }

    pub fn render(&self, layout: &Layout) -> svg::Document {
        let SvgCanvas { width, height } = self.canvas;
        // Svg y grows downwards, so panel heights are subtracted from the baseline.
        let start = (width - layout.width) / 2.;
        let baseline = height / 2.;
        let to_canvas = |p: &Vector2<f64>| Vector2::new(start + p[0], baseline - p[1]);

        let doc = svg::Document::new()
            .set("viewBox", (0, 0, width, height))
            .set("width", width)
            .set("height", height);

        match self.style {
            SvgStyle::Annotated => layout
                .panels
                .iter()
                .fold(doc, |doc, panel| {
                    let v: Vec<Vector2<f64>> =
                        panel.placed.vertices.iter().map(&to_canvas).collect();
                    let points: Vec<String> =
                        v.iter().map(|p| format!("{},{}", p[0], p[1])).collect();
                    let mut doc = doc.add(
                        Polygon::new()
                            .set("points", points)
                            .set("fill", "none")
                            .set("stroke", "black")
                            .set("stroke-width", 1),
                    );

                    let midpoints = panel.placed.side_midpoints();
                    for (mid, side) in midpoints.iter().zip(panel.shape.sides.iter()) {
                        doc = doc.add(label(
                            format!("{:.2} m", side),
                            to_canvas(mid),
                            SIDE_LABEL_COLOR,
                        ));
                    }
                    for (pos, angle) in v.iter().zip(panel.shape.vertex_angles().iter()) {
                        doc = doc.add(label(
                            format!("{:.2}°", angle),
                            Vector2::new(pos[0], pos[1] - ANGLE_LABEL_RISE),
                            ANGLE_LABEL_COLOR,
                        ));
                    }
                    doc
                }),
            SvgStyle::CutLayer => {
                let layer = layout.panels.iter().fold(
                    Group::new()
                        .set("inkscape:groupmode", "layer")
                        .set("id", "layer1")
                        .set("inkscape:label", "Cut"),
                    |layer, panel| {
                        let v: Vec<Vector2<f64>> =
                            panel.placed.vertices.iter().map(&to_canvas).collect();
                        let outline = Data::new()
                            .move_to((v[0][0], v[0][1]))
                            .line_to((v[1][0], v[1][1]))
                            .line_to((v[2][0], v[2][1]))
                            .close();
                        layer.add(
                            Path::new()
                                .set("d", outline)
                                .set("fill", "none")
                                .set("stroke", "black")
                                .set("stroke-width", 1),
                        )
                    },
                );
                doc.set("xmlns:inkscape", INKSCAPE_NS).add(layer)
            }
        }
    }
}

impl Exporter for Svg {
    fn export(&self, result: &ClassificationResult) -> Result<Document, DomeError> {
        let layout = self.layout.lay_out(result)?;
        let text = self.render(&layout).to_string();
        Ok(Document {
            bytes: text.into_bytes(),
            skipped: layout.skipped,
        })
    }
}
