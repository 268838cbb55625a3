//! Vector SVG encoder.
//!
//! Accumulates primitive elements and serializes them into a standalone
//! SVG document.

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::color::Rgba;
use crate::error::Result;

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
    },
    /// Circle
    Circle { cx: f32, cy: f32, r: f32, fill: Rgba },
    /// Line
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Rgba,
        stroke_width: f32,
    },
    /// Polyline (connected line segments)
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Rgba,
        stroke_width: f32,
    },
    /// Text, optionally rotated about its anchor point
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        anchor: TextAnchor,
        rotate: f32,
    },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Align text start at position
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// SVG document builder.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    elements: Vec<SvgElement>,
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions and a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    fn push(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Add an outlined, unfilled rectangle.
    pub fn frame(&mut self, x: f32, y: f32, width: f32, height: f32, stroke: Rgba) {
        self.push(SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill: None,
            stroke: Some(stroke),
        });
    }

    /// Add a filled circle.
    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, fill: Rgba) {
        self.push(SvgElement::Circle { cx, cy, r, fill });
    }

    /// Add a line.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Rgba, stroke_width: f32) {
        self.push(SvgElement::Line {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            stroke,
            stroke_width,
        });
    }

    /// Add a polyline.
    pub fn polyline(&mut self, points: Vec<(f32, f32)>, stroke: Rgba, stroke_width: f32) {
        self.push(SvgElement::Polyline {
            points,
            stroke,
            stroke_width,
        });
    }

    /// Add black text.
    pub fn text(&mut self, x: f32, y: f32, text: &str, font_size: f32, anchor: TextAnchor) {
        self.text_rotated(x, y, text, font_size, anchor, 0.0);
    }

    /// Add black text rotated by `rotate` degrees.
    pub fn text_rotated(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        font_size: f32,
        anchor: TextAnchor,
        rotate: f32,
    ) {
        self.push(SvgElement::Text {
            x,
            y,
            text: text.to_string(),
            font_size,
            anchor,
            rotate,
        });
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );

        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            Rgba::WHITE.to_css()
        );

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            let fill_attr = fill.map_or_else(|| "none".to_string(), Rgba::to_css);
            let stroke_attr = stroke
                .map(|s| format!(r#" stroke="{}""#, s.to_css()))
                .unwrap_or_default();
            format!(
                r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{fill_attr}"{stroke_attr}/>"#
            )
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#, fill.to_css())
        }
        SvgElement::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
        } => format!(
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="{stroke_width}"/>"#,
            stroke.to_css()
        ),
        SvgElement::Polyline {
            points,
            stroke,
            stroke_width,
        } => {
            let points_str = points
                .iter()
                .map(|(x, y)| format!("{x},{y}"))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                r#"<polyline points="{points_str}" fill="none" stroke="{}" stroke-width="{stroke_width}"/>"#,
                stroke.to_css()
            )
        }
        SvgElement::Text {
            x,
            y,
            text,
            font_size,
            anchor,
            rotate,
        } => {
            let transform = if *rotate == 0.0 {
                String::new()
            } else {
                format!(r#" transform="rotate({rotate} {x} {y})""#)
            };
            format!(
                r#"<text x="{x}" y="{y}" font-size="{font_size}" text-anchor="{}" font-family="sans-serif" fill="{}"{transform}>{}</text>"#,
                anchor.as_str(),
                Rgba::BLACK.to_css(),
                escape_xml(text)
            )
        }
    }
}
