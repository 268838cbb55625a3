//! SVG figure backend.
//!
//! [`SvgFigure`] implements [`PanelFactory`] and [`FigureBackend`] by
//! recording panels and their series, then laying everything out when
//! [`SvgFigure::render`] is called. Panels that share an axis are drawn with
//! the union of their data extents on that axis.

use std::collections::HashMap;
use std::path::Path;

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::facet::{FigureBackend, FigureText};
use crate::grid::{Axis, PanelFactory, PanelSpec};
use crate::scale::{format_tick, Extent, LinearScale, Scale};
use crate::svg::{SvgEncoder, TextAnchor};

const MARGIN_LEFT: f32 = 56.0;
const MARGIN_RIGHT: f32 = 16.0;
const MARGIN_TOP: f32 = 12.0;
const MARGIN_BOTTOM: f32 = 44.0;
const CELL_PAD_X: f32 = 44.0;
const CELL_PAD_TOP: f32 = 22.0;
const CELL_PAD_BOTTOM: f32 = 22.0;
const FONT_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 12.0;
const LABEL_SIZE: f32 = 14.0;
const TICK_COUNT: usize = 4;
const POINT_RADIUS: f32 = 2.5;

/// Handle to a panel of an [`SvgFigure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(usize);

impl PanelId {
    /// Creation index within the figure.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesKind {
    Scatter,
    Line,
}

#[derive(Debug, Clone)]
struct Series {
    kind: SeriesKind,
    x: Vec<f32>,
    y: Vec<f32>,
}

#[derive(Debug, Clone)]
struct PanelState {
    row: usize,
    col: usize,
    nrows: usize,
    ncols: usize,
    share_x: usize,
    share_y: usize,
    x_ticks: bool,
    y_ticks: bool,
    title: Option<String>,
    series: Vec<Series>,
}

impl PanelState {
    fn extent(&self, axis: Axis) -> Option<Extent> {
        self.series.iter().fold(None, |acc, s| {
            let data = match axis {
                Axis::X => &s.x,
                Axis::Y => &s.y,
            };
            Extent::merge(acc, Extent::from_data(data))
        })
    }
}

/// A figure of panels rendered to SVG.
#[derive(Debug, Clone)]
pub struct SvgFigure {
    width: u32,
    height: u32,
    panels: Vec<PanelState>,
    texts: Vec<FigureText>,
}

impl Default for SvgFigure {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SvgFigure {
    /// Create an empty figure.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            panels: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Number of panels created.
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Panel handles in creation order.
    pub fn panels(&self) -> impl Iterator<Item = PanelId> {
        (0..self.panels.len()).map(PanelId)
    }

    fn panel(&self, id: PanelId) -> Result<&PanelState> {
        self.panels.get(id.0).ok_or(Error::UnknownPanel(id.0))
    }

    fn panel_mut(&mut self, id: PanelId) -> Result<&mut PanelState> {
        self.panels.get_mut(id.0).ok_or(Error::UnknownPanel(id.0))
    }

    /// Grid cell of a panel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPanel`] for a foreign handle.
    pub fn cell(&self, id: PanelId) -> Result<(usize, usize)> {
        self.panel(id).map(|p| (p.row, p.col))
    }

    /// The panel whose extent `id` uses on `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPanel`] for a foreign handle.
    pub fn shared_with(&self, id: PanelId, axis: Axis) -> Result<PanelId> {
        let p = self.panel(id)?;
        Ok(PanelId(match axis {
            Axis::X => p.share_x,
            Axis::Y => p.share_y,
        }))
    }

    /// Whether tick labels are drawn on one axis of a panel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPanel`] for a foreign handle.
    pub fn tick_labels_visible(&self, id: PanelId, axis: Axis) -> Result<bool> {
        let p = self.panel(id)?;
        Ok(match axis {
            Axis::X => p.x_ticks,
            Axis::Y => p.y_ticks,
        })
    }

    /// Title of a panel, if set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPanel`] for a foreign handle.
    pub fn title(&self, id: PanelId) -> Result<Option<&str>> {
        self.panel(id).map(|p| p.title.as_deref())
    }

    /// Number of series drawn on a panel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPanel`] for a foreign handle.
    pub fn series_count(&self, id: PanelId) -> Result<usize> {
        self.panel(id).map(|p| p.series.len())
    }

    /// Figure-level texts in the order they were added.
    #[must_use]
    pub fn texts(&self) -> &[FigureText] {
        &self.texts
    }

    /// Draw points on a panel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPanel`] for a foreign handle and
    /// [`Error::ShapeMismatch`] if `x` and `y` differ in length.
    pub fn scatter(&mut self, id: PanelId, x: &[f32], y: &[f32]) -> Result<()> {
        self.add_series(id, SeriesKind::Scatter, x, y)
    }

    /// Draw a connected line on a panel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPanel`] for a foreign handle and
    /// [`Error::ShapeMismatch`] if `x` and `y` differ in length.
    pub fn line(&mut self, id: PanelId, x: &[f32], y: &[f32]) -> Result<()> {
        self.add_series(id, SeriesKind::Line, x, y)
    }

    fn add_series(&mut self, id: PanelId, kind: SeriesKind, x: &[f32], y: &[f32]) -> Result<()> {
        if x.len() != y.len() {
            return Err(Error::ShapeMismatch {
                expected: vec![x.len()],
                found: vec![y.len()],
            });
        }
        self.panel_mut(id)?.series.push(Series {
            kind,
            x: x.to_vec(),
            y: y.to_vec(),
        });
        Ok(())
    }

    /// Extent of every sharing group on one axis, keyed by the group's root.
    fn shared_extents(&self, axis: Axis) -> HashMap<usize, Extent> {
        let mut extents: HashMap<usize, Option<Extent>> = HashMap::new();
        for p in &self.panels {
            let root = match axis {
                Axis::X => p.share_x,
                Axis::Y => p.share_y,
            };
            let entry = extents.entry(root).or_insert(None);
            *entry = Extent::merge(*entry, p.extent(axis));
        }
        extents
            .into_iter()
            .filter_map(|(root, ext)| ext.map(|e| (root, e.padded(0.05))))
            .collect()
    }

    /// Lay out and serialize the figure.
    #[must_use]
    pub fn render(&self) -> String {
        self.encode().render()
    }

    /// Write the rendered figure to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.encode().write_to_file(path)
    }

    fn encode(&self) -> SvgEncoder {
        let (width, height) = (self.width as f32, self.height as f32);
        let mut svg = SvgEncoder::new(self.width, self.height);
        let x_extents = self.shared_extents(Axis::X);
        let y_extents = self.shared_extents(Axis::Y);
        let unit = Extent { min: 0.0, max: 1.0 };

        for (index, p) in self.panels.iter().enumerate() {
            let cell_w = (width - MARGIN_LEFT - MARGIN_RIGHT) / p.ncols as f32;
            let cell_h = (height - MARGIN_TOP - MARGIN_BOTTOM) / p.nrows as f32;
            let left = MARGIN_LEFT + p.col as f32 * cell_w;
            let top = MARGIN_TOP + p.row as f32 * cell_h + CELL_PAD_TOP;
            let w = (cell_w - CELL_PAD_X).max(1.0);
            let h = (cell_h - CELL_PAD_TOP - CELL_PAD_BOTTOM).max(1.0);

            let x_ext = x_extents.get(&p.share_x).copied().unwrap_or(unit);
            let y_ext = y_extents.get(&p.share_y).copied().unwrap_or(unit);
            let x_scale = LinearScale::new(x_ext, (left, left + w));
            let y_scale = LinearScale::new(y_ext, (top + h, top));

            svg.frame(left, top, w, h, Rgba::GREY);

            for tick in x_scale.ticks(TICK_COUNT) {
                let px = x_scale.scale(tick);
                svg.line((px, top + h), (px, top + h + 3.0), Rgba::GREY, 1.0);
                if p.x_ticks {
                    svg.text(px, top + h + 14.0, &format_tick(tick), FONT_SIZE, TextAnchor::Middle);
                }
            }
            for tick in y_scale.ticks(TICK_COUNT) {
                let py = y_scale.scale(tick);
                svg.line((left - 3.0, py), (left, py), Rgba::GREY, 1.0);
                if p.y_ticks {
                    svg.text(left - 5.0, py + 3.0, &format_tick(tick), FONT_SIZE, TextAnchor::End);
                }
            }

            for (i, series) in p.series.iter().enumerate() {
                let color = Rgba::palette(i);
                let points: Vec<(f32, f32)> = series
                    .x
                    .iter()
                    .zip(&series.y)
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .map(|(&x, &y)| (x_scale.scale(x), y_scale.scale(y)))
                    .collect();
                match series.kind {
                    SeriesKind::Scatter => {
                        for (x, y) in points {
                            svg.circle(x, y, POINT_RADIUS, color);
                        }
                    }
                    SeriesKind::Line => svg.polyline(points, color, 1.5),
                }
            }

            if let Some(title) = &p.title {
                svg.text(left + w / 2.0, top - 6.0, title, TITLE_SIZE, TextAnchor::Middle);
            }
            tracing::trace!(panel = index, series = p.series.len(), "panel encoded");
        }

        for t in &self.texts {
            let x = (t.x * width).clamp(LABEL_SIZE, width - LABEL_SIZE);
            let y = ((1.0 - t.y) * height).clamp(LABEL_SIZE, height - LABEL_SIZE / 2.0);
            let rotate = if t.vertical { -90.0 } else { 0.0 };
            svg.text_rotated(x, y, &t.text, LABEL_SIZE, TextAnchor::Middle, rotate);
        }
        svg
    }
}

impl PanelFactory for SvgFigure {
    type Panel = PanelId;

    fn add_panel(&mut self, spec: PanelSpec<'_, PanelId>) -> Result<PanelId> {
        let id = self.panels.len();
        let share_x = match spec.sharex {
            Some(&other) => self.panel(other)?.share_x,
            None => id,
        };
        let share_y = match spec.sharey {
            Some(&other) => self.panel(other)?.share_y,
            None => id,
        };
        self.panels.push(PanelState {
            row: spec.row(),
            col: spec.col(),
            nrows: spec.nrows,
            ncols: spec.ncols,
            share_x,
            share_y,
            x_ticks: true,
            y_ticks: true,
            title: None,
            series: Vec::new(),
        });
        Ok(PanelId(id))
    }

    fn set_tick_labels_visible(&mut self, panel: &PanelId, axis: Axis, visible: bool) -> Result<()> {
        let p = self.panel_mut(*panel)?;
        match axis {
            Axis::X => p.x_ticks = visible,
            Axis::Y => p.y_ticks = visible,
        }
        Ok(())
    }
}

impl FigureBackend for SvgFigure {
    fn set_title(&mut self, panel: &PanelId, title: &str) -> Result<()> {
        self.panel_mut(*panel)?.title = Some(title.to_string());
        Ok(())
    }

    fn figure_text(&mut self, text: FigureText) -> Result<()> {
        self.texts.push(text);
        Ok(())
    }
}
