//! Faceted small multiples.
//!
//! A [`Facet`] partitions data arrays by one or two key arrays, lays out one
//! panel per group, and hands each `(panel, data subset)` pair to the caller.
//! Which plotting operation runs on a panel is the caller's decision; the
//! facet only supplies the grouping and the grid.
//!
//! # Example
//!
//! ```rust
//! use trueno_facet::prelude::*;
//!
//! let key = NdArray::from_vec(vec![1, 1, 2, 2, 3]);
//! let x = NdArray::from_vec(vec![0.0f32, 1.0, 0.0, 1.0, 0.5]);
//! let y = NdArray::from_vec(vec![1.0f32, 2.0, 2.0, 3.0, 0.5]);
//!
//! let facet = Facet::new(vec![key], vec![x, y], FacetOptions::new().xlabel("x")).unwrap();
//! let mut figure = SvgFigure::new(600, 400);
//! facet
//!     .plot(&mut figure, |fig, item| fig.scatter(item.panel, &item.data[0], &item.data[1]))
//!     .unwrap();
//!
//! assert_eq!(figure.panel_count(), 3);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::array::NdArray;
use crate::config::FacetOptions;
use crate::error::{Error, Result};
use crate::frame::{DataFrame, DataValue};
use crate::grid::{build_grid, GridSpec, PanelFactory};
use crate::groupby::group_by;
use crate::layout::{check_facet_count, resolve_grid_shape, GridShape};

/// Maps a key tuple to a panel label.
pub type Labeler<K> = Box<dyn Fn(&[K]) -> String>;

/// Text placed relative to the whole figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureText {
    /// Horizontal position, 0 = left edge, 1 = right edge.
    pub x: f32,
    /// Vertical position, 0 = bottom edge, 1 = top edge.
    pub y: f32,
    /// Text content.
    pub text: String,
    /// Rotate to read bottom-to-top.
    pub vertical: bool,
}

/// Backend operations used to decorate a faceted figure.
pub trait FigureBackend: PanelFactory {
    /// Set a panel's title.
    ///
    /// # Errors
    ///
    /// Backend specific.
    fn set_title(&mut self, panel: &Self::Panel, title: &str) -> Result<()>;

    /// Draw text at a figure-relative position, centered on that point.
    ///
    /// # Errors
    ///
    /// Backend specific.
    fn figure_text(&mut self, text: FigureText) -> Result<()>;
}

/// One facet: its panel, key, label and data subset.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetItem<K, D, P> {
    /// Panel assigned to this group.
    pub panel: P,
    /// Grid row of the panel.
    pub row: usize,
    /// Grid column of the panel.
    pub col: usize,
    /// Key value(s) shared by the group.
    pub key: Vec<K>,
    /// Label produced by the labeler.
    pub label: String,
    /// Each data array restricted to the group, in data array order.
    pub data: Vec<Vec<D>>,
}

/// Faceting session over fixed key and data arrays.
pub struct Facet<K, D> {
    keys: Vec<NdArray<K>>,
    data: Vec<NdArray<D>>,
    levels: Vec<Vec<K>>,
    shape: GridShape,
    count: usize,
    options: FacetOptions,
    labeler: Labeler<K>,
}

impl<K: fmt::Debug, D> fmt::Debug for Facet<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facet")
            .field("levels", &self.levels)
            .field("shape", &self.shape)
            .field("count", &self.count)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Default label: the bare value for one key, `(a, b)` for two.
#[must_use]
pub fn default_label<K: fmt::Display>(key: &[K]) -> String {
    match key {
        [single] => single.to_string(),
        _ => {
            let parts: Vec<String> = key.iter().map(ToString::to_string).collect();
            format!("({})", parts.join(", "))
        }
    }
}

/// Labeler backed by a mapping, falling back to [`default_label`] for keys
/// the mapping does not cover.
#[must_use]
pub fn labeler_from_map<K>(map: BTreeMap<Vec<K>, String>) -> Labeler<K>
where
    K: Ord + fmt::Display + 'static,
{
    Box::new(move |key: &[K]| {
        map.get(key)
            .cloned()
            .unwrap_or_else(|| default_label(key))
    })
}

impl<K, D> Facet<K, D>
where
    K: Ord + Clone + fmt::Display + 'static,
    D: Clone,
{
    /// Validate inputs and resolve the grid.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedKeyCount`] unless there are one or two keys.
    /// - [`Error::EmptyInput`] with no data arrays or nothing to facet.
    /// - [`Error::ShapeMismatch`] if any key or data array differs in shape.
    /// - [`Error::TooManyFacets`] above `options.max_facets`.
    /// - [`Error::ConfigurationConflict`] / [`Error::InsufficientGrid`] from
    ///   grid-shape resolution.
    pub fn new(keys: Vec<NdArray<K>>, data: Vec<NdArray<D>>, options: FacetOptions) -> Result<Self> {
        if !(1..=2).contains(&keys.len()) {
            return Err(Error::UnsupportedKeyCount(keys.len()));
        }
        let shape = data
            .first()
            .ok_or(Error::EmptyInput("no data arrays"))?
            .shape()
            .to_vec();
        let shapes = keys.iter().map(NdArray::shape).chain(data.iter().map(NdArray::shape));
        for found in shapes {
            if found != shape.as_slice() {
                return Err(Error::ShapeMismatch {
                    expected: shape,
                    found: found.to_vec(),
                });
            }
        }

        let levels: Vec<Vec<K>> = keys
            .iter()
            .map(|key| {
                let mut values = key.as_slice().to_vec();
                values.sort_unstable();
                values.dedup();
                values
            })
            .collect();
        let distinct: Vec<usize> = levels.iter().map(Vec::len).collect();
        let count = check_facet_count(&distinct, options.max_facets)?;
        let grid = resolve_grid_shape(&distinct, options.nrows, options.ncols)?;

        tracing::debug!(
            keys = keys.len(),
            facets = count,
            nrows = grid.nrows,
            ncols = grid.ncols,
            "facet configured"
        );

        Ok(Self {
            keys,
            data,
            levels,
            shape: grid,
            count,
            options,
            labeler: Box::new(|key: &[K]| default_label(key)),
        })
    }

    /// Replace the labeler.
    #[must_use]
    pub fn with_labeler(mut self, labeler: impl Fn(&[K]) -> String + 'static) -> Self {
        self.labeler = Box::new(labeler);
        self
    }

    /// Resolved grid shape.
    #[must_use]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Number of facets (panels) the grid will hold.
    #[must_use]
    pub fn facet_count(&self) -> usize {
        self.count
    }

    /// Sorted distinct values of key `i`.
    #[must_use]
    pub fn levels(&self, i: usize) -> Option<&[K]> {
        self.levels.get(i).map(Vec::as_slice)
    }

    /// Options this facet was built with.
    #[must_use]
    pub fn options(&self) -> &FacetOptions {
        &self.options
    }

    /// Label for a key tuple.
    #[must_use]
    pub fn label(&self, key: &[K]) -> String {
        (self.labeler)(key)
    }

    /// Grid cell `(row, col)` assigned to a key tuple.
    ///
    /// With one key, the i-th distinct value fills cells row-major. With two
    /// keys, the first key picks the row and the second the column.
    #[must_use]
    pub fn pick_cell(&self, key: &[K]) -> Option<(usize, usize)> {
        if key.len() != self.levels.len() {
            return None;
        }
        let mut index = Vec::with_capacity(key.len());
        for (value, levels) in key.iter().zip(&self.levels) {
            index.push(levels.binary_search(value).ok()?);
        }
        match index[..] {
            [i] => Some((i / self.shape.ncols, i % self.shape.ncols)),
            [i, j] => Some((i, j)),
            _ => None,
        }
    }

    /// Build the panel grid on `backend` and pair every group with its panel.
    ///
    /// Items come in ascending key order.
    ///
    /// # Errors
    ///
    /// Propagates backend errors from grid construction.
    pub fn items<B: PanelFactory>(&self, backend: &mut B) -> Result<Vec<FacetItem<K, D, B::Panel>>> {
        let spec = GridSpec::new(self.shape.nrows, self.shape.ncols)
            .num(self.count)
            .sharex(self.options.sharex)
            .sharey(self.options.sharey);
        let grid = build_grid(backend, spec)?;

        let keys: Vec<&NdArray<K>> = self.keys.iter().collect();
        group_by(&keys)?
            .map(|group| -> Result<FacetItem<K, D, B::Panel>> {
                let (row, col) = self
                    .pick_cell(&group.key)
                    .ok_or(Error::EmptyInput("group key outside facet levels"))?;
                let panel = grid
                    .get(row, col)
                    .cloned()
                    .ok_or(Error::UnknownPanel(row * self.shape.ncols + col))?;
                let data = self
                    .data
                    .iter()
                    .map(|arr| arr.take(&group.positions))
                    .collect::<Result<Vec<_>>>()?;
                let label = self.label(&group.key);
                Ok(FacetItem {
                    panel,
                    row,
                    col,
                    key: group.key,
                    label,
                    data,
                })
            })
            .collect()
    }

    /// Draw every facet with `draw`, title each panel with its label, and add
    /// the figure-level axis labels.
    ///
    /// Returns the items that were drawn.
    ///
    /// # Errors
    ///
    /// Propagates errors from `draw` and from the backend.
    pub fn plot<B, F>(&self, backend: &mut B, mut draw: F) -> Result<Vec<FacetItem<K, D, B::Panel>>>
    where
        B: FigureBackend,
        F: FnMut(&mut B, &FacetItem<K, D, B::Panel>) -> Result<()>,
    {
        let items = self.items(backend)?;
        for item in &items {
            draw(backend, item)?;
            backend.set_title(&item.panel, &item.label)?;
        }

        if let Some(xlabel) = &self.options.xlabel {
            backend.figure_text(FigureText {
                x: 0.5,
                y: 0.0,
                text: xlabel.clone(),
                vertical: false,
            })?;
        }
        if let Some(ylabel) = &self.options.ylabel {
            backend.figure_text(FigureText {
                x: 0.0,
                y: 0.5,
                text: ylabel.clone(),
                vertical: true,
            })?;
        }
        Ok(items)
    }
}

impl Facet<DataValue, DataValue> {
    /// Facet the named columns of a data frame.
    ///
    /// Panels are labeled `"col: value"` (comma-joined for two keys) unless
    /// replaced with [`Facet::with_labeler`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] for unknown column names, otherwise as
    /// [`Facet::new`].
    pub fn from_frame(
        frame: &DataFrame,
        facet: &[&str],
        data: &[&str],
        options: FacetOptions,
    ) -> Result<Self> {
        let keys = facet
            .iter()
            .map(|name| frame.column_array(name))
            .collect::<Result<Vec<_>>>()?;
        let values = data
            .iter()
            .map(|name| frame.column_array(name))
            .collect::<Result<Vec<_>>>()?;

        let names: Vec<String> = facet.iter().map(|s| (*s).to_string()).collect();
        let facet = Self::new(keys, values, options)?;
        Ok(facet.with_labeler(move |key: &[DataValue]| {
            names
                .iter()
                .zip(key)
                .map(|(name, value)| format!("{name}: {value}"))
                .collect::<Vec<_>>()
                .join(", ")
        }))
    }
}
