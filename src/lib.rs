//! # Trueno-Facet
//!
//! Small-multiple faceting for data science plots.
//!
//! Given one or two categorical key arrays and one or more equally-shaped data
//! arrays, trueno-facet partitions the data into groups sharing identical key
//! values, lays out a grid of linked panels (one per group), and hands each
//! panel its data subset.
//!
//! ## Features
//!
//! - **Composite-key grouping**: sort-based, O(n log n), over N-dimensional arrays
//! - **Shared-axis grids**: `row`/`col`/`all`/`none` sharing with redundant tick
//!   labels suppressed
//! - **Backend agnostic**: panels are opaque handles from any [`grid::PanelFactory`];
//!   an SVG backend is included
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_facet::prelude::*;
//!
//! let species = NdArray::from_vec(vec!["a", "b", "a", "c", "b"]);
//! let x = NdArray::from_vec(vec![1.0f32, 2.0, 3.0, 4.0, 5.0]);
//! let y = NdArray::from_vec(vec![2.0f32, 4.0, 1.0, 5.0, 3.0]);
//!
//! let facet = Facet::new(vec![species], vec![x, y], FacetOptions::new()).unwrap();
//! let mut figure = SvgFigure::new(800, 400);
//! facet
//!     .plot(&mut figure, |fig, item| fig.scatter(item.panel, &item.data[0], &item.data[1]))
//!     .unwrap();
//!
//! let svg = figure.render();
//! assert!(svg.contains("<circle"));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialize/deserialize [`FacetOptions`]
//! - `config`: Load [`FacetOptions`] from YAML files

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// N-dimensional arrays and position sets.
pub mod array;

/// Composite-key grouping.
pub mod groupby;

/// Shared-axis panel grids.
pub mod grid;

/// Grid-shape resolution.
pub mod layout;

// ============================================================================
// Faceting
// ============================================================================

/// Facet options and YAML configuration.
pub mod config;

/// Faceted small multiples.
pub mod facet;

/// Labeled columnar data.
pub mod frame;

// ============================================================================
// SVG Backend
// ============================================================================

/// Colors.
pub mod color;

/// Extents and linear scales.
pub mod scale;

/// SVG encoder.
pub mod svg;

/// SVG figure backend.
pub mod figure;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-facet operations.
pub mod error;

pub use config::FacetOptions;
pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_facet::prelude::*;
/// ```
pub mod prelude {
    pub use crate::array::{NdArray, Positions};
    pub use crate::config::FacetOptions;
    pub use crate::error::{Error, Result};
    pub use crate::facet::{Facet, FacetItem, FigureBackend, FigureText};
    pub use crate::figure::{PanelId, SvgFigure};
    pub use crate::frame::{DataFrame, DataValue};
    pub use crate::grid::{build_grid, Axis, GridSpec, PanelFactory, ShareMode, Squeezed};
    pub use crate::groupby::{group_by, Group};
}
