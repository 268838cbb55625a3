//! Error types for trueno-facet operations.
//!
//! Every error is a validation failure raised before any panel is created,
//! so a half-built grid is never observable.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while grouping data or building a facet grid.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (writing rendered figures, reading config files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrays that must share a shape do not.
    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Shape every array was required to have.
        expected: Vec<usize>,
        /// Offending shape.
        found: Vec<usize>,
    },

    /// Nothing to group or facet.
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// More facets than the configured cap.
    #[error("Too many facets to plot (limit={limit}): {count}")]
    TooManyFacets {
        /// Number of facets requested.
        count: usize,
        /// Configured cap.
        limit: usize,
    },

    /// Explicit grid dimensions disagree with the two-key layout.
    #[error(
        "Two keys specified: (nrows, ncols) must be ({required_rows}, {required_cols}), \
         got ({nrows:?}, {ncols:?})"
    )]
    ConfigurationConflict {
        /// Distinct values of the first key.
        required_rows: usize,
        /// Distinct values of the second key.
        required_cols: usize,
        /// Rows requested by the caller.
        nrows: Option<usize>,
        /// Columns requested by the caller.
        ncols: Option<usize>,
    },

    /// Grid too small for the number of panels required.
    #[error("nrows ({nrows}) and ncols ({ncols}) not big enough to plot {required} facets")]
    InsufficientGrid {
        /// Grid rows.
        nrows: usize,
        /// Grid columns.
        ncols: usize,
        /// Panels that must fit.
        required: usize,
    },

    /// Grid dimensions whose cell count does not fit in `usize`.
    #[error("Grid of {nrows} x {ncols} cells is too large")]
    GridTooLarge {
        /// Grid rows.
        nrows: usize,
        /// Grid columns.
        ncols: usize,
    },

    /// An option string is not one of the recognized values.
    #[error("{option} [{value}] must be one of {allowed:?}")]
    InvalidOption {
        /// Option name (e.g. `sharex`).
        option: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted values.
        allowed: &'static [&'static str],
    },

    /// Faceting supports one or two key arrays.
    #[error("Keys must be one array shaped like the data, or two such arrays; got {0}")]
    UnsupportedKeyCount(usize),

    /// A named column is not present in the data frame.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A panel handle does not belong to this figure.
    #[error("Unknown panel: {0}")]
    UnknownPanel(usize),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shortfall between the panels required and the cells available, if any.
    #[must_use]
    pub fn deficit(&self) -> Option<usize> {
        match self {
            Error::InsufficientGrid {
                nrows,
                ncols,
                required,
            } => Some(required.saturating_sub(nrows.saturating_mul(*ncols))),
            Error::TooManyFacets { count, limit } => Some(count.saturating_sub(*limit)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TooManyFacets {
            count: 51,
            limit: 50,
        };
        assert_eq!(err.to_string(), "Too many facets to plot (limit=50): 51");
    }

    #[test]
    fn test_insufficient_grid_deficit() {
        let err = Error::InsufficientGrid {
            nrows: 1,
            ncols: 1,
            required: 5,
        };
        assert!(err.to_string().contains("not big enough"));
        assert_eq!(err.deficit(), Some(4));
    }

    #[test]
    fn test_invalid_option_names_allowed_values() {
        let err = Error::InvalidOption {
            option: "sharex",
            value: "diagonal".to_string(),
            allowed: &["all", "row", "col", "none"],
        };
        let msg = err.to_string();
        assert!(msg.contains("diagonal"));
        assert!(msg.contains("\"row\""));
        assert_eq!(err.deficit(), None);
    }

    #[test]
    fn test_grid_too_large_has_no_deficit() {
        let err = Error::GridTooLarge {
            nrows: usize::MAX,
            ncols: 2,
        };
        assert!(err.to_string().contains("too large"));
        assert_eq!(err.deficit(), None);
    }

    #[test]
    fn test_configuration_conflict_reports_required_shape() {
        let err = Error::ConfigurationConflict {
            required_rows: 3,
            required_cols: 2,
            nrows: Some(2),
            ncols: None,
        };
        assert!(err.to_string().contains("(3, 2)"));
    }
}
