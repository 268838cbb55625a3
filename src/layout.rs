//! Grid-shape resolution.
//!
//! Decides how many rows and columns a facet grid needs from the distinct
//! value counts of its keys and any explicit dimensions the caller asked for.

use crate::error::{Error, Result};

/// Default cap on the number of facets.
pub const MAX_FACETS: usize = 50;

/// Resolved grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// Grid rows.
    pub nrows: usize,
    /// Grid columns.
    pub ncols: usize,
}

impl GridShape {
    /// Number of cells, saturating at `usize::MAX`.
    #[must_use]
    pub fn cells(&self) -> usize {
        self.nrows.saturating_mul(self.ncols)
    }
}

/// Number of facets implied by the per-key distinct counts, validated
/// against `limit`.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] when there is nothing to facet and
/// [`Error::TooManyFacets`] when the product exceeds `limit`.
pub fn check_facet_count(distinct: &[usize], limit: usize) -> Result<usize> {
    if distinct.is_empty() || distinct.contains(&0) {
        return Err(Error::EmptyInput("no data to facet"));
    }
    let count = distinct
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .unwrap_or(usize::MAX);
    if count > limit {
        return Err(Error::TooManyFacets { count, limit });
    }
    Ok(count)
}

/// Resolve the grid shape for one or two keys.
///
/// With two keys the shape is fixed to `(distinct[0], distinct[1])`. With one
/// key, unspecified dimensions are derived so the grid holds every facet,
/// starting from `floor(sqrt(n))` rows when neither is given.
///
/// # Errors
///
/// - [`Error::ConfigurationConflict`] if explicit dimensions contradict a
///   two-key layout.
/// - [`Error::InsufficientGrid`] if the grid cannot hold every facet.
/// - [`Error::GridTooLarge`] if explicit dimensions overflow the cell count.
/// - [`Error::UnsupportedKeyCount`] for anything but one or two keys.
/// - [`Error::EmptyInput`] if a key has no distinct values.
pub fn resolve_grid_shape(
    distinct: &[usize],
    nrows: Option<usize>,
    ncols: Option<usize>,
) -> Result<GridShape> {
    if distinct.contains(&0) {
        return Err(Error::EmptyInput("no data to facet"));
    }
    match *distinct {
        [rows, cols] => {
            let conflicts = nrows.is_some_and(|n| n != rows) || ncols.is_some_and(|n| n != cols);
            if conflicts {
                return Err(Error::ConfigurationConflict {
                    required_rows: rows,
                    required_cols: cols,
                    nrows,
                    ncols,
                });
            }
            Ok(GridShape {
                nrows: rows,
                ncols: cols,
            })
        }
        [size] => {
            let insufficient = |nrows: usize, ncols: usize| Error::InsufficientGrid {
                nrows,
                ncols,
                required: size,
            };
            let nrows = match (nrows, ncols) {
                (Some(r), _) => r,
                (None, None) => floor_sqrt(size).max(1),
                (None, Some(0)) => return Err(insufficient(0, 0)),
                (None, Some(c)) => size.div_ceil(c),
            };
            let ncols = match ncols {
                Some(c) => c,
                None if nrows == 0 => return Err(insufficient(0, 0)),
                None => size.div_ceil(nrows),
            };
            let cells = nrows
                .checked_mul(ncols)
                .ok_or(Error::GridTooLarge { nrows, ncols })?;
            if cells < size {
                return Err(insufficient(nrows, ncols));
            }
            let shape = GridShape { nrows, ncols };
            tracing::debug!(facets = size, nrows, ncols, "resolved grid shape");
            Ok(shape)
        }
        _ => Err(Error::UnsupportedKeyCount(distinct.len())),
    }
}

/// Largest `r` with `r * r <= n`.
fn floor_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(distinct: &[usize], nrows: Option<usize>, ncols: Option<usize>) -> (usize, usize) {
        let s = resolve_grid_shape(distinct, nrows, ncols).unwrap();
        (s.nrows, s.ncols)
    }

    #[test]
    fn test_one_key_defaults() {
        assert_eq!(shape(&[2], None, None), (1, 2));
        assert_eq!(shape(&[3], None, None), (1, 3));
        assert_eq!(shape(&[4], None, None), (2, 2));
        assert_eq!(shape(&[5], None, None), (2, 3));
        assert_eq!(shape(&[1], None, None), (1, 1));
    }

    #[test]
    fn test_one_key_single_dimension() {
        assert_eq!(shape(&[5], None, Some(1)), (5, 1));
        assert_eq!(shape(&[2], None, Some(1)), (2, 1));
        assert_eq!(shape(&[3], None, Some(2)), (2, 2));
        assert_eq!(shape(&[7], Some(2), None), (2, 4));
    }

    #[test]
    fn test_one_key_capacity() {
        let err = resolve_grid_shape(&[5], Some(1), Some(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientGrid {
                nrows: 1,
                ncols: 1,
                required: 5
            }
        ));
        assert_eq!(err.deficit(), Some(4));
        assert!(resolve_grid_shape(&[3], Some(0), Some(0)).is_err());
        assert!(resolve_grid_shape(&[3], Some(0), Some(1)).is_err());
        assert!(resolve_grid_shape(&[3], Some(0), None).is_err());
        assert!(resolve_grid_shape(&[3], None, Some(0)).is_err());
        assert_eq!(shape(&[3], Some(2), Some(2)), (2, 2));
    }

    #[test]
    fn test_one_key_overflowing_dimensions() {
        assert!(matches!(
            resolve_grid_shape(&[5], Some(usize::MAX), Some(2)),
            Err(Error::GridTooLarge {
                nrows: usize::MAX,
                ncols: 2
            })
        ));
        assert!(matches!(
            resolve_grid_shape(&[5], Some(2), Some(usize::MAX)),
            Err(Error::GridTooLarge { .. })
        ));
        // One huge dimension alone still resolves.
        assert_eq!(shape(&[5], Some(usize::MAX), None), (usize::MAX, 1));
    }

    #[test]
    fn test_two_keys_fixed() {
        assert_eq!(shape(&[2, 3], None, None), (2, 3));
        assert_eq!(shape(&[3, 2], None, None), (3, 2));
        assert_eq!(shape(&[3, 2], Some(3), None), (3, 2));
        assert_eq!(shape(&[3, 2], Some(3), Some(2)), (3, 2));
    }

    #[test]
    fn test_two_keys_conflict() {
        for (r, c) in [(3, 1), (3, 3), (2, 2), (4, 2)] {
            let err = resolve_grid_shape(&[3, 2], Some(r), Some(c)).unwrap_err();
            assert!(matches!(
                err,
                Error::ConfigurationConflict {
                    required_rows: 3,
                    required_cols: 2,
                    ..
                }
            ));
        }
        assert!(resolve_grid_shape(&[3, 2], None, Some(3)).is_err());
    }

    #[test]
    fn test_key_count() {
        assert!(matches!(
            resolve_grid_shape(&[2, 2, 2], None, None),
            Err(Error::UnsupportedKeyCount(3))
        ));
        assert!(matches!(
            resolve_grid_shape(&[0], None, None),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_facet_count() {
        assert_eq!(check_facet_count(&[50], MAX_FACETS).unwrap(), 50);
        assert!(matches!(
            check_facet_count(&[51], MAX_FACETS),
            Err(Error::TooManyFacets {
                count: 51,
                limit: 50
            })
        ));
        assert!(matches!(
            check_facet_count(&[5, 11], MAX_FACETS),
            Err(Error::TooManyFacets { count: 55, .. })
        ));
        assert!(matches!(check_facet_count(&[0], MAX_FACETS), Err(Error::EmptyInput(_))));
        assert!(matches!(check_facet_count(&[], MAX_FACETS), Err(Error::EmptyInput(_))));
        assert!(matches!(
            check_facet_count(&[usize::MAX, 3], MAX_FACETS),
            Err(Error::TooManyFacets { count: usize::MAX, .. })
        ));
    }

    #[test]
    fn test_floor_sqrt() {
        assert_eq!(floor_sqrt(0), 0);
        assert_eq!(floor_sqrt(5), 2);
        assert_eq!(floor_sqrt(9), 3);
        assert_eq!(floor_sqrt(50), 7);
    }
}
