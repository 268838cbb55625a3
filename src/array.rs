//! N-dimensional arrays and position sets.
//!
//! Storage is row-major, so flat index `i` of an array with shape
//! `[d0, d1, ..., dn]` has its last coordinate varying fastest.

use crate::error::{Error, Result};

/// A row-major N-dimensional array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdArray<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> NdArray<T> {
    /// Create a one-dimensional array.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Create an array with an explicit shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the shape does not describe exactly
    /// `data.len()` elements.
    pub fn from_shape_vec(shape: Vec<usize>, data: Vec<T>) -> Result<Self> {
        let size: usize = shape.iter().product();
        if size != data.len() {
            return Err(Error::ShapeMismatch {
                expected: shape,
                found: vec![data.len()],
            });
        }
        Ok(Self { shape, data })
    }

    /// Array shape.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total element count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flattened view in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Element at a multi-dimensional index.
    #[must_use]
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            flat = flat * dim + i;
        }
        self.data.get(flat)
    }
}

impl<T: Clone> NdArray<T> {
    /// Elements at the given positions, in position order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the positions address a different
    /// number of dimensions than this array has.
    pub fn take(&self, positions: &Positions) -> Result<Vec<T>> {
        if positions.ndim() != self.ndim() {
            return Err(Error::ShapeMismatch {
                expected: self.shape.clone(),
                found: vec![positions.ndim()],
            });
        }
        (0..positions.len())
            .map(|i| {
                let coords = positions.coords(i);
                self.get(&coords).cloned().ok_or_else(|| Error::ShapeMismatch {
                    expected: self.shape.clone(),
                    found: coords,
                })
            })
            .collect()
    }
}

impl<T> From<Vec<T>> for NdArray<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

/// A set of positions stored as one coordinate vector per dimension.
///
/// `coords[d][i]` is the `d`-th coordinate of the `i`-th position, so the
/// set can subscript any array of the shape it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Positions {
    coords: Vec<Vec<usize>>,
    len: usize,
}

impl Positions {
    /// Build from flat row-major indices.
    #[must_use]
    pub fn from_flat(flat: &[usize], shape: &[usize]) -> Self {
        let mut coords = vec![Vec::with_capacity(flat.len()); shape.len()];
        for &f in flat {
            for (d, c) in unravel_index(f, shape).into_iter().enumerate() {
                coords[d].push(c);
            }
        }
        Self {
            coords,
            len: flat.len(),
        }
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the set holds no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of dimensions addressed.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.coords.len()
    }

    /// Coordinate vector for one dimension.
    #[must_use]
    pub fn axis(&self, dim: usize) -> Option<&[usize]> {
        self.coords.get(dim).map(Vec::as_slice)
    }

    /// Multi-dimensional index of the `i`-th position.
    #[must_use]
    pub fn coords(&self, i: usize) -> Vec<usize> {
        self.coords.iter().map(|axis| axis[i]).collect()
    }

    /// Row-major flat indices for the given shape.
    #[must_use]
    pub fn flat_indices(&self, shape: &[usize]) -> Vec<usize> {
        (0..self.len())
            .map(|i| {
                self.coords
                    .iter()
                    .zip(shape)
                    .fold(0, |flat, (axis, &dim)| flat * dim + axis[i])
            })
            .collect()
    }
}

/// Convert a row-major flat index into coordinates for `shape`.
#[must_use]
pub fn unravel_index(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut coords = vec![0; shape.len()];
    for (d, &dim) in shape.iter().enumerate().rev() {
        if dim == 0 {
            continue;
        }
        coords[d] = flat % dim;
        flat /= dim;
    }
    coords
}
