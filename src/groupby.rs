//! Composite-key grouping.
//!
//! Partitions the positions of one or more equally-shaped arrays into groups
//! whose elements agree across every array. The partition is computed with a
//! single stable multi-key sort followed by a boundary scan, so no per-key
//! hash table is built and the total cost is O(n log n).
//!
//! # Example
//!
//! ```rust
//! use trueno_facet::array::NdArray;
//! use trueno_facet::groupby::group_by;
//!
//! let key = NdArray::from_vec(vec![1, 1, 2, 1, 3]);
//! let groups: Vec<_> = group_by(&[&key]).unwrap().collect();
//!
//! assert_eq!(groups[0].key, vec![1]);
//! assert_eq!(groups[0].positions.axis(0), Some(&[0, 1, 3][..]));
//! assert_eq!(groups.len(), 3);
//! ```

use std::cmp::Ordering;
use std::ops::Range;

use crate::array::{NdArray, Positions};
use crate::error::{Error, Result};

/// One group: a composite key and every position holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<T> {
    /// One value per input array, in declared array order.
    pub key: Vec<T>,
    /// Positions where every array equals its key component.
    pub positions: Positions,
}

/// Lazy iterator over groups in strictly ascending key order.
#[derive(Debug)]
pub struct GroupBy<'a, T> {
    arrays: Vec<&'a [T]>,
    shape: Vec<usize>,
    order: Vec<usize>,
    runs: std::vec::IntoIter<Range<usize>>,
}

/// Group the positions of `arrays` by their composite value.
///
/// Groups are yielded in ascending lexicographic order of the key tuple, the
/// first array being the most significant. Positions within a group are
/// ascending in row-major order.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if no arrays are given and
/// [`Error::ShapeMismatch`] if the arrays differ in shape.
pub fn group_by<'a, T: Ord + Clone>(arrays: &[&'a NdArray<T>]) -> Result<GroupBy<'a, T>> {
    let first = arrays.first().ok_or(Error::EmptyInput("no arrays to group"))?;
    let shape = first.shape().to_vec();
    for arr in &arrays[1..] {
        if arr.shape() != shape.as_slice() {
            return Err(Error::ShapeMismatch {
                expected: shape,
                found: arr.shape().to_vec(),
            });
        }
    }

    let flat: Vec<&'a [T]> = arrays.iter().map(|&a| a.as_slice()).collect();
    let mut order: Vec<usize> = (0..first.len()).collect();
    order.sort_by(|&a, &b| compare_at(&flat, a, b));

    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..order.len() {
        if compare_at(&flat, order[i - 1], order[i]) != Ordering::Equal {
            runs.push(start..i);
            start = i;
        }
    }
    if !order.is_empty() {
        runs.push(start..order.len());
    }

    tracing::debug!(
        arrays = flat.len(),
        elements = order.len(),
        groups = runs.len(),
        "grouped by composite key"
    );

    Ok(GroupBy {
        arrays: flat,
        shape,
        order,
        runs: runs.into_iter(),
    })
}

/// Lexicographic comparison of two flat positions across all arrays.
fn compare_at<T: Ord>(arrays: &[&[T]], a: usize, b: usize) -> Ordering {
    arrays
        .iter()
        .map(|arr| arr[a].cmp(&arr[b]))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl<T: Clone> Iterator for GroupBy<'_, T> {
    type Item = Group<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let run = self.runs.next()?;
        let members = &self.order[run];
        let head = members[0];
        let key = self.arrays.iter().map(|arr| arr[head].clone()).collect();

        // The stable sort leaves equal keys in input order.
        Some(Group {
            key,
            positions: Positions::from_flat(members, &self.shape),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.runs.size_hint()
    }
}

impl<T: Clone> ExactSizeIterator for GroupBy<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_groupby<T: Ord + Clone + std::fmt::Debug>(arrays: &[&NdArray<T>]) {
        let mut count = 0;
        let mut last: Option<Vec<T>> = None;
        for group in group_by(arrays).unwrap() {
            if let Some(prev) = &last {
                assert!(group.key > *prev, "keys not ascending: {prev:?} then {:?}", group.key);
            }
            assert!(!group.positions.is_empty());
            count += group.positions.len();
            for (arr, k) in arrays.iter().zip(&group.key) {
                assert!(arr.take(&group.positions).unwrap().iter().all(|v| v == k));
            }
            last = Some(group.key);
        }
        assert_eq!(count, arrays[0].len());
    }

    #[test]
    fn test_example_single_key() {
        let key = NdArray::from_vec(vec![1, 1, 2, 1, 3]);
        let groups: Vec<_> = group_by(&[&key]).unwrap().collect();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].key, vec![1]);
        assert_eq!(groups[0].positions.axis(0), Some(&[0, 1, 3][..]));
        assert_eq!(groups[1].key, vec![2]);
        assert_eq!(groups[1].positions.axis(0), Some(&[2][..]));
        assert_eq!(groups[2].key, vec![3]);
        assert_eq!(groups[2].positions.axis(0), Some(&[4][..]));
    }

    #[test]
    fn test_example_two_keys() {
        let k1 = NdArray::from_vec(vec![1, 1, 3]);
        let k2 = NdArray::from_vec(vec![1, 1, 1]);
        let groups: Vec<_> = group_by(&[&k1, &k2]).unwrap().collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, vec![1, 1]);
        assert_eq!(groups[0].positions.axis(0), Some(&[0, 1][..]));
        assert_eq!(groups[1].key, vec![3, 1]);
        assert_eq!(groups[1].positions.axis(0), Some(&[2][..]));
    }

    #[test]
    fn test_sorted_input() {
        check_groupby(&[&NdArray::from_vec(vec![1, 1, 2, 3, 4])]);
    }

    #[test]
    fn test_single_value() {
        let key = NdArray::from_vec(vec![1, 1, 1]);
        let groups: Vec<_> = group_by(&[&key]).unwrap().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].positions.len(), 3);
    }

    #[test]
    fn test_all_unique() {
        let key = NdArray::from_vec(vec![1, 2, 3]);
        assert_eq!(group_by(&[&key]).unwrap().len(), 3);
        check_groupby(&[&key]);
    }

    #[test]
    fn test_unsorted() {
        check_groupby(&[&NdArray::from_vec(vec![3, 1, 1, 8, 3])]);
    }

    #[test]
    fn test_two_dimensional() {
        let key = NdArray::from_shape_vec(vec![2, 2], vec![1, 2, 1, 1]).unwrap();
        let groups: Vec<_> = group_by(&[&key]).unwrap().collect();
        assert_eq!(groups[0].key, vec![1]);
        assert_eq!(groups[0].positions.axis(0), Some(&[0, 1, 1][..]));
        assert_eq!(groups[0].positions.axis(1), Some(&[0, 0, 1][..]));
        check_groupby(&[&key]);
    }

    #[test]
    fn test_three_arrays() {
        let a = NdArray::from_vec(vec![1, 1, 3, 1, 3]);
        let b = NdArray::from_vec(vec![1, 1, 1, 2, 3]);
        let c = NdArray::from_vec(vec![2, 1, 3, 3, 2]);
        check_groupby(&[&a, &b, &c]);
        assert_eq!(group_by(&[&a, &b, &c]).unwrap().len(), 5);
    }

    #[test]
    fn test_first_array_is_most_significant() {
        let a = NdArray::from_vec(vec![2, 1, 1]);
        let b = NdArray::from_vec(vec![0, 5, 3]);
        let keys: Vec<_> = group_by(&[&a, &b]).unwrap().map(|g| g.key).collect();
        assert_eq!(keys, vec![vec![1, 3], vec![1, 5], vec![2, 0]]);
    }

    #[test]
    fn test_strings() {
        let key = NdArray::from_vec(vec!["b", "a", "b"]);
        let keys: Vec<_> = group_by(&[&key]).unwrap().map(|g| g.key).collect();
        assert_eq!(keys, vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_empty_array_yields_no_groups() {
        let key: NdArray<i32> = NdArray::from_vec(Vec::new());
        assert_eq!(group_by(&[&key]).unwrap().count(), 0);
    }

    #[test]
    fn test_no_arrays() {
        let arrays: [&NdArray<i32>; 0] = [];
        assert!(matches!(group_by(&arrays), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = NdArray::from_vec(vec![1, 2, 3, 4]);
        let b = NdArray::from_vec(vec![1, 2, 3]);
        assert!(matches!(group_by(&[&a, &b]), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_idempotent() {
        let a = NdArray::from_vec(vec![4, 2, 4, 2, 9]);
        let first: Vec<_> = group_by(&[&a]).unwrap().collect();
        let second: Vec<_> = group_by(&[&a]).unwrap().collect();
        assert_eq!(first, second);
    }
}
