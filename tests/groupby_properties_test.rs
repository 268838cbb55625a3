//! Property tests for composite-key grouping and grid sizing.
//!
//! Each property is checked over randomly generated key arrays of random
//! shape.
#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use trueno_facet::array::NdArray;
use trueno_facet::groupby::group_by;
use trueno_facet::layout::{check_facet_count, resolve_grid_shape, MAX_FACETS};
use trueno_facet::Error;

/// Shapes with up to three dimensions and at most 64 elements.
fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..5, 1..=3)
}

/// Two arrays of one shape with a few distinct values each.
fn key_pair_strategy() -> impl Strategy<Value = (NdArray<u8>, NdArray<u8>)> {
    shape_strategy().prop_flat_map(|shape| {
        let n: usize = shape.iter().product();
        (
            prop::collection::vec(0u8..4, n),
            prop::collection::vec(0u8..3, n),
        )
            .prop_map(move |(a, b)| {
                (
                    NdArray::from_shape_vec(shape.clone(), a).unwrap(),
                    NdArray::from_shape_vec(shape.clone(), b).unwrap(),
                )
            })
    })
}

proptest! {
    /// Every position lands in exactly one group.
    #[test]
    fn prop_groups_partition_positions((a, b) in key_pair_strategy()) {
        let mut seen = BTreeSet::new();
        for group in group_by(&[&a, &b]).unwrap() {
            prop_assert!(!group.positions.is_empty());
            for flat in group.positions.flat_indices(a.shape()) {
                prop_assert!(seen.insert(flat), "position {} in two groups", flat);
            }
        }
        prop_assert_eq!(seen.len(), a.len());
    }

    /// Indexing any grouped array at a group's positions yields its key.
    #[test]
    fn prop_group_keys_match_values((a, b) in key_pair_strategy()) {
        for group in group_by(&[&a, &b]).unwrap() {
            for (arr, key) in [&a, &b].iter().zip(&group.key) {
                let values = arr.take(&group.positions).unwrap();
                prop_assert!(values.iter().all(|v| v == key));
            }
        }
    }

    /// Keys are strictly ascending.
    #[test]
    fn prop_group_keys_ascending((a, b) in key_pair_strategy()) {
        let keys: Vec<Vec<u8>> = group_by(&[&a, &b]).unwrap().map(|g| g.key).collect();
        for pair in keys.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    /// Grouping is deterministic.
    #[test]
    fn prop_grouping_idempotent((a, b) in key_pair_strategy()) {
        let first: Vec<_> = group_by(&[&a, &b]).unwrap().collect();
        let second: Vec<_> = group_by(&[&a, &b]).unwrap().collect();
        prop_assert_eq!(first, second);
    }

    /// A single key never produces more groups than distinct values.
    #[test]
    fn prop_single_key_group_count(values in prop::collection::vec(0i32..20, 1..200)) {
        let distinct: BTreeSet<_> = values.iter().copied().collect();
        let key = NdArray::from_vec(values);
        prop_assert_eq!(group_by(&[&key]).unwrap().len(), distinct.len());
    }

    /// Derived one-key grids always fit every facet.
    #[test]
    fn prop_one_key_grid_fits(n in 1usize..=MAX_FACETS, ncols in prop::option::of(1usize..8)) {
        let shape = resolve_grid_shape(&[n], None, ncols).unwrap();
        prop_assert!(shape.cells() >= n);
        if let Some(c) = ncols {
            prop_assert_eq!(shape.ncols, c);
        }
    }

    /// Two-key grids are fixed by the distinct counts.
    #[test]
    fn prop_two_key_grid_fixed(r in 1usize..8, c in 1usize..8) {
        let shape = resolve_grid_shape(&[r, c], None, None).unwrap();
        prop_assert_eq!((shape.nrows, shape.ncols), (r, c));
        let conflict = resolve_grid_shape(&[r, c], Some(r + 1), None);
        let is_conflict = matches!(conflict, Err(Error::ConfigurationConflict { .. }));
        prop_assert!(is_conflict);
    }
}

#[test]
fn grid_sizing_examples() {
    let shape = resolve_grid_shape(&[5], None, None).unwrap();
    assert_eq!((shape.nrows, shape.ncols), (2, 3));
    let shape = resolve_grid_shape(&[5], None, Some(1)).unwrap();
    assert_eq!((shape.nrows, shape.ncols), (5, 1));
    assert!(matches!(
        resolve_grid_shape(&[5], Some(1), Some(1)),
        Err(Error::InsufficientGrid { .. })
    ));
}

#[test]
fn facet_count_limits() {
    assert!(matches!(
        check_facet_count(&[51], MAX_FACETS),
        Err(Error::TooManyFacets { count: 51, limit: 50 })
    ));
    assert!(matches!(check_facet_count(&[0], MAX_FACETS), Err(Error::EmptyInput(_))));
}

#[test]
fn large_three_dimensional_grouping() {
    let shape = vec![10, 10, 10];
    let a: Vec<u8> = (0..1000u32).map(|i| ((i * 7 + 3) % 3) as u8).collect();
    let b: Vec<u8> = (0..1000u32).map(|i| ((i * 13) / 11 % 3) as u8).collect();
    let a = NdArray::from_shape_vec(shape.clone(), a).unwrap();
    let b = NdArray::from_shape_vec(shape, b).unwrap();

    let total: usize = group_by(&[&a, &b]).unwrap().map(|g| g.positions.len()).sum();
    assert_eq!(total, 1000);
    assert!(group_by(&[&a, &b]).unwrap().len() <= 9);
}
