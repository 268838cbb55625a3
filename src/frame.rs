//! Labeled columnar data.
//!
//! A minimal data frame whose named columns are turned into plain key and
//! data arrays before faceting.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::array::NdArray;
use crate::error::{Error, Result};

/// A value in a data frame.
///
/// Values are totally ordered so they can serve as facet keys: numbers
/// (by IEEE total order) sort before text, and missing values sort last.
#[derive(Debug, Clone)]
pub enum DataValue {
    /// A numeric value.
    Number(f32),
    /// A text value.
    Text(String),
    /// A missing value.
    Null,
}

impl DataValue {
    /// Get as f32, or None if not a number.
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            DataValue::Number(_) => 0,
            DataValue::Text(_) => 1,
            DataValue::Null => 2,
        }
    }
}

impl Ord for DataValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DataValue::Number(a), DataValue::Number(b)) => a.total_cmp(b),
            (DataValue::Text(a), DataValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for DataValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DataValue {}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Number(n) => write!(f, "{n}"),
            DataValue::Text(s) => f.write_str(s),
            DataValue::Null => f.write_str("NA"),
        }
    }
}

impl From<f32> for DataValue {
    fn from(v: f32) -> Self {
        DataValue::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

/// A simple columnar data frame.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    /// Column data keyed by column name.
    columns: HashMap<String, Vec<DataValue>>,
    /// Number of rows.
    n_rows: usize,
}

impl DataFrame {
    /// Create a new empty data frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column of arbitrary values.
    pub fn add_column(&mut self, name: &str, values: Vec<DataValue>) {
        self.n_rows = self.n_rows.max(values.len());
        self.columns.insert(name.to_string(), values);
    }

    /// Add a numeric column.
    pub fn add_column_f32(&mut self, name: &str, data: &[f32]) {
        self.add_column(name, data.iter().map(|&v| DataValue::Number(v)).collect());
    }

    /// Add a text column.
    pub fn add_column_str(&mut self, name: &str, data: &[&str]) {
        self.add_column(name, data.iter().map(|&s| DataValue::from(s)).collect());
    }

    /// Builder form of [`DataFrame::add_column_f32`].
    #[must_use]
    pub fn with_f32(mut self, name: &str, data: &[f32]) -> Self {
        self.add_column_f32(name, data);
        self
    }

    /// Builder form of [`DataFrame::add_column_str`].
    #[must_use]
    pub fn with_str(mut self, name: &str, data: &[&str]) -> Self {
        self.add_column_str(name, data);
        self
    }

    /// Get a column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[DataValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// A column as a one-dimensional array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] if no column has that name.
    pub fn column_array(&self, name: &str) -> Result<NdArray<DataValue>> {
        self.get(name)
            .map(|col| NdArray::from_vec(col.to_vec()))
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Get number of rows.
    #[must_use]
    pub fn nrow(&self) -> usize {
        self.n_rows
    }

    /// Get column names, sorted.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_value_ordering() {
        let mut values = vec![
            DataValue::Null,
            DataValue::from("b"),
            DataValue::Number(2.0),
            DataValue::from("a"),
            DataValue::Number(-1.0),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                DataValue::Number(-1.0),
                DataValue::Number(2.0),
                DataValue::from("a"),
                DataValue::from("b"),
                DataValue::Null,
            ]
        );
    }

    #[test]
    fn test_data_value_nan_is_a_single_key() {
        assert_eq!(DataValue::Number(f32::NAN), DataValue::Number(f32::NAN));
        assert!(DataValue::Number(f32::INFINITY) < DataValue::Number(f32::NAN));
    }

    #[test]
    fn test_data_value_display() {
        assert_eq!(DataValue::Number(3.0).to_string(), "3");
        assert_eq!(DataValue::Number(0.5).to_string(), "0.5");
        assert_eq!(DataValue::from("cat").to_string(), "cat");
        assert_eq!(DataValue::Null.to_string(), "NA");
    }

    #[test]
    fn test_data_value_conversions() {
        let num: DataValue = 42.0f32.into();
        assert_eq!(num.as_f32(), Some(42.0));
        assert_eq!(num.as_str(), None);

        let text: DataValue = String::from("hello").into();
        assert_eq!(text.as_str(), Some("hello"));
        assert_eq!(text.as_f32(), None);
    }

    #[test]
    fn test_dataframe_columns() {
        let df = DataFrame::new()
            .with_f32("x", &[1.0, 2.0, 3.0])
            .with_str("group", &["a", "b", "a"]);
        assert_eq!(df.nrow(), 3);
        assert_eq!(df.columns(), vec!["group", "x"]);
        assert_eq!(df.get("x").unwrap()[2], DataValue::Number(3.0));
        assert_eq!(df.get("group").unwrap()[1].as_str(), Some("b"));
    }

    #[test]
    fn test_column_array() {
        let df = DataFrame::new().with_str("group", &["a", "b"]);
        let arr = df.column_array("group").unwrap();
        assert_eq!(arr.shape(), &[2]);
        assert!(matches!(df.column_array("nope"), Err(Error::MissingColumn(name)) if name == "nope"));
    }

    #[test]
    fn test_dataframe_empty() {
        let df = DataFrame::default();
        assert_eq!(df.nrow(), 0);
        assert!(df.columns().is_empty());
        assert!(df.get("anything").is_none());
    }
}
