//! Facet options.
//!
//! With the `config` feature, options can be read from YAML:
//!
//! ```yaml
//! ncols: 3
//! sharex: col
//! sharey: false
//! max_facets: 24
//! xlabel: time (s)
//! ```
//!
//! Sharing modes accept a mode name or a bool (`true` = `all`,
//! `false` = `none`).

use crate::grid::ShareMode;
use crate::layout::MAX_FACETS;

#[cfg(feature = "serde")]
use crate::error::{Error, Result};
#[cfg(feature = "serde")]
use crate::grid::ShareSetting;
#[cfg(feature = "config")]
use std::path::Path;

/// Layout and labeling options for a [`Facet`](crate::facet::Facet).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawOptions"))]
pub struct FacetOptions {
    /// Explicit grid rows.
    pub nrows: Option<usize>,

    /// Explicit grid columns.
    pub ncols: Option<usize>,

    /// X axis sharing.
    pub sharex: ShareMode,

    /// Y axis sharing.
    pub sharey: ShareMode,

    /// Upper bound on the number of facets.
    pub max_facets: usize,

    /// Figure-level x axis label.
    pub xlabel: Option<String>,

    /// Figure-level y axis label.
    pub ylabel: Option<String>,
}

/// Options as written in a file, before sharing modes are validated.
#[cfg(feature = "serde")]
#[derive(Debug, serde::Deserialize)]
struct RawOptions {
    #[serde(default)]
    nrows: Option<usize>,
    #[serde(default)]
    ncols: Option<usize>,
    #[serde(default)]
    sharex: Option<ShareSetting>,
    #[serde(default)]
    sharey: Option<ShareSetting>,
    #[serde(default = "default_max_facets")]
    max_facets: usize,
    #[serde(default)]
    xlabel: Option<String>,
    #[serde(default)]
    ylabel: Option<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawOptions> for FacetOptions {
    type Error = Error;

    fn try_from(raw: RawOptions) -> Result<Self> {
        let share = |setting: Option<ShareSetting>, option| {
            setting.map_or(Ok(default_share()), |s| s.resolve(option))
        };
        Ok(Self {
            nrows: raw.nrows,
            ncols: raw.ncols,
            sharex: share(raw.sharex, "sharex")?,
            sharey: share(raw.sharey, "sharey")?,
            max_facets: raw.max_facets,
            xlabel: raw.xlabel,
            ylabel: raw.ylabel,
        })
    }
}

fn default_share() -> ShareMode {
    ShareMode::All
}
fn default_max_facets() -> usize {
    MAX_FACETS
}

impl Default for FacetOptions {
    fn default() -> Self {
        Self {
            nrows: None,
            ncols: None,
            sharex: default_share(),
            sharey: default_share(),
            max_facets: default_max_facets(),
            xlabel: None,
            ylabel: None,
        }
    }
}

impl FacetOptions {
    /// Default options: both axes shared across all panels, 50 facets max.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid rows.
    #[must_use]
    pub fn nrows(mut self, nrows: usize) -> Self {
        self.nrows = Some(nrows);
        self
    }

    /// Set the grid columns.
    #[must_use]
    pub fn ncols(mut self, ncols: usize) -> Self {
        self.ncols = Some(ncols);
        self
    }

    /// Set x sharing.
    #[must_use]
    pub fn sharex(mut self, mode: impl Into<ShareMode>) -> Self {
        self.sharex = mode.into();
        self
    }

    /// Set y sharing.
    #[must_use]
    pub fn sharey(mut self, mode: impl Into<ShareMode>) -> Self {
        self.sharey = mode.into();
        self
    }

    /// Set the facet cap.
    #[must_use]
    pub fn max_facets(mut self, limit: usize) -> Self {
        self.max_facets = limit;
        self
    }

    /// Set the figure x label.
    #[must_use]
    pub fn xlabel(mut self, label: &str) -> Self {
        self.xlabel = Some(label.to_string());
        self
    }

    /// Set the figure y label.
    #[must_use]
    pub fn ylabel(mut self, label: &str) -> Self {
        self.ylabel = Some(label.to_string());
        self
    }
}

#[cfg(feature = "config")]
impl FacetOptions {
    /// Loads options from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses options from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with the offending line if the YAML is
    /// malformed, or [`Error::InvalidOption`] for an unknown sharing mode.
    pub fn parse(yaml: &str) -> Result<Self> {
        let raw: RawOptions = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::Config(format!("line {line}: {e}"))
        })?;
        Self::try_from(raw)
    }
}
