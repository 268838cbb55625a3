//! Shared-axis panel grids.
//!
//! Builds a `nrows x ncols` table of panels through a [`PanelFactory`],
//! wiring axis sharing between panels and hiding tick labels that a shared
//! neighbour already shows. Panels are created strictly row-major, each one
//! fully wired before the next, since later panels reference earlier ones.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Accepted spellings of [`ShareMode`].
pub const SHARE_VALUES: &[&str] = &["all", "row", "col", "none"];

/// Axis-sharing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShareMode {
    /// Every panel shares with the first panel.
    All,
    /// Panels share with the first panel of their row.
    Row,
    /// Panels share with the first panel of their column.
    Col,
    /// Independent axes.
    #[default]
    None,
}

impl ShareMode {
    /// Parse a sharing mode for the named option.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] if `value` is not one of
    /// [`SHARE_VALUES`].
    pub fn parse(option: &'static str, value: &str) -> Result<Self> {
        match value {
            "all" => Ok(ShareMode::All),
            "row" => Ok(ShareMode::Row),
            "col" => Ok(ShareMode::Col),
            "none" => Ok(ShareMode::None),
            _ => Err(Error::InvalidOption {
                option,
                value: value.to_string(),
                allowed: SHARE_VALUES,
            }),
        }
    }

    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ShareMode::All => "all",
            ShareMode::Row => "row",
            ShareMode::Col => "col",
            ShareMode::None => "none",
        }
    }

    /// Index of the panel that panel `index` shares with.
    fn target(self, index: usize, ncols: usize) -> usize {
        match self {
            ShareMode::None => index,
            ShareMode::All => 0,
            ShareMode::Row => (index / ncols) * ncols,
            ShareMode::Col => index % ncols,
        }
    }
}

impl FromStr for ShareMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse("share", s)
    }
}

impl From<bool> for ShareMode {
    fn from(shared: bool) -> Self {
        if shared {
            ShareMode::All
        } else {
            ShareMode::None
        }
    }
}

/// A sharing mode as written in configuration: a mode name or a bool.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub(crate) enum ShareSetting {
    Flag(bool),
    Name(String),
}

#[cfg(feature = "serde")]
impl ShareSetting {
    /// Resolve through [`ShareMode::parse`] so bad names report `option`.
    pub(crate) fn resolve(self, option: &'static str) -> Result<ShareMode> {
        match self {
            ShareSetting::Flag(shared) => Ok(ShareMode::from(shared)),
            ShareSetting::Name(name) => ShareMode::parse(option, &name),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ShareMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <ShareSetting as serde::Deserialize>::deserialize(deserializer)?
            .resolve("share")
            .map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ShareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A panel axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

/// Everything a backend needs to create one panel.
#[derive(Debug)]
pub struct PanelSpec<'a, P> {
    /// Grid rows.
    pub nrows: usize,
    /// Grid columns.
    pub ncols: usize,
    /// Row-major cell index (zero-based).
    pub index: usize,
    /// Panel to share the x extent with, if any.
    pub sharex: Option<&'a P>,
    /// Panel to share the y extent with, if any.
    pub sharey: Option<&'a P>,
}

impl<P> PanelSpec<'_, P> {
    /// Zero-based grid row.
    #[must_use]
    pub fn row(&self) -> usize {
        self.index / self.ncols
    }

    /// Zero-based grid column.
    #[must_use]
    pub fn col(&self) -> usize {
        self.index % self.ncols
    }
}

/// Plotting backend operations needed to build a grid.
pub trait PanelFactory {
    /// Opaque panel handle owned by the backend.
    type Panel: Clone;

    /// Create the panel described by `spec`.
    ///
    /// # Errors
    ///
    /// Backend specific.
    fn add_panel(&mut self, spec: PanelSpec<'_, Self::Panel>) -> Result<Self::Panel>;

    /// Show or hide the tick labels of one axis.
    ///
    /// # Errors
    ///
    /// Backend specific.
    fn set_tick_labels_visible(
        &mut self,
        panel: &Self::Panel,
        axis: Axis,
        visible: bool,
    ) -> Result<()>;
}

/// Grid request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    /// Grid rows.
    pub nrows: usize,
    /// Grid columns.
    pub ncols: usize,
    /// Panels to create, row-major from the top left. `None` fills the grid.
    pub num: Option<usize>,
    /// X sharing policy.
    pub sharex: ShareMode,
    /// Y sharing policy.
    pub sharey: ShareMode,
}

impl GridSpec {
    /// Full grid with independent axes.
    #[must_use]
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            num: None,
            sharex: ShareMode::None,
            sharey: ShareMode::None,
        }
    }

    /// Create only the first `num` panels.
    #[must_use]
    pub fn num(mut self, num: usize) -> Self {
        self.num = Some(num);
        self
    }

    /// Set the x sharing policy.
    #[must_use]
    pub fn sharex(mut self, mode: ShareMode) -> Self {
        self.sharex = mode;
        self
    }

    /// Set the y sharing policy.
    #[must_use]
    pub fn sharey(mut self, mode: ShareMode) -> Self {
        self.sharey = mode;
        self
    }

    fn panel_count(&self) -> Result<usize> {
        let cells = self
            .nrows
            .checked_mul(self.ncols)
            .ok_or(Error::GridTooLarge {
                nrows: self.nrows,
                ncols: self.ncols,
            })?;
        if self.num == Some(0) {
            return Err(Error::EmptyInput("no panels requested"));
        }
        let num = self.num.unwrap_or(cells);
        if cells == 0 || num > cells {
            return Err(Error::InsufficientGrid {
                nrows: self.nrows,
                ncols: self.ncols,
                required: num.max(1),
            });
        }
        Ok(num)
    }
}

/// A `nrows x ncols` table of panels.
///
/// Panels fill cells row-major from the top left; cells past the requested
/// count are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelGrid<P> {
    nrows: usize,
    ncols: usize,
    panels: Vec<P>,
}

/// A grid collapsed to its natural dimensionality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Squeezed<P> {
    /// A 1x1 grid.
    Single(P),
    /// An Nx1 or 1xN grid, panels in order along the line.
    Line(Vec<P>),
    /// Anything larger.
    Table(PanelGrid<P>),
}

impl<P> PanelGrid<P> {
    /// Grid rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Grid columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Panel at `(row, col)`, if one was created there.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&P> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        self.panels.get(row * self.ncols + col)
    }

    /// Every cell in row-major order, `None` where no panel was created.
    pub fn cells(&self) -> impl Iterator<Item = Option<&P>> + '_ {
        (0..self.nrows * self.ncols).map(|index| self.panels.get(index))
    }

    /// Created panels in row-major order.
    pub fn panels(&self) -> impl Iterator<Item = &P> {
        self.panels.iter()
    }

    /// Collapse unit dimensions.
    #[must_use]
    pub fn squeeze(self) -> Squeezed<P> {
        if self.nrows == 1 && self.ncols == 1 {
            match self.panels.into_iter().next() {
                Some(panel) => Squeezed::Single(panel),
                None => Squeezed::Line(Vec::new()),
            }
        } else if self.nrows == 1 || self.ncols == 1 {
            Squeezed::Line(self.panels)
        } else {
            Squeezed::Table(self)
        }
    }
}

/// Build a grid of panels.
///
/// Panel `(0, 0)` is created independently. Every later panel shares its
/// x/y extent with the panel its [`ShareMode`] selects, unless that is the
/// panel itself. Once all panels exist, x tick labels are hidden on panels
/// with a panel directly below them (`col`/`all` x sharing) and y tick labels
/// on panels outside column 0 (`row`/`all` y sharing).
///
/// # Errors
///
/// Returns [`Error::InsufficientGrid`], [`Error::GridTooLarge`] or
/// [`Error::EmptyInput`] for an impossible request, before any panel is
/// created. Backend errors are propagated.
pub fn build_grid<F: PanelFactory>(factory: &mut F, spec: GridSpec) -> Result<PanelGrid<F::Panel>> {
    let num = spec.panel_count()?;
    let GridSpec {
        nrows,
        ncols,
        sharex,
        sharey,
        ..
    } = spec;

    tracing::debug!(nrows, ncols, num, %sharex, %sharey, "building panel grid");

    let mut panels: Vec<F::Panel> = Vec::with_capacity(num);
    for index in 0..num {
        let x_target = sharex.target(index, ncols);
        let y_target = sharey.target(index, ncols);
        let panel = {
            let share = |target: usize| {
                if target == index {
                    None
                } else {
                    panels.get(target)
                }
            };
            factory.add_panel(PanelSpec {
                nrows,
                ncols,
                index,
                sharex: share(x_target),
                sharey: share(y_target),
            })?
        };
        tracing::trace!(index, x_target, y_target, "panel created");
        panels.push(panel);
    }

    let grid = PanelGrid {
        nrows,
        ncols,
        panels,
    };

    for (index, panel) in grid.panels.iter().enumerate() {
        let (row, col) = (index / ncols, index % ncols);
        let panel_below = grid.get(row + 1, col).is_some();
        if matches!(sharex, ShareMode::Col | ShareMode::All) && panel_below {
            factory.set_tick_labels_visible(panel, Axis::X, false)?;
        }
        if matches!(sharey, ShareMode::Row | ShareMode::All) && col > 0 {
            factory.set_tick_labels_visible(panel, Axis::Y, false)?;
        }
    }

    Ok(grid)
}
