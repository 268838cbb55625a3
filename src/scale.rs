//! Data extents and linear scales for panel rendering.
//!
//! Panels that share an axis must agree on its extent, so extents are
//! computed per panel and then unioned across each sharing group.

use trueno::Vector;

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Closed data interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Extent {
    /// Interval spanning the finite values of `data`, if any.
    ///
    /// Uses trueno's SIMD reductions.
    #[must_use]
    pub fn from_data(data: &[f32]) -> Option<Self> {
        let finite: Vec<f32> = data.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let vec = Vector::from_vec(finite);
        let min = vec.min().unwrap_or(f32::INFINITY);
        let max = vec.max().unwrap_or(f32::NEG_INFINITY);
        (min <= max).then_some(Self { min, max })
    }

    /// Smallest interval covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Union of two optional extents.
    #[must_use]
    pub fn merge(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// Widen by `fraction` of the span on each side; a zero-width
    /// interval is widened by 0.5 instead.
    #[must_use]
    pub fn padded(self, fraction: f32) -> Self {
        let span = self.max - self.min;
        let pad = if span > f32::EPSILON {
            span * fraction
        } else {
            0.5
        };
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a linear scale; a degenerate domain is widened first.
    #[must_use]
    pub fn new(domain: Extent, range: (f32, f32)) -> Self {
        let domain = if (domain.max - domain.min).abs() < f32::EPSILON {
            domain.padded(0.0)
        } else {
            domain
        };
        Self {
            domain_min: domain.min,
            domain_max: domain.max,
            range_min: range.0,
            range_max: range.1,
        }
    }

    /// Evenly spaced "nice" tick values inside the domain.
    ///
    /// Step sizes are 1, 2 or 5 times a power of ten, chosen so that
    /// roughly `count` ticks fit.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f32> {
        let (lo, hi) = (self.domain_min.min(self.domain_max), self.domain_min.max(self.domain_max));
        let span = hi - lo;
        if count == 0 || span <= 0.0 || !span.is_finite() {
            return Vec::new();
        }
        let raw = span / count as f32;
        let magnitude = 10f32.powf(raw.log10().floor());
        let step = [1.0, 2.0, 5.0, 10.0]
            .iter()
            .map(|m| m * magnitude)
            .find(|&s| s >= raw)
            .unwrap_or(10.0 * magnitude);

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f32 * step).collect()
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Format a tick value without trailing noise.
#[must_use]
pub fn format_tick(value: f32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let rounded = (value * 1e4).round() / 1e4;
    format!("{rounded}")
}
