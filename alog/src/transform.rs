//! Series transforms (modifiers) for plot-ready data.
//!
//! Transforms are pure functions from one `f64` series to another of the
//! same length. They can be passed straight to
//! [`SeriesStore::timed_plot_series`](crate::store::SeriesStore::timed_plot_series):
//!
//! ```rust
//! use alog::store::SeriesStore;
//! use alog::options::ParseOptions;
//! use alog::transform;
//!
//! # fn main() -> alog::Result<()> {
//! let log = "0.0 NAV_X pNav 0.0\n1.0 NAV_X pNav 2.0\n2.0 NAV_X pNav 5.0\n";
//! let store = SeriesStore::from_reader(log.as_bytes(), &ParseOptions::default())?;
//!
//! let speed = store.timed_plot_series("NAV_X", Some(&transform::derivate))?;
//! assert_eq!(speed.values, vec![2.0, 2.0, 3.0]);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

/// Absolute first difference of a series.
///
/// `out[i] = |s[i] - s[i - 1]|` for `i >= 1`. The first slot has no
/// predecessor and uses the next element instead, `out[0] = |s[0] - s[1]|`,
/// so the output is a non-negative rate with the same length as the input.
/// Series shorter than two elements produce all zeros.
pub fn derivate(series: &[f64]) -> Vec<f64> {
    if series.len() < 2 {
        return vec![0.0; series.len()];
    }

    let mut out = Vec::with_capacity(series.len());
    out.push((series[0] - series[1]).abs());
    out.extend(series.windows(2).map(|w| (w[1] - w[0]).abs()));
    out
}

/// Running sum of a series (rectangle rule, no constant offset).
pub fn integrate(series: &[f64]) -> Vec<f64> {
    series
        .iter()
        .scan(0.0, |total, &value| {
            *total += value;
            Some(*total)
        })
        .collect()
}

/// The built-in transforms, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// See [`derivate`].
    Derivate,
    /// See [`integrate`].
    Integrate,
}

impl Modifier {
    /// Applies the transform to a series.
    pub fn apply(self, series: &[f64]) -> Vec<f64> {
        match self {
            Modifier::Derivate => derivate(series),
            Modifier::Integrate => integrate(series),
        }
    }

    /// Returns the transform's name.
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Derivate => "derivate",
            Modifier::Integrate => "integrate",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Modifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "derivate" | "derivative" => Ok(Modifier::Derivate),
            "integrate" | "integral" => Ok(Modifier::Integrate),
            other => Err(format!(
                "unknown modifier '{other}'. Use derivate or integrate."
            )),
        }
    }
}
