//! Query result types and value conversion helpers.
//!
//! Everything returned from a [`SeriesStore`](crate::store::SeriesStore)
//! query is either a shared borrow or an owned copy. Transforms applied
//! through a query run on the copy, never on stored history.

use serde::Serialize;

use crate::error::{QueryError, Result};
use crate::value::LogValue;

/// A transform applied to a float series before it is returned.
///
/// Any `fn(&[f64]) -> Vec<f64>` works, including the functions in
/// [`transform`](crate::transform).
pub type SeriesFn<'a> = &'a dyn Fn(&[f64]) -> Vec<f64>;

/// Plot-ready `(times, values)` pair for one series.
///
/// `times` are relative to mission start. Both vectors are owned by the
/// caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotSeries {
    /// Relative timestamps in seconds.
    pub times: Vec<f64>,
    /// Values, one per timestamp.
    pub values: Vec<f64>,
}

impl PlotSeries {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(time, value)` points.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}

/// Per-variable overview of a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSummary {
    /// Variable name.
    pub name: String,
    /// Number of stored records.
    pub count: usize,
    /// Relative time of the first stored record.
    pub first_time: f64,
    /// Relative time of the last stored record.
    pub last_time: f64,
    /// Most recent raw value.
    pub last_value: String,
}

/// Converts stored text into `T`, failing on the first value that does not parse.
pub(crate) fn convert<T: LogValue>(name: &str, raw: &[String]) -> Result<Vec<T>> {
    raw.iter()
        .map(|value| {
            T::from_log_value(value).ok_or_else(|| {
                QueryError::ConversionFailure {
                    name: name.to_string(),
                    target: T::KIND,
                    value: value.clone(),
                }
                .into()
            })
        })
        .collect()
}

/// Converts to `f64` and applies an optional transform.
pub(crate) fn modified(name: &str, raw: &[String], modifier: Option<SeriesFn<'_>>) -> Result<Vec<f64>> {
    let values = convert::<f64>(name, raw)?;
    Ok(match modifier {
        Some(f) => f(&values),
        None => values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlogError;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_convert_reports_first_bad_value() {
        let raw = strings(&["1", "two", "three"]);
        match convert::<i64>("COUNT", &raw) {
            Err(AlogError::Query(QueryError::ConversionFailure {
                name,
                target,
                value,
            })) => {
                assert_eq!(name, "COUNT");
                assert_eq!(target, "i64");
                assert_eq!(value, "two");
            }
            other => panic!("expected ConversionFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_modified_without_transform() {
        let raw = strings(&["1.5", "2.5"]);
        assert_eq!(modified("X", &raw, None).unwrap(), vec![1.5, 2.5]);
    }

    #[test]
    fn test_modified_with_closure() {
        let raw = strings(&["1", "2"]);
        let double = |s: &[f64]| s.iter().map(|v| v * 2.0).collect::<Vec<_>>();
        assert_eq!(modified("X", &raw, Some(&double)).unwrap(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_plot_series_points() {
        let series = PlotSeries {
            times: vec![0.0, 1.0],
            values: vec![10.0, 20.0],
        };
        assert_eq!(series.len(), 2);
        assert!(!series.is_empty());
        assert_eq!(series.points().collect::<Vec<_>>(), vec![(0.0, 10.0), (1.0, 20.0)]);
    }
}
