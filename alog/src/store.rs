//! The immutable series store built from an alog source.
//!
//! A [`SeriesStore`] maps each variable name to its value history and the
//! matching relative timestamps. It is built in one pass by the
//! [`parser`](crate::parser) and never changes afterwards, so it can be
//! shared freely between readers (it is `Send + Sync`).
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use alog::store::SeriesStore;
//! use alog::options::ParseOptions;
//! use alog::transform;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SeriesStore::open("mission.alog", &ParseOptions::default())?;
//!
//! // Typed values
//! let deployed: Vec<bool> = store.values("DEPLOY")?;
//! let speed: Vec<f64> = store.values("NAV_SPEED")?;
//!
//! // Plot-ready series with a transform
//! let odometer = store.timed_plot_series("NAV_SPEED", Some(&transform::integrate))?;
//!
//! // Combine variables record by record
//! let range = store.combined_plot_series(&["NAV_X", "NAV_Y"], |v| v[0].hypot(v[1]))?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ParseError, QueryError, Result};
use crate::options::ParseOptions;
use crate::parser::{self, ParseStats};
use crate::query::{self, PlotSeries, SeriesFn, VariableSummary};
use crate::value::LogValue;

/// Value history and timestamps for one variable.
///
/// Both vectors always have the same length: the parser appends a time and
/// a value together, and nothing can modify a series once the store is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    times: Vec<f64>,
    values: Vec<String>,
}

impl Series {
    pub(crate) fn push(&mut self, time: f64, value: String) {
        self.times.push(time);
        self.values.push(value);
    }

    /// Relative timestamps, in record order.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Raw values, in record order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Most recent raw value.
    pub fn last_value(&self) -> Option<&str> {
        self.values.last().map(String::as_str)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Queryable snapshot of every variable in an alog source.
///
/// # Thread Safety
///
/// The store has no interior mutability. Once built it can be wrapped in an
/// `Arc` and read from any number of threads.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    /// Series keyed by variable name.
    series: HashMap<String, Series>,
    /// Absolute mission start time from the LOGSTART header.
    start_time: f64,
    /// Absolute time of the last record in the source.
    end_time: f64,
    /// Counters from the parse that built this store.
    stats: ParseStats,
}

impl SeriesStore {
    pub(crate) fn new(
        series: HashMap<String, Series>,
        start_time: f64,
        end_time: f64,
        stats: ParseStats,
    ) -> Self {
        Self {
            series,
            start_time,
            end_time,
            stats,
        }
    }

    /// Parses the alog file at `path`.
    ///
    /// The file is read to the end and closed before this returns, whether
    /// parsing succeeds or not.
    ///
    /// # Errors
    ///
    /// - [`ParseError::SourceUnreadable`] if the file cannot be opened or read
    /// - [`ParseError::MalformedHeader`] if a LOGSTART header is unusable
    /// - [`ParseError::InvalidTimestamp`] if a record's timestamp is not numeric
    pub fn open<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();

        let file = File::open(path).map_err(|e| ParseError::SourceUnreadable {
            path: label.clone(),
            source: e,
        })?;

        parser::parse_reader(BufReader::new(file), &label, options)
    }

    /// Parses an alog source from any buffered reader.
    ///
    /// # Errors
    ///
    /// Same as [`SeriesStore::open`].
    pub fn from_reader<R: BufRead>(reader: R, options: &ParseOptions) -> Result<Self> {
        parser::parse_reader(reader, "<reader>", options)
    }

    /// Returns the values recorded for `name`, converted to `T`.
    ///
    /// See [`LogValue`] for the supported types and conversion rules.
    ///
    /// # Errors
    ///
    /// - [`QueryError::UnknownVariable`] if `name` is not in the store
    /// - [`QueryError::ConversionFailure`] if any value does not convert
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use alog::{SeriesStore, ParseOptions};
    /// let log = "0 DEPLOY s true\n1 DEPLOY s false\n";
    /// let store = SeriesStore::from_reader(log.as_bytes(), &ParseOptions::default())?;
    /// assert_eq!(store.values::<bool>("DEPLOY")?, vec![true, false]);
    /// # Ok::<(), alog::AlogError>(())
    /// ```
    pub fn values<T: LogValue>(&self, name: &str) -> Result<Vec<T>> {
        query::convert(name, self.series(name)?.values())
    }

    /// Returns the stored text for `name` without conversion.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownVariable`] if `name` is not in the store.
    pub fn raw_values(&self, name: &str) -> Result<&[String]> {
        Ok(self.series(name)?.values())
    }

    /// Returns the relative timestamps recorded for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownVariable`] if `name` is not in the store.
    pub fn times(&self, name: &str) -> Result<&[f64]> {
        Ok(self.series(name)?.times())
    }

    /// Returns `(time, value)` pairs for `name`.
    ///
    /// # Errors
    ///
    /// Same as [`SeriesStore::values`].
    pub fn timed_values<T: LogValue>(&self, name: &str) -> Result<Vec<(f64, T)>> {
        let series = self.series(name)?;
        let values = query::convert::<T>(name, series.values())?;
        Ok(series.times().iter().copied().zip(values).collect())
    }

    /// Returns `name` as a float series with its timestamps.
    ///
    /// If `modifier` is given it is applied to the whole value series.
    ///
    /// # Errors
    ///
    /// Same as [`SeriesStore::values`] with `T = f64`.
    pub fn timed_plot_series(&self, name: &str, modifier: Option<SeriesFn<'_>>) -> Result<PlotSeries> {
        let series = self.series(name)?;
        Ok(PlotSeries {
            times: series.times().to_vec(),
            values: query::modified(name, series.values(), modifier)?,
        })
    }

    /// Returns two float series, each with its own optional transform.
    ///
    /// The series are not aligned; each keeps its own length.
    ///
    /// # Errors
    ///
    /// Same as [`SeriesStore::values`] with `T = f64`, for either name.
    pub fn paired_plot_series(
        &self,
        first: &str,
        second: &str,
        first_modifier: Option<SeriesFn<'_>>,
        second_modifier: Option<SeriesFn<'_>>,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        let a = query::modified(first, self.series(first)?.values(), first_modifier)?;
        let b = query::modified(second, self.series(second)?.values(), second_modifier)?;
        Ok((a, b))
    }

    /// Combines several variables record by record.
    ///
    /// For each index `j` below the shortest series length, `combiner` is
    /// called with the `j`-th value of every named series, in the order of
    /// `names`. The returned timestamps belong to the shortest series; when
    /// several share that length, the lexicographically smallest name wins.
    ///
    /// # Errors
    ///
    /// - [`QueryError::EmptySelection`] if `names` is empty
    /// - [`QueryError::UnknownVariable`] if any name is not in the store
    /// - [`QueryError::ConversionFailure`] if a value in the combined range
    ///   is not a float
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use alog::{SeriesStore, ParseOptions};
    /// let log = "0 A s 1\n0 B s 10\n1 A s 2\n1 B s 20\n2 A s 3\n";
    /// let store = SeriesStore::from_reader(log.as_bytes(), &ParseOptions::default())?;
    /// let sum = store.combined_plot_series(&["A", "B"], |v| v.iter().sum())?;
    /// assert_eq!(sum.values, vec![11.0, 22.0]);
    /// assert_eq!(sum.times, vec![0.0, 1.0]);
    /// # Ok::<(), alog::AlogError>(())
    /// ```
    pub fn combined_plot_series<F>(&self, names: &[&str], combiner: F) -> Result<PlotSeries>
    where
        F: Fn(&[f64]) -> f64,
    {
        let selected = names
            .iter()
            .map(|&name| self.series(name).map(|series| (name, series)))
            .collect::<Result<Vec<_>>>()?;

        let (_, shortest) = selected
            .iter()
            .min_by(|(name_a, a), (name_b, b)| a.len().cmp(&b.len()).then_with(|| name_a.cmp(name_b)))
            .ok_or(QueryError::EmptySelection)?;
        let n = shortest.len();

        let columns = selected
            .iter()
            .map(|(name, series)| query::convert::<f64>(name, &series.values()[..n]))
            .collect::<Result<Vec<_>>>()?;

        let mut row = vec![0.0; columns.len()];
        let values = (0..n)
            .map(|j| {
                for (slot, column) in row.iter_mut().zip(&columns) {
                    *slot = column[j];
                }
                combiner(row.as_slice())
            })
            .collect();

        Ok(PlotSeries {
            times: shortest.times()[..n].to_vec(),
            values,
        })
    }

    /// Returns the series for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownVariable`] if `name` is not in the store.
    pub fn series(&self, name: &str) -> Result<&Series> {
        self.series.get(name).ok_or_else(|| {
            QueryError::UnknownVariable {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Returns `true` if any record for `name` was stored.
    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Returns the number of stored records for `name`, or 0 if absent.
    pub fn record_count(&self, name: &str) -> usize {
        self.series.get(name).map_or(0, Series::len)
    }

    /// Returns all variable names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns one summary per variable, sorted by name.
    pub fn summary(&self) -> Vec<VariableSummary> {
        self.names()
            .into_iter()
            .filter_map(|name| {
                let series = self.series.get(name)?;
                Some(VariableSummary {
                    name: name.to_string(),
                    count: series.len(),
                    first_time: series.times().first().copied()?,
                    last_time: series.times().last().copied()?,
                    last_value: series.last_value()?.to_string(),
                })
            })
            .collect()
    }

    /// Number of variables in the store.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns `true` if no variables were stored.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Absolute mission start time (0.0 if the source had no LOGSTART header).
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Absolute time of the last record in the source.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Seconds between [`start_time`](Self::start_time) and [`end_time`](Self::end_time).
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Counters from the parse that built this store.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}
