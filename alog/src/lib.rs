//! # alog
//!
//! Parser and in-memory series store for timestamped mission logs.
//!
//! An alog file is the event log written by an autonomous-vehicle mission
//! framework: one record per line carrying a timestamp, a variable name, the
//! publishing process and a value. alog reads such a file once, keeps the
//! value and timestamp history of every variable, and answers typed and
//! plot-oriented queries against that history.
//!
//! **Status**: This crate is in early development. The API is not yet stable.
//!
//! ## Key Properties
//!
//! - Single eager pass; the resulting store is immutable and `Send + Sync`
//! - Per-variable value and timestamp histories that always have equal length
//! - Include/exclude, blank and repeat filtering at parse time
//! - Typed queries over a closed set of value types
//! - Derived series through transforms and multi-variable combiners
//!
//! ## Quick Start
//!
//! ```rust
//! use alog::{ParseOptions, SeriesStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let log = "\
//! % LOGSTART 100.0
//! 0.0 SPEED NAV 1.0
//! 2.5 SPEED NAV 3.0
//! ";
//!
//! let store = SeriesStore::from_reader(log.as_bytes(), &ParseOptions::default())?;
//!
//! assert_eq!(store.start_time(), 100.0);
//! assert_eq!(store.end_time(), 102.5);
//! assert_eq!(store.values::<f64>("SPEED")?, vec![1.0, 3.0]);
//! assert_eq!(store.times("SPEED")?, &[0.0, 2.5]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`SeriesStore`] — Parsed snapshot; owns every series and answers queries
//! - [`ParseOptions`] — Name filter plus blank and repeat suppression
//! - [`LogValue`] — Types a stored value can be converted into
//! - [`PlotSeries`] — Owned `(times, values)` pair returned by plot queries
//!
//! ## Modules
//!
//! - [`store`] — Store construction and queries
//! - [`parser`] — Single-pass parser and parse statistics
//! - [`record`] — Line classification for the alog text format
//! - [`options`] — Parse options and the name filter
//! - [`value`] — Typed value conversion
//! - [`query`] — Query result types
//! - [`transform`] — Series transforms (derivative, integral)
//! - [`error`] — Error types

pub mod error;
pub mod options;
pub mod parser;
pub mod query;
pub mod record;
pub mod store;
pub mod transform;
pub mod value;

// Re-export primary API types at crate root for convenience.
pub use error::{AlogError, Result};
pub use options::{NameFilter, ParseOptions};
pub use parser::ParseStats;
pub use query::{PlotSeries, SeriesFn, VariableSummary};
pub use store::{Series, SeriesStore};
pub use transform::Modifier;
pub use value::LogValue;
