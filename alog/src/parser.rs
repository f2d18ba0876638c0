//! Single-pass alog parser that builds a [`SeriesStore`].
//!
//! The parser walks the source once, classifying each line (see
//! [`record::classify`](crate::record::classify)) and folding accepted data
//! records into per-name series. Nothing is observable until the pass
//! completes; a failure anywhere discards everything collected so far.
//!
//! # Filtering
//!
//! Each data record goes through, in order:
//!
//! 1. **Blank suppression**: 3-field records are dropped when
//!    [`ParseOptions::ignore_blanks`] is set. Dropped blanks do not move the
//!    end-time bound.
//! 2. **Name filter**: [`NameFilter::matches`](crate::options::NameFilter::matches).
//! 3. **Repeat suppression**: when [`ParseOptions::filter_repeats`] is set, a
//!    record whose value equals the last stored value for its name is dropped.
//!
//! Every record that reaches step 2 advances the end-time bound, kept or not,
//! so [`SeriesStore::end_time`] reflects the full span of the log.

use std::collections::HashMap;
use std::io::BufRead;
use std::time::Instant;

use crate::error::{ParseError, Result};
use crate::options::ParseOptions;
use crate::record::{self, Line, LogRecord};
use crate::store::{Series, SeriesStore};

/// Counters collected while parsing a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines read from the source.
    pub lines: usize,
    /// Well-formed data records seen.
    pub records: usize,
    /// Records stored in the resulting series.
    pub kept: usize,
    /// Blank records dropped by blank suppression.
    pub blanks_dropped: usize,
    /// Records rejected by the name filter.
    pub filtered: usize,
    /// Records dropped by repeat suppression.
    pub repeats_dropped: usize,
    /// Data lines with fewer than three fields.
    pub malformed: usize,
    /// Header, comment and separator lines.
    pub comments: usize,
}

/// Parses an alog source from a buffered reader.
///
/// `label` identifies the source in error messages (usually the file path).
///
/// # Errors
///
/// - [`ParseError::SourceUnreadable`] if reading a line fails
/// - [`ParseError::MalformedHeader`] if a LOGSTART header is unusable
/// - [`ParseError::InvalidTimestamp`] if a data record's timestamp is not numeric
pub fn parse_reader<R: BufRead>(reader: R, label: &str, options: &ParseOptions) -> Result<SeriesStore> {
    let started = Instant::now();
    let mut builder = StoreBuilder::new(options);

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ParseError::SourceUnreadable {
            path: label.to_string(),
            source: e,
        })?;
        builder.push_line(&line, index + 1)?;
    }

    let store = builder.finish();
    log_summary(label, &store, started);
    Ok(store)
}

/// Parses an alog source that is already in memory, one item per line.
///
/// # Errors
///
/// Same as [`parse_reader`], minus I/O failures.
pub fn parse_lines<I, S>(lines: I, options: &ParseOptions) -> Result<SeriesStore>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let started = Instant::now();
    let mut builder = StoreBuilder::new(options);

    for (index, line) in lines.into_iter().enumerate() {
        builder.push_line(line.as_ref(), index + 1)?;
    }

    let store = builder.finish();
    log_summary("<memory>", &store, started);
    Ok(store)
}

fn log_summary(label: &str, store: &SeriesStore, started: Instant) {
    let stats = store.stats();
    tracing::debug!(
        source = label,
        variables = store.len(),
        records = stats.records,
        kept = stats.kept,
        dropped = stats.records - stats.kept,
        malformed = stats.malformed,
        elapsed = ?started.elapsed(),
        "parsed alog source"
    );
}

/// Accumulates series while the source is being read.
struct StoreBuilder<'a> {
    options: &'a ParseOptions,
    series: HashMap<String, Series>,
    start_time: f64,
    last_time: f64,
    stats: ParseStats,
}

impl<'a> StoreBuilder<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            series: HashMap::new(),
            start_time: 0.0,
            last_time: 0.0,
            stats: ParseStats::default(),
        }
    }

    fn push_line(&mut self, line: &str, line_number: usize) -> Result<()> {
        self.stats.lines += 1;

        match record::classify(line, line_number)? {
            Line::Separator | Line::Comment => self.stats.comments += 1,
            Line::LogStart(start) => {
                self.stats.comments += 1;
                tracing::debug!(line = line_number, start, "found LOGSTART header");
                self.start_time = start;
            }
            Line::Malformed => {
                self.stats.malformed += 1;
                tracing::trace!(line = line_number, "skipping short data line");
            }
            Line::Record(rec) => self.push_record(rec, line_number)?,
        }

        Ok(())
    }

    fn push_record(&mut self, rec: LogRecord<'_>, line_number: usize) -> Result<()> {
        self.stats.records += 1;

        // Ignored blanks are dropped before their timestamp is read.
        if rec.is_blank() && self.options.ignore_blanks {
            self.stats.blanks_dropped += 1;
            return Ok(());
        }

        let timestamp = rec.timestamp(line_number)?;
        self.last_time = timestamp;

        if !self.options.name_filter.matches(rec.name) {
            self.stats.filtered += 1;
            return Ok(());
        }

        if self.options.filter_repeats && self.is_repeat(&rec) {
            self.stats.repeats_dropped += 1;
            return Ok(());
        }

        let LogRecord { name, value, .. } = rec;
        self.series
            .entry(name.to_string())
            .or_default()
            .push(timestamp, value.unwrap_or_default());
        self.stats.kept += 1;
        Ok(())
    }

    fn is_repeat(&self, rec: &LogRecord<'_>) -> bool {
        self.series
            .get(rec.name)
            .and_then(Series::last_value)
            .is_some_and(|last| last == rec.value_str())
    }

    fn finish(self) -> SeriesStore {
        let end_time = self.start_time + self.last_time;
        SeriesStore::new(self.series, self.start_time, end_time, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlogError;

    const MISSION: &str = "\
%% LOGFILE: mission.alog
% LOGSTART 100.0
%%%%%%%%%%%%%%%%%%%%%%
0.0 SPEED NAV 1.0
0.5 MODE pHelm ACTIVE
1.0 SPEED NAV 1.0
1.5 DEPLOY uTimer
2.0 SPEED NAV 3.0
2.5 MODE pHelm ACTIVE
";

    fn parse(text: &str, options: &ParseOptions) -> SeriesStore {
        parse_lines(text.lines(), options).unwrap()
    }

    fn raw(store: &SeriesStore, name: &str) -> Vec<String> {
        store.raw_values(name).unwrap().to_vec()
    }

    #[test]
    fn test_defaults_drop_blanks_keep_repeats() {
        let store = parse(MISSION, &ParseOptions::default());

        assert_eq!(store.start_time(), 100.0);
        assert_eq!(store.end_time(), 102.5);
        assert_eq!(raw(&store, "SPEED"), vec!["1.0", "1.0", "3.0"]);
        assert_eq!(store.times("SPEED").unwrap(), &[0.0, 1.0, 2.0]);
        assert_eq!(raw(&store, "MODE"), vec!["ACTIVE", "ACTIVE"]);
        assert!(!store.contains("DEPLOY"));
    }

    #[test]
    fn test_keep_blanks() {
        let store = parse(MISSION, &ParseOptions::default().ignore_blanks(false));
        assert_eq!(raw(&store, "DEPLOY"), vec![""]);
        assert_eq!(store.times("DEPLOY").unwrap(), &[1.5]);
    }

    #[test]
    fn test_filter_repeats() {
        let store = parse(MISSION, &ParseOptions::default().filter_repeats(true));
        assert_eq!(raw(&store, "SPEED"), vec!["1.0", "3.0"]);
        assert_eq!(store.times("SPEED").unwrap(), &[0.0, 2.0]);
        assert_eq!(raw(&store, "MODE"), vec!["ACTIVE"]);
        assert_eq!(store.stats().repeats_dropped, 2);
        // The final line is a dropped repeat but still sets the end time.
        assert_eq!(store.end_time(), 102.5);
    }

    #[test]
    fn test_filter_repeats_only_compares_last_value() {
        let log = "0 X s 1\n1 X s 2\n2 X s 1\n3 X s 1\n";
        let store = parse(log, &ParseOptions::default().filter_repeats(true));
        assert_eq!(raw(&store, "X"), vec!["1", "2", "1"]);
    }

    #[test]
    fn test_filter_repeats_applies_to_blanks() {
        let log = "0 X s\n1 X s\n2 X s 4\n3 X s\n";
        let options = ParseOptions::default()
            .filter_repeats(true)
            .ignore_blanks(false);
        let store = parse(log, &options);
        assert_eq!(raw(&store, "X"), vec!["", "4", ""]);
        assert_eq!(store.times("X").unwrap(), &[0.0, 2.0, 3.0]);
    }

    #[test]
    fn test_filtered_records_still_advance_end_time() {
        let log = "% LOGSTART 10.0\n0.0 A s 1\n4.0 B s 2\n";
        let store = parse(log, &ParseOptions::default().with_include(["A"]));
        assert!(!store.contains("B"));
        assert_eq!(store.end_time(), 14.0);
    }

    #[test]
    fn test_ignored_blanks_do_not_advance_end_time() {
        let log = "% LOGSTART 10.0\n0.0 A s 1\n4.0 B s\n";
        let store = parse(log, &ParseOptions::default());
        assert_eq!(store.end_time(), 10.0);

        let store = parse(log, &ParseOptions::default().ignore_blanks(false));
        assert_eq!(store.end_time(), 14.0);
    }

    #[test]
    fn test_ignored_blanks_skip_timestamp_check() {
        let lines = ["% LOGSTART 1.0", "0.0 A s 1", "--- BANNER line"];
        let store = parse_lines(lines, &ParseOptions::default()).unwrap();
        assert_eq!(raw(&store, "A"), vec!["1"]);
        assert!(!store.contains("BANNER"));
        assert_eq!(store.end_time(), 1.0);
        assert_eq!(store.stats().blanks_dropped, 1);

        let result = parse_lines(lines, &ParseOptions::default().ignore_blanks(false));
        assert!(matches!(
            result,
            Err(AlogError::Parse(ParseError::InvalidTimestamp { line: 3, .. }))
        ));
    }

    #[test]
    fn test_end_time_tracks_source_order_not_maximum() {
        let log = "% LOGSTART 0.0\n5.0 A s 1\n3.0 A s 2\n";
        let store = parse(log, &ParseOptions::default());
        assert_eq!(store.end_time(), 3.0);
        assert_eq!(store.times("A").unwrap(), &[5.0, 3.0]);
    }

    #[test]
    fn test_no_header_starts_at_zero() {
        let store = parse("1.0 A s 1\n2.0 A s 2\n", &ParseOptions::default());
        assert_eq!(store.start_time(), 0.0);
        assert_eq!(store.end_time(), 2.0);
    }

    #[test]
    fn test_empty_source() {
        let store = parse("", &ParseOptions::default());
        assert!(store.is_empty());
        assert_eq!(store.start_time(), 0.0);
        assert_eq!(store.end_time(), 0.0);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let log = "0.0 A s 1\ngarbage\n\n1.0 B\n2.0 A s 2\n";
        let store = parse(log, &ParseOptions::default());
        assert_eq!(raw(&store, "A"), vec!["1", "2"]);
        assert_eq!(store.stats().malformed, 3);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_bad_header_fails() {
        let result = parse_lines(["% LOGSTART"], &ParseOptions::default());
        assert!(matches!(
            result,
            Err(AlogError::Parse(ParseError::MalformedHeader { line: 1, .. }))
        ));
    }

    #[test]
    fn test_bad_timestamp_fails_with_line_number() {
        let result = parse_lines(["0.0 A s 1", "x A s 2"], &ParseOptions::default());
        assert!(matches!(
            result,
            Err(AlogError::Parse(ParseError::InvalidTimestamp { line: 2, .. }))
        ));
    }

    #[test]
    fn test_later_logstart_wins() {
        let log = "% LOGSTART 1.0\n% LOGSTART 2.0\n1.0 A s 1\n";
        let store = parse(log, &ParseOptions::default());
        assert_eq!(store.start_time(), 2.0);
        assert_eq!(store.end_time(), 3.0);
    }

    #[test]
    fn test_stats() {
        let store = parse(MISSION, &ParseOptions::default().with_exclude(["MODE"]));
        let stats = store.stats();
        assert_eq!(stats.lines, 9);
        assert_eq!(stats.comments, 3);
        assert_eq!(stats.records, 6);
        assert_eq!(stats.blanks_dropped, 1);
        assert_eq!(stats.filtered, 2);
        assert_eq!(stats.kept, 3);
    }

    #[test]
    fn test_parse_reader_reports_io_errors() {
        struct Failing;

        impl std::io::Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk on fire"))
            }
        }

        let reader = std::io::BufReader::new(Failing);
        let result = parse_reader(reader, "broken.alog", &ParseOptions::default());
        match result {
            Err(AlogError::Parse(ParseError::SourceUnreadable { path, .. })) => {
                assert_eq!(path, "broken.alog");
            }
            other => panic!("expected SourceUnreadable, got {other:?}"),
        }
    }
}
