//! Line classification for the alog text format.
//!
//! An alog file is line oriented. Lines starting with `%` are header or
//! comment lines; everything else is a whitespace-delimited data record:
//!
//! ```text
//! %% LOGFILE: mission.alog
//! % LOGSTART 1364821342.123
//! %%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%
//! 0.512   NAV_X     pNodeReporter   12.5
//! 0.512   NAV_Y     pNodeReporter   -3.25
//! 1.004   MODE      pHelmIvP        ACTIVE SURVEYING
//! 1.250   DEPLOY    uTimerScript
//! ```
//!
//! Value tokens past the third field are rejoined with single spaces, so the
//! `MODE` value above is `"ACTIVE SURVEYING"`. The `DEPLOY` line is a
//! "blank" record with no value at all.

use crate::error::{ParseError, Result};

/// Prefix that marks a header or comment line.
pub const COMMENT_MARKER: char = '%';

/// Prefix that marks a separator line.
pub const SEPARATOR_PREFIX: &str = "%%%";

/// Token identifying the header that carries the mission start time.
pub const LOGSTART_TOKEN: &str = "LOGSTART";

/// Minimum number of fields in a usable data record.
const MIN_RECORD_FIELDS: usize = 3;

/// A single data record, borrowed from its source line.
///
/// Records are ephemeral: the parser folds them into a
/// [`SeriesStore`](crate::store::SeriesStore) and drops them. The timestamp
/// is kept as text until [`LogRecord::timestamp`] is called, so a record the
/// parser discards is never rejected for its timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord<'a> {
    /// Raw timestamp field (seconds since mission start).
    pub time_field: &'a str,
    /// Variable name.
    pub name: &'a str,
    /// Name of the process that published the value.
    pub source: &'a str,
    /// The value text, or `None` for a 3-field blank record.
    pub value: Option<String>,
}

impl LogRecord<'_> {
    /// Parses the timestamp field.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidTimestamp`] if the field is not numeric.
    pub fn timestamp(&self, line_number: usize) -> Result<f64> {
        let timestamp = self
            .time_field
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidTimestamp {
                line: line_number,
                field: self.time_field.to_string(),
            })?;
        Ok(timestamp)
    }

    /// Returns `true` if the record carried no value tokens.
    pub fn is_blank(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the value text, treating a blank record as the empty string.
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Classification of one source line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    /// A `%%%` separator line.
    Separator,
    /// A LOGSTART header carrying the absolute mission start time.
    LogStart(f64),
    /// Any other `%` line.
    Comment,
    /// A non-comment line with fewer than three fields.
    Malformed,
    /// A well-formed data record.
    Record(LogRecord<'a>),
}

/// Classifies a single line of an alog source.
///
/// `line_number` is 1-based and only used for error reporting.
///
/// Data records are only split here; their timestamp is checked by
/// [`LogRecord::timestamp`].
///
/// # Errors
///
/// Returns [`ParseError::MalformedHeader`] if a LOGSTART header has no numeric
/// start time.
pub fn classify(line: &str, line_number: usize) -> Result<Line<'_>> {
    if line.starts_with(COMMENT_MARKER) {
        if line.starts_with(SEPARATOR_PREFIX) {
            return Ok(Line::Separator);
        }
        if line.contains(LOGSTART_TOKEN) {
            return parse_logstart(line, line_number).map(Line::LogStart);
        }
        return Ok(Line::Comment);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_RECORD_FIELDS {
        return Ok(Line::Malformed);
    }

    let value = if fields.len() == MIN_RECORD_FIELDS {
        None
    } else {
        Some(fields[MIN_RECORD_FIELDS..].join(" "))
    };

    Ok(Line::Record(LogRecord {
        time_field: fields[0],
        name: fields[1],
        source: fields[2],
        value,
    }))
}

/// Extracts the start time from a LOGSTART header.
///
/// The start time is the field following a standalone `LOGSTART` token,
/// which is field 2 of the usual `% LOGSTART <time>` layout. A token glued to
/// the marker (`%LOGSTART`) does not count.
fn parse_logstart(line: &str, line_number: usize) -> Result<f64> {
    let mut fields = line.split_whitespace();
    let field = fields
        .find(|field| *field == LOGSTART_TOKEN)
        .and_then(|_| fields.next())
        .ok_or_else(|| ParseError::MalformedHeader {
            line: line_number,
            reason: "expected a start time after LOGSTART".to_string(),
        })?;

    let start = field.parse::<f64>().map_err(|_| ParseError::MalformedHeader {
        line: line_number,
        reason: format!("start time '{field}' is not a number"),
    })?;

    Ok(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlogError;

    fn record(line: &str) -> LogRecord<'_> {
        match classify(line, 1).unwrap() {
            Line::Record(record) => record,
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[test]
    fn test_separator_line() {
        assert_eq!(classify("%%%%%%%%%%%%", 1).unwrap(), Line::Separator);
        assert_eq!(classify("%%% LOGSTART 5.0", 1).unwrap(), Line::Separator);
    }

    #[test]
    fn test_logstart_header() {
        assert_eq!(
            classify("% LOGSTART 1364821342.123", 1).unwrap(),
            Line::LogStart(1_364_821_342.123)
        );
        // Tabs and repeated spaces are both delimiters.
        assert_eq!(
            classify("%  LOGSTART\t\t100.0  extra", 1).unwrap(),
            Line::LogStart(100.0)
        );
        assert_eq!(
            classify("% ... LOGSTART 100.0 ...", 1).unwrap(),
            Line::LogStart(100.0)
        );
    }

    #[test]
    fn test_logstart_missing_field() {
        let err = classify("% LOGSTART", 7).unwrap_err();
        match err {
            AlogError::Parse(ParseError::MalformedHeader { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected MalformedHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_logstart_token_must_stand_alone() {
        let err = classify("%LOGSTART 5.0", 4).unwrap_err();
        assert!(matches!(
            err,
            AlogError::Parse(ParseError::MalformedHeader { line: 4, .. })
        ));

        let err = classify("% XLOGSTART 5.0", 4).unwrap_err();
        assert!(matches!(
            err,
            AlogError::Parse(ParseError::MalformedHeader { line: 4, .. })
        ));
    }

    #[test]
    fn test_logstart_non_numeric() {
        let err = classify("% LOGSTART soon", 2).unwrap_err();
        assert!(matches!(
            err,
            AlogError::Parse(ParseError::MalformedHeader { line: 2, .. })
        ));
    }

    #[test]
    fn test_other_comment_lines() {
        assert_eq!(classify("%% LOGFILE: a.alog", 1).unwrap(), Line::Comment);
        assert_eq!(classify("% just a note", 1).unwrap(), Line::Comment);
    }

    #[test]
    fn test_short_lines_are_malformed() {
        assert_eq!(classify("", 1).unwrap(), Line::Malformed);
        assert_eq!(classify("   ", 1).unwrap(), Line::Malformed);
        assert_eq!(classify("1.0 NAV_X", 1).unwrap(), Line::Malformed);
    }

    #[test]
    fn test_blank_record() {
        let rec = record("1.25 DEPLOY uTimerScript");
        assert_eq!(rec.timestamp(1).unwrap(), 1.25);
        assert_eq!(rec.name, "DEPLOY");
        assert_eq!(rec.source, "uTimerScript");
        assert!(rec.is_blank());
        assert_eq!(rec.value_str(), "");
    }

    #[test]
    fn test_multi_token_value_is_rejoined() {
        let rec = record("3.0  NODE_REPORT  pNodeReporter  NAME=alpha,  X=1   Y=2");
        assert_eq!(rec.value.as_deref(), Some("NAME=alpha, X=1 Y=2"));
    }

    #[test]
    fn test_invalid_timestamp() {
        // Splitting succeeds; the timestamp is rejected when it is read.
        let rec = record("abc NAV_X pNav 1.0");
        assert_eq!(rec.time_field, "abc");

        let err = rec.timestamp(12).unwrap_err();
        match err {
            AlogError::Parse(ParseError::InvalidTimestamp { line, field }) => {
                assert_eq!(line, 12);
                assert_eq!(field, "abc");
            }
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }
}
