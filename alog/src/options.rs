//! Parse options controlling which records end up in a store.
//!
//! [`ParseOptions`] bundles the name filter with the blank and repeat
//! suppression switches. It is serializable so a set of options can be kept
//! next to the logs it is meant for and loaded with [`ParseOptions::load`].
//!
//! # Example
//!
//! ```rust
//! use alog::options::ParseOptions;
//!
//! let options = ParseOptions::default()
//!     .with_include(["NAV_X", "NAV_Y"])
//!     .filter_repeats(true);
//!
//! assert!(options.name_filter.matches("NAV_X"));
//! assert!(!options.name_filter.matches("DEPLOY"));
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Include/exclude name filter.
///
/// A name passes if **any** of the following holds:
///
/// - `include` is set and contains the name
/// - `exclude` is set and does not contain the name
/// - neither is set
///
/// This is an OR of the conditions, not an AND. When both sets are given a
/// name listed in `include` always passes, even if it is also excluded, and
/// a name that appears in neither set passes through the `exclude` branch.
/// Callers that want strict allow-listing should set only `include`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFilter {
    /// Names to keep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<BTreeSet<String>>,
    /// Names to drop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<BTreeSet<String>>,
}

impl NameFilter {
    /// Creates a filter that passes every name.
    pub fn any() -> Self {
        Self::default()
    }

    /// Returns `true` if records for `name` should be kept.
    pub fn matches(&self, name: &str) -> bool {
        match (&self.include, &self.exclude) {
            (None, None) => true,
            (include, exclude) => {
                include.as_ref().is_some_and(|set| set.contains(name))
                    || exclude.as_ref().is_some_and(|set| !set.contains(name))
            }
        }
    }
}

/// Options for building a [`SeriesStore`](crate::store::SeriesStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Which variable names to keep.
    #[serde(flatten)]
    pub name_filter: NameFilter,

    /// Drop a record when its value equals the last stored value for the
    /// same name.
    pub filter_repeats: bool,

    /// Drop 3-field records that carry no value.
    pub ignore_blanks: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            name_filter: NameFilter::any(),
            filter_repeats: false,
            ignore_blanks: true,
        }
    }
}

impl ParseOptions {
    /// Sets the names to include.
    #[must_use]
    pub fn with_include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_filter.include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the names to exclude.
    #[must_use]
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_filter.exclude = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Enables or disables repeat suppression.
    #[must_use]
    pub fn filter_repeats(mut self, enabled: bool) -> Self {
        self.filter_repeats = enabled;
        self
    }

    /// Enables or disables blank suppression.
    #[must_use]
    pub fn ignore_blanks(mut self, enabled: bool) -> Self {
        self.ignore_blanks = enabled;
        self
    }

    /// Loads options from a JSON file.
    ///
    /// Missing fields take their [`Default`] values, so `{}` is a valid file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid JSON for this type.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let data = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = serde_json::from_str(&data).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(options)
    }
}
