//! Typed conversion of stored value text.
//!
//! Every value in a [`SeriesStore`](crate::store::SeriesStore) is kept as the
//! text that appeared in the log. [`LogValue`] is the closed set of types a
//! query can ask for:
//!
//! | Type                              | Conversion                             |
//! |-----------------------------------|----------------------------------------|
//! | `String`                          | unchanged                              |
//! | `bool`                            | `true` iff the text is exactly `"true"` |
//! | `f64`, `f32`                      | [`str::parse`]                         |
//! | `i64`, `i32`, `u64`, `u32`        | [`str::parse`]                         |

mod sealed {
    pub trait Sealed {}
}

/// A type that stored value text can be converted into.
///
/// This trait is sealed; the supported set is fixed by this crate.
pub trait LogValue: sealed::Sealed + Sized {
    /// Human-readable type name used in conversion errors.
    const KIND: &'static str;

    /// Converts one stored value, or returns `None` if it does not parse.
    fn from_log_value(raw: &str) -> Option<Self>;
}

impl sealed::Sealed for String {}

impl LogValue for String {
    const KIND: &'static str = "string";

    fn from_log_value(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl sealed::Sealed for bool {}

impl LogValue for bool {
    const KIND: &'static str = "bool";

    // Any text other than the exact literal is false, never an error.
    fn from_log_value(raw: &str) -> Option<Self> {
        Some(raw == "true")
    }
}

macro_rules! parsed_log_value {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl LogValue for $ty {
                const KIND: &'static str = $kind;

                fn from_log_value(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }
        )*
    };
}

parsed_log_value! {
    f64 => "f64",
    f32 => "f32",
    i64 => "i64",
    i32 => "i32",
    u64 => "u64",
    u32 => "u32",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_is_identity() {
        assert_eq!(String::from_log_value("a b c"), Some("a b c".to_string()));
        assert_eq!(String::from_log_value(""), Some(String::new()));
    }

    #[test]
    fn test_bool_only_accepts_exact_literal() {
        assert_eq!(bool::from_log_value("true"), Some(true));
        assert_eq!(bool::from_log_value("false"), Some(false));
        assert_eq!(bool::from_log_value("TRUE"), Some(false));
        assert_eq!(bool::from_log_value("1"), Some(false));
        assert_eq!(bool::from_log_value(""), Some(false));
    }

    #[test]
    fn test_float_parse() {
        assert_eq!(f64::from_log_value("-3.25"), Some(-3.25));
        assert_eq!(f64::from_log_value("1e3"), Some(1000.0));
        assert_eq!(f64::from_log_value("ACTIVE"), None);
        assert_eq!(f64::from_log_value(""), None);
    }

    #[test]
    fn test_integer_parse() {
        assert_eq!(i64::from_log_value("-42"), Some(-42));
        assert_eq!(i32::from_log_value("1.5"), None);
        assert_eq!(u32::from_log_value("-1"), None);
        assert_eq!(u64::from_log_value("18446744073709551615"), Some(u64::MAX));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(<f64 as LogValue>::KIND, "f64");
        assert_eq!(<bool as LogValue>::KIND, "bool");
        assert_eq!(<String as LogValue>::KIND, "string");
    }
}
