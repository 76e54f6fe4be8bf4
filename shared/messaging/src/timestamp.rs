//! Message timestamps.
//!
//! The server identifies every message by a `ts` token such as `"1403051575.000407"`.
//! Tokens are opaque but numerically ordered: the integer part is compared as a number,
//! then the fractional digits as a decimal fraction.

use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Unique, totally ordered message timestamp token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares by numeric value only, so `"100"` and `"100.0"` are equal here.
    pub fn numeric_cmp(&self, other: &Self) -> Ordering {
        match (self.numeric_parts(), other.numeric_parts()) {
            (Some((a_int, a_frac)), Some((b_int, b_frac))) => a_int
                .len()
                .cmp(&b_int.len())
                .then_with(|| a_int.cmp(b_int))
                .then_with(|| a_frac.cmp(b_frac)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }

    /// Splits the token into trimmed integer and fraction digits, or `None` when it is
    /// not a plain decimal number.
    fn numeric_parts(&self) -> Option<(&str, &str)> {
        let (int, frac) = self.0.split_once('.').unwrap_or((self.0.as_str(), ""));
        if int.is_empty()
            || !int.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        Some((int.trim_start_matches('0'), frac.trim_end_matches('0')))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        // numerically equal spellings ("100" / "100.0") still need a total order
        self.numeric_cmp(other).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

// Some endpoints (topic `last_set`, for one) send bare numbers instead of strings.
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self(number.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_numerically_not_textually() {
        assert!(Timestamp::from("99") < Timestamp::from("100"));
        assert!(Timestamp::from("1403051575.5") > Timestamp::from("1403051575.45"));
        assert!(Timestamp::from("1403051575.000407") < Timestamp::from("1403051575.0005"));
        assert!(Timestamp::from("0100") > Timestamp::from("99.9"));
    }

    #[test]
    fn equal_values_with_different_spelling_stay_distinct() {
        let a = Timestamp::from("100");
        let b = Timestamp::from("100.000");
        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert!(a < Timestamp::from("100.001"));
        assert!(b < Timestamp::from("100.001"));
    }

    #[test]
    fn numeric_cmp_ignores_spelling() {
        let a = Timestamp::from("100");
        let b = Timestamp::from("100.0");
        assert_eq!(a.numeric_cmp(&b), Ordering::Equal);
        assert_eq!(b.numeric_cmp(&a), Ordering::Equal);
        assert_eq!(a.numeric_cmp(&Timestamp::from("100.01")), Ordering::Less);
    }

    #[test]
    fn non_numeric_tokens_sort_after_numbers() {
        assert!(Timestamp::from("9999999999") < Timestamp::from("abc"));
        assert!(Timestamp::from("abc") < Timestamp::from("abd"));
    }

    #[test]
    fn deserializes_from_string_or_number() {
        let text: Timestamp = serde_json::from_str("\"1403051575.000407\"").unwrap();
        assert_eq!(text.as_str(), "1403051575.000407");

        let number: Timestamp = serde_json::from_str("1403051575").unwrap();
        assert_eq!(number.as_str(), "1403051575");
        assert_eq!(serde_json::to_string(&number).unwrap(), "\"1403051575\"");
    }
}
