//! Keys addressing elements of a backing collection.

use std::fmt;

/// Key of a single element in a collection.
///
/// Canonical decimal strings are folded into [`ElementKey::Index`], so the
/// element submitted as `{"0": ...}` and the element stored at position `0`
/// of a list share one key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKey {
    /// Positional key, as produced by JSON arrays.
    Index(usize),
    /// Named key, as produced by JSON objects.
    Name(String),
}

impl ElementKey {
    /// Parse a raw key, folding canonical decimal strings into indices.
    ///
    /// ```rust
    /// use mapped_collection::ElementKey;
    ///
    /// assert_eq!(ElementKey::parse("3"), ElementKey::Index(3));
    /// assert_eq!(ElementKey::parse("03"), ElementKey::Name("03".into()));
    /// assert_eq!(ElementKey::parse("intro"), ElementKey::Name("intro".into()));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if is_canonical_index(raw) {
            raw.parse()
                .map_or_else(|_| Self::Name(raw.to_owned()), Self::Index)
        } else {
            Self::Name(raw.to_owned())
        }
    }

    /// Returns the positional index, if this key is one.
    #[must_use]
    pub const fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Name(_) => None,
        }
    }
}

fn is_canonical_index(raw: &str) -> bool {
    !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && (raw == "0" || !raw.starts_with('0'))
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ElementKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ElementKey {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for ElementKey {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero("0", ElementKey::Index(0))]
    #[case::multi_digit("42", ElementKey::Index(42))]
    #[case::leading_zero("007", ElementKey::Name("007".into()))]
    #[case::negative("-1", ElementKey::Name("-1".into()))]
    #[case::empty("", ElementKey::Name(String::new()))]
    #[case::word("__name__", ElementKey::Name("__name__".into()))]
    fn parses_raw_keys(#[case] raw: &str, #[case] expected: ElementKey) {
        assert_eq!(ElementKey::parse(raw), expected);
    }

    #[test]
    fn overflowing_digits_stay_named() {
        let raw = "99999999999999999999999999";
        assert_eq!(ElementKey::parse(raw), ElementKey::Name(raw.to_owned()));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for key in [ElementKey::Index(7), ElementKey::Name("intro".into())] {
            assert_eq!(ElementKey::parse(&key.to_string()), key);
        }
    }
}
