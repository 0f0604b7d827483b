//! Property paths addressing nested element data.

use std::fmt;

use super::AccessError;
use crate::ElementKey;

/// Parsed property path such as `meta.kind`, `[kind]`, or `rows[0].kind`.
///
/// Segments carry no access strategy of their own: the same path can be
/// evaluated by [`super::NamedAccess`] or [`super::IndexedAccess`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<String>,
}

impl PropertyPath {
    /// Parse dotted and bracketed notation.
    ///
    /// ```rust
    /// use mapped_collection::access::PropertyPath;
    ///
    /// let path = PropertyPath::parse("rows[0].kind")?;
    /// assert_eq!(path.segments(), ["rows", "0", "kind"]);
    /// # Ok::<_, mapped_collection::access::AccessError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidPath`] for empty paths, empty segments,
    /// and unbalanced brackets.
    pub fn parse(raw: &str) -> Result<Self, AccessError> {
        let invalid = |reason: &str| AccessError::InvalidPath {
            path: raw.to_owned(),
            reason: reason.to_owned(),
        };
        if raw.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        let mut rest = raw;
        let mut expect_name = true;
        while !rest.is_empty() {
            if let Some(after_bracket) = rest.strip_prefix('[') {
                let Some(close) = after_bracket.find(']') else {
                    return Err(invalid("unclosed '['"));
                };
                let (segment, tail) = after_bracket.split_at(close);
                if segment.is_empty() {
                    return Err(invalid("empty index"));
                }
                segments.push(segment.to_owned());
                rest = tail.strip_prefix(']').unwrap_or(tail);
                expect_name = false;
                if let Some(after_dot) = rest.strip_prefix('.') {
                    rest = after_dot;
                    expect_name = true;
                    if rest.is_empty() {
                        return Err(invalid("trailing '.'"));
                    }
                }
            } else if let Some(after_dot) = rest.strip_prefix('.') {
                if expect_name || after_dot.is_empty() {
                    return Err(invalid("empty property name"));
                }
                rest = after_dot;
                expect_name = true;
            } else {
                let end = rest.find(['.', '[', ']']).unwrap_or(rest.len());
                let (name, tail) = rest.split_at(end);
                if name.is_empty() {
                    return Err(invalid("unexpected ']'"));
                }
                if !expect_name {
                    return Err(invalid("expected '.' or '[' between segments"));
                }
                segments.push(name.to_owned());
                rest = tail;
                expect_name = false;
            }
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    /// A single-segment indexed path addressing `key` literally.
    ///
    /// Unlike [`PropertyPath::parse`], the key is not split on `.` or `[`.
    #[must_use]
    pub fn index(key: impl Into<String>) -> Self {
        let segment = key.into();
        Self {
            raw: format!("[{segment}]"),
            segments: vec![segment],
        }
    }

    /// The path addressing element `key` inside its parent collection.
    #[must_use]
    pub fn element(key: &ElementKey) -> Self {
        Self::index(key.to_string())
    }

    /// Path segments in traversal order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
