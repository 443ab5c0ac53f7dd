//! Event tags
//!
//! On the wire a tag is an ordered list of strings whose first element is
//! the tag name. `Tags` keeps that raw form for serialization and exposes
//! a named view (`TagRef`) plus small lookup predicates for matching.

use serde::{Deserialize, Serialize};

/// Named view over a single raw tag row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRef<'a> {
    /// Tag name (first element)
    pub name: &'a str,
    /// Primary value (second element), if present
    pub value: Option<&'a str>,
    /// Remaining parameters
    pub extra: &'a [String],
}

impl<'a> TagRef<'a> {
    /// Parse a raw row. Empty rows have no name and yield `None`.
    pub fn parse(row: &'a [String]) -> Option<Self> {
        let (name, rest) = row.split_first()?;
        let (value, extra) = match rest.split_first() {
            Some((value, extra)) => (Some(value.as_str()), extra),
            None => (None, rest),
        };
        Some(Self {
            name: name.as_str(),
            value,
            extra,
        })
    }

    /// Whether this tag has the given name and exactly the given value
    pub fn is(&self, name: &str, value: &str) -> bool {
        self.name == name && self.value == Some(value)
    }

    /// Whether this tag has the given name and a value starting with `prefix`
    pub fn value_starts_with(&self, name: &str, prefix: &str) -> bool {
        self.name == name && self.value.is_some_and(|v| v.starts_with(prefix))
    }
}

/// Ordered collection of raw tag rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(pub Vec<Vec<String>>);

impl Tags {
    /// Create an empty tag set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build tags from any nested iterable of strings
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Number of rows (including malformed ones)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a raw row
    pub fn push<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.0.push(row.into_iter().map(Into::into).collect());
    }

    /// Iterate the well-formed rows through the named view
    pub fn iter(&self) -> impl Iterator<Item = TagRef<'_>> {
        self.0.iter().filter_map(|row| TagRef::parse(row))
    }

    /// Whether any row is named `name`, regardless of its values
    pub fn has_name(&self, name: &str) -> bool {
        self.iter().any(|tag| tag.name == name)
    }

    /// Whether any row is exactly `[name, value, ..]`
    pub fn has_value(&self, name: &str, value: &str) -> bool {
        self.iter().any(|tag| tag.is(name, value))
    }

    /// Raw rows
    pub fn as_rows(&self) -> &[Vec<String>] {
        &self.0
    }
}

impl From<Vec<Vec<String>>> for Tags {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self(rows)
    }
}

impl From<Tags> for Vec<Vec<String>> {
    fn from(tags: Tags) -> Self {
        tags.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_view() {
        let row = vec!["e".to_string(), "abc".to_string(), "wss://r".to_string()];
        let tag = TagRef::parse(&row).unwrap();
        assert_eq!(tag.name, "e");
        assert_eq!(tag.value, Some("abc"));
        assert_eq!(tag.extra, &["wss://r".to_string()]);
    }

    #[test]
    fn test_parse_malformed_rows() {
        assert!(TagRef::parse(&[]).is_none());

        let row = vec!["h".to_string()];
        let tag = TagRef::parse(&row).unwrap();
        assert_eq!(tag.name, "h");
        assert_eq!(tag.value, None);
        assert!(tag.extra.is_empty());
        assert!(!tag.is("h", ""));
        assert!(!tag.value_starts_with("h", ""));
    }

    #[test]
    fn test_predicates() {
        let tags = Tags::from_rows([
            vec!["t", "journal"],
            vec!["d", "lab-progress-42"],
            vec![],
        ]);
        assert_eq!(tags.len(), 3);
        assert!(tags.has_name("t"));
        assert!(!tags.has_name("h"));
        assert!(tags.has_value("t", "journal"));
        assert!(!tags.has_value("t", "journ"));
        assert_eq!(tags.iter().count(), 2);
    }

    #[test]
    fn test_wire_form() {
        let tags: Tags = serde_json::from_str(r#"[["h","morning-risers"],["p","abc","",""]]"#).unwrap();
        assert!(tags.has_value("h", "morning-risers"));
        assert_eq!(
            serde_json::to_string(&tags).unwrap(),
            r#"[["h","morning-risers"],["p","abc","",""]]"#
        );
    }
}
