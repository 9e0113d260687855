//! YAML front matter parsing.
//!
//! A source file may start with a front matter block:
//!
//! ```text
//! ---
//! title: Installing
//! navigation:
//!   priority: 10
//! ---
//!
//! # Body
//! ```
//!
//! The block is parsed into an ordered YAML mapping. Values are read through
//! typed accessors that accept dot-notation keys (`navigation.priority`).

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::error::ParseError;

/// Front matter delimiter line.
const DELIMITER: &str = "---";

/// Parsed source document: front matter plus body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrontMatterDocument {
    matter: Mapping,
    body: String,
    body_offset: usize,
}

impl FrontMatterDocument {
    /// Create a document from parts.
    #[must_use]
    pub fn new(matter: Mapping, body: impl Into<String>) -> Self {
        Self {
            matter,
            body: body.into(),
            body_offset: 0,
        }
    }

    /// Create a document without front matter.
    ///
    /// Used for kinds whose sources are not scanned for a front matter block.
    #[must_use]
    pub fn from_body(raw: &str) -> Self {
        Self::new(Mapping::new(), raw.replace("\r\n", "\n").trim_end())
    }

    /// Parse raw source text.
    ///
    /// Line endings are normalized to `\n` and trailing whitespace is trimmed
    /// from the body. Blank lines between the closing delimiter and the body
    /// are dropped. A file without a complete delimiter pair has no front
    /// matter.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the block is not valid YAML or its top level
    /// is not a mapping. The error line is relative to the source file.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let text = raw.replace("\r\n", "\n");
        let Some((yaml, rest)) = split_front_matter(&text) else {
            return Ok(Self::new(Mapping::new(), text.trim_end()));
        };

        let matter = parse_matter(yaml)?;
        let body = skip_blank_lines(rest);
        let body_offset = text[..text.len() - body.len()].matches('\n').count();
        Ok(Self {
            body_offset,
            ..Self::new(matter, body.trim_end())
        })
    }

    /// Write the document back to source form.
    ///
    /// Produces `---\n<yaml>---\n\n<body>`. The block is omitted when the
    /// matter is empty, unless the body itself starts with a delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the matter cannot be emitted as YAML.
    pub fn serialize(&self) -> Result<String, ParseError> {
        if self.matter.is_empty() && !self.body.starts_with(DELIMITER) {
            return Ok(self.body.clone());
        }
        let yaml = serde_yaml::to_string(&self.matter)
            .map_err(|e| ParseError::front_matter(None, e.to_string()))?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n{}", self.body))
    }

    /// Front matter mapping (empty when the source had none).
    #[must_use]
    pub fn matter(&self) -> &Mapping {
        &self.matter
    }

    /// Document body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Number of source lines before the first body line.
    ///
    /// Covers the front matter block and the blank lines after it, so
    /// `body_offset + n` is the file line of body line `n`.
    #[must_use]
    pub fn body_offset(&self) -> usize {
        self.body_offset
    }

    /// Split into matter and body.
    #[must_use]
    pub fn into_parts(self) -> (Mapping, String) {
        (self.matter, self.body)
    }

    /// Raw value for `key`.
    ///
    /// A key present verbatim at the top level wins; otherwise dots descend
    /// into nested mappings.
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        lookup(&self.matter, key)
    }

    /// Whether `key` is set (a YAML `null` counts as unset).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get_value(key).is_some_and(|v| !v.is_null())
    }

    /// Typed value for `key`, `None` if missing or of another type.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key)?;
        serde_yaml::from_value(value.clone()).ok()
    }

    /// Typed value for `key`, or `default`.
    #[must_use]
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// String value for `key`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get_value(key).and_then(Value::as_str)
    }

    /// Scalar value for `key` as text.
    ///
    /// Strings are returned as written; numbers and booleans are formatted,
    /// so `title: 2024` reads as `"2024"`. Sequences, mappings and `null`
    /// yield `None`.
    #[must_use]
    pub fn get_scalar(&self, key: &str) -> Option<String> {
        match self.get_value(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Boolean value for `key`.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_value(key).and_then(Value::as_bool)
    }

    /// Integer value for `key`.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_value(key).and_then(Value::as_i64)
    }
}

/// Look up a dot-notation key in a mapping.
fn lookup<'a>(matter: &'a Mapping, key: &str) -> Option<&'a Value> {
    if let Some(value) = matter.get(key) {
        return Some(value);
    }
    let (head, tail) = key.split_once('.')?;
    match matter.get(head)? {
        Value::Mapping(nested) => lookup(nested, tail),
        _ => None,
    }
}

/// Split text into (yaml, rest) when it starts with a delimited block.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let after_open = text.strip_prefix("---\n")?;
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some((&after_open[..offset], &after_open[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse the YAML between the delimiters into a mapping.
fn parse_matter(yaml: &str) -> Result<Mapping, ParseError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    // +1: the opening delimiter occupies line 1 of the file
    let value: Value = serde_yaml::from_str(yaml).map_err(|e| {
        let line = e.location().map(|loc| loc.line() + 1);
        ParseError::front_matter(line, e.to_string())
    })?;
    match value {
        Value::Mapping(matter) => Ok(matter),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ParseError::front_matter(
            Some(2),
            "front matter must be a mapping of keys to values",
        )),
    }
}

/// Drop whitespace-only lines at the start of `text`.
fn skip_blank_lines(mut text: &str) -> &str {
    while let Some(end) = text.find('\n') {
        if !text[..end].trim().is_empty() {
            return text;
        }
        text = &text[end + 1..];
    }
    text
}
