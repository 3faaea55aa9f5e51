//! Lightweight parsing of the header block at the top of mode documents.
//!
//! Mode documents may open with a `---` delimited header carrying flat
//! `key: value` pairs. The dialect is deliberately small: scalars, one-line
//! `[a, b]` arrays, `#` comment lines, and nothing else. There are no nested
//! maps, multi-line scalars, or anchors; documents that need them are outside
//! this format rather than something to parse leniently.
//!
//! Extraction never fails. A document without a well-formed header is
//! returned untouched, and header lines that do not fit the grammar are
//! dropped.

use std::collections::BTreeMap;

const MARKER_OPEN: &str = "---\n";
const MARKER_CLOSE: &str = "\n---\n";

#[derive(Debug, Clone, PartialEq, Eq)]
/// A header value: either a scalar string or a one-line array of strings.
pub enum HeaderValue {
    Scalar(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Flat key/value map parsed from a header block.
///
/// Repeated keys keep the last value seen. That matches what authors of the
/// existing mode files expect and is preserved even though strict YAML would
/// reject the document.
pub struct FrontMatter {
    fields: BTreeMap<String, HeaderValue>,
}

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.fields.get(key)
    }

    /// Scalar value for `key`; `None` when missing or when the key holds an array.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(HeaderValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    /// Array value for `key`; `None` when missing or when the key holds a scalar.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.fields.get(key) {
            Some(HeaderValue::List(items)) => Some(items),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: HeaderValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split `content` into its parsed header and the remaining body.
///
/// The header must start at byte zero with a `---` line and end at the first
/// following `---` line that is itself terminated by a newline. Both marker
/// lines and the closing newline are removed; the body is otherwise returned
/// exactly as written.
pub fn parse_front_matter(content: &str) -> (FrontMatter, &str) {
    let Some(rest) = content.strip_prefix(MARKER_OPEN) else {
        return (FrontMatter::default(), content);
    };
    let Some(end) = rest.find(MARKER_CLOSE) else {
        return (FrontMatter::default(), content);
    };
    let header = &rest[..end];
    let body = &rest[end + MARKER_CLOSE.len()..];
    (parse_header(header), body)
}

/// Parse the lines between the header markers.
pub fn parse_header(header: &str) -> FrontMatter {
    let mut front_matter = FrontMatter::default();
    for raw_line in header.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        front_matter.insert(key.trim(), parse_value(value.trim()));
    }
    front_matter
}

fn parse_value(value: &str) -> HeaderValue {
    if let Some(inner) = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        let items = inner
            .split(',')
            .map(str::trim)
            // Emptiness is checked before unquoting, so `""` survives as an
            // empty entry while `[a, , b]` collapses to two.
            .filter(|item| !item.is_empty())
            .map(|item| strip_quotes(item).to_string())
            .collect();
        return HeaderValue::List(items);
    }
    HeaderValue::Scalar(strip_quotes(value).to_string())
}

/// Remove one layer of matching double or single quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
