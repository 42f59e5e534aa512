use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::document::Element;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkerError {
    #[error("empty marker in {0:?}")]
    Empty(String),
    #[error("unclosed attribute selector in {0:?}")]
    UnclosedAttribute(String),
    #[error("unexpected character {found:?} in {marker:?}")]
    Unexpected { marker: String, found: char },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Exists,
    Equals(String),
    Contains(String),
}

/// A compound selector: optional tag, classes and attribute tests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Marker {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, AttrMatch)>,
}

impl Marker {
    pub fn class(class: &str) -> Self {
        Self {
            classes: vec![class.to_string()],
            ..Self::default()
        }
    }

    pub fn tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_ascii_lowercase()),
            ..Self::default()
        }
    }

    pub fn attr_eq(name: &str, value: &str) -> Self {
        Self::default().and_attr_eq(name, value)
    }

    pub fn attr_contains(name: &str, part: &str) -> Self {
        Self {
            attrs: vec![(name.to_string(), AttrMatch::Contains(part.to_string()))],
            ..Self::default()
        }
    }

    pub fn and_attr_eq(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .push((name.to_string(), AttrMatch::Equals(value.to_string())));
        self
    }

    pub fn matches(&self, el: &Element) -> bool {
        if self.tag.as_ref().is_some_and(|tag| *tag != el.tag) {
            return false;
        }
        if !self.classes.iter().all(|class| el.has_class(class)) {
            return false;
        }
        self.attrs.iter().all(|(name, test)| match (el.attr(name), test) {
            (None, _) => false,
            (Some(_), AttrMatch::Exists) => true,
            (Some(value), AttrMatch::Equals(expected)) => value == expected,
            (Some(value), AttrMatch::Contains(part)) => value.contains(part.as_str()),
        })
    }

    fn parse(source: &str) -> Result<Self, MarkerError> {
        let unexpected = |found| MarkerError::Unexpected {
            marker: source.to_string(),
            found,
        };
        let mut marker = Marker::default();
        let mut rest = source;

        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '*'))
            .unwrap_or(rest.len());
        let tag = &rest[..tag_len];
        if !tag.is_empty() && tag != "*" {
            marker.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_len..];

        while let Some(c) = rest.chars().next() {
            match c {
                '.' => {
                    let body = &rest[1..];
                    let len = body.find(['.', '[']).unwrap_or(body.len());
                    let class = &body[..len];
                    if class.is_empty() {
                        return Err(MarkerError::Empty(source.to_string()));
                    }
                    if let Some(bad) = class.chars().find(|c| c.is_whitespace()) {
                        return Err(unexpected(bad));
                    }
                    marker.classes.push(class.to_string());
                    rest = &body[len..];
                }
                '[' => {
                    let close = rest
                        .find(']')
                        .ok_or_else(|| MarkerError::UnclosedAttribute(source.to_string()))?;
                    marker.attrs.push(parse_attr(&rest[1..close], source)?);
                    rest = &rest[close + 1..];
                }
                other => return Err(unexpected(other)),
            }
        }

        if marker == Marker::default() {
            return Err(MarkerError::Empty(source.to_string()));
        }
        Ok(marker)
    }
}

fn parse_attr(body: &str, source: &str) -> Result<(String, AttrMatch), MarkerError> {
    let (name, test) = if let Some((name, value)) = body.split_once("*=") {
        (name, AttrMatch::Contains(unquote(value).to_string()))
    } else if let Some((name, value)) = body.split_once('=') {
        (name, AttrMatch::Equals(unquote(value).to_string()))
    } else {
        (body, AttrMatch::Exists)
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(MarkerError::Empty(source.to_string()));
    }
    Ok((name.to_ascii_lowercase(), test))
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

/// One or more alternative markers; matches when any of them does.
///
/// Parsed from comma-separated selectors like `input[type=checkbox], [role=checkbox]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct MarkerSet {
    markers: Vec<Marker>,
    source: String,
}

impl MarkerSet {
    /// A set matching any of `markers`.
    pub fn any(markers: impl IntoIterator<Item = Marker>) -> Self {
        let markers: Vec<Marker> = markers.into_iter().collect();
        let source = markers
            .iter()
            .map(Marker::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self { markers, source }
    }

    pub fn matches(&self, el: &Element) -> bool {
        self.markers.iter().any(|marker| marker.matches(el))
    }
}

impl From<Marker> for MarkerSet {
    fn from(marker: Marker) -> Self {
        Self {
            source: marker.to_string(),
            markers: vec![marker],
        }
    }
}

impl FromStr for MarkerSet {
    type Err = MarkerError;

    fn from_str(source: &str) -> Result<Self, MarkerError> {
        let markers = split_alternatives(source)
            .into_iter()
            .map(|part| Marker::parse(part.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            markers,
            source: source.trim().to_string(),
        })
    }
}

/// Split on commas that sit outside attribute brackets and quotes.
fn split_alternatives(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;
    let mut quote = None;
    for (i, c) in source.char_indices() {
        match (c, quote) {
            ('"' | '\'', None) if in_brackets => quote = Some(c),
            (c, Some(open)) if c == open => quote = None,
            (_, Some(_)) => {}
            ('[', None) => in_brackets = true,
            (']', None) => in_brackets = false,
            (',', None) if !in_brackets => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

impl TryFrom<String> for MarkerSet {
    type Error = MarkerError;

    fn try_from(source: String) -> Result<Self, MarkerError> {
        source.parse()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for (name, test) in &self.attrs {
            match test {
                AttrMatch::Exists => write!(f, "[{name}]")?,
                AttrMatch::Equals(value) => write!(f, "[{name}={value}]")?,
                AttrMatch::Contains(part) => write!(f, "[{name}*={part}]")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for MarkerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
