//! `{field}` placeholder substitution for popup strings.
//!
//! A template carries at most one marker of the form `{identifier}`. The
//! first marker found is replaced by the matching feature property; any
//! later markers are left as literal text.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    fmt::Display,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What to substitute when a marker names a property the feature lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPropertyPolicy {
    /// Fail with [`TemplateError::MissingProperty`].
    Error,
    /// Substitute an empty string.
    #[default]
    Blank,
}

/// Errors produced while filling a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// The marker's identifier is not present in the property bag.
    #[error("template references missing property `{name}`")]
    MissingProperty {
        /// Identifier found between the braces.
        name: String,
    },
}

/// Read-only string lookup over a feature's attributes.
pub trait PropertyBag {
    /// Returns the display form of `key`, or `None` when absent.
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl PropertyBag for serde_json::Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(value_to_text)
    }
}

impl<V: Display> PropertyBag for HashMap<String, V> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|value| Cow::Owned(value.to_string()))
    }
}

impl<V: Display> PropertyBag for BTreeMap<String, V> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|value| Cow::Owned(value.to_string()))
    }
}

impl<T: PropertyBag + ?Sized> PropertyBag for &T {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).lookup(key)
    }
}

/// String form of a GeoJSON property value.
///
/// Strings are used as-is and `null` becomes empty. Numbers print the way
/// a browser prints them, so integral floats drop their `.0`. Booleans,
/// arrays and objects use their compact JSON text.
pub fn value_to_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        Value::Null => Cow::Borrowed(""),
        Value::Number(number) => Cow::Owned(number_to_text(number)),
        other => Cow::Owned(other.to_string()),
    }
}

// Integral floats below 1e21 print without exponent or fraction in JS.
const JS_EXPONENT_THRESHOLD: f64 = 1e21;

fn number_to_text(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(float) if float == 0.0 => "0".to_string(),
        Some(float)
            if float.is_finite() && float.fract() == 0.0 && float.abs() < JS_EXPONENT_THRESHOLD =>
        {
            format!("{float:.0}")
        },
        _ => number.to_string(),
    }
}

// Characters that end a marker, matching a JS `.` that stops at line breaks.
const MARKER_STOPS: [char; 6] = ['{', '}', '\n', '\r', '\u{2028}', '\u{2029}'];

/// Location of a `{identifier}` marker inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Text between the braces.
    pub name: &'a str,
    /// Byte offset of the opening brace.
    pub start: usize,
    /// Byte offset one past the closing brace.
    pub end: usize,
}

/// Finds the first `{...}` region with no brace or line break inside it.
///
/// Unbalanced braces never match.
pub fn find_placeholder(template: &str) -> Option<Placeholder<'_>> {
    let mut offset = 0;
    while let Some(rel) = template[offset..].find('{') {
        let open = offset + rel;
        let rest = &template[open + 1..];
        match rest.find(MARKER_STOPS) {
            Some(idx) if rest.as_bytes()[idx] == b'}' => {
                return Some(Placeholder {
                    name: &rest[..idx],
                    start: open,
                    end: open + idx + 2,
                });
            },
            // Resume the search at the inner `{` or the line break.
            Some(idx) => offset = open + 1 + idx,
            None => return None,
        }
    }
    None
}

/// Every marker identifier in `template`, in order of appearance.
pub fn placeholder_names(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut offset = 0;
    while let Some(marker) = find_placeholder(&template[offset..]) {
        names.push(marker.name);
        offset += marker.end;
    }
    names
}

/// Fills the first marker of `template`, failing on a missing property.
pub fn interpolate<B>(template: &str, properties: &B) -> Result<String, TemplateError>
where
    B: PropertyBag + ?Sized,
{
    interpolate_with(template, properties, MissingPropertyPolicy::Error)
}

/// Fills the first marker of `template`, resolving absent properties with
/// `policy`. A template without a marker is returned unchanged.
pub fn interpolate_with<B>(
    template: &str,
    properties: &B,
    policy: MissingPropertyPolicy,
) -> Result<String, TemplateError>
where
    B: PropertyBag + ?Sized,
{
    let Some(marker) = find_placeholder(template) else {
        return Ok(template.to_owned());
    };

    let value = match properties.lookup(marker.name) {
        Some(value) => value,
        None => match policy {
            MissingPropertyPolicy::Error => {
                return Err(TemplateError::MissingProperty {
                    name: marker.name.to_owned(),
                })
            },
            MissingPropertyPolicy::Blank => {
                tracing::warn!(property = marker.name, "template references a missing property");
                Cow::Borrowed("")
            },
        },
    };

    tracing::debug!(property = marker.name, value = %value, "filled template marker");

    let mut filled =
        String::with_capacity(template.len() - (marker.end - marker.start) + value.len());
    filled.push_str(&template[..marker.start]);
    filled.push_str(&value);
    filled.push_str(&template[marker.end..]);
    Ok(filled)
}
