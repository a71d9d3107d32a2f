//! `{key}` placeholder expansion over a JSON input map.
//!
//! Placeholders name a top-level input key, optionally followed by attribute
//! (`.field`) and index (`[0]`) accessors. `{{` and `}}` render literal
//! braces. String values are inserted verbatim; every other JSON value is
//! rendered as compact JSON text.

use serde_json::{Map, Value};
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// Errors returned by [`format`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder names a key that is absent from the inputs.
    #[error("missing required input: '{key}'. Available inputs: {available:?}")]
    MissingInput {
        /// The placeholder key that could not be resolved.
        key: String,
        /// Every key present in the inputs.
        available: Vec<String>,
    },

    /// The template is malformed or a nested accessor does not resolve.
    #[error("error formatting template: {0}")]
    Format(String),
}

impl TemplateError {
    fn format(reason: impl Into<String>) -> Self {
        Self::Format(reason.into())
    }
}

/// Expands every placeholder in `template` from `inputs`.
///
/// # Errors
///
/// Returns [`TemplateError::MissingInput`] when a placeholder names an absent
/// key and [`TemplateError::Format`] for any other failure.
pub fn format(template: &str, inputs: &Map<String, Value>) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(character) = chars.next() {
        match character {
            '{' if chars.next_if_eq(&'{').is_some() => output.push('{'),
            '{' => {
                let field = read_field(&mut chars)?;
                render_into(&mut output, resolve(&field, inputs)?);
            }
            '}' if chars.next_if_eq(&'}').is_some() => output.push('}'),
            '}' => {
                return Err(TemplateError::format(
                    "single '}' encountered in format string",
                ));
            }
            other => output.push(other),
        }
    }

    Ok(output)
}

fn read_field(chars: &mut Peekable<Chars<'_>>) -> Result<String, TemplateError> {
    let mut field = String::new();
    for character in chars.by_ref() {
        match character {
            '}' => return Ok(field),
            '{' => {
                return Err(TemplateError::format(
                    "unexpected '{' in field name",
                ));
            }
            other => field.push(other),
        }
    }
    Err(TemplateError::format(
        "single '{' encountered in format string",
    ))
}

fn resolve<'a>(field: &str, inputs: &'a Map<String, Value>) -> Result<&'a Value, TemplateError> {
    if field.contains(['!', ':']) {
        return Err(TemplateError::format(format!(
            "conversion and format specifiers are not supported: '{{{field}}}'"
        )));
    }

    let key_end = field.find(['.', '[']).unwrap_or(field.len());
    let (key, accessors) = field.split_at(key_end);

    if key.is_empty() || key.chars().all(|character| character.is_ascii_digit()) {
        return Err(TemplateError::format(format!(
            "positional fields are not supported: '{{{field}}}'"
        )));
    }

    let root = inputs.get(key).ok_or_else(|| TemplateError::MissingInput {
        key: key.to_owned(),
        available: inputs.keys().cloned().collect(),
    })?;

    walk(root, accessors, field)
}

fn walk<'a>(root: &'a Value, accessors: &str, field: &str) -> Result<&'a Value, TemplateError> {
    let unresolved = || TemplateError::format(format!("cannot resolve '{{{field}}}'"));
    let mut current = root;
    let mut rest = accessors;

    while let Some(first) = rest.chars().next() {
        let mut remaining = rest.chars();
        remaining.next();
        let tail = remaining.as_str();
        let (segment, remainder) = match first {
            '.' => {
                let end = tail.find(['.', '[']).unwrap_or(tail.len());
                tail.split_at(end)
            }
            '[' => {
                let end = tail.find(']').ok_or_else(|| {
                    TemplateError::format(format!("missing ']' in field '{{{field}}}'"))
                })?;
                let (inner, after) = tail.split_at(end);
                (inner, after.strip_prefix(']').unwrap_or(after))
            }
            _ => {
                return Err(TemplateError::format(format!(
                    "only '.' or '[' may follow ']' in field '{{{field}}}'"
                )));
            }
        };

        if segment.is_empty() {
            return Err(TemplateError::format(format!(
                "empty accessor in field '{{{field}}}'"
            )));
        }

        current = match current {
            Value::Object(object) => object.get(segment),
            Value::Array(items) if first == '[' => segment
                .parse::<usize>()
                .ok()
                .and_then(|position| items.get(position)),
            _ => None,
        }
        .ok_or_else(unresolved)?;
        rest = remainder;
    }

    Ok(current)
}

fn render_into(output: &mut String, value: &Value) {
    match value {
        Value::String(text) => output.push_str(text),
        other => output.push_str(&other.to_string()),
    }
}
