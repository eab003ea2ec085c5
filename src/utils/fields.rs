use serde_json::Value;

use crate::store::Fields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Newline,
}

impl Delimiter {
    fn split<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Comma => raw.split(',').map(str::trim).collect(),
            Delimiter::Newline => raw.lines().map(strip_bullet).collect(),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn text(fields: &Fields, key: &str) -> String {
    optional_text(fields, key).unwrap_or_default()
}

pub fn optional_text(fields: &Fields, key: &str) -> Option<String> {
    let value = fields.get(key)?;
    let text = match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            parts.join(", ")
        }
        other => scalar_text(other)?,
    };
    (!text.is_empty()).then_some(text)
}

/// Accepts either a JSON array or a delimited string. Blank entries are dropped,
/// and so are bullet markers on newline-separated lists.
pub fn string_list(fields: &Fields, key: &str, delimiter: Delimiter) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .filter(|item| !item.is_empty())
            .collect(),
        Some(Value::String(raw)) => delimiter
            .split(raw)
            .into_iter()
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

pub fn optional_list(fields: &Fields, key: &str, delimiter: Delimiter) -> Option<Vec<String>> {
    let items = string_list(fields, key, delimiter);
    (!items.is_empty()).then_some(items)
}

fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim();
    for marker in ["- ", "• ", "* ", "·"] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return rest.trim();
        }
    }
    trimmed
}
