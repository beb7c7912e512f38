//! Turning content handed over by a content source into a [`Dataset`].
//!
//! Content arrives in a few shapes: ready-made row arrays, content items
//! carrying `parsed_rows` or a raw model reply in `model_raw`, and free text
//! with JSON buried in prose or a code fence.

use std::io::Read;

use serde_json::Value;
use tracing::debug;

use crate::data::{Dataset, Record, Scalar};
use crate::error::{IngestError, IngestResult};
use crate::parser::{find_fenced_block, plain_decimal};

/// Read all of `reader` as UTF-8 text.
pub fn read_text<R: Read>(mut reader: R) -> IngestResult<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// Read one strict JSON document from `reader`.
pub fn read_json<R: Read>(reader: R) -> IngestResult<Value> {
    Ok(serde_json::from_reader(reader)?)
}

/// Find the first JSON value in arbitrary text.
///
/// Tries, in order: the whole trimmed text, the body of the first code
/// fence, and progressively shorter slices starting at the first `{` or `[`.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    if let Some(body) = find_fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str(body) {
            debug!("Extracted JSON from code fence");
            return Some(value);
        }
    }

    let start = trimmed.find(|c: char| c == '{' || c == '[')?;
    let candidate = &trimmed[start..];
    // a value starting with { or [ can only end with } or ]
    let ends = candidate
        .char_indices()
        .filter(|(_, c)| *c == '}' || *c == ']')
        .map(|(idx, c)| idx + c.len_utf8());
    for end in ends.collect::<Vec<_>>().into_iter().rev() {
        if let Ok(value) = serde_json::from_str(&candidate[..end]) {
            debug!(offset = start, len = end, "Extracted JSON by scanning");
            return Some(value);
        }
    }

    None
}

/// Parse raw pasted or generated content into a dataset. An object wrapping
/// a `rows` array is unwrapped; any other object is a single row.
pub fn parse_raw_content(text: &str) -> IngestResult<Dataset> {
    let value = extract_json(text).ok_or(IngestError::NoJson)?;
    match value.get("rows").and_then(Value::as_array) {
        Some(rows) => Dataset::from_json_rows(rows),
        _ => Dataset::from_json(&value),
    }
}

/// Replace text values that are plain decimal literals (`"42"`, `"-3.5"`)
/// with numbers. Decorated values such as `"$10"` stay text.
pub fn coerce_record(record: &mut Record) {
    for value in record.values_mut() {
        if let Scalar::Text(text) = value {
            if let Some(n) = plain_decimal(text) {
                *value = Scalar::Number(n);
            }
        }
    }
}

/// Rows of one stored content item.
///
/// `parsed_rows` wins when it is a non-empty array. Otherwise `model_raw` is
/// searched for JSON, which may be a row array or an object with a `rows`
/// array. Anything else yields no rows.
pub fn rows_from_content(content: &Value) -> IngestResult<Dataset> {
    if let Some(rows) = content.get("parsed_rows").and_then(Value::as_array) {
        if !rows.is_empty() {
            return Dataset::from_json_rows(rows);
        }
    }

    let raw = content.get("model_raw").and_then(Value::as_str).unwrap_or_default();
    match extract_json(raw) {
        Some(Value::Array(rows)) => Dataset::from_json_rows(&rows),
        Some(Value::Object(obj)) => match obj.get("rows").and_then(Value::as_array) {
            Some(rows) => Dataset::from_json_rows(rows),
            None => Ok(Dataset::default()),
        },
        _ => Ok(Dataset::default()),
    }
}

/// Collect the rows of a selection: either several content items whose
/// `rows` are concatenated in order, or one item with a `rows` array.
pub fn merge_selection(selection: &Value) -> IngestResult<Dataset> {
    match selection {
        Value::Array(items) => {
            let mut merged = Dataset::default();
            for rows in items.iter().filter_map(|item| item.get("rows").and_then(Value::as_array)) {
                merged.extend(Dataset::from_json_rows(rows)?);
            }
            if merged.is_empty() {
                return Err(IngestError::NothingToVisualize);
            }
            debug!(items = items.len(), rows = merged.len(), "Merged selection");
            Ok(merged)
        }
        Value::Object(obj) => match obj.get("rows").and_then(Value::as_array) {
            Some(rows) => Dataset::from_json_rows(rows),
            None => Err(IngestError::NothingToVisualize),
        },
        _ => Err(IngestError::NothingToVisualize),
    }
}
