use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::{IngestError, IngestResult};

/// A loosely-typed cell value.
///
/// A field that is absent from a record has no `Scalar` at all; see
/// [`Record::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Convert a JSON value into a scalar. Booleans become text, arrays and
    /// objects are rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Text(b.to_string())),
            Value::Number(n) => n.as_f64().map(Scalar::Number),
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Canonical text form, used for grouping keys, labels and numeric
    /// stripping.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Number(n) => number_text(*n),
            Scalar::Text(s) => s.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<usize> for Scalar {
    fn from(n: usize) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            // Whole numbers go out as integers so counts read as `3`, not `3.0`
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serializer.serialize_i64(*n as i64)
            }
            Scalar::Number(n) => serializer.serialize_f64(*n),
            Scalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Shortest round-trip decimal, switching to exponent notation outside
/// `[1e-6, 1e21)`.
fn number_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // also covers -0
        return "0".to_string();
    }

    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        }
    } else {
        n.to_string()
    }
}

/// One row of a dataset: field names mapped to scalars, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for literals in tests and examples.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field. Replacing keeps the original position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Scalar>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// `None` means the field is missing from this record.
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Scalar> {
        self.fields.iter_mut().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a Record from a JSON object
    pub fn from_json_object(obj: &serde_json::Map<String, Value>) -> IngestResult<Self> {
        let mut record = Record::new();
        for (key, value) in obj {
            let scalar = Scalar::from_json(value)
                .ok_or_else(|| IngestError::UnsupportedValue { field: key.clone() })?;
            record.insert(key.clone(), scalar);
        }
        Ok(record)
    }
}

impl<K: Into<String>> FromIterator<(K, Scalar)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Scalar)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// An ordered sequence of records. Field sets may differ between records.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn extend(&mut self, other: Dataset) {
        self.records.extend(other.records);
    }

    /// Field names in the first record's own key order.
    pub fn field_names(&self) -> Vec<String> {
        self.records
            .first()
            .map(|r| r.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Create a Dataset from a JSON array of objects. A lone object becomes a
    /// single-record dataset.
    pub fn from_json(value: &Value) -> IngestResult<Self> {
        match value {
            Value::Array(items) => Self::from_json_rows(items),
            Value::Object(obj) => Ok(Self {
                records: vec![Record::from_json_object(obj)?],
            }),
            other => Err(IngestError::NotTabular {
                found: json_kind(other),
            }),
        }
    }

    /// Create a Dataset from a slice of JSON objects
    pub fn from_json_rows(items: &[Value]) -> IngestResult<Self> {
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let obj = item.as_object().ok_or(IngestError::NotTabular {
                found: json_kind(item),
            })?;
            records.push(Record::from_json_object(obj)?);
        }
        Ok(Self { records })
    }

    /// Turn numeric-looking text cells into numbers across every record.
    pub fn coerce_numbers(&mut self) {
        for record in &mut self.records {
            crate::ingest::coerce_record(record);
        }
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
