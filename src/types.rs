//! Core data model for loaded alert datasets.
//!
//! A load produces an [`AlertTable`]: an ordered list of schema-less [`AlertRecord`]s whose
//! values are [`AlertValue`] trees. Parquet loads additionally attach the file's declared
//! [`Schema`].

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Declared logical type of a top-level column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// Boolean.
    Bool,
    /// Signed or unsigned integer of at most 32 bits, or a signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32- or 64-bit floating point number.
    Float64,
    /// UTF-8 string (also JSON and enum annotated byte arrays).
    Utf8,
    /// Raw bytes.
    Binary,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Instant in time.
    Timestamp,
    /// Fixed-point decimal.
    Decimal { precision: i32, scale: i32 },
    /// Repeated values.
    List,
    /// Nested group of named fields.
    Struct,
    /// Key/value map.
    Map,
}

/// A single named, typed column in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Declared column type.
    pub data_type: DataType,
    /// Whether the column may hold nulls.
    pub nullable: bool,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

/// Ordered list of declared columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single decoded value.
///
/// Integers are normalized the same way for both encodings: anything that fits in `i64` is
/// [`AlertValue::Int64`]; only larger unsigned values use [`AlertValue::UInt64`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AlertValue {
    /// Missing value or explicit JSON `null`.
    Null,
    Bool(bool),
    Int64(i64),
    /// Unsigned integer above `i64::MAX`.
    UInt64(u64),
    Float64(f64),
    Utf8(String),
    Binary(Vec<u8>),
    /// Days since 1970-01-01.
    Date(i32),
    /// Microseconds since 1970-01-01T00:00:00Z.
    Timestamp(i64),
    List(Vec<AlertValue>),
    Map(AlertRecord),
}

impl AlertValue {
    /// Returns `true` for [`AlertValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice for [`AlertValue::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the integer for [`AlertValue::Int64`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the nested record for [`AlertValue::Map`].
    pub fn as_map(&self) -> Option<&AlertRecord> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for AlertValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int64(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt64(u)
                } else {
                    n.as_f64().map_or(Self::Null, Self::Float64)
                }
            }
            serde_json::Value::String(s) => Self::Utf8(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Map(AlertRecord::from(map)),
        }
    }
}

impl From<&str> for AlertValue {
    fn from(s: &str) -> Self {
        Self::Utf8(s.to_string())
    }
}

impl From<String> for AlertValue {
    fn from(s: String) -> Self {
        Self::Utf8(s)
    }
}

impl From<i64> for AlertValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for AlertValue {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<bool> for AlertValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// One decoded record: field name -> value.
///
/// Equality is per field; the order fields appeared in the source is not significant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AlertRecord {
    fields: BTreeMap<String, AlertValue>,
}

impl AlertRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a top-level field.
    pub fn get(&self, name: &str) -> Option<&AlertValue> {
        self.fields.get(name)
    }

    /// Returns a value by dot path (e.g. `info.severity`), descending through nested maps.
    ///
    /// A top-level key that itself contains dots wins over path traversal.
    pub fn get_path(&self, path: &str) -> Option<&AlertValue> {
        if let Some(v) = self.fields.get(path) {
            return Some(v);
        }

        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            match current {
                AlertValue::Map(inner) => current = inner.fields.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Returns `true` if the record has a top-level field `name` (even an explicit null).
    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(name, value)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AlertValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: AlertValue) {
        self.fields.insert(name.into(), value);
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for AlertRecord {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, AlertValue::from(v))).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for AlertRecord
where
    K: Into<String>,
    V: Into<AlertValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// In-memory alert dataset: records in source order, plus the declared schema when the source
/// format has one.
///
/// Tables are read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertTable {
    schema: Option<Schema>,
    records: Vec<AlertRecord>,
}

impl AlertTable {
    /// Create a table without a declared schema.
    pub fn new(records: Vec<AlertRecord>) -> Self {
        Self {
            schema: None,
            records,
        }
    }

    /// Create a table with a declared schema.
    pub fn with_schema(schema: Schema, records: Vec<AlertRecord>) -> Self {
        Self {
            schema: Some(schema),
            records,
        }
    }

    /// Concatenate tables in order.
    ///
    /// The result keeps a schema only if every input declares the same one.
    pub fn concat(tables: impl IntoIterator<Item = AlertTable>) -> Self {
        let mut schema: Option<Option<Schema>> = None;
        let mut records = Vec::new();
        for table in tables {
            schema = match schema {
                None => Some(table.schema),
                Some(Some(s)) if table.schema.as_ref() == Some(&s) => Some(Some(s)),
                Some(_) => Some(None),
            };
            records.extend(table.records);
        }
        Self {
            schema: schema.flatten(),
            records,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Declared schema, if the source format carried one.
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Records in source order.
    pub fn records(&self) -> &[AlertRecord] {
        &self.records
    }

    /// Returns the record at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&AlertRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlertRecord> {
        self.records.iter()
    }

    /// Column names: the declared schema order when present, otherwise the sorted union of
    /// every record's keys.
    pub fn field_names(&self) -> Vec<String> {
        match &self.schema {
            Some(schema) => schema.field_names().map(str::to_string).collect(),
            None => self
                .records
                .iter()
                .flat_map(|r| r.field_names())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Consume the table, keeping only its records.
    pub fn into_records(self) -> Vec<AlertRecord> {
        self.records
    }
}

impl IntoIterator for AlertTable {
    type Item = AlertRecord;
    type IntoIter = std::vec::IntoIter<AlertRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a AlertTable {
    type Item = &'a AlertRecord;
    type IntoIter = std::slice::Iter<'a, AlertRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
