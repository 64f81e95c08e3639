use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub use configs::{INDEX_COLUMN, NAME_COLUMN};

/// Incoming JSON object for add/update requests.
pub type Payload = Map<String, Value>;

/// One artist row: column name -> cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn artist_name(&self) -> Option<&str> { self.get(NAME_COLUMN) }

    /// Case-insensitive match on `Artist Name`; records without one never match.
    pub fn has_name(&self, name: &str) -> bool {
        self.artist_name().is_some_and(|n| names_match(n, name))
    }

    /// `Index` parsed as an integer. Missing or non-numeric cells are `Malformed`.
    pub fn parsed_index(&self) -> Result<i64, ServiceError> {
        let raw = self
            .get(INDEX_COLUMN)
            .ok_or_else(|| ServiceError::Malformed(format!("record without '{INDEX_COLUMN}'")))?;
        parse_index(raw).ok_or_else(|| {
            ServiceError::Malformed(format!("'{INDEX_COLUMN}' value '{raw}' is not an integer"))
        })
    }

    /// Build a record from a JSON object, rendering every value as text.
    pub fn from_payload(payload: &Payload) -> Self {
        payload.iter().map(|(k, v)| (k.clone(), field_text(v))).collect()
    }

    /// Overwrite fields already present on the record; unknown payload keys are ignored.
    /// `Index` is assigned on add and never overwritten here.
    /// Returns how many fields were written.
    pub fn apply_existing(&mut self, payload: &Payload) -> usize {
        let mut written = 0;
        for (key, value) in payload {
            if key == INDEX_COLUMN {
                continue;
            }
            if let Some(slot) = self.0.get_mut(key) {
                *slot = field_text(value);
                written += 1;
            }
        }
        written
    }

    /// Keep exactly `columns`, filling absent ones with empty text.
    pub(crate) fn conform(&mut self, columns: &[String]) {
        self.0.retain(|k, _| columns.contains(k));
        for c in columns {
            self.0.entry(c.clone()).or_default();
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Unicode-aware case-insensitive comparison of artist names.
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Text form of a JSON value as stored in a cell.
pub fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse a stored `Index` cell.
pub fn parse_index(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parse the `{n}` path segment of the by-index routes: non-negative decimal only.
pub fn parse_requested_index(segment: &str) -> Result<i64, ServiceError> {
    segment
        .parse::<u64>()
        .ok()
        .and_then(|n| i64::try_from(n).ok())
        .ok_or_else(|| ServiceError::Validation(format!("índice inválido: '{segment}'")))
}

/// The whole file in memory: header plus rows, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
    fixed_columns: bool,
}

impl Dataset {
    /// Open header: new keys on appended records extend it.
    pub fn with_columns(columns: Vec<String>) -> Self {
        let mut ds = Self::default();
        for c in columns {
            if !ds.columns.contains(&c) {
                ds.columns.push(c);
            }
        }
        ds
    }

    /// Declared header: records are trimmed/padded to exactly these columns.
    pub fn declared(columns: Vec<String>) -> Self {
        Self { fixed_columns: true, ..Self::with_columns(columns) }
    }

    /// Open header derived from the records' keys in first-appearance order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut ds = Self::default();
        for r in records {
            ds.push(r);
        }
        ds
    }

    pub fn columns(&self) -> &[String] { &self.columns }

    pub fn records(&self) -> &[Record] { &self.records }

    pub fn into_records(self) -> Vec<Record> { self.records }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Append a record, keeping the header consistent with it.
    pub fn push(&mut self, mut record: Record) -> &Record {
        if self.fixed_columns {
            record.conform(&self.columns);
        } else {
            for field in record.fields() {
                if !self.columns.iter().any(|c| c == field) {
                    self.columns.push(field.to_string());
                }
            }
        }
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.has_name(name))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// First record whose `Index` equals `index`. Scanning stops with `Malformed`
    /// at the first unparsable `Index` met before a match.
    pub fn find_by_index(&self, index: i64) -> Result<Option<&Record>, ServiceError> {
        Ok(self.position_by_index(index)?.map(|i| &self.records[i]))
    }

    fn position_by_index(&self, index: i64) -> Result<Option<usize>, ServiceError> {
        for (pos, record) in self.records.iter().enumerate() {
            if record.parsed_index()? == index {
                return Ok(Some(pos));
            }
        }
        Ok(None)
    }

    /// Apply `payload` to the first record named `name`.
    pub fn update_first_by_name(&mut self, name: &str, payload: &Payload) -> Option<&Record> {
        let record = self.records.iter_mut().find(|r| r.has_name(name))?;
        record.apply_existing(payload);
        Some(&*record)
    }

    /// Apply `payload` to the first record with `Index == index`.
    pub fn update_first_by_index(&mut self, index: i64, payload: &Payload) -> Result<Option<&Record>, ServiceError> {
        let Some(pos) = self.position_by_index(index)? else {
            return Ok(None);
        };
        let record = &mut self.records[pos];
        record.apply_existing(payload);
        Ok(Some(&*record))
    }

    /// Remove every record named `name`; returns how many were removed.
    pub fn delete_all_by_name(&mut self, name: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !r.has_name(name));
        before - self.records.len()
    }

    /// Remove every record with `Index == index`. Every `Index` must parse;
    /// otherwise nothing is removed and `Malformed` is returned.
    pub fn delete_all_by_index(&mut self, index: i64) -> Result<usize, ServiceError> {
        let keep = self
            .records
            .iter()
            .map(|r| r.parsed_index().map(|i| i != index))
            .collect::<Result<Vec<bool>, _>>()?;
        let before = self.records.len();
        let mut keep = keep.into_iter();
        self.records.retain(|_| keep.next().unwrap_or(true));
        Ok(before - self.records.len())
    }

    /// `1 + max(parsed Index)`, or 1 when no record has a parsable `Index`.
    pub fn next_index(&self) -> Result<i64, ServiceError> {
        match self.records.iter().filter_map(|r| r.get(INDEX_COLUMN).and_then(parse_index)).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| ServiceError::Malformed(format!("'{INDEX_COLUMN}' {max} cannot be incremented"))),
        }
    }
}
