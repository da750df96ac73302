//! Resource Store
//!
//! Generic CRUD and pagination engine backing every simulated resource
//! family. Records are JSON objects held in insertion order; a store is
//! parameterized at construction with its uniqueness-constraint fields, its
//! default-value projection table, and the collection URL used to build
//! `next` pagination links.
//!
//! All operations go through a single mutex per store: create is a
//! check-then-act sequence (uniqueness scan, then insert) that must be
//! atomic.

use crate::error::KongError;
use crate::filter::{filter_records, strip_defaults};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Mutex;
use url::Url;

/// Default page size of the emulated admin API
pub const DEFAULT_LIST_SIZE: usize = 100;

/// One page of a list response: `{data, total, next?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPage {
    /// Number of records matching the filter, across all pages
    #[serde(default)]
    pub total: u64,
    pub data: Vec<Value>,
    /// URL of the following page; absent on the final page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Extract the `size` and `offset` query parameters from a `next` link
pub fn next_page_params(next: &str) -> Option<(usize, String)> {
    let url = Url::parse(next).ok()?;
    let mut size = None;
    let mut offset = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "size" => size = value.parse().ok(),
            "offset" => offset = Some(value.into_owned()),
            _ => {}
        }
    }
    Some((size?, offset?))
}

/// Ordered, mutex-guarded collection of JSON records
pub struct ResourceStore {
    collection_url: String,
    unique_fields: Vec<String>,
    defaults: Map<String, Value>,
    records: Mutex<Vec<Value>>,
}

impl ResourceStore {
    /// Create an empty store.
    ///
    /// `collection_url` is the absolute URL of the collection (trailing
    /// slash included), used verbatim when building `next` links.
    pub fn new(collection_url: &str, unique_fields: &[&str], defaults: Map<String, Value>) -> Self {
        Self {
            collection_url: collection_url.to_string(),
            unique_fields: unique_fields.iter().map(|f| f.to_string()).collect(),
            defaults,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Insert a new record and return it with projection applied.
    ///
    /// The record must not carry an `id`: the store assigns a fresh UUID.
    /// Every uniqueness field is checked against existing records and all
    /// collisions are reported together in a single `Conflict`.
    pub fn create(&self, record: Value) -> Result<Value, KongError> {
        let Value::Object(mut fields) = record else {
            return Err(KongError::Validation("record must be a JSON object".into()));
        };
        if fields.contains_key("id") {
            return Err(KongError::Validation(
                "id is assigned by the server and must not be supplied".into(),
            ));
        }

        let mut records = self.records.lock().unwrap();

        let mut conflicts = Vec::new();
        for unique_field in &self.unique_fields {
            let Some(candidate) = fields.get(unique_field).filter(|v| !v.is_null()) else {
                continue;
            };
            if records.iter().any(|r| r.get(unique_field) == Some(candidate)) {
                conflicts.push((unique_field.clone(), candidate.clone()));
            }
        }
        if !conflicts.is_empty() {
            return Err(KongError::conflict(conflicts));
        }

        let id = uuid::Uuid::new_v4().to_string();
        fields.insert("id".to_string(), Value::String(id.clone()));
        let record = Value::Object(fields);
        records.push(record.clone());

        tracing::debug!("created {} record {}", self.collection_url, id);
        Ok(strip_defaults(&record, &self.defaults))
    }

    /// Look up a record by id, falling back to the alternate key field.
    pub fn retrieve(&self, key: &str, alt_field: &str) -> Option<Value> {
        let records = self.records.lock().unwrap();
        resolve_index(&records, key, alt_field).map(|i| strip_defaults(&records[i], &self.defaults))
    }

    /// Merge `fields` into the record resolved by `key` (merge-patch, not
    /// replace). Returns `Ok(None)` when nothing resolves; never creates.
    pub fn update(&self, key: &str, alt_field: &str, fields: Value) -> Result<Option<Value>, KongError> {
        let Value::Object(patch) = fields else {
            return Err(KongError::Validation("update fields must be a JSON object".into()));
        };

        let mut records = self.records.lock().unwrap();
        let Some(index) = resolve_index(&records, key, alt_field) else {
            return Ok(None);
        };

        let existing = records[index]
            .as_object_mut()
            .expect("stored records are always objects");
        for (field, value) in patch {
            if field == "id" {
                continue;
            }
            existing.insert(field, value);
        }

        tracing::debug!("updated {} record {}", self.collection_url, key);
        Ok(Some(strip_defaults(&records[index], &self.defaults)))
    }

    /// List records: equality filters first, then projection, then the slice
    /// addressed by the `offset` cursor.
    ///
    /// The `next` link reproduces the remote service's cursor arithmetic,
    /// including its one-record lookahead: the encoded offset is the id at
    /// index `offset_index + size + 1` (clamped to the final record when
    /// that index is past the end). An offset that matches no record is a
    /// validation failure, mirroring the remote position lookup.
    pub fn list(
        &self,
        size: usize,
        offset: Option<&str>,
        constraints: &[(&str, Option<&str>)],
    ) -> Result<ListPage, KongError> {
        let records = self.records.lock().unwrap();
        let filtered = filter_records(&records, constraints);

        let offset_index = match offset {
            None => 0,
            Some(id) => filtered
                .iter()
                .position(|r| r.get("id").and_then(Value::as_str) == Some(id))
                .ok_or_else(|| KongError::Validation(format!("unknown pagination offset: {id}")))?,
        };

        let end = (offset_index + size).min(filtered.len());
        let data: Vec<Value> = filtered[offset_index..end]
            .iter()
            .map(|r| strip_defaults(r, &self.defaults))
            .collect();

        let next = if filtered.len() > offset_index + size {
            let lookahead = (offset_index + size + 1).min(filtered.len() - 1);
            filtered[lookahead]
                .get("id")
                .and_then(Value::as_str)
                .map(|id| self.next_url(size, id))
        } else {
            None
        };

        Ok(ListPage {
            total: filtered.len() as u64,
            data,
            next,
        })
    }

    /// Remove the record resolved by `key`. A miss is a no-op, not an error.
    pub fn delete(&self, key: &str, alt_field: &str) {
        let mut records = self.records.lock().unwrap();
        if let Some(index) = resolve_index(&records, key, alt_field) {
            records.remove(index);
            tracing::debug!("deleted {} record {}", self.collection_url, key);
        }
    }

    /// Total records held, unfiltered
    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Drop every record (test support; not part of the remote contract)
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    fn next_url(&self, size: usize, offset: &str) -> String {
        match Url::parse(&self.collection_url) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("size", &size.to_string())
                    .append_pair("offset", offset);
                url.to_string()
            }
            // Collection URLs are constructed internally; fall back rather
            // than fail the whole list call.
            Err(_) => format!("{}?size={}&offset={}", self.collection_url, size, offset),
        }
    }
}

/// Two-step key resolution: exact id match first, then a linear scan for an
/// exact match on the alternate key field.
fn resolve_index(records: &[Value], key: &str, alt_field: &str) -> Option<usize> {
    records
        .iter()
        .position(|r| r.get("id").and_then(Value::as_str) == Some(key))
        .or_else(|| {
            records
                .iter()
                .position(|r| r.get(alt_field).and_then(Value::as_str) == Some(key))
        })
}
