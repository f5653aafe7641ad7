use crate::{
    ident::RecordId,
    obs::{TraceEvent, TraceSink},
    schema::{FieldKind, FieldTable},
    source::{ID_FIELD, RawRecord, RecordSource, SourceError},
};
use serde_json::{Value as Json, json};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
};

/// Test-only identifier constructor; panics on non-positive input.
pub(crate) fn record_id(raw: i64) -> RecordId {
    RecordId::new(raw).expect("test identifiers must be positive")
}

///
/// ReadCall
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ReadCall {
    pub(crate) collection: String,
    pub(crate) ids: Vec<i64>,
    pub(crate) fields: Vec<String>,
}

///
/// MockSource
///
/// Fixture-backed RecordSource recording every remote call, so tests can
/// assert on batching behavior as well as resolved values.
///

#[derive(Default)]
pub(crate) struct MockSource {
    schemas: BTreeMap<String, FieldTable>,
    records: RefCell<BTreeMap<String, BTreeMap<i64, RawRecord>>>,
    failing_describes: BTreeSet<String>,
    pub(crate) describe_calls: RefCell<Vec<String>>,
    pub(crate) read_calls: RefCell<Vec<ReadCall>>,
}

impl MockSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn schema(&mut self, collection: &str, fields: &[(&str, FieldKind)]) {
        let table = fields
            .iter()
            .map(|(name, kind)| ((*name).to_string(), kind.clone()))
            .collect();
        self.schemas.insert(collection.to_string(), table);
    }

    pub(crate) fn fail_describe(&mut self, collection: &str) {
        self.failing_describes.insert(collection.to_string());
    }

    /// Store a record fixture; the identifier is injected as its `id` field.
    pub(crate) fn record(&self, collection: &str, id: i64, fields: Json) {
        let Json::Object(mut map) = fields else {
            panic!("record fixture must be a JSON object");
        };
        map.insert(ID_FIELD.to_string(), json!(id));
        self.records
            .borrow_mut()
            .entry(collection.to_string())
            .or_default()
            .insert(id, map);
    }

    /// Simulate a deleted target: subsequent reads no longer find it.
    pub(crate) fn delete_record(&self, collection: &str, id: i64) {
        if let Some(rows) = self.records.borrow_mut().get_mut(collection) {
            rows.remove(&id);
        }
    }

    /// Corrupt a stored record's identifier field, for reader edge cases.
    pub(crate) fn corrupt_record_id(&self, collection: &str, id: i64) {
        if let Some(row) = self
            .records
            .borrow_mut()
            .get_mut(collection)
            .and_then(|rows| rows.get_mut(&id))
        {
            row.insert(ID_FIELD.to_string(), json!("corrupt"));
        }
    }

    pub(crate) fn read_count_for(&self, collection: &str) -> usize {
        self.read_calls
            .borrow()
            .iter()
            .filter(|call| call.collection == collection)
            .count()
    }
}

impl RecordSource for MockSource {
    fn describe_fields(&self, collection: &str) -> Result<FieldTable, SourceError> {
        self.describe_calls.borrow_mut().push(collection.to_string());
        if self.failing_describes.contains(collection) {
            return Err(SourceError::transport("fixture transport failure"));
        }
        self.schemas
            .get(collection)
            .cloned()
            .ok_or_else(|| SourceError::protocol(format!("unknown collection '{collection}'")))
    }

    fn read_records(
        &self,
        collection: &str,
        ids: &BTreeSet<RecordId>,
        fields: &BTreeSet<String>,
    ) -> Result<Vec<RawRecord>, SourceError> {
        self.read_calls.borrow_mut().push(ReadCall {
            collection: collection.to_string(),
            ids: ids.iter().map(|id| id.get()).collect(),
            fields: fields.iter().cloned().collect(),
        });
        let store = self.records.borrow();
        let Some(rows) = store.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| rows.get(&id.get()))
            .map(|row| project(row, fields))
            .collect())
    }
}

// Return only the requested fields plus id, like a real read endpoint.
fn project(row: &RawRecord, fields: &BTreeSet<String>) -> RawRecord {
    row.iter()
        .filter(|(name, _)| fields.contains(*name) || name.as_str() == ID_FIELD)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

///
/// RecordingSink
///

#[derive(Default)]
pub(crate) struct RecordingSink {
    pub(crate) events: RefCell<Vec<String>>,
}

impl TraceSink for RecordingSink {
    fn on_event(&self, event: TraceEvent<'_>) {
        self.events.borrow_mut().push(format!("{event:?}"));
    }
}
