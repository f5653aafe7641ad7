use crate::{
    error::MaterializeError,
    ident::RecordId,
    obs::{TraceEvent, TraceSink},
    source::{ID_FIELD, RawRecord, RecordSource},
};
use std::collections::{BTreeMap, BTreeSet};

/// Batched read of `ids` from one collection, keyed by record identifier.
///
/// The identifier set is already deduplicated by construction; the implicit
/// `id` field is always requested on top of `fields`. An empty identifier
/// set returns an empty mapping without touching the source — the common
/// case when a hop has nothing to follow. Returned records without a usable
/// identifier are dropped.
pub fn read_by_ids<S: RecordSource>(
    source: &S,
    trace: Option<&dyn TraceSink>,
    hop: u8,
    collection: &str,
    ids: &BTreeSet<RecordId>,
    fields: &BTreeSet<String>,
) -> Result<BTreeMap<RecordId, RawRecord>, MaterializeError> {
    if ids.is_empty() {
        if let Some(sink) = trace {
            sink.on_event(TraceEvent::HopSkipped { hop, collection });
        }
        return Ok(BTreeMap::new());
    }

    let mut requested = fields.clone();
    requested.insert(ID_FIELD.to_string());

    let rows = source
        .read_records(collection, ids, &requested)
        .map_err(|err| MaterializeError::Read {
            collection: collection.to_string(),
            source: err,
        })?;

    if let Some(sink) = trace {
        sink.on_event(TraceEvent::BatchRead {
            hop,
            collection,
            ids: ids.len(),
            fields: requested.len(),
            returned: rows.len(),
        });
    }

    let mut by_id = BTreeMap::new();
    for row in rows {
        let Some(id) = row.get(ID_FIELD).and_then(RecordId::from_json) else {
            continue;
        };
        by_id.insert(id, row);
    }
    Ok(by_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        schema::FieldKind,
        test_support::{MockSource, record_id},
    };
    use serde_json::json;

    fn field_set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn empty_identifier_set_issues_no_call() {
        let source = MockSource::new();
        let fetched = read_by_ids(
            &source,
            None,
            1,
            "res.partner",
            &BTreeSet::new(),
            &field_set(&["name"]),
        )
        .expect("empty read should succeed");
        assert!(fetched.is_empty());
        assert!(source.read_calls.borrow().is_empty());
    }

    #[test]
    fn id_field_is_always_requested() {
        let mut source = MockSource::new();
        source.schema("res.partner", &[("name", FieldKind::Scalar)]);
        source.record("res.partner", 42, json!({"name": "Acme Corp"}));

        let ids = [record_id(42)].into_iter().collect();
        let fetched = read_by_ids(&source, None, 1, "res.partner", &ids, &field_set(&["name"]))
            .expect("read should succeed");

        assert_eq!(fetched[&record_id(42)]["name"], json!("Acme Corp"));
        let calls = source.read_calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].fields.contains(&ID_FIELD.to_string()));
    }

    #[test]
    fn records_without_identifiers_are_dropped() {
        let mut source = MockSource::new();
        source.schema("res.partner", &[("name", FieldKind::Scalar)]);
        source.record("res.partner", 42, json!({"name": "Acme Corp"}));
        source.corrupt_record_id("res.partner", 42);

        let ids = [record_id(42)].into_iter().collect();
        let fetched = read_by_ids(&source, None, 1, "res.partner", &ids, &field_set(&["name"]))
            .expect("read should succeed");
        assert!(fetched.is_empty());
    }
}
