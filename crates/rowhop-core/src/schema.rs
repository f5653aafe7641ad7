use crate::{
    error::MaterializeError,
    obs::{TraceEvent, TraceSink},
    source::RecordSource,
};
use serde::Serialize;
use std::collections::{BTreeMap, btree_map::Entry};

///
/// FieldKind
///
/// Per-field metadata the materializer reasons about: either a plain value
/// or a single-valued relation into a target collection. Multi-valued
/// references stay `Scalar`; they are displayed, never traversed.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum FieldKind {
    Scalar,
    Relation { target: String },
}

impl FieldKind {
    /// Target collection when this field is a single-valued relation.
    #[must_use]
    pub fn relation_target(&self) -> Option<&str> {
        match self {
            Self::Relation { target } => Some(target),
            Self::Scalar => None,
        }
    }
}

/// Field metadata of one collection, keyed by field name.
pub type FieldTable = BTreeMap<String, FieldKind>;

///
/// SchemaCache
///
/// Run-scoped memo of field tables. Each collection is described at most
/// once per materialization run; the table never expires mid-run. A failed
/// describe call aborts the run, since partial schema is unsafe to plan on.
///

#[derive(Debug, Default)]
pub struct SchemaCache {
    tables: BTreeMap<String, FieldTable>,
}

impl SchemaCache {
    /// Field table for `collection`, describing it remotely on first use.
    pub fn fields_of<'a, S: RecordSource>(
        &'a mut self,
        source: &S,
        trace: Option<&dyn TraceSink>,
        collection: &str,
    ) -> Result<&'a FieldTable, MaterializeError> {
        match self.tables.entry(collection.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let table = source.describe_fields(collection).map_err(|err| {
                    MaterializeError::Schema {
                        collection: collection.to_string(),
                        source: err,
                    }
                })?;
                if let Some(sink) = trace {
                    sink.on_event(TraceEvent::SchemaFetched {
                        collection,
                        fields: table.len(),
                    });
                }
                Ok(entry.insert(table))
            }
        }
    }

    /// Cached table, if this collection was already described this run.
    #[must_use]
    pub fn get(&self, collection: &str) -> Option<&FieldTable> {
        self.tables.get(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSource;

    #[test]
    fn describe_is_issued_once_per_collection() {
        let mut source = MockSource::new();
        source.schema("res.partner", &[("name", FieldKind::Scalar)]);

        let mut cache = SchemaCache::default();
        for _ in 0..3 {
            let table = cache
                .fields_of(&source, None, "res.partner")
                .expect("describe should succeed");
            assert_eq!(table.get("name"), Some(&FieldKind::Scalar));
        }
        assert_eq!(source.describe_calls.borrow().len(), 1);
    }

    #[test]
    fn describe_failure_is_fatal() {
        let source = MockSource::new();
        let mut cache = SchemaCache::default();
        let err = cache
            .fields_of(&source, None, "res.partner")
            .expect_err("unknown collection should fail");
        assert!(matches!(
            err,
            MaterializeError::Schema { collection, .. } if collection == "res.partner"
        ));
    }
}
