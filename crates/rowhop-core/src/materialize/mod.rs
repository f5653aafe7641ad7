//! Run-scoped materialization: plan hop reads, then resolve every
//! (row, path) cell from the pre-fetched results.

mod plan;
mod resolve;


use crate::{
    error::MaterializeError,
    format::Cell,
    ident::RecordId,
    obs::{TraceEvent, TraceSink},
    path::FieldPath,
    schema::SchemaCache,
    source::{RawRecord, RecordSource},
};
use std::collections::{BTreeMap, btree_map::Entry};

/// Row-major resolved values: one row per base record, one column per
/// requested path, in the original path order.
pub type Grid = Vec<Vec<Cell>>;

/// Relation hops a path may traverse beyond the base record.
pub const MAX_HOPS: usize = 3;

///
/// HopResults
///
/// Records fetched by batched hop reads, keyed per (collection, id).
/// Entries merge field-wise: a field fetched at an earlier hop level is
/// never dropped by a later read of the same collection.
///

#[derive(Debug, Default)]
pub(crate) struct HopResults {
    records: BTreeMap<String, BTreeMap<RecordId, RawRecord>>,
}

impl HopResults {
    pub(crate) fn record(&self, collection: &str, id: RecordId) -> Option<&RawRecord> {
        self.records.get(collection)?.get(&id)
    }

    pub(crate) fn merge(&mut self, collection: &str, fetched: BTreeMap<RecordId, RawRecord>) {
        let slot = self.records.entry(collection.to_string()).or_default();
        for (id, row) in fetched {
            match slot.entry(id) {
                Entry::Vacant(entry) => {
                    entry.insert(row);
                }
                Entry::Occupied(mut entry) => {
                    entry.get_mut().extend(row);
                }
            }
        }
    }
}

///
/// RunContext
///
/// All state of one materialization run: the schema cache and the hop
/// result sets. Created at the start of a call, dropped at its end; nothing
/// survives across runs.
///

pub(crate) struct RunContext {
    pub(crate) schemas: SchemaCache,
    pub(crate) hops: HopResults,
}

impl RunContext {
    fn new() -> Self {
        Self {
            schemas: SchemaCache::default(),
            hops: HopResults::default(),
        }
    }
}

///
/// Materializer
///
/// Resolves dotted field paths against already-fetched base rows, batching
/// every relational lookup per hop level and target collection.
///

pub struct Materializer<'a, S: RecordSource> {
    source: &'a S,
    trace: Option<&'a dyn TraceSink>,
}

impl<'a, S: RecordSource> Materializer<'a, S> {
    #[must_use]
    pub const fn new(source: &'a S) -> Self {
        Self {
            source,
            trace: None,
        }
    }

    #[must_use]
    pub const fn with_trace(source: &'a S, trace: &'a dyn TraceSink) -> Self {
        Self {
            source,
            trace: Some(trace),
        }
    }

    /// Resolve every field path against every base row.
    ///
    /// The grid is row-aligned to `base_rows` and column-aligned to
    /// `field_specs`. Unset or broken references degrade to [`Cell::Null`]
    /// for the affected cell only; malformed paths and schema or read
    /// failures abort the whole call.
    pub fn materialize(
        &self,
        base_collection: &str,
        base_rows: &[RawRecord],
        field_specs: &[&str],
    ) -> Result<Grid, MaterializeError> {
        let paths = field_specs
            .iter()
            .map(|spec| FieldPath::parse(spec))
            .collect::<Result<Vec<_>, _>>()?;

        let mut ctx = RunContext::new();
        let chains = plan::run(
            self.source,
            self.trace,
            &mut ctx,
            base_collection,
            base_rows,
            &paths,
        )?;

        let grid = base_rows
            .iter()
            .map(|row| {
                paths
                    .iter()
                    .zip(&chains)
                    .map(|(path, chain)| Cell::from_resolved(resolve::resolve(&ctx, chain, row, path)))
                    .collect()
            })
            .collect();

        if let Some(sink) = self.trace {
            sink.on_event(TraceEvent::RunFinished {
                rows: base_rows.len(),
                paths: paths.len(),
            });
        }
        Ok(grid)
    }
}
