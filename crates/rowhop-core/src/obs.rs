//! Materialization tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! resolution semantics.

///
/// TraceEvent
///

#[derive(Clone, Copy, Debug)]
pub enum TraceEvent<'a> {
    SchemaFetched {
        collection: &'a str,
        fields: usize,
    },
    BatchRead {
        hop: u8,
        collection: &'a str,
        ids: usize,
        fields: usize,
        returned: usize,
    },
    /// A hop had no identifiers to follow; no remote call was issued.
    HopSkipped { hop: u8, collection: &'a str },
    RunFinished { rows: usize, paths: usize },
}

///
/// TraceSink
///

pub trait TraceSink {
    fn on_event(&self, event: TraceEvent<'_>);
}
