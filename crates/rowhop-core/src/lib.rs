//! Batched relational field materialization: dotted field paths that hop
//! across single-valued relations into other collections, resolved with one
//! batched read per hop level and target collection instead of one call per
//! record.

pub mod error;
pub mod format;
pub mod ident;
pub mod materialize;
pub mod obs;
pub mod path;
pub mod reader;
pub mod relation;
pub mod schema;
pub mod source;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Domain vocabulary only; helpers and internals stay one module down.
///

pub mod prelude {
    pub use crate::{
        error::MaterializeError,
        format::Cell,
        ident::RecordId,
        materialize::{Grid, Materializer},
        path::FieldPath,
        relation::RelationValue,
        schema::{FieldKind, FieldTable},
        source::{RawRecord, RecordSource, SourceError},
    };
}
