use crate::{path::PathError, source::SourceError};
use thiserror::Error as ThisError;

///
/// MaterializeError
///
/// Fatal failures that abort a materialization run. Degraded conditions
/// (unset references, missing hop records, non-relational traversal) never
/// appear here; they resolve to null cells and the run continues.
///

#[derive(Debug, ThisError)]
pub enum MaterializeError {
    #[error("malformed field path: {source}")]
    MalformedPath {
        #[from]
        source: PathError,
    },

    #[error("schema describe failed for collection '{collection}': {source}")]
    Schema {
        collection: String,
        source: SourceError,
    },

    #[error("batched read failed for collection '{collection}': {source}")]
    Read {
        collection: String,
        source: SourceError,
    },
}
