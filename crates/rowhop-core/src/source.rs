use crate::{ident::RecordId, schema::FieldTable};
use serde_json::Value as Json;
use std::{collections::BTreeSet, fmt};
use thiserror::Error as ThisError;

/// Raw field values of one record as returned by the source.
pub type RawRecord = serde_json::Map<String, Json>;

/// Implicit identifier field every record carries; always requested in
/// batched reads so results stay self-describing.
pub const ID_FIELD: &str = "id";

///
/// SourceErrorKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SourceErrorKind {
    Auth,
    Protocol,
    Transport,
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Auth => "auth",
            Self::Protocol => "protocol",
            Self::Transport => "transport",
        };
        write!(f, "{label}")
    }
}

///
/// SourceError
///
/// Remote-boundary failure reported by a [`RecordSource`]. Always fatal for
/// the materialization run that triggered the call.
///

#[derive(Clone, Debug, ThisError)]
#[error("{kind}: {message}")]
pub struct SourceError {
    pub kind: SourceErrorKind,
    pub message: String,
}

impl SourceError {
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Auth,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Protocol,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Transport,
            message: message.into(),
        }
    }
}

///
/// RecordSource
///
/// Remote collaborator boundary: schema description and batched record
/// reads. Retry policy lives behind this trait, never in front of it.
///

pub trait RecordSource {
    /// Field metadata for one collection, restricted to the attributes the
    /// materializer needs (kind and relation target).
    fn describe_fields(&self, collection: &str) -> Result<FieldTable, SourceError>;

    /// Fetch the records matching `ids` in one round trip, restricted to
    /// `fields`. Each returned record is tagged with its identifier.
    fn read_records(
        &self,
        collection: &str,
        ids: &BTreeSet<RecordId>,
        fields: &BTreeSet<String>,
    ) -> Result<Vec<RawRecord>, SourceError>;
}
