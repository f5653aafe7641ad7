use crate::ident::RecordId;
use serde_json::Value as Json;

///
/// RelationValue
///
/// Normalized shape of a single-valued relation field as returned by the
/// source: a bare identifier, an `[id, label]` pair, or unset.
///
/// Decoding happens once, right after a read; downstream code never
/// re-inspects raw wire shapes. An explicit `false` and an absent key are
/// both `Unset`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RelationValue {
    Unset,
    IdOnly(RecordId),
    IdWithLabel(RecordId, String),
}

impl RelationValue {
    /// Decode a raw field value into its normalized relation shape.
    #[must_use]
    pub fn decode(raw: Option<&Json>) -> Self {
        let Some(raw) = raw else {
            return Self::Unset;
        };
        match raw {
            Json::Number(_) => RecordId::from_json(raw).map_or(Self::Unset, Self::IdOnly),
            Json::Array(items) => Self::decode_pair(items),
            _ => Self::Unset,
        }
    }

    fn decode_pair(items: &[Json]) -> Self {
        let Some(id) = items.first().and_then(RecordId::from_json) else {
            return Self::Unset;
        };
        match items {
            [_, Json::String(label)] => Self::IdWithLabel(id, label.clone()),
            _ => Self::IdOnly(id),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Option<RecordId> {
        match self {
            Self::Unset => None,
            Self::IdOnly(id) | Self::IdWithLabel(id, _) => Some(*id),
        }
    }
}
