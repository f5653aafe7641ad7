use crate::{error::RpcError, session::Session};
use rowhop_core::{
    ident::RecordId,
    schema::{FieldKind, FieldTable},
    source::{RawRecord, RecordSource, SourceError},
};
use serde_json::{Map, Value as Json, json};
use std::collections::BTreeSet;

/// Field-metadata attributes requested from describe calls.
const FIELD_ATTRIBUTES: [&str; 2] = ["type", "relation"];

/// Wire type tag of a single-valued relation field.
const MANY_TO_ONE: &str = "many2one";

///
/// ObjectClient
///
/// execute_kw-convention client over one authenticated session. Implements
/// the materializer's `RecordSource` boundary and the base-row search the
/// surrounding extraction pipeline needs.
///

pub struct ObjectClient {
    session: Session,
}

impl ObjectClient {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Low-level object-service call with the session context merged in.
    /// An explicit `context` entry in `kwargs` wins over session keys.
    pub fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Vec<Json>,
        mut kwargs: Map<String, Json>,
    ) -> Result<Json, RpcError> {
        let mut context = self.session.context.clone();
        if let Some(Json::Object(explicit)) = kwargs.remove("context") {
            context.extend(explicit);
        }
        kwargs.insert("context".to_string(), Json::Object(context));

        self.session.transport.call(
            "object",
            "execute_kw",
            vec![
                json!(self.session.db),
                json!(self.session.uid),
                json!(self.session.secret),
                json!(model),
                json!(method),
                Json::Array(args),
                Json::Object(kwargs),
            ],
        )
    }

    /// Fetch base rows: a filtered, ordered, limited search over one
    /// collection returning the requested fields.
    pub fn search_read(
        &self,
        collection: &str,
        domain: &Json,
        fields: &[String],
        limit: Option<u32>,
        order: Option<&str>,
    ) -> Result<Vec<RawRecord>, RpcError> {
        let mut kwargs = Map::new();
        kwargs.insert("fields".to_string(), json!(fields));
        if let Some(limit) = limit {
            kwargs.insert("limit".to_string(), json!(limit));
        }
        if let Some(order) = order {
            kwargs.insert("order".to_string(), json!(order));
        }

        let result = self.execute_kw(collection, "search_read", vec![domain.clone()], kwargs)?;
        let rows = decode_records(result)?;
        tracing::debug!(collection, rows = rows.len(), "search_read");
        Ok(rows)
    }
}

impl RecordSource for ObjectClient {
    fn describe_fields(&self, collection: &str) -> Result<FieldTable, SourceError> {
        let result = self
            .execute_kw(
                collection,
                "fields_get",
                vec![json!([]), json!(FIELD_ATTRIBUTES)],
                Map::new(),
            )
            .map_err(SourceError::from)?;
        let table = decode_field_table(&result).map_err(SourceError::from)?;
        tracing::debug!(collection, fields = table.len(), "described fields");
        Ok(table)
    }

    fn read_records(
        &self,
        collection: &str,
        ids: &BTreeSet<RecordId>,
        fields: &BTreeSet<String>,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
        tracing::debug!(
            collection,
            ids = ids.len(),
            fields = fields.len(),
            "batched read"
        );

        let result = self
            .execute_kw(collection, "read", vec![json!(ids), json!(fields)], Map::new())
            .map_err(SourceError::from)?;
        decode_records(result).map_err(SourceError::from)
    }
}

// Map wire field metadata onto the typed schema table. Only many2one
// entries with a target become relations; everything else is scalar.
pub(crate) fn decode_field_table(result: &Json) -> Result<FieldTable, RpcError> {
    let Json::Object(map) = result else {
        return Err(RpcError::Decode {
            message: format!("expected a field mapping, got {result}"),
        });
    };

    let mut table = FieldTable::new();
    for (name, info) in map {
        let kind = match (
            info.get("type").and_then(Json::as_str),
            info.get("relation").and_then(Json::as_str),
        ) {
            (Some(MANY_TO_ONE), Some(target)) => FieldKind::Relation {
                target: target.to_string(),
            },
            _ => FieldKind::Scalar,
        };
        table.insert(name.clone(), kind);
    }
    Ok(table)
}

pub(crate) fn decode_records(result: Json) -> Result<Vec<RawRecord>, RpcError> {
    let Json::Array(rows) = result else {
        return Err(RpcError::Decode {
            message: format!("expected a record list, got {result}"),
        });
    };
    rows.into_iter()
        .map(|row| match row {
            Json::Object(map) => Ok(map),
            other => Err(RpcError::Decode {
                message: format!("expected a record object, got {other}"),
            }),
        })
        .collect()
}
