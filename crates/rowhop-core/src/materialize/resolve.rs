//! Per-cell resolution over the pre-fetched hop results. Never calls the
//! source; every missing link short-circuits to `None` for that one cell.

use super::{RunContext, plan::PathChain};
use crate::{
    path::FieldPath,
    relation::RelationValue,
    source::{ID_FIELD, RawRecord},
};
use serde_json::Value as Json;

/// Walk one base row along one path and return its raw terminal value.
///
/// Length-1 paths read the base record directly. Longer paths follow the
/// relation identifiers through the hop result sets; a terminal `id`
/// segment yields the identifier itself, since reads do not always return
/// it as a regular field.
pub(crate) fn resolve(
    ctx: &RunContext,
    chain: &PathChain,
    base_row: &RawRecord,
    path: &FieldPath,
) -> Option<Json> {
    let segments = path.segments();
    if segments.len() == 1 {
        return base_row.get(&segments[0]).cloned();
    }

    let hops_needed = segments.len() - 1;
    if chain.targets.len() < hops_needed {
        // Metadata blocked the traversal before the terminal segment.
        return None;
    }

    let mut id = RelationValue::decode(base_row.get(&segments[0])).id()?;
    let mut record = ctx.hops.record(&chain.targets[0], id)?;
    for hop in 1..hops_needed {
        id = RelationValue::decode(record.get(&segments[hop])).id()?;
        record = ctx.hops.record(&chain.targets[hop], id)?;
    }

    let terminal = &segments[hops_needed];
    if terminal == ID_FIELD {
        return Some(Json::from(id.get()));
    }
    record.get(terminal).cloned()
}
