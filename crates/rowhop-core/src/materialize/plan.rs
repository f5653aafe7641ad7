//! Hop planning: decide, level by level, which collections must be read,
//! with which identifiers and fields, so that one batched read per (hop,
//! collection) covers every submitted path.

use super::{HopResults, MAX_HOPS, RunContext};
use crate::{
    error::MaterializeError,
    ident::RecordId,
    obs::TraceSink,
    path::FieldPath,
    reader,
    relation::RelationValue,
    schema::FieldKind,
    source::{RawRecord, RecordSource},
};
use std::collections::{BTreeMap, BTreeSet};

///
/// PathChain
///
/// Target collections a path's hops enter, in hop order. The chain stops
/// growing when a segment is not a single-valued relation; cells needing
/// the missing hops resolve to null.
///

#[derive(Debug, Default)]
pub(crate) struct PathChain {
    pub(crate) targets: Vec<String>,
}

///
/// HopRequirement
///
/// Identifiers and fields one batched read must cover for a target
/// collection at one hop level.
///

#[derive(Debug, Default)]
struct HopRequirement {
    ids: BTreeSet<RecordId>,
    fields: BTreeSet<String>,
}

/// Plan and execute the hop reads for all paths.
///
/// Each level completes before the next begins; level k+1's identifiers
/// come out of level k's fetched records.
pub(crate) fn run<S: RecordSource>(
    source: &S,
    trace: Option<&dyn TraceSink>,
    ctx: &mut RunContext,
    base_collection: &str,
    base_rows: &[RawRecord],
    paths: &[FieldPath],
) -> Result<Vec<PathChain>, MaterializeError> {
    let mut chains: Vec<PathChain> = paths.iter().map(|_| PathChain::default()).collect();

    for hop in 1..=MAX_HOPS {
        let mut wanted: BTreeMap<String, HopRequirement> = BTreeMap::new();

        for (path, chain) in paths.iter().zip(chains.iter_mut()) {
            let segments = path.segments();
            if segments.len() <= hop {
                // Path terminates before this hop.
                continue;
            }
            if chain.targets.len() != hop - 1 {
                // Blocked at an earlier hop by a non-relational segment.
                continue;
            }

            let owner = chain.targets.last().map_or(base_collection, String::as_str);
            let table = ctx.schemas.fields_of(source, trace, owner)?;
            let Some(target) = table
                .get(&segments[hop - 1])
                .and_then(FieldKind::relation_target)
            else {
                continue;
            };
            let target = target.to_string();
            chain.targets.push(target.clone());

            let requirement = wanted.entry(target).or_default();
            requirement.fields.insert(segments[hop].clone());
            for row in base_rows {
                if let Some(id) = id_at_depth(&ctx.hops, chain, row, segments, hop) {
                    requirement.ids.insert(id);
                }
            }
        }

        let hop_tag = u8::try_from(hop).unwrap_or(u8::MAX);
        for (collection, requirement) in &wanted {
            let fetched = reader::read_by_ids(
                source,
                trace,
                hop_tag,
                collection,
                &requirement.ids,
                &requirement.fields,
            )?;
            ctx.hops.merge(collection, fetched);
        }
    }

    Ok(chains)
}

// Identifier reachable `depth` hops from this base row, if every link so
// far is present in the fetched hop results. Unset or broken links simply
// contribute nothing.
fn id_at_depth(
    hops: &HopResults,
    chain: &PathChain,
    row: &RawRecord,
    segments: &[String],
    depth: usize,
) -> Option<RecordId> {
    let mut id = RelationValue::decode(row.get(&segments[0])).id()?;
    for hop in 1..depth {
        let record = hops.record(&chain.targets[hop - 1], id)?;
        id = RelationValue::decode(record.get(&segments[hop])).id()?;
    }
    Some(id)
}
