//! Linking of crowd-sourced (VGI) observations to each other and to station symbols.

use pointgen_types::CartesianPoint2d;

use crate::context::GeneralizeContext;
use crate::registry::{CrossReference, EntryKind};
use crate::symbol::VgiSymbol;

/// Number of other observations looked up when flagging clusters.
const CROSSREFERENCE_NEIGHBOURS: usize = 2;

/// Flags every observation by the number of other observations within the cross-reference
/// distance. The VGI index is not changed.
pub(crate) fn flag_cross_references(ctx: &mut GeneralizeContext, vgi_ids: &[String]) {
    let distance = ctx.config.crossreference_distance_units(ctx.resolution);

    for id in vgi_ids {
        let Some(entry) = ctx.registry.get(id) else {
            continue;
        };

        let position = entry.projected;
        let neighbours = ctx.vgi.knn(
            position.x(),
            position.y(),
            CROSSREFERENCE_NEIGHBOURS,
            distance,
            Some(id.as_str()),
        );
        let flag = match neighbours.len() {
            0 => None,
            1 => Some(CrossReference::One),
            _ => Some(CrossReference::Many),
        };

        if let Some(EntryKind::Vgi {
            cross_reference, ..
        }) = ctx.registry.get_mut(id).map(|entry| &mut entry.kind)
        {
            *cross_reference = flag;
        }
    }
}

/// Attaches to every feature the nearest observation within the attach distance. An attached
/// observation is removed from the VGI index, so it is attached at most once.
///
/// Returns the number of attached observations.
pub(crate) fn attach_vgi(ctx: &mut GeneralizeContext, feature_ids: &[String]) -> usize {
    let distance = ctx.config.attach_distance_units(ctx.resolution);
    let mut attached = 0;

    for id in feature_ids {
        let Some(entry) = ctx.registry.get(id) else {
            continue;
        };

        let position = entry.projected;
        let Some(nearest) = ctx
            .vgi
            .knn(position.x(), position.y(), 1, distance, None)
            .pop()
        else {
            continue;
        };

        let Some(EntryKind::Vgi {
            phenomenon,
            cross_reference,
        }) = ctx.registry.get(&nearest.id).map(|entry| &entry.kind)
        else {
            continue;
        };

        let vgi = VgiSymbol {
            feature_id: nearest.id.clone(),
            phenomenon: phenomenon.clone(),
            cross_reference: *cross_reference,
        };

        let Some(symbol) = ctx.registry.symbol_mut(id) else {
            continue;
        };

        log::trace!("Attached VGI feature {} to {id}", nearest.id);
        symbol.vgi.push(vgi);
        ctx.vgi.remove(&nearest.id);
        attached += 1;
    }

    attached
}
