use rift_core::{EntityId, Region, Vec2};

use crate::context::TickContext;
use crate::event::SimEventKind;

/// Push live entities out of the map's static solids.
///
/// Single pass: solids in map order, entities in registry order. An entity
/// overlapping several solids receives each solid's translation in turn
/// within the same tick; later pushes may reintroduce overlap with an
/// earlier solid, which the next tick picks up again.
///
/// Returns the number of pushes applied.
pub fn resolve_solids<R: Region>(ctx: &mut TickContext<'_, R>) -> usize {
    let map = ctx.map;
    let mut pushes: Vec<(EntityId, Vec2)> = Vec::new();

    for solid in map.solids() {
        for (id, entity) in ctx.registry.iter_mut() {
            let Some(occupies) = entity.occupies.as_mut() else {
                continue;
            };
            if !occupies.region.might_collide(solid) {
                continue;
            }
            let translation = occupies.region.uncollide(solid);
            if translation.is_zero() {
                continue;
            }
            occupies.region.translate(translation);
            pushes.push((id, translation));
        }
    }

    for &(entity, offset) in &pushes {
        tracing::trace!(%entity, %offset, "pushed out of solid");
        ctx.emit(
            SimEventKind::EntityPushed { entity, offset },
            format!("{entity} pushed by {offset}"),
        );
    }
    pushes.len()
}
