//! Start-of-tick phases: reaping dead entities and self-motion.

use rift_core::{EntityId, Region};

use crate::context::TickContext;
use crate::event::SimEventKind;

/// Relocate every entity whose alive flag has been cleared into the dead set.
///
/// Runs first in a tick, so deaths caused by effects applied at the end of
/// the previous tick are always picked up here.
pub fn reap_dead<R: Region>(ctx: &mut TickContext<'_, R>) -> Vec<EntityId> {
    let reaped = ctx.registry.reap();
    let graveyard = ctx.registry.graveyard();
    let names: Vec<String> = graveyard[graveyard.len() - reaped.len()..]
        .iter()
        .map(|(_, e)| e.name.clone())
        .collect();
    for (&entity, name) in reaped.iter().zip(names) {
        ctx.emit(
            SimEventKind::EntityReaped { entity },
            format!("{name} was removed from the world"),
        );
    }
    reaped
}

/// Advance the self-motion of every live entity that moves.
pub fn move_entities<R: Region>(ctx: &mut TickContext<'_, R>) -> usize {
    let elapsed = ctx.elapsed;
    let mut moved = 0;
    for (_, entity) in ctx.registry.iter_mut() {
        if entity.moves.is_some() {
            entity.step(elapsed);
            moved += 1;
        }
    }
    moved
}
