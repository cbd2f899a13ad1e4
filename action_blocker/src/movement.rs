use {crate::ActionBlocker, action_components::MovementCapability, bevy::prelude::*};

/// Recomputes the cached [`MovementCapability`] of an entity.
///
/// Queue this whenever something that a movement listener looks at has
/// changed (stunned, buckled, cuffed...).
pub struct RefreshMovement {
    pub entity: Entity,
}

impl Command for RefreshMovement {
    fn apply(self, world: &mut World) {
        ActionBlocker::new(world).refresh_movement(self.entity);
    }
}

/// Observer: a fresh movement record gets its first real answer.
pub fn on_movement_ready(trigger: On<Add, MovementCapability>, mut commands: Commands) {
    let entity = trigger.event().entity;
    trace!(?entity, "movement capability added, scheduling refresh");
    commands.queue(RefreshMovement { entity });
}
