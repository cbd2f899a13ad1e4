use {
    crate::ActionListeners,
    action_components::{ActionKind, ContainedIn, MovementCapability},
    action_events::{ActionQuery, InteractionPerformed, InteractionReceived, Verdict},
    bevy::prelude::*,
};

/// Answers "may `actor` do this?" by asking every registered listener.
///
/// The gate owns no state. Listeners live in the [`ActionListeners`] resource
/// of the world it is built over; the movement answer is cached on the actor's
/// [`MovementCapability`].
pub struct ActionBlocker<'w> {
    world: &'w mut World,
}

impl<'w> ActionBlocker<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    fn ask(&self, query: ActionQuery) -> Verdict {
        let world: &World = &*self.world;
        match world.get_resource::<ActionListeners>() {
            Some(listeners) => listeners.dispatch(world, &query),
            None => Verdict::Allow,
        }
    }

    /// Single query for any kind, including custom ones. `true` unless a
    /// listener vetoed.
    pub fn can_perform(&self, actor: Entity, kind: ActionKind, target: Option<Entity>) -> bool {
        self.ask(ActionQuery::new(actor, kind, target)).is_allowed()
    }

    /// Reads the cached movement answer. Entities without a
    /// [`MovementCapability`] cannot move.
    pub fn can_move(&self, entity: Entity) -> bool {
        self.world
            .get::<MovementCapability>(entity)
            .is_some_and(|movement| movement.can_move)
    }

    /// Recomputes and caches whether `entity` can move, returning the new value.
    ///
    /// The component is only marked changed when the value actually flips.
    pub fn refresh_movement(&mut self, entity: Entity) -> bool {
        if self.world.get::<MovementCapability>(entity).is_none() {
            return false;
        }

        let can_move = self
            .ask(ActionQuery::new(entity, ActionKind::Move, None))
            .is_allowed();

        if let Some(mut movement) = self.world.get_mut::<MovementCapability>(entity)
            && movement.set_if_neq(MovementCapability { can_move })
        {
            debug!(?entity, %can_move, "movement capability changed");
        }

        can_move
    }

    pub fn can_change_direction(&self, actor: Entity) -> bool {
        self.can_perform(actor, ActionKind::ChangeDirection, None)
    }

    /// Checks both sides of an interaction. When there is a target and both
    /// sides agree, `InteractionPerformed`/`InteractionReceived` are triggered
    /// before returning.
    pub fn can_interact(&mut self, actor: Entity, target: Option<Entity>) -> bool {
        if !self.can_perform(actor, ActionKind::Interact, target) {
            return false;
        }

        let Some(target) = target else {
            return true;
        };

        self.target_agrees(actor, target, ActionKind::Interact, ActionKind::GettingInteractedWith)
    }

    pub fn can_use_held_item(&self, actor: Entity) -> bool {
        self.can_perform(actor, ActionKind::UseHeldItem, None)
    }

    pub fn can_throw(&self, actor: Entity) -> bool {
        self.can_perform(actor, ActionKind::Throw, None)
    }

    pub fn can_drop(&self, actor: Entity) -> bool {
        self.can_perform(actor, ActionKind::Drop, None)
    }

    /// Checks both the picker and the item, see [`Self::can_interact`].
    pub fn can_pickup(&mut self, actor: Entity, item: Entity) -> bool {
        if !self.can_perform(actor, ActionKind::Pickup, Some(item)) {
            return false;
        }

        self.target_agrees(actor, item, ActionKind::Pickup, ActionKind::GettingPickedUp)
    }

    pub fn can_speak(&self, actor: Entity) -> bool {
        self.can_perform(actor, ActionKind::Speak, None)
    }

    pub fn can_emote(&self, actor: Entity) -> bool {
        self.can_perform(actor, ActionKind::Emote, None)
    }

    /// Contained entities never attack; listeners are not consulted.
    pub fn can_attack(&self, actor: Entity, target: Option<Entity>) -> bool {
        if let Some(container) = self.world.get::<ContainedIn>(actor) {
            debug!(?actor, container = ?container.0, "attack blocked, actor is inside a container");
            return false;
        }

        self.can_perform(actor, ActionKind::Attack, target)
    }

    pub fn can_shiver(&self, actor: Entity) -> bool {
        self.can_perform(actor, ActionKind::Shiver, None)
    }

    pub fn can_sweat(&self, actor: Entity) -> bool {
        self.can_perform(actor, ActionKind::Sweat, None)
    }

    fn target_agrees(
        &mut self,
        actor: Entity,
        target: Entity,
        action: ActionKind,
        target_side: ActionKind,
    ) -> bool {
        if !self.can_perform(actor, target_side, Some(target)) {
            return false;
        }

        self.world.trigger(InteractionPerformed {
            entity: actor,
            target,
            kind: action,
        });
        self.world.trigger(InteractionReceived {
            entity: target,
            actor,
            kind: action,
        });

        true
    }
}
