//! Components and tags shared by everything that asks or answers
//! "may this entity do that?".

use bevy::prelude::*;

pub struct ActionComponentsPlugin;

impl Plugin for ActionComponentsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MovementCapability>()
            .register_type::<ContainedIn>();
    }
}

/// Identifies the action a permission query is about.
///
/// Listener crates that need a kind the gate does not know about use
/// [`ActionKind::Custom`]; the gate treats every kind as an opaque topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move,
    ChangeDirection,
    /// Actor side of an interaction.
    Interact,
    /// Target side of an interaction, asked of the entity being interacted with.
    GettingInteractedWith,
    UseHeldItem,
    Throw,
    Drop,
    /// Actor side of picking something up.
    Pickup,
    /// Target side of a pickup, asked of the item.
    GettingPickedUp,
    Speak,
    Emote,
    Attack,
    Shiver,
    Sweat,
    Custom(&'static str),
}

impl ActionKind {
    /// Broadcast kinds are also delivered to global listeners, not only to
    /// listeners directed at the recipient.
    pub fn is_broadcast(self) -> bool {
        matches!(self, ActionKind::Speak | ActionKind::Emote)
    }

    /// Target-side kinds are asked of the target instead of the actor.
    pub fn is_target_side(self) -> bool {
        matches!(
            self,
            ActionKind::GettingInteractedWith | ActionKind::GettingPickedUp
        )
    }
}

/// Cached answer to "can this entity move right now?".
///
/// Movement is checked every tick, so the answer is computed by the action
/// blocker on demand and read from here. Change detection on this component
/// is what replication watches; it only fires when `can_move` flips.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct MovementCapability {
    pub can_move: bool,
}

impl Default for MovementCapability {
    fn default() -> Self {
        Self { can_move: true }
    }
}

/// The entity is held inside another entity (a locker, a bag, a body bag...).
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct ContainedIn(pub Entity);
