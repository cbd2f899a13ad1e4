//! Action permission gate.
//!
//! Gameplay crates register listeners on [`ActionListeners`]; anything that
//! wants to know whether an entity may act builds an [`ActionBlocker`] over the
//! world and asks it. A single veto from any listener blocks the action.

mod blocker;
mod listeners;
mod movement;


pub use {
    action_components::{ActionKind, ContainedIn, MovementCapability},
    action_events::{ActionQuery, InteractionPerformed, InteractionReceived, Verdict},
    blocker::ActionBlocker,
    listeners::{ActionListeners, Listener},
    movement::RefreshMovement,
};

use {action_components::ActionComponentsPlugin, bevy::prelude::*};

pub struct ActionBlockerPlugin;

impl Plugin for ActionBlockerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ActionComponentsPlugin)
            .init_resource::<ActionListeners>()
            .add_observer(movement::on_movement_ready);
    }
}
