use {action_components::ActionKind, bevy::prelude::*, std::ops::BitOrAssign};

/// A single permission question, handed by reference to every listener.
///
/// The query itself is immutable; listeners answer with a [`Verdict`] and the
/// gate folds the answers, so nothing a listener does can clear a veto cast by
/// another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionQuery {
    pub actor: Entity,
    pub target: Option<Entity>,
    pub kind: ActionKind,
    /// Entity the query is delivered to. The actor, except for target-side
    /// kinds where it is the target.
    pub recipient: Entity,
}

impl ActionQuery {
    pub fn new(actor: Entity, kind: ActionKind, target: Option<Entity>) -> Self {
        let recipient = match target {
            Some(target) if kind.is_target_side() => target,
            _ => actor,
        };

        Self {
            actor,
            target,
            kind,
            recipient,
        }
    }
}

/// A listener's answer to an [`ActionQuery`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verdict {
    #[default]
    Allow,
    Veto,
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        self == Verdict::Allow
    }

    /// `Veto` when `vetoed` is true.
    pub fn veto_if(vetoed: bool) -> Self {
        if vetoed { Verdict::Veto } else { Verdict::Allow }
    }
}

impl BitOrAssign for Verdict {
    fn bitor_assign(&mut self, rhs: Self) {
        if rhs == Verdict::Veto {
            *self = Verdict::Veto;
        }
    }
}

/// Triggered on the actor after a two-party action (interact, pickup) passed
/// both the actor-side and the target-side checks.
///
/// # Observers
/// Whatever needs to react to a successful interaction on the acting side
/// (animations, secondary effects). Nothing is returned to the gate.
#[derive(EntityEvent, Debug, Clone)]
pub struct InteractionPerformed {
    /// The actor.
    pub entity: Entity,
    pub target: Entity,
    pub kind: ActionKind,
}

/// Triggered on the target after a two-party action passed both checks.
/// Counterpart of [`InteractionPerformed`].
#[derive(EntityEvent, Debug, Clone)]
pub struct InteractionReceived {
    /// The target.
    pub entity: Entity,
    pub actor: Entity,
    pub kind: ActionKind,
}
