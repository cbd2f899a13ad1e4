use {bevy::prelude::*, technology_components::UnlockError};

/// Represents a request to unlock a technology for the targeted owner.
///
/// This **Observer** event (triggered on the owner entity) is the bridge
/// between input (a research console, an admin command) and the technology
/// database.
///
/// # Observers
/// - `research::handle_unlock_request`: resolves the technology, validates
///   prerequisites against the owner's `TechnologyDatabase` and answers with
///   either [`TechnologyUnlocked`] or [`TechnologyUnlockRejected`].
#[derive(EntityEvent, Debug, Clone)]
pub struct UnlockTechnologyRequest {
    /// The entity owning the `TechnologyDatabase`.
    pub entity: Entity,
    pub technology_id: String,
}

/// Triggered on the owner after a technology was added to its database.
#[derive(EntityEvent, Debug, Clone)]
pub struct TechnologyUnlocked {
    pub entity: Entity,
    pub technology_id: String,
    /// Recipes the technology granted.
    pub recipes: Vec<String>,
}

/// Triggered on the owner when an [`UnlockTechnologyRequest`] was refused.
#[derive(EntityEvent, Debug, Clone)]
pub struct TechnologyUnlockRejected {
    pub entity: Entity,
    pub technology_id: String,
    pub reason: UnlockRejection,
}

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockRejection {
    /// The target entity has no `TechnologyDatabase`.
    NoDatabase,
    Invalid(UnlockError),
}

/// Replaces the owner's `TechnologyDatabase` with one rebuilt from saved ids.
///
/// Used by persistence and replication after reading an id list. Ids missing
/// from the current catalog are dropped.
#[derive(EntityEvent, Debug, Clone)]
pub struct RestoreTechnologies {
    pub entity: Entity,
    pub technology_ids: Vec<String>,
}
