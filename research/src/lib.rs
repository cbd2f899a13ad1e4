use {
    bevy::{platform::collections::HashMap, prelude::*},
    technology_assets::TechnologyAssetsPlugin,
};

pub mod systems;

#[cfg(test)]
mod tests;

pub use {
    technology_assets::TechnologyDefinition,
    technology_components::{
        LoadedTechnologies, TechnologyCatalog, TechnologyDatabase, UnlockError,
    },
    technology_events::{
        RestoreTechnologies, TechnologyUnlockRejected, TechnologyUnlocked, UnlockRejection,
        UnlockTechnologyRequest,
    },
};

// --- Resources ---

/// O(1) lookup of loaded technology definitions by ID
#[derive(Resource, Default)]
pub struct TechnologyIndex {
    pub handles: HashMap<String, Handle<TechnologyDefinition>>,
}

/// Present while the technology definitions are still being loaded.
/// Restores are held back until it is removed.
#[derive(Resource, Default, Debug)]
pub struct TechnologiesLoading;

/// Restores that arrived before the catalog was ready, in arrival order.
#[derive(Resource, Default, Debug)]
pub struct PendingRestores(pub Vec<(Entity, Vec<String>)>);

impl TechnologyIndex {
    /// Catalog view resolving ids through this index and the loaded assets.
    pub fn catalog<'a>(&'a self, assets: &'a Assets<TechnologyDefinition>) -> IndexedCatalog<'a> {
        IndexedCatalog {
            index: self,
            assets,
        }
    }
}

/// [`TechnologyCatalog`] backed by the asset index. An id whose asset is not
/// loaded (yet, or anymore) does not resolve.
pub struct IndexedCatalog<'a> {
    index: &'a TechnologyIndex,
    assets: &'a Assets<TechnologyDefinition>,
}

impl TechnologyCatalog for IndexedCatalog<'_> {
    fn resolve(&self, id: &str) -> Option<&TechnologyDefinition> {
        self.index
            .handles
            .get(id)
            .and_then(|handle| self.assets.get(handle))
    }
}

// --- Plugin ---

pub struct ResearchPlugin;

impl Plugin for ResearchPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TechnologyAssetsPlugin)
            .init_resource::<TechnologyIndex>()
            .init_resource::<PendingRestores>()
            .add_systems(
                Update,
                (
                    systems::index_technology_assets,
                    systems::apply_pending_restores,
                )
                    .chain(),
            )
            .add_observer(systems::handle_unlock_request)
            .add_observer(systems::restore_technologies);
    }
}
