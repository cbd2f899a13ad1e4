use {
    crate::{
        PendingRestores, RestoreTechnologies, TechnologiesLoading, TechnologyCatalog, TechnologyDatabase, TechnologyDefinition,
        TechnologyIndex, TechnologyUnlockRejected, TechnologyUnlocked, UnlockError,
        UnlockRejection, UnlockTechnologyRequest,
    },
    bevy::prelude::*,
};

/// Keeps [`TechnologyIndex`] in sync with the loaded definitions.
pub fn index_technology_assets(
    mut index: ResMut<TechnologyIndex>,
    mut assets: ResMut<Assets<TechnologyDefinition>>,
    mut events: MessageReader<AssetEvent<TechnologyDefinition>>,
) {
    for event in events.read() {
        match event {
            AssetEvent::Added { id } | AssetEvent::Modified { id } => {
                let id = *id;
                // A modified asset may have changed its technology id.
                index.handles.retain(|_, handle| handle.id() != id);

                let Some(technology_id) = assets.get(id).map(|def| def.id.clone()) else {
                    continue;
                };
                let Some(handle) = assets.get_strong_handle(id) else {
                    continue;
                };

                if index.handles.insert(technology_id.clone(), handle).is_some() {
                    warn!(%technology_id, "duplicate technology id, the last loaded definition wins");
                }
                debug!(%technology_id, "indexed technology");
            }
            AssetEvent::Removed { id } => {
                let mut orphaned = Vec::new();
                index.handles.retain(|technology_id, handle| {
                    let keep = handle.id() != *id;
                    if !keep {
                        orphaned.push(technology_id.clone());
                    }
                    keep
                });

                // A duplicate that lost the id earlier is still loaded, fall back to it.
                for technology_id in orphaned {
                    let survivor = assets
                        .iter()
                        .find(|(asset_id, def)| *asset_id != *id && def.id == technology_id)
                        .map(|(asset_id, _)| asset_id);
                    match survivor.and_then(|asset_id| assets.get_strong_handle(asset_id)) {
                        Some(handle) => {
                            debug!(%technology_id, "re-indexed technology after its definition was removed");
                            index.handles.insert(technology_id, handle);
                        }
                        None => debug!(%technology_id, "technology removed from the index"),
                    }
                }
            }
            _ => {}
        }
    }
}

/// Unlocks the requested technology on the owner if its prerequisites are met.
pub fn handle_unlock_request(
    trigger: On<UnlockTechnologyRequest>,
    index: Res<TechnologyIndex>,
    assets: Res<Assets<TechnologyDefinition>>,
    mut databases: Query<&mut TechnologyDatabase>,
    mut commands: Commands,
) {
    let request = trigger.event();
    let owner = request.entity;
    let technology_id = request.technology_id.clone();

    let Ok(mut database) = databases.get_mut(owner) else {
        warn!(?owner, %technology_id, "unlock requested for an entity without a technology database");
        commands.trigger(TechnologyUnlockRejected {
            entity: owner,
            technology_id,
            reason: UnlockRejection::NoDatabase,
        });
        return;
    };

    let catalog = index.catalog(&assets);
    let result = match catalog.resolve(&technology_id) {
        // Mutable access marks the database changed, check first.
        Some(node) => match database.unlock_rejection(node, &catalog) {
            Some(error) => Err(error),
            None => database
                .unlock(node, &catalog)
                .map(|()| node.unlocked_recipes.clone()),
        },
        None => Err(UnlockError::UnknownTechnology(technology_id.clone())),
    };

    match result {
        Ok(recipes) => {
            info!(?owner, %technology_id, "technology unlocked");
            commands.trigger(TechnologyUnlocked {
                entity: owner,
                technology_id,
                recipes,
            });
        }
        Err(error) => {
            warn!(?owner, %error, "technology unlock refused");
            commands.trigger(TechnologyUnlockRejected {
                entity: owner,
                technology_id,
                reason: UnlockRejection::Invalid(error),
            });
        }
    }
}

fn catalog_ready(index: &TechnologyIndex, loading: Option<&TechnologiesLoading>) -> bool {
    loading.is_none() && !index.handles.is_empty()
}

fn restore(
    commands: &mut Commands,
    owner: Entity,
    technology_ids: &[String],
    catalog: &impl TechnologyCatalog,
) {
    let loaded = TechnologyDatabase::load(technology_ids, catalog);

    debug!(
        ?owner,
        restored = loaded.database.len(),
        dropped = loaded.dropped.len(),
        "restoring technologies"
    );

    if let Ok(mut entity) = commands.get_entity(owner) {
        entity.insert(loaded.database);
    }
}

/// Rebuilds the owner's database from a saved id list.
///
/// While definitions are still loading every id would look unknown, so the
/// restore is queued in [`PendingRestores`] and the owner keeps its current
/// database until [`apply_pending_restores`] runs it.
pub fn restore_technologies(
    trigger: On<RestoreTechnologies>,
    index: Res<TechnologyIndex>,
    assets: Res<Assets<TechnologyDefinition>>,
    loading: Option<Res<TechnologiesLoading>>,
    mut pending: ResMut<PendingRestores>,
    mut commands: Commands,
) {
    let event = trigger.event();

    if !catalog_ready(&index, loading.as_deref()) {
        debug!(owner = ?event.entity, "technologies still loading, restore deferred");
        pending
            .0
            .push((event.entity, event.technology_ids.clone()));
        return;
    }

    restore(
        &mut commands,
        event.entity,
        &event.technology_ids,
        &index.catalog(&assets),
    );
}

/// Runs the restores that were deferred while definitions were loading.
pub fn apply_pending_restores(
    index: Res<TechnologyIndex>,
    assets: Res<Assets<TechnologyDefinition>>,
    loading: Option<Res<TechnologiesLoading>>,
    mut pending: ResMut<PendingRestores>,
    mut commands: Commands,
) {
    if pending.0.is_empty() || !catalog_ready(&index, loading.as_deref()) {
        return;
    }

    let catalog = index.catalog(&assets);
    for (owner, technology_ids) in pending.0.drain(..) {
        restore(&mut commands, owner, &technology_ids, &catalog);
    }
}
