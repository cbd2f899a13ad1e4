use {
    crate::*,
    bevy::{platform::collections::HashMap, prelude::*},
};

#[derive(Resource, Default)]
struct Outcomes {
    unlocked: Vec<(Entity, String, Vec<String>)>,
    rejected: Vec<(Entity, String, UnlockRejection)>,
}

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(AssetPlugin::default())
        .add_plugins(ResearchPlugin)
        .init_resource::<Outcomes>()
        .add_observer(|trigger: On<TechnologyUnlocked>, mut outcomes: ResMut<Outcomes>| {
            let event = trigger.event();
            outcomes.unlocked.push((
                event.entity,
                event.technology_id.clone(),
                event.recipes.clone(),
            ));
        })
        .add_observer(
            |trigger: On<TechnologyUnlockRejected>, mut outcomes: ResMut<Outcomes>| {
                let event = trigger.event();
                outcomes.rejected.push((
                    event.entity,
                    event.technology_id.clone(),
                    event.reason.clone(),
                ));
            },
        );
    app
}

/// Adds the definitions and runs until they are indexed. The returned handles
/// keep the assets alive until the index holds its own.
fn add_technologies(
    app: &mut App,
    definitions: impl IntoIterator<Item = TechnologyDefinition>,
) -> Vec<Handle<TechnologyDefinition>> {
    let mut assets = app
        .world_mut()
        .resource_mut::<Assets<TechnologyDefinition>>();
    let handles = definitions
        .into_iter()
        .map(|definition| assets.add(definition))
        .collect();

    // Asset events are written in PostUpdate and indexed on the next Update.
    app.update();
    app.update();
    handles
}

fn request(app: &mut App, owner: Entity, technology_id: &str) {
    app.world_mut().trigger(UnlockTechnologyRequest {
        entity: owner,
        technology_id: technology_id.to_string(),
    });
    app.world_mut().flush();
}

#[test]
fn test_added_assets_are_indexed() {
    let mut app = test_app();
    add_technologies(
        &mut app,
        [
            TechnologyDefinition::new("salvage"),
            TechnologyDefinition::new("mining").requires(["salvage"]),
        ],
    );

    let index = app.world().resource::<TechnologyIndex>();
    let assets = app.world().resource::<Assets<TechnologyDefinition>>();
    let catalog = index.catalog(assets);

    assert_eq!(index.handles.len(), 2);
    assert_eq!(
        catalog.resolve("mining").map(|def| def.required_technologies.clone()),
        Some(vec!["salvage".to_string()])
    );
    assert!(catalog.resolve("bluespace").is_none());
}

#[test]
fn test_unlock_request_follows_prerequisites() {
    let mut app = test_app();
    add_technologies(
        &mut app,
        [
            TechnologyDefinition::new("salvage").unlocks_recipes(["mining_drill"]),
            TechnologyDefinition::new("mining").requires(["salvage"]),
        ],
    );
    let server = app.world_mut().spawn(TechnologyDatabase::default()).id();

    request(&mut app, server, "mining");
    request(&mut app, server, "salvage");
    request(&mut app, server, "mining");

    let database = app.world().get::<TechnologyDatabase>(server).unwrap();
    assert_eq!(
        database.to_id_list(),
        vec!["mining".to_string(), "salvage".to_string()]
    );
    assert!(database.is_recipe_unlocked("mining_drill"));

    let outcomes = app.world().resource::<Outcomes>();
    assert_eq!(
        outcomes.unlocked,
        vec![
            (server, "salvage".to_string(), vec!["mining_drill".to_string()]),
            (server, "mining".to_string(), vec![]),
        ]
    );
    assert_eq!(
        outcomes.rejected,
        vec![(
            server,
            "mining".to_string(),
            UnlockRejection::Invalid(UnlockError::MissingPrerequisite {
                technology: "mining".to_string(),
                prerequisite: "salvage".to_string(),
            })
        )]
    );
}

#[test]
fn test_unknown_technology_is_rejected() {
    let mut app = test_app();
    add_technologies(&mut app, [TechnologyDefinition::new("salvage")]);
    let server = app.world_mut().spawn(TechnologyDatabase::default()).id();

    request(&mut app, server, "bluespace");

    let outcomes = app.world().resource::<Outcomes>();
    assert!(outcomes.unlocked.is_empty());
    assert_eq!(
        outcomes.rejected[0].2,
        UnlockRejection::Invalid(UnlockError::UnknownTechnology("bluespace".to_string()))
    );
}

#[test]
fn test_request_without_database_is_rejected() {
    let mut app = test_app();
    add_technologies(&mut app, [TechnologyDefinition::new("salvage")]);
    let crate_entity = app.world_mut().spawn_empty().id();

    request(&mut app, crate_entity, "salvage");

    let outcomes = app.world().resource::<Outcomes>();
    assert_eq!(
        outcomes.rejected,
        vec![(crate_entity, "salvage".to_string(), UnlockRejection::NoDatabase)]
    );
}

#[test]
fn test_restore_drops_unknown_ids() {
    let mut app = test_app();
    add_technologies(
        &mut app,
        [
            TechnologyDefinition::new("salvage").unlocks_recipes(["mining_drill"]),
            TechnologyDefinition::new("mining").requires(["salvage"]),
        ],
    );
    let server = app.world_mut().spawn_empty().id();

    app.world_mut().trigger(RestoreTechnologies {
        entity: server,
        technology_ids: vec![
            "salvage".to_string(),
            "retired_tech".to_string(),
            "mining".to_string(),
        ],
    });
    app.world_mut().flush();

    let database = app.world().get::<TechnologyDatabase>(server).unwrap();
    assert_eq!(
        database.to_id_list(),
        vec!["mining".to_string(), "salvage".to_string()]
    );
    assert!(database.is_recipe_unlocked("mining_drill"));
    assert!(!database.is_unlocked("retired_tech"));
}

fn restore(app: &mut App, owner: Entity, technology_ids: &[&str]) {
    app.world_mut().trigger(RestoreTechnologies {
        entity: owner,
        technology_ids: technology_ids.iter().map(ToString::to_string).collect(),
    });
    app.world_mut().flush();
}

fn resolves(app: &App, technology_id: &str) -> Option<TechnologyDefinition> {
    let index = app.world().resource::<TechnologyIndex>();
    let assets = app.world().resource::<Assets<TechnologyDefinition>>();
    index.catalog(assets).resolve(technology_id).cloned()
}

#[test]
fn test_restore_waits_for_definitions() {
    let mut app = test_app();
    let catalog: HashMap<String, TechnologyDefinition> =
        [("salvage".to_string(), TechnologyDefinition::new("salvage"))]
            .into_iter()
            .collect();
    let server = app
        .world_mut()
        .spawn(TechnologyDatabase::load(["salvage"], &catalog).database)
        .id();

    restore(&mut app, server, &["salvage", "mining"]);

    let database = app.world().get::<TechnologyDatabase>(server).unwrap();
    assert_eq!(database.to_id_list(), vec!["salvage".to_string()]);
    assert_eq!(app.world().resource::<PendingRestores>().0.len(), 1);

    add_technologies(
        &mut app,
        [
            TechnologyDefinition::new("salvage"),
            TechnologyDefinition::new("mining").requires(["salvage"]),
        ],
    );

    let database = app.world().get::<TechnologyDatabase>(server).unwrap();
    assert_eq!(
        database.to_id_list(),
        vec!["mining".to_string(), "salvage".to_string()]
    );
    assert!(app.world().resource::<PendingRestores>().0.is_empty());
}

#[test]
fn test_restore_waits_while_folder_is_loading() {
    let mut app = test_app();
    app.insert_resource(TechnologiesLoading);
    add_technologies(&mut app, [TechnologyDefinition::new("salvage")]);
    let server = app.world_mut().spawn(TechnologyDatabase::default()).id();

    restore(&mut app, server, &["salvage"]);
    app.update();
    assert!(!app.world().get::<TechnologyDatabase>(server).unwrap().is_unlocked("salvage"));

    app.world_mut().remove_resource::<TechnologiesLoading>();
    app.update();
    assert!(app.world().get::<TechnologyDatabase>(server).unwrap().is_unlocked("salvage"));
}

#[test]
fn test_removed_asset_stops_resolving() {
    let mut app = test_app();
    let handles = add_technologies(
        &mut app,
        [
            TechnologyDefinition::new("salvage"),
            TechnologyDefinition::new("mining"),
        ],
    );
    assert!(resolves(&app, "salvage").is_some());

    app.world_mut()
        .resource_mut::<Assets<TechnologyDefinition>>()
        .remove(handles[0].id());
    app.update();
    app.update();

    assert!(resolves(&app, "salvage").is_none());
    assert!(resolves(&app, "mining").is_some());
    assert_eq!(app.world().resource::<TechnologyIndex>().handles.len(), 1);
}

#[test]
fn test_modified_asset_is_rekeyed() {
    let mut app = test_app();
    let handles = add_technologies(&mut app, [TechnologyDefinition::new("salvage")]);
    assert!(resolves(&app, "salvage").is_some());

    app.world_mut()
        .resource_mut::<Assets<TechnologyDefinition>>()
        .get_mut(&handles[0])
        .unwrap()
        .id = "salvage_equipment".to_string();
    app.update();
    app.update();

    assert!(resolves(&app, "salvage").is_none());
    assert_eq!(
        resolves(&app, "salvage_equipment").map(|def| def.id),
        Some("salvage_equipment".to_string())
    );
    assert_eq!(app.world().resource::<TechnologyIndex>().handles.len(), 1);
}

#[test]
fn test_removing_a_duplicate_keeps_the_other_definition() {
    let mut app = test_app();
    let handles = add_technologies(
        &mut app,
        [
            TechnologyDefinition::new("salvage").unlocks_recipes(["crowbar"]),
            TechnologyDefinition::new("salvage").unlocks_recipes(["welder"]),
        ],
    );
    assert_eq!(
        resolves(&app, "salvage").map(|def| def.unlocked_recipes),
        Some(vec!["welder".to_string()])
    );

    app.world_mut()
        .resource_mut::<Assets<TechnologyDefinition>>()
        .remove(handles[1].id());
    app.update();
    app.update();

    assert_eq!(
        resolves(&app, "salvage").map(|def| def.unlocked_recipes),
        Some(vec!["crowbar".to_string()])
    );
}
