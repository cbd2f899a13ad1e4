use {bevy::prelude::*, research::*};

#[test]
fn research_tree_unlocks_in_order_and_survives_a_save() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(AssetPlugin::default())
        .add_plugins(ResearchPlugin);

    // 1. Setup Assets
    let mut assets = app
        .world_mut()
        .resource_mut::<Assets<TechnologyDefinition>>();
    // Keep the handles alive, dropped ones are unloaded before indexing.
    let _handles = vec![
        assets.add(TechnologyDefinition::new("a")),
        assets.add(TechnologyDefinition::new("b").requires(["a"])),
        assets.add(TechnologyDefinition::new("c").requires(["a", "b"])),
    ];

    // Asset events land in PostUpdate, the index picks them up next frame.
    app.update();
    app.update();

    let server = app.world_mut().spawn(TechnologyDatabase::default()).id();

    assert_eligibility(&app, server, [("a", true), ("b", false), ("c", false)]);

    unlock(&mut app, server, "a");
    assert_eligibility(&app, server, [("a", false), ("b", true), ("c", false)]);

    unlock(&mut app, server, "b");
    assert_eligibility(&app, server, [("a", false), ("b", false), ("c", true)]);

    // Save, then restore onto a fresh owner.
    let saved = app
        .world()
        .get::<TechnologyDatabase>(server)
        .unwrap()
        .to_id_list();
    assert_eq!(saved, vec!["a".to_string(), "b".to_string()]);

    let restored = app.world_mut().spawn_empty().id();
    app.world_mut().trigger(RestoreTechnologies {
        entity: restored,
        technology_ids: saved,
    });
    app.world_mut().flush();

    assert_eq!(
        app.world().get::<TechnologyDatabase>(restored),
        app.world().get::<TechnologyDatabase>(server)
    );
}

fn unlock(app: &mut App, owner: Entity, technology_id: &str) {
    app.world_mut().trigger(UnlockTechnologyRequest {
        entity: owner,
        technology_id: technology_id.to_string(),
    });
    app.world_mut().flush();

    let database = app.world().get::<TechnologyDatabase>(owner).unwrap();
    assert!(database.is_unlocked(technology_id), "{technology_id} should be unlocked");
}

fn assert_eligibility<const N: usize>(app: &App, owner: Entity, expected: [(&str, bool); N]) {
    let index = app.world().resource::<TechnologyIndex>();
    let assets = app.world().resource::<Assets<TechnologyDefinition>>();
    let catalog = index.catalog(assets);
    let database = app.world().get::<TechnologyDatabase>(owner).unwrap();

    for (id, eligible) in expected {
        assert_eq!(
            database.can_unlock(catalog.resolve(id), &catalog),
            eligible,
            "eligibility mismatch for {id}"
        );
    }
}
