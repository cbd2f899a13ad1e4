use {
    bevy::{log::LogPlugin, prelude::*},
    core::CorePlugin,
};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins.set(LogPlugin {
                filter: "error,action_blocker=debug,\
                    research=info,\
                    technology_components=warn,\
                    core=info"
                    .into(),
                level: bevy::log::Level::TRACE,
                ..Default::default()
            }),
        )
        .add_plugins(CorePlugin)
        .run();
}
