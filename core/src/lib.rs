use {action_blocker::ActionBlockerPlugin, bevy::prelude::*, research::ResearchPlugin};

mod systems;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ActionBlockerPlugin, ResearchPlugin))
            .add_systems(Startup, systems::load_technologies)
            .add_systems(Update, systems::report_technology_load);
    }
}
