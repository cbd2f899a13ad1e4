use {
    bevy::{asset::LoadedFolder, prelude::*},
    research::TechnologiesLoading,
};

#[derive(Debug, Resource)]
pub(crate) struct TechnologiesFolderHandle(pub Handle<LoadedFolder>);

pub(crate) fn load_technologies(mut cmd: Commands, asset_server: Res<AssetServer>) {
    info!("started loading technologies");
    let handle = asset_server.load_folder("technologies");
    cmd.insert_resource(TechnologiesFolderHandle(handle));
    cmd.insert_resource(TechnologiesLoading);
}

/// Lifts [`TechnologiesLoading`] once the technology folder finished loading.
pub(crate) fn report_technology_load(
    mut cmd: Commands,
    mut events: MessageReader<AssetEvent<LoadedFolder>>,
    folder: Option<Res<TechnologiesFolderHandle>>,
    folders: Res<Assets<LoadedFolder>>,
) {
    let Some(folder) = folder else {
        return;
    };

    for event in events.read() {
        if event.is_loaded_with_dependencies(&folder.0) {
            let files = folders.get(&folder.0).map_or(0, |loaded| loaded.handles.len());
            info!(%files, "technology folder loaded");
            cmd.remove_resource::<TechnologiesLoading>();
        }
    }
}
