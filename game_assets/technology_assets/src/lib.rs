use {
    bevy::prelude::*,
    bevy_common_assets::ron::RonAssetPlugin,
    serde::{Deserialize, Serialize},
};

pub struct TechnologyAssetsPlugin;

impl Plugin for TechnologyAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<TechnologyDefinition>::new(&[
            "technology.ron",
        ]));
    }
}

/// A researchable technology, as authored in `*.technology.ron`.
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TechnologyDefinition {
    /// Unique key (e.g., "basic_robotics").
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ids of technologies that must be unlocked first.
    #[serde(default)]
    pub required_technologies: Vec<String>,
    /// Recipes granted to the owner once this technology is unlocked.
    #[serde(default)]
    pub unlocked_recipes: Vec<String>,
}

impl TechnologyDefinition {
    /// Bare definition with no prerequisites, mostly for tests and tools.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            required_technologies: Vec::new(),
            unlocked_recipes: Vec::new(),
        }
    }

    pub fn requires<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_technologies
            .extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn unlocks_recipes<I, S>(mut self, recipes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unlocked_recipes
            .extend(recipes.into_iter().map(Into::into));
        self
    }
}
