//! Per-owner record of unlocked technologies and the prerequisite check that
//! guards it.
//!
//! Every operation takes the catalog explicitly, so the same code runs
//! against the live asset index and against a plain map in tests and tools.

use {
    bevy::{
        platform::collections::{HashMap, HashSet},
        prelude::*,
    },
    technology_assets::TechnologyDefinition,
    thiserror::Error,
};

/// Read-only lookup of technology definitions by id.
pub trait TechnologyCatalog {
    fn resolve(&self, id: &str) -> Option<&TechnologyDefinition>;
}

impl TechnologyCatalog for HashMap<String, TechnologyDefinition> {
    fn resolve(&self, id: &str) -> Option<&TechnologyDefinition> {
        self.get(id)
    }
}

/// Why a technology cannot be unlocked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnlockError {
    #[error("technology `{0}` is already unlocked")]
    AlreadyUnlocked(String),
    #[error("technology `{technology}` requires `{prerequisite}`, which is not in the catalog")]
    UnknownPrerequisite {
        technology: String,
        prerequisite: String,
    },
    #[error("technology `{technology}` requires `{prerequisite}` to be unlocked first")]
    MissingPrerequisite {
        technology: String,
        prerequisite: String,
    },
    #[error("technology `{0}` is not in the catalog")]
    UnknownTechnology(String),
}

/// Technologies (and the recipes they grant) unlocked by the owning entity.
///
/// Ids only get in through [`TechnologyDatabase::unlock`], which checks
/// prerequisites, or through [`TechnologyDatabase::load`], which drops ids
/// the catalog does not know. Together this keeps every unlocked technology's
/// own prerequisites unlocked, so [`TechnologyDatabase::can_unlock`] only has
/// to look one level deep.
#[derive(Component, Default, Debug, Clone, PartialEq)]
pub struct TechnologyDatabase {
    unlocked_technologies: HashSet<String>,
    unlocked_recipes: HashSet<String>,
}

/// Result of [`TechnologyDatabase::load`].
#[derive(Debug, Default)]
pub struct LoadedTechnologies {
    pub database: TechnologyDatabase,
    /// Saved ids the catalog no longer knows, in input order.
    pub dropped: Vec<String>,
}

impl TechnologyDatabase {
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked_technologies.contains(id)
    }

    pub fn is_recipe_unlocked(&self, recipe: &str) -> bool {
        self.unlocked_recipes.contains(recipe)
    }

    pub fn len(&self) -> usize {
        self.unlocked_technologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked_technologies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.unlocked_technologies.iter().map(String::as_str)
    }

    /// Whether `node` is locked and every one of its direct prerequisites is
    /// in the catalog and unlocked.
    pub fn can_unlock(
        &self,
        node: Option<&TechnologyDefinition>,
        catalog: &impl TechnologyCatalog,
    ) -> bool {
        match node {
            Some(node) => self.unlock_rejection(node, catalog).is_none(),
            None => false,
        }
    }

    /// The first reason `node` cannot be unlocked, if any.
    pub fn unlock_rejection(
        &self,
        node: &TechnologyDefinition,
        catalog: &impl TechnologyCatalog,
    ) -> Option<UnlockError> {
        if self.is_unlocked(&node.id) {
            return Some(UnlockError::AlreadyUnlocked(node.id.clone()));
        }

        for required in &node.required_technologies {
            let Some(prerequisite) = catalog.resolve(required) else {
                return Some(UnlockError::UnknownPrerequisite {
                    technology: node.id.clone(),
                    prerequisite: required.clone(),
                });
            };

            if !self.is_unlocked(&prerequisite.id) {
                return Some(UnlockError::MissingPrerequisite {
                    technology: node.id.clone(),
                    prerequisite: prerequisite.id.clone(),
                });
            }
        }

        None
    }

    /// Unlocks `node` and grants its recipes. Refuses when
    /// [`Self::can_unlock`] would say no.
    pub fn unlock(
        &mut self,
        node: &TechnologyDefinition,
        catalog: &impl TechnologyCatalog,
    ) -> Result<(), UnlockError> {
        if let Some(rejection) = self.unlock_rejection(node, catalog) {
            return Err(rejection);
        }

        self.insert(node);
        Ok(())
    }

    fn insert(&mut self, node: &TechnologyDefinition) {
        self.unlocked_technologies.insert(node.id.clone());
        self.unlocked_recipes
            .extend(node.unlocked_recipes.iter().cloned());
    }

    /// Unlocked ids, sorted so saved and replicated output is stable.
    pub fn to_id_list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.unlocked_technologies.iter().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Recipes granted by the unlocked technologies, sorted.
    pub fn unlocked_recipes(&self) -> Vec<&str> {
        let mut recipes: Vec<&str> = self.unlocked_recipes.iter().map(String::as_str).collect();
        recipes.sort_unstable();
        recipes
    }

    /// Rebuilds a database from saved ids.
    ///
    /// Ids the catalog does not resolve are dropped and reported, never an
    /// error: an older or newer catalog should still load a save.
    pub fn load<I, S>(ids: I, catalog: &impl TechnologyCatalog) -> LoadedTechnologies
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut loaded = LoadedTechnologies::default();

        for id in ids {
            let id = id.as_ref();
            match catalog.resolve(id) {
                Some(node) => loaded.database.insert(node),
                None => loaded.dropped.push(id.to_string()),
            }
        }

        if !loaded.dropped.is_empty() {
            warn!(dropped = ?loaded.dropped, "saved technologies missing from the catalog were dropped");
        }

        loaded
    }
}
