use std::path::Path;

use anyhow::{Context, Result, bail};
use uuid::Uuid;

use crate::db::{Database, LOCALE_KEY, RECIPES_KEY, SOUND_ENABLED_KEY, VIBRATION_ENABLED_KEY};
use crate::defaults::default_recipes;
use crate::locale::{DEFAULT_LOCALE, validate_locale};
use crate::models::{Preferences, Recipe, RecipePatch, validate_durations};

/// Shortest id prefix accepted by [`RecipeBook::find`].
pub const MIN_ID_PREFIX: usize = 4;

/// Recipes sharing one brewer label, in first-appearance order.
#[derive(Debug, Clone)]
pub struct BrewerGroup<'a> {
    pub brewer: &'a str,
    pub recipes: Vec<&'a Recipe>,
}

/// The recipe collection, held in memory and mirrored to storage on every
/// change.
pub struct RecipeBook {
    db: Database,
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn open(path: &Path) -> Result<Self> {
        Self::load(Database::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::load(Database::open_in_memory()?)
    }

    /// Read the stored collection once. A missing collection is seeded with
    /// the defaults; an unreadable one is replaced in memory only.
    pub fn load(db: Database) -> Result<Self> {
        let stored = db.get_value(RECIPES_KEY)?;
        let recipes = match stored {
            Some(blob) => match serde_json::from_str::<Vec<Recipe>>(&blob) {
                Ok(recipes) => recipes,
                Err(e) => {
                    tracing::warn!("stored recipes are unreadable, using defaults: {e}");
                    default_recipes()
                }
            },
            None => {
                let recipes = default_recipes();
                tracing::info!("seeding {} default recipes", recipes.len());
                save(&db, &recipes)?;
                return Ok(RecipeBook { db, recipes });
            }
        };
        Ok(RecipeBook { db, recipes })
    }

    /// Store `recipes` and only then make them the current collection, so a
    /// failed write leaves memory and storage in agreement.
    fn commit(&mut self, recipes: Vec<Recipe>) -> Result<()> {
        save(&self.db, &recipes)?;
        self.recipes = recipes;
        Ok(())
    }

    // --- Recipes ---

    #[must_use]
    pub fn list(&self) -> &[Recipe] {
        &self.recipes
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Resolve user input to a recipe: exact id, then a unique id prefix,
    /// then an exact (case-insensitive) name.
    pub fn find(&self, key: &str) -> Result<Option<&Recipe>> {
        let key = key.trim();
        if let Some(r) = self.get(key) {
            return Ok(Some(r));
        }

        if key.len() >= MIN_ID_PREFIX {
            let by_prefix: Vec<&Recipe> = self
                .recipes
                .iter()
                .filter(|r| r.id.starts_with(key))
                .collect();
            match by_prefix.len() {
                0 => {}
                1 => return Ok(Some(by_prefix[0])),
                n => bail!("Id prefix '{key}' matches {n} recipes; use more characters"),
            }
        }

        let lower = key.to_lowercase();
        let by_name: Vec<&Recipe> = self
            .recipes
            .iter()
            .filter(|r| r.name.as_deref().is_some_and(|n| n.to_lowercase() == lower))
            .collect();
        match by_name.len() {
            0 => Ok(None),
            1 => Ok(Some(by_name[0])),
            n => bail!("Name '{key}' matches {n} recipes; use the id instead"),
        }
    }

    /// Store a new recipe under a freshly assigned identifier.
    pub fn add(&mut self, recipe: Recipe) -> Result<Recipe> {
        validate_durations(&recipe)?;
        let recipe = Recipe {
            id: Uuid::new_v4().to_string(),
            ..recipe
        };
        let mut recipes = self.recipes.clone();
        recipes.push(recipe.clone());
        self.commit(recipes)?;
        Ok(recipe)
    }

    pub fn update(&mut self, id: &str, patch: &RecipePatch) -> Result<Recipe> {
        let mut recipes = self.recipes.clone();
        let Some(recipe) = recipes.iter_mut().find(|r| r.id == id) else {
            bail!("Recipe not found: {id}");
        };
        patch.apply(recipe);
        validate_durations(recipe)?;
        let updated = recipe.clone();
        self.commit(recipes)?;
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let recipes = self.recipes.iter().filter(|r| r.id != id).cloned().collect();
        self.commit(recipes)?;
        Ok(true)
    }

    /// Append a copy with a new identifier and a ` (Copy)` name suffix.
    pub fn duplicate(&mut self, id: &str) -> Result<Recipe> {
        let Some(original) = self.get(id) else {
            bail!("Recipe not found: {id}");
        };
        let copy = Recipe {
            id: Uuid::new_v4().to_string(),
            name: Some(format!("{} (Copy)", original.display_name())),
            ..original.clone()
        };
        let mut recipes = self.recipes.clone();
        recipes.push(copy.clone());
        self.commit(recipes)?;
        Ok(copy)
    }

    /// Replace the whole collection, giving every recipe a new identifier.
    /// Nothing changes if any recipe is rejected.
    pub fn import(&mut self, recipes: Vec<Recipe>) -> Result<usize> {
        for recipe in &recipes {
            validate_durations(recipe).context("Failed to import recipes")?;
        }
        let recipes: Vec<Recipe> = recipes
            .into_iter()
            .map(|r| Recipe {
                id: Uuid::new_v4().to_string(),
                ..r
            })
            .collect();
        let count = recipes.len();
        self.commit(recipes)?;
        Ok(count)
    }

    /// Parse an exported file and import it. Malformed input leaves the
    /// collection untouched.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let recipes: Vec<Recipe> = serde_json::from_str(json)
            .context("Failed to import recipes: Invalid JSON file.")?;
        self.import(recipes)
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.recipes)?)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.commit(default_recipes())
    }

    /// Recipes with a brewer, grouped by it. Recipes without one are left
    /// out.
    #[must_use]
    pub fn grouped_by_brewer(&self) -> Vec<BrewerGroup<'_>> {
        let mut groups: Vec<BrewerGroup<'_>> = Vec::new();
        for recipe in &self.recipes {
            let Some(brewer) = recipe.brewer.as_deref().filter(|b| !b.is_empty()) else {
                continue;
            };
            match groups.iter_mut().find(|g| g.brewer == brewer) {
                Some(group) => group.recipes.push(recipe),
                None => groups.push(BrewerGroup {
                    brewer,
                    recipes: vec![recipe],
                }),
            }
        }
        groups
    }

    // --- Preferences ---

    pub fn preferences(&self) -> Result<Preferences> {
        let defaults = Preferences::default();
        Ok(Preferences {
            sound_enabled: self
                .db
                .get_flag(SOUND_ENABLED_KEY)?
                .unwrap_or(defaults.sound_enabled),
            vibration_enabled: self
                .db
                .get_flag(VIBRATION_ENABLED_KEY)?
                .unwrap_or(defaults.vibration_enabled),
            locale: self
                .db
                .get_value(LOCALE_KEY)?
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        })
    }

    pub fn set_sound_enabled(&self, enabled: bool) -> Result<()> {
        self.db.set_flag(SOUND_ENABLED_KEY, enabled)
    }

    pub fn set_vibration_enabled(&self, enabled: bool) -> Result<()> {
        self.db.set_flag(VIBRATION_ENABLED_KEY, enabled)
    }

    /// Flip the sound preference, returning the new value.
    pub fn toggle_sound(&self) -> Result<bool> {
        let enabled = !self.preferences()?.sound_enabled;
        self.set_sound_enabled(enabled)?;
        Ok(enabled)
    }

    pub fn toggle_vibration(&self) -> Result<bool> {
        let enabled = !self.preferences()?.vibration_enabled;
        self.set_vibration_enabled(enabled)?;
        Ok(enabled)
    }

    pub fn set_locale(&self, locale: &str) -> Result<String> {
        let locale = validate_locale(locale)?;
        self.db.set_value(LOCALE_KEY, &locale)?;
        Ok(locale)
    }
}

fn save(db: &Database, recipes: &[Recipe]) -> Result<()> {
    let blob = serde_json::to_string(recipes)?;
    db.set_value(RECIPES_KEY, &blob)
        .context("Failed to save recipes")
}
