//! Create/edit form for a single recipe.
//!
//! The form only coerces types: text fields are taken as-is, numeric fields
//! are parsed from text. There are no business rules (a recipe may have no
//! stages, stage durations need not add up to anything in particular).

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use uuid::Uuid;

use crate::models::{Recipe, RecipePatch, Stage, validate_durations};
use crate::service::RecipeBook;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeField {
    Name,
    Brewer,
    Dose,
    Water,
    Ratio,
    Temperature,
    GrindSize,
    DrainTime,
}

impl FromStr for RecipeField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "name" => Ok(RecipeField::Name),
            "brewer" => Ok(RecipeField::Brewer),
            "dose" => Ok(RecipeField::Dose),
            "water" => Ok(RecipeField::Water),
            "ratio" => Ok(RecipeField::Ratio),
            "temperature" | "temp" => Ok(RecipeField::Temperature),
            "grindsize" | "grind" => Ok(RecipeField::GrindSize),
            "draintime" | "drain" => Ok(RecipeField::DrainTime),
            _ => bail!(
                "Unknown field '{s}'. Use name, brewer, dose, water, ratio, temperature, grind-size or drain-time"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageField {
    Name,
    Water,
    Duration,
    Instructions,
}

/// Parse a numeric form value. Blank input means "not set".
pub fn coerce_number(raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw
        .parse()
        .with_context(|| format!("Expected a number, got '{raw}'"))?;
    if !value.is_finite() {
        bail!("Expected a number, got '{raw}'");
    }
    Ok(Some(value))
}

/// Parse a duration in whole seconds. Fractions are rounded.
#[allow(clippy::cast_sign_loss)]
pub fn coerce_seconds(raw: &str) -> Result<Option<u32>> {
    match coerce_number(raw)? {
        None => Ok(None),
        Some(v) if v < 0.0 || v > f64::from(u32::MAX) => {
            bail!("Expected a non-negative number of seconds, got '{}'", raw.trim())
        }
        Some(v) => Ok(Some(v.round() as u32)),
    }
}

#[derive(Debug, Clone)]
pub struct RecipeForm {
    initial_id: Option<String>,
    values: Recipe,
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeForm {
    /// Blank form for a new recipe.
    #[must_use]
    pub fn new() -> Self {
        RecipeForm {
            initial_id: None,
            values: Recipe {
                id: String::new(),
                name: Some(String::new()),
                brewer: Some(String::new()),
                dose: None,
                water: None,
                ratio: Some(String::new()),
                temperature: None,
                grind_size: Some(String::new()),
                drain_time: None,
                stages: Vec::new(),
            },
        }
    }

    /// Form pre-filled from an existing recipe. Stages without an id get one.
    #[must_use]
    pub fn edit(recipe: &Recipe) -> Self {
        let mut values = recipe.clone();
        for stage in &mut values.stages {
            if stage.id.is_none() {
                stage.id = Some(Uuid::new_v4().to_string());
            }
        }
        RecipeForm {
            initial_id: Some(recipe.id.clone()),
            values,
        }
    }

    #[must_use]
    pub fn is_edit(&self) -> bool {
        self.initial_id.is_some()
    }

    #[must_use]
    pub fn values(&self) -> &Recipe {
        &self.values
    }

    pub fn set(&mut self, field: RecipeField, raw: &str) -> Result<()> {
        let v = &mut self.values;
        match field {
            RecipeField::Name => v.name = Some(raw.to_string()),
            RecipeField::Brewer => v.brewer = Some(raw.to_string()),
            RecipeField::Ratio => v.ratio = Some(raw.to_string()),
            RecipeField::GrindSize => v.grind_size = Some(raw.to_string()),
            RecipeField::Dose => v.dose = coerce_number(raw).context("dose")?,
            RecipeField::Water => v.water = coerce_number(raw).context("water")?,
            RecipeField::Temperature => {
                v.temperature = coerce_number(raw).context("temperature")?;
            }
            RecipeField::DrainTime => {
                let drain = coerce_seconds(raw).context("drain time")?;
                let previous = std::mem::replace(&mut v.drain_time, drain);
                if let Err(e) = validate_durations(v) {
                    v.drain_time = previous;
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Append a blank stage and return its position.
    pub fn append_stage(&mut self) -> usize {
        self.values.stages.push(Stage {
            id: Some(Uuid::new_v4().to_string()),
            name: Some(String::new()),
            water: None,
            duration: None,
            instructions: Some(String::new()),
        });
        self.values.stages.len() - 1
    }

    pub fn set_stage(&mut self, index: usize, field: StageField, raw: &str) -> Result<()> {
        let count = self.values.stages.len();
        let Some(stage) = self.values.stages.get_mut(index) else {
            bail!("No stage {} (recipe has {count})", index + 1);
        };
        match field {
            StageField::Name => stage.name = Some(raw.to_string()),
            StageField::Instructions => stage.instructions = Some(raw.to_string()),
            StageField::Water => stage.water = coerce_number(raw).context("stage water")?,
            StageField::Duration => {
                let duration = coerce_seconds(raw).context("stage duration")?;
                let previous = std::mem::replace(&mut stage.duration, duration);
                if let Err(e) = validate_durations(&self.values) {
                    self.values.stages[index].duration = previous;
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    pub fn remove_stage(&mut self, index: usize) -> Result<Stage> {
        if index >= self.values.stages.len() {
            bail!(
                "No stage {} (recipe has {})",
                index + 1,
                self.values.stages.len()
            );
        }
        Ok(self.values.stages.remove(index))
    }

    pub fn clear_stages(&mut self) {
        self.values.stages.clear();
    }

    /// Create the recipe, or update the one the form was opened for.
    pub fn submit(self, book: &mut RecipeBook) -> Result<Recipe> {
        match self.initial_id {
            Some(id) => book.update(&id, &RecipePatch::replace_with(&self.values)),
            None => book.add(self.values),
        }
    }
}
