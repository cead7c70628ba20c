use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Placeholder shown for any recipe field that was never filled in.
pub const NOT_AVAILABLE: &str = "N/A";

pub const DRAIN_STAGE_NAME: &str = "Drain";
pub const DRAIN_INSTRUCTIONS: &str = "Allow to drain";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brewer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grind_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drain_time: Option<u32>,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Recipe {
    /// Sum of every stage duration plus the drain time, in seconds.
    /// Saturates at `u32::MAX`; [`validate_durations`] keeps stored recipes
    /// below that.
    #[must_use]
    pub fn total_duration(&self) -> u32 {
        self.checked_total_duration().unwrap_or(u32::MAX)
    }

    /// Total duration, or `None` when it does not fit in a `u32`.
    #[must_use]
    pub fn checked_total_duration(&self) -> Option<u32> {
        self.stages
            .iter()
            .map(Stage::duration_secs)
            .try_fold(self.drain_secs(), u32::checked_add)
    }

    #[must_use]
    pub fn drain_secs(&self) -> u32 {
        self.drain_time.unwrap_or(0)
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Untitled Recipe")
    }

    #[must_use]
    pub fn display_brewer(&self) -> String {
        text_or_na(self.brewer.as_deref())
    }

    #[must_use]
    pub fn display_dose(&self) -> String {
        number_or_na(self.dose, "g")
    }

    #[must_use]
    pub fn display_water(&self) -> String {
        number_or_na(self.water, "ml")
    }

    #[must_use]
    pub fn display_ratio(&self) -> String {
        text_or_na(self.ratio.as_deref())
    }

    #[must_use]
    pub fn display_temperature(&self) -> String {
        number_or_na(self.temperature, "°C")
    }

    #[must_use]
    pub fn display_grind_size(&self) -> String {
        text_or_na(self.grind_size.as_deref())
    }
}

impl Stage {
    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration.unwrap_or(0)
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Untitled Stage")
    }

    #[must_use]
    pub fn display_instructions(&self) -> &str {
        self.instructions
            .as_deref()
            .filter(|i| !i.is_empty())
            .unwrap_or("No instructions")
    }
}

/// Shallow field merge applied by an update. `None` leaves a field alone;
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(clippy::option_option)]
pub struct RecipePatch {
    pub name: Option<Option<String>>,
    pub brewer: Option<Option<String>>,
    pub dose: Option<Option<f64>>,
    pub water: Option<Option<f64>>,
    pub ratio: Option<Option<String>>,
    pub temperature: Option<Option<f64>>,
    pub grind_size: Option<Option<String>>,
    pub drain_time: Option<Option<u32>>,
    pub stages: Option<Vec<Stage>>,
}

impl RecipePatch {
    /// A patch that overwrites every field with the values of `recipe`.
    #[must_use]
    pub fn replace_with(recipe: &Recipe) -> Self {
        RecipePatch {
            name: Some(recipe.name.clone()),
            brewer: Some(recipe.brewer.clone()),
            dose: Some(recipe.dose),
            water: Some(recipe.water),
            ratio: Some(recipe.ratio.clone()),
            temperature: Some(recipe.temperature),
            grind_size: Some(recipe.grind_size.clone()),
            drain_time: Some(recipe.drain_time),
            stages: Some(recipe.stages.clone()),
        }
    }

    pub fn apply(&self, recipe: &mut Recipe) {
        if let Some(v) = &self.name {
            recipe.name.clone_from(v);
        }
        if let Some(v) = &self.brewer {
            recipe.brewer.clone_from(v);
        }
        if let Some(v) = self.dose {
            recipe.dose = v;
        }
        if let Some(v) = self.water {
            recipe.water = v;
        }
        if let Some(v) = &self.ratio {
            recipe.ratio.clone_from(v);
        }
        if let Some(v) = self.temperature {
            recipe.temperature = v;
        }
        if let Some(v) = &self.grind_size {
            recipe.grind_size.clone_from(v);
        }
        if let Some(v) = self.drain_time {
            recipe.drain_time = v;
        }
        if let Some(v) = &self.stages {
            recipe.stages.clone_from(v);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == RecipePatch::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub locale: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            sound_enabled: true,
            vibration_enabled: true,
            locale: "en".to_string(),
        }
    }
}

/// Reject a recipe whose stage and drain times add up past `u32::MAX`
/// seconds.
pub fn validate_durations(recipe: &Recipe) -> Result<()> {
    if recipe.checked_total_duration().is_none() {
        bail!(
            "Total brew time of '{}' is too long (stage and drain times must add up to at most {} seconds)",
            recipe.display_name(),
            u32::MAX
        );
    }
    Ok(())
}

fn text_or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn number_or_na(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{}{unit}", format_number(v)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Render a quantity without a trailing `.0` for whole numbers.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// `mm:ss`, zero padded. Minutes grow past two digits for long brews.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        Recipe {
            id: "abc".to_string(),
            name: Some("Single".to_string()),
            brewer: Some("Mr. Clever".to_string()),
            dose: Some(10.0),
            water: Some(150.0),
            ratio: Some("1:15".to_string()),
            temperature: Some(92.0),
            grind_size: Some("Pourover".to_string()),
            drain_time: Some(30),
            stages: vec![
                Stage {
                    name: Some("Bloom".to_string()),
                    water: Some(20.0),
                    duration: Some(30),
                    instructions: Some("-".to_string()),
                    ..Stage::default()
                },
                Stage {
                    name: Some("Brew".to_string()),
                    water: Some(130.0),
                    duration: Some(120),
                    instructions: Some("Stir after pouring all of the water.".to_string()),
                    ..Stage::default()
                },
            ],
        }
    }

    #[test]
    fn test_total_duration() {
        assert_eq!(sample_recipe().total_duration(), 180);
    }

    #[test]
    fn test_total_duration_missing_values() {
        let mut recipe = sample_recipe();
        recipe.drain_time = None;
        recipe.stages[1].duration = None;
        assert_eq!(recipe.total_duration(), 30);
    }

    #[test]
    fn test_total_duration_overflow() {
        let mut recipe = sample_recipe();
        recipe.drain_time = Some(u32::MAX);
        assert_eq!(recipe.checked_total_duration(), None);
        assert_eq!(recipe.total_duration(), u32::MAX);
        assert!(validate_durations(&recipe).is_err());

        recipe.drain_time = Some(u32::MAX - 150);
        assert_eq!(recipe.checked_total_duration(), Some(u32::MAX));
        assert!(validate_durations(&recipe).is_ok());
    }

    #[test]
    fn test_display_na_defaults() {
        let recipe: Recipe = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(recipe.display_name(), "Untitled Recipe");
        assert_eq!(recipe.display_brewer(), "N/A");
        assert_eq!(recipe.display_dose(), "N/A");
        assert_eq!(recipe.display_water(), "N/A");
        assert_eq!(recipe.display_ratio(), "N/A");
        assert_eq!(recipe.display_temperature(), "N/A");
        assert_eq!(recipe.display_grind_size(), "N/A");
        assert!(recipe.stages.is_empty());
    }

    #[test]
    fn test_display_values() {
        let recipe = sample_recipe();
        assert_eq!(recipe.display_dose(), "10g");
        assert_eq!(recipe.display_water(), "150ml");
        assert_eq!(recipe.display_temperature(), "92°C");
        assert_eq!(recipe.display_ratio(), "1:15");
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = serde_json::to_value(sample_recipe()).unwrap();
        assert_eq!(json["grindSize"], "Pourover");
        assert_eq!(json["drainTime"], 30);
        assert!(json["stages"][0].get("id").is_none());
    }

    #[test]
    fn test_json_tolerates_missing_id() {
        let recipe: Recipe =
            serde_json::from_str(r#"{"name":"No id","stages":[{"duration":10}]}"#).unwrap();
        assert_eq!(recipe.id, "");
        assert_eq!(recipe.stages[0].duration_secs(), 10);
        assert_eq!(recipe.stages[0].display_name(), "Untitled Stage");
        assert_eq!(recipe.stages[0].display_instructions(), "No instructions");
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut recipe = sample_recipe();
        let patch = RecipePatch {
            name: Some(Some("Renamed".to_string())),
            ratio: Some(None),
            ..RecipePatch::default()
        };
        patch.apply(&mut recipe);
        assert_eq!(recipe.name.as_deref(), Some("Renamed"));
        assert_eq!(recipe.ratio, None);
        assert_eq!(recipe.brewer.as_deref(), Some("Mr. Clever"));
        assert_eq!(recipe.stages.len(), 2);
    }

    #[test]
    fn test_patch_replace_with_keeps_id() {
        let mut recipe = sample_recipe();
        let mut other = sample_recipe();
        other.id = "other".to_string();
        other.name = None;
        other.stages.clear();
        RecipePatch::replace_with(&other).apply(&mut recipe);
        assert_eq!(recipe.id, "abc");
        assert_eq!(recipe.name, None);
        assert!(recipe.stages.is_empty());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(RecipePatch::default().is_empty());
        let patch = RecipePatch {
            dose: Some(Some(12.0)),
            ..RecipePatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(180), "03:00");
        assert_eq!(format_clock(149), "02:29");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(16.6), "16.6");
    }

    #[test]
    fn test_preferences_default() {
        let prefs = Preferences::default();
        assert!(prefs.sound_enabled);
        assert!(prefs.vibration_enabled);
        assert_eq!(prefs.locale, "en");
    }
}
