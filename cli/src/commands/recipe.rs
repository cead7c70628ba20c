use anyhow::{Result, bail};
use clap::Args;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use pour_core::form::{RecipeField, RecipeForm};
use pour_core::locale::Dictionary;
use pour_core::models::{NOT_AVAILABLE, Recipe, format_clock, format_number};
use pour_core::service::RecipeBook;

use super::helpers::{
    append_stage, confirm, format_duration, json_error, parse_stage_spec, resolve_recipe,
    short_id, truncate,
};

/// Recipe fields shared by `new` and `edit`. Values are raw text and are
/// coerced by the form; an empty string clears a field.
#[derive(Args, Debug, Default)]
pub(crate) struct RecipeFields {
    /// Recipe name
    #[arg(long)]
    pub name: Option<String>,
    /// Brewer (e.g. "Hario V60", "Mr. Clever")
    #[arg(long)]
    pub brewer: Option<String>,
    /// Coffee dose in grams
    #[arg(long)]
    pub dose: Option<String>,
    /// Water in millilitres
    #[arg(long)]
    pub water: Option<String>,
    /// Coffee to water ratio (e.g. "1:16")
    #[arg(long)]
    pub ratio: Option<String>,
    /// Water temperature in °C
    #[arg(long)]
    pub temperature: Option<String>,
    /// Grind size (e.g. "Medium-fine")
    #[arg(long)]
    pub grind_size: Option<String>,
    /// Drain time in seconds
    #[arg(long)]
    pub drain_time: Option<String>,
    /// Append a stage as "name:water:duration[:instructions]" (repeatable)
    #[arg(long = "stage", value_name = "STAGE")]
    pub stages: Vec<String>,
}

impl RecipeFields {
    fn is_empty(&self) -> bool {
        self.field_values().iter().all(|(_, v)| v.is_none()) && self.stages.is_empty()
    }

    fn field_values(&self) -> [(RecipeField, Option<&str>); 8] {
        [
            (RecipeField::Name, self.name.as_deref()),
            (RecipeField::Brewer, self.brewer.as_deref()),
            (RecipeField::Dose, self.dose.as_deref()),
            (RecipeField::Water, self.water.as_deref()),
            (RecipeField::Ratio, self.ratio.as_deref()),
            (RecipeField::Temperature, self.temperature.as_deref()),
            (RecipeField::GrindSize, self.grind_size.as_deref()),
            (RecipeField::DrainTime, self.drain_time.as_deref()),
        ]
    }

    /// Write every given field into the form, then append the stages.
    pub(crate) fn fill(&self, form: &mut RecipeForm) -> Result<()> {
        for (field, value) in self.field_values() {
            if let Some(raw) = value {
                form.set(field, raw)?;
            }
        }
        for raw in &self.stages {
            append_stage(form, &parse_stage_spec(raw)?)?;
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct RecipeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Dose")]
    dose: String,
    #[tabled(rename = "Water")]
    water: String,
    #[tabled(rename = "Stages")]
    stages: usize,
    #[tabled(rename = "Total")]
    total: String,
}

impl RecipeRow {
    fn from_recipe(recipe: &Recipe) -> Self {
        RecipeRow {
            id: short_id(&recipe.id).to_string(),
            name: truncate(recipe.display_name(), 40),
            dose: recipe.display_dose(),
            water: recipe.display_water(),
            stages: recipe.stages.len(),
            total: format_duration(recipe.total_duration()),
        }
    }
}

fn print_recipe_table(recipes: &[&Recipe]) {
    let rows: Vec<RecipeRow> = recipes.iter().map(|r| RecipeRow::from_recipe(r)).collect();
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn cmd_list(book: &RecipeBook, dict: &Dictionary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(book.list())?);
        return Ok(());
    }

    if book.list().is_empty() {
        println!(
            "{}",
            dict.label(
                "list.empty",
                "No recipes found. Add some recipes to get started!"
            )
        );
        return Ok(());
    }

    for group in book.grouped_by_brewer() {
        println!("\n{}", group.brewer);
        print_recipe_table(&group.recipes);
    }

    let ungrouped: Vec<&Recipe> = book
        .list()
        .iter()
        .filter(|r| r.brewer.as_deref().is_none_or(str::is_empty))
        .collect();
    if !ungrouped.is_empty() {
        println!("\n{NOT_AVAILABLE}");
        print_recipe_table(&ungrouped);
    }

    Ok(())
}

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "Field")]
    label: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct StageRow {
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Water")]
    water: String,
    #[tabled(rename = "Time")]
    duration: String,
    #[tabled(rename = "Instructions")]
    instructions: String,
}

pub(crate) fn print_recipe_detail(recipe: &Recipe, dict: &Dictionary) {
    println!("{} ({})", recipe.display_name(), short_id(&recipe.id));

    let details = vec![
        DetailRow {
            label: dict.label("detail.brewer", "Brewer"),
            value: recipe.display_brewer(),
        },
        DetailRow {
            label: dict.label("detail.dosage", "Dose"),
            value: recipe.display_dose(),
        },
        DetailRow {
            label: dict.label("detail.water", "Water"),
            value: recipe.display_water(),
        },
        DetailRow {
            label: dict.label("detail.ratio", "Ratio"),
            value: recipe.display_ratio(),
        },
        DetailRow {
            label: dict.label("detail.temp", "Temperature"),
            value: recipe.display_temperature(),
        },
        DetailRow {
            label: dict.label("detail.grind", "Grind Size"),
            value: recipe.display_grind_size(),
        },
        DetailRow {
            label: dict.label("detail.timer", "Timer"),
            value: format_clock(recipe.total_duration()),
        },
    ];
    println!("{}", Table::new(&details).with(Style::rounded()));

    println!("\n{}", dict.label("detail.allStage", "All Stages"));
    let mut rows: Vec<StageRow> = recipe
        .stages
        .iter()
        .enumerate()
        .map(|(i, stage)| StageRow {
            number: (i + 1).to_string(),
            name: stage.display_name().to_string(),
            water: stage
                .water
                .filter(|w| *w != 0.0)
                .map_or_else(|| NOT_AVAILABLE.to_string(), |w| {
                    format!("{}ml", format_number(w))
                }),
            duration: format_clock(stage.duration_secs()),
            instructions: truncate(stage.display_instructions(), 60),
        })
        .collect();
    if recipe.drain_secs() > 0 {
        rows.push(StageRow {
            number: "-".to_string(),
            name: dict.label("detail.drain", "Drain").to_string(),
            water: NOT_AVAILABLE.to_string(),
            duration: format_clock(recipe.drain_secs()),
            instructions: dict
                .label("detail.drainInstruction", "Allow to drain")
                .to_string(),
        });
    }
    if rows.is_empty() {
        println!("{}", dict.label("detail.noStage", "No active stage."));
        return;
    }
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn cmd_show(book: &RecipeBook, dict: &Dictionary, key: &str, json: bool) -> Result<()> {
    let recipe = resolve_recipe(book, dict, key, json)?;
    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
    } else {
        print_recipe_detail(recipe, dict);
    }
    Ok(())
}

pub(crate) fn cmd_new(book: &mut RecipeBook, fields: &RecipeFields, json: bool) -> Result<()> {
    let mut form = RecipeForm::new();
    fields.fill(&mut form)?;
    let recipe = form.submit(book)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        println!(
            "Created recipe: {} (id: {})",
            recipe.display_name(),
            short_id(&recipe.id)
        );
        if recipe.stages.is_empty() {
            println!(
                "Add stages with: pour edit {} --stage \"Bloom:50:30:Swirl gently\"",
                short_id(&recipe.id)
            );
        }
    }
    Ok(())
}

pub(crate) fn cmd_edit(
    book: &mut RecipeBook,
    dict: &Dictionary,
    key: &str,
    fields: &RecipeFields,
    remove_stages: &[usize],
    clear_stages: bool,
    json: bool,
) -> Result<()> {
    if fields.is_empty() && remove_stages.is_empty() && !clear_stages {
        bail!("Nothing to update. Pass at least one field, --stage, --remove-stage or --clear-stages");
    }
    let mut form = RecipeForm::edit(resolve_recipe(book, dict, key, json)?);

    if clear_stages {
        form.clear_stages();
    }
    // Highest first so earlier positions stay valid.
    let mut positions = remove_stages.to_vec();
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions.dedup();
    for position in positions {
        if position == 0 {
            bail!("Stage numbers start at 1");
        }
        form.remove_stage(position - 1)?;
    }
    fields.fill(&mut form)?;

    let recipe = form.submit(book)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        println!("Updated recipe: {}", recipe.display_name());
    }
    Ok(())
}

pub(crate) fn cmd_delete(
    book: &mut RecipeBook,
    dict: &Dictionary,
    key: &str,
    yes: bool,
    json: bool,
) -> Result<()> {
    let recipe = resolve_recipe(book, dict, key, json)?;
    let (id, name) = (recipe.id.clone(), recipe.display_name().to_string());

    if !yes
        && !confirm(
            dict.label("cardRemove.title", "Are you absolutely sure?"),
            dict.label(
                "cardRemove.desc",
                "This action cannot be undone. This will permanently delete your recipe.",
            ),
        )?
    {
        println!("Cancelled");
        return Ok(());
    }

    if book.delete(&id)? {
        if json {
            println!("{}", serde_json::json!({ "deleted": id }));
        } else {
            println!("Deleted recipe: {name}");
        }
    } else if json {
        println!("{}", json_error("Recipe not found."));
    } else {
        eprintln!("{}", dict.label("detail.notFound", "Recipe not found."));
    }
    Ok(())
}

pub(crate) fn cmd_duplicate(
    book: &mut RecipeBook,
    dict: &Dictionary,
    key: &str,
    json: bool,
) -> Result<()> {
    let id = resolve_recipe(book, dict, key, json)?.id.clone();
    let copy = book.duplicate(&id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&copy)?);
    } else {
        println!(
            "Created recipe: {} (id: {})",
            copy.display_name(),
            short_id(&copy.id)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> RecipeFields {
        RecipeFields {
            name: Some("Switch Hybrid".to_string()),
            brewer: Some("Hario Switch".to_string()),
            dose: Some("16".to_string()),
            drain_time: Some("40".to_string()),
            stages: vec![
                "Bloom:50:30:Open valve, swirl".to_string(),
                "Steep:200:120".to_string(),
            ],
            ..RecipeFields::default()
        }
    }

    #[test]
    fn test_fields_fill_form() {
        let mut form = RecipeForm::new();
        fields().fill(&mut form).unwrap();
        let values = form.values();
        assert_eq!(values.name.as_deref(), Some("Switch Hybrid"));
        assert_eq!(values.dose, Some(16.0));
        assert_eq!(values.water, None);
        assert_eq!(values.stages.len(), 2);
        assert_eq!(values.total_duration(), 190);
    }

    #[test]
    fn test_fields_is_empty() {
        assert!(RecipeFields::default().is_empty());
        assert!(!fields().is_empty());
        let only_stage = RecipeFields {
            stages: vec!["Bloom:50:30".to_string()],
            ..RecipeFields::default()
        };
        assert!(!only_stage.is_empty());
    }

    #[test]
    fn test_new_then_edit() {
        let mut book = RecipeBook::open_in_memory().unwrap();
        let dict = Dictionary::for_locale("en");
        cmd_new(&mut book, &fields(), true).unwrap();
        let id = book.find("Switch Hybrid").unwrap().unwrap().id.clone();

        let change = RecipeFields {
            water: Some("250".to_string()),
            stages: vec!["Release:0:30:Open the valve".to_string()],
            ..RecipeFields::default()
        };
        cmd_edit(&mut book, &dict, &id, &change, &[1], false, true).unwrap();

        let recipe = book.get(&id).unwrap();
        assert_eq!(recipe.water, Some(250.0));
        let names: Vec<&str> = recipe.stages.iter().map(|s| s.display_name()).collect();
        assert_eq!(names, vec!["Steep", "Release"]);
    }

    #[test]
    fn test_new_rejects_oversize_brew_time() {
        let mut book = RecipeBook::open_in_memory().unwrap();
        let big = RecipeFields {
            drain_time: Some(u32::MAX.to_string()),
            ..fields()
        };
        assert!(cmd_new(&mut book, &big, true).is_err());
        assert_eq!(book.list().len(), 9);
    }

    #[test]
    fn test_edit_clear_stages() {
        let mut book = RecipeBook::open_in_memory().unwrap();
        let dict = Dictionary::for_locale("en");
        let id = book.list()[0].id.clone();
        cmd_edit(&mut book, &dict, &id, &RecipeFields::default(), &[], true, true).unwrap();
        assert!(book.get(&id).unwrap().stages.is_empty());
    }

    #[test]
    fn test_edit_requires_a_change() {
        let mut book = RecipeBook::open_in_memory().unwrap();
        let dict = Dictionary::for_locale("en");
        let id = book.list()[0].id.clone();
        assert!(cmd_edit(&mut book, &dict, &id, &RecipeFields::default(), &[], false, true).is_err());
    }

    #[test]
    fn test_edit_rejects_stage_zero() {
        let mut book = RecipeBook::open_in_memory().unwrap();
        let dict = Dictionary::for_locale("en");
        let id = book.list()[0].id.clone();
        assert!(cmd_edit(&mut book, &dict, &id, &RecipeFields::default(), &[0], false, true).is_err());
        assert_eq!(book.get(&id).unwrap().stages.len(), 2);
    }

    #[test]
    fn test_delete_and_duplicate() {
        let mut book = RecipeBook::open_in_memory().unwrap();
        let dict = Dictionary::for_locale("en");
        let id = book.list()[0].id.clone();

        cmd_duplicate(&mut book, &dict, &id, true).unwrap();
        assert_eq!(book.list().len(), 10);

        cmd_delete(&mut book, &dict, &id, true, true).unwrap();
        assert_eq!(book.list().len(), 9);
        assert!(book.get(&id).is_none());
    }

    #[test]
    fn test_recipe_row() {
        let book = RecipeBook::open_in_memory().unwrap();
        let recipe = &book.list()[0];
        let row = RecipeRow::from_recipe(recipe);
        assert_eq!(row.id.len(), 8);
        assert_eq!(row.stages, recipe.stages.len());
        assert_eq!(row.total, format_duration(recipe.total_duration()));
    }
}
