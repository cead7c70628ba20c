use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::process;

use pour_core::form::{RecipeForm, StageField};
use pour_core::locale::Dictionary;
use pour_core::models::Recipe;
use pour_core::service::RecipeBook;

/// A stage given on the command line as `name:water:duration[:instructions]`.
/// Instructions may contain further colons.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct StageSpec<'a> {
    pub name: &'a str,
    pub water: &'a str,
    pub duration: &'a str,
    pub instructions: &'a str,
}

pub(crate) fn parse_stage_spec(s: &str) -> Result<StageSpec<'_>> {
    let parts: Vec<&str> = s.splitn(4, ':').collect();
    if parts.len() < 3 {
        bail!(
            "Invalid stage '{s}'. Use 'name:water:duration[:instructions]' (e.g. 'Bloom:50:30:Swirl gently')"
        );
    }
    Ok(StageSpec {
        name: parts[0].trim(),
        water: parts[1],
        duration: parts[2],
        instructions: parts.get(3).map_or("", |i| i.trim()),
    })
}

/// Append a parsed stage to the form, coercing its numeric parts.
pub(crate) fn append_stage(form: &mut RecipeForm, spec: &StageSpec<'_>) -> Result<()> {
    let i = form.append_stage();
    form.set_stage(i, StageField::Name, spec.name)?;
    form.set_stage(i, StageField::Water, spec.water)?;
    form.set_stage(i, StageField::Duration, spec.duration)?;
    form.set_stage(i, StageField::Instructions, spec.instructions)?;
    Ok(())
}

/// Look up a recipe by id, id prefix or name. Prints the not-found message
/// and exits with status 2 when nothing matches.
pub(crate) fn resolve_recipe<'a>(
    book: &'a RecipeBook,
    dict: &Dictionary,
    key: &str,
    json: bool,
) -> Result<&'a Recipe> {
    if let Some(recipe) = book.find(key)? {
        return Ok(recipe);
    }
    let message = dict.label("detail.notFound", "Recipe not found.");
    if json {
        println!("{}", json_error(message));
    } else {
        eprintln!("{message}");
    }
    process::exit(2);
}

/// Ask a yes/no question on stderr. Anything but `y`/`yes` is a no.
pub(crate) fn confirm(title: &str, description: &str) -> Result<bool> {
    eprintln!("{title}");
    eprintln!("{description}");
    eprint!("Continue? [y/N]: ");
    io::stderr().flush()?;
    let stdin = io::stdin();
    let line = stdin.lock().lines().next().context("No input")??;
    Ok(is_yes(&line))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

/// Human-friendly duration: `2m 30s`, `45s`, `3m`.
pub(crate) fn format_duration(seconds: u32) -> String {
    let (m, s) = (seconds / 60, seconds % 60);
    match (m, s) {
        (0, s) => format!("{s}s"),
        (m, 0) => format!("{m}m"),
        (m, s) => format!("{m}m {s}s"),
    }
}

pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}
