use anyhow::{Context, Result};
use std::path::Path;

use pour_core::locale::Dictionary;
use pour_core::service::RecipeBook;

use super::helpers::confirm;

/// Write the whole collection as pretty JSON. `-` means stdout.
pub(crate) fn cmd_export(book: &RecipeBook, output: &Path) -> Result<()> {
    let json = book.export_json()?;
    if output == Path::new("-") {
        println!("{json}");
        return Ok(());
    }
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    eprintln!(
        "Exported {} recipes to {}",
        book.list().len(),
        output.display()
    );
    Ok(())
}

/// Replace the collection with the recipes in `file`.
pub(crate) fn cmd_import(book: &mut RecipeBook, file: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let count = book.import_json(&content)?;
    if json {
        println!("{}", serde_json::json!({ "imported": count }));
    } else {
        println!("Imported {count} recipes from {}", file.display());
    }
    Ok(())
}

pub(crate) fn cmd_reset(book: &mut RecipeBook, dict: &Dictionary, yes: bool) -> Result<()> {
    if !yes
        && !confirm(
            dict.label("reset.title", "Are you absolutely sure?"),
            dict.label(
                "reset.desc",
                "This action cannot be undone. This will permanently delete all your custom recipes and restore the application to its default state.",
            ),
        )?
    {
        println!("Cancelled");
        return Ok(());
    }
    book.reset()?;
    println!("Restored {} default recipes", book.list().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pour_core::models::Recipe;

    #[test]
    fn test_export_then_import() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("recipes.json");

        let book = RecipeBook::open_in_memory().unwrap();
        cmd_export(&book, &path).unwrap();
        let exported: Vec<Recipe> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(exported.len(), 9);

        let mut other = RecipeBook::open_in_memory().unwrap();
        let first = other.list()[0].id.clone();
        other.delete(&first).unwrap();
        cmd_import(&mut other, &path, true).unwrap();
        assert_eq!(other.list().len(), 9);
        assert_eq!(other.list()[0].name, exported[0].name);
        assert_ne!(other.list()[0].id, exported[0].id);
    }

    #[test]
    fn test_import_invalid_json_keeps_collection() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut book = RecipeBook::open_in_memory().unwrap();
        let before = book.list().to_vec();
        let err = cmd_import(&mut book, &path, false).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid JSON file"));
        assert_eq!(book.list(), before.as_slice());
    }

    #[test]
    fn test_import_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut book = RecipeBook::open_in_memory().unwrap();
        assert!(cmd_import(&mut book, &tmp.path().join("nope.json"), false).is_err());
    }

    #[test]
    fn test_reset_with_yes() {
        let mut book = RecipeBook::open_in_memory().unwrap();
        let dict = Dictionary::for_locale("en");
        let ids: Vec<String> = book.list().iter().map(|r| r.id.clone()).collect();
        for id in &ids[1..] {
            book.delete(id).unwrap();
        }
        cmd_reset(&mut book, &dict, true).unwrap();
        assert_eq!(book.list().len(), 9);
        assert!(book.get(&ids[0]).is_none());
    }
}
