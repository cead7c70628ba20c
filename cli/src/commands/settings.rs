use anyhow::Result;
use clap::ValueEnum;
use tabled::{Table, Tabled, settings::Style};

use pour_core::locale::{Dictionary, SUPPORTED_LOCALES};
use pour_core::service::RecipeBook;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Switch {
    On,
    Off,
}

impl Switch {
    fn enabled(self) -> bool {
        self == Switch::On
    }
}

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

pub(crate) fn cmd_config_show(book: &RecipeBook, dict: &Dictionary, json: bool) -> Result<()> {
    let prefs = book.preferences()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&prefs)?);
        return Ok(());
    }

    let rows = vec![
        SettingRow {
            name: dict.label("config.sound", "Sound"),
            value: on_off(prefs.sound_enabled).to_string(),
        },
        SettingRow {
            name: dict.label("config.vibration", "Vibration"),
            value: on_off(prefs.vibration_enabled).to_string(),
        },
        SettingRow {
            name: dict.label("config.locale", "Language"),
            value: prefs.locale,
        },
    ];
    println!("{}", dict.label("config.title", "Feedback Settings"));
    println!("{}", dict.label("config.desc", "Manage sound and vibration feedback."));
    println!("{}", Table::new(&rows).with(Style::rounded()));
    Ok(())
}

/// Set sound feedback, or flip it when no state is given.
pub(crate) fn cmd_config_sound(book: &RecipeBook, state: Option<Switch>, json: bool) -> Result<()> {
    let enabled = match state {
        Some(s) => {
            book.set_sound_enabled(s.enabled())?;
            s.enabled()
        }
        None => book.toggle_sound()?,
    };
    print_flag("sound", enabled, json);
    Ok(())
}

pub(crate) fn cmd_config_vibration(
    book: &RecipeBook,
    state: Option<Switch>,
    json: bool,
) -> Result<()> {
    let enabled = match state {
        Some(s) => {
            book.set_vibration_enabled(s.enabled())?;
            s.enabled()
        }
        None => book.toggle_vibration()?,
    };
    print_flag("vibration", enabled, json);
    Ok(())
}

fn print_flag(name: &str, enabled: bool, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "setting": name, "enabled": enabled }));
    } else {
        println!("{name}: {}", on_off(enabled));
    }
}

pub(crate) fn cmd_config_locale(book: &RecipeBook, code: &str, json: bool) -> Result<()> {
    let locale = book.set_locale(code)?;
    if json {
        println!("{}", serde_json::json!({ "locale": locale }));
    } else {
        println!(
            "locale: {locale} (available: {})",
            SUPPORTED_LOCALES.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_toggle_and_set() {
        let book = RecipeBook::open_in_memory().unwrap();
        cmd_config_sound(&book, None, true).unwrap();
        assert!(!book.preferences().unwrap().sound_enabled);
        cmd_config_sound(&book, None, true).unwrap();
        assert!(book.preferences().unwrap().sound_enabled);
        cmd_config_sound(&book, Some(Switch::Off), true).unwrap();
        cmd_config_sound(&book, Some(Switch::Off), true).unwrap();
        assert!(!book.preferences().unwrap().sound_enabled);
    }

    #[test]
    fn test_vibration_set() {
        let book = RecipeBook::open_in_memory().unwrap();
        cmd_config_vibration(&book, Some(Switch::Off), true).unwrap();
        let prefs = book.preferences().unwrap();
        assert!(!prefs.vibration_enabled);
        assert!(prefs.sound_enabled);
    }

    #[test]
    fn test_locale() {
        let book = RecipeBook::open_in_memory().unwrap();
        cmd_config_locale(&book, "ko", true).unwrap();
        assert_eq!(book.preferences().unwrap().locale, "ko");
        assert!(cmd_config_locale(&book, "xx", true).is_err());
        assert_eq!(book.preferences().unwrap().locale, "ko");
    }

    #[test]
    fn test_show() {
        let book = RecipeBook::open_in_memory().unwrap();
        let dict = Dictionary::for_locale("en");
        cmd_config_show(&book, &dict, false).unwrap();
        cmd_config_show(&book, &dict, true).unwrap();
    }
}
