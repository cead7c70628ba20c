mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use crate::commands::{
    RecipeFields, Switch, cmd_brew, cmd_config_locale, cmd_config_show, cmd_config_sound,
    cmd_config_vibration, cmd_delete, cmd_duplicate, cmd_edit, cmd_export, cmd_import, cmd_list,
    cmd_new, cmd_reset, cmd_show,
};
use crate::config::Config;
use pour_core::locale::Dictionary;
use pour_core::service::RecipeBook;

#[derive(Parser)]
#[command(
    name = "pour",
    version,
    about = "A coffee recipe manager with a stage-by-stage brew timer",
    long_about = "\n\n  ██████╗  ██████╗ ██╗   ██╗██████╗
  ██╔══██╗██╔═══██╗██║   ██║██╔══██╗
  ██████╔╝██║   ██║██║   ██║██████╔╝
  ██╔═══╝ ██║   ██║██║   ██║██╔══██╗
  ██║     ╚██████╔╝╚██████╔╝██║  ██║
  ╚═╝      ╚═════╝  ╚═════╝ ╚═╝  ╚═╝
        brew by the second.
"
)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipes grouped by brewer
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with all of its stages
    Show {
        /// Recipe id, id prefix or name
        recipe: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a recipe
    New {
        #[command(flatten)]
        fields: RecipeFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a recipe's fields and stages
    Edit {
        /// Recipe id, id prefix or name
        recipe: String,
        #[command(flatten)]
        fields: RecipeFields,
        /// Remove a stage by number, starting at 1 (repeatable)
        #[arg(long, value_name = "N")]
        remove_stage: Vec<usize>,
        /// Remove every stage before adding any given with --stage
        #[arg(long)]
        clear_stages: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a recipe
    Delete {
        /// Recipe id, id prefix or name
        recipe: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy a recipe under a new id
    Duplicate {
        /// Recipe id, id prefix or name
        recipe: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export every recipe to a JSON file
    Export {
        /// Output file ("-" for stdout)
        #[arg(short, long, default_value = "recipes.json")]
        output: PathBuf,
    },
    /// Replace all recipes with the contents of an exported JSON file
    Import {
        /// Path to the JSON file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore the default recipes, discarding your own
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Run the stage timer for a recipe
    Brew {
        /// Recipe id, id prefix or name
        recipe: String,
        /// Wait for Enter before starting the countdown
        #[arg(long)]
        paused: bool,
    },
    /// Show or change feedback and language settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Turn the completion sound on or off (toggles when omitted)
    Sound {
        state: Option<Switch>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Turn vibration on or off (toggles when omitted)
    Vibration {
        state: Option<Switch>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the display language (en, ko)
    Locale {
        code: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let mut book = RecipeBook::open(&config.db_path)?;
    let dict = Dictionary::for_locale(&book.preferences()?.locale);

    match cli.command {
        Commands::List { json } => cmd_list(&book, &dict, json),
        Commands::Show { recipe, json } => cmd_show(&book, &dict, &recipe, json),
        Commands::New { fields, json } => cmd_new(&mut book, &fields, json),
        Commands::Edit {
            recipe,
            fields,
            remove_stage,
            clear_stages,
            json,
        } => cmd_edit(
            &mut book,
            &dict,
            &recipe,
            &fields,
            &remove_stage,
            clear_stages,
            json,
        ),
        Commands::Delete { recipe, yes, json } => cmd_delete(&mut book, &dict, &recipe, yes, json),
        Commands::Duplicate { recipe, json } => cmd_duplicate(&mut book, &dict, &recipe, json),
        Commands::Export { output } => cmd_export(&book, &output),
        Commands::Import { file, json } => cmd_import(&mut book, &file, json),
        Commands::Reset { yes } => cmd_reset(&mut book, &dict, yes),
        Commands::Brew { recipe, paused } => cmd_brew(&book, &dict, &recipe, paused).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show { json } => cmd_config_show(&book, &dict, json),
            ConfigCommands::Sound { state, json } => cmd_config_sound(&book, state, json),
            ConfigCommands::Vibration { state, json } => cmd_config_vibration(&book, state, json),
            ConfigCommands::Locale { code, json } => cmd_config_locale(&book, &code, json),
        },
    }
}
