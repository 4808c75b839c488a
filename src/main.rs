use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use recipe_keeper::{flow_from_config, open_store, AppConfig, AppError, FlowError};

const DEFAULT_STORE: &str = "recipes.json";

#[derive(Parser)]
#[command(name = "recipe-keeper", version, about = "Save recipes from any URL")]
struct Cli {
    /// JSON file holding the saved recipes
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Spoonacular API key
    #[arg(long, global = true, env = "SPOONACULAR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a recipe from a web page and save it
    Extract { url: String },
    /// List saved recipes
    List,
    /// Remove all saved recipes
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let mut config = AppConfig::load()?;
    config.store_path = cli
        .store
        .or(config.store_path)
        .or_else(|| Some(PathBuf::from(DEFAULT_STORE)));
    if cli.api_key.is_some() {
        config.api_key = cli.api_key;
    }

    match cli.command {
        Command::Extract { url } => {
            let flow = flow_from_config(&config)?;
            let result = flow.run(&url).await;
            if let Some(message) = flow.last_message() {
                println!("{}", message);
            }
            match result {
                Ok(_) => {
                    flow.store().flush()?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(FlowError::Extract(_)) => Ok(ExitCode::FAILURE),
                Err(e) => Err(e.into()),
            }
        }
        Command::List => {
            let store = open_store(&config)?;
            for (i, recipe) in store.snapshot().iter().enumerate() {
                println!("{}. {}", i + 1, recipe.display_title());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Clear => {
            let store = open_store(&config)?;
            let removed = store.len();
            store.clear();
            store.flush()?;
            println!("Removed {} recipes", removed);
            Ok(ExitCode::SUCCESS)
        }
    }
}
