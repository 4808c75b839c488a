pub mod client;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod flow;
pub mod model;
pub mod store;

#[cfg(feature = "uniffi")]
pub mod uniffi_bindings;

use std::sync::Arc;

pub use client::{RecipeSource, SpoonacularClient};
pub use config::AppConfig;
pub use duplicates::{DuplicateLine, DuplicateReview};
pub use error::{AppError, ExtractError, FlowError, StoreError};
pub use flow::{can_submit, outcome_message, ExtractionFlow, ExtractionTask};
pub use model::{Ingredient, Recipe, UNTITLED_PLACEHOLDER};
pub use store::{RecipeStore, StoreEvent};

/// Open the store described by `config`: persisted if a path is set, in-memory otherwise
pub fn open_store(config: &AppConfig) -> Result<Arc<RecipeStore>, StoreError> {
    let store = match &config.store_path {
        Some(path) => RecipeStore::open(path, config.event_capacity)?,
        None => RecipeStore::new(config.event_capacity),
    };
    Ok(Arc::new(store))
}

/// Wire a Spoonacular client and the configured store into an [`ExtractionFlow`]
pub fn flow_from_config(config: &AppConfig) -> Result<ExtractionFlow, AppError> {
    let client = SpoonacularClient::from_config(config)?;
    let store = open_store(config)?;
    Ok(ExtractionFlow::new(Arc::new(client), store))
}

/// Extract a single recipe without touching any store
///
/// # Example
/// ```no_run
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let config = recipe_keeper::AppConfig::load()?;
/// let recipe = recipe_keeper::extract_recipe("https://example.com/recipe", &config).await?;
/// println!("{}", recipe.display_title());
/// # Ok(())
/// # }
/// ```
pub async fn extract_recipe(url: &str, config: &AppConfig) -> Result<Recipe, AppError> {
    let client = SpoonacularClient::from_config(config)?;
    client
        .extract(url)
        .await
        .map_err(|e| AppError::Flow(FlowError::Extract(e)))
}
