//! UniFFI bindings for recipe-keeper
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! Async work runs on a tokio runtime owned by the binding layer.

use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    AppConfig, AppError, ExtractError, ExtractionFlow, FlowError, Recipe, StoreError,
};

uniffi::setup_scaffolding!();

/// FFI-compatible recipe structure
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecipe {
    /// Title, or the untitled placeholder
    pub title: String,
    pub image: Option<String>,
    pub servings: Option<u32>,
    pub ready_in_minutes: Option<u32>,
    pub source_url: Option<String>,
    /// Summary with markup removed
    pub summary: Option<String>,
    /// Instructions with markup removed
    pub instructions: Option<String>,
    /// Ingredient lines as written on the source page
    pub ingredients: Vec<String>,
}

impl From<&Recipe> for FfiRecipe {
    fn from(recipe: &Recipe) -> Self {
        FfiRecipe {
            title: recipe.display_title().to_string(),
            image: recipe.image.clone(),
            servings: recipe.servings,
            ready_in_minutes: recipe.ready_in_minutes,
            source_url: recipe.source_url.clone(),
            summary: recipe.summary_text(),
            instructions: recipe.instructions_text(),
            ingredients: recipe.ingredient_lines(),
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone, thiserror::Error, uniffi::Error)]
pub enum FfiRecipeError {
    #[error("{message}")]
    InvalidUrl { message: String },
    #[error("{message}")]
    Network { message: String },
    #[error("{message}")]
    Decode { message: String },
    #[error("{message}")]
    Api { message: String },
    #[error("{message}")]
    Config { message: String },
    #[error("{message}")]
    Storage { message: String },
    #[error("{message}")]
    Runtime { message: String },
}

impl From<ExtractError> for FfiRecipeError {
    fn from(err: ExtractError) -> Self {
        let message = err.to_string();
        match err {
            ExtractError::InvalidUrl => FfiRecipeError::InvalidUrl { message },
            ExtractError::Network(_) => FfiRecipeError::Network { message },
            ExtractError::Decode(_) => FfiRecipeError::Decode { message },
            ExtractError::Api { .. } => FfiRecipeError::Api { message },
        }
    }
}

impl From<FlowError> for FfiRecipeError {
    fn from(err: FlowError) -> Self {
        let message = err.to_string();
        match err {
            FlowError::Extract(e) => e.into(),
            FlowError::EmptyUrl => FfiRecipeError::InvalidUrl { message },
            FlowError::Cancelled => FfiRecipeError::Runtime { message },
        }
    }
}

impl From<StoreError> for FfiRecipeError {
    fn from(err: StoreError) -> Self {
        FfiRecipeError::Storage {
            message: err.to_string(),
        }
    }
}

impl From<AppError> for FfiRecipeError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Flow(e) => e.into(),
            AppError::Store(e) => e.into(),
            other => FfiRecipeError::Config {
                message: other.to_string(),
            },
        }
    }
}

/// Configuration supplied by the host app
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiConfig {
    /// API key entered by the user
    pub api_key: String,
    /// Override for the extraction endpoint
    pub base_url: Option<String>,
    /// Optional timeout in seconds (uses default if not specified)
    pub timeout_seconds: Option<u64>,
    /// JSON file for the recipe list; in-memory if not specified
    pub store_path: Option<String>,
}

impl From<FfiConfig> for AppConfig {
    fn from(ffi: FfiConfig) -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            api_key: Some(ffi.api_key),
            base_url: ffi.base_url.unwrap_or(defaults.base_url),
            timeout: ffi.timeout_seconds.unwrap_or(defaults.timeout),
            store_path: ffi.store_path.map(PathBuf::from),
            event_capacity: defaults.event_capacity,
        }
    }
}

fn create_runtime() -> Result<tokio::runtime::Runtime, FfiRecipeError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiRecipeError::Runtime {
        message: format!("Failed to create async runtime: {}", e),
    })
}

/// Recipe list plus the extraction flow that fills it
#[derive(uniffi::Object)]
pub struct RecipeBook {
    runtime: tokio::runtime::Runtime,
    flow: ExtractionFlow,
}

#[uniffi::export]
impl RecipeBook {
    #[uniffi::constructor]
    pub fn new(config: FfiConfig) -> Result<Arc<Self>, FfiRecipeError> {
        let config: AppConfig = config.into();
        let flow = crate::flow_from_config(&config)?;
        Ok(Arc::new(Self {
            runtime: create_runtime()?,
            flow,
        }))
    }

    /// Whether the extract action should be enabled for `url`
    pub fn can_extract(&self, url: String) -> bool {
        crate::can_submit(&url)
    }

    /// Extract and save a recipe, returning the text to display
    ///
    /// Failures are reported as their description rather than thrown, the same
    /// way they are shown to the user.
    pub fn extract(&self, url: String) -> String {
        let result = self.runtime.block_on(self.flow.run(&url));
        match result {
            Ok(recipe) => match self.flow.store().flush() {
                Ok(()) => recipe.display_title().to_string(),
                Err(e) => e.to_string(),
            },
            Err(e) => e.to_string(),
        }
    }

    pub fn recipes(&self) -> Vec<FfiRecipe> {
        self.flow.store().snapshot().iter().map(FfiRecipe::from).collect()
    }

    pub fn count(&self) -> u64 {
        self.flow.store().len() as u64
    }

    /// Remove all recipes; fails if the list could not be saved
    pub fn clear(&self) -> Result<(), FfiRecipeError> {
        self.flow.store().clear();
        self.flow.store().flush()?;
        Ok(())
    }
}

/// Extract a recipe from a URL without saving it
#[uniffi::export]
pub fn extract_recipe(url: String, config: FfiConfig) -> Result<FfiRecipe, FfiRecipeError> {
    let config: AppConfig = config.into();
    let rt = create_runtime()?;
    let recipe = rt.block_on(crate::extract_recipe(&url, &config))?;
    Ok(FfiRecipe::from(&recipe))
}

/// Get the library version
#[uniffi::export]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ingredient, UNTITLED_PLACEHOLDER};

    #[test]
    fn test_ffi_recipe_conversion() {
        let recipe = Recipe {
            title: Some("Test Recipe".to_string()),
            servings: Some(4),
            summary: Some("<p>A <b>test</b></p>".to_string()),
            extended_ingredients: vec![Ingredient {
                original: Some("2 eggs".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let ffi: FfiRecipe = (&recipe).into();
        assert_eq!(ffi.title, "Test Recipe");
        assert_eq!(ffi.summary.as_deref(), Some("A test"));
        assert_eq!(ffi.ingredients, vec!["2 eggs"]);
        assert_eq!(ffi.servings, Some(4));
        // The stored recipe keeps its markup
        assert_eq!(recipe.summary.as_deref(), Some("<p>A <b>test</b></p>"));
    }

    #[test]
    fn test_untitled_recipe_uses_placeholder() {
        let ffi = FfiRecipe::from(&Recipe::default());
        assert_eq!(ffi.title, UNTITLED_PLACEHOLDER);
    }

    #[test]
    fn test_error_messages_pass_through() {
        let err: FfiRecipeError = ExtractError::InvalidUrl.into();
        assert_eq!(err.to_string(), "Invalid URL");
    }

    #[test]
    fn test_get_version() {
        assert!(!get_version().is_empty());
    }
}
