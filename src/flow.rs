//! The extraction flow: submit a URL, fetch the recipe, save it, report.
//!
//! Every submission runs as its own tokio task. Overlapping submissions are
//! not serialized: each success appends to the store independently, and the
//! displayed outcome is whichever task finished last.

use std::sync::{Arc, Mutex, PoisonError};

use log::{info, warn};
use tokio::task::JoinHandle;

use crate::client::RecipeSource;
use crate::error::{ExtractError, FlowError};
use crate::model::Recipe;
use crate::store::RecipeStore;

/// Whether the submit action should be enabled for this input
pub fn can_submit(url: &str) -> bool {
    !url.is_empty()
}

/// Text shown to the user after an extraction
///
/// The recipe's display title on success, the error's description on failure.
pub fn outcome_message(result: &Result<Recipe, ExtractError>) -> String {
    match result {
        Ok(recipe) => recipe.display_title().to_string(),
        Err(e) => e.to_string(),
    }
}

type Status = Arc<Mutex<Option<String>>>;

/// Binds a [`RecipeSource`] to a [`RecipeStore`]
#[derive(Clone)]
pub struct ExtractionFlow {
    source: Arc<dyn RecipeSource>,
    store: Arc<RecipeStore>,
    status: Status,
}

impl ExtractionFlow {
    pub fn new(source: Arc<dyn RecipeSource>, store: Arc<RecipeStore>) -> Self {
        Self {
            source,
            store,
            status: Arc::new(Mutex::new(None)),
        }
    }

    pub fn store(&self) -> &Arc<RecipeStore> {
        &self.store
    }

    /// Outcome text of the most recently completed extraction
    pub fn last_message(&self) -> Option<String> {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run one extraction on the current task
    pub async fn run(&self, url: &str) -> Result<Recipe, FlowError> {
        if !can_submit(url) {
            return Err(FlowError::EmptyUrl);
        }
        extract_and_store(self.source.as_ref(), &self.store, &self.status, url)
            .await
            .map_err(FlowError::from)
    }

    /// Spawn one extraction as a background task
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, url: impl Into<String>) -> Result<ExtractionTask, FlowError> {
        let url = url.into();
        if !can_submit(&url) {
            return Err(FlowError::EmptyUrl);
        }

        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let status = Arc::clone(&self.status);
        let handle = tokio::spawn(async move {
            extract_and_store(source.as_ref(), &store, &status, &url).await
        });
        Ok(ExtractionTask { handle })
    }
}

async fn extract_and_store(
    source: &dyn RecipeSource,
    store: &RecipeStore,
    status: &Mutex<Option<String>>,
    url: &str,
) -> Result<Recipe, ExtractError> {
    let result = source.extract(url).await;

    // Nothing below awaits, so an aborted task either saved the recipe or never touched the store
    if let Ok(recipe) = &result {
        store.add(recipe.clone());
    }

    let message = outcome_message(&result);
    match &result {
        Ok(_) => info!("Extraction via {} finished: {}", source.source_name(), message),
        Err(_) => warn!("Extraction via {} failed: {}", source.source_name(), message),
    }
    *status.lock().unwrap_or_else(PoisonError::into_inner) = Some(message);

    result
}

/// Handle to a running extraction
pub struct ExtractionTask {
    handle: JoinHandle<Result<Recipe, ExtractError>>,
}

impl ExtractionTask {
    /// Cancel the extraction; the store is left untouched if it had not finished
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the extraction to finish
    pub async fn join(self) -> Result<Recipe, FlowError> {
        match self.handle.await {
            Ok(result) => result.map_err(FlowError::from),
            Err(e) if e.is_cancelled() => Err(FlowError::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}
