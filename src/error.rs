use thiserror::Error;

/// Errors that can occur while extracting a recipe from a URL
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The request URL could not be built from the configured endpoint and user input
    #[error("Invalid URL")]
    InvalidUrl,

    /// Transport failure or an HTTP error status without a vendor message
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// The response body did not match the recipe schema
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// The extraction API answered with its failure envelope
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
}

/// Errors surfaced by the extraction flow
#[derive(Error, Debug)]
pub enum FlowError {
    /// Submission attempted with an empty URL
    #[error("A recipe URL is required")]
    EmptyUrl,

    /// The extraction task was aborted before it finished
    #[error("Extraction was cancelled")]
    Cancelled,

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Errors from reading or writing a persisted store snapshot
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Top-level error for application setup and the CLI
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// No API key in configuration, flags or environment
    #[error("No API key configured; set RECIPE_KEEPER__API_KEY or SPOONACULAR_API_KEY")]
    MissingApiKey,

    /// Failed to build the HTTP client
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Flow(#[from] FlowError),
}
