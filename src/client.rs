use crate::config::AppConfig;
use crate::error::{AppError, ExtractError};
use crate::model::Recipe;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

const EXTRACT_PATH: &str = "recipes/extract";

/// Anything that can turn a recipe page URL into a [`Recipe`]
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Name used in logs
    fn source_name(&self) -> &str;

    async fn extract(&self, url: &str) -> Result<Recipe, ExtractError>;
}

/// Failure envelope the API returns alongside non-2xx statuses
#[derive(Debug, Deserialize)]
struct ApiFailure {
    #[serde(default)]
    code: Option<u16>,
    message: String,
}

/// Client for Spoonacular's `GET /recipes/extract`
pub struct SpoonacularClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SpoonacularClient {
    /// Create a client against an explicit endpoint
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("recipe-keeper/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Create a client from configuration, resolving the API key
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let api_key = config.resolved_api_key().ok_or(AppError::MissingApiKey)?;
        Self::new(api_key, config.base_url.clone(), config.timeout()).map_err(AppError::Client)
    }

    /// Build the request URL for a recipe page
    ///
    /// The page URL is sent exactly as entered; only the endpoint itself can
    /// make the request unconstructible.
    pub fn request_url(&self, page_url: &str) -> Result<Url, ExtractError> {
        let endpoint = format!("{}/{}", self.base_url.trim_end_matches('/'), EXTRACT_PATH);
        let mut url = Url::parse(&endpoint).map_err(|_| ExtractError::InvalidUrl)?;
        if url.cannot_be_a_base() {
            return Err(ExtractError::InvalidUrl);
        }
        url.query_pairs_mut()
            .append_pair("url", page_url)
            .append_pair("apiKey", &self.api_key);
        Ok(url)
    }
}

/// The request URL with the credential masked, for logging
fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apiKey" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    fn source_name(&self) -> &str {
        "spoonacular"
    }

    async fn extract(&self, url: &str) -> Result<Recipe, ExtractError> {
        let request_url = self.request_url(url)?;
        info!("GET {}", redacted(&request_url));

        let response = self.client.get(request_url).send().await?;
        let status = response.status();
        let status_error = response.error_for_status_ref().err();
        let body = response.bytes().await?;

        if let Some(err) = status_error {
            return match serde_json::from_slice::<ApiFailure>(&body) {
                Ok(failure) => Err(ExtractError::Api {
                    status: failure.code.unwrap_or(status.as_u16()),
                    message: failure.message,
                }),
                Err(_) => Err(ExtractError::Network(err)),
            };
        }

        let recipe: Recipe = serde_json::from_slice(&body)?;
        debug!("{:#?}", recipe);
        Ok(recipe)
    }
}
