//! Shared OpenAI API client construction.

use crate::config::Settings;
use crate::error::{LecternError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Build the OpenAI client used for embeddings and chat completions.
///
/// The request timeout comes from `general.api_timeout_secs`; embedding a
/// full lecture batch can take well past reqwest's default.
pub fn api_client(settings: &Settings) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.general.api_timeout_secs))
        .build()
        .map_err(|e| LecternError::Config(format!("failed to build HTTP client: {e}")))?;

    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}
