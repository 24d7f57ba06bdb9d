// src/evaluation/client.rs
//! HTTP client for the external Gemini evaluator.
//!
//! One outbound `generateContent` call per evaluation; retries, if any,
//! belong to the caller. The client is constructed once at startup and
//! passed in as managed state.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::config::EvaluatorConfig;

pub struct EvaluatorClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ContentPart>>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

impl EvaluatorClient {
    /// Create a new client from configuration.
    pub fn new(config: &EvaluatorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Send one prompt and return the evaluator's free-text response.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        info!("Calling evaluator model: {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to call evaluator service")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Evaluator returned error status {}: {}", status, error_text);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse evaluator response")?;

        let text: String = body
            .candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .filter_map(|content| content.parts)
            .flatten()
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            anyhow::bail!("Evaluator returned an empty response");
        }

        Ok(text)
    }
}
