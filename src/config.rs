// src/config.rs
//! Environment-based configuration, loaded once at startup.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub evaluator: EvaluatorConfig,
}

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

impl ConfigManager {
    /// Load all configurations from the environment.
    pub fn load() -> Result<Self> {
        let environment = Self::load_environment()?;
        let evaluator = Self::load_evaluator()?;

        Ok(Self {
            environment,
            evaluator,
        })
    }

    fn load_environment() -> Result<EnvironmentConfig> {
        let env = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());
        info!("Loading environment configuration for: {}", env);

        let base_dir = if env == "production" {
            PathBuf::from("/app")
        } else {
            std::env::current_dir().context("Failed to get current directory")?
        };

        Ok(EnvironmentConfig {
            database_path: base_dir.join("talentsift.db"),
        })
    }

    fn load_evaluator() -> Result<EvaluatorConfig> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable is required"))?;

        let base_url = std::env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());

        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());

        Ok(EvaluatorConfig {
            base_url,
            model,
            api_key,
            timeout_seconds: 60,
        })
    }

    /// Ensure all required directories exist.
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(db_parent) = self.environment.database_path.parent() {
            crate::utils::ensure_dir_exists(db_parent).await?;
        }

        Ok(())
    }
}
