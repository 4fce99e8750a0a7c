//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Default inference endpoint of the translate model
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/v2/models/translate/infer";

/// Configuration for the validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Full URL of the inference endpoint
    pub endpoint: String,
    /// Model name passed in every request's parameters
    pub translation_model: String,
    /// Optional confidence threshold for the service's language identifier
    pub language_id_threshold: Option<f64>,
    /// Upper bound on in-flight requests per dispatch
    pub max_concurrent: usize,
    /// Corpus rows per dispatched batch
    pub batch_size: usize,
    /// Near-equal chunks each batch is joined into
    pub chunks_per_batch: usize,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Directory holding the `<code>.devtest` corpus files
    pub dataset_dir: PathBuf,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            translation_model: "seamlessm4t_text2text".to_string(),
            language_id_threshold: None,
            max_concurrent: 50,
            batch_size: 60,
            chunks_per_batch: 3,
            timeout_ms: 30000,
            dataset_dir: PathBuf::from("flores200"),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let endpoint = std::env::var("INFERENCE_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let translation_model = std::env::var("TRANSLATION_MODEL")
            .unwrap_or_else(|_| "seamlessm4t_text2text".to_string());

        let language_id_threshold = match std::env::var("LANGUAGE_ID_THRESHOLD") {
            Ok(raw) => Some(raw.parse::<f64>()?),
            Err(_) => None,
        };

        let max_concurrent = std::env::var("MAX_CONCURRENT")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<usize>()?;

        let batch_size = std::env::var("BATCH_SIZE")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<usize>()?;

        let chunks_per_batch = std::env::var("CHUNKS_PER_BATCH")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<usize>()?;

        let timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse::<u64>()?;

        let dataset_dir = std::env::var("DATASET_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("flores200"));

        Ok(Self {
            endpoint,
            translation_model,
            language_id_threshold,
            max_concurrent,
            batch_size,
            chunks_per_batch,
            timeout_ms,
            dataset_dir,
        })
    }

    /// Load and validate configuration
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        info!(
            "Loaded configuration: endpoint={}, model={}, max_concurrent={}",
            config.endpoint, config.translation_model, config.max_concurrent
        );
        Ok(config)
    }

    /// Validate configuration. Rejected configurations never reach the
    /// network.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.endpoint.is_empty() {
            return Err(anyhow::anyhow!("inference endpoint is required"));
        }

        if self.max_concurrent == 0 {
            return Err(anyhow::anyhow!("max_concurrent must be greater than 0"));
        }

        if self.batch_size == 0 {
            return Err(anyhow::anyhow!("batch_size must be greater than 0"));
        }

        if self.chunks_per_batch == 0 {
            return Err(anyhow::anyhow!("chunks_per_batch must be greater than 0"));
        }

        if let Some(threshold) = self.language_id_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(anyhow::anyhow!(
                    "language_id_threshold must be in [0, 1], got {}",
                    threshold
                ));
            }
        }

        Ok(())
    }
}
