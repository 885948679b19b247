//! Service configuration

use crate::cli::ModelArgs;
use finsense_classifiers::{ModelConfig, ModelSource};
use finsense_core::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &Path, args: &ModelArgs) -> Result<Self> {
        // Missing file means defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            tracing::debug!(
                "No configuration file at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };

        config.apply_overrides(args);
        Ok(config)
    }

    /// Apply CLI overrides on top of file values
    pub fn apply_overrides(&mut self, args: &ModelArgs) {
        if let Some(path) = &args.model_path {
            self.model.source = ModelSource::Local { path: path.clone() };
        }

        if let Some(backend) = args.backend {
            self.model.backend = backend;
        }

        if let Some(device) = args.device {
            self.model.device = device;
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Accept cross-origin requests from anywhere instead of local dev origins
    #[serde(default)]
    pub allow_any_origin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            allow_any_origin: false,
        }
    }
}

/// Text shown on the analysis page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "default_input_label")]
    pub input_label: String,

    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default = "default_examples")]
    pub examples: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            input_label: default_input_label(),
            placeholder: default_placeholder(),
            examples: default_examples(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7860
}

fn default_title() -> String {
    "🏦 FinSense-TAPT: Calibrated Sentiment Engine".to_string()
}

fn default_description() -> String {
    "This system utilizes a **TAPT-optimized BERT** model specifically trained for financial \
     semantics. It includes a **Confidence-Margin** system to flag ambiguous or 'hedged' \
     statements for manual review."
        .to_string()
}

fn default_input_label() -> String {
    "Financial News Input".to_string()
}

fn default_placeholder() -> String {
    "Type or paste financial news here...".to_string()
}

fn default_examples() -> Vec<String> {
    vec![
        "The tech giant reported a 10% increase in quarterly revenue, but warned that global \
         supply chain disruptions could significantly impact profit margins in the coming months."
            .to_string(),
        "NVIDIA reports record-breaking revenue fueled by massive AI infrastructure spending."
            .to_string(),
        "The company filed for bankruptcy after a catastrophic fraud investigation.".to_string(),
        "Following the completion of the merger, the new entity will be headquartered in Singapore."
            .to_string(),
    ]
}
