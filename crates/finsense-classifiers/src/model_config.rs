//! Model configuration structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the sentiment model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name, reported with every prediction
    #[serde(default = "default_name")]
    pub name: String,

    /// Which classifier implementation to build
    #[serde(default)]
    pub backend: Backend,

    /// Where the weights and tokenizer live
    #[serde(default)]
    pub source: ModelSource,

    /// Device to run on (cpu, cuda, metal, auto)
    #[serde(default)]
    pub device: DeviceSpec,

    /// Maximum sequence length; longer inputs are truncated
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            backend: Backend::default(),
            source: ModelSource::default(),
            device: DeviceSpec::default(),
            max_length: default_max_length(),
        }
    }
}

impl ModelConfig {
    /// BERT model from a local directory in Hugging Face layout
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ModelSource::Local { path: path.into() },
            ..Default::default()
        }
    }

    /// BERT model downloaded from the Hugging Face Hub
    pub fn from_hf(repo: impl Into<String>) -> Self {
        Self {
            source: ModelSource::HuggingFace {
                repo: repo.into(),
                revision: default_revision(),
            },
            ..Default::default()
        }
    }

    /// Keyword backend that needs no weights
    pub fn lexicon() -> Self {
        Self {
            name: "finsense-lexicon".to_string(),
            backend: Backend::Lexicon,
            ..Default::default()
        }
    }

    /// Set the device
    pub fn with_device(mut self, device: DeviceSpec) -> Self {
        self.device = device;
        self
    }

    /// Set the truncation length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

/// Classifier implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Pretrained BERT sequence classifier run with Candle
    #[default]
    Bert,
    /// Financial keyword lexicon
    Lexicon,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bert" => Ok(Self::Bert),
            "lexicon" => Ok(Self::Lexicon),
            other => Err(format!("unknown backend '{}' (expected bert or lexicon)", other)),
        }
    }
}

/// Model source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    /// Load from local filesystem
    Local { path: PathBuf },

    /// Download from HuggingFace Hub
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::Local {
            path: PathBuf::from("./model_weights"),
        }
    }
}

/// Inference device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    Cpu,
    Cuda,
    Metal,
    /// CUDA when available, otherwise CPU
    #[default]
    Auto,
}

impl std::str::FromStr for DeviceSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "cuda" | "cuda:0" => Ok(Self::Cuda),
            "metal" | "mps" => Ok(Self::Metal),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown device '{}'", other)),
        }
    }
}

fn default_name() -> String {
    "finsense-tapt".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_max_length() -> usize {
    512
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.name, "finsense-tapt");
        assert_eq!(config.backend, Backend::Bert);
        assert_eq!(config.device, DeviceSpec::Auto);
        assert_eq!(config.max_length, 512);
        assert!(
            matches!(config.source, ModelSource::Local { ref path } if path == std::path::Path::new("./model_weights"))
        );
    }

    #[test]
    fn test_parse_huggingface_source() {
        let yaml = r#"
name: "finbert"
source:
  type: huggingface
  repo: "ProsusAI/finbert"
device: cpu
max_length: 256
"#;
        let config: ModelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.device, DeviceSpec::Cpu);
        assert_eq!(config.max_length, 256);
        if let ModelSource::HuggingFace { repo, revision } = &config.source {
            assert_eq!(repo, "ProsusAI/finbert");
            assert_eq!(revision, "main");
        } else {
            panic!("Expected HuggingFace source");
        }
    }

    #[test]
    fn test_parse_lexicon_backend() {
        let config: ModelConfig = serde_yaml::from_str("backend: lexicon").unwrap();
        assert_eq!(config.backend, Backend::Lexicon);
    }

    #[test]
    fn test_builders() {
        let config = ModelConfig::from_local("/models/tapt")
            .with_device(DeviceSpec::Metal)
            .with_max_length(128);
        assert_eq!(config.device, DeviceSpec::Metal);
        assert_eq!(config.max_length, 128);

        let config = ModelConfig::from_hf("org/model");
        assert!(matches!(config.source, ModelSource::HuggingFace { .. }));

        assert_eq!(ModelConfig::lexicon().backend, Backend::Lexicon);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("MPS".parse::<DeviceSpec>().unwrap(), DeviceSpec::Metal);
        assert!("tpu".parse::<DeviceSpec>().is_err());
        assert_eq!("lexicon".parse::<Backend>().unwrap(), Backend::Lexicon);
        assert!("gpt".parse::<Backend>().is_err());
    }
}
