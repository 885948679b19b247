//! Pretrained BERT sequence classifier run with Candle
//!
//! Expects a model directory in Hugging Face layout: `config.json`,
//! `model.safetensors` and either `tokenizer.json` or `vocab.txt`. The
//! classification head must produce one logit per [`SentimentClass`].

use crate::classifier::Classifier;
use crate::model_config::{DeviceSpec, ModelConfig, ModelSource};
use async_trait::async_trait;
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use finsense_core::{Error, ProbabilityVector, Result, SentimentClass, NUM_CLASSES};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

/// BERT encoder with pooler and a three-way classification head
pub struct BertSentimentClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: BertModel,
    pooler: Option<Linear>,
    classifier: Linear,
    device: Device,
}

/// Fields of `config.json` beyond what the encoder needs
#[derive(Debug, Deserialize)]
struct HeadConfig {
    #[serde(default)]
    id2label: Option<HashMap<String, String>>,
}

impl BertSentimentClassifier {
    /// Resolve, load and validate the model. Any failure is fatal for the caller.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let model_path = resolve_model_path(&config.source)?;
        tracing::info!("Loading BERT sentiment model from {}", model_path.display());

        let config_path = model_path.join("config.json");
        let head_config: HeadConfig = parse_json_config(&config_path)?;
        if let Some(id2label) = &head_config.id2label {
            if id2label.len() != NUM_CLASSES {
                return Err(Error::config(format!(
                    "model has {} labels, expected {}",
                    id2label.len(),
                    NUM_CLASSES
                )));
            }
        }

        let bert_config: BertConfig = parse_json_config(&config_path)?;

        let mut tokenizer = load_tokenizer(&model_path)?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::config(format!("Invalid truncation settings: {}", e)))?;

        let device = create_device(config.device)?;
        let vb = load_var_builder(&model_path, &device)?;

        let (model, prefix) = load_bert_backbone(&vb, &bert_config)?;
        let pooler = load_pooler(&vb, prefix, bert_config.hidden_size);
        let classifier = load_classification_head(&vb, bert_config.hidden_size)?;

        tracing::info!(
            "Loaded '{}' on {:?} (hidden_size={}, pooler={})",
            config.name,
            device,
            bert_config.hidden_size,
            pooler.is_some()
        );

        Ok(Self {
            name: config.name.clone(),
            tokenizer,
            model,
            pooler,
            classifier,
            device,
        })
    }

    fn logits(&self, text: &str) -> candle_core::Result<Tensor> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| candle_core::Error::Msg(format!("Tokenization failed: {}", e)))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;

        let hidden_states = self.model.forward(&input_ids, &token_type_ids, None)?;
        let cls = hidden_states.i((.., 0, ..))?;

        let pooled = match &self.pooler {
            Some(dense) => dense.forward(&cls)?.tanh()?,
            None => cls,
        };

        self.classifier.forward(&pooled)
    }
}

#[async_trait]
impl Classifier for BertSentimentClassifier {
    async fn infer(&self, text: &str) -> Result<ProbabilityVector> {
        let logits = self
            .logits(text)
            .map_err(|e| Error::inference(format!("Model forward pass failed: {}", e)))?;

        let probs: Vec<f32> = candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|p| p.squeeze(0))
            .and_then(|p| p.to_vec1())
            .map_err(|e| Error::inference(format!("Softmax failed: {}", e)))?;

        tracing::debug!(?probs, "BERT probabilities");
        ProbabilityVector::new(&probs)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn resolve_model_path(source: &ModelSource) -> Result<PathBuf> {
    match source {
        ModelSource::Local { path } => {
            if !path.is_dir() {
                return Err(Error::config(format!(
                    "Model directory does not exist: {}",
                    path.display()
                )));
            }
            Ok(path.clone())
        }
        ModelSource::HuggingFace { repo, revision } => download_from_huggingface(repo, revision),
    }
}

fn download_from_huggingface(repo: &str, revision: &str) -> Result<PathBuf> {
    tracing::info!("Downloading model from HuggingFace: {} @ {}", repo, revision);

    let api = hf_hub::api::sync::Api::new()
        .map_err(|e| Error::config(format!("Failed to initialize HuggingFace API: {}", e)))?;
    let repo_obj = api.repo(hf_hub::Repo::with_revision(
        repo.to_string(),
        hf_hub::RepoType::Model,
        revision.to_string(),
    ));

    let config_path = repo_obj
        .get("config.json")
        .map_err(|e| Error::config(format!("Failed to download config.json: {}", e)))?;
    repo_obj
        .get("model.safetensors")
        .map_err(|e| Error::config(format!("Failed to download model.safetensors: {}", e)))?;

    let found_tokenizer = ["tokenizer.json", "vocab.txt"]
        .iter()
        .any(|file| match repo_obj.get(file) {
            Ok(_) => {
                tracing::debug!("Found tokenizer file: {}", file);
                true
            }
            Err(_) => false,
        });
    if !found_tokenizer {
        return Err(Error::config(
            "No tokenizer found (tried tokenizer.json, vocab.txt)",
        ));
    }

    let model_dir = config_path
        .parent()
        .ok_or_else(|| Error::config("Invalid cache path"))?;

    tracing::info!("Model available at: {}", model_dir.display());
    Ok(model_dir.to_path_buf())
}

fn create_device(spec: DeviceSpec) -> Result<Device> {
    match spec {
        DeviceSpec::Cpu => Ok(Device::Cpu),
        DeviceSpec::Cuda => Device::new_cuda(0)
            .map_err(|e| Error::config(format!("Failed to initialize CUDA: {}", e))),
        DeviceSpec::Metal => Device::new_metal(0)
            .map_err(|e| Error::config(format!("Failed to initialize Metal: {}", e))),
        DeviceSpec::Auto => Device::cuda_if_available(0)
            .map_err(|e| Error::config(format!("Failed to select device: {}", e))),
    }
}

fn parse_json_config<T: DeserializeOwned>(config_path: &Path) -> Result<T> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        Error::config(format!("Failed to read {}: {}", config_path.display(), e))
    })?;

    serde_json::from_str(&config_str).map_err(|e| {
        Error::config(format!("Failed to parse {}: {}", config_path.display(), e))
    })
}

fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_path.join("model.safetensors");
    if !weights_path.exists() {
        return Err(Error::config(format!(
            "model.safetensors not found in {}",
            model_path.display()
        )));
    }

    // SAFETY: the weights file is memory-mapped read-only and not modified while loaded.
    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
            .map_err(|e| Error::config(format!("Failed to load weights: {}", e)))?
    };

    Ok(vb)
}

/// Returns the encoder and the prefix it was found under
fn load_bert_backbone(
    vb: &VarBuilder<'static>,
    config: &BertConfig,
) -> Result<(BertModel, &'static str)> {
    let mut errors = Vec::new();

    for prefix in ["bert", ""] {
        let vb_prefix = if prefix.is_empty() {
            vb.clone()
        } else {
            vb.pp(prefix)
        };

        match BertModel::load(vb_prefix, config) {
            Ok(model) => {
                tracing::debug!(
                    "Loaded BERT backbone from '{}'",
                    if prefix.is_empty() { "<root>" } else { prefix }
                );
                return Ok((model, prefix));
            }
            Err(e) => errors.push(format!(
                "{}: {}",
                if prefix.is_empty() { "<root>" } else { prefix },
                e
            )),
        }
    }

    Err(Error::config(format!(
        "Failed to load BERT backbone with tried prefixes [{}]",
        errors.join(" | ")
    )))
}

fn load_pooler(vb: &VarBuilder<'static>, prefix: &str, hidden_size: usize) -> Option<Linear> {
    let vb_pooler = if prefix.is_empty() {
        vb.pp("pooler.dense")
    } else {
        vb.pp(prefix).pp("pooler.dense")
    };

    match candle_nn::linear(hidden_size, hidden_size, vb_pooler) {
        Ok(linear) => Some(linear),
        Err(_) => {
            tracing::warn!("No pooler weights found, classifying the raw [CLS] state");
            None
        }
    }
}

fn load_classification_head(vb: &VarBuilder<'static>, hidden_size: usize) -> Result<Linear> {
    candle_nn::linear(hidden_size, NUM_CLASSES, vb.pp("classifier")).map_err(|e| {
        Error::config(format!(
            "Failed to load classification head ({} -> {}): {}",
            hidden_size,
            SentimentClass::ALL.len(),
            e
        ))
    })
}

fn load_tokenizer(model_path: &Path) -> Result<Tokenizer> {
    let tokenizer_json_path = model_path.join("tokenizer.json");
    if tokenizer_json_path.exists() {
        tracing::debug!("Loading tokenizer from tokenizer.json");
        return Tokenizer::from_file(&tokenizer_json_path)
            .map_err(|e| Error::config(format!("Failed to load tokenizer.json: {}", e)));
    }

    let vocab_path = model_path.join("vocab.txt");
    if vocab_path.exists() {
        tracing::debug!("Building tokenizer from vocab.txt");

        use tokenizers::models::wordpiece::WordPiece;
        use tokenizers::normalizers::BertNormalizer;
        use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
        use tokenizers::processors::bert::BertProcessing;

        let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(|e| Error::config(format!("Failed to build WordPiece model: {}", e)))?;

        let mut tokenizer = Tokenizer::new(wordpiece);
        tokenizer.with_normalizer(Some(BertNormalizer::default()));
        tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));

        let sep = ("[SEP]".to_string(), 102);
        let cls = ("[CLS]".to_string(), 101);
        tokenizer.with_post_processor(Some(BertProcessing::new(sep, cls)));

        return Ok(tokenizer);
    }

    Err(Error::config(format!(
        "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
        model_path.display()
    )))
}
