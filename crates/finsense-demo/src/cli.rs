use clap::{Args, Parser, Subcommand};
use finsense_classifiers::{Backend, DeviceSpec};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "finsense")]
#[command(
    author,
    version,
    about = "Calibrated financial sentiment engine with confidence-margin review flags"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server with the analysis UI
    Serve {
        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,

        /// Listen address
        #[arg(short, long)]
        address: Option<String>,

        #[command(flatten)]
        model: ModelArgs,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a single text and print the decision report
    Predict {
        /// Text to analyze
        text: String,

        /// Print the full result as JSON instead of the Markdown report
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Configuration file plus model overrides shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Configuration file path
    #[arg(short, long, env = "FINSENSE_CONFIG", default_value = "finsense.yaml")]
    pub config: PathBuf,

    /// Local model directory (Hugging Face layout)
    #[arg(long, env = "FINSENSE_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Classifier backend: bert or lexicon
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Inference device: cpu, cuda, metal or auto
    #[arg(long)]
    pub device: Option<DeviceSpec>,
}
