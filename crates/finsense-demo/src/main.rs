use anyhow::Context;
use clap::Parser;
use finsense_classifiers::{validate_text, SentimentEngine};
use finsense_demo::cli::{Cli, Commands};
use finsense_demo::config::AppConfig;
use finsense_demo::models::PredictResponse;
use finsense_demo::server::run_server;
use finsense_demo::state::AppState;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            address,
            model,
            verbose,
        } => {
            init_logging(verbose);

            let mut config = AppConfig::load(&model.config, &model)
                .with_context(|| format!("Failed to load {}", model.config.display()))?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(address) = address {
                config.server.address = address;
            }

            // Fail fast: never serve without a model
            let engine = SentimentEngine::from_config(&config.model)
                .context("Failed to initialize the sentiment model")?;

            let model_name = engine.model_name().to_string();

            let metrics_handle = init_metrics()?;
            let state = AppState::new(engine, config.ui.clone()).with_metrics(metrics_handle);

            println!();
            println!("  FinSense · Calibrated Sentiment Engine");
            println!();
            println!("  Model:   {} ({:?})", model_name, config.model.backend);
            println!(
                "  Open http://{}:{} in your browser",
                config.server.address, config.server.port
            );
            println!();

            run_server(state, &config.server).await?;
        }

        Commands::Predict {
            text,
            json,
            model,
            verbose,
        } => {
            init_logging(verbose);

            let config = AppConfig::load(&model.config, &model)
                .with_context(|| format!("Failed to load {}", model.config.display()))?;
            let engine = SentimentEngine::from_config(&config.model)
                .context("Failed to initialize the sentiment model")?;

            let text = validate_text(&text)?;
            let analysis = engine.analyze(text).await?;

            if json {
                let response = PredictResponse::new(uuid::Uuid::new_v4(), analysis);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                for score in &analysis.report.distribution {
                    println!("{:<14} {:>6.2}%", score.label, score.probability * 100.0);
                }
                println!();
                println!("{}", analysis.report.summary);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "finsense=debug,finsense_demo=debug,finsense_classifiers=debug,tower_http=debug"
    } else {
        "finsense=info,finsense_demo=info,finsense_classifiers=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the Prometheus recorder and return handle for rendering
fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "finsense_predictions_total",
        "Predictions served, by review status"
    );
    metrics::describe_counter!("finsense_errors_total", "Failed requests by error kind");
    metrics::describe_histogram!(
        "finsense_inference_latency_us",
        metrics::Unit::Microseconds,
        "Inference plus reporting latency in microseconds"
    );

    // Histograms are drained only on upkeep when the recorder is installed without a listener
    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(5));
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    tracing::info!("Metrics exporter initialized");
    Ok(handle)
}
