//! Churn Detect server entry point.

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use churn_detect::adapters::http::{app_router, PredictionAppState};
use churn_detect::adapters::{ModelArtifacts, OpenAIConfig, OpenAIProvider};
use churn_detect::application::{
    BatchLimits, ExtractCustomerHandler, ExtractionSettings, PredictChurnHandler,
    PredictFromTextHandler,
};
use churn_detect::config::AppConfig;
use churn_detect::ports::AIProvider;
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        return Err(e.into());
    }

    let artifacts = ModelArtifacts::load(&config.model).map_err(|e| {
        tracing::error!(error = %e, "failed to load model artifacts");
        e
    })?;

    let api_key = config
        .ai
        .openai_api_key
        .as_ref()
        .map(|k| k.expose_secret().clone())
        .unwrap_or_default();
    let provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout()),
    )?;
    let provider_info = provider.provider_info();
    tracing::info!(
        provider = %provider_info.name,
        model = %provider_info.model,
        "language model provider configured"
    );

    let extractor = Arc::new(ExtractCustomerHandler::new(
        Arc::new(provider),
        ExtractionSettings {
            temperature: config.ai.temperature,
            max_tokens: config.ai.max_tokens,
        },
    ));
    let predictor = Arc::new(PredictChurnHandler::new(
        artifacts.transformer.clone(),
        artifacts.classifier.clone(),
    ));
    let handler = Arc::new(PredictFromTextHandler::new(
        extractor,
        predictor,
        BatchLimits {
            concurrency: config.prediction.batch_concurrency,
            max_size: config.prediction.max_batch_size,
            timeout: config.prediction.batch_timeout(),
        },
    ));

    let state = PredictionAppState::new(
        handler,
        config.api.name.as_str(),
        config.api.description.as_str(),
    );
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        api = %config.api.name,
        environment = ?config.server.environment,
        "server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` overrides the configured filter.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}
