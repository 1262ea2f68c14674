use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use base64::Engine;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sowgen::config::Config;
use sowgen::documents::{DocumentService, DocumentTemplate};
use sowgen::middleware::{json_error_handler, RequestId};
use sowgen::modules::{documents, health, pricing};
use sowgen::pricing::PricingReconciler;
use sowgen::rendering::{ArtifactStore, HtmlPassthroughRenderer, JsonWorkbookWriter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (LOG_FORMAT=json for structured output)
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sowgen=debug,actix_web=info".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    let policy = config.pricing_policy()?;

    tracing::info!("Starting SOW document service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());
    tracing::info!(
        tax_rate = %policy.tax_rate_percent,
        max_discount = %policy.max_discount_percent,
        currency = %policy.currency,
        "Pricing policy loaded"
    );

    let template = Arc::new(load_template(&config).await);

    let store = Arc::new(ArtifactStore::new(config.documents.output_dir.clone()));
    store
        .ensure_root()
        .await
        .with_context(|| format!("Failed to create {}", store.root().display()))?;

    let reconciler = PricingReconciler::new(policy);
    let document_service = Arc::new(DocumentService::new(
        reconciler,
        template,
        Arc::new(HtmlPassthroughRenderer),
        Arc::new(JsonWorkbookWriter),
        store.as_ref().clone(),
    ));

    let bind_address = config.server.bind_address();
    let allowed_origins = config.server.cors_allowed_origins.clone();
    let server = HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(cors)
            .wrap(RequestId)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::Data::new(reconciler))
            .app_data(web::Data::new(document_service.clone()))
            .app_data(web::Data::new(store.clone()))
            .configure(health::controllers::configure)
            .configure(pricing::controllers::configure)
            .configure(documents::controllers::configure)
            .route("/", web::get().to(index))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

/// Builds the document template, embedding the logo when one is configured.
/// A missing or unreadable logo is logged and the documents go out without it.
async fn load_template(config: &Config) -> DocumentTemplate {
    let template = DocumentTemplate::new(config.documents.company_name.clone());

    let Some(path) = &config.documents.logo_path else {
        return template;
    };

    match tokio::fs::read(path).await {
        Ok(bytes) => {
            tracing::info!("Logo loaded from {}", path.display());
            template.with_logo(base64::engine::general_purpose::STANDARD.encode(bytes))
        }
        Err(e) => {
            tracing::warn!("Logo file not readable at {}: {}", path.display(), e);
            template
        }
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "SOW Document Service",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
