use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod archive;
pub mod config;
pub mod label;
pub mod state;

pub use crate::config::{CorsOrigins, ServerConfig};
pub use crate::state::AppState;

use crate::label::ValidationErrors;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
            details: None,
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new(message)
    }

    pub fn validation(errors: &ValidationErrors) -> Self {
        Self {
            error: errors.to_string(),
            details: Some(errors.messages()),
        }
    }
}

/// `Cors::allowed_origin` panics on `*`, so the wildcard maps to `allow_any_origin`.
pub fn cors_middleware(origins: &CorsOrigins) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600);

    match origins {
        CorsOrigins::Any => cors.allow_any_origin(),
        CorsOrigins::List(list) => list
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}

/// Register every application route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(label::handlers::config);
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[derive(OpenApi)]
    #[openapi(
        paths(crate::label::handlers::generate_label),
        components(schemas(
            label::LabelRequest,
            label::ArchiveLayout,
            ErrorResponse,
        )),
        tags(
            (name = "Label Service", description = "Case label generation.")
        )
    )]
    struct ApiDoc;

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    if !config.logo_path.exists() {
        log::warn!(
            "Logo asset {} does not exist; label requests will fail until it is provided",
            config.logo_path.display()
        );
    }

    let prometheus = PrometheusMetricsBuilder::new("case_label_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    let bind_addr = (config.host.clone(), config.port);
    let app_state = web::Data::new(AppState::new(config));

    log::info!("Starting server at http://{}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();

        let cors = cors_middleware(&app_state.config.cors_origins);

        App::new()
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind_addr.clone())
    .with_context(|| format!("failed to bind {}:{}", bind_addr.0, bind_addr.1))?
    .run()
    .await?;

    Ok(())
}
