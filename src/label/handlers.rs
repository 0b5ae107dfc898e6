use actix_web::{
    error::InternalError,
    http::header,
    web::{self, Json},
    HttpResponse, Responder,
};
use log::{error, info, warn};

use super::models::{ArchiveLayout, LabelRequest};
use super::pipeline::{self, LabelArchive};
use super::validation::Validator;
use crate::{AppState, ErrorResponse};

pub const ARCHIVE_FILENAME: &str = "labels.zip";
const GENERATION_FAILED: &str = "An error occurred while generating labels";

#[utoipa::path(
    tag = "Label Service",
    post,
    path = "/generate-label",
    request_body = LabelRequest,
    responses(
        (status = 200, description = "ZIP archive with one PDF per case or one combined PDF", content_type = "application/zip", body = Vec<u8>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Label generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_label(
    state: web::Data<AppState>,
    body: Json<LabelRequest>,
) -> impl Responder {
    let request = body.into_inner();

    if let Err(errors) = request.validate(&state.limits()) {
        warn!("Rejected label request: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::validation(&errors));
    }

    let layout = request.layout.unwrap_or(state.config.default_layout);
    let result = pipeline::build_archive(
        &state.config.logo_path,
        &request,
        layout,
        state.config.render_workers,
    )
    .await;

    match result {
        Ok(archive) => {
            info!("{}", archive_summary(&archive, layout));
            HttpResponse::Ok()
                .content_type("application/zip")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", ARCHIVE_FILENAME),
                ))
                .body(archive.bytes)
        }
        Err(e) => {
            error!("Failed to generate labels: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(GENERATION_FAILED))
        }
    }
}

/// Log line for a finished request. Request fields are customer data and stay out.
fn archive_summary(archive: &LabelArchive, layout: ArchiveLayout) -> String {
    format!(
        "Generated {} label page(s) as {:?}: {} entries, {} bytes",
        archive.pages,
        layout,
        archive.entries.len(),
        archive.bytes.len()
    )
}

/// Reject unreadable bodies with the same JSON error shape as validation failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!("Malformed label request body: {}", err);
        let response =
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

/// Configure label routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.service(web::resource("/generate-label").route(web::post().to(generate_label)));
}
