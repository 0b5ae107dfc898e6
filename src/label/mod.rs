//! Label module - business logic for turning a shipment request into printable
//! case labels and packaging them into a ZIP archive.
//!
//! - `models` - request/response types and the per-case view
//! - `validation` - input checks performed before any rendering
//! - `layout` - fixed page geometry and Helvetica text metrics
//! - `qr` - QR symbol encoding of the per-case payload
//! - `renderer` - PDF drawing of one page per case
//! - `pipeline` - ordered, bounded-concurrency rendering of a whole request
//! - `handlers` - the `POST /generate-label` endpoint

pub mod handlers;
pub mod layout;
pub mod models;
pub mod pipeline;
pub mod qr;
pub mod renderer;
pub mod validation;

pub use models::{ArchiveLayout, LabelContent, LabelRequest, QrPayload};
pub use qr::QrSymbol;
pub use renderer::LabelRenderer;
pub use validation::{ValidationError, ValidationErrors, Validator};

use thiserror::Error;

use crate::archive::ArchiveError;

/// Errors that can occur while producing labels for a request.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("failed to read logo asset: {0}")]
    LogoRead(#[source] std::io::Error),
    #[error("failed to decode logo asset: {0}")]
    LogoDecode(#[source] printpdf::image_crate::ImageError),
    #[error("failed to serialize QR payload: {0}")]
    Payload(#[source] serde_json::Error),
    #[error("failed to encode QR symbol: {0}")]
    QrEncode(#[source] qrcode::types::QrError),
    #[error("failed to write PDF document: {0}")]
    Pdf(#[source] printpdf::Error),
    #[error("failed to finalize PDF document: {0}")]
    PdfFinish(#[source] printpdf::lopdf::Error),
    #[error("request has no cases to render")]
    NoCases,
    #[error("render worker failed: {0}")]
    Worker(String),
    #[error("failed to assemble archive: {0}")]
    Archive(#[from] ArchiveError),
}

/// A finished PDF ready to be placed into the archive.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Archive entry name, e.g. `label_3.pdf` or `labels.pdf`.
    pub name: String,
    pub pdf: Vec<u8>,
    pub pages: u32,
}
