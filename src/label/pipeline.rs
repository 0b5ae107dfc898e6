//! Request-level rendering: drives the renderer for every case of a request and
//! packs the results into a ZIP archive.
//!
//! PDF drawing is CPU bound, so each render runs on the blocking pool. Per-case
//! renders go through a bounded `buffered` stream, which yields results in case
//! order no matter which render finishes first.

use std::path::Path;

use actix_web::web;
use futures::stream::{self, StreamExt, TryStreamExt};

use super::models::{ArchiveLayout, LabelRequest};
use super::renderer::LabelRenderer;
use super::{LabelError, RenderedDocument};
use crate::archive;

/// A rendered and packed request.
#[derive(Debug)]
pub struct LabelArchive {
    pub bytes: Vec<u8>,
    pub entries: Vec<String>,
    pub pages: u32,
}

/// Render every case of `request` with at most `workers` renders in flight.
pub async fn render_documents(
    renderer: &LabelRenderer,
    request: &LabelRequest,
    layout: ArchiveLayout,
    workers: usize,
) -> Result<Vec<RenderedDocument>, LabelError> {
    match layout {
        ArchiveLayout::Combined => {
            let renderer = renderer.clone();
            let request = request.clone();
            let document = run_blocking(move || renderer.render_batch(&request)).await?;
            Ok(vec![document])
        }
        ArchiveLayout::PerCase => {
            stream::iter(request.cases())
                .map(|content| {
                    let renderer = renderer.clone();
                    log::debug!(
                        "Queueing render of case {}/{}",
                        content.current_case,
                        content.total_cases
                    );
                    run_blocking(move || renderer.render(&content))
                })
                .buffered(workers.max(1))
                .try_collect()
                .await
        }
    }
}

/// Load the logo, render the request and pack the documents.
pub async fn build_archive(
    logo_path: &Path,
    request: &LabelRequest,
    layout: ArchiveLayout,
    workers: usize,
) -> Result<LabelArchive, LabelError> {
    let renderer = LabelRenderer::load(logo_path).await?;
    let documents = render_documents(&renderer, request, layout, workers).await?;

    let pages = documents.iter().map(|d| d.pages).sum();
    let entries = documents.iter().map(|d| d.name.clone()).collect();
    let bytes = web::block(move || archive::bundle(&documents))
        .await
        .map_err(|e| LabelError::Worker(e.to_string()))??;

    Ok(LabelArchive {
        bytes,
        entries,
        pages,
    })
}

async fn run_blocking<F>(job: F) -> Result<RenderedDocument, LabelError>
where
    F: FnOnce() -> Result<RenderedDocument, LabelError> + Send + 'static,
{
    web::block(job)
        .await
        .map_err(|e| LabelError::Worker(e.to_string()))?
}
