//! PDF rendering of case labels.
//!
//! A label page is drawn in a fixed order: frames, logo, divider, text block and
//! finally the QR symbol. Every QR symbol of a document is encoded before the
//! first page is drawn, so an encoding failure never yields a partial PDF.
//!
//! Output is byte-for-byte repeatable: document dates are pinned to the Unix
//! epoch, no XMP packet is written and the trailer `/ID` is derived from the
//! entry name instead of a random instance id.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::lopdf::{self, Object, StringFormat};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, CustomPdfConformance, Image, ImageTransform, IndirectFontRef, Line,
    OffsetDateTime, PdfConformance, PdfDocument, PdfLayerReference, Point, Rect, Rgb,
};

use super::layout::{self, page_x, page_y};
use super::models::{ArchiveLayout, LabelContent, LabelRequest};
use super::qr::{QrSymbol, QUIET_ZONE};
use super::{LabelError, RenderedDocument};

const DOCUMENT_TITLE: &str = "Case labels";
const LAYER_NAME: &str = "Label";

/// Draws label pages. Cheap to clone; the decoded logo is shared.
#[derive(Clone)]
pub struct LabelRenderer {
    logo: Arc<DynamicImage>,
}

impl LabelRenderer {
    /// Read and decode the logo image at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let bytes = tokio::fs::read(path.as_ref())
            .await
            .map_err(LabelError::LogoRead)?;
        Self::from_logo_bytes(&bytes)
    }

    pub fn from_logo_bytes(bytes: &[u8]) -> Result<Self, LabelError> {
        let logo = image_crate::load_from_memory(bytes).map_err(LabelError::LogoDecode)?;
        Ok(Self {
            logo: Arc::new(logo),
        })
    }

    /// Render a single-page document for one case.
    pub fn render(&self, content: &LabelContent) -> Result<RenderedDocument, LabelError> {
        let name = ArchiveLayout::PerCase.entry_name(content.current_case);
        self.render_pages(std::slice::from_ref(content), name)
    }

    /// Render one document holding a page per case, in case order.
    pub fn render_batch(&self, request: &LabelRequest) -> Result<RenderedDocument, LabelError> {
        let contents: Vec<LabelContent> = request.cases().collect();
        let name = ArchiveLayout::Combined.entry_name(request.total_cases());
        self.render_pages(&contents, name)
    }

    fn render_pages(
        &self,
        contents: &[LabelContent],
        name: String,
    ) -> Result<RenderedDocument, LabelError> {
        if contents.is_empty() {
            return Err(LabelError::NoCases);
        }

        let symbols = contents
            .iter()
            .map(encode_payload)
            .collect::<Result<Vec<_>, _>>()?;

        let (width, height) = layout::page_size();
        let (doc, first_page, first_layer) =
            PdfDocument::new(DOCUMENT_TITLE, width, height, LAYER_NAME);
        let doc = doc
            .with_conformance(PdfConformance::Custom(CustomPdfConformance {
                requires_xmp_metadata: false,
                requires_icc_profile: false,
                allows_default_fonts: true,
                ..Default::default()
            }))
            .with_document_id(name.clone())
            .with_creation_date(OffsetDateTime::UNIX_EPOCH)
            .with_mod_date(OffsetDateTime::UNIX_EPOCH)
            .with_metadata_date(OffsetDateTime::UNIX_EPOCH);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(LabelError::Pdf)?;

        for (index, (content, symbol)) in contents.iter().zip(&symbols).enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) = doc.add_page(width, height, LAYER_NAME);
                doc.get_page(page).get_layer(layer)
            };
            self.draw_label(&layer, &font, content, symbol);
        }

        let pdf = doc.save_to_bytes().map_err(LabelError::Pdf)?;
        let pdf = finish_document(&pdf, &name)?;

        Ok(RenderedDocument {
            name,
            pdf,
            pages: contents.len() as u32,
        })
    }

    fn draw_label(
        &self,
        layer: &PdfLayerReference,
        font: &IndirectFontRef,
        content: &LabelContent,
        symbol: &QrSymbol,
    ) {
        layer.set_outline_color(black());
        layer.set_fill_color(black());
        layer.set_outline_thickness(layout::LINE_WIDTH);

        layer.add_rect(frame(layout::OUTER_FRAME, PaintMode::Stroke));
        layer.add_rect(frame(layout::INNER_FRAME, PaintMode::Stroke));

        self.draw_logo(layer);

        let (x1, x2) = layout::DIVIDER_X;
        layer.add_line(Line {
            points: vec![
                (Point::new(page_x(x1), page_y(layout::DIVIDER_Y)), false),
                (Point::new(page_x(x2), page_y(layout::DIVIDER_Y)), false),
            ],
            is_closed: false,
        });

        draw_text_block(layer, font, content);
        draw_symbol(layer, symbol);
    }

    fn draw_logo(&self, layer: &PdfLayerReference) {
        let (x, y, w, h) = layout::LOGO_BOX;
        let (px_width, px_height) = self.logo.dimensions();
        if px_width == 0 || px_height == 0 {
            return;
        }

        // At 72 dpi one pixel is one point, so the scale maps pixels onto the box.
        Image::from_dynamic_image(&self.logo).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(page_x(x)),
                translate_y: Some(page_y(y + h)),
                scale_x: Some(w / px_width as f32),
                scale_y: Some(h / px_height as f32),
                dpi: Some(72.0),
                ..Default::default()
            },
        );
    }
}

/// Replace the random trailer `/ID` with one derived from `name` and compress
/// the content streams, which printpdf leaves uncompressed.
fn finish_document(pdf: &[u8], name: &str) -> Result<Vec<u8>, LabelError> {
    let mut doc = lopdf::Document::load_mem(pdf).map_err(LabelError::PdfFinish)?;

    let id = Object::String(name.as_bytes().to_vec(), StringFormat::Literal);
    doc.trailer.set("ID", Object::Array(vec![id.clone(), id]));
    doc.compress();

    let mut output = Cursor::new(Vec::new());
    doc.save_to(&mut output).map_err(|e| LabelError::PdfFinish(e.into()))?;
    Ok(output.into_inner())
}

fn encode_payload(content: &LabelContent) -> Result<QrSymbol, LabelError> {
    let payload = content.qr_payload().to_json().map_err(LabelError::Payload)?;
    QrSymbol::encode(&payload).map_err(LabelError::QrEncode)
}

fn draw_text_block(layer: &PdfLayerReference, font: &IndirectFontRef, content: &LabelContent) {
    let line_height = layout::line_height();
    let mut top = layout::RECIPIENT_Y;

    let mut lines = vec!["Recipient:".to_string()];
    lines.extend(layout::wrap_text(
        &content.customer_name,
        layout::remaining_width(layout::TEXT_X),
    ));
    lines.extend(layout::wrap_text(
        &content.delivery_location,
        layout::LOCATION_WRAP_WIDTH,
    ));

    for line in lines {
        write_line(layer, font, &line, top);
        top += line_height;
    }

    write_line(layer, font, &content.material_line(), layout::MATERIAL_Y);
    write_line(
        layer,
        font,
        &content.cases_line(),
        layout::MATERIAL_Y + line_height,
    );
}

fn write_line(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, top: f32) {
    layer.use_text(
        text,
        layout::FONT_SIZE,
        page_x(layout::TEXT_X),
        page_y(layout::baseline(top)),
        font,
    );
}

fn draw_symbol(layer: &PdfLayerReference, symbol: &QrSymbol) {
    let module = symbol.module_size(layout::QR_BOX);
    let origin_x = layout::QR_X + QUIET_ZONE as f32 * module;
    let origin_y = layout::QR_Y + QUIET_ZONE as f32 * module;

    for run in symbol.dark_runs() {
        let x = origin_x + run.start as f32 * module;
        let y = origin_y + run.row as f32 * module;
        layer.add_rect(frame(
            (x, y, run.len as f32 * module, module),
            PaintMode::Fill,
        ));
    }
}

/// Rectangle given as top-left (x, y, width, height).
fn frame((x, y, w, h): (f32, f32, f32, f32), mode: PaintMode) -> Rect {
    Rect::new(page_x(x), page_y(y + h), page_x(x + w), page_y(y)).with_mode(mode)
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}
