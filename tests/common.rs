#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use case_label_server::label::{layout, LabelRequest};
use case_label_server::ServerConfig;
use printpdf::image_crate::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use zip::ZipArchive;

/// Write a small PNG logo into `dir` and return its path.
pub fn write_logo(dir: &Path) -> PathBuf {
    let path = dir.join("logo.png");
    std::fs::write(&path, logo_png()).expect("failed to write logo fixture");
    path
}

pub fn logo_png() -> Vec<u8> {
    let image = RgbImage::from_fn(80, 20, |x, _| {
        if x % 2 == 0 {
            Rgb([20, 60, 160])
        } else {
            Rgb([240, 240, 240])
        }
    });
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut bytes, ImageOutputFormat::Png)
        .expect("failed to encode logo fixture");
    bytes.into_inner()
}

pub fn test_config(logo_path: PathBuf) -> ServerConfig {
    ServerConfig {
        logo_path,
        max_cases: 25,
        render_workers: 2,
        ..ServerConfig::default()
    }
}

pub fn sample_request(cases: i64) -> LabelRequest {
    LabelRequest {
        customer_name: "Acme".to_string(),
        delivery_location: "Dock 4".to_string(),
        material_code: "MX-100".to_string(),
        number_of_cases: cases,
        layout: None,
    }
}

/// Entries of a ZIP archive as (name, bytes), in archive order.
pub fn unzip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("response is not a ZIP archive");
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).expect("unreadable entry");
            let mut body = Vec::new();
            entry.read_to_end(&mut body).expect("unreadable entry body");
            (entry.name().to_string(), body)
        })
        .collect()
}

/// Text drawn on each page of a PDF, one `Vec` per page in page order.
pub fn page_texts(pdf: &[u8]) -> Vec<Vec<String>> {
    use lopdf::content::Content;
    use lopdf::Object;

    let doc = lopdf::Document::load_mem(pdf).expect("invalid PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let raw = doc.get_page_content(page_id).expect("missing page content");
            let content = Content::decode(&raw).expect("undecodable page content");
            content
                .operations
                .iter()
                .filter_map(|op| match (op.operator.as_str(), op.operands.first()) {
                    ("Tj", Some(Object::String(bytes, _))) => Some(win_ansi(bytes)),
                    ("TJ", Some(Object::Array(parts))) => Some(
                        parts
                            .iter()
                            .filter_map(|part| match part {
                                Object::String(bytes, _) => Some(win_ansi(bytes)),
                                _ => None,
                            })
                            .collect(),
                    ),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

/// Label text is written with the builtin Helvetica WinAnsi encoding.
fn win_ansi(bytes: &[u8]) -> String {
    lopdf::Document::decode_text(Some("WinAnsiEncoding"), bytes)
}

/// Read back the QR symbol drawn on each page of a PDF, in page order.
///
/// Filled rectangles (`re` followed by `f`) are the only filled paths on a
/// label, so they are painted into a bitmap covering the QR box and handed to
/// an independent decoder.
pub fn page_symbols(pdf: &[u8]) -> Vec<String> {
    use lopdf::content::Content;

    const SCALE: f32 = 4.0;
    let side = (layout::QR_BOX * SCALE) as usize;

    let doc = lopdf::Document::load_mem(pdf).expect("invalid PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let raw = doc.get_page_content(page_id).expect("missing page content");
            let content = Content::decode(&raw).expect("undecodable page content");

            let mut dark = vec![false; side * side];
            for pair in content.operations.windows(2) {
                if pair[0].operator != "re" || pair[1].operator != "f" {
                    continue;
                }
                let [x, y, w, h]: [f32; 4] = pair[0]
                    .operands
                    .iter()
                    .map(|o| o.as_float().expect("non-numeric rectangle operand"))
                    .collect::<Vec<_>>()
                    .try_into()
                    .expect("rectangle needs four operands");

                // PDF space is bottom-up; the layout box is top-down.
                let left = x - layout::QR_X;
                let top = layout::PAGE_HEIGHT - (y + h) - layout::QR_Y;
                let to_px = |v: f32| ((v * SCALE).round().max(0.0) as usize).min(side);
                for py in to_px(top)..to_px(top + h) {
                    for px in to_px(left)..to_px(left + w) {
                        dark[py * side + px] = true;
                    }
                }
            }

            let mut image = rqrr::PreparedImage::prepare_from_greyscale(side, side, |x, y| {
                if dark[y * side + x] {
                    0
                } else {
                    255
                }
            });
            let grids = image.detect_grids();
            assert_eq!(grids.len(), 1, "expected exactly one QR symbol per page");
            let (_meta, text) = grids[0].decode().expect("QR symbol did not decode");
            text
        })
        .collect()
}
