//! QR symbol encoding for label payloads.

use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};

/// Light modules kept around the symbol on every side.
pub const QUIET_ZONE: usize = 4;

/// Encoded QR module matrix, without the quiet zone.
#[derive(Debug, Clone)]
pub struct QrSymbol {
    width: usize,
    modules: Vec<bool>,
}

/// A horizontal stretch of dark modules in one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DarkRun {
    pub row: usize,
    pub start: usize,
    pub len: usize,
}

impl QrSymbol {
    /// Encode `payload` at error correction level M.
    pub fn encode(payload: &str) -> Result<Self, QrError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)?;
        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();
        Ok(Self { width, modules })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// Edge length of one module when the symbol plus quiet zone fills `box_size`.
    pub fn module_size(&self, box_size: f32) -> f32 {
        box_size / (self.width + 2 * QUIET_ZONE) as f32
    }

    /// Dark modules grouped into maximal horizontal runs, row by row.
    pub fn dark_runs(&self) -> Vec<DarkRun> {
        let mut runs = Vec::new();
        for row in 0..self.width {
            let mut col = 0;
            while col < self.width {
                if !self.is_dark(col, row) {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < self.width && self.is_dark(col, row) {
                    col += 1;
                }
                runs.push(DarkRun {
                    row,
                    start,
                    len: col - start,
                });
            }
        }
        runs
    }
}
