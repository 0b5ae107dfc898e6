//! Fixed label geometry and text metrics.
//!
//! All positions are PDF points measured from the top-left corner of the page,
//! the way the label is laid out on paper. `page_y` flips them into the PDF
//! coordinate system, whose origin is the bottom-left corner.

use printpdf::{Mm, Pt};

pub const PAGE_WIDTH: f32 = 283.465;
pub const PAGE_HEIGHT: f32 = 212.6;
pub const MARGIN: f32 = 2.0;

pub const FONT_SIZE: f32 = 7.8;
pub const LINE_WIDTH: f32 = 1.0;

/// Helvetica ascender, descender and line gap, in 1/1000 em.
const ASCENDER: f32 = 718.0;
const DESCENDER: f32 = 207.0;
const LINE_GAP: f32 = 231.0;

/// (x, y, width, height)
pub const OUTER_FRAME: (f32, f32, f32, f32) = (10.0, 10.0, 263.4, 202.6);
pub const INNER_FRAME: (f32, f32, f32, f32) = (12.0, 12.0, 259.4, 198.6);
pub const LOGO_BOX: (f32, f32, f32, f32) = (40.0, 15.0, 200.0, 50.0);

/// The divider sits 75 points below the text cursor, which is still at the top
/// margin when the logo is placed.
pub const DIVIDER_Y: f32 = MARGIN + 75.0;
pub const DIVIDER_X: (f32, f32) = (15.0, 268.0);

pub const TEXT_X: f32 = 30.0;
pub const RECIPIENT_Y: f32 = 110.0;
pub const MATERIAL_Y: f32 = 175.0;
pub const LOCATION_WRAP_WIDTH: f32 = 100.0;

pub const QR_X: f32 = TEXT_X + 130.0;
pub const QR_Y: f32 = 100.0;
pub const QR_BOX: f32 = 100.0;

pub fn line_height() -> f32 {
    (ASCENDER + DESCENDER + LINE_GAP) / 1000.0 * FONT_SIZE
}

/// Baseline of a text line whose top edge is at `top`.
pub fn baseline(top: f32) -> f32 {
    top + ASCENDER / 1000.0 * FONT_SIZE
}

pub fn page_x(x: f32) -> Mm {
    Mm::from(Pt(x))
}

pub fn page_y(y: f32) -> Mm {
    Mm::from(Pt(PAGE_HEIGHT - y))
}

pub fn page_size() -> (Mm, Mm) {
    (Mm::from(Pt(PAGE_WIDTH)), Mm::from(Pt(PAGE_HEIGHT)))
}

/// Width available to text starting at `x` before the right margin.
pub fn remaining_width(x: f32) -> f32 {
    PAGE_WIDTH - MARGIN - x
}

/// Helvetica advance widths for printable ASCII (0x20..=0x7E), 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

const FALLBACK_WIDTH: u16 = 556;

fn char_width(c: char) -> f32 {
    let units = match c as u32 {
        code @ 0x20..=0x7E => HELVETICA_WIDTHS[(code - 0x20) as usize],
        _ => FALLBACK_WIDTH,
    };
    f32::from(units) / 1000.0 * FONT_SIZE
}

pub fn text_width(text: &str) -> f32 {
    text.chars().map(char_width).sum()
}

/// Greedy word wrap at `max_width` points. Words wider than a whole line are
/// broken between characters.
pub fn wrap_text(text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let space = char_width(' ');

    for word in text.split_whitespace() {
        let word_width = text_width(word);
        let current_width = text_width(&current);

        if !current.is_empty() && current_width + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if word_width <= max_width {
            current.push_str(word);
            continue;
        }

        for c in word.chars() {
            if !current.is_empty() && text_width(&current) + char_width(c) > max_width {
                lines.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
