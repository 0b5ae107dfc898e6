//! Input validation for label requests.
//!
//! Every check runs before the logo is loaded or a page is drawn, so a rejected
//! request never costs rendering work.

use std::fmt;

use printpdf::lopdf;

use super::models::LabelRequest;

/// Default cap on any free-text field, in characters.
pub const DEFAULT_MAX_FIELD_CHARS: usize = 200;

/// Labels are set in builtin Helvetica, which only carries WinAnsi glyphs.
const LABEL_FONT_ENCODING: &str = "WinAnsiEncoding";

/// A rejected request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// JSON name of the field, e.g. `numberOfCases`.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every problem found in one request, in field order.
#[derive(Debug)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: {} error(s) found", self.0.len())
    }
}

impl std::error::Error for ValidationErrors {}

/// Limits a request is checked against.
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub max_cases: u32,
    pub max_field_chars: usize,
}

pub trait Validator {
    fn validate(&self, limits: &RequestLimits) -> Result<(), ValidationErrors>;
}

impl Validator for LabelRequest {
    fn validate(&self, limits: &RequestLimits) -> Result<(), ValidationErrors> {
        let texts = [
            ("customerName", "Customer name", &self.customer_name),
            ("deliveryLocation", "Delivery location", &self.delivery_location),
            ("materialCode", "Material code", &self.material_code),
        ];

        let mut errors: Vec<ValidationError> = texts
            .into_iter()
            .filter_map(|(field, label, value)| {
                check_text(label, value, limits.max_field_chars)
                    .map(|message| ValidationError { field, message })
            })
            .collect();

        if !(1..=i64::from(limits.max_cases)).contains(&self.number_of_cases) {
            errors.push(ValidationError {
                field: "numberOfCases",
                message: format!(
                    "Number of cases must be between 1 and {}, got {}",
                    limits.max_cases, self.number_of_cases
                ),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

fn check_text(label: &str, value: &str, max_chars: usize) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{} must not be empty", label));
    }
    if value.chars().count() > max_chars {
        return Some(format!("{} is longer than {} characters", label, max_chars));
    }
    value.chars().find(|&c| !is_printable(c)).map(|c| {
        format!(
            "{} contains {:?} (U+{:04X}), which the label font cannot print",
            label, c, c as u32
        )
    })
}

/// True when the label font has a glyph for `c`; control characters have none.
fn is_printable(c: char) -> bool {
    let mut buf = [0u8; 4];
    !lopdf::Document::encode_text(Some(LABEL_FONT_ENCODING), c.encode_utf8(&mut buf)).is_empty()
}
