use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How rendered labels are laid out inside the ZIP archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ArchiveLayout {
    /// One single-page PDF per case: `label_1.pdf` .. `label_N.pdf`.
    #[default]
    PerCase,
    /// One N-page PDF named `labels.pdf`.
    Combined,
}

impl ArchiveLayout {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "percase" | "per_case" | "per-case" => Some(Self::PerCase),
            "combined" => Some(Self::Combined),
            _ => None,
        }
    }

    /// Archive entry name for a document produced under this layout.
    pub fn entry_name(&self, case: u32) -> String {
        match self {
            Self::PerCase => format!("label_{}.pdf", case),
            Self::Combined => "labels.pdf".to_string(),
        }
    }
}

/// Body of `POST /generate-label`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabelRequest {
    #[schema(example = "Acme")]
    pub customer_name: String,
    #[schema(example = "Dock 4")]
    pub delivery_location: String,
    #[schema(example = "MX-100")]
    pub material_code: String,
    /// Signed so that zero and negative counts reach validation.
    #[schema(example = 3)]
    pub number_of_cases: i64,
    /// Overrides the server's default archive layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<ArchiveLayout>,
}

impl LabelRequest {
    /// Case count as an unsigned value; zero when the request is out of range.
    pub fn total_cases(&self) -> u32 {
        u32::try_from(self.number_of_cases).unwrap_or(0)
    }

    pub fn content_for(&self, current_case: u32) -> LabelContent {
        LabelContent {
            customer_name: self.customer_name.clone(),
            delivery_location: self.delivery_location.clone(),
            material_code: self.material_code.clone(),
            current_case,
            total_cases: self.total_cases(),
        }
    }

    /// Per-case views in case order, 1..=N.
    pub fn cases(&self) -> impl Iterator<Item = LabelContent> + '_ {
        (1..=self.total_cases()).map(move |case| self.content_for(case))
    }
}

/// Everything printed on a single case label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelContent {
    pub customer_name: String,
    pub delivery_location: String,
    pub material_code: String,
    pub current_case: u32,
    pub total_cases: u32,
}

impl LabelContent {
    pub fn material_line(&self) -> String {
        format!("Material Code: {}", self.material_code)
    }

    pub fn cases_line(&self) -> String {
        format!("Cases: {}/{}", self.current_case, self.total_cases)
    }

    pub fn qr_payload(&self) -> QrPayload {
        QrPayload {
            customer_name: self.customer_name.clone(),
            delivery_location: self.delivery_location.clone(),
            material_code: self.material_code.clone(),
            current_case: self.current_case,
            total_cases: self.total_cases,
        }
    }
}

/// JSON document carried by the QR symbol. Field order is part of the format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub customer_name: String,
    pub delivery_location: String,
    pub material_code: String,
    pub current_case: u32,
    pub total_cases: u32,
}

impl QrPayload {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> LabelRequest {
        LabelRequest {
            customer_name: "Acme".to_string(),
            delivery_location: "Dock 4".to_string(),
            material_code: "MX-100".to_string(),
            number_of_cases: 3,
            layout: None,
        }
    }

    #[test]
    fn test_request_deserialization() {
        let json = r#"{
            "customerName": "Acme",
            "deliveryLocation": "Dock 4",
            "materialCode": "MX-100",
            "numberOfCases": 3
        }"#;

        let request: LabelRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.customer_name, "Acme");
        assert_eq!(request.number_of_cases, 3);
        assert_eq!(request.layout, None);
    }

    #[test]
    fn test_request_with_layout() {
        let json = r#"{
            "customerName": "Acme",
            "deliveryLocation": "Dock 4",
            "materialCode": "MX-100",
            "numberOfCases": 2,
            "layout": "combined"
        }"#;

        let request: LabelRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.layout, Some(ArchiveLayout::Combined));
    }

    #[test]
    fn test_cases_are_numbered_in_order() {
        let lines: Vec<String> = sample_request().cases().map(|c| c.cases_line()).collect();
        assert_eq!(lines, vec!["Cases: 1/3", "Cases: 2/3", "Cases: 3/3"]);
    }

    #[test]
    fn test_negative_count_yields_no_cases() {
        let mut request = sample_request();
        request.number_of_cases = -2;
        assert_eq!(request.total_cases(), 0);
        assert_eq!(request.cases().count(), 0);
    }

    #[test]
    fn test_payload_key_order() {
        let json = sample_request().content_for(2).qr_payload().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"customerName":"Acme","deliveryLocation":"Dock 4","materialCode":"MX-100","currentCase":2,"totalCases":3}"#
        );
    }

    #[test]
    fn test_entry_names() {
        assert_eq!(ArchiveLayout::PerCase.entry_name(7), "label_7.pdf");
        assert_eq!(ArchiveLayout::Combined.entry_name(7), "labels.pdf");
        assert_eq!(ArchiveLayout::parse("perCase"), Some(ArchiveLayout::PerCase));
        assert_eq!(ArchiveLayout::parse(" Combined "), Some(ArchiveLayout::Combined));
        assert_eq!(ArchiveLayout::parse("tarball"), None);
    }
}
