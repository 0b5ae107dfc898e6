#[cfg(test)]
mod error_handling_tests {
    use case_label_server::archive::ArchiveError;
    use case_label_server::label::validation::{RequestLimits, Validator};
    use case_label_server::label::{LabelError, LabelRequest};
    use case_label_server::ErrorResponse;
    use serde_json::json;

    const LIMITS: RequestLimits = RequestLimits {
        max_cases: 10,
        max_field_chars: 200,
    };

    #[test]
    fn test_error_response_shape() {
        let error = ErrorResponse::internal_error("An error occurred while generating labels");
        let value = serde_json::to_value(&error).unwrap();

        // details is omitted entirely when absent
        assert_eq!(value, json!({ "error": "An error occurred while generating labels" }));
    }

    #[test]
    fn test_validation_response_lists_every_problem() {
        let request = LabelRequest {
            customer_name: String::new(),
            delivery_location: String::new(),
            material_code: "MX-100".to_string(),
            number_of_cases: 0,
            layout: None,
        };
        let errors = request
            .validate(&LIMITS)
            .unwrap_err();

        let response = ErrorResponse::validation(&errors);
        let details = response.details.unwrap();
        assert_eq!(details.len(), 3);
        assert!(response.error.contains("3 error(s)"));
    }

    #[test]
    fn test_error_response_deserialization() {
        let body = r#"{ "error": "bad input", "details": ["numberOfCases: out of range"] }"#;
        let response: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.error, "bad input");
        assert_eq!(response.details.unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_json_requests() {
        let malformed_json = r#"{ "customerName": "Acme", "numberOfCases": "#;
        let result: Result<LabelRequest, _> = serde_json::from_str(malformed_json);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let body = json!({ "customerName": "Acme", "numberOfCases": 2 });
        let result: Result<LabelRequest, _> = serde_json::from_value(body);
        assert!(result.is_err());
    }

    #[test]
    fn test_archive_errors_convert_into_label_errors() {
        let error: LabelError = ArchiveError::Empty.into();
        assert!(matches!(error, LabelError::Archive(ArchiveError::Empty)));
        assert_eq!(
            error.to_string(),
            "failed to assemble archive: archive has no entries"
        );
    }

    #[test]
    fn test_extremely_long_inputs() {
        let request = LabelRequest {
            customer_name: "A".repeat(10_000),
            delivery_location: "Dock 4".to_string(),
            material_code: "MX-100".to_string(),
            number_of_cases: 1,
            layout: None,
        };

        let errors = request
            .validate(&LIMITS)
            .unwrap_err();
        assert_eq!(errors.errors()[0].field, "customerName");
    }
}
