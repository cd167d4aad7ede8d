#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_schema_generation() {
        // Test that the OpenAPI schema can be generated without errors
        let openapi = ApiDoc::openapi();

        // Verify that the schema contains the expected components
        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();

        // Check that the shared response schemas are properly defined
        assert!(components.schemas.contains_key("ErrorResponse"));
        assert!(components.schemas.contains_key("HealthResponse"));
        assert!(components.schemas.contains_key("IntakeSubmission"));

        // Verify that the schema can be serialized to JSON without errors
        let json_result = serde_json::to_string(&openapi);
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let error_response_schema = components.schemas.get("ErrorResponse").unwrap();

        // Verify ErrorResponse has the expected structure
        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) =
            error_response_schema
        {
            let properties = &obj.properties;
            assert!(properties.contains_key("error"));
            assert!(properties.contains_key("code"));
            assert!(properties.contains_key("success"));
        } else {
            panic!("ErrorResponse should be an object schema");
        }
    }

    #[test]
    fn test_intake_submission_keeps_the_spaced_wire_names() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let intake_schema = components.schemas.get("IntakeSubmission").unwrap();

        // The intake schema must expose the model's literal column names,
        // spaces included, or the front's payloads stop matching.
        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) =
            intake_schema
        {
            let properties = &obj.properties;
            assert!(properties.contains_key("humedad (%)"));
            assert!(properties.contains_key("presencia de rinitis alergica u otras alergias"));
            assert!(properties.contains_key("tipo de mascotas"));
            assert!(properties.contains_key("DNI"));
        } else {
            panic!("IntakeSubmission should be an object schema");
        }
    }

    #[test]
    fn test_openapi_paths_contain_the_main_endpoints() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.paths.paths.contains_key("/health"));
        assert!(openapi.paths.paths.contains_key("/api/auth/register"));
        assert!(openapi.paths.paths.contains_key("/api/forms/recent"));

        // The prediction endpoint is a POST with its documented outcomes.
        let prediction_path = openapi.paths.paths.get("/prediccion").unwrap();
        let prediction_post = prediction_path
            .operations
            .get(&utoipa::openapi::PathItemType::Post);
        assert!(prediction_post.is_some());

        let responses = &prediction_post.unwrap().responses;
        assert!(responses.responses.contains_key("200"));
        assert!(responses.responses.contains_key("400"));
        assert!(responses.responses.contains_key("500"));
    }

    #[test]
    fn test_all_error_responses_reference_correct_schema() {
        let openapi = ApiDoc::openapi();
        let openapi_json = serde_json::to_string(&openapi).unwrap();

        // Ensure no references to crate.schemas.ErrorResponse exist
        assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));

        // Ensure proper ErrorResponse references exist
        assert!(openapi_json.contains("ErrorResponse"));
    }
}
