use crate::llm::{GenError, Provider};
use crate::prompts;

/// Closed set of query intents.
///
/// `Unknown` covers any model output that is not one of the four literal
/// tokens. A gateway failure stays an `Err` and never degrades to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCategory {
    LocationQuery,
    EmergencyMedical,
    EmergencyNatural,
    General,
    Unknown,
}

impl QueryCategory {
    /// Map a raw model response to a category: trim, lowercase, exact match.
    pub fn from_response(response: &str) -> Self {
        match response.trim().to_lowercase().as_str() {
            "location_query" => Self::LocationQuery,
            "emergency_medical" => Self::EmergencyMedical,
            "emergency_natural" => Self::EmergencyNatural,
            "general" => Self::General,
            _ => Self::Unknown,
        }
    }
}

/// Classify a raw query by asking the model for one of the category tokens.
///
/// The classifier is probabilistic: the same query may classify differently
/// across calls. Callers must not assume correctness.
pub async fn classify<P: Provider + ?Sized>(
    llm: &P,
    query: &str,
) -> Result<QueryCategory, GenError> {
    let response = llm.generate(prompts::classification(query)).await?;
    let category = QueryCategory::from_response(&response);
    tracing::debug!(?category, "query classified");
    Ok(category)
}

/// Outcome of location extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedLocation {
    Place(String),
    NotSpecified,
}

/// Pull a place name out of the raw query.
///
/// Best effort: the model may answer with prose instead of a bare place
/// name. The geocoder is expected to fail gracefully on such input.
pub async fn extract_location<P: Provider + ?Sized>(
    llm: &P,
    query: &str,
) -> Result<ExtractedLocation, GenError> {
    let response = llm.generate(prompts::location_extraction(query)).await?;
    let place = response.trim();
    if place.is_empty() || place.contains(prompts::NO_LOCATION_SENTINEL) {
        return Ok(ExtractedLocation::NotSpecified);
    }
    Ok(ExtractedLocation::Place(place.to_owned()))
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use futures_lite::future::block_on;

    use super::*;

    struct Canned(&'static str);

    impl Provider for Canned {
        fn generate(
            &self,
            _prompt: String,
        ) -> Pin<Box<dyn Future<Output = Result<String, GenError>> + Send + '_>> {
            let response = self.0.to_owned();
            Box::pin(async move { Ok(response) })
        }
    }

    struct Failing;

    impl Provider for Failing {
        fn generate(
            &self,
            _prompt: String,
        ) -> Pin<Box<dyn Future<Output = Result<String, GenError>> + Send + '_>> {
            Box::pin(async { Err(GenError::Network("connection refused".into())) })
        }
    }

    #[test]
    fn category_tokens_parse_exactly() {
        assert_eq!(
            QueryCategory::from_response("location_query"),
            QueryCategory::LocationQuery
        );
        assert_eq!(
            QueryCategory::from_response("  Emergency_Medical \n"),
            QueryCategory::EmergencyMedical
        );
        assert_eq!(
            QueryCategory::from_response("emergency_natural"),
            QueryCategory::EmergencyNatural
        );
        assert_eq!(QueryCategory::from_response("GENERAL"), QueryCategory::General);
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(QueryCategory::from_response("unknown"), QueryCategory::Unknown);
        assert_eq!(
            QueryCategory::from_response("This is a medical emergency."),
            QueryCategory::Unknown
        );
        assert_eq!(QueryCategory::from_response(""), QueryCategory::Unknown);
    }

    #[test]
    fn classify_maps_model_token() {
        let category = block_on(classify(&Canned("emergency_medical"), "mi sono tagliato"));
        assert_eq!(category.unwrap(), QueryCategory::EmergencyMedical);
    }

    #[test]
    fn gateway_failure_is_an_error_not_unknown() {
        let result = block_on(classify(&Failing, "aiuto"));
        assert!(matches!(result, Err(GenError::Network(_))));
    }

    #[test]
    fn extraction_returns_trimmed_place() {
        let extracted = block_on(extract_location(&Canned("  Piazza del Popolo \n"), "q"));
        assert_eq!(
            extracted.unwrap(),
            ExtractedLocation::Place("Piazza del Popolo".to_owned())
        );
    }

    #[test]
    fn sentinel_maps_to_not_specified() {
        let extracted = block_on(extract_location(&Canned("Località non specificata"), "q"));
        assert_eq!(extracted.unwrap(), ExtractedLocation::NotSpecified);
    }

    #[test]
    fn sentinel_inside_prose_maps_to_not_specified() {
        let extracted = block_on(extract_location(
            &Canned("Mi dispiace, Località non specificata."),
            "q",
        ));
        assert_eq!(extracted.unwrap(), ExtractedLocation::NotSpecified);
    }
}
