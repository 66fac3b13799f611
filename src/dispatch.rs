use crate::classify::{self, ExtractedLocation, QueryCategory};
use crate::dataset::CollectionPoint;
use crate::distance;
use crate::geocoding::{GeocodeError, Geocoder};
use crate::llm::Provider;
use crate::prompts;

/// Fixed user-facing messages. Failures never surface as raw error text.
const MSG_NO_LOCATION: &str = "Non sono riuscito a identificare una località valida. \
     Per favore, specifica un indirizzo o una città.";
const MSG_NO_POINTS: &str = "Non sono riuscito a trovare punti di raccolta vicini.";
const MSG_REPHRASE: &str = "Non sono riuscito a classificare la tua domanda. \
     Per favore, riformula la tua richiesta.";
const MSG_SERVICE_DOWN: &str = "Il servizio di risposta non è al momento raggiungibile. \
     Riprova tra qualche istante.";

/// Routes one query from classification to a terminal handler.
///
/// No state is carried across turns; the dataset is read-only.
pub struct Assistant<P, G> {
    llm: P,
    geocoder: G,
    points: Vec<CollectionPoint>,
}

impl<P: Provider, G: Geocoder> Assistant<P, G> {
    pub fn new(llm: P, geocoder: G, points: Vec<CollectionPoint>) -> Self {
        Self {
            llm,
            geocoder,
            points,
        }
    }

    /// One full turn: classify, dispatch, and always produce a
    /// plain-language answer.
    pub async fn answer(&self, query: &str) -> String {
        let category = match classify::classify(&self.llm, query).await {
            Ok(category) => category,
            Err(e) => {
                tracing::warn!(%e, "classification call failed");
                return MSG_SERVICE_DOWN.to_owned();
            }
        };

        match category {
            QueryCategory::LocationQuery => self.handle_location(query).await,
            QueryCategory::EmergencyMedical => self.generate(prompts::first_aid(query)).await,
            QueryCategory::EmergencyNatural => {
                self.generate(prompts::natural_emergency(query)).await
            }
            QueryCategory::General => self.generate(query.to_owned()).await,
            QueryCategory::Unknown => MSG_REPHRASE.to_owned(),
        }
    }

    async fn generate(&self, prompt: String) -> String {
        match self.llm.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%e, "generation call failed");
                MSG_SERVICE_DOWN.to_owned()
            }
        }
    }

    /// Extractor, then geocoder, then nearest-point scan. The distance scan
    /// only ever runs on a resolved coordinate pair.
    async fn handle_location(&self, query: &str) -> String {
        let place = match classify::extract_location(&self.llm, query).await {
            Ok(ExtractedLocation::Place(place)) => place,
            Ok(ExtractedLocation::NotSpecified) => return MSG_NO_LOCATION.to_owned(),
            Err(e) => {
                tracing::warn!(%e, "location extraction failed");
                return MSG_SERVICE_DOWN.to_owned();
            }
        };
        tracing::debug!(place = %place, "extracted location");

        let coordinates = match self.geocoder.geocode(place).await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                tracing::warn!(%e, "geocoding failed");
                return MSG_NO_LOCATION.to_owned();
            }
        };

        match distance::nearest(coordinates.lat, coordinates.lon, &self.points) {
            Some(found) => format!(
                "Il punto di raccolta più vicino è {} a {:.2} km di distanza. \
                 Indirizzo: {} Note: {}",
                found.point.name, found.km, found.point.address, found.point.notes
            ),
            None => MSG_NO_POINTS.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    use futures_lite::future::block_on;

    use crate::geocoding::Coordinates;
    use crate::llm::GenError;

    use super::*;

    /// Answers the classification prompt with a fixed token, the extraction
    /// prompt with a fixed place, and records every prompt it sees.
    struct Scripted {
        classification: &'static str,
        extraction: &'static str,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl Scripted {
        fn new(classification: &'static str, extraction: &'static str) -> Self {
            Self {
                classification,
                extraction,
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl Provider for Scripted {
        fn generate(
            &self,
            prompt: String,
        ) -> Pin<Box<dyn Future<Output = Result<String, GenError>> + Send + '_>> {
            let response = if prompt.contains("Classifica questa domanda") {
                self.classification
            } else if prompt.contains("Identifica il nome della città") {
                self.extraction
            } else {
                "istruzioni generate"
            }
            .to_owned();
            self.prompts.lock().unwrap().push(prompt);
            Box::pin(async move { Ok(response) })
        }
    }

    struct FailingProvider;

    impl Provider for FailingProvider {
        fn generate(
            &self,
            _prompt: String,
        ) -> Pin<Box<dyn Future<Output = Result<String, GenError>> + Send + '_>> {
            Box::pin(async { Err(GenError::Network("connection refused".into())) })
        }
    }

    /// Panics when called: for turns that must never reach the geocoder.
    struct UnreachableGeocoder;

    impl Geocoder for UnreachableGeocoder {
        fn geocode(
            &self,
            query: String,
        ) -> Pin<Box<dyn Future<Output = Result<Coordinates, GeocodeError>> + Send + '_>>
        {
            Box::pin(async move { panic!("geocoder called with {query:?}") })
        }
    }

    struct FixedGeocoder(f64, f64);

    impl Geocoder for FixedGeocoder {
        fn geocode(
            &self,
            query: String,
        ) -> Pin<Box<dyn Future<Output = Result<Coordinates, GeocodeError>> + Send + '_>>
        {
            let lat = self.0;
            let lon = self.1;
            Box::pin(async move { Coordinates::new(lat, lon, query) })
        }
    }

    struct NotFoundGeocoder;

    impl Geocoder for NotFoundGeocoder {
        fn geocode(
            &self,
            _query: String,
        ) -> Pin<Box<dyn Future<Output = Result<Coordinates, GeocodeError>> + Send + '_>>
        {
            Box::pin(async { Err(GeocodeError::NotFound) })
        }
    }

    fn rome_points() -> Vec<CollectionPoint> {
        vec![
            CollectionPoint {
                name: "Piazza Roma".to_owned(),
                address: "Piazza Roma 1".to_owned(),
                notes: "Area aperta".to_owned(),
                lat: 41.9,
                lon: 12.5,
            },
            CollectionPoint {
                name: "Parco Nord".to_owned(),
                address: "Via del Parco 5".to_owned(),
                notes: "Vicino alla scuola".to_owned(),
                lat: 42.0,
                lon: 12.6,
            },
        ]
    }

    #[test]
    fn medical_query_uses_first_aid_template() {
        let llm = Scripted::new("emergency_medical", "");
        let prompts = Arc::clone(&llm.prompts);
        let assistant = Assistant::new(llm, UnreachableGeocoder, rome_points());

        let answer = block_on(assistant.answer("mi sono tagliato un dito"));
        assert_eq!(answer, "istruzioni generate");

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].starts_with("Fornisci istruzioni di primo soccorso"));
        assert!(prompts[1].contains("mi sono tagliato un dito"));
    }

    #[test]
    fn general_query_passes_raw_text() {
        let llm = Scripted::new("general", "");
        let prompts = Arc::clone(&llm.prompts);
        let assistant = Assistant::new(llm, UnreachableGeocoder, rome_points());

        block_on(assistant.answer("cosa devo tenere in casa?"));

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts[1], "cosa devo tenere in casa?");
    }

    #[test]
    fn sentinel_skips_the_geocoder() {
        let llm = Scripted::new("location_query", "Località non specificata");
        let assistant = Assistant::new(llm, UnreachableGeocoder, rome_points());

        let answer = block_on(assistant.answer("dove devo andare?"));
        assert_eq!(answer, MSG_NO_LOCATION);
    }

    #[test]
    fn location_query_answers_with_nearest_point() {
        let llm = Scripted::new("location_query", "Piazza Roma");
        let assistant = Assistant::new(llm, FixedGeocoder(41.91, 12.51), rome_points());

        let answer = block_on(assistant.answer("dov'è il punto di raccolta più vicino?"));
        assert!(answer.contains("Piazza Roma"));
        assert!(answer.contains("km di distanza"));
        assert!(answer.contains("Indirizzo: Piazza Roma 1"));
    }

    #[test]
    fn unresolvable_address_yields_no_location_message() {
        let llm = Scripted::new("location_query", "Xyzzy");
        let assistant = Assistant::new(llm, NotFoundGeocoder, rome_points());

        let answer = block_on(assistant.answer("punto di raccolta a Xyzzy"));
        assert_eq!(answer, MSG_NO_LOCATION);
    }

    #[test]
    fn empty_dataset_yields_no_points_message() {
        let llm = Scripted::new("location_query", "Roma");
        let assistant = Assistant::new(llm, FixedGeocoder(41.9, 12.5), Vec::new());

        let answer = block_on(assistant.answer("punto di raccolta a Roma"));
        assert_eq!(answer, MSG_NO_POINTS);
    }

    #[test]
    fn unknown_category_asks_to_rephrase_without_generating() {
        let llm = Scripted::new("boh", "");
        let prompts = Arc::clone(&llm.prompts);
        let assistant = Assistant::new(llm, UnreachableGeocoder, rome_points());

        let answer = block_on(assistant.answer("???"));
        assert_eq!(answer, MSG_REPHRASE);
        // Only the classification prompt was issued.
        assert_eq!(prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn gateway_failure_yields_service_message() {
        let assistant = Assistant::new(FailingProvider, UnreachableGeocoder, rome_points());

        let answer = block_on(assistant.answer("aiuto"));
        assert_eq!(answer, MSG_SERVICE_DOWN);
    }
}
