use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use isahc::prelude::*;
use isahc::{HttpClient, Request};

use super::{GenError, Provider};

/// Generation request timeout. Local models can take a while to answer.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Backend for an Ollama-compatible `/api/generate` endpoint.
pub struct Backend {
    client: HttpClient,
    url: String,
    model: String,
    preamble: String,
}

impl Backend {
    /// `preamble` is the fixed system instruction prepended to every prompt.
    pub fn new(base_url: &str, model: &str, preamble: &str) -> Result<Self, GenError> {
        let client = HttpClient::new().map_err(|e| GenError::Network(e.to_string()))?;
        Ok(Self {
            client,
            url: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model: model.to_owned(),
            preamble: preamble.to_owned(),
        })
    }

    async fn request(&self, prompt: String) -> Result<String, GenError> {
        let full_prompt = format!("{}\nDomanda: {prompt}\nRisposta:", self.preamble);
        let body = serde_json::to_vec(&GenerateRequest {
            model: &self.model,
            prompt: &full_prompt,
            stream: false,
        })
        .map_err(|e| GenError::Parse(e.to_string()))?;

        tracing::debug!(model = %self.model, "sending generation request");

        let request = Request::post(&self.url)
            .timeout(TIMEOUT)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| GenError::Network(e.to_string()))?;
        let mut response = self
            .client
            .send_async(request)
            .await
            .map_err(|e| GenError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenError::Network(e.to_string()))?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "generation API error");
            return Err(GenError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| GenError::Parse(format!("generate response: {e}")))?;
        Ok(parsed.response.trim().to_owned())
    }
}

impl Provider for Backend {
    fn generate(
        &self,
        prompt: String,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenError>> + Send + '_>> {
        Box::pin(self.request(prompt))
    }
}

#[derive(serde::Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    response: String,
}
