pub mod ollama;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Errors from the text-generation gateway.
#[derive(Debug)]
pub enum GenError {
    Api { status: u16, body: String },
    Network(String),
    Parse(String),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api { status, body } => write!(f, "API error ({status}): {body}"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Parse(msg) => write!(f, "response parse error: {msg}"),
        }
    }
}

impl std::error::Error for GenError {}

/// A text-generation provider: one blocking call per composed prompt.
///
/// Implementations own the model identifier and the system preamble; callers
/// only supply the task-specific part of the prompt. The returned text has
/// leading and trailing whitespace stripped.
pub trait Provider: Send + Sync {
    fn generate(
        &self,
        prompt: String,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenError>> + Send + '_>>;
}
