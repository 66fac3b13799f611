use std::env;

/// Runtime settings, read from the environment with local defaults.
pub struct Settings {
    pub ollama_url: String,
    pub model: String,
    pub dataset_path: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            ollama_url: env::var("HELPMENOW_OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_owned()),
            model: env::var("HELPMENOW_MODEL").unwrap_or_else(|_| "llama3.1:latest".to_owned()),
            dataset_path: env::var("HELPMENOW_DATASET")
                .unwrap_or_else(|_| "rome_emergency_dataset.json".to_owned()),
        }
    }
}
