mod classify;
mod config;
mod dataset;
mod dispatch;
mod distance;
mod geocoding;
mod llm;
mod prompts;

use std::path::Path;

use futures_lite::StreamExt;
use is_terminal::IsTerminal;
use macro_rules_attribute::apply;
use smol_macros::main;

use crate::dispatch::Assistant;

#[apply(main!)]
async fn main() {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,isahc=error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = config::Settings::from_env();

    let points = match dataset::load(Path::new(&settings.dataset_path)) {
        Ok(points) => points,
        Err(e) => {
            tracing::error!(%e, path = %settings.dataset_path, "failed to load dataset");
            std::process::exit(1);
        }
    };
    if points.is_empty() {
        tracing::warn!("dataset has no collection points, location queries will find nothing");
    }
    tracing::info!(points = points.len(), "dataset loaded");

    let llm = match llm::ollama::Backend::new(&settings.ollama_url, &settings.model, prompts::PREAMBLE)
    {
        Ok(llm) => llm,
        Err(e) => {
            tracing::error!(%e, "failed to set up generation client");
            std::process::exit(1);
        }
    };
    let geocoder = match geocoding::nominatim::Backend::new() {
        Ok(geocoder) => geocoder,
        Err(e) => {
            tracing::error!(%e, "failed to set up geocoding client");
            std::process::exit(1);
        }
    };

    let assistant = Assistant::new(llm, geocoder, points);

    if std::io::stdout().is_terminal() {
        println!("HelpMeNow - assistente di emergenza");
        println!("Scrivi una domanda su emergenze mediche, naturali o punti di raccolta.");
    }

    use futures_lite::io::AsyncBufReadExt;

    let stdin = blocking::Unblock::new(std::io::stdin());
    let reader = futures_lite::io::BufReader::new(stdin);
    let mut lines = reader.lines();

    while let Some(line) = lines.next().await {
        let Ok(line) = line else { break };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        let answer = assistant.answer(query).await;
        println!("Bot: {answer}");
    }
}
