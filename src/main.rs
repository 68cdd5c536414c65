use std::{net::TcpListener, sync::Arc};

use anyhow::Context;
use env_logger::Env;
use sleuth::{
    configuration::get_configuration,
    services::{CompletionOptions, GoogleSheetsClient, OpenaiClient, SerpApiClient},
    startup::{run, DashboardConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener =
        TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;

    if configuration.api_keys.openai.is_empty() {
        log::warn!("No OpenAI API key configured, extraction calls will fail");
    }
    if configuration.google.credentials_path.is_none() {
        log::warn!("No Google credentials configured, sheet access will fail");
    }

    let searcher = SerpApiClient::new(&configuration.search);
    let openai_client = OpenaiClient::new(
        configuration.api_keys.openai.clone(),
        CompletionOptions::from(&configuration.completion),
    );
    let sheets = GoogleSheetsClient::new(
        configuration.google.credentials_path.clone(),
        configuration.google.sheets_base_url.clone(),
    );
    let dashboard_config = DashboardConfig::from(&configuration);

    log::info!("Dashboard listening on http://{}/app/dashboard", address);

    run(
        listener,
        Arc::new(searcher),
        Arc::new(openai_client),
        Arc::new(sheets),
        dashboard_config,
    )?
    .await?;

    Ok(())
}
