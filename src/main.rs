use std::time::Duration;

use circula::config::AppConfig;
use circula::models::menu::MenuContext;
use circula::screens::transfers::TransfersSearch;
use circula::services::search_page::SearchPageDriver;
use circula::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "circula=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");
    let timeout = Duration::from_secs(config.api_timeout_secs + 5);
    let session = Session::new(config)?;
    tracing::info!(api_url = %session.config.api_url, "Running transfers search");

    let screen = TransfersSearch::new(session.client.clone());
    let driver = SearchPageDriver::activate(screen, &session, &MenuContext::default());

    let mut results = driver.results();
    let state = tokio::time::timeout(timeout, results.wait_for(|s| s.has_results()))
        .await??
        .clone();

    for row in state.rows() {
        println!("{}", serde_json::to_string(row)?);
    }
    if let Some(pagination) = state.pagination() {
        tracing::info!(
            page = pagination.page,
            first = pagination.first_item(),
            last = pagination.last_item(),
            total = ?pagination.total_count,
            has_next = pagination.has_next,
            "Search complete"
        );
    }

    Ok(())
}
