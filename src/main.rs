/// Application entry point: one refresh, logged as a summary
use quake_dashboard::clients::UsgsClient;
use quake_dashboard::config::AppConfig;
use quake_dashboard::domain::FilterConfig;
use quake_dashboard::normalizer::Normalizer;
use quake_dashboard::services::{DashboardService, FetchOrchestrator, RefreshOutcome};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env();
    info!("Configuration loaded successfully");

    let client = UsgsClient::new(&config.http)?;
    let orchestrator = FetchOrchestrator::new(
        client,
        config.endpoints.clone(),
        Normalizer::new(config.view.display.clone()),
    );
    let service = DashboardService::new(orchestrator, config.view.clone());

    let filters = FilterConfig {
        time_range: config.initial_range,
        ..FilterConfig::default()
    };

    if let RefreshOutcome::Applied(count) = service.refresh(&filters).await? {
        info!("Loaded {} earthquakes for range {}", count, filters.time_range);
    }
    if let Some(fetched_at) = service.fetched_at().await {
        info!("Data as of {}", fetched_at.to_rfc3339());
    }

    let view = service.view(&filters).await;
    let summary = &view.summary;
    info!(
        "Summary - total={}, strong={}, max_magnitude={:.1}, avg_depth={:.0}km, regions={}",
        summary.total,
        summary.strong_count,
        summary.max_magnitude,
        summary.average_depth,
        view.countries.len()
    );

    for bin in &view.magnitude_distribution {
        info!("  {:<16} {}", bin.label, bin.count);
    }
    for entry in &view.top_countries {
        info!("  {:<23} {}", entry.label, entry.count);
    }

    Ok(())
}
