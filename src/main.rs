use anyhow::Result;
use chrono::{Duration, Utc};
use log::info;
use std::time::Duration as StdDuration;

use freshwatch::sim::{SimulatedAlertSource, SimulatedSampleSource, SimulatedSessionSource};
use freshwatch::{
    AlertAggregator, ClassifierConfig, EnvironmentController, KitchenController, MonitorConfig,
    SessionClock,
};

/// Demo wiring: all three loops against simulated backends, printing
/// snapshots until interrupted.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("freshwatch starting up...");

    let classifiers = ClassifierConfig::default();
    let monitor_config = MonitorConfig {
        // Faster cadences than production so the demo shows movement.
        clock_interval: StdDuration::from_secs(10),
        alert_poll_interval: StdDuration::from_secs(10),
        sample_poll_interval: StdDuration::from_secs(2),
        ..MonitorConfig::default()
    };

    let aggregator = AlertAggregator::new(
        SimulatedAlertSource::new(),
        classifiers.alerts.clone(),
        monitor_config.alert_poll_interval,
    );
    let kitchen = KitchenController::new(SimulatedSessionSource::default(), &monitor_config);
    let environment = EnvironmentController::new(
        SimulatedSampleSource::new(monitor_config.sample_window),
        &classifiers,
        &monitor_config,
    );
    let mut clock = SessionClock::new(monitor_config.clock_interval);

    kitchen.refresh().await?;
    let session = kitchen
        .start_cooking(
            "Nasi Goreng Spesial",
            40,
            Utc::now() + Duration::hours(6),
            "Jangan tutup wadah saat panas",
        )
        .await?;
    info!("monitoring cooking session {}", session.id);

    kitchen.spawn_monitor(&clock).await;
    clock.start();
    aggregator.start_polling().await;
    environment.start_monitoring().await;

    let mut reports = kitchen.reports();
    let mut status = tokio::time::interval(StdDuration::from_secs(5));
    loop {
        tokio::select! {
            _ = status.tick() => {
                for report in reports.borrow_and_update().iter() {
                    info!(
                        "{}: {} ({:?})",
                        report.menu_name, report.time_left, report.freshness
                    );
                }
                info!(
                    "alerts: {} unread, rescue menu {}",
                    aggregator.current_count().await,
                    if aggregator.rescue_menu().await.is_some() { "available" } else { "none" },
                );
                if let Some(sample) = environment.latest().await {
                    info!(
                        "cold storage: {:.1}C / {:.1}% (excursion: {})",
                        sample.temperature,
                        sample.humidity,
                        environment.is_excursion().await,
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    environment.stop_monitoring().await?;
    aggregator.stop_polling().await?;
    kitchen.stop_monitor().await?;
    clock.stop().await?;
    Ok(())
}
