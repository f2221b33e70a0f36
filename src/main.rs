//! Task Purge monitor binary
//!
//! Wiring:
//! - Settings from config files + environment (secrets via env only)
//! - monday.com client → board directory → aggregator (watch-everything
//!   or single-board, depending on settings)
//! - Console announcer as the utterance player for headless runs
//! - Monitor events rendered as log lines until ctrl-c

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use monday::{BoardDirectory, MondayClient};
use taskpurge_monitor::config::Settings;
use taskpurge_monitor::services::aggregator::{SingleBoardSource, TaskAggregator, TaskSource};
use taskpurge_monitor::services::generator::ReminderGenerator;
use taskpurge_monitor::services::monitor::{MonitorEvent, TaskMonitor};
use taskpurge_monitor::services::notifier::Notifier;
use taskpurge_monitor::services::speech::ConsoleAnnouncer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new().context("failed to load settings")?;

    let client = MondayClient::with_base_url(&settings.monday.api_token, &settings.monday.base_url)?;
    let directory = BoardDirectory::new(client);
    let aggregator = TaskAggregator::new(directory);

    let source: Arc<dyn TaskSource> = match &settings.watch.board_id {
        Some(board_id) => {
            tracing::info!("watching single board {}", board_id);
            Arc::new(SingleBoardSource::new(aggregator, board_id.clone()))
        }
        None => {
            tracing::info!("watching all visible boards");
            Arc::new(aggregator)
        }
    };

    let generator = settings.claude.as_ref().and_then(ReminderGenerator::new);
    let notifier = Notifier::new(
        Arc::new(ConsoleAnnouncer),
        generator,
        Duration::from_millis(settings.monitor.utterance_pause_ms),
    );

    let monitor = TaskMonitor::new(settings, source, notifier);

    let mut events = monitor.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(MonitorEvent::TasksRefreshed { tasks }) => {
                    if tasks.is_empty() {
                        tracing::info!("未完了の緊急・高優先度タスクはありません");
                    }
                    for task in &tasks {
                        tracing::info!(
                            "[{}] {} (期限: {})",
                            task.priority.label(),
                            task.name,
                            if task.overdue { "超過" } else { "今日" }
                        );
                    }
                }
                Ok(MonitorEvent::CycleFailed { message }) => {
                    tracing::error!("{}", message);
                }
                Ok(MonitorEvent::Countdown(view)) => {
                    tracing::debug!("次回チェック: {}", view.render());
                }
                Ok(MonitorEvent::CycleCompleted { .. }) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("event stream lagged, {} event(s) dropped", skipped);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    monitor.start().await?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    monitor.stop().await;

    Ok(())
}
