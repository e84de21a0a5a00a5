//! Laundry Timer - countdown state for shared washers and dryers
//!
//! This is the main entry point for the laundry-timer application.

use std::sync::Arc;
use tokio::io::{stdin, stdout, BufReader};
use tracing::info;

use laundry_timer::{
    clock::SystemClock,
    config::Config,
    console::run_console,
    state::AppState,
    tasks::{countdown_task, follow_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout carries only console replies
    tracing_subscriber::fmt()
        .with_env_filter(format!("laundry_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting laundry-timer v1.0.0");
    let timers = config.timer_config()?;
    info!("Configuration: washer={}min, dryer={}min, tick={}ms, washers={}, dryers={}",
          config.washer_minutes, config.dryer_minutes, config.tick_ms,
          config.washers, config.dryers);

    // Create application state
    let state = Arc::new(AppState::new(timers, config.devices(), Arc::new(SystemClock::new())));

    // Start the countdown scheduler
    let countdown_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(countdown_state).await;
    });

    if config.follow {
        let follow_state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = follow_task(follow_state, stdout()).await {
                tracing::error!("Follow output failed: {}", e);
            }
        });
    }

    let console = run_console(Arc::clone(&state), BufReader::new(stdin()), stdout());

    tokio::select! {
        result = console => {
            if let Err(e) = result {
                tracing::error!("Console error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Shutdown complete");
    Ok(())
}
