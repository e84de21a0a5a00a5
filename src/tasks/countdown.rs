//! Countdown scheduler background task

use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Background task that ticks every registered device at the configured cadence
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task, tick every {:?}", state.tick_interval());

    let mut interval = interval(state.tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match state.tick() {
            Ok(finished) if !finished.is_empty() => {
                debug!("Tick finished {} device(s)", finished.len());
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Skipping tick: {}", e);
            }
        }
    }
}
