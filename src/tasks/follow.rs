//! Prints transitions and running projections as they are published

use std::sync::Arc;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::broadcast::error::RecvError,
};
use tracing::{info, warn};

use crate::state::{AppState, DeviceEvent, RoomSnapshot, Transition};

/// Background task writing one line per transition and per running projection
pub async fn follow_task<W>(state: Arc<AppState>, mut out: W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    info!("Starting follow task");

    let mut events = state.subscribe_events();
    let mut snapshots = state.subscribe_snapshots();

    loop {
        let lines = tokio::select! {
            event = events.recv() => match event {
                Ok(event) => vec![render_event(&event)],
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Follow task missed {} transition(s)", skipped);
                    continue;
                }
                Err(RecvError::Closed) => return Ok(()),
            },
            changed = snapshots.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = snapshots.borrow_and_update().clone();
                render_projections(&snapshot)
            }
        };

        for line in lines {
            out.write_all(line.as_bytes()).await?;
            out.write_all(b"\n").await?;
        }
        out.flush().await?;
    }
}

/// One line per running device, e.g. "Washer 1: 1h 30m left"
pub fn render_projections(snapshot: &RoomSnapshot) -> Vec<String> {
    snapshot
        .running()
        .map(|device| format!("{}: {}", device.name, device.status_text()))
        .collect()
}

pub fn render_event(event: &DeviceEvent) -> String {
    match event.transition {
        Transition::Started { ends_at } => {
            format!("{} started, done at {}", event.device, ends_at.format("%H:%M:%S"))
        }
        Transition::Cancelled => format!("{} stopped", event.device),
        Transition::Finished => format!("{} finished", event.device),
        Transition::Reset => format!("{} available", event.device),
    }
}
