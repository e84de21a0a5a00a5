//! Console module
//!
//! Line-oriented front end: each input line is a command, each reply is
//! one JSON line.

pub mod commands;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::state::AppState;
use commands::Command;
use handlers::handle_command;
use responses::ConsoleResponse;

pub use commands::help_text;

/// Serve commands from `input` until `quit` or end of input
pub async fn run_console<R, W>(state: Arc<AppState>, mut input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Console ready, {}", help_text());

    let mut raw = Vec::new();
    loop {
        raw.clear();
        if input.read_until(b'\n', &mut raw).await? == 0 {
            break;
        }

        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!("Ignoring console line that is not UTF-8: {}", e);
                let response = ConsoleResponse::error(
                    "input is not valid UTF-8".to_string(),
                    state.clock_now().ok(),
                );
                write_response(&mut output, &response).await?;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        debug!("Console command: {}", line);

        let response = match line.parse::<Command>() {
            Ok(command) => match handle_command(&state, command) {
                Some(response) => response,
                None => {
                    info!("Quit requested");
                    break;
                }
            },
            Err(e) => ConsoleResponse::error(e.to_string(), state.clock_now().ok()),
        };

        write_response(&mut output, &response).await?;
    }

    info!("Console closed");
    Ok(())
}

async fn write_response<W>(output: &mut W, response: &ConsoleResponse) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut encoded = serde_json::to_vec(response)?;
    encoded.push(b'\n');
    output.write_all(&encoded).await?;
    output.flush().await?;
    Ok(())
}
