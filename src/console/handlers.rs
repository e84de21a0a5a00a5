//! Console command handlers

use tracing::{error, info};

use super::{
    commands::{help_text, Command},
    responses::ConsoleResponse,
};
use crate::{
    error::TimerError,
    state::{AppState, Device},
};

/// Handle `press <kind> <id>`
pub fn press_handler(state: &AppState, device: Device) -> ConsoleResponse {
    match state.press(device) {
        Ok(snapshot) => {
            info!("Press on {} handled, now {}", device, snapshot.status.as_str());
            let at = snapshot.taken_at;
            ConsoleResponse::ok(
                format!("{}: {}", snapshot.name, snapshot.status_text()),
                vec![snapshot],
                Some(at),
            )
        }
        Err(e) => timer_error(state, device, e),
    }
}

/// Handle `status`, for one device or the whole room
pub fn status_handler(state: &AppState, device: Option<Device>) -> ConsoleResponse {
    match device {
        Some(device) => match state.current_state(device) {
            Ok(snapshot) => {
                let at = snapshot.taken_at;
                ConsoleResponse::ok(
                    format!("{}: {}", snapshot.name, snapshot.status_text()),
                    vec![snapshot],
                    Some(at),
                )
            }
            Err(e) => timer_error(state, device, e),
        },
        None => match state.snapshot() {
            Ok(room) => {
                let running = room.running().count();
                ConsoleResponse::ok(
                    format!("{} of {} devices running", running, room.devices.len()),
                    room.devices,
                    room.taken_at,
                )
                .with_uptime(state.get_uptime())
            }
            Err(e) => {
                error!("Failed to read room state: {}", e);
                ConsoleResponse::error(e.to_string(), None)
            }
        },
    }
}

/// Dispatch a parsed command; `None` asks the console to stop
pub fn handle_command(state: &AppState, command: Command) -> Option<ConsoleResponse> {
    match command {
        Command::Press(device) => Some(press_handler(state, device)),
        Command::Status(device) => Some(status_handler(state, device)),
        Command::Help => Some(ConsoleResponse::ok(
            help_text(),
            Vec::new(),
            state.clock_now().ok(),
        )),
        Command::Quit => None,
    }
}

fn timer_error(state: &AppState, device: Device, e: TimerError) -> ConsoleResponse {
    let at = match &e {
        TimerError::InvalidDevice(_) => {
            info!("Rejected command for {}: {}", device, e);
            state.clock_now().ok()
        }
        TimerError::Clock(_) => {
            error!("Clock failure handling {}: {}", device, e);
            None
        }
    };
    ConsoleResponse::error(e.to_string(), at)
}
