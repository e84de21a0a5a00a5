//! Device timer controller

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{
    Device, DeviceEvent, DeviceSnapshot, DeviceTimerState, PressOutcome, RoomSnapshot,
    TickOutcome, Transition,
};
use crate::{
    clock::Clock,
    config::TimerConfig,
    error::{ClockError, TimerError},
    utils::{format_elapsed, format_time_left},
};

/// Owns the state of every device and the tick registrations of running ones
#[derive(Debug)]
pub struct AppState {
    timers: TimerConfig,
    clock: Arc<dyn Clock>,
    room: Mutex<Room>,
    /// Server metadata
    pub start_time: Instant,
    /// Channel for transition notifications
    pub event_tx: broadcast::Sender<DeviceEvent>,
    /// Channel for projection updates
    pub snapshot_tx: watch::Sender<RoomSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<RoomSnapshot>,
}

#[derive(Debug, Default)]
struct Room {
    devices: BTreeMap<Device, DeviceTimerState>,
    /// Devices with an active tick registration; exactly the running ones
    ticking: BTreeSet<Device>,
}

impl Room {
    fn snapshot(&self, now: DateTime<Utc>) -> RoomSnapshot {
        RoomSnapshot {
            taken_at: Some(now),
            devices: self
                .devices
                .iter()
                .map(|(device, state)| DeviceSnapshot::capture(*device, state, now))
                .collect(),
        }
    }
}

impl AppState {
    /// Create a controller for a fixed set of devices, all available
    pub fn new<I>(timers: TimerConfig, devices: I, clock: Arc<dyn Clock>) -> Self
    where
        I: IntoIterator<Item = Device>,
    {
        let room = Room {
            devices: devices
                .into_iter()
                .map(|device| (device, DeviceTimerState::new()))
                .collect(),
            ticking: BTreeSet::new(),
        };
        let (event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(RoomSnapshot::default());

        Self {
            timers,
            clock,
            room: Mutex::new(room),
            start_time: Instant::now(),
            event_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    pub fn timers(&self) -> TimerConfig {
        self.timers
    }

    pub fn tick_interval(&self) -> Duration {
        self.timers.tick()
    }

    /// Every device known to the controller, in stable order
    pub fn devices(&self) -> Vec<Device> {
        self.room().devices.keys().copied().collect()
    }

    /// Apply a press to a device and return its resulting state.
    ///
    /// The tick registration changes inside the same critical section as the
    /// transition, so a cancelled countdown is never observed by a later tick.
    pub fn press(&self, device: Device) -> Result<DeviceSnapshot, TimerError> {
        let mut guard = self.room();
        let room = &mut *guard;
        let Some(state) = room.devices.get_mut(&device) else {
            return Err(TimerError::InvalidDevice(device));
        };
        let now = self.clock.now()?;
        let duration = self.timers.duration(device.kind);

        let transition = match state.press(now, duration) {
            PressOutcome::Started { ends_at } => {
                room.ticking.insert(device);
                info!("{} started, ends at {}", device, ends_at);
                Transition::Started { ends_at }
            }
            PressOutcome::Cancelled => {
                room.ticking.remove(&device);
                info!("{} cancelled", device);
                Transition::Cancelled
            }
            PressOutcome::Reset => {
                room.ticking.remove(&device);
                info!("{} reset to available", device);
                Transition::Reset
            }
        };

        let snapshot = DeviceSnapshot::capture(device, state, now);
        self.notify(DeviceEvent { device, transition, at: now });
        self.publish(room.snapshot(now));

        Ok(snapshot)
    }

    /// Current state of a device, with its projection if running
    pub fn current_state(&self, device: Device) -> Result<DeviceSnapshot, TimerError> {
        let room = self.room();
        let state = room
            .devices
            .get(&device)
            .ok_or(TimerError::InvalidDevice(device))?;
        let now = self.clock.now()?;
        Ok(DeviceSnapshot::capture(device, state, now))
    }

    /// Current state of every device
    pub fn snapshot(&self) -> Result<RoomSnapshot, TimerError> {
        let room = self.room();
        let now = self.clock.now()?;
        Ok(room.snapshot(now))
    }

    /// Evaluate every registered device once.
    ///
    /// Expired devices finish and lose their registration; the rest get a
    /// fresh projection. Returns the devices that finished on this tick. A
    /// clock failure leaves every device untouched.
    pub fn tick(&self) -> Result<Vec<Device>, ClockError> {
        let mut guard = self.room();
        let now = self.clock.now()?;
        let room = &mut *guard;

        let mut finished = Vec::new();
        for device in room.ticking.clone() {
            let outcome = match room.devices.get_mut(&device) {
                Some(state) => state.tick(now),
                None => TickOutcome::Idle,
            };

            match outcome {
                TickOutcome::Remaining(remaining) => {
                    debug!("{}: {}", device, format_time_left(remaining));
                }
                TickOutcome::Expired => {
                    room.ticking.remove(&device);
                    info!("{} finished", device);
                    self.notify(DeviceEvent {
                        device,
                        transition: Transition::Finished,
                        at: now,
                    });
                    finished.push(device);
                }
                TickOutcome::Idle => {
                    warn!("{} was registered for ticks while not running", device);
                    room.ticking.remove(&device);
                }
            }
        }

        self.publish(room.snapshot(now));
        Ok(finished)
    }

    /// Devices currently holding a tick registration
    pub fn tick_registrations(&self) -> Vec<Device> {
        self.room().ticking.iter().copied().collect()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_tx.subscribe()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<RoomSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Time since the controller was created, e.g. "1h 0m 5s"
    pub fn get_uptime(&self) -> String {
        format_elapsed(self.start_time.elapsed())
    }

    /// Read the injected clock
    pub fn clock_now(&self) -> Result<DateTime<Utc>, ClockError> {
        self.clock.now()
    }

    fn room(&self) -> MutexGuard<'_, Room> {
        // Every mutation is a single assignment, so a poisoned room is still consistent.
        self.room.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: DeviceEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("No event subscribers for {}", event.device);
        }
    }

    fn publish(&self, snapshot: RoomSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to publish room snapshot: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::{ManualClock, SystemClock},
        state::DeviceStatus,
    };
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn room() -> (AppState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(t0()));
        let state = AppState::new(
            TimerConfig::default(),
            [Device::washer(1), Device::washer(2), Device::dryer(1), Device::dryer(2)],
            clock.clone(),
        );
        (state, clock)
    }

    fn assert_registrations_match_running(state: &AppState) {
        let snapshot = state.snapshot().unwrap();
        let running: Vec<Device> = snapshot.running().map(|s| s.device).collect();
        assert_eq!(state.tick_registrations(), running);
        for device in &snapshot.devices {
            assert_eq!(
                device.status == DeviceStatus::Running,
                device.end_timestamp.is_some()
            );
        }
    }

    #[test]
    fn unknown_device_is_rejected() {
        let (state, _) = room();
        assert_eq!(
            state.press(Device::washer(3)),
            Err(TimerError::InvalidDevice(Device::washer(3)))
        );
        assert_eq!(
            state.current_state(Device::dryer(9)),
            Err(TimerError::InvalidDevice(Device::dryer(9)))
        );
    }

    #[test]
    fn press_starts_with_kind_duration_and_registers_once() {
        let (state, _) = room();

        let washer = state.press(Device::washer(1)).unwrap();
        assert_eq!(washer.status, DeviceStatus::Running);
        assert_eq!(washer.end_timestamp, Some(t0() + chrono::Duration::minutes(90)));
        assert_eq!(washer.time_left.as_deref(), Some("1h 30m left"));

        let dryer = state.press(Device::dryer(2)).unwrap();
        assert_eq!(dryer.end_timestamp, Some(t0() + chrono::Duration::minutes(120)));
        assert_eq!(dryer.time_left.as_deref(), Some("2h left"));

        assert_eq!(state.tick_registrations(), vec![Device::washer(1), Device::dryer(2)]);
        assert_registrations_match_running(&state);
    }

    #[test]
    fn cancel_unregisters_before_the_next_tick() {
        let (state, clock) = room();
        state.press(Device::dryer(2)).unwrap();
        clock.advance(Duration::from_secs(3));

        let cancelled = state.press(Device::dryer(2)).unwrap();
        assert_eq!(cancelled.status, DeviceStatus::Available);
        assert_eq!(cancelled.end_timestamp, None);
        assert!(state.tick_registrations().is_empty());

        clock.advance(Duration::from_secs(3 * 3600));
        assert_eq!(state.tick().unwrap(), Vec::<Device>::new());
        let current = state.current_state(Device::dryer(2)).unwrap();
        assert_eq!(current.status, DeviceStatus::Available);
        assert_eq!(current.time_left, None);
    }

    #[test]
    fn tick_finishes_expired_devices_only() {
        let (state, clock) = room();
        state.press(Device::washer(1)).unwrap();
        state.press(Device::dryer(1)).unwrap();

        clock.advance(Duration::from_secs(90 * 60));
        assert_eq!(state.tick().unwrap(), vec![Device::washer(1)]);
        assert_eq!(state.tick().unwrap(), Vec::<Device>::new());

        let washer = state.current_state(Device::washer(1)).unwrap();
        assert_eq!(washer.status, DeviceStatus::Finished);
        let dryer = state.current_state(Device::dryer(1)).unwrap();
        assert_eq!(dryer.time_left.as_deref(), Some("30m left"));

        assert_eq!(state.tick_registrations(), vec![Device::dryer(1)]);
        assert_registrations_match_running(&state);
    }

    #[test]
    fn clock_failure_skips_tick_without_touching_state() {
        let (state, clock) = room();
        state.press(Device::washer(2)).unwrap();
        clock.advance(Duration::from_secs(90 * 60 + 5));

        clock.set_available(false);
        assert_eq!(state.tick(), Err(ClockError::Unavailable));
        assert_eq!(
            state.press(Device::washer(2)),
            Err(TimerError::Clock(ClockError::Unavailable))
        );
        assert_eq!(state.tick_registrations(), vec![Device::washer(2)]);

        clock.set_available(true);
        assert_eq!(state.tick().unwrap(), vec![Device::washer(2)]);
    }

    /// Manual readings passed through the system clock's monotonic check
    #[derive(Debug)]
    struct GuardedClock {
        readings: ManualClock,
        guard: SystemClock,
    }

    impl Clock for GuardedClock {
        fn now(&self) -> Result<DateTime<Utc>, ClockError> {
            self.guard.observe(self.readings.now()?)
        }
    }

    #[test]
    fn backwards_clock_skips_tick_and_leaves_devices_unchanged() {
        let clock = Arc::new(GuardedClock {
            readings: ManualClock::new(t0()),
            guard: SystemClock::new(),
        });
        let state = AppState::new(
            TimerConfig::default(),
            [Device::washer(1), Device::dryer(1)],
            clock.clone(),
        );
        state.press(Device::washer(1)).unwrap();
        clock.readings.advance(Duration::from_secs(90 * 60));
        let before = state.snapshot().unwrap();
        let mut events = state.subscribe_events();

        clock.readings.set(t0() - chrono::Duration::minutes(5));
        assert!(matches!(state.tick(), Err(ClockError::WentBackwards { .. })));
        assert!(matches!(
            state.press(Device::dryer(1)),
            Err(TimerError::Clock(ClockError::WentBackwards { .. }))
        ));
        assert!(events.try_recv().is_err());
        assert_eq!(state.tick_registrations(), vec![Device::washer(1)]);

        clock.readings.set(t0() + chrono::Duration::minutes(90));
        assert_eq!(state.snapshot().unwrap().devices, before.devices);
        assert_eq!(state.tick().unwrap(), vec![Device::washer(1)]);
    }

    #[test]
    fn transitions_are_broadcast_in_order() {
        let (state, clock) = room();
        let mut events = state.subscribe_events();

        state.press(Device::washer(1)).unwrap();
        clock.advance(Duration::from_secs(90 * 60));
        state.tick().unwrap();
        state.press(Device::washer(1)).unwrap();

        let transitions: Vec<Transition> = std::iter::from_fn(|| events.try_recv().ok())
            .map(|event| event.transition)
            .collect();
        assert_eq!(
            transitions,
            vec![
                Transition::Started { ends_at: t0() + chrono::Duration::minutes(90) },
                Transition::Finished,
                Transition::Reset,
            ]
        );
    }

    #[test]
    fn ticks_publish_projections() {
        let (state, clock) = room();
        let mut snapshots = state.subscribe_snapshots();
        state.press(Device::washer(1)).unwrap();

        clock.advance(Duration::from_secs(89 * 60 + 15));
        state.tick().unwrap();

        assert!(snapshots.has_changed().unwrap());
        let latest = snapshots.borrow_and_update().clone();
        let washer = latest.get(Device::washer(1)).unwrap();
        assert_eq!(washer.status_text(), "45s left");
        assert_eq!(latest.running().count(), 1);
    }
}
