//! Scheduler loop
//!
//! Driven from the firmware's main loop with a monotonic millisecond
//! clock. Every tick polls the sensors; about once a second the cached
//! snapshot is pushed to connected clients.

use alloc::string::String;

use crate::sensor::SensorManager;
use crate::traits::{PushChannel, SensorBoard};

/// Minimum time between two snapshot publications
pub const PUBLISH_INTERVAL_MS: u32 = 1000;

/// Polling and publication cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scheduler {
    last_publish_ms: u32,
}

impl Scheduler {
    /// Create a scheduler that has never published
    pub const fn new() -> Self {
        Self { last_publish_ms: 0 }
    }

    /// Run one iteration of the loop
    ///
    /// Returns `true` if a snapshot was broadcast. The publication slot is
    /// consumed even when no client is connected, so a client attaching
    /// just after an empty slot waits for the next one.
    pub fn tick<B, C>(
        &mut self,
        now_ms: u32,
        sensors: &mut SensorManager<B>,
        channel: &mut C,
    ) -> bool
    where
        B: SensorBoard,
        C: PushChannel,
    {
        sensors.poll(now_ms);

        if now_ms.wrapping_sub(self.last_publish_ms) <= PUBLISH_INTERVAL_MS {
            return false;
        }
        self.last_publish_ms = now_ms;

        if channel.client_count() == 0 {
            return false;
        }
        channel.broadcast(&sensors.snapshot().to_json());
        true
    }

    /// Message to send a client as soon as it connects
    pub fn on_client_connect<B: SensorBoard>(&self, sensors: &SensorManager<B>) -> String {
        sensors.snapshot().to_json()
    }

    /// Time of the last publication slot
    pub fn last_publish_ms(&self) -> u32 {
        self.last_publish_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SensorDriver, SensorSpec};
    use crate::testing::{MockBoard, MockChannel};

    fn manager_with_light(board: &mut MockBoard) -> SensorManager<MockBoard> {
        board.set_adc(34, 512);
        let mut sensors = SensorManager::new();
        sensors.init(
            &[SensorSpec::new(SensorDriver::AnalogLight, 34).with_interval(100)],
            board,
        );
        sensors
    }

    #[test]
    fn test_publish_strictly_after_interval() {
        let mut board = MockBoard::new();
        let mut sensors = manager_with_light(&mut board);
        let mut channel = MockChannel::with_clients(1);
        let mut scheduler = Scheduler::new();

        assert!(!scheduler.tick(1000, &mut sensors, &mut channel));
        assert!(scheduler.tick(1001, &mut sensors, &mut channel));
        assert_eq!(channel.sent.len(), 1);
        assert_eq!(channel.sent[0], r#"[{"id":0,"val":512.0}]"#);

        assert!(!scheduler.tick(2001, &mut sensors, &mut channel));
        assert!(scheduler.tick(2002, &mut sensors, &mut channel));
        assert_eq!(channel.sent.len(), 2);
    }

    #[test]
    fn test_no_broadcast_without_clients() {
        let mut board = MockBoard::new();
        let mut sensors = manager_with_light(&mut board);
        let mut channel = MockChannel::with_clients(0);
        let mut scheduler = Scheduler::new();

        assert!(!scheduler.tick(1500, &mut sensors, &mut channel));
        assert!(channel.sent.is_empty());
        assert_eq!(scheduler.last_publish_ms(), 1500);

        // Slot was consumed; a client attaching now waits for the next one
        channel.clients = 1;
        assert!(!scheduler.tick(2000, &mut sensors, &mut channel));
        assert!(scheduler.tick(2501, &mut sensors, &mut channel));
    }

    #[test]
    fn test_every_tick_polls() {
        let mut board = MockBoard::new();
        let mut sensors = manager_with_light(&mut board);
        let mut channel = MockChannel::default();
        let mut scheduler = Scheduler::new();

        scheduler.tick(100, &mut sensors, &mut channel);
        assert_eq!(sensors.get(0).map(|s| s.last_read_ms()), Some(100));
        scheduler.tick(250, &mut sensors, &mut channel);
        assert_eq!(sensors.get(0).map(|s| s.last_read_ms()), Some(250));
    }

    #[test]
    fn test_on_client_connect_sends_snapshot() {
        let mut board = MockBoard::new();
        let mut sensors = manager_with_light(&mut board);
        let scheduler = Scheduler::new();

        assert_eq!(scheduler.on_client_connect(&sensors), r#"[{"id":0,"val":0.0}]"#);
        sensors.poll(100);
        assert_eq!(scheduler.on_client_connect(&sensors), r#"[{"id":0,"val":512.0}]"#);
    }
}
