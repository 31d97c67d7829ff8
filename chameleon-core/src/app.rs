//! Application context
//!
//! Owns the board, the blob store and both device managers. The firmware
//! builds one `App` at boot, calls [`App::load_config`], then drives
//! [`App::tick`] from its main loop. Request handlers borrow it mutably,
//! so a reconfiguration can never interleave with a poll or a render.

use alloc::string::String;
use alloc::vec::Vec;

use chameleon_hal::storage::BlobStore;
use chameleon_hal::AnalogPin;
use log::{info, warn};

use crate::config::document::normalize_json;
use crate::config::{ConfigError, ConfigModel, SystemConfig, CONFIG_PATH};
use crate::display::DisplayManager;
use crate::files::AdcProbe;
use crate::scheduler::Scheduler;
use crate::sensor::SensorManager;
use crate::storage::{read_blob, write_blob};
use crate::traits::{Board, PushChannel};

/// What [`App::load_config`] found in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadOutcome {
    /// Document parsed and applied
    Loaded,
    /// No document stored; rescue settings applied
    Missing,
    /// Document unreadable; rescue settings applied
    Malformed,
}

/// Node application context
pub struct App<B: Board, S: BlobStore> {
    board: B,
    store: S,
    system: SystemConfig,
    sensors: SensorManager<B>,
    displays: DisplayManager<B>,
    scheduler: Scheduler,
}

impl<B: Board, S: BlobStore> App<B, S> {
    /// Create a context with no devices and rescue settings
    pub fn new(board: B, store: S) -> Self {
        Self {
            board,
            store,
            system: SystemConfig::rescue(),
            sensors: SensorManager::new(),
            displays: DisplayManager::new(),
            scheduler: Scheduler::new(),
        }
    }

    /// Load `/config.json` and rebuild every device
    ///
    /// A missing or malformed document leaves the node in rescue mode:
    /// rescue hostname, no credentials, no devices.
    pub fn load_config(&mut self) -> LoadOutcome {
        let (model, outcome) = match read_blob(&mut self.store, CONFIG_PATH) {
            Ok(Some(bytes)) => match ConfigModel::from_json(&bytes) {
                Ok(model) => (model, LoadOutcome::Loaded),
                Err(e) => {
                    warn!("{} unusable ({}), starting in rescue mode", CONFIG_PATH, e);
                    (ConfigModel::rescue(), LoadOutcome::Malformed)
                }
            },
            Ok(None) => {
                warn!("{} not found, starting in rescue mode", CONFIG_PATH);
                (ConfigModel::rescue(), LoadOutcome::Missing)
            }
            Err(e) => {
                warn!("{} unreadable ({}), starting in rescue mode", CONFIG_PATH, e);
                (ConfigModel::rescue(), LoadOutcome::Malformed)
            }
        };

        self.apply(model);
        outcome
    }

    /// Replace the running configuration
    ///
    /// Displays come up first so the boot banner is visible while sensors
    /// are being claimed.
    pub fn apply(&mut self, model: ConfigModel) {
        info!(
            "Applying config: hostname={}, {} display(s), {} sensor(s)",
            model.system.hostname.as_str(),
            model.displays.len(),
            model.sensors.len()
        );

        self.system = model.system;
        self.displays.init(&model.displays, &mut self.board);
        self.sensors.init(&model.sensors, &mut self.board);

        let skipped = self.sensors.unsupported_count();
        if skipped > 0 {
            warn!("{} sensor(s) with unsupported drivers", skipped);
        }
    }

    /// Persist a document received from the web UI
    ///
    /// Only JSON syntax is checked; the document takes effect on the next
    /// [`App::load_config`], normally after a restart.
    pub fn save_config(&mut self, bytes: &[u8]) -> Result<(), ConfigError> {
        let normalized = normalize_json(bytes)?;
        write_blob(&mut self.store, CONFIG_PATH, &normalized)?;
        info!("Saved {} ({} bytes)", CONFIG_PATH, normalized.len());
        Ok(())
    }

    /// Stored document as served to the web UI's config editor
    pub fn config_document(&mut self) -> Option<Vec<u8>> {
        match read_blob(&mut self.store, CONFIG_PATH) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("{} unreadable: {}", CONFIG_PATH, e);
                None
            }
        }
    }

    /// Persist a typed configuration
    pub fn save_model(&mut self, model: &ConfigModel) -> Result<(), ConfigError> {
        let bytes = model.to_json()?;
        write_blob(&mut self.store, CONFIG_PATH, &bytes)?;
        Ok(())
    }

    /// Sample the raw ADC count on `pin`
    pub fn test_adc(&mut self, pin: u8) -> AdcProbe {
        let mut input = self.board.input_pin(pin);
        AdcProbe {
            value: input.read_raw(),
        }
    }

    /// One main-loop iteration; see [`Scheduler::tick`]
    pub fn tick<C: PushChannel>(&mut self, now_ms: u32, channel: &mut C) -> bool {
        self.scheduler.tick(now_ms, &mut self.sensors, channel)
    }

    /// Snapshot JSON for a newly connected client
    pub fn on_client_connect(&self) -> String {
        self.scheduler.on_client_connect(&self.sensors)
    }

    /// Show `text` on every active display
    pub fn print_message(&mut self, text: &str) {
        self.displays.print_message(text);
    }

    /// Network settings from the last applied config
    pub fn system(&self) -> &SystemConfig {
        &self.system
    }

    /// Hostname to announce
    pub fn hostname(&self) -> &str {
        self.system.hostname.as_str()
    }

    /// Active sensors
    pub fn sensors(&self) -> &SensorManager<B> {
        &self.sensors
    }

    /// Active displays
    pub fn displays(&self) -> &DisplayManager<B> {
        &self.displays
    }

    /// Blob store, for the file-manager endpoints
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Board, for board-specific services
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RESCUE_HOSTNAME;
    use crate::display::BOOT_BANNER;
    use crate::storage::MemoryStore;
    use crate::testing::MockBoard;
    use alloc::vec;

    const CONFIG: &[u8] = br#"{
        "system": {"wifi_ssid":"lab","wifi_pass":"secret","hostname":"bench"},
        "displays": [{"driver":"SSD1306","pins":{"sda":21,"scl":22}}],
        "sensors": [{"driver":"DHT","pin":4,"interval_ms":500},{"driver":"XYZ","pin":9}]
    }"#;

    fn app_with(config: Option<&[u8]>) -> (App<MockBoard, MemoryStore>, MockBoard) {
        let board = MockBoard::new();
        let mut store = MemoryStore::new();
        if let Some(bytes) = config {
            store.insert(CONFIG_PATH, bytes);
        }
        (App::new(board.clone(), store), board)
    }

    #[test]
    fn test_load_applies_config() {
        let (mut app, board) = app_with(Some(CONFIG));
        assert_eq!(app.load_config(), LoadOutcome::Loaded);
        assert_eq!(app.hostname(), "bench");
        assert!(app.system().has_credentials());
        assert_eq!(app.sensors().len(), 2);
        assert_eq!(app.sensors().unsupported_count(), 1);
        assert_eq!(app.displays().active_count(), 1);
        assert_eq!(board.frames(0), vec![String::from(BOOT_BANNER)]);
    }

    #[test]
    fn test_missing_config_is_rescue() {
        let (mut app, _) = app_with(None);
        assert_eq!(app.load_config(), LoadOutcome::Missing);
        assert_eq!(app.hostname(), RESCUE_HOSTNAME);
        assert!(app.sensors().is_empty());
        assert_eq!(app.displays().active_count(), 0);
    }

    #[test]
    fn test_malformed_config_is_rescue() {
        let (mut app, _) = app_with(Some(b"{\"sensors\":[{"));
        assert_eq!(app.load_config(), LoadOutcome::Malformed);
        assert_eq!(app.hostname(), RESCUE_HOSTNAME);
        assert!(app.sensors().is_empty());
    }

    #[test]
    fn test_save_config_rejects_invalid_json() {
        let (mut app, _) = app_with(Some(CONFIG));
        assert_eq!(app.save_config(b"{oops"), Err(ConfigError::InvalidJson));
        assert_eq!(app.store_mut().get(CONFIG_PATH), Some(CONFIG));
    }

    #[test]
    fn test_save_config_compacts() {
        let (mut app, _) = app_with(None);
        app.save_config(b"{ \"sensors\" : [ ] }").unwrap();
        assert_eq!(app.store_mut().get(CONFIG_PATH), Some(&b"{\"sensors\":[]}"[..]));
        assert_eq!(app.load_config(), LoadOutcome::Loaded);
    }

    #[test]
    fn test_reload_replaces_devices() {
        let (mut app, board) = app_with(Some(CONFIG));
        app.load_config();
        assert_eq!(board.live_handles(), 2);

        app.save_config(br#"{"sensors":[{"driver":"DIGITAL","pin":5}]}"#)
            .unwrap();
        app.load_config();
        assert_eq!(app.sensors().len(), 1);
        assert_eq!(app.displays().active_count(), 0);
        assert_eq!(board.live_handles(), 1);
    }

    #[test]
    fn test_config_document() {
        let (mut app, _) = app_with(None);
        assert_eq!(app.config_document(), None);
        app.save_config(b"{}").unwrap();
        assert_eq!(app.config_document().as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_adc_hook() {
        let (mut app, board) = app_with(None);
        board.set_adc(36, 3071);
        assert_eq!(app.test_adc(36), AdcProbe { value: 3071 });
        assert_eq!(board.live_handles(), 0);
    }
}
