//! Host simulator for Chameleon sensor nodes
//!
//! Boots the node core against simulated hardware, runs the scheduler on
//! a virtual clock and prints what a browser and the OLED would show.
//!
//! ```text
//! chameleon-sim [config.json] [seconds]
//! ```
//!
//! Without a config file a demo document is used. Only the display on
//! SDA 21 is wired; displays on other buses fail to come up, exercising
//! the skip path. Set `RUST_LOG=debug` to see discarded reads.

mod board;
mod channel;

use std::cell::Cell;
use std::rc::Rc;

use chameleon_core::config::CONFIG_PATH;
use chameleon_core::files::listing_json;
use chameleon_core::storage::MemoryStore;
use chameleon_core::App;
use log::{error, info};

use board::SimBoard;
use channel::ConsoleChannel;

/// Main loop period
const TICK_MS: u32 = 50;

/// Default simulated run time
const DEFAULT_RUN_SECS: u32 = 10;

/// SDA pins with a panel attached
const WIRED_DISPLAYS: &[u8] = &[21];

const DEMO_CONFIG: &str = r#"{
    "system": { "wifi_ssid": "workshop", "wifi_pass": "changeme", "hostname": "chameleon-demo" },
    "displays": [
        { "driver": "SSD1306", "pins": { "sda": 21, "scl": 22 } },
        { "driver": "SSD1306", "pins": { "sda": 16, "scl": 17 } }
    ],
    "sensors": [
        { "name": "Bench", "driver": "DHT", "pin": 4, "interval_ms": 2000 },
        { "name": "Window", "driver": "LDR", "pin": 34, "interval_ms": 500 },
        { "driver": "POT", "pin": 35, "interval_ms": 250 },
        { "name": "Door", "driver": "DIGITAL", "pin": 27, "interval_ms": 100 },
        { "driver": "BMP280", "pin": 5 }
    ]
}"#;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Cannot read {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => DEMO_CONFIG.as_bytes().to_vec(),
    };
    let run_secs = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_RUN_SECS);

    let clock = Rc::new(Cell::new(0u32));
    let board = SimBoard::new(clock.clone(), WIRED_DISPLAYS);

    let mut store = MemoryStore::new();
    store.insert(CONFIG_PATH, &config);

    let mut app = App::new(board, store);
    let outcome = app.load_config();
    info!(
        "Boot: {:?}, hostname={}, {} sensor(s), {} display(s)",
        outcome,
        app.hostname(),
        app.sensors().len(),
        app.displays().active_count()
    );
    if !app.system().has_credentials() {
        info!("No WiFi credentials, would start access point '{}'", app.hostname());
    }

    let mut channel = ConsoleChannel::new(1);
    info!("ws connect -> {}", app.on_client_connect());

    let end_ms = run_secs.saturating_mul(1000);
    while clock.get() < end_ms {
        clock.set(clock.get() + TICK_MS);
        app.tick(clock.get(), &mut channel);
    }
    info!("{} frame(s) broadcast in {} s", channel.frames(), run_secs);

    let summary: String = app
        .sensors()
        .iter()
        .map(|s| format!("{}: {:.1}\n", s.name(), s.last_value()))
        .collect();
    app.print_message(&summary);

    for panel in app.board_mut().panels() {
        let panel = panel.borrow();
        println!("SSD1306 sda={} scl={}", panel.pins.sda, panel.pins.scl);
        println!("{}", panel.to_ascii());
    }

    info!("ADC test GPIO36 -> {}", app.test_adc(36).to_json());
    info!("Files: {}", listing_json(app.store_mut()));
}
