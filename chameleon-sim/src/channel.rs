//! Console push channel

use chameleon_core::traits::PushChannel;
use log::info;

/// Prints every broadcast frame, pretending `clients` browsers are attached
pub struct ConsoleChannel {
    clients: usize,
    frames: usize,
}

impl ConsoleChannel {
    pub fn new(clients: usize) -> Self {
        Self { clients, frames: 0 }
    }

    /// Number of frames broadcast so far
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl PushChannel for ConsoleChannel {
    fn broadcast(&mut self, text: &str) {
        self.frames += 1;
        info!("ws -> {}", text);
    }

    fn client_count(&self) -> usize {
        self.clients
    }
}
