//! Push channel trait (WebSocket or similar fan-out)

/// Push channel the scheduler publishes snapshots to
pub trait PushChannel {
    /// Send a text frame to every connected client
    fn broadcast(&mut self, text: &str);

    /// Number of currently connected clients
    fn client_count(&self) -> usize;
}
