//! Sensor-link buffering and reconnect accounting
//!
//! The real socket lives outside the crate; this is the message-contract
//! edge. Inbound frames buffer on a channel and drain once per tick, so the
//! single-threaded game loop never blocks on the network.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::messages::InboundMessage;

/// Receiving end held by the engine; drained once per frame.
#[derive(Debug)]
pub struct SensorLink {
    rx: Receiver<InboundMessage>,
}

impl SensorLink {
    /// Create a connected handle/link pair. The handle goes to the socket
    /// reader thread, the link to the engine.
    pub fn channel() -> (SensorHandle, SensorLink) {
        let (tx, rx) = mpsc::channel();
        (SensorHandle { tx }, SensorLink { rx })
    }

    /// Everything that arrived since the last tick, in arrival order.
    /// Later messages override earlier ones when they target the same state,
    /// which gives last-write-wins per tick.
    pub fn drain(&mut self) -> Vec<InboundMessage> {
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(message) => messages.push(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }
}

/// Cloneable feeding end handed to the transport.
#[derive(Debug, Clone)]
pub struct SensorHandle {
    tx: Sender<InboundMessage>,
}

impl SensorHandle {
    /// Decode one raw frame. Malformed input is logged and dropped here, at
    /// the edge; it never reaches the tick loop. Returns `false` when the
    /// frame was dropped or the link is gone.
    pub fn feed_json(&self, raw: &str) -> bool {
        match serde_json::from_str::<InboundMessage>(raw) {
            Ok(message) => self.send(message),
            Err(err) => {
                log::warn!("dropping malformed sensor message: {err}");
                false
            }
        }
    }

    /// Enqueue an already-decoded message. Returns `false` once the engine
    /// side is gone.
    pub fn send(&self, message: InboundMessage) -> bool {
        self.tx.send(message).is_ok()
    }
}

/// Bounded reconnect accounting for the external transport.
///
/// Past the ceiling the transport stops retrying and the game keeps running
/// in whatever tracking mode is still viable.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    attempts: u32,
    max_attempts: u32,
    delay_ms: f64,
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32, delay_ms: f64) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            delay_ms,
        }
    }

    /// Delay before the next attempt, or `None` once the ceiling is reached.
    pub fn next_delay(&mut self) -> Option<f64> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        self.attempts += 1;
        log::info!(
            "sensor reconnect attempt {}/{}",
            self.attempts,
            self.max_attempts
        );
        Some(self.delay_ms)
    }

    /// Call on a successful connect so later drops start a fresh budget.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub fn exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::WristSide;

    #[test]
    fn test_drain_preserves_arrival_order() {
        let (handle, mut link) = SensorLink::channel();
        assert!(handle.send(InboundMessage::Ping));
        assert!(handle.send(InboundMessage::StartGame));

        let messages = link.drain();
        assert_eq!(messages, vec![InboundMessage::Ping, InboundMessage::StartGame]);
        assert!(link.drain().is_empty());
    }

    #[test]
    fn test_feed_json_decodes_and_drops() {
        let (handle, mut link) = SensorLink::channel();
        assert!(handle.feed_json(r#"{"type":"setWrist","wrist":"right","x":1.0,"y":2.0,"active":true}"#));
        assert!(!handle.feed_json("garbage"));
        assert!(!handle.feed_json(r#"{"type":"unknownThing"}"#));

        let messages = link.drain();
        assert_eq!(messages.len(), 1);
        assert!(matches!(
            messages[0],
            InboundMessage::SetWrist {
                wrist: WristSide::Right,
                ..
            }
        ));
    }

    #[test]
    fn test_reconnect_ceiling() {
        let mut policy = ReconnectPolicy::new(3, 500.0);
        assert_eq!(policy.next_delay(), Some(500.0));
        assert_eq!(policy.next_delay(), Some(500.0));
        assert_eq!(policy.next_delay(), Some(500.0));
        assert_eq!(policy.next_delay(), None);
        assert!(policy.exhausted());

        policy.reset();
        assert_eq!(policy.next_delay(), Some(500.0));
    }
}
