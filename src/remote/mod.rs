//! External-consumer plumbing
//!
//! The message contract with the motion-sensing application: a closed
//! inbound message set, a channel-buffered sensor link, and the rate-limited
//! telemetry publisher. The socket itself is a collaborator outside the
//! crate.

pub mod messages;
pub mod publisher;
pub mod transport;

pub use messages::{BallView, InboundMessage, OutboundMessage, WristView, WristsView};
pub use publisher::{TelemetryPublisher, TelemetrySink};
pub use transport::{ReconnectPolicy, SensorHandle, SensorLink};
