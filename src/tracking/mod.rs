//! Dual-source wrist tracking pipeline
//!
//! Raw wrist positions arrive either from the local pose estimator or from
//! the external sensor app. Both paths run through the same smoother into a
//! single [`TrackingSnapshot`], so gameplay never cares where a position came
//! from.

pub mod arbiter;
pub mod gesture;
pub mod smoother;

pub use arbiter::{
    ArbiterStatus, Keypoint, KeypointKind, SourceArbiter, TrackedPoint, TrackingSnapshot,
    TrackingSource, WristSide,
};
pub use gesture::GestureDetector;
pub use smoother::{PositionHistory, Smoother};
