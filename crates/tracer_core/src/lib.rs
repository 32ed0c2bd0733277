//! Core of the gyro-driven sphere ray tracer.
//!
//! This crate holds everything that does not need a GPU: the camera and the
//! lock that guards it across the sensor and render contexts, the sphere
//! scene generator, the byte layouts shared with the WGSL kernels, and the
//! per-frame orchestration that drives a [`frame::FrameBackend`].

pub mod camera;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod math;
pub mod scene;
pub mod sensor;

pub use camera::{Camera, SharedCamera};
pub use error::{GridError, SceneError, SensorError};
pub use frame::{FrameBackend, FrameOrchestrator, FrameOutcome, FrameStats, TileGrid};
pub use scene::{Sphere, SceneParams};
pub use sensor::{GyroBridge, NoSensor, RotationRateSource, SensorPolicy, SyntheticGyro};
