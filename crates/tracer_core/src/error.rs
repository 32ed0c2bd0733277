use thiserror::Error;

/// Rejected scene generation parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("sphere radius range must be positive, got min={min} max={max}")]
    NonPositiveRadius { min: f32, max: f32 },
    #[error("sphere radius range is inverted: min={min} > max={max}")]
    InvertedRadius { min: f32, max: f32 },
    #[error("depth range is inverted: min_z={min} > max_z={max}")]
    InvertedDepth { min: f32, max: f32 },
    #[error("grid spacing must be finite and non-negative, got {0}")]
    InvalidSpacing(f32),
}

/// The trace image cannot be covered exactly by whole tiles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("tile edge must be non-zero")]
    ZeroTile,
    #[error("image {width}x{height} is empty")]
    EmptyImage { width: u32, height: u32 },
    #[error("image {width}x{height} is not a multiple of the {tile}x{tile} tile")]
    Uneven { width: u32, height: u32, tile: u32 },
}

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("rotation-rate source `{0}` is not available on this device")]
    Unavailable(String),
    #[error("sample interval must be non-zero")]
    ZeroInterval,
    #[error("failed to spawn sensor thread: {0}")]
    Spawn(#[from] std::io::Error),
}
