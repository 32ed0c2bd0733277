use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::time::Duration;
use tracer_core::camera::DEFAULT_SENSITIVITY;
use tracer_core::{SceneParams, SensorPolicy, TileGrid};

/// Where rotation-rate samples come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GyroMode {
    /// Arrow keys and Q/E act as a gyroscope.
    Keyboard,
    /// A slow, scripted sway.
    Synthetic,
    /// No rotation source at all.
    None,
}

/// `gyro_viewer` - a real-time GPU ray tracer for a field of spheres.
///
/// A compute kernel traces the scene into an off-screen image every frame and
/// a full-screen quad presents it. The camera turns with the rotation-rate
/// source selected by `--gyro`.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Initial window width in logical pixels.
    #[arg(long, env = "GYRO_TRACER_WINDOW_WIDTH", default_value_t = 800)]
    pub window_width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, env = "GYRO_TRACER_WINDOW_HEIGHT", default_value_t = 800)]
    pub window_height: u32,

    /// Edge length of the square off-screen trace image.
    ///
    /// Must be a multiple of `--tile-size`.
    #[arg(long, env = "GYRO_TRACER_IMAGE_SIZE", default_value_t = 512)]
    pub image_size: u32,

    /// Edge length of one compute workgroup tile.
    ///
    /// 32 needs 1024 invocations per workgroup, which not every adapter
    /// offers.
    #[arg(long, env = "GYRO_TRACER_TILE_SIZE", default_value_t = 16,
          value_parser = clap::value_parser!(u32).range(1..=32))]
    pub tile_size: u32,

    /// Number of spheres in the scene.
    #[arg(long, env = "GYRO_TRACER_SPHERES", default_value_t = 256)]
    pub spheres: usize,

    /// Seed for scene generation; random when omitted.
    #[arg(long, env = "GYRO_TRACER_SEED")]
    pub seed: Option<u64>,

    /// Rotation-rate source driving the camera.
    #[arg(long, env = "GYRO_TRACER_GYRO", value_enum, default_value_t = GyroMode::Keyboard)]
    pub gyro: GyroMode,

    /// Interval between rotation-rate samples, in milliseconds.
    #[arg(long, env = "GYRO_TRACER_SAMPLE_INTERVAL_MS", default_value_t = 50)]
    pub sample_interval_ms: u64,

    /// Gain applied to every rotation-rate sample.
    #[arg(long, env = "GYRO_TRACER_SENSITIVITY", default_value_t = DEFAULT_SENSITIVITY)]
    pub sensitivity: f32,

    /// Exit at startup when the rotation source is unavailable instead of
    /// rendering from a fixed pose.
    #[arg(long, env = "GYRO_TRACER_REQUIRE_GYRO")]
    pub require_gyro: bool,

    /// Start with the heads-up overlay hidden (toggle with H).
    #[arg(long, env = "GYRO_TRACER_HIDE_HUD")]
    pub hide_hud: bool,
}

impl Config {
    /// Checks cross-field constraints clap cannot express.
    pub fn validate(&self) -> Result<()> {
        TileGrid::cover(self.image_size, self.image_size, self.tile_size)?;
        self.scene_params().validate()?;
        if self.sample_interval_ms == 0 {
            bail!("--sample-interval-ms must be at least 1");
        }
        if !self.sensitivity.is_finite() {
            bail!("--sensitivity must be a finite number");
        }
        if self.window_width == 0 || self.window_height == 0 {
            bail!("window size must be non-zero");
        }
        Ok(())
    }

    pub fn scene_params(&self) -> SceneParams {
        SceneParams::default().with_count(self.spheres)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn sensor_policy(&self) -> SensorPolicy {
        if self.require_gyro {
            SensorPolicy::Required
        } else {
            SensorPolicy::Optional
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("gyro_viewer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_the_demo() {
        let cfg = parse(&[]);
        assert_eq!(cfg.image_size, 512);
        assert_eq!(cfg.spheres, 256);
        assert_eq!(cfg.gyro, GyroMode::Keyboard);
        assert_eq!(cfg.sample_interval(), Duration::from_millis(50));
        assert_eq!(cfg.sensitivity, DEFAULT_SENSITIVITY);
        assert_eq!(cfg.sensor_policy(), SensorPolicy::Optional);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = parse(&[
            "--gyro", "synthetic", "--seed", "9", "--tile-size", "32", "--require-gyro",
        ]);
        assert_eq!(cfg.gyro, GyroMode::Synthetic);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.tile_size, 32);
        assert_eq!(cfg.sensor_policy(), SensorPolicy::Required);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn image_must_divide_into_tiles() {
        let cfg = parse(&["--image-size", "500"]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn tile_size_is_bounded() {
        let res = Config::try_parse_from(["gyro_viewer", "--tile-size", "64"]);
        assert!(res.is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let cfg = parse(&["--sample-interval-ms", "0"]);
        assert!(cfg.validate().is_err());
    }
}
