//! Rotation-rate delivery.
//!
//! A [`GyroBridge`] owns a sampling thread that polls a
//! [`RotationRateSource`] at a fixed interval and folds every sample into a
//! [`SharedCamera`]. The thread runs independently of the render loop; the
//! camera's lock is the only point of contact between the two.

use crate::camera::SharedCamera;
use crate::error::SensorError;
use crossbeam_channel::{bounded, select, tick, Sender};
use glam::Vec3;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Sampling interval of the sensor thread.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

/// Anything that can report angular velocity (x = roll, y = pitch,
/// z = yaw, radians per second).
pub trait RotationRateSource: Send + 'static {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }

    /// Latest reading, or `None` when the source has nothing new.
    fn sample(&mut self) -> Option<Vec3>;
}

/// What to do when the configured source is unavailable at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorPolicy {
    /// Abort startup.
    Required,
    /// Keep rendering from the default pose.
    #[default]
    Optional,
}

pub struct GyroBridge {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
    samples: Arc<AtomicU64>,
}

impl GyroBridge {
    /// Starts forwarding samples from `source` into `camera` every `interval`.
    pub fn start<S: RotationRateSource>(
        mut source: S,
        camera: SharedCamera,
        interval: Duration,
    ) -> Result<Self, SensorError> {
        if interval.is_zero() {
            return Err(SensorError::ZeroInterval);
        }
        if !source.is_available() {
            return Err(SensorError::Unavailable(source.name().to_owned()));
        }

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let samples = Arc::new(AtomicU64::new(0));
        let counter = samples.clone();
        let name = source.name().to_owned();

        let handle = std::thread::Builder::new()
            .name(format!("gyro-{name}"))
            .spawn(move || {
                log::info!("sensor `{name}` sampling every {interval:?}");
                let ticker = tick(interval);
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            if let Some(rate) = source.sample() {
                                camera.integrate(rate);
                                counter.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                }
                log::info!("sensor `{name}` stopped");
            })?;

        Ok(Self {
            stop_tx,
            handle: Some(handle),
            samples,
        })
    }

    /// Starts the bridge, or applies `policy` if the source is unavailable.
    pub fn start_with_policy<S: RotationRateSource>(
        source: S,
        camera: SharedCamera,
        interval: Duration,
        policy: SensorPolicy,
    ) -> Result<Option<Self>, SensorError> {
        match Self::start(source, camera, interval) {
            Ok(bridge) => Ok(Some(bridge)),
            Err(SensorError::Unavailable(name)) if policy == SensorPolicy::Optional => {
                log::warn!(
                    "rotation source `{name}` unavailable; camera stays at its default pose"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Samples folded into the camera so far.
    pub fn samples_delivered(&self) -> u64 {
        self.samples.load(Ordering::Relaxed)
    }

    /// Stops the sampling thread and waits for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.stop_tx.try_send(());
            if handle.join().is_err() {
                log::error!("sensor thread panicked");
            }
        }
    }
}

impl Drop for GyroBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Deterministic stand-in for a handheld gyroscope: a slow figure-eight sway
/// in pitch and yaw with a faint roll wobble.
#[derive(Debug, Clone)]
pub struct SyntheticGyro {
    amplitude: f32,
    period: Duration,
    started: Instant,
}

impl SyntheticGyro {
    pub fn new(amplitude: f32, period: Duration) -> Self {
        Self {
            amplitude,
            period,
            started: Instant::now(),
        }
    }

    /// Rate at `t` seconds after start.
    pub fn rate_at(&self, t: f32) -> Vec3 {
        let w = std::f32::consts::TAU / self.period.as_secs_f32().max(f32::EPSILON);
        let a = self.amplitude;
        Vec3::new(
            0.1 * a * (3.0 * w * t).sin(),
            a * (2.0 * w * t).cos(),
            a * (w * t).cos(),
        )
    }
}

impl Default for SyntheticGyro {
    fn default() -> Self {
        Self::new(0.6, Duration::from_secs(12))
    }
}

impl RotationRateSource for SyntheticGyro {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn sample(&mut self) -> Option<Vec3> {
        Some(self.rate_at(self.started.elapsed().as_secs_f32()))
    }
}

/// A source that never reports: stands in for a device without a gyroscope.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSensor;

impl RotationRateSource for NoSensor {
    fn name(&self) -> &str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn sample(&mut self) -> Option<Vec3> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    struct Constant(Vec3);

    impl RotationRateSource for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn sample(&mut self) -> Option<Vec3> {
            Some(self.0)
        }
    }

    fn wait_for_samples(bridge: &GyroBridge, n: u64) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while bridge.samples_delivered() < n {
            assert!(Instant::now() < deadline, "sensor thread delivered too few samples");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn bridge_forwards_samples_to_camera() {
        let camera = SharedCamera::new(Camera::default().with_sensitivity(1.0));
        let bridge = GyroBridge::start(
            Constant(Vec3::new(0.0, 0.0, 1.0)),
            camera.clone(),
            Duration::from_millis(2),
        )
        .unwrap();
        wait_for_samples(&bridge, 3);
        bridge.stop();

        // Every delivered sample was folded in exactly once.
        let yaw = camera.rotation().z;
        assert!(yaw >= 3.0);
        assert_eq!(yaw.fract(), 0.0);
    }

    #[test]
    fn stopped_bridge_no_longer_mutates_camera() {
        let camera = SharedCamera::default();
        let bridge =
            GyroBridge::start(Constant(Vec3::ONE), camera.clone(), Duration::from_millis(1))
                .unwrap();
        wait_for_samples(&bridge, 1);
        drop(bridge);

        let frozen = camera.rotation();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(camera.rotation(), frozen);
    }

    #[test]
    fn unavailable_source_is_fatal_when_required() {
        let err = GyroBridge::start_with_policy(
            NoSensor,
            SharedCamera::default(),
            DEFAULT_SAMPLE_INTERVAL,
            SensorPolicy::Required,
        )
        .err()
        .unwrap();
        assert!(matches!(err, SensorError::Unavailable(name) if name == "none"));
    }

    #[test]
    fn unavailable_source_degrades_when_optional() {
        let camera = SharedCamera::default();
        let bridge = GyroBridge::start_with_policy(
            NoSensor,
            camera.clone(),
            DEFAULT_SAMPLE_INTERVAL,
            SensorPolicy::Optional,
        )
        .unwrap();
        assert!(bridge.is_none());
        assert_eq!(camera.snapshot(), Camera::default());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = GyroBridge::start(
            SyntheticGyro::default(),
            SharedCamera::default(),
            Duration::ZERO,
        );
        assert!(matches!(err, Err(SensorError::ZeroInterval)));
    }

    #[test]
    fn synthetic_gyro_is_periodic() {
        let gyro = SyntheticGyro::new(1.0, Duration::from_secs(4));
        let a = gyro.rate_at(0.5);
        let b = gyro.rate_at(4.5);
        assert!(a.abs_diff_eq(b, 1e-4), "{a} vs {b}");
        assert_eq!(gyro.rate_at(0.0), Vec3::new(0.0, 1.0, 1.0));
    }
}
