use crate::math::{rotation_x, rotation_y, rotation_z, translation};
use glam::{Mat4, Vec3};
use parking_lot::Mutex;
use std::sync::Arc;

/// Scale applied to each rotation-rate sample before accumulation.
pub const DEFAULT_SENSITIVITY: f32 = 0.075;

/// Starting eye position: ten units behind the origin, looking down +Z
/// toward the sphere field.
pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 0.0, -10.0);

/// A free-look camera steered by rotation-rate samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position in world units. Never changed by sensor input.
    pub position: Vec3,
    /// Accumulated (roll, pitch, yaw) in radians. Unbounded.
    pub rotation: Vec3,
    /// Per-axis gain applied in [`Camera::integrate`].
    pub sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION, Vec3::ZERO)
    }
}

impl Camera {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Accumulates one rotation-rate sample (x = roll, y = pitch, z = yaw).
    ///
    /// Roll and pitch are subtracted while yaw is added. This mirrors the
    /// device axis mapping the demo shipped with and is kept as-is.
    pub fn integrate(&mut self, rate: Vec3) {
        let s = self.sensitivity;
        self.rotation.x -= rate.x * s;
        self.rotation.y -= rate.y * s;
        self.rotation.z += rate.z * s;
    }

    /// World-to-camera transform: `yaw * pitch * roll * translate(-position)`.
    pub fn view_matrix(&self) -> Mat4 {
        let roll = rotation_x(self.rotation.x);
        let pitch = rotation_y(self.rotation.y);
        let yaw = rotation_z(self.rotation.z);

        yaw * pitch * roll * translation(-self.position)
    }
}

/// Handle to a camera shared between the sensor thread (writer) and the
/// render loop (reader).
///
/// Readers copy the pose under the lock and build the matrix afterwards, so
/// a frame never observes a half-applied sample.
#[derive(Debug, Clone, Default)]
pub struct SharedCamera {
    inner: Arc<Mutex<Camera>>,
}

impl SharedCamera {
    pub fn new(camera: Camera) -> Self {
        Self {
            inner: Arc::new(Mutex::new(camera)),
        }
    }

    pub fn integrate(&self, rate: Vec3) {
        self.inner.lock().integrate(rate);
    }

    pub fn snapshot(&self) -> Camera {
        *self.inner.lock()
    }

    pub fn rotation(&self) -> Vec3 {
        self.inner.lock().rotation
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.snapshot().view_matrix()
    }

    /// Returns the camera to level, keeping position and sensitivity.
    pub fn reset_rotation(&self) {
        self.inner.lock().rotation = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn integrate_applies_sign_convention_per_axis() {
        let mut cam = Camera::default();
        cam.integrate(Vec3::new(1.0, 2.0, 3.0));
        let s = DEFAULT_SENSITIVITY;
        assert_eq!(cam.rotation, Vec3::new(-1.0 * s, -2.0 * s, 3.0 * s));
    }

    #[test]
    fn integrate_is_unbounded() {
        let mut cam = Camera::default().with_sensitivity(1.0);
        for _ in 0..10 {
            cam.integrate(Vec3::new(0.0, 0.0, TAU));
        }
        assert!(cam.rotation.z > 9.0 * TAU);
    }

    #[test]
    fn level_camera_only_translates() {
        let cam = Camera::default();
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(cam.view_matrix(), expected);
    }

    #[test]
    fn yaw_only_view_is_rotate_z_then_translate() {
        let cam = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 0.4));
        let expected = rotation_z(0.4) * translation(Vec3::new(-1.0, -2.0, -3.0));
        assert!(cam.view_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn composition_order_is_yaw_pitch_roll() {
        let rot = Vec3::new(0.3, -0.8, 1.2);
        let cam = Camera::new(Vec3::ZERO, rot);
        let expected = Mat4::from_rotation_z(rot.z)
            * Mat4::from_rotation_y(rot.y)
            * Mat4::from_rotation_x(rot.x);
        assert!(cam.view_matrix().abs_diff_eq(expected, 1e-5));

        // A different order gives a different matrix for these angles.
        let swapped = Mat4::from_rotation_x(rot.x)
            * Mat4::from_rotation_y(rot.y)
            * Mat4::from_rotation_z(rot.z);
        assert!(!cam.view_matrix().abs_diff_eq(swapped, 1e-3));
    }

    #[test]
    fn yaw_quarter_turn_rotates_before_translation() {
        let cam = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, FRAC_PI_2));
        let p = cam.view_matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Y, 1e-6), "got {p}");
    }

    #[test]
    fn view_matrix_is_idempotent() {
        let mut cam = Camera::default();
        cam.integrate(Vec3::new(0.1, -0.7, 2.2));
        let a = cam.view_matrix();
        let b = cam.view_matrix();
        assert_eq!(a.to_cols_array(), b.to_cols_array());
    }

    #[test]
    fn shared_handle_sees_writes_from_clones() {
        let shared = SharedCamera::default();
        let writer = shared.clone();
        writer.integrate(Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(shared.rotation(), Vec3::new(0.0, 0.0, DEFAULT_SENSITIVITY));

        shared.reset_rotation();
        assert_eq!(writer.rotation(), Vec3::ZERO);
        assert_eq!(writer.snapshot().position, DEFAULT_POSITION);
    }

    #[test]
    fn concurrent_integration_loses_no_samples() {
        let shared = SharedCamera::new(Camera::default().with_sensitivity(1.0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cam = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        cam.integrate(Vec3::new(0.0, 0.0, 1.0));
                    }
                })
            })
            .collect();
        for _ in 0..1000 {
            let _ = shared.view_matrix();
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(shared.rotation().z, 4000.0);
    }
}
