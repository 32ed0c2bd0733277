//! End-to-end behaviour of the camera, scene and frame loop without a GPU.

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::f32::consts::TAU;
use std::time::{Duration, Instant};
use tracer_core::camera::DEFAULT_SENSITIVITY;
use tracer_core::gpu::{SceneInfo, ViewUniform};
use tracer_core::math::rotation_z;
use tracer_core::scene::{self, DEPTH_JITTER};
use tracer_core::{
    Camera, FrameBackend, FrameOrchestrator, FrameOutcome, GyroBridge, RotationRateSource,
    SceneParams, SharedCamera, TileGrid,
};

/// Replays a fixed list of samples, then goes quiet.
struct Scripted(VecDeque<Vec3>);

impl RotationRateSource for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn sample(&mut self) -> Option<Vec3> {
        self.0.pop_front()
    }
}

/// Keeps the last uploaded view in a fake GPU buffer and counts submissions.
struct FakeGpu {
    drawable_ready: bool,
    view_buffer: [u8; 64],
    submissions: usize,
}

impl FakeGpu {
    fn new(drawable_ready: bool) -> Self {
        Self {
            drawable_ready,
            view_buffer: [0; 64],
            submissions: 0,
        }
    }
}

impl FrameBackend for FakeGpu {
    type Target = ();
    type Error = std::convert::Infallible;

    fn acquire(&mut self) -> Result<Option<()>, Self::Error> {
        Ok(self.drawable_ready.then_some(()))
    }

    fn upload_view(&mut self, view: &ViewUniform) {
        self.view_buffer.copy_from_slice(bytemuck::bytes_of(view));
    }

    fn submit(&mut self, _target: (), _grid: TileGrid) -> Result<(), Self::Error> {
        self.submissions += 1;
        Ok(())
    }
}

#[test]
fn one_full_yaw_turn_sample() {
    let mut camera = Camera::default();
    assert_eq!(camera.position, Vec3::new(0.0, 0.0, -10.0));

    camera.integrate(Vec3::new(0.0, 0.0, TAU));
    assert_eq!(camera.rotation.z, 0.075 * TAU);

    // The rotational block of the view matrix is a pure yaw.
    let view = camera.view_matrix();
    let expected = rotation_z(0.075 * TAU);
    for col in 0..3 {
        assert!(view
            .col(col)
            .truncate()
            .abs_diff_eq(expected.col(col).truncate(), 1e-6));
    }
}

#[test]
fn integration_is_an_order_independent_sum() {
    let rates = [
        Vec3::new(0.5, -1.0, 2.0),
        Vec3::new(-0.25, 0.75, -1.5),
        Vec3::new(1.0, 1.0, 1.0),
    ];

    let mut forward = Camera::default();
    rates.iter().for_each(|r| forward.integrate(*r));
    let mut backward = Camera::default();
    rates.iter().rev().for_each(|r| backward.integrate(*r));

    let sum: Vec3 = rates.iter().sum();
    let s = DEFAULT_SENSITIVITY;
    let expected = Vec3::new(-sum.x * s, -sum.y * s, sum.z * s);
    assert!(forward.rotation.abs_diff_eq(expected, 1e-6));
    assert!(backward.rotation.abs_diff_eq(expected, 1e-6));
}

#[test]
fn skipped_frame_leaves_gpu_untouched() {
    let camera = SharedCamera::default();
    camera.integrate(Vec3::new(0.3, 0.2, 0.1));
    let mut orch = FrameOrchestrator::new(camera.clone(), TileGrid::cover(512, 512, 16).unwrap());
    let mut gpu = FakeGpu::new(false);

    assert_eq!(orch.tick(&mut gpu).unwrap(), FrameOutcome::Skipped);
    assert_eq!(gpu.submissions, 0);
    assert_eq!(gpu.view_buffer, [0u8; 64]);

    gpu.drawable_ready = true;
    assert_eq!(orch.tick(&mut gpu).unwrap(), FrameOutcome::Presented);
    assert_eq!(gpu.submissions, 1);
    let uploaded: ViewUniform = bytemuck::pod_read_unaligned(&gpu.view_buffer);
    assert_eq!(Mat4::from_cols_array_2d(&uploaded.view), camera.view_matrix());

    let stats = orch.stats();
    assert_eq!((stats.presented, stats.skipped), (1, 1));
}

#[test]
fn sensor_samples_reach_the_next_frame() {
    let camera = SharedCamera::new(Camera::default());
    let samples: VecDeque<Vec3> = std::iter::repeat(Vec3::new(0.0, 0.0, 1.0)).take(4).collect();
    let bridge =
        GyroBridge::start(Scripted(samples), camera.clone(), Duration::from_millis(1)).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while bridge.samples_delivered() < 4 {
        assert!(Instant::now() < deadline, "scripted samples were not delivered");
        std::thread::sleep(Duration::from_millis(1));
    }
    bridge.stop();

    let mut orch = FrameOrchestrator::new(camera, TileGrid::cover(64, 64, 16).unwrap());
    let mut gpu = FakeGpu::new(true);
    orch.tick(&mut gpu).unwrap();

    let uploaded: ViewUniform = bytemuck::pod_read_unaligned(&gpu.view_buffer);
    let cam = Camera::new(
        Vec3::new(0.0, 0.0, -10.0),
        Vec3::new(0.0, 0.0, 4.0 * DEFAULT_SENSITIVITY),
    );
    assert!(Mat4::from_cols_array_2d(&uploaded.view).abs_diff_eq(cam.view_matrix(), 1e-6));
}

#[test]
fn default_scene_fits_the_described_volume() {
    let params = SceneParams::default();
    let spheres = scene::generate(&params, &mut StdRng::seed_from_u64(2024)).unwrap();
    assert_eq!(spheres.len(), 256);
    assert_eq!(SceneInfo::new(spheres.len()).sphere_count, 256);

    let z_range = (params.min_z - DEPTH_JITTER)..=(params.max_z + DEPTH_JITTER);
    assert!(spheres.iter().all(|s| z_range.contains(&s.center.z)));
    assert!(spheres.iter().all(|s| s.radius > 0.0));
}
