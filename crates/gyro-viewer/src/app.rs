use crate::{
    config::{Config, GyroMode},
    hud::HudReadout,
    input::KeyboardController,
    renderer::Renderer,
};
use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use std::{sync::Arc, time::Instant};
use tracer_core::{
    camera::DEFAULT_POSITION, scene, Camera, FrameOrchestrator, FrameOutcome, GyroBridge,
    NoSensor, RotationRateSource, SharedCamera, SyntheticGyro, TileGrid,
};
use winit::{event::WindowEvent, window::Window};

pub struct App {
    pub renderer: Renderer,
    pub orchestrator: FrameOrchestrator,
    keyboard: Option<KeyboardController>,
    bridge: Option<GyroBridge>,
    sensor_name: Option<String>,
    last_frame: Instant,
    fps: f32,
}

impl App {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let spheres = scene::generate(&config.scene_params(), &mut rng)
            .context("invalid scene parameters")?;
        log::info!("Generated {} spheres", spheres.len());

        let camera = SharedCamera::new(
            Camera::new(DEFAULT_POSITION, glam::Vec3::ZERO).with_sensitivity(config.sensitivity),
        );
        let grid = TileGrid::cover(config.image_size, config.image_size, config.tile_size)?;

        let renderer = Renderer::new(window, &spheres, grid, !config.hide_hud)
            .await
            .context("failed to initialise the GPU renderer")?;

        let mut keyboard = None;
        let bridge = match config.gyro {
            GyroMode::Keyboard => {
                let ctl = KeyboardController::new(camera.clone());
                let source = ctl.source();
                keyboard = Some(ctl);
                start_sensor(source, &camera, config)?
            }
            GyroMode::Synthetic => start_sensor(SyntheticGyro::default(), &camera, config)?,
            GyroMode::None => start_sensor(NoSensor, &camera, config)?,
        };

        Ok(Self {
            renderer,
            orchestrator: FrameOrchestrator::new(camera, grid),
            keyboard,
            sensor_name: bridge.as_ref().map(|(_, name)| name.clone()),
            bridge: bridge.map(|(bridge, _)| bridge),
            last_frame: Instant::now(),
            fps: 0.0,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize(new_size);
    }

    /// Returns `true` when the event was consumed.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        if self.renderer.hud.handle_event(window, event) {
            return true;
        }

        if let Some(keyboard) = self.keyboard.as_mut() {
            if keyboard.handle_event(event) {
                return true;
            }
        }

        if let WindowEvent::Resized(physical_size) = event {
            self.resize(*physical_size);
        }

        false
    }

    pub fn toggle_hud(&mut self) {
        self.renderer.hud.toggle();
    }

    pub fn render(&mut self, window: &Window) -> Result<FrameOutcome, wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        if dt > 0.0 {
            // Exponential smoothing keeps the readout legible.
            self.fps = if self.fps == 0.0 { 1.0 / dt } else { self.fps * 0.9 + 0.1 / dt };
        }

        let readout = HudReadout {
            rotation_deg: self.orchestrator.camera().rotation() * (180.0 / std::f32::consts::PI),
            stats: self.orchestrator.stats(),
            fps: self.fps,
            sensor: self.sensor_name.clone(),
            samples: self.bridge.as_ref().map_or(0, GyroBridge::samples_delivered),
            spheres: self.renderer.scene.sphere_count,
        };
        self.renderer.hud.prepare(window, &readout);

        self.orchestrator.tick(&mut self.renderer)
    }

    /// Stops the sensor thread before the window goes away.
    pub fn shutdown(&mut self) {
        if let Some(bridge) = self.bridge.take() {
            log::info!(
                "Stopping sensor after {} samples; {:?}",
                bridge.samples_delivered(),
                self.orchestrator.stats()
            );
            bridge.stop();
        }
    }
}

fn start_sensor<S: RotationRateSource>(
    source: S,
    camera: &SharedCamera,
    config: &Config,
) -> Result<Option<(GyroBridge, String)>> {
    let name = source.name().to_owned();
    let bridge = GyroBridge::start_with_policy(
        source,
        camera.clone(),
        config.sample_interval(),
        config.sensor_policy(),
    )
    .with_context(|| format!("rotation source `{name}` could not start"))?;
    Ok(bridge.map(|bridge| (bridge, name)))
}
