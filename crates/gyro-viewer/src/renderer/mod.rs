//! GPU side of the tracer. Owns the context, the off-screen trace target,
//! the scene buffers and both stages, and plays the [`FrameBackend`] role
//! for the orchestrator.

pub mod context;
pub mod pipelines;
pub mod scene;
pub mod targets;

use self::{
    context::GfxContext,
    pipelines::{quad::QuadPipeline, raytrace::RayTracePipeline, ComputeStage, RasterStage},
    scene::SceneBuffers,
    targets::TraceTarget,
};
use crate::hud::Hud;
use std::sync::Arc;
use tracer_core::{gpu::ViewUniform, FrameBackend, Sphere, TileGrid};
use winit::window::Window;

pub struct Renderer {
    pub gfx: GfxContext,
    pub target: TraceTarget,
    pub scene: SceneBuffers,
    tracer: Box<dyn ComputeStage>,
    presenter: Box<dyn RasterStage>,
    pub hud: Hud,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        spheres: &[Sphere],
        grid: TileGrid,
        show_hud: bool,
    ) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window.clone(), &grid).await?;

        let (width, height) = grid.extent();
        let target = TraceTarget::new(&gfx.device, width, height);
        let scene = SceneBuffers::new(&gfx.device, spheres);
        let tracer = RayTracePipeline::new(&gfx.device, &target, &scene, grid.tile);
        let presenter = QuadPipeline::new(&gfx.device, gfx.config.format, &target);
        let hud = Hud::new(&window, &gfx.device, gfx.config.format, show_hud);

        log::info!(
            "Trace target {}x{} in {}x{} tiles of {}px",
            target.width,
            target.height,
            grid.groups_x,
            grid.groups_y,
            grid.tile
        );

        Ok(Self {
            gfx,
            target,
            scene,
            tracer: Box::new(tracer),
            presenter: Box::new(presenter),
            hud,
        })
    }

    /// Only the swap chain follows the window; the trace target keeps its
    /// size and the quad stretches it.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gfx.resize(new_size);
    }
}

impl FrameBackend for Renderer {
    type Target = wgpu::SurfaceTexture;
    type Error = wgpu::SurfaceError;

    fn acquire(&mut self) -> Result<Option<wgpu::SurfaceTexture>, wgpu::SurfaceError> {
        match self.gfx.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated; reconfiguring");
                self.gfx.reconfigure();
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn upload_view(&mut self, view: &ViewUniform) {
        self.scene.write_view(&self.gfx.queue, view);
    }

    fn submit(
        &mut self,
        frame: wgpu::SurfaceTexture,
        grid: TileGrid,
    ) -> Result<(), wgpu::SurfaceError> {
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Pass 1: trace into the off-screen image
        self.tracer.dispatch(&mut encoder, grid);

        // Pass 2: blit onto the swap chain
        self.presenter.draw(&mut encoder, &swap_view);

        // Pass 3: overlay
        self.hud.encode(
            &self.gfx.device,
            &self.gfx.queue,
            &mut encoder,
            &swap_view,
            [self.gfx.config.width, self.gfx.config.height],
        );

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
