use anyhow::{anyhow, bail, Result};
use std::sync::Arc;
use tracer_core::TileGrid;
use winit::window::Window;

/// Holds all GPU resources needed for rendering.
pub struct GfxContext {
    pub surface: wgpu::Surface<'static>,
    pub device:  wgpu::Device,
    pub queue:   wgpu::Queue,
    pub config:  wgpu::SurfaceConfiguration,
    pub size:    winit::dpi::PhysicalSize<u32>,
}

impl GfxContext {
    /// Creates a graphics context bound to `window`, able to run one compute
    /// workgroup per tile of `grid`.
    pub async fn new(window: Arc<Window>, grid: &TileGrid) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        // The surface must outlive the window; `Arc` guarantees this.
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference:         wgpu::PowerPreference::HighPerformance,
                compatible_surface:       Some(&surface),
                force_fallback_adapter:   false,
            })
            .await
            .ok_or_else(|| anyhow!("Failed to find a suitable GPU adapter."))?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?}, {:?})", info.name, info.backend, info.device_type);

        let required_limits = compute_limits(&adapter.limits(), grid)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label:             Some("Tracer Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits,
                },
                None, // no trace
            )
            .await?;

        // The traced image already holds display-ready values, so skip the
        // sRGB encode on write when the surface allows it.
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage:                       wgpu::TextureUsages::RENDER_ATTACHMENT,
            format:                      surface_format,
            width:                       size.width.max(1),
            height:                      size.height.max(1),
            present_mode:                wgpu::PresentMode::Fifo, // V‑sync
            alpha_mode:                  caps.alpha_modes[0],
            view_formats:                vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    /// Resizes the swap chain when the window size changes.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Re-applies the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

/// Default limits raised just enough for the grid's workgroups, or an error
/// if the adapter cannot run them.
pub fn compute_limits(supported: &wgpu::Limits, grid: &TileGrid) -> Result<wgpu::Limits> {
    let tile = grid.tile;
    let invocations = grid.invocations_per_group();
    if invocations > supported.max_compute_invocations_per_workgroup
        || tile > supported.max_compute_workgroup_size_x
        || tile > supported.max_compute_workgroup_size_y
    {
        bail!(
            "adapter supports at most {} invocations per workgroup; \
             a {tile}x{tile} tile needs {invocations}",
            supported.max_compute_invocations_per_workgroup
        );
    }

    let base = wgpu::Limits::default();
    Ok(wgpu::Limits {
        max_compute_invocations_per_workgroup: base
            .max_compute_invocations_per_workgroup
            .max(invocations),
        max_compute_workgroup_size_x: base.max_compute_workgroup_size_x.max(tile),
        max_compute_workgroup_size_y: base.max_compute_workgroup_size_y.max(tile),
        ..base
    })
}
