//! GPU-resident scene: the sphere array, its length, and the per-frame view.

use tracer_core::gpu::{pack_spheres, SceneInfo, SphereGpu, ViewUniform};
use tracer_core::Sphere;
use wgpu::util::DeviceExt;

pub struct SceneBuffers {
    /// Read-only storage array, uploaded once.
    pub spheres: wgpu::Buffer,
    /// `SceneInfo` uniform, uploaded once.
    pub info: wgpu::Buffer,
    /// `ViewUniform`, overwritten every presented frame.
    pub view: wgpu::Buffer,
    pub sphere_count: u32,
}

impl SceneBuffers {
    pub fn new(device: &wgpu::Device, spheres: &[Sphere]) -> Self {
        let packed: Vec<SphereGpu> = pack_spheres(spheres);
        let info = SceneInfo::new(spheres.len());

        let spheres_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Storage"),
            contents: bytemuck::cast_slice(&packed),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let info_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Info UBO"),
            contents: bytemuck::bytes_of(&info),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let view_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("View UBO"),
            size: std::mem::size_of::<ViewUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!(
            "Uploaded {} spheres ({} bytes)",
            info.sphere_count,
            std::mem::size_of_val(packed.as_slice())
        );

        Self {
            spheres: spheres_buf,
            info: info_buf,
            view: view_buf,
            sphere_count: info.sphere_count,
        }
    }

    pub fn write_view(&self, queue: &wgpu::Queue, view: &ViewUniform) {
        queue.write_buffer(&self.view, 0, bytemuck::bytes_of(view));
    }
}
