//! Byte layouts shared with the WGSL kernels.
//!
//! Every struct here must match its WGSL counterpart field for field,
//! including the explicit padding that the uniform and storage address spaces
//! require.

use crate::scene::Sphere;
use bytemuck::Zeroable;
use glam::Mat4;

/// One sphere in the read-only storage array of the trace kernel.
/// Mirrors `struct Sphere` in `raytrace.wgsl` (48 bytes, 16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct SphereGpu {
    /// World-space center, w = 1.
    pub center: [f32; 4],
    pub color: [f32; 4],
    pub radius: f32,
    pub _pad: [f32; 3],
}

impl From<&Sphere> for SphereGpu {
    fn from(s: &Sphere) -> Self {
        Self {
            center: s.center.extend(1.0).to_array(),
            color: s.color.to_array(),
            radius: s.radius,
            _pad: [0.0; 3],
        }
    }
}

/// Packs a scene for upload. A storage binding may not be empty, so an empty
/// scene still yields one zeroed element; the kernel only reads
/// [`SceneInfo::sphere_count`] entries.
pub fn pack_spheres(spheres: &[Sphere]) -> Vec<SphereGpu> {
    if spheres.is_empty() {
        return vec![SphereGpu::zeroed()];
    }
    spheres.iter().map(SphereGpu::from).collect()
}

/// Scene-wide constants. Mirrors `struct SceneInfo` (16 bytes).
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq)]
pub struct SceneInfo {
    pub sphere_count: u32,
    pub _pad: [u32; 3],
}

impl SceneInfo {
    pub fn new(sphere_count: usize) -> Self {
        Self {
            sphere_count: sphere_count as u32,
            _pad: [0; 3],
        }
    }
}

/// Column-major world-to-camera matrix. Mirrors `struct View` (64 bytes).
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct ViewUniform {
    pub view: [[f32; 4]; 4],
}

impl From<Mat4> for ViewUniform {
    fn from(m: Mat4) -> Self {
        Self {
            view: m.to_cols_array_2d(),
        }
    }
}

/// Vertex of the full-screen quad. Mirrors the `VsIn` inputs of `quad.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

/// Clip-space corners with texture coordinates (v grows downward).
#[rustfmt::skip]
pub const FULL_SCREEN_QUAD: [QuadVertex; 4] = [
    QuadVertex { position: [ 1.0,  1.0], uv: [1.0, 0.0] }, // top right
    QuadVertex { position: [-1.0,  1.0], uv: [0.0, 0.0] }, // top left
    QuadVertex { position: [-1.0, -1.0], uv: [0.0, 1.0] }, // bottom left
    QuadVertex { position: [ 1.0, -1.0], uv: [1.0, 1.0] }, // bottom right
];

/// Two counter-clockwise triangles covering the quad.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];
