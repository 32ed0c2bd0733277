//! The two GPU stages of a frame, behind narrow traits so the renderer only
//! sees "dispatch the trace" and "draw the result".

pub mod quad;
pub mod raytrace;

use tracer_core::TileGrid;

/// Fills the off-screen image.
pub trait ComputeStage {
    fn dispatch(&self, encoder: &mut wgpu::CommandEncoder, grid: TileGrid);
}

/// Draws into a presentable view.
pub trait RasterStage {
    fn draw(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView);
}
