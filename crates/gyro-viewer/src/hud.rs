//! egui heads-up overlay: camera pose, frame counters and sensor status.

use glam::Vec3;
use std::sync::Arc;
use tracer_core::FrameStats;
use winit::{event::WindowEvent, window::Window};

/// Values shown by the overlay for one frame.
#[derive(Debug, Clone, Default)]
pub struct HudReadout {
    /// Accumulated (roll, pitch, yaw) in degrees.
    pub rotation_deg: Vec3,
    pub stats: FrameStats,
    pub fps: f32,
    pub sensor: Option<String>,
    pub samples: u64,
    pub spheres: u32,
}

/// Tessellated overlay waiting to be recorded into the next frame.
struct HudFrame {
    primitives: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// Texture updates from a frame that was never recorded, followed by the
/// newer frame's. egui sends the font atlas only once, so none may be lost.
fn carry_textures(
    mut older: egui::TexturesDelta,
    newer: egui::TexturesDelta,
) -> egui::TexturesDelta {
    older.append(newer);
    older
}

pub struct Hud {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    pending: Option<HudFrame>,
    pub visible: bool,
}

impl Hud {
    pub fn new(
        window: &Arc<Window>,
        device: &wgpu::Device,
        surface_fmt: wgpu::TextureFormat,
        visible: bool,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(ctx.clone(), ctx.viewport_id(), &**window, None, None);
        let renderer = egui_wgpu::Renderer::new(device, surface_fmt, None, 1);

        Self {
            ctx,
            state,
            renderer,
            pending: None,
            visible,
        }
    }

    /// Returns `true` when egui consumed the event.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.visible && self.state.on_window_event(window, event).consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("HUD {}", if self.visible { "shown" } else { "hidden" });
    }

    /// Runs the egui frame and keeps its output for [`Hud::encode`].
    pub fn prepare(&mut self, window: &Window, readout: &HudReadout) {
        if !self.visible {
            // Nothing to draw, but unrecorded texture updates still apply.
            if let Some(frame) = self.pending.as_mut() {
                frame.primitives.clear();
            }
            return;
        }

        let input = self.state.take_egui_input(window);
        self.ctx.begin_frame(input);
        draw_panel(&self.ctx, readout);
        let output = self.ctx.end_frame();

        self.state
            .handle_platform_output(window, output.platform_output);

        let pixels_per_point = self.ctx.pixels_per_point();
        let textures = match self.pending.take() {
            Some(skipped) => carry_textures(skipped.textures, output.textures_delta),
            None => output.textures_delta,
        };
        self.pending = Some(HudFrame {
            primitives: self.ctx.tessellate(output.shapes, pixels_per_point),
            textures,
            pixels_per_point,
        });
    }

    /// Records the prepared overlay on top of `view`. No-op when nothing was
    /// prepared since the last call.
    pub fn encode(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size: [u32; 2],
    ) {
        let Some(frame) = self.pending.take() else {
            return;
        };

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: size,
            pixels_per_point: frame.pixels_per_point,
        };

        for (id, delta) in &frame.textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &frame.primitives, &screen);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer.render(&mut pass, &frame.primitives, &screen);
        }

        for id in &frame.textures.free {
            self.renderer.free_texture(id);
        }
    }
}

fn draw_panel(ctx: &egui::Context, r: &HudReadout) {
    egui::Window::new("Tracer")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            ui.label(format!("{:.0} fps", r.fps));
            ui.label(format!("{} spheres", r.spheres));
            ui.separator();
            ui.monospace(format!("roll  {:+9.1}°", r.rotation_deg.x));
            ui.monospace(format!("pitch {:+9.1}°", r.rotation_deg.y));
            ui.monospace(format!("yaw   {:+9.1}°", r.rotation_deg.z));
            ui.separator();
            match &r.sensor {
                Some(name) => ui.label(format!("gyro: {name} ({} samples)", r.samples)),
                None => ui.label("gyro: none (fixed pose)"),
            };
            ui.label(format!(
                "frames: {} presented, {} skipped",
                r.stats.presented, r.stats.skipped
            ));
            ui.small("Q/E roll, arrows pitch/yaw, R reset, H hide");
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(id: u64) -> (egui::TextureId, egui::epaint::ImageDelta) {
        let image = egui::ColorImage::new([1, 1], egui::Color32::WHITE);
        (
            egui::TextureId::Managed(id),
            egui::epaint::ImageDelta::full(image, egui::TextureOptions::LINEAR),
        )
    }

    #[test]
    fn skipped_frame_textures_are_kept_in_order() {
        let mut skipped = egui::TexturesDelta::default();
        skipped.set.push(upload(0));
        skipped.free.push(egui::TextureId::Managed(7));

        let mut next = egui::TexturesDelta::default();
        next.set.push(upload(1));
        next.free.push(egui::TextureId::Managed(8));

        let merged = carry_textures(skipped, next);
        let set: Vec<_> = merged.set.iter().map(|(id, _)| *id).collect();
        assert_eq!(
            set,
            vec![egui::TextureId::Managed(0), egui::TextureId::Managed(1)]
        );
        assert_eq!(
            merged.free,
            vec![egui::TextureId::Managed(7), egui::TextureId::Managed(8)]
        );
    }

    #[test]
    fn nothing_skipped_passes_textures_through() {
        let mut next = egui::TexturesDelta::default();
        next.set.push(upload(3));

        let merged = carry_textures(egui::TexturesDelta::default(), next);
        assert_eq!(merged.set.len(), 1);
        assert!(merged.free.is_empty());
    }
}
