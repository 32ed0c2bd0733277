//! Windowed front end for `tracer_core`: wgpu compute tracing, a full-screen
//! quad, keyboard and synthetic rotation sources, and an egui overlay.

pub mod app;
pub mod config;
pub mod hud;
pub mod input;
pub mod renderer;
