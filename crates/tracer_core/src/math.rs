//! Homogeneous 4x4 transforms used by the camera.
//!
//! All matrices act on column vectors (`M * v`), matching both glam and the
//! WGSL kernel.

use glam::{Mat4, Vec3, Vec4};

/// Rotation about the X axis (roll).
#[rustfmt::skip]
pub fn rotation_x(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0,   c,   s, 0.0),
        Vec4::new(0.0,  -s,   c, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    )
}

/// Rotation about the Y axis (pitch).
#[rustfmt::skip]
pub fn rotation_y(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(  c, 0.0,  -s, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(  s, 0.0,   c, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    )
}

/// Rotation about the Z axis (yaw).
#[rustfmt::skip]
pub fn rotation_z(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(  c,   s, 0.0, 0.0),
        Vec4::new( -s,   c, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    )
}

/// Translation by `t`; the offset lives in the fourth column.
#[rustfmt::skip]
pub fn translation(t: Vec3) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(t.x, t.y, t.z, 1.0),
    )
}
