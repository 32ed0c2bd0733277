//! Procedural sphere field.
//!
//! Spheres sit on a roughly square grid in the XY plane, each cell jittered
//! within half a grid step, at random depths in front of the camera.

use crate::error::SceneError;
use glam::{Vec3, Vec4};
use rand::Rng;

/// Extra depth variation layered on top of the uniform `[min_z, max_z]` pick.
pub const DEPTH_JITTER: f32 = 2.0;

/// Lower bound of each random color channel; keeps spheres off pure black.
pub const MIN_CHANNEL: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    /// Linear RGBA, alpha is always 1.
    pub color: Vec4,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParams {
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_z: f32,
    pub max_z: f32,
    /// Distance between neighbouring grid cells.
    pub spacing: f32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            count: 256,
            min_radius: 0.8,
            max_radius: 2.5,
            min_z: 10.0,
            max_z: 50.0,
            spacing: 6.0,
        }
    }
}

impl SceneParams {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        for (field, value) in [
            ("min_radius", self.min_radius),
            ("max_radius", self.max_radius),
            ("min_z", self.min_z),
            ("max_z", self.max_z),
        ] {
            if !value.is_finite() {
                return Err(SceneError::NonFinite { field, value });
            }
        }
        // Depth is drawn uniformly across the range; its width must not overflow.
        let depth_span = self.max_z - self.min_z;
        if !depth_span.is_finite() {
            return Err(SceneError::NonFinite {
                field: "max_z - min_z",
                value: depth_span,
            });
        }

        let (min, max) = (self.min_radius, self.max_radius);
        if !(min > 0.0 && max > 0.0) {
            return Err(SceneError::NonPositiveRadius { min, max });
        }
        if min > max {
            return Err(SceneError::InvertedRadius { min, max });
        }
        if !(self.min_z <= self.max_z) {
            return Err(SceneError::InvertedDepth {
                min: self.min_z,
                max: self.max_z,
            });
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(SceneError::InvalidSpacing(self.spacing));
        }
        Ok(())
    }

    /// Number of cells along each side of the grid.
    pub fn grid_side(&self) -> usize {
        (self.count as f64).sqrt().ceil() as usize
    }
}

/// Lays out `params.count` spheres using `rng` for every random draw.
///
/// The grid is centred on the origin; cells are visited row by row and the
/// walk stops as soon as `count` spheres exist, so the last row may be
/// partial.
pub fn generate<R: Rng + ?Sized>(
    params: &SceneParams,
    rng: &mut R,
) -> Result<Vec<Sphere>, SceneError> {
    params.validate()?;

    let side = params.grid_side();
    let half_step = params.spacing / 2.0;
    let start = -(side as f32) * params.spacing / 2.0;

    let mut spheres = Vec::with_capacity(params.count);
    'rows: for row in 0..side {
        for col in 0..side {
            if spheres.len() >= params.count {
                break 'rows;
            }

            let jitter_x = rng.gen_range(-half_step..=half_step);
            let jitter_y = rng.gen_range(-half_step..=half_step);
            let jitter_z = rng.gen_range(-DEPTH_JITTER..=DEPTH_JITTER);

            let x = start + col as f32 * params.spacing + jitter_x;
            let y = start + row as f32 * params.spacing + jitter_y;
            let z = rng.gen_range(params.min_z..=params.max_z) + jitter_z;

            let radius = rng.gen_range(params.min_radius..=params.max_radius);
            let color = Vec4::new(
                rng.gen_range(MIN_CHANNEL..=1.0),
                rng.gen_range(MIN_CHANNEL..=1.0),
                rng.gen_range(MIN_CHANNEL..=1.0),
                1.0,
            );

            spheres.push(Sphere {
                center: Vec3::new(x, y, z),
                radius,
                color,
            });
        }
    }

    log::debug!(
        "generated {} spheres on a {side}x{side} grid",
        spheres.len()
    );
    Ok(spheres)
}
