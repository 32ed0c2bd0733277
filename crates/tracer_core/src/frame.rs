//! Per-frame orchestration.
//!
//! A frame is strictly sequential: acquire a drawable, snapshot the camera
//! into the view uniform, then hand the backend one recording that traces the
//! scene into the off-screen image, draws that image onto the quad, and
//! presents. If no drawable is available the frame is dropped before anything
//! is written.

use crate::camera::SharedCamera;
use crate::error::GridError;
use crate::gpu::ViewUniform;

/// Work partition for the trace kernel: one workgroup per `tile x tile`
/// block of pixels, covering the image exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub tile: u32,
    pub groups_x: u32,
    pub groups_y: u32,
}

impl TileGrid {
    pub fn cover(width: u32, height: u32, tile: u32) -> Result<Self, GridError> {
        if tile == 0 {
            return Err(GridError::ZeroTile);
        }
        if width == 0 || height == 0 {
            return Err(GridError::EmptyImage { width, height });
        }
        if width % tile != 0 || height % tile != 0 {
            return Err(GridError::Uneven {
                width,
                height,
                tile,
            });
        }
        Ok(Self {
            tile,
            groups_x: width / tile,
            groups_y: height / tile,
        })
    }

    /// Pixel extent covered by the dispatch.
    pub fn extent(&self) -> (u32, u32) {
        (self.groups_x * self.tile, self.groups_y * self.tile)
    }

    pub fn invocations_per_group(&self) -> u32 {
        self.tile * self.tile
    }
}

/// The GPU side of a frame, as seen by the orchestrator.
pub trait FrameBackend {
    /// Presentable surface for one frame.
    type Target;
    /// Unrecoverable failure; the caller should stop rendering.
    type Error;

    /// Fetches the next drawable. `Ok(None)` means nothing is ready this tick.
    fn acquire(&mut self) -> Result<Option<Self::Target>, Self::Error>;

    /// Copies the view matrix into GPU-visible memory. Must land before the
    /// next [`FrameBackend::submit`] is executed.
    fn upload_view(&mut self, view: &ViewUniform);

    /// Records the trace dispatch followed by the quad pass into a single
    /// recording, submits it, and presents `target`.
    fn submit(&mut self, target: Self::Target, grid: TileGrid) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub presented: u64,
    pub skipped: u64,
}

pub struct FrameOrchestrator {
    camera: SharedCamera,
    grid: TileGrid,
    stats: FrameStats,
}

impl FrameOrchestrator {
    pub fn new(camera: SharedCamera, grid: TileGrid) -> Self {
        Self {
            camera,
            grid,
            stats: FrameStats::default(),
        }
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn camera(&self) -> &SharedCamera {
        &self.camera
    }

    pub fn tick<B: FrameBackend>(&mut self, backend: &mut B) -> Result<FrameOutcome, B::Error> {
        let Some(target) = backend.acquire()? else {
            self.stats.skipped += 1;
            log::debug!("no drawable available; skipping frame");
            return Ok(FrameOutcome::Skipped);
        };

        let view = ViewUniform::from(self.camera.view_matrix());
        backend.upload_view(&view);
        backend.submit(target, self.grid)?;

        self.stats.presented += 1;
        Ok(FrameOutcome::Presented)
    }
}
