//! Tracked-frame data model.
//!
//! This module defines the per-tick snapshot types flowing out of the
//! tracking backend:
//!
//! - `PixelBuffer`: Reference-counted camera image. Shared between the
//!   backend (producer) and the texture bridge (consumer-of-record).
//! - `TrackedFrame`: Immutable snapshot of pose + imagery + surface
//!   estimates. Only the most recent frame is retained anywhere in the
//!   crate; a superseded frame is dropped as soon as its successor lands.
//! - `SurfaceHit` / `HitCategory` / `SurfaceQuery`: the hit-test boundary
//!   against the backend's scene understanding, opaque to this crate.

use std::sync::Arc;
use std::time::Instant;

use nalgebra::Matrix4;

use crate::pose::PoseMatrix;

/// Reference-counted camera pixel buffer.
///
/// Pixel bytes are private; consumers read dimensions and hand the buffer
/// to a GPU upload path as an opaque blob via [`PixelBuffer::bytes`].
/// Sharing is by `Arc` so the external texture surface can hold a
/// reference past the point where the backend recycles its own storage.
pub struct PixelBuffer {
    data: Vec<u8>,

    /// Buffer dimensions in pixels.
    pub width: u32,
    pub height: u32,

    /// Monotonic capture instant, for staleness diagnostics.
    captured_at: Instant,
}

impl PixelBuffer {
    /// Create a new pixel buffer. Called by tracking backends.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            captured_at: Instant::now(),
        }
    }

    /// Raw bytes for the texture upload path.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length of the pixel payload.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Age of this buffer since capture.
    pub fn age_secs(&self) -> u64 {
        self.captured_at.elapsed().as_secs()
    }
}

/// Surface categories a hit test may query, in decreasing confidence.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitCategory {
    /// Previously confirmed plane with accumulated geometry.
    ExistingPlaneGeometry,
    /// Lower-confidence horizontal plane inferred from a single ray.
    EstimatedHorizontalPlane,
    /// Lower-confidence vertical plane inferred from a single ray.
    EstimatedVerticalPlane,
}

/// One hit-test result: where a projected ray met a known surface.
#[derive(Clone, Debug)]
pub struct SurfaceHit {
    /// World transform of the intersection.
    pub world_transform: Matrix4<f32>,
    /// Category of the surface that produced this hit.
    pub category: HitCategory,
}

impl SurfaceHit {
    /// World-space position of the hit: the translation column of the
    /// transform. Rotation and scale are discarded.
    pub fn world_position(&self) -> [f32; 3] {
        let m = &self.world_transform;
        [m[(0, 3)], m[(1, 3)], m[(2, 3)]]
    }
}

/// Hit-test boundary against the backend's live scene understanding.
///
/// Implementations must return results ordered nearest-to-camera first
/// within each call; the core selects the first result of the winning
/// tier without re-sorting. A backend whose platform does not guarantee
/// distance ordering must sort before returning.
pub trait SurfaceQuery: Send + Sync {
    /// Intersect the projected ray for screen point `(x, y)` against
    /// surfaces of the requested categories. An empty result is the
    /// normal "no surface found" outcome, never an error.
    fn hit_test(&self, x: f64, y: f64, categories: &[HitCategory]) -> Vec<SurfaceHit>;
}

/// Scene understanding with no queryable surfaces.
///
/// Used by backends before any plane has been detected.
pub struct NoSurfaces;

impl SurfaceQuery for NoSurfaces {
    fn hit_test(&self, _x: f64, _y: f64, _categories: &[HitCategory]) -> Vec<SurfaceHit> {
        Vec::new()
    }
}

/// Immutable snapshot produced once per tracking tick.
///
/// Exactly one frame is "current" at any time; the crate keeps no frame
/// history. Cheap to share: the pixel payload and scene understanding
/// are both behind `Arc`.
pub struct TrackedFrame {
    /// Camera pose for this tick (camera-to-world transform).
    pub camera_transform: Matrix4<f32>,

    /// The captured camera image.
    pub pixel_buffer: Arc<PixelBuffer>,

    /// Queryable surface estimates, opaque to this crate.
    pub surfaces: Arc<dyn SurfaceQuery>,
}

impl TrackedFrame {
    pub fn new(
        camera_transform: Matrix4<f32>,
        pixel_buffer: Arc<PixelBuffer>,
        surfaces: Arc<dyn SurfaceQuery>,
    ) -> Self {
        Self {
            camera_transform,
            pixel_buffer,
            surfaces,
        }
    }

    /// Flatten this frame's camera pose. Re-derived fresh per call; the
    /// result is a value type with no ties to the frame's lifetime.
    pub fn pose_matrix(&self) -> PoseMatrix {
        PoseMatrix::from_transform(&self.camera_transform)
    }

    /// Hit-test this frame's surfaces at a screen point.
    pub fn hit_test(&self, x: f64, y: f64, categories: &[HitCategory]) -> Vec<SurfaceHit> {
        self.surfaces.hit_test(x, y, categories)
    }
}
