//! Tiered raycast policy.
//!
//! Resolves a 2D screen point against the latest tracked frame's surface
//! estimates. Tiers are evaluated in strict order and the first
//! non-empty result set wins:
//!
//! 1. Existing detected-plane geometry (confirmed physical surfaces).
//! 2. Estimated horizontal and vertical planes (inferred, lower
//!    confidence).
//! 3. No hit.
//!
//! Within a tier the first backend-ordered result is selected; the
//! backend contract requires nearest-to-camera ordering and this module
//! does not re-sort. The absence of a hit is a normal result, never an
//! error: the only hard failure at this boundary is a malformed request.

use thiserror::Error;

use crate::frame::{HitCategory, TrackedFrame};

/// Validated tap-query request.
///
/// Coordinates arrive from an untyped caller boundary; validation
/// rejects malformed values before they reach the hit-test path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapRequest {
    pub x: f64,
    pub y: f64,
}

impl TapRequest {
    /// Validate raw tap coordinates. Non-finite values are rejected;
    /// out-of-view coordinates are accepted and simply miss.
    pub fn new(x: f64, y: f64) -> Result<Self, TapError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(TapError::InvalidCoordinates { x, y });
        }
        Ok(Self { x, y })
    }
}

/// Rejection of a malformed raycast request. This is the only error
/// that crosses the facade boundary; session state is unaffected.
#[derive(Debug, Error, PartialEq)]
pub enum TapError {
    #[error("invalid_argument: tap coordinates must be finite, got ({x}, {y})")]
    InvalidCoordinates { x: f64, y: f64 },
}

/// First-tier categories: confirmed plane geometry.
const EXISTING_PLANES: &[HitCategory] = &[HitCategory::ExistingPlaneGeometry];

/// Second-tier categories: estimated planes, both orientations.
const ESTIMATED_PLANES: &[HitCategory] = &[
    HitCategory::EstimatedHorizontalPlane,
    HitCategory::EstimatedVerticalPlane,
];

/// Resolve a tap against a frame, or `None` when no surface is found.
///
/// Returns the translation component of the winning hit's world
/// transform. Callers distinguish "no session frame yet" from "queried
/// and missed" via the session lifecycle state, not this return value.
pub fn raycast(frame: &TrackedFrame, request: TapRequest) -> Option<[f32; 3]> {
    let mut results = frame.hit_test(request.x, request.y, EXISTING_PLANES);
    if results.is_empty() {
        results = frame.hit_test(request.x, request.y, ESTIMATED_PLANES);
    }
    results.first().map(|hit| hit.world_position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{NoSurfaces, PixelBuffer, SurfaceHit, SurfaceQuery};
    use nalgebra::Matrix4;
    use std::sync::Arc;

    /// Scripted scene: fixed hits per category, returned in insertion
    /// order like a platform's distance-sorted result list.
    struct ScriptedSurfaces {
        hits: Vec<SurfaceHit>,
    }

    impl SurfaceQuery for ScriptedSurfaces {
        fn hit_test(&self, _x: f64, _y: f64, categories: &[HitCategory]) -> Vec<SurfaceHit> {
            self.hits
                .iter()
                .filter(|hit| categories.contains(&hit.category))
                .cloned()
                .collect()
        }
    }

    fn translated(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        let mut m = Matrix4::identity();
        m[(0, 3)] = x;
        m[(1, 3)] = y;
        m[(2, 3)] = z;
        m
    }

    fn frame_with(hits: Vec<SurfaceHit>) -> TrackedFrame {
        TrackedFrame::new(
            Matrix4::identity(),
            Arc::new(PixelBuffer::new(vec![0u8; 16], 2, 2)),
            Arc::new(ScriptedSurfaces { hits }),
        )
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        assert!(TapRequest::new(f64::NAN, 1.0).is_err());
        assert!(TapRequest::new(1.0, f64::INFINITY).is_err());
        assert!(TapRequest::new(100.0, 200.0).is_ok());
    }

    #[test]
    fn estimated_plane_hit_when_no_existing_plane() {
        let frame = frame_with(vec![SurfaceHit {
            world_transform: translated(0.5, -1.2, 3.0),
            category: HitCategory::EstimatedHorizontalPlane,
        }]);
        let result = raycast(&frame, TapRequest::new(100.0, 200.0).unwrap());
        assert_eq!(result, Some([0.5, -1.2, 3.0]));
    }

    #[test]
    fn existing_plane_beats_estimated_at_same_point() {
        let frame = frame_with(vec![
            SurfaceHit {
                world_transform: translated(9.0, 9.0, 9.0),
                category: HitCategory::EstimatedHorizontalPlane,
            },
            SurfaceHit {
                world_transform: translated(1.0, 2.0, 3.0),
                category: HitCategory::ExistingPlaneGeometry,
            },
        ]);
        let result = raycast(&frame, TapRequest::new(50.0, 50.0).unwrap());
        assert_eq!(result, Some([1.0, 2.0, 3.0]));
    }

    #[test]
    fn first_result_wins_within_a_tier() {
        let frame = frame_with(vec![
            SurfaceHit {
                world_transform: translated(1.0, 0.0, 0.0),
                category: HitCategory::ExistingPlaneGeometry,
            },
            SurfaceHit {
                world_transform: translated(2.0, 0.0, 0.0),
                category: HitCategory::ExistingPlaneGeometry,
            },
        ]);
        let result = raycast(&frame, TapRequest::new(50.0, 50.0).unwrap());
        assert_eq!(result, Some([1.0, 0.0, 0.0]));
    }

    #[test]
    fn vertical_estimates_participate_in_the_second_tier() {
        let frame = frame_with(vec![SurfaceHit {
            world_transform: translated(0.0, 1.5, -2.0),
            category: HitCategory::EstimatedVerticalPlane,
        }]);
        let result = raycast(&frame, TapRequest::new(10.0, 10.0).unwrap());
        assert_eq!(result, Some([0.0, 1.5, -2.0]));
    }

    #[test]
    fn empty_scene_is_a_miss_not_an_error() {
        let frame = TrackedFrame::new(
            Matrix4::identity(),
            Arc::new(PixelBuffer::new(vec![0u8; 16], 2, 2)),
            Arc::new(NoSurfaces),
        );
        assert_eq!(raycast(&frame, TapRequest::new(0.0, 0.0).unwrap()), None);
    }
}
