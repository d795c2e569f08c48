//! Tracking backend boundary.
//!
//! The platform tracking subsystem (camera + motion fusion, plane
//! detection) sits behind this trait as a black box. The crate drives
//! its lifecycle and consumes its frames; it never looks inside.

use std::sync::Arc;

use anyhow::Result;

use crate::frame::TrackedFrame;

/// Receiver for frames delivered by a backend.
///
/// Backends call `deliver` from their own delivery thread, serially:
/// a backend must never invoke the sink concurrently with itself.
pub trait FrameSink: Send + Sync {
    fn deliver(&self, frame: TrackedFrame);
}

/// Session parameters handed to the backend on resume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackingConfig {
    /// Target frame delivery rate.
    pub target_fps: u32,
    /// Camera buffer width in pixels.
    pub width: u32,
    /// Camera buffer height in pixels.
    pub height: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            width: 640,
            height: 480,
        }
    }
}

/// World-tracking backend.
///
/// # Contract
///
/// - `is_supported` is a pure probe with no side effects; it may be
///   called before any lifecycle operation.
/// - `resume` begins (or restarts) frame delivery to `sink` and must be
///   idempotent when already delivering. Configuration is re-applied on
///   every resume.
/// - `pause` stops future deliveries without destroying configuration
///   and must be idempotent when already paused. A frame already being
///   delivered when `pause` is called may still arrive once.
/// - Frame delivery is serialized; see [`FrameSink`].
pub trait TrackingBackend: Send {
    /// Backend identifier, for logs.
    fn name(&self) -> &'static str;

    /// Whether this device supports world tracking.
    fn is_supported(&self) -> bool;

    /// Begin or restart frame delivery.
    fn resume(&mut self, config: &TrackingConfig, sink: Arc<dyn FrameSink>) -> Result<()>;

    /// Stop frame delivery, keeping configuration.
    fn pause(&mut self) -> Result<()>;
}
