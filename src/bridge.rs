//! Session facade.
//!
//! `ArBridge` is the single entry point the rendering/UI layer talks
//! to: lifecycle control, the texture handle, the pose subscription,
//! and tap queries. Each operation routes to the owning component; the
//! facade itself holds no per-frame state.

use std::sync::Arc;

use crate::publisher::{PoseListener, PosePublisher, Scheduler};
use crate::raycast::{raycast, TapError, TapRequest};
use crate::session::backend::{TrackingBackend, TrackingConfig};
use crate::session::{SessionController, SessionState};
use crate::slot::FrameSlot;
use crate::texture::{TextureBridge, TextureHandle, TextureRegistry};

/// Bridge between a tracking backend and a consuming runtime.
pub struct ArBridge {
    controller: SessionController,
    texture: Arc<TextureBridge>,
    publisher: Arc<PosePublisher>,
    slot: Arc<FrameSlot>,
}

impl ArBridge {
    /// Wire the bridge. The texture bridge registers with `registry`
    /// here, once; the session stays Idle until `start` or the first
    /// pose subscription.
    pub fn new(
        backend: Box<dyn TrackingBackend>,
        registry: Arc<dyn TextureRegistry>,
        scheduler: Arc<dyn Scheduler>,
        config: TrackingConfig,
    ) -> Self {
        let slot = Arc::new(FrameSlot::new());
        let texture = Arc::new(TextureBridge::new(registry));
        let publisher = Arc::new(PosePublisher::new(scheduler));
        let controller = SessionController::new(
            backend,
            config,
            slot.clone(),
            texture.clone(),
            publisher.clone(),
        );
        Self {
            controller,
            texture,
            publisher,
            slot,
        }
    }

    /// Capability probe. Callable before `start`; starts nothing.
    pub fn is_supported(&self) -> bool {
        self.controller.is_supported()
    }

    /// Current lifecycle state. This, not the raycast return value, is
    /// how callers distinguish "not started" from "started but nothing
    /// tracked yet".
    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    /// Start the tracking session. Fire-and-forget; soft no-op when
    /// unsupported or already running.
    pub fn start(&self) {
        self.controller.start();
    }

    /// Pause the tracking session. Fire-and-forget; idempotent. An
    /// already-scheduled pose delivery may still arrive once.
    pub fn pause(&self) {
        self.controller.pause();
    }

    /// The opaque texture handle the rendering layer pulls frames with.
    /// Registration happened at construction; this only surfaces the id.
    pub fn register_texture(&self) -> TextureHandle {
        self.texture.handle()
    }

    /// Subscribe the single pose listener. Replaces any previous
    /// listener and implicitly starts the session.
    pub fn on_pose_update(&self, listener: PoseListener) {
        self.publisher.subscribe(listener);
        self.controller.start();
    }

    /// Clear the pose listener and implicitly pause the session.
    pub fn clear_pose_listener(&self) {
        self.publisher.unsubscribe();
        self.controller.pause();
    }

    /// Retained reference to the latest camera buffer, for the texture
    /// upload path.
    pub fn copy_current_buffer(&self) -> Option<Arc<crate::frame::PixelBuffer>> {
        self.texture.copy_current_buffer()
    }

    /// Resolve a tap against the current frame.
    ///
    /// `Ok(None)` is the normal "no surface found" result, returned
    /// both on a miss and before any frame has arrived. The only error
    /// is malformed coordinates, which leaves session state untouched.
    pub fn raycast(&self, x: f64, y: f64) -> Result<Option<[f32; 3]>, TapError> {
        let request = TapRequest::new(x, y)?;
        let Some(frame) = self.slot.snapshot() else {
            return Ok(None);
        };
        Ok(raycast(&frame, request))
    }

    /// Acknowledge a previously signalled texture frame, releasing the
    /// next readiness signal. Unknown handles are ignored.
    pub fn acknowledge_frame_consumed(&self, handle: TextureHandle) {
        if handle != self.texture.handle() {
            log::debug!("acknowledge ignored for unknown handle {:?}", handle);
            return;
        }
        self.texture.acknowledge_consumed();
    }
}
