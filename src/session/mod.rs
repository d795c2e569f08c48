//! Tracking session lifecycle.
//!
//! The controller owns the backend handle and the Idle/Running/Paused
//! state machine; `FrameIngest` is the serialized landing point for
//! every delivered frame, fanning it out to the frame slot (raycast
//! source), the texture bridge, and the pose publisher.
//!
//! All lifecycle transitions are soft: an unsupported device, a
//! double start, or a redundant pause is logged and absorbed, never an
//! error. Backend failures on resume/pause are logged and leave the
//! previous state in place.

pub mod backend;
pub mod backends;

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::frame::TrackedFrame;
use crate::publisher::PosePublisher;
use crate::slot::FrameSlot;
use crate::texture::TextureBridge;
use backend::{FrameSink, TrackingBackend, TrackingConfig};

/// Lifecycle state of the tracking session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Created, never started.
    Idle,
    /// Delivering frames.
    Running,
    /// Stopped after running; restartable.
    Paused,
}

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_PAUSED: u8 = 2;

/// Lifecycle flag shared between the controller (writer) and the
/// frame-ingest path (reader on the backend's delivery thread).
pub(crate) struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            state: AtomicU8::new(STATE_IDLE),
        })
    }

    pub(crate) fn get(&self) -> SessionState {
        match self.state.load(Ordering::SeqCst) {
            STATE_RUNNING => SessionState::Running,
            STATE_PAUSED => SessionState::Paused,
            _ => SessionState::Idle,
        }
    }

    fn set(&self, state: SessionState) {
        let raw = match state {
            SessionState::Idle => STATE_IDLE,
            SessionState::Running => STATE_RUNNING,
            SessionState::Paused => STATE_PAUSED,
        };
        self.state.store(raw, Ordering::SeqCst);
    }
}

/// Per-tick fan-out for delivered frames.
///
/// Runs on the backend's serialized delivery thread. While the session
/// is not Running the frame is dropped: a delivery that raced a pause
/// never reaches the slot, the texture surface, or the pose listener.
pub struct FrameIngest {
    lifecycle: Arc<Lifecycle>,
    slot: Arc<FrameSlot>,
    texture: Arc<TextureBridge>,
    publisher: Arc<PosePublisher>,
    dropped: AtomicU64,
}

impl FrameIngest {
    fn new(
        lifecycle: Arc<Lifecycle>,
        slot: Arc<FrameSlot>,
        texture: Arc<TextureBridge>,
        publisher: Arc<PosePublisher>,
    ) -> Arc<Self> {
        Arc::new(Self {
            lifecycle,
            slot,
            texture,
            publisher,
            dropped: AtomicU64::new(0),
        })
    }

    /// Frames dropped because the session was not Running.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl FrameSink for FrameIngest {
    fn deliver(&self, frame: TrackedFrame) {
        if self.lifecycle.get() != SessionState::Running {
            let n = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("frame dropped while not running (total {})", n);
            return;
        }

        // Pose publication for this frame is scheduled before the next
        // frame can land; the slot and the texture slot are separate
        // locations but both stem from this single arrival.
        self.texture.update(frame.pixel_buffer.clone());
        let frame = Arc::new(frame);
        self.slot.publish(frame.clone());
        self.publisher.publish(&frame);
        self.texture.notify_frame_available();
    }
}

/// Owner of the tracking session lifecycle.
pub struct SessionController {
    lifecycle: Arc<Lifecycle>,
    backend: Mutex<Box<dyn TrackingBackend>>,
    config: TrackingConfig,
    ingest: Arc<FrameIngest>,
}

impl SessionController {
    pub fn new(
        backend: Box<dyn TrackingBackend>,
        config: TrackingConfig,
        slot: Arc<FrameSlot>,
        texture: Arc<TextureBridge>,
        publisher: Arc<PosePublisher>,
    ) -> Self {
        let lifecycle = Lifecycle::new();
        let ingest = FrameIngest::new(lifecycle.clone(), slot, texture, publisher);
        Self {
            lifecycle,
            backend: Mutex::new(backend),
            config,
            ingest,
        }
    }

    /// Capability probe. Pure query: starts nothing, changes nothing.
    pub fn is_supported(&self) -> bool {
        self.backend.lock().is_supported()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.lifecycle.get()
    }

    /// The serialized frame landing point, for wiring and diagnostics.
    pub fn ingest(&self) -> Arc<FrameIngest> {
        self.ingest.clone()
    }

    /// Start (or restart) the session.
    ///
    /// Unsupported capability is a soft failure: the call is skipped
    /// with a warning. Starting an already-running session is a no-op.
    pub fn start(&self) {
        let mut backend = self.backend.lock();
        if !backend.is_supported() {
            log::warn!(
                "world tracking not supported by backend '{}'; start skipped",
                backend.name()
            );
            return;
        }
        let previous = self.lifecycle.get();
        if previous == SessionState::Running {
            log::debug!("start ignored: session already running");
            return;
        }

        // Transition first: the backend may deliver from its own thread
        // before resume() returns.
        self.lifecycle.set(SessionState::Running);
        let sink: Arc<dyn FrameSink> = self.ingest.clone();
        if let Err(err) = backend.resume(&self.config, sink) {
            self.lifecycle.set(previous);
            log::error!("backend '{}' failed to resume: {:#}", backend.name(), err);
        }
    }

    /// Pause the session. Idempotent; frame delivery stops but
    /// configuration and already-published buffers stay valid.
    pub fn pause(&self) {
        let mut backend = self.backend.lock();
        if self.lifecycle.get() != SessionState::Running {
            log::debug!("pause ignored: session not running");
            return;
        }
        self.lifecycle.set(SessionState::Paused);
        if let Err(err) = backend.pause() {
            log::error!("backend '{}' failed to pause: {:#}", backend.name(), err);
        }
    }
}
