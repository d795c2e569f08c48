//! Single-slot latest-wins frame channel.
//!
//! The tracking backend publishes every tick; consumers (pose publisher,
//! raycast) only ever care about the most recent frame. This is a slot,
//! not a queue: publishing replaces the previous frame, which is dropped
//! the moment its successor lands.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::frame::TrackedFrame;

/// Holder of the current [`TrackedFrame`].
///
/// All mutation happens on the backend's serialized delivery thread;
/// readers take an atomic snapshot by cloning the `Arc`, never holding
/// the lock across their own work.
pub struct FrameSlot {
    current: RwLock<Option<Arc<TrackedFrame>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Replace the current frame. The superseded frame is released here
    /// unless a reader still holds a snapshot of it.
    pub fn publish(&self, frame: Arc<TrackedFrame>) {
        *self.current.write() = Some(frame);
    }

    /// Snapshot the current frame, if any frame has arrived yet.
    pub fn snapshot(&self) -> Option<Arc<TrackedFrame>> {
        self.current.read().clone()
    }

    /// Whether any frame has been published.
    pub fn has_frame(&self) -> bool {
        self.current.read().is_some()
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{NoSurfaces, PixelBuffer};
    use nalgebra::Matrix4;

    fn frame() -> Arc<TrackedFrame> {
        Arc::new(TrackedFrame::new(
            Matrix4::identity(),
            Arc::new(PixelBuffer::new(vec![0; 16], 2, 2)),
            Arc::new(NoSurfaces),
        ))
    }

    #[test]
    fn latest_wins() {
        let slot = FrameSlot::new();
        assert!(slot.snapshot().is_none());
        assert!(!slot.has_frame());

        let a = frame();
        let b = frame();
        slot.publish(a.clone());
        slot.publish(b.clone());

        let seen = slot.snapshot().expect("frame published");
        assert!(Arc::ptr_eq(&seen, &b));
        // Slot dropped its reference to the superseded frame.
        assert_eq!(Arc::strong_count(&a), 1);
    }

    #[test]
    fn snapshot_outlives_replacement() {
        let slot = FrameSlot::new();
        let a = frame();
        slot.publish(a.clone());
        let held = slot.snapshot().expect("frame published");
        slot.publish(frame());
        // The reader's snapshot is still valid after replacement.
        assert!(Arc::ptr_eq(&held, &a));
    }
}
