//! Camera texture bridge.
//!
//! Exposes the latest camera pixel buffer to an external, GPU-backed
//! texture surface without copying through the querying caller. The
//! bridge is double-buffered by reference: it holds exactly one `Arc`
//! to the most recent buffer, and the consumer clones that `Arc` out
//! on demand, decoupled from the frame-arrival rate.
//!
//! Readiness signalling is paced: at most one `frame_available` signal
//! is outstanding until the consumer acknowledges it, so a slow render
//! loop is never flooded with signals it cannot keep up with.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::frame::PixelBuffer;

/// Opaque identifier issued by a [`TextureRegistry`].
///
/// The caller surfaces this to its rendering layer, which uses it to
/// pull frames from the registered surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub i64);

/// External texture registry the bridge registers with.
///
/// This is the boundary to the consuming rendering runtime. `register`
/// is called exactly once per bridge, at construction; `frame_available`
/// is a readiness signal only and transfers no data.
pub trait TextureRegistry: Send + Sync {
    /// Register a texture surface, yielding its opaque handle.
    fn register(&self) -> TextureHandle;

    /// Signal that a new frame is ready to be pulled for `handle`.
    fn frame_available(&self, handle: TextureHandle);
}

/// Double-buffered handoff between the tracking backend and an external
/// texture surface.
pub struct TextureBridge {
    registry: Arc<dyn TextureRegistry>,
    handle: TextureHandle,
    latest: Mutex<Option<Arc<PixelBuffer>>>,

    /// A readiness signal has been sent and not yet acknowledged.
    signal_outstanding: AtomicBool,
    /// A buffer landed while a signal was outstanding.
    dirty_while_signalled: AtomicBool,
}

impl TextureBridge {
    /// Create the bridge and register it with the external registry.
    /// Registration happens exactly once, here.
    pub fn new(registry: Arc<dyn TextureRegistry>) -> Self {
        let handle = registry.register();
        log::info!("texture bridge registered with handle {:?}", handle);
        Self {
            registry,
            handle,
            latest: Mutex::new(None),
            signal_outstanding: AtomicBool::new(false),
            dirty_while_signalled: AtomicBool::new(false),
        }
    }

    /// The opaque handle issued at registration.
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Replace the exposed buffer reference. O(1), never blocks on the
    /// rendering consumer; the superseded buffer's reference is released
    /// here.
    pub fn update(&self, buffer: Arc<PixelBuffer>) {
        *self.latest.lock() = Some(buffer);
        if self.signal_outstanding.load(Ordering::Acquire) {
            self.dirty_while_signalled.store(true, Ordering::Release);
        }
    }

    /// Retained reference to the latest buffer, or `None` before the
    /// first frame. The returned `Arc` stays valid across any number of
    /// subsequent `update` calls.
    pub fn copy_current_buffer(&self) -> Option<Arc<PixelBuffer>> {
        self.latest.lock().clone()
    }

    /// Signal the consumer that a new frame is ready to be pulled.
    ///
    /// No-op when no buffer has been published yet. While a previous
    /// signal is unacknowledged the call is absorbed; the pending update
    /// is re-signalled on acknowledgement instead.
    pub fn notify_frame_available(&self) {
        if self.latest.lock().is_none() {
            return;
        }
        if self
            .signal_outstanding
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.dirty_while_signalled.store(true, Ordering::Release);
            return;
        }
        self.dirty_while_signalled.store(false, Ordering::Release);
        self.registry.frame_available(self.handle);
    }

    /// Consumer acknowledgement for a previously sent signal. If a newer
    /// buffer arrived while the signal was outstanding, the bridge
    /// re-signals immediately so the consumer never stalls on a frame it
    /// was never told about.
    pub fn acknowledge_consumed(&self) {
        self.signal_outstanding.store(false, Ordering::Release);
        if self.dirty_while_signalled.swap(false, Ordering::AcqRel) {
            self.notify_frame_available();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct RecordingRegistry {
        next_id: AtomicUsize,
        signals: AtomicUsize,
    }

    impl RecordingRegistry {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                next_id: AtomicUsize::new(7),
                signals: AtomicUsize::new(0),
            })
        }

        fn signal_count(&self) -> usize {
            self.signals.load(Ordering::SeqCst)
        }
    }

    impl TextureRegistry for RecordingRegistry {
        fn register(&self) -> TextureHandle {
            TextureHandle(self.next_id.fetch_add(1, Ordering::SeqCst) as i64)
        }

        fn frame_available(&self, _handle: TextureHandle) {
            self.signals.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn buffer() -> Arc<PixelBuffer> {
        Arc::new(PixelBuffer::new(vec![0u8; 16], 2, 2))
    }

    #[test]
    fn registers_once_at_construction() {
        let registry = RecordingRegistry::new();
        let bridge = TextureBridge::new(registry.clone());
        assert_eq!(bridge.handle(), TextureHandle(7));
        assert_eq!(registry.next_id.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn copy_returns_latest_and_releases_superseded() {
        let bridge = TextureBridge::new(RecordingRegistry::new());
        let a = buffer();
        let b = buffer();
        assert_eq!(Arc::strong_count(&a), 1);

        bridge.update(a.clone());
        assert_eq!(Arc::strong_count(&a), 2);

        bridge.update(b.clone());
        // Exactly one reference to `a` was dropped by the replacement.
        assert_eq!(Arc::strong_count(&a), 1);

        let current = bridge.copy_current_buffer().expect("buffer published");
        assert!(Arc::ptr_eq(&current, &b));

        // The retained copy survives further replacement.
        bridge.update(buffer());
        assert!(Arc::ptr_eq(&current, &b));
    }

    #[test]
    fn copy_before_first_frame_is_none() {
        let bridge = TextureBridge::new(RecordingRegistry::new());
        assert!(bridge.copy_current_buffer().is_none());
    }

    #[test]
    fn notify_without_buffer_is_noop() {
        let registry = RecordingRegistry::new();
        let bridge = TextureBridge::new(registry.clone());
        bridge.notify_frame_available();
        assert_eq!(registry.signal_count(), 0);
    }

    #[test]
    fn signals_are_paced_by_acknowledgement() {
        let registry = RecordingRegistry::new();
        let bridge = TextureBridge::new(registry.clone());

        bridge.update(buffer());
        bridge.notify_frame_available();
        assert_eq!(registry.signal_count(), 1);

        // Further updates while unacknowledged are absorbed.
        bridge.update(buffer());
        bridge.notify_frame_available();
        bridge.update(buffer());
        bridge.notify_frame_available();
        assert_eq!(registry.signal_count(), 1);

        // Acknowledgement releases the pending update as one new signal.
        bridge.acknowledge_consumed();
        assert_eq!(registry.signal_count(), 2);

        // Quiescent acknowledge does not signal again.
        bridge.acknowledge_consumed();
        assert_eq!(registry.signal_count(), 2);
    }
}
