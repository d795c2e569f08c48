//! Pose stream publisher.
//!
//! On every tracked frame the publisher flattens the camera pose and
//! delivers it to the registered listener, if any. Delivery is
//! asynchronous and main-thread-affine: the consuming runtime expects
//! updates on its own event loop, so the publisher hands each delivery
//! to a [`Scheduler`] instead of calling the listener inline from the
//! tracking thread.
//!
//! There is at most one listener, stored as an explicit `Option` and
//! mutated only through `subscribe`/`unsubscribe`. Missed poses are not
//! buffered: with no listener registered, the flattening is skipped
//! entirely.

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::frame::TrackedFrame;
use crate::pose::PoseMatrix;

/// A unit of work redirected onto the designated scheduling context.
pub type Task = Box<dyn FnOnce() + Send>;

/// Listener for the pose stream.
pub type PoseListener = Arc<dyn Fn(PoseMatrix) + Send + Sync>;

/// Redirects tasks onto the scheduling context the consumer's event or
/// render loop runs on. Implementations must not execute the task
/// inline on the calling thread in production; tests may.
pub trait Scheduler: Send + Sync {
    fn dispatch(&self, task: Task);
}

/// Scheduler backed by a task channel drained by the consumer's loop.
///
/// The receiving side is handed to whatever loop the consuming runtime
/// designates; every dispatched task runs there, in order.
pub struct EventLoopScheduler {
    tx: Sender<Task>,
}

impl EventLoopScheduler {
    /// Create the scheduler and the receiver its designated loop drains.
    pub fn new() -> (Arc<Self>, Receiver<Task>) {
        let (tx, rx) = unbounded();
        (Arc::new(Self { tx }), rx)
    }
}

impl Scheduler for EventLoopScheduler {
    fn dispatch(&self, task: Task) {
        // A closed receiver means the consumer loop is gone; dropping
        // the task matches pause-time semantics (deliveries are lossy).
        if self.tx.send(task).is_err() {
            log::debug!("pose delivery dropped: scheduler receiver closed");
        }
    }
}

/// Publishes each frame's pose to the single registered listener.
pub struct PosePublisher {
    scheduler: Arc<dyn Scheduler>,
    listener: Mutex<Option<PoseListener>>,
}

impl PosePublisher {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            listener: Mutex::new(None),
        }
    }

    /// Register the listener, replacing any previous one.
    pub fn subscribe(&self, listener: PoseListener) {
        *self.listener.lock() = Some(listener);
    }

    /// Clear the listener. Deliveries already scheduled may still run.
    pub fn unsubscribe(&self) {
        *self.listener.lock() = None;
    }

    /// Whether a listener is currently registered.
    pub fn has_listener(&self) -> bool {
        self.listener.lock().is_some()
    }

    /// Publish one frame's pose. Skipped entirely when unsubscribed;
    /// otherwise the flattened pose is dispatched asynchronously to the
    /// designated scheduling context.
    pub fn publish(&self, frame: &TrackedFrame) {
        let Some(listener) = self.listener.lock().clone() else {
            return;
        };
        let pose = frame.pose_matrix();
        self.scheduler.dispatch(Box::new(move || listener(pose)));
    }
}
