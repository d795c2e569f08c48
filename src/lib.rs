//! AR session bridge.
//!
//! This crate bridges a real-time, pose-tracked camera session to a
//! consuming rendering/UI layer living across a runtime boundary. It
//! drives the world-tracking lifecycle, streams each frame's camera
//! pose to a single listener on a designated scheduling context, hands
//! the latest camera buffer to an external texture surface with an
//! atomic reference swap, and answers "what surface is at this 2D
//! point" queries with a tiered hit-test policy.
//!
//! # Module Structure
//!
//! - `frame`: tracked-frame snapshot types (`PixelBuffer`,
//!   `TrackedFrame`, the `SurfaceQuery` hit-test boundary)
//! - `pose`: column-major 16-value pose flattening
//! - `slot`: single-slot latest-wins channel for the current frame
//! - `texture`: double-buffered camera texture handoff with paced
//!   readiness signalling
//! - `publisher`: single-subscriber pose stream, scheduler-redirected
//! - `raycast`: tap validation and the tiered raycast policy
//! - `session`: lifecycle state machine, backend trait, frame fan-out
//! - `bridge`: the `ArBridge` facade the embedder talks to
//! - `config`: JSON + env configuration

pub mod bridge;
pub mod config;
pub mod frame;
pub mod pose;
pub mod publisher;
pub mod raycast;
pub mod session;
pub mod slot;
pub mod texture;

pub use bridge::ArBridge;
pub use config::BridgeConfig;
pub use frame::{HitCategory, NoSurfaces, PixelBuffer, SurfaceHit, SurfaceQuery, TrackedFrame};
pub use pose::PoseMatrix;
pub use publisher::{EventLoopScheduler, PoseListener, PosePublisher, Scheduler, Task};
pub use raycast::{raycast, TapError, TapRequest};
pub use session::backend::{FrameSink, TrackingBackend, TrackingConfig};
pub use session::backends::{SyntheticBackend, SyntheticScene};
pub use session::{SessionController, SessionState};
pub use slot::FrameSlot;
pub use texture::{TextureBridge, TextureHandle, TextureRegistry};
