//! Synthetic tracking backend.
//!
//! Generates deterministic camera motion with noise-filled pixel
//! buffers on a driver thread at the configured rate. Stands in for a
//! real platform backend in tests and the demo binary, behind the same
//! trait.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use nalgebra::Matrix4;
use rand::RngCore;

use crate::frame::{HitCategory, PixelBuffer, SurfaceHit, SurfaceQuery, TrackedFrame};
use crate::session::backend::{FrameSink, TrackingBackend, TrackingConfig};

/// Scripted scene understanding: a fixed set of hits, returned in
/// insertion order (the synthetic stand-in for the platform's
/// nearest-first ordering).
pub struct SyntheticScene {
    hits: Vec<SurfaceHit>,
}

impl SyntheticScene {
    /// A scene with no detected surfaces.
    pub fn empty() -> Self {
        Self { hits: Vec::new() }
    }

    /// A scene answering every hit test with the given hits.
    pub fn with_hits(hits: Vec<SurfaceHit>) -> Self {
        Self { hits }
    }
}

impl SurfaceQuery for SyntheticScene {
    fn hit_test(&self, _x: f64, _y: f64, categories: &[HitCategory]) -> Vec<SurfaceHit> {
        self.hits
            .iter()
            .filter(|hit| categories.contains(&hit.category))
            .cloned()
            .collect()
    }
}

/// Synthetic world-tracking backend.
///
/// The driver thread delivers one frame per period while running. The
/// camera translates along +z by 1 cm per tick; the tick counter
/// survives pause/resume so motion is continuous across restarts.
pub struct SyntheticBackend {
    supported: bool,
    scene: Arc<SyntheticScene>,
    running: Arc<AtomicBool>,
    tick: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
}

impl SyntheticBackend {
    pub fn new(scene: SyntheticScene) -> Self {
        Self {
            supported: true,
            scene: Arc::new(scene),
            running: Arc::new(AtomicBool::new(false)),
            tick: Arc::new(AtomicU64::new(0)),
            worker: None,
        }
    }

    /// A backend that reports world tracking as unavailable, for
    /// exercising the soft-failure path.
    pub fn unsupported() -> Self {
        let mut backend = Self::new(SyntheticScene::empty());
        backend.supported = false;
        backend
    }

    fn stop_worker(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            // Bounded by one frame interval; keeps delivery serialized
            // across a pause/resume cycle.
            let _ = handle.join();
        }
    }
}

impl TrackingBackend for SyntheticBackend {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn resume(&mut self, config: &TrackingConfig, sink: Arc<dyn FrameSink>) -> Result<()> {
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }
        anyhow::ensure!(config.target_fps >= 1, "target_fps must be >= 1");

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();
        let tick = self.tick.clone();
        let scene = self.scene.clone();
        let config = *config;

        let handle = thread::spawn(move || {
            let period = Duration::from_secs_f64(1.0 / f64::from(config.target_fps));
            let mut rng = rand::thread_rng();
            let byte_len = (config.width * config.height * 4) as usize;

            while running.load(Ordering::SeqCst) {
                let n = tick.fetch_add(1, Ordering::SeqCst);

                let mut data = vec![0u8; byte_len];
                rng.fill_bytes(&mut data);
                let buffer = Arc::new(PixelBuffer::new(data, config.width, config.height));

                let mut transform = Matrix4::<f32>::identity();
                transform[(2, 3)] = n as f32 * 0.01;

                sink.deliver(TrackedFrame::new(transform, buffer, scene.clone()));
                thread::sleep(period);
            }
        });
        self.worker = Some(handle);
        log::info!("synthetic tracking resumed at {} fps", config.target_fps);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.stop_worker();
        log::info!("synthetic tracking paused at tick {}", self.tick.load(Ordering::SeqCst));
        Ok(())
    }
}

impl Drop for SyntheticBackend {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct CountingSink {
        frames: Mutex<Vec<TrackedFrame>>,
    }

    impl FrameSink for CountingSink {
        fn deliver(&self, frame: TrackedFrame) {
            self.frames.lock().push(frame);
        }
    }

    #[test]
    fn delivers_frames_while_running_and_stops_on_pause() {
        let sink = Arc::new(CountingSink {
            frames: Mutex::new(Vec::new()),
        });
        let mut backend = SyntheticBackend::new(SyntheticScene::empty());
        let config = TrackingConfig {
            target_fps: 200,
            width: 4,
            height: 4,
        };

        backend.resume(&config, sink.clone()).unwrap();
        thread::sleep(Duration::from_millis(50));
        backend.pause().unwrap();

        let delivered = sink.frames.lock().len();
        assert!(delivered > 0, "expected at least one frame");

        // No deliveries after pause has joined the worker.
        thread::sleep(Duration::from_millis(30));
        assert_eq!(sink.frames.lock().len(), delivered);
    }

    #[test]
    fn resume_is_idempotent_while_running() {
        let sink = Arc::new(CountingSink {
            frames: Mutex::new(Vec::new()),
        });
        let mut backend = SyntheticBackend::new(SyntheticScene::empty());
        let config = TrackingConfig {
            target_fps: 100,
            width: 4,
            height: 4,
        };
        backend.resume(&config, sink.clone()).unwrap();
        backend.resume(&config, sink.clone()).unwrap();
        backend.pause().unwrap();
    }

    #[test]
    fn unsupported_backend_reports_probe() {
        assert!(!SyntheticBackend::unsupported().is_supported());
        assert!(SyntheticBackend::new(SyntheticScene::empty()).is_supported());
    }
}
