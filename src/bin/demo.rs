//! demo - end-to-end synthetic run of the AR session bridge.
//!
//! Wires the bridge to the synthetic backend, drains the scheduler
//! channel as the designated "main thread", simulates a render loop
//! pulling texture frames, and fires a raycast against a scripted
//! plane before pausing.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use clap::Parser;
use nalgebra::Matrix4;

use ar_bridge::{
    ArBridge, BridgeConfig, EventLoopScheduler, HitCategory, SurfaceHit, SyntheticBackend,
    SyntheticScene, TextureHandle, TextureRegistry,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Duration of the synthetic run in seconds.
    #[arg(long, default_value_t = 5)]
    seconds: u64,
    /// Frames per second for the synthetic backend (overrides config).
    #[arg(long)]
    fps: Option<u32>,
}

/// Registry standing in for the consuming runtime's texture registry.
struct ConsoleRegistry {
    next_id: AtomicI64,
    signals: AtomicU64,
}

impl TextureRegistry for ConsoleRegistry {
    fn register(&self) -> TextureHandle {
        TextureHandle(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn frame_available(&self, handle: TextureHandle) {
        let n = self.signals.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("frame available for {:?} (signal {})", handle, n);
    }
}

fn scripted_scene() -> SyntheticScene {
    let mut transform = Matrix4::<f32>::identity();
    transform[(0, 3)] = 0.5;
    transform[(1, 3)] = -1.2;
    transform[(2, 3)] = 3.0;
    SyntheticScene::with_hits(vec![SurfaceHit {
        world_transform: transform,
        category: HitCategory::EstimatedHorizontalPlane,
    }])
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = BridgeConfig::load()?;
    if let Some(fps) = args.fps {
        if fps == 0 {
            return Err(anyhow!("fps must be >= 1"));
        }
        config.session.target_fps = fps;
    }

    let registry = Arc::new(ConsoleRegistry {
        next_id: AtomicI64::new(1),
        signals: AtomicU64::new(0),
    });
    let (scheduler, pose_rx) = EventLoopScheduler::new();

    let bridge = ArBridge::new(
        Box::new(SyntheticBackend::new(scripted_scene())),
        registry.clone(),
        scheduler,
        config.tracking(),
    );

    if !bridge.is_supported() {
        log::warn!("world tracking unavailable; nothing to demo");
        return Ok(());
    }

    let handle = bridge.register_texture();
    log::info!("texture registered as {:?}", handle);

    let poses = Arc::new(AtomicU64::new(0));
    let pose_count = poses.clone();
    bridge.on_pose_update(Arc::new(move |pose| {
        let n = pose_count.fetch_add(1, Ordering::SeqCst) + 1;
        if n % 30 == 1 {
            let [x, y, z] = pose.translation();
            log::info!("pose {}: camera at ({:.2}, {:.2}, {:.2})", n, x, y, z);
        }
    }));

    let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let stop_flag = stop.clone();
    ctrlc::set_handler(move || stop_flag.store(true, Ordering::SeqCst))?;

    // This loop is the designated scheduling context: every pose
    // delivery runs here, and the simulated render pull happens here.
    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    while Instant::now() < deadline && !stop.load(Ordering::SeqCst) {
        while let Ok(task) = pose_rx.recv_timeout(Duration::from_millis(20)) {
            task();
            if Instant::now() >= deadline || stop.load(Ordering::SeqCst) {
                break;
            }
        }
        if let Some(buffer) = bridge.copy_current_buffer() {
            log::debug!("pulled {}x{} buffer ({} bytes)", buffer.width, buffer.height, buffer.byte_len());
            bridge.acknowledge_frame_consumed(handle);
        }
    }

    match bridge.raycast(100.0, 200.0)? {
        Some([x, y, z]) => log::info!("raycast hit at ({:.2}, {:.2}, {:.2})", x, y, z),
        None => log::info!("raycast found no surface"),
    }

    bridge.clear_pose_listener();
    log::info!(
        "done: {} poses delivered, {} texture signals, state {:?}",
        poses.load(Ordering::SeqCst),
        registry.signals.load(Ordering::SeqCst),
        bridge.state()
    );
    Ok(())
}
