//! Bridge configuration.
//!
//! JSON config file (path in `ARBRIDGE_CONFIG`) with per-field
//! environment overrides, used by the demo binary and embedders that
//! want file-driven session parameters. Everything has a default; an
//! empty environment yields a valid configuration.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::session::backend::TrackingConfig;

const DEFAULT_TARGET_FPS: u32 = 30;
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;

#[derive(Debug, Deserialize, Default)]
struct BridgeConfigFile {
    session: Option<SessionConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SessionConfigFile {
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub session: SessionSettings,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

impl BridgeConfig {
    /// Load from `ARBRIDGE_CONFIG` (if set), then apply env overrides,
    /// then validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("ARBRIDGE_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: BridgeConfigFile) -> Self {
        let session = SessionSettings {
            target_fps: file
                .session
                .as_ref()
                .and_then(|s| s.target_fps)
                .unwrap_or(DEFAULT_TARGET_FPS),
            width: file
                .session
                .as_ref()
                .and_then(|s| s.width)
                .unwrap_or(DEFAULT_WIDTH),
            height: file
                .session
                .and_then(|s| s.height)
                .unwrap_or(DEFAULT_HEIGHT),
        };
        Self { session }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(fps) = std::env::var("ARBRIDGE_FPS") {
            self.session.target_fps = fps
                .parse()
                .map_err(|_| anyhow!("ARBRIDGE_FPS must be an integer frame rate"))?;
        }
        if let Ok(width) = std::env::var("ARBRIDGE_WIDTH") {
            self.session.width = width
                .parse()
                .map_err(|_| anyhow!("ARBRIDGE_WIDTH must be an integer pixel width"))?;
        }
        if let Ok(height) = std::env::var("ARBRIDGE_HEIGHT") {
            self.session.height = height
                .parse()
                .map_err(|_| anyhow!("ARBRIDGE_HEIGHT must be an integer pixel height"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.session.target_fps == 0 {
            return Err(anyhow!("session.target_fps must be at least 1"));
        }
        if self.session.width == 0 || self.session.height == 0 {
            return Err(anyhow!("session dimensions must be non-zero"));
        }
        Ok(())
    }

    /// The backend-facing subset of the configuration.
    pub fn tracking(&self) -> TrackingConfig {
        TrackingConfig {
            target_fps: self.session.target_fps,
            width: self.session.width,
            height: self.session.height,
        }
    }
}

fn read_config_file(path: &Path) -> Result<BridgeConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| anyhow!("failed to read config {}: {}", path.display(), err))?;
    serde_json::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {}", path.display(), err))
}
