//! Process-wide constant configuration.
//!
//! A single `GameConfig` value is constructed in `main` and passed by
//! reference to every subsystem. Nothing reads configuration through
//! globals, and nothing mutates it after construction.

use std::path::PathBuf;
use std::time::Duration;

/// An opaque RGB triple. Asset synthesis and the clear color both use
/// plain byte channels; alpha is a per-call concern.
pub type Rgb = [u8; 3];

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed window title; there is no runtime rename.
    pub window_title: String,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Upper bound on the frame rate. The loop sleeps out the remainder
    /// of each frame budget; it never guarantees hitting this rate.
    pub target_fps: u32,
    /// Color the surface is cleared to before the scene draws.
    pub background: Rgb,
    /// Root under which the asset directory tree lives.
    pub asset_root: PathBuf,
}

impl GameConfig {
    /// Wall-clock budget of a single frame at the configured cap.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps as f64)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_title: "Fire Mage Adventure".to_string(),
            screen_width: 1280,
            screen_height: 720,
            target_fps: 60,
            background: [0, 0, 0],
            asset_root: PathBuf::from("assets"),
        }
    }
}
