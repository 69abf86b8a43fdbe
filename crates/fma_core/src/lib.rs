pub mod config;
pub mod input;
pub mod time;

pub use config::GameConfig;
pub use input::{InputState, Key};
pub use time::{FrameClock, FrameLimiter};
