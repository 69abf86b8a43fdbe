//! Asset bootstrap for Fire Mage Adventure.
//!
//! Before the frame loop starts, this crate guarantees a playable asset
//! surface: the directory tree exists (`bootstrap`), and every expected
//! image file exists (`synth`); hand-authored art is left alone, art under
//! the old flat layout is migrated, and anything still missing is drawn
//! procedurally as a placeholder.
//!
//! Both passes are idempotent: a second run performs zero filesystem writes.

pub mod bootstrap;
pub mod draw;
pub mod error;
pub mod layout;
pub mod synth;

pub use bootstrap::ensure_directories;
pub use error::AssetError;
pub use synth::{synthesize_all, SynthReport};
