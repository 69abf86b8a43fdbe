use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use fma_core::config::GameConfig;

use crate::icon;

/// Create the game window with its fixed title, logical size and generated
/// icon. Window creation failure is fatal: there is nothing to fall back to.
pub fn create_window(event_loop: &ActiveEventLoop, config: &GameConfig) -> Arc<Window> {
    let attrs = WindowAttributes::default()
        .with_title(&config.window_title)
        .with_window_icon(Some(icon::window_icon()))
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.screen_width,
            config.screen_height,
        ));

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    log::info!(
        "Window created: '{}' {}x{}",
        config.window_title,
        config.screen_width,
        config.screen_height
    );
    Arc::new(window)
}
