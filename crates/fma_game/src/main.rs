//! Fire Mage Adventure -- runtime bootstrap and main loop entry point.
//!
//! Startup order: window and GPU surface first, then the asset bootstrap
//! (directory tree, legacy migration, placeholder synthesis), then the
//! frame loop. Each iteration inside `RedrawRequested`:
//!
//!   1. `clock.tick()` -- wall-clock delta for this iteration
//!   2. collaborator input -> update -> draw into the CPU quad batch
//!   3. stream the batch to the GPU and render; composite the FPS overlay
//!      when the debug flag is set
//!   4. present, then sleep out the rest of the frame budget
//!
//! winit delivers window events between redraws; they are classified into
//! `LoopEvent`s and fed to the state machine as they arrive, which is this
//! backend's form of draining the queue once per iteration.

mod runtime;
mod scene;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use fma_assets::layout;
use fma_core::config::GameConfig;
use fma_core::input::{InputState, Key};
use fma_core::time::{FrameClock, FrameLimiter};
use fma_devtools::FpsOverlay;
use fma_render::{GpuContext, QuadBatch, ScreenCamera, SpritePipeline, SpriteVertex, Texture};

use runtime::{FrameLoop, GameManager, LoopEvent, SceneFrame};
use scene::{ShellScene, PLAYER_TEXTURE, TILESET_TEXTURE};

/// All mutable engine state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window exists.
struct EngineState {
    config: GameConfig,
    window: Arc<Window>,
    gpu: GpuContext,
    sprite_pipeline: SpritePipeline,
    overlay: FpsOverlay,

    clock: FrameClock,
    limiter: FrameLimiter,
    frame_loop: FrameLoop,
    manager: Box<dyn GameManager>,

    // --- Per-frame GPU mesh state. Buffers grow (power-of-two) but never
    // shrink; bind groups keep their textures alive.
    batch: QuadBatch,
    textures: HashMap<&'static str, wgpu::BindGroup>,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
}

impl EngineState {
    fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self> {
        let gpu = GpuContext::new(window.clone());
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let overlay = FpsOverlay::new(&gpu.device, gpu.surface_format, &window);

        // The asset surface must be settled before anything draws.
        fma_assets::ensure_directories(&config.asset_root)
            .context("preparing the asset directory tree")?;
        fma_assets::synthesize_all(&config.asset_root)
            .context("synthesizing placeholder assets")?;

        let mut textures = HashMap::new();
        for (key, path) in [
            (TILESET_TEXTURE, layout::tileset(&config.asset_root)),
            (
                PLAYER_TEXTURE,
                layout::character_sheet(&config.asset_root, "fire_mage"),
            ),
        ] {
            let image = image::open(&path)
                .with_context(|| format!("loading texture '{}'", path.display()))?
                .to_rgba8();
            let texture = Texture::from_image(&gpu.device, &gpu.queue, &image, key);
            textures.insert(
                key,
                sprite_pipeline.create_texture_bind_group(&gpu.device, &texture),
            );
        }

        let camera = ScreenCamera::new(gpu.size.0, gpu.size.1);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 4);
        let index_buffer = create_index_buffer(&gpu.device, 6);

        let input = Rc::new(RefCell::new(InputState::new()));
        let manager: Box<dyn GameManager> = Box::new(ShellScene::new(config, input.clone()));
        let frame_loop = FrameLoop::new(input);

        Ok(Self {
            config: config.clone(),
            window,
            gpu,
            sprite_pipeline,
            overlay,
            // Constructed last: the first frame's delta is measured from here.
            clock: FrameClock::new(),
            limiter: FrameLimiter::new(config.frame_budget()),
            frame_loop,
            manager,
            batch: QuadBatch::new(),
            textures,
            camera_buffer,
            camera_bind_group,
            vertex_buffer,
            index_buffer,
            vertex_capacity: 4,
            index_capacity: 6,
        })
    }

    fn render_frame(&mut self) -> Result<()> {
        let delta = self.clock.tick();

        self.batch.clear();
        {
            let mut frame = SceneFrame {
                batch: &mut self.batch,
                viewport: self.gpu.size,
            };
            self.frame_loop
                .run_frame(self.manager.as_mut(), delta, &mut frame)?;
        }

        // Stream this frame's mesh.
        self.ensure_mesh_capacity(self.batch.vertices().len(), self.batch.indices().len());
        if !self.batch.is_empty() {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(self.batch.vertices()),
            );
            self.gpu.queue.write_buffer(
                &self.index_buffer,
                0,
                bytemuck::cast_slice(self.batch.indices()),
            );
        }

        let camera = ScreenCamera::new(self.gpu.size.0, self.gpu.size.1);
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.build_uniform()]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return Ok(());
        };

        let (primitives, textures_delta) =
            self.overlay
                .prepare(&self.window, &self.clock, self.frame_loop.debug_enabled());
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let [r, g, b] = self.config.background;
            let clear_color = wgpu::Color {
                r: r as f64 / 255.0,
                g: g as f64 / 255.0,
                b: b as f64 / 255.0,
                a: 1.0,
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            let mut bound: Option<&str> = None;
            for span in self.batch.spans() {
                let Some(bind_group) = self.textures.get(&*span.texture_key) else {
                    log::warn!("No texture uploaded for key '{}'", span.texture_key);
                    continue;
                };
                if bound != Some(&*span.texture_key) {
                    render_pass.set_bind_group(1, bind_group, &[]);
                    bound = Some(&*span.texture_key);
                }
                render_pass.draw_indexed(
                    span.index_start..(span.index_start + span.index_count),
                    0,
                    0..1,
                );
            }
        }

        self.overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &primitives,
            &textures_delta,
            &screen_descriptor,
        );

        {
            let mut overlay_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.overlay
                .paint(&mut overlay_pass, &primitives, &screen_descriptor);
        }

        self.overlay.cleanup(&textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        // Frame-rate cap: block out the rest of this frame's budget.
        self.limiter.wait();
        Ok(())
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.index_capacity);
        }
    }
}

struct App {
    config: GameConfig,
    state: Option<EngineState>,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("Fatal error: {err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = fma_platform::window::create_window(event_loop, &self.config);
        match EngineState::new(window, &self.config) {
            Ok(state) => self.state = Some(state),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let egui_consumed = state.overlay.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                state.frame_loop.process_event(LoopEvent::Terminate);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                state.gpu.resize(size.width, size.height);
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                state.frame_loop.process_event(classify_key_event(&event));
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }
                if !state.frame_loop.is_running() {
                    return;
                }
                if let Err(err) = state.render_frame() {
                    self.fail(event_loop, err);
                }
            }

            _ => {}
        }
    }
}

/// Classify a raw keyboard event for the loop state machine. Unknown keys
/// and key kinds the game has no binding for come back as `Ignored`.
fn classify_key_event(event: &winit::event::KeyEvent) -> LoopEvent {
    let PhysicalKey::Code(code) = event.physical_key else {
        return LoopEvent::Ignored;
    };
    let pressed = event.state.is_pressed();
    if code == KeyCode::F1 {
        // Toggle on the press edge only; holding F1 must not flicker.
        return if pressed && !event.repeat {
            LoopEvent::DebugToggle
        } else {
            LoopEvent::Ignored
        };
    }
    match map_key(code) {
        Some(key) => LoopEvent::Key { key, pressed },
        None => LoopEvent::Ignored,
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Space => Some(Key::Space),
        _ => None,
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Fire Mage Adventure starting...");

    let config = GameConfig::default();
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("Event loop error")?;

    if let Some(err) = app.fatal.take() {
        return Err(err);
    }
    log::info!("Shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_and_action_keys_are_bound() {
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::D));
        assert_eq!(map_key(KeyCode::Space), Some(Key::Space));
    }

    #[test]
    fn unbound_keys_do_not_map() {
        assert_eq!(map_key(KeyCode::KeyQ), None);
        assert_eq!(map_key(KeyCode::Tab), None);
        assert_eq!(map_key(KeyCode::F1), None);
    }
}
