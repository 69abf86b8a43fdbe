//! The frame loop state machine and the game-state collaborator contract.
//!
//! The loop is a two-state machine: `Running` until a termination event
//! arrives, then terminally `Stopped`. Once stopped, no collaborator call
//! is ever made again. A debug flag is layered orthogonally on top; it
//! gates the FPS overlay and nothing else.
//!
//! Everything here is backend-free: winit events are mapped to `LoopEvent`
//! by the binary, and the draw target is the CPU-side quad batch. That
//! keeps the whole state machine testable without a window or GPU.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use fma_core::input::{InputState, Key};
use fma_render::QuadBatch;

/// One frame's draw target handed to the collaborator. The binary streams
/// the accumulated quads to the GPU after `draw()` returns.
pub struct SceneFrame<'a> {
    pub batch: &'a mut QuadBatch,
    pub viewport: (u32, u32),
}

/// The external game-state manager. The loop owns the calling order
/// (input, update, draw, exactly once per iteration) and treats the
/// implementation as a black box. Errors are unrecoverable by contract:
/// the loop never catches them, they abort the process.
///
/// `handle_input` takes no arguments; concrete managers receive input
/// through a shared `InputState` handed to them at construction.
pub trait GameManager {
    fn handle_input(&mut self) -> Result<()>;
    fn update(&mut self, delta: f64) -> Result<()>;
    fn draw(&mut self, frame: &mut SceneFrame<'_>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Running,
    Stopped,
}

/// A window event after classification. Events the game has no meaning
/// for arrive as `Ignored` and are dropped without comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    /// Window close: drives the loop to its terminal state.
    Terminate,
    /// Press edge of the dedicated debug key.
    DebugToggle,
    /// Any bound gameplay key, forwarded to the shared input state.
    Key { key: Key, pressed: bool },
    Ignored,
}

pub struct FrameLoop {
    phase: LoopPhase,
    debug: bool,
    input: Rc<RefCell<InputState>>,
}

impl FrameLoop {
    pub fn new(input: Rc<RefCell<InputState>>) -> Self {
        Self {
            phase: LoopPhase::Running,
            debug: false,
            input,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == LoopPhase::Running
    }

    /// Whether the FPS overlay composites this frame.
    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Feed one classified event into the state machine. Termination wins
    /// in any state; everything else is meaningful only while running.
    pub fn process_event(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::Terminate => {
                if self.phase != LoopPhase::Stopped {
                    log::info!("Termination requested, stopping loop");
                }
                self.phase = LoopPhase::Stopped;
            }
            LoopEvent::DebugToggle if self.is_running() => {
                self.debug = !self.debug;
                log::info!("Debug overlay: {}", if self.debug { "ON" } else { "OFF" });
            }
            LoopEvent::Key { key, pressed } if self.is_running() => {
                let mut input = self.input.borrow_mut();
                if pressed {
                    input.key_down(key);
                } else {
                    input.key_up(key);
                }
            }
            _ => {}
        }
    }

    /// One loop iteration: input, update, draw on the collaborator, then
    /// retire this frame's input edges. A stopped loop does nothing.
    pub fn run_frame(
        &mut self,
        manager: &mut dyn GameManager,
        delta: f64,
        frame: &mut SceneFrame<'_>,
    ) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }
        debug_assert!(delta >= 0.0 && delta.is_finite());

        manager.handle_input()?;
        manager.update(delta)?;
        manager.draw(frame)?;

        self.input.borrow_mut().end_frame();
        Ok(())
    }
}
