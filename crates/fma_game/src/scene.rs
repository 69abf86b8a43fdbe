//! A minimal concrete game-state manager.
//!
//! The shell scene exists to exercise the bootstrap end to end: it draws
//! the synthesized tile atlas as a floor and the player placeholder sheet
//! as a movable marker. No combat, no AI, no levels; the real game
//! manager replaces this behind the same interface.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use fma_core::config::GameConfig;
use fma_core::input::{InputState, Key};
use fma_render::batch::WHITE_TINT;

use crate::runtime::{GameManager, SceneFrame};

/// Texture keys the scene draws with; the binary uploads the synthesized
/// PNGs under these names before the loop starts.
pub const TILESET_TEXTURE: &str = "tileset";
pub const PLAYER_TEXTURE: &str = "player";

const TILE_SIZE: f32 = 48.0;
const PLAYER_SIZE: f32 = 48.0;
const PLAYER_SPEED: f32 = 220.0;

/// UV rect of the floor tile: cell (0, 0) of the 4x4 atlas.
const FLOOR_UV: [f32; 4] = [0.0, 0.0, 0.25, 0.25];
/// UV rect of the first player cell: the fire mage sheet is a 4x3 grid.
const PLAYER_UV: [f32; 4] = [0.0, 0.0, 1.0 / 4.0, 1.0 / 3.0];

pub struct ShellScene {
    input: Rc<RefCell<InputState>>,
    bounds: (f32, f32),
    player_x: f32,
    player_y: f32,
    move_x: f32,
    move_y: f32,
}

impl ShellScene {
    pub fn new(config: &GameConfig, input: Rc<RefCell<InputState>>) -> Self {
        let bounds = (config.screen_width as f32, config.screen_height as f32);
        Self {
            input,
            bounds,
            player_x: (bounds.0 - PLAYER_SIZE) / 2.0,
            player_y: (bounds.1 - PLAYER_SIZE) / 2.0,
            move_x: 0.0,
            move_y: 0.0,
        }
    }

    pub fn player_position(&self) -> (f32, f32) {
        (self.player_x, self.player_y)
    }
}

impl GameManager for ShellScene {
    fn handle_input(&mut self) -> Result<()> {
        let input = self.input.borrow();
        self.move_x = 0.0;
        self.move_y = 0.0;
        if input.is_held(Key::Left) || input.is_held(Key::A) {
            self.move_x -= 1.0;
        }
        if input.is_held(Key::Right) || input.is_held(Key::D) {
            self.move_x += 1.0;
        }
        if input.is_held(Key::Up) || input.is_held(Key::W) {
            self.move_y -= 1.0;
        }
        if input.is_held(Key::Down) || input.is_held(Key::S) {
            self.move_y += 1.0;
        }
        Ok(())
    }

    fn update(&mut self, delta: f64) -> Result<()> {
        self.player_x += self.move_x * PLAYER_SPEED * delta as f32;
        self.player_y += self.move_y * PLAYER_SPEED * delta as f32;
        self.player_x = self.player_x.clamp(0.0, self.bounds.0 - PLAYER_SIZE);
        self.player_y = self.player_y.clamp(0.0, self.bounds.1 - PLAYER_SIZE);
        Ok(())
    }

    fn draw(&mut self, frame: &mut SceneFrame<'_>) -> Result<()> {
        // Floor: tile the atlas floor cell across the whole viewport.
        let cols = (frame.viewport.0 as f32 / TILE_SIZE).ceil() as u32;
        let rows = (frame.viewport.1 as f32 / TILE_SIZE).ceil() as u32;
        for row in 0..rows {
            for col in 0..cols {
                frame.batch.push(
                    TILESET_TEXTURE,
                    col as f32 * TILE_SIZE,
                    row as f32 * TILE_SIZE,
                    TILE_SIZE,
                    TILE_SIZE,
                    FLOOR_UV,
                    WHITE_TINT,
                );
            }
        }

        frame.batch.push(
            PLAYER_TEXTURE,
            self.player_x,
            self.player_y,
            PLAYER_SIZE,
            PLAYER_SIZE,
            PLAYER_UV,
            WHITE_TINT,
        );
        Ok(())
    }
}
