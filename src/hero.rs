use rand::Rng;
use tracing::debug;

use crate::maze::{Dir, Maze, Pos};
use crate::stage::Stage;

/// Radians per tick, negative spins counter-clockwise.
const SPIN_RATE: f32 = -0.5;

/// Repeating rotation task advanced once per frame. It never finishes on its
/// own; only [`Spin::cancel`] stops it.
#[derive(Debug, Clone, Default)]
pub struct Spin {
    angle: f32,
    cancelled: bool,
}

impl Spin {
    pub fn tick(&mut self, delta: f32) {
        if self.cancelled {
            return;
        }
        self.angle = (self.angle + SPIN_RATE * delta).rem_euclid(std::f32::consts::TAU);
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Which of `frames` evenly spaced poses the current angle falls in.
    pub fn frame(&self, frames: usize) -> usize {
        if frames == 0 {
            return 0;
        }
        let turn = self.angle / std::f32::consts::TAU;
        ((turn * frames as f32) as usize).min(frames - 1)
    }
}

#[derive(Debug, Clone)]
pub struct Hero {
    pos: Pos,
    spin: Option<Spin>,
}

impl Hero {
    /// Drops the hero on any cell, free or not.
    pub fn spawn(maze: &Maze, rng: &mut impl Rng) -> Self {
        let pos = maze.random_cell(rng);
        debug!(row = pos.row, col = pos.col, "hero spawned");
        Self::at(pos)
    }

    pub fn at(pos: Pos) -> Self {
        Self { pos, spin: None }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn step(&mut self, dir: Dir, maze: &Maze) -> bool {
        let (row, col) = dir.offset(self.pos);
        if maze.is_blocked(row, col) {
            return false;
        }
        self.pos = Pos::new(row as usize, col as usize);
        true
    }

    pub fn bomb(&self, maze: &mut Maze, stage: &mut impl Stage) -> usize {
        maze.clear_area(self.pos, stage)
    }

    /// Where the sprite sits on the board, in terminal cells.
    pub fn screen_origin(&self, maze: &Maze) -> (usize, usize) {
        maze.cell_origin(self.pos)
    }

    pub fn spin(&mut self) {
        if self.spin.is_none() {
            self.spin = Some(Spin::default());
        }
    }

    pub fn spin_state(&self) -> Option<&Spin> {
        self.spin.as_ref()
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.as_ref().is_some_and(|s| !s.is_cancelled())
    }

    pub fn tick(&mut self, delta: f32) {
        if let Some(spin) = &mut self.spin {
            spin.tick(delta);
        }
    }

    pub fn stop_spin(&mut self) {
        if let Some(spin) = &mut self.spin {
            spin.cancel();
        }
    }
}
