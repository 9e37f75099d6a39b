use rand::Rng;
use tracing::{debug, info};

use crate::stage::{BrickId, Stage};

pub const DEFAULT_WALL_PROBABILITY: f64 = 0.4;
pub const DEFAULT_EXITS: [Pos; 2] = [Pos::new(0, 0), Pos::new(0, 1)];
/// Largest board side; no terminal is wider or taller than this many cells.
pub const MAX_SIDE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// (row, col) offset of one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }

    pub fn offset(self, pos: Pos) -> (isize, isize) {
        let (dr, dc) = self.delta();
        (pos.row as isize + dr, pos.col as isize + dc)
    }
}

/// Size of one grid cell in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub w: usize,
    pub h: usize,
}

impl Default for CellSize {
    fn default() -> Self {
        Self { w: 2, h: 1 }
    }
}

#[derive(Debug, Clone)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    pub cell: CellSize,
    pub wall_probability: f64,
    pub exits: Vec<Pos>,
}

impl MazeConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.clamp(1, MAX_SIDE),
            height: height.clamp(1, MAX_SIDE),
            cell: CellSize::default(),
            wall_probability: DEFAULT_WALL_PROBABILITY,
            exits: DEFAULT_EXITS.to_vec(),
        }
    }

    /// Fits as many cells as the viewport holds, never fewer than one per axis.
    pub fn for_viewport(cols: u16, rows: u16, cell: CellSize) -> Self {
        let width = cols as usize / cell.w.max(1);
        let height = rows as usize / cell.h.max(1);
        Self {
            cell,
            ..Self::new(width, height)
        }
    }

    pub fn with_wall_probability(mut self, p: f64) -> Self {
        self.wall_probability = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self
    }

    pub fn with_exits(mut self, exits: Vec<Pos>) -> Self {
        self.exits = exits;
        self
    }
}

/// Occupancy grid plus the brick handle paired with every wall. Both are
/// row-major and never resized.
#[derive(Debug)]
pub struct Maze {
    width: usize,
    height: usize,
    cell: CellSize,
    walls: Vec<bool>,
    bricks: Vec<Option<BrickId>>,
    exits: Vec<Pos>,
}

impl Maze {
    /// Rolls every cell independently, then frees the exits. Nothing guarantees
    /// the exits are reachable.
    pub fn generate(config: &MazeConfig, rng: &mut impl Rng, stage: &mut impl Stage) -> Self {
        let width = config.width.clamp(1, MAX_SIDE);
        let height = config.height.clamp(1, MAX_SIDE);
        let p = if config.wall_probability.is_nan() {
            0.0
        } else {
            config.wall_probability.clamp(0.0, 1.0)
        };

        let mut walls: Vec<bool> = (0..width * height).map(|_| rng.gen_bool(p)).collect();
        let exits: Vec<Pos> = config
            .exits
            .iter()
            .copied()
            .filter(|e| e.row < height && e.col < width)
            .collect();
        for exit in &exits {
            walls[exit.row * width + exit.col] = false;
        }

        let mut bricks = vec![None; width * height];
        for row in 0..height {
            for col in 0..width {
                let idx = row * width + col;
                if walls[idx] {
                    bricks[idx] = Some(stage.add_brick(Pos::new(row, col)));
                }
            }
        }
        for exit in &exits {
            stage.add_exit(*exit);
        }

        let maze = Self {
            width,
            height,
            cell: config.cell,
            walls,
            bricks,
            exits,
        };
        info!(
            width,
            height,
            walls = maze.wall_count(),
            "generated maze with wall probability {p}"
        );
        maze
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell
    }

    pub fn exits(&self) -> &[Pos] {
        &self.exits
    }

    pub fn is_exit(&self, pos: Pos) -> bool {
        self.exits.contains(&pos)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.contains(pos) && self.walls[self.idx(pos)]
    }

    pub fn brick_at(&self, pos: Pos) -> Option<BrickId> {
        if !self.contains(pos) {
            return None;
        }
        self.bricks[self.idx(pos)]
    }

    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|w| **w).count()
    }

    /// Sole collision predicate: off the grid or a wall.
    pub fn is_blocked(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 || row as usize >= self.height || col as usize >= self.width {
            debug!(row, col, "hit the edge");
            return true;
        }
        let pos = Pos::new(row as usize, col as usize);
        if self.walls[self.idx(pos)] {
            debug!(row, col, "hit the wall");
            return true;
        }
        false
    }

    /// Frees the 3x3 block around `center`, clipped to the grid, and drops the
    /// bricks standing there. Returns how many bricks were removed.
    pub fn clear_area(&mut self, center: Pos, stage: &mut impl Stage) -> usize {
        let mut removed = 0;
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                let row = center.row as isize + dr;
                let col = center.col as isize + dc;
                if row < 0 || col < 0 {
                    continue;
                }
                let pos = Pos::new(row as usize, col as usize);
                if !self.contains(pos) {
                    continue;
                }
                let idx = self.idx(pos);
                if let Some(id) = self.bricks[idx].take() {
                    stage.remove_brick(id);
                    removed += 1;
                }
                self.walls[idx] = false;
            }
        }
        debug!(row = center.row, col = center.col, removed, "bomb");
        removed
    }

    /// Top-left terminal cell of `pos`, relative to the board origin.
    pub fn cell_origin(&self, pos: Pos) -> (usize, usize) {
        (pos.col * self.cell.w, pos.row * self.cell.h)
    }

    pub fn random_cell(&self, rng: &mut impl Rng) -> Pos {
        Pos::new(rng.gen_range(0..self.height), rng.gen_range(0..self.width))
    }

    fn idx(&self, pos: Pos) -> usize {
        pos.row * self.width + pos.col
    }
}
