use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::game::{Game, CHROME_ROWS};
use crate::maze::Pos;
use crate::skin::Skin;
use crate::stage::{BrickId, SpriteLayer, Stage};

const BRICK: Color = Color::Rgb {
    r: 0xb2,
    g: 0x4b,
    b: 0x30,
};
const EXIT: Color = Color::Rgb {
    r: 0x60,
    g: 0xc3,
    b: 0xff,
};
const NOTICE: Color = Color::Rgb {
    r: 0x00,
    g: 0xff,
    b: 0x99,
};

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Hero,
    Spin(usize),
    Brick,
    Exit,
    Floor,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: Glyph::Floor,
    color: Color::Reset,
};

/// Terminal stage. Sprites live in a [`SpriteLayer`]; drawing only re-emits
/// cells that changed since the last frame.
pub struct Screen {
    layer: SpriteLayer,
    last: Vec<Cell>,
    dims: (usize, usize),
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for Screen {
    fn add_brick(&mut self, pos: Pos) -> BrickId {
        self.layer.add_brick(pos)
    }

    fn remove_brick(&mut self, id: BrickId) {
        self.layer.remove_brick(id);
    }

    fn add_exit(&mut self, pos: Pos) {
        self.layer.add_exit(pos);
    }

    fn clear(&mut self) {
        self.layer.clear();
        self.needs_full = true;
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            layer: SpriteLayer::new(),
            last: Vec::new(),
            dims: (0, 0),
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn layer(&self) -> &SpriteLayer {
        &self.layer
    }

    /// Forces the next frame to repaint everything, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn draw(
        &mut self,
        out: &mut impl Write,
        skin: &Skin,
        game: &Game,
        term: (u16, u16),
    ) -> io::Result<()> {
        let maze = game.maze();
        let (width, height) = (maze.width(), maze.height());
        let size = maze.cell_size();
        let needed_w = to_u16(width * size.w);
        let board_h = to_u16(height * size.h);
        let needed_h = board_h.saturating_add(CHROME_ROWS);

        if self.dims != (width, height) {
            self.dims = (width, height);
            self.last = vec![BLANK; width * height];
            self.needs_full = true;
        }

        out.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = term;
        if term_w < needed_w || term_h < needed_h {
            out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "A {width}x{height} maze needs a {needed_w}x{needed_h} terminal, this one is \
                 {term_w}x{term_h}. Resize it or lower MAZE_WIDTH/MAZE_HEIGHT."
            );
            out.queue(Print(msg))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
        }

        let mut hud = format!(
            "bricks {}  move ←↓↑→/hjkl  bomb space  quit q",
            self.layer.brick_count()
        );
        if game.offers_restart() {
            hud.push_str("  restart r");
        }
        if self.needs_full || hud != self.last_hud {
            out.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            out.queue(SetForegroundColor(Color::White))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(Print(&hud))?;
            out.queue(ResetColor)?;
            self.last_hud = hud;
        }

        let mut bricks = vec![false; width * height];
        for pos in self.layer.bricks() {
            if pos.row < height && pos.col < width {
                bricks[pos.row * width + pos.col] = true;
            }
        }
        let hero = game.hero();
        let (hero_pos, hero_cell) = match hero.spin_state() {
            Some(spin) => (
                Pos::new(height / 2, width / 2),
                Cell {
                    glyph: Glyph::Spin(spin.frame(skin.spin.len())),
                    color: Color::Yellow,
                },
            ),
            None => (
                hero.pos(),
                Cell {
                    glyph: Glyph::Hero,
                    color: Color::White,
                },
            ),
        };

        for row in 0..height {
            for col in 0..width {
                let pos = Pos::new(row, col);
                let idx = row * width + col;
                let cell = if pos == hero_pos {
                    hero_cell
                } else if bricks[idx] {
                    Cell {
                        glyph: Glyph::Brick,
                        color: BRICK,
                    }
                } else if self.layer.exits().contains(&pos) {
                    Cell {
                        glyph: Glyph::Exit,
                        color: EXIT,
                    }
                } else {
                    BLANK
                };
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    let (x, y) = maze.cell_origin(pos);
                    self.draw_cell(out, skin, size.w, x, y, cell)?;
                }
            }
        }

        if let Some(notice) = game.notice() {
            let lines = notice.lines();
            // Keep the last line on the chrome row below the board at worst.
            let lowest = (self.origin_y + board_h + 1).saturating_sub(to_u16(lines.len()));
            let top = (self.origin_y + to_u16(height / 2 + 1)).min(lowest);
            for (i, line) in lines.iter().enumerate() {
                let w = to_u16(UnicodeWidthStr::width(*line));
                let x = self.origin_x + needed_w.saturating_sub(w) / 2;
                out.queue(MoveTo(x, top + i as u16))?;
                out.queue(SetForegroundColor(NOTICE))?;
                out.queue(Print(*line))?;
                out.queue(ResetColor)?;
            }
        }
        self.needs_full = false;

        out.flush()?;
        Ok(())
    }

    fn draw_cell(
        &self,
        out: &mut impl Write,
        skin: &Skin,
        cell_w: usize,
        x: usize,
        y: usize,
        cell: Cell,
    ) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Hero => skin.hero.as_str(),
            Glyph::Spin(frame) => skin
                .spin
                .get(frame)
                .map_or(skin.hero.as_str(), String::as_str),
            Glyph::Brick => skin.brick.as_str(),
            Glyph::Exit => skin.exit.as_str(),
            Glyph::Floor => skin.floor.as_str(),
        };
        out.queue(MoveTo(self.origin_x + to_u16(x), self.origin_y + to_u16(y)))?;
        out.queue(SetForegroundColor(cell.color))?;
        out.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < cell_w {
            for _ in 0..(cell_w - w) {
                out.queue(Print(' '))?;
            }
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
