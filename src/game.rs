use rand::Rng;
use tracing::info;

use crate::config::Settings;
use crate::controller::{Action, Controller, Notice};
use crate::hero::Hero;
use crate::maze::{Maze, MazeConfig};
use crate::skin::Skin;
use crate::stage::Stage;

/// Terminal rows not available to the board: the HUD above and the status line below.
pub const CHROME_ROWS: u16 = 2;

pub struct Game {
    maze: Maze,
    hero: Hero,
    controller: Controller,
    notice: Option<Notice>,
}

/// Board size for a terminal of `viewport` (cols, rows), unless the settings pin it.
pub fn maze_config(settings: &Settings, skin: &Skin, viewport: (u16, u16)) -> MazeConfig {
    let cell = skin.cell_size();
    let fitted = MazeConfig::for_viewport(viewport.0, viewport.1.saturating_sub(CHROME_ROWS), cell);
    let width = settings.width.unwrap_or(fitted.width);
    let height = settings.height.unwrap_or(fitted.height);
    MazeConfig {
        cell,
        ..MazeConfig::new(width, height)
    }
    .with_wall_probability(settings.wall_probability)
}

impl Game {
    /// Grid, then hero, then the platform check. Only a supported client gets
    /// its spawn neighbourhood bombed open.
    pub fn boot(
        settings: &Settings,
        skin: &Skin,
        viewport: (u16, u16),
        rng: &mut impl Rng,
        stage: &mut impl Stage,
    ) -> Self {
        stage.clear();
        let config = maze_config(settings, skin, viewport);
        let mut maze = Maze::generate(&config, rng, stage);
        let mut hero = Hero::spawn(&maze, rng);
        let mut controller = Controller::new();

        let notice = controller.check_platform(&settings.client, &mut hero);
        if notice.is_none() {
            hero.bomb(&mut maze, stage);
            info!(row = hero.pos().row, col = hero.pos().col, "accepting input");
        }

        Self {
            maze,
            hero,
            controller,
            notice,
        }
    }

    pub fn handle(&mut self, action: Action, stage: &mut impl Stage) -> Option<Notice> {
        let notice = self
            .controller
            .handle_input(action, &mut self.hero, &mut self.maze, stage)?;
        self.notice = Some(notice);
        Some(notice)
    }

    /// Advances animations by `delta` frames.
    pub fn tick(&mut self, delta: f32) {
        self.hero.tick(delta);
    }

    /// Stops anything still running before the session is dropped.
    pub fn teardown(&mut self) {
        self.hero.stop_spin();
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn offers_restart(&self) -> bool {
        self.notice.is_some_and(Notice::offers_restart)
    }
}
