use crossterm::event::KeyCode;
use tracing::info;

use crate::hero::Hero;
use crate::maze::{Dir, Maze};
use crate::stage::Stage;
use crate::tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    Won,
    UnsupportedPlatform,
}

/// Session lock. Starts unlocked; [`Session::lock`] is the only way to change
/// it and there is no way back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    lock: Option<LockReason>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    pub fn reason(&self) -> Option<LockReason> {
        self.lock
    }

    /// Returns false when the session was already locked; the first reason sticks.
    pub fn lock(&mut self, reason: LockReason) -> bool {
        if self.lock.is_some() {
            return false;
        }
        info!(?reason, "session locked");
        self.lock = Some(reason);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Dir),
    Bomb,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(Dir::Up)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(Dir::Down)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(Dir::Left)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(Dir::Right)),
            KeyCode::Char(' ') => Some(Action::Bomb),
            _ => None,
        }
    }
}

/// Overlay the presentation layer shows once the session locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Win,
    UnsupportedPlatform,
}

impl Notice {
    pub fn lines(self) -> &'static [&'static str] {
        match self {
            Notice::Win => &["YOU WIN"],
            Notice::UnsupportedPlatform => &["Not Working in Mobile Browser", "仅支持在桌面端玩哦"],
        }
    }

    pub fn offers_restart(self) -> bool {
        matches!(self, Notice::Win)
    }
}

#[derive(Debug, Default)]
pub struct Controller {
    session: Session,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn is_locked(&self) -> bool {
        self.session.is_locked()
    }

    pub fn handle_input(
        &mut self,
        action: Action,
        hero: &mut Hero,
        maze: &mut Maze,
        stage: &mut impl Stage,
    ) -> Option<Notice> {
        if self.session.is_locked() {
            return None;
        }
        match action {
            Action::Move(dir) => {
                hero.step(dir, maze);
            }
            Action::Bomb => {
                hero.bomb(maze, stage);
            }
        }
        self.check_win(hero, maze)
    }

    pub fn check_win(&mut self, hero: &mut Hero, maze: &Maze) -> Option<Notice> {
        if !maze.is_exit(hero.pos()) {
            return None;
        }
        if !self.session.lock(LockReason::Won) {
            return None;
        }
        hero.spin();
        info!(row = hero.pos().row, col = hero.pos().col, "exit reached");
        Some(Notice::Win)
    }

    /// Runs once at boot, before any input is accepted.
    pub fn check_platform(&mut self, client: &str, hero: &mut Hero) -> Option<Notice> {
        if tool::is_supported_platform(client) {
            return None;
        }
        if !self.session.lock(LockReason::UnsupportedPlatform) {
            return None;
        }
        hero.spin();
        info!(client, "unsupported client");
        Some(Notice::UnsupportedPlatform)
    }
}
