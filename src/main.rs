use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use brick_maze::config::Settings;
use brick_maze::controller::Action;
use brick_maze::game::Game;
use brick_maze::screen::Screen;
use brick_maze::skin::Skin;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Animation speeds are expressed per 60 Hz frame.
const FRAMES_PER_SECOND: f32 = 60.0;

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("invalid configuration")?;
    init_logging(&settings)?;
    let skin = match &settings.skin {
        Some(path) => Skin::load(path)
            .with_context(|| format!("failed to load skin from {}", path.display()))?,
        None => Skin::default(),
    };
    info!(client = %settings.client, seed = ?settings.seed, "starting");

    let mut term = RawTerminal::enter()?;
    run(&mut term.stdout, &settings, &skin)
}

/// Raw mode plus the alternate screen, undone on drop so an error or panic in
/// the game loop still hands back a usable shell.
struct RawTerminal {
    stdout: Stdout,
}

impl RawTerminal {
    fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let mut term = Self {
            stdout: io::stdout(),
        };
        term.stdout.execute(EnterAlternateScreen)?;
        term.stdout.execute(Hide)?;
        Ok(term)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        // Nothing left to report errors to.
        let _ = self.stdout.execute(Show);
        let _ = self.stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let Some(path) = &settings.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, settings: &Settings, skin: &Skin) -> anyhow::Result<()> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut screen = Screen::new();
    let mut game = Game::boot(settings, skin, terminal::size()?, &mut rng, &mut screen);
    let frame_time = Duration::from_micros(1_000_000 / settings.fps.max(1));
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('r') if game.offers_restart() => {
                            game.teardown();
                            info!("restarting");
                            game = Game::boot(settings, skin, terminal::size()?, &mut rng, &mut screen);
                        }
                        code => {
                            if let Some(action) = Action::from_key(code) {
                                game.handle(action, &mut screen);
                            }
                        }
                    }
                }
                Event::Resize(..) => screen.invalidate(),
                _ => {}
            }
        }

        let delta = last_frame.elapsed().as_secs_f32() * FRAMES_PER_SECOND;
        last_frame = Instant::now();
        game.tick(delta);
        screen.draw(stdout, skin, &game, terminal::size()?)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
