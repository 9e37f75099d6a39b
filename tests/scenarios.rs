use brick_maze::config::Settings;
use brick_maze::controller::{Action, Controller, LockReason, Notice};
use brick_maze::game::Game;
use brick_maze::hero::Hero;
use brick_maze::maze::{Dir, Maze, MazeConfig, Pos};
use brick_maze::skin::Skin;
use brick_maze::stage::SpriteLayer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate(width: usize, height: usize, p: f64, seed: u64) -> (Maze, SpriteLayer) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut layer = SpriteLayer::new();
    let config = MazeConfig::new(width, height).with_wall_probability(p);
    let maze = Maze::generate(&config, &mut rng, &mut layer);
    (maze, layer)
}

fn snapshot(maze: &Maze) -> Vec<(bool, bool)> {
    let mut cells = Vec::new();
    for row in 0..maze.height() {
        for col in 0..maze.width() {
            let pos = Pos::new(row, col);
            cells.push((maze.is_wall(pos), maze.brick_at(pos).is_some()));
        }
    }
    cells
}

#[test]
fn exits_stay_free_across_random_sizes_and_densities() {
    let mut rng = StdRng::seed_from_u64(2024);
    for seed in 0..50 {
        let width = rng.gen_range(1..30);
        let height = rng.gen_range(1..30);
        let p = rng.gen_range(0.0..=1.0);
        let (maze, _) = generate(width, height, p, seed);
        for exit in maze.exits() {
            assert!(!maze.is_wall(*exit), "exit {exit:?} walled in {width}x{height} p={p}");
        }
    }
}

#[test]
fn moves_either_land_exactly_on_the_candidate_or_do_nothing() {
    let (maze, _) = generate(12, 9, 0.4, 77);
    let mut rng = StdRng::seed_from_u64(5);
    let mut hero = Hero::spawn(&maze, &mut rng);
    for _ in 0..500 {
        let dir = Dir::ALL[rng.gen_range(0..4)];
        let before = hero.pos();
        let (row, col) = dir.offset(before);
        let blocked = maze.is_blocked(row, col);
        let moved = hero.step(dir, &maze);

        assert_eq!(moved, !blocked);
        if moved {
            assert_eq!(hero.pos(), Pos::new(row as usize, col as usize));
        } else {
            assert_eq!(hero.pos(), before);
        }
        assert!(maze.contains(hero.pos()));
    }
}

#[test]
fn bombing_twice_matches_bombing_once() {
    for seed in 0..20 {
        let (mut maze, mut layer) = generate(7, 7, 0.6, seed);
        let center = Pos::new(seed as usize % 7, (seed as usize * 3) % 7);
        maze.clear_area(center, &mut layer);
        let once = snapshot(&maze);
        let live = layer.brick_count();

        maze.clear_area(center, &mut layer);
        assert_eq!(snapshot(&maze), once);
        assert_eq!(layer.brick_count(), live);
    }
}

#[test]
fn bricks_track_walls_through_many_bombs() {
    let (mut maze, mut layer) = generate(15, 10, 0.5, 31);
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..25 {
        let center = maze.random_cell(&mut rng);
        maze.clear_area(center, &mut layer);
        for (is_wall, has_brick) in snapshot(&maze) {
            assert_eq!(is_wall, has_brick);
        }
        assert_eq!(layer.brick_count(), maze.wall_count());
    }
}

#[test]
fn open_five_by_five_reaches_an_exit_from_anywhere() {
    let (mut maze, mut layer) = generate(5, 5, 0.0, 0);
    for row in 0..5 {
        for col in 0..5 {
            let mut hero = Hero::at(Pos::new(row, col));
            let mut controller = Controller::new();
            let mut moves = 0;
            let mut notice = controller.check_win(&mut hero, &maze);
            while notice.is_none() {
                let dir = if hero.pos().row > 0 { Dir::Up } else { Dir::Left };
                notice = controller.handle_input(Action::Move(dir), &mut hero, &mut maze, &mut layer);
                moves += 1;
                assert!(moves <= 8, "stuck at {:?}", hero.pos());
            }
            let expected = row + col.saturating_sub(1);
            assert_eq!(moves, expected, "start ({row}, {col})");
            assert!(moves <= 7);
            assert!(maze.is_exit(hero.pos()));
        }
    }
}

#[test]
fn bomb_at_the_centre_clears_the_middle_block() {
    let (mut maze, mut layer) = generate(5, 5, 1.0, 9);
    let hero = Hero::at(Pos::new(2, 2));
    hero.bomb(&mut maze, &mut layer);
    for row in 1..=3 {
        for col in 1..=3 {
            assert!(!maze.is_blocked(row, col));
        }
    }
    assert!(maze.is_blocked(0, 4));
    assert!(maze.is_blocked(4, 0));
}

#[test]
fn standing_on_an_exit_locks_further_input() {
    let (mut maze, mut layer) = generate(5, 5, 0.0, 1);
    let mut hero = Hero::at(Pos::new(0, 1));
    let mut controller = Controller::new();

    assert_eq!(controller.check_win(&mut hero, &maze), Some(Notice::Win));
    assert_eq!(controller.session().reason(), Some(LockReason::Won));

    for action in [
        Action::Move(Dir::Down),
        Action::Move(Dir::Right),
        Action::Move(Dir::Left),
        Action::Bomb,
    ] {
        assert_eq!(controller.handle_input(action, &mut hero, &mut maze, &mut layer), None);
        assert_eq!(hero.pos(), Pos::new(0, 1));
    }
}

#[test]
fn unsupported_client_is_locked_from_boot() {
    let settings = Settings {
        width: Some(6),
        height: Some(6),
        wall_probability: 0.0,
        client: "Mozilla/5.0 (Linux; Android 13)".to_string(),
        ..Settings::default()
    };
    let mut rng = StdRng::seed_from_u64(12);
    let mut layer = SpriteLayer::new();
    let mut game = Game::boot(&settings, &Skin::default(), (80, 24), &mut rng, &mut layer);

    assert_eq!(game.notice(), Some(Notice::UnsupportedPlatform));
    assert_eq!(
        game.controller().session().reason(),
        Some(LockReason::UnsupportedPlatform)
    );
    let start = game.hero().pos();
    for dir in Dir::ALL {
        assert_eq!(game.handle(Action::Move(dir), &mut layer), None);
    }
    assert_eq!(game.hero().pos(), start);
    assert!(game.hero().is_spinning());
}

#[test]
fn restart_after_a_win_starts_an_unlocked_session() {
    let settings = Settings {
        width: Some(5),
        height: Some(5),
        wall_probability: 0.0,
        ..Settings::default()
    };
    let mut rng = StdRng::seed_from_u64(6);
    let mut layer = SpriteLayer::new();
    let mut game = Game::boot(&settings, &Skin::default(), (80, 24), &mut rng, &mut layer);
    while game.notice().is_none() {
        let dir = if game.hero().pos().row > 0 { Dir::Up } else { Dir::Left };
        game.handle(Action::Move(dir), &mut layer);
    }
    assert!(game.offers_restart());

    game.teardown();
    assert!(!game.hero().is_spinning());

    let game = Game::boot(&settings, &Skin::default(), (80, 24), &mut rng, &mut layer);
    assert!(!game.controller().is_locked());
    assert_eq!(game.notice(), None);
}
