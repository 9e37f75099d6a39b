use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::maze::{DEFAULT_WALL_PROBABILITY, MAX_SIDE};

const DEFAULT_FPS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got `{value}`")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub wall_probability: f64,
    pub seed: Option<u64>,
    pub client: String,
    pub skin: Option<PathBuf>,
    pub fps: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            wall_probability: DEFAULT_WALL_PROBABILITY,
            seed: None,
            client: String::new(),
            skin: None,
            fps: DEFAULT_FPS,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset or blank variables fall back to defaults; anything else must parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let side = |v: &usize| (1..=MAX_SIDE).contains(v);
        let width = parse(&get, "MAZE_WIDTH", "an integer in [1, 1024]", side)?;
        let height = parse(&get, "MAZE_HEIGHT", "an integer in [1, 1024]", side)?;
        let wall_probability =
            parse(&get, "MAZE_WALL_PROBABILITY", "a number in [0, 1]", |v: &f64| {
                (0.0..=1.0).contains(v)
            })?
            .unwrap_or(DEFAULT_WALL_PROBABILITY);
        let seed = parse(&get, "MAZE_SEED", "an unsigned integer", |_: &u64| true)?;
        let fps = parse(&get, "MAZE_FPS", "a positive integer", |v: &u64| *v > 0)?
            .unwrap_or(DEFAULT_FPS);
        let client = get("MAZE_CLIENT")
            .or_else(|| get("TERM_PROGRAM"))
            .or_else(|| get("TERM"))
            .unwrap_or_default();

        Ok(Self {
            width,
            height,
            wall_probability,
            seed,
            client,
            skin: get("MAZE_SKIN").map(PathBuf::from),
            fps,
            log_file: get("MAZE_LOG").map(PathBuf::from),
        })
    }
}

fn parse<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
    valid: impl Fn(&T) -> bool,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = get(var) else {
        return Ok(None);
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if valid(&parsed) => Ok(Some(parsed)),
        _ => Err(ConfigError::Invalid {
            var,
            value,
            expected,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            ("MAZE_WIDTH", "12"),
            ("MAZE_HEIGHT", " 8 "),
            ("MAZE_WALL_PROBABILITY", "0.25"),
            ("MAZE_SEED", "42"),
            ("MAZE_CLIENT", "iPad"),
            ("MAZE_SKIN", "skins/ascii.toml"),
            ("MAZE_FPS", "60"),
            ("MAZE_LOG", "/tmp/maze.log"),
        ])
        .unwrap();
        assert_eq!(s.width, Some(12));
        assert_eq!(s.height, Some(8));
        assert_eq!(s.wall_probability, 0.25);
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.client, "iPad");
        assert_eq!(s.skin, Some(PathBuf::from("skins/ascii.toml")));
        assert_eq!(s.fps, 60);
        assert_eq!(s.log_file, Some(PathBuf::from("/tmp/maze.log")));
    }

    #[test]
    fn client_falls_back_to_the_terminal_name() {
        let s = settings(&[("TERM", "xterm-256color")]).unwrap();
        assert_eq!(s.client, "xterm-256color");
        let s = settings(&[("TERM", "xterm"), ("TERM_PROGRAM", "iTerm.app")]).unwrap();
        assert_eq!(s.client, "iTerm.app");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let s = settings(&[("MAZE_WIDTH", "  "), ("MAZE_CLIENT", "")]).unwrap();
        assert_eq!(s.width, None);
        assert_eq!(s.client, "");
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let err = settings(&[("MAZE_WALL_PROBABILITY", "1.5")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "MAZE_WALL_PROBABILITY",
                value: "1.5".to_string(),
                expected: "a number in [0, 1]",
            }
        );
        assert!(settings(&[("MAZE_WALL_PROBABILITY", "lots")]).is_err());
        assert!(settings(&[("MAZE_WALL_PROBABILITY", "NaN")]).is_err());
    }

    #[test]
    fn rejects_boards_larger_than_any_terminal() {
        let err = settings(&[("MAZE_WIDTH", "18446744073709551615"), ("MAZE_HEIGHT", "2")])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "MAZE_WIDTH",
                value: "18446744073709551615".to_string(),
                expected: "an integer in [1, 1024]",
            }
        );
        assert!(settings(&[("MAZE_HEIGHT", "100000")]).is_err());
        assert_eq!(settings(&[("MAZE_WIDTH", "1024")]).unwrap().width, Some(MAX_SIDE));
    }

    #[test]
    fn rejects_zero_sizes() {
        assert!(settings(&[("MAZE_WIDTH", "0")]).is_err());
        assert!(settings(&[("MAZE_FPS", "0")]).is_err());
        assert!(settings(&[("MAZE_HEIGHT", "-3")]).is_err());
    }
}
