use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::maze::CellSize;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SkinError {
    #[error("failed to read skin manifest at {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse skin manifest")]
    Parse(#[from] toml::de::Error),
    #[error("unsupported skin manifest version {found}; expected {expected}")]
    Version { found: u32, expected: u32 },
    #[error("skin glyph `{0}` has no visible width")]
    EmptyGlyph(&'static str),
    #[error("skin needs at least one spin frame")]
    NoSpinFrames,
}

/// Glyphs standing in for the game's sprites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skin {
    pub brick: String,
    pub exit: String,
    pub hero: String,
    pub floor: String,
    pub spin: Vec<String>,
}

impl Default for Skin {
    fn default() -> Self {
        Self {
            brick: "██".to_string(),
            exit: "░░".to_string(),
            hero: "🐰".to_string(),
            floor: "  ".to_string(),
            spin: ["◐", "◓", "◑", "◒"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    glyphs: Glyphs,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Glyphs {
    brick: String,
    exit: String,
    hero: String,
    #[serde(default)]
    floor: Option<String>,
    spin: Vec<String>,
}

impl Skin {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SkinError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SkinError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, SkinError> {
        let manifest: Manifest = toml::from_str(contents)?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            return Err(SkinError::Version {
                found: manifest.version,
                expected: SUPPORTED_MANIFEST_VERSION,
            });
        }

        let glyphs = manifest.glyphs;
        let floor = glyphs.floor.unwrap_or_else(|| " ".to_string());
        for (name, glyph) in [
            ("brick", &glyphs.brick),
            ("exit", &glyphs.exit),
            ("hero", &glyphs.hero),
            ("floor", &floor),
        ] {
            if glyph.width() == 0 {
                return Err(SkinError::EmptyGlyph(name));
            }
        }
        if glyphs.spin.is_empty() {
            return Err(SkinError::NoSpinFrames);
        }
        if glyphs.spin.iter().any(|frame| frame.width() == 0) {
            return Err(SkinError::EmptyGlyph("spin"));
        }

        Ok(Self {
            brick: glyphs.brick,
            exit: glyphs.exit,
            hero: glyphs.hero,
            floor,
            spin: glyphs.spin,
        })
    }

    /// A cell is as wide as the widest glyph so nothing overlaps its neighbour.
    pub fn cell_size(&self) -> CellSize {
        let w = [&self.brick, &self.exit, &self.hero, &self.floor]
            .into_iter()
            .chain(self.spin.iter())
            .map(|glyph| glyph.width())
            .max()
            .unwrap_or(1)
            .max(1);
        CellSize { w, h: 1 }
    }
}
