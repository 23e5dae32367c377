use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// One palette entry: a flat RGBA color, channels in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub color: [f32; 4],
}

impl Tile {
    /// Placeholder stored at palette index 0. Present so voxel values line
    /// up with palette indices; never used for mesh emission.
    pub const RESERVED: Tile = Tile {
        color: [0.0, 0.0, 0.0, 1.0],
    };

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            color: [r, g, b, a],
        }
    }
}

/// Ordered tile table. Index 0 is the reserved placeholder; grid cells with
/// value 0 are empty.
#[derive(Clone, Debug)]
pub struct Palette {
    tiles: Vec<Tile>,
}

impl Palette {
    /// Wraps an existing tile list. The caller supplies the reserved slot 0.
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// Builds a palette from colors for indices `1..`, with the reserved
    /// placeholder prepended.
    pub fn with_reserved(colors: impl IntoIterator<Item = [f32; 4]>) -> Self {
        let mut tiles = vec![Tile::RESERVED];
        tiles.extend(colors.into_iter().map(|color| Tile { color }));
        Self { tiles }
    }

    /// A palette holding only the reserved placeholder.
    pub fn reserved_only() -> Self {
        Self {
            tiles: vec![Tile::RESERVED],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn get(&self, index: u16) -> Option<&Tile> {
        self.tiles.get(index as usize)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: PaletteConfig = toml::from_str(toml_str)?;
        Ok(Self::with_reserved(cfg.tiles.into_iter().map(|t| t.color)))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::reserved_only()
    }
}

// --- Config ---

#[derive(Deserialize)]
struct PaletteConfig {
    tiles: Vec<TileEntry>,
}

#[derive(Deserialize)]
struct TileEntry {
    color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_palette_prepends_reserved_slot() {
        let p = Palette::from_toml_str(
            r#"
            [[tiles]]
            color = [1.0, 0.0, 0.0, 1.0]

            [[tiles]]
            color = [0.0, 0.5, 0.0, 1.0]
            "#,
        )
        .unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p.get(0), Some(&Tile::RESERVED));
        assert_eq!(p.get(1).unwrap().color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(p.get(2).unwrap().color, [0.0, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn toml_palette_rejects_malformed_input() {
        assert!(Palette::from_toml_str("tiles = 3").is_err());
        assert!(Palette::from_toml_str("[[tiles]]\ncolor = [1.0]").is_err());
    }
}
