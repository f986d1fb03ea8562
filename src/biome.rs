//! Cell classification for the generated world.
//!
//! Every cell of the biome grid is exactly one [`BiomeKind`]. `Safe`,
//! `Neutral` and `Combat` are the playable danger tiers; `Void` is the sea
//! surrounding the landmass and is not a tier at all.

use serde::{Deserialize, Serialize};

/// Classification of a single world cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeKind {
    /// Sea / empty space outside the playable landmass
    #[default]
    Void,
    /// Central spawn area
    Safe,
    /// Buffer band between the core and the dangerous zone
    Neutral,
    /// Dangerous continent where points of interest live
    Combat,
}

impl BiomeKind {
    pub fn all() -> &'static [BiomeKind] {
        &[BiomeKind::Void, BiomeKind::Safe, BiomeKind::Neutral, BiomeKind::Combat]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BiomeKind::Void => "Void",
            BiomeKind::Safe => "Safe",
            BiomeKind::Neutral => "Neutral",
            BiomeKind::Combat => "Combat",
        }
    }

    /// Danger tier, `None` for void cells.
    /// Safe < Neutral < Combat.
    pub fn danger(&self) -> Option<u8> {
        match self {
            BiomeKind::Void => None,
            BiomeKind::Safe => Some(0),
            BiomeKind::Neutral => Some(1),
            BiomeKind::Combat => Some(2),
        }
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, BiomeKind::Void)
    }

    /// Land is anything that is not void.
    #[inline]
    pub fn is_land(&self) -> bool {
        !self.is_void()
    }

    /// ASCII glyph used by the text renderer.
    pub fn glyph(&self) -> char {
        match self {
            BiomeKind::Void => '~',
            BiomeKind::Safe => 'S',
            BiomeKind::Neutral => '.',
            BiomeKind::Combat => '#',
        }
    }

    /// Base RGB color used by the image exporter.
    pub fn color(&self) -> [u8; 3] {
        match self {
            BiomeKind::Void => [28, 62, 120],
            BiomeKind::Safe => [120, 200, 110],
            BiomeKind::Neutral => [200, 185, 120],
            BiomeKind::Combat => [170, 60, 50],
        }
    }
}

impl std::fmt::Display for BiomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danger_ordering() {
        assert!(BiomeKind::Safe.danger() < BiomeKind::Neutral.danger());
        assert!(BiomeKind::Neutral.danger() < BiomeKind::Combat.danger());
        assert_eq!(BiomeKind::Void.danger(), None);
    }

    #[test]
    fn test_glyphs_are_distinct() {
        let glyphs: std::collections::HashSet<char> =
            BiomeKind::all().iter().map(|b| b.glyph()).collect();
        assert_eq!(glyphs.len(), BiomeKind::all().len());
    }
}
