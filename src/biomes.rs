//! Elevation-band biome classification
//!
//! Maps a normalized elevation to one of eight ordered terrain bands using a
//! sorted threshold table. Adding or reordering a band only touches the table.

use serde::{Deserialize, Serialize};

use crate::tilemap::TileGrid;

/// Terrain bands, from lowest to highest elevation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    DeepWater,
    ShallowWater,
    Sand,
    Grass,
    Forest,
    Dirt,
    Mountains,
    HighMountains,
}

/// Upper (exclusive) bound of each band below `HighMountains`, ascending.
pub const BIOME_THRESHOLDS: [(f64, Biome); 7] = [
    (0.18, Biome::DeepWater),
    (0.30, Biome::ShallowWater),
    (0.40, Biome::Sand),
    (0.50, Biome::Grass),
    (0.70, Biome::Forest),
    (0.82, Biome::Dirt),
    (0.95, Biome::Mountains),
];

/// Band for everything at or above the last threshold.
const TOP_BIOME: Biome = Biome::HighMountains;

/// Classify a normalized elevation. The first threshold the value is below
/// wins; values outside `[0, 1]` land in the extreme bands.
pub fn classify(value: f64) -> Biome {
    BIOME_THRESHOLDS
        .iter()
        .find(|(bound, _)| value < *bound)
        .map(|&(_, biome)| biome)
        .unwrap_or(TOP_BIOME)
}

/// Tile count per biome, in band order.
pub fn biome_histogram(grid: &TileGrid) -> [(Biome, usize); 8] {
    let mut counts = Biome::ALL.map(|biome| (biome, 0usize));
    for (_, _, &value) in grid.iter() {
        counts[classify(value) as usize].1 += 1;
    }
    counts
}

impl Biome {
    pub const ALL: [Biome; 8] = [
        Biome::DeepWater,
        Biome::ShallowWater,
        Biome::Sand,
        Biome::Grass,
        Biome::Forest,
        Biome::Dirt,
        Biome::Mountains,
        Biome::HighMountains,
    ];

    /// Get color for rendering
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Biome::DeepWater => (0, 0, 128),
            Biome::ShallowWater => (0, 0, 255),
            Biome::Sand => (240, 240, 64),
            Biome::Grass => (0, 255, 0),
            Biome::Forest => (0, 128, 0),
            Biome::Dirt => (128, 64, 0),
            Biome::Mountains => (128, 128, 128),
            Biome::HighMountains => (255, 255, 255),
        }
    }

    /// Color packed as `0x00RRGGBB`, the pixel format minifb expects.
    pub fn packed_color(&self) -> u32 {
        let (r, g, b) = self.color();
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }

    pub fn name(&self) -> &'static str {
        match self {
            Biome::DeepWater => "deep water",
            Biome::ShallowWater => "shallow water",
            Biome::Sand => "sand",
            Biome::Grass => "grass",
            Biome::Forest => "forest",
            Biome::Dirt => "dirt",
            Biome::Mountains => "mountains",
            Biome::HighMountains => "high mountains",
        }
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
