//! Tile suppliers used by the refill engine
//!
//! - `TileSelector` picks what kind of tile to spawn next (opaque policy)
//! - `TileFactory` turns a kind plus placement into a tile, and may fail

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::address::GridAddress;
use super::tile::{Tile, TileId, TileKind};

/// Chooses the kind of the next spawned tile. Callers must not assume determinism.
pub trait TileSelector {
    fn select_tile_kind(&mut self) -> TileKind;
}

/// Creates tiles for refill. `None` means the tile could not be created.
pub trait TileFactory {
    fn create_tile(&mut self, position: Vec3, address: GridAddress, kind: TileKind) -> Option<Tile>;
}

/// One weighted entry of the tile library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub kind: TileKind,
    pub weight: u32,
}

/// Weighted random selection over a library of tile kinds (seeded)
#[derive(Debug, Clone)]
pub struct TileLibrary {
    entries: Vec<LibraryEntry>,
    /// Sum of entry weights, widened so large `u32` weights cannot overflow
    total_weight: u64,
    rng: Pcg32,
}

impl TileLibrary {
    pub fn new(entries: Vec<LibraryEntry>, seed: u64) -> Self {
        let total_weight: u64 = entries.iter().map(|e| u64::from(e.weight)).sum();
        if total_weight == 0 {
            log::warn!("Tile library has no weighted entries, every tile will be {:?}", TileKind::default());
        }
        Self {
            entries,
            total_weight,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// `count` kinds numbered from 0, all with weight 1
    pub fn uniform(count: u32, seed: u64) -> Self {
        let entries = (0..count)
            .map(|k| LibraryEntry {
                kind: TileKind(k),
                weight: 1,
            })
            .collect();
        Self::new(entries, seed)
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }
}

impl TileSelector for TileLibrary {
    fn select_tile_kind(&mut self) -> TileKind {
        if self.total_weight == 0 {
            return TileKind::default();
        }

        let mut roll = self.rng.random_range(0..self.total_weight);
        for entry in &self.entries {
            let weight = u64::from(entry.weight);
            if roll < weight {
                return entry.kind;
            }
            roll -= weight;
        }

        // Unreachable while total_weight is the sum of the entry weights
        TileKind::default()
    }
}

/// Default factory: hands out increasing ids starting at 1.
/// Ids are 64-bit, so the counter does not wrap in practice.
#[derive(Debug, Clone)]
pub struct TileSpawner {
    next_id: u64,
}

impl Default for TileSpawner {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl TileSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the counter at `next_id` (restoring a saved board)
    pub fn starting_at(next_id: u64) -> Self {
        Self { next_id }
    }

    /// Allocate a new tile id
    pub fn next_tile_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl TileFactory for TileSpawner {
    fn create_tile(&mut self, _position: Vec3, address: GridAddress, kind: TileKind) -> Option<Tile> {
        let id = self.next_tile_id();
        Some(Tile::new(id, kind, address))
    }
}
