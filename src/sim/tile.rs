//! Tile entities placed on the grid

use serde::{Deserialize, Serialize};

use super::address::GridAddress;

/// Unique tile identifier, stable for the tile's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u64);

/// Opaque tile content chosen by the tile selector (color, sprite set, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileKind(pub u32);

/// Status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileStatus(u8);

impl TileStatus {
    pub const NONE: TileStatus = TileStatus(0);
    /// Tile can be picked by the player
    pub const SELECTABLE: TileStatus = TileStatus(1 << 0);
    /// Tile is part of the current link chain
    pub const LINKED: TileStatus = TileStatus(1 << 1);

    #[inline]
    pub fn contains(self, flag: TileStatus) -> bool {
        self.0 & flag.0 == flag.0
    }

    #[inline]
    pub fn insert(&mut self, flag: TileStatus) {
        self.0 |= flag.0;
    }

    #[inline]
    pub fn remove(&mut self, flag: TileStatus) {
        self.0 &= !flag.0;
    }

    /// Set or clear `flag`. Returns true if the status changed.
    pub fn set(&mut self, flag: TileStatus, value: bool) -> bool {
        let before = *self;
        if value {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
        before != *self
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

/// A tile placed in a grid slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    /// Always equal to the index of the slot holding this tile
    pub address: GridAddress,
    pub status: TileStatus,
}

impl Tile {
    pub fn new(id: TileId, kind: TileKind, address: GridAddress) -> Self {
        Self {
            id,
            kind,
            address,
            status: TileStatus::SELECTABLE,
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.status.contains(TileStatus::SELECTABLE)
    }

    pub fn is_linked(&self) -> bool {
        self.status.contains(TileStatus::LINKED)
    }
}
