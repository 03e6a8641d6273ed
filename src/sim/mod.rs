//! Grid simulation module
//!
//! All board logic lives here. Single-threaded and synchronous:
//! - Stable iteration order (by address)
//! - Seeded RNG only (tile library)
//! - No rendering or input dependencies

pub mod address;
pub mod condense;
pub mod events;
pub mod grid;
pub mod refill;
pub mod slots;
pub mod supply;
pub mod tile;

pub use address::{GridAddress, GridDimensions, GridGeometry};
pub use condense::{HoleCountMap, condense, hole_counts, is_settled};
pub use events::{EventBus, GridEvent, GridEventKind, StatusFlag, SubscriptionId};
pub use grid::{Grid, GridPhase, SettleReport};
pub use refill::{RefillOutcome, empty_run_length, refill};
pub use slots::TileSlots;
pub use supply::{LibraryEntry, TileFactory, TileLibrary, TileSelector, TileSpawner};
pub use tile::{Tile, TileId, TileKind, TileStatus};
