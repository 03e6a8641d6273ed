//! Cascade Grid - tile-matching board simulation
//!
//! Core modules:
//! - `sim`: Grid addressing, slot store, condensation, refill and the grid controller
//! - `config`: Data-driven grid geometry and tile library

pub mod config;
pub mod sim;

pub use config::GridConfig;
pub use sim::{Grid, GridEvent, GridEventKind};

/// Grid configuration constants
pub mod consts {
    /// Default board size
    pub const DEFAULT_GRID_WIDTH: usize = 6;
    pub const DEFAULT_GRID_HEIGHT: usize = 6;

    /// Default tile pitch in world units (640 / 6)
    pub const DEFAULT_TILE_SIZE: f32 = 106.67;

    /// Number of tile kinds in the default library
    pub const DEFAULT_TILE_KINDS: u32 = 5;
}
