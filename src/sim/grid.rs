//! Grid controller
//!
//! Owns the slot store, the event bus and the tile suppliers. Every mutation
//! runs to completion before returning; the grid is never observed mid-pass.

use std::collections::{BTreeSet, VecDeque};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::address::{GridAddress, GridDimensions, GridGeometry};
use super::condense::condense;
use super::events::{EventBus, GridEvent, GridEventKind, StatusFlag, SubscriptionId};
use super::refill::refill;
use super::slots::TileSlots;
use super::supply::{TileFactory, TileLibrary, TileSelector, TileSpawner};
use super::tile::{Tile, TileId, TileStatus};
use crate::config::GridConfig;

/// Lifecycle of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridPhase {
    /// Constructed, no slots allocated yet
    Uninitialized,
    /// Slots allocated, ready for play
    Initialized,
}

/// What a settle pass (condense + refill) did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    /// Tiles moved by condensation
    pub moved: usize,
    /// Tiles spawned by refill
    pub spawned: usize,
    /// Cells the factory could not fill
    pub failed: usize,
}

impl SettleReport {
    fn merge(&mut self, other: SettleReport) {
        self.moved += other.moved;
        self.spawned += other.spawned;
        self.failed += other.failed;
    }
}

pub struct Grid {
    geometry: GridGeometry,
    phase: GridPhase,
    slots: TileSlots,
    events: EventBus,
    selector: Box<dyn TileSelector>,
    factory: Box<dyn TileFactory>,
    /// Removal notifications waiting for `step`
    inbox: VecDeque<Vec<GridAddress>>,
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("geometry", &self.geometry)
            .field("phase", &self.phase)
            .field("occupied", &self.slots.occupied_count())
            .field("inbox", &self.inbox.len())
            .finish()
    }
}

impl Grid {
    pub fn new(
        geometry: GridGeometry,
        selector: Box<dyn TileSelector>,
        factory: Box<dyn TileFactory>,
    ) -> Self {
        Self {
            geometry,
            phase: GridPhase::Uninitialized,
            // Zero-sized until initialize()
            slots: TileSlots::empty(geometry.dims),
            events: EventBus::new(),
            selector,
            factory,
            inbox: VecDeque::new(),
        }
    }

    /// Grid with the seeded tile library and default spawner.
    /// `None` if the configured geometry is degenerate.
    pub fn from_config(config: &GridConfig) -> Option<Self> {
        let geometry = GridGeometry::from_config(config)?;
        let library = TileLibrary::new(config.library.clone(), config.seed);
        Some(Self::new(geometry, Box::new(library), Box::new(TileSpawner::new())))
    }

    /// Allocate an all-empty slot array
    pub fn initialize(&mut self) {
        if self.phase == GridPhase::Initialized {
            log::warn!("Grid already initialized, keeping current tiles");
            return;
        }
        self.slots = TileSlots::new(self.geometry.dims);
        self.phase = GridPhase::Initialized;
        log::info!(
            "Grid initialized: {}x{} ({} cells)",
            self.geometry.dims.width(),
            self.geometry.dims.height(),
            self.slots.len()
        );
    }

    pub fn phase(&self) -> GridPhase {
        self.phase
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.geometry.dims
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn slots(&self) -> &TileSlots {
        &self.slots
    }

    fn assert_initialized(&self) {
        assert!(
            self.phase == GridPhase::Initialized,
            "grid mutated before initialize()"
        );
    }

    /// Condense then refill. On a fresh grid this performs the initial fill.
    pub fn settle(&mut self) -> SettleReport {
        self.assert_initialized();

        let moved = condense(&mut self.slots, &mut self.events);
        let refilled = refill(
            &mut self.slots,
            &self.geometry,
            self.selector.as_mut(),
            self.factory.as_mut(),
            &mut self.events,
        );

        if refilled.failed > 0 {
            log::warn!("Refill left {} empty cells", refilled.failed);
        }

        SettleReport {
            moved,
            spawned: refilled.spawned,
            failed: refilled.failed,
        }
    }

    /// Clear the given slots, then condense and refill.
    /// Every address must hold a tile; duplicates are collapsed.
    pub fn on_tiles_removed(&mut self, addresses: &[GridAddress]) -> SettleReport {
        self.assert_initialized();

        let addresses: BTreeSet<GridAddress> = addresses.iter().copied().collect();
        for &address in &addresses {
            assert!(
                self.slots.is_occupied(address),
                "removal of empty or invalid slot {}",
                address
            );
            self.slots.set(address, None);
        }

        self.events.publish(GridEvent::TilesRemoved {
            addresses: addresses.into_iter().collect(),
        });

        self.settle()
    }

    /// Queue a removal notification for the next `step`
    pub fn post_removal(&mut self, addresses: Vec<GridAddress>) {
        self.inbox.push_back(addresses);
    }

    /// Handle every queued removal notification, one after another
    pub fn step(&mut self) -> SettleReport {
        let mut report = SettleReport::default();
        while let Some(addresses) = self.inbox.pop_front() {
            report.merge(self.on_tiles_removed(&addresses));
        }
        report
    }

    pub fn tile_at(&self, address: GridAddress) -> Option<&Tile> {
        let tile = self.slots.get(address);
        if tile.is_none() && !self.geometry.dims.contains(address) {
            log::warn!("Invalid grid address {}, no tile", address);
        }
        tile
    }

    pub fn tile_by_id(&self, id: TileId) -> Option<&Tile> {
        self.slots.find_by_id(id)
    }

    pub fn are_neighbors(&self, a: GridAddress, b: GridAddress) -> bool {
        self.geometry.dims.are_neighbors(a, b)
    }

    pub fn neighbors_of(&self, address: GridAddress) -> Vec<GridAddress> {
        self.geometry.dims.neighbors_of(address)
    }

    pub fn offset_address(&self, base: GridAddress, dx: i32, dy: i32) -> Option<GridAddress> {
        self.geometry.dims.offset_address(base, dx, dy)
    }

    /// `None` for addresses off the grid
    pub fn world_position(&self, address: GridAddress) -> Option<Vec3> {
        self.geometry.world_position(address)
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.occupied_count()
    }

    /// Player picked a tile. Publishes `TileSelected` if the tile is selectable.
    pub fn select_tile(&mut self, address: GridAddress) -> bool {
        let (column, row) = self.geometry.dims.to_coords(address);
        match self.slots.get(address) {
            Some(tile) if tile.is_selectable() => {
                log::debug!("Tile {:?} picked at ({}, {})", tile.id, column, row);
                self.events.publish(GridEvent::TileSelected { address });
                true
            }
            Some(_) => false,
            None => {
                log::warn!("Pick on empty address {}", address);
                false
            }
        }
    }

    /// Set the selectable flag on one tile, or on every tile when `target` is `None`.
    /// Returns how many tiles changed.
    pub fn set_selectable(&mut self, target: Option<GridAddress>, value: bool) -> usize {
        self.set_status(target, StatusFlag::Selectable, value)
    }

    /// Set the linked flag on one tile, or on every tile when `target` is `None`
    pub fn set_linked(&mut self, target: Option<GridAddress>, value: bool) -> usize {
        self.set_status(target, StatusFlag::Linked, value)
    }

    fn set_status(&mut self, target: Option<GridAddress>, flag: StatusFlag, value: bool) -> usize {
        let bit = match flag {
            StatusFlag::Selectable => TileStatus::SELECTABLE,
            StatusFlag::Linked => TileStatus::LINKED,
        };

        let mut changed = Vec::new();
        for tile in self.slots.tiles_mut() {
            if target.is_some_and(|a| a != tile.address) {
                continue;
            }
            if tile.status.set(bit, value) {
                log::debug!("Tile {} {:?} flag changed to {}", tile.address, flag, value);
                changed.push((tile.id, tile.address));
            }
        }

        for &(tile_id, address) in &changed {
            self.events.publish(GridEvent::TileStatusChanged {
                tile_id,
                address,
                flag,
                value,
            });
        }
        changed.len()
    }

    pub fn subscribe(
        &mut self,
        kind: GridEventKind,
        handler: impl FnMut(&GridEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Keep a copy of every published event for `take_events`. Off by default:
    /// subscriber-only hosts never drain, so nothing is retained for them.
    /// Turning it off discards anything not yet taken.
    pub fn record_events(&mut self, enabled: bool) {
        self.events.set_logging(enabled);
    }

    /// Drain the events published since the last call.
    /// Always empty unless `record_events(true)` was called.
    pub fn take_events(&mut self) -> Vec<GridEvent> {
        self.events.take_events()
    }

    /// Tile kinds laid out row by row (`None` for empty slots)
    pub fn kind_rows(&self) -> Vec<Vec<Option<u32>>> {
        let dims = self.geometry.dims;
        (0..dims.height())
            .map(|row| {
                (0..dims.width())
                    .map(|column| {
                        dims.to_address(column, row)
                            .and_then(|a| self.slots.get(a))
                            .map(|t| t.kind.0)
                    })
                    .collect()
            })
            .collect()
    }
}
