//! Refill
//!
//! After condensation every column's empty cells form a run starting at row 0.
//! Each such cell gets a freshly selected and created tile. Creation is
//! best-effort per cell: a factory failure is logged and leaves that cell empty.

use super::address::GridGeometry;
use super::events::{EventBus, GridEvent};
use super::slots::TileSlots;
use super::supply::{TileFactory, TileSelector};

/// Result of one refill pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefillOutcome {
    pub spawned: usize,
    pub failed: usize,
}

/// Length of the empty run at the top of `column`
pub fn empty_run_length(slots: &TileSlots, column: usize) -> usize {
    slots
        .column_occupancy(column)
        .iter()
        .take_while(|&&occupied| !occupied)
        .count()
}

/// Fill the empty top cells of every column
pub fn refill(
    slots: &mut TileSlots,
    geometry: &GridGeometry,
    selector: &mut dyn TileSelector,
    factory: &mut dyn TileFactory,
    events: &mut EventBus,
) -> RefillOutcome {
    let dims = geometry.dims;
    let mut outcome = RefillOutcome::default();

    for column in 0..dims.width() {
        let occupancy = slots.column_occupancy(column);
        let run = empty_run_length(slots, column);
        assert!(
            occupancy[run..].iter().all(|&o| o),
            "refill on column {} with holes below row {}; condense first",
            column,
            run
        );

        // Top row occupied: nothing to refill
        if run == 0 {
            continue;
        }

        for row in 0..run {
            let Some(address) = dims.to_address(column, row) else {
                continue;
            };
            let kind = selector.select_tile_kind();
            let Some(position) = geometry.world_position(address) else {
                continue;
            };

            match factory.create_tile(position, address, kind) {
                Some(tile) => {
                    let tile_id = tile.id;
                    slots.set(address, Some(tile));
                    events.publish(GridEvent::TileSpawned {
                        tile_id,
                        address,
                        kind,
                    });
                    outcome.spawned += 1;
                }
                None => {
                    log::error!("Cannot create tile at column {}, row {}", column, row);
                    outcome.failed += 1;
                }
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::address::{GridAddress, GridDimensions};
    use crate::sim::supply::{TileLibrary, TileSpawner};
    use crate::sim::tile::{Tile, TileId, TileKind};
    use glam::{Vec2, Vec3};

    fn geometry(w: usize, h: usize) -> GridGeometry {
        GridGeometry::new(GridDimensions::new(w, h).unwrap(), Vec2::ONE, Vec3::ZERO).unwrap()
    }

    fn slots_with(geometry: &GridGeometry, occupied: &[GridAddress]) -> TileSlots {
        let mut slots = TileSlots::new(geometry.dims);
        for &address in occupied {
            slots.set(address, Some(Tile::new(TileId(1000 + address as u64), TileKind(9), address)));
        }
        slots
    }

    /// Fails every `nth` call
    struct FlakyFactory {
        inner: TileSpawner,
        calls: usize,
        nth: usize,
    }

    impl TileFactory for FlakyFactory {
        fn create_tile(&mut self, position: Vec3, address: GridAddress, kind: TileKind) -> Option<Tile> {
            self.calls += 1;
            if self.calls % self.nth == 0 {
                return None;
            }
            self.inner.create_tile(position, address, kind)
        }
    }

    #[test]
    fn test_refill_top_of_column() {
        let geometry = geometry(3, 3);
        // Column 0 condensed: rows 1 and 2 occupied. Other columns full.
        let mut slots = slots_with(&geometry, &[1, 2, 3, 4, 5, 6, 7, 8]);
        let mut events = EventBus::with_log();

        let outcome = refill(
            &mut slots,
            &geometry,
            &mut TileLibrary::uniform(3, 1),
            &mut TileSpawner::new(),
            &mut events,
        );

        assert_eq!(outcome, RefillOutcome { spawned: 1, failed: 0 });
        assert_eq!(slots.column_occupancy(0), vec![true, true, true]);
        assert_eq!(slots.get(0).map(|t| t.id), Some(TileId(1)));

        let events = events.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GridEvent::TileSpawned { address: 0, tile_id: TileId(1), .. }));
    }

    #[test]
    fn test_refill_empty_grid_fills_everything() {
        let geometry = geometry(4, 3);
        let mut slots = TileSlots::new(geometry.dims);
        let mut events = EventBus::with_log();

        let outcome = refill(
            &mut slots,
            &geometry,
            &mut TileLibrary::uniform(4, 5),
            &mut TileSpawner::new(),
            &mut events,
        );

        assert_eq!(outcome.spawned, 12);
        assert_eq!(slots.occupied_count(), 12);
        assert!(slots.tiles().all(|t| slots.get(t.address).map(|s| s.id) == Some(t.id)));
    }

    #[test]
    fn test_factory_failure_continues() {
        let geometry = geometry(1, 4);
        let mut slots = TileSlots::new(geometry.dims);
        let mut events = EventBus::with_log();
        let mut factory = FlakyFactory {
            inner: TileSpawner::new(),
            calls: 0,
            nth: 2,
        };

        let outcome = refill(
            &mut slots,
            &geometry,
            &mut TileLibrary::uniform(2, 3),
            &mut factory,
            &mut events,
        );

        // Calls 2 and 4 fail: rows 1 and 3 stay empty
        assert_eq!(outcome, RefillOutcome { spawned: 2, failed: 2 });
        assert_eq!(slots.column_occupancy(0), vec![true, false, true, false]);
        assert_eq!(events.take_events().len(), 2);
    }

    #[test]
    fn test_full_column_untouched() {
        let geometry = geometry(2, 2);
        let mut slots = slots_with(&geometry, &[0, 1, 2, 3]);
        let mut events = EventBus::with_log();

        let outcome = refill(
            &mut slots,
            &geometry,
            &mut TileLibrary::uniform(2, 3),
            &mut TileSpawner::new(),
            &mut events,
        );

        assert_eq!(outcome, RefillOutcome::default());
        assert_eq!(slots.get(0).map(|t| t.id), Some(TileId(1000)));
    }

    #[test]
    #[should_panic(expected = "condense first")]
    fn test_interior_hole_panics() {
        let geometry = geometry(1, 3);
        // Row 0 occupied, row 1 empty, row 2 occupied
        let mut slots = slots_with(&geometry, &[0, 2]);
        let mut events = EventBus::with_log();

        refill(
            &mut slots,
            &geometry,
            &mut TileLibrary::uniform(2, 3),
            &mut TileSpawner::new(),
            &mut events,
        );
    }

    #[test]
    fn test_empty_run_length() {
        let geometry = geometry(1, 4);
        let slots = slots_with(&geometry, &[2, 3]);
        assert_eq!(empty_run_length(&slots, 0), 2);
    }
}
