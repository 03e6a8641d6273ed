//! Condensation (gravity)
//!
//! Tiles fall straight down their column to close holes. Columns are
//! independent. Each column is processed bottom to top so a falling tile only
//! ever lands on a slot that lower tiles have already vacated.

use std::collections::HashMap;

use super::address::GridAddress;
use super::events::{EventBus, GridEvent};
use super::slots::TileSlots;

/// address -> number of empty slots strictly below it in the same column.
/// Only occupied slots with at least one hole below appear.
pub type HoleCountMap = HashMap<GridAddress, usize>;

/// Count the holes under every occupied slot
pub fn hole_counts(slots: &TileSlots) -> HoleCountMap {
    let dims = slots.dims();
    let mut holes = HoleCountMap::new();

    for column in 0..dims.width() {
        let occupancy = slots.column_occupancy(column);
        for (row, &occupied) in occupancy.iter().enumerate() {
            if !occupied {
                continue;
            }

            let below = occupancy[row + 1..].iter().filter(|&&o| !o).count();
            if below > 0 {
                if let Some(address) = dims.to_address(column, row) {
                    log::debug!("Tile at address {} will drop {}", address, below);
                    holes.insert(address, below);
                }
            }
        }
    }

    holes
}

/// Apply gravity to every column. Publishes one `TileMoved` per falling tile
/// (before the tile is relocated) and returns the number of moves.
pub fn condense(slots: &mut TileSlots, events: &mut EventBus) -> usize {
    let dims = slots.dims();
    let holes = hole_counts(slots);
    if holes.is_empty() {
        return 0;
    }

    let mut moved = 0;
    for column in 0..dims.width() {
        for row in (0..dims.height()).rev() {
            let Some(old_address) = dims.to_address(column, row) else {
                continue;
            };
            let Some(&distance) = holes.get(&old_address) else {
                continue;
            };

            let tile_id = match slots.get(old_address) {
                Some(tile) => tile.id,
                None => panic!("hole map entry {} points at an empty slot", old_address),
            };
            let new_address = dims
                .to_address(column, row + distance)
                .unwrap_or_else(|| panic!("tile at {} would drop {} rows off the grid", old_address, distance));

            events.publish(GridEvent::TileMoved {
                tile_id,
                old_address,
                new_address,
            });
            slots.relocate(old_address, new_address);
            moved += 1;
        }
    }

    moved
}

/// True if no column has an empty slot below an occupied one
pub fn is_settled(slots: &TileSlots) -> bool {
    let dims = slots.dims();
    (0..dims.width()).all(|column| {
        let occupancy = slots.column_occupancy(column);
        occupancy.windows(2).all(|pair| !(pair[0] && !pair[1]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::address::GridDimensions;
    use crate::sim::tile::{Tile, TileId, TileKind};

    fn grid_with(w: usize, h: usize, occupied: &[GridAddress]) -> TileSlots {
        let mut slots = TileSlots::new(GridDimensions::new(w, h).unwrap());
        for (i, &address) in occupied.iter().enumerate() {
            slots.set(address, Some(Tile::new(TileId(i as u64 + 1), TileKind(0), address)));
        }
        slots
    }

    #[test]
    fn test_single_hole_drop() {
        // Column 0: rows 0 and 2 occupied, row 1 empty
        let mut slots = grid_with(3, 3, &[0, 6]);
        let mut events = EventBus::with_log();

        let moved = condense(&mut slots, &mut events);

        assert_eq!(moved, 1);
        assert_eq!(slots.column_occupancy(0), vec![false, true, true]);
        assert_eq!(
            events.take_events(),
            vec![GridEvent::TileMoved {
                tile_id: TileId(1),
                old_address: 0,
                new_address: 3,
            }]
        );
        assert_eq!(slots.get(3).map(|t| (t.id, t.address)), Some((TileId(1), 3)));
    }

    #[test]
    fn test_hole_counts() {
        // 1x4 column: X . X .
        let slots = grid_with(1, 4, &[0, 2]);
        let holes = hole_counts(&slots);
        assert_eq!(holes.get(&0), Some(&2));
        assert_eq!(holes.get(&2), Some(&1));
        assert_eq!(holes.len(), 2);
    }

    #[test]
    fn test_stack_keeps_order() {
        // 1x5 column: A B . . C
        let mut slots = grid_with(1, 5, &[0, 1, 4]);
        let mut events = EventBus::with_log();

        assert_eq!(condense(&mut slots, &mut events), 2);
        assert_eq!(slots.column_occupancy(0), vec![false, false, true, true, true]);
        assert_eq!(slots.get(2).map(|t| t.id), Some(TileId(1)));
        assert_eq!(slots.get(3).map(|t| t.id), Some(TileId(2)));
        assert_eq!(slots.get(4).map(|t| t.id), Some(TileId(3)));

        // Lower tile moves first
        let events = events.take_events();
        assert_eq!(
            events[0],
            GridEvent::TileMoved {
                tile_id: TileId(2),
                old_address: 1,
                new_address: 3,
            }
        );
    }

    #[test]
    fn test_columns_independent() {
        // 2x3: column 0 settled, column 1 floating
        let mut slots = grid_with(2, 3, &[4, 1]);
        let mut events = EventBus::with_log();

        assert_eq!(condense(&mut slots, &mut events), 1);
        assert_eq!(slots.column_occupancy(0), vec![false, false, true]);
        assert_eq!(slots.column_occupancy(1), vec![false, false, true]);
    }

    #[test]
    fn test_condense_idempotent() {
        let mut slots = grid_with(3, 4, &[0, 1, 5, 9, 10]);
        let mut events = EventBus::with_log();

        assert!(condense(&mut slots, &mut events) > 0);
        assert!(is_settled(&slots));
        events.take_events();

        assert_eq!(condense(&mut slots, &mut events), 0);
        assert!(events.take_events().is_empty());
    }

    #[test]
    fn test_empty_and_full_grids_emit_nothing() {
        let mut events = EventBus::with_log();

        let mut empty = grid_with(3, 3, &[]);
        assert_eq!(condense(&mut empty, &mut events), 0);

        let all: Vec<_> = (0..9).collect();
        let mut full = grid_with(3, 3, &all);
        assert_eq!(condense(&mut full, &mut events), 0);
        assert!(events.pending().is_empty());
    }
}
