//! Tile slot store
//!
//! Flat row-major array of slots, the single source of truth for occupancy.
//! Never resized after allocation.

use super::address::{GridAddress, GridDimensions};
use super::tile::{Tile, TileId};

#[derive(Debug, Clone)]
pub struct TileSlots {
    dims: GridDimensions,
    slots: Vec<Option<Tile>>,
}

impl TileSlots {
    /// Allocate an all-empty store
    pub fn new(dims: GridDimensions) -> Self {
        Self {
            dims,
            slots: vec![None; dims.cell_count()],
        }
    }

    /// Store with no slots allocated yet
    pub fn empty(dims: GridDimensions) -> Self {
        Self {
            dims,
            slots: Vec::new(),
        }
    }

    pub fn dims(&self) -> GridDimensions {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Tile at `address`, `None` if empty or out of range
    pub fn get(&self, address: GridAddress) -> Option<&Tile> {
        self.slots.get(address).and_then(Option::as_ref)
    }

    pub fn is_occupied(&self, address: GridAddress) -> bool {
        self.get(address).is_some()
    }

    /// Store `tile` (or clear with `None`). The address must be in range.
    /// The stored tile's address is rewritten to match the slot.
    pub fn set(&mut self, address: GridAddress, tile: Option<Tile>) {
        assert!(
            address < self.slots.len(),
            "slot address {} out of range (cells: {})",
            address,
            self.slots.len()
        );
        self.slots[address] = tile.map(|mut t| {
            t.address = address;
            t
        });
    }

    /// Empty the slot and hand back its tile
    pub fn take(&mut self, address: GridAddress) -> Option<Tile> {
        self.slots.get_mut(address).and_then(Option::take)
    }

    /// Relocate the tile at `from` into the empty slot `to`
    pub fn relocate(&mut self, from: GridAddress, to: GridAddress) {
        assert!(
            !self.is_occupied(to),
            "relocation target {} is already occupied",
            to
        );
        let tile = self.take(from);
        assert!(tile.is_some(), "relocation source {} is empty", from);
        self.set(to, tile);
    }

    /// Linear scan for a tile id
    pub fn find_by_id(&self, id: TileId) -> Option<&Tile> {
        self.slots.iter().flatten().find(|t| t.id == id)
    }

    /// Occupied tiles in address order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.slots.iter().flatten()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.slots.iter_mut().flatten()
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Occupancy of one column, top row first
    pub fn column_occupancy(&self, column: usize) -> Vec<bool> {
        (0..self.dims.height())
            .map(|row| {
                self.dims
                    .to_address(column, row)
                    .is_some_and(|a| self.is_occupied(a))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::TileKind;

    fn slots(w: usize, h: usize) -> TileSlots {
        TileSlots::new(GridDimensions::new(w, h).unwrap())
    }

    #[test]
    fn test_new_is_all_empty() {
        let s = slots(4, 3);
        assert_eq!(s.len(), 12);
        assert_eq!(s.occupied_count(), 0);
        assert!(s.get(0).is_none());
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let s = slots(2, 2);
        assert!(s.get(4).is_none());
        assert!(s.get(usize::MAX).is_none());
    }

    #[test]
    fn test_set_rewrites_address() {
        let mut s = slots(3, 3);
        s.set(5, Some(Tile::new(TileId(9), TileKind(1), 0)));
        assert_eq!(s.get(5).map(|t| t.address), Some(5));
        assert_eq!(s.find_by_id(TileId(9)).map(|t| t.address), Some(5));
        assert!(s.find_by_id(TileId(10)).is_none());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_out_of_range_panics() {
        let mut s = slots(2, 2);
        s.set(4, None);
    }

    #[test]
    fn test_relocate() {
        let mut s = slots(1, 3);
        s.set(0, Some(Tile::new(TileId(1), TileKind(0), 0)));
        s.relocate(0, 2);
        assert!(!s.is_occupied(0));
        assert_eq!(s.get(2).map(|t| (t.id, t.address)), Some((TileId(1), 2)));
        assert_eq!(s.column_occupancy(0), vec![false, false, true]);
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_relocate_onto_tile_panics() {
        let mut s = slots(1, 2);
        s.set(0, Some(Tile::new(TileId(1), TileKind(0), 0)));
        s.set(1, Some(Tile::new(TileId(2), TileKind(0), 1)));
        s.relocate(0, 1);
    }
}
