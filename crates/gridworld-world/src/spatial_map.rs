//! The occupancy grid.
//!
//! [`SpatialMap`] stores every [`Cell`] keyed by [`Coord`]. It is built once
//! from a parsed map and afterwards only changes through [`SpatialMap::occupy`]
//! and [`SpatialMap::vacate`], which keep the "closed iff wall or occupied"
//! rule intact. Callers that move actors are expected to pair one `vacate`
//! with one `occupy` inside the same critical section.
//!
//! `Coord` orders column-first, so anything that must come out row-major
//! sorts explicitly.

use std::collections::BTreeMap;

use gridworld_types::{ActorId, Coord};

use crate::cell::Cell;
use crate::error::WorldError;

/// All cells of the world, keyed by coordinate.
#[derive(Debug, Clone, Default)]
pub struct SpatialMap {
    /// Cells indexed by their coordinate.
    cells: BTreeMap<Coord, Cell>,
}

impl SpatialMap {
    /// Create an empty map.
    pub const fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Add a cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateCell`] if a cell already exists at the
    /// same coordinate.
    pub fn insert(&mut self, cell: Cell) -> Result<(), WorldError> {
        let coord = cell.coord;
        if self.cells.contains_key(&coord) {
            return Err(WorldError::DuplicateCell(coord));
        }
        self.cells.insert(coord, cell);
        Ok(())
    }

    /// Get the cell at `coord`.
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Return `true` if the map has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The occupant of `coord`, if the cell exists and is occupied.
    pub fn occupant_at(&self, coord: Coord) -> Option<&ActorId> {
        self.cells.get(&coord).and_then(|c| c.occupant.as_ref())
    }

    /// Return `true` if `coord` exists and is neither a wall nor occupied.
    pub fn is_enterable(&self, coord: Coord) -> bool {
        self.cells.get(&coord).is_some_and(Cell::is_enterable)
    }

    /// Place `actor` on `coord`, closing the cell.
    ///
    /// Returns `false` and changes nothing if the cell is missing or not
    /// enterable.
    pub fn occupy(&mut self, coord: Coord, actor: &ActorId) -> bool {
        match self.cells.get_mut(&coord) {
            Some(cell) if cell.is_enterable() => {
                cell.closed = true;
                cell.occupant = Some(actor.clone());
                true
            }
            _ => false,
        }
    }

    /// Remove `actor` from `coord`, reopening the cell.
    ///
    /// Only clears the cell when `actor` is the recorded occupant, so a late
    /// or repeated vacate never evicts someone else. Returns `true` if the
    /// cell was cleared.
    pub fn vacate(&mut self, coord: Coord, actor: &ActorId) -> bool {
        match self.cells.get_mut(&coord) {
            Some(cell) if cell.occupant.as_ref() == Some(actor) => {
                cell.occupant = None;
                cell.closed = cell.is_wall();
                true
            }
            _ => false,
        }
    }

    /// Every enterable coordinate, in row-major order.
    pub fn vacant_cells(&self) -> Vec<Coord> {
        let mut vacant: Vec<Coord> = self
            .cells
            .values()
            .filter(|c| c.is_enterable())
            .map(|c| c.coord)
            .collect();
        vacant.sort_by_key(|c| (c.y, c.x));
        vacant
    }

    /// The enterable coordinate closest to `from`.
    ///
    /// Distance is Chebyshev; ties break on row, then column. Returns `from`
    /// itself when it is enterable, and `None` when nothing is free.
    pub fn nearest_vacant(&self, from: Coord) -> Option<Coord> {
        self.cells
            .values()
            .filter(|c| c.is_enterable())
            .map(|c| c.coord)
            .min_by_key(|c| (c.chebyshev(from), c.y, c.x))
    }

    /// Every occupied coordinate with its occupant.
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, &ActorId)> {
        self.cells
            .values()
            .filter_map(|c| c.occupant.as_ref().map(|id| (c.coord, id)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A 3x3 room of floor with a wall at (1,1).
    fn room() -> SpatialMap {
        let mut map = SpatialMap::new();
        for y in 1..=3 {
            for x in 1..=3 {
                let glyph = if x == 1 && y == 1 { '#' } else { ' ' };
                let cell = Cell::from_glyph(Coord::new(x, y), glyph);
                map.insert(cell).unwrap();
            }
        }
        map
    }

    #[test]
    fn duplicate_cells_are_rejected() {
        let mut map = room();
        let err = map.insert(Cell::floor(Coord::new(2, 2))).unwrap_err();
        let duplicate = matches!(err, WorldError::DuplicateCell(Coord { x: 2, y: 2 }));
        assert!(duplicate);
    }

    #[test]
    fn occupy_then_vacate_restores_floor() {
        let mut map = room();
        let alice = ActorId::new("alice");
        let here = Coord::new(2, 2);

        assert!(map.occupy(here, &alice));
        assert!(!map.is_enterable(here));
        assert_eq!(map.occupant_at(here), Some(&alice));

        // Someone else cannot take the cell.
        assert!(!map.occupy(here, &ActorId::new("bob")));

        assert!(map.vacate(here, &alice));
        assert!(map.is_enterable(here));
        assert_eq!(map.occupant_at(here), None);
    }

    #[test]
    fn vacate_by_non_occupant_is_a_no_op() {
        let mut map = room();
        let alice = ActorId::new("alice");
        let here = Coord::new(3, 3);
        assert!(map.occupy(here, &alice));
        assert!(!map.vacate(here, &ActorId::new("bob")));
        assert_eq!(map.occupant_at(here), Some(&alice));
        assert!(map.vacate(here, &alice));
        assert!(!map.vacate(here, &alice));
    }

    #[test]
    fn walls_and_missing_cells_cannot_be_occupied() {
        let mut map = room();
        let alice = ActorId::new("alice");
        assert!(!map.occupy(Coord::new(1, 1), &alice));
        assert!(!map.occupy(Coord::new(9, 9), &alice));
        assert_eq!(map.occupied().count(), 0);
    }

    #[test]
    fn nearest_vacant_prefers_distance_then_row_then_column() {
        let mut map = room();
        let from = Coord::new(2, 2);
        assert_eq!(map.nearest_vacant(from), Some(from));

        assert!(map.occupy(from, &ActorId::new("a")));
        // (1,1) is a wall, so the first ring cell in row-major order is (2,1).
        assert_eq!(map.nearest_vacant(from), Some(Coord::new(2, 1)));
    }

    #[test]
    fn nearest_vacant_on_full_map_is_none() {
        let mut map = room();
        for (i, coord) in map.vacant_cells().into_iter().enumerate() {
            assert!(map.occupy(coord, &ActorId::new(format!("a{i}"))));
        }
        assert!(map.vacant_cells().is_empty());
        assert_eq!(map.nearest_vacant(Coord::new(2, 2)), None);
    }

    #[test]
    fn vacant_cells_are_row_major() {
        let map = room();
        let vacant = map.vacant_cells();
        assert_eq!(vacant.len(), 8);
        assert_eq!(vacant.first(), Some(&Coord::new(2, 1)));
        assert_eq!(vacant.get(1), Some(&Coord::new(3, 1)));
        assert_eq!(vacant.last(), Some(&Coord::new(3, 3)));
    }
}
