// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! The occupancy store: which grid tiles are claimed, and by which module.

use std::{
    collections::{BTreeSet, HashMap},
    ops::Index,
};

use thiserror::Error;

use crate::{
    board::{GridBounds, GridCoordinate},
    modules::ModuleId,
};

/// Reason a set of tiles could not be claimed.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotClaimReason {
    /// At least one tile lies outside the grid.
    #[error("tile outside of the grid")]
    OutOfBounds,
    /// At least one tile is already claimed by another module.
    #[error("tile already occupied")]
    Overlap,
}

/// Tracks the tiles claimed by committed modules in one session.
///
/// Every claimed tile belongs to exactly one module, and each module's claim is stored
/// alongside the cells, so releasing a module returns exactly the tiles it marked.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    /// Bounds of the grid.
    bounds: GridBounds,
    /// Owner of each tile, in row-major order.
    cells: Box<[Option<ModuleId>]>,
    /// The tiles each committed module claimed, in footprint order.
    claims: HashMap<ModuleId, Vec<GridCoordinate>>,
}

impl OccupancyGrid {
    /// Construct an empty occupancy grid with the given bounds.
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            cells: vec![None; bounds.total_size()].into_boxed_slice(),
            claims: HashMap::new(),
        }
    }

    /// Get the [`GridBounds`] of this grid.
    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    /// Bounds check for a single tile.
    pub fn is_in_grid(&self, tile: GridCoordinate) -> bool {
        self.bounds.contains(tile)
    }

    /// Whether any module has claimed the given tile. Out of bounds tiles are never
    /// occupied.
    pub fn is_occupied(&self, tile: GridCoordinate) -> bool {
        self.owner(tile).is_some()
    }

    /// The module that claimed the given tile, if any.
    pub fn owner(&self, tile: GridCoordinate) -> Option<ModuleId> {
        self.bounds
            .try_linearize(tile)
            .and_then(|i| self.cells.get(i).copied().flatten())
    }

    /// Whether the given module currently holds a claim.
    pub fn is_claimed(&self, id: ModuleId) -> bool {
        self.claims.contains_key(&id)
    }

    /// Check whether every tile is inside the grid and free. Tiles already claimed by
    /// `ignoring` count as free, so a module can be checked against its own old
    /// position when it is being moved.
    pub fn check_claim<'a, T>(
        &self,
        tiles: T,
        ignoring: Option<ModuleId>,
    ) -> Result<(), CannotClaimReason>
    where
        T: IntoIterator<Item = &'a GridCoordinate>,
    {
        for &tile in tiles {
            match self.bounds.try_linearize(tile).map(|i| self.cells[i]) {
                None => return Err(CannotClaimReason::OutOfBounds),
                Some(Some(owner)) if Some(owner) != ignoring => {
                    return Err(CannotClaimReason::Overlap)
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Mark the tiles as claimed by the given module.
    ///
    /// Panics if the module already holds a claim or if any tile is out of bounds or
    /// occupied. Callers validate with [`check_claim`][Self::check_claim] first.
    pub fn mark(&mut self, id: ModuleId, tiles: Vec<GridCoordinate>) {
        assert!(
            !self.claims.contains_key(&id),
            "module {:?} already holds a claim",
            id
        );
        if let Err(reason) = self.check_claim(&tiles, None) {
            panic!("cannot mark tiles for {:?}: {}", id, reason);
        }
        for &tile in &tiles {
            if let Some(i) = self.bounds.try_linearize(tile) {
                self.cells[i] = Some(id);
            }
        }
        self.claims.insert(id, tiles);
    }

    /// Clear the claim held by the given module. Returns the tiles that were released,
    /// or `None` if the module held no claim.
    pub fn unmark(&mut self, id: ModuleId) -> Option<Vec<GridCoordinate>> {
        let tiles = self.claims.remove(&id)?;
        for &tile in &tiles {
            if let Some(i) = self.bounds.try_linearize(tile) {
                self.cells[i] = None;
            }
        }
        Some(tiles)
    }

    /// Iterate all occupied tiles in row-major order.
    pub fn tiles(&self) -> impl '_ + Iterator<Item = GridCoordinate> {
        let bounds = self.bounds;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some())
            .map(move |(i, _)| bounds.un_linearize(i))
    }

    /// Collect the occupied tiles into an ordered set.
    pub fn occupied_set(&self) -> BTreeSet<GridCoordinate> {
        self.tiles().collect()
    }

    /// Number of occupied tiles.
    pub fn len(&self) -> usize {
        self.claims.values().map(Vec::len).sum()
    }

    /// True if no tile is occupied.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl Index<GridCoordinate> for OccupancyGrid {
    type Output = Option<ModuleId>;

    fn index(&self, tile: GridCoordinate) -> &Self::Output {
        let i = self
            .bounds
            .try_linearize(tile)
            .expect("coordinate out of bounds");
        &self.cells[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(coords: &[(i32, i32)]) -> Vec<GridCoordinate> {
        coords.iter().map(|&c| c.into()).collect()
    }

    #[test]
    fn mark_then_unmark_restores_empty() {
        let mut grid = OccupancyGrid::new(GridBounds::new(8, 8));
        let id = ModuleId::from_raw(1);
        grid.mark(id, tiles(&[(1, 1), (2, 1)]));
        assert!(grid.is_occupied(GridCoordinate::new(2, 1)));
        assert_eq!(grid.owner(GridCoordinate::new(1, 1)), Some(id));
        assert_eq!(grid.len(), 2);

        let released = grid.unmark(id).unwrap();
        assert_eq!(released, tiles(&[(1, 1), (2, 1)]));
        assert!(grid.is_empty());
        assert_eq!(grid.tiles().count(), 0);
        assert!(grid.unmark(id).is_none());
    }

    #[test]
    fn check_reports_bounds_before_overlap() {
        let mut grid = OccupancyGrid::new(GridBounds::new(4, 4));
        grid.mark(ModuleId::from_raw(0), tiles(&[(0, 0)]));
        assert_eq!(
            grid.check_claim(&tiles(&[(4, 0)]), None),
            Err(CannotClaimReason::OutOfBounds)
        );
        assert_eq!(
            grid.check_claim(&tiles(&[(0, 0)]), None),
            Err(CannotClaimReason::Overlap)
        );
        assert_eq!(
            grid.check_claim(&tiles(&[(0, 0)]), Some(ModuleId::from_raw(0))),
            Ok(())
        );
    }

    #[test]
    #[should_panic]
    fn double_mark_panics() {
        let mut grid = OccupancyGrid::new(GridBounds::new(4, 4));
        grid.mark(ModuleId::from_raw(0), tiles(&[(0, 0)]));
        grid.mark(ModuleId::from_raw(1), tiles(&[(0, 0)]));
    }

    #[test]
    fn out_of_grid_tiles_are_never_occupied() {
        let grid = OccupancyGrid::new(GridBounds::new(2, 2));
        assert!(!grid.is_occupied(GridCoordinate::new(-1, 0)));
        assert!(!grid.is_in_grid(GridCoordinate::new(2, 0)));
    }
}
