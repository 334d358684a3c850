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
//! Bounds of the rectangular construction grid.

use serde::{Deserialize, Serialize};

use crate::board::GridCoordinate;

/// Width and height of the grid when none is specified.
pub const DEFAULT_GRID_SIZE: u32 = 60;

/// Rectangular bounds of a construction grid, anchored at `(0, 0)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    /// Width of the grid. This cooresponds to the `x` coordinate.
    width: u32,
    /// Height of the grid. This cooresponds to the `y` coordinate.
    height: u32,
}

impl GridBounds {
    /// Create new [`GridBounds`] with the specified width and height.
    /// Panics if `width` or `height` is 0 or too large to index with an `i32`.
    pub fn new(width: u32, height: u32) -> Self {
        match Self::try_new(width, height) {
            Some(bounds) => bounds,
            None => panic!("GridBounds must be nonzero and fit in i32, got {}x{}", width, height),
        }
    }

    /// Create new [`GridBounds`] with the specified width and height. Returns `None` if
    /// either is 0, exceeds `i32::MAX`, or if `width * height` overflows `usize`.
    pub fn try_new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            None
        } else {
            (width as usize)
                .checked_mul(height as usize)
                .map(|_| Self { width, height })
        }
    }

    /// Get the width of these [`GridBounds`].
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height of these [`GridBounds`].
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of tiles in the grid.
    pub fn total_size(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check whether the given tile lies inside the grid.
    pub fn contains(&self, coord: GridCoordinate) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as u32) < self.width && (coord.y as u32) < self.height
    }

    /// The geometric center tile of the grid.
    pub fn center(&self) -> GridCoordinate {
        GridCoordinate::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Convert a coordinate to a linear index, or `None` if it is out of bounds.
    pub fn try_linearize(&self, coord: GridCoordinate) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    /// Get back a coordinate from a linear index. Panics if `idx >= total_size`.
    pub fn un_linearize(&self, idx: usize) -> GridCoordinate {
        assert!(
            idx < self.total_size(),
            "index {} out of range for {:?}",
            idx,
            self
        );
        let width = self.width as usize;
        GridCoordinate::new((idx % width) as i32, (idx / width) as i32)
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sixty_square() {
        let bounds = GridBounds::default();
        assert_eq!((bounds.width(), bounds.height()), (60, 60));
        assert_eq!(bounds.center(), GridCoordinate::new(30, 30));
    }

    #[test]
    fn rejects_empty_bounds() {
        assert!(GridBounds::try_new(0, 4).is_none());
        assert!(GridBounds::try_new(4, 0).is_none());
        assert!(GridBounds::try_new(4, 4).is_some());
    }

    #[test]
    fn contains_checks_every_edge() {
        let bounds = GridBounds::new(4, 3);
        assert!(bounds.contains(GridCoordinate::new(0, 0)));
        assert!(bounds.contains(GridCoordinate::new(3, 2)));
        assert!(!bounds.contains(GridCoordinate::new(4, 0)));
        assert!(!bounds.contains(GridCoordinate::new(0, 3)));
        assert!(!bounds.contains(GridCoordinate::new(-1, 0)));
        assert!(!bounds.contains(GridCoordinate::new(0, -1)));
    }

    #[test]
    fn linearize_inverts() {
        let bounds = GridBounds::new(5, 7);
        for idx in 0..bounds.total_size() {
            let coord = bounds.un_linearize(idx);
            assert_eq!(bounds.try_linearize(coord), Some(idx));
        }
        assert_eq!(bounds.try_linearize(GridCoordinate::new(5, 0)), None);
    }
}
