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
//! Coordinates and directions on the construction grid.

use std::ops::Add;

use enumflags2::BitFlags;
use serde::{Deserialize, Serialize};

/// The coordinates of a single tile on the construction grid. `(0, 0)` is the lower-left
/// corner of the grid; `y` grows upward.
///
/// Coordinates are signed so that tiles just outside the grid (such as the neighbors of
/// a tile on the border) can still be named.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct GridCoordinate {
    pub x: i32,
    pub y: i32,
}

impl GridCoordinate {
    /// Construct a [`GridCoordinate`] from an x and y.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get the coordinate offset from this one by the given amounts.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Get the tile adjacent to this one on the given side.
    pub fn step(self, side: Side) -> Self {
        self + side.delta()
    }

    /// Get the tile diagonally adjacent to this one at the given corner.
    pub fn step_corner(self, corner: Corner) -> Self {
        self + corner.delta()
    }

    /// Iterate the 8 tiles surrounding this one, excluding the tile itself.
    pub fn surrounding(self) -> impl Iterator<Item = GridCoordinate> {
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl Add<(i32, i32)> for GridCoordinate {
    type Output = GridCoordinate;

    fn add(self, (dx, dy): (i32, i32)) -> Self::Output {
        self.offset(dx, dy)
    }
}

impl From<(i32, i32)> for GridCoordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<GridCoordinate> for (i32, i32) {
    fn from(coord: GridCoordinate) -> Self {
        (coord.x, coord.y)
    }
}

/// One of the four sides of a tile. Usable as a bit flag so that a tile's open sides can
/// be collected into a single [`BitFlags<Side>`].
///
/// Sides are indexed clockwise starting from [`Side::Up`].
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Side {
    Up = 0b0001,
    Right = 0b0010,
    Down = 0b0100,
    Left = 0b1000,
}

impl Side {
    /// All sides in index order.
    pub const ALL: [Side; 4] = [Side::Up, Side::Right, Side::Down, Side::Left];

    /// Index of this side in `[0, 4)`.
    pub fn index(self) -> usize {
        match self {
            Side::Up => 0,
            Side::Right => 1,
            Side::Down => 2,
            Side::Left => 3,
        }
    }

    /// Get the side with the given index, wrapping indexes past 3.
    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % 4]
    }

    /// The side facing the other way.
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// The next side going clockwise.
    pub fn clockwise(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The next side going counter-clockwise.
    pub fn counter_clockwise(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Unit offset of a step toward this side.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Side::Up => (0, 1),
            Side::Right => (1, 0),
            Side::Down => (0, -1),
            Side::Left => (-1, 0),
        }
    }
}

/// One of the four diagonal corners of a tile, indexed clockwise from the upper right.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Corner {
    UpRight,
    DownRight,
    DownLeft,
    UpLeft,
}

impl Corner {
    /// All corners in index order.
    pub const ALL: [Corner; 4] = [
        Corner::UpRight,
        Corner::DownRight,
        Corner::DownLeft,
        Corner::UpLeft,
    ];

    /// Index of this corner in `[0, 4)`.
    pub fn index(self) -> usize {
        match self {
            Corner::UpRight => 0,
            Corner::DownRight => 1,
            Corner::DownLeft => 2,
            Corner::UpLeft => 3,
        }
    }

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 2) % 4]
    }

    /// The vertical and horizontal sides that meet at this corner.
    pub fn sides(self) -> (Side, Side) {
        match self {
            Corner::UpRight => (Side::Up, Side::Right),
            Corner::DownRight => (Side::Down, Side::Right),
            Corner::DownLeft => (Side::Down, Side::Left),
            Corner::UpLeft => (Side::Up, Side::Left),
        }
    }

    /// Unit offset of a diagonal step toward this corner.
    pub fn delta(self) -> (i32, i32) {
        let (vertical, horizontal) = self.sides();
        (horizontal.delta().0, vertical.delta().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_sides_cancel() {
        for &side in Side::ALL.iter() {
            let there = GridCoordinate::new(3, 3).step(side);
            assert_eq!(there.step(side.opposite()), GridCoordinate::new(3, 3));
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn corners_step_diagonally() {
        let origin = GridCoordinate::new(0, 0);
        assert_eq!(origin.step_corner(Corner::UpRight), GridCoordinate::new(1, 1));
        assert_eq!(origin.step_corner(Corner::DownRight), GridCoordinate::new(1, -1));
        assert_eq!(origin.step_corner(Corner::DownLeft), GridCoordinate::new(-1, -1));
        assert_eq!(origin.step_corner(Corner::UpLeft), GridCoordinate::new(-1, 1));
        assert_eq!(Corner::UpRight.opposite(), Corner::DownLeft);
    }

    #[test]
    fn surrounding_has_eight_distinct_tiles() {
        let center = GridCoordinate::new(5, 5);
        let around: Vec<_> = center.surrounding().collect();
        assert_eq!(around.len(), 8);
        assert!(!around.contains(&center));
        assert!(around
            .iter()
            .all(|c| (c.x - 5).abs() <= 1 && (c.y - 5).abs() <= 1));
    }

    #[test]
    fn clockwise_walks_all_sides() {
        let mut side = Side::Up;
        for expected in [Side::Right, Side::Down, Side::Left, Side::Up].iter() {
            side = side.clockwise();
            assert_eq!(side, *expected);
        }
        assert_eq!(Side::Up.counter_clockwise(), Side::Left);
    }
}
