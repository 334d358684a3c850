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
//! Footprint math: how much of the grid a module covers at a given anchor and rotation.
//!
//! Everything here is pure. The same functions drive real placement and preview
//! rendering.

use serde::{Deserialize, Serialize};

use crate::board::GridCoordinate;

/// One of the four cardinal rotations a module can be placed at.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// All rotations, in clockwise order.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// The rotation in degrees.
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Parse a rotation from degrees. Only exact multiples of 90 in `[0, 360)` are
    /// accepted.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// The next rotation, turning a further 90 degrees.
    pub fn next(self) -> Self {
        Self::ALL[(self.degrees() / 90 + 1) as usize % 4]
    }

    /// Whether this rotation swaps the width and height of a footprint.
    pub fn is_sideways(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::Deg0
    }
}

/// Width and height of a module, in tiles.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Construct a size from a width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of tiles covered by a footprint of this size.
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Size of a footprint after rotation. 90 and 270 degree rotations swap the axes.
pub fn rotated_size(size: Size, rotation: Rotation) -> Size {
    if rotation.is_sideways() {
        Size::new(size.height, size.width)
    } else {
        size
    }
}

/// Offset from the anchor tile to the visual center of a rotated module, in tiles.
///
/// Each rotation keeps the module pinned to its anchor tile. Sizes with an even side get
/// an extra half or whole tile correction on the sideways rotations so the sprite lines up
/// with the covered tiles.
pub fn rotation_offset(size: Size, rotation: Rotation) -> (f32, f32) {
    let (w, h) = (size.width as f32, size.height as f32);
    let (mut dx, mut dy) = match rotation {
        Rotation::Deg0 => (w / 2.0 - 0.5, h / 2.0 - 0.5),
        Rotation::Deg90 => (h / 2.0 - 0.5, -w / 2.0 + 0.5),
        Rotation::Deg180 => (-w / 2.0 + 0.5, -h / 2.0 + 0.5),
        Rotation::Deg270 => (-h / 2.0 + 0.5, w / 2.0 - 0.5),
    };

    let has_even_side = size.width % 2 == 0 || size.height % 2 == 0;
    if has_even_side && size.width != size.height {
        let correction = if (size.width as i64 - size.height as i64).abs() == 1 {
            0.5
        } else {
            1.0
        };
        match rotation {
            Rotation::Deg90 => {
                dx -= correction;
                dy -= correction;
            }
            Rotation::Deg270 => {
                dx += correction;
                dy += correction;
            }
            _ => {}
        }
    }
    (dx, dy)
}

/// Enumerate the tiles covered by a module of the given unrotated `size` anchored at
/// `anchor`.
///
/// The anchor is the tile under the module's own lower-left corner. Rotating the module
/// turns it around that tile, so a 90 degree rotation grows downward from the anchor, 180
/// grows down and left, and 270 grows left.
pub fn occupied_tiles(anchor: GridCoordinate, size: Size, rotation: Rotation) -> Vec<GridCoordinate> {
    let rotated = rotated_size(size, rotation);
    let (w, h) = (rotated.width as i32, rotated.height as i32);
    let (sx, sy) = match rotation {
        Rotation::Deg0 => (1, 1),
        Rotation::Deg90 => (1, -1),
        Rotation::Deg180 => (-1, -1),
        Rotation::Deg270 => (-1, 1),
    };
    let mut tiles = Vec::with_capacity(rotated.area());
    for j in 0..h {
        for i in 0..w {
            tiles.push(anchor.offset(sx * i, sy * j));
        }
    }
    tiles
}

/// A module's size placed at a particular anchor and rotation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Footprint {
    anchor: GridCoordinate,
    size: Size,
    rotation: Rotation,
}

impl Footprint {
    /// Construct a footprint for an unrotated `size` at the given anchor and rotation.
    pub fn new(anchor: GridCoordinate, size: Size, rotation: Rotation) -> Self {
        Self {
            anchor,
            size,
            rotation,
        }
    }

    /// The anchor tile.
    pub fn anchor(&self) -> GridCoordinate {
        self.anchor
    }

    /// The unrotated size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The rotation.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// The size after rotation.
    pub fn rotated_size(&self) -> Size {
        rotated_size(self.size, self.rotation)
    }

    /// Offset from the anchor to the visual center.
    pub fn offset(&self) -> (f32, f32) {
        rotation_offset(self.size, self.rotation)
    }

    /// The tiles covered by this footprint.
    pub fn tiles(&self) -> Vec<GridCoordinate> {
        occupied_tiles(self.anchor, self.size, self.rotation)
    }
}
