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
//! Hull plating derived from the shape of a structure, and the hull tier that armors it.
//!
//! Plates are never placed by hand. Given the set of occupied tiles, [`derive_plates`]
//! works out which empty tiles around the structure need a plate and which way each
//! plate faces:
//!
//! 1. A straight plate on every open side of every occupied tile, facing back toward the
//!    tile. Roughly a third of straight plates use the alternate look.
//! 2. An outer corner on every diagonal whose two flanking sides are both open, facing
//!    back toward the tile.
//! 3. An inner corner on every open side whose tile touches the structure again around a
//!    bend.
//!
//! A tile can carry several plates, but never two of the same kind facing the same way.

use std::{
    collections::{BTreeMap, BTreeSet},
    convert::TryFrom,
};

use enumflags2::BitFlags;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    board::{Corner, GridBounds, GridCoordinate, Side},
    stats::{StatContributions, VesselStat},
};

/// Chance that a straight plate uses its alternate look.
pub const ALTERNATE_STRAIGHT_CHANCE: f64 = 0.3;

/// Armor tier of a vessel's outer hull, from 0 to [`HullTier::MAX`].
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct HullTier(u8);

/// Error for a hull tier outside of `0..=HullTier::MAX`.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("hull tier {0} is out of range, expected 0 to 2")]
pub struct InvalidHullTier(pub u8);

impl HullTier {
    /// Highest available tier.
    pub const MAX: u8 = 2;

    const DAMAGE_REDUCTION: [f32; 3] = [0.0, 5.0, 10.0];
    const COST_PER_SURFACE: [u32; 3] = [5, 10, 20];

    /// Get the tier with the given level, or `None` if it is above [`HullTier::MAX`].
    pub fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX {
            Some(HullTier(level))
        } else {
            None
        }
    }

    /// The zero-based level of this tier.
    pub fn level(self) -> u8 {
        self.0
    }

    /// Percentage of incoming damage this tier blocks.
    pub fn damage_reduction(self) -> f32 {
        Self::DAMAGE_REDUCTION[self.0 as usize]
    }

    /// Cost of plating a single tile at this tier.
    pub fn cost_per_surface(self) -> u32 {
        Self::COST_PER_SURFACE[self.0 as usize]
    }

    /// Stat deltas contributed by a hull of this tier.
    pub fn contributions(self) -> StatContributions {
        let mut values = StatContributions::new();
        values.insert(VesselStat::DamageReduction, self.damage_reduction());
        values
    }
}

impl TryFrom<u8> for HullTier {
    type Error = InvalidHullTier;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        HullTier::new(level).ok_or(InvalidHullTier(level))
    }
}

impl From<HullTier> for u8 {
    fn from(tier: HullTier) -> Self {
        tier.0
    }
}

/// Shape of a hull plate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum PlateKind {
    /// A flat plate along one side of the structure.
    Straight,
    /// A plate wrapping a convex corner.
    OuterCorner,
    /// A plate filling a concave corner.
    InnerCorner,
}

/// A single derived hull plate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HullPlate {
    kind: PlateKind,
    direction: usize,
    variant: bool,
}

impl HullPlate {
    fn straight(facing: Side, variant: bool) -> Self {
        Self {
            kind: PlateKind::Straight,
            direction: facing.index(),
            variant,
        }
    }

    fn corner(kind: PlateKind, facing: Corner) -> Self {
        Self {
            kind,
            direction: facing.index(),
            variant: false,
        }
    }

    /// Shape of the plate.
    pub fn kind(&self) -> PlateKind {
        self.kind
    }

    /// Direction index in `[0, 4)`. For straight plates this is a [`Side`] index, for
    /// corners a [`Corner`] index.
    pub fn direction(&self) -> usize {
        self.direction
    }

    /// Whether a straight plate uses its alternate look. Always false for corners.
    pub fn use_variant(&self) -> bool {
        self.variant
    }
}

/// Plates keyed by the tile they sit on.
pub type HullPlateMap = BTreeMap<GridCoordinate, Vec<HullPlate>>;

/// Direction of the inner corner found by probing out of a tile toward `side` and then
/// turning clockwise (first entry) or counter-clockwise (second entry) back onto the
/// structure. Indexed by side.
const INNER_CORNERS: [[Corner; 2]; 4] = [
    // Up
    [Corner::DownRight, Corner::DownLeft],
    // Right
    [Corner::DownLeft, Corner::UpLeft],
    // Down
    [Corner::UpLeft, Corner::UpRight],
    // Left
    [Corner::UpRight, Corner::DownRight],
];

/// Add a plate unless the tile already has one of the same kind and direction.
fn push_plate(
    plates: &mut HullPlateMap,
    bounds: &GridBounds,
    tile: GridCoordinate,
    plate: HullPlate,
) {
    if !bounds.contains(tile) {
        return;
    }
    let list = plates.entry(tile).or_default();
    if !list
        .iter()
        .any(|p| p.kind == plate.kind && p.direction == plate.direction)
    {
        list.push(plate);
    }
}

/// Sides of the tile whose neighbor is not occupied.
fn open_sides(occupied: &BTreeSet<GridCoordinate>, tile: GridCoordinate) -> BitFlags<Side> {
    Side::ALL
        .iter()
        .filter(|&&side| !occupied.contains(&tile.step(side)))
        .fold(BitFlags::empty(), |open, &side| open | side)
}

/// Work out the hull plates surrounding a structure.
///
/// The kinds, directions and positions depend only on `occupied`. Plates that would
/// fall outside `bounds` are left off. `rng` only decides which straight plates use
/// their alternate look.
pub fn derive_plates<R: Rng + ?Sized>(
    occupied: &BTreeSet<GridCoordinate>,
    bounds: &GridBounds,
    rng: &mut R,
) -> HullPlateMap {
    let mut plates = HullPlateMap::new();
    let open: Vec<(GridCoordinate, BitFlags<Side>)> = occupied
        .iter()
        .map(|&tile| (tile, open_sides(occupied, tile)))
        .collect();

    for &(tile, sides) in &open {
        for &side in Side::ALL.iter().filter(|&&side| sides.contains(side)) {
            let variant = rng.gen_bool(ALTERNATE_STRAIGHT_CHANCE);
            push_plate(
                &mut plates,
                bounds,
                tile.step(side),
                HullPlate::straight(side.opposite(), variant),
            );
        }
    }

    for &(tile, sides) in &open {
        for &corner in Corner::ALL.iter() {
            let diagonal = tile.step_corner(corner);
            let (vertical, horizontal) = corner.sides();
            if sides.contains(vertical | horizontal) && !occupied.contains(&diagonal) {
                push_plate(
                    &mut plates,
                    bounds,
                    diagonal,
                    HullPlate::corner(PlateKind::OuterCorner, corner.opposite()),
                );
            }
        }
    }

    for &(tile, sides) in &open {
        for &side in Side::ALL.iter().filter(|&&side| sides.contains(side)) {
            let neighbor = tile.step(side);
            let turns = [side.clockwise(), side.counter_clockwise()];
            for (slot, &turn) in turns.iter().enumerate() {
                if occupied.contains(&neighbor.step(turn)) {
                    push_plate(
                        &mut plates,
                        bounds,
                        neighbor,
                        HullPlate::corner(PlateKind::InnerCorner, INNER_CORNERS[side.index()][slot]),
                    );
                }
            }
        }
    }

    debug!(
        "derived hull plates on {} tiles around {} occupied tiles",
        plates.len(),
        occupied.len()
    );
    plates
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn grid() -> GridBounds {
        GridBounds::new(64, 64)
    }

    fn structure(tiles: &[(i32, i32)]) -> BTreeSet<GridCoordinate> {
        tiles.iter().map(|&t| t.into()).collect()
    }

    fn identities(plates: &HullPlateMap) -> HashSet<(GridCoordinate, PlateKind, usize)> {
        plates
            .iter()
            .flat_map(|(&tile, list)| list.iter().map(move |p| (tile, p.kind(), p.direction())))
            .collect()
    }

    fn kinds_at(plates: &HullPlateMap, tile: (i32, i32)) -> Vec<(PlateKind, usize)> {
        let mut found: Vec<_> = plates
            .get(&tile.into())
            .map(|list| list.iter().map(|p| (p.kind(), p.direction())).collect())
            .unwrap_or_default();
        found.sort();
        found
    }

    #[test]
    fn single_tile_is_boxed_in() {
        let plates = derive_plates(
            &structure(&[(5, 5)]),
            &grid(),
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(plates.len(), 8);
        assert_eq!(kinds_at(&plates, (5, 6)), vec![(PlateKind::Straight, Side::Down.index())]);
        assert_eq!(kinds_at(&plates, (6, 5)), vec![(PlateKind::Straight, Side::Left.index())]);
        assert_eq!(
            kinds_at(&plates, (6, 6)),
            vec![(PlateKind::OuterCorner, Corner::DownLeft.index())]
        );
        assert_eq!(
            kinds_at(&plates, (4, 4)),
            vec![(PlateKind::OuterCorner, Corner::UpRight.index())]
        );
        assert!(plates
            .values()
            .flatten()
            .all(|p| p.kind() != PlateKind::InnerCorner));
    }

    #[test]
    fn l_shape_gets_inner_corner_and_no_false_outer_corner() {
        let plates = derive_plates(
            &structure(&[(0, 0), (1, 0), (0, 1)]),
            &grid(),
            &mut StdRng::seed_from_u64(7),
        );
        let at_bend = kinds_at(&plates, (1, 1));
        assert!(at_bend.contains(&(PlateKind::InnerCorner, Corner::DownLeft.index())));
        assert!(!at_bend.iter().any(|&(kind, _)| kind == PlateKind::OuterCorner));
        assert_eq!(
            at_bend
                .iter()
                .filter(|&&(kind, _)| kind == PlateKind::InnerCorner)
                .count(),
            1
        );
        assert!(at_bend.contains(&(PlateKind::Straight, Side::Down.index())));
        assert!(at_bend.contains(&(PlateKind::Straight, Side::Left.index())));
    }

    #[test]
    fn identities_do_not_depend_on_rng() {
        let shape = structure(&[(2, 2), (3, 2), (4, 2), (4, 3), (4, 4), (2, 4), (3, 4)]);
        let first = derive_plates(&shape, &grid(), &mut StdRng::seed_from_u64(1));
        let second = derive_plates(&shape, &grid(), &mut StdRng::seed_from_u64(99));
        assert_eq!(identities(&first), identities(&second));

        let again = derive_plates(&shape, &grid(), &mut StdRng::seed_from_u64(1));
        assert_eq!(first, again);
    }

    #[test]
    fn never_duplicates_kind_and_direction() {
        let shape = structure(&[
            (0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2), (4, 1),
        ]);
        let plates = derive_plates(&shape, &grid(), &mut StdRng::seed_from_u64(3));
        for (tile, list) in &plates {
            let unique: HashSet<_> = list.iter().map(|p| (p.kind(), p.direction())).collect();
            assert_eq!(unique.len(), list.len(), "duplicate plate at {:?}", tile);
            assert!(!shape.contains(tile));
        }
        // The hole in the middle of the ring is plated from all four sides.
        assert_eq!(
            kinds_at(&plates, (1, 1))
                .iter()
                .filter(|&&(kind, _)| kind == PlateKind::Straight)
                .count(),
            4
        );
    }

    #[test]
    fn variant_is_roughly_a_third() {
        let shape: BTreeSet<GridCoordinate> = (0..40).map(|x| GridCoordinate::new(x, 0)).collect();
        let plates = derive_plates(&shape, &grid(), &mut StdRng::seed_from_u64(11));
        let straight: Vec<_> = plates
            .values()
            .flatten()
            .filter(|p| p.kind() == PlateKind::Straight)
            .collect();
        let alternate = straight.iter().filter(|p| p.use_variant()).count();
        assert!(alternate > 0 && alternate < straight.len() / 2);
    }

    #[test]
    fn plates_stop_at_the_grid_edge() {
        let plates = derive_plates(
            &structure(&[(0, 0)]),
            &grid(),
            &mut StdRng::seed_from_u64(5),
        );
        let tiles: Vec<_> = plates.keys().copied().collect();
        assert_eq!(
            tiles,
            vec![
                GridCoordinate::new(0, 1),
                GridCoordinate::new(1, 0),
                GridCoordinate::new(1, 1),
            ]
        );

        let corner = structure(&[(63, 63)]);
        let plates = derive_plates(&corner, &grid(), &mut StdRng::seed_from_u64(5));
        assert_eq!(plates.len(), 3);
        assert!(plates.keys().all(|&tile| grid().contains(tile)));
    }

    #[test]
    fn tiers_are_bounded() {
        assert!(HullTier::new(3).is_none());
        assert_eq!(HullTier::new(2).unwrap().damage_reduction(), 10.0);
        assert_eq!(HullTier::try_from(1).unwrap().cost_per_surface(), 10);
        assert_eq!(HullTier::try_from(5), Err(InvalidHullTier(5)));
    }
}
