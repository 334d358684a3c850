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
//! Weapons: modules mounted on the outside of the hull.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    board::GridCoordinate,
    catalog::{WeaponDesign, WeaponType},
    footprint::{Rotation, Size},
    hull::HullTier,
    modules::{BlueprintId, Placeable, Pose},
    stats::StatContributions,
};

/// Every weapon covers this many tiles, regardless of design.
pub const WEAPON_SIZE: Size = Size::new(2, 1);

/// Direction a weapon faces away from the hull it is attached to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AttachedDirection {
    North,
    East,
    South,
}

impl AttachedDirection {
    /// The next direction when turning the weapon: East, South, North, then East again.
    pub fn next(self) -> Self {
        match self {
            AttachedDirection::East => AttachedDirection::South,
            AttachedDirection::South => AttachedDirection::North,
            AttachedDirection::North => AttachedDirection::East,
        }
    }

    /// Index of the direction: North is 0, East 1, South 2.
    pub fn index(self) -> usize {
        match self {
            AttachedDirection::North => 0,
            AttachedDirection::East => 1,
            AttachedDirection::South => 2,
        }
    }
}

impl Default for AttachedDirection {
    fn default() -> Self {
        AttachedDirection::East
    }
}

/// A weapon built from a [`WeaponDesign`].
///
/// Weapons have no level of their own. Their armor follows the hull tier of the blueprint
/// or vessel they belong to, which stamps it onto every weapon it holds.
#[derive(Debug, Clone)]
pub struct Weapon {
    design: Arc<WeaponDesign>,
    direction: AttachedDirection,
    hull_tier: Option<HullTier>,
    pose: Pose,
    owner: Option<BlueprintId>,
}

impl Weapon {
    /// Build an unpositioned weapon from a design, facing east.
    pub fn new(design: Arc<WeaponDesign>) -> Self {
        Self {
            design,
            direction: AttachedDirection::default(),
            hull_tier: None,
            pose: Pose::default(),
            owner: None,
        }
    }

    /// The design this weapon was built from.
    pub fn design(&self) -> &Arc<WeaponDesign> {
        &self.design
    }

    /// Name of the design.
    pub fn name(&self) -> &str {
        &self.design.name
    }

    /// Type of the weapon, which decides shield and splash behavior of its hits.
    pub fn weapon_type(&self) -> WeaponType {
        self.design.weapon_type
    }

    /// Base damage of a hit.
    pub fn damage(&self) -> f32 {
        self.design.damage
    }

    /// Direction the weapon faces.
    pub fn direction(&self) -> AttachedDirection {
        self.direction
    }

    /// Point the weapon in a new direction. Does not change the footprint.
    pub fn set_direction(&mut self, direction: AttachedDirection) {
        self.direction = direction;
    }

    /// Turn the weapon to the next direction.
    pub fn turn(&mut self) {
        self.direction = self.direction.next();
    }

    /// The hull tier stamped onto this weapon.
    pub fn hull_tier(&self) -> Option<HullTier> {
        self.hull_tier
    }

    pub(crate) fn set_hull_tier(&mut self, tier: Option<HullTier>) {
        self.hull_tier = tier;
    }

    /// The stat deltas this weapon contributes.
    pub fn contributions(&self) -> StatContributions {
        self.design.stats.clone()
    }
}

impl Placeable for Weapon {
    fn size(&self) -> Size {
        WEAPON_SIZE
    }

    fn cost(&self) -> u32 {
        self.design.cost
    }

    fn position(&self) -> Option<GridCoordinate> {
        self.pose.position()
    }

    fn rotation(&self) -> Rotation {
        self.pose.rotation()
    }

    /// Weapons are only ever laid flat; their facing is the attached direction instead.
    fn supports_rotation(&self, rotation: Rotation) -> bool {
        rotation == Rotation::Deg0
    }

    fn set_position(&mut self, position: GridCoordinate) {
        self.pose.set_position(position, WEAPON_SIZE);
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        assert!(
            self.supports_rotation(rotation),
            "weapons cannot be rotated to {:?}",
            rotation
        );
        self.pose.set_rotation(rotation, WEAPON_SIZE);
    }

    fn occupied_tiles(&self) -> &[GridCoordinate] {
        self.pose.tiles()
    }

    fn owner(&self) -> Option<BlueprintId> {
        self.owner
    }

    fn set_owner(&mut self, owner: Option<BlueprintId>) {
        self.owner = owner;
    }
}
