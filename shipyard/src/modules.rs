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
//! Placeable modules: rooms and weapons.
//!
//! Both variants share the [`Placeable`] capability set so that placement and occupancy
//! logic is written once. Where the variants differ (a weapon's fixed footprint and
//! restricted rotation, a room's level-dependent size) the difference lives in the
//! variant types themselves.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::{
    board::GridCoordinate,
    footprint::{occupied_tiles, Footprint, Rotation, Size},
    stats::StatContributions,
};

pub use self::{
    room::{DamageCondition, Room},
    weapon::{AttachedDirection, Weapon},
};

mod room;
mod weapon;

/// Stable identifier of a module within one blueprint or vessel.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct ModuleId(u32);

impl ModuleId {
    /// Construct an id from its raw value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value of this id.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of the blueprint that owns a module.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlueprintId(u64);

impl BlueprintId {
    /// Allocate an id distinct from every other id allocated in this process.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Capabilities shared by everything that can be placed on the grid.
pub trait Placeable {
    /// Size of the module before rotation.
    fn size(&self) -> Size;

    /// Purchase cost of the module.
    fn cost(&self) -> u32;

    /// Anchor tile of the module, or `None` if it has never been positioned.
    fn position(&self) -> Option<GridCoordinate>;

    /// Current rotation of the module.
    fn rotation(&self) -> Rotation;

    /// Whether the module may be placed at the given rotation.
    fn supports_rotation(&self, rotation: Rotation) -> bool;

    /// Move the module to a new anchor tile. Recomputes the cached footprint.
    fn set_position(&mut self, position: GridCoordinate);

    /// Turn the module. Recomputes the cached footprint. Panics if the rotation is not
    /// supported.
    fn set_rotation(&mut self, rotation: Rotation);

    /// The tiles covered at the current position and rotation. Empty if the module has
    /// never been positioned.
    fn occupied_tiles(&self) -> &[GridCoordinate];

    /// The blueprint this module belongs to, if any.
    fn owner(&self) -> Option<BlueprintId>;

    /// Set the blueprint this module belongs to.
    fn set_owner(&mut self, owner: Option<BlueprintId>);

    /// The footprint this module would have at the given position and rotation. Does not
    /// change the module.
    fn footprint_at(&self, position: GridCoordinate, rotation: Rotation) -> Footprint {
        Footprint::new(position, self.size(), rotation)
    }

    /// The current footprint, or `None` if the module has never been positioned.
    fn try_footprint(&self) -> Option<Footprint> {
        self.position()
            .map(|position| self.footprint_at(position, self.rotation()))
    }

    /// The current footprint. Panics if the module has never been positioned.
    fn footprint(&self) -> Footprint {
        match self.try_footprint() {
            Some(footprint) => footprint,
            None => panic!("module has not been positioned yet"),
        }
    }
}

/// Position, rotation and cached footprint tiles of a module.
#[derive(Debug, Clone, Default)]
pub(crate) struct Pose {
    position: Option<GridCoordinate>,
    rotation: Rotation,
    tiles: Vec<GridCoordinate>,
}

impl Pose {
    pub(crate) fn position(&self) -> Option<GridCoordinate> {
        self.position
    }

    pub(crate) fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub(crate) fn tiles(&self) -> &[GridCoordinate] {
        &self.tiles
    }

    pub(crate) fn set_position(&mut self, position: GridCoordinate, size: Size) {
        self.position = Some(position);
        self.refresh(size);
    }

    pub(crate) fn set_rotation(&mut self, rotation: Rotation, size: Size) {
        self.rotation = rotation;
        self.refresh(size);
    }

    /// Recompute the cached tiles. Must follow every change to position, rotation or
    /// size.
    pub(crate) fn refresh(&mut self, size: Size) {
        self.tiles = match self.position {
            Some(position) => occupied_tiles(position, size, self.rotation),
            None => Vec::new(),
        };
    }
}

/// A module of either variant.
#[derive(Debug, Clone)]
pub enum Module {
    Room(Room),
    Weapon(Weapon),
}

impl Module {
    /// Name of the design this module was built from.
    pub fn name(&self) -> &str {
        match self {
            Module::Room(room) => room.name(),
            Module::Weapon(weapon) => weapon.name(),
        }
    }

    /// The stat deltas this module currently contributes.
    pub fn contributions(&self) -> StatContributions {
        match self {
            Module::Room(room) => room.contributions(),
            Module::Weapon(weapon) => weapon.contributions(),
        }
    }

    /// Get the room, if this is a room.
    pub fn as_room(&self) -> Option<&Room> {
        match self {
            Module::Room(room) => Some(room),
            Module::Weapon(_) => None,
        }
    }

    /// Get the room mutably, if this is a room.
    pub fn as_room_mut(&mut self) -> Option<&mut Room> {
        match self {
            Module::Room(room) => Some(room),
            Module::Weapon(_) => None,
        }
    }

    /// Get the weapon, if this is a weapon.
    pub fn as_weapon(&self) -> Option<&Weapon> {
        match self {
            Module::Weapon(weapon) => Some(weapon),
            Module::Room(_) => None,
        }
    }

    /// Get the weapon mutably, if this is a weapon.
    pub fn as_weapon_mut(&mut self) -> Option<&mut Weapon> {
        match self {
            Module::Weapon(weapon) => Some(weapon),
            Module::Room(_) => None,
        }
    }

    fn placeable(&self) -> &dyn Placeable {
        match self {
            Module::Room(room) => room,
            Module::Weapon(weapon) => weapon,
        }
    }

    fn placeable_mut(&mut self) -> &mut dyn Placeable {
        match self {
            Module::Room(room) => room,
            Module::Weapon(weapon) => weapon,
        }
    }
}

impl Placeable for Module {
    fn size(&self) -> Size {
        self.placeable().size()
    }

    fn cost(&self) -> u32 {
        self.placeable().cost()
    }

    fn position(&self) -> Option<GridCoordinate> {
        self.placeable().position()
    }

    fn rotation(&self) -> Rotation {
        self.placeable().rotation()
    }

    fn supports_rotation(&self, rotation: Rotation) -> bool {
        self.placeable().supports_rotation(rotation)
    }

    fn set_position(&mut self, position: GridCoordinate) {
        self.placeable_mut().set_position(position)
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.placeable_mut().set_rotation(rotation)
    }

    fn occupied_tiles(&self) -> &[GridCoordinate] {
        self.placeable().occupied_tiles()
    }

    fn owner(&self) -> Option<BlueprintId> {
        self.placeable().owner()
    }

    fn set_owner(&mut self, owner: Option<BlueprintId>) {
        self.placeable_mut().set_owner(owner)
    }
}

impl From<Room> for Module {
    fn from(room: Room) -> Self {
        Module::Room(room)
    }
}

impl From<Weapon> for Module {
    fn from(weapon: Weapon) -> Self {
        Module::Weapon(weapon)
    }
}
