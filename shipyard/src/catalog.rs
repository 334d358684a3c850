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
//! Design data: what each room and weapon is, costs and contributes.
//!
//! Designs are loaded from JSON. A standard catalog ships with the crate and is parsed
//! the first time it is used.

use std::{
    collections::{btree_map::Entry, BTreeMap},
    sync::Arc,
};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{
    footprint::Size,
    modules::{Room, Weapon},
    stats::StatContributions,
};

pub use self::errors::{CatalogError, DesignKind, MissingDesignError, MissingDesignReason};

mod errors;

/// What a room is for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    Engine,
    Power,
    Shield,
    Oxygen,
    Cockpit,
    WeaponControl,
    Ammunition,
    MedBay,
    Storage,
    Corridor,
    CrewQuarters,
    LifeSupport,
    Teleporter,
}

impl RoomKind {
    /// Whether rooms of this kind lose hit points when struck. Corridors, storage, life
    /// support and teleporters shrug off hits.
    pub fn is_damageable(self) -> bool {
        match self {
            RoomKind::Engine
            | RoomKind::Power
            | RoomKind::Shield
            | RoomKind::Oxygen
            | RoomKind::Cockpit
            | RoomKind::WeaponControl
            | RoomKind::Ammunition
            | RoomKind::MedBay
            | RoomKind::CrewQuarters => true,
            RoomKind::Storage
            | RoomKind::Corridor
            | RoomKind::LifeSupport
            | RoomKind::Teleporter => false,
        }
    }
}

/// Hit point marks at which a damaged room degrades.
///
/// A room at or below `scratch` hit points is scratched, and at or below `breakdown` it
/// stops working. Both default to 0, so a room without marks only breaks down once it
/// has no hit points left.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageThresholds {
    #[serde(default)]
    pub scratch: f32,
    #[serde(default)]
    pub breakdown: f32,
}

/// One level of a room design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLevel {
    /// Unrotated footprint size at this level.
    pub size: Size,
    /// Purchase cost at this level.
    pub cost: u32,
    /// Hit points of the room at full health.
    pub hit_points: f32,
    /// Stat deltas the room contributes while it is in good condition.
    #[serde(default)]
    pub stats: StatContributions,
    #[serde(default)]
    pub damage: DamageThresholds,
}

/// A room design with one or more levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDesign {
    pub name: String,
    pub kind: RoomKind,
    pub levels: Vec<RoomLevel>,
}

impl RoomDesign {
    /// Get the data for a zero-based level.
    pub fn level(&self, level: usize) -> Option<&RoomLevel> {
        self.levels.get(level)
    }

    /// The highest zero-based level of this design.
    pub fn max_level(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }
}

/// Type of a weapon, deciding how its hits interact with shields and crew.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    Laser,
    Missile,
    Railgun,
}

impl WeaponType {
    /// Whether hits from this weapon also damage crew on the 8 surrounding tiles.
    pub fn is_splash(self) -> bool {
        self == WeaponType::Missile
    }

    /// Multiplier applied to damage dealt to a shield by this weapon.
    pub fn shield_factor(self) -> f32 {
        match self {
            WeaponType::Railgun => 1.5,
            WeaponType::Laser | WeaponType::Missile => 1.0,
        }
    }
}

/// A weapon design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDesign {
    pub name: String,
    pub weapon_type: WeaponType,
    /// Base damage per hit.
    pub damage: f32,
    pub cost: u32,
    /// Stat deltas the weapon contributes, usually its power draw.
    #[serde(default)]
    pub stats: StatContributions,
}

/// On-disk layout of a catalog.
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    rooms: Vec<RoomDesign>,
    #[serde(default)]
    weapons: Vec<WeaponDesign>,
}

static STANDARD: Lazy<DesignCatalog> = Lazy::new(|| {
    DesignCatalog::from_json(include_str!("../data/designs.json"))
        .expect("embedded design catalog is valid")
});

/// Room and weapon designs, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct DesignCatalog {
    rooms: BTreeMap<String, Arc<RoomDesign>>,
    weapons: BTreeMap<String, Arc<WeaponDesign>>,
}

impl DesignCatalog {
    /// Construct an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog of standard designs shipped with the crate.
    pub fn standard() -> &'static DesignCatalog {
        &STANDARD
    }

    /// Load a catalog from JSON with top-level `rooms` and `weapons` arrays.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for room in file.rooms {
            catalog.add_room(room)?;
        }
        for weapon in file.weapons {
            catalog.add_weapon(weapon)?;
        }
        Ok(catalog)
    }

    /// Add a room design. Fails if the name is taken, the design has no levels, or a
    /// level's damage marks are out of order.
    pub fn add_room(&mut self, design: RoomDesign) -> Result<(), CatalogError> {
        if design.levels.is_empty() {
            return Err(CatalogError::NoLevels(design.name));
        }
        let misordered = design.levels.iter().position(|level| {
            let marks = level.damage;
            marks.breakdown < 0.0
                || marks.breakdown > marks.scratch
                || marks.scratch > level.hit_points
        });
        if let Some(level) = misordered {
            return Err(CatalogError::DamageThresholds(design.name, level));
        }
        match self.rooms.entry(design.name.clone()) {
            Entry::Occupied(_) => Err(CatalogError::Duplicate(DesignKind::Room, design.name)),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(design));
                Ok(())
            }
        }
    }

    /// Add a weapon design. Fails if the name is taken.
    pub fn add_weapon(&mut self, design: WeaponDesign) -> Result<(), CatalogError> {
        match self.weapons.entry(design.name.clone()) {
            Entry::Occupied(_) => Err(CatalogError::Duplicate(DesignKind::Weapon, design.name)),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(design));
                Ok(())
            }
        }
    }

    /// Look up a room design by name.
    pub fn room(&self, name: &str) -> Result<&Arc<RoomDesign>, MissingDesignError> {
        self.rooms
            .get(name)
            .ok_or_else(|| MissingDesignError::unknown_name(DesignKind::Room, name))
    }

    /// Look up a weapon design by name.
    pub fn weapon(&self, name: &str) -> Result<&Arc<WeaponDesign>, MissingDesignError> {
        self.weapons
            .get(name)
            .ok_or_else(|| MissingDesignError::unknown_name(DesignKind::Weapon, name))
    }

    /// Iterate room designs in name order.
    pub fn rooms(&self) -> impl '_ + Iterator<Item = &Arc<RoomDesign>> {
        self.rooms.values()
    }

    /// Iterate weapon designs in name order.
    pub fn weapons(&self) -> impl '_ + Iterator<Item = &Arc<WeaponDesign>> {
        self.weapons.values()
    }

    /// Build an unpositioned room from the named design at a zero-based level.
    pub fn build_room(&self, name: &str, level: usize) -> Result<Room, MissingDesignError> {
        Room::new(Arc::clone(self.room(name)?), level)
    }

    /// Build an unpositioned weapon from the named design.
    pub fn build_weapon(&self, name: &str) -> Result<Weapon, MissingDesignError> {
        Ok(Weapon::new(Arc::clone(self.weapon(name)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::VesselStat;

    #[test]
    fn standard_catalog_loads() {
        let catalog = DesignCatalog::standard();
        let engine = catalog.room("engine").unwrap();
        assert_eq!(engine.kind, RoomKind::Engine);
        assert_eq!(engine.levels.len(), 3);
        assert_eq!(engine.max_level(), 2);
        assert_eq!(engine.levels[0].size, Size::new(2, 2));
        assert!(catalog.weapon("missile").unwrap().weapon_type.is_splash());
        assert!(catalog.rooms().all(|room| !room.levels.is_empty()));
        assert_eq!(
            engine.levels[1].damage,
            DamageThresholds {
                scratch: 100.0,
                breakdown: 20.0
            }
        );
    }

    #[test]
    fn only_some_rooms_take_damage() {
        let catalog = DesignCatalog::standard();
        for &(name, damageable) in [
            ("engine", true),
            ("medbay", true),
            ("crew_quarters", true),
            ("corridor", false),
            ("storage", false),
            ("life_support", false),
            ("teleporter", false),
        ]
        .iter()
        {
            let kind = catalog.room(name).unwrap().kind;
            assert_eq!(kind.is_damageable(), damageable, "{}", name);
        }
    }

    #[test]
    fn missing_designs_are_errors() {
        let catalog = DesignCatalog::standard();
        let err = catalog.build_room("ballroom", 0).unwrap_err();
        assert_eq!(err.kind(), DesignKind::Room);
        assert_eq!(err.reason(), MissingDesignReason::UnknownName);

        let err = catalog.build_room("engine", 9).unwrap_err();
        assert_eq!(err.reason(), MissingDesignReason::UnknownLevel(9));

        assert!(catalog.build_weapon("trebuchet").is_err());
    }

    #[test]
    fn rejects_bad_catalogs() {
        let duplicate = r#"{ "weapons": [
            { "name": "gun", "weapon_type": "Laser", "damage": 1, "cost": 1 },
            { "name": "gun", "weapon_type": "Laser", "damage": 2, "cost": 2 }
        ] }"#;
        match DesignCatalog::from_json(duplicate) {
            Err(CatalogError::Duplicate(DesignKind::Weapon, name)) => assert_eq!(name, "gun"),
            other => panic!("unexpected {:?}", other),
        }

        let empty = r#"{ "rooms": [ { "name": "void", "kind": "Storage", "levels": [] } ] }"#;
        assert!(matches!(
            DesignCatalog::from_json(empty),
            Err(CatalogError::NoLevels(_))
        ));

        let misordered = r#"{ "rooms": [ { "name": "bay", "kind": "Shield", "levels": [
            { "size": { "width": 1, "height": 1 }, "cost": 1, "hit_points": 10 },
            { "size": { "width": 1, "height": 1 }, "cost": 1, "hit_points": 10,
              "damage": { "scratch": 2, "breakdown": 5 } }
        ] } ] }"#;
        match DesignCatalog::from_json(misordered) {
            Err(CatalogError::DamageThresholds(name, level)) => {
                assert_eq!(name, "bay");
                assert_eq!(level, 1);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            DesignCatalog::from_json("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn stats_parse_by_name() {
        let catalog = DesignCatalog::from_json(
            r#"{ "rooms": [ { "name": "cell", "kind": "Power", "levels": [
                { "size": { "width": 1, "height": 1 }, "cost": 5, "hit_points": 10,
                  "stats": { "PowerCapacity": 12.5 } }
            ] } ] }"#,
        )
        .unwrap();
        let room = catalog.room("cell").unwrap();
        assert_eq!(room.levels[0].stats[&VesselStat::PowerCapacity], 12.5);
    }
}
