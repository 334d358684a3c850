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
//! Rooms: the structural modules of a vessel.

use std::sync::Arc;

use crate::{
    board::GridCoordinate,
    catalog::{DesignKind, MissingDesignError, RoomDesign, RoomKind, RoomLevel},
    footprint::{Rotation, Size},
    modules::{BlueprintId, Placeable, Pose},
    stats::{StatContributions, VesselStat},
};

/// How badly a room is damaged.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DamageCondition {
    /// Working at its own level.
    Good,
    /// Still working, but a room above the first level performs like the level below.
    Scratch,
    /// Not working. Only its hit points still count toward the vessel.
    Breakdown,
}

impl Default for DamageCondition {
    fn default() -> Self {
        DamageCondition::Good
    }
}

/// A room built from a [`RoomDesign`] at a particular level.
#[derive(Debug, Clone)]
pub struct Room {
    design: Arc<RoomDesign>,
    /// Index into the design's levels. Always valid.
    level: usize,
    pose: Pose,
    owner: Option<BlueprintId>,
    hit_points: f32,
    condition: DamageCondition,
    active: bool,
}

impl Room {
    /// Build a room from a design at the given zero-based level. The room starts
    /// unpositioned, at rotation 0, active and at full hit points.
    pub fn new(design: Arc<RoomDesign>, level: usize) -> Result<Self, MissingDesignError> {
        let hit_points = match design.level(level) {
            Some(data) => data.hit_points,
            None => {
                return Err(MissingDesignError::unknown_level(
                    DesignKind::Room,
                    &design.name,
                    level,
                ))
            }
        };
        Ok(Self {
            design,
            level,
            pose: Pose::default(),
            owner: None,
            hit_points,
            condition: DamageCondition::Good,
            active: true,
        })
    }

    /// The design this room was built from.
    pub fn design(&self) -> &Arc<RoomDesign> {
        &self.design
    }

    /// Name of the design.
    pub fn name(&self) -> &str {
        &self.design.name
    }

    /// What the room does.
    pub fn kind(&self) -> RoomKind {
        self.design.kind
    }

    /// Whether hits on this room cost it hit points.
    pub fn is_damageable(&self) -> bool {
        self.kind().is_damageable()
    }

    /// Zero-based level of the room.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Data for the current level.
    pub fn level_data(&self) -> &RoomLevel {
        &self.design.levels[self.level]
    }

    /// Change the level of the room. The footprint may grow or shrink, so the cached
    /// tiles are recomputed. The room comes back at full hit points in good condition.
    pub fn set_level(&mut self, level: usize) -> Result<(), MissingDesignError> {
        let data = self.design.level(level).ok_or_else(|| {
            MissingDesignError::unknown_level(DesignKind::Room, &self.design.name, level)
        })?;
        self.hit_points = data.hit_points;
        self.condition = DamageCondition::Good;
        self.level = level;
        let size = self.size();
        self.pose.refresh(size);
        Ok(())
    }

    /// Current hit points.
    pub fn hit_points(&self) -> f32 {
        self.hit_points
    }

    /// Hit points at full health.
    pub fn max_hit_points(&self) -> f32 {
        self.level_data().hit_points
    }

    pub fn condition(&self) -> DamageCondition {
        self.condition
    }

    pub fn is_broken_down(&self) -> bool {
        self.condition == DamageCondition::Breakdown
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switch the room on or off. An inactive room keeps its hit points but stops
    /// contributing.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// A room works while it is active and not broken down.
    pub fn is_operational(&self) -> bool {
        self.active && !self.is_broken_down()
    }

    /// Apply damage to the room and degrade its condition once it drops to a damage
    /// mark. Rooms that are not damageable ignore the hit. Returns the amount of hit
    /// points actually lost.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if !self.is_damageable() {
            return 0.0;
        }
        let before = self.hit_points;
        self.hit_points = (self.hit_points - amount.max(0.0)).max(0.0);
        let marks = self.level_data().damage;
        if self.hit_points <= marks.breakdown {
            self.condition = DamageCondition::Breakdown;
        } else if self.hit_points <= marks.scratch {
            self.condition = DamageCondition::Scratch;
        }
        before - self.hit_points
    }

    /// Restore hit points. A broken down room is only patched up to its breakdown mark
    /// and stays broken. Otherwise the room heals up to its maximum and is back in good
    /// condition once above its scratch mark. Returns the amount actually restored.
    pub fn repair(&mut self, amount: f32) -> f32 {
        let before = self.hit_points;
        let marks = self.level_data().damage;
        if self.is_broken_down() {
            self.hit_points = (self.hit_points + amount.max(0.0))
                .min(marks.breakdown)
                .max(before);
        } else {
            self.hit_points = (self.hit_points + amount.max(0.0)).min(self.max_hit_points());
            if self.hit_points > marks.scratch {
                self.condition = DamageCondition::Good;
            }
        }
        self.hit_points - before
    }

    /// Restore the room to full hit points in good condition.
    pub fn full_repair(&mut self) {
        self.hit_points = self.max_hit_points();
        self.condition = DamageCondition::Good;
    }

    /// The stat deltas this room currently contributes.
    ///
    /// Every room counts its level's hit points toward `HitPointsMax`. A room that is not
    /// operational contributes nothing else, and a scratched room above the first level
    /// contributes the stats of the level below.
    pub fn contributions(&self) -> StatContributions {
        let data = self.level_data();
        let mut values = if !self.is_operational() {
            StatContributions::new()
        } else if self.condition == DamageCondition::Scratch && self.level > 0 {
            self.design.levels[self.level - 1].stats.clone()
        } else {
            data.stats.clone()
        };
        *values.entry(VesselStat::HitPointsMax).or_insert(0.0) += data.hit_points;
        values
    }
}

impl Placeable for Room {
    fn size(&self) -> Size {
        self.level_data().size
    }

    fn cost(&self) -> u32 {
        self.level_data().cost
    }

    fn position(&self) -> Option<GridCoordinate> {
        self.pose.position()
    }

    fn rotation(&self) -> Rotation {
        self.pose.rotation()
    }

    fn supports_rotation(&self, _rotation: Rotation) -> bool {
        true
    }

    fn set_position(&mut self, position: GridCoordinate) {
        let size = self.size();
        self.pose.set_position(position, size);
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        let size = self.size();
        self.pose.set_rotation(rotation, size);
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
