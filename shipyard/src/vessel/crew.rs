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
use serde::{Deserialize, Serialize};

use crate::{
    board::GridCoordinate,
    stats::{StatContributions, VesselStat},
};

/// Hit points of a crew member unless configured otherwise.
pub const DEFAULT_CREW_HIT_POINTS: f32 = 100.0;

/// Oxygen consumed per second by a crew member that breathes.
pub const OXYGEN_USE_PER_CREW: f32 = 1.0;

/// A crew member aboard a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    name: String,
    position: GridCoordinate,
    hit_points: f32,
    max_hit_points: f32,
    needs_oxygen: bool,
    /// Stat deltas beyond oxygen use, such as morale or heal bonuses.
    extra: StatContributions,
}

impl CrewMember {
    /// A breathing crew member at full default health.
    pub fn new(name: impl Into<String>, position: GridCoordinate) -> Self {
        Self {
            name: name.into(),
            position,
            hit_points: DEFAULT_CREW_HIT_POINTS,
            max_hit_points: DEFAULT_CREW_HIT_POINTS,
            needs_oxygen: true,
            extra: StatContributions::new(),
        }
    }

    /// Set the maximum hit points and heal to full.
    pub fn with_hit_points(mut self, max_hit_points: f32) -> Self {
        self.max_hit_points = max_hit_points;
        self.hit_points = max_hit_points;
        self
    }

    pub fn with_needs_oxygen(mut self, needs_oxygen: bool) -> Self {
        self.needs_oxygen = needs_oxygen;
        self
    }

    /// Add a stat delta to this crew member's contribution map.
    pub fn with_contribution(mut self, stat: VesselStat, delta: f32) -> Self {
        *self.extra.entry(stat).or_insert(0.0) += delta;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> GridCoordinate {
        self.position
    }

    pub fn hit_points(&self) -> f32 {
        self.hit_points
    }

    pub fn max_hit_points(&self) -> f32 {
        self.max_hit_points
    }

    pub fn needs_oxygen(&self) -> bool {
        self.needs_oxygen
    }

    pub fn is_dead(&self) -> bool {
        self.hit_points <= 0.0
    }

    /// Apply damage. Returns the hit points actually lost.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.hit_points;
        self.hit_points = (self.hit_points - amount.max(0.0)).max(0.0);
        before - self.hit_points
    }

    /// Heal up to the maximum. Returns the hit points actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.hit_points;
        self.hit_points = (self.hit_points + amount.max(0.0)).min(self.max_hit_points);
        self.hit_points - before
    }

    /// Every stat delta this crew member carries. Aggregation only folds in the
    /// crew-sourced channels.
    pub fn contributions(&self) -> StatContributions {
        let mut values = self.extra.clone();
        if self.needs_oxygen {
            *values.entry(VesselStat::OxygenUsingPerSecond).or_insert(0.0) += OXYGEN_USE_PER_CREW;
        }
        values
    }
}
