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
use crate::catalog::WeaponType;

/// Current state of a vessel's shield.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShieldState {
    current: f32,
    max: f32,
    destroyed: bool,
    respawn_timer: f32,
}

/// What a shield did with one hit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) struct ShieldHit {
    /// Damage stopped by the shield, in real damage units.
    pub absorbed: f32,
    /// Damage that got through, in real damage units.
    pub leftover: f32,
    /// Whether this hit brought the shield down.
    pub broke: bool,
}

impl ShieldState {
    /// A shield charged to its maximum.
    pub fn full(max: f32) -> Self {
        Self {
            current: max,
            max,
            destroyed: false,
            respawn_timer: 0.0,
        }
    }

    /// Remaining shield amount.
    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// True while the shield is down and waiting to respawn.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Seconds until a destroyed shield comes back.
    pub fn respawn_timer(&self) -> f32 {
        self.respawn_timer
    }

    /// True if the shield will absorb the next hit.
    pub fn is_active(&self) -> bool {
        !self.destroyed && self.current > 0.0
    }

    /// Change the maximum, trimming the current amount if needed.
    pub(super) fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.current.min(self.max);
    }

    /// Put a hit through the shield.
    ///
    /// The shield takes the damage scaled by the weapon's shield factor. If that is more
    /// than the shield holds, the shield breaks, its respawn timer starts, and the excess
    /// is scaled back to real damage.
    pub(super) fn absorb(
        &mut self,
        damage: f32,
        weapon_type: WeaponType,
        respawn_time: f32,
    ) -> ShieldHit {
        if !self.is_active() {
            return ShieldHit {
                absorbed: 0.0,
                leftover: damage,
                broke: false,
            };
        }
        let factor = weapon_type.shield_factor();
        let effective = damage * factor;
        if effective < self.current {
            self.current -= effective;
            return ShieldHit {
                absorbed: damage,
                leftover: 0.0,
                broke: false,
            };
        }

        let leftover = (effective - self.current) / factor;
        self.current = 0.0;
        self.destroyed = true;
        self.respawn_timer = respawn_time;
        ShieldHit {
            absorbed: damage - leftover,
            leftover,
            broke: true,
        }
    }

    /// Advance time. A destroyed shield counts down and comes back full; an active one
    /// regenerates. Returns true if the shield came back during this tick.
    pub(super) fn tick(&mut self, dt: f32, regenerate_per_second: f32) -> bool {
        if self.destroyed {
            self.respawn_timer -= dt;
            if self.respawn_timer <= 0.0 {
                self.destroyed = false;
                self.respawn_timer = 0.0;
                self.current = self.max;
                return true;
            }
            false
        } else {
            self.current = (self.current + regenerate_per_second * dt).min(self.max);
            false
        }
    }
}
