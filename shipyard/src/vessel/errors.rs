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
//! Errors returned by operations on a live vessel.

use std::fmt::{self, Debug};

use thiserror::Error;

use crate::vessel::CrewMember;

/// Reason an attack could not be resolved.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotAttackReason {
    /// The vessel was already destroyed by an earlier hit.
    #[error("the vessel is already destroyed")]
    AlreadyDestroyed,
    /// The damage was negative or not a finite number.
    #[error("damage must be a finite, non-negative amount")]
    InvalidDamage,
}

/// Error returned when an attack cannot be resolved.
#[derive(Error, Copy, Clone, PartialEq)]
#[error("cannot resolve attack of {damage} damage: {reason}")]
pub struct AttackError {
    #[source]
    reason: CannotAttackReason,
    damage: f32,
}

impl AttackError {
    pub(super) fn new(reason: CannotAttackReason, damage: f32) -> Self {
        Self { reason, damage }
    }

    /// Get the reason the attack failed.
    pub fn reason(&self) -> CannotAttackReason {
        self.reason
    }

    /// Get the damage of the rejected attack.
    pub fn damage(&self) -> f32 {
        self.damage
    }
}

impl Debug for AttackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Reason a crew member could not board.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotBoardReason {
    /// The vessel has been destroyed.
    #[error("the vessel is destroyed")]
    VesselDestroyed,
    /// The vessel already carries as many crew as its crew capacity allows.
    #[error("the vessel has no room for more crew")]
    CapacityReached,
    /// The crew member's tile is not inside a room.
    #[error("the tile is not inside a room")]
    NotInRoom,
    /// Another crew member already stands on the tile.
    #[error("another crew member is on that tile")]
    TileTaken,
}

/// Error returned when a crew member cannot board. Hands the crew member back.
#[derive(Error)]
#[error("{} cannot board: {reason}", .crew.name())]
pub struct CrewError {
    #[source]
    reason: CannotBoardReason,
    crew: CrewMember,
}

impl CrewError {
    pub(super) fn new(reason: CannotBoardReason, crew: CrewMember) -> Self {
        Self { reason, crew }
    }

    /// Get the reason boarding failed.
    pub fn reason(&self) -> CannotBoardReason {
        self.reason
    }

    /// Get the crew member that failed to board.
    pub fn crew(&self) -> &CrewMember {
        &self.crew
    }

    /// Extract the crew member from the error.
    pub fn into_crew(self) -> CrewMember {
        self.crew
    }
}

impl Debug for CrewError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
