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
//! Errors used by the [`Blueprint`][crate::blueprint::Blueprint].

use std::fmt::{self, Debug};

use thiserror::Error;

use crate::{
    blueprint::Placement, board::CannotClaimReason, catalog::MissingDesignError,
    modules::ModuleId,
};

/// Reason a module cannot be placed at a position and rotation.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotPlaceReason {
    /// No module with the given id belongs to the blueprint.
    #[error("no such module")]
    UnknownModule,
    /// Part of the footprint lies outside the grid.
    #[error("the module does not fit inside the grid")]
    OutOfBounds,
    /// Part of the footprint is already occupied by another module.
    #[error("the requested position overlaps another module")]
    Overlap,
    /// The module cannot be turned to the requested rotation.
    #[error("the module does not support that rotation")]
    UnsupportedRotation,
}

impl From<CannotClaimReason> for CannotPlaceReason {
    fn from(reason: CannotClaimReason) -> Self {
        match reason {
            CannotClaimReason::OutOfBounds => CannotPlaceReason::OutOfBounds,
            CannotClaimReason::Overlap => CannotPlaceReason::Overlap,
        }
    }
}

/// Error returned when committing a module to a position it cannot occupy.
#[derive(Error, Clone)]
#[error("could not place module {module}: {reason}")]
pub struct PlaceError {
    #[source]
    reason: CannotPlaceReason,
    module: ModuleId,
    placement: Placement,
}

impl PlaceError {
    pub(super) fn new(reason: CannotPlaceReason, module: ModuleId, placement: Placement) -> Self {
        Self {
            reason,
            module,
            placement,
        }
    }

    /// Get the reason placement was aborted.
    pub fn reason(&self) -> CannotPlaceReason {
        self.reason
    }

    /// The module that was being placed.
    pub fn module(&self) -> ModuleId {
        self.module
    }

    /// The placement that was attempted.
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Extract the attempted placement from this error.
    pub fn into_placement(self) -> Placement {
        self.placement
    }
}

impl Debug for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Reason a module cannot be removed from a blueprint.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotRemoveReason {
    /// No module with the given id belongs to the blueprint.
    #[error("no such module")]
    UnknownModule,
    /// The module still holds grid tiles and must be released first.
    #[error("the module is still committed to the grid")]
    StillCommitted,
}

/// Error returned when removing a module from a blueprint fails.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("could not remove module {module}: {reason}")]
pub struct RemoveModuleError {
    #[source]
    reason: CannotRemoveReason,
    module: ModuleId,
}

impl RemoveModuleError {
    pub(super) fn new(reason: CannotRemoveReason, module: ModuleId) -> Self {
        Self { reason, module }
    }

    /// Get the reason removal failed.
    pub fn reason(&self) -> CannotRemoveReason {
        self.reason
    }

    /// The module that was being removed.
    pub fn module(&self) -> ModuleId {
        self.module
    }
}

/// Error returned when changing the level of a room.
#[derive(Debug, Error)]
pub enum UpgradeError {
    /// No module with the given id belongs to the blueprint.
    #[error("no such module {0}")]
    UnknownModule(ModuleId),
    /// The module is not a room and has no levels.
    #[error("module {0} is not a room")]
    NotARoom(ModuleId),
    /// The requested level does not exist.
    #[error(transparent)]
    MissingDesign(#[from] MissingDesignError),
    /// The room no longer fits at its position at the new level.
    #[error(transparent)]
    Placement(#[from] PlaceError),
}
