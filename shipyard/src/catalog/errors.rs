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
//! Errors used by the [`DesignCatalog`][crate::catalog::DesignCatalog].

use std::fmt::{self, Debug};

use thiserror::Error;

/// Which kind of design a lookup was for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DesignKind {
    Room,
    Weapon,
}

impl fmt::Display for DesignKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            DesignKind::Room => "room",
            DesignKind::Weapon => "weapon",
        })
    }
}

/// Reason a design could not be resolved.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum MissingDesignReason {
    /// No design with the requested name exists.
    #[error("no design with that name")]
    UnknownName,
    /// The design exists but does not have the requested level.
    #[error("the design has no level {0}")]
    UnknownLevel(usize),
}

/// Error returned when a module refers to design data that does not exist.
#[derive(Error, Clone)]
#[error("could not resolve {kind} design {name:?}: {reason}")]
pub struct MissingDesignError {
    kind: DesignKind,
    name: String,
    #[source]
    reason: MissingDesignReason,
}

impl MissingDesignError {
    pub(crate) fn unknown_name(kind: DesignKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
            reason: MissingDesignReason::UnknownName,
        }
    }

    pub(crate) fn unknown_level(kind: DesignKind, name: &str, level: usize) -> Self {
        Self {
            kind,
            name: name.to_owned(),
            reason: MissingDesignReason::UnknownLevel(level),
        }
    }

    /// Kind of design that was requested.
    pub fn kind(&self) -> DesignKind {
        self.kind
    }

    /// Name of the design that was requested.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Why the design could not be resolved.
    pub fn reason(&self) -> MissingDesignReason {
        self.reason
    }
}

impl Debug for MissingDesignError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Error returned when design data cannot be loaded into a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The design file was not valid.
    #[error("could not parse design data: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two designs of the same kind share a name.
    #[error("{0} design {1:?} is defined more than once")]
    Duplicate(DesignKind, String),
    /// A room design was defined without any levels.
    #[error("room design {0:?} has no levels")]
    NoLevels(String),
    /// A room level's damage marks are not ordered `0 <= breakdown <= scratch <= hit points`.
    #[error("room design {0:?} has misordered damage marks at level {1}")]
    DamageThresholds(String, usize),
}
