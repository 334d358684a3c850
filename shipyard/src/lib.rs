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
//! Construction and simulation core for a grid-built vessel.
//!
//! A vessel is designed as a [`Blueprint`]: rooms and weapons are added to it, probed
//! for placement with [`Blueprint::can_place`] and claimed on the grid with
//! [`Blueprint::commit`]. The committed structure derives a layer of hull plates and an
//! aggregate [`StatSheet`]. Launching a blueprint turns it into a [`Vessel`], which carries
//! crew, has a shield, and resolves incoming hits through shield, hull, structure and crew.
//!
//! ```
//! use shipyard::{Blueprint, DesignCatalog, GridBounds, GridCoordinate, Rotation};
//!
//! let catalog = DesignCatalog::standard();
//! let mut blueprint = Blueprint::new(GridBounds::new(20, 20));
//! let engine = blueprint.add_module(catalog.build_room("engine", 0).unwrap());
//! assert!(blueprint.can_place(engine, GridCoordinate::new(4, 4), Rotation::Deg0));
//! blueprint.commit(engine, GridCoordinate::new(4, 4), Rotation::Deg0).unwrap();
//! assert_eq!(blueprint.occupied_tiles().len(), 4);
//! ```

pub use crate::{
    blueprint::{Blueprint, Placement},
    board::{GridBounds, GridCoordinate},
    catalog::{DesignCatalog, WeaponType},
    footprint::{Rotation, Size},
    hull::HullTier,
    modules::{Module, ModuleId, Placeable},
    stats::{StatSettings, StatSheet, VesselStat},
    vessel::Vessel,
};

pub mod blueprint;
pub mod board;
pub mod catalog;
pub mod footprint;
pub mod hull;
pub mod modules;
pub mod stats;
pub mod vessel;
