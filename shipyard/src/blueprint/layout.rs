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
//! Persistence records for blueprints.
//!
//! A layout is the ordered list of committed modules with the design they were built
//! from. Restoring a layout replays the same `add_module` and `commit` calls, so the
//! restored blueprint has the same occupancy and stats as the one that was saved.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    blueprint::{Blueprint, PlaceError},
    board::{GridBounds, GridCoordinate},
    catalog::{DesignCatalog, MissingDesignError},
    footprint::Rotation,
    hull::HullTier,
    modules::{AttachedDirection, Module, ModuleId, Placeable},
};

/// Saved form of one committed module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleRecord {
    Room {
        design: String,
        level: usize,
        position: GridCoordinate,
        rotation: Rotation,
    },
    Weapon {
        design: String,
        position: GridCoordinate,
        direction: AttachedDirection,
    },
}

impl ModuleRecord {
    /// Record a module. `None` if it has never been positioned.
    fn of(module: &Module) -> Option<Self> {
        let position = module.position()?;
        Some(match module {
            Module::Room(room) => ModuleRecord::Room {
                design: room.name().to_owned(),
                level: room.level(),
                position,
                rotation: room.rotation(),
            },
            Module::Weapon(weapon) => ModuleRecord::Weapon {
                design: weapon.name().to_owned(),
                position,
                direction: weapon.direction(),
            },
        })
    }

    /// Name of the design the module was built from.
    pub fn design(&self) -> &str {
        match self {
            ModuleRecord::Room { design, .. } | ModuleRecord::Weapon { design, .. } => design,
        }
    }

    /// Saved anchor position.
    pub fn position(&self) -> GridCoordinate {
        match self {
            ModuleRecord::Room { position, .. } | ModuleRecord::Weapon { position, .. } => {
                *position
            }
        }
    }
}

/// Saved form of a blueprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintLayout {
    #[serde(default)]
    pub hull_tier: Option<HullTier>,
    pub modules: Vec<ModuleRecord>,
}

impl BlueprintLayout {
    /// Write the layout as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read a layout from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Why a single record could not be restored.
#[derive(Debug, Error)]
pub enum RestoreFailure {
    #[error(transparent)]
    MissingDesign(#[from] MissingDesignError),
    #[error(transparent)]
    Placement(#[from] PlaceError),
}

/// A record that was left out of a restored blueprint.
#[derive(Debug)]
pub struct OmittedModule {
    /// Position of the record in the layout.
    pub index: usize,
    pub record: ModuleRecord,
    pub failure: RestoreFailure,
}

/// Outcome of restoring a layout.
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Ids of the restored modules, in layout order.
    pub restored: Vec<ModuleId>,
    pub omitted: Vec<OmittedModule>,
}

impl RestoreReport {
    /// True if every record was restored.
    pub fn is_complete(&self) -> bool {
        self.omitted.is_empty()
    }
}

impl Blueprint {
    /// Record every committed module, in order, along with the hull tier.
    pub fn layout(&self) -> BlueprintLayout {
        BlueprintLayout {
            hull_tier: self.hull_tier,
            modules: self
                .committed_modules()
                .filter_map(|(_, module)| ModuleRecord::of(module))
                .collect(),
        }
    }

    /// Rebuild a blueprint from a layout. Records that cannot be restored are omitted and
    /// listed in the report; the rest of the layout is still restored.
    pub fn restore(
        catalog: &DesignCatalog,
        bounds: GridBounds,
        layout: &BlueprintLayout,
    ) -> (Blueprint, RestoreReport) {
        let mut blueprint = Blueprint::new(bounds);
        blueprint.set_hull_tier(layout.hull_tier);
        let mut report = RestoreReport::default();
        for (index, record) in layout.modules.iter().enumerate() {
            match blueprint.restore_record(catalog, record) {
                Ok(id) => report.restored.push(id),
                Err(failure) => {
                    warn!(
                        "omitting module {} ({}) from restored blueprint: {}",
                        index,
                        record.design(),
                        failure
                    );
                    report.omitted.push(OmittedModule {
                        index,
                        record: record.clone(),
                        failure,
                    });
                }
            }
        }
        (blueprint, report)
    }

    fn restore_record(
        &mut self,
        catalog: &DesignCatalog,
        record: &ModuleRecord,
    ) -> Result<ModuleId, RestoreFailure> {
        let (module, position, rotation): (Module, _, _) = match record {
            ModuleRecord::Room {
                design,
                level,
                position,
                rotation,
            } => (catalog.build_room(design, *level)?.into(), *position, *rotation),
            ModuleRecord::Weapon {
                design,
                position,
                direction,
            } => {
                let mut weapon = catalog.build_weapon(design)?;
                weapon.set_direction(*direction);
                (weapon.into(), *position, Rotation::Deg0)
            }
        };

        let id = self.add_module(module);
        if let Err(err) = self.commit(id, position, rotation) {
            self.modules.remove(&id);
            self.order.retain(|&other| other != id);
            return Err(err.into());
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blueprint::CannotPlaceReason,
        catalog::MissingDesignReason,
        stats::StatSettings,
    };

    fn sample() -> Blueprint {
        let catalog = DesignCatalog::standard();
        let mut blueprint = Blueprint::new(GridBounds::new(20, 20));
        let engine = blueprint.add_module(catalog.build_room("engine", 1).unwrap());
        let cockpit = blueprint.add_module(catalog.build_room("cockpit", 0).unwrap());
        let gun = blueprint.add_module(catalog.build_weapon("missile").unwrap());
        blueprint.add_module(catalog.build_room("oxygen", 0).unwrap());
        blueprint.commit(engine, GridCoordinate::new(2, 5), Rotation::Deg90).unwrap();
        blueprint.commit(cockpit, GridCoordinate::new(6, 6), Rotation::Deg0).unwrap();
        blueprint.commit(gun, GridCoordinate::new(8, 6), Rotation::Deg0).unwrap();
        blueprint.set_weapon_direction(gun, AttachedDirection::North);
        blueprint.set_hull_level(2).unwrap();
        blueprint
    }

    #[test]
    fn layout_skips_uncommitted_modules() {
        let layout = sample().layout();
        assert_eq!(layout.modules.len(), 3);
        assert_eq!(layout.hull_tier, HullTier::new(2));
        assert_eq!(
            layout.modules[2],
            ModuleRecord::Weapon {
                design: "missile".into(),
                position: GridCoordinate::new(8, 6),
                direction: AttachedDirection::North,
            }
        );
    }

    #[test]
    fn restore_through_json_is_identical() {
        let original = sample();
        let json = original.layout().to_json().unwrap();
        let layout = BlueprintLayout::from_json(&json).unwrap();
        let (restored, report) =
            Blueprint::restore(DesignCatalog::standard(), GridBounds::new(20, 20), &layout);

        assert!(report.is_complete());
        assert_eq!(report.restored.len(), 3);
        assert_eq!(restored.occupied_tiles(), original.occupied_tiles());
        let settings = StatSettings::default();
        assert_eq!(
            restored.aggregate_stats(&settings).0,
            original.aggregate_stats(&settings).0
        );
        assert_eq!(restored.layout(), layout);
    }

    #[test]
    fn bad_records_are_omitted() {
        let mut layout = sample().layout();
        layout.modules.insert(
            0,
            ModuleRecord::Room {
                design: "ballroom".into(),
                level: 0,
                position: GridCoordinate::new(0, 0),
                rotation: Rotation::Deg0,
            },
        );
        layout.modules.push(ModuleRecord::Room {
            design: "power".into(),
            level: 0,
            position: GridCoordinate::new(6, 6),
            rotation: Rotation::Deg0,
        });

        let (restored, report) =
            Blueprint::restore(DesignCatalog::standard(), GridBounds::new(20, 20), &layout);
        assert_eq!(report.restored.len(), 3);
        assert_eq!(report.omitted.len(), 2);
        assert_eq!(restored.len(), 3);

        match &report.omitted[0].failure {
            RestoreFailure::MissingDesign(err) => {
                assert_eq!(err.reason(), MissingDesignReason::UnknownName)
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(report.omitted[1].index, 4);
        match &report.omitted[1].failure {
            RestoreFailure::Placement(err) => {
                assert_eq!(err.reason(), CannotPlaceReason::Overlap)
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
