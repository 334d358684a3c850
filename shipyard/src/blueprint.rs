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
//! The construction session: an editable design made of placed modules.
//!
//! Modules are held in an arena keyed by [`ModuleId`]. Adding a module to a blueprint
//! does not place it; a module only claims grid tiles once it is committed, and gives
//! them back when it is released. Modules that were added but never committed are
//! previews, and are left behind when the blueprint is launched.

use std::collections::{BTreeSet, HashMap};

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    board::{GridBounds, GridCoordinate, OccupancyGrid},
    footprint::{Footprint, Rotation},
    hull::{derive_plates, HullPlateMap, HullTier, InvalidHullTier},
    modules::{AttachedDirection, BlueprintId, Module, ModuleId, Placeable},
    stats::{aggregate, Contribution, StatSettings, StatSheet},
    vessel::Vessel,
};

pub use self::{
    errors::{
        CannotPlaceReason, CannotRemoveReason, PlaceError, RemoveModuleError, UpgradeError,
    },
    layout::{BlueprintLayout, ModuleRecord, OmittedModule, RestoreFailure, RestoreReport},
};

mod errors;
mod layout;

/// Name under which the hull tier shows up in stat traces.
pub const OUTER_HULL_SOURCE: &str = "outer hull";

/// Position and rotation of a module on the grid.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub position: GridCoordinate,
    pub rotation: Rotation,
}

impl Placement {
    /// Construct a placement.
    pub fn new(position: GridCoordinate, rotation: Rotation) -> Self {
        Self { position, rotation }
    }
}

/// An editable vessel design.
#[derive(Debug, Clone)]
pub struct Blueprint {
    id: BlueprintId,
    /// Tiles claimed by committed modules.
    occupancy: OccupancyGrid,
    /// Every module that belongs to this blueprint, committed or not.
    modules: HashMap<ModuleId, Module>,
    /// Ids of the modules, in the order they were added.
    order: Vec<ModuleId>,
    next_id: u32,
    hull_tier: Option<HullTier>,
}

impl Blueprint {
    /// Start an empty blueprint on a grid with the given bounds.
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            id: BlueprintId::next(),
            occupancy: OccupancyGrid::new(bounds),
            modules: HashMap::new(),
            order: Vec::new(),
            next_id: 0,
            hull_tier: None,
        }
    }

    /// The id modules of this blueprint record as their owner.
    pub fn id(&self) -> BlueprintId {
        self.id
    }

    /// Bounds of the grid.
    pub fn bounds(&self) -> &GridBounds {
        self.occupancy.bounds()
    }

    /// The occupancy store of this blueprint.
    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    /// Add a module to the blueprint without placing it. Weapons take on the blueprint's
    /// hull tier immediately.
    pub fn add_module(&mut self, module: impl Into<Module>) -> ModuleId {
        let mut module = module.into();
        let id = ModuleId::from_raw(self.next_id);
        self.next_id += 1;
        module.set_owner(Some(self.id));
        if let Some(weapon) = module.as_weapon_mut() {
            weapon.set_hull_tier(self.hull_tier);
        }
        self.modules.insert(id, module);
        self.order.push(id);
        id
    }

    /// Take a module out of the blueprint. A committed module must be released first.
    pub fn remove_module(&mut self, id: ModuleId) -> Result<Module, RemoveModuleError> {
        if self.occupancy.is_claimed(id) {
            return Err(RemoveModuleError::new(CannotRemoveReason::StillCommitted, id));
        }
        let mut module = self
            .modules
            .remove(&id)
            .ok_or_else(|| RemoveModuleError::new(CannotRemoveReason::UnknownModule, id))?;
        self.order.retain(|&other| other != id);
        module.set_owner(None);
        Ok(module)
    }

    /// Get a module by id.
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    /// Iterate all modules in the order they were added.
    pub fn modules(&self) -> impl '_ + Iterator<Item = (ModuleId, &Module)> {
        self.order.iter().map(move |id| (*id, &self.modules[id]))
    }

    /// Iterate committed modules in the order they were added.
    pub fn committed_modules(&self) -> impl '_ + Iterator<Item = (ModuleId, &Module)> {
        let occupancy = &self.occupancy;
        self.modules()
            .filter(move |(id, _)| occupancy.is_claimed(*id))
    }

    /// Number of modules, committed or not.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if the blueprint holds no modules.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the module currently claims grid tiles.
    pub fn is_committed(&self, id: ModuleId) -> bool {
        self.occupancy.is_claimed(id)
    }

    /// Check whether a module could be committed at the given position and rotation.
    /// Nothing is modified. Tiles the module itself already claims count as free.
    pub fn check_placement(
        &self,
        id: ModuleId,
        position: GridCoordinate,
        rotation: Rotation,
    ) -> Result<(), CannotPlaceReason> {
        let module = self
            .modules
            .get(&id)
            .ok_or(CannotPlaceReason::UnknownModule)?;
        if !module.supports_rotation(rotation) {
            return Err(CannotPlaceReason::UnsupportedRotation);
        }
        let tiles = module.footprint_at(position, rotation).tiles();
        self.occupancy.check_claim(&tiles, Some(id))?;
        Ok(())
    }

    /// Whether a module could be committed at the given position and rotation. Cheap
    /// enough to call on every pointer move while dragging.
    pub fn can_place(&self, id: ModuleId, position: GridCoordinate, rotation: Rotation) -> bool {
        self.check_placement(id, position, rotation).is_ok()
    }

    /// The footprint a module would have at the given position and rotation, for
    /// drawing a preview. `None` if there is no such module.
    pub fn preview(
        &self,
        id: ModuleId,
        position: GridCoordinate,
        rotation: Rotation,
    ) -> Option<Footprint> {
        self.modules
            .get(&id)
            .map(|module| module.footprint_at(position, rotation))
    }

    /// Move a module to the given position and rotation and claim its tiles. If the module
    /// was already committed it gives up its old tiles in the same step.
    ///
    /// The placement is validated first; on failure nothing changes.
    pub fn commit(
        &mut self,
        id: ModuleId,
        position: GridCoordinate,
        rotation: Rotation,
    ) -> Result<(), PlaceError> {
        let placement = Placement::new(position, rotation);
        self.check_placement(id, position, rotation)
            .map_err(|reason| PlaceError::new(reason, id, placement))?;

        self.occupancy.unmark(id);
        if let Some(module) = self.modules.get_mut(&id) {
            module.set_rotation(rotation);
            module.set_position(position);
            self.occupancy.mark(id, module.occupied_tiles().to_vec());
            debug!(
                "committed {} {} at {:?} {:?}",
                module.name(),
                id,
                position,
                rotation
            );
        }
        Ok(())
    }

    /// Give up the tiles claimed by a module. The module stays in the blueprint and keeps
    /// its position. Returns the released tiles, or `None` if it was not committed.
    pub fn release(&mut self, id: ModuleId) -> Option<Vec<GridCoordinate>> {
        let tiles = self.occupancy.unmark(id)?;
        debug!("released {} tiles from {}", tiles.len(), id);
        Some(tiles)
    }

    /// Point a weapon in a new direction. Returns false if the module is not a weapon.
    pub fn set_weapon_direction(&mut self, id: ModuleId, direction: AttachedDirection) -> bool {
        match self.modules.get_mut(&id).and_then(Module::as_weapon_mut) {
            Some(weapon) => {
                weapon.set_direction(direction);
                true
            }
            None => false,
        }
    }

    /// Change the level of a room. A committed room must still fit at its position at the
    /// new level, otherwise nothing changes.
    pub fn set_room_level(&mut self, id: ModuleId, level: usize) -> Result<(), UpgradeError> {
        let module = self
            .modules
            .get(&id)
            .ok_or(UpgradeError::UnknownModule(id))?;
        let mut room = module.as_room().ok_or(UpgradeError::NotARoom(id))?.clone();
        room.set_level(level)?;

        if self.occupancy.is_claimed(id) {
            let placement = Placement::new(room.position().unwrap_or_default(), room.rotation());
            self.occupancy
                .check_claim(room.occupied_tiles(), Some(id))
                .map_err(|reason| PlaceError::new(reason.into(), id, placement))?;
            self.occupancy.unmark(id);
            self.occupancy.mark(id, room.occupied_tiles().to_vec());
        }
        self.modules.insert(id, Module::Room(room));
        Ok(())
    }

    /// The module claiming the given tile, if any.
    pub fn module_at(&self, tile: GridCoordinate) -> Option<ModuleId> {
        self.occupancy.owner(tile)
    }

    /// Every tile claimed by a committed module.
    pub fn occupied_tiles(&self) -> BTreeSet<GridCoordinate> {
        self.occupancy.occupied_set()
    }

    /// Sum of the costs of every module in the blueprint.
    pub fn total_cost(&self) -> u32 {
        self.modules.values().map(Placeable::cost).sum()
    }

    /// Midpoint of the bounding box of all occupied tiles, or the center of the grid if
    /// nothing is committed.
    pub fn center_tile(&self) -> GridCoordinate {
        let mut tiles = self.occupancy.tiles();
        let first = match tiles.next() {
            Some(tile) => tile,
            None => return self.bounds().center(),
        };
        let (min, max) = tiles.fold((first, first), |(min, max), tile| {
            (
                GridCoordinate::new(min.x.min(tile.x), min.y.min(tile.y)),
                GridCoordinate::new(max.x.max(tile.x), max.y.max(tile.y)),
            )
        });
        GridCoordinate::new((min.x + max.x + 1) / 2, (min.y + max.y + 1) / 2)
    }

    /// The blueprint's hull tier.
    pub fn hull_tier(&self) -> Option<HullTier> {
        self.hull_tier
    }

    /// Set the hull tier and stamp it onto every weapon. Rooms are unaffected.
    pub fn set_hull_tier(&mut self, tier: Option<HullTier>) {
        self.hull_tier = tier;
        for weapon in self.modules.values_mut().filter_map(Module::as_weapon_mut) {
            weapon.set_hull_tier(tier);
        }
    }

    /// Set the hull tier by level. Levels above [`HullTier::MAX`] are rejected and leave
    /// the tier unchanged.
    pub fn set_hull_level(&mut self, level: u8) -> Result<(), InvalidHullTier> {
        match HullTier::new(level) {
            Some(tier) => {
                self.set_hull_tier(Some(tier));
                Ok(())
            }
            None => {
                warn!("rejected hull tier {}", level);
                Err(InvalidHullTier(level))
            }
        }
    }

    /// Derive the hull plates around the committed structure. Plates that would fall
    /// outside the grid are left off and never charged for.
    pub fn hull_plates<R: Rng + ?Sized>(&self, rng: &mut R) -> HullPlateMap {
        derive_plates(&self.occupied_tiles(), self.bounds(), rng)
    }

    /// Cost of plating every tile in `plates` at the current hull tier. Free if no tier
    /// is set.
    pub fn hull_plating_cost(&self, plates: &HullPlateMap) -> u32 {
        self.hull_tier
            .map_or(0, |tier| plates.len() as u32 * tier.cost_per_surface())
    }

    /// The stat contributions of every committed module, in order, followed by the hull.
    pub fn contributions(&self) -> Vec<Contribution> {
        collect_contributions(self.committed_modules(), self.hull_tier)
    }

    /// Aggregate the stats the design would have, with no crew aboard.
    pub fn aggregate_stats(&self, settings: &StatSettings) -> (StatSheet, Vec<Contribution>) {
        aggregate(settings, &self.contributions(), std::iter::empty())
    }

    /// Turn the design into a live vessel. Fails, handing the blueprint back, if no room
    /// is committed. Modules that were never committed are dropped.
    pub fn launch(self, settings: StatSettings) -> Result<Vessel, Blueprint> {
        let has_room = self
            .committed_modules()
            .any(|(_, module)| module.as_room().is_some());
        if !has_room {
            return Err(self);
        }

        let Blueprint {
            occupancy,
            mut modules,
            order,
            hull_tier,
            ..
        } = self;
        let parts: Vec<(ModuleId, Module)> = order
            .into_iter()
            .filter(|&id| occupancy.is_claimed(id))
            .filter_map(|id| modules.remove(&id).map(|module| (id, module)))
            .collect();
        if !modules.is_empty() {
            debug!("dropped {} uncommitted modules at launch", modules.len());
        }
        info!("launching vessel with {} modules", parts.len());
        Ok(Vessel::assemble(occupancy, parts, hull_tier, settings))
    }
}

/// Gather the contributions of the given modules, each named after its design and id,
/// followed by the hull tier.
pub(crate) fn collect_contributions<'a>(
    modules: impl Iterator<Item = (ModuleId, &'a Module)>,
    hull_tier: Option<HullTier>,
) -> Vec<Contribution> {
    let mut contributions: Vec<_> = modules
        .map(|(id, module)| {
            Contribution::new(format!("{} {}", module.name(), id), module.contributions())
        })
        .collect();
    if let Some(tier) = hull_tier {
        contributions.push(Contribution::new(OUTER_HULL_SOURCE, tier.contributions()));
    }
    contributions
}

impl Default for Blueprint {
    fn default() -> Self {
        Self::new(GridBounds::default())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{catalog::DesignCatalog, stats::VesselStat};

    fn room(name: &str) -> Module {
        DesignCatalog::standard().build_room(name, 0).unwrap().into()
    }

    fn laser() -> Module {
        DesignCatalog::standard().build_weapon("laser").unwrap().into()
    }

    /// Check that the occupancy store holds exactly the tiles of committed modules, with
    /// no tile shared.
    fn assert_exact(blueprint: &Blueprint) {
        let mut union = BTreeSet::new();
        for (id, module) in blueprint.committed_modules() {
            for &tile in module.occupied_tiles() {
                assert!(union.insert(tile), "tile {:?} shared by {}", tile, id);
                assert_eq!(blueprint.module_at(tile), Some(id));
            }
        }
        assert_eq!(union, blueprint.occupied_tiles());
    }

    #[test]
    fn commit_claims_footprint() {
        let mut blueprint = Blueprint::new(GridBounds::new(20, 20));
        let engine = blueprint.add_module(room("engine"));
        assert!(!blueprint.is_committed(engine));
        assert!(blueprint.occupied_tiles().is_empty());

        blueprint
            .commit(engine, GridCoordinate::new(3, 3), Rotation::Deg0)
            .unwrap();
        assert!(blueprint.is_committed(engine));
        assert_eq!(blueprint.occupied_tiles().len(), 4);
        assert_exact(&blueprint);
    }

    #[test]
    fn commit_rejects_overlap_and_bounds_without_changes() {
        let mut blueprint = Blueprint::new(GridBounds::new(10, 10));
        let a = blueprint.add_module(room("engine"));
        let b = blueprint.add_module(room("power"));
        blueprint.commit(a, GridCoordinate::new(0, 0), Rotation::Deg0).unwrap();
        blueprint.commit(b, GridCoordinate::new(5, 5), Rotation::Deg0).unwrap();

        let err = blueprint
            .commit(b, GridCoordinate::new(1, 1), Rotation::Deg0)
            .unwrap_err();
        assert_eq!(err.reason(), CannotPlaceReason::Overlap);
        assert_eq!(err.placement().position, GridCoordinate::new(1, 1));
        assert_eq!(
            blueprint.module(b).unwrap().position(),
            Some(GridCoordinate::new(5, 5))
        );

        let err = blueprint
            .commit(b, GridCoordinate::new(9, 9), Rotation::Deg0)
            .unwrap_err();
        assert_eq!(err.reason(), CannotPlaceReason::OutOfBounds);
        assert_exact(&blueprint);
    }

    #[test]
    fn probing_changes_nothing() {
        let mut blueprint = Blueprint::new(GridBounds::new(12, 12));
        let engine = blueprint.add_module(room("engine"));
        let shield = blueprint.add_module(room("shield"));
        blueprint.commit(engine, GridCoordinate::new(4, 4), Rotation::Deg0).unwrap();
        blueprint.commit(shield, GridCoordinate::new(0, 0), Rotation::Deg0).unwrap();
        let before_tiles = blueprint.occupied_tiles();
        let before_module = blueprint.module(shield).unwrap().occupied_tiles().to_vec();

        for x in -2..14 {
            for y in -2..14 {
                for &rot in Rotation::ALL.iter() {
                    blueprint.can_place(shield, GridCoordinate::new(x, y), rot);
                }
            }
        }
        let module = blueprint.module(shield).unwrap();
        assert_eq!(module.position(), Some(GridCoordinate::new(0, 0)));
        assert_eq!(module.rotation(), Rotation::Deg0);
        assert_eq!(module.occupied_tiles(), &before_module[..]);
        assert_eq!(blueprint.occupied_tiles(), before_tiles);
    }

    #[test]
    fn can_place_reports_each_reason() {
        let mut blueprint = Blueprint::new(GridBounds::new(10, 10));
        let engine = blueprint.add_module(room("engine"));
        let gun = blueprint.add_module(laser());
        blueprint.commit(engine, GridCoordinate::new(2, 2), Rotation::Deg0).unwrap();

        assert_eq!(
            blueprint.check_placement(gun, GridCoordinate::new(1, 2), Rotation::Deg0),
            Err(CannotPlaceReason::Overlap)
        );
        assert_eq!(
            blueprint.check_placement(gun, GridCoordinate::new(9, 0), Rotation::Deg0),
            Err(CannotPlaceReason::OutOfBounds)
        );
        assert_eq!(
            blueprint.check_placement(gun, GridCoordinate::new(0, 0), Rotation::Deg90),
            Err(CannotPlaceReason::UnsupportedRotation)
        );
        assert_eq!(
            blueprint.check_placement(ModuleId::from_raw(77), GridCoordinate::new(0, 0), Rotation::Deg0),
            Err(CannotPlaceReason::UnknownModule)
        );
        assert!(blueprint.can_place(gun, GridCoordinate::new(0, 0), Rotation::Deg0));
        // Moving onto its own tiles is fine.
        assert!(blueprint.can_place(engine, GridCoordinate::new(3, 2), Rotation::Deg0));
    }

    #[test]
    fn random_commits_and_releases_stay_exact() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut blueprint = Blueprint::new(GridBounds::new(16, 16));
        let names = ["engine", "power", "shield", "oxygen", "corridor", "crew_quarters"];
        let ids: Vec<_> = names.iter().map(|name| blueprint.add_module(room(name))).collect();

        for _ in 0..300 {
            let id = ids[rng.gen_range(0, ids.len())];
            if rng.gen_bool(0.3) {
                blueprint.release(id);
            } else {
                let position = GridCoordinate::new(rng.gen_range(-1, 16), rng.gen_range(-1, 16));
                let rotation = Rotation::ALL[rng.gen_range(0, 4)];
                let _ = blueprint.commit(id, position, rotation);
            }
            assert_exact(&blueprint);
        }
    }

    #[test]
    fn committed_modules_cannot_be_removed() {
        let mut blueprint = Blueprint::default();
        let engine = blueprint.add_module(room("engine"));
        blueprint.commit(engine, GridCoordinate::new(1, 1), Rotation::Deg90).unwrap();
        let err = blueprint.remove_module(engine).unwrap_err();
        assert_eq!(err.reason(), CannotRemoveReason::StillCommitted);

        assert_eq!(blueprint.release(engine).map(|tiles| tiles.len()), Some(4));
        let module = blueprint.remove_module(engine).unwrap();
        assert!(module.owner().is_none());
        assert!(blueprint.is_empty());
        assert_eq!(
            blueprint.remove_module(engine).unwrap_err().reason(),
            CannotRemoveReason::UnknownModule
        );
    }

    #[test]
    fn weapons_follow_hull_tier() {
        let mut blueprint = Blueprint::default();
        blueprint.set_hull_level(1).unwrap();
        let gun = blueprint.add_module(laser());
        let engine = blueprint.add_module(room("engine"));
        let tier = |bp: &Blueprint| bp.module(gun).and_then(Module::as_weapon).unwrap().hull_tier();
        assert_eq!(tier(&blueprint), HullTier::new(1));

        blueprint.set_hull_tier(HullTier::new(2));
        assert_eq!(tier(&blueprint), HullTier::new(2));
        assert!(blueprint.module(engine).unwrap().as_weapon().is_none());

        assert_eq!(blueprint.set_hull_level(3), Err(InvalidHullTier(3)));
        assert_eq!(blueprint.hull_tier(), HullTier::new(2));
    }

    #[test]
    fn cost_and_center() {
        let mut blueprint = Blueprint::new(GridBounds::new(40, 20));
        assert_eq!(blueprint.center_tile(), GridCoordinate::new(20, 10));

        let engine = blueprint.add_module(room("engine"));
        let power = blueprint.add_module(room("power"));
        blueprint.commit(engine, GridCoordinate::new(2, 2), Rotation::Deg0).unwrap();
        blueprint.commit(power, GridCoordinate::new(6, 2), Rotation::Deg0).unwrap();
        assert_eq!(blueprint.total_cost(), 2500 + 2000);
        assert_eq!(blueprint.center_tile(), GridCoordinate::new(5, 3));
    }

    #[test]
    fn plating_is_only_charged_inside_the_grid() {
        let mut blueprint = Blueprint::new(GridBounds::new(10, 10));
        blueprint.set_hull_level(1).unwrap();
        let engine = blueprint.add_module(room("engine"));
        let mut rng = StdRng::seed_from_u64(4);

        blueprint.commit(engine, GridCoordinate::new(0, 0), Rotation::Deg0).unwrap();
        let plates = blueprint.hull_plates(&mut rng);
        assert_eq!(plates.len(), 5);
        assert!(plates.keys().all(|&tile| blueprint.bounds().contains(tile)));
        assert_eq!(blueprint.hull_plating_cost(&plates), 50);

        blueprint.commit(engine, GridCoordinate::new(4, 4), Rotation::Deg0).unwrap();
        let plates = blueprint.hull_plates(&mut rng);
        assert_eq!(plates.len(), 12);
        assert_eq!(blueprint.hull_plating_cost(&plates), 120);
    }

    #[test]
    fn room_upgrade_must_fit() {
        let mut blueprint = Blueprint::new(GridBounds::new(10, 10));
        let engine = blueprint.add_module(room("engine"));
        let wall = blueprint.add_module(room("corridor"));
        blueprint.commit(engine, GridCoordinate::new(0, 0), Rotation::Deg0).unwrap();
        blueprint.commit(wall, GridCoordinate::new(2, 0), Rotation::Deg0).unwrap();

        match blueprint.set_room_level(engine, 1) {
            Err(UpgradeError::Placement(err)) => {
                assert_eq!(err.reason(), CannotPlaceReason::Overlap)
            }
            other => panic!("unexpected {:?}", other),
        }
        blueprint.release(wall);
        blueprint.set_room_level(engine, 1).unwrap();
        assert_eq!(blueprint.occupied_tiles().len(), 6);
        assert!(matches!(
            blueprint.set_room_level(engine, 5),
            Err(UpgradeError::MissingDesign(_))
        ));
        assert_exact(&blueprint);
    }

    #[test]
    fn design_stats_include_hull() {
        let mut blueprint = Blueprint::default();
        let engine = blueprint.add_module(room("engine"));
        let ghost = blueprint.add_module(room("power"));
        blueprint.commit(engine, GridCoordinate::new(0, 0), Rotation::Deg0).unwrap();
        blueprint.set_hull_level(1).unwrap();
        assert!(!blueprint.is_committed(ghost));

        let (sheet, trace) = blueprint.aggregate_stats(&StatSettings::default());
        assert_eq!(sheet.get(VesselStat::PowerUsing), 50.0);
        assert_eq!(sheet.get(VesselStat::PowerCapacity), 0.0);
        assert_eq!(sheet.get(VesselStat::DamageReduction), 5.0);
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[1].source, OUTER_HULL_SOURCE);
    }

    #[test]
    fn launch_needs_a_room() {
        let blueprint = Blueprint::default();
        let blueprint = blueprint.launch(StatSettings::default()).unwrap_err();
        let mut blueprint = blueprint;
        let gun = blueprint.add_module(laser());
        blueprint.commit(gun, GridCoordinate::new(0, 0), Rotation::Deg0).unwrap();
        assert!(blueprint.launch(StatSettings::default()).is_err());
    }
}
