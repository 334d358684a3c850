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
//! The live vessel: a launched blueprint that carries crew, has a shield and takes hits.
//!
//! Every structural change on a vessel (losing a room, crew boarding or dying, a hull
//! tier change) ends with a full stat recompute. Once the vessel is destroyed it stops
//! recomputing.

use std::collections::HashMap;

use log::{debug, info};

use crate::{
    blueprint::collect_contributions,
    board::{GridBounds, GridCoordinate, OccupancyGrid},
    catalog::{RoomKind, WeaponType},
    hull::HullTier,
    modules::{DamageCondition, Module, ModuleId, Room},
    stats::{Contribution, StatEngine, StatSettings, StatSheet, VesselStat},
};

pub use self::{
    crew::{CrewMember, DEFAULT_CREW_HIT_POINTS, OXYGEN_USE_PER_CREW},
    errors::{AttackError, CannotAttackReason, CannotBoardReason, CrewError},
    shield::ShieldState,
};

mod crew;
mod errors;
mod shield;

/// Fraction of a splash hit dealt to crew on each of the 8 surrounding tiles.
pub const SPLASH_FACTOR: f32 = 0.8;

/// Damage dealt to a room by one hit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ModuleHit {
    pub module: ModuleId,
    /// Hit points the room actually lost.
    pub damage: f32,
    /// Condition of the room after the hit.
    pub condition: DamageCondition,
}

/// Damage dealt to a crew member by one hit.
#[derive(Debug, Clone, PartialEq)]
pub struct CrewHit {
    pub name: String,
    pub position: GridCoordinate,
    pub damage: f32,
    pub killed: bool,
}

/// What happened when a vessel was attacked.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackReport {
    /// Damage of the incoming hit.
    pub incoming: f32,
    /// Damage stopped by the shield.
    pub shield_absorbed: f32,
    /// Whether the hit brought the shield down.
    pub shield_broken: bool,
    /// Damage left after shield and damage reduction, applied to structure, room and
    /// crew.
    pub damage: f32,
    pub module: Option<ModuleHit>,
    pub crew: Vec<CrewHit>,
    /// Whether the hit destroyed the vessel.
    pub destroyed: bool,
}

impl AttackReport {
    fn new(incoming: f32) -> Self {
        Self {
            incoming,
            shield_absorbed: 0.0,
            shield_broken: false,
            damage: 0.0,
            module: None,
            crew: Vec::new(),
            destroyed: false,
        }
    }
}

/// A launched vessel.
#[derive(Debug)]
pub struct Vessel {
    occupancy: OccupancyGrid,
    modules: HashMap<ModuleId, Module>,
    order: Vec<ModuleId>,
    crew: Vec<CrewMember>,
    hull_tier: Option<HullTier>,
    stats: StatEngine,
    hit_points: f32,
    shield: ShieldState,
    destroyed: bool,
}

impl Vessel {
    /// Build a vessel from committed modules. Starts at full hit points and shield.
    pub(crate) fn assemble(
        occupancy: OccupancyGrid,
        parts: Vec<(ModuleId, Module)>,
        hull_tier: Option<HullTier>,
        settings: StatSettings,
    ) -> Self {
        let order = parts.iter().map(|(id, _)| *id).collect();
        let mut vessel = Self {
            occupancy,
            modules: parts.into_iter().collect(),
            order,
            crew: Vec::new(),
            hull_tier,
            stats: StatEngine::new(settings),
            hit_points: 0.0,
            shield: ShieldState::full(0.0),
            destroyed: false,
        };
        vessel.recompute();
        vessel.hit_points = vessel.stat(VesselStat::HitPointsMax);
        vessel.shield = ShieldState::full(vessel.stat(VesselStat::ShieldMaxAmount));
        vessel
    }

    /// Rebuild the stat sheet from the current modules and crew, then trim hit points
    /// and shield to their new maximums.
    fn recompute(&mut self) {
        let modules = collect_contributions(self.modules(), self.hull_tier);
        let crew: Vec<_> = self
            .crew
            .iter()
            .map(|member| Contribution::new(member.name(), member.contributions()))
            .collect();
        self.stats.recompute(&modules, &crew);
        self.hit_points = self.hit_points.min(self.stat(VesselStat::HitPointsMax));
        self.shield.set_max(self.stat(VesselStat::ShieldMaxAmount));
    }

    /// Current value of a stat.
    pub fn stat(&self, stat: VesselStat) -> f32 {
        self.stats.get(stat)
    }

    /// Every stat from the most recent recompute.
    pub fn stats(&self) -> &StatSheet {
        self.stats.sheet()
    }

    /// What each module, crew member and the hull contributed in the last recompute.
    pub fn contribution_trace(&self) -> &[Contribution] {
        self.stats.trace()
    }

    /// Register a listener called after every stat recompute.
    pub fn subscribe(&mut self, listener: impl FnMut(&StatSheet) + 'static) {
        self.stats.subscribe(listener);
    }

    pub fn bounds(&self) -> &GridBounds {
        self.occupancy.bounds()
    }

    pub fn hit_points(&self) -> f32 {
        self.hit_points
    }

    /// Hit points as a fraction of `HitPointsMax`, from 0 to 1.
    pub fn hit_point_percentage(&self) -> f32 {
        let max = self.stat(VesselStat::HitPointsMax);
        if max > 0.0 {
            self.hit_points / max
        } else {
            0.0
        }
    }

    pub fn shield(&self) -> &ShieldState {
        &self.shield
    }

    pub fn hull_tier(&self) -> Option<HullTier> {
        self.hull_tier
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Iterate modules in the order they were added to the blueprint.
    pub fn modules(&self) -> impl '_ + Iterator<Item = (ModuleId, &Module)> {
        self.order.iter().map(move |id| (*id, &self.modules[id]))
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    /// The module covering a tile, if any.
    pub fn module_at(&self, tile: GridCoordinate) -> Option<(ModuleId, &Module)> {
        let id = self.occupancy.owner(tile)?;
        self.modules.get(&id).map(|module| (id, module))
    }

    pub fn crew(&self) -> &[CrewMember] {
        &self.crew
    }

    /// The crew member standing on a tile, if any.
    pub fn crew_at(&self, tile: GridCoordinate) -> Option<&CrewMember> {
        self.crew.iter().find(|member| member.position() == tile)
    }

    /// Whether a room of the given kind is still working.
    fn has_working_room(&self, kind: RoomKind) -> bool {
        self.modules
            .values()
            .filter_map(Module::as_room)
            .any(|room| room.kind() == kind && room.is_operational())
    }

    /// A vessel can warp while it has an operational engine and cockpit.
    pub fn can_warp(&self) -> bool {
        !self.destroyed
            && self.has_working_room(RoomKind::Engine)
            && self.has_working_room(RoomKind::Cockpit)
    }

    /// Bring a crew member aboard. They must stand on a free tile inside a room and the
    /// vessel must have crew capacity left.
    pub fn board(&mut self, crew: CrewMember) -> Result<(), CrewError> {
        if self.destroyed {
            return Err(CrewError::new(CannotBoardReason::VesselDestroyed, crew));
        }
        if self.crew.len() as f32 >= self.stat(VesselStat::CrewCapacity) {
            return Err(CrewError::new(CannotBoardReason::CapacityReached, crew));
        }
        let in_room = self
            .module_at(crew.position())
            .map_or(false, |(_, module)| module.as_room().is_some());
        if !in_room {
            return Err(CrewError::new(CannotBoardReason::NotInRoom, crew));
        }
        if self.crew_at(crew.position()).is_some() {
            return Err(CrewError::new(CannotBoardReason::TileTaken, crew));
        }
        debug!("{} boarded at {:?}", crew.name(), crew.position());
        self.crew.push(crew);
        self.recompute();
        Ok(())
    }

    /// Take a crew member off the vessel by name.
    pub fn remove_crew(&mut self, name: &str) -> Option<CrewMember> {
        let index = self.crew.iter().position(|member| member.name() == name)?;
        let member = self.crew.remove(index);
        if !self.destroyed {
            self.recompute();
        }
        Some(member)
    }

    /// Take a module off the vessel, freeing its tiles.
    pub fn remove_module(&mut self, id: ModuleId) -> Option<Module> {
        let module = self.modules.remove(&id)?;
        self.order.retain(|&other| other != id);
        self.occupancy.unmark(id);
        if !self.destroyed {
            self.recompute();
        }
        Some(module)
    }

    /// Change the hull tier. Weapons take on the new tier.
    pub fn set_hull_tier(&mut self, tier: Option<HullTier>) {
        self.hull_tier = tier;
        for weapon in self.modules.values_mut().filter_map(Module::as_weapon_mut) {
            weapon.set_hull_tier(tier);
        }
        if !self.destroyed {
            self.recompute();
        }
    }

    /// Repair a room by up to `amount` hit points. Returns the hit points restored, or
    /// `None` if there is no such room or the vessel is destroyed.
    pub fn repair_room(&mut self, id: ModuleId, amount: f32) -> Option<f32> {
        self.update_room(id, |room| room.repair(amount))
    }

    /// Bring a room back to full hit points in good condition. Returns `false` if there
    /// is no such room or the vessel is destroyed.
    pub fn full_repair_room(&mut self, id: ModuleId) -> bool {
        self.update_room(id, Room::full_repair).is_some()
    }

    /// Switch a room on or off. Returns `false` if there is no such room or the vessel is
    /// destroyed.
    pub fn set_room_active(&mut self, id: ModuleId, active: bool) -> bool {
        self.update_room(id, |room| room.set_active(active)).is_some()
    }

    /// Apply a change to one room, recomputing stats if it started or stopped working
    /// or its condition changed.
    fn update_room<T>(
        &mut self,
        id: ModuleId,
        change: impl FnOnce(&mut Room) -> T,
    ) -> Option<T> {
        if self.destroyed {
            return None;
        }
        let room = self.modules.get_mut(&id).and_then(Module::as_room_mut)?;
        let before = (room.condition(), room.is_operational());
        let result = change(room);
        if (room.condition(), room.is_operational()) != before {
            debug!("room {} is now {:?}", id, room.condition());
            self.recompute();
        }
        Some(result)
    }

    /// Advance time by `dt` seconds. A broken shield counts down to its respawn, an active
    /// one regenerates, and crew heal by `HealPerSecond`.
    pub fn tick(&mut self, dt: f32) {
        if self.destroyed {
            return;
        }
        let regenerate = self.stat(VesselStat::ShieldRegeneratePerSecond);
        if self.shield.tick(dt, regenerate) {
            info!("shield back up at {}", self.shield.current());
        }
        let heal = self.stat(VesselStat::HealPerSecond) * dt;
        if heal > 0.0 {
            for member in &mut self.crew {
                member.heal(heal);
            }
        }
    }

    /// Resolve one incoming hit.
    ///
    /// The shield takes the hit first. Whatever gets through is reduced by the vessel's
    /// `DamageReduction` percentage and taken off the structure. If the vessel survives,
    /// the same damage hits the room on the struck tile, if that room is damageable, and
    /// the crew standing there.
    /// Splash weapons also hit crew on the 8 surrounding tiles for [`SPLASH_FACTOR`] of
    /// the damage.
    pub fn take_attack(
        &mut self,
        damage: f32,
        weapon_type: WeaponType,
        position: GridCoordinate,
    ) -> Result<AttackReport, AttackError> {
        if self.destroyed {
            return Err(AttackError::new(CannotAttackReason::AlreadyDestroyed, damage));
        }
        if !damage.is_finite() || damage < 0.0 {
            return Err(AttackError::new(CannotAttackReason::InvalidDamage, damage));
        }
        let mut report = AttackReport::new(damage);

        let respawn_time = self.stat(VesselStat::ShieldRespawnTime);
        let hit = self.shield.absorb(damage, weapon_type, respawn_time);
        report.shield_absorbed = hit.absorbed;
        report.shield_broken = hit.broke;
        if hit.broke {
            debug!("shield broken, respawning in {}s", respawn_time);
        }
        if hit.leftover <= 0.0 {
            return Ok(report);
        }

        let reduction = self.stat(VesselStat::DamageReduction).max(0.0).min(100.0);
        let damage = hit.leftover * (1.0 - reduction / 100.0);
        report.damage = damage;

        self.hit_points -= damage;
        if self.hit_points <= 0.0 {
            self.hit_points = 0.0;
            self.destroyed = true;
            report.destroyed = true;
            info!("vessel destroyed");
            return Ok(report);
        }

        let mut changed = false;
        if let Some(id) = self.occupancy.owner(position) {
            let room = self
                .modules
                .get_mut(&id)
                .and_then(Module::as_room_mut)
                .filter(|room| room.is_damageable());
            if let Some(room) = room {
                let before = room.condition();
                let lost = room.take_damage(damage);
                changed |= room.condition() != before;
                report.module = Some(ModuleHit {
                    module: id,
                    damage: lost,
                    condition: room.condition(),
                });
            }
        }

        let splash = weapon_type.is_splash();
        for member in &mut self.crew {
            let factor = match crew_damage_factor(position, member.position(), splash) {
                Some(factor) => factor,
                None => continue,
            };
            let lost = member.take_damage(damage * factor);
            report.crew.push(CrewHit {
                name: member.name().to_owned(),
                position: member.position(),
                damage: lost,
                killed: member.is_dead(),
            });
        }
        let before = self.crew.len();
        self.crew.retain(|member| !member.is_dead());
        changed |= self.crew.len() != before;

        if changed {
            self.recompute();
        }
        Ok(report)
    }
}

/// Fraction of a hit at `hit` that reaches crew on `tile`, if any.
fn crew_damage_factor(hit: GridCoordinate, tile: GridCoordinate, splash: bool) -> Option<f32> {
    if tile == hit {
        Some(1.0)
    } else if splash && (tile.x - hit.x).abs() <= 1 && (tile.y - hit.y).abs() <= 1 {
        Some(SPLASH_FACTOR)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{
        blueprint::Blueprint,
        catalog::DesignCatalog,
        footprint::Rotation,
    };

    const CATALOG: &str = r#"{
        "rooms": [
            { "name": "bunker", "kind": "CrewQuarters", "levels": [
                { "size": { "width": 3, "height": 3 }, "cost": 100, "hit_points": 1000,
                  "stats": { "ShieldMaxAmount": 40, "DamageReduction": 10,
                             "CrewCapacity": 10, "ShieldRegeneratePerSecond": 4 } } ] },
            { "name": "engine", "kind": "Engine", "levels": [
                { "size": { "width": 1, "height": 1 }, "cost": 10, "hit_points": 10,
                  "stats": { "PowerUsing": 5 } } ] },
            { "name": "cockpit", "kind": "Cockpit", "levels": [
                { "size": { "width": 1, "height": 1 }, "cost": 10, "hit_points": 10 } ] }
        ],
        "weapons": [
            { "name": "missile", "weapon_type": "Missile", "damage": 100, "cost": 1 }
        ]
    }"#;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    /// A 3x3 bunker at (0,0)..(2,2), an engine at (3,0) and a cockpit at (3,1).
    fn vessel() -> Vessel {
        let catalog = DesignCatalog::from_json(CATALOG).unwrap();
        let mut blueprint = Blueprint::new(GridBounds::new(10, 10));
        for (name, x, y) in &[("bunker", 0, 0), ("engine", 3, 0), ("cockpit", 3, 1)] {
            let id = blueprint.add_module(catalog.build_room(name, 0).unwrap());
            blueprint
                .commit(id, GridCoordinate::new(*x, *y), Rotation::Deg0)
                .unwrap();
        }
        blueprint.launch(StatSettings::default()).unwrap()
    }

    #[test]
    fn launches_at_full_health() {
        let vessel = vessel();
        assert_eq!(vessel.hit_points(), 1020.0);
        assert_eq!(vessel.hit_point_percentage(), 1.0);
        assert_eq!(vessel.shield().current(), 40.0);
        assert!(vessel.can_warp());
        assert_eq!(vessel.contribution_trace().len(), 3);
    }

    #[test]
    fn splash_damage_reaches_neighbours() {
        let mut vessel = vessel();
        for (name, x, y) in &[("center", 1, 1), ("corner", 0, 0), ("edge", 2, 1)] {
            vessel
                .board(CrewMember::new(*name, GridCoordinate::new(*x, *y)))
                .unwrap();
        }

        let report = vessel
            .take_attack(100.0, WeaponType::Missile, GridCoordinate::new(1, 1))
            .unwrap();
        assert!(close(report.shield_absorbed, 40.0));
        assert!(report.shield_broken);
        assert!(close(report.damage, 54.0));
        assert!(close(vessel.hit_points(), 1020.0 - 54.0));
        let room = report.module.unwrap();
        assert!(close(room.damage, 54.0));
        assert_eq!(room.condition, DamageCondition::Good);

        let hits: HashMap<_, _> = report
            .crew
            .iter()
            .map(|hit| (hit.name.as_str(), hit.damage))
            .collect();
        assert!(close(hits["center"], 54.0));
        assert!(close(hits["corner"], 43.2));
        assert!(close(hits["edge"], 43.2));
    }

    #[test]
    fn laser_hits_only_struck_tile() {
        let mut vessel = vessel();
        vessel.board(CrewMember::new("a", GridCoordinate::new(1, 1))).unwrap();
        vessel.board(CrewMember::new("b", GridCoordinate::new(1, 2))).unwrap();
        let report = vessel
            .take_attack(100.0, WeaponType::Laser, GridCoordinate::new(1, 1))
            .unwrap();
        assert_eq!(report.crew.len(), 1);
        assert_eq!(report.crew[0].name, "a");
        assert_eq!(vessel.crew_at(GridCoordinate::new(1, 2)).unwrap().hit_points(), 100.0);
    }

    #[test]
    fn absorbed_hit_changes_only_shield() {
        let mut vessel = vessel();
        let report = vessel
            .take_attack(30.0, WeaponType::Laser, GridCoordinate::new(1, 1))
            .unwrap();
        assert_eq!(report.damage, 0.0);
        assert!(report.module.is_none());
        assert_eq!(vessel.hit_points(), 1020.0);
        assert!(close(vessel.shield().current(), 10.0));

        vessel.tick(1.0);
        assert!(close(vessel.shield().current(), 14.0));
    }

    #[test]
    fn empty_tile_skips_room_stage() {
        let mut vessel = vessel();
        let report = vessel
            .take_attack(100.0, WeaponType::Laser, GridCoordinate::new(8, 8))
            .unwrap();
        assert!(report.module.is_none());
        assert!(close(report.damage, 54.0));
    }

    #[test]
    fn crew_death_recomputes_oxygen_use() {
        let mut vessel = vessel();
        vessel
            .board(CrewMember::new("frail", GridCoordinate::new(1, 1)).with_hit_points(10.0))
            .unwrap();
        assert_eq!(vessel.stat(VesselStat::OxygenUsingPerSecond), OXYGEN_USE_PER_CREW);

        let report = vessel
            .take_attack(100.0, WeaponType::Laser, GridCoordinate::new(1, 1))
            .unwrap();
        assert!(report.crew[0].killed);
        assert!(vessel.crew().is_empty());
        assert_eq!(vessel.stat(VesselStat::OxygenUsingPerSecond), 0.0);
    }

    #[test]
    fn broken_room_stops_contributing() {
        let mut vessel = vessel();
        let power = vessel.stat(VesselStat::PowerUsing);
        assert_eq!(power, 5.0);
        vessel.shield = ShieldState::full(0.0);
        let report = vessel
            .take_attack(50.0, WeaponType::Laser, GridCoordinate::new(3, 0))
            .unwrap();
        assert_eq!(report.module.unwrap().condition, DamageCondition::Breakdown);
        assert_eq!(vessel.stat(VesselStat::PowerUsing), 0.0);
        assert_eq!(vessel.stat(VesselStat::HitPointsMax), 1020.0);
        assert!(!vessel.can_warp());
    }

    /// Launch a vessel of standard rooms, each given as a name and anchor tile.
    fn standard_vessel(rooms: &[(&str, i32, i32)]) -> Vessel {
        let catalog = DesignCatalog::standard();
        let mut blueprint = Blueprint::new(GridBounds::new(10, 10));
        for &(name, x, y) in rooms {
            let id = blueprint.add_module(catalog.build_room(name, 0).unwrap());
            blueprint
                .commit(id, GridCoordinate::new(x, y), Rotation::Deg0)
                .unwrap();
        }
        blueprint.launch(StatSettings::default()).unwrap()
    }

    #[test]
    fn corridor_is_not_damaged() {
        let mut vessel = standard_vessel(&[("corridor", 2, 2)]);
        let report = vessel
            .take_attack(5.0, WeaponType::Laser, GridCoordinate::new(2, 2))
            .unwrap();
        assert!(report.module.is_none());
        assert_eq!(report.damage, 5.0);
        assert_eq!(vessel.hit_points(), 15.0);
        let (_, corridor) = vessel.module_at(GridCoordinate::new(2, 2)).unwrap();
        let corridor = corridor.as_room().unwrap();
        assert_eq!(corridor.hit_points(), corridor.max_hit_points());
    }

    #[test]
    fn medbay_heals_crew_over_time() {
        let mut vessel = standard_vessel(&[("medbay", 0, 0), ("crew_quarters", 2, 0)]);
        assert_eq!(vessel.stat(VesselStat::HealPerSecond), 5.0);
        vessel.board(CrewMember::new("patient", GridCoordinate::new(2, 0))).unwrap();

        vessel
            .take_attack(30.0, WeaponType::Laser, GridCoordinate::new(2, 0))
            .unwrap();
        assert_eq!(vessel.crew()[0].hit_points(), 70.0);

        vessel.tick(2.0);
        assert_eq!(vessel.crew()[0].hit_points(), 80.0);
        vessel.tick(100.0);
        assert_eq!(vessel.crew()[0].hit_points(), DEFAULT_CREW_HIT_POINTS);
    }

    #[test]
    fn broken_medbay_stops_healing() {
        let mut vessel = standard_vessel(&[("medbay", 0, 0), ("crew_quarters", 2, 0)]);
        vessel.board(CrewMember::new("patient", GridCoordinate::new(0, 0))).unwrap();
        let report = vessel
            .take_attack(95.0, WeaponType::Laser, GridCoordinate::new(0, 0))
            .unwrap();
        assert_eq!(report.module.unwrap().condition, DamageCondition::Breakdown);
        assert_eq!(vessel.stat(VesselStat::HealPerSecond), 0.0);

        vessel.tick(10.0);
        assert_eq!(vessel.crew()[0].hit_points(), 5.0);
    }

    #[test]
    fn repairing_a_room_restores_its_stats() {
        let mut vessel = vessel();
        vessel.shield = ShieldState::full(0.0);
        vessel
            .take_attack(50.0, WeaponType::Laser, GridCoordinate::new(3, 0))
            .unwrap();
        let (engine, _) = vessel.module_at(GridCoordinate::new(3, 0)).unwrap();
        assert!(!vessel.can_warp());

        assert_eq!(vessel.repair_room(engine, 5.0), Some(0.0));
        assert_eq!(vessel.stat(VesselStat::PowerUsing), 0.0);

        let notified = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notified);
        vessel.subscribe(move |_| counter.set(counter.get() + 1));
        assert!(vessel.full_repair_room(engine));
        assert_eq!(notified.get(), 1);
        assert_eq!(vessel.stat(VesselStat::PowerUsing), 5.0);
        assert!(vessel.can_warp());

        assert_eq!(vessel.repair_room(ModuleId::from_raw(99), 5.0), None);
    }

    #[test]
    fn inactive_engine_grounds_the_vessel() {
        let mut vessel = vessel();
        let (engine, _) = vessel.module_at(GridCoordinate::new(3, 0)).unwrap();
        assert!(vessel.set_room_active(engine, false));
        assert_eq!(vessel.stat(VesselStat::PowerUsing), 0.0);
        assert_eq!(vessel.stat(VesselStat::HitPointsMax), 1020.0);
        assert!(!vessel.can_warp());

        assert!(vessel.set_room_active(engine, true));
        assert!(vessel.can_warp());
    }

    #[test]
    fn destruction_is_terminal() {
        let mut vessel = vessel();
        let notified = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notified);
        vessel.subscribe(move |_| counter.set(counter.get() + 1));

        let report = vessel
            .take_attack(5000.0, WeaponType::Laser, GridCoordinate::new(1, 1))
            .unwrap();
        assert!(report.destroyed);
        assert!(report.module.is_none());
        assert!(vessel.is_destroyed());
        assert_eq!(vessel.hit_points(), 0.0);

        let ids: Vec<_> = vessel.modules().map(|(id, _)| id).collect();
        vessel.remove_module(ids[0]);
        assert_eq!(notified.get(), 0);

        let err = vessel
            .take_attack(1.0, WeaponType::Laser, GridCoordinate::new(1, 1))
            .unwrap_err();
        assert_eq!(err.reason(), CannotAttackReason::AlreadyDestroyed);
        let err = vessel
            .board(CrewMember::new("late", GridCoordinate::new(1, 1)))
            .unwrap_err();
        assert_eq!(err.reason(), CannotBoardReason::VesselDestroyed);
    }

    #[test]
    fn rejects_bad_damage() {
        let mut vessel = vessel();
        for &damage in &[-1.0, f32::NAN, f32::INFINITY] {
            let err = vessel
                .take_attack(damage, WeaponType::Laser, GridCoordinate::new(1, 1))
                .unwrap_err();
            assert_eq!(err.reason(), CannotAttackReason::InvalidDamage);
        }
    }

    #[test]
    fn boarding_rules() {
        let mut vessel = vessel();
        let err = vessel
            .board(CrewMember::new("outside", GridCoordinate::new(7, 7)))
            .unwrap_err();
        assert_eq!(err.reason(), CannotBoardReason::NotInRoom);
        assert_eq!(err.into_crew().name(), "outside");

        vessel.board(CrewMember::new("a", GridCoordinate::new(0, 0))).unwrap();
        let err = vessel
            .board(CrewMember::new("b", GridCoordinate::new(0, 0)))
            .unwrap_err();
        assert_eq!(err.reason(), CannotBoardReason::TileTaken);

        for i in 1..10 {
            let tile = if i < 9 {
                GridCoordinate::new(i % 3, i / 3)
            } else {
                GridCoordinate::new(3, 0)
            };
            vessel.board(CrewMember::new(format!("c{}", i), tile)).unwrap();
        }
        assert_eq!(vessel.crew().len(), 10);
        let err = vessel
            .board(CrewMember::new("extra", GridCoordinate::new(3, 1)))
            .unwrap_err();
        assert_eq!(err.reason(), CannotBoardReason::CapacityReached);

        assert!(vessel.remove_crew("c5").is_some());
        assert_eq!(
            vessel.stat(VesselStat::OxygenUsingPerSecond),
            9.0 * OXYGEN_USE_PER_CREW
        );
    }

    #[test]
    fn hull_tier_adds_damage_reduction() {
        let mut vessel = vessel();
        assert_eq!(vessel.stat(VesselStat::DamageReduction), 10.0);
        vessel.set_hull_tier(HullTier::new(2));
        assert_eq!(vessel.stat(VesselStat::DamageReduction), 10.0);
        let (bunker, _) = vessel.modules().next().unwrap();
        vessel.remove_module(bunker);
        assert_eq!(vessel.stat(VesselStat::DamageReduction), 10.0);
        assert_eq!(vessel.contribution_trace().last().unwrap().source, "outer hull");
    }
}
