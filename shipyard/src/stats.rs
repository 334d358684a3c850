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
//! Vessel-wide stats and the engine that aggregates them.
//!
//! Stats are never authored directly. Every structural change recomputes the whole sheet
//! from the contributions of each committed module and crew member, then clamps each
//! channel to its configured bounds. The contributions that went into the last
//! recompute are kept as a trace for diagnostics.

use std::{collections::BTreeMap, fmt};

use log::debug;
use serde::{Deserialize, Serialize};

pub use self::settings::{ChannelSettings, StatSettings};

mod settings;

/// A named numeric channel aggregated over the whole vessel.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum VesselStat {
    /// Chance to evade an incoming shot, in percent.
    DodgeChance,
    /// Maximum structural hit points.
    HitPointsMax,
    /// Fuel saved per warp, in percent.
    FuelEfficiency,
    /// Fuel spent per warp.
    FuelConsumption,
    /// Shield capacity.
    ShieldMaxAmount,
    /// Oxygen produced per second.
    OxygenGeneratePerSecond,
    /// Oxygen consumed per second.
    OxygenUsingPerSecond,
    /// Power drawn by modules.
    PowerUsing,
    /// Power available to modules.
    PowerCapacity,
    /// Seconds before a broken shield comes back.
    ShieldRespawnTime,
    /// Shield restored per second while it is up.
    ShieldRegeneratePerSecond,
    /// Crew hit points healed per second.
    HealPerSecond,
    /// Number of crew the vessel can carry.
    CrewCapacity,
    /// Flat reduction of incoming damage, in percent.
    DamageReduction,
    /// Weapon accuracy, in percent.
    Accuracy,
    /// Weapon reload bonus, in percent.
    ReloadTimeBonus,
    /// Weapon damage bonus, in percent.
    DamageBonus,
    /// Morale bonus applied to every crew member.
    CrewMoraleBonus,
}

impl VesselStat {
    /// Every stat channel.
    pub const ALL: [VesselStat; 18] = [
        VesselStat::DodgeChance,
        VesselStat::HitPointsMax,
        VesselStat::FuelEfficiency,
        VesselStat::FuelConsumption,
        VesselStat::ShieldMaxAmount,
        VesselStat::OxygenGeneratePerSecond,
        VesselStat::OxygenUsingPerSecond,
        VesselStat::PowerUsing,
        VesselStat::PowerCapacity,
        VesselStat::ShieldRespawnTime,
        VesselStat::ShieldRegeneratePerSecond,
        VesselStat::HealPerSecond,
        VesselStat::CrewCapacity,
        VesselStat::DamageReduction,
        VesselStat::Accuracy,
        VesselStat::ReloadTimeBonus,
        VesselStat::DamageBonus,
        VesselStat::CrewMoraleBonus,
    ];

    /// Whether crew contributions to this stat are folded into the aggregate. Only
    /// oxygen use is crew-sourced.
    pub fn is_crew_sourced(self) -> bool {
        self == VesselStat::OxygenUsingPerSecond
    }
}

/// How a contribution combines with the running value of its stat.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CombinationRule {
    /// `running + delta`.
    Additive,
    /// `running * (1 + delta / 100)`, treating the delta as a percentage.
    Multiplicative,
}

impl CombinationRule {
    /// Apply a contribution to a running value.
    pub fn apply(self, running: f32, delta: f32) -> f32 {
        match self {
            CombinationRule::Additive => running + delta,
            CombinationRule::Multiplicative => running * (1.0 + delta / 100.0),
        }
    }
}

impl Default for CombinationRule {
    fn default() -> Self {
        CombinationRule::Additive
    }
}

/// Deltas contributed by a single source, keyed by stat.
pub type StatContributions = BTreeMap<VesselStat, f32>;

/// The contributions of one named source, as applied in a recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    /// Name of the module or crew member that contributed.
    pub source: String,
    /// The deltas that were applied.
    pub values: StatContributions,
}

impl Contribution {
    /// Construct a contribution from a source name and its deltas.
    pub fn new(source: impl Into<String>, values: StatContributions) -> Self {
        Self {
            source: source.into(),
            values,
        }
    }
}

/// The derived value of every stat channel.
#[derive(Debug, Clone, PartialEq)]
pub struct StatSheet {
    values: BTreeMap<VesselStat, f32>,
}

impl StatSheet {
    /// A sheet with every stat at its baseline and clamped.
    pub fn baseline(settings: &StatSettings) -> Self {
        Self {
            values: VesselStat::ALL
                .iter()
                .map(|&stat| (stat, settings.clamp(stat, settings.baseline(stat))))
                .collect(),
        }
    }

    /// Get the value of a stat.
    pub fn get(&self, stat: VesselStat) -> f32 {
        self.values.get(&stat).copied().unwrap_or(0.0)
    }

    /// Iterate every stat and its value in channel order.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (VesselStat, f32)> {
        self.values.iter().map(|(&stat, &value)| (stat, value))
    }
}

/// Run a full aggregation pass.
///
/// Every stat starts from its baseline. Module contributions are applied in order under
/// each stat's combination rule, then only the crew-sourced part of each crew
/// contribution. Finally every stat is clamped. Returns the sheet and the trace of what
/// was applied, in application order.
pub fn aggregate<'a, M, C>(
    settings: &StatSettings,
    modules: M,
    crew: C,
) -> (StatSheet, Vec<Contribution>)
where
    M: IntoIterator<Item = &'a Contribution>,
    C: IntoIterator<Item = &'a Contribution>,
{
    let mut running: BTreeMap<VesselStat, f32> = VesselStat::ALL
        .iter()
        .map(|&stat| (stat, settings.baseline(stat)))
        .collect();
    let mut trace = Vec::new();

    let mut apply = |contribution: Contribution| {
        for (&stat, &delta) in &contribution.values {
            let value = running.entry(stat).or_insert(0.0);
            *value = settings.rule(stat).apply(*value, delta);
        }
        trace.push(contribution);
    };

    for module in modules {
        apply(module.clone());
    }
    for member in crew {
        let values = member
            .values
            .iter()
            .filter(|(stat, _)| stat.is_crew_sourced())
            .map(|(&stat, &delta)| (stat, delta))
            .collect();
        apply(Contribution::new(member.source.clone(), values));
    }

    let values = running
        .into_iter()
        .map(|(stat, value)| (stat, settings.clamp(stat, value)))
        .collect();
    (StatSheet { values }, trace)
}

/// Listener notified after each completed recompute.
pub type StatListener = Box<dyn FnMut(&StatSheet)>;

/// Holds the current stat sheet of a vessel or blueprint and recomputes it on demand.
pub struct StatEngine {
    settings: StatSettings,
    sheet: StatSheet,
    trace: Vec<Contribution>,
    listeners: Vec<StatListener>,
}

impl StatEngine {
    /// Construct an engine whose sheet starts at baseline.
    pub fn new(settings: StatSettings) -> Self {
        Self {
            sheet: StatSheet::baseline(&settings),
            settings,
            trace: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// The settings used for combination and clamping.
    pub fn settings(&self) -> &StatSettings {
        &self.settings
    }

    /// The sheet from the most recent recompute.
    pub fn sheet(&self) -> &StatSheet {
        &self.sheet
    }

    /// Value of a single stat from the most recent recompute.
    pub fn get(&self, stat: VesselStat) -> f32 {
        self.sheet.get(stat)
    }

    /// The contributions applied in the most recent recompute.
    pub fn trace(&self) -> &[Contribution] {
        &self.trace
    }

    /// Register a listener called once after every recompute.
    pub fn subscribe(&mut self, listener: impl FnMut(&StatSheet) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Throw away the current sheet and rebuild it from scratch, then notify listeners
    /// once.
    pub fn recompute<'a, M, C>(&mut self, modules: M, crew: C) -> &StatSheet
    where
        M: IntoIterator<Item = &'a Contribution>,
        C: IntoIterator<Item = &'a Contribution>,
    {
        let (sheet, trace) = aggregate(&self.settings, modules, crew);
        debug!("recomputed stats from {} sources", trace.len());
        self.sheet = sheet;
        self.trace = trace;
        for listener in &mut self.listeners {
            listener(&self.sheet);
        }
        &self.sheet
    }
}

impl fmt::Debug for StatEngine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StatEngine")
            .field("settings", &self.settings)
            .field("sheet", &self.sheet)
            .field("trace", &self.trace)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
