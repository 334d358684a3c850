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
//! Limits and combination rules for vessel stats.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::stats::{CombinationRule, VesselStat};

fn default_min() -> f32 {
    0.0
}

fn default_max() -> f32 {
    f32::MAX
}

/// How a single stat channel is combined and bounded.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSettings {
    /// How contributions combine into the running value.
    pub rule: CombinationRule,
    /// Value the channel starts from before any contribution is applied.
    pub baseline: f32,
    /// Lower clamp. When unset, the settings-wide default minimum applies.
    pub min: Option<f32>,
    /// Upper clamp. When unset, the settings-wide default maximum applies.
    pub max: Option<f32>,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            rule: CombinationRule::Additive,
            baseline: 0.0,
            min: None,
            max: None,
        }
    }
}

/// Per-stat combination rules, baselines and clamp bounds.
///
/// Stats with no entry are additive from a baseline of 0 and are clamped to
/// `[default_min, default_max]`, which is `[0, f32::MAX]` unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSettings {
    #[serde(default)]
    channels: BTreeMap<VesselStat, ChannelSettings>,
    #[serde(default = "default_min")]
    default_min: f32,
    #[serde(default = "default_max")]
    default_max: f32,
}

impl StatSettings {
    /// Settings with no per-stat entries: every stat is additive from 0 and only floored
    /// at 0.
    pub fn unbounded() -> Self {
        Self {
            channels: BTreeMap::new(),
            default_min: default_min(),
            default_max: default_max(),
        }
    }

    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get the settings for a single channel.
    pub fn channel(&self, stat: VesselStat) -> ChannelSettings {
        self.channels.get(&stat).copied().unwrap_or_default()
    }

    /// Combination rule for the given stat.
    pub fn rule(&self, stat: VesselStat) -> CombinationRule {
        self.channel(stat).rule
    }

    /// Starting value for the given stat.
    pub fn baseline(&self, stat: VesselStat) -> f32 {
        self.channel(stat).baseline
    }

    /// Lowest value the stat may take.
    pub fn min_value(&self, stat: VesselStat) -> f32 {
        self.channel(stat).min.unwrap_or(self.default_min)
    }

    /// Highest value the stat may take.
    pub fn max_value(&self, stat: VesselStat) -> f32 {
        self.channel(stat).max.unwrap_or(self.default_max)
    }

    /// Clamp a value into the bounds configured for the stat.
    pub fn clamp(&self, stat: VesselStat, value: f32) -> f32 {
        value.max(self.min_value(stat)).min(self.max_value(stat))
    }

    /// Override the combination rule of a stat.
    pub fn with_rule(mut self, stat: VesselStat, rule: CombinationRule) -> Self {
        self.channels.entry(stat).or_default().rule = rule;
        self
    }

    /// Override the baseline of a stat.
    pub fn with_baseline(mut self, stat: VesselStat, baseline: f32) -> Self {
        self.channels.entry(stat).or_default().baseline = baseline;
        self
    }

    /// Override the clamp bounds of a stat.
    pub fn with_limits(mut self, stat: VesselStat, min: Option<f32>, max: Option<f32>) -> Self {
        let channel = self.channels.entry(stat).or_default();
        channel.min = min;
        channel.max = max;
        self
    }
}

impl Default for StatSettings {
    fn default() -> Self {
        use VesselStat::*;

        let capped = [
            (DodgeChance, 70.0),
            (HitPointsMax, 10_000.0),
            (FuelEfficiency, 30.0),
            (ShieldMaxAmount, 250.0),
            (OxygenGeneratePerSecond, 100.0),
            (OxygenUsingPerSecond, 100.0),
            (ShieldRegeneratePerSecond, 250.0),
            (DamageReduction, 10.0),
            (Accuracy, 150.0),
            (ReloadTimeBonus, 150.0),
            (DamageBonus, 150.0),
        ];
        capped
            .iter()
            .fold(Self::unbounded(), |settings, &(stat, max)| {
                settings.with_limits(stat, None, Some(max))
            })
            .with_limits(FuelConsumption, Some(5.0), Some(10.0))
            .with_limits(ShieldRespawnTime, Some(12.0), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_minimum_floors_at_zero() {
        let settings = StatSettings::default();
        assert_eq!(settings.clamp(VesselStat::PowerCapacity, -20.0), 0.0);
        assert_eq!(settings.clamp(VesselStat::PowerCapacity, 1e9), 1e9);
    }

    #[test]
    fn configured_bounds_apply() {
        let settings = StatSettings::default();
        assert_eq!(settings.clamp(VesselStat::DodgeChance, 95.0), 70.0);
        assert_eq!(settings.clamp(VesselStat::FuelConsumption, 1.0), 5.0);
        assert_eq!(settings.clamp(VesselStat::FuelConsumption, 12.0), 10.0);
        assert_eq!(settings.clamp(VesselStat::ShieldRespawnTime, 3.0), 12.0);
        assert_eq!(settings.clamp(VesselStat::DamageReduction, 10.0), 10.0);
    }

    #[test]
    fn parses_partial_json() {
        let settings = StatSettings::from_json(
            r#"{ "channels": { "Accuracy": { "rule": "Multiplicative", "baseline": 100.0 } } }"#,
        )
        .unwrap();
        assert_eq!(settings.rule(VesselStat::Accuracy), CombinationRule::Multiplicative);
        assert_eq!(settings.baseline(VesselStat::Accuracy), 100.0);
        assert_eq!(settings.max_value(VesselStat::Accuracy), f32::MAX);
        assert_eq!(settings.rule(VesselStat::DodgeChance), CombinationRule::Additive);
    }
}
