use std::time::Duration;

use skyburst_core::powerup::{KIND_COUNT, PowerUpKind};

use crate::config::{PowerUpConfig, seconds};
use crate::selector::WeightedTable;

/// How an effect's lifetime is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Expires automatically after the base duration (doubled under double time).
    Timed(Duration),
    /// Lasts until it has absorbed this many hits. No timer.
    HitCountBounded(u32),
    /// Survives across runs until consumed or toggled off.
    Persistent,
    /// Consumable stock, spent one unit per use.
    CountBased,
}

/// Which other kinds an effect cannot coexist with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionClass {
    /// Only blocks re-activation of the same kind.
    SelfOnly,
    /// Shares the single shield slot with the other shield kind.
    ShieldSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectDefinition {
    pub kind: PowerUpKind,
    pub lifetime: Lifetime,
    pub rarity_weight: u32,
    pub exclusion: ExclusionClass,
}

/// Immutable per-kind table, indexed in canonical order.
#[derive(Debug, Clone)]
pub struct EffectCatalog {
    definitions: [EffectDefinition; KIND_COUNT],
}

impl EffectCatalog {
    pub fn from_config(config: &PowerUpConfig) -> Self {
        let d = &config.durations;
        let definitions = PowerUpKind::ALL.map(|kind| {
            let lifetime = match kind {
                PowerUpKind::SpeedBoost => Lifetime::Timed(seconds(d.speed_boost_secs)),
                PowerUpKind::Shield => Lifetime::Timed(seconds(d.shield_secs)),
                PowerUpKind::ShopShield => {
                    Lifetime::HitCountBounded(config.shop_shield_hits.max(1))
                },
                PowerUpKind::ExtraLife | PowerUpKind::DoubleTime => Lifetime::Persistent,
                PowerUpKind::Shrink => Lifetime::Timed(seconds(d.shrink_secs)),
                PowerUpKind::Ghost => Lifetime::Timed(seconds(d.ghost_secs)),
                PowerUpKind::Multiplier => Lifetime::Timed(seconds(d.multiplier_secs)),
                PowerUpKind::Missile | PowerUpKind::SidewinderMissile => Lifetime::CountBased,
            };
            let exclusion = if kind.is_shield() {
                ExclusionClass::ShieldSlot
            } else {
                ExclusionClass::SelfOnly
            };
            EffectDefinition {
                kind,
                lifetime,
                rarity_weight: config.weights.weight(kind),
                exclusion,
            }
        });
        Self { definitions }
    }

    pub fn get(&self, kind: PowerUpKind) -> &EffectDefinition {
        &self.definitions[kind as usize]
    }

    /// Definitions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.definitions.iter()
    }

    /// Base duration for `Timed` kinds, `None` for every other lifetime.
    pub fn base_duration(&self, kind: PowerUpKind) -> Option<Duration> {
        match self.get(kind).lifetime {
            Lifetime::Timed(base) => Some(base),
            _ => None,
        }
    }

    /// Hit budget for `HitCountBounded` kinds, `None` for every other lifetime.
    pub fn hit_budget(&self, kind: PowerUpKind) -> Option<u32> {
        match self.get(kind).lifetime {
            Lifetime::HitCountBounded(hits) => Some(hits),
            _ => None,
        }
    }

    pub fn is_timed(&self, kind: PowerUpKind) -> bool {
        self.base_duration(kind).is_some()
    }

    /// Whether `a` being active blocks activating `b`.
    pub fn conflicts(&self, a: PowerUpKind, b: PowerUpKind) -> bool {
        a == b
            || (self.get(a).exclusion == ExclusionClass::ShieldSlot
                && self.get(b).exclusion == ExclusionClass::ShieldSlot)
    }

    /// Environmental spawn table over every kind, zero weights included.
    pub fn spawn_table(&self) -> WeightedTable<PowerUpKind> {
        WeightedTable::new(self.iter().map(|d| (d.kind, d.rarity_weight)).collect())
    }
}

impl Default for EffectCatalog {
    fn default() -> Self {
        Self::from_config(&PowerUpConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_are_indexed_by_kind() {
        let catalog = EffectCatalog::default();
        for kind in PowerUpKind::ALL {
            assert_eq!(catalog.get(kind).kind, kind);
        }
    }

    #[test]
    fn default_lifetimes() {
        let catalog = EffectCatalog::default();
        assert_eq!(
            catalog.get(PowerUpKind::SpeedBoost).lifetime,
            Lifetime::Timed(Duration::from_secs(5))
        );
        assert_eq!(
            catalog.get(PowerUpKind::Ghost).lifetime,
            Lifetime::Timed(Duration::from_secs(5))
        );
        assert_eq!(
            catalog.get(PowerUpKind::ShopShield).lifetime,
            Lifetime::HitCountBounded(3)
        );
        assert_eq!(catalog.get(PowerUpKind::DoubleTime).lifetime, Lifetime::Persistent);
        assert_eq!(catalog.get(PowerUpKind::ExtraLife).lifetime, Lifetime::Persistent);
        assert_eq!(catalog.get(PowerUpKind::Missile).lifetime, Lifetime::CountBased);
        assert_eq!(
            catalog.get(PowerUpKind::SidewinderMissile).lifetime,
            Lifetime::CountBased
        );
    }

    #[test]
    fn exactly_five_timed_kinds() {
        let catalog = EffectCatalog::default();
        let timed: Vec<_> = PowerUpKind::ALL
            .into_iter()
            .filter(|k| catalog.is_timed(*k))
            .collect();
        assert_eq!(
            timed,
            vec![
                PowerUpKind::SpeedBoost,
                PowerUpKind::Shield,
                PowerUpKind::Shrink,
                PowerUpKind::Ghost,
                PowerUpKind::Multiplier,
            ]
        );
    }

    #[test]
    fn shields_conflict_but_movement_effects_do_not() {
        let catalog = EffectCatalog::default();
        assert!(catalog.conflicts(PowerUpKind::Shield, PowerUpKind::ShopShield));
        assert!(catalog.conflicts(PowerUpKind::ShopShield, PowerUpKind::Shield));
        assert!(catalog.conflicts(PowerUpKind::Ghost, PowerUpKind::Ghost));
        assert!(!catalog.conflicts(PowerUpKind::SpeedBoost, PowerUpKind::Ghost));
    }

    #[test]
    fn zero_hit_shop_shield_is_clamped() {
        let config = PowerUpConfig {
            shop_shield_hits: 0,
            ..PowerUpConfig::default()
        };
        let catalog = EffectCatalog::from_config(&config);
        assert_eq!(
            catalog.get(PowerUpKind::ShopShield).lifetime,
            Lifetime::HitCountBounded(1)
        );
        assert_eq!(catalog.hit_budget(PowerUpKind::ShopShield), Some(1));
        assert_eq!(catalog.hit_budget(PowerUpKind::Shield), None);
    }

    #[test]
    fn spawn_table_follows_canonical_order() {
        let table = EffectCatalog::default().spawn_table();
        let kinds: Vec<_> = table.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, PowerUpKind::ALL.to_vec());
        assert_eq!(table.total(), 95);
    }
}
