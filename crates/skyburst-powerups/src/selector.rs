use rand::Rng;

use skyburst_core::powerup::PowerUpKind;

use crate::catalog::EffectCatalog;

/// Kinds the mystery grant can never hand out: shop-exclusive or already
/// persistent across runs.
pub const MYSTERY_EXCLUDED: [PowerUpKind; 3] = [
    PowerUpKind::DoubleTime,
    PowerUpKind::ExtraLife,
    PowerUpKind::ShopShield,
];

/// Ordered weighted table. Order matters: a roll is resolved by walking the
/// entries front to back.
#[derive(Debug, Clone)]
pub struct WeightedTable<K> {
    entries: Vec<(K, u32)>,
}

impl<K: Copy> WeightedTable<K> {
    pub fn new(entries: Vec<(K, u32)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(K, u32)] {
        &self.entries
    }

    /// Sum of all weights, widened so large configured weights cannot overflow.
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |sum, (_, w)| sum.saturating_add(u64::from(*w)))
    }

    /// Resolve a roll in `[1, total]`: subtract each weight in order and return
    /// the first entry that brings the roll to zero or below. A roll equal to a
    /// cumulative boundary lands on the earlier entry. Out-of-range rolls give
    /// `None`.
    pub fn select(&self, roll: u64) -> Option<K> {
        if roll == 0 || roll > self.total() {
            return None;
        }
        let mut remaining = roll;
        for &(kind, weight) in &self.entries {
            let weight = u64::from(weight);
            if remaining <= weight {
                return Some(kind);
            }
            remaining -= weight;
        }
        None
    }

    /// Uniform roll over `[1, total]`. `None` when every weight is zero.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<K> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        self.select(rng.random_range(1..=total))
    }
}

/// Weighted draw over the catalog for a power-up spawned in the world.
pub fn pick_environmental_drop<R: Rng + ?Sized>(
    catalog: &EffectCatalog,
    rng: &mut R,
    fallback: PowerUpKind,
) -> PowerUpKind {
    catalog.spawn_table().draw(rng).unwrap_or_else(|| {
        tracing::warn!(%fallback, "Spawn table has no weight, using fallback drop");
        fallback
    })
}

/// Kinds eligible for the mystery grant, in canonical order.
pub fn mystery_candidates() -> Vec<PowerUpKind> {
    PowerUpKind::ALL
        .into_iter()
        .filter(|k| !MYSTERY_EXCLUDED.contains(k))
        .collect()
}

/// Uniform draw over every kind outside [`MYSTERY_EXCLUDED`].
pub fn pick_mystery_grant<R: Rng + ?Sized>(rng: &mut R) -> PowerUpKind {
    let candidates = mystery_candidates();
    candidates[rng.random_range(0..candidates.len())]
}
