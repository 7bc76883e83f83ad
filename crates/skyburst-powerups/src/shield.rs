use serde::{Deserialize, Serialize};

use skyburst_core::powerup::PowerUpKind;

/// The single shield slot. A timed shield absorbs any number of hits until its
/// timer runs out; a counted shield has no timer and breaks on its last hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldSlot {
    #[default]
    Empty,
    Timed,
    Counted { remaining_hits: u32 },
}

/// Outcome of the player touching an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldHit {
    /// No shield; the caller applies normal damage.
    NotAbsorbed,
    Absorbed,
    /// The last hit of a counted shield. The slot is now empty.
    AbsorbedAndBroken,
}

impl ShieldSlot {
    pub fn is_up(&self) -> bool {
        !matches!(self, ShieldSlot::Empty)
    }

    /// Which power-up currently occupies the slot.
    pub fn kind(&self) -> Option<PowerUpKind> {
        match self {
            ShieldSlot::Empty => None,
            ShieldSlot::Timed => Some(PowerUpKind::Shield),
            ShieldSlot::Counted { .. } => Some(PowerUpKind::ShopShield),
        }
    }

    pub fn remaining_hits(&self) -> Option<u32> {
        match self {
            ShieldSlot::Counted { remaining_hits } => Some(*remaining_hits),
            _ => None,
        }
    }

    pub fn raise_timed(&mut self) -> bool {
        if self.is_up() {
            return false;
        }
        *self = ShieldSlot::Timed;
        true
    }

    pub fn raise_counted(&mut self, hits: u32) -> bool {
        if self.is_up() {
            return false;
        }
        *self = ShieldSlot::Counted {
            remaining_hits: hits.max(1),
        };
        true
    }

    pub fn hit(&mut self) -> ShieldHit {
        match self {
            ShieldSlot::Empty => ShieldHit::NotAbsorbed,
            ShieldSlot::Timed => ShieldHit::Absorbed,
            ShieldSlot::Counted { remaining_hits } => {
                *remaining_hits = remaining_hits.saturating_sub(1);
                if *remaining_hits == 0 {
                    *self = ShieldSlot::Empty;
                    ShieldHit::AbsorbedAndBroken
                } else {
                    ShieldHit::Absorbed
                }
            },
        }
    }

    /// Empty the slot, returning the kind that was up.
    pub fn lower(&mut self) -> Option<PowerUpKind> {
        let kind = self.kind();
        *self = ShieldSlot::Empty;
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_does_not_absorb() {
        let mut slot = ShieldSlot::default();
        assert_eq!(slot.hit(), ShieldHit::NotAbsorbed);
        assert_eq!(slot, ShieldSlot::Empty);
    }

    #[test]
    fn timed_shield_absorbs_without_limit() {
        let mut slot = ShieldSlot::Empty;
        assert!(slot.raise_timed());
        for _ in 0..50 {
            assert_eq!(slot.hit(), ShieldHit::Absorbed);
        }
        assert_eq!(slot.kind(), Some(PowerUpKind::Shield));
    }

    #[test]
    fn counted_shield_breaks_on_third_hit() {
        let mut slot = ShieldSlot::Empty;
        assert!(slot.raise_counted(3));
        assert_eq!(slot.hit(), ShieldHit::Absorbed);
        assert_eq!(slot.remaining_hits(), Some(2));
        assert_eq!(slot.hit(), ShieldHit::Absorbed);
        assert_eq!(slot.hit(), ShieldHit::AbsorbedAndBroken);
        assert_eq!(slot, ShieldSlot::Empty);
        assert_eq!(slot.hit(), ShieldHit::NotAbsorbed);
    }

    #[test]
    fn occupied_slot_rejects_either_variant() {
        let mut slot = ShieldSlot::Empty;
        assert!(slot.raise_counted(3));
        assert!(!slot.raise_timed());
        assert!(!slot.raise_counted(3));
        assert_eq!(slot.remaining_hits(), Some(3));

        let mut slot = ShieldSlot::Empty;
        assert!(slot.raise_timed());
        assert!(!slot.raise_counted(3));
        assert_eq!(slot, ShieldSlot::Timed);
    }

    #[test]
    fn lower_reports_previous_kind() {
        let mut slot = ShieldSlot::Counted { remaining_hits: 2 };
        assert_eq!(slot.lower(), Some(PowerUpKind::ShopShield));
        assert_eq!(slot.lower(), None);
    }

    #[test]
    fn zero_hit_counted_shield_still_absorbs_once() {
        let mut slot = ShieldSlot::Empty;
        slot.raise_counted(0);
        assert_eq!(slot.hit(), ShieldHit::AbsorbedAndBroken);
    }
}
