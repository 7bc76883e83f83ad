use serde::{Deserialize, Serialize};

/// Every collectible or purchasable ability in the game.
///
/// Declaration order is the canonical iteration order used by the spawn
/// table, so reordering variants changes seeded draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    SpeedBoost,
    Shield,
    ShopShield,
    ExtraLife,
    Shrink,
    Ghost,
    Multiplier,
    DoubleTime,
    Missile,
    SidewinderMissile,
}

/// Number of [`PowerUpKind`] variants.
pub const KIND_COUNT: usize = 10;

impl PowerUpKind {
    /// All kinds in canonical order.
    pub const ALL: [PowerUpKind; KIND_COUNT] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::Shield,
        PowerUpKind::ShopShield,
        PowerUpKind::ExtraLife,
        PowerUpKind::Shrink,
        PowerUpKind::Ghost,
        PowerUpKind::Multiplier,
        PowerUpKind::DoubleTime,
        PowerUpKind::Missile,
        PowerUpKind::SidewinderMissile,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "Speed Boost",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::ShopShield => "Shop Shield",
            PowerUpKind::ExtraLife => "Extra Life",
            PowerUpKind::Shrink => "Shrink",
            PowerUpKind::Ghost => "Ghost",
            PowerUpKind::Multiplier => "2x Score",
            PowerUpKind::DoubleTime => "Double Time",
            PowerUpKind::Missile => "Missile",
            PowerUpKind::SidewinderMissile => "Sidewinder",
        }
    }

    /// Whether both kinds occupy the single shield slot.
    pub fn is_shield(&self) -> bool {
        matches!(self, PowerUpKind::Shield | PowerUpKind::ShopShield)
    }
}

impl std::fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
