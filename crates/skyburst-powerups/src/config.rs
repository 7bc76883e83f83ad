use std::time::Duration;

use serde::{Deserialize, Serialize};

use skyburst_core::powerup::PowerUpKind;

/// Base lifetimes (seconds) of the timed effects, before double time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    pub speed_boost_secs: f32,
    pub shield_secs: f32,
    pub shrink_secs: f32,
    pub ghost_secs: f32,
    pub multiplier_secs: f32,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            speed_boost_secs: 5.0,
            shield_secs: 8.0,
            shrink_secs: 8.0,
            ghost_secs: 5.0,
            multiplier_secs: 10.0,
        }
    }
}

/// Environmental spawn weights. Zero means "never spawned in the world".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub speed_boost: u32,
    pub shield: u32,
    pub shop_shield: u32,
    pub extra_life: u32,
    pub shrink: u32,
    pub ghost: u32,
    pub multiplier: u32,
    pub double_time: u32,
    pub missile: u32,
    pub sidewinder_missile: u32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            speed_boost: 20,
            shield: 15,
            shop_shield: 0,
            extra_life: 5,
            shrink: 12,
            ghost: 10,
            multiplier: 15,
            double_time: 0,
            missile: 10,
            sidewinder_missile: 8,
        }
    }
}

impl WeightConfig {
    pub fn weight(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::SpeedBoost => self.speed_boost,
            PowerUpKind::Shield => self.shield,
            PowerUpKind::ShopShield => self.shop_shield,
            PowerUpKind::ExtraLife => self.extra_life,
            PowerUpKind::Shrink => self.shrink,
            PowerUpKind::Ghost => self.ghost,
            PowerUpKind::Multiplier => self.multiplier,
            PowerUpKind::DoubleTime => self.double_time,
            PowerUpKind::Missile => self.missile,
            PowerUpKind::SidewinderMissile => self.sidewinder_missile,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrinkConfig {
    /// Scale applied to footprint and collision body (0.7 = 70%).
    pub scale: f32,
    /// Maximum obstacles affected by one activation.
    pub max_targets: usize,
    /// Seconds collision stays suspended while an obstacle grows back.
    pub restore_transition_secs: f32,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self {
            scale: 0.7,
            max_targets: 3,
            restore_transition_secs: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Straight missile speed (units/s).
    pub missile_speed: f32,
    /// Hit radius shared by both missile kinds.
    pub missile_radius: f32,
    /// Sidewinder speed along its curve (units/s).
    pub sidewinder_speed: f32,
    /// Perpendicular offset of the curve's control point from the chord midpoint.
    pub sidewinder_arc_height: f32,
    /// Rounds added to the counter when a missile pickup is collected.
    pub pickup_amount: u32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            missile_speed: 600.0,
            missile_radius: 6.0,
            sidewinder_speed: 450.0,
            sidewinder_arc_height: 120.0,
            pickup_amount: 1,
        }
    }
}

/// Data-driven tuning for the power-up engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub durations: DurationConfig,
    pub weights: WeightConfig,
    /// Hits a shop shield absorbs before breaking.
    pub shop_shield_hits: u32,
    /// World simulation speed multiplier while speed boost is active.
    pub speed_boost_factor: f32,
    /// Score multiplier while the multiplier effect is active.
    pub score_multiplier: u32,
    pub shrink: ShrinkConfig,
    pub projectiles: ProjectileConfig,
    /// Returned by the environmental draw if every weight is zero.
    pub fallback_drop: PowerUpKind,
    /// Fixed RNG seed for reproducible runs. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            durations: DurationConfig::default(),
            weights: WeightConfig::default(),
            shop_shield_hits: 3,
            speed_boost_factor: 2.0,
            score_multiplier: 2,
            shrink: ShrinkConfig::default(),
            projectiles: ProjectileConfig::default(),
            fallback_drop: PowerUpKind::SpeedBoost,
            rng_seed: None,
        }
    }
}

impl PowerUpConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("SKYBURST_POWERUPS_CONFIG")
            .unwrap_or_else(|_| "config/powerups.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                PowerUpConfig::default()
            }),
            Err(_) => PowerUpConfig::default(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn shrink_transition(&self) -> Duration {
        seconds(self.shrink.restore_transition_secs)
    }
}

/// Seconds to `Duration`. Negative and NaN values are zero; values too large
/// to represent saturate.
pub(crate) fn seconds(secs: f32) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::MAX)
}
