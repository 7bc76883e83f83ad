//! Power-up and transient-effect engine.
//!
//! [`PowerUpEngine`] is the entry point: the host calls
//! [`apply_power_up`](PowerUpEngine::apply_power_up) on pickups,
//! [`shield_hit`](PowerUpEngine::shield_hit) on obstacle contact,
//! [`tick`](PowerUpEngine::tick) every frame and
//! [`reset_all`](PowerUpEngine::reset_all) at run end.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod movement;
pub mod multiplier;
pub mod projectile;
pub mod selector;
pub mod shield;
pub mod shrink;

pub use catalog::{EffectCatalog, EffectDefinition, ExclusionClass, Lifetime};
pub use config::PowerUpConfig;
pub use engine::{EngineState, PowerUpEngine};
pub use shield::{ShieldHit, ShieldSlot};
