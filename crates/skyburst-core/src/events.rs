use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::powerup::PowerUpKind;

/// Notifications published by the effect engine for audio/visual collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    #[serde(rename = "speed_boost.started")]
    SpeedBoostStarted,
    #[serde(rename = "speed_boost.ended")]
    SpeedBoostEnded,
    #[serde(rename = "shield.broken")]
    ShieldBroken,
    #[serde(rename = "explosion")]
    ExplosionAt { position: Vec2 },
    #[serde(rename = "effect.started")]
    EffectStarted { kind: PowerUpKind },
    #[serde(rename = "effect.ended")]
    EffectEnded { kind: PowerUpKind },
}

/// Outbox of engine notifications, drained by the host once per frame.
#[derive(Debug, Default)]
pub struct NotificationBus {
    pending: Vec<EngineEvent>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: EngineEvent) {
        tracing::trace!(?event, "Engine notification");
        self.pending.push(event);
    }

    /// Take every pending notification in publish order.
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending)
    }
}
