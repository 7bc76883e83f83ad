use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use skyburst_core::events::{EngineEvent, NotificationBus};
use skyburst_core::powerup::PowerUpKind;
use skyburst_core::storage::{CounterStore, Counters};
use skyburst_core::world::World;

use crate::catalog::EffectCatalog;
use crate::clock::EffectClock;
use crate::config::{PowerUpConfig, seconds};
use crate::movement::MovementEffects;
use crate::multiplier::ScoreMultiplier;
use crate::projectile::{Projectile, ProjectileSystem};
use crate::selector;
use crate::shield::{ShieldHit, ShieldSlot};
use crate::shrink::ShrinkField;

/// Read-only view of the engine for HUDs and save-game inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Running timed effects with their remaining time, in canonical order.
    pub active_timed: Vec<(PowerUpKind, Duration)>,
    pub shield: ShieldSlot,
    pub double_time_active: bool,
    pub score_multiplier: u32,
    pub has_extra_life: bool,
    pub missile_count: u32,
    pub sidewinder_count: u32,
}

/// How a timed effect is being turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shutdown {
    /// Normal expiry or explicit deactivation.
    Graceful,
    /// End of run: no follow-up transitions.
    Immediate,
}

/// Owns every active effect for one game session.
///
/// The host passes the world into each call; the engine never holds onto it.
/// Count-based and persistent fields are loaded from the store on construction
/// and written back after every change. Storage failures are logged and do not
/// interrupt play.
pub struct PowerUpEngine {
    config: PowerUpConfig,
    catalog: EffectCatalog,
    clock: EffectClock,
    shield: ShieldSlot,
    double_time: bool,
    multiplier: ScoreMultiplier,
    has_extra_life: bool,
    missile_count: u32,
    sidewinder_count: u32,
    movement: MovementEffects,
    shrink: ShrinkField,
    projectiles: ProjectileSystem,
    events: NotificationBus,
    store: Box<dyn CounterStore>,
    rng: StdRng,
}

impl std::fmt::Debug for PowerUpEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerUpEngine")
            .field("now", &self.clock.now())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl PowerUpEngine {
    pub fn new(config: PowerUpConfig, store: Box<dyn CounterStore>) -> Self {
        let counters = match store.load() {
            Ok(counters) => counters,
            Err(e) => {
                tracing::warn!("Failed to load counters: {e}, using defaults");
                Counters::default()
            },
        };
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            catalog: EffectCatalog::from_config(&config),
            clock: EffectClock::new(),
            shield: ShieldSlot::Empty,
            double_time: counters.double_time,
            multiplier: ScoreMultiplier::new(config.score_multiplier),
            has_extra_life: counters.has_extra_life,
            missile_count: counters.missile_count,
            sidewinder_count: counters.sidewinder_count,
            movement: MovementEffects::new(config.speed_boost_factor),
            shrink: ShrinkField::new(
                config.shrink.scale,
                config.shrink.max_targets,
                config.shrink_transition(),
            ),
            projectiles: ProjectileSystem::new(config.projectiles.clone()),
            events: NotificationBus::new(),
            store,
            rng,
            config,
        }
    }

    pub fn catalog(&self) -> &EffectCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &PowerUpConfig {
        &self.config
    }

    // --- Selection ---

    /// Kind for a power-up spawned in the world.
    pub fn pick_environmental_drop(&mut self) -> PowerUpKind {
        selector::pick_environmental_drop(&self.catalog, &mut self.rng, self.config.fallback_drop)
    }

    /// Kind granted by a mystery box.
    pub fn pick_mystery_grant(&mut self) -> PowerUpKind {
        selector::pick_mystery_grant(&mut self.rng)
    }

    /// Draw a mystery kind and apply it. The kind is returned even if the
    /// activation was rejected.
    pub fn apply_mystery_grant(&mut self, world: &mut World) -> (PowerUpKind, bool) {
        let kind = self.pick_mystery_grant();
        let applied = self.apply_power_up(kind, world);
        tracing::debug!(%kind, applied, "Mystery grant");
        (kind, applied)
    }

    // --- Activation ---

    /// Apply a collected or purchased power-up. Returns `false` if it was
    /// rejected because the same effect (or the shield slot) is already taken.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, world: &mut World) -> bool {
        if let Some(base) = self.catalog.base_duration(kind) {
            return self.activate_timed(kind, base, world);
        }
        match kind {
            PowerUpKind::ShopShield => {
                if self.shield_slot_taken(kind) {
                    return false;
                }
                let hits = self.catalog.hit_budget(kind).unwrap_or(1);
                self.shield.raise_counted(hits);
                self.started(kind);
                true
            },
            PowerUpKind::ExtraLife => {
                if self.has_extra_life {
                    return false;
                }
                self.has_extra_life = true;
                self.started(kind);
                self.persist();
                true
            },
            PowerUpKind::DoubleTime => {
                if self.double_time {
                    return false;
                }
                self.double_time = true;
                self.started(kind);
                self.persist();
                true
            },
            PowerUpKind::Missile => {
                let amount = self.config.projectiles.pickup_amount;
                self.missile_count = self.missile_count.saturating_add(amount);
                tracing::debug!(count = self.missile_count, "Missile collected");
                self.persist();
                true
            },
            PowerUpKind::SidewinderMissile => {
                let amount = self.config.projectiles.pickup_amount;
                self.sidewinder_count = self.sidewinder_count.saturating_add(amount);
                tracing::debug!(count = self.sidewinder_count, "Sidewinder collected");
                self.persist();
                true
            },
            // Timed lifetimes are handled above.
            PowerUpKind::SpeedBoost
            | PowerUpKind::Shield
            | PowerUpKind::Shrink
            | PowerUpKind::Ghost
            | PowerUpKind::Multiplier => false,
        }
    }

    fn activate_timed(&mut self, kind: PowerUpKind, base: Duration, world: &mut World) -> bool {
        if self.clock.is_active(kind) || self.shield_slot_taken(kind) {
            return false;
        }
        let duration = if self.double_time {
            base.saturating_mul(2)
        } else {
            base
        };
        if self.clock.start(kind, duration).is_none() {
            return false;
        }
        match kind {
            PowerUpKind::SpeedBoost => {
                self.movement.start_speed_boost(world);
                self.events.publish(EngineEvent::SpeedBoostStarted);
            },
            PowerUpKind::Shield => {
                self.shield.raise_timed();
            },
            PowerUpKind::Shrink => {
                self.shrink.apply(world);
            },
            PowerUpKind::Ghost => {
                self.movement.start_ghost(&mut world.player);
            },
            PowerUpKind::Multiplier => self.multiplier.engage(),
            _ => {},
        }
        self.started(kind);
        true
    }

    /// Whether `kind` shares the shield slot with whatever currently holds it.
    fn shield_slot_taken(&self, kind: PowerUpKind) -> bool {
        self.shield
            .kind()
            .is_some_and(|held| self.catalog.conflicts(held, kind))
    }

    fn started(&mut self, kind: PowerUpKind) {
        tracing::info!(%kind, "Effect started");
        self.events.publish(EngineEvent::EffectStarted { kind });
    }

    fn ended(&mut self, kind: PowerUpKind) {
        tracing::info!(%kind, "Effect ended");
        self.events.publish(EngineEvent::EffectEnded { kind });
    }

    // --- Deactivation ---

    /// Turn an effect off early. Returns `false` if it was not active.
    /// Count-based kinds have nothing to deactivate.
    pub fn deactivate(&mut self, kind: PowerUpKind, world: &mut World) -> bool {
        if self.catalog.is_timed(kind) {
            if self.clock.cancel(kind).is_none() {
                return false;
            }
            self.turn_off_timed(kind, world, Shutdown::Graceful);
            return true;
        }
        match kind {
            PowerUpKind::ShopShield => {
                if !matches!(self.shield, ShieldSlot::Counted { .. }) {
                    return false;
                }
                self.shield.lower();
                self.ended(kind);
                true
            },
            PowerUpKind::ExtraLife => self.consume_extra_life(),
            PowerUpKind::DoubleTime => {
                if !self.double_time {
                    return false;
                }
                self.double_time = false;
                self.ended(kind);
                self.persist();
                true
            },
            _ => false,
        }
    }

    /// Undo a timed effect whose clock entry has already been removed.
    fn turn_off_timed(&mut self, kind: PowerUpKind, world: &mut World, mode: Shutdown) {
        match kind {
            PowerUpKind::SpeedBoost => {
                self.movement.stop_speed_boost(world);
                self.events.publish(EngineEvent::SpeedBoostEnded);
            },
            PowerUpKind::Shield => {
                if self.shield == ShieldSlot::Timed {
                    self.shield.lower();
                }
            },
            PowerUpKind::Shrink => match mode {
                Shutdown::Graceful => self.shrink.begin_restore(world, self.clock.now()),
                Shutdown::Immediate => self.shrink.restore_now(world),
            },
            PowerUpKind::Ghost => {
                self.movement.stop_ghost(&mut world.player);
            },
            PowerUpKind::Multiplier => self.multiplier.reset(),
            _ => {},
        }
        self.ended(kind);
    }

    // --- Shield ---

    /// Resolve the player touching an obstacle against the shield slot.
    pub fn shield_hit(&mut self) -> ShieldHit {
        let outcome = self.shield.hit();
        match outcome {
            ShieldHit::AbsorbedAndBroken => {
                tracing::info!("Shop shield broken");
                self.events.publish(EngineEvent::ShieldBroken);
                self.ended(PowerUpKind::ShopShield);
            },
            ShieldHit::Absorbed => {
                tracing::debug!(remaining = ?self.shield.remaining_hits(), "Shield absorbed hit");
            },
            ShieldHit::NotAbsorbed => {},
        }
        outcome
    }

    // --- Projectiles ---

    /// Fire a straight missile from the player. Returns `false` with no
    /// missiles in stock.
    pub fn fire_missile(&mut self, world: &World) -> bool {
        if self.missile_count == 0 {
            return false;
        }
        self.missile_count -= 1;
        self.persist();
        let id = self.projectiles.launch_missile(world.player.position);
        tracing::debug!(id, remaining = self.missile_count, "Missile fired");
        true
    }

    /// Fire a homing sidewinder at the nearest obstacle ahead. Returns `false`
    /// with no sidewinders in stock.
    pub fn fire_sidewinder(&mut self, world: &World) -> bool {
        if self.sidewinder_count == 0 {
            return false;
        }
        self.sidewinder_count -= 1;
        self.persist();
        let target = self.projectiles.launch_sidewinder(world);
        tracing::debug!(?target, remaining = self.sidewinder_count, "Sidewinder fired");
        true
    }

    pub fn in_flight(&self) -> &[Projectile] {
        self.projectiles.in_flight()
    }

    // --- Frame update ---

    /// Advance the session clock by `dt` seconds: fire due expirations, finish
    /// shrink restores and move projectiles.
    pub fn tick(&mut self, dt: f32, world: &mut World) {
        let step = seconds(dt);
        for expiry in self.clock.advance(step) {
            // An earlier expiry in this batch may have changed the active set.
            if !self.clock.is_current(&expiry) {
                continue;
            }
            self.clock.cancel(expiry.kind);
            self.turn_off_timed(expiry.kind, world, Shutdown::Graceful);
        }

        let restored = self.shrink.finish_restores(world, self.clock.now());
        if restored > 0 {
            tracing::debug!(restored, "Shrink restore transition finished");
        }

        for impact in self.projectiles.advance(step.as_secs_f32(), world) {
            tracing::debug!(destroyed = ?impact.destroyed, "Projectile exploded");
            self.events.publish(EngineEvent::ExplosionAt {
                position: impact.position,
            });
        }
    }

    /// End-of-run cleanup. Force-deactivates every timed and shield effect,
    /// restores all snapshots immediately and discards projectiles. Counters,
    /// extra life and double time are left alone.
    pub fn reset_all(&mut self, world: &mut World) {
        for kind in self.clock.cancel_all() {
            self.turn_off_timed(kind, world, Shutdown::Immediate);
        }
        self.shrink.restore_now(world);
        if let Some(kind) = self.shield.lower() {
            self.ended(kind);
        }
        self.projectiles.clear();
        tracing::info!("All transient effects reset");
    }

    // --- Queries ---

    /// Whether `kind` is currently in effect. Count-based kinds report
    /// whether any are in stock.
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::ShopShield => matches!(self.shield, ShieldSlot::Counted { .. }),
            PowerUpKind::ExtraLife => self.has_extra_life,
            PowerUpKind::DoubleTime => self.double_time,
            PowerUpKind::Missile => self.missile_count > 0,
            PowerUpKind::SidewinderMissile => self.sidewinder_count > 0,
            _ => self.clock.is_active(kind),
        }
    }

    pub fn active_kinds(&self) -> Vec<PowerUpKind> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|&k| self.is_active(k))
            .collect()
    }

    pub fn score_multiplier(&self) -> u32 {
        self.multiplier.current()
    }

    /// Points awarded for passing a gate worth `base`.
    pub fn scored(&self, base: u64) -> u64 {
        self.multiplier.apply(base)
    }

    pub fn missile_count(&self) -> u32 {
        self.missile_count
    }

    pub fn sidewinder_count(&self) -> u32 {
        self.sidewinder_count
    }

    pub fn has_extra_life(&self) -> bool {
        self.has_extra_life
    }

    /// Spend the extra life on a fatal hit. Returns `false` if none was held.
    pub fn consume_extra_life(&mut self) -> bool {
        if !self.has_extra_life {
            return false;
        }
        self.has_extra_life = false;
        self.ended(PowerUpKind::ExtraLife);
        self.persist();
        true
    }

    pub fn double_time_active(&self) -> bool {
        self.double_time
    }

    pub fn shield(&self) -> ShieldSlot {
        self.shield
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn expiry(&self, kind: PowerUpKind) -> Option<Duration> {
        self.clock.expiry(kind)
    }

    /// Time left on a running timed effect.
    pub fn remaining(&self, kind: PowerUpKind) -> Option<Duration> {
        self.clock.remaining(kind)
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    pub fn counters(&self) -> Counters {
        Counters {
            missile_count: self.missile_count,
            sidewinder_count: self.sidewinder_count,
            has_extra_life: self.has_extra_life,
            double_time: self.double_time,
        }
    }

    pub fn state(&self) -> EngineState {
        EngineState {
            active_timed: self
                .clock
                .active_kinds()
                .into_iter()
                .filter_map(|k| self.clock.remaining(k).map(|r| (k, r)))
                .collect(),
            shield: self.shield,
            double_time_active: self.double_time,
            score_multiplier: self.multiplier.current(),
            has_extra_life: self.has_extra_life,
            missile_count: self.missile_count,
            sidewinder_count: self.sidewinder_count,
        }
    }

    fn persist(&mut self) {
        let counters = self.counters();
        if let Err(e) = self.store.save(&counters) {
            tracing::warn!("Failed to persist counters: {e}");
        }
    }
}
