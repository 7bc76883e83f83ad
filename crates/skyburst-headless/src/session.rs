use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skyburst_core::events::EngineEvent;
use skyburst_core::geometry::{Bounds, Size};
use skyburst_core::powerup::PowerUpKind;
use skyburst_core::world::World;
use skyburst_powerups::{PowerUpEngine, ShieldHit};

/// Scroll speed of the world in units per second at `sim_speed` 1.0.
const SCROLL_SPEED: f32 = 220.0;
const OBSTACLE_INTERVAL: f32 = 0.9;
const PICKUP_INTERVAL: f32 = 2.5;
const MYSTERY_INTERVAL: f32 = 11.0;
const FIRE_INTERVAL: f32 = 1.7;
const GATE_POINTS: u64 = 10;

/// Tallies reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u32,
    pub pickups: u32,
    pub rejected_pickups: u32,
    pub hits_absorbed: u32,
    pub crashes: u32,
    pub lives_used: u32,
    pub explosions: u32,
    pub score: u64,
}

/// Scripted flight: obstacles stream in from the right, power-ups are drawn on
/// a fixed cadence and the player fires whenever stock allows.
pub struct FlightSession {
    pub world: World,
    pub engine: PowerUpEngine,
    rng: StdRng,
    elapsed: f32,
    next_obstacle: f32,
    next_pickup: f32,
    next_mystery: f32,
    next_fire: f32,
    fire_sidewinder: bool,
    stats: SessionStats,
}

impl FlightSession {
    pub fn new(engine: PowerUpEngine, seed: u64) -> Self {
        let bounds = Bounds::new(Vec2::ZERO, Vec2::new(1024.0, 768.0));
        Self {
            world: World::new(Vec2::new(120.0, 384.0), bounds),
            engine,
            rng: StdRng::seed_from_u64(seed),
            elapsed: 0.0,
            next_obstacle: 0.0,
            next_pickup: PICKUP_INTERVAL,
            next_mystery: MYSTERY_INTERVAL,
            next_fire: FIRE_INTERVAL,
            fire_sidewinder: false,
            stats: SessionStats::default(),
        }
    }

    /// Run `frames` fixed steps of `dt` seconds, then end the run.
    pub fn run(&mut self, frames: u32, dt: f32) -> SessionStats {
        for _ in 0..frames {
            self.step(dt);
        }
        self.engine.reset_all(&mut self.world);
        self.drain();
        self.stats.clone()
    }

    pub fn step(&mut self, dt: f32) {
        self.elapsed += dt;
        self.stats.frames += 1;

        let passed = self.world.scroll(SCROLL_SPEED * dt);
        for _ in 0..passed {
            self.stats.score += self.engine.scored(GATE_POINTS);
        }

        if self.elapsed >= self.next_obstacle {
            self.next_obstacle += OBSTACLE_INTERVAL;
            self.spawn_obstacle();
        }
        if self.elapsed >= self.next_pickup {
            self.next_pickup += PICKUP_INTERVAL;
            let kind = self.engine.pick_environmental_drop();
            self.collect(kind);
        }
        if self.elapsed >= self.next_mystery {
            self.next_mystery += MYSTERY_INTERVAL;
            let (kind, applied) = self.engine.apply_mystery_grant(&mut self.world);
            tracing::info!(%kind, applied, "Mystery box opened");
        }
        if self.elapsed >= self.next_fire {
            self.next_fire += FIRE_INTERVAL;
            self.fire();
        }

        self.engine.tick(dt, &mut self.world);
        self.resolve_collisions();
        self.drain();
    }

    fn spawn_obstacle(&mut self) {
        let y = self.rng.random_range(80.0..688.0);
        let edge = self.rng.random_range(30.0..70.0);
        self.world
            .spawn_obstacle(Vec2::new(self.world.bounds.max.x, y), Size::new(edge, edge));
    }

    fn collect(&mut self, kind: PowerUpKind) {
        if self.engine.apply_power_up(kind, &mut self.world) {
            self.stats.pickups += 1;
        } else {
            self.stats.rejected_pickups += 1;
            tracing::debug!(%kind, "Pickup rejected");
        }
    }

    fn fire(&mut self) {
        self.fire_sidewinder = !self.fire_sidewinder;
        let fired = if self.fire_sidewinder {
            self.engine.fire_sidewinder(&self.world)
        } else {
            self.engine.fire_missile(&self.world)
        };
        if fired {
            tracing::debug!(sidewinder = self.fire_sidewinder, "Player fired");
        }
    }

    fn resolve_collisions(&mut self) {
        for id in self.world.player_collisions() {
            match self.engine.shield_hit() {
                ShieldHit::Absorbed | ShieldHit::AbsorbedAndBroken => {
                    self.stats.hits_absorbed += 1;
                },
                ShieldHit::NotAbsorbed => {
                    if self.engine.consume_extra_life() {
                        self.stats.lives_used += 1;
                    } else {
                        self.stats.crashes += 1;
                    }
                },
            }
            // The craft bounces off whatever it touched.
            self.world.remove_obstacle(id);
        }
    }

    fn drain(&mut self) {
        for event in self.engine.drain_events() {
            if matches!(event, EngineEvent::ExplosionAt { .. }) {
                self.stats.explosions += 1;
            }
            match serde_json::to_string(&event) {
                Ok(json) => tracing::info!(target: "skyburst::events", "{json}"),
                Err(e) => tracing::warn!("Failed to encode event {event:?}: {e}"),
            }
        }
    }
}
