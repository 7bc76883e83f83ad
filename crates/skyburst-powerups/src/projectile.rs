use glam::Vec2;
use serde::{Deserialize, Serialize};

use skyburst_core::geometry::{circle_overlaps_box, quadratic_length, quadratic_point};
use skyburst_core::world::{ObstacleId, World};

use crate::config::ProjectileConfig;

/// Samples used to approximate a sidewinder curve's length.
const CURVE_SAMPLES: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Missile,
    Sidewinder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Flight {
    /// Constant velocity. `seeking` projectiles destroy the first obstacle they touch.
    Straight { velocity: Vec2, seeking: bool },
    /// Quadratic curve from `start` to `end` through `control`, locked on `target`.
    Homing {
        start: Vec2,
        control: Vec2,
        end: Vec2,
        target: ObstacleId,
        length: f32,
        progress: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub position: Vec2,
    pub flight: Flight,
}

/// Something a projectile blew up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub position: Vec2,
    pub destroyed: Option<ObstacleId>,
}

/// In-flight missiles. Counters live in the engine; this only moves and resolves shots.
#[derive(Debug, Clone)]
pub struct ProjectileSystem {
    config: ProjectileConfig,
    in_flight: Vec<Projectile>,
    next_id: u32,
}

impl ProjectileSystem {
    pub fn new(config: ProjectileConfig) -> Self {
        Self {
            config,
            in_flight: Vec::new(),
            next_id: 1,
        }
    }

    pub fn in_flight(&self) -> &[Projectile] {
        &self.in_flight
    }

    pub fn clear(&mut self) {
        self.in_flight.clear();
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Launch a straight missile from `origin` in the flight direction.
    pub fn launch_missile(&mut self, origin: Vec2) -> u32 {
        let id = self.allocate_id();
        self.in_flight.push(Projectile {
            id,
            kind: ProjectileKind::Missile,
            position: origin,
            flight: Flight::Straight {
                velocity: Vec2::new(self.config.missile_speed, 0.0),
                seeking: true,
            },
        });
        id
    }

    /// Launch a sidewinder from the player, locked on the nearest obstacle
    /// ahead. Without a target it flies straight and harmlessly off-screen.
    /// Returns the locked target, if any.
    pub fn launch_sidewinder(&mut self, world: &World) -> Option<ObstacleId> {
        let origin = world.player.position;
        let target = nearest_target(world);
        let flight = match target.and_then(|id| world.obstacle(id)) {
            Some(obstacle) => {
                let end = obstacle.position;
                let control = curve_control(origin, end, self.config.sidewinder_arc_height);
                Flight::Homing {
                    start: origin,
                    control,
                    end,
                    target: obstacle.id,
                    length: quadratic_length(origin, control, end, CURVE_SAMPLES),
                    progress: 0.0,
                }
            },
            None => Flight::Straight {
                velocity: Vec2::new(self.config.sidewinder_speed, 0.0),
                seeking: false,
            },
        };
        let id = self.allocate_id();
        self.in_flight.push(Projectile {
            id,
            kind: ProjectileKind::Sidewinder,
            position: origin,
            flight,
        });
        target
    }

    /// Move every projectile by `dt` seconds and resolve hits against `world`.
    pub fn advance(&mut self, dt: f32, world: &mut World) -> Vec<Impact> {
        let mut impacts = Vec::new();
        let radius = self.config.missile_radius.max(0.5);
        let sidewinder_speed = self.config.sidewinder_speed;
        let bounds = world.bounds;

        self.in_flight.retain_mut(|p| {
            match &mut p.flight {
                Flight::Straight { velocity, seeking } => {
                    let from = p.position;
                    let to = from + *velocity * dt;
                    if *seeking && let Some((at, id)) = sweep_for_obstacle(world, from, to, radius) {
                        world.remove_obstacle(id);
                        impacts.push(Impact {
                            position: at,
                            destroyed: Some(id),
                        });
                        return false;
                    }
                    p.position = to;
                    bounds.contains(p.position)
                },
                Flight::Homing {
                    start,
                    control,
                    end,
                    target,
                    length,
                    progress,
                } => {
                    *progress = if *length <= f32::EPSILON {
                        1.0
                    } else {
                        (*progress + sidewinder_speed * dt / *length).min(1.0)
                    };
                    p.position = quadratic_point(*start, *control, *end, *progress);
                    if *progress < 1.0 {
                        return true;
                    }
                    let destroyed = world.remove_obstacle(*target).map(|o| o.id);
                    impacts.push(Impact {
                        position: p.position,
                        destroyed,
                    });
                    false
                },
            }
        });
        impacts
    }
}

/// Nearest obstacle ahead of the player by Euclidean distance. The first one
/// found wins a tie.
pub fn nearest_target(world: &World) -> Option<ObstacleId> {
    let origin = world.player.position;
    let mut best: Option<(ObstacleId, f32)> = None;
    for obstacle in world.obstacles_ahead_of(origin.x) {
        let d = obstacle.position.distance_squared(origin);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((obstacle.id, d));
        }
    }
    best.map(|(id, _)| id)
}

/// Control point offset perpendicular to the chord, bowing the path sideways.
fn curve_control(start: Vec2, end: Vec2, arc_height: f32) -> Vec2 {
    let chord = end - start;
    let mid = start + chord * 0.5;
    let normal = chord.perp().normalize_or_zero();
    mid + normal * arc_height
}

/// First solid obstacle touched while moving from `from` to `to`, sampled in
/// steps no longer than the hit radius so fast shots cannot tunnel.
fn sweep_for_obstacle(world: &World, from: Vec2, to: Vec2, radius: f32) -> Option<(Vec2, ObstacleId)> {
    let travel = from.distance(to);
    let steps = (travel / radius).ceil().max(1.0) as u32;
    for step in 1..=steps {
        let point = from.lerp(to, step as f32 / steps as f32);
        let hit = world.obstacles().iter().find(|o| {
            o.collision_enabled
                && o.position.x + o.body.width / 2.0 >= from.x
                && circle_overlaps_box(point, radius, o.position, o.body)
        });
        if let Some(obstacle) = hit {
            return Some((point, obstacle.id));
        }
    }
    None
}
