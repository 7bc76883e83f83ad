use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Size, boxes_overlap};

/// Stable identifier for an obstacle in the world arena.
pub type ObstacleId = u32;

/// Physics category bits used by [`ContactPolicy`].
pub mod category {
    pub const PLAYER: u32 = 1 << 0;
    pub const OBSTACLE: u32 = 1 << 1;
    pub const COLLECTIBLE: u32 = 1 << 2;
    pub const SCORE_GATE: u32 = 1 << 3;
    pub const WORLD_EDGE: u32 = 1 << 4;
}

/// Which categories an entity physically collides with and which it merely
/// reports contact with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPolicy {
    pub category: u32,
    pub collides_with: u32,
    pub contacts: u32,
}

impl ContactPolicy {
    /// Normal flight: solid against obstacles and the world edge.
    pub const fn player_default() -> Self {
        Self {
            category: category::PLAYER,
            collides_with: category::OBSTACLE | category::WORLD_EDGE,
            contacts: category::OBSTACLE | category::COLLECTIBLE | category::SCORE_GATE,
        }
    }

    /// Derived policy that collides with nothing solid but still reports
    /// collectibles and score gates.
    pub fn pass_through(&self) -> Self {
        Self {
            category: self.category,
            collides_with: 0,
            contacts: self.contacts & (category::COLLECTIBLE | category::SCORE_GATE),
        }
    }

    pub fn collides_with(&self, other: u32) -> bool {
        self.collides_with & other != 0
    }

    pub fn contacts(&self, other: u32) -> bool {
        self.contacts & other != 0
    }
}

impl Default for ContactPolicy {
    fn default() -> Self {
        Self::player_default()
    }
}

/// The player's craft as seen by the effect engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub size: Size,
    pub contact: ContactPolicy,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            size: Size::new(48.0, 24.0),
            contact: ContactPolicy::player_default(),
        }
    }
}

/// Geometry captured before a shrink so it can be put back exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShrinkSnapshot {
    pub footprint: Size,
    pub body: Size,
}

/// A solid obstacle. `footprint` is what is drawn, `body` is what collides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub position: Vec2,
    pub footprint: Size,
    pub body: Size,
    pub collision_enabled: bool,
    /// Present while the obstacle is shrunk or restoring from a shrink.
    pub shrink: Option<ShrinkSnapshot>,
}

impl Obstacle {
    pub fn is_shrunk(&self) -> bool {
        self.shrink.is_some()
    }
}

/// Arena of scene entities the engine reads and mutates.
///
/// Obstacles keep insertion order, which is the iteration order used for
/// tie-breaking in target selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub player: Player,
    pub bounds: Bounds,
    /// Global simulation speed scalar (1.0 = normal).
    pub sim_speed: f32,
    obstacles: Vec<Obstacle>,
    next_id: ObstacleId,
}

impl World {
    pub fn new(player_position: Vec2, bounds: Bounds) -> Self {
        Self {
            player: Player::new(player_position),
            bounds,
            sim_speed: 1.0,
            obstacles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn spawn_obstacle(&mut self, position: Vec2, size: Size) -> ObstacleId {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            position,
            footprint: size,
            body: size,
            collision_enabled: true,
            shrink: None,
        });
        id
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn obstacle_mut(&mut self, id: ObstacleId) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.id == id)
    }

    /// Remove an obstacle, preserving the order of the rest.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(idx))
    }

    /// Obstacles whose center is strictly ahead of `x` in the flight direction.
    pub fn obstacles_ahead_of(&self, x: f32) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(move |o| o.position.x > x)
    }

    /// Obstacles the player is currently crashing into. Empty while the
    /// player's contact policy ignores obstacles.
    pub fn player_collisions(&self) -> Vec<ObstacleId> {
        if !self.player.contact.collides_with(category::OBSTACLE) {
            return Vec::new();
        }
        self.obstacles
            .iter()
            .filter(|o| {
                o.collision_enabled
                    && boxes_overlap(self.player.position, self.player.size, o.position, o.body)
            })
            .map(|o| o.id)
            .collect()
    }

    /// Scroll every obstacle toward the player by `distance` (scaled by
    /// `sim_speed`), dropping those that left the left edge of the bounds.
    /// Returns the number of obstacles despawned.
    pub fn scroll(&mut self, distance: f32) -> usize {
        let dx = distance * self.sim_speed;
        let min_x = self.bounds.min.x;
        for o in &mut self.obstacles {
            o.position.x -= dx;
        }
        let before = self.obstacles.len();
        self.obstacles
            .retain(|o| o.position.x + o.footprint.width / 2.0 >= min_x);
        before - self.obstacles.len()
    }
}
