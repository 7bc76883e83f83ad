//! Shrink field: temporarily scales the nearest obstacles ahead of the player.
//!
//! Restoring happens in two steps. The footprint grows back at once and the
//! obstacle stops colliding; the collision body is swapped back and collision
//! re-enabled only once the restore transition has elapsed. `restore_now`
//! skips the transition for end-of-run cleanup.

use std::time::Duration;

use skyburst_core::world::{ObstacleId, ShrinkSnapshot, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRestore {
    id: ObstacleId,
    completes_at: Duration,
}

#[derive(Debug, Clone)]
pub struct ShrinkField {
    scale: f32,
    max_targets: usize,
    transition: Duration,
    affected: Vec<ObstacleId>,
    restoring: Vec<PendingRestore>,
}

impl ShrinkField {
    pub fn new(scale: f32, max_targets: usize, transition: Duration) -> Self {
        Self {
            scale: scale.clamp(0.05, 1.0),
            max_targets,
            transition,
            affected: Vec::new(),
            restoring: Vec::new(),
        }
    }

    /// Obstacles currently shrunk by the running activation.
    pub fn affected(&self) -> &[ObstacleId] {
        &self.affected
    }

    pub fn is_restoring(&self, id: ObstacleId) -> bool {
        self.restoring.iter().any(|r| r.id == id)
    }

    /// Up to `max_targets` obstacles ahead of the player that are not already
    /// shrunk, nearest first. Equal distances keep world order.
    pub fn select_targets(&self, world: &World) -> Vec<ObstacleId> {
        let origin = world.player.position;
        let mut candidates: Vec<_> = world
            .obstacles_ahead_of(origin.x)
            .filter(|o| !o.is_shrunk())
            .map(|o| (o.id, o.position.distance_squared(origin)))
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
        candidates
            .into_iter()
            .take(self.max_targets)
            .map(|(id, _)| id)
            .collect()
    }

    /// Shrink the selected obstacles. Returns the affected IDs, which may be
    /// empty if nothing is ahead.
    pub fn apply(&mut self, world: &mut World) -> Vec<ObstacleId> {
        let targets = self.select_targets(world);
        for &id in &targets {
            if let Some(obstacle) = world.obstacle_mut(id) {
                obstacle.shrink = Some(ShrinkSnapshot {
                    footprint: obstacle.footprint,
                    body: obstacle.body,
                });
                obstacle.footprint = obstacle.footprint.scaled(self.scale);
                obstacle.body = obstacle.body.scaled(self.scale);
            }
        }
        tracing::debug!(count = targets.len(), "Shrink field applied");
        self.affected.extend_from_slice(&targets);
        targets
    }

    /// Begin growing every affected obstacle back. Obstacles that left the
    /// world in the meantime are skipped.
    pub fn begin_restore(&mut self, world: &mut World, now: Duration) {
        let completes_at = now.saturating_add(self.transition);
        for id in std::mem::take(&mut self.affected) {
            let Some(obstacle) = world.obstacle_mut(id) else {
                continue;
            };
            let Some(snapshot) = obstacle.shrink else {
                continue;
            };
            obstacle.footprint = snapshot.footprint;
            obstacle.collision_enabled = false;
            self.restoring.push(PendingRestore { id, completes_at });
        }
        if self.transition.is_zero() {
            self.finish_restores(world, now);
        }
    }

    /// Complete every restore whose transition has elapsed. Returns how many
    /// obstacles became solid again.
    pub fn finish_restores(&mut self, world: &mut World, now: Duration) -> usize {
        let (done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.restoring)
            .into_iter()
            .partition(|r| r.completes_at <= now);
        self.restoring = pending;
        done.iter().filter(|r| finish_one(world, r.id)).count()
    }

    /// Restore everything immediately, including in-flight transitions.
    pub fn restore_now(&mut self, world: &mut World) {
        let ids = std::mem::take(&mut self.affected)
            .into_iter()
            .chain(std::mem::take(&mut self.restoring).into_iter().map(|r| r.id));
        for id in ids {
            finish_one(world, id);
        }
    }
}

fn finish_one(world: &mut World, id: ObstacleId) -> bool {
    let Some(obstacle) = world.obstacle_mut(id) else {
        return false;
    };
    let Some(snapshot) = obstacle.shrink.take() else {
        return false;
    };
    obstacle.footprint = snapshot.footprint;
    obstacle.body = snapshot.body;
    obstacle.collision_enabled = true;
    true
}
