use skyburst_core::world::{ContactPolicy, Player, World};

/// Contact-policy snapshots for speed boost and ghost mode.
///
/// Two independent slots, one per effect. Each start saves the policy in force
/// at that moment and each stop restores its own save. Overlap is allowed and
/// logged; when both run, whichever ends last decides the final policy.
#[derive(Debug, Clone)]
pub struct MovementEffects {
    speed_boost: Option<ContactPolicy>,
    ghost: Option<ContactPolicy>,
    boost_factor: f32,
}

impl MovementEffects {
    pub fn new(boost_factor: f32) -> Self {
        Self {
            speed_boost: None,
            ghost: None,
            boost_factor: if boost_factor > 0.0 { boost_factor } else { 1.0 },
        }
    }

    pub fn speed_boost_snapshot(&self) -> Option<ContactPolicy> {
        self.speed_boost
    }

    pub fn ghost_snapshot(&self) -> Option<ContactPolicy> {
        self.ghost
    }

    /// Snapshot the contact policy, go pass-through and speed the world up.
    pub fn start_speed_boost(&mut self, world: &mut World) -> bool {
        if self.speed_boost.is_some() {
            return false;
        }
        if self.ghost.is_some() {
            tracing::warn!("Speed boost starting while ghost mode is active");
        }
        self.speed_boost = Some(engage_pass_through(&mut world.player));
        world.sim_speed *= self.boost_factor;
        true
    }

    pub fn stop_speed_boost(&mut self, world: &mut World) -> bool {
        let Some(saved) = self.speed_boost.take() else {
            return false;
        };
        world.player.contact = saved;
        world.sim_speed /= self.boost_factor;
        true
    }

    pub fn start_ghost(&mut self, player: &mut Player) -> bool {
        if self.ghost.is_some() {
            return false;
        }
        if self.speed_boost.is_some() {
            tracing::warn!("Ghost mode starting while speed boost is active");
        }
        self.ghost = Some(engage_pass_through(player));
        true
    }

    pub fn stop_ghost(&mut self, player: &mut Player) -> bool {
        let Some(saved) = self.ghost.take() else {
            return false;
        };
        player.contact = saved;
        true
    }
}

fn engage_pass_through(player: &mut Player) -> ContactPolicy {
    let saved = player.contact;
    player.contact = saved.pass_through();
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyburst_core::test_helpers::empty_world;
    use skyburst_core::world::category;

    #[test]
    fn speed_boost_round_trips_policy_and_speed() {
        let mut world = empty_world();
        world.sim_speed = 1.25;
        let before = world.player.contact;
        let mut fx = MovementEffects::new(2.0);

        assert!(fx.start_speed_boost(&mut world));
        assert!(!world.player.contact.collides_with(category::OBSTACLE));
        assert_eq!(world.sim_speed, 2.5);

        assert!(fx.stop_speed_boost(&mut world));
        assert_eq!(world.player.contact, before);
        assert_eq!(world.sim_speed, 1.25);
        assert!(!fx.stop_speed_boost(&mut world));
    }

    #[test]
    fn ghost_round_trips_custom_policy() {
        let mut world = empty_world();
        let custom = ContactPolicy {
            category: category::PLAYER,
            collides_with: category::OBSTACLE,
            contacts: category::COLLECTIBLE,
        };
        world.player.contact = custom;
        let mut fx = MovementEffects::new(2.0);

        assert!(fx.start_ghost(&mut world.player));
        assert!(!fx.start_ghost(&mut world.player));
        assert_eq!(fx.ghost_snapshot(), Some(custom));
        assert_eq!(world.player.contact.collides_with, 0);
        assert!(world.player.contact.contacts(category::COLLECTIBLE));
        assert_eq!(world.sim_speed, 1.0);

        assert!(fx.stop_ghost(&mut world.player));
        assert_eq!(world.player.contact, custom);
    }

    #[test]
    fn boost_then_ghost_each_restore_their_own_snapshot() {
        let mut world = empty_world();
        let normal = world.player.contact;
        let mut fx = MovementEffects::new(2.0);

        assert!(fx.start_speed_boost(&mut world));
        assert!(fx.start_ghost(&mut world.player));
        assert_eq!(fx.speed_boost_snapshot(), Some(normal));
        assert_eq!(fx.ghost_snapshot(), Some(normal.pass_through()));

        // Ghost hands back what it saw at activation: boost's pass-through.
        assert!(fx.stop_ghost(&mut world.player));
        assert_eq!(world.player.contact, normal.pass_through());
        assert!(fx.stop_speed_boost(&mut world));
        assert_eq!(world.player.contact, normal);
        assert_eq!(world.sim_speed, 1.0);
    }

    #[test]
    fn ghost_then_boost_each_restore_their_own_snapshot() {
        let mut world = empty_world();
        let before_ghost = world.player.contact;
        let mut fx = MovementEffects::new(2.0);

        fx.start_ghost(&mut world.player);
        let before_boost = world.player.contact;
        fx.start_speed_boost(&mut world);
        assert_eq!(fx.ghost_snapshot(), Some(before_ghost));
        assert_eq!(fx.speed_boost_snapshot(), Some(before_boost));

        fx.stop_ghost(&mut world.player);
        assert_eq!(world.player.contact, before_ghost);

        // Boost ends last and reinstates the pass-through it saved.
        fx.stop_speed_boost(&mut world);
        assert_eq!(world.player.contact, before_boost);
        assert!(!world.player.contact.collides_with(category::OBSTACLE));
        assert_eq!(world.sim_speed, 1.0);
    }

    #[test]
    fn non_positive_boost_factor_is_neutral() {
        let mut world = empty_world();
        let mut fx = MovementEffects::new(0.0);
        fx.start_speed_boost(&mut world);
        assert_eq!(world.sim_speed, 1.0);
    }
}
