pub mod events;
pub mod geometry;
pub mod powerup;
pub mod storage;
pub mod world;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use crate::geometry::{Bounds, Size};
    use crate::storage::{CounterStore, Counters, StorageError};
    use crate::world::{ObstacleId, World};

    /// Player spawn used by every helper world.
    pub const PLAYER_START: Vec2 = Vec2::new(100.0, 300.0);

    /// Default obstacle size for helper worlds.
    pub const OBSTACLE_SIZE: Size = Size::new(40.0, 40.0);

    /// Empty 1024x768 world with the player at [`PLAYER_START`].
    pub fn empty_world() -> World {
        World::new(PLAYER_START, Bounds::new(Vec2::ZERO, Vec2::new(1024.0, 768.0)))
    }

    /// World with one [`OBSTACLE_SIZE`] obstacle per position, in order.
    pub fn world_with_obstacles(positions: &[(f32, f32)]) -> (World, Vec<ObstacleId>) {
        let mut world = empty_world();
        let ids = positions
            .iter()
            .map(|&(x, y)| world.spawn_obstacle(Vec2::new(x, y), OBSTACLE_SIZE))
            .collect();
        (world, ids)
    }

    /// World with obstacles straight ahead of the player at the given distances.
    pub fn world_with_obstacles_at_distances(distances: &[f32]) -> (World, Vec<ObstacleId>) {
        let positions: Vec<_> = distances
            .iter()
            .map(|d| (PLAYER_START.x + d, PLAYER_START.y))
            .collect();
        world_with_obstacles(&positions)
    }

    /// Store whose every operation fails, for exercising the non-fatal path.
    #[derive(Debug, Default)]
    pub struct FailingStore {
        pub save_attempts: usize,
    }

    impl CounterStore for FailingStore {
        fn load(&self) -> Result<Counters, StorageError> {
            Err(StorageError::Unavailable("disk offline".to_string()))
        }

        fn save(&mut self, _counters: &Counters) -> Result<(), StorageError> {
            self.save_attempts += 1;
            Err(StorageError::Unavailable("disk offline".to_string()))
        }
    }

    /// In-memory store whose clones share one backing record, so a test can
    /// hand one clone to the engine and inspect what was saved through another.
    #[derive(Debug, Clone, Default)]
    pub struct SharedStore {
        inner: Rc<RefCell<(Counters, usize)>>,
    }

    impl SharedStore {
        pub fn new(initial: Counters) -> Self {
            Self {
                inner: Rc::new(RefCell::new((initial, 0))),
            }
        }

        /// Counters as last saved.
        pub fn counters(&self) -> Counters {
            self.inner.borrow().0
        }

        /// Number of successful saves so far.
        pub fn saves(&self) -> usize {
            self.inner.borrow().1
        }
    }

    impl CounterStore for SharedStore {
        fn load(&self) -> Result<Counters, StorageError> {
            Ok(self.counters())
        }

        fn save(&mut self, counters: &Counters) -> Result<(), StorageError> {
            let mut inner = self.inner.borrow_mut();
            inner.0 = *counters;
            inner.1 += 1;
            Ok(())
        }
    }
}
