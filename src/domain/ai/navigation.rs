// Planned waypoint route with a cursor and an age used to force replans.

use crate::domain::pathfinding::find_path;
use crate::domain::world::World;
use glam::Vec3;

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    path: Vec<usize>,
    cursor: usize,
    age: f32,
}

impl Navigator {
    pub fn is_empty(&self) -> bool {
        self.cursor >= self.path.len()
    }

    /// Seconds since the last plan.
    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn tick(&mut self, dt: f32) {
        self.age += dt;
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.cursor = 0;
    }

    /// Waypoint currently steered towards.
    pub fn current(&self) -> Option<usize> {
        self.path.get(self.cursor).copied()
    }

    /// Moves to the next waypoint, clearing the plan after the last one.
    pub fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.path.len() {
            self.clear();
        }
    }

    /// Plans between explicit waypoints. An unreachable goal leaves the
    /// navigator empty.
    pub fn plan_between(&mut self, world: &World, start: usize, goal: usize) {
        self.path = find_path(world.waypoints(), start, goal);
        self.cursor = 0;
        self.age = 0.0;
    }

    /// Plans from the waypoint nearest `from` to the one nearest `to`.
    pub fn plan(&mut self, world: &World, from: Vec3, to: Vec3) {
        match (world.nearest_waypoint(from), world.nearest_waypoint(to)) {
            (Some(start), Some(goal)) => self.plan_between(world, start, goal),
            _ => {
                self.clear();
                self.age = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::world::WorldBuilder;

    #[test]
    fn plan_advance_and_clear() {
        let mut b = WorldBuilder::new(54.5);
        let a = b.add_waypoint(Vec3::ZERO);
        let c = b.add_waypoint(Vec3::new(10.0, 0.0, 0.0));
        b.link(a, c);
        let world = b.build();

        let mut nav = Navigator::default();
        assert!(nav.is_empty());
        nav.plan(&world, Vec3::new(1.0, 0.0, 0.0), Vec3::new(9.0, 0.0, 0.0));
        assert_eq!(nav.current(), Some(a));
        nav.advance();
        assert_eq!(nav.current(), Some(c));
        nav.advance();
        assert!(nav.is_empty());
    }

    #[test]
    fn empty_graph_plans_nothing() {
        let world = WorldBuilder::new(54.5).build();
        let mut nav = Navigator::default();
        nav.tick(3.0);
        nav.plan(&world, Vec3::ZERO, Vec3::X);
        assert!(nav.is_empty());
        assert_eq!(nav.age(), 0.0);
    }
}
