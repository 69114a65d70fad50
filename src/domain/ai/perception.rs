// Line-of-sight and target selection for bots.

use crate::domain::geometry::yaw_towards;
use crate::domain::state::Player;
use crate::domain::store::{EntityStore, Handle};
use crate::domain::tuning::PlayerTuning;
use crate::domain::world::World;
use glam::Vec3;

/// A wall this close behind the target's torso does not block sight.
const SIGHT_TOLERANCE: f32 = 0.5;

fn torso(target: &Player, tuning: &PlayerTuning) -> Vec3 {
    target.position + Vec3::new(0.0, tuning.height * 0.5, 0.0)
}

/// Eye-to-torso visibility against world geometry.
pub fn can_see(world: &World, tuning: &PlayerTuning, viewer: &Player, target: &Player) -> bool {
    let from = viewer.eye(tuning);
    let delta = torso(target, tuning) - from;
    let dist = delta.length();
    if dist < 0.1 {
        return true;
    }
    match world.raycast(from, delta / dist, dist) {
        Some(hit) => hit.distance > dist - SIGHT_TOLERANCE,
        None => true,
    }
}

/// Closest alive, visible player on another team strictly within `range`.
pub fn nearest_visible_enemy(
    world: &World,
    tuning: &PlayerTuning,
    players: &EntityStore<Player>,
    me: Handle<Player>,
    range: f32,
) -> Option<Handle<Player>> {
    let viewer = players.get(me)?;
    let mut best: Option<(Handle<Player>, f32)> = None;

    for (h, other) in players.iter() {
        if h == me || !other.is_alive() || other.team == viewer.team {
            continue;
        }
        let d = other.position.distance(viewer.position);
        let limit = best.map_or(range, |(_, bd)| bd);
        if d < limit && can_see(world, tuning, viewer, other) {
            best = Some((h, d));
        }
    }
    best.map(|(h, _)| h)
}

/// Yaw and pitch from the viewer's eye to the target's torso.
pub fn aim_at(tuning: &PlayerTuning, viewer: &Player, target: &Player) -> (f32, f32) {
    let to = target.position - viewer.position;
    let flat = (to.x * to.x + to.z * to.z).sqrt();
    let pitch = (to.y + tuning.height * 0.5 - tuning.eye_height).atan2(flat);
    (yaw_towards(to), pitch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::world::WorldBuilder;

    fn at(pos: Vec3, team: u8) -> Player {
        let mut p = Player::new("p".into(), team, true);
        p.spawn_at(pos, 0.0);
        p
    }

    #[test]
    fn wall_between_blocks_sight() {
        let mut b = WorldBuilder::new(54.5);
        b.add_volume(Vec3::new(-2.0, 0.0, 5.0), Vec3::new(2.0, 4.0, 6.0), false);
        let world = b.build();
        let tuning = PlayerTuning::default();

        let me = at(Vec3::ZERO, 0);
        assert!(!can_see(&world, &tuning, &me, &at(Vec3::new(0.0, 0.0, 12.0), 1)));
        assert!(can_see(&world, &tuning, &me, &at(Vec3::new(8.0, 0.0, 0.0), 1)));
    }

    #[test]
    fn picks_nearest_enemy_and_ignores_teammates() {
        let world = WorldBuilder::new(54.5).build();
        let tuning = PlayerTuning::default();
        let mut players = EntityStore::with_capacity(4);
        let me = players.insert(at(Vec3::ZERO, 0)).unwrap();
        players.insert(at(Vec3::new(3.0, 0.0, 0.0), 0)).unwrap();
        let near = players.insert(at(Vec3::new(10.0, 0.0, 0.0), 1)).unwrap();
        players.insert(at(Vec3::new(20.0, 0.0, 0.0), 1)).unwrap();

        assert_eq!(nearest_visible_enemy(&world, &tuning, &players, me, 40.0), Some(near));
        assert_eq!(nearest_visible_enemy(&world, &tuning, &players, me, 5.0), None);
    }

    #[test]
    fn aim_points_at_level_target() {
        let tuning = PlayerTuning::default();
        let (yaw, pitch) = aim_at(&tuning, &at(Vec3::ZERO, 0), &at(Vec3::new(0.0, 0.0, 10.0), 1));
        assert!(yaw.abs() < 1e-6);
        // Torso (0.9) sits below the eye (1.6).
        assert!(pitch < 0.0);
    }
}
