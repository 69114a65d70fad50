// Static world geometry, navigation graph and spawn data.
//
// Built once by a `WorldBuilder` before the tick loop starts, read-only afterwards.

use super::geometry::{Aabb, forward};
use super::tuning::{VehicleKind, WeaponKind};
use glam::Vec3;

/// Ground probe half-thickness around the feet.
const GROUND_PROBE: f32 = 0.05;
/// Penetration resolution passes per query.
const COLLISION_PASSES: usize = 4;
/// Obstacle probe heights and upward scan limits (relative to the feet).
const OBSTACLE_PROBES: [f32; 4] = [0.3, 0.6, 0.9, 1.2];
const OBSTACLE_SCAN_STEP: f32 = 0.2;
const OBSTACLE_SCAN_MAX: f32 = 3.0;
const MIN_WALL_THICKNESS: f32 = 0.2;

/// Solid block of world geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    pub bounds: Aabb,
    pub is_floor: bool,
}

/// Navigation node; `neighbors` are indices into the world's waypoint list.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub position: Vec3,
    pub neighbors: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub yaw: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupSpawn {
    pub kind: WeaponKind,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSpawn {
    pub kind: VehicleKind,
    pub position: Vec3,
    pub yaw: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
}

#[derive(Debug, Clone)]
pub struct World {
    volumes: Vec<Volume>,
    waypoints: Vec<Waypoint>,
    spawns: Vec<SpawnPoint>,
    pickups: Vec<PickupSpawn>,
    vehicles: Vec<VehicleSpawn>,
    flag_bases: [Option<Vec3>; 2],
    hazard_spawns: Vec<Vec3>,
    /// Half-extent of the playable square on X and Z.
    bound: f32,
}

impl World {
    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn spawns(&self) -> &[SpawnPoint] {
        &self.spawns
    }

    pub fn pickup_spawns(&self) -> &[PickupSpawn] {
        &self.pickups
    }

    pub fn vehicle_spawns(&self) -> &[VehicleSpawn] {
        &self.vehicles
    }

    /// Capture base for `team`, if the map has one.
    pub fn flag_base(&self, team: u8) -> Option<Vec3> {
        self.flag_bases[usize::from(team.min(1))]
    }

    pub fn hazard_spawns(&self) -> &[Vec3] {
        &self.hazard_spawns
    }

    pub fn bound(&self) -> f32 {
        self.bound
    }

    fn blocked(&self, probe: &Aabb) -> bool {
        self.volumes.iter().any(|v| probe.intersects(&v.bounds))
    }

    /// True when a thin slab around the feet touches geometry or the feet are
    /// at the ground plane.
    pub fn is_on_ground(&self, pos: Vec3, radius: f32, _height: f32) -> bool {
        let feet = Aabb {
            min: Vec3::new(pos.x - radius, pos.y - GROUND_PROBE, pos.z - radius),
            max: Vec3::new(pos.x + radius, pos.y + GROUND_PROBE, pos.z + radius),
        };
        self.blocked(&feet) || pos.y <= GROUND_PROBE
    }

    /// Pushes a body at `new_pos` out of every overlapping volume along its
    /// axis of least penetration, then clamps it into the playable area.
    ///
    /// Discrete and order-dependent; `_old_pos` is accepted for callers that
    /// already have it but the resolver only looks at the proposal.
    pub fn resolve_collision(&self, _old_pos: Vec3, new_pos: Vec3, radius: f32, height: f32) -> Vec3 {
        let mut resolved = new_pos;

        for _ in 0..COLLISION_PASSES {
            let mut collided = false;
            let mut body = Aabb::body(resolved, radius, height);

            for v in &self.volumes {
                let b = &v.bounds;
                if !body.intersects(b) {
                    continue;
                }

                let push_neg = body.max - b.min;
                let push_pos = b.max - body.min;
                let least = push_neg.min(push_pos);

                if least.x < least.y && least.x < least.z {
                    resolved.x += if push_neg.x < push_pos.x { -push_neg.x } else { push_pos.x };
                } else if least.y < least.z {
                    resolved.y += if push_neg.y < push_pos.y { -push_neg.y } else { push_pos.y };
                } else {
                    resolved.z += if push_neg.z < push_pos.z { -push_neg.z } else { push_pos.z };
                }
                collided = true;
                body = Aabb::body(resolved, radius, height);
            }

            if !collided {
                break;
            }
        }

        self.clamp_to_bounds(resolved)
    }

    /// Keeps a position inside the playable square and above the floor.
    pub fn clamp_to_bounds(&self, mut pos: Vec3) -> Vec3 {
        pos.x = pos.x.clamp(-self.bound, self.bound);
        pos.z = pos.z.clamp(-self.bound, self.bound);
        pos.y = pos.y.max(0.0);
        pos
    }

    /// Nearest solid volume hit along `dir` within `max_dist`.
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<RayHit> {
        nearest_hit(origin, dir, max_dist, self.volumes.iter().map(|v| ((), v.bounds)))
            .map(|((), distance)| RayHit {
                point: origin + dir * distance,
                distance,
            })
    }

    /// Nearest body hit along `dir` within `max_dist`. Callers exclude the
    /// shooter (and anything else) by filtering `bodies`.
    pub fn raycast_bodies<K>(
        &self,
        origin: Vec3,
        dir: Vec3,
        max_dist: f32,
        bodies: impl IntoIterator<Item = (K, Aabb)>,
    ) -> Option<(K, f32)> {
        nearest_hit(origin, dir, max_dist, bodies)
    }

    /// Looks for a low obstacle straight ahead and estimates its height above
    /// the feet. Returns `OBSTACLE_SCAN_MAX` when nothing clears it.
    pub fn obstacle_ahead(&self, pos: Vec3, yaw: f32, check_dist: f32) -> Option<f32> {
        let fwd = forward(yaw);
        for h in OBSTACLE_PROBES {
            let probe = pos + Vec3::new(0.0, h, 0.0);
            let Some(hit) = self.raycast(probe, fwd, check_dist) else {
                continue;
            };

            // Step back off the face and scan upward for clear air.
            let column = hit.point - fwd * 0.1;
            let mut test_h = h;
            while test_h <= OBSTACLE_SCAN_MAX {
                let center = Vec3::new(column.x, pos.y + test_h, column.z);
                let test_box = Aabb::centered(center, Vec3::new(0.1, 0.05, 0.1));
                if !self.blocked(&test_box) {
                    return Some(test_h);
                }
                test_h += OBSTACLE_SCAN_STEP;
            }
            return Some(OBSTACLE_SCAN_MAX);
        }
        None
    }

    /// Linear scan for the waypoint closest to `pos`.
    pub fn nearest_waypoint(&self, pos: Vec3) -> Option<usize> {
        self.waypoints
            .iter()
            .enumerate()
            .map(|(i, wp)| (i, wp.position.distance_squared(pos)))
            .fold(None, |best: Option<(usize, f32)>, (i, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }
}

fn nearest_hit<K>(
    origin: Vec3,
    dir: Vec3,
    max_dist: f32,
    bodies: impl IntoIterator<Item = (K, Aabb)>,
) -> Option<(K, f32)> {
    let mut best: Option<(K, f32)> = None;
    for (key, bounds) in bodies {
        let Some(t) = bounds.raycast(origin, dir) else {
            continue;
        };
        let closest = best.as_ref().map_or(max_dist, |(_, d)| *d);
        if t < closest {
            best = Some((key, t));
        }
    }
    best
}

/// Collects geometry, navigation and spawn data, then freezes it into a `World`.
#[derive(Debug, Clone)]
pub struct WorldBuilder {
    world: World,
}

impl WorldBuilder {
    pub fn new(bound: f32) -> Self {
        Self {
            world: World {
                volumes: Vec::new(),
                waypoints: Vec::new(),
                spawns: Vec::new(),
                pickups: Vec::new(),
                vehicles: Vec::new(),
                flag_bases: [None; 2],
                hazard_spawns: Vec::new(),
                bound,
            },
        }
    }

    pub fn add_volume(&mut self, a: Vec3, b: Vec3, is_floor: bool) -> &mut Self {
        self.world.volumes.push(Volume {
            bounds: Aabb::from_corners(a, b),
            is_floor,
        });
        self
    }

    /// Vertical wall between two ground points, at least 0.2 thick.
    pub fn add_wall(&mut self, x1: f32, z1: f32, x2: f32, z2: f32, height: f32, base_y: f32) -> &mut Self {
        let (min_x, mut max_x) = (x1.min(x2), x1.max(x2));
        let (min_z, mut max_z) = (z1.min(z2), z1.max(z2));
        if max_x - min_x < MIN_WALL_THICKNESS {
            max_x = min_x + MIN_WALL_THICKNESS;
        }
        if max_z - min_z < MIN_WALL_THICKNESS {
            max_z = min_z + MIN_WALL_THICKNESS;
        }
        self.add_volume(
            Vec3::new(min_x, base_y, min_z),
            Vec3::new(max_x, base_y + height, max_z),
            false,
        )
    }

    /// Box building of `stories` floors with a doorway in the front wall on
    /// the ground floor and a flat roof.
    pub fn add_building(&mut self, x: f32, z: f32, w: f32, d: f32, h: f32, stories: u32) -> &mut Self {
        let stories = stories.max(1);
        let story_h = h / stories as f32;
        let door_w = 1.5;
        let door_h = 2.2;
        let door_x = x + w * 0.35;

        for s in 0..stories {
            let base_y = s as f32 * story_h;
            self.add_volume(Vec3::new(x, base_y, z), Vec3::new(x + w, base_y + 0.1, z + d), true);

            if s == 0 {
                self.add_wall(x, z, door_x, z, story_h, base_y);
                self.add_wall(door_x + door_w, z, x + w, z, story_h, base_y);
                self.add_wall(door_x, z, door_x + door_w, z, story_h - door_h, base_y + door_h);
            } else {
                self.add_wall(x, z, x + w, z, story_h, base_y);
            }
            self.add_wall(x, z + d, x + w, z + d, story_h, base_y);
            self.add_wall(x, z, x, z + d, story_h, base_y);
            self.add_wall(x + w, z, x + w, z + d, story_h, base_y);
        }

        self.add_volume(Vec3::new(x, h, z), Vec3::new(x + w, h + 0.2, z + d), true)
    }

    pub fn add_waypoint(&mut self, position: Vec3) -> usize {
        self.world.waypoints.push(Waypoint {
            position,
            neighbors: Vec::new(),
        });
        self.world.waypoints.len() - 1
    }

    /// Undirected edge. Self-links, duplicates and unknown indices are ignored.
    pub fn link(&mut self, a: usize, b: usize) -> &mut Self {
        let n = self.world.waypoints.len();
        if a == b || a >= n || b >= n || self.world.waypoints[a].neighbors.contains(&b) {
            return self;
        }
        self.world.waypoints[a].neighbors.push(b);
        self.world.waypoints[b].neighbors.push(a);
        self
    }

    pub fn add_spawn(&mut self, position: Vec3, yaw: f32) -> &mut Self {
        self.world.spawns.push(SpawnPoint { position, yaw });
        self
    }

    pub fn add_pickup(&mut self, kind: WeaponKind, position: Vec3) -> &mut Self {
        self.world.pickups.push(PickupSpawn { kind, position });
        self
    }

    pub fn add_vehicle_spawn(&mut self, kind: VehicleKind, position: Vec3, yaw: f32) -> &mut Self {
        self.world.vehicles.push(VehicleSpawn { kind, position, yaw });
        self
    }

    pub fn set_flag_base(&mut self, team: u8, position: Vec3) -> &mut Self {
        self.world.flag_bases[usize::from(team.min(1))] = Some(position);
        self
    }

    pub fn add_hazard_spawn(&mut self, position: Vec3) -> &mut Self {
        self.world.hazard_spawns.push(position);
        self
    }

    pub fn build(self) -> World {
        self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn world_with(volumes: &[(Vec3, Vec3)]) -> World {
        let mut b = WorldBuilder::new(54.5);
        for (lo, hi) in volumes {
            b.add_volume(*lo, *hi, false);
        }
        b.build()
    }

    fn penetration(world: &World, pos: Vec3, radius: f32, height: f32) -> f32 {
        let body = Aabb::body(pos, radius, height);
        world
            .volumes()
            .iter()
            .filter(|v| body.intersects(&v.bounds))
            .map(|v| {
                let a = body.max - v.bounds.min;
                let b = v.bounds.max - body.min;
                a.min(b).min_element()
            })
            .fold(0.0, f32::max)
    }

    #[test]
    fn empty_world_never_hits() {
        let world = world_with(&[]);
        for dir in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 1.0, 1.0).normalize()] {
            assert!(world.raycast(Vec3::ZERO, dir, 1000.0).is_none());
        }
    }

    #[test]
    fn raycast_reports_distance_to_wall_ahead() {
        let world = world_with(&[(Vec3::new(-2.0, 0.0, 12.5), Vec3::new(2.0, 3.0, 13.0))]);
        let hit = world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 100.0).expect("hit");
        assert!((hit.distance - 12.5).abs() < EPS);
        assert!((hit.point.z - 12.5).abs() < EPS);
        assert!(world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 10.0).is_none());
    }

    #[test]
    fn ground_plane_and_floors_count_as_ground() {
        let world = world_with(&[(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0))]);
        assert!(world.is_on_ground(Vec3::new(10.0, 0.0, 10.0), 0.4, 1.8));
        assert!(world.is_on_ground(Vec3::new(0.0, 1.0, 0.0), 0.4, 1.8));
        assert!(!world.is_on_ground(Vec3::new(10.0, 3.0, 10.0), 0.4, 1.8));
    }

    #[test]
    fn resolution_pushes_out_along_least_penetration() {
        let world = world_with(&[(Vec3::new(1.0, 0.0, -5.0), Vec3::new(2.0, 3.0, 5.0))]);
        // Body edge reaches x = 1.1, so the cheapest way out is -0.1 on X.
        let resolved = world.resolve_collision(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.7, 0.0, 0.0), 0.4, 1.8);
        assert!((resolved.x - 0.6).abs() < EPS);
        assert!((resolved.z - 0.0).abs() < EPS);
        assert!(penetration(&world, resolved, 0.4, 1.8) < EPS);
    }

    #[test]
    fn resolution_leaves_no_deep_penetration_in_a_corner() {
        let world = world_with(&[
            (Vec3::new(1.0, 0.0, -5.0), Vec3::new(2.0, 3.0, 5.0)),
            (Vec3::new(-5.0, 0.0, 1.0), Vec3::new(5.0, 3.0, 2.0)),
            (Vec3::new(-5.0, -0.5, -5.0), Vec3::new(5.0, 0.0, 5.0)),
        ]);
        for step in 0..20 {
            let offset = step as f32 * 0.01;
            let proposal = Vec3::new(0.65 + offset, 0.02, 0.65 + offset);
            let resolved = world.resolve_collision(Vec3::ZERO, proposal, 0.4, 1.8);
            assert!(penetration(&world, resolved, 0.4, 1.8) < EPS, "step {step}: {resolved:?}");
        }
    }

    #[test]
    fn resolution_always_clamps_to_world_bounds() {
        let world = world_with(&[]);
        let resolved = world.resolve_collision(Vec3::ZERO, Vec3::new(100.0, -3.0, -80.0), 0.4, 1.8);
        assert_eq!(resolved, Vec3::new(54.5, 0.0, -54.5));
    }

    #[test]
    fn obstacle_probe_measures_low_crate() {
        let world = world_with(&[(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 0.7, 2.0))]);
        let h = world.obstacle_ahead(Vec3::ZERO, 0.0, 1.5).expect("crate ahead");
        assert!(h > 0.7 && h < 1.2, "height {h}");
        assert!(world.obstacle_ahead(Vec3::ZERO, std::f32::consts::PI, 1.5).is_none());
    }

    #[test]
    fn nearest_waypoint_scans_all_nodes() {
        let mut b = WorldBuilder::new(54.5);
        assert!(b.clone().build().nearest_waypoint(Vec3::ZERO).is_none());
        b.add_waypoint(Vec3::new(10.0, 0.0, 0.0));
        b.add_waypoint(Vec3::new(2.0, 0.0, 1.0));
        b.add_waypoint(Vec3::new(-5.0, 0.0, 0.0));
        assert_eq!(b.build().nearest_waypoint(Vec3::ZERO), Some(1));
    }

    #[test]
    fn links_are_symmetric_and_deduplicated() {
        let mut b = WorldBuilder::new(54.5);
        let a = b.add_waypoint(Vec3::ZERO);
        let c = b.add_waypoint(Vec3::X);
        b.link(a, c).link(c, a).link(a, a);
        let world = b.build();
        assert_eq!(world.waypoints()[a].neighbors, vec![c]);
        assert_eq!(world.waypoints()[c].neighbors, vec![a]);
    }
}
