// Default "Arctic" map: four buildings around a mid plaza, linked by
// corridors, with two sniper towers in opposite corners.

use crate::domain::World;
use crate::domain::WorldBuilder;
use crate::domain::tuning::{VehicleKind, WeaponKind};
use glam::Vec3;
use std::f32::consts::PI;

/// Playable half-extent; the boundary walls stand just outside it.
pub const WORLD_BOUND: f32 = 54.5;
const OUTER_WALL: f32 = 55.0;
const SPAWN_Y: f32 = 0.1;

pub fn arctic() -> World {
    let mut b = WorldBuilder::new(WORLD_BOUND);

    b.add_volume(Vec3::new(-60.0, -0.5, -60.0), Vec3::new(60.0, 0.0, 60.0), true);

    add_structures(&mut b);
    add_cover(&mut b);
    add_spawns(&mut b);
    add_waypoints(&mut b);

    b.add_pickup(WeaponKind::Shotgun, Vec3::new(0.0, 0.5, 0.0))
        .add_pickup(WeaponKind::Rifle, Vec3::new(-20.0, 0.5, -20.0))
        .add_pickup(WeaponKind::Rifle, Vec3::new(15.0, 0.5, 20.0))
        .add_pickup(WeaponKind::Sniper, Vec3::new(-32.5, 5.7, -32.5))
        .add_pickup(WeaponKind::Sniper, Vec3::new(32.5, 5.7, 32.5))
        .add_pickup(WeaponKind::Shotgun, Vec3::new(-5.0, 0.5, 20.0))
        .add_pickup(WeaponKind::Rifle, Vec3::new(5.0, 0.5, -20.0))
        .add_pickup(WeaponKind::Shotgun, Vec3::new(15.0, 0.5, -20.0));

    b.add_vehicle_spawn(VehicleKind::Jeep, Vec3::new(-45.0, SPAWN_Y, -12.0), 0.0)
        .add_vehicle_spawn(VehicleKind::Jeep, Vec3::new(45.0, SPAWN_Y, 12.0), PI)
        .add_vehicle_spawn(VehicleKind::Tank, Vec3::new(0.0, SPAWN_Y, -42.0), 0.0)
        .add_vehicle_spawn(VehicleKind::Tank, Vec3::new(0.0, SPAWN_Y, 42.0), PI)
        .add_vehicle_spawn(VehicleKind::Helicopter, Vec3::new(-45.0, SPAWN_Y, 45.0), PI * 0.75);

    b.set_flag_base(0, Vec3::new(-45.0, SPAWN_Y, 0.0))
        .set_flag_base(1, Vec3::new(45.0, SPAWN_Y, 0.0));

    b.add_hazard_spawn(Vec3::new(-40.0, 0.0, 40.0))
        .add_hazard_spawn(Vec3::new(40.0, 0.0, -40.0))
        .add_hazard_spawn(Vec3::new(25.0, 0.0, 0.0));

    b.build()
}

fn add_stairs(b: &mut WorldBuilder, x: f32, z: f32, w: f32, d: f32, steps: u32, rise: f32) {
    for i in 0..steps {
        let y = i as f32 * rise;
        b.add_volume(Vec3::new(x, y, z), Vec3::new(x + w, y + rise, z + d), false);
    }
}

fn add_tower(b: &mut WorldBuilder, x: f32, z: f32, ladder_x: f32) {
    for (px, pz) in [(x, z), (x + 4.5, z), (x, z + 4.5), (x + 4.5, z + 4.5)] {
        b.add_volume(Vec3::new(px, 0.0, pz), Vec3::new(px + 0.5, 5.0, pz + 0.5), false);
    }
    b.add_volume(Vec3::new(x, 5.0, z), Vec3::new(x + 5.0, 5.2, z + 5.0), true);
    // Railing on three sides; the ladder side stays open.
    b.add_volume(Vec3::new(x, 5.2, z), Vec3::new(x + 5.0, 6.0, z + 0.15), false)
        .add_volume(Vec3::new(x, 5.2, z + 4.85), Vec3::new(x + 5.0, 6.0, z + 5.0), false);
    let (rail_lo, rail_hi) = if ladder_x > x { (x, x + 0.15) } else { (x + 4.85, x + 5.0) };
    b.add_volume(Vec3::new(rail_lo, 5.2, z), Vec3::new(rail_hi, 6.0, z + 5.0), false);

    for i in 0..10 {
        let y = i as f32 * 0.5;
        b.add_volume(
            Vec3::new(ladder_x, y, z + 2.0),
            Vec3::new(ladder_x + 0.8, y + 0.3, z + 3.0),
            false,
        );
    }
}

fn add_structures(b: &mut WorldBuilder) {
    b.add_building(-25.0, -25.0, 12.0, 10.0, 6.0, 2);
    add_stairs(b, -24.5, -24.5, 1.5, 1.0, 6, 0.5);
    b.add_building(10.0, -25.0, 14.0, 10.0, 3.5, 1);
    b.add_building(-25.0, 15.0, 12.0, 10.0, 3.5, 1);
    b.add_building(10.0, 15.0, 14.0, 10.0, 6.0, 2);
    add_stairs(b, 22.5, 16.0, 1.5, 1.0, 6, 0.5);

    // North and south corridors, then the spine joining them.
    for (z1, z2) in [(-22.0, -18.0), (18.0, 22.0)] {
        b.add_volume(Vec3::new(-13.0, 0.0, z1), Vec3::new(10.0, 0.1, z2), true)
            .add_wall(-13.0, z1, 10.0, z1, 3.0, 0.0)
            .add_wall(-13.0, z2, 10.0, z2, 3.0, 0.0)
            .add_volume(Vec3::new(-13.0, 2.9, z1), Vec3::new(10.0, 3.0, z2), true);
    }
    b.add_volume(Vec3::new(-3.0, 0.0, -18.0), Vec3::new(3.0, 0.1, 18.0), true)
        .add_wall(-3.0, -18.0, -3.0, 18.0, 3.0, 0.0)
        .add_wall(3.0, -18.0, 3.0, 18.0, 3.0, 0.0)
        .add_volume(Vec3::new(-3.0, 2.9, -18.0), Vec3::new(3.0, 3.0, 18.0), true);

    add_tower(b, -35.0, -35.0, -30.4);
    add_tower(b, 30.0, 30.0, 29.6);

    let o = OUTER_WALL;
    b.add_wall(-o, -o, o, -o, 4.0, 0.0)
        .add_wall(-o, o, o, o, 4.0, 0.0)
        .add_wall(-o, -o, -o, o, 4.0, 0.0)
        .add_wall(o, -o, o, o, 4.0, 0.0);
}

fn add_cover(b: &mut WorldBuilder) {
    let blocks: [([f32; 3], [f32; 3]); 17] = [
        // mid plaza
        ([-8.0, 0.0, -5.0], [8.0, 0.05, 5.0]),
        ([-6.0, 0.0, -1.0], [-4.5, 1.5, 1.0]),
        ([4.5, 0.0, -1.0], [6.0, 1.5, 1.0]),
        ([-1.0, 0.0, 3.0], [1.0, 1.0, 4.5]),
        ([-1.0, 0.0, -4.5], [1.0, 1.0, -3.0]),
        // crates inside buildings
        ([12.0, 0.0, -23.0], [13.5, 1.2, -22.0]),
        ([18.0, 0.0, -20.0], [19.5, 1.0, -19.0]),
        ([-22.0, 0.0, 18.0], [-20.5, 1.2, 19.5]),
        // snow mounds
        ([-40.0, 0.0, 5.0], [-37.0, 0.8, 8.0]),
        ([35.0, 0.0, -10.0], [38.0, 0.7, -7.0]),
        ([-15.0, 0.0, 35.0], [-12.0, 0.6, 38.0]),
        ([15.0, 0.0, -35.0], [18.0, 0.9, -32.0]),
        // barrels
        ([-30.0, 0.0, 0.0], [-29.0, 1.2, 1.0]),
        ([-29.5, 0.0, 1.2], [-28.5, 1.2, 2.2]),
        ([28.0, 0.0, -2.0], [29.0, 1.2, -1.0]),
        // crates outside
        ([-28.0, 0.0, -15.0], [-26.5, 1.5, -13.5]),
        ([25.0, 0.0, 12.0], [26.5, 1.5, 13.5]),
    ];
    for (lo, hi) in blocks {
        // The plaza slab is walkable floor; everything else is cover.
        let is_floor = hi[1] < 0.1;
        b.add_volume(Vec3::from_array(lo), Vec3::from_array(hi), is_floor);
    }
}

fn add_spawns(b: &mut WorldBuilder) {
    let spawns = [
        (-20.0, -20.0, 0.8),
        (-20.0, -17.0, 0.5),
        (15.0, -20.0, -0.8),
        (20.0, -20.0, -0.5),
        (-20.0, 20.0, 2.3),
        (-20.0, 17.0, 2.0),
        (15.0, 20.0, -2.3),
        (20.0, 20.0, -2.0),
        (0.0, 0.0, 0.0),
        (5.0, -5.0, 1.5),
    ];
    for (x, z, yaw) in spawns {
        b.add_spawn(Vec3::new(x, SPAWN_Y, z), yaw);
    }
}

fn add_waypoints(b: &mut WorldBuilder) {
    let mut wp = |x: f32, y: f32, z: f32| b.add_waypoint(Vec3::new(x, y, z));

    let mid = wp(0.0, 0.1, 0.0);
    let mid_n = wp(0.0, 0.1, -10.0);
    let mid_s = wp(0.0, 0.1, 10.0);
    let mid_w = wp(-8.0, 0.1, 0.0);
    let mid_e = wp(8.0, 0.1, 0.0);

    let corr_na = wp(-10.0, 0.1, -20.0);
    let corr_nb = wp(8.0, 0.1, -20.0);
    let corr_nm = wp(0.0, 0.1, -20.0);
    let corr_sc = wp(-10.0, 0.1, 20.0);
    let corr_sd = wp(8.0, 0.1, 20.0);
    let corr_sm = wp(0.0, 0.1, 20.0);

    let bld_a = wp(-19.0, 0.1, -20.0);
    let bld_b = wp(17.0, 0.1, -20.0);
    let bld_c = wp(-19.0, 0.1, 20.0);
    let bld_d = wp(17.0, 0.1, 20.0);

    let tower_a = wp(-32.5, 5.3, -32.5);
    let tower_a_base = wp(-30.0, 0.1, -32.5);
    let tower_b = wp(32.5, 5.3, 32.5);
    let tower_b_base = wp(35.0, 0.1, 32.5);

    let out_nw = wp(-40.0, 0.1, -30.0);
    let out_ne = wp(40.0, 0.1, -30.0);
    let out_sw = wp(-40.0, 0.1, 30.0);
    let out_se = wp(40.0, 0.1, 30.0);

    let bld_a_upper = wp(-20.0, 3.1, -20.0);
    let bld_d_upper = wp(17.0, 3.1, 20.0);
    let crate_w = wp(-5.25, 1.6, 0.0);
    let crate_e = wp(5.25, 1.6, 0.0);
    let stairs_a = wp(-23.5, 0.1, -24.0);
    let stairs_d = wp(23.0, 0.1, 16.5);

    let nw = wp(-35.0, 0.1, -15.0);
    let ne = wp(35.0, 0.1, -15.0);
    let sw = wp(-35.0, 0.1, 15.0);
    let se = wp(35.0, 0.1, 15.0);

    let edges = [
        (mid, mid_n),
        (mid, mid_s),
        (mid, mid_w),
        (mid, mid_e),
        (mid_n, corr_nm),
        (mid_s, corr_sm),
        (corr_na, corr_nm),
        (corr_nm, corr_nb),
        (corr_sc, corr_sm),
        (corr_sm, corr_sd),
        (corr_na, bld_a),
        (corr_nb, bld_b),
        (corr_sc, bld_c),
        (corr_sd, bld_d),
        (tower_a_base, tower_a),
        (tower_a_base, out_nw),
        (tower_b_base, tower_b),
        (tower_b_base, out_se),
        (bld_a, out_nw),
        (bld_b, out_ne),
        (bld_c, out_sw),
        (bld_d, out_se),
        (out_nw, mid_w),
        (out_ne, mid_e),
        (out_sw, mid_w),
        (out_se, mid_e),
        (mid_w, corr_na),
        (mid_w, corr_sc),
        (mid_e, corr_nb),
        (mid_e, corr_sd),
        (bld_a, bld_a_upper),
        (bld_d, bld_d_upper),
        (mid_w, crate_w),
        (mid_e, crate_e),
        (crate_w, mid),
        (crate_e, mid),
        (bld_a, stairs_a),
        (stairs_a, bld_a_upper),
        (bld_d, stairs_d),
        (stairs_d, bld_d_upper),
        (nw, out_nw),
        (nw, mid_w),
        (nw, bld_a),
        (ne, out_ne),
        (ne, mid_e),
        (ne, bld_b),
        (sw, out_sw),
        (sw, mid_w),
        (sw, bld_c),
        (se, out_se),
        (se, mid_e),
        (se, bld_d),
        (tower_a_base, bld_a),
        (tower_b_base, bld_d),
    ];
    for (a, c) in edges {
        b.link(a, c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pathfinding::find_path;
    use crate::domain::tuning::PlayerTuning;

    #[test]
    fn arctic_has_full_content() {
        let world = arctic();
        assert_eq!(world.spawns().len(), 10);
        assert_eq!(world.pickup_spawns().len(), 8);
        assert_eq!(world.vehicle_spawns().len(), 5);
        assert!(world.flag_base(0).is_some());
        assert!(world.flag_base(1).is_some());
        assert!(!world.hazard_spawns().is_empty());
    }

    #[test]
    fn waypoint_graph_is_connected() {
        let world = arctic();
        let wps = world.waypoints();
        for goal in 1..wps.len() {
            assert!(!find_path(wps, 0, goal).is_empty(), "waypoint {goal} unreachable");
        }
    }

    #[test]
    fn content_lies_inside_the_playable_area() {
        let world = arctic();
        let inside = |p: Vec3| p.x.abs() <= WORLD_BOUND && p.z.abs() <= WORLD_BOUND;
        assert!(world.spawns().iter().all(|s| inside(s.position)));
        assert!(world.pickup_spawns().iter().all(|p| inside(p.position)));
        assert!(world.waypoints().iter().all(|w| inside(w.position)));
    }

    #[test]
    fn spawn_bodies_are_clear_of_geometry() {
        let world = arctic();
        let tuning = PlayerTuning::default();
        for spawn in world.spawns() {
            let p = spawn.position;
            let resolved = world.resolve_collision(p, p, tuning.radius, tuning.height);
            assert!(resolved.distance(p) < 1e-3, "spawn {p} is pushed to {resolved}");
        }
    }
}
