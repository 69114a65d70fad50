// Roaming tornados: wander, phase cycling and periodic damage pulses.

use crate::domain::geometry::forward;
use crate::domain::state::Tornado;
use crate::domain::tuning::HazardTuning;
use crate::domain::world::World;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// One tornado per hazard spawn. The first starts active; the rest wait out a
/// staggered dormant phase.
pub fn spawn_tornados<R: Rng + ?Sized>(world: &World, tuning: &HazardTuning, rng: &mut R) -> Vec<Tornado> {
    world
        .hazard_spawns()
        .iter()
        .enumerate()
        .map(|(i, &position)| Tornado {
            position,
            heading: rng.random_range(0.0..TAU),
            radius: tuning.radius,
            rotation: 0.0,
            active: i == 0,
            phase_timer: if i == 0 {
                tuning.active_seconds
            } else {
                tuning.dormant_seconds * (i as f32)
            },
            pulse_timer: tuning.pulse_seconds,
        })
        .collect()
}

/// Advances one tornado. Returns true when an active tornado pulses damage
/// this tick.
pub fn tick_tornado<R: Rng + ?Sized>(
    tornado: &mut Tornado,
    world: &World,
    tuning: &HazardTuning,
    rng: &mut R,
    dt: f32,
) -> bool {
    tornado.phase_timer -= dt;

    if !tornado.active {
        if tornado.phase_timer <= 0.0 {
            let spawns = world.hazard_spawns();
            if !spawns.is_empty() {
                tornado.position = spawns[rng.random_range(0..spawns.len())];
            }
            tornado.heading = rng.random_range(0.0..TAU);
            tornado.active = true;
            tornado.phase_timer = tuning.active_seconds;
            tornado.pulse_timer = tuning.pulse_seconds;
        }
        return false;
    }

    if tornado.phase_timer <= 0.0 {
        tornado.active = false;
        tornado.phase_timer = tuning.dormant_seconds;
        return false;
    }

    tornado.rotation = (tornado.rotation + tuning.spin_rate * dt) % TAU;
    tornado.heading += rng.random_range(-tuning.wander_rate..=tuning.wander_rate) * dt;

    let mut pos = tornado.position + forward(tornado.heading) * tuning.speed * dt;
    let bound = world.bound();
    if pos.x.abs() > bound {
        // Mirror the X component of the heading.
        tornado.heading = -tornado.heading;
        pos.x = pos.x.clamp(-bound, bound);
    }
    if pos.z.abs() > bound {
        // Mirror the Z component of the heading.
        tornado.heading = PI - tornado.heading;
        pos.z = pos.z.clamp(-bound, bound);
    }
    tornado.position = pos;

    tornado.pulse_timer -= dt;
    if tornado.pulse_timer <= 0.0 {
        tornado.pulse_timer += tuning.pulse_seconds;
        return true;
    }
    false
}

/// Horizontal containment test for a pulse.
pub fn in_funnel(tornado: &Tornado, pos: Vec3) -> bool {
    let d = pos - tornado.position;
    d.x * d.x + d.z * d.z <= tornado.radius * tornado.radius
}

/// Velocity given to an on-foot player caught in a pulse.
pub fn fling_velocity(tornado: &Tornado, pos: Vec3, tuning: &HazardTuning) -> Vec3 {
    let outward = Vec3::new(pos.x - tornado.position.x, 0.0, pos.z - tornado.position.z).normalize_or_zero();
    outward * tuning.fling + Vec3::new(0.0, tuning.lift, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::world::WorldBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f32 = 1.0 / 64.0;

    fn world() -> World {
        let mut b = WorldBuilder::new(54.5);
        b.add_hazard_spawn(Vec3::new(10.0, 0.0, 10.0));
        b.add_hazard_spawn(Vec3::new(-10.0, 0.0, -10.0));
        b.build()
    }

    #[test]
    fn pulses_every_half_second_while_active() {
        let world = world();
        let tuning = HazardTuning::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut tornados = spawn_tornados(&world, &tuning, &mut rng);
        assert!(tornados[0].active);
        assert!(!tornados[1].active);

        let pulses = (0..64 * 2)
            .filter(|_| tick_tornado(&mut tornados[0], &world, &tuning, &mut rng, DT))
            .count();
        assert_eq!(pulses, 4);
    }

    #[test]
    fn phases_alternate_and_stay_in_bounds() {
        let world = world();
        let tuning = HazardTuning::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut t = spawn_tornados(&world, &tuning, &mut rng).remove(0);

        for _ in 0..(64.0 * tuning.active_seconds) as usize + 1 {
            tick_tornado(&mut t, &world, &tuning, &mut rng, DT);
            assert!(t.position.x.abs() <= world.bound() && t.position.z.abs() <= world.bound());
        }
        assert!(!t.active);

        for _ in 0..(64.0 * tuning.dormant_seconds) as usize + 1 {
            assert!(!tick_tornado(&mut t, &world, &tuning, &mut rng, DT));
        }
        assert!(t.active);
    }

    #[test]
    fn fling_lifts_and_pushes_outward() {
        let tuning = HazardTuning::default();
        let t = Tornado {
            position: Vec3::ZERO,
            heading: 0.0,
            radius: 15.0,
            rotation: 0.0,
            active: true,
            phase_timer: 1.0,
            pulse_timer: 0.5,
        };
        assert!(in_funnel(&t, Vec3::new(10.0, 5.0, 0.0)));
        assert!(!in_funnel(&t, Vec3::new(16.0, 0.0, 0.0)));
        let v = fling_velocity(&t, Vec3::new(10.0, 0.0, 0.0), &tuning);
        assert_eq!(v, Vec3::new(tuning.fling, tuning.lift, 0.0));
    }
}
