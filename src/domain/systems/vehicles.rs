// Vehicle driving, cannon fire, idle drift and wreck/respawn cycle.

use crate::domain::geometry::{Aabb, aim_direction, forward};
use crate::domain::input::{InputState, Keys};
use crate::domain::state::Vehicle;
use crate::domain::store::{EntityStore, Handle};
use crate::domain::tuning::vehicle::{ENTER_RANGE, GROUND_CLEARANCE, RUN_OVER_LIFT, RUN_OVER_PUSH, RUN_OVER_SPEED};
use crate::domain::world::World;
use glam::Vec3;

/// Driverless vehicles keep this fraction of their velocity per tick.
const IDLE_DECAY: f32 = 0.95;
const IDLE_STOP_SQ: f32 = 0.01;
/// Rotor spin while driven, radians per second.
const ROTOR_SPIN: f32 = 15.0;
/// Cannon muzzle: height above the hull and distance along the barrel.
const MUZZLE_HEIGHT: f32 = 2.5;
const MUZZLE_LENGTH: f32 = 3.0;
/// Seat height of a driver above the vehicle origin.
pub const SEAT_HEIGHT: f32 = 1.0;
/// Sideways distance at which a driver is dropped off.
const EXIT_OFFSET: f32 = 3.0;
/// Run-over damage per unit of speed.
const RUN_OVER_DAMAGE_SCALE: f32 = 3.0;
/// Half extents of the hit box every vehicle shares.
const HULL_HALF: Vec3 = Vec3::new(1.5, 1.0, 2.5);

/// Cannon round fired by a driven vehicle this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannonShot {
    pub origin: Vec3,
    pub dir: Vec3,
    pub damage: i32,
    pub range: f32,
}

/// Nearest free vehicle strictly within enter range of `pos`.
pub fn nearest_free(vehicles: &EntityStore<Vehicle>, pos: Vec3) -> Option<Handle<Vehicle>> {
    let mut best: Option<(Handle<Vehicle>, f32)> = None;
    for (h, v) in vehicles.iter() {
        if !v.is_free() {
            continue;
        }
        let d = v.position.distance(pos);
        let limit = best.map_or(ENTER_RANGE, |(_, bd)| bd);
        if d < limit {
            best = Some((h, d));
        }
    }
    best.map(|(h, _)| h)
}

/// Where a driver lands when leaving `vehicle`.
pub fn exit_position(vehicle: &Vehicle, world: &World, radius: f32, height: f32) -> Vec3 {
    let side = Vec3::new(vehicle.yaw.cos(), 0.0, -vehicle.yaw.sin());
    let mut pos = vehicle.position + side * EXIT_OFFSET;
    if !vehicle.kind.definition().airborne {
        pos.y = GROUND_CLEARANCE;
    }
    world.resolve_collision(vehicle.position, pos, radius, height)
}

/// Seat position for the driver of `vehicle`.
pub fn seat_position(vehicle: &Vehicle) -> Vec3 {
    vehicle.position + Vec3::new(0.0, SEAT_HEIGHT, 0.0)
}

/// Hit box for shots, centred above the vehicle origin.
pub fn hull(vehicle: &Vehicle) -> Aabb {
    Aabb::centered(vehicle.position + Vec3::new(0.0, HULL_HALF.y, 0.0), HULL_HALF)
}

/// Damage dealt to an on-foot player touched at `speed`, if fast enough.
pub fn run_over_damage(speed: f32) -> Option<i32> {
    (speed > RUN_OVER_SPEED).then(|| (speed * RUN_OVER_DAMAGE_SCALE) as i32)
}

/// Velocity given to a player who survives being run over.
pub fn run_over_knockback(vehicle_velocity: Vec3) -> Vec3 {
    vehicle_velocity * RUN_OVER_PUSH + Vec3::new(0.0, RUN_OVER_LIFT, 0.0)
}

/// Applies a driver's input for one tick. Returns a cannon round if fired.
pub fn drive(vehicle: &mut Vehicle, input: &InputState, world: &World, dt: f32) -> Option<CannonShot> {
    let def = vehicle.kind.definition();

    if input.held(Keys::LEFT) {
        vehicle.yaw += def.turn_rate * dt;
    }
    if input.held(Keys::RIGHT) {
        vehicle.yaw -= def.turn_rate * dt;
    }

    let mut throttle = 0.0;
    if input.held(Keys::FORWARD) {
        throttle = def.speed;
    }
    if input.held(Keys::BACK) {
        throttle = -def.speed * 0.5;
    }
    vehicle.velocity = forward(vehicle.yaw) * throttle;

    if def.airborne {
        let mut climb = 0.0;
        if input.held(Keys::JUMP) {
            climb += def.climb_rate;
        }
        if input.held(Keys::CROUCH) {
            climb -= def.climb_rate;
        }
        vehicle.velocity.y = climb;
        vehicle.pitch = -input.move_axes().0 * 0.15;
        vehicle.rotor_angle = (vehicle.rotor_angle + ROTOR_SPIN * dt) % std::f32::consts::TAU;
    } else if def.cannon_damage > 0 && input.is_finite() {
        vehicle.turret_yaw = input.yaw - vehicle.yaw;
    }

    integrate(vehicle, world, dt);

    if vehicle.fire_cooldown > 0.0 {
        vehicle.fire_cooldown -= dt;
    }
    if !input.held(Keys::SHOOT) || def.cannon_damage <= 0 || vehicle.fire_cooldown > 0.0 {
        return None;
    }

    vehicle.fire_cooldown = def.cannon_rate;
    let dir = aim_direction(vehicle.yaw + vehicle.turret_yaw, input.pitch);
    Some(CannonShot {
        origin: vehicle.position + Vec3::new(0.0, MUZZLE_HEIGHT, 0.0) + dir * MUZZLE_LENGTH,
        dir,
        damage: def.cannon_damage,
        range: def.cannon_range,
    })
}

/// Driverless tick: ground vehicles coast to a stop, helicopters settle.
pub fn idle(vehicle: &mut Vehicle, world: &World, dt: f32) {
    let def = vehicle.kind.definition();
    vehicle.velocity.x *= IDLE_DECAY;
    vehicle.velocity.z *= IDLE_DECAY;
    vehicle.velocity.y = if def.airborne && vehicle.position.y > GROUND_CLEARANCE {
        -def.climb_rate
    } else {
        0.0
    };
    if vehicle.velocity.length_squared() < IDLE_STOP_SQ {
        vehicle.velocity = Vec3::ZERO;
    }
    if vehicle.fire_cooldown > 0.0 {
        vehicle.fire_cooldown -= dt;
    }
    integrate(vehicle, world, dt);
}

/// Counts down a wreck. Returns true on the tick the vehicle respawns.
pub fn tick_wreck(vehicle: &mut Vehicle, dt: f32) -> bool {
    vehicle.respawn_timer -= dt;
    if vehicle.respawn_timer <= 0.0 {
        vehicle.respawn();
        return true;
    }
    false
}

fn integrate(vehicle: &mut Vehicle, world: &World, dt: f32) {
    let def = vehicle.kind.definition();
    let mut pos = vehicle.position + vehicle.velocity * dt;
    pos.y = if def.airborne {
        pos.y.clamp(GROUND_CLEARANCE, def.ceiling)
    } else {
        GROUND_CLEARANCE
    };
    vehicle.position = world.clamp_to_bounds(pos);
}
