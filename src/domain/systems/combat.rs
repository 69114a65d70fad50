// Hitscan weapons: trigger/ammo bookkeeping, pellet tracing and damage.

use crate::domain::Player;
use crate::domain::geometry::{Aabb, aim_direction};
use crate::domain::tuning::{PlayerTuning, WeaponKind};
use crate::domain::world::World;
use glam::Vec3;
use rand::Rng;

/// Cooldown multiplier applied when a magazine is refilled.
const RELOAD_FACTOR: f32 = 3.0;

/// A trigger pull that passed cooldown and ammo checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub weapon: WeaponKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Hurt,
    Killed,
}

/// Consumes one round if the player may fire, auto-reloading an emptied
/// magazine with a longer cooldown.
pub fn try_trigger(player: &mut Player, tuning: &PlayerTuning) -> Option<Shot> {
    if !player.is_alive() || player.fire_cooldown > 0.0 || player.ammo <= 0 {
        return None;
    }

    let def = player.weapon.definition();
    if def.pellets == 0 {
        return None;
    }

    player.fire_cooldown = def.fire_rate;
    player.ammo -= 1;
    if player.ammo <= 0 {
        player.ammo = def.mag_size;
        player.fire_cooldown = def.fire_rate * RELOAD_FACTOR;
    }

    Some(Shot {
        origin: player.eye(tuning),
        yaw: player.yaw,
        pitch: player.pitch,
        weapon: player.weapon,
    })
}

/// Manual reload of a partial magazine. Returns false when nothing changed.
pub fn reload(player: &mut Player) -> bool {
    let def = player.weapon.definition();
    if player.fire_cooldown > 0.0 || player.ammo >= def.mag_size {
        return false;
    }
    player.ammo = def.mag_size;
    player.fire_cooldown = def.fire_rate * RELOAD_FACTOR;
    true
}

/// Traces every pellet of `shot` and returns the key of the nearest body each
/// pellet struck. A body only counts when it is strictly closer than the
/// nearest wall, so exact ties go to the wall.
pub fn trace_pellets<K: Copy, R: Rng + ?Sized>(
    world: &World,
    shot: &Shot,
    bodies: &[(K, Aabb)],
    rng: &mut R,
) -> Vec<K> {
    let def = shot.weapon.definition();
    let mut hits = Vec::new();

    for _ in 0..def.pellets {
        let yaw = shot.yaw + jitter(rng, def.spread);
        let pitch = shot.pitch + jitter(rng, def.spread);
        let dir = aim_direction(yaw, pitch);
        if let Some(key) = first_body_hit(world, shot.origin, dir, def.range, bodies) {
            hits.push(key);
        }
    }
    hits
}

/// Nearest body along the ray if no wall is at or before it.
pub fn first_body_hit<K: Copy>(
    world: &World,
    origin: Vec3,
    dir: Vec3,
    range: f32,
    bodies: &[(K, Aabb)],
) -> Option<K> {
    let (key, body_dist) = world.raycast_bodies(origin, dir, range, bodies.iter().copied())?;
    match world.raycast(origin, dir, range) {
        Some(wall) if wall.distance <= body_dist => None,
        _ => Some(key),
    }
}

/// Subtracts `amount` from an alive player, clamping at zero.
/// Returns `None` when the victim was not alive to begin with.
pub fn apply_damage(victim: &mut Player, amount: i32, respawn_seconds: f32) -> Option<DamageOutcome> {
    if !victim.is_alive() {
        return None;
    }
    victim.health -= amount;
    if victim.health <= 0 {
        victim.kill(respawn_seconds);
        Some(DamageOutcome::Killed)
    } else {
        Some(DamageOutcome::Hurt)
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, spread: f32) -> f32 {
    if spread > 0.0 {
        rng.random_range(-spread..=spread)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::PlayerState;
    use crate::domain::world::WorldBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn armed(weapon: WeaponKind) -> Player {
        let mut p = Player::new("shooter".into(), 0, false);
        p.spawn_at(Vec3::ZERO, 0.0);
        p.equip(weapon);
        p
    }

    #[test]
    fn trigger_respects_cooldown_and_auto_reloads() {
        let tuning = PlayerTuning::default();
        let mut p = armed(WeaponKind::Sniper);

        assert!(try_trigger(&mut p, &tuning).is_some());
        assert_eq!(p.ammo, 4);
        assert!(try_trigger(&mut p, &tuning).is_none());

        p.fire_cooldown = 0.0;
        p.ammo = 1;
        assert!(try_trigger(&mut p, &tuning).is_some());
        assert_eq!(p.ammo, 5);
        assert!((p.fire_cooldown - 1.2 * 3.0).abs() < 1e-5);
    }

    #[test]
    fn reload_refills_partial_magazine() {
        let mut p = armed(WeaponKind::Rifle);
        assert!(!reload(&mut p));
        p.ammo = 3;
        assert!(reload(&mut p));
        assert_eq!(p.ammo, 30);
    }

    #[test]
    fn rifle_hits_kill_exactly_when_health_runs_out() {
        let dmg = WeaponKind::Rifle.definition().damage;

        // 80 hp: 50, 20, then dead with the overshoot clamped away.
        let mut recon = Player::new("recon".into(), 1, false);
        recon.pending_class = Some(crate::domain::tuning::PlayerClass::Recon);
        recon.spawn_at(Vec3::ZERO, 0.0);
        assert_eq!(apply_damage(&mut recon, dmg, 3.0), Some(DamageOutcome::Hurt));
        assert_eq!(apply_damage(&mut recon, dmg, 3.0), Some(DamageOutcome::Hurt));
        assert!(recon.is_alive());
        assert_eq!(apply_damage(&mut recon, dmg, 3.0), Some(DamageOutcome::Killed));
        assert_eq!(recon.health, 0);
        assert_eq!(recon.state, PlayerState::Dead);
        assert_eq!(recon.respawn_timer, 3.0);

        // 100 hp survives three hits on 10 and dies on the fourth.
        let mut victim = Player::new("victim".into(), 1, false);
        victim.spawn_at(Vec3::ZERO, 0.0);
        for _ in 0..3 {
            assert_eq!(apply_damage(&mut victim, dmg, 3.0), Some(DamageOutcome::Hurt));
        }
        assert_eq!(victim.health, 10);
        assert_eq!(apply_damage(&mut victim, dmg, 3.0), Some(DamageOutcome::Killed));
        assert_eq!(victim.health, 0);
        assert_eq!(apply_damage(&mut victim, dmg, 3.0), None);
    }

    #[test]
    fn wall_in_front_of_body_blocks_pellet() {
        let mut b = WorldBuilder::new(54.5);
        b.add_volume(Vec3::new(-2.0, 0.0, 4.0), Vec3::new(2.0, 3.0, 4.5), false);
        let world = b.build();
        let target = Aabb::body(Vec3::new(0.0, 0.0, 10.0), 0.4, 1.8);
        let dir = Vec3::Z;
        let origin = Vec3::new(0.0, 1.6, 0.0);

        assert_eq!(first_body_hit(&world, origin, dir, 100.0, &[(7u8, target)]), None);

        let open = WorldBuilder::new(54.5).build();
        assert_eq!(first_body_hit(&open, origin, dir, 100.0, &[(7u8, target)]), Some(7));
    }

    #[test]
    fn equal_wall_and_body_distance_favors_the_wall() {
        let mut b = WorldBuilder::new(54.5);
        b.add_volume(Vec3::new(-2.0, 0.0, 5.0), Vec3::new(2.0, 3.0, 6.0), false);
        let world = b.build();
        // Body face at z = 5.0, same as the wall face.
        let target = Aabb::from_corners(Vec3::new(-0.4, 0.0, 5.0), Vec3::new(0.4, 1.8, 5.8));
        assert_eq!(first_body_hit(&world, Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 100.0, &[(1u8, target)]), None);
    }

    #[test]
    fn shotgun_traces_every_pellet() {
        let world = WorldBuilder::new(54.5).build();
        let mut rng = StdRng::seed_from_u64(7);
        let shot = Shot { origin: Vec3::new(0.0, 1.6, 0.0), yaw: 0.0, pitch: 0.0, weapon: WeaponKind::Shotgun };
        // A wide target close up catches all eight pellets.
        let wide = Aabb::from_corners(Vec3::new(-3.0, -2.0, 3.0), Vec3::new(3.0, 5.0, 4.0));
        let hits = trace_pellets(&world, &shot, &[(0u8, wide)], &mut rng);
        assert_eq!(hits.len(), 8);
    }
}
