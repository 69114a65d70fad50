// Class abilities and per-player timers.

use crate::domain::state::{Player, Vehicle};
use crate::domain::store::{EntityStore, Handle};
use crate::domain::tuning::{AbilityKind, PlayerTuning};
use crate::domain::world::World;
use glam::Vec3;

/// Counts down cooldowns and effect timers owned by a player.
pub fn tick_timers(player: &mut Player, dt: f32) {
    for timer in [
        &mut player.fire_cooldown,
        &mut player.ability_cooldown,
        &mut player.sprint_timer,
        &mut player.spotted_timer,
    ] {
        if *timer > 0.0 {
            *timer = (*timer - dt).max(0.0);
        }
    }
}

/// Triggers `user`'s class ability if it is off cooldown and has something
/// to act on. The cooldown only starts when the ability took effect.
pub fn activate(
    user: Handle<Player>,
    players: &mut EntityStore<Player>,
    vehicles: &mut EntityStore<Vehicle>,
    world: &World,
    tuning: &PlayerTuning,
) -> Option<AbilityKind> {
    let (class, origin, team, eye) = {
        let p = players.get(user)?;
        if !p.is_alive() || p.ability_cooldown > 0.0 {
            return None;
        }
        (p.class.definition(), p.position, p.team, p.eye(tuning))
    };

    let applied = match class.ability {
        AbilityKind::Sprint => {
            let p = players.get_mut(user)?;
            p.sprint_timer = class.ability_duration;
            true
        }
        AbilityKind::Repair => {
            let target = vehicles
                .iter()
                .filter(|(_, v)| v.active && v.position.distance(origin) <= class.ability_radius)
                .min_by(|(_, a), (_, b)| a.position.distance(origin).total_cmp(&b.position.distance(origin)))
                .map(|(h, _)| h);
            match target.and_then(|h| vehicles.get_mut(h)) {
                Some(v) => {
                    let max = v.kind.definition().max_health;
                    v.health = (v.health + class.ability_amount as i32).min(max);
                    true
                }
                None => false,
            }
        }
        AbilityKind::Heal => {
            for (_, p) in players.iter_mut() {
                if p.is_alive() && p.team == team && p.position.distance(origin) <= class.ability_radius {
                    p.health = (p.health + class.ability_amount as i32).min(p.max_health());
                }
            }
            true
        }
        AbilityKind::Spot => {
            let targets: Vec<Handle<Player>> = players
                .iter()
                .filter(|(_, p)| p.is_alive() && p.team != team)
                .filter(|(_, p)| {
                    let chest = p.position + Vec3::new(0.0, tuning.height * 0.5, 0.0);
                    let to = chest - eye;
                    let dist = to.length();
                    dist <= class.ability_radius
                        && world.raycast(eye, to / dist.max(f32::EPSILON), dist).is_none()
                })
                .map(|(h, _)| h)
                .collect();
            for h in targets {
                if let Some(p) = players.get_mut(h) {
                    p.spotted_timer = class.ability_duration;
                }
            }
            true
        }
    };

    if !applied {
        return None;
    }
    let p = players.get_mut(user)?;
    p.ability_cooldown = class.ability_cooldown;
    Some(class.ability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::{PlayerClass, VehicleKind};
    use crate::domain::world::{VehicleSpawn, WorldBuilder};

    fn player(class: PlayerClass, team: u8, pos: Vec3) -> Player {
        let mut p = Player::new("p".into(), team, false);
        p.pending_class = Some(class);
        p.spawn_at(pos, 0.0);
        p
    }

    #[test]
    fn sprint_starts_timer_and_cooldown() {
        let world = WorldBuilder::new(54.5).build();
        let mut players = EntityStore::with_capacity(2);
        let mut vehicles = EntityStore::with_capacity(1);
        let h = players.insert(player(PlayerClass::Assault, 0, Vec3::ZERO)).unwrap();

        let used = activate(h, &mut players, &mut vehicles, &world, &PlayerTuning::default());
        assert_eq!(used, Some(AbilityKind::Sprint));
        let p = players.get(h).unwrap();
        assert_eq!(p.sprint_timer, 3.0);
        assert_eq!(p.ability_cooldown, 12.0);

        assert!(activate(h, &mut players, &mut vehicles, &world, &PlayerTuning::default()).is_none());
    }

    #[test]
    fn repair_needs_a_vehicle_in_range() {
        let world = WorldBuilder::new(54.5).build();
        let mut players = EntityStore::with_capacity(1);
        let mut vehicles = EntityStore::with_capacity(1);
        let h = players.insert(player(PlayerClass::Engineer, 0, Vec3::ZERO)).unwrap();
        let tuning = PlayerTuning::default();

        assert!(activate(h, &mut players, &mut vehicles, &world, &tuning).is_none());
        assert_eq!(players.get(h).unwrap().ability_cooldown, 0.0);

        let mut tank = Vehicle::new(&VehicleSpawn { kind: VehicleKind::Tank, position: Vec3::new(3.0, 0.0, 0.0), yaw: 0.0 });
        tank.health = 100;
        let vh = vehicles.insert(tank).unwrap();
        assert_eq!(activate(h, &mut players, &mut vehicles, &world, &tuning), Some(AbilityKind::Repair));
        assert_eq!(vehicles.get(vh).unwrap().health, 350);
    }

    #[test]
    fn heal_is_capped_and_team_only() {
        let world = WorldBuilder::new(54.5).build();
        let mut players = EntityStore::with_capacity(3);
        let mut vehicles = EntityStore::with_capacity(1);
        let medic = players.insert(player(PlayerClass::Support, 0, Vec3::ZERO)).unwrap();
        let mate = players.insert(player(PlayerClass::Assault, 0, Vec3::new(2.0, 0.0, 0.0))).unwrap();
        let foe = players.insert(player(PlayerClass::Assault, 1, Vec3::new(2.0, 0.0, 2.0))).unwrap();
        players.get_mut(mate).unwrap().health = 30;
        players.get_mut(foe).unwrap().health = 30;
        players.get_mut(medic).unwrap().health = 90;

        activate(medic, &mut players, &mut vehicles, &world, &PlayerTuning::default());
        assert_eq!(players.get(mate).unwrap().health, 70);
        assert_eq!(players.get(foe).unwrap().health, 30);
        assert_eq!(players.get(medic).unwrap().health, 100);
    }

    #[test]
    fn spot_marks_only_visible_enemies() {
        let mut b = WorldBuilder::new(54.5);
        b.add_volume(Vec3::new(-5.0, 0.0, 9.0), Vec3::new(-3.0, 4.0, 11.0), false);
        let world = b.build();
        let mut players = EntityStore::with_capacity(3);
        let mut vehicles = EntityStore::with_capacity(1);
        let recon = players.insert(player(PlayerClass::Recon, 0, Vec3::ZERO)).unwrap();
        let open = players.insert(player(PlayerClass::Assault, 1, Vec3::new(4.0, 0.0, 20.0))).unwrap();
        let hidden = players.insert(player(PlayerClass::Assault, 1, Vec3::new(-8.0, 0.0, 20.0))).unwrap();

        activate(recon, &mut players, &mut vehicles, &world, &PlayerTuning::default());
        assert_eq!(players.get(open).unwrap().spotted_timer, 6.0);
        assert_eq!(players.get(hidden).unwrap().spotted_timer, 0.0);
    }

    #[test]
    fn timers_never_go_negative() {
        let mut p = player(PlayerClass::Assault, 0, Vec3::ZERO);
        p.fire_cooldown = 0.01;
        p.sprint_timer = 0.5;
        tick_timers(&mut p, 0.1);
        assert_eq!(p.fire_cooldown, 0.0);
        assert!((p.sprint_timer - 0.4).abs() < 1e-6);
    }
}
