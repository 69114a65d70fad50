// Weapon pickups: collection on touch and timed respawn.

use crate::domain::state::{Pickup, Player};
use crate::domain::store::{EntityStore, Handle};
use crate::domain::tuning::ObjectiveTuning;
use tracing::debug;

/// A pickup collected this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collected {
    pub pickup: usize,
    pub player: Handle<Player>,
}

/// Inactive pickups count down and reappear; active ones go to the first
/// on-foot player inside the pickup radius.
pub fn tick_pickups(
    pickups: &mut [Pickup],
    players: &mut EntityStore<Player>,
    tuning: &ObjectiveTuning,
    dt: f32,
) -> Vec<Collected> {
    let mut collected = Vec::new();

    for (index, pickup) in pickups.iter_mut().enumerate() {
        if !pickup.active {
            pickup.respawn_timer -= dt;
            if pickup.respawn_timer <= 0.0 {
                pickup.active = true;
                pickup.respawn_timer = 0.0;
                debug!(pickup = index, weapon = pickup.kind.definition().name, "pickup respawned");
            }
            continue;
        }

        let taker = players
            .iter_mut()
            .find(|(_, p)| p.is_on_foot() && p.position.distance(pickup.position) < tuning.pickup_radius);
        if let Some((handle, player)) = taker {
            player.equip(pickup.kind);
            pickup.active = false;
            pickup.respawn_timer = tuning.pickup_respawn_seconds;
            debug!(pickup = index, player_id = handle.index(), weapon = pickup.kind.definition().name, "pickup collected");
            collected.push(Collected { pickup: index, player: handle });
        }
    }

    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::WeaponKind;
    use glam::Vec3;

    const DT: f32 = 1.0 / 64.0;

    #[test]
    fn collected_pickup_reappears_only_after_respawn_time() {
        let tuning = ObjectiveTuning::default();
        let mut players = EntityStore::with_capacity(2);
        let mut p = Player::new("p".into(), 0, false);
        p.spawn_at(Vec3::new(0.5, 0.0, 0.0), 0.0);
        let handle = players.insert(p).unwrap();

        let mut pickups = vec![Pickup {
            kind: WeaponKind::Sniper,
            position: Vec3::ZERO,
            active: true,
            respawn_timer: 0.0,
        }];

        let got = tick_pickups(&mut pickups, &mut players, &tuning, DT);
        assert_eq!(got, vec![Collected { pickup: 0, player: handle }]);
        assert!(!pickups[0].active);
        assert_eq!(players.get(handle).unwrap().weapon, WeaponKind::Sniper);

        // Walk away so nobody re-collects on respawn.
        players.get_mut(handle).unwrap().position = Vec3::new(30.0, 0.0, 0.0);

        let ticks = (tuning.pickup_respawn_seconds / DT) as usize;
        for _ in 0..ticks - 1 {
            tick_pickups(&mut pickups, &mut players, &tuning, DT);
            assert!(!pickups[0].active);
        }
        tick_pickups(&mut pickups, &mut players, &tuning, DT);
        assert!(pickups[0].active);
    }

    #[test]
    fn dead_players_do_not_collect() {
        let tuning = ObjectiveTuning::default();
        let mut players = EntityStore::with_capacity(1);
        players.insert(Player::new("ghost".into(), 0, false)).unwrap();
        let mut pickups = vec![Pickup {
            kind: WeaponKind::Rifle,
            position: Vec3::ZERO,
            active: true,
            respawn_timer: 0.0,
        }];

        assert!(tick_pickups(&mut pickups, &mut players, &tuning, DT).is_empty());
        assert!(pickups[0].active);
    }
}
