// Capture-the-flag: pickup, carry, drop, return and capture.

use crate::domain::state::{Flag, Player};
use crate::domain::store::{EntityStore, Handle};
use crate::domain::tuning::ObjectiveTuning;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlagEvent {
    Taken { team: u8, by: Handle<Player> },
    Dropped { team: u8 },
    Returned { team: u8 },
    Captured { team: u8, by: Handle<Player> },
}

/// Drops whatever flag `carrier` holds at `at`.
pub fn drop_carried(flags: &mut [Flag], carrier: Handle<Player>, at: Vec3, tuning: &ObjectiveTuning) -> Option<u8> {
    let flag = flags.iter_mut().find(|f| f.carrier == Some(carrier))?;
    flag.drop_at(at, tuning.return_seconds);
    Some(flag.team)
}

/// One objective tick. Scores saturate at `u8::MAX`.
pub fn tick_flags(
    flags: &mut [Flag],
    players: &EntityStore<Player>,
    scores: &mut [u8; 2],
    tuning: &ObjectiveTuning,
    dt: f32,
) -> Vec<FlagEvent> {
    let mut events = Vec::new();

    // Follow carriers; drop for carriers that are gone, dead or mounted.
    for flag in flags.iter_mut() {
        let Some(carrier) = flag.carrier else {
            continue;
        };
        match players.get(carrier) {
            Some(p) if p.is_on_foot() => {
                flag.position = p.position + Vec3::new(0.0, tuning.carry_height, 0.0);
            }
            Some(p) => {
                flag.drop_at(p.position, tuning.return_seconds);
                events.push(FlagEvent::Dropped { team: flag.team });
            }
            None => {
                let at = Vec3::new(flag.position.x, 0.0, flag.position.z);
                flag.drop_at(at, tuning.return_seconds);
                events.push(FlagEvent::Dropped { team: flag.team });
            }
        }
    }

    // Dropped flags wait, then go home.
    for flag in flags.iter_mut() {
        if flag.carrier.is_none() && !flag.at_base {
            flag.return_timer -= dt;
            if flag.return_timer <= 0.0 {
                flag.return_home();
                events.push(FlagEvent::Returned { team: flag.team });
            }
        }
    }

    for (handle, player) in players.iter() {
        if !player.is_on_foot() {
            continue;
        }

        for flag in flags.iter_mut() {
            if flag.carrier.is_some() || player.position.distance(flag.position) >= tuning.touch_radius {
                continue;
            }
            if flag.team != player.team {
                flag.carrier = Some(handle);
                flag.at_base = false;
                events.push(FlagEvent::Taken { team: flag.team, by: handle });
            } else if !flag.at_base {
                flag.return_home();
                events.push(FlagEvent::Returned { team: flag.team });
            }
        }
    }

    // Captures need the carrier at its own base with its own flag home.
    let home: Vec<(u8, Vec3, bool)> = flags.iter().map(|f| (f.team, f.base, f.at_base)).collect();
    for flag in flags.iter_mut() {
        let Some(carrier) = flag.carrier else {
            continue;
        };
        let Some(p) = players.get(carrier) else {
            continue;
        };
        let own_home = home.iter().find(|(team, _, _)| *team == p.team);
        let Some(&(_, base, at_base)) = own_home else {
            continue;
        };
        if at_base && p.position.distance(base) < tuning.touch_radius {
            let slot = usize::from(p.team.min(1));
            scores[slot] = scores[slot].saturating_add(1);
            flag.return_home();
            events.push(FlagEvent::Captured { team: p.team, by: carrier });
        }
    }

    events
}
