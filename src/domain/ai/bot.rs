// Bot brain: a per-bot state machine that turns world observations into the
// same `InputState` a network client would send.

use super::navigation::Navigator;
use super::perception::{aim_at, can_see, nearest_visible_enemy};
use crate::domain::geometry::yaw_towards;
use crate::domain::input::{InputState, Keys};
use crate::domain::state::{Pickup, Player};
use crate::domain::store::{EntityStore, Handle};
use crate::domain::tuning::{PlayerTuning, WeaponKind};
use crate::domain::world::World;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;
use std::ops::Range;

const DETECTION_RANGE: f32 = 40.0;
const PICKUP_SEARCH_RANGE: f32 = 30.0;
const PICKUP_ENEMY_RANGE: f32 = 20.0;
const PICKUP_REACHED: f32 = 1.5;

const PATROL_REPLAN: f32 = 8.0;
const CHASE_REPLAN: f32 = 2.0;
const CHASE_SECONDS: f32 = 10.0;
const CHASE_LOST_DISTANCE: f32 = 20.0;
const ATTACK_SECONDS: f32 = 5.0;
const ATTACK_RANGE_FRACTION: f32 = 0.8;
const RETREAT_SECONDS: f32 = 5.0;
const RETREAT_HEALTH: i32 = 30;
const RECOVERED_HEALTH: i32 = 60;
const SEEK_SECONDS: f32 = 12.0;

const WAYPOINT_REACHED: f32 = 2.0;
const CLIMB_JUMP: f32 = 0.5;
const PATH_PROBE: f32 = 1.5;
const STRAFE_PROBE: f32 = 1.0;
const JUMPABLE: f32 = 2.0;
const JUMP_COOLDOWN: f32 = 0.4;

const STUCK_SPEED: f32 = 0.05;
const STUCK_JUMP_AFTER: f32 = 0.5;
const STUCK_REPLAN_AFTER: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strafe {
    pub right: bool,
    /// Seconds until the direction flips.
    pub timer: f32,
}

/// One variant per behaviour, each holding only what that behaviour needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BotState {
    Patrol,
    Chase {
        target: Handle<Player>,
        timer: f32,
        reaction: f32,
    },
    Attack {
        target: Handle<Player>,
        timer: f32,
        reaction: f32,
        strafe: Strafe,
    },
    Retreat {
        target: Handle<Player>,
        timer: f32,
    },
    SeekPickup {
        pickup: usize,
        goal: Vec3,
        timer: f32,
    },
}

/// Per-bot reflexes, rolled once at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Personality {
    /// Seconds between acquiring a target and pulling the trigger.
    pub reaction_delay: f32,
    /// Radians of random aim error.
    pub aim_jitter: f32,
}

impl Personality {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            reaction_delay: rng.random_range(0.6..1.5),
            aim_jitter: rng.random_range(0.06..0.14),
        }
    }
}

/// Read-only view of the world a bot observes while thinking.
pub struct BotContext<'a> {
    pub world: &'a World,
    pub players: &'a EntityStore<Player>,
    pub pickups: &'a [Pickup],
    pub tuning: &'a PlayerTuning,
}

#[derive(Debug, Clone)]
pub struct Bot {
    pub player: Handle<Player>,
    state: BotState,
    nav: Navigator,
    personality: Personality,
    jump_cooldown: f32,
    combat_jump_timer: f32,
    last_pos: Option<Vec3>,
    stuck_timer: f32,
    was_moving: bool,
}

impl Bot {
    pub fn new(player: Handle<Player>, personality: Personality) -> Self {
        Self {
            player,
            state: BotState::Patrol,
            nav: Navigator::default(),
            personality,
            jump_cooldown: 0.0,
            combat_jump_timer: 0.0,
            last_pos: None,
            stuck_timer: 0.0,
            was_moving: false,
        }
    }

    pub fn state(&self) -> &BotState {
        &self.state
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    fn reset(&mut self) {
        self.state = BotState::Patrol;
        self.nav.clear();
        self.last_pos = None;
        self.stuck_timer = 0.0;
        self.was_moving = false;
    }

    /// Runs one tick of the state machine and returns the synthesized input.
    /// Dead or missing players produce an idle input and reset to Patrol.
    pub fn think<R: Rng + ?Sized>(&mut self, ctx: &BotContext<'_>, rng: &mut R, dt: f32) -> InputState {
        let Some(me) = ctx.players.get(self.player) else {
            self.reset();
            return InputState::default();
        };
        let mut input = InputState {
            keys: Keys::empty(),
            yaw: me.yaw,
            pitch: me.pitch,
        };
        if !me.is_alive() {
            self.reset();
            return input;
        }

        self.nav.tick(dt);
        self.jump_cooldown = (self.jump_cooldown - dt).max(0.0);
        self.combat_jump_timer = (self.combat_jump_timer - dt).max(0.0);
        self.track_stuck(me, ctx.world, rng, dt);

        self.state = match self.state {
            BotState::Patrol => self.patrol(me, ctx, rng, &mut input),
            BotState::Chase { target, timer, reaction } => {
                self.chase(me, ctx, rng, &mut input, target, timer - dt, reaction)
            }
            BotState::Attack {
                target,
                timer,
                reaction,
                strafe,
            } => self.attack(me, ctx, rng, &mut input, target, timer - dt, reaction - dt, strafe, dt),
            BotState::Retreat { target, timer } => self.retreat(me, ctx, rng, &mut input, target, timer - dt),
            BotState::SeekPickup { pickup, goal, timer } => {
                self.seek_pickup(me, ctx, &mut input, pickup, goal, timer - dt)
            }
        };

        // Unstick after the state logic so the jump is not overwritten.
        if self.stuck_timer > STUCK_JUMP_AFTER {
            self.try_jump(&mut input);
        }
        self.was_moving = input.keys.intersects(Keys::FORWARD | Keys::BACK | Keys::LEFT | Keys::RIGHT);
        input
    }

    fn track_stuck<R: Rng + ?Sized>(&mut self, me: &Player, world: &World, rng: &mut R, dt: f32) {
        let moved = self.last_pos.map_or(f32::INFINITY, |p| p.distance(me.position));
        self.last_pos = Some(me.position);

        if self.was_moving && moved < STUCK_SPEED * dt {
            self.stuck_timer += dt;
        } else {
            self.stuck_timer = 0.0;
        }

        if self.stuck_timer > STUCK_REPLAN_AFTER {
            self.stuck_timer = 0.0;
            let count = world.waypoints().len();
            if let Some(start) = world.nearest_waypoint(me.position) {
                self.nav.plan_between(world, start, rng.random_range(0..count));
            }
        }
    }

    fn try_jump(&mut self, input: &mut InputState) {
        if self.jump_cooldown <= 0.0 {
            input.keys |= Keys::JUMP;
            self.jump_cooldown = JUMP_COOLDOWN;
        }
    }

    fn combat_jump<R: Rng + ?Sized>(&mut self, rng: &mut R, chance: f64, rest: Range<f32>, input: &mut InputState) {
        if self.combat_jump_timer <= 0.0 && rng.random_bool(chance) {
            input.keys |= Keys::JUMP;
            self.combat_jump_timer = rng.random_range(rest);
        }
    }

    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R, scale: f32) -> f32 {
        let j = self.personality.aim_jitter * scale;
        rng.random_range(-j..=j)
    }

    /// Steers along the current plan. Returns false when there is nothing to
    /// follow or a waypoint was just reached.
    fn follow_path(&mut self, me: &Player, world: &World, input: &mut InputState) -> bool {
        let Some(wp) = self.nav.current().and_then(|i| world.waypoints().get(i)) else {
            return false;
        };
        let delta = wp.position - me.position;
        let flat = Vec3::new(delta.x, 0.0, delta.z).length();
        if flat < WAYPOINT_REACHED && delta.y.abs() < WAYPOINT_REACHED {
            self.nav.advance();
            return false;
        }
        self.walk_towards(me, world, delta, input);
        true
    }

    fn walk_towards(&mut self, me: &Player, world: &World, delta: Vec3, input: &mut InputState) {
        input.yaw = yaw_towards(delta);
        input.pitch = 0.0;
        input.keys |= Keys::FORWARD;

        let climb = delta.y > CLIMB_JUMP;
        let low_wall = world
            .obstacle_ahead(me.position, input.yaw, PATH_PROBE)
            .is_some_and(|h| h < JUMPABLE);
        if climb || low_wall {
            self.try_jump(input);
        }
    }

    fn live_target<'a>(ctx: &'a BotContext<'_>, target: Handle<Player>) -> Option<&'a Player> {
        ctx.players.get(target).filter(|t| t.is_alive())
    }

    fn patrol<R: Rng + ?Sized>(
        &mut self,
        me: &Player,
        ctx: &BotContext<'_>,
        rng: &mut R,
        input: &mut InputState,
    ) -> BotState {
        let waypoints = ctx.world.waypoints();
        if !waypoints.is_empty() {
            if self.nav.is_empty() || self.nav.age() > PATROL_REPLAN {
                // Farthest of a few random picks keeps routes long.
                let mut goal = rng.random_range(0..waypoints.len());
                for _ in 0..3 {
                    let candidate = rng.random_range(0..waypoints.len());
                    if waypoints[candidate].position.distance_squared(me.position)
                        > waypoints[goal].position.distance_squared(me.position)
                    {
                        goal = candidate;
                    }
                }
                if let Some(start) = ctx.world.nearest_waypoint(me.position) {
                    self.nav.plan_between(ctx.world, start, goal);
                }
            }
            self.follow_path(me, ctx.world, input);
        }

        if let Some(target) = nearest_visible_enemy(ctx.world, ctx.tuning, ctx.players, self.player, DETECTION_RANGE) {
            self.nav.clear();
            return BotState::Chase {
                target,
                timer: CHASE_SECONDS,
                reaction: self.personality.reaction_delay,
            };
        }

        if me.weapon == WeaponKind::Pistol {
            let nearest = ctx
                .pickups
                .iter()
                .enumerate()
                .filter(|(_, p)| p.active)
                .map(|(i, p)| (i, p.position, p.position.distance(me.position)))
                .filter(|&(_, _, d)| d < PICKUP_SEARCH_RANGE)
                .min_by(|a, b| a.2.total_cmp(&b.2));
            if let Some((pickup, goal, _)) = nearest {
                self.nav.plan(ctx.world, me.position, goal);
                return BotState::SeekPickup {
                    pickup,
                    goal,
                    timer: SEEK_SECONDS,
                };
            }
        }

        BotState::Patrol
    }

    #[allow(clippy::too_many_arguments)]
    fn chase<R: Rng + ?Sized>(
        &mut self,
        me: &Player,
        ctx: &BotContext<'_>,
        rng: &mut R,
        input: &mut InputState,
        target: Handle<Player>,
        timer: f32,
        reaction: f32,
    ) -> BotState {
        let Some(enemy) = Self::live_target(ctx, target) else {
            self.nav.clear();
            return BotState::Patrol;
        };
        let dist = enemy.position.distance(me.position);

        if self.nav.is_empty() || self.nav.age() > CHASE_REPLAN {
            self.nav.plan(ctx.world, me.position, enemy.position);
        }

        let (yaw, pitch) = aim_at(ctx.tuning, me, enemy);
        input.yaw = yaw + self.jitter(rng, 1.0);
        input.pitch = pitch + self.jitter(rng, 1.0);

        let visible = can_see(ctx.world, ctx.tuning, me, enemy);
        let mut next = BotState::Chase { target, timer, reaction };
        if visible && dist < me.weapon.definition().range * ATTACK_RANGE_FRACTION {
            next = BotState::Attack {
                target,
                timer: ATTACK_SECONDS,
                reaction,
                strafe: Strafe {
                    right: rng.random_bool(0.5),
                    timer: 0.0,
                },
            };
        } else {
            self.follow_path(me, ctx.world, input);
        }

        self.combat_jump(rng, 0.01, 1.0..3.0, input);

        if timer <= 0.0 || (!visible && dist > CHASE_LOST_DISTANCE) {
            self.nav.clear();
            return BotState::Patrol;
        }
        next
    }

    #[allow(clippy::too_many_arguments)]
    fn attack<R: Rng + ?Sized>(
        &mut self,
        me: &Player,
        ctx: &BotContext<'_>,
        rng: &mut R,
        input: &mut InputState,
        target: Handle<Player>,
        timer: f32,
        reaction: f32,
        mut strafe: Strafe,
        dt: f32,
    ) -> BotState {
        let Some(enemy) = Self::live_target(ctx, target) else {
            self.nav.clear();
            return BotState::Patrol;
        };
        let dist = enemy.position.distance(me.position);

        let (yaw, pitch) = aim_at(ctx.tuning, me, enemy);
        input.yaw = yaw + self.jitter(rng, 1.0);
        input.pitch = pitch + self.jitter(rng, 1.0);

        strafe.timer -= dt;
        if strafe.timer <= 0.0 {
            strafe.right = !strafe.right;
            strafe.timer = rng.random_range(0.8..2.5);
            if rng.random_bool(0.3) {
                input.keys |= if dist > 10.0 { Keys::FORWARD } else { Keys::BACK };
            }
        }
        input.keys |= if strafe.right { Keys::RIGHT } else { Keys::LEFT };

        self.combat_jump(rng, 0.03, 0.8..2.0, input);

        let side = if strafe.right { input.yaw - FRAC_PI_2 } else { input.yaw + FRAC_PI_2 };
        if ctx
            .world
            .obstacle_ahead(me.position, side, STRAFE_PROBE)
            .is_some_and(|h| h < JUMPABLE)
        {
            self.try_jump(input);
        }

        let visible = can_see(ctx.world, ctx.tuning, me, enemy);
        if reaction <= 0.0 && visible && rng.random_bool(0.6) {
            input.keys |= Keys::SHOOT;
        }

        if me.health < RETREAT_HEALTH {
            let away = (me.position - enemy.position).normalize_or_zero();
            self.nav.plan(ctx.world, me.position, me.position + away * 20.0);
            return BotState::Retreat {
                target,
                timer: RETREAT_SECONDS,
            };
        }
        if !visible {
            self.nav.plan(ctx.world, me.position, enemy.position);
            return BotState::Chase {
                target,
                timer: ATTACK_SECONDS,
                reaction,
            };
        }
        if dist > me.weapon.definition().range || timer <= 0.0 {
            self.nav.clear();
            return BotState::Chase {
                target,
                timer: CHASE_SECONDS,
                reaction,
            };
        }

        BotState::Attack {
            target,
            timer,
            reaction,
            strafe,
        }
    }

    fn retreat<R: Rng + ?Sized>(
        &mut self,
        me: &Player,
        ctx: &BotContext<'_>,
        rng: &mut R,
        input: &mut InputState,
        target: Handle<Player>,
        timer: f32,
    ) -> BotState {
        let enemy = Self::live_target(ctx, target);

        if !self.nav.is_empty() {
            self.follow_path(me, ctx.world, input);
        } else if let Some(enemy) = enemy {
            let mut away = me.position - enemy.position;
            away.y = 0.0;
            if away.length_squared() > 0.1 {
                self.nav.plan(ctx.world, me.position, me.position + away.normalize() * 25.0);
            }
        }

        self.combat_jump(rng, 0.04, 0.5..1.5, input);

        if let Some(enemy) = enemy.filter(|e| can_see(ctx.world, ctx.tuning, me, e)) {
            let (yaw, pitch) = aim_at(ctx.tuning, me, enemy);
            input.yaw = yaw + self.jitter(rng, 3.0);
            input.pitch = pitch;
            if rng.random_bool(0.25) {
                input.keys |= Keys::SHOOT;
            }
        }

        if timer <= 0.0 || me.health > RECOVERED_HEALTH {
            self.nav.clear();
            return BotState::Patrol;
        }
        BotState::Retreat { target, timer }
    }

    fn seek_pickup(
        &mut self,
        me: &Player,
        ctx: &BotContext<'_>,
        input: &mut InputState,
        pickup: usize,
        goal: Vec3,
        timer: f32,
    ) -> BotState {
        if !self.follow_path(me, ctx.world, input) && self.nav.is_empty() {
            let mut to_goal = goal - me.position;
            to_goal.y = 0.0;
            if to_goal.length_squared() > 0.1 {
                self.walk_towards(me, ctx.world, to_goal, input);
            }
        }

        let gone = ctx.pickups.get(pickup).is_none_or(|p| !p.active);
        if goal.distance(me.position) < PICKUP_REACHED || timer <= 0.0 || me.weapon != WeaponKind::Pistol || gone {
            self.nav.clear();
            return BotState::Patrol;
        }

        if let Some(target) = nearest_visible_enemy(ctx.world, ctx.tuning, ctx.players, self.player, PICKUP_ENEMY_RANGE) {
            self.nav.clear();
            return BotState::Attack {
                target,
                timer: ATTACK_SECONDS,
                reaction: self.personality.reaction_delay,
                strafe: Strafe {
                    right: true,
                    timer: 0.0,
                },
            };
        }

        BotState::SeekPickup { pickup, goal, timer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::world::WorldBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f32 = 1.0 / 64.0;

    fn spawned(pos: Vec3, team: u8, is_bot: bool) -> Player {
        let mut p = Player::new("p".into(), team, is_bot);
        p.spawn_at(pos, 0.0);
        p
    }

    fn personality() -> Personality {
        Personality {
            reaction_delay: 1.0,
            aim_jitter: 0.1,
        }
    }

    #[test]
    fn patrol_spots_enemy_and_chases_within_one_tick() {
        let world = WorldBuilder::new(54.5).build();
        let tuning = PlayerTuning::default();
        let mut players = EntityStore::with_capacity(4);
        let me = players.insert(spawned(Vec3::ZERO, 0, true)).unwrap();
        let foe = players.insert(spawned(Vec3::new(0.0, 0.0, 30.0), 1, false)).unwrap();
        let ctx = BotContext {
            world: &world,
            players: &players,
            pickups: &[],
            tuning: &tuning,
        };

        let mut bot = Bot::new(me, personality());
        let mut rng = StdRng::seed_from_u64(7);
        let input = bot.think(&ctx, &mut rng, DT);

        assert!(matches!(bot.state(), BotState::Chase { target, .. } if *target == foe));
        // No waypoints, no plan, no forward motion.
        assert!(!input.held(Keys::FORWARD));
    }

    #[test]
    fn patrol_walks_its_planned_route() {
        let mut b = WorldBuilder::new(54.5);
        let a = b.add_waypoint(Vec3::new(10.0, 0.0, 0.0));
        let c = b.add_waypoint(Vec3::new(20.0, 0.0, 0.0));
        b.link(a, c);
        let world = b.build();
        let tuning = PlayerTuning::default();
        let mut players = EntityStore::with_capacity(2);
        let me = players.insert(spawned(Vec3::ZERO, 0, true)).unwrap();
        let ctx = BotContext {
            world: &world,
            players: &players,
            pickups: &[],
            tuning: &tuning,
        };

        let mut bot = Bot::new(me, personality());
        let input = bot.think(&ctx, &mut StdRng::seed_from_u64(3), DT);
        assert_eq!(bot.state(), &BotState::Patrol);
        assert!(input.held(Keys::FORWARD));
        // Facing +X.
        assert!((input.yaw - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn dead_bot_resets_and_idles() {
        let world = WorldBuilder::new(54.5).build();
        let tuning = PlayerTuning::default();
        let mut players = EntityStore::with_capacity(2);
        let mut p = spawned(Vec3::ZERO, 0, true);
        p.kill(3.0);
        let me = players.insert(p).unwrap();
        let ctx = BotContext {
            world: &world,
            players: &players,
            pickups: &[],
            tuning: &tuning,
        };

        let mut bot = Bot::new(me, personality());
        bot.state = BotState::Retreat { target: me, timer: 2.0 };
        let input = bot.think(&ctx, &mut StdRng::seed_from_u64(1), DT);
        assert_eq!(bot.state(), &BotState::Patrol);
        assert!(input.keys.is_empty());
    }

    #[test]
    fn attack_strafes_and_falls_back_to_retreat_when_hurt() {
        let world = WorldBuilder::new(54.5).build();
        let tuning = PlayerTuning::default();
        let mut players = EntityStore::with_capacity(2);
        let me = players.insert(spawned(Vec3::ZERO, 0, true)).unwrap();
        let foe = players.insert(spawned(Vec3::new(0.0, 0.0, 15.0), 1, false)).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut bot = Bot::new(me, personality());
        bot.state = BotState::Attack {
            target: foe,
            timer: ATTACK_SECONDS,
            reaction: 0.0,
            strafe: Strafe { right: false, timer: 1.0 },
        };

        {
            let ctx = BotContext {
                world: &world,
                players: &players,
                pickups: &[],
                tuning: &tuning,
            };
            let input = bot.think(&ctx, &mut rng, DT);
            assert!(input.held(Keys::LEFT));
            assert!(matches!(bot.state(), BotState::Attack { .. }));
        }

        players.get_mut(me).unwrap().health = 20;
        let ctx = BotContext {
            world: &world,
            players: &players,
            pickups: &[],
            tuning: &tuning,
        };
        bot.think(&ctx, &mut rng, DT);
        assert!(matches!(bot.state(), BotState::Retreat { target, .. } if *target == foe));
    }

    #[test]
    fn lost_target_returns_to_patrol() {
        let world = WorldBuilder::new(54.5).build();
        let tuning = PlayerTuning::default();
        let mut players = EntityStore::with_capacity(2);
        let me = players.insert(spawned(Vec3::ZERO, 0, true)).unwrap();
        let mut dead = spawned(Vec3::new(5.0, 0.0, 0.0), 1, false);
        dead.kill(3.0);
        let foe = players.insert(dead).unwrap();
        let ctx = BotContext {
            world: &world,
            players: &players,
            pickups: &[],
            tuning: &tuning,
        };

        let mut bot = Bot::new(me, personality());
        bot.state = BotState::Chase {
            target: foe,
            timer: 5.0,
            reaction: 1.0,
        };
        bot.think(&ctx, &mut StdRng::seed_from_u64(5), DT);
        assert_eq!(bot.state(), &BotState::Patrol);
    }

    #[test]
    fn pistol_bot_heads_for_nearby_pickup() {
        let world = WorldBuilder::new(54.5).build();
        let tuning = PlayerTuning::default();
        let mut players = EntityStore::with_capacity(1);
        let me = players.insert(spawned(Vec3::ZERO, 0, true)).unwrap();
        let pickups = vec![Pickup {
            kind: WeaponKind::Rifle,
            position: Vec3::new(0.0, 0.0, 10.0),
            active: true,
            respawn_timer: 0.0,
        }];
        let ctx = BotContext {
            world: &world,
            players: &players,
            pickups: &pickups,
            tuning: &tuning,
        };

        let mut bot = Bot::new(me, personality());
        let mut rng = StdRng::seed_from_u64(9);
        bot.think(&ctx, &mut rng, DT);
        assert!(matches!(bot.state(), BotState::SeekPickup { pickup: 0, .. }));

        // Without waypoints it walks straight at the pickup.
        let input = bot.think(&ctx, &mut rng, DT);
        assert!(input.held(Keys::FORWARD));
        assert!(input.yaw.abs() < 1e-5);
    }
}
