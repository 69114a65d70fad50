// Authoritative simulation: one `step` per tick, no I/O.
//
// The network layer decodes datagrams into `GameEvent`s, hands them to
// `Simulation::step`, and sends whatever comes back in the `TickOutput`.

use super::connections::Connections;
use super::types::{
    FlagSnapshot, GameEvent, HazardSnapshot, JoinAck, JoinError, PickupSnapshot, PlayerSnapshot,
    ServerEvent, TickOutput, VehicleSnapshot, WORLD_KILLER, WorldUpdate,
};
use crate::domain::ai::{Bot, BotContext, Personality};
use crate::domain::geometry::Aabb;
use crate::domain::systems::combat::{self, DamageOutcome, Shot};
use crate::domain::systems::objectives::{self, FlagEvent};
use crate::domain::systems::vehicles::{self, CannonShot};
use crate::domain::systems::{abilities, hazards, movement, pickups};
use crate::domain::tuning::vehicle::{RUN_OVER_RADIUS, WRECK_SECONDS};
use crate::domain::tuning::{HazardTuning, ObjectiveTuning, PlayerClass, PlayerTuning};
use crate::domain::{
    EntityStore, Flag, Handle, InputState, Keys, KillEvent, Pickup, Player, PlayerState, Tornado, Vehicle, World,
};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::net::SocketAddr;
use tracing::{debug, info};

/// Height a tornado pulse pops a grounded player off the floor so the
/// outward push survives the next ground check.
const FLING_HOP: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct SimSettings {
    pub bot_count: usize,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Seconds of silence before a connection is dropped.
    pub connection_timeout: f32,
    pub max_players: usize,
    /// Seconds per tick.
    pub dt: f32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            bot_count: 0,
            seed: None,
            connection_timeout: 10.0,
            max_players: 128,
            dt: 1.0 / 64.0,
        }
    }
}

/// Something a shot can strike.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    Player(Handle<Player>),
    Vehicle(Handle<Vehicle>),
}

pub struct Simulation {
    world: World,
    settings: SimSettings,
    player_tuning: PlayerTuning,
    objective_tuning: ObjectiveTuning,
    hazard_tuning: HazardTuning,
    rng: StdRng,
    tick: u32,
    players: EntityStore<Player>,
    vehicles: EntityStore<Vehicle>,
    pickups: Vec<Pickup>,
    flags: Vec<Flag>,
    tornados: Vec<Tornado>,
    bots: Vec<Bot>,
    connections: Connections,
    kill_feed: Vec<KillEvent>,
    scores: [u8; 2],
}

fn wire_id<T>(handle: Handle<T>) -> u8 {
    u8::try_from(handle.index()).unwrap_or(u8::MAX)
}

fn wire_ref<T>(handle: Option<Handle<T>>) -> i16 {
    handle.map_or(-1, |h| i16::try_from(h.index()).unwrap_or(i16::MAX))
}

impl Simulation {
    pub fn new(world: World, settings: SimSettings) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let hazard_tuning = HazardTuning::default();

        let mut vehicles = EntityStore::with_capacity(world.vehicle_spawns().len());
        for spawn in world.vehicle_spawns() {
            vehicles.insert(Vehicle::new(spawn));
        }
        let pickups = world.pickup_spawns().iter().map(Pickup::from).collect();
        let flags = (0..2)
            .filter_map(|team| world.flag_base(team).map(|base| Flag::new(team, base)))
            .collect();
        let tornados = hazards::spawn_tornados(&world, &hazard_tuning, &mut rng);

        let mut sim = Self {
            players: EntityStore::with_capacity(settings.max_players),
            world,
            player_tuning: PlayerTuning::default(),
            objective_tuning: ObjectiveTuning::default(),
            hazard_tuning,
            rng,
            tick: 0,
            vehicles,
            pickups,
            flags,
            tornados,
            bots: Vec::new(),
            connections: Connections::default(),
            kill_feed: Vec::new(),
            scores: [0; 2],
            settings,
        };

        for n in 0..sim.settings.bot_count {
            if sim.spawn_bot(n).is_none() {
                break;
            }
        }
        info!(
            bots = sim.bots.len(),
            vehicles = sim.vehicles.len(),
            pickups = sim.pickups.len(),
            "simulation ready"
        );
        sim
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn players(&self) -> &EntityStore<Player> {
        &self.players
    }

    pub fn vehicles(&self) -> &EntityStore<Vehicle> {
        &self.vehicles
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn bots(&self) -> &[Bot] {
        &self.bots
    }

    pub fn kill_feed(&self) -> &[KillEvent] {
        &self.kill_feed
    }

    pub fn scores(&self) -> [u8; 2] {
        self.scores
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Player slot bound to a client address.
    pub fn player_for(&self, addr: &SocketAddr) -> Option<Handle<Player>> {
        self.connections.get(addr).map(|c| c.player)
    }

    fn bot_count(&self) -> u8 {
        u8::try_from(self.bots.len()).unwrap_or(u8::MAX)
    }

    /// Team with fewer members; ties go to team 0.
    fn smaller_team(&self) -> u8 {
        let mut counts = [0usize; 2];
        for (_, p) in self.players.iter() {
            counts[usize::from(p.team.min(1))] += 1;
        }
        u8::from(counts[1] < counts[0])
    }

    fn spawn_bot(&mut self, n: usize) -> Option<Handle<Player>> {
        let team = self.smaller_team();
        let handle = self.players.insert(Player::new(format!("Bot_{}", n + 1), team, true))?;
        self.place(handle);
        let bot = Bot::new(handle, Personality::roll(&mut self.rng));
        self.bots.push(bot);
        debug!(player_id = handle.index(), team, "bot spawned");
        Some(handle)
    }

    /// Spawns at a random spawn point, or parks the player as a spectator on
    /// maps without any.
    fn place(&mut self, handle: Handle<Player>) {
        let spawns = self.world.spawns();
        let Some(player) = self.players.get_mut(handle) else {
            return;
        };
        if spawns.is_empty() {
            player.state = PlayerState::Spectating;
            return;
        }
        let spawn = spawns[self.rng.random_range(0..spawns.len())];
        player.spawn_at(spawn.position, spawn.yaw);
    }

    /// Runs one authoritative tick.
    pub fn step(&mut self, events: Vec<GameEvent>) -> TickOutput {
        let mut out = TickOutput::default();

        for event in events {
            self.apply(event, &mut out.acks);
        }
        self.run_bots();
        self.tick_players(&mut out.events);
        self.tick_vehicles(&mut out.events);
        pickups::tick_pickups(
            &mut self.pickups,
            &mut self.players,
            &self.objective_tuning,
            self.settings.dt,
        );
        self.tick_flags();
        self.tick_hazards(&mut out.events);
        self.expire_kill_feed();
        self.expire_connections();

        self.tick = self.tick.wrapping_add(1);
        out.update = self.snapshot();
        out.recipients = self.connections.recipients();
        out
    }

    fn apply(&mut self, event: GameEvent, acks: &mut Vec<(SocketAddr, JoinAck)>) {
        match event {
            GameEvent::Join { addr, name } => match self.join(addr, name) {
                Ok(ack) => acks.push((addr, ack)),
                Err(JoinError::ServerFull) => info!(%addr, "join rejected: server full"),
            },
            GameEvent::Input {
                addr,
                seq,
                input,
                class,
            } => self.input(addr, seq, input, class),
            GameEvent::Leave { addr } => {
                if let Some(conn) = self.connections.remove(&addr) {
                    info!(%addr, player_id = conn.player.index(), "player disconnected");
                    self.remove_player(conn.player);
                }
            }
        }
    }

    /// Binds `addr` to a fresh slot. A repeated join from the same address
    /// re-acks the existing slot.
    pub fn join(&mut self, addr: SocketAddr, name: String) -> Result<JoinAck, JoinError> {
        let bot_count = self.bot_count();
        if let Some(conn) = self.connections.get_mut(&addr) {
            conn.idle = 0.0;
            return Ok(JoinAck {
                player_id: wire_id(conn.player),
                bot_count,
            });
        }

        let team = self.smaller_team();
        let handle = self
            .players
            .insert(Player::new(name, team, false))
            .ok_or(JoinError::ServerFull)?;
        self.place(handle);
        self.connections.insert(addr, handle);

        let name = self.players.get(handle).map(|p| p.name.as_str()).unwrap_or_default();
        info!(%addr, player_id = handle.index(), team, name, "player joined");
        Ok(JoinAck {
            player_id: wire_id(handle),
            bot_count,
        })
    }

    fn input(&mut self, addr: SocketAddr, seq: u32, input: InputState, class: Option<PlayerClass>) {
        let Some(conn) = self.connections.get_mut(&addr) else {
            debug!(%addr, "input from unknown address");
            return;
        };
        conn.idle = 0.0;
        if seq <= conn.last_seq || !input.is_finite() {
            debug!(%addr, seq, last_seq = conn.last_seq, "stale or invalid input dropped");
            return;
        }
        conn.last_seq = seq;

        if let Some(player) = self.players.get_mut(conn.player) {
            player.input = input;
            if class.is_some() {
                player.pending_class = class;
            }
        }
    }

    fn remove_player(&mut self, handle: Handle<Player>) {
        let Some(player) = self.players.remove(handle) else {
            return;
        };
        objectives::drop_carried(&mut self.flags, handle, player.position, &self.objective_tuning);
        if let Some(v) = player.vehicle.and_then(|vh| self.vehicles.get_mut(vh)) {
            v.driver = None;
        }
    }

    fn run_bots(&mut self) {
        let dt = self.settings.dt;
        let ctx = BotContext {
            world: &self.world,
            players: &self.players,
            pickups: &self.pickups,
            tuning: &self.player_tuning,
        };
        let rng = &mut self.rng;
        let inputs: Vec<(Handle<Player>, InputState)> = self
            .bots
            .iter_mut()
            .map(|bot| (bot.player, bot.think(&ctx, &mut *rng, dt)))
            .collect();

        for (handle, input) in inputs {
            if let Some(player) = self.players.get_mut(handle) {
                player.input = input;
            }
        }
    }

    fn tick_players(&mut self, events: &mut Vec<ServerEvent>) {
        let dt = self.settings.dt;

        for handle in self.players.handles() {
            let Some(player) = self.players.get_mut(handle) else {
                continue;
            };
            match player.state {
                PlayerState::Spectating => continue,
                PlayerState::Dead => {
                    player.respawn_timer -= dt;
                    if player.respawn_timer <= 0.0 {
                        self.place(handle);
                    }
                    continue;
                }
                PlayerState::Alive => {}
            }

            abilities::tick_timers(player, dt);
            let keys = player.input.keys;
            player.input.keys.remove(Keys::USE | Keys::ABILITY);

            if keys.contains(Keys::USE) {
                self.toggle_vehicle(handle);
            }
            if keys.contains(Keys::ABILITY) {
                if let Some(ability) = abilities::activate(
                    handle,
                    &mut self.players,
                    &mut self.vehicles,
                    &self.world,
                    &self.player_tuning,
                ) {
                    debug!(player_id = handle.index(), ?ability, "ability used");
                }
            }

            let Some(player) = self.players.get_mut(handle) else {
                continue;
            };
            if keys.contains(Keys::RELOAD) {
                combat::reload(player);
            }
            if player.vehicle.is_some() {
                continue;
            }

            movement::tick_player(player, &self.world, &self.player_tuning, dt);
            if keys.contains(Keys::SHOOT) {
                if let Some(shot) = combat::try_trigger(player, &self.player_tuning) {
                    self.resolve_shot(handle, &shot, events);
                }
            }
        }
    }

    fn toggle_vehicle(&mut self, handle: Handle<Player>) {
        let Some(player) = self.players.get(handle) else {
            return;
        };
        let position = player.position;
        let current = player.vehicle;

        match current {
            Some(vh) => {
                let exit = self.vehicles.get_mut(vh).map(|v| {
                    v.driver = None;
                    vehicles::exit_position(v, &self.world, self.player_tuning.radius, self.player_tuning.height)
                });
                if let Some(player) = self.players.get_mut(handle) {
                    player.vehicle = None;
                    player.velocity = Vec3::ZERO;
                    if let Some(exit) = exit {
                        player.position = exit;
                    }
                }
                debug!(player_id = handle.index(), vehicle = vh.index(), "left vehicle");
            }
            None => {
                let Some(vh) = vehicles::nearest_free(&self.vehicles, position) else {
                    return;
                };
                let Some(vehicle) = self.vehicles.get_mut(vh) else {
                    return;
                };
                vehicle.driver = Some(handle);
                let seat = vehicles::seat_position(vehicle);

                objectives::drop_carried(&mut self.flags, handle, position, &self.objective_tuning);
                if let Some(player) = self.players.get_mut(handle) {
                    player.vehicle = Some(vh);
                    player.velocity = Vec3::ZERO;
                    player.position = seat;
                }
                debug!(player_id = handle.index(), vehicle = vh.index(), "entered vehicle");
            }
        }
    }

    /// Hit boxes for shots: on-foot players plus active vehicles, minus the
    /// shooter and the shooter's own vehicle.
    fn targets(&self, shooter: Handle<Player>, own_vehicle: Option<Handle<Vehicle>>) -> Vec<(Target, Aabb)> {
        let players = self
            .players
            .iter()
            .filter(|(h, p)| *h != shooter && p.is_on_foot())
            .map(|(h, p)| (Target::Player(h), p.body(&self.player_tuning)));
        let vehicles = self
            .vehicles
            .iter()
            .filter(|(h, v)| v.active && Some(*h) != own_vehicle)
            .map(|(h, v)| (Target::Vehicle(h), vehicles::hull(v)));
        players.chain(vehicles).collect()
    }

    fn team_of(&self, handle: Handle<Player>) -> Option<u8> {
        self.players.get(handle).map(|p| p.team)
    }

    /// Friendly fire is off: teammates and their vehicles absorb the hit.
    fn is_friendly(&self, target: Target, team: Option<u8>) -> bool {
        let target_team = match target {
            Target::Player(h) => self.team_of(h),
            Target::Vehicle(vh) => self
                .vehicles
                .get(vh)
                .and_then(|v| v.driver)
                .and_then(|d| self.team_of(d)),
        };
        team.is_some() && target_team == team
    }

    fn resolve_shot(&mut self, shooter: Handle<Player>, shot: &Shot, events: &mut Vec<ServerEvent>) {
        let bodies = self.targets(shooter, None);
        let hits = combat::trace_pellets(&self.world, shot, &bodies, &mut self.rng);
        let damage = shot.weapon.definition().damage;
        let team = self.team_of(shooter);

        for target in hits {
            if !self.is_friendly(target, team) {
                self.hit(target, damage, wire_id(shooter), events);
            }
        }
    }

    fn resolve_cannon(
        &mut self,
        vehicle: Handle<Vehicle>,
        driver: Handle<Player>,
        shot: &CannonShot,
        events: &mut Vec<ServerEvent>,
    ) {
        let bodies = self.targets(driver, Some(vehicle));
        let Some(target) = combat::first_body_hit(&self.world, shot.origin, shot.dir, shot.range, &bodies) else {
            return;
        };
        if !self.is_friendly(target, self.team_of(driver)) {
            self.hit(target, shot.damage, wire_id(driver), events);
        }
    }

    fn hit(&mut self, target: Target, damage: i32, attacker: u8, events: &mut Vec<ServerEvent>) {
        match target {
            Target::Player(victim) => {
                if !self.players.get(victim).is_some_and(Player::is_alive) {
                    return;
                }
                events.push(ServerEvent::PlayerHit {
                    attacker,
                    victim: wire_id(victim),
                    damage: i16::try_from(damage).unwrap_or(i16::MAX),
                });
                self.damage_player(victim, damage, attacker, events);
            }
            Target::Vehicle(vh) => self.damage_vehicle(vh, damage, attacker, events),
        }
    }

    fn damage_player(
        &mut self,
        victim: Handle<Player>,
        amount: i32,
        killer: u8,
        events: &mut Vec<ServerEvent>,
    ) -> Option<DamageOutcome> {
        let player = self.players.get_mut(victim)?;
        let outcome = combat::apply_damage(player, amount, self.player_tuning.respawn_seconds)?;
        if outcome == DamageOutcome::Killed {
            self.on_killed(victim, killer, events);
        }
        Some(outcome)
    }

    fn on_killed(&mut self, victim: Handle<Player>, killer: u8, events: &mut Vec<ServerEvent>) {
        let Some(player) = self.players.get_mut(victim) else {
            return;
        };
        let position = player.position;
        if let Some(v) = player.vehicle.take().and_then(|vh| self.vehicles.get_mut(vh)) {
            v.driver = None;
        }

        objectives::drop_carried(&mut self.flags, victim, position, &self.objective_tuning);
        let victim_id = wire_id(victim);
        events.push(ServerEvent::PlayerDied {
            victim: victim_id,
            killer,
        });
        self.kill_feed.push(KillEvent {
            killer,
            victim: victim_id,
            timer: self.player_tuning.kill_feed_seconds,
        });
        info!(victim = victim_id, killer, "player killed");
    }

    fn damage_vehicle(&mut self, vh: Handle<Vehicle>, amount: i32, attacker: u8, events: &mut Vec<ServerEvent>) {
        let Some(vehicle) = self.vehicles.get_mut(vh) else {
            return;
        };
        if !vehicle.active {
            return;
        }
        vehicle.health -= amount;
        if vehicle.health > 0 {
            return;
        }

        let driver = vehicle.driver;
        vehicle.wreck(WRECK_SECONDS);
        info!(vehicle = vh.index(), attacker, "vehicle destroyed");

        if let Some(driver) = driver {
            if let Some(player) = self.players.get_mut(driver) {
                player.vehicle = None;
            }
            self.damage_player(driver, i32::MAX, attacker, events);
        }
    }

    fn tick_vehicles(&mut self, events: &mut Vec<ServerEvent>) {
        let dt = self.settings.dt;

        for vh in self.vehicles.handles() {
            let Some(vehicle) = self.vehicles.get_mut(vh) else {
                continue;
            };
            if !vehicle.active {
                if vehicles::tick_wreck(vehicle, dt) {
                    debug!(vehicle = vh.index(), "vehicle respawned");
                }
                continue;
            }

            let driver = vehicle.driver.and_then(|d| {
                self.players
                    .get(d)
                    .filter(|p| p.is_alive() && p.vehicle == Some(vh))
                    .map(|p| (d, p.input, p.team))
            });
            let Some((driver, input, team)) = driver else {
                vehicle.driver = None;
                vehicles::idle(vehicle, &self.world, dt);
                continue;
            };

            let cannon = vehicles::drive(vehicle, &input, &self.world, dt);
            let seat = vehicles::seat_position(vehicle);
            let position = vehicle.position;
            let velocity = vehicle.velocity;
            let speed = Vec3::new(velocity.x, 0.0, velocity.z).length();
            let airborne = vehicle.kind.definition().airborne;

            if let Some(player) = self.players.get_mut(driver) {
                player.position = seat;
                player.velocity = Vec3::ZERO;
                if input.is_finite() {
                    player.yaw = input.yaw;
                    player.pitch = input.pitch.clamp(-self.player_tuning.pitch_limit, self.player_tuning.pitch_limit);
                }
            }

            if let Some(shot) = cannon {
                self.resolve_cannon(vh, driver, &shot, events);
            }

            if let Some(damage) = vehicles::run_over_damage(speed).filter(|_| !airborne) {
                let victims: Vec<Handle<Player>> = self
                    .players
                    .iter()
                    .filter(|(_, p)| p.is_on_foot() && p.team != team)
                    .filter(|(_, p)| {
                        let d = p.position - position;
                        d.x * d.x + d.z * d.z < RUN_OVER_RADIUS * RUN_OVER_RADIUS
                    })
                    .map(|(h, _)| h)
                    .collect();
                for victim in victims {
                    self.hit(Target::Player(victim), damage, wire_id(driver), events);
                    if let Some(p) = self.players.get_mut(victim).filter(|p| p.is_alive()) {
                        p.velocity = vehicles::run_over_knockback(velocity);
                    }
                }
            }
        }
    }

    fn tick_flags(&mut self) {
        let events = objectives::tick_flags(
            &mut self.flags,
            &self.players,
            &mut self.scores,
            &self.objective_tuning,
            self.settings.dt,
        );
        for event in events {
            match event {
                FlagEvent::Captured { team, by } => {
                    info!(team, player_id = by.index(), scores = ?self.scores, "flag captured")
                }
                FlagEvent::Taken { team, by } => debug!(team, player_id = by.index(), "flag taken"),
                FlagEvent::Dropped { team } => debug!(team, "flag dropped"),
                FlagEvent::Returned { team } => debug!(team, "flag returned"),
            }
        }
    }

    fn tick_hazards(&mut self, events: &mut Vec<ServerEvent>) {
        let dt = self.settings.dt;

        for i in 0..self.tornados.len() {
            let pulse = hazards::tick_tornado(
                &mut self.tornados[i],
                &self.world,
                &self.hazard_tuning,
                &mut self.rng,
                dt,
            );
            if !pulse {
                continue;
            }
            let tornado = self.tornados[i].clone();

            let caught: Vec<Handle<Player>> = self
                .players
                .iter()
                .filter(|(_, p)| p.is_on_foot() && hazards::in_funnel(&tornado, p.position))
                .map(|(h, _)| h)
                .collect();
            for h in caught {
                if let Some(player) = self.players.get_mut(h) {
                    player.velocity = hazards::fling_velocity(&tornado, player.position, &self.hazard_tuning);
                    player.position.y += FLING_HOP;
                }
                self.damage_player(h, self.hazard_tuning.player_damage, WORLD_KILLER, events);
            }

            let swept: Vec<Handle<Vehicle>> = self
                .vehicles
                .iter()
                .filter(|(_, v)| v.active && hazards::in_funnel(&tornado, v.position))
                .map(|(h, _)| h)
                .collect();
            for vh in swept {
                self.damage_vehicle(vh, self.hazard_tuning.vehicle_damage, WORLD_KILLER, events);
            }
        }
    }

    fn expire_kill_feed(&mut self) {
        let dt = self.settings.dt;
        for entry in &mut self.kill_feed {
            entry.timer -= dt;
        }
        self.kill_feed.retain(|e| e.timer > 0.0);
    }

    fn expire_connections(&mut self) {
        let expired = self
            .connections
            .expire(self.settings.dt, self.settings.connection_timeout);
        for (addr, conn) in expired {
            info!(%addr, player_id = conn.player.index(), "connection timed out");
            self.remove_player(conn.player);
        }
    }

    fn snapshot(&self) -> WorldUpdate {
        let players = self
            .players
            .iter()
            .map(|(h, p)| PlayerSnapshot {
                id: wire_id(h),
                state: p.state.code(),
                position: p.position,
                yaw: p.yaw,
                pitch: p.pitch,
                health: p.health.clamp(0, 255) as u8,
                weapon: p.weapon,
                ammo: p.ammo.clamp(0, 255) as u8,
                vehicle: wire_ref(p.vehicle),
                team: p.team,
                class: p.class,
                spotted: p.spotted_timer > 0.0,
            })
            .collect();

        let pickups = self
            .pickups
            .iter()
            .enumerate()
            .map(|(i, p)| PickupSnapshot {
                id: u16::try_from(i).unwrap_or(u16::MAX),
                kind: p.kind,
                position: p.position,
                active: p.active,
            })
            .collect();

        let vehicles = self
            .vehicles
            .iter()
            .map(|(h, v)| VehicleSnapshot {
                id: wire_id(h),
                kind: v.kind,
                position: v.position,
                yaw: v.yaw,
                pitch: v.pitch,
                turret_yaw: v.turret_yaw,
                health: v.health.clamp(0, i32::from(i16::MAX)) as i16,
                driver: wire_ref(v.driver),
                active: v.active,
                rotor: v.rotor_angle,
            })
            .collect();

        let flags = self
            .flags
            .iter()
            .map(|f| FlagSnapshot {
                team: f.team,
                position: f.position,
                carrier: wire_ref(f.carrier),
                at_base: f.at_base,
            })
            .collect();

        let hazards = self
            .tornados
            .iter()
            .map(|t| HazardSnapshot {
                position: t.position,
                radius: t.radius,
                rotation: t.rotation,
                active: t.active,
            })
            .collect();

        WorldUpdate {
            tick: self.tick,
            scores: self.scores,
            players,
            pickups,
            vehicles,
            flags,
            hazards,
        }
    }
}
