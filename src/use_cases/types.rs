// Use-case level inputs/outputs for the game loop.

use crate::domain::InputState;
use crate::domain::tuning::{PlayerClass, VehicleKind, WeaponKind};
use glam::Vec3;
use std::net::SocketAddr;

/// Killer id reported when no player is responsible (hazards).
pub const WORLD_KILLER: u8 = 255;

/// Decoded client traffic, keyed by the datagram source address.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Join {
        addr: SocketAddr,
        name: String,
    },
    Input {
        addr: SocketAddr,
        seq: u32,
        input: InputState,
        class: Option<PlayerClass>,
    },
    Leave {
        addr: SocketAddr,
    },
}

/// Notifications broadcast to every connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerEvent {
    PlayerHit { attacker: u8, victim: u8, damage: i16 },
    PlayerDied { victim: u8, killer: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinAck {
    pub player_id: u8,
    pub bot_count: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
    ServerFull,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: u8,
    pub state: u8,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub health: u8,
    pub weapon: WeaponKind,
    pub ammo: u8,
    /// Vehicle slot, or -1 when on foot.
    pub vehicle: i16,
    pub team: u8,
    pub class: PlayerClass,
    pub spotted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickupSnapshot {
    pub id: u16,
    pub kind: WeaponKind,
    pub position: Vec3,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshot {
    pub id: u8,
    pub kind: VehicleKind,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub turret_yaw: f32,
    pub health: i16,
    /// Driver slot, or -1.
    pub driver: i16,
    pub active: bool,
    pub rotor: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlagSnapshot {
    pub team: u8,
    pub position: Vec3,
    /// Carrier slot, or -1.
    pub carrier: i16,
    pub at_base: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HazardSnapshot {
    pub position: Vec3,
    pub radius: f32,
    pub rotation: f32,
    pub active: bool,
}

/// Full world state after one tick, identical for every recipient apart
/// from the acked input sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldUpdate {
    pub tick: u32,
    pub scores: [u8; 2],
    pub players: Vec<PlayerSnapshot>,
    pub pickups: Vec<PickupSnapshot>,
    pub vehicles: Vec<VehicleSnapshot>,
    pub flags: Vec<FlagSnapshot>,
    pub hazards: Vec<HazardSnapshot>,
}

/// Everything the network layer must send after a tick.
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    pub acks: Vec<(SocketAddr, JoinAck)>,
    pub events: Vec<ServerEvent>,
    pub update: WorldUpdate,
    /// Every live connection with the last input sequence it had applied.
    pub recipients: Vec<(SocketAddr, u32)>,
}
