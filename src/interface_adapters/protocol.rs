// Binary wire protocol: packed little-endian datagrams, first byte is the kind.
//
// Client and server kinds overlap numerically; direction disambiguates.

use crate::domain::tuning::{PlayerClass, VehicleKind, WeaponKind};
use crate::domain::{InputState, Keys};
use crate::use_cases::types::{
    FlagSnapshot, HazardSnapshot, JoinAck, PickupSnapshot, PlayerSnapshot, ServerEvent, VehicleSnapshot, WorldUpdate,
};
use bytes::{Buf, BufMut, BytesMut};
use glam::Vec3;

pub mod kind {
    // Client -> server.
    pub const JOIN: u8 = 1;
    pub const INPUT: u8 = 2;
    pub const DISCONNECT: u8 = 3;

    // Server -> client.
    pub const JOIN_ACK: u8 = 1;
    pub const SNAPSHOT: u8 = 2;
    pub const PLAYER_HIT: u8 = 3;
    pub const PLAYER_DIED: u8 = 4;
}

/// Fixed name field, NUL padded. At most `NAME_LEN - 1` bytes are used.
pub const NAME_LEN: usize = 32;
pub const JOIN_LEN: usize = 1 + NAME_LEN;
pub const INPUT_LEN: usize = 1 + 4 + 2 + 4 + 4;
pub const NO_CLASS: u8 = 0xFF;
pub const JOIN_ACK_LEN: usize = 3;
pub const PLAYER_HIT_LEN: usize = 5;
pub const PLAYER_DIED_LEN: usize = 3;

/// Byte offset of the acked input sequence inside a snapshot.
pub const SNAPSHOT_ACK_OFFSET: usize = 5;
const SNAPSHOT_HEADER_LEN: usize = 1 + 4 + 4 + 1 + 2;
const PLAYER_RECORD_LEN: usize = 1 + 1 + 12 + 4 + 4 + 1 + 1 + 1 + 2 + 1 + 1 + 1;
const PICKUP_RECORD_LEN: usize = 2 + 1 + 12 + 1;
const VEHICLE_RECORD_LEN: usize = 1 + 1 + 12 + 4 + 4 + 4 + 2 + 2 + 1 + 4;
const FLAG_RECORD_LEN: usize = 1 + 12 + 2 + 1;
const HAZARD_RECORD_LEN: usize = 12 + 4 + 4 + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Empty,
    UnknownKind(u8),
    Truncated { kind: u8, expected: usize, actual: usize },
    /// An enum byte outside its known range.
    InvalidField { kind: u8, field: &'static str, value: u8 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientPacket {
    Join {
        name: String,
    },
    Input {
        seq: u32,
        input: InputState,
        class: Option<PlayerClass>,
    },
    Disconnect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerPacket {
    JoinAck(JoinAck),
    Snapshot { ack: u32, update: WorldUpdate },
    Event(ServerEvent),
}

/// Cursor over one datagram that turns short reads into `Truncated`.
struct Reader<'a> {
    kind: u8,
    total: usize,
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(kind: u8, data: &'a [u8]) -> Self {
        Self {
            kind,
            total: data.len(),
            buf: &data[1..],
        }
    }

    fn need(&self, n: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < n {
            return Err(DecodeError::Truncated {
                kind: self.kind,
                expected: self.total - self.buf.remaining() + n,
                actual: self.total,
            });
        }
        Ok(())
    }

    fn vec3(&mut self) -> Vec3 {
        let x = self.buf.get_f32_le();
        let y = self.buf.get_f32_le();
        let z = self.buf.get_f32_le();
        Vec3::new(x, y, z)
    }

    fn flag(&mut self) -> bool {
        self.buf.get_u8() != 0
    }

    fn invalid(&self, field: &'static str, value: u8) -> DecodeError {
        DecodeError::InvalidField {
            kind: self.kind,
            field,
            value,
        }
    }
}

fn put_vec3(buf: &mut BytesMut, v: Vec3) {
    buf.put_f32_le(v.x);
    buf.put_f32_le(v.y);
    buf.put_f32_le(v.z);
}

fn wire_count(len: usize) -> u8 {
    u8::try_from(len).unwrap_or(u8::MAX)
}

/// Longest prefix of `name` that fits the name field on a char boundary.
fn clip_name(name: &str) -> &str {
    let mut end = name.len().min(NAME_LEN - 1);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

impl ClientPacket {
    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            ClientPacket::Join { name } => {
                let name = clip_name(name).as_bytes();
                buf.put_u8(kind::JOIN);
                buf.put_slice(name);
                buf.put_bytes(0, NAME_LEN - name.len());
            }
            ClientPacket::Input { seq, input, class } => {
                buf.put_u8(kind::INPUT);
                buf.put_u32_le(*seq);
                buf.put_u16_le(input.keys.bits());
                buf.put_f32_le(input.yaw);
                buf.put_f32_le(input.pitch);
                buf.put_u8(class.map_or(NO_CLASS, |c| c as u8));
            }
            ClientPacket::Disconnect => buf.put_u8(kind::DISCONNECT),
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let &k = data.first().ok_or(DecodeError::Empty)?;
        let mut r = Reader::new(k, data);
        match k {
            kind::JOIN => {
                r.need(NAME_LEN)?;
                let field = &r.buf[..NAME_LEN];
                let len = field.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
                let name = String::from_utf8_lossy(&field[..len]);
                Ok(ClientPacket::Join {
                    name: clip_name(&name).to_string(),
                })
            }
            kind::INPUT => {
                r.need(INPUT_LEN - 1)?;
                let seq = r.buf.get_u32_le();
                let keys = Keys::from_bits_truncate(r.buf.get_u16_le());
                let yaw = r.buf.get_f32_le();
                let pitch = r.buf.get_f32_le();
                // Trailing class byte is optional; unknown values mean "no change".
                let class = if r.buf.has_remaining() {
                    PlayerClass::from_wire(r.buf.get_u8())
                } else {
                    None
                };
                Ok(ClientPacket::Input {
                    seq,
                    input: InputState { keys, yaw, pitch },
                    class,
                })
            }
            kind::DISCONNECT => Ok(ClientPacket::Disconnect),
            other => Err(DecodeError::UnknownKind(other)),
        }
    }
}

impl From<ServerEvent> for ServerPacket {
    fn from(event: ServerEvent) -> Self {
        ServerPacket::Event(event)
    }
}

impl ServerPacket {
    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            ServerPacket::JoinAck(ack) => {
                buf.put_u8(kind::JOIN_ACK);
                buf.put_u8(ack.player_id);
                buf.put_u8(ack.bot_count);
            }
            ServerPacket::Snapshot { ack, update } => encode_snapshot(update, *ack, buf),
            ServerPacket::Event(ServerEvent::PlayerHit {
                attacker,
                victim,
                damage,
            }) => {
                buf.put_u8(kind::PLAYER_HIT);
                buf.put_u8(*attacker);
                buf.put_u8(*victim);
                buf.put_i16_le(*damage);
            }
            ServerPacket::Event(ServerEvent::PlayerDied { victim, killer }) => {
                buf.put_u8(kind::PLAYER_DIED);
                buf.put_u8(*victim);
                buf.put_u8(*killer);
            }
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let &k = data.first().ok_or(DecodeError::Empty)?;
        let mut r = Reader::new(k, data);
        match k {
            kind::JOIN_ACK => {
                r.need(JOIN_ACK_LEN - 1)?;
                Ok(ServerPacket::JoinAck(JoinAck {
                    player_id: r.buf.get_u8(),
                    bot_count: r.buf.get_u8(),
                }))
            }
            kind::SNAPSHOT => decode_snapshot(&mut r),
            kind::PLAYER_HIT => {
                r.need(PLAYER_HIT_LEN - 1)?;
                Ok(ServerPacket::Event(ServerEvent::PlayerHit {
                    attacker: r.buf.get_u8(),
                    victim: r.buf.get_u8(),
                    damage: r.buf.get_i16_le(),
                }))
            }
            kind::PLAYER_DIED => {
                r.need(PLAYER_DIED_LEN - 1)?;
                Ok(ServerPacket::Event(ServerEvent::PlayerDied {
                    victim: r.buf.get_u8(),
                    killer: r.buf.get_u8(),
                }))
            }
            other => Err(DecodeError::UnknownKind(other)),
        }
    }
}

/// Serializes a world update. Each section is prefixed by its record count;
/// sections longer than 255 records are cut at 255.
pub fn encode_snapshot(update: &WorldUpdate, ack: u32, buf: &mut BytesMut) {
    let players = &update.players[..usize::from(wire_count(update.players.len()))];
    buf.reserve(SNAPSHOT_HEADER_LEN + players.len() * PLAYER_RECORD_LEN);

    buf.put_u8(kind::SNAPSHOT);
    buf.put_u32_le(update.tick);
    buf.put_u32_le(ack);
    buf.put_u8(wire_count(players.len()));
    buf.put_u8(update.scores[0]);
    buf.put_u8(update.scores[1]);

    for p in players {
        buf.put_u8(p.id);
        buf.put_u8(p.state);
        put_vec3(buf, p.position);
        buf.put_f32_le(p.yaw);
        buf.put_f32_le(p.pitch);
        buf.put_u8(p.health);
        buf.put_u8(p.weapon as u8);
        buf.put_u8(p.ammo);
        buf.put_i16_le(p.vehicle);
        buf.put_u8(p.team);
        buf.put_u8(p.class as u8);
        buf.put_u8(u8::from(p.spotted));
    }

    let pickups = &update.pickups[..usize::from(wire_count(update.pickups.len()))];
    buf.put_u8(wire_count(pickups.len()));
    for p in pickups {
        buf.put_u16_le(p.id);
        buf.put_u8(p.kind as u8);
        put_vec3(buf, p.position);
        buf.put_u8(u8::from(p.active));
    }

    let vehicles = &update.vehicles[..usize::from(wire_count(update.vehicles.len()))];
    buf.put_u8(wire_count(vehicles.len()));
    for v in vehicles {
        buf.put_u8(v.id);
        buf.put_u8(v.kind as u8);
        put_vec3(buf, v.position);
        buf.put_f32_le(v.yaw);
        buf.put_f32_le(v.pitch);
        buf.put_f32_le(v.turret_yaw);
        buf.put_i16_le(v.health);
        buf.put_i16_le(v.driver);
        buf.put_u8(u8::from(v.active));
        buf.put_f32_le(v.rotor);
    }

    let flags = &update.flags[..usize::from(wire_count(update.flags.len()))];
    buf.put_u8(wire_count(flags.len()));
    for f in flags {
        buf.put_u8(f.team);
        put_vec3(buf, f.position);
        buf.put_i16_le(f.carrier);
        buf.put_u8(u8::from(f.at_base));
    }

    let hazards = &update.hazards[..usize::from(wire_count(update.hazards.len()))];
    buf.put_u8(wire_count(hazards.len()));
    for h in hazards {
        put_vec3(buf, h.position);
        buf.put_f32_le(h.radius);
        buf.put_f32_le(h.rotation);
        buf.put_u8(u8::from(h.active));
    }
}

/// Overwrites the acked input sequence of an encoded snapshot in place.
pub fn patch_ack(snapshot: &mut [u8], ack: u32) {
    if let Some(slot) = snapshot.get_mut(SNAPSHOT_ACK_OFFSET..SNAPSHOT_ACK_OFFSET + 4) {
        slot.copy_from_slice(&ack.to_le_bytes());
    }
}

fn decode_snapshot(r: &mut Reader<'_>) -> Result<ServerPacket, DecodeError> {
    r.need(SNAPSHOT_HEADER_LEN - 1)?;
    let tick = r.buf.get_u32_le();
    let ack = r.buf.get_u32_le();
    let player_count = usize::from(r.buf.get_u8());
    let scores = [r.buf.get_u8(), r.buf.get_u8()];

    r.need(player_count * PLAYER_RECORD_LEN)?;
    let mut players = Vec::with_capacity(player_count);
    for _ in 0..player_count {
        let id = r.buf.get_u8();
        let state = r.buf.get_u8();
        let position = r.vec3();
        let yaw = r.buf.get_f32_le();
        let pitch = r.buf.get_f32_le();
        let health = r.buf.get_u8();
        let weapon_byte = r.buf.get_u8();
        let weapon = WeaponKind::from_wire(weapon_byte).ok_or_else(|| r.invalid("weapon", weapon_byte))?;
        let ammo = r.buf.get_u8();
        let vehicle = r.buf.get_i16_le();
        let team = r.buf.get_u8();
        let class_byte = r.buf.get_u8();
        let class = PlayerClass::from_wire(class_byte).ok_or_else(|| r.invalid("class", class_byte))?;
        let spotted = r.flag();
        players.push(PlayerSnapshot {
            id,
            state,
            position,
            yaw,
            pitch,
            health,
            weapon,
            ammo,
            vehicle,
            team,
            class,
            spotted,
        });
    }

    r.need(1)?;
    let count = usize::from(r.buf.get_u8());
    r.need(count * PICKUP_RECORD_LEN)?;
    let mut pickups = Vec::with_capacity(count);
    for _ in 0..count {
        let id = r.buf.get_u16_le();
        let kind_byte = r.buf.get_u8();
        let kind = WeaponKind::from_wire(kind_byte).ok_or_else(|| r.invalid("pickup kind", kind_byte))?;
        let position = r.vec3();
        let active = r.flag();
        pickups.push(PickupSnapshot {
            id,
            kind,
            position,
            active,
        });
    }

    r.need(1)?;
    let count = usize::from(r.buf.get_u8());
    r.need(count * VEHICLE_RECORD_LEN)?;
    let mut vehicles = Vec::with_capacity(count);
    for _ in 0..count {
        let id = r.buf.get_u8();
        let kind_byte = r.buf.get_u8();
        let kind = VehicleKind::from_wire(kind_byte).ok_or_else(|| r.invalid("vehicle kind", kind_byte))?;
        vehicles.push(VehicleSnapshot {
            id,
            kind,
            position: r.vec3(),
            yaw: r.buf.get_f32_le(),
            pitch: r.buf.get_f32_le(),
            turret_yaw: r.buf.get_f32_le(),
            health: r.buf.get_i16_le(),
            driver: r.buf.get_i16_le(),
            active: r.flag(),
            rotor: r.buf.get_f32_le(),
        });
    }

    r.need(1)?;
    let count = usize::from(r.buf.get_u8());
    r.need(count * FLAG_RECORD_LEN)?;
    let mut flags = Vec::with_capacity(count);
    for _ in 0..count {
        flags.push(FlagSnapshot {
            team: r.buf.get_u8(),
            position: r.vec3(),
            carrier: r.buf.get_i16_le(),
            at_base: r.flag(),
        });
    }

    r.need(1)?;
    let count = usize::from(r.buf.get_u8());
    r.need(count * HAZARD_RECORD_LEN)?;
    let mut hazards = Vec::with_capacity(count);
    for _ in 0..count {
        hazards.push(HazardSnapshot {
            position: r.vec3(),
            radius: r.buf.get_f32_le(),
            rotation: r.buf.get_f32_le(),
            active: r.flag(),
        });
    }

    Ok(ServerPacket::Snapshot {
        ack,
        update: WorldUpdate {
            tick,
            scores,
            players,
            pickups,
            vehicles,
            flags,
            hazards,
        },
    })
}
