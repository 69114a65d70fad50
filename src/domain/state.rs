// Domain-level simulation entities.
//
// Records are owned by the simulation's entity stores; cross references
// between them are generational handles so a recycled slot never aliases.

use super::geometry::Aabb;
use super::input::InputState;
use super::store::Handle;
use super::tuning::{PlayerClass, PlayerTuning, VehicleKind, WeaponKind};
use super::world::{PickupSpawn, VehicleSpawn};
use glam::Vec3;

/// Lifecycle of an occupied player slot. A free slot is "disconnected".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Alive,
    Dead,
    /// Joined a world without spawn points.
    Spectating,
}

impl PlayerState {
    /// Wire code; 0 is reserved for disconnected slots.
    pub fn code(self) -> u8 {
        match self {
            PlayerState::Alive => 1,
            PlayerState::Dead => 2,
            PlayerState::Spectating => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub health: i32,
    pub weapon: WeaponKind,
    pub ammo: i32,
    pub state: PlayerState,
    pub team: u8,
    pub class: PlayerClass,
    /// Applied at the next spawn.
    pub pending_class: Option<PlayerClass>,
    pub vehicle: Option<Handle<Vehicle>>,
    pub respawn_timer: f32,
    pub fire_cooldown: f32,
    pub ability_cooldown: f32,
    pub sprint_timer: f32,
    /// Seconds this player stays marked for the enemy team.
    pub spotted_timer: f32,
    /// Latest applied input (network or bot).
    pub input: InputState,
    pub is_bot: bool,
}

impl Player {
    /// Fresh record waiting for its first spawn.
    pub fn new(name: String, team: u8, is_bot: bool) -> Self {
        let weapon = WeaponKind::Pistol;
        Self {
            name,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            health: 0,
            weapon,
            ammo: weapon.definition().mag_size,
            state: PlayerState::Dead,
            team,
            class: PlayerClass::default(),
            pending_class: None,
            vehicle: None,
            respawn_timer: 0.0,
            fire_cooldown: 0.0,
            ability_cooldown: 0.0,
            sprint_timer: 0.0,
            spotted_timer: 0.0,
            input: InputState::default(),
            is_bot,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == PlayerState::Alive
    }

    /// Alive and not riding a vehicle.
    pub fn is_on_foot(&self) -> bool {
        self.is_alive() && self.vehicle.is_none()
    }

    pub fn max_health(&self) -> i32 {
        self.class.definition().max_health
    }

    pub fn eye(&self, tuning: &PlayerTuning) -> Vec3 {
        self.position + Vec3::new(0.0, tuning.eye_height, 0.0)
    }

    pub fn body(&self, tuning: &PlayerTuning) -> Aabb {
        Aabb::body(self.position, tuning.radius, tuning.height)
    }

    pub fn equip(&mut self, weapon: WeaponKind) {
        self.weapon = weapon;
        self.ammo = weapon.definition().mag_size;
    }

    /// Puts the player back into play at a spawn pose.
    pub fn spawn_at(&mut self, position: Vec3, yaw: f32) {
        if let Some(class) = self.pending_class.take() {
            self.class = class;
        }
        self.position = position;
        self.yaw = yaw;
        self.pitch = 0.0;
        self.velocity = Vec3::ZERO;
        self.health = self.max_health();
        self.state = PlayerState::Alive;
        self.fire_cooldown = 0.0;
        self.respawn_timer = 0.0;
        self.sprint_timer = 0.0;
        self.spotted_timer = 0.0;
        self.vehicle = None;
        if self.weapon == WeaponKind::None {
            self.equip(WeaponKind::Pistol);
        }
    }

    pub fn kill(&mut self, respawn_seconds: f32) {
        self.health = 0;
        self.state = PlayerState::Dead;
        self.respawn_timer = respawn_seconds;
        self.velocity = Vec3::ZERO;
        self.sprint_timer = 0.0;
        // Spot marks do not survive death.
        self.spotted_timer = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub kind: VehicleKind,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Turret heading relative to the hull.
    pub turret_yaw: f32,
    pub velocity: Vec3,
    pub health: i32,
    pub driver: Option<Handle<Player>>,
    /// False while wrecked.
    pub active: bool,
    pub fire_cooldown: f32,
    pub respawn_timer: f32,
    pub spawn_position: Vec3,
    pub spawn_yaw: f32,
    pub rotor_angle: f32,
}

impl Vehicle {
    pub fn new(spawn: &VehicleSpawn) -> Self {
        Self {
            kind: spawn.kind,
            position: spawn.position,
            yaw: spawn.yaw,
            pitch: 0.0,
            turret_yaw: 0.0,
            velocity: Vec3::ZERO,
            health: spawn.kind.definition().max_health,
            driver: None,
            active: true,
            fire_cooldown: 0.0,
            respawn_timer: 0.0,
            spawn_position: spawn.position,
            spawn_yaw: spawn.yaw,
            rotor_angle: 0.0,
        }
    }

    /// Active and unclaimed.
    pub fn is_free(&self) -> bool {
        self.active && self.driver.is_none()
    }

    pub fn wreck(&mut self, seconds: f32) {
        self.active = false;
        self.respawn_timer = seconds;
        self.velocity = Vec3::ZERO;
        self.driver = None;
    }

    pub fn respawn(&mut self) {
        self.position = self.spawn_position;
        self.yaw = self.spawn_yaw;
        self.pitch = 0.0;
        self.turret_yaw = 0.0;
        self.velocity = Vec3::ZERO;
        self.health = self.kind.definition().max_health;
        self.driver = None;
        self.active = true;
        self.fire_cooldown = 0.0;
        self.respawn_timer = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Pickup {
    pub kind: WeaponKind,
    pub position: Vec3,
    pub active: bool,
    pub respawn_timer: f32,
}

impl From<&PickupSpawn> for Pickup {
    fn from(spawn: &PickupSpawn) -> Self {
        Self {
            kind: spawn.kind,
            position: spawn.position,
            active: true,
            respawn_timer: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub team: u8,
    pub base: Vec3,
    pub position: Vec3,
    pub carrier: Option<Handle<Player>>,
    pub at_base: bool,
    /// Counts down while dropped away from base.
    pub return_timer: f32,
}

impl Flag {
    pub fn new(team: u8, base: Vec3) -> Self {
        Self {
            team,
            base,
            position: base,
            carrier: None,
            at_base: true,
            return_timer: 0.0,
        }
    }

    pub fn return_home(&mut self) {
        self.position = self.base;
        self.carrier = None;
        self.at_base = true;
        self.return_timer = 0.0;
    }

    pub fn drop_at(&mut self, position: Vec3, return_seconds: f32) {
        self.position = position;
        self.carrier = None;
        self.at_base = false;
        self.return_timer = return_seconds;
    }
}

#[derive(Debug, Clone)]
pub struct Tornado {
    pub position: Vec3,
    /// Drift heading (yaw convention).
    pub heading: f32,
    pub radius: f32,
    /// Visual spin angle.
    pub rotation: f32,
    pub active: bool,
    /// Time left in the current active or dormant phase.
    pub phase_timer: f32,
    pub pulse_timer: f32,
}

/// Kill-feed entry, kept for a few seconds after a kill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillEvent {
    pub killer: u8,
    pub victim: u8,
    pub timer: f32,
}
