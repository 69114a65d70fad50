// Vehicle definitions. Ground vehicles stay on the floor; air vehicles fly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VehicleKind {
    Jeep = 0,
    Tank = 1,
    Helicopter = 2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleDef {
    pub name: &'static str,
    /// Forward speed in units per second (reverse is half).
    pub speed: f32,
    /// Turn rate in radians per second.
    pub turn_rate: f32,
    pub max_health: i32,
    /// Cannon damage; 0 means unarmed.
    pub cannon_damage: i32,
    /// Seconds between cannon shots.
    pub cannon_rate: f32,
    pub cannon_range: f32,
    pub airborne: bool,
    /// Vertical speed for air vehicles.
    pub climb_rate: f32,
    pub ceiling: f32,
}

const DEFS: [VehicleDef; 3] = [
    VehicleDef {
        name: "Jeep",
        speed: 22.0,
        turn_rate: 2.5,
        max_health: 250,
        cannon_damage: 0,
        cannon_rate: 0.0,
        cannon_range: 0.0,
        airborne: false,
        climb_rate: 0.0,
        ceiling: 0.0,
    },
    VehicleDef {
        name: "Tank",
        speed: 9.0,
        turn_rate: 1.2,
        max_health: 1200,
        cannon_damage: 80,
        cannon_rate: 2.0,
        cannon_range: 500.0,
        airborne: false,
        climb_rate: 0.0,
        ceiling: 0.0,
    },
    VehicleDef {
        name: "Helicopter",
        speed: 18.0,
        turn_rate: 1.8,
        max_health: 400,
        cannon_damage: 0,
        cannon_rate: 0.0,
        cannon_range: 0.0,
        airborne: true,
        climb_rate: 6.0,
        ceiling: 40.0,
    },
];

impl VehicleKind {
    pub fn definition(self) -> &'static VehicleDef {
        &DEFS[self as usize]
    }

    pub fn from_wire(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Jeep),
            1 => Some(Self::Tank),
            2 => Some(Self::Helicopter),
            _ => None,
        }
    }
}

/// Seconds a destroyed vehicle stays wrecked before respawning.
pub const WRECK_SECONDS: f32 = 30.0;
/// Max distance at which a player can climb into a free vehicle.
pub const ENTER_RANGE: f32 = 3.5;
/// Ground speed above which a vehicle hurts on-foot players it touches.
pub const RUN_OVER_SPEED: f32 = 5.0;
pub const RUN_OVER_RADIUS: f32 = 2.5;
/// Share of the vehicle's velocity passed to a surviving victim.
pub const RUN_OVER_PUSH: f32 = 0.5;
pub const RUN_OVER_LIFT: f32 = 5.0;
/// Ground vehicles ride slightly above the floor.
pub const GROUND_CLEARANCE: f32 = 0.1;
