// Hitscan weapon definitions, keyed by wire discriminant.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum WeaponKind {
    None = 0,
    #[default]
    Pistol = 1,
    Shotgun = 2,
    Rifle = 3,
    Sniper = 4,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponDef {
    pub name: &'static str,
    pub damage: i32,
    pub mag_size: i32,
    /// Seconds between shots.
    pub fire_rate: f32,
    /// Random aim offset in radians, applied to yaw and pitch independently.
    pub spread: f32,
    pub pellets: u32,
    pub range: f32,
}

const DEFS: [WeaponDef; 5] = [
    WeaponDef { name: "None", damage: 0, mag_size: 0, fire_rate: 0.0, spread: 0.0, pellets: 0, range: 0.0 },
    WeaponDef { name: "Pistol", damage: 25, mag_size: 12, fire_rate: 0.3, spread: 0.015, pellets: 1, range: 200.0 },
    WeaponDef { name: "Shotgun", damage: 12, mag_size: 8, fire_rate: 0.8, spread: 0.08, pellets: 8, range: 30.0 },
    WeaponDef { name: "Rifle", damage: 30, mag_size: 30, fire_rate: 0.1, spread: 0.02, pellets: 1, range: 300.0 },
    WeaponDef { name: "Sniper", damage: 90, mag_size: 5, fire_rate: 1.2, spread: 0.002, pellets: 1, range: 500.0 },
];

impl WeaponKind {
    pub fn definition(self) -> &'static WeaponDef {
        &DEFS[self as usize]
    }

    pub fn from_wire(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Pistol),
            2 => Some(Self::Shotgun),
            3 => Some(Self::Rifle),
            4 => Some(Self::Sniper),
            _ => None,
        }
    }
}

/// Table lookup for a weapon kind.
pub fn definition_for(kind: WeaponKind) -> &'static WeaponDef {
    kind.definition()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_discriminant() {
        assert_eq!(definition_for(WeaponKind::Rifle).damage, 30);
        assert_eq!(definition_for(WeaponKind::Shotgun).pellets, 8);
        assert_eq!(WeaponKind::from_wire(4), Some(WeaponKind::Sniper));
        assert_eq!(WeaponKind::from_wire(9), None);
    }
}
