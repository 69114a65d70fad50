// Player classes: a passive tweak plus one cooldown-gated ability each.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PlayerClass {
    #[default]
    Assault = 0,
    Engineer = 1,
    Support = 2,
    Recon = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityKind {
    /// Temporary speed multiplier.
    Sprint,
    /// Restores health to the nearest vehicle.
    Repair,
    /// Restores health to self and nearby teammates.
    Heal,
    /// Marks visible enemies in snapshots.
    Spot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDef {
    pub name: &'static str,
    pub max_health: i32,
    pub speed_multiplier: f32,
    pub ability: AbilityKind,
    pub ability_cooldown: f32,
    /// Effect duration (sprint, spot) or 0 for instant abilities.
    pub ability_duration: f32,
    /// Effect radius (repair, heal, spot) or 0.
    pub ability_radius: f32,
    /// Health restored by repair/heal, or speed multiplier for sprint.
    pub ability_amount: f32,
}

const DEFS: [ClassDef; 4] = [
    ClassDef {
        name: "Assault",
        max_health: 100,
        speed_multiplier: 1.0,
        ability: AbilityKind::Sprint,
        ability_cooldown: 12.0,
        ability_duration: 3.0,
        ability_radius: 0.0,
        ability_amount: 1.6,
    },
    ClassDef {
        name: "Engineer",
        max_health: 100,
        speed_multiplier: 1.0,
        ability: AbilityKind::Repair,
        ability_cooldown: 15.0,
        ability_duration: 0.0,
        ability_radius: 4.0,
        ability_amount: 250.0,
    },
    ClassDef {
        name: "Support",
        max_health: 100,
        speed_multiplier: 1.0,
        ability: AbilityKind::Heal,
        ability_cooldown: 20.0,
        ability_duration: 0.0,
        ability_radius: 8.0,
        ability_amount: 40.0,
    },
    ClassDef {
        name: "Recon",
        max_health: 80,
        speed_multiplier: 1.1,
        ability: AbilityKind::Spot,
        ability_cooldown: 18.0,
        ability_duration: 6.0,
        ability_radius: 60.0,
        ability_amount: 0.0,
    },
];

impl PlayerClass {
    pub fn definition(self) -> &'static ClassDef {
        &DEFS[self as usize]
    }

    pub fn from_wire(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Assault),
            1 => Some(Self::Engineer),
            2 => Some(Self::Support),
            3 => Some(Self::Recon),
            _ => None,
        }
    }
}
