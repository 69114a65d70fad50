// Per-tick simulation rules, one module per concern.

pub mod abilities;
pub mod combat;
pub mod hazards;
pub mod movement;
pub mod objectives;
pub mod pickups;
pub mod vehicles;
