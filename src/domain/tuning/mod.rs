// Gameplay tuning tables. Runtime/server settings live in `frameworks::config`.

pub mod class;
pub mod hazard;
pub mod objective;
pub mod player;
pub mod vehicle;
pub mod weapon;

pub use class::{AbilityKind, ClassDef, PlayerClass};
pub use hazard::HazardTuning;
pub use objective::ObjectiveTuning;
pub use player::PlayerTuning;
pub use vehicle::{VehicleDef, VehicleKind};
pub use weapon::{WeaponDef, WeaponKind};
