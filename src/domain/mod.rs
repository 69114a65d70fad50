// Domain layer: core simulation types and rules.

pub mod ai;
pub mod geometry;
pub mod input;
pub mod pathfinding;
pub mod state;
pub mod store;
pub mod systems;
pub mod tuning;
pub mod world;

pub use input::{InputState, Keys};
pub use state::{Flag, KillEvent, Pickup, Player, PlayerState, Tornado, Vehicle};
pub use store::{EntityStore, Handle};
pub use world::{World, WorldBuilder};
