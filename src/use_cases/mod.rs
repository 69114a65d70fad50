// Use cases layer: application workflows for the game server.

pub mod connections;
pub mod game;
pub mod scheduler;
pub mod types;

pub use game::{SimSettings, Simulation};
pub use scheduler::FixedStep;
pub use types::{GameEvent, JoinAck, JoinError, ServerEvent, TickOutput, WorldUpdate};
