// Computer-controlled players.

pub mod bot;
pub mod navigation;
pub mod perception;

pub use bot::{Bot, BotContext, BotState, Personality};
