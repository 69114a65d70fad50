// Frameworks layer: runtime bootstrap, configuration and the built-in map.

pub mod arena;
pub mod config;
pub mod server;
