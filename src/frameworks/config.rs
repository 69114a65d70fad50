use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn udp_port() -> u16 {
    env::var("ARCTIC_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(27015)
}

pub fn bot_count() -> usize {
    env::var("ARCTIC_BOT_COUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_BOT_COUNT)
}

/// Fixed seed for reproducible runs; unset seeds from the OS.
pub fn rng_seed() -> Option<u64> {
    env::var("ARCTIC_RNG_SEED").ok().and_then(|v| v.parse().ok())
}

pub const TICK_RATE: u32 = 64;
pub const TICK_INTERVAL: Duration = Duration::from_micros(1_000_000 / TICK_RATE as u64);
// Ticks run back to back after a stall before the backlog is dropped.
pub const MAX_CATCH_UP_STEPS: u32 = 4;
pub const RECV_BUFFER_SIZE: usize = 8192;
pub const CONNECTION_TIMEOUT_SECS: f32 = 10.0;
pub const MAX_PLAYERS: usize = 128;
pub const DEFAULT_BOT_COUNT: usize = 100;
// Always leave room for humans to join.
pub const MAX_BOTS: usize = MAX_PLAYERS - 4;
