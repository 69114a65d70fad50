// Gameplay tuning for on-foot players.
//
// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Ground speed in units per second.
    pub max_speed: f32,

    /// Vertical velocity applied on jump.
    pub jump_velocity: f32,

    /// Downward acceleration in units per second squared.
    pub gravity: f32,

    /// Fraction of ground speed gained per 1/60 s while airborne.
    pub air_control: f32,

    /// Collision radius around the feet position.
    pub radius: f32,

    /// Body height above the feet position.
    pub height: f32,

    /// Eye height used as the origin of shots and line-of-sight checks.
    pub eye_height: f32,

    /// Hard pitch limit in radians (symmetric).
    pub pitch_limit: f32,

    /// Seconds between death and respawn.
    pub respawn_seconds: f32,

    /// Default health for classes without an override.
    pub max_hp: i32,

    /// Seconds a kill-feed entry stays live.
    pub kill_feed_seconds: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_speed: 7.0,
            jump_velocity: 8.0,
            gravity: 20.0,
            air_control: 0.05,
            radius: 0.4,
            height: 1.8,
            eye_height: 1.6,
            pitch_limit: std::f32::consts::PI * 0.49,
            respawn_seconds: 3.0,
            max_hp: 100,
            kill_feed_seconds: 5.0,
        }
    }
}
