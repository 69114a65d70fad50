// Gameplay tuning for capture-the-flag.

#[derive(Debug, Clone, Copy)]
pub struct ObjectiveTuning {
    /// Distance at which a player touches a flag or a base.
    pub touch_radius: f32,
    /// Seconds a dropped flag waits before returning home.
    pub return_seconds: f32,
    /// Height of a carried flag above the carrier's feet.
    pub carry_height: f32,
    /// Distance at which a player collects a weapon pickup.
    pub pickup_radius: f32,
    /// Seconds before a collected weapon pickup reappears.
    pub pickup_respawn_seconds: f32,
}

impl Default for ObjectiveTuning {
    fn default() -> Self {
        Self {
            touch_radius: 1.5,
            return_seconds: 30.0,
            carry_height: 2.2,
            pickup_radius: 1.5,
            pickup_respawn_seconds: 15.0,
        }
    }
}
