// Gameplay tuning for roaming tornado hazards.

#[derive(Debug, Clone, Copy)]
pub struct HazardTuning {
    pub radius: f32,
    /// Horizontal drift speed in units per second.
    pub speed: f32,
    /// Visual spin in radians per second (sent to clients).
    pub spin_rate: f32,
    /// Max heading change per second while wandering.
    pub wander_rate: f32,
    pub active_seconds: f32,
    pub dormant_seconds: f32,
    /// Seconds between damage pulses.
    pub pulse_seconds: f32,
    pub player_damage: i32,
    pub vehicle_damage: i32,
    /// Vertical velocity given to caught players.
    pub lift: f32,
    /// Outward push given to caught players.
    pub fling: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            radius: 15.0,
            speed: 4.0,
            spin_rate: 3.0,
            wander_rate: 0.8,
            active_seconds: 45.0,
            dormant_seconds: 60.0,
            pulse_seconds: 0.5,
            player_damage: 5,
            vehicle_damage: 20,
            lift: 6.0,
            fling: 4.0,
        }
    }
}
