// Per-tick control input, shared by network clients and bots.

use bitflags::bitflags;

bitflags! {
    /// Held-key bitmask as sent on the wire.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Keys: u16 {
        const FORWARD = 0x001;
        const LEFT    = 0x002;
        const BACK    = 0x004;
        const RIGHT   = 0x008;
        const JUMP    = 0x010;
        const SHOOT   = 0x020;
        const RELOAD  = 0x040;
        /// Enter/exit vehicle. Edge-triggered: consumed once acted upon.
        const USE     = 0x080;
        /// Class ability. Edge-triggered: consumed once acted upon.
        const ABILITY = 0x100;
        /// Descend while flying.
        const CROUCH  = 0x200;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub keys: Keys,
    pub yaw: f32,
    pub pitch: f32,
}

impl InputState {
    pub fn held(&self, key: Keys) -> bool {
        self.keys.contains(key)
    }

    /// Forward/side axes in [-1, 1] from the movement keys.
    pub fn move_axes(&self) -> (f32, f32) {
        let mut fwd = 0.0;
        let mut side = 0.0;
        if self.held(Keys::FORWARD) {
            fwd += 1.0;
        }
        if self.held(Keys::BACK) {
            fwd -= 1.0;
        }
        if self.held(Keys::LEFT) {
            side -= 1.0;
        }
        if self.held(Keys::RIGHT) {
            side += 1.0;
        }
        (fwd, side)
    }

    /// Rejects NaN/inf angles; those would poison positions downstream.
    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite()
    }
}
