// On-foot player movement: input → velocity → collision-resolved position.

use crate::domain::geometry::{forward, right};
use crate::domain::tuning::{AbilityKind, PlayerTuning};
use crate::domain::world::World;
use crate::domain::{Keys, Player};

/// Velocity components are zeroed when resolution moved the body further than this.
const BLOCKED_EPSILON: f32 = 0.001;
/// Wish directions shorter than this are left unnormalized (no input).
const MIN_WISH_SQ: f32 = 0.01;

/// Class passive times any running sprint.
pub fn speed_scale(player: &Player) -> f32 {
    let class = player.class.definition();
    let sprint = if player.sprint_timer > 0.0 && class.ability == AbilityKind::Sprint {
        class.ability_amount
    } else {
        1.0
    };
    class.speed_multiplier * sprint
}

/// Advances one alive, on-foot player by `dt` using its current input.
pub fn tick_player(player: &mut Player, world: &World, tuning: &PlayerTuning, dt: f32) {
    if !player.is_on_foot() {
        return;
    }

    let input = player.input;
    if input.is_finite() {
        player.yaw = input.yaw;
        player.pitch = input.pitch.clamp(-tuning.pitch_limit, tuning.pitch_limit);
    }

    let (fwd, side) = input.move_axes();
    let mut wish = forward(player.yaw) * fwd + right(player.yaw) * side;
    if wish.length_squared() > MIN_WISH_SQ {
        wish = wish.normalize();
    }

    let speed = tuning.max_speed * speed_scale(player);
    let on_ground = world.is_on_ground(player.position, tuning.radius, tuning.height);

    if on_ground {
        player.velocity.x = wish.x * speed;
        player.velocity.z = wish.z * speed;
        if input.held(Keys::JUMP) {
            player.velocity.y = tuning.jump_velocity;
        }
    } else {
        // Limited air control, scaled so it is frame-rate independent.
        let gain = speed * tuning.air_control * dt * 60.0;
        player.velocity.x += wish.x * gain;
        player.velocity.z += wish.z * gain;
    }

    player.velocity.y -= tuning.gravity * dt;

    let proposed = player.position + player.velocity * dt;
    let resolved = world.resolve_collision(player.position, proposed, tuning.radius, tuning.height);

    let pushed = (resolved - proposed).abs();
    if pushed.x > BLOCKED_EPSILON {
        player.velocity.x = 0.0;
    }
    if pushed.y > BLOCKED_EPSILON {
        player.velocity.y = 0.0;
    }
    if pushed.z > BLOCKED_EPSILON {
        player.velocity.z = 0.0;
    }

    player.position = resolved;
}
