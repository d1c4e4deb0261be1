//! Ball physics and movement constraints

use super::field::Field;
use super::math::Vec3;

/// Gravity acceleration on the height axis (m/s^2)
pub const GRAVITY: f32 = -9.8;
/// Horizontal velocity damping, applied once per tick (the loop targets a
/// fixed tick rate, so this is not scaled by delta time)
pub const FRICTION: f32 = 0.98;
/// Velocity retained after bouncing off a field boundary
pub const BOUNCE_DAMPING: f32 = 0.8;
/// Maximum distance at which a player can reach the ball
pub const KICK_RANGE: f32 = 2.0;
/// Vertical lift given to every kick, as a fraction of kick power
pub const KICK_LIFT: f32 = 0.3;

/// Physics system for ball flight and boundary response
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Advance the ball by one tick.
    /// Returns (new_position, new_velocity).
    ///
    /// Order matters: gravity or ground contact first, then friction, then
    /// Euler integration, then boundary response. A grounded ball keeps
    /// damping its horizontal velocity every tick.
    pub fn step_ball(position: Vec3, velocity: Vec3, field: &Field, dt: f32) -> (Vec3, Vec3) {
        let mut pos = position;
        let mut vel = velocity;

        // Apply gravity while airborne; ground contact is inelastic
        if pos.y > 0.0 {
            vel.y += GRAVITY * dt;
        } else {
            pos.y = 0.0;
            vel.y = 0.0;
        }

        // Apply friction on the ground plane
        vel.x *= FRICTION;
        vel.z *= FRICTION;

        // Update position
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;

        // The ground is a hard floor; there is no ceiling
        if pos.y < 0.0 {
            pos.y = 0.0;
        }

        // Side-line bounce with energy loss
        if pos.x.abs() > field.half_width() {
            pos.x = field.half_width().copysign(pos.x);
            vel.x *= -BOUNCE_DAMPING;
        }

        // End-line bounce. A crossing inside the goal mouth keeps its
        // position: goal detection reads it after this step.
        if pos.z.abs() > field.half_height() && !field.in_goal_mouth(pos.x, pos.y) {
            pos.z = field.half_height().copysign(pos.z);
            vel.z *= -BOUNCE_DAMPING;
        }

        (pos, vel)
    }

    /// Velocity imparted by a kick, or None when the ball is out of reach.
    ///
    /// The returned velocity replaces the ball's velocity outright; kicks
    /// do not accumulate momentum. The planar direction from player to
    /// ball is scaled by `power`, plus a fixed vertical lift. A player
    /// standing exactly on the ball pops it straight up (the zero
    /// direction is left unnormalized).
    pub fn kick_velocity(player_pos: Vec3, ball_pos: Vec3, power: f32) -> Option<Vec3> {
        let mut dx = ball_pos.x - player_pos.x;
        let mut dz = ball_pos.z - player_pos.z;
        let distance = (dx * dx + dz * dz).sqrt();

        if distance >= KICK_RANGE {
            return None;
        }

        if distance > 0.0 {
            dx /= distance;
            dz /= distance;
        }

        Some(Vec3::new(dx * power, power * KICK_LIFT, dz * power))
    }
}
