//! Field geometry and goal areas

use serde::{Deserialize, Serialize};

use super::math::Vec3;

/// Which end line a goal sits on. The left goal is the negative-z end
/// (defended by the home team), the right goal the positive-z end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalSide {
    Left,
    Right,
}

/// Pitch dimensions and goal mouth geometry. Constant for a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Field {
    /// Pitch extent along the x axis
    pub width: f32,
    /// Pitch extent along the z axis (goals sit on the z end lines)
    pub height: f32,
    /// Goal mouth width, centered on x = 0
    pub goal_width: f32,
    /// Crossbar height
    pub goal_height: f32,
}

impl Field {
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Clamp a position to the playable area on both ground axes.
    /// Idempotent: in-bounds positions come back unchanged.
    pub fn clamp_to_bounds(&self, position: Vec3) -> Vec3 {
        Vec3 {
            x: position.x.clamp(-self.half_width(), self.half_width()),
            y: position.y,
            z: position.z.clamp(-self.half_height(), self.half_height()),
        }
    }

    /// Whether an end-line crossing at (x, y) is inside the goal mouth.
    pub fn in_goal_mouth(&self, x: f32, y: f32) -> bool {
        x.abs() < self.goal_width / 2.0 && y < self.goal_height
    }

    /// Goal line crossed by a ball at `position`, if any. Crossings outside
    /// the goal mouth are not goals.
    pub fn goal_crossed(&self, position: Vec3) -> Option<GoalSide> {
        if !self.in_goal_mouth(position.x, position.y) {
            return None;
        }
        if position.z < -self.half_height() {
            Some(GoalSide::Left)
        } else if position.z > self.half_height() {
            Some(GoalSide::Right)
        } else {
            None
        }
    }
}

impl Default for Field {
    /// Standard dimensions: 105 x 68 pitch, 7.32 x 2.44 goal mouths.
    fn default() -> Self {
        Self {
            width: 105.0,
            height: 68.0,
            goal_width: 7.32,
            goal_height: 2.44,
        }
    }
}
