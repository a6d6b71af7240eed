//! Per-tick input snapshot
//!
//! Device mapping happens elsewhere; the kernel only sees the resolved
//! commands for one tick and never mutates them.

use crate::foundation::math::Vec2;

/// Resolved player commands for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    /// Desired horizontal direction, X right and Y forward; clamped to unit length
    pub move_axis: Vec2,
    /// Jump requested this tick
    pub jump: bool,
    /// Send controlled bodies back to their spawn points
    pub reset: bool,
}

impl TickInput {
    /// No movement, no buttons
    pub fn idle() -> Self {
        Self::default()
    }

    /// Move along `axis`
    pub fn moving(axis: Vec2) -> Self {
        Self {
            move_axis: axis,
            ..Self::default()
        }
    }

    /// Builder pattern: Request a jump
    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    /// Builder pattern: Request a reset
    pub fn with_reset(mut self) -> Self {
        self.reset = true;
        self
    }

    /// Move axis with its length clamped to one
    pub fn clamped_axis(&self) -> Vec2 {
        let length = self.move_axis.norm();
        if length > 1.0 {
            self.move_axis / length
        } else {
            self.move_axis
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_is_clamped_to_unit_length() {
        let input = TickInput::moving(Vec2::new(3.0, 4.0));
        assert_relative_eq!(input.clamped_axis(), Vec2::new(0.6, 0.8), epsilon = 1e-6);

        let gentle = TickInput::moving(Vec2::new(0.2, 0.0));
        assert_eq!(gentle.clamped_axis(), Vec2::new(0.2, 0.0));
    }
}
