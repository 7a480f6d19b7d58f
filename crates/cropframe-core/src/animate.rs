//! Fixed-step settle interpolation.
//!
//! After a gesture commits, the view converges to the recentered layout
//! through a linear interpolation: the total recentering deltas are divided
//! by a step count and applied once per tick. The task is a plain value
//! driven by an external tick source; the host waits [`Settle::step_duration`]
//! between ticks and may cancel at any point by dropping the task.

use std::time::Duration;

use crate::geometry::{CropGeometry, RecenterDeltas};

/// Default number of interpolation steps.
pub const SETTLE_STEPS: u32 = 25;

/// Default wall-clock spacing between steps.
pub const SETTLE_STEP_DURATION: Duration = Duration::from_millis(3);

/// Outcome of advancing the settle by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStep {
    /// More steps remain; redraw and schedule the next tick.
    Running,
    /// The final step was applied; the geometry is at its target.
    Finished,
}

/// An in-flight settle animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settle {
    per_step: RecenterDeltas,
    remaining: u32,
    step_duration: Duration,
}

impl Settle {
    /// Start a settle over `total` deltas, spread across `steps` ticks.
    ///
    /// A zero step count is treated as one step (a single jump to the
    /// target).
    pub fn new(total: RecenterDeltas, steps: u32, step_duration: Duration) -> Self {
        let steps = steps.max(1);
        Self {
            per_step: total.divided(steps as f64),
            remaining: steps,
            step_duration,
        }
    }

    /// Spacing the host should honor between ticks.
    pub fn step_duration(&self) -> Duration {
        self.step_duration
    }

    /// Steps left before the settle finishes.
    pub fn remaining_steps(&self) -> u32 {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Apply one interpolation step to the geometry.
    ///
    /// Returns the moved geometry and whether the settle just finished.
    /// Advancing a finished settle is a no-op.
    pub fn advance(&mut self, geometry: CropGeometry) -> (CropGeometry, SettleStep) {
        if self.remaining == 0 {
            return (geometry, SettleStep::Finished);
        }

        let moved = self.per_step.applied_to(geometry);
        self.remaining -= 1;

        let step = if self.remaining == 0 {
            SettleStep::Finished
        } else {
            SettleStep::Running
        };
        (moved, step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, RectDeltas};

    fn geometry() -> CropGeometry {
        CropGeometry {
            crop_box: Rect::new(0.0, 0.0, 100.0, 100.0),
            bounds: Rect::new(0.0, 0.0, 200.0, 200.0),
            image_width: 800,
            image_height: 800,
        }
    }

    fn right_edge_deltas(amount: f64) -> RecenterDeltas {
        RecenterDeltas {
            crop_box: RectDeltas {
                right: amount,
                ..RectDeltas::default()
            },
            bounds: RectDeltas::default(),
        }
    }

    #[test]
    fn test_each_step_moves_by_equal_increment() {
        // 250px over 25 steps: exactly 10px per tick.
        let mut settle = Settle::new(right_edge_deltas(250.0), 25, SETTLE_STEP_DURATION);
        let mut geometry = geometry();

        for step in 1..=25u32 {
            let (moved, _) = settle.advance(geometry);
            assert!(
                (moved.crop_box.right - geometry.crop_box.right - 10.0).abs() < 1e-9,
                "step {} moved by {}",
                step,
                moved.crop_box.right - geometry.crop_box.right
            );
            geometry = moved;
        }

        assert!((geometry.crop_box.right - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_finishes_on_final_step() {
        let mut settle = Settle::new(right_edge_deltas(250.0), 25, SETTLE_STEP_DURATION);
        let mut geometry = geometry();
        assert_eq!(settle.remaining_steps(), 25);

        for left in (1..=24u32).rev() {
            let (moved, step) = settle.advance(geometry);
            geometry = moved;
            assert_eq!(step, SettleStep::Running);
            assert_eq!(settle.remaining_steps(), left);
        }

        let (_, step) = settle.advance(geometry);
        assert_eq!(step, SettleStep::Finished);
        assert!(settle.is_finished());
    }

    #[test]
    fn test_advance_after_finish_is_noop() {
        let mut settle = Settle::new(right_edge_deltas(100.0), 2, SETTLE_STEP_DURATION);
        let geometry = geometry();

        let (geometry, _) = settle.advance(geometry);
        let (geometry, step) = settle.advance(geometry);
        assert_eq!(step, SettleStep::Finished);

        let before = geometry;
        let (after, step) = settle.advance(geometry);
        assert_eq!(step, SettleStep::Finished);
        assert_eq!(after, before);
    }

    #[test]
    fn test_zero_steps_jumps_to_target() {
        let mut settle = Settle::new(right_edge_deltas(80.0), 0, SETTLE_STEP_DURATION);
        let (moved, step) = settle.advance(geometry());

        assert_eq!(step, SettleStep::Finished);
        assert!((moved.crop_box.right - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_applied_equals_deltas() {
        let deltas = RecenterDeltas {
            crop_box: RectDeltas {
                top: -30.0,
                left: 12.5,
                bottom: 47.0,
                right: -250.0,
            },
            bounds: RectDeltas {
                top: 5.0,
                left: -5.0,
                bottom: 60.0,
                right: 60.0,
            },
        };

        let mut settle = Settle::new(deltas, SETTLE_STEPS, SETTLE_STEP_DURATION);
        let start = geometry();
        let mut geometry = start;
        while !settle.is_finished() {
            let (moved, _) = settle.advance(geometry);
            geometry = moved;
        }

        let target = deltas.applied_to(start);
        assert!((geometry.crop_box.top - target.crop_box.top).abs() < 1e-9);
        assert!((geometry.crop_box.right - target.crop_box.right).abs() < 1e-9);
        assert!((geometry.bounds.bottom - target.bounds.bottom).abs() < 1e-9);
    }
}
