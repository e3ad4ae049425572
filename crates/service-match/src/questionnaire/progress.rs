use serde::Serialize;

/// Ceiling for the positional estimate while questions remain.
pub const BASE_PROGRESS_CEILING: f64 = 90.0;
/// Reported on the final-stage question when it is also the last visible one.
pub const FINAL_STAGE_PROGRESS: f64 = 92.0;
/// Reported on the last visible question.
pub const LAST_QUESTION_PROGRESS: f64 = 95.0;
pub const COMPLETED_PROGRESS: f64 = 100.0;

/// Completion estimate for the question at `position` in a list of `visible_len`.
///
/// The visible list grows and shrinks with answers, so the raw ratio is capped and the
/// closing questions snap to fixed values. Monotonicity is enforced by [`ProgressTracker`].
pub fn estimate(position: usize, visible_len: usize, final_stage: bool, is_last: bool) -> f64 {
    if visible_len == 0 {
        return COMPLETED_PROGRESS;
    }
    if final_stage && is_last {
        return FINAL_STAGE_PROGRESS;
    }
    if is_last {
        return LAST_QUESTION_PROGRESS;
    }

    let base = position as f64 / visible_len as f64 * 100.0;
    base.clamp(0.0, BASE_PROGRESS_CEILING)
}

/// High-water mark of the progress reported within one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProgressTracker {
    high_water: f64,
}

impl ProgressTracker {
    /// Records an estimate and returns the value to display.
    pub fn observe(&mut self, estimate: f64) -> f64 {
        let bounded = estimate.clamp(0.0, COMPLETED_PROGRESS);
        if bounded > self.high_water {
            self.high_water = bounded;
        }
        self.high_water
    }

    pub fn complete(&mut self) -> f64 {
        self.observe(COMPLETED_PROGRESS)
    }

    pub fn current(&self) -> f64 {
        self.high_water
    }

    pub fn reset(&mut self) {
        self.high_water = 0.0;
    }
}
