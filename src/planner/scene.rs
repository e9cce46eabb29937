//! Scene-detection sensitivity search
//!
//! The sensitivity step is a permille-scaled scene-change threshold: the
//! extractor receives `step / 1000`. A lower step lets more frames through.
//! Each extraction result is fed to [`SceneSearchState::record`], which moves
//! the step toward the acceptance band and decides whether to try again.

/// Frame counts strictly above this are large enough for a preview
pub const ACCEPT_MIN_FRAMES: usize = 60;
/// Counts above this soft ceiling nudge the step up instead of down
pub const SOFT_MAX_FRAMES: usize = 200;
/// Frame counts must stay strictly below this hard ceiling
pub const ACCEPT_MAX_FRAMES: usize = 230;

/// Default initial step (threshold 0.400)
pub const DEFAULT_STEP: i32 = 400;
/// Step decrement while the step is above [`FINE_STEP_FLOOR`]
pub const COARSE_DECREMENT: i32 = 50;
/// Step decrement once the step is at or below [`FINE_STEP_FLOOR`]
pub const FINE_DECREMENT: i32 = 10;
pub const FINE_STEP_FLOOR: i32 = 60;
/// Step increment when too many frames were found
pub const TIGHTEN_INCREMENT: i32 = 5;
/// Threshold 1.0 can never select a frame
pub const MAX_STEP: i32 = 1000;
/// Hard bound on extractor runs for one search
pub const MAX_ITERATIONS: usize = 64;

/// Inter-frame delay of the animated preview
pub const PREVIEW_FRAME_DELAY: u32 = 210;

/// What to do after an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDecision {
    /// Count is inside the band; use this frame set
    Accept,
    /// Adjusted the step; extract again
    Retry,
    /// No usable step left
    Exhausted,
}

/// Mutable state of one search invocation
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSearchState {
    step: i32,
    history: Vec<(i32, usize)>,
}

impl SceneSearchState {
    pub fn new(initial_step: i32) -> Self {
        Self {
            step: initial_step,
            history: Vec::new(),
        }
    }

    /// Current sensitivity step
    pub fn step(&self) -> i32 {
        self.step
    }

    /// Threshold handed to the extractor, e.g. `0.400`
    pub fn threshold(&self) -> String {
        format_threshold(self.step)
    }

    /// Every (step, count) pair recorded so far
    pub fn history(&self) -> &[(i32, usize)] {
        &self.history
    }

    pub fn into_history(self) -> Vec<(i32, usize)> {
        self.history
    }

    /// Record the frame count produced at the current step and adjust the step
    pub fn record(&mut self, count: usize) -> StepDecision {
        self.history.push((self.step, count));

        if is_acceptable(count) {
            return StepDecision::Accept;
        }

        self.step = next_step(self.step, count);
        if self.step <= 0 || self.step >= MAX_STEP || self.history.len() >= MAX_ITERATIONS {
            StepDecision::Exhausted
        } else {
            StepDecision::Retry
        }
    }
}

/// `60 < count < 230`
pub fn is_acceptable(count: usize) -> bool {
    count > ACCEPT_MIN_FRAMES && count < ACCEPT_MAX_FRAMES
}

/// Step to try after `count` frames were found at `step` (outside the band)
pub fn next_step(step: i32, count: usize) -> i32 {
    if count > SOFT_MAX_FRAMES {
        step + TIGHTEN_INCREMENT
    } else if step > FINE_STEP_FLOOR {
        step - COARSE_DECREMENT
    } else {
        step - FINE_DECREMENT
    }
}

/// `step / 1000` with three decimals
pub fn format_threshold(step: i32) -> String {
    format!("{:.3}", f64::from(step) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_counts_inside_band_only() {
        assert!(!is_acceptable(60));
        assert!(is_acceptable(61));
        assert!(is_acceptable(229));
        assert!(!is_acceptable(230));
    }

    #[test]
    fn first_acceptable_count_terminates() {
        let mut state = SceneSearchState::new(DEFAULT_STEP);
        assert_eq!(state.record(120), StepDecision::Accept);
        assert_eq!(state.step(), DEFAULT_STEP);
        assert_eq!(state.history(), &[(400, 120)]);
    }

    #[test]
    fn too_few_frames_lowers_step_coarse_then_fine() {
        assert_eq!(next_step(400, 10), 350);
        assert_eq!(next_step(61, 10), 11);
        assert_eq!(next_step(60, 10), 50);
        assert_eq!(next_step(20, 60), 10);
    }

    #[test]
    fn too_many_frames_raises_step() {
        assert_eq!(next_step(400, 230), 405);
        assert_eq!(next_step(400, 5000), 405);
    }

    #[test]
    fn history_is_recorded_before_decision() {
        let mut state = SceneSearchState::new(400);
        assert_eq!(state.record(5), StepDecision::Retry);
        assert_eq!(state.record(300), StepDecision::Retry);
        assert_eq!(state.record(100), StepDecision::Accept);
        assert_eq!(state.history(), &[(400, 5), (350, 300), (355, 100)]);
    }

    #[test]
    fn descending_search_exhausts_at_zero() {
        let mut state = SceneSearchState::new(400);
        let mut decisions = Vec::new();
        loop {
            let decision = state.record(0);
            decisions.push(decision);
            if decision != StepDecision::Retry {
                break;
            }
        }
        assert_eq!(decisions.last(), Some(&StepDecision::Exhausted));
        assert!(state.step() <= 0);
        let steps: Vec<i32> = state.history().iter().map(|(s, _)| *s).collect();
        assert_eq!(steps, vec![400, 350, 300, 250, 200, 150, 100, 50, 40, 30, 20, 10]);
    }

    #[test]
    fn oscillating_extractor_is_bounded() {
        let mut state = SceneSearchState::new(400);
        let mut runs = 0;
        loop {
            runs += 1;
            let count = if state.step() >= 405 { 10 } else { 500 };
            if state.record(count) != StepDecision::Retry {
                break;
            }
        }
        assert_eq!(runs, MAX_ITERATIONS);
    }

    #[test]
    fn rising_search_stops_at_max_step() {
        let mut state = SceneSearchState::new(990);
        assert_eq!(state.record(400), StepDecision::Retry);
        assert_eq!(state.record(400), StepDecision::Exhausted);
        assert_eq!(state.step(), 1000);
    }

    #[test]
    fn threshold_has_three_decimals() {
        assert_eq!(format_threshold(400), "0.400");
        assert_eq!(format_threshold(5), "0.005");
        assert_eq!(SceneSearchState::new(355).threshold(), "0.355");
    }
}
