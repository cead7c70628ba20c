//! Stage-by-stage countdown for a single brew.
//!
//! Everything is derived from one countdown value: the active stage is the
//! first stage whose cumulative duration exceeds the elapsed time, and the
//! drain phase is represented by a stage index equal to the stage count.
//! The timer itself never sleeps; a driver calls [`StageTimer::tick`] once a
//! second and forwards the returned [`TimerEvent`]s to completion feedback.

use crate::models::{DRAIN_INSTRUCTIONS, DRAIN_STAGE_NAME, Recipe, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The stage at `index` ran out. Reported at the exact second the
    /// countdown reaches the end of that stage.
    StageComplete { index: usize },
    /// The countdown reached zero. The timer has stopped.
    BrewComplete,
}

/// The stage shown to the user, including the synthetic drain stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageView<'a> {
    pub index: usize,
    pub name: &'a str,
    pub instructions: &'a str,
    pub duration: u32,
    pub is_drain: bool,
}

#[derive(Debug, Clone)]
pub struct StageTimer {
    stages: Vec<Stage>,
    drain: u32,
    total: u32,
    remaining: u32,
    stage_index: usize,
    running: bool,
}

impl StageTimer {
    #[must_use]
    pub fn new(recipe: &Recipe) -> Self {
        let total = recipe.total_duration();
        StageTimer {
            stages: recipe.stages.clone(),
            drain: recipe.drain_secs(),
            total,
            remaining: total,
            stage_index: 0,
            running: false,
        }
    }

    /// Swap in a (possibly edited) recipe. Resets the countdown and stops.
    pub fn load(&mut self, recipe: &Recipe) {
        *self = StageTimer::new(recipe);
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.total - self.remaining
    }

    #[must_use]
    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    #[must_use]
    pub fn in_drain_phase(&self) -> bool {
        self.stage_index >= self.stages.len()
    }

    /// Returns false when already running or when nothing is left to count.
    pub fn start(&mut self) -> bool {
        if self.running || self.remaining == 0 {
            return false;
        }
        self.running = true;
        true
    }

    /// Returns whether the timer was running.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.remaining = self.total;
        self.stage_index = 0;
    }

    /// Advance the countdown by one second.
    ///
    /// A tick while paused or finished does nothing. Boundary detection uses
    /// the stage that was active *before* the tick, so each crossing is
    /// reported exactly once, at the second it happens.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running || self.remaining == 0 {
            return None;
        }

        let previous = self.stage_index;
        self.remaining -= 1;
        self.stage_index = self.resolve_stage_index(self.remaining);

        if self.remaining == 0 {
            self.running = false;
            return Some(TimerEvent::BrewComplete);
        }
        if self.remaining == self.stage_end(previous) {
            return Some(TimerEvent::StageComplete { index: previous });
        }
        None
    }

    #[must_use]
    pub fn can_skip(&self) -> bool {
        self.remaining > 0 && self.stage_index < self.stages.len()
    }

    /// Jump to the end of the current stage and keep (or start) running.
    ///
    /// The skipped stage does not count as completed. Landing on zero
    /// finishes the brew.
    pub fn skip(&mut self) -> Option<TimerEvent> {
        if !self.can_skip() {
            return None;
        }
        self.remaining = self.stage_end(self.stage_index);
        self.stage_index += 1;
        if self.remaining == 0 {
            self.running = false;
            return Some(TimerEvent::BrewComplete);
        }
        self.running = true;
        None
    }

    /// Stage index for a given remaining time.
    #[must_use]
    pub fn resolve_stage_index(&self, remaining: u32) -> usize {
        let elapsed = self.total.saturating_sub(remaining);
        let mut cumulative = 0;
        for (i, stage) in self.stages.iter().enumerate() {
            cumulative = stage.duration_secs().saturating_add(cumulative);
            if elapsed < cumulative {
                return i;
            }
        }
        if self.drain > 0 {
            self.stages.len()
        } else {
            self.stages.len().saturating_sub(1)
        }
    }

    /// Sum of stage durations up to and including `index`. Indexes at or
    /// past the stage count include the drain time.
    #[must_use]
    pub fn cumulative_through(&self, index: usize) -> u32 {
        if index >= self.stages.len() {
            return self.total;
        }
        self.stages[..=index]
            .iter()
            .map(Stage::duration_secs)
            .fold(0, u32::saturating_add)
    }

    /// The remaining-time value at which stage `index` is exhausted.
    #[must_use]
    pub fn stage_end(&self, index: usize) -> u32 {
        self.total.saturating_sub(self.cumulative_through(index))
    }

    /// Seconds left in the current stage.
    #[must_use]
    pub fn stage_remaining(&self) -> u32 {
        self.remaining.saturating_sub(self.stage_end(self.stage_index))
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.elapsed()) / f64::from(self.total) * 100.0
    }

    #[must_use]
    pub fn current_stage(&self) -> StageView<'_> {
        match self.stages.get(self.stage_index) {
            Some(stage) => StageView {
                index: self.stage_index,
                name: stage.display_name(),
                instructions: stage.display_instructions(),
                duration: stage.duration_secs(),
                is_drain: false,
            },
            None => StageView {
                index: self.stage_index,
                name: DRAIN_STAGE_NAME,
                instructions: DRAIN_INSTRUCTIONS,
                duration: self.drain,
                is_drain: true,
            },
        }
    }
}
