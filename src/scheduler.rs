//! Frame scheduler
//!
//! The platform timer calls `steps(now)` once per rendered frame; the scheduler
//! turns wall-clock time into the frame time step(s) to simulate.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};

/// How elapsed wall time maps onto simulation frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StepMode {
    /// One frame per call with the raw elapsed time
    Variable,
    /// Fixed-size frames drained from an accumulator
    Fixed { dt: f32, max_substeps: u32 },
}

impl StepMode {
    /// Replace a fixed step that could never produce a frame (non-positive or
    /// non-finite `dt`, zero substeps) with the engine defaults.
    pub fn validated(self) -> Self {
        match self {
            StepMode::Variable => self,
            StepMode::Fixed { dt, max_substeps } => {
                let dt = if dt.is_finite() && dt > 0.0 {
                    dt
                } else {
                    log::warn!("invalid fixed step dt {dt}, using {SIM_DT}");
                    SIM_DT
                };
                let max_substeps = if max_substeps > 0 {
                    max_substeps
                } else {
                    log::warn!("max_substeps must be at least 1, using {MAX_SUBSTEPS}");
                    MAX_SUBSTEPS
                };
                StepMode::Fixed { dt, max_substeps }
            }
        }
    }
}

impl Default for StepMode {
    fn default() -> Self {
        StepMode::Fixed {
            dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    mode: StepMode,
    running: bool,
    last_time: Option<f64>,
    accumulator: f32,
}

impl FrameScheduler {
    pub fn new(mode: StepMode) -> Self {
        Self {
            mode: mode.validated(),
            running: false,
            last_time: None,
            accumulator: 0.0,
        }
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Begin dispatching frames. The first `steps` call afterwards only
    /// records the start time.
    pub fn start(&mut self) {
        self.running = true;
        self.last_time = None;
        self.accumulator = 0.0;
        log::debug!("scheduler started ({:?})", self.mode);
    }

    /// Halt future frames. Frames already handed out are unaffected.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("scheduler stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frame time steps to run for the platform tick at `now` (seconds)
    pub fn steps(&mut self, now: f64) -> Vec<f32> {
        if !self.running {
            return Vec::new();
        }

        let Some(last) = self.last_time.replace(now) else {
            return Vec::new();
        };
        let elapsed = (now - last).max(0.0) as f32;

        match self.mode {
            StepMode::Variable => vec![elapsed],
            StepMode::Fixed { dt, max_substeps } => {
                self.accumulator += elapsed.min(MAX_FRAME_TIME);

                let mut steps = Vec::new();
                while self.accumulator >= dt && (steps.len() as u32) < max_substeps {
                    self.accumulator -= dt;
                    steps.push(dt);
                }
                // Spiral of death: drop whatever the substep cap could not absorb
                if steps.len() as u32 == max_substeps {
                    self.accumulator = self.accumulator.min(dt);
                }
                steps
            }
        }
    }
}
