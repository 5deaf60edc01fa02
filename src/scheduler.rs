// Sampling loop: one integration step per elapsed sampling interval, until the run budget is spent
//
// The loop polls a clock. When the time since the last tick reaches the sampling
// interval it steps the estimator exactly once; between ticks it sleeps until the
// next sample boundary instead of spinning. Time comes from a `Clock` so tests
// can drive the loop with virtual time.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, RunConfig};
use crate::odometry::{PoseEstimator, TrajectoryError};

/// Monotonic time source for the sampling loop
pub trait Clock {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Wait for (at least) `duration`
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()>;
}

/// Wall-clock time through tokio's timer
///
/// Under `tokio::time::pause` this clock follows tokio's virtual time.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

/// Virtual time that only moves when slept on or advanced by hand
///
/// Stalls queued with [`ManualClock::with_stalls`] are added to successive
/// sleeps, one per sleep, to model a loop that wakes up late.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Duration,
    stalls: VecDeque<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stalls(stalls: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            now: Duration::ZERO,
            stalls: stalls.into_iter().collect(),
        }
    }

    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> {
        let stall = self.stalls.pop_front().unwrap_or_default();
        self.advance(duration + stall);
        std::future::ready(())
    }
}

/// What the loop does after waking up late
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickPolicy {
    /// Next tick is one interval after the poll that produced this one.
    ///
    /// Missed ticks are never backfilled and no tick is taken once the budget
    /// is exceeded, so a late loop can end with fewer poses than slots.
    #[default]
    BestEffort,

    /// Next tick is one interval after this tick's deadline.
    ///
    /// A late loop takes the overdue ticks back to back as long as it wakes up
    /// inside the budget. A wake-up past the budget still ends the run, so a
    /// deadline that falls exactly on the budget can be missed.
    CatchUp,
}

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Idle,
    Running,
    Finished,
}

/// Error types for a scheduler run
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SchedulerError {
    #[error("Scheduler can only be started from idle (currently {0:?})")]
    NotIdle(SchedulerState),

    #[error("Trajectory error: {0}")]
    Trajectory(#[from] TrajectoryError),
}

/// Fixed timing for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingTiming {
    pub interval: Duration,
    pub budget: Duration,
    pub policy: TickPolicy,
}

impl SamplingTiming {
    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            interval: config.sampling_duration()?,
            budget: config.budget_duration()?,
            policy: config.policy,
        })
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub ticks: usize,
    pub missed_ticks: usize,
    pub elapsed: Duration,
}

pub struct SamplingScheduler<C: Clock> {
    clock: C,
    timing: SamplingTiming,
    estimator: PoseEstimator,
    state: SchedulerState,
}

impl<C: Clock> SamplingScheduler<C> {
    pub fn new(clock: C, timing: SamplingTiming, estimator: PoseEstimator) -> Self {
        Self {
            clock,
            timing,
            estimator,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn estimator(&self) -> &PoseEstimator {
        &self.estimator
    }

    pub fn into_estimator(self) -> PoseEstimator {
        self.estimator
    }

    /// Run the sampling loop to completion
    pub async fn run(&mut self) -> Result<RunStats, SchedulerError> {
        if self.state != SchedulerState::Idle {
            return Err(SchedulerError::NotIdle(self.state));
        }
        self.state = SchedulerState::Running;
        info!(
            "Sampling started: {:?} interval, {:?} budget, {:?} policy",
            self.timing.interval, self.timing.budget, self.timing.policy
        );

        let start = self.clock.now();
        let result = self.poll_loop(start).await;
        self.state = SchedulerState::Finished;
        let ticks = result?;

        let slots = self.estimator.trajectory().capacity();
        let missed_ticks = (slots - 1).saturating_sub(self.estimator.ticks());
        let elapsed = self.clock.now().saturating_sub(start);
        if missed_ticks > 0 {
            warn!(
                "Run finished {} tick(s) short: {} of {} poses written",
                missed_ticks,
                self.estimator.trajectory().len(),
                slots
            );
        }
        info!("Sampling finished: {} ticks in {:?}", ticks, elapsed);

        Ok(RunStats {
            ticks,
            missed_ticks,
            elapsed,
        })
    }

    async fn poll_loop(&mut self, start: Duration) -> Result<usize, SchedulerError> {
        let SamplingTiming {
            interval,
            budget,
            policy,
        } = self.timing;
        let mut last_tick = start;
        let mut ticks = 0;

        loop {
            if self.estimator.is_full() {
                break;
            }

            let now = self.clock.now();
            let since_start = now.saturating_sub(start);
            if since_start > budget {
                break;
            }

            // No tick can land inside the budget any more
            let deadline = last_tick + interval;
            if deadline.saturating_sub(start) > budget {
                break;
            }

            if now >= deadline {
                let pose = self.estimator.step()?;
                ticks += 1;
                debug!(
                    tick = ticks,
                    at = ?since_start,
                    x = pose.x,
                    y = pose.y,
                    yaw = pose.yaw,
                    "tick"
                );
                last_tick = match policy {
                    TickPolicy::BestEffort => now,
                    TickPolicy::CatchUp => deadline,
                };
                continue;
            }

            self.clock.sleep(deadline - now).await;
        }

        Ok(ticks)
    }
}
