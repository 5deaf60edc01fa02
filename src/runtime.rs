// Single dead-reckoning run: validate parameters, sample until the budget is spent, report
//
// All errors surface before the loop starts; once sampling begins the run either
// completes or the process is stopped from outside.

use tracing::info;

use crate::config::{ConfigError, RunConfig, DEFAULT_SAMPLING_INTERVAL_S, DEFAULT_TICK_POLICY};
use crate::input::{InputError, RunInput};
use crate::messages::OdometryReport;
use crate::odometry::{PoseEstimator, Trajectory, TrajectoryError};
use crate::scheduler::{
    Clock, ManualClock, RunStats, SamplingScheduler, SamplingTiming, SchedulerError, TickPolicy,
    TokioClock,
};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Trajectory error: {0}")]
    Trajectory(#[from] TrajectoryError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a run is driven
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub sampling_interval: f64,
    pub policy: TickPolicy,
    /// Use virtual time instead of waiting in real time
    pub simulated: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            sampling_interval: DEFAULT_SAMPLING_INTERVAL_S,
            policy: DEFAULT_TICK_POLICY,
            simulated: false,
        }
    }
}

/// Validate `config` and run it to completion against `clock`
pub async fn run_with_clock<C: Clock>(
    config: &RunConfig,
    clock: C,
) -> Result<(Trajectory, RunStats), RuntimeError> {
    config.validate()?;
    let capacity = config.capacity()?;
    let timing = SamplingTiming::from_config(config)?;

    let estimator = PoseEstimator::new(
        config.vehicle,
        config.wheel_speeds,
        config.sampling_interval,
        capacity,
        config.initial_pose,
    )?;
    let velocity = estimator.body_velocity();
    info!(
        "Run configured: {} pose slots, forward {:.4} m/s, turning {:.4} rad/s",
        capacity, velocity.forward, velocity.turning
    );

    let mut scheduler = SamplingScheduler::new(clock, timing, estimator);
    let stats = scheduler.run().await?;
    Ok((scheduler.into_estimator().into_trajectory(), stats))
}

/// Run from parsed input and produce the final report
pub async fn run(input: &RunInput, options: &RunOptions) -> Result<OdometryReport, RuntimeError> {
    let config = input.to_config(options.sampling_interval, options.policy);

    let (trajectory, stats) = if options.simulated {
        info!("Using simulated clock");
        run_with_clock(&config, ManualClock::new()).await?
    } else {
        run_with_clock(&config, TokioClock::new()).await?
    };

    Ok(OdometryReport::new(
        &trajectory,
        &stats,
        input.wheel_speed(),
        input.wheel_radius,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VehicleParams;
    use crate::odometry::{Pose, WheelSpeeds};
    use std::time::Duration;

    const EPS: f64 = 1e-12;

    fn config(wheels: WheelSpeeds) -> RunConfig {
        RunConfig {
            vehicle: VehicleParams::new(0.05, 0.2),
            sampling_interval: 0.25,
            elapsed_time: 1.0,
            initial_pose: Pose::default(),
            wheel_speeds: wheels,
            policy: TickPolicy::BestEffort,
        }
    }

    #[tokio::test]
    async fn test_straight_line_scenario() {
        let (traj, stats) = run_with_clock(&config(WheelSpeeds::uniform(10.0)), ManualClock::new())
            .await
            .unwrap();

        assert_eq!(traj.len(), 5);
        assert_eq!(traj.capacity(), 5);
        assert_eq!(stats.ticks, 4);
        for (i, pose) in traj.iter().enumerate() {
            assert!((pose.x - 0.125 * i as f64).abs() < EPS, "x[{}] = {}", i, pose.x);
            assert_eq!(pose.y, 0.0);
            assert_eq!(pose.yaw, 0.0);
        }
    }

    #[tokio::test]
    async fn test_zero_speed_scenario() {
        let mut cfg = config(WheelSpeeds::zero());
        cfg.initial_pose = Pose::from_degrees(2.0, -1.0, 30.0);
        let (traj, _) = run_with_clock(&cfg, ManualClock::new()).await.unwrap();

        assert_eq!(traj.len(), 5);
        assert!(traj.iter().all(|pose| pose == cfg.initial_pose));
    }

    #[tokio::test]
    async fn test_rotation_in_place_scenario() {
        let (traj, _) = run_with_clock(&config(WheelSpeeds::new(4.0, -4.0)), ManualClock::new())
            .await
            .unwrap();

        assert!(traj.xs().iter().all(|&x| x.abs() < EPS));
        assert!(traj.ys().iter().all(|&y| y.abs() < EPS));
        assert!(traj.yaws().windows(2).all(|w| w[1] > w[0]));
    }

    #[tokio::test]
    async fn test_length_independent_of_jitter_with_catch_up() {
        let mut cfg = config(WheelSpeeds::uniform(10.0));
        cfg.policy = TickPolicy::CatchUp;
        // 420 ms stall mid-run; the final wake-up lands on the budget
        let clock =
            ManualClock::with_stalls([Duration::from_millis(30), Duration::from_millis(420)]);
        let (traj, stats) = run_with_clock(&cfg, clock).await.unwrap();

        assert_eq!(traj.len(), 5);
        assert_eq!(stats.missed_ticks, 0);
        assert!((traj.xs()[4] - 0.5).abs() < EPS);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_run() {
        let mut cfg = config(WheelSpeeds::uniform(10.0));
        cfg.vehicle.axle_width = 0.0;
        let err = run_with_clock(&cfg, ManualClock::new()).await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Config(ConfigError::NotPositive {
                name: "axle_width",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_report_from_input() {
        let input = RunInput::parse("60 1 0.05 0.2 0 0 0 1").unwrap();
        let options = RunOptions {
            simulated: true,
            ..RunOptions::default()
        };
        let report = run(&input, &options).await.unwrap();

        let speed = 2.0 * std::f64::consts::PI;
        assert_eq!(report.x.len(), 5);
        assert_eq!(report.capacity, 5);
        assert!((report.linear_speed_per_wheel - speed).abs() < EPS);
        assert!((report.angular_speed_per_wheel - speed / 0.05).abs() < 1e-9);
        // forward = 0.05 * 2π per second
        assert!((report.x[4] - 0.05 * speed).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_real_clock_run() {
        let input = RunInput::parse("20 40 0.036 0.15 0 0 45 0.5").unwrap();
        let options = RunOptions {
            policy: TickPolicy::CatchUp,
            ..RunOptions::default()
        };
        let report = run(&input, &options).await.unwrap();
        assert_eq!(report.x.len(), 3);
        assert!((report.yaw[0] - std::f64::consts::FRAC_PI_4).abs() < EPS);
    }
}
