// Sampling defaults, vehicle parameters and run validation
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::odometry::{Pose, WheelSpeeds};
use crate::scheduler::TickPolicy;

// Default sampling interval (seconds between integration steps)
pub const DEFAULT_SAMPLING_INTERVAL_S: f64 = 0.25;

// Default scheduler behaviour when the loop falls behind
pub const DEFAULT_TICK_POLICY: TickPolicy = TickPolicy::BestEffort;

/// Error types for run configuration
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("{name} must be greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} is too large to schedule: {value} s")]
    OutOfRange { name: &'static str, value: f64 },
}

/// Physical parameters of the differential-drive base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    pub wheel_radius: f64, // meters
    pub axle_width: f64,   // meters (wheel separation)
}

impl VehicleParams {
    pub fn new(wheel_radius: f64, axle_width: f64) -> Self {
        Self {
            wheel_radius,
            axle_width,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("wheel_radius", self.wheel_radius)?;
        positive("axle_width", self.axle_width)?;
        Ok(())
    }
}

/// Everything a single dead-reckoning run needs, fixed for its duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub vehicle: VehicleParams,
    pub sampling_interval: f64, // seconds
    pub elapsed_time: f64,      // seconds, total run budget
    pub initial_pose: Pose,     // yaw already in radians
    pub wheel_speeds: WheelSpeeds,
    pub policy: TickPolicy,
}

impl RunConfig {
    /// Reject parameters that would divide by zero or produce an empty run
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vehicle.validate()?;
        positive("sampling_interval", self.sampling_interval)?;
        positive("elapsed_time", self.elapsed_time)?;
        finite("initial x", self.initial_pose.x)?;
        finite("initial y", self.initial_pose.y)?;
        finite("initial yaw", self.initial_pose.yaw)?;
        finite("right wheel speed", self.wheel_speeds.right)?;
        finite("left wheel speed", self.wheel_speeds.left)?;
        self.capacity()?;
        Ok(())
    }

    pub fn sampling_duration(&self) -> Result<Duration, ConfigError> {
        to_duration("sampling_interval", self.sampling_interval)
    }

    pub fn budget_duration(&self) -> Result<Duration, ConfigError> {
        to_duration("elapsed_time", self.elapsed_time)
    }

    /// Number of pose slots: floor(elapsed_time / sampling_interval) + 1
    ///
    /// Computed on the same nanosecond durations the scheduler compares,
    /// so the scheduler can never produce more ticks than there are slots.
    pub fn capacity(&self) -> Result<usize, ConfigError> {
        let interval = self.sampling_duration()?.as_nanos();
        let budget = self.budget_duration()?.as_nanos();
        if interval == 0 {
            return Err(ConfigError::NotPositive {
                name: "sampling_interval",
                value: self.sampling_interval,
            });
        }
        let ticks = usize::try_from(budget / interval).map_err(|_| ConfigError::OutOfRange {
            name: "elapsed_time",
            value: self.elapsed_time,
        })?;
        Ok(ticks + 1)
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn to_duration(name: &'static str, seconds: f64) -> Result<Duration, ConfigError> {
    positive(name, seconds)?;
    Duration::try_from_secs_f64(seconds).map_err(|_| ConfigError::OutOfRange {
        name,
        value: seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> RunConfig {
        RunConfig {
            vehicle: VehicleParams::new(0.05, 0.2),
            sampling_interval: DEFAULT_SAMPLING_INTERVAL_S,
            elapsed_time: 1.0,
            initial_pose: Pose::default(),
            wheel_speeds: WheelSpeeds::new(10.0, 10.0),
            policy: DEFAULT_TICK_POLICY,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(sample_config().validate(), Ok(()));
    }

    #[test]
    fn test_capacity_matches_floor_plus_one() {
        let mut config = sample_config();
        assert_eq!(config.capacity(), Ok(5));

        config.elapsed_time = 1.1;
        assert_eq!(config.capacity(), Ok(5));

        config.elapsed_time = 0.1;
        assert_eq!(config.capacity(), Ok(1));
    }

    #[test]
    fn test_capacity_uses_nanosecond_durations() {
        // 0.3 / 0.1 is 2.9999999999999996 in f64; as durations it is exactly 3 intervals
        let mut config = sample_config();
        config.sampling_interval = 0.1;
        config.elapsed_time = 0.3;
        assert_eq!(config.capacity(), Ok(4));
    }

    #[test]
    fn test_zero_axle_width_rejected() {
        let mut config = sample_config();
        config.vehicle.axle_width = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "axle_width",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_degenerate_timing_rejected() {
        let mut config = sample_config();
        config.sampling_interval = -0.25;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "sampling_interval",
                ..
            })
        ));

        let mut config = sample_config();
        config.elapsed_time = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "elapsed_time",
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut config = sample_config();
        config.initial_pose.yaw = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { name: "initial yaw", .. })
        ));

        let mut config = sample_config();
        config.elapsed_time = f64::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { name: "elapsed_time", .. })
        ));
    }

    #[test]
    fn test_huge_budget_rejected() {
        let mut config = sample_config();
        config.elapsed_time = 1e30;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { name: "elapsed_time", .. })
        ));
    }
}
