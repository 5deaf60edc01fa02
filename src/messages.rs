// Report produced at the end of a run

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::odometry::Trajectory;
use crate::scheduler::RunStats;

/// Final trajectory plus the constant wheel speeds it was integrated from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdometryReport {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub yaw: Vec<f64>,
    pub capacity: usize,
    pub ticks: usize,
    pub missed_ticks: usize,
    pub angular_speed_per_wheel: f64, // rad/s
    pub linear_speed_per_wheel: f64,  // m/s
}

impl OdometryReport {
    /// `wheel_speed` is the encoder-derived speed fed to both wheels
    pub fn new(
        trajectory: &Trajectory,
        stats: &RunStats,
        wheel_speed: f64,
        wheel_radius: f64,
    ) -> Self {
        Self {
            x: trajectory.xs().to_vec(),
            y: trajectory.ys().to_vec(),
            yaw: trajectory.yaws().to_vec(),
            capacity: trajectory.capacity(),
            ticks: stats.ticks,
            missed_ticks: stats.missed_ticks,
            angular_speed_per_wheel: wheel_speed / wheel_radius,
            linear_speed_per_wheel: wheel_speed,
        }
    }
}

fn write_series(f: &mut fmt::Formatter<'_>, label: &str, values: &[f64]) -> fmt::Result {
    write!(f, "{}", label)?;
    for v in values {
        write!(f, " {}", v)?;
    }
    writeln!(f)
}

// Human-readable report, one series per line
impl fmt::Display for OdometryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pose Values:")?;
        write_series(f, "x:", &self.x)?;
        write_series(f, "y:", &self.y)?;
        write_series(f, "yaw (rad):", &self.yaw)?;
        writeln!(
            f,
            "Angular Speed per Wheel (rad/s): {}",
            self.angular_speed_per_wheel
        )?;
        write!(
            f,
            "Linear Speed per Wheel (m/s): {}",
            self.linear_speed_per_wheel
        )
    }
}
