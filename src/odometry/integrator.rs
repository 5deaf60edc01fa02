// Forward-Euler pose integration

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::kinematics::BodyVelocity;

/// World-frame pose at one sample index
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,   // meters
    pub y: f64,   // meters
    pub yaw: f64, // radians
}

impl Pose {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }

    /// Pose with the heading given in degrees
    pub fn from_degrees(x: f64, y: f64, yaw_deg: f64) -> Self {
        Self::new(x, y, yaw_deg.to_radians())
    }

    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.yaw)
    }
}

impl From<Vector3<f64>> for Pose {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Advance a pose by one sampling interval
///
/// next = previous + dt * (rotation · velocity). First order only: the error
/// grows with every step and nothing here bounds or corrects it.
pub fn integrate(
    previous: &Pose,
    rotation: &Matrix3<f64>,
    velocity: &BodyVelocity,
    sampling_interval: f64,
) -> Pose {
    let world_rates = rotation * velocity.as_vector();
    Pose::from(previous.as_vector() + world_rates * sampling_interval)
}
