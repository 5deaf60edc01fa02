// Run state for one dead-reckoning pass: vehicle geometry, wheel speeds and the trajectory

use tracing::trace;

use super::integrator::{integrate, Pose};
use super::kinematics::{body_velocity_for, BodyVelocity, WheelSpeeds};
use super::rotation::rotation_around_z;
use super::trajectory::{Result, Trajectory, TrajectoryError};
use crate::config::VehicleParams;

/// Owns the trajectory and produces one new pose per step
#[derive(Debug, Clone)]
pub struct PoseEstimator {
    vehicle: VehicleParams,
    wheels: WheelSpeeds,
    sampling_interval: f64, // seconds, the integration step
    trajectory: Trajectory,
}

impl PoseEstimator {
    /// Create an estimator with `capacity` slots and `initial` written at index 0
    pub fn new(
        vehicle: VehicleParams,
        wheels: WheelSpeeds,
        sampling_interval: f64,
        capacity: usize,
        initial: Pose,
    ) -> Result<Self> {
        let mut trajectory = Trajectory::with_capacity(capacity)?;
        trajectory.set_initial(initial.x, initial.y, initial.yaw)?;
        Ok(Self {
            vehicle,
            wheels,
            sampling_interval,
            trajectory,
        })
    }

    /// Body-frame velocity for the current wheel speeds
    pub fn body_velocity(&self) -> BodyVelocity {
        body_velocity_for(&self.vehicle, self.wheels)
    }

    /// Integrate one sampling interval and write the result at the next index
    pub fn step(&mut self) -> Result<Pose> {
        let index = self.trajectory.len();
        let previous = self
            .trajectory
            .last()
            .ok_or(TrajectoryError::NotInitialized)?;

        let rotation = rotation_around_z(previous.yaw);
        let velocity = self.body_velocity();
        let next = integrate(&previous, &rotation, &velocity, self.sampling_interval);

        self.trajectory.advance(index, next)?;
        trace!(index, x = next.x, y = next.y, yaw = next.yaw, "pose integrated");
        Ok(next)
    }

    /// Number of steps taken so far (index of the last written pose)
    pub fn ticks(&self) -> usize {
        self.trajectory.len().saturating_sub(1)
    }

    pub fn is_full(&self) -> bool {
        self.trajectory.is_full()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }
}
