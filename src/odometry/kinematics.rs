// Differential-drive forward kinematics
// Converts left/right wheel angular speeds into a body-frame velocity (forward, lateral, turning).

use std::f64::consts::PI;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::VehicleParams;

/// Wheel angular speeds for the two driven wheels (rad/s)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelSpeeds {
    pub right: f64,
    pub left: f64,
}

impl WheelSpeeds {
    pub fn new(right: f64, left: f64) -> Self {
        Self { right, left }
    }

    /// Both wheels driven at the same speed
    pub fn uniform(speed: f64) -> Self {
        Self::new(speed, speed)
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Body-frame velocity of the vehicle
///
/// Recomputed on every tick; nothing about it is carried between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyVelocity {
    pub forward: f64, // m/s
    pub lateral: f64, // m/s, always 0 for a differential drive
    pub turning: f64, // rad/s
}

impl BodyVelocity {
    /// Returns the velocity as a column vector [forward, lateral, turning]
    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.forward, self.lateral, self.turning)
    }
}

/// Convert wheel angular speeds to a body-frame velocity
///
/// # Arguments
/// * `right_speed` - Right wheel angular speed in rad/s
/// * `left_speed` - Left wheel angular speed in rad/s
/// * `wheel_radius` - Wheel radius in meters
/// * `axle_width` - Wheel separation in meters, must be non-zero
///
/// # Returns
/// forward = r * (wr + wl) / 2, lateral = 0, turning = r * (wr - wl) / (2 * width)
pub fn body_velocity(
    right_speed: f64,
    left_speed: f64,
    wheel_radius: f64,
    axle_width: f64,
) -> BodyVelocity {
    BodyVelocity {
        forward: wheel_radius * (right_speed + left_speed) / 2.0,
        lateral: 0.0,
        turning: wheel_radius * (right_speed - left_speed) / (2.0 * axle_width),
    }
}

/// Same as [`body_velocity`], taking the geometry from validated vehicle parameters
pub fn body_velocity_for(vehicle: &VehicleParams, wheels: WheelSpeeds) -> BodyVelocity {
    body_velocity(
        wheels.right,
        wheels.left,
        vehicle.wheel_radius,
        vehicle.axle_width,
    )
}

/// Wheel speed derived from the encoder rate
///
/// pulses/rev * pulses/s scaled by 2π/60. Both wheels are driven at this speed.
pub fn encoder_wheel_speed(pulses_per_revolution: f64, pulses_per_second: f64) -> f64 {
    pulses_per_revolution * pulses_per_second * 2.0 * PI / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_zero_velocity() {
        let v = body_velocity(0.0, 0.0, 0.05, 0.2);
        assert_eq!(v, BodyVelocity::default());
    }

    #[test]
    fn test_straight_motion() {
        // Equal wheel speeds: pure forward motion, no turning
        let v = body_velocity(10.0, 10.0, 0.05, 0.2);
        assert!((v.forward - 0.5).abs() < EPS);
        assert_eq!(v.lateral, 0.0);
        assert!(v.turning.abs() < EPS);
    }

    #[test]
    fn test_rotation_in_place() {
        // Opposite wheel speeds: no forward motion, counter-clockwise turn
        let v = body_velocity(4.0, -4.0, 0.05, 0.2);
        assert!(v.forward.abs() < EPS);
        // 0.05 * 8 / 0.4 = 1 rad/s
        assert!((v.turning - 1.0).abs() < EPS);
    }

    #[test]
    fn test_turn_direction_follows_faster_wheel() {
        let left_turn = body_velocity(6.0, 4.0, 0.05, 0.2);
        let right_turn = body_velocity(4.0, 6.0, 0.05, 0.2);
        assert!(left_turn.turning > 0.0);
        assert!(right_turn.turning < 0.0);
        assert!((left_turn.forward - right_turn.forward).abs() < EPS);
    }

    #[test]
    fn test_vehicle_params_wrapper() {
        let vehicle = VehicleParams::new(0.036, 0.15);
        let wheels = WheelSpeeds::new(3.0, 1.0);
        assert_eq!(
            body_velocity_for(&vehicle, wheels),
            body_velocity(3.0, 1.0, 0.036, 0.15)
        );
    }

    #[test]
    fn test_encoder_wheel_speed() {
        // 60 pulses/rev at 1 pulse/s maps to exactly 2π
        assert!((encoder_wheel_speed(60.0, 1.0) - 2.0 * PI).abs() < EPS);
        assert_eq!(encoder_wheel_speed(0.0, 40.0), 0.0);
    }
}
