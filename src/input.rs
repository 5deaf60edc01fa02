// Run parameters read once at startup: eight whitespace-separated numbers
//
// Order: pulses/rev, pulses/s, wheel radius (m), axle width (m),
//        initial x (m), initial y (m), initial yaw (deg), elapsed time (s)

use serde::{Deserialize, Serialize};

use crate::config::{RunConfig, VehicleParams};
use crate::odometry::{encoder_wheel_speed, Pose, WheelSpeeds};
use crate::scheduler::TickPolicy;

/// Number of values expected on input
pub const INPUT_FIELDS: usize = 8;

const FIELD_NAMES: [&str; INPUT_FIELDS] = [
    "encoder pulses per revolution",
    "pulses per second",
    "wheel radius",
    "axle width",
    "initial x",
    "initial y",
    "initial yaw",
    "elapsed time",
];

/// Error types for parameter input
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Expected {expected} values, got {got}")]
    WrongCount { expected: usize, got: usize },

    #[error("Value {position} ({field}) is not a number: {token:?}")]
    NotANumber {
        position: usize,
        field: &'static str,
        token: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunInput {
    pub pulses_per_revolution: f64,
    pub pulses_per_second: f64,
    pub wheel_radius: f64,    // meters
    pub axle_width: f64,      // meters
    pub initial_x: f64,       // meters
    pub initial_y: f64,       // meters
    pub initial_yaw_deg: f64, // degrees
    pub elapsed_time: f64,    // seconds
}

impl RunInput {
    /// Parse the whole input; either all eight values are numbers or nothing is returned
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != INPUT_FIELDS {
            return Err(InputError::WrongCount {
                expected: INPUT_FIELDS,
                got: tokens.len(),
            });
        }

        let mut values = [0.0f64; INPUT_FIELDS];
        for (i, token) in tokens.iter().enumerate() {
            values[i] = token.parse().map_err(|_| InputError::NotANumber {
                position: i + 1,
                field: FIELD_NAMES[i],
                token: token.to_string(),
            })?;
        }

        let [
            pulses_per_revolution,
            pulses_per_second,
            wheel_radius,
            axle_width,
            initial_x,
            initial_y,
            initial_yaw_deg,
            elapsed_time,
        ] = values;
        Ok(Self {
            pulses_per_revolution,
            pulses_per_second,
            wheel_radius,
            axle_width,
            initial_x,
            initial_y,
            initial_yaw_deg,
            elapsed_time,
        })
    }

    /// Speed applied to both wheels, derived from the encoder rate
    pub fn wheel_speed(&self) -> f64 {
        encoder_wheel_speed(self.pulses_per_revolution, self.pulses_per_second)
    }

    pub fn initial_pose(&self) -> Pose {
        Pose::from_degrees(self.initial_x, self.initial_y, self.initial_yaw_deg)
    }

    /// Build an (unvalidated) run configuration
    pub fn to_config(&self, sampling_interval: f64, policy: TickPolicy) -> RunConfig {
        RunConfig {
            vehicle: VehicleParams::new(self.wheel_radius, self.axle_width),
            sampling_interval,
            elapsed_time: self.elapsed_time,
            initial_pose: self.initial_pose(),
            wheel_speeds: WheelSpeeds::uniform(self.wheel_speed()),
            policy,
        }
    }
}

impl std::str::FromStr for RunInput {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
