// Dead-reckoning odometry for a differential-drive base
//
// Provides:
// - Differential-drive forward kinematics (wheel speeds -> body velocity)
// - Body-to-world rotation about Z
// - Forward-Euler pose integration
// - Fixed-capacity pose trajectory
// - Per-run estimator state tying them together

pub mod estimator;
pub mod integrator;
pub mod kinematics;
pub mod rotation;
pub mod trajectory;

pub use estimator::PoseEstimator;
pub use integrator::{integrate, Pose};
pub use kinematics::{body_velocity, encoder_wheel_speed, BodyVelocity, WheelSpeeds};
pub use rotation::rotation_around_z;
pub use trajectory::{Trajectory, TrajectoryError};
