// Differential-drive dead reckoning: wheel speeds in, world-frame trajectory out

pub mod config;
pub mod input;
pub mod messages;
pub mod odometry;
pub mod runtime;
pub mod scheduler;
