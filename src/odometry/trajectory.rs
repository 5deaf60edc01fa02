// Fixed-capacity pose trajectory with a monotonic write cursor
//
// x, y and yaw are kept as three parallel sequences, one slot per sample tick.
// Slot 0 holds the initial pose; slot i can only be written right after slot i-1.

use serde::Serialize;

use super::integrator::Pose;

/// Error types for trajectory writes
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrajectoryError {
    #[error("Trajectory capacity must be at least 1")]
    ZeroCapacity,

    #[error("Initial pose already written")]
    AlreadyInitialized,

    #[error("Initial pose not written yet")]
    NotInitialized,

    #[error("Out-of-order write: expected index {expected}, got {index}")]
    OutOfOrder { expected: usize, index: usize },

    #[error("Trajectory full: all {capacity} slots written")]
    Full { capacity: usize },
}

pub type Result<T> = std::result::Result<T, TrajectoryError>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    x: Vec<f64>,
    y: Vec<f64>,
    yaw: Vec<f64>,
    capacity: usize,
}

impl Trajectory {
    /// Allocate all slots up front; the buffers never grow past `capacity`
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TrajectoryError::ZeroCapacity);
        }
        Ok(Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            yaw: Vec::with_capacity(capacity),
            capacity,
        })
    }

    /// Write index 0
    pub fn set_initial(&mut self, x: f64, y: f64, yaw: f64) -> Result<()> {
        if !self.is_empty() {
            return Err(TrajectoryError::AlreadyInitialized);
        }
        self.push(Pose::new(x, y, yaw));
        Ok(())
    }

    /// Write `pose` at `index`, which must be exactly one past the last written index
    pub fn advance(&mut self, index: usize, pose: Pose) -> Result<()> {
        if self.is_empty() {
            return Err(TrajectoryError::NotInitialized);
        }
        if self.is_full() {
            return Err(TrajectoryError::Full {
                capacity: self.capacity,
            });
        }
        let expected = self.len();
        if index != expected {
            return Err(TrajectoryError::OutOfOrder { expected, index });
        }
        self.push(pose);
        Ok(())
    }

    fn push(&mut self, pose: Pose) {
        self.x.push(pose.x);
        self.y.push(pose.y);
        self.yaw.push(pose.yaw);
    }

    /// Pose at `index`, if it has been written
    pub fn get(&self, index: usize) -> Option<Pose> {
        Some(Pose::new(
            *self.x.get(index)?,
            *self.y.get(index)?,
            *self.yaw.get(index)?,
        ))
    }

    pub fn last(&self) -> Option<Pose> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Number of slots written so far
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    pub fn xs(&self) -> &[f64] {
        &self.x
    }

    pub fn ys(&self) -> &[f64] {
        &self.y
    }

    pub fn yaws(&self) -> &[f64] {
        &self.yaw
    }

    pub fn iter(&self) -> impl Iterator<Item = Pose> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.yaw)
            .map(|((&x, &y), &yaw)| Pose::new(x, y, yaw))
    }
}
