// Body-to-world frame rotation about the vertical axis

use nalgebra::Matrix3;

/// Rotation about Z by `yaw` radians
///
/// Maps a body-frame vector [forward, lateral, turning] to world-frame rates
/// [dx/dt, dy/dt, dyaw/dt]. The third row is the identity, so the turning
/// rate passes through unchanged and only the linear part is rotated.
pub fn rotation_around_z(yaw: f64) -> Matrix3<f64> {
    let (sin, cos) = yaw.sin_cos();
    Matrix3::new(
        cos, -sin, 0.0, //
        sin, cos, 0.0, //
        0.0, 0.0, 1.0,
    )
}
