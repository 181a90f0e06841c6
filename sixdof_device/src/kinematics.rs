//! Stewart-platform inverse kinematics engine (C1).
//!
//! Converts a 6-DOF pose to six leg lengths and, given a stored current
//! leg-length vector, to per-axis pulse deltas. Forward kinematics is a
//! documented non-goal — this module is one-directional.

use sixdof_common::config::PlatformGeometry;
use sixdof_common::error::DeviceError;
use sixdof_common::pose::{round4, Pose};

/// Precomputed hinge geometry plus the platform's reachability bounds.
///
/// Rebuilt only when the platform geometry changes, which only ever
/// happens at device construction.
#[derive(Debug, Clone)]
pub struct KinematicsEngine {
    geometry: PlatformGeometry,
    platform_hinges: [[f64; 3]; 6],
    base_hinges: [[f64; 3]; 6],
}

/// Hinges are arranged in three symmetric pairs 120° apart; within a pair
/// the platform hinge sits at `+half_angle` and the base hinge at
/// `-half_angle` (or vice versa, controlled by `sign_mul`), which is what
/// makes every leg the same length at the identity pose regardless of the
/// absolute value of `a1`/`a2` — only `a1 + a2` (or `a1 - a2`) matters.
fn compute_hinges(radius: f64, half_angle_deg: f64, axial_offset: f64, sign_mul: f64) -> [[f64; 3]; 6] {
    let mut hinges = [[0.0_f64; 3]; 6];
    for (i, hinge) in hinges.iter_mut().enumerate() {
        let pair_group = (i / 2) as f64;
        let pair_sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        let angle_deg = 120.0 * pair_group + pair_sign * sign_mul * half_angle_deg;
        let angle = angle_deg.to_radians();
        *hinge = [radius * angle.cos(), radius * angle.sin(), axial_offset];
    }
    hinges
}

/// Intrinsic Z-Y-X Euler rotation matrix: `R = Rz(rz) * Ry(ry) * Rx(rx)`.
fn rotation_matrix_zyx(rz: f64, ry: f64, rx: f64) -> [[f64; 3]; 3] {
    let (sz, cz) = rz.sin_cos();
    let (sy, cy) = ry.sin_cos();
    let (sx, cx) = rx.sin_cos();

    [
        [cz * cy, cz * sy * sx - sz * cx, cz * sy * cx + sz * sx],
        [sz * cy, sz * sy * sx + cz * cx, sz * sy * cx - cz * sx],
        [-sy, cy * sx, cy * cx],
    ]
}

fn mat_vec_mul(m: [[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

impl KinematicsEngine {
    /// Build the engine from a platform geometry, precomputing the six
    /// platform- and base-hinge coordinates.
    pub fn new(geometry: PlatformGeometry) -> Self {
        let platform_hinges = compute_hinges(geometry.r1, geometry.a1, geometry.h, 1.0);
        let base_hinges = compute_hinges(geometry.r2, geometry.a2, geometry.h3, -1.0);
        Self { geometry, platform_hinges, base_hinges }
    }

    pub fn geometry(&self) -> &PlatformGeometry {
        &self.geometry
    }

    /// Compute the six leg lengths for a pose, rounded to 4 decimals.
    ///
    /// Rotation components of `pose` are expected in degrees; callers are
    /// responsible for applying the documented absolute/relative angle-unit
    /// asymmetry before calling this.
    pub fn leg_lengths(&self, pose: Pose) -> [f64; 6] {
        let r = rotation_matrix_zyx(pose.rz.to_radians(), pose.ry.to_radians(), pose.rx.to_radians());
        let translation = [pose.x, pose.y, pose.z + self.geometry.hh];

        let mut legs = [0.0_f64; 6];
        for i in 0..6 {
            let rotated = mat_vec_mul(r, self.platform_hinges[i]);
            let transformed = [
                rotated[0] + translation[0],
                rotated[1] + translation[1],
                rotated[2] + translation[2],
            ];
            let base = self.base_hinges[i];
            let d = [
                transformed[0] - base[0],
                transformed[1] - base[1],
                transformed[2] - base[2],
            ];
            legs[i] = round4((d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt());
        }
        legs
    }

    /// Inverse kinematics with the reachability check.
    ///
    /// Every leg must land within `[min_leg_length, max_leg_length]`;
    /// otherwise the call fails with a typed `KinematicsError`.
    pub fn ik(&self, pose: Pose) -> Result<[f64; 6], DeviceError> {
        let legs = self.leg_lengths(pose);
        for (i, &leg) in legs.iter().enumerate() {
            if leg < self.geometry.min_leg_length || leg > self.geometry.max_leg_length {
                return Err(DeviceError::KinematicsError(format!(
                    "Unreachable pose: leg {i} length {leg} outside [{}, {}]",
                    self.geometry.min_leg_length, self.geometry.max_leg_length
                )));
            }
        }
        Ok(legs)
    }
}

/// Per-axis delta (mm) and pulse conversion.
///
/// `delta_i = target_i − current_i` (rounded to 4 decimals, the exact float
/// used to update stored leg state); `pulses_i = round(pulses_per_mm ·
/// delta_i)` with no silent truncation.
pub fn deltas_and_pulses(
    target_legs: [f64; 6],
    current_legs: [f64; 6],
    pulses_per_mm: f64,
) -> ([f64; 6], [i64; 6]) {
    let mut deltas = [0.0_f64; 6];
    let mut pulses = [0_i64; 6];
    for i in 0..6 {
        let delta = round4(target_legs[i] - current_legs[i]);
        deltas[i] = delta;
        pulses[i] = (pulses_per_mm * delta).round() as i64;
    }
    (deltas, pulses)
}
