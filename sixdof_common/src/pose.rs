//! The 6-DOF pose type and its validation rules.

use crate::consts::{POS_LIMIT, ROT_LIMIT};
use serde::{Deserialize, Serialize};

/// A target or commanded six-degree-of-freedom pose.
///
/// Translations (`x`, `y`, `z`) are in millimetres; rotations (`rx`, `ry`,
/// `rz`) are conventionally in degrees, though the caller-facing API accepts
/// radians for absolute moves (see [`crate::proxy`] docs and the device
/// layer's `movePoseAbsolute` handling).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl Pose {
    pub const ZERO: Pose = Pose { x: 0.0, y: 0.0, z: 0.0, rx: 0.0, ry: 0.0, rz: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self { x, y, z, rx, ry, rz }
    }

    /// Build a pose from the six-element array form used at the API boundary.
    pub const fn from_array(a: [f64; 6]) -> Self {
        Self { x: a[0], y: a[1], z: a[2], rx: a[3], ry: a[4], rz: a[5] }
    }

    pub const fn to_array(self) -> [f64; 6] {
        [self.x, self.y, self.z, self.rx, self.ry, self.rz]
    }

    /// Pose accumulation for relative moves: `self + delta`.
    pub fn add(self, delta: Pose) -> Pose {
        Pose {
            x: self.x + delta.x,
            y: self.y + delta.y,
            z: self.z + delta.z,
            rx: self.rx + delta.rx,
            ry: self.ry + delta.ry,
            rz: self.rz + delta.rz,
        }
    }

    /// Scale the rotation components only, leaving translations untouched.
    ///
    /// Used to replicate the documented angle-unit asymmetry: absolute pose
    /// moves multiply incoming rotations by `180/π` before IK, relative
    /// moves do not.
    pub fn scale_rotations(self, factor: f64) -> Pose {
        Pose { rx: self.rx * factor, ry: self.ry * factor, rz: self.rz * factor, ..self }
    }
}

/// Validate a target pose against the static range invariants.
///
/// Applies to the *target* pose — for relative moves, validation happens
/// after accumulation, never on the individual command delta.
pub fn validate_pose(pose: Pose) -> bool {
    [pose.x, pose.y, pose.z].iter().all(|v| v.abs() <= POS_LIMIT)
        && [pose.rx, pose.ry, pose.rz].iter().all(|v| v.abs() <= ROT_LIMIT)
}

/// Round a leg-length-shaped quantity to the storage/equivalence precision
/// used throughout the kinematics and idempotence tests.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_pose_validates() {
        assert!(validate_pose(Pose::new(10.0, -10.0, 0.0, 2.0, -2.0, 0.0)));
    }

    #[test]
    fn translation_over_limit_rejected() {
        assert!(!validate_pose(Pose::new(17.0001, 0.0, 0.0, 0.0, 0.0, 0.0)));
        assert!(!validate_pose(Pose::new(18.0, 0.0, 0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn rotation_over_limit_rejected() {
        assert!(!validate_pose(Pose::new(0.0, 0.0, 0.0, 4.0001, 0.0, 0.0)));
    }

    #[test]
    fn boundary_values_are_accepted() {
        assert!(validate_pose(Pose::new(17.0, -17.0, 17.0, 4.0, -4.0, 4.0)));
    }

    #[test]
    fn add_accumulates_componentwise() {
        let base = Pose::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0);
        let delta = Pose::new(0.5, -0.5, 0.0, 1.0, 1.0, 1.0);
        let sum = base.add(delta);
        assert_eq!(sum, Pose::new(1.5, 1.5, 3.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn scale_rotations_leaves_translation_untouched() {
        let p = Pose::new(1.0, 2.0, 3.0, 1.0, 2.0, 3.0);
        let scaled = p.scale_rotations(2.0);
        assert_eq!((scaled.x, scaled.y, scaled.z), (1.0, 2.0, 3.0));
        assert_eq!((scaled.rx, scaled.ry, scaled.rz), (2.0, 4.0, 6.0));
    }

    #[test]
    fn round4_matches_documented_precision() {
        assert_eq!(round4(1.234_449), 1.2344);
        assert_eq!(round4(1.234_450_1), 1.2345);
        assert_eq!(round4(-0.000_049), -0.0);
    }
}
