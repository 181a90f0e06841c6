//! Scenario 2: a translation beyond `POS_LIMIT` is rejected before any
//! kinematics or hardware call, leaves `resultValue=1`, and leaves the
//! device's state untouched.

use super::support::simulation_device;
use sixdof_common::error::DeviceError;
use sixdof_common::pose::Pose;

#[test]
fn translation_past_pos_limit_is_rejected_with_no_state_change() {
    let device = simulation_device();
    let state_before = device.state();
    let pose_before = device.six_freedom_pose();
    let legs_before = device.dire_pos();

    let err = device.move_pose_absolute(Pose::new(18.0, 0.0, 0.0, 0.0, 0.0, 0.0));

    assert!(matches!(err, Err(DeviceError::OutOfRange(_))));
    assert_eq!(device.result_value(), 1);
    assert_eq!(device.state(), state_before);
    assert_eq!(device.six_freedom_pose(), pose_before);
    assert_eq!(device.dire_pos(), legs_before);
}
