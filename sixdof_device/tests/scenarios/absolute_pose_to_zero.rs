//! Scenario 1: `movePoseAbsolute([0,0,0,0,0,0])` from the platform's
//! nominal identity pose produces zero leg-length deltas and zero pulses,
//! still issues a `moveRelative` call per axis, and transitions ON -> MOVING.

use super::support::networked_device_with_handles;
use sixdof_common::pose::Pose;
use sixdof_common::state::DeviceState;

#[test]
fn zero_pose_move_leaves_leg_lengths_unchanged_and_enters_moving() {
    let (device, motion, _encoder) = networked_device_with_handles();
    let before = device.dire_pos();

    device.move_pose_absolute(Pose::ZERO).unwrap();

    assert_eq!(device.dire_pos(), before);
    assert_eq!(device.six_freedom_pose(), Pose::ZERO);
    assert_eq!(device.state(), DeviceState::Moving);
    assert_eq!(device.result_value(), 0);

    let calls = motion.move_relative_calls();
    assert_eq!(calls.len(), 6);
    for (axis, (called_axis, pulses)) in calls.iter().enumerate() {
        assert_eq!(*called_axis, axis as u8);
        assert_eq!(*pulses, 0);
    }
}
