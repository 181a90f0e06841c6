//! Scenario 3: a limit switch fires mid-move. The next `periodic_hook`
//! pass must latch the fault, engage the brake, stop every axis, and drop
//! the device to FAULT; further motion is blocked until an explicit `reset`.

use super::support::networked_device_with_handles;
use sixdof_common::error::DeviceError;
use sixdof_common::pose::Pose;
use sixdof_common::state::DeviceState;

#[test]
fn limit_trigger_during_moving_latches_fault_and_blocks_motion_until_reset() {
    let (device, motion, _encoder) = networked_device_with_handles();

    device.move_pose_relative(Pose::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0)).unwrap();
    assert_eq!(device.state(), DeviceState::Moving);

    // Axis 2, EL+.
    motion.set_limit_switch(2, 1);
    device.periodic_hook();

    assert_eq!(device.state(), DeviceState::Fault);
    assert!(device.alarm_state().contains("axis 2"));
    assert!(!motion.move_relative_calls().is_empty());

    let err = device.move_pose_relative(Pose::new(0.1, 0.0, 0.0, 0.0, 0.0, 0.0));
    assert!(matches!(err, Err(DeviceError::StateViolation { .. })));

    device.reset().unwrap();
    assert_eq!(device.state(), DeviceState::On);

    device.move_pose_relative(Pose::new(0.1, 0.0, 0.0, 0.0, 0.0, 0.0)).unwrap();
    assert_eq!(device.state(), DeviceState::Moving);
}
