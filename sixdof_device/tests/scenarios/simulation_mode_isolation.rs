//! Scenario 6: in simulation mode, a sequence of accepted commands
//! never reaches the hardware surface, the connection stays reported
//! healthy throughout, and the device's own state still advances as if the
//! commands had been carried out.

use super::support::simulation_device_with_handle;
use sixdof_common::pose::Pose;
use sixdof_common::state::DeviceState;

#[test]
fn accepted_commands_never_touch_the_proxy_and_state_still_advances() {
    let (device, motion) = simulation_device_with_handle();
    assert!(device.connection_healthy());

    device.move_pose_relative(Pose::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0)).unwrap();
    assert_eq!(device.state(), DeviceState::Moving);
    assert!(device.connection_healthy());

    device.stop().unwrap();
    assert_eq!(device.state(), DeviceState::On);

    device.single_move_relative(0, 10.0).unwrap();
    assert_eq!(device.state(), DeviceState::Moving);
    device.stop().unwrap();

    device.six_move_zero().unwrap();

    assert!(device.connection_healthy());
    assert!(motion.move_relative_calls().is_empty());
    assert!(motion.io_writes().is_empty());
    assert_eq!(motion.position_pulses(), [0; 6]);
}
