//! Scenario 4: the motion proxy's connection drops while ON, the
//! monitor marks the link unhealthy and the device faults; once the
//! endpoint comes back the monitor rebuilds the handle, flags a pending
//! restore, and the next attribute read runs the restore and brings the
//! device back ON.

use super::support::networked_device_with_flaky_motion;
use sixdof_common::state::DeviceState;

#[test]
fn ping_failure_faults_the_device_and_restore_brings_it_back_on() {
    let (device, motion) = networked_device_with_flaky_motion();
    assert_eq!(device.state(), DeviceState::On);
    assert!(device.connection_healthy());

    motion.set_failing(true);
    device.run_monitor_tick();
    assert!(!device.connection_healthy());

    device.periodic_hook();
    assert_eq!(device.state(), DeviceState::Fault);
    assert!(device.alarm_state().to_lowercase().contains("connection"));

    motion.set_failing(false);
    device.run_monitor_tick();
    assert!(device.motion_restore_pending());

    device.periodic_hook(); // step 1: runs the restore
    assert!(device.connection_healthy());
    assert!(!device.motion_restore_pending());

    device.periodic_hook(); // step 4: mirrors controller state back to ON
    assert_eq!(device.state(), DeviceState::On);
}
