//! Scenario 5: a three-point PVT trajectory with no explicit
//! velocities synthesizes them via forward/central/backward difference,
//! converts every pose to an absolute leg-length vector relative to point
//! 0, and leaves the device MOVING with its leg lengths at the final pose.

use super::support::simulation_device;
use sixdof_common::pose::Pose;
use sixdof_common::state::DeviceState;
use sixdof_device::pvt::PvtRequest;

fn three_point_request() -> PvtRequest {
    PvtRequest {
        poses: vec![
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        ],
        times: vec![0.0, 1.0, 2.0],
        velocities: None,
    }
}

#[test]
fn three_point_trajectory_lands_on_final_pose_and_enters_moving() {
    let device = simulation_device();
    let request = three_point_request();
    let final_pose = Pose::from_array(*request.poses.last().unwrap());

    device.move_pvts(request).unwrap();

    assert_eq!(device.state(), DeviceState::Moving);
    assert_eq!(device.six_freedom_pose(), final_pose);
    assert_eq!(device.result_value(), 0);
}

#[test]
fn mismatched_poses_and_times_are_rejected() {
    let device = simulation_device();
    let mut request = three_point_request();
    request.times.pop();
    assert!(device.move_pvts(request).is_err());
    assert_eq!(device.result_value(), 1);
}
