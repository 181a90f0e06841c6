//! PVT trajectory submission (C4).
//!
//! Builds a position/velocity/time packet from a list of poses and hands it
//! to the motion controller in one `setPvts` + `movePvts` pair, instead of
//! the per-axis `moveRelative` calls used by [`crate::motion`].

use crate::device::SixDofDevice;
use crate::safety::gating::Command;
use serde::{Deserialize, Serialize};
use sixdof_common::error::DeviceError;
use sixdof_common::pose::{validate_pose, Pose};
use sixdof_common::state::DeviceState;
use std::f64::consts::PI;

/// Raw PVT request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PvtRequest {
    pub poses: Vec<[f64; 6]>,
    pub times: Vec<f64>,
    pub velocities: Option<Vec<[f64; 6]>>,
}

/// Outbound packet shape handed to `setPvts`.
#[derive(Debug, Serialize)]
struct PvtPacket {
    axes: [u8; 6],
    count: usize,
    time: Vec<f64>,
    pos: [Vec<f64>; 6],
    vel: [Vec<f64>; 6],
}

/// `{axes: [0..5]}`, the body of `movePvts`.
#[derive(Serialize)]
struct MovePvtsBody {
    axes: [u8; 6],
}

fn validate_request(request: &PvtRequest) -> Result<(), DeviceError> {
    if request.poses.len() != request.times.len() || request.poses.len() < 2 {
        return Err(DeviceError::InvalidJson(format!(
            "poses/times length mismatch or < 2 points: poses={}, times={}",
            request.poses.len(),
            request.times.len()
        )));
    }
    if let Some(v) = &request.velocities {
        if v.len() != request.poses.len() {
            return Err(DeviceError::InvalidJson(format!(
                "velocities length {} does not match poses length {}",
                v.len(),
                request.poses.len()
            )));
        }
    }
    for raw in &request.poses {
        let pose = Pose::from_array(*raw).scale_rotations(180.0 / PI);
        if !validate_pose(pose) {
            return Err(DeviceError::OutOfRange(format!(
                "PVT pose {raw:?} exceeds POS_LIMIT/ROT_LIMIT"
            )));
        }
    }
    Ok(())
}

/// Forward/central/backward-difference velocity synthesis over `leg_traj`
/// sampled at `times`.
fn synthesize_velocities(leg_traj: &[[f64; 6]], times: &[f64]) -> Vec<[f64; 6]> {
    let n = leg_traj.len();
    let mut vel = vec![[0.0_f64; 6]; n];
    for axis in 0..6 {
        if n == 1 {
            continue;
        }
        vel[0][axis] = (leg_traj[1][axis] - leg_traj[0][axis]) / (times[1] - times[0]);
        vel[n - 1][axis] = (leg_traj[n - 1][axis] - leg_traj[n - 2][axis]) / (times[n - 1] - times[n - 2]);
        for i in 1..n - 1 {
            vel[i][axis] = (leg_traj[i + 1][axis] - leg_traj[i - 1][axis]) / (times[i + 1] - times[i - 1]);
        }
    }
    vel
}

impl SixDofDevice {
    /// `setPvts` + `movePvts`.
    pub fn move_pvts(&self, request: PvtRequest) -> Result<(), DeviceError> {
        self.admit(Command::MovePvt)?;
        validate_request(&request).inspect_err(|e| {
            self.set_result(1);
            self.log(format!("movePvts rejected: {e}"));
        })?;

        // Step 3: absolute leg lengths for every pose (rotations × 180/π).
        let mut absolute_legs = Vec::with_capacity(request.poses.len());
        for raw in &request.poses {
            let pose = Pose::from_array(*raw).scale_rotations(180.0 / PI);
            let legs = self.kinematics.ik(pose).inspect_err(|e| {
                self.set_result(1);
                self.log(format!("PVT IK failed: {e}"));
            })?;
            absolute_legs.push(legs);
        }

        // Step 4: relative to point 0.
        let origin = absolute_legs[0];
        let relative_legs: Vec<[f64; 6]> =
            absolute_legs.iter().map(|legs| std::array::from_fn(|i| legs[i] - origin[i])).collect();

        // Step 5: synthesize velocities if absent. Caller-supplied velocities
        // are already per-leg (same shape as `pos`) and pass through as-is.
        let velocities = match &request.velocities {
            Some(v) => v.clone(),
            None => synthesize_velocities(&relative_legs, &request.times),
        };

        // Step 6: transpose into per-axis arrays and package.
        let mut pos: [Vec<f64>; 6] = Default::default();
        let mut vel: [Vec<f64>; 6] = Default::default();
        for point in &relative_legs {
            for axis in 0..6 {
                pos[axis].push(point[axis]);
            }
        }
        for point in &velocities {
            for axis in 0..6 {
                vel[axis].push(point[axis]);
            }
        }
        let packet = PvtPacket { axes: [0, 1, 2, 3, 4, 5], count: request.poses.len(), time: request.times.clone(), pos, vel };
        let packet_json = serde_json::to_string(&packet)
            .map_err(|e| DeviceError::InvalidJson(format!("failed to serialize PVT packet: {e}")))?;
        let move_body = serde_json::to_string(&MovePvtsBody { axes: [0, 1, 2, 3, 4, 5] })
            .map_err(|e| DeviceError::InvalidJson(format!("failed to serialize movePvts body: {e}")))?;

        if !self.simulation_mode() {
            let Some(motion) = self.proxies.motion() else {
                self.set_result(1);
                return Err(DeviceError::ProxyError("motion proxy unavailable".into()));
            };
            self.brake.release(motion.as_ref(), self.sdof_config.brake_power_port);
            motion.set_pvts(&packet_json).map_err(|e| {
                self.set_result(1);
                DeviceError::from(e)
            })?;
            motion.move_pvts(&move_body).map_err(|e| {
                self.set_result(1);
                DeviceError::from(e)
            })?;
        }

        // Step 7.
        let final_pose = Pose::from_array(*request.poses.last().unwrap()).scale_rotations(180.0 / PI);
        let final_legs = *absolute_legs.last().unwrap();
        {
            let mut inner = self.inner.lock().unwrap();
            inner.sdof_state = [true; 6];
            inner.current_leg_lengths = final_legs;
            inner.six_freedom_pose = final_pose;
            inner.state = DeviceState::Moving;
        }
        self.set_result(0);
        Ok(())
    }
}
