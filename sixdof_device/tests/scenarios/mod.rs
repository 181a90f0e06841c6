mod support;

mod absolute_pose_to_zero;
mod connection_drop_and_restore;
mod latched_limit_during_motion;
mod out_of_range_translation;
mod pvt_three_point_trajectory;
mod simulation_mode_isolation;
