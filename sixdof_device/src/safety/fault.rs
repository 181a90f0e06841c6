//! Latched limit-fault detection.

use sixdof_common::state::LimitState;

/// Scan per-axis `readEL` results for the first triggered limit switch.
///
/// Only the first event matters — [`sixdof_common::state::LatchedFault::latch`]
/// already ignores subsequent calls once latched, but the scan itself also
/// stops at the first hit so axis order (0..6) determines which axis is
/// reported when more than one trips in the same cycle.
pub fn detect_limit_trigger(el_reads: &[i8; 6]) -> Option<(u8, LimitState)> {
    for (axis, &raw) in el_reads.iter().enumerate() {
        let state = LimitState::from_el(raw);
        if state.is_triggered() {
            return Some((axis as u8, state));
        }
    }
    None
}
