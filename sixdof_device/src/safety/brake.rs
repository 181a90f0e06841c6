//! Automatic brake-engagement policy.
//!
//! Brake operations are best-effort: they return `bool`, not `Result` —
//! the command-facing typed-error convention is reserved for the public
//! command API.

use sixdof_common::consts::PORT_ABSENT;
use sixdof_common::proxy::MotionProxy;
use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether the brake is currently believed engaged and drives the
/// `writeIO` calls that physically engage/release it.
///
/// The physical convention is active-low: the device always writes
/// the *logical* value (1 = released/powered, 0 = engaged/no power); the
/// inversion to hardware LOW happens in the motion-controller layer, not
/// here.
pub struct BrakeController {
    engaged: AtomicBool,
}

impl Default for BrakeController {
    /// The brake starts engaged: it is released only by explicit command,
    /// implicitly at the first motion command, or after a successful
    /// restore.
    fn default() -> Self {
        Self { engaged: AtomicBool::new(true) }
    }
}

impl BrakeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::Relaxed)
    }

    /// Engage the brake. No-op (returns `true`) if no brake port is
    /// configured.
    pub fn engage(&self, motion: &dyn MotionProxy, brake_port: i32) -> bool {
        if brake_port == PORT_ABSENT {
            self.engaged.store(true, Ordering::Relaxed);
            return true;
        }
        match motion.write_io(brake_port, 0) {
            Ok(()) => {
                self.engaged.store(true, Ordering::Relaxed);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "brake engage writeIO failed");
                false
            }
        }
    }

    /// Release the brake (idempotent). No-op (returns `true`) if no brake
    /// port is configured.
    pub fn release(&self, motion: &dyn MotionProxy, brake_port: i32) -> bool {
        if brake_port == PORT_ABSENT {
            self.engaged.store(false, Ordering::Relaxed);
            return true;
        }
        match motion.write_io(brake_port, 1) {
            Ok(()) => {
                self.engaged.store(false, Ordering::Relaxed);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "brake release writeIO failed");
                false
            }
        }
    }
}
