//! Convenient re-exports: `use sixdof_common::prelude::*;`.

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{AXIS_COUNT, MAX_RESTORE_RETRIES, POS_LIMIT, ROT_LIMIT};

// ─── Pose ───────────────────────────────────────────────────────────
pub use crate::pose::{round4, validate_pose, Pose};

// ─── State ──────────────────────────────────────────────────────────
pub use crate::state::{DeviceState, LatchedFault, LimitState};

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::error::{DeviceError, ProxyError};

// ─── Proxies ────────────────────────────────────────────────────────
pub use crate::proxy::{EncoderProxy, MotionProxy};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, PlatformGeometry, SdofConfig, SystemConfig};
