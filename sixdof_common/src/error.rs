//! Typed error taxonomy for the Stewart-platform core.
//!
//! Every command-facing failure maps to exactly one [`DeviceError`] variant,
//! each carrying a stable reason code and a human-readable message.
//! Internal best-effort helpers (brake engage/release, single-axis restore)
//! intentionally keep a plain `bool` return convention instead of threading
//! `Result` through them — see `sixdof_device::safety::brake`.

use thiserror::Error;

/// Typed error surfaced across a command boundary.
///
/// The `Display` impl renders the reason code followed by the message, e.g.
/// `"API_OutOfRange: translation x=18 exceeds POS_LIMIT=17"`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeviceError {
    #[error("API_InvalidArgument: {0}")]
    InvalidArgument(String),

    #[error("API_OutOfRange: {0}")]
    OutOfRange(String),

    #[error("API_KinematicsError: {0}")]
    KinematicsError(String),

    #[error("API_ProxyError: {0}")]
    ProxyError(String),

    #[error("API_StateViolation: State violation: {command} blocked: {state}")]
    StateViolation { command: String, state: String },

    #[error("LIMIT_FAULT_LATCHED: {0}")]
    LimitFaultLatched(String),

    #[error("PowerControlError: {0}")]
    PowerControlError(String),

    #[error("InvalidJSON: {0}")]
    InvalidJson(String),
}

impl DeviceError {
    /// The reason code portion of the error, as surfaced in upstream
    /// attribute/alarm text.
    pub const fn reason_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "API_InvalidArgument",
            Self::OutOfRange(_) => "API_OutOfRange",
            Self::KinematicsError(_) => "API_KinematicsError",
            Self::ProxyError(_) => "API_ProxyError",
            Self::StateViolation { .. } => "API_StateViolation",
            Self::LimitFaultLatched(_) => "LIMIT_FAULT_LATCHED",
            Self::PowerControlError(_) => "PowerControlError",
            Self::InvalidJson(_) => "InvalidJSON",
        }
    }
}

/// Error returned by the two downstream RPC capability traits.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProxyError {
    #[error("proxy not connected")]
    NotConnected,

    #[error("rpc call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("rpc call failed: {0}")]
    CallFailed(String),
}

impl From<ProxyError> for DeviceError {
    fn from(e: ProxyError) -> Self {
        DeviceError::ProxyError(e.to_string())
    }
}
