//! # Stewart-Platform Device Core
//!
//! Control core for a six-degree-of-freedom Stewart-platform
//! target-positioning device: inverse kinematics, a fault-tolerant proxy
//! supervisor for the motion-controller and encoder-acquisition RPC links,
//! a command-gated safety state machine, the motion command layer, and the
//! attribute/telemetry layer that ties them together.
//!
//! ## Architecture
//!
//! 1. [`kinematics`] — pose ⇄ leg-length inverse kinematics (C1)
//! 2. [`proxy_supervisor`] — background reconnect monitor for the two RPC
//!    proxies (C2)
//! 3. [`safety`] — command gating, latched limit fault, brake policy (C3)
//! 4. [`motion`] / [`pvt`] — pose and single-axis moves, PVT trajectories (C4)
//! 5. [`telemetry`] — periodic hook, encoder refresh, published outputs (C5)
//!
//! [`device::SixDofDevice`] composes all five into the single logical
//! "pose-controlled platform" the surrounding RPC framework dispatches onto.

pub mod device;
pub mod kinematics;
pub mod motion;
pub mod proxy_supervisor;
pub mod pvt;
pub mod safety;
pub mod simulation;
pub mod telemetry;
