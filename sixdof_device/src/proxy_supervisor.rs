//! Proxy lifecycle & fault-tolerant reconnection supervisor (C2).
//!
//! One background worker thread (not a pool) pings both downstream proxies
//! on a fixed cadence, drops handles that fail to respond, and rebuilds
//! them after a cooldown. Restore actions (hardware writes) are *never*
//! run from this thread — they run from the request path once
//! `motion_restore_pending` is observed, so that side effects interleave
//! safely with command handling.

use sixdof_common::consts::{
    MAX_RESTORE_RETRIES, MONITOR_CYCLE_MS, PROXY_CONNECT_TIMEOUT_MS, PROXY_PING_TIMEOUT_MS,
};
use sixdof_common::error::ProxyError;
use sixdof_common::proxy::{EncoderProxy, MotionProxy};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{info, warn};

type MotionFactory = dyn Fn() -> Result<Arc<dyn MotionProxy>, ProxyError> + Send + Sync;
type EncoderFactory = dyn Fn() -> Result<Arc<dyn EncoderProxy>, ProxyError> + Send + Sync;

/// Owns the two shared-ownership proxy handles and the connection-state
/// atomics.
pub struct ProxySupervisor {
    motion: Mutex<Option<Arc<dyn MotionProxy>>>,
    encoder: Mutex<Option<Arc<dyn EncoderProxy>>>,

    motion_factory: Box<MotionFactory>,
    encoder_factory: Box<EncoderFactory>,

    last_motion_attempt: Mutex<Option<Instant>>,
    last_encoder_attempt: Mutex<Option<Instant>>,
    reconnect_interval: Duration,

    simulation_mode: bool,

    connection_healthy: AtomicBool,
    motion_restore_pending: AtomicBool,
    restore_retry_count: AtomicU8,

    running: AtomicBool,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ProxySupervisor {
    /// Construct the supervisor. `initial_motion`/`initial_encoder` seed
    /// already-connected handles (or `None` to start disconnected and let
    /// the monitor build them on its first tick).
    pub fn new(
        motion_factory: Box<MotionFactory>,
        encoder_factory: Box<EncoderFactory>,
        initial_motion: Option<Arc<dyn MotionProxy>>,
        initial_encoder: Option<Arc<dyn EncoderProxy>>,
        simulation_mode: bool,
        reconnect_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            motion: Mutex::new(initial_motion),
            encoder: Mutex::new(initial_encoder),
            motion_factory,
            encoder_factory,
            last_motion_attempt: Mutex::new(None),
            last_encoder_attempt: Mutex::new(None),
            reconnect_interval,
            simulation_mode,
            connection_healthy: AtomicBool::new(simulation_mode),
            motion_restore_pending: AtomicBool::new(false),
            restore_retry_count: AtomicU8::new(0),
            running: AtomicBool::new(false),
            worker: Mutex::new(None),
        })
    }

    /// Start the background monitor thread. No-op in simulation mode — the
    /// monitor thread is only created once for a real deployment.
    pub fn start(self: &Arc<Self>) {
        if self.simulation_mode {
            return;
        }
        if self.running.swap(true, Ordering::SeqCst) {
            return; // already running
        }
        let me = Arc::clone(self);
        let handle = std::thread::spawn(move || {
            while me.running.load(Ordering::SeqCst) {
                me.tick();
                std::thread::sleep(Duration::from_millis(MONITOR_CYCLE_MS));
            }
        });
        *self.worker.lock().unwrap() = Some(handle);
    }

    /// Stop and join the monitor thread.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    /// Acquire a shared-ownership reference to the motion proxy: lock,
    /// clone, unlock.
    pub fn motion(&self) -> Option<Arc<dyn MotionProxy>> {
        self.motion.lock().unwrap().clone()
    }

    /// Acquire a shared-ownership reference to the encoder proxy.
    pub fn encoder(&self) -> Option<Arc<dyn EncoderProxy>> {
        self.encoder.lock().unwrap().clone()
    }

    pub fn connection_healthy(&self) -> bool {
        self.connection_healthy.load(Ordering::Relaxed)
    }

    pub fn motion_restore_pending(&self) -> bool {
        self.motion_restore_pending.load(Ordering::Relaxed)
    }

    pub fn restore_retry_count(&self) -> u8 {
        self.restore_retry_count.load(Ordering::Relaxed)
    }

    /// Record a successful restore: clears the pending flag, resets the
    /// retry counter, and flips health true.
    pub fn record_restore_success(&self) {
        self.motion_restore_pending.store(false, Ordering::Relaxed);
        self.restore_retry_count.store(0, Ordering::Relaxed);
        self.connection_healthy.store(true, Ordering::Relaxed);
        info!("post-reconnect restore succeeded");
    }

    /// Record a restore attempt failure. Returns `true` if the retry budget
    /// is now exhausted — the caller must clear the pending flag and log.
    pub fn record_restore_failure(&self) -> bool {
        let attempts = self.restore_retry_count.fetch_add(1, Ordering::Relaxed) + 1;
        if attempts >= MAX_RESTORE_RETRIES {
            self.motion_restore_pending.store(false, Ordering::Relaxed);
            warn!(attempts, "restore retry budget exhausted, giving up");
            true
        } else {
            warn!(attempts, "restore attempt failed, will retry");
            false
        }
    }

    /// One monitor iteration. Exposed directly so tests can drive it
    /// without spawning a real thread or sleeping.
    pub fn tick(&self) {
        if self.simulation_mode {
            self.connection_healthy.store(true, Ordering::Relaxed);
            return;
        }

        let motion_ok = self.ping_motion();
        let encoder_ok = self.ping_encoder();

        self.maybe_reconnect_motion(motion_ok);
        self.maybe_reconnect_encoder(encoder_ok);

        let should_be_healthy =
            motion_ok && encoder_ok && !self.motion_restore_pending.load(Ordering::Relaxed);
        self.connection_healthy.store(should_be_healthy, Ordering::Relaxed);
    }

    fn ping_motion(&self) -> bool {
        let handle = self.motion();
        let Some(handle) = handle else { return false };
        match handle.ping(Duration::from_millis(PROXY_PING_TIMEOUT_MS)) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "motion proxy ping failed, dropping handle");
                *self.motion.lock().unwrap() = None;
                false
            }
        }
    }

    fn ping_encoder(&self) -> bool {
        let handle = self.encoder();
        let Some(handle) = handle else { return false };
        match handle.ping(Duration::from_millis(PROXY_PING_TIMEOUT_MS)) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "encoder proxy ping failed, dropping handle");
                *self.encoder.lock().unwrap() = None;
                false
            }
        }
    }

    fn cooldown_elapsed(&self, last_attempt: &Mutex<Option<Instant>>) -> bool {
        match *last_attempt.lock().unwrap() {
            None => true,
            Some(t) => t.elapsed() >= self.reconnect_interval,
        }
    }

    fn maybe_reconnect_motion(&self, motion_ok: bool) {
        if motion_ok || !self.cooldown_elapsed(&self.last_motion_attempt) {
            return;
        }
        *self.last_motion_attempt.lock().unwrap() = Some(Instant::now());
        match (self.motion_factory)() {
            Ok(handle) => match handle.ping(Duration::from_millis(PROXY_CONNECT_TIMEOUT_MS)) {
                Ok(()) => {
                    *self.motion.lock().unwrap() = Some(handle);
                    self.motion_restore_pending.store(true, Ordering::Relaxed);
                    info!("motion proxy rebuilt, restore pending");
                }
                Err(e) => warn!(error = %e, "motion proxy rebuild failed initial ping"),
            },
            Err(e) => warn!(error = %e, "motion proxy rebuild failed"),
        }
    }

    fn maybe_reconnect_encoder(&self, encoder_ok: bool) {
        if encoder_ok || !self.cooldown_elapsed(&self.last_encoder_attempt) {
            return;
        }
        *self.last_encoder_attempt.lock().unwrap() = Some(Instant::now());
        match (self.encoder_factory)() {
            Ok(handle) => match handle.ping(Duration::from_millis(PROXY_CONNECT_TIMEOUT_MS)) {
                Ok(()) => {
                    *self.encoder.lock().unwrap() = Some(handle);
                    info!("encoder proxy rebuilt");
                }
                Err(e) => warn!(error = %e, "encoder proxy rebuild failed initial ping"),
            },
            Err(e) => warn!(error = %e, "encoder proxy rebuild failed"),
        }
    }
}
