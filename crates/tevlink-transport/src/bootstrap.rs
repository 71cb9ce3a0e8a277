//! Process-wide network bootstrap.
//!
//! Some platforms need one-time global setup before sockets behave the way a
//! long-lived client expects (on Unix, a vanished viewer must surface as an
//! `EPIPE` error instead of a `SIGPIPE` that kills the process). The setup runs
//! when the first session appears and is undone when the last one goes away.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{debug, warn};

use crate::error::Result;

/// One-time platform network setup and teardown.
pub trait NetworkSubsystem: Send + Sync {
    /// Called on the 0 → 1 transition of live sessions.
    fn initialize(&self) -> Result<()>;

    /// Called on the 1 → 0 transition of live sessions.
    fn teardown(&self);
}

/// The real platform subsystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformNetwork;

impl NetworkSubsystem for PlatformNetwork {
    #[cfg(unix)]
    fn initialize(&self) -> Result<()> {
        // SAFETY: installing SIG_IGN for SIGPIPE has no preconditions and does not
        // touch memory owned by Rust.
        let previous = unsafe { libc::signal(libc::SIGPIPE, libc::SIG_IGN) };
        if previous == libc::SIG_ERR {
            return Err(crate::TransportError::Init(format!(
                "signal(SIGPIPE) failed: {}",
                std::io::Error::last_os_error()
            )));
        }
        debug!("SIGPIPE ignored for network sessions");
        Ok(())
    }

    #[cfg(not(unix))]
    fn initialize(&self) -> Result<()> {
        // The standard library performs socket-library startup on first use.
        Ok(())
    }

    fn teardown(&self) {}
}

/// Reference-counted owner of the network subsystem.
///
/// `acquire`/`release` are safe to call from any thread; the counter and the
/// subsystem calls are serialized by one mutex, so concurrent first sessions
/// observe a fully initialized subsystem.
pub struct NetworkBootstrap {
    live: Mutex<usize>,
    subsystem: Box<dyn NetworkSubsystem>,
}

impl NetworkBootstrap {
    /// Create a bootstrap context around `subsystem`. Tests inject their own.
    pub fn new(subsystem: impl NetworkSubsystem + 'static) -> Self {
        Self {
            live: Mutex::new(0),
            subsystem: Box::new(subsystem),
        }
    }

    /// The context shared by every session in this process.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<NetworkBootstrap>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(NetworkBootstrap::new(PlatformNetwork))))
    }

    /// Register a live session.
    ///
    /// Returns `Ok(true)` if this call performed initialization. If initialization
    /// fails the count is left unchanged, so the caller holds nothing to release and a
    /// later call will try again.
    pub fn acquire(&self) -> Result<bool> {
        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        if *live == 0 {
            self.subsystem.initialize()?;
            *live = 1;
            debug!("network subsystem initialized");
            return Ok(true);
        }
        *live += 1;
        Ok(false)
    }

    /// Unregister a live session. Returns `true` if this call performed teardown.
    pub fn release(&self) -> bool {
        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        match *live {
            0 => {
                warn!("network bootstrap released more often than acquired");
                false
            }
            1 => {
                *live = 0;
                self.subsystem.teardown();
                debug!("network subsystem torn down");
                true
            }
            _ => {
                *live -= 1;
                false
            }
        }
    }

    /// Number of sessions currently registered.
    pub fn live_sessions(&self) -> usize {
        *self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire and wrap the registration in a guard that releases on drop.
    pub fn lease(self: &Arc<Self>) -> Result<BootstrapLease> {
        let initialized = self.acquire()?;
        Ok(BootstrapLease {
            bootstrap: Arc::clone(self),
            initialized,
        })
    }
}

impl fmt::Debug for NetworkBootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkBootstrap")
            .field("live", &self.live_sessions())
            .finish()
    }
}

/// A live-session registration. Dropping it releases the registration.
#[derive(Debug)]
pub struct BootstrapLease {
    bootstrap: Arc<NetworkBootstrap>,
    initialized: bool,
}

impl BootstrapLease {
    /// Whether acquiring this lease performed the one-time initialization.
    pub fn initialized(&self) -> bool {
        self.initialized
    }
}

impl Drop for BootstrapLease {
    fn drop(&mut self) {
        self.bootstrap.release();
    }
}
