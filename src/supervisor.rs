//! Controller process supervision
//!
//! Guarantees exactly one reachable controller process (fcserver) per
//! machine before any streaming begins.
//!
//! # State machine
//!
//! ```text
//! Stopped ──(probe: refused)──> Starting ──(spawn ok)──> Running(owned)
//! Stopped ──(probe: anything else)──────────────────────> Running(borrowed)
//! Running(owned) ──(stop)──> Stopped
//! ```
//!
//! The liveness probe is a bounded-time TCP connect to the controller port
//! with no data exchanged. Only an active refusal proves nothing is
//! listening; every other outcome (success, timeout, filtered port) is
//! treated conservatively as "another instance already owns the port" so
//! two sessions racing through the probe cannot both launch. The
//! probe-then-launch sequence itself is not atomic across processes; the
//! remaining race window is a known limitation, accepted rather than closed
//! with cross-process locking.
//!
//! A supervisor that launched the process owns it: `stop()` (also invoked
//! from `Drop`, so every exit path reaches it) terminates the child. A
//! supervisor that merely found the port occupied never touches the
//! pre-existing process.

use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::Duration;

/// Default TCP port the controller listens on
pub const DEFAULT_PORT: u16 = 7890;

/// Bounded probe time so a filtered port cannot hang startup
const PROBE_TIMEOUT: Duration = Duration::from_millis(250);

/// Controller binary name for the current platform (three known builds)
pub fn platform_binary() -> &'static str {
    if cfg!(target_os = "windows") {
        "fcserver.exe"
    } else if cfg!(target_os = "macos") {
        "fcserver-osx"
    } else {
        "fcserver-rpi"
    }
}

/// Supervisor lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// No controller is being supervised
    Stopped,
    /// Launch in progress
    Starting,
    /// A controller is reachable; `owned` is true if this supervisor
    /// launched it
    Running {
        /// Whether this supervisor spawned (and must terminate) the process
        owned: bool,
    },
}

enum ProbeOutcome {
    /// Connection actively refused: no listener on the port
    Refused,
    /// Connection succeeded: a controller is already listening
    Listening,
    /// Probe failed for some other reason (timeout, filtered, ...)
    Ambiguous(std::io::Error),
}

/// Ensures a single controller process is alive on the configured port
pub struct ControllerSupervisor {
    port: u16,
    bin_dir: PathBuf,
    state: SupervisorState,
    child: Option<Child>,
}

impl ControllerSupervisor {
    /// Create a supervisor for a controller expected on `127.0.0.1:port`,
    /// launching binaries from `bin_dir` when needed.
    pub fn new<P: AsRef<Path>>(bin_dir: P, port: u16) -> Self {
        ControllerSupervisor {
            port,
            bin_dir: bin_dir.as_ref().to_path_buf(),
            state: SupervisorState::Stopped,
            child: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Pid of the owned controller process; `None` when nothing was
    /// launched by this supervisor
    pub fn child_id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Ensure a controller is running. No-op when already `Running`.
    ///
    /// Probes the port first; launches the platform binary only on an
    /// active refusal. Launch failure (missing binary, spawn error) is
    /// fatal and surfaced immediately.
    pub fn start(&mut self) -> Result<()> {
        if matches!(self.state, SupervisorState::Running { .. }) {
            return Ok(());
        }

        match self.probe() {
            ProbeOutcome::Refused => self.launch(),
            ProbeOutcome::Listening => {
                info!(
                    "Another controller instance is already listening on 127.0.0.1:{}",
                    self.port
                );
                self.state = SupervisorState::Running { owned: false };
                Ok(())
            }
            ProbeOutcome::Ambiguous(e) => {
                // Anything short of an active refusal could be a live
                // instance behind a slow or filtered port. Assume it is,
                // rather than risk a double launch.
                warn!(
                    "Liveness probe of 127.0.0.1:{} inconclusive ({}); assuming a controller is running",
                    self.port, e
                );
                self.state = SupervisorState::Running { owned: false };
                Ok(())
            }
        }
    }

    /// Terminate the controller if this supervisor launched it.
    ///
    /// Never touches a borrowed (pre-existing) process. Safe to call in
    /// any state.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let pid = child.id();
            if let Err(e) = child.kill() {
                // Already exited on its own
                debug!("Controller (pid {}) was not running at stop: {}", pid, e);
            }
            if let Err(e) = child.wait() {
                warn!("Failed to reap controller (pid {}): {}", pid, e);
            }
            info!("Stopped controller (pid {})", pid);
        }
        self.state = SupervisorState::Stopped;
    }

    fn probe(&self) -> ProbeOutcome {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, self.port));
        match TcpStream::connect_timeout(&addr, PROBE_TIMEOUT) {
            Ok(_) => ProbeOutcome::Listening,
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => ProbeOutcome::Refused,
            Err(e) => ProbeOutcome::Ambiguous(e),
        }
    }

    fn launch(&mut self) -> Result<()> {
        self.state = SupervisorState::Starting;
        let binary = self.bin_dir.join(platform_binary());

        let child = Command::new(&binary).spawn().map_err(|e| {
            self.state = SupervisorState::Stopped;
            Error::ProcessLaunch {
                binary: binary.display().to_string(),
                source: e,
            }
        })?;

        info!("Started {} (pid {})", binary.display(), child.id());
        self.child = Some(child);
        self.state = SupervisorState::Running { owned: true };
        Ok(())
    }
}

impl Drop for ControllerSupervisor {
    fn drop(&mut self) {
        // Termination guarantee for owned processes on every exit path
        // that unwinds or returns through main.
        self.stop();
    }
}
