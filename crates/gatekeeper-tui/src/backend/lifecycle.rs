//! Probe-and-spawn handling for the knowledge-base process.
//!
//! The interactive loop never talks to a process manager directly: it goes
//! through [`BackendLauncher`] so the session state machine can be exercised
//! in tests with a stub instead of a real socket or child process.

use std::io;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::user_config::BackendConfig;

/// How long the TCP probe waits before deciding the backend is down.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Availability check plus lifecycle handle for the backend service.
#[allow(async_fn_in_trait)] // not used as dyn, and no Send bound needed
pub trait BackendLauncher {
    /// Whether the backend's port is already accepting connections.
    async fn is_listening(&self) -> bool;

    /// Start the backend as a background process.
    fn spawn(&mut self) -> io::Result<()>;

    /// Terminate a previously spawned backend, if any. Idempotent.
    fn shutdown(&mut self);
}

/// Spawns the backend if its port is not already open. Returns whether a
/// process was started by this call.
pub async fn ensure_running<L: BackendLauncher>(launcher: &mut L) -> bool {
    if launcher.is_listening().await {
        tracing::debug!("knowledge base backend already listening");
        return false;
    }
    match launcher.spawn() {
        Ok(()) => {
            tracing::info!("spawned knowledge base backend");
            true
        }
        Err(e) => {
            // The first call will surface the connection failure in the
            // transcript, so startup continues regardless.
            tracing::warn!("failed to spawn knowledge base backend: {}", e);
            false
        }
    }
}

/// Real launcher: TCP probe plus a spawned child process that is killed on
/// exit.
#[derive(Debug)]
pub struct ProcessLauncher {
    addr: String,
    command: PathBuf,
    args: Vec<String>,
    child: Option<Child>,
}

impl ProcessLauncher {
    pub fn new(config: &BackendConfig) -> Self {
        let (command, args) = config.serve_command();
        Self {
            addr: config.addr(),
            command,
            args,
            child: None,
        }
    }
}

impl BackendLauncher for ProcessLauncher {
    async fn is_listening(&self) -> bool {
        matches!(
            timeout(PROBE_TIMEOUT, TcpStream::connect(self.addr.as_str())).await,
            Ok(Ok(_))
        )
    }

    fn spawn(&mut self) -> io::Result<()> {
        let child = Command::new(&self.command)
            .args(&self.args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        self.child = Some(child);
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                tracing::warn!("failed to kill knowledge base backend: {}", e);
            }
            let _ = child.wait();
        }
    }
}
