//! Host media indexer handshake.
//!
//! The library directory is consumed by an external indexer (the media
//! host). Before asking it to re-scan we wait until it is neither
//! scanning nor cleaning; the wait honors the host's abort signal and
//! treats a timeout as advisory.

use async_trait::async_trait;
use std::time::Duration;

/// Errors from the host index transport.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("host index request failed: {0}")]
    Request(String),

    #[error("host index is unreachable: {0}")]
    Unreachable(String),
}

/// Operations the orchestrator needs from the host's media index.
#[async_trait]
pub trait HostIndex: Send + Sync {
    /// Ask the host to scan the library path for new or changed entries.
    async fn request_scan(&self) -> Result<(), HostError>;

    /// Ask the host to drop index entries whose files no longer exist.
    async fn request_clean(&self) -> Result<(), HostError>;

    async fn is_scanning(&self) -> Result<bool, HostError>;

    async fn is_cleaning(&self) -> Result<bool, HostError>;

    /// True once the host has begun shutting down.
    fn abort_requested(&self) -> bool;
}

/// Outcome of an idle wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleWait {
    Idle,
    Aborted,
    TimedOut,
}

/// Poll the host until it is idle.
///
/// Returns `Idle` when neither a scan nor a clean is running, `Aborted`
/// when the host signals shutdown, and `TimedOut` after `timeout` -
/// callers treat a timeout as a warning, not a failure.
pub async fn wait_for_idle(
    host: &dyn HostIndex,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<IdleWait, HostError> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if host.abort_requested() {
            return Ok(IdleWait::Aborted);
        }
        if !host.is_scanning().await? && !host.is_cleaning().await? {
            return Ok(IdleWait::Idle);
        }
        if tokio::time::Instant::now() >= deadline {
            return Ok(IdleWait::TimedOut);
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Scripted host: pops one busy answer per poll, then stays idle.
    pub struct MockHost {
        busy_script: Mutex<VecDeque<bool>>,
        abort: AtomicBool,
        unreachable: bool,
        pub calls: Mutex<Vec<String>>,
    }

    impl MockHost {
        pub fn idle() -> Self {
            Self::with_busy_script(vec![])
        }

        pub fn with_busy_script(script: Vec<bool>) -> Self {
            Self {
                busy_script: Mutex::new(script.into()),
                abort: AtomicBool::new(false),
                unreachable: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Host whose every request fails in transit.
        pub fn unreachable() -> Self {
            Self {
                unreachable: true,
                ..Self::idle()
            }
        }

        fn transport(&self) -> Result<(), HostError> {
            if self.unreachable {
                Err(HostError::Unreachable("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        pub fn set_abort(&self) {
            self.abort.store(true, Ordering::SeqCst);
        }

        fn log(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    #[async_trait]
    impl HostIndex for MockHost {
        async fn request_scan(&self) -> Result<(), HostError> {
            self.log("scan");
            self.transport()
        }

        async fn request_clean(&self) -> Result<(), HostError> {
            self.log("clean");
            self.transport()
        }

        async fn is_scanning(&self) -> Result<bool, HostError> {
            self.log("is_scanning");
            self.transport()?;
            Ok(self
                .busy_script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(false))
        }

        async fn is_cleaning(&self) -> Result<bool, HostError> {
            self.log("is_cleaning");
            self.transport()?;
            Ok(false)
        }

        fn abort_requested(&self) -> bool {
            self.abort.load(Ordering::SeqCst)
        }
    }
}
