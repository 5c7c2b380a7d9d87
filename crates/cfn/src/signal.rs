//! SIGINT/SIGTERM to [`CancellationToken`] bridge

use anyhow::Result;
use cfn_core::CancellationToken;

/// Keeps the signal listener alive; dropping it unregisters the handlers
pub struct SignalGuard {
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
}

/// Cancel `token` on SIGINT or SIGTERM instead of terminating the process
#[cfg(unix)]
pub fn cancel_on_signal(token: CancellationToken) -> Result<SignalGuard> {
    use anyhow::Context;
    use signal_hook::{
        consts::{SIGINT, SIGTERM},
        iterator::Signals,
    };
    use std::thread;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handler")?;
    let handle = signals.handle();

    thread::spawn(move || {
        for sig in signals.forever() {
            tracing::debug!("Received signal {}", sig);
            token.cancel();
        }
    });

    Ok(SignalGuard { handle })
}

/// Signals keep their default behavior on this platform
#[cfg(not(unix))]
pub fn cancel_on_signal(_token: CancellationToken) -> Result<SignalGuard> {
    Ok(SignalGuard {})
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
    }
}
