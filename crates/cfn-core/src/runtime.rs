//! Timer and cancellation primitives for the polling loops.
//!
//! Both loops wait through a [`Timer`] rather than sleeping directly, so tests
//! can substitute a virtual clock.

use async_trait::async_trait;
use std::time::Duration;

/// Source of delays for the polling loops
#[async_trait]
pub trait Timer: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock timer backed by the smol reactor
#[cfg(feature = "smol")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SmolTimer;

#[cfg(feature = "smol")]
#[async_trait]
impl Timer for SmolTimer {
    async fn sleep(&self, duration: Duration) {
        smol::Timer::after(duration).await;
    }
}

/// Cooperative cancellation signal.
///
/// Clones share state; cancelling any clone cancels all of them.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    sender: async_channel::Sender<()>,
    receiver: async_channel::Receiver<()>,
}

impl CancellationToken {
    /// Create a token that is not yet cancelled
    pub fn new() -> Self {
        let (sender, receiver) = async_channel::bounded(1);
        Self { sender, receiver }
    }

    /// Cancel the token. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        self.sender.close();
    }

    /// Whether the token has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.receiver.is_closed()
    }

    /// Resolve once the token is cancelled
    pub async fn cancelled(&self) {
        // Nothing is ever sent, so recv only returns once the channel closes
        let _ = self.receiver.recv().await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleep for `duration` unless `token` fires first.
///
/// Returns `true` when the wait ended because of cancellation.
pub async fn sleep_or_cancel<T: Timer + ?Sized>(
    timer: &T,
    duration: Duration,
    token: &CancellationToken,
) -> bool {
    futures_lite::future::or(
        async {
            token.cancelled().await;
            true
        },
        async {
            timer.sleep(duration).await;
            false
        },
    )
    .await
}
