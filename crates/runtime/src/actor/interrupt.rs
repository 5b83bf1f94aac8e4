//! Cooperative cancellation for a character's running job.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Advisory interrupt flag.
///
/// Jobs never get torn down mid-call. They observe the token at safe points,
/// after each remote action and while waiting out a cooldown.
#[derive(Debug, Default)]
pub struct InterruptToken {
    flag: AtomicBool,
    notify: Notify,
}

impl InterruptToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Resolves once the token is interrupted.
    pub async fn interrupted(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_interrupted() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn waiters_wake_on_interrupt() {
        let token = Arc::new(InterruptToken::new());
        let waiter = {
            let token = Arc::clone(&token);
            tokio::spawn(async move { token.interrupted().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.interrupt();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter woke")
            .expect("waiter finished");
    }

    #[tokio::test]
    async fn already_interrupted_resolves_immediately() {
        let token = InterruptToken::new();
        token.interrupt();
        token.interrupted().await;
        token.reset();
        assert!(!token.is_interrupted());
    }
}
