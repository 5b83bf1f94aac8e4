//! Periodic expiry of bank reservations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::bank::BankCache;

pub struct ReservationCleanup {
    bank: Arc<BankCache>,
    every: Duration,
}

impl ReservationCleanup {
    pub fn new(bank: Arc<BankCache>, every: Duration) -> Self {
        Self { bank, every }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let expired = self.bank.cleanup_expired();
                    if expired > 0 {
                        debug!(target: "runtime::bank", expired, "expired reservations dropped");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }
}
