//! Shared bank cache with its reservation ledger.
//!
//! The cache mirrors the remote bank and is shared by every character. It is
//! not a hard lock on stock: before planning a withdrawal a character reserves
//! the amount against its own name, and availability queries subtract what
//! other characters have reserved. A withdrawal can still race and fail
//! remotely; callers re-plan when it does.
mod ledger;

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use game_core::ItemStack;

pub use ledger::{Reservation, ReservationLedger};

use crate::remote::BankContents;

struct BankInner {
    items: BTreeMap<String, u32>,
    gold: u32,
    ledger: ReservationLedger,
}

pub struct BankCache {
    inner: Mutex<BankInner>,
}

impl BankCache {
    pub fn new(ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            inner: Mutex::new(BankInner {
                items: BTreeMap::new(),
                gold: 0,
                ledger: ReservationLedger::new(ttl),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BankInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the raw contents with a fresh remote snapshot. Reservations
    /// are kept.
    pub fn refresh(&self, contents: BankContents) {
        let mut inner = self.lock();
        inner.items = contents
            .items
            .into_iter()
            .filter(|stack| stack.quantity > 0)
            .map(|stack| (stack.code, stack.quantity))
            .collect();
        inner.gold = contents.gold;
        tracing::debug!(
            target: "runtime::bank",
            items = inner.items.len(),
            gold = inner.gold,
            "bank refreshed"
        );
    }

    pub fn gold(&self) -> u32 {
        self.lock().gold
    }

    pub fn raw_quantity(&self, code: &str) -> u32 {
        self.lock().items.get(code).copied().unwrap_or(0)
    }

    pub fn available_quantity(&self, code: &str, character: &str, hide_own: bool) -> u32 {
        self.available_quantity_at(code, character, hide_own, Utc::now())
    }

    /// Raw stock minus other characters' unexpired reservations, and minus
    /// the character's own when `hide_own` is set.
    pub fn available_quantity_at(
        &self,
        code: &str,
        character: &str,
        hide_own: bool,
        now: DateTime<Utc>,
    ) -> u32 {
        let inner = self.lock();
        Self::available_in(&inner, code, character, hide_own, now)
    }

    fn available_in(
        inner: &BankInner,
        code: &str,
        character: &str,
        hide_own: bool,
        now: DateTime<Utc>,
    ) -> u32 {
        let raw = inner.items.get(code).copied().unwrap_or(0);
        let mut reserved = inner.ledger.reserved_by_others(code, character, now);
        if hide_own {
            reserved += inner.ledger.reserved_by(code, character, now);
        }
        raw.saturating_sub(reserved)
    }

    pub fn available_items(&self, character: &str, hide_own: bool) -> Vec<ItemStack> {
        self.available_items_at(character, hide_own, Utc::now())
    }

    pub fn available_items_at(
        &self,
        character: &str,
        hide_own: bool,
        now: DateTime<Utc>,
    ) -> Vec<ItemStack> {
        let inner = self.lock();
        inner
            .items
            .keys()
            .filter_map(|code| {
                let quantity = Self::available_in(&inner, code, character, hide_own, now);
                (quantity > 0).then(|| ItemStack::new(code.clone(), quantity))
            })
            .collect()
    }

    pub fn reserve(&self, character: &str, code: &str, amount: u32) -> u32 {
        self.reserve_at(character, code, amount, Utc::now())
    }

    /// Reserves up to `amount` of what is still free for `character`.
    /// Returns the amount actually reserved.
    pub fn reserve_at(&self, character: &str, code: &str, amount: u32, now: DateTime<Utc>) -> u32 {
        let mut inner = self.lock();
        let free = Self::available_in(&inner, code, character, true, now);
        let granted = amount.min(free);
        inner.ledger.reserve(character, code, granted, now);
        if granted < amount {
            tracing::debug!(
                target: "runtime::bank",
                character,
                code,
                requested = amount,
                granted,
                "reservation clamped to free stock"
            );
        }
        granted
    }

    pub fn release_reservation(&self, character: &str, code: &str, amount: u32) -> u32 {
        self.lock().ledger.release(character, code, amount)
    }

    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(Utc::now())
    }

    pub fn cleanup_expired_at(&self, now: DateTime<Utc>) -> usize {
        let removed = self.lock().ledger.cleanup(now);
        if removed > 0 {
            tracing::debug!(target: "runtime::bank", removed, "expired reservations dropped");
        }
        removed
    }

    pub fn record_deposit(&self, code: &str, quantity: u32) {
        *self.lock().items.entry(code.to_owned()).or_default() += quantity;
    }

    pub fn record_withdraw(&self, code: &str, quantity: u32) {
        let mut inner = self.lock();
        if let Some(held) = inner.items.get_mut(code) {
            *held = held.saturating_sub(quantity);
            if *held == 0 {
                inner.items.remove(code);
            }
        }
    }

    pub fn record_gold(&self, gold: u32) {
        self.lock().gold = gold;
    }
}

impl Default for BankCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(items: &[(&str, u32)]) -> BankCache {
        let bank = BankCache::default();
        bank.refresh(BankContents {
            items: items
                .iter()
                .map(|(code, quantity)| ItemStack::new(*code, *quantity))
                .collect(),
            gold: 0,
        });
        bank
    }

    #[test]
    fn others_reservations_reduce_availability() {
        let bank = bank(&[("iron_ore", 20)]);
        assert_eq!(bank.reserve("bob", "iron_ore", 15), 15);

        assert_eq!(bank.available_quantity("iron_ore", "ada", false), 5);
        assert_eq!(bank.available_quantity("iron_ore", "bob", false), 20);
        assert_eq!(bank.available_quantity("iron_ore", "bob", true), 5);
    }

    #[test]
    fn reservations_are_clamped_to_free_stock() {
        let bank = bank(&[("iron_ore", 20)]);
        assert_eq!(bank.reserve("bob", "iron_ore", 15), 15);
        assert_eq!(bank.reserve("ada", "iron_ore", 15), 5);
        assert_eq!(bank.reserve("ada", "copper_ore", 1), 0);
    }

    #[test]
    fn expired_reservations_stop_counting() {
        let bank = BankCache::new(Duration::from_secs(60));
        bank.record_deposit("iron_ore", 10);
        let then = Utc::now();
        bank.reserve_at("bob", "iron_ore", 10, then);

        assert_eq!(bank.available_quantity_at("iron_ore", "ada", false, then), 0);
        let later = then + chrono::Duration::seconds(61);
        assert_eq!(bank.available_quantity_at("iron_ore", "ada", false, later), 10);
        assert_eq!(bank.cleanup_expired_at(later), 1);
    }

    #[test]
    fn available_items_hide_fully_reserved_stock() {
        let bank = bank(&[("iron_ore", 5), ("ash_wood", 3)]);
        bank.reserve("bob", "iron_ore", 5);

        let items = bank.available_items("ada", false);
        assert_eq!(items, vec![ItemStack::new("ash_wood", 3)]);
    }

    #[test]
    fn withdrawals_and_deposits_update_raw_stock() {
        let bank = bank(&[("iron_ore", 5)]);
        bank.record_withdraw("iron_ore", 5);
        bank.record_deposit("iron_bar", 2);

        assert_eq!(bank.raw_quantity("iron_ore"), 0);
        assert_eq!(bank.raw_quantity("iron_bar"), 2);
    }
}
