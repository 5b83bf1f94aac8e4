//! Soft reservations against shared bank stock.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub character: String,
    pub amount: u32,
    pub reserved_at: DateTime<Utc>,
}

/// Item code to outstanding claims.
///
/// Claims are advisory. They expire `ttl` after they were made whether or not
/// anyone released them.
#[derive(Debug, Clone)]
pub struct ReservationLedger {
    entries: HashMap<String, Vec<Reservation>>,
    ttl: Duration,
}

impl ReservationLedger {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    fn is_live(&self, reservation: &Reservation, now: DateTime<Utc>) -> bool {
        reservation.amount > 0 && now - reservation.reserved_at < self.ttl
    }

    pub fn reserve(&mut self, character: &str, code: &str, amount: u32, now: DateTime<Utc>) {
        if amount == 0 {
            return;
        }
        self.entries
            .entry(code.to_owned())
            .or_default()
            .push(Reservation {
                character: character.to_owned(),
                amount,
                reserved_at: now,
            });
    }

    /// Releases up to `amount` of `character`'s claims on `code`, newest
    /// first. Returns how much was released.
    pub fn release(&mut self, character: &str, code: &str, amount: u32) -> u32 {
        let Some(reservations) = self.entries.get_mut(code) else {
            return 0;
        };
        let mut left = amount;
        for reservation in reservations
            .iter_mut()
            .rev()
            .filter(|r| r.character == character)
        {
            if left == 0 {
                break;
            }
            let taken = reservation.amount.min(left);
            reservation.amount -= taken;
            left -= taken;
        }
        reservations.retain(|r| r.amount > 0);
        if reservations.is_empty() {
            self.entries.remove(code);
        }
        amount - left
    }

    /// Unexpired amount of `code` reserved by characters other than `character`.
    pub fn reserved_by_others(&self, code: &str, character: &str, now: DateTime<Utc>) -> u32 {
        self.sum(code, now, |r| r.character != character)
    }

    pub fn reserved_by(&self, code: &str, character: &str, now: DateTime<Utc>) -> u32 {
        self.sum(code, now, |r| r.character == character)
    }

    fn sum(&self, code: &str, now: DateTime<Utc>, keep: impl Fn(&Reservation) -> bool) -> u32 {
        self.entries
            .get(code)
            .map(|reservations| {
                reservations
                    .iter()
                    .filter(|r| self.is_live(r, now) && keep(r))
                    .map(|r| r.amount)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Drops expired claims. Returns how many were dropped.
    pub fn cleanup(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let mut removed = 0;
        self.entries.retain(|_, reservations| {
            let before = reservations.len();
            reservations.retain(|r| r.amount > 0 && now - r.reserved_at < ttl);
            removed += before - reservations.len();
            !reservations.is_empty()
        });
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
