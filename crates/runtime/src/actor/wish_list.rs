//! Items a character is already in the middle of acquiring.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wish {
    pub amount: u32,
    pub since: DateTime<Utc>,
}

/// Item code to the amount still being fetched.
///
/// An entry disappears when its amount reaches zero or it outlives the
/// cleanup age.
#[derive(Clone, Debug, Default)]
pub struct WishList {
    entries: BTreeMap<String, Wish>,
}

impl WishList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wish(&mut self, code: &str, amount: u32, now: DateTime<Utc>) {
        if amount == 0 {
            return;
        }
        let entry = self.entries.entry(code.to_owned()).or_insert(Wish {
            amount: 0,
            since: now,
        });
        entry.amount += amount;
        entry.since = now;
    }

    /// Decrements a wish, returning what is still outstanding.
    pub fn fulfil(&mut self, code: &str, amount: u32) -> u32 {
        let Some(entry) = self.entries.get_mut(code) else {
            return 0;
        };
        entry.amount = entry.amount.saturating_sub(amount);
        let left = entry.amount;
        if left == 0 {
            self.entries.remove(code);
        }
        left
    }

    pub fn outstanding(&self, code: &str) -> u32 {
        self.entries.get(code).map_or(0, |wish| wish.amount)
    }

    pub fn cleanup(&mut self, max_age: Duration, now: DateTime<Utc>) -> usize {
        let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
        let before = self.entries.len();
        self.entries.retain(|_, wish| now - wish.since <= max_age);
        before - self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Wish)> {
        self.entries.iter().map(|(code, wish)| (code.as_str(), wish))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fulfilling_to_zero_removes_the_entry() {
        let now = Utc::now();
        let mut wishes = WishList::new();
        wishes.wish("iron_bar", 3, now);
        wishes.wish("iron_bar", 2, now);

        assert_eq!(wishes.outstanding("iron_bar"), 5);
        assert_eq!(wishes.fulfil("iron_bar", 4), 1);
        assert_eq!(wishes.fulfil("iron_bar", 4), 0);
        assert!(wishes.is_empty());
    }

    #[test]
    fn stale_wishes_are_cleaned_up() {
        let now = Utc::now();
        let mut wishes = WishList::new();
        wishes.wish("iron_bar", 3, now - chrono::Duration::hours(2));
        wishes.wish("ash_plank", 1, now);

        assert_eq!(wishes.cleanup(Duration::from_secs(3600), now), 1);
        assert_eq!(wishes.outstanding("iron_bar"), 0);
        assert_eq!(wishes.outstanding("ash_plank"), 1);
    }
}
