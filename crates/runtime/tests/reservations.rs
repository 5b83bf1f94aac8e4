use std::collections::HashMap;

use proptest::prelude::*;
use runtime::BankCache;
use runtime::remote::BankContents;

const STOCK: u32 = 30;
const CHARACTERS: [&str; 3] = ["ada", "bo", "cy"];

#[derive(Clone, Debug)]
enum Op {
    Reserve(usize, u32),
    Release(usize, u32),
    Withdraw(u32),
    Deposit(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..CHARACTERS.len(), 0u32..20).prop_map(|(c, n)| Op::Reserve(c, n)),
        (0..CHARACTERS.len(), 0u32..20).prop_map(|(c, n)| Op::Release(c, n)),
        (0u32..10).prop_map(Op::Withdraw),
        (0u32..10).prop_map(Op::Deposit),
    ]
}

fn bank() -> BankCache {
    let bank = BankCache::default();
    bank.refresh(BankContents {
        items: vec![game_core::ItemStack::new("iron_ore", STOCK)],
        gold: 0,
    });
    bank
}

proptest! {
    #[test]
    fn reservations_never_double_book_stock(ops in prop::collection::vec(op(), 1..40)) {
        let bank = bank();
        let mut held: HashMap<&str, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Reserve(c, amount) => {
                    let name = CHARACTERS[c];
                    let free = bank.available_quantity("iron_ore", name, true);
                    let granted = bank.reserve(name, "iron_ore", amount);
                    prop_assert_eq!(granted, amount.min(free));
                    *held.entry(name).or_default() += granted;
                }
                Op::Release(c, amount) => {
                    let name = CHARACTERS[c];
                    let released = bank.release_reservation(name, "iron_ore", amount);
                    let own = held.entry(name).or_default();
                    prop_assert_eq!(released, amount.min(*own));
                    *own -= released;
                }
                Op::Withdraw(amount) => bank.record_withdraw("iron_ore", amount),
                Op::Deposit(amount) => bank.record_deposit("iron_ore", amount),
            }

            let raw = bank.raw_quantity("iron_ore");
            let total: u32 = held.values().sum();
            for name in CHARACTERS {
                let own = held.get(name).copied().unwrap_or(0);
                let others = total - own;
                prop_assert_eq!(
                    bank.available_quantity("iron_ore", name, false),
                    raw.saturating_sub(others)
                );
                prop_assert_eq!(
                    bank.available_quantity("iron_ore", name, true),
                    raw.saturating_sub(total)
                );
            }
        }
    }

    #[test]
    fn reservations_alone_stay_within_stock(
        ops in prop::collection::vec((0..CHARACTERS.len(), 0u32..25), 1..30)
    ) {
        let bank = bank();
        let mut total = 0;
        for (c, amount) in ops {
            total += bank.reserve(CHARACTERS[c], "iron_ore", amount);
            prop_assert!(total <= STOCK);
        }
        for name in CHARACTERS {
            prop_assert_eq!(bank.available_quantity("iron_ore", name, true), STOCK - total);
        }
    }
}
