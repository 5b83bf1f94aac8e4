//! Strict-downgrade pruning.

use std::collections::BTreeSet;

use crate::state::{EffectKind, ItemDefinition};

/// Combat effect kinds carried by either item.
fn relevant_kinds(a: &ItemDefinition, b: &ItemDefinition) -> BTreeSet<EffectKind> {
    a.effects
        .iter()
        .chain(&b.effects)
        .map(|effect| effect.kind)
        .filter(EffectKind::affects_combat)
        .collect()
}

/// `better` is never worse than `worse` on any combat stat and strictly
/// better on at least one.
pub fn dominates(better: &ItemDefinition, worse: &ItemDefinition) -> bool {
    let mut strictly = false;
    for kind in relevant_kinds(better, worse) {
        let (b, w) = (better.effect(kind), worse.effect(kind));
        if b < w {
            return false;
        }
        strictly |= b > w;
    }
    strictly
}

/// Drops every item that another item of the same slot kind dominates.
///
/// Input order is preserved among the survivors.
pub fn prune_downgrades<'a>(items: &[&'a ItemDefinition]) -> Vec<&'a ItemDefinition> {
    items
        .iter()
        .filter(|item| !items.iter().any(|other| dominates(other, item)))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ItemKind;

    fn helmet(code: &str, hp: i32, res_fire: i32) -> ItemDefinition {
        ItemDefinition::new(code, 1, ItemKind::Helmet)
            .with_effect(EffectKind::Hp, hp)
            .with_effect(EffectKind::ResFire, res_fire)
    }

    #[test]
    fn strictly_worse_item_is_dropped() {
        let good = helmet("iron_helm", 20, 5);
        let bad = helmet("copper_helm", 10, 5);
        let kept = prune_downgrades(&[&bad, &good]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].code, "iron_helm");
    }

    #[test]
    fn tradeoffs_survive() {
        let tank = helmet("tank_helm", 30, 0);
        let warded = helmet("warded_helm", 10, 15);
        assert_eq!(prune_downgrades(&[&tank, &warded]).len(), 2);
    }

    #[test]
    fn equal_items_do_not_prune_each_other() {
        let a = helmet("a", 10, 5);
        let b = helmet("b", 10, 5);
        assert!(!dominates(&a, &b));
        assert_eq!(prune_downgrades(&[&a, &b]).len(), 2);
    }

    #[test]
    fn elements_are_compared_separately() {
        let air = ItemDefinition::new("air_dagger", 1, ItemKind::Weapon)
            .with_effect(EffectKind::AttackAir, 10);
        let earth = ItemDefinition::new("earth_dagger", 1, ItemKind::Weapon)
            .with_effect(EffectKind::AttackEarth, 10);
        assert!(!dominates(&air, &earth));
        assert!(!dominates(&earth, &air));
    }

    #[test]
    fn gathering_effects_are_ignored() {
        let plain = ItemDefinition::new("sword", 1, ItemKind::Weapon)
            .with_effect(EffectKind::AttackFire, 12);
        let tool = ItemDefinition::new("pickaxe", 1, ItemKind::Weapon)
            .with_effect(EffectKind::AttackFire, 5)
            .with_effect(EffectKind::Mining, -10);
        assert!(dominates(&plain, &tool));
    }
}
