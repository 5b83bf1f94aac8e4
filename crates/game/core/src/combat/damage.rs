//! Damage calculation.

use crate::state::Element;

use super::fighter::Fighter;

/// Damage of one element for one attack.
///
/// # Formula
///
/// ```text
/// boosted   = round(base + base * boost / 100)
/// striked   = boosted * 1.5            (critical strike only)
/// final     = round(striked / (1 + resistance / 100))
/// ```
///
/// `boost` is the attacker's elemental boost plus its global damage bonus.
pub fn elemental_damage(base: i32, boost: i32, resistance: i32, critical: bool) -> i32 {
    if base <= 0 {
        return 0;
    }
    let base = base as f64;
    let boosted = (base + base * boost as f64 / 100.0).round();
    let striked = if critical { boosted * 1.5 } else { boosted };
    // Resistance of -100 or lower would divide by zero or flip the sign.
    let divisor = (1.0 + resistance as f64 / 100.0).max(0.01);
    (striked / divisor).round().max(0.0) as i32
}

/// Total damage `attacker` deals to `defender` in one attack.
pub fn turn_damage(attacker: &Fighter, defender: &Fighter, critical: bool) -> i32 {
    Element::all()
        .map(|element| {
            elemental_damage(
                attacker.attack.get(element),
                attacker.boost.get(element) + attacker.dmg,
                defender.resistance.get(element),
                critical,
            )
        })
        .sum()
}
