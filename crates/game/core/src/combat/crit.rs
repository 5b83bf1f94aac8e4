//! Deterministic critical strikes.

/// Running critical-strike accumulator.
///
/// Starts at `chance + offset` and gains `chance` after every attack. An
/// attack is critical when the accumulator is at or above 100, which then
/// loses 100. The state is explicit so a fight replays identically for the
/// same `(chance, offset)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CritAccumulator {
    chance: i32,
    value: i32,
}

impl CritAccumulator {
    pub fn new(chance: i32, offset: u32) -> Self {
        let chance = chance.max(0);
        Self {
            chance,
            value: chance + offset as i32,
        }
    }

    /// Decides whether the next attack is critical and advances the state.
    pub fn roll(&mut self) -> bool {
        let critical = self.value >= 100;
        if critical {
            self.value -= 100;
        }
        self.value += self.chance;
        critical
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_chance_never_crits() {
        let mut acc = CritAccumulator::new(0, 75);
        assert!((0..50).all(|_| !acc.roll()));
    }

    #[test]
    fn thirty_five_percent_crits_on_a_fixed_schedule() {
        // 35, 70, 105 -> crit, 40, 75, 110 -> crit ...
        let mut acc = CritAccumulator::new(35, 0);
        let rolls: Vec<bool> = (0..6).map(|_| acc.roll()).collect();
        assert_eq!(rolls, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn offset_shifts_the_phase() {
        let mut acc = CritAccumulator::new(35, 75);
        // 110 -> crit
        assert!(acc.roll());
    }
}
