/// Tunable constants for the combat simulator and its safety gates.
///
/// The agreement threshold and the safety margins were tuned empirically
/// against live fights; they are parameters, not protocol invariants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatTuning {
    /// Starting phases of the critical-strike accumulator, one pass each.
    pub crit_offsets: Vec<u32>,
    /// Share of passes (percent) that must agree on win and verdict.
    pub agreement_percent: u32,
    /// Minimum remaining player HP, as percent of max HP, to recommend a fight.
    pub min_hp_percent: u32,
    /// Maximum utility items a fight may consume and still be recommended.
    pub max_potions: u32,
    /// Fights longer than this are lost by the player.
    pub max_turns: u32,
    /// HP of a level-0 character before equipment.
    pub base_hp: i32,
    /// HP gained per character level.
    pub hp_per_level: i32,
    /// Utility items restore HP once the holder drops to this percent or below.
    pub utility_hp_percent: u32,
    /// Healing effects fire on every n-th turn of their holder.
    pub healing_period: u32,
}

impl CombatTuning {
    pub const DEFAULT_CRIT_OFFSETS: [u32; 4] = [0, 25, 50, 75];
    pub const DEFAULT_AGREEMENT_PERCENT: u32 = 85;
    pub const DEFAULT_MIN_HP_PERCENT: u32 = 35;
    pub const DEFAULT_MAX_POTIONS: u32 = 10;
    pub const DEFAULT_MAX_TURNS: u32 = 100;
    pub const DEFAULT_BASE_HP: i32 = 115;
    pub const DEFAULT_HP_PER_LEVEL: i32 = 5;
    pub const DEFAULT_UTILITY_HP_PERCENT: u32 = 50;
    pub const DEFAULT_HEALING_PERIOD: u32 = 3;

    pub fn new() -> Self {
        Self {
            crit_offsets: Self::DEFAULT_CRIT_OFFSETS.to_vec(),
            agreement_percent: Self::DEFAULT_AGREEMENT_PERCENT,
            min_hp_percent: Self::DEFAULT_MIN_HP_PERCENT,
            max_potions: Self::DEFAULT_MAX_POTIONS,
            max_turns: Self::DEFAULT_MAX_TURNS,
            base_hp: Self::DEFAULT_BASE_HP,
            hp_per_level: Self::DEFAULT_HP_PER_LEVEL,
            utility_hp_percent: Self::DEFAULT_UTILITY_HP_PERCENT,
            healing_period: Self::DEFAULT_HEALING_PERIOD,
        }
    }

    /// Max HP of a character of `level` before equipment bonuses.
    pub fn character_base_hp(&self, level: u32) -> i32 {
        self.base_hp + self.hp_per_level * level as i32
    }

    /// Number of passes that must agree for an aggregated verdict.
    ///
    /// Rounded up, so 85% of 4 passes requires all 4.
    pub fn required_agreement(&self) -> usize {
        let passes = self.crit_offsets.len().max(1) as u32;
        (passes * self.agreement_percent).div_ceil(100) as usize
    }
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self::new()
    }
}
