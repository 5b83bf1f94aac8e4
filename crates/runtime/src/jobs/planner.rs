//! Acquisition planning.
//!
//! [`Planner`] expands "have N of X" into primitive steps against a
//! simulated inventory. Sources are tried in a fixed order:
//!
//! 1. units already held (when `use_inventory`)
//! 2. unreserved bank stock (when `use_bank`)
//! 3. the item's recipe, recursing per ingredient
//! 4. the most productive resource the character can gather
//! 5. the lowest level monster dropping it
//! 6. the cheapest NPC selling it
//!
//! A recipe becomes one craft step after all of its ingredient steps. Raw
//! ingredients that do not fit in the free space are collected in chunks,
//! each full chunk stashed in the bank under a reservation; the craft job
//! withdraws them again round by round. The first error aborts the whole
//! plan; callers never see a partial one.
use std::collections::BTreeMap;

use game_core::{Character, GameData, ItemStack, Recipe};

use super::error::{JobError, JobResult};
use super::job::{Job, JobId};
use super::kinds::{Craft, Fight, Gather, NpcBuy, stash_job, withdraw_job};

/// Recipe chains deeper than this are treated as cyclic.
pub const MAX_PLAN_DEPTH: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanOptions {
    /// Count units already in the inventory toward the goal.
    pub use_inventory: bool,
    /// Withdraw unreserved bank stock before producing anything.
    pub use_bank: bool,
    /// Emit craft steps. Off, the plan only gathers raw materials.
    pub craft: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            use_inventory: true,
            use_bank: true,
            craft: true,
        }
    }
}

impl PlanOptions {
    /// Raw materials only, from scratch.
    pub fn materials_only() -> Self {
        Self {
            use_inventory: true,
            use_bank: false,
            craft: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanStep {
    Withdraw { code: String, quantity: u32 },
    /// Deposits a collected chunk and reserves it for the later craft.
    Stash { code: String, quantity: u32 },
    Gather { resource: String, code: String, quantity: u32 },
    Fight { monster: String, code: String, quantity: u32 },
    Buy { npc: String, code: String, quantity: u32 },
    /// `quantity` is the number of crafts, not of produced units.
    Craft { code: String, quantity: u32 },
}

impl PlanStep {
    /// Materializes the step as a job owned by `parent`.
    pub fn into_job(self, parent: JobId) -> Job {
        match self {
            Self::Withdraw { code, quantity } => withdraw_job(&code, quantity, parent),
            Self::Stash { code, quantity } => stash_job(&code, quantity, parent),
            Self::Gather {
                resource,
                code,
                quantity,
            } => Job::new(Gather::new(resource, code, quantity)).with_parent(parent),
            Self::Fight {
                monster,
                code,
                quantity,
            } => Job::new(Fight::until_collected(monster, code, quantity)).with_parent(parent),
            Self::Buy { npc, code, quantity } => {
                Job::new(NpcBuy::new(npc, code, quantity)).with_parent(parent)
            }
            Self::Craft { code, quantity } => {
                Job::new(Craft::new(code, quantity)).with_parent(parent)
            }
        }
    }
}

pub struct Planner<'a> {
    data: &'a GameData,
    character: &'a Character,
    options: PlanOptions,
    held: BTreeMap<String, u32>,
    bank: BTreeMap<String, u32>,
    free: u32,
    steps: Vec<PlanStep>,
}

impl<'a> Planner<'a> {
    pub fn new(data: &'a GameData, character: &'a Character, options: PlanOptions) -> Self {
        let held = if options.use_inventory {
            character
                .inventory
                .stacks()
                .map(|stack| (stack.code, stack.quantity))
                .collect()
        } else {
            BTreeMap::new()
        };
        Self {
            data,
            character,
            options,
            held,
            bank: BTreeMap::new(),
            free: character.inventory.free_space(),
            steps: Vec::new(),
        }
    }

    /// Bank stock the plan may withdraw. Ignored unless `use_bank`.
    #[must_use]
    pub fn with_bank(mut self, available: impl IntoIterator<Item = ItemStack>) -> Self {
        if self.options.use_bank {
            for stack in available {
                *self.bank.entry(stack.code).or_default() += stack.quantity;
            }
        }
        self
    }

    pub fn plan(mut self, code: &str, quantity: u32) -> JobResult<Vec<PlanStep>> {
        self.obtain(code, quantity, 0)?;
        Ok(self.steps)
    }

    fn obtain(&mut self, code: &str, quantity: u32, depth: usize) -> JobResult<()> {
        if depth > MAX_PLAN_DEPTH {
            return Err(JobError::generic(format!(
                "recipe chain for {code} exceeds {MAX_PLAN_DEPTH} levels"
            )));
        }

        let mut remaining = quantity;
        remaining -= take(&mut self.held, code, remaining);
        if remaining == 0 {
            return Ok(());
        }

        let chunked = self.chunked(depth);
        let mut banked = self.bank.get(code).copied().unwrap_or(0).min(remaining);
        if chunked {
            banked = banked.min(self.free);
        }
        if banked > 0 {
            self.claim_space(code, banked)?;
            take(&mut self.bank, code, banked);
            self.steps.push(PlanStep::Withdraw {
                code: code.to_owned(),
                quantity: banked,
            });
            remaining -= banked;
            if remaining == 0 {
                return Ok(());
            }
        }

        let data = self.data;
        if let Some(recipe) = data.recipe(code) {
            return self.craft(code, recipe, remaining, depth);
        }
        self.produce_raw(code, remaining, chunked)
    }

    /// Ingredients of a planned craft may exceed the free space; the craft
    /// job pulls stashed chunks back from the bank.
    fn chunked(&self, depth: usize) -> bool {
        self.options.craft && depth > 0
    }

    fn craft(&mut self, code: &str, recipe: &Recipe, units: u32, depth: usize) -> JobResult<()> {
        let level = self.character.skill_level(recipe.skill);
        if level < recipe.level {
            return Err(JobError::insufficient_skill(format!(
                "{code} needs {} {}, have {level}",
                recipe.skill, recipe.level
            )));
        }

        let crafts = units.div_ceil(recipe.quantity.max(1));
        if !self.options.craft {
            for ingredient in &recipe.items {
                self.obtain(&ingredient.code, ingredient.quantity * crafts, depth + 1)?;
            }
            return Ok(());
        }

        let footprint = recipe.footprint().max(1);
        if footprint > self.free {
            return Err(JobError::generic(format!(
                "one craft of {code} needs {footprint} free slots, {} left",
                self.free
            )));
        }
        let free = self.free;
        for ingredient in &recipe.items {
            self.obtain(&ingredient.code, ingredient.quantity * crafts, depth + 1)?;
        }
        self.steps.push(PlanStep::Craft {
            code: code.to_owned(),
            quantity: crafts,
        });
        // Every ingredient is consumed; only the output stays.
        self.free = free.saturating_sub(recipe.quantity * crafts);
        Ok(())
    }

    fn produce_raw(&mut self, code: &str, quantity: u32, chunked: bool) -> JobResult<()> {
        let data = self.data;
        let resources = data.resources_dropping(code);
        let usable = resources
            .iter()
            .filter(|resource| self.character.skill_level(resource.skill) >= resource.level)
            .filter_map(|resource| resource.drop_of(code).map(|drop| (*resource, drop)))
            .max_by(|(a_res, a), (b_res, b)| {
                a.expected_quantity()
                    .total_cmp(&b.expected_quantity())
                    .then_with(|| b_res.level.cmp(&a_res.level))
            });
        if let Some((resource, _)) = usable {
            let resource = resource.code.clone();
            return self.collect(code, quantity, chunked, |quantity| PlanStep::Gather {
                resource: resource.clone(),
                code: code.to_owned(),
                quantity,
            });
        }

        if let Some(monster) = data.monsters_dropping(code).first() {
            let monster = monster.code.clone();
            return self.collect(code, quantity, chunked, |quantity| PlanStep::Fight {
                monster: monster.clone(),
                code: code.to_owned(),
                quantity,
            });
        }

        if let Some((npc, _)) = data.npcs_selling(code).first() {
            let npc = npc.code.clone();
            return self.collect(code, quantity, chunked, |quantity| PlanStep::Buy {
                npc: npc.clone(),
                code: code.to_owned(),
                quantity,
            });
        }

        match resources.first() {
            Some(resource) => Err(JobError::insufficient_skill(format!(
                "{code} needs {} {}, have {}",
                resource.skill,
                resource.level,
                self.character.skill_level(resource.skill)
            ))),
            None => Err(JobError::not_found(format!("no known source for {code}"))),
        }
    }

    /// Emits `step` for `quantity` units. Chunked, the units are split to
    /// the free space with a stash after every chunk but the last.
    fn collect(
        &mut self,
        code: &str,
        quantity: u32,
        chunked: bool,
        step: impl Fn(u32) -> PlanStep,
    ) -> JobResult<()> {
        if !chunked {
            self.claim_space(code, quantity)?;
            self.steps.push(step(quantity));
            return Ok(());
        }
        let mut left = quantity;
        while left > 0 {
            let chunk = left.min(self.free);
            if chunk == 0 {
                return Err(JobError::generic(format!(
                    "no free slots to collect {code}"
                )));
            }
            self.free -= chunk;
            self.steps.push(step(chunk));
            left -= chunk;
            if left > 0 {
                self.steps.push(PlanStep::Stash {
                    code: code.to_owned(),
                    quantity: chunk,
                });
                self.free += chunk;
            }
        }
        Ok(())
    }

    fn claim_space(&mut self, code: &str, quantity: u32) -> JobResult<()> {
        if quantity > self.free {
            return Err(JobError::generic(format!(
                "{code} x{quantity} does not fit, {} free slots",
                self.free
            )));
        }
        self.free -= quantity;
        Ok(())
    }
}

/// Removes up to `wanted` units of `code` from `stock`.
fn take(stock: &mut BTreeMap<String, u32>, code: &str, wanted: u32) -> u32 {
    let Some(available) = stock.get_mut(code) else {
        return 0;
    };
    let taken = (*available).min(wanted);
    *available -= taken;
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{
        ErrorKind, Inventory, ItemDefinition, ItemKind, MonsterDefinition, NpcDefinition,
        NpcOffer, ResourceDefinition, Skill,
    };

    fn recipe(skill: Skill, level: u32, items: &[(&str, u32)]) -> Recipe {
        Recipe {
            skill,
            level,
            quantity: 1,
            items: items
                .iter()
                .map(|(code, quantity)| ItemStack::new(*code, *quantity))
                .collect(),
        }
    }

    fn world() -> GameData {
        GameData::new(
            vec![
                ItemDefinition::new("iron_ore", 1, ItemKind::Resource),
                ItemDefinition::new("iron_bar", 1, ItemKind::Resource)
                    .with_recipe(recipe(Skill::Mining, 1, &[("iron_ore", 10)])),
                ItemDefinition::new("iron_sword", 5, ItemKind::Weapon)
                    .with_recipe(recipe(Skill::Weaponcrafting, 5, &[("iron_bar", 2)])),
                ItemDefinition::new("feather", 1, ItemKind::Resource),
                ItemDefinition::new("gold_ore", 1, ItemKind::Resource),
                ItemDefinition::new("apple", 1, ItemKind::Consumable),
            ],
            vec![MonsterDefinition::new("chicken", 1, 60).with_drop("feather", 1, 1)],
            vec![
                ResourceDefinition::new("iron_rocks", Skill::Mining, 1).with_drop("iron_ore", 1, 1),
                ResourceDefinition::new("gold_rocks", Skill::Mining, 20).with_drop("gold_ore", 1, 1),
            ],
            vec![],
            vec![NpcDefinition {
                code: "grocer".into(),
                offers: vec![NpcOffer {
                    code: "apple".into(),
                    buy_price: Some(3),
                    sell_price: None,
                }],
            }],
        )
    }

    fn character(space: u32) -> Character {
        let mut character = Character::new("ada", 1);
        character.inventory = Inventory::new(space);
        character
    }

    fn total(steps: &[PlanStep], predicate: impl Fn(&PlanStep) -> Option<u32>) -> (usize, u32) {
        let matched: Vec<u32> = steps.iter().filter_map(predicate).collect();
        (matched.len(), matched.iter().sum())
    }

    #[test]
    fn iron_bars_are_crafted_once_from_space_bounded_gathers() {
        let data = world();
        let ada = character(25);
        let steps = Planner::new(&data, &ada, PlanOptions::default())
            .plan("iron_bar", 3)
            .expect("plan");

        let (gathers, ore) = total(&steps, |step| match step {
            PlanStep::Gather { code, quantity, .. } if code == "iron_ore" => Some(*quantity),
            _ => None,
        });
        let crafts: Vec<&PlanStep> = steps
            .iter()
            .filter(|step| matches!(step, PlanStep::Craft { .. }))
            .collect();
        assert_eq!(ore, 30);
        assert!(gathers <= 2);
        assert_eq!(
            crafts,
            vec![&PlanStep::Craft {
                code: "iron_bar".into(),
                quantity: 3
            }]
        );
        assert_eq!(
            steps,
            vec![
                PlanStep::Gather {
                    resource: "iron_rocks".into(),
                    code: "iron_ore".into(),
                    quantity: 25
                },
                PlanStep::Stash {
                    code: "iron_ore".into(),
                    quantity: 25
                },
                PlanStep::Gather {
                    resource: "iron_rocks".into(),
                    code: "iron_ore".into(),
                    quantity: 5
                },
                PlanStep::Craft {
                    code: "iron_bar".into(),
                    quantity: 3
                },
            ]
        );
    }

    #[test]
    fn ingredients_that_fit_are_not_stashed() {
        let data = world();
        let ada = character(100);
        let steps = Planner::new(&data, &ada, PlanOptions::default())
            .plan("iron_bar", 3)
            .expect("plan");
        assert_eq!(steps.len(), 2);
        assert!(matches!(&steps[0], PlanStep::Gather { quantity: 30, .. }));
        assert!(matches!(&steps[1], PlanStep::Craft { quantity: 3, .. }));
    }

    #[test]
    fn held_and_banked_units_are_used_first() {
        let data = world();
        let mut ada = character(100);
        ada.inventory.add("iron_ore", 4);
        let steps = Planner::new(&data, &ada, PlanOptions::default())
            .with_bank([ItemStack::new("iron_ore", 3)])
            .plan("iron_bar", 1)
            .expect("plan");
        assert_eq!(
            steps,
            vec![
                PlanStep::Withdraw {
                    code: "iron_ore".into(),
                    quantity: 3
                },
                PlanStep::Gather {
                    resource: "iron_rocks".into(),
                    code: "iron_ore".into(),
                    quantity: 3
                },
                PlanStep::Craft {
                    code: "iron_bar".into(),
                    quantity: 1
                },
            ]
        );
    }

    #[test]
    fn fresh_acquisition_ignores_stock() {
        let data = world();
        let mut ada = character(100);
        ada.inventory.add("iron_ore", 10);
        let options = PlanOptions {
            use_inventory: false,
            use_bank: false,
            craft: true,
        };
        let steps = Planner::new(&data, &ada, options)
            .with_bank([ItemStack::new("iron_ore", 50)])
            .plan("iron_bar", 1)
            .expect("plan");
        assert!(matches!(&steps[0], PlanStep::Gather { quantity: 10, .. }));
    }

    #[test]
    fn materials_only_skips_crafting() {
        let data = world();
        let mut ada = character(100);
        ada.skills.insert(Skill::Weaponcrafting, 5);
        ada.level = 5;
        let steps = Planner::new(&data, &ada, PlanOptions::materials_only())
            .plan("iron_sword", 1)
            .expect("plan");
        assert_eq!(steps.len(), 1);
        assert!(matches!(&steps[0], PlanStep::Gather { quantity: 20, .. }));
    }

    #[test]
    fn skill_gates_fail_the_whole_plan() {
        let data = world();
        let ada = character(100);
        let error = Planner::new(&data, &ada, PlanOptions::default())
            .plan("iron_sword", 1)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InsufficientSkill);

        let error = Planner::new(&data, &ada, PlanOptions::default())
            .plan("gold_ore", 1)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InsufficientSkill);
    }

    #[test]
    fn monsters_and_npcs_are_fallback_sources() {
        let data = world();
        let ada = character(100);
        let steps = Planner::new(&data, &ada, PlanOptions::default())
            .plan("feather", 2)
            .expect("plan");
        assert!(matches!(&steps[0], PlanStep::Fight { monster, .. } if monster == "chicken"));

        let steps = Planner::new(&data, &ada, PlanOptions::default())
            .plan("apple", 5)
            .expect("plan");
        assert!(matches!(&steps[0], PlanStep::Buy { npc, .. } if npc == "grocer"));
    }

    #[test]
    fn unknown_items_and_oversized_steps_fail() {
        let data = world();
        let ada = character(5);
        let error = Planner::new(&data, &ada, PlanOptions::default())
            .plan("mithril", 1)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);

        let error = Planner::new(&data, &ada, PlanOptions::default())
            .plan("feather", 6)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Generic);

        let error = Planner::new(&data, &ada, PlanOptions::default())
            .plan("iron_bar", 1)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Generic);
    }

    #[test]
    fn plan_steps_become_parented_jobs() {
        let parent = JobId::next();
        let job = PlanStep::Withdraw {
            code: "iron_ore".into(),
            quantity: 3,
        }
        .into_job(parent);
        assert_eq!(job.parent(), Some(parent));
        assert_eq!(job.label(), "withdraw iron_ore x3");
    }
}
