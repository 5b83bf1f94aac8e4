use std::collections::BTreeMap;

use async_trait::async_trait;
use game_core::Slot;
use game_core::optimizer::Candidate;

use crate::actor::Placement;
use crate::jobs::context::JobContext;
use crate::jobs::error::{JobError, JobResult};
use crate::jobs::job::Job;
use crate::remote::RemoteAction;

use super::{Execute, Outcome, withdraw_job};

/// Puts `quantity` units of an inventory item into `slot`, unequipping
/// whatever is there first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Equip {
    pub code: String,
    pub slot: Slot,
    pub quantity: u32,
}

impl Equip {
    pub fn new(code: impl Into<String>, slot: Slot, quantity: u32) -> Self {
        Self {
            code: code.into(),
            slot,
            quantity: quantity.max(1),
        }
    }
}

#[async_trait]
impl Execute for Equip {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let character = ctx.character();
        if let Some(current) = character.equipment.get(self.slot) {
            if current.code == self.code && current.quantity >= self.quantity {
                return Ok(Outcome::Completed);
            }
            ctx.act(RemoteAction::Unequip {
                slot: self.slot,
                quantity: current.quantity,
            })
            .await?;
        }

        let held = ctx.character().held(&self.code);
        if held < self.quantity {
            return Err(JobError::generic(format!(
                "cannot equip {} x{} in {}, holding {held}",
                self.code, self.quantity, self.slot
            )));
        }
        ctx.act(RemoteAction::Equip {
            code: self.code.clone(),
            slot: self.slot,
            quantity: self.quantity,
        })
        .await?;
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        if self.quantity > 1 {
            format!("equip {} x{} in {}", self.code, self.quantity, self.slot)
        } else {
            format!("equip {} in {}", self.code, self.slot)
        }
    }
}

/// Empties a slot; `None` removes the whole stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unequip {
    pub slot: Slot,
    pub quantity: Option<u32>,
}

impl Unequip {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            quantity: None,
        }
    }
}

#[async_trait]
impl Execute for Unequip {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let Some(current) = ctx.character().equipment.get(self.slot).cloned() else {
            return Ok(Outcome::Completed);
        };
        let quantity = self.quantity.unwrap_or(current.quantity).min(current.quantity);
        ctx.act(RemoteAction::Unequip {
            slot: self.slot,
            quantity,
        })
        .await?;
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        format!("unequip {}", self.slot)
    }
}

/// Consumes an inventory item outside of combat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseItem {
    pub code: String,
    pub quantity: u32,
}

impl UseItem {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }
}

#[async_trait]
impl Execute for UseItem {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let held = ctx.character().held(&self.code);
        if held < self.quantity {
            return Err(JobError::generic(format!(
                "cannot use {} x{}, holding {held}",
                self.code, self.quantity
            )));
        }
        ctx.act(RemoteAction::UseItem {
            code: self.code.clone(),
            quantity: self.quantity,
        })
        .await?;
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        format!("use {} x{}", self.code, self.quantity)
    }
}

/// Switches to the best loadout against a monster, pulling candidates from
/// the inventory and from unreserved bank stock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptimizeLoadout {
    pub monster: String,
}

impl OptimizeLoadout {
    pub fn new(monster: impl Into<String>) -> Self {
        Self {
            monster: monster.into(),
        }
    }

    fn candidates(ctx: &JobContext) -> Vec<Candidate> {
        let character = ctx.character();
        let mut pooled: BTreeMap<String, u32> = BTreeMap::new();
        for stack in character.inventory.stacks() {
            *pooled.entry(stack.code).or_default() += stack.quantity;
        }
        for stack in ctx.bank().available_items(ctx.name(), true) {
            *pooled.entry(stack.code).or_default() += stack.quantity;
        }
        pooled
            .into_iter()
            .map(|(code, quantity)| Candidate::new(code, quantity))
            .collect()
    }
}

#[async_trait]
impl Execute for OptimizeLoadout {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        // Second run: the swap plan has drained.
        if ctx.resumptions() > 0 {
            return Ok(Outcome::Completed);
        }
        let monster = ctx
            .data()
            .monster(&self.monster)
            .cloned()
            .ok_or_else(|| JobError::not_found(format!("unknown monster {}", self.monster)))?;

        let character = ctx.character();
        let candidates = Self::candidates(ctx);
        let plan = ctx
            .optimizer()
            .find_best_loadout(&character, &monster, &candidates, ctx.data());
        if plan.is_unchanged() {
            return Ok(Outcome::Completed);
        }

        // Empty every changed slot first so items can move between slots.
        let mut freed: BTreeMap<&str, u32> = BTreeMap::new();
        let mut needed: BTreeMap<&str, u32> = BTreeMap::new();
        let mut unequips = Vec::new();
        let mut equips = Vec::new();
        for change in &plan.changes {
            if let Some(current) = &change.unequip {
                *freed.entry(current.code.as_str()).or_default() += current.quantity;
                unequips.push(Job::new(Unequip::new(change.slot)).with_parent(ctx.job_id()));
            }
            if let Some(item) = &change.equip {
                *needed.entry(item.code.as_str()).or_default() += item.quantity;
                equips.push(
                    Job::new(Equip::new(&item.code, change.slot, item.quantity))
                        .with_parent(ctx.job_id()),
                );
            }
        }

        let withdrawals = needed.iter().filter_map(|(code, quantity)| {
            let on_hand = character.held(code) + freed.get(code).copied().unwrap_or(0);
            let missing = quantity.saturating_sub(on_hand);
            (missing > 0).then(|| withdraw_job(code, missing, ctx.job_id()))
        });

        let children: Vec<Job> = withdrawals.chain(unequips).chain(equips).collect();
        tracing::info!(
            target: "runtime::job",
            character = ctx.name(),
            monster = %self.monster,
            changes = plan.changes.len(),
            "switching loadout"
        );
        ctx.splice_jobs(children, Placement::Before);
        Ok(Outcome::Suspended)
    }

    fn describe(&self) -> String {
        format!("optimize loadout for {}", self.monster)
    }
}
