use async_trait::async_trait;

use crate::actor::Placement;
use crate::jobs::context::JobContext;
use crate::jobs::error::{JobError, JobResult};
use crate::jobs::job::Job;
use crate::remote::{Destination, RemoteAction};

use super::{Execute, Outcome, WithdrawGold};

/// Buys from an NPC, topping up gold from the bank once if short.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpcBuy {
    pub npc: String,
    pub code: String,
    pub quantity: u32,
}

impl NpcBuy {
    pub fn new(npc: impl Into<String>, code: impl Into<String>, quantity: u32) -> Self {
        Self {
            npc: npc.into(),
            code: code.into(),
            quantity,
        }
    }
}

#[async_trait]
impl Execute for NpcBuy {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let price = ctx
            .data()
            .npc(&self.npc)
            .ok_or_else(|| JobError::not_found(format!("unknown npc {}", self.npc)))?
            .buy_price(&self.code)
            .ok_or_else(|| JobError::not_found(format!("{} does not sell {}", self.npc, self.code)))?;

        let character = ctx.character();
        let cost = price * self.quantity;
        if character.gold < cost {
            let missing = cost - character.gold;
            if ctx.resumptions() == 0 && ctx.bank().gold() >= missing {
                ctx.splice_jobs(
                    vec![Job::new(WithdrawGold::new(missing)).with_parent(ctx.job_id())],
                    Placement::Before,
                );
                return Ok(Outcome::Suspended);
            }
            return Err(JobError::generic(format!(
                "{} x{} costs {cost} gold, holding {}",
                self.code, self.quantity, character.gold
            )));
        }
        if !character.inventory.can_hold(&self.code, self.quantity) {
            return Err(JobError::generic(format!(
                "no room for {} x{}",
                self.code, self.quantity
            )));
        }

        ctx.navigate(Destination::Npc(self.npc.clone())).await?;
        ctx.act(RemoteAction::NpcBuy {
            code: self.code.clone(),
            quantity: self.quantity,
        })
        .await?;
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        format!("buy {} x{} from {}", self.code, self.quantity, self.npc)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpcSell {
    pub npc: String,
    pub code: String,
    pub quantity: u32,
}

impl NpcSell {
    pub fn new(npc: impl Into<String>, code: impl Into<String>, quantity: u32) -> Self {
        Self {
            npc: npc.into(),
            code: code.into(),
            quantity,
        }
    }
}

#[async_trait]
impl Execute for NpcSell {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        ctx.data()
            .npc(&self.npc)
            .ok_or_else(|| JobError::not_found(format!("unknown npc {}", self.npc)))?
            .sell_price(&self.code)
            .ok_or_else(|| JobError::not_found(format!("{} does not buy {}", self.npc, self.code)))?;
        let held = ctx.character().held(&self.code);
        if held < self.quantity {
            return Err(JobError::generic(format!(
                "cannot sell {} x{}, holding {held}",
                self.code, self.quantity
            )));
        }

        ctx.navigate(Destination::Npc(self.npc.clone())).await?;
        ctx.act(RemoteAction::NpcSell {
            code: self.code.clone(),
            quantity: self.quantity,
        })
        .await?;
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        format!("sell {} x{} to {}", self.code, self.quantity, self.npc)
    }
}
