//! Bank transfers. Every successful transfer is mirrored into the shared
//! [`BankCache`](crate::bank::BankCache) so other characters plan against
//! current stock.
use async_trait::async_trait;

use crate::jobs::context::JobContext;
use crate::jobs::error::{JobError, JobResult};
use crate::remote::{Destination, RemoteAction};

use super::{Execute, Outcome};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Withdraw {
    pub code: String,
    pub quantity: u32,
}

impl Withdraw {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }
}

#[async_trait]
impl Execute for Withdraw {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        if self.quantity == 0 {
            return Ok(Outcome::Completed);
        }
        if !ctx.character().inventory.can_hold(&self.code, self.quantity) {
            return Err(JobError::generic(format!(
                "no room to withdraw {} x{}",
                self.code, self.quantity
            )));
        }
        let stocked = ctx.bank().raw_quantity(&self.code);
        if stocked < self.quantity {
            return Err(JobError::not_found(format!(
                "bank holds {stocked} {}, {} wanted",
                self.code, self.quantity
            )));
        }

        ctx.navigate(Destination::Bank).await?;
        ctx.act(RemoteAction::WithdrawItem {
            code: self.code.clone(),
            quantity: self.quantity,
        })
        .await?;
        ctx.bank().record_withdraw(&self.code, self.quantity);
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        format!("withdraw {} x{}", self.code, self.quantity)
    }
}

/// Deposits one item code; `None` deposits every held unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deposit {
    pub code: String,
    pub quantity: Option<u32>,
}

impl Deposit {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity: Some(quantity),
        }
    }

    pub fn all_of(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            quantity: None,
        }
    }
}

#[async_trait]
impl Execute for Deposit {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let held = ctx.character().held(&self.code);
        let quantity = self.quantity.unwrap_or(held).min(held);
        if quantity == 0 {
            return Ok(Outcome::Completed);
        }

        ctx.navigate(Destination::Bank).await?;
        ctx.act(RemoteAction::DepositItem {
            code: self.code.clone(),
            quantity,
        })
        .await?;
        ctx.bank().record_deposit(&self.code, quantity);
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        match self.quantity {
            Some(quantity) => format!("deposit {} x{quantity}", self.code),
            None => format!("deposit all {}", self.code),
        }
    }
}

/// Empties the inventory into the bank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositAll;

#[async_trait]
impl Execute for DepositAll {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let stacks: Vec<_> = ctx.character().inventory.stacks().collect();
        if stacks.is_empty() {
            return Ok(Outcome::Completed);
        }

        ctx.navigate(Destination::Bank).await?;
        for stack in stacks {
            ctx.act(RemoteAction::DepositItem {
                code: stack.code.clone(),
                quantity: stack.quantity,
            })
            .await?;
            ctx.bank().record_deposit(&stack.code, stack.quantity);
        }
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        "deposit everything".to_owned()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawGold {
    pub amount: u32,
}

impl WithdrawGold {
    pub fn new(amount: u32) -> Self {
        Self { amount }
    }
}

#[async_trait]
impl Execute for WithdrawGold {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        if self.amount == 0 {
            return Ok(Outcome::Completed);
        }
        let stocked = ctx.bank().gold();
        if stocked < self.amount {
            return Err(JobError::generic(format!(
                "bank holds {stocked} gold, {} wanted",
                self.amount
            )));
        }

        ctx.navigate(Destination::Bank).await?;
        ctx.act(RemoteAction::WithdrawGold(self.amount)).await?;
        ctx.bank().record_gold(stocked - self.amount);
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        format!("withdraw {} gold", self.amount)
    }
}

/// Deposits gold; `None` deposits all of it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositGold {
    pub amount: Option<u32>,
}

impl DepositGold {
    pub fn new(amount: u32) -> Self {
        Self {
            amount: Some(amount),
        }
    }

    pub fn all() -> Self {
        Self { amount: None }
    }
}

#[async_trait]
impl Execute for DepositGold {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let gold = ctx.character().gold;
        let amount = self.amount.unwrap_or(gold).min(gold);
        if amount == 0 {
            return Ok(Outcome::Completed);
        }

        ctx.navigate(Destination::Bank).await?;
        ctx.act(RemoteAction::DepositGold(amount)).await?;
        ctx.bank().record_gold(ctx.bank().gold() + amount);
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        match self.amount {
            Some(amount) => format!("deposit {amount} gold"),
            None => "deposit all gold".to_owned(),
        }
    }
}
