//! One-shot hooks attached to jobs.
//!
//! `on_queued` hooks run when a job enters a character's queue and
//! `on_success` hooks run once after the job completes. Hooks are synchronous
//! and must not block; follow-up work is expressed as jobs pushed to the
//! front of the queue.
use crate::bank::BankCache;

use super::job::{Job, JobId};
use super::kinds::Deposit;

pub struct HookContext<'a> {
    pub character: &'a str,
    pub bank: &'a BankCache,
    pub job: JobId,
    /// Jobs the scheduler runs next.
    pub follow_ups: Vec<Job>,
}

impl<'a> HookContext<'a> {
    pub fn new(character: &'a str, bank: &'a BankCache, job: JobId) -> Self {
        Self {
            character,
            bank,
            job,
            follow_ups: Vec::new(),
        }
    }
}

pub trait JobHook: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &mut HookContext<'_>);
}

/// Soft-reserves bank stock the job is about to withdraw.
#[derive(Debug, Clone)]
pub struct ReserveBankItem {
    pub code: String,
    pub quantity: u32,
}

impl JobHook for ReserveBankItem {
    fn name(&self) -> &'static str {
        "reserve_bank_item"
    }

    fn run(&self, ctx: &mut HookContext<'_>) {
        let granted = ctx.bank.reserve(ctx.character, &self.code, self.quantity);
        tracing::debug!(
            target: "runtime::bank",
            character = ctx.character,
            job_id = %ctx.job,
            code = %self.code,
            granted,
            "reserved bank stock"
        );
    }
}

/// Releases a reservation once the withdrawal went through.
#[derive(Debug, Clone)]
pub struct ReleaseReservation {
    pub code: String,
    pub quantity: u32,
}

impl JobHook for ReleaseReservation {
    fn name(&self) -> &'static str {
        "release_reservation"
    }

    fn run(&self, ctx: &mut HookContext<'_>) {
        ctx.bank
            .release_reservation(ctx.character, &self.code, self.quantity);
    }
}

/// Banks whatever the job produced.
#[derive(Debug, Clone)]
pub struct DepositResult {
    pub code: String,
}

impl JobHook for DepositResult {
    fn name(&self) -> &'static str {
        "deposit_result"
    }

    fn run(&self, ctx: &mut HookContext<'_>) {
        ctx.follow_ups.push(Job::new(Deposit::all_of(&self.code)));
    }
}
