use async_trait::async_trait;
use game_core::Recipe;

use crate::jobs::context::JobContext;
use crate::jobs::error::{JobError, JobResult};
use crate::remote::{Destination, RemoteAction};

use super::{Execute, Outcome};

/// Runs a recipe `quantity` times at the matching workshop.
///
/// Crafts in rounds sized to the inventory. Ingredients missing for a round
/// are withdrawn from the bank first, which is where the planner stashes
/// chunks that did not fit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Craft {
    pub code: String,
    pub quantity: u32,
    crafted: u32,
}

impl Craft {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
            crafted: 0,
        }
    }

    pub fn crafted(&self) -> u32 {
        self.crafted
    }

    /// Largest round whose missing ingredients fit in the free space.
    fn round(&self, ctx: &JobContext, recipe: &Recipe) -> u32 {
        let character = ctx.character();
        let free = character.inventory.free_space();
        let fits = |round: u32| {
            let missing: u32 = recipe
                .items
                .iter()
                .map(|ingredient| {
                    (ingredient.quantity * round).saturating_sub(character.held(&ingredient.code))
                })
                .sum();
            missing <= free
        };
        (1..=self.quantity - self.crafted)
            .rev()
            .find(|round| fits(*round))
            .unwrap_or(0)
    }

    async fn restock(&self, ctx: &JobContext, recipe: &Recipe, round: u32) -> JobResult<()> {
        for ingredient in &recipe.items {
            let needed = ingredient.quantity * round;
            let held = ctx.character().held(&ingredient.code);
            if held >= needed {
                continue;
            }
            let missing = needed - held;
            let banked = ctx.bank().available_quantity(&ingredient.code, ctx.name(), false);
            if banked < missing {
                return Err(JobError::generic(format!(
                    "crafting {} x{round} needs {} x{needed}, holding {held}, {banked} banked",
                    self.code, ingredient.code
                )));
            }
            ctx.navigate(Destination::Bank).await?;
            ctx.act(RemoteAction::WithdrawItem {
                code: ingredient.code.clone(),
                quantity: missing,
            })
            .await?;
            ctx.bank().record_withdraw(&ingredient.code, missing);
            ctx.bank()
                .release_reservation(ctx.name(), &ingredient.code, missing);
        }
        Ok(())
    }
}

#[async_trait]
impl Execute for Craft {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        if self.quantity == 0 {
            return Ok(Outcome::Completed);
        }
        let recipe = ctx
            .data()
            .recipe(&self.code)
            .cloned()
            .ok_or_else(|| JobError::not_found(format!("no recipe for {}", self.code)))?;

        let level = ctx.character().skill_level(recipe.skill);
        if level < recipe.level {
            return Err(JobError::insufficient_skill(format!(
                "{} needs {} {}, have {level}",
                self.code, recipe.skill, recipe.level
            )));
        }

        while self.crafted < self.quantity {
            let round = self.round(ctx, &recipe);
            if round == 0 {
                return Err(JobError::generic(format!(
                    "no room to craft {}, one craft needs {} slots",
                    self.code,
                    recipe.footprint()
                )));
            }
            self.restock(ctx, &recipe, round).await?;
            ctx.navigate(Destination::Workshop(recipe.skill)).await?;
            ctx.act(RemoteAction::Craft {
                code: self.code.clone(),
                quantity: round,
            })
            .await?;
            self.crafted += round;
        }
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        format!("craft {} x{}", self.code, self.quantity)
    }
}
