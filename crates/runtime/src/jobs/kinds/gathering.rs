use async_trait::async_trait;

use crate::jobs::context::JobContext;
use crate::jobs::error::{JobError, JobResult};
use crate::remote::{Destination, RemoteAction};

use super::{Execute, Outcome};

/// Gathers a resource until `amount` units of `item` were collected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gather {
    pub resource: String,
    pub item: String,
    pub amount: u32,
    gathered: u32,
}

impl Gather {
    pub fn new(resource: impl Into<String>, item: impl Into<String>, amount: u32) -> Self {
        Self {
            resource: resource.into(),
            item: item.into(),
            amount,
            gathered: 0,
        }
    }

    pub fn gathered(&self) -> u32 {
        self.gathered
    }
}

#[async_trait]
impl Execute for Gather {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let resource = ctx
            .data()
            .resource(&self.resource)
            .cloned()
            .ok_or_else(|| JobError::not_found(format!("unknown resource {}", self.resource)))?;
        if resource.drop_of(&self.item).is_none() {
            return Err(JobError::not_found(format!(
                "{} never yields {}",
                self.resource, self.item
            )));
        }
        let level = ctx.character().skill_level(resource.skill);
        if level < resource.level {
            return Err(JobError::insufficient_skill(format!(
                "{} needs {} {}, have {level}",
                self.resource, resource.skill, resource.level
            )));
        }

        while self.gathered < self.amount {
            if ctx.character().inventory.is_full() {
                return Err(JobError::generic(format!(
                    "inventory full while gathering {}",
                    self.item
                )));
            }
            ctx.navigate(Destination::Resource(self.resource.clone())).await?;
            let response = ctx.act(RemoteAction::Gather).await?;
            self.gathered += response.dropped(&self.item);
        }
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        format!("gather {} x{} at {}", self.item, self.amount, self.resource)
    }
}
