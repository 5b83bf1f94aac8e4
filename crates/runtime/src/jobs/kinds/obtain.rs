use async_trait::async_trait;

use crate::actor::Placement;
use crate::jobs::context::JobContext;
use crate::jobs::error::JobResult;
use crate::jobs::planner::{PlanOptions, PlanStep, Planner};

use super::{Execute, Outcome, guard_resumptions};

/// Ends up holding `quantity` units of an item, by whatever means the
/// planner finds.
///
/// With `use_inventory` the job re-plans on every resumption until the
/// inventory holds enough. Without it (fresh acquisition) one plan is made
/// and the job completes once that plan drained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObtainItem {
    pub code: String,
    pub quantity: u32,
    pub options: PlanOptions,
}

impl ObtainItem {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
            options: PlanOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PlanOptions) -> Self {
        self.options = options;
        self
    }

    fn plan(&self, ctx: &JobContext) -> JobResult<Vec<PlanStep>> {
        let character = ctx.character();
        let mut planner = Planner::new(ctx.data(), &character, self.options);
        if self.options.use_bank {
            planner = planner.with_bank(ctx.bank().available_items(ctx.name(), true));
        }
        planner.plan(&self.code, self.quantity)
    }
}

/// Splices `steps` in front of the running job and suspends it.
fn splice_plan(ctx: &JobContext, steps: Vec<PlanStep>) -> Outcome {
    let jobs = steps
        .into_iter()
        .map(|step| step.into_job(ctx.job_id()))
        .collect();
    ctx.splice_jobs(jobs, Placement::Before);
    Outcome::Suspended
}

#[async_trait]
impl Execute for ObtainItem {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let done = if self.options.use_inventory {
            ctx.character().held(&self.code) >= self.quantity
        } else {
            ctx.resumptions() > 0 && !ctx.children_pending()
        };
        if done {
            ctx.fulfil(&self.code, self.quantity);
            return Ok(Outcome::Completed);
        }
        guard_resumptions(ctx, &self.describe())?;

        let steps = self.plan(ctx)?;
        if steps.is_empty() {
            ctx.fulfil(&self.code, self.quantity);
            return Ok(Outcome::Completed);
        }
        if ctx.resumptions() == 0 {
            ctx.wish(&self.code, self.quantity);
        }
        tracing::debug!(
            target: "runtime::job",
            character = ctx.name(),
            job_id = %ctx.job_id(),
            code = %self.code,
            steps = steps.len(),
            "planned acquisition"
        );
        Ok(splice_plan(ctx, steps))
    }

    fn describe(&self) -> String {
        format!("obtain {} x{}", self.code, self.quantity)
    }
}

/// Gathers the raw materials for `quantity` units of an item without
/// crafting anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatherMaterials {
    pub code: String,
    pub quantity: u32,
}

impl GatherMaterials {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }
}

#[async_trait]
impl Execute for GatherMaterials {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        if ctx.resumptions() > 0 {
            return Ok(Outcome::Completed);
        }
        let character = ctx.character();
        let steps = Planner::new(ctx.data(), &character, PlanOptions::materials_only())
            .plan(&self.code, self.quantity)?;
        if steps.is_empty() {
            return Ok(Outcome::Completed);
        }
        Ok(splice_plan(ctx, steps))
    }

    fn describe(&self) -> String {
        format!("gather materials for {} x{}", self.code, self.quantity)
    }
}
