//! Mirrors job lifecycle events into the session log.
use runtime::{Event, JobEvent, Runtime, Topic};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Spawn a task that logs every job event until the bus closes.
pub fn spawn(runtime: &Runtime) -> JoinHandle<()> {
    let mut events = runtime.subscribe(Topic::Job);
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(Event::Job(event)) => log(&event),
                Ok(Event::Character(_)) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "job monitor fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn log(event: &JobEvent) {
    match event {
        JobEvent::Started {
            character,
            job,
            idle,
            ..
        } => tracing::info!(%character, %job, idle, "started"),
        JobEvent::Completed { character, job, .. } => {
            tracing::info!(%character, %job, "completed")
        }
        JobEvent::Failed {
            character,
            job,
            kind,
            message,
            ..
        } => tracing::warn!(%character, %job, ?kind, %message, "failed"),
        JobEvent::Purged { character, job_ids } => {
            tracing::info!(%character, purged = job_ids.len(), "queue purged")
        }
        JobEvent::Queued { .. } | JobEvent::Suspended { .. } => {
            tracing::debug!(character = event.character(), ?event, "job event")
        }
    }
}
