//! Periodic task scheduler
//!
//! Runs background tasks at regular intervals. Lazy expiry on read keeps
//! invite status correct without these tasks; the sweep only keeps listings
//! and reports tidy.

use async_trait::async_trait;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;

use super::invites::InviteService;

/// Trait for periodic background tasks
#[async_trait]
pub trait PeriodicTask: Send + Sync {
    /// Task name for logging
    fn name(&self) -> &'static str;

    fn interval(&self) -> Duration;

    async fn run(&self) -> anyhow::Result<()>;
}

/// Shortest period a task may run at; `tokio::time::interval` panics on zero
const MIN_TASK_INTERVAL: Duration = Duration::from_secs(1);

fn task_period(task: &dyn PeriodicTask) -> Duration {
    task.interval().max(MIN_TASK_INTERVAL)
}

/// Start all periodic tasks
pub fn start_scheduler(invites: InviteService, sweep_every: Duration) -> Vec<JoinHandle<()>> {
    let tasks: Vec<Box<dyn PeriodicTask>> = vec![Box::new(InviteExpiryTask {
        invites,
        every: sweep_every,
    })];

    let handles = tasks
        .into_iter()
        .map(|task| tokio::spawn(run_task(task)))
        .collect();

    tracing::info!("Periodic task scheduler started");
    handles
}

/// Run a single task on its interval
async fn run_task(task: Box<dyn PeriodicTask>) {
    let mut ticker = interval(task_period(task.as_ref()));

    // Skip the first immediate tick
    ticker.tick().await;

    loop {
        ticker.tick().await;

        tracing::debug!(task = task.name(), "Running periodic task");

        match task.run().await {
            Ok(()) => {
                tracing::debug!(task = task.name(), "Periodic task completed");
            }
            Err(e) => {
                tracing::error!(task = task.name(), error = %e, "Periodic task failed");
            }
        }
    }
}

// ============================================================================
// Invite Expiry Task
// ============================================================================

/// Rewrites overdue pending invites to expired
pub struct InviteExpiryTask {
    pub invites: InviteService,
    pub every: Duration,
}

#[async_trait]
impl PeriodicTask for InviteExpiryTask {
    fn name(&self) -> &'static str {
        "invite_expiry"
    }

    fn interval(&self) -> Duration {
        self.every
    }

    async fn run(&self) -> anyhow::Result<()> {
        self.invites.expire_overdue().await?;
        Ok(())
    }
}
