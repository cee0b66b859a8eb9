//! Forward steps with compensating undo actions.
//!
//! A [`Saga`] runs steps in order. Each successful step may hand back an undo
//! action through its [`StepResponse`]; when a later step fails, every recorded
//! undo action runs in reverse order before the original error is returned.
//! This is not a distributed transaction: undo actions are best effort and their
//! failures are logged, never raised in place of the step error.

use async_trait::async_trait;
use std::future::Future;

use crate::error::Result;

/// Reverses one completed step
#[async_trait]
pub trait Compensate: Send + Sync {
    /// Step name for logging
    fn name(&self) -> &'static str;

    async fn compensate(&self) -> Result<()>;
}

/// Output of a step plus what it takes to undo it
pub struct StepResponse<T> {
    pub output: T,
    pub undo: Option<Box<dyn Compensate>>,
}

impl<T> StepResponse<T> {
    pub fn new(output: T, undo: impl Compensate + 'static) -> Self {
        Self {
            output,
            undo: Some(Box::new(undo)),
        }
    }

    /// A step with nothing to undo (e.g. a send)
    pub fn final_step(output: T) -> Self {
        Self { output, undo: None }
    }
}

pub struct Saga {
    name: &'static str,
    completed: Vec<Box<dyn Compensate>>,
}

impl Saga {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            completed: Vec::new(),
        }
    }

    /// Run a step. On failure, earlier steps are compensated and the step's error returned.
    pub async fn run_step<T, F>(&mut self, step: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<StepResponse<T>>>,
    {
        match fut.await {
            Ok(response) => {
                if let Some(undo) = response.undo {
                    self.completed.push(undo);
                }
                Ok(response.output)
            }
            Err(e) => {
                tracing::warn!(saga = self.name, step, error = %e, "Saga step failed, compensating");
                self.compensate().await;
                Err(e)
            }
        }
    }

    /// Undo every completed step, most recent first
    pub async fn compensate(&mut self) {
        while let Some(undo) = self.completed.pop() {
            match undo.compensate().await {
                Ok(()) => {
                    tracing::info!(saga = self.name, step = undo.name(), "Compensated step");
                }
                Err(e) => {
                    tracing::error!(
                        saga = self.name,
                        step = undo.name(),
                        error = %e,
                        "Compensation failed"
                    );
                }
            }
        }
    }

    /// Finish without compensating anything
    pub fn complete(mut self) {
        self.completed.clear();
    }
}
