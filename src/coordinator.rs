//! Process-wide exclusivity for app-mutating operations.
//!
//! Exactly one of backup creation, restore, deletion, prune, app start/stop,
//! update or a maintenance cycle may run at a time. The coordinator is an
//! explicitly constructed value shared through an [`Arc`](std::sync::Arc);
//! every entry point that mutates app state acquires it first.
//!
//! The lock is not reentrant: a second [`OperationCoordinator::try_lock`] from
//! the same task fails exactly like one from another task.

use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Message returned to callers when the coordinator is already held.
pub const OPERATION_BUSY_MESSAGE: &str = "another app operation is ongoing; try again later";

/// Error returned by [`OperationCoordinator::try_lock`] under contention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("another app operation is ongoing; try again later")]
pub struct OperationBusyError {
    /// Label of the operation currently holding the coordinator, if known.
    pub current: Option<String>,
    /// Label of the operation that attempted to acquire it.
    pub attempted: String,
}

/// Exclusive, non-reentrant lock for app-mutating operations.
#[derive(Debug, Default)]
pub struct OperationCoordinator {
    gate: Arc<AsyncMutex<()>>,
    held: Mutex<Option<HeldOperation>>,
}

#[derive(Debug)]
struct HeldOperation {
    label: String,
    _guard: OwnedMutexGuard<()>,
}

impl OperationCoordinator {
    /// Creates an unlocked coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the coordinator without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`OperationBusyError`] immediately when another operation
    /// holds the coordinator. The held state is left untouched.
    pub fn try_lock(&self, label: &str) -> Result<(), OperationBusyError> {
        tracing::debug!(operation = label, "trying to acquire operation coordinator");
        let Ok(guard) = Arc::clone(&self.gate).try_lock_owned() else {
            let current = self.current_operation();
            tracing::info!(
                ongoing = current.as_deref().unwrap_or("unknown"),
                attempted = label,
                "operation coordinator is busy"
            );
            return Err(OperationBusyError {
                current,
                attempted: label.to_owned(),
            });
        };
        self.record(label, guard);
        Ok(())
    }

    /// Waits until the coordinator is free, then acquires it.
    pub async fn lock(&self, label: &str) {
        tracing::debug!(operation = label, "waiting for operation coordinator");
        let guard = Arc::clone(&self.gate).lock_owned().await;
        self.record(label, guard);
    }

    /// Releases the coordinator.
    ///
    /// Calling this while the coordinator is not held is a no-op.
    pub fn unlock(&self) {
        let released = self.slot().take();
        if let Some(operation) = released {
            tracing::debug!(operation = %operation.label, "released operation coordinator");
        }
    }

    /// Returns whether an operation currently holds the coordinator.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.slot().is_some()
    }

    /// Returns the label of the operation currently holding the coordinator.
    #[must_use]
    pub fn current_operation(&self) -> Option<String> {
        self.slot().as_ref().map(|operation| operation.label.clone())
    }

    /// Acquires the coordinator without waiting and releases it when the
    /// returned guard drops.
    ///
    /// # Errors
    ///
    /// Returns [`OperationBusyError`] when another operation holds the
    /// coordinator.
    pub fn try_acquire(&self, label: &str) -> Result<CoordinatorGuard<'_>, OperationBusyError> {
        self.try_lock(label)?;
        Ok(CoordinatorGuard(self))
    }

    /// Waits for the coordinator and releases it when the returned guard
    /// drops.
    pub async fn acquire(&self, label: &str) -> CoordinatorGuard<'_> {
        self.lock(label).await;
        CoordinatorGuard(self)
    }

    fn record(&self, label: &str, guard: OwnedMutexGuard<()>) {
        *self.slot() = Some(HeldOperation {
            label: label.to_owned(),
            _guard: guard,
        });
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<HeldOperation>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the coordinator until dropped.
#[derive(Debug)]
#[must_use = "the coordinator is released as soon as the guard drops"]
pub struct CoordinatorGuard<'a>(&'a OperationCoordinator);

impl Drop for CoordinatorGuard<'_> {
    fn drop(&mut self) {
        self.0.unlock();
    }
}
