// SPDX-License-Identifier: MIT
//! Concurrency gate — bounds the number of simultaneously running renderer
//! processes.
//!
//! The gate is a plain counting semaphore owned by one orchestrator instance,
//! never a process-wide global, so independent orchestrators (e.g. in tests)
//! cannot interfere with each other. `try_acquire` never queues: a saturated
//! gate rejects immediately and the caller surfaces that as a rate-limit
//! condition.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// An ownership token for one unit of the execution ceiling.
///
/// The underlying permit returns to the gate when this is dropped, which is
/// what guarantees release on every exit path — normal completion, error,
/// timeout, and task cancellation all run the same drop.
#[derive(Debug)]
pub struct RenderSlot {
    _permit: OwnedSemaphorePermit,
}

/// Bounded, non-blocking counting semaphore with observability accessors.
#[derive(Debug)]
pub struct ConcurrencyGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Try to claim a slot. Returns `None` immediately when the gate is at
    /// capacity — callers must not retry internally.
    pub fn try_acquire(&self) -> Option<RenderSlot> {
        Arc::clone(&self.permits)
            .try_acquire_owned()
            .ok()
            .map(|permit| RenderSlot { _permit: permit })
    }

    /// Number of slots currently held.
    pub fn active(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_up_to_capacity_then_reject() {
        let gate = ConcurrencyGate::new(2);
        let a = gate.try_acquire().expect("first slot");
        let b = gate.try_acquire().expect("second slot");
        assert!(gate.try_acquire().is_none(), "third acquire must fail fast");
        assert_eq!(gate.active(), 2);
        drop(a);
        assert_eq!(gate.active(), 1);
        drop(b);
        assert_eq!(gate.active(), 0);
    }

    #[test]
    fn slot_released_on_drop_can_be_reacquired() {
        let gate = ConcurrencyGate::new(1);
        let slot = gate.try_acquire().unwrap();
        assert!(gate.try_acquire().is_none());
        drop(slot);
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn zero_capacity_always_rejects() {
        let gate = ConcurrencyGate::new(0);
        assert!(gate.try_acquire().is_none());
        assert_eq!(gate.active(), 0);
        assert_eq!(gate.capacity(), 0);
    }
}
