//! Checkpoint rendezvous with a membership that changes while agents run.
//!
//! A fixed-size barrier cannot serve a cohort that grows (resurrection
//! spawns) and shrinks (deaths, stuck agents, treasure exhaustion) mid-run.
//! [`CheckpointBarrier`] therefore counts members explicitly:
//!
//! - [`CheckpointBarrier::enroll`] adds a member and hands back a
//!   [`Membership`] guard. Dropping the guard removes the member.
//! - A generation is released when the number of arrivals reaches the
//!   current member count. A departure can release a generation that was
//!   only waiting on the departing member.
//! - Enrolling while a generation is pending raises the count that
//!   generation needs, so a freshly spawned agent is part of the very next
//!   rendezvous.
//!
//! Waiters block on a [`tokio::sync::watch`] channel carrying the released
//! generation number, so a release can never be missed between unlocking
//! the state and starting to wait.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{trace, warn};

/// How an agent got through a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointPass {
    /// Waited at one barrier.
    Single,
    /// Scored below the threshold and waited at a second barrier.
    Double,
}

/// Generation-counted barrier with dynamic membership.
#[derive(Debug)]
pub struct CheckpointBarrier {
    state: Mutex<BarrierState>,
    released: watch::Sender<u64>,
}

#[derive(Debug, Default)]
struct BarrierState {
    /// Enrolled members that have not departed.
    members: usize,
    /// Members waiting in the current generation.
    arrived: usize,
    /// Number of generations released so far.
    generation: u64,
}

impl Default for CheckpointBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckpointBarrier {
    /// Create a barrier with no members.
    pub fn new() -> Self {
        let (released, _) = watch::channel(0);
        Self {
            state: Mutex::new(BarrierState::default()),
            released,
        }
    }

    /// Add a member. The returned guard departs when dropped.
    pub fn enroll(self: &Arc<Self>) -> Membership {
        let mut state = self.lock();
        state.members = state.members.saturating_add(1);
        trace!(members = state.members, "barrier member enrolled");
        drop(state);
        Membership {
            barrier: Arc::clone(self),
        }
    }

    /// Current member count.
    pub fn members(&self) -> usize {
        self.lock().members
    }

    /// Members waiting in the current generation.
    pub fn waiting(&self) -> usize {
        self.lock().arrived
    }

    /// Number of generations released so far.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Arrive and wait until every current member has arrived or departed.
    ///
    /// Returns the generation that was released.
    async fn arrive_and_wait(&self) -> u64 {
        let (pending, mut released) = {
            let mut state = self.lock();
            state.arrived = state.arrived.saturating_add(1);
            if state.arrived >= state.members {
                return self.release(&mut state);
            }
            (state.generation, self.released.subscribe())
        };

        // The sender lives inside `self`, so this only fails if the barrier
        // is torn down underneath a waiter.
        if released.wait_for(|g| *g > pending).await.is_err() {
            warn!(generation = pending, "checkpoint barrier closed while waiting");
        }
        pending.saturating_add(1)
    }

    fn depart(&self) {
        let mut state = self.lock();
        state.members = state.members.saturating_sub(1);
        trace!(members = state.members, "barrier member departed");
        if state.arrived > 0 && state.arrived >= state.members {
            self.release(&mut state);
        }
    }

    fn release(&self, state: &mut BarrierState) -> u64 {
        state.generation = state.generation.saturating_add(1);
        state.arrived = 0;
        self.released.send_replace(state.generation);
        trace!(generation = state.generation, "checkpoint released");
        state.generation
    }

    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One agent's place in a [`CheckpointBarrier`].
#[derive(Debug)]
pub struct Membership {
    barrier: Arc<CheckpointBarrier>,
}

impl Membership {
    /// Arrive at the barrier and wait for the rest of the cohort.
    ///
    /// Returns the generation that was released.
    pub async fn arrive_and_wait(&self) -> u64 {
        self.barrier.arrive_and_wait().await
    }

    /// The barrier this membership belongs to.
    pub const fn barrier(&self) -> &Arc<CheckpointBarrier> {
        &self.barrier
    }
}

impl Drop for Membership {
    fn drop(&mut self) {
        self.barrier.depart();
    }
}

/// Hold an agent at a checkpoint.
///
/// Every agent waits once. An agent whose `score` is below
/// `low_score_threshold` then waits a second time, holding the cohort at
/// the next rendezvous until everyone catches up with it.
pub async fn rendezvous_at_checkpoint(
    membership: &Membership,
    score: i64,
    low_score_threshold: i64,
) -> CheckpointPass {
    membership.arrive_and_wait().await;
    if score < low_score_threshold {
        membership.arrive_and_wait().await;
        CheckpointPass::Double
    } else {
        CheckpointPass::Single
    }
}
