//! Process-wide outcome tracking: the leading score and the number of
//! treasures still on the board.
//!
//! The best score and the winner are held together behind one
//! [`tokio::sync::Mutex`] so that no reader ever sees a new score paired
//! with a stale winner. The remaining-treasure counter is an atomic that
//! only ever counts down, and only from inside the grid's consume step.

use std::sync::atomic::{AtomicU32, Ordering};

use hunt_types::AgentId;
use tokio::sync::Mutex;
use tracing::debug;

/// A consistent snapshot of the leading agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Leader {
    /// Highest score reported so far. Starts at zero.
    pub best_score: i64,
    /// Agent that reported `best_score`, if any agent has beaten zero.
    pub winner: Option<AgentId>,
}

/// Shared outcome state, owned by the coordinator and handed to every
/// agent behind an [`std::sync::Arc`].
#[derive(Debug)]
pub struct OutcomeState {
    /// Running maximum pair.
    leader: Mutex<Leader>,
    /// Treasures not yet consumed.
    remaining_treasures: AtomicU32,
}

impl OutcomeState {
    /// Create outcome state for a board holding `remaining_treasures` treasures.
    pub fn new(remaining_treasures: u32) -> Self {
        Self {
            leader: Mutex::new(Leader::default()),
            remaining_treasures: AtomicU32::new(remaining_treasures),
        }
    }

    /// Offer `score` as a candidate best score for `agent`.
    ///
    /// The lead only changes on a strictly greater score. Returns `true`
    /// when `agent` took the lead.
    pub async fn report_score(&self, agent: AgentId, score: i64) -> bool {
        let mut leader = self.leader.lock().await;
        if score > leader.best_score {
            leader.best_score = score;
            leader.winner = Some(agent);
            debug!(agent_id = %agent, score, "new leader");
            true
        } else {
            false
        }
    }

    /// Snapshot of the current leader.
    pub async fn leader(&self) -> Leader {
        *self.leader.lock().await
    }

    /// Snapshot of the remaining-treasure counter.
    pub fn remaining_treasures(&self) -> u32 {
        self.remaining_treasures.load(Ordering::Acquire)
    }

    /// Count one treasure as taken and return how many are left.
    ///
    /// Saturates at zero.
    pub fn take_treasure(&self) -> u32 {
        let previous = self
            .remaining_treasures
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(1))
            })
            .unwrap_or_else(|n| n);
        previous.saturating_sub(1)
    }
}
