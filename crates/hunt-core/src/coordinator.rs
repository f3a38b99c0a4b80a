//! Task scheduling for a hunt: launching the cohort, admitting agents
//! spawned mid-run, and joining the whole, possibly still growing, set.
//!
//! Agents run as tokio tasks in one [`JoinSet`]. An agent that finds a
//! resurrection stone cannot reach the join set directly, so it enrolls
//! the newcomer in the checkpoint barrier and sends it to the coordinator
//! over an unbounded channel. The coordinator services that channel and
//! the join set together and only returns once both are drained.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hunt_types::{AgentId, RunId};
use hunt_world::{GridStore, OutcomeState, WorldError};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{info, warn};

use crate::agent::{AgentReport, AgentSpec, ExplorationPolicy, Explorer};
use crate::barrier::{CheckpointBarrier, Membership};
use crate::config::HuntConfig;
use crate::events::{EventSink, NoOpSink};

/// Errors that can occur while running a hunt.
#[derive(Debug, thiserror::Error)]
pub enum HuntError {
    /// An agent hit a grid error.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// An agent task panicked or was cancelled.
    #[error("agent task failed: {message}")]
    AgentTask {
        /// Description of the task failure.
        message: String,
    },
}

impl From<JoinError> for HuntError {
    fn from(err: JoinError) -> Self {
        Self::AgentTask {
            message: err.to_string(),
        }
    }
}

/// Outcome of a completed hunt.
#[derive(Debug, Clone)]
pub struct HuntResult {
    /// Identifier of this run.
    pub run_id: RunId,
    /// Agent holding the best score, if anyone scored above zero.
    pub winner: Option<AgentId>,
    /// Best score reported during the run.
    pub best_score: i64,
    /// Treasures on the board at the start.
    pub initial_treasures: u32,
    /// Treasures nobody reached.
    pub remaining_treasures: u32,
    /// Number of agents spawned by resurrection stones.
    pub spawned: u32,
    /// Every agent that ran, ordered by id.
    pub agents: Vec<AgentReport>,
}

impl HuntResult {
    /// Treasures consumed during the run.
    pub const fn treasures_collected(&self) -> u32 {
        self.initial_treasures.saturating_sub(self.remaining_treasures)
    }

    /// Report for one agent.
    pub fn agent(&self, id: AgentId) -> Option<&AgentReport> {
        self.agents.iter().find(|report| report.id == id)
    }
}

// -----------------------------------------------------------------------
// Shared context
// -----------------------------------------------------------------------

/// An agent waiting to be launched, already counted by the barrier.
pub(crate) struct PendingAgent {
    spec: AgentSpec,
    membership: Membership,
}

/// Hands out fresh ids and forwards spawned agents to the coordinator.
pub(crate) struct AgentSpawner {
    sender: mpsc::UnboundedSender<PendingAgent>,
    barrier: Arc<CheckpointBarrier>,
    next_id: AtomicU64,
}

impl AgentSpawner {
    /// Enroll and queue a new agent spawned by `parent`. Returns its id.
    pub(crate) fn spawn_child(&self, parent: AgentId) -> AgentId {
        let id = AgentId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let pending = PendingAgent {
            spec: AgentSpec::new(id).child_of(parent),
            membership: self.barrier.enroll(),
        };
        if self.sender.send(pending).is_err() {
            // The membership travels with the rejected message and is
            // dropped here, so the barrier does not wait for it.
            warn!(agent_id = %id, parent = %parent, "coordinator gone, spawn dropped");
        } else {
            info!(agent_id = %id, parent = %parent, "agent spawned");
        }
        id
    }
}

/// Everything an agent task shares with the rest of the run.
pub(crate) struct HuntContext {
    pub(crate) grid: Arc<GridStore>,
    pub(crate) outcome: Arc<OutcomeState>,
    pub(crate) spawner: AgentSpawner,
    pub(crate) sink: Arc<dyn EventSink>,
    pub(crate) policy: ExplorationPolicy,
    pub(crate) seed: Option<u64>,
}

// -----------------------------------------------------------------------
// Coordinator
// -----------------------------------------------------------------------

/// Runs one hunt over one grid.
pub struct Coordinator {
    grid: Arc<GridStore>,
    outcome: Arc<OutcomeState>,
    sink: Arc<dyn EventSink>,
    policy: ExplorationPolicy,
    seed: Option<u64>,
}

impl Coordinator {
    /// Prepare a hunt over `grid` using the agent and checkpoint settings
    /// from `config`.
    pub fn new(config: &HuntConfig, grid: Arc<GridStore>) -> Self {
        let outcome = Arc::new(OutcomeState::new(grid.treasure_count()));
        Self {
            grid,
            outcome,
            sink: Arc::new(NoOpSink),
            policy: ExplorationPolicy::from(config),
            seed: config.grid.seed,
        }
    }

    /// Deliver events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Override the exploration policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: ExplorationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The shared outcome state, for observing a run in progress.
    pub fn outcome(&self) -> Arc<OutcomeState> {
        Arc::clone(&self.outcome)
    }

    /// The shared grid.
    pub const fn grid(&self) -> &Arc<GridStore> {
        &self.grid
    }

    /// Run `count` agents with ids `0..count` and random starts.
    ///
    /// # Errors
    ///
    /// See [`Coordinator::run`].
    pub async fn run_cohort(self, count: u32) -> Result<HuntResult, HuntError> {
        let cohort = (0..u64::from(count))
            .map(|id| AgentSpec::new(AgentId(id)))
            .collect();
        self.run(cohort).await
    }

    /// Run the hunt to completion.
    ///
    /// Every initial agent is enrolled in the checkpoint barrier before any
    /// of them starts, so the first rendezvous waits for the full cohort.
    /// Agents spawned during the run get ids above the largest initial id.
    /// Returns after every agent, including spawned ones, has finished.
    ///
    /// # Errors
    ///
    /// Returns [`HuntError::World`] if an initial start position is off the
    /// board or an agent hits a grid error, and [`HuntError::AgentTask`] if
    /// an agent task panics. Remaining agents are still joined first.
    pub async fn run(self, initial: Vec<AgentSpec>) -> Result<HuntResult, HuntError> {
        let run_id = RunId::new();
        let size = self.grid.size();
        for spec in &initial {
            if let Some(start) = spec.start.filter(|start| !start.within(size)) {
                return Err(WorldError::OutOfBounds {
                    position: start,
                    size,
                }
                .into());
            }
        }

        let barrier = Arc::new(CheckpointBarrier::new());
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let first_spawn_id = initial
            .iter()
            .map(|spec| spec.id.into_inner().saturating_add(1))
            .max()
            .unwrap_or(0);

        let ctx = Arc::new(HuntContext {
            grid: Arc::clone(&self.grid),
            outcome: Arc::clone(&self.outcome),
            spawner: AgentSpawner {
                sender,
                barrier: Arc::clone(&barrier),
                next_id: AtomicU64::new(first_spawn_id),
            },
            sink: Arc::clone(&self.sink),
            policy: self.policy,
            seed: self.seed,
        });

        info!(
            run_id = %run_id,
            grid_size = size,
            treasures = self.grid.treasure_count(),
            agents = initial.len(),
            "hunt starting"
        );

        let cohort: Vec<PendingAgent> = initial
            .into_iter()
            .map(|spec| PendingAgent {
                spec,
                membership: barrier.enroll(),
            })
            .collect();

        let mut tasks = JoinSet::new();
        for pending in cohort {
            launch(&mut tasks, &ctx, pending);
        }

        let mut reports = Vec::new();
        let mut failure: Option<HuntError> = None;
        loop {
            tokio::select! {
                Some(pending) = receiver.recv() => launch(&mut tasks, &ctx, pending),
                joined = tasks.join_next() => match joined {
                    Some(Ok(Ok(report))) => reports.push(report),
                    Some(Ok(Err(err))) => {
                        warn!(run_id = %run_id, error = %err, "agent failed");
                        failure.get_or_insert(err.into());
                    }
                    Some(Err(err)) => {
                        warn!(run_id = %run_id, error = %err, "agent task aborted");
                        failure.get_or_insert(err.into());
                    }
                    // Spawn requests are only sent by running agents, so an
                    // empty join set plus an empty queue means the run is over.
                    None => match receiver.try_recv() {
                        Ok(pending) => launch(&mut tasks, &ctx, pending),
                        Err(_) => break,
                    },
                },
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        reports.sort_by_key(|report| report.id);
        let leader = self.outcome.leader().await;
        let spawned = reports.iter().filter(|r| r.parent.is_some()).count();
        let result = HuntResult {
            run_id,
            winner: leader.winner,
            best_score: leader.best_score,
            initial_treasures: self.grid.treasure_count(),
            remaining_treasures: self.outcome.remaining_treasures(),
            spawned: u32::try_from(spawned).unwrap_or(u32::MAX),
            agents: reports,
        };

        info!(
            run_id = %run_id,
            winner = ?result.winner,
            best_score = result.best_score,
            remaining_treasures = result.remaining_treasures,
            agents = result.agents.len(),
            spawned = result.spawned,
            "hunt completed"
        );
        Ok(result)
    }
}

fn launch(
    tasks: &mut JoinSet<Result<AgentReport, WorldError>>,
    ctx: &Arc<HuntContext>,
    pending: PendingAgent,
) {
    let ctx = Arc::clone(ctx);
    let PendingAgent { spec, membership } = pending;
    tasks.spawn(async move {
        let explorer = Explorer::new(&spec, ctx.grid.size(), ctx.seed);
        explorer.explore(ctx, membership).await
    });
}
