//! Significant moments in a hunt, delivered to an [`EventSink`].
//!
//! Agents emit events from inside their own tasks, so sinks must be
//! `Send + Sync` and should not block for long.

use hunt_types::{AgentId, Position, TerminationReason};

use crate::barrier::CheckpointPass;

/// Something worth narrating happened to an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuntEvent {
    /// An agent began exploring.
    AgentStarted {
        /// The new agent.
        agent: AgentId,
        /// The agent whose resurrection stone spawned it, if any.
        parent: Option<AgentId>,
        /// Starting cell.
        position: Position,
    },
    /// An agent picked up a treasure.
    TreasureCollected {
        /// The finder.
        agent: AgentId,
        /// Where it was found.
        position: Position,
        /// Points gained.
        value: i32,
        /// The finder's score afterwards.
        score: i64,
    },
    /// An agent walked into a trap.
    TrapTriggered {
        /// The victim.
        agent: AgentId,
        /// Trap location.
        position: Position,
        /// Score delta (negative).
        penalty: i32,
        /// The victim's score afterwards.
        score: i64,
    },
    /// An agent found a resurrection stone and spawned a new agent.
    ResurrectionFound {
        /// The finder.
        agent: AgentId,
        /// Stone location.
        position: Position,
        /// Id given to the spawned agent.
        spawned: AgentId,
    },
    /// An agent stepped on a deadly trap and stopped.
    DeadlyTrap {
        /// The victim.
        agent: AgentId,
        /// Trap location.
        position: Position,
    },
    /// An agent got through a checkpoint.
    CheckpointHeld {
        /// The agent.
        agent: AgentId,
        /// Moves made so far.
        moves: u32,
        /// Score at the checkpoint.
        score: i64,
        /// Whether it waited once or twice.
        pass: CheckpointPass,
    },
    /// An agent ran out of legal moves.
    AgentStuck {
        /// The agent.
        agent: AgentId,
        /// Where it got stuck.
        position: Position,
        /// Moves made before getting stuck.
        moves: u32,
    },
    /// An agent stopped exploring.
    AgentFinished {
        /// The agent.
        agent: AgentId,
        /// Why it stopped.
        reason: TerminationReason,
        /// Final score.
        score: i64,
        /// Total moves made.
        moves: u32,
    },
}

impl HuntEvent {
    /// The agent the event is about.
    pub const fn agent(&self) -> AgentId {
        match self {
            Self::AgentStarted { agent, .. }
            | Self::TreasureCollected { agent, .. }
            | Self::TrapTriggered { agent, .. }
            | Self::ResurrectionFound { agent, .. }
            | Self::DeadlyTrap { agent, .. }
            | Self::CheckpointHeld { agent, .. }
            | Self::AgentStuck { agent, .. }
            | Self::AgentFinished { agent, .. } => *agent,
        }
    }
}

/// Receiver of hunt events.
pub trait EventSink: Send + Sync {
    /// Called from the emitting agent's task.
    fn on_event(&self, event: &HuntEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn on_event(&self, _event: &HuntEvent) {}
}
