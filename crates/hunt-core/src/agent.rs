//! A single exploring agent and its random-walk loop.
//!
//! Each agent owns its position, score, move count, and visited set
//! outright; none of that is shared. It touches shared state only through
//! the grid's guarded consume, the outcome state's score report, the
//! spawner, and its barrier membership.
//!
//! # Loop
//!
//! 1. Stop if no treasure is left on the board.
//! 2. Pick a random cardinal direction. Off-board or already-visited
//!    targets are rejected without counting as a move. When no unvisited
//!    neighbor remains, or too many consecutive picks are rejected, the
//!    agent stops as stuck instead of spinning.
//! 3. Move, consume the new cell, and react to what was there.
//! 4. Report the score.
//! 5. Every `checkpoint_interval` moves, rendezvous with the cohort.

use std::collections::HashSet;
use std::sync::Arc;

use hunt_types::{AgentId, CellKind, Direction, Position, TerminationReason};
use hunt_world::WorldError;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::barrier::{Membership, rendezvous_at_checkpoint};
use crate::config::HuntConfig;
use crate::coordinator::HuntContext;
use crate::events::HuntEvent;

/// Multiplier used to spread agent ids across the seed space.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

// -----------------------------------------------------------------------
// Spawn description
// -----------------------------------------------------------------------

/// What the coordinator needs to launch an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSpec {
    /// Identifier, unique within the run.
    pub id: AgentId,
    /// Agent whose resurrection stone spawned this one.
    pub parent: Option<AgentId>,
    /// Starting cell. `None` picks one at random.
    pub start: Option<Position>,
}

impl AgentSpec {
    /// An initial-cohort agent with a random start.
    pub const fn new(id: AgentId) -> Self {
        Self {
            id,
            parent: None,
            start: None,
        }
    }

    /// Fix the starting cell.
    pub const fn starting_at(mut self, start: Position) -> Self {
        self.start = Some(start);
        self
    }

    /// Mark the agent as spawned by `parent`.
    pub const fn child_of(mut self, parent: AgentId) -> Self {
        self.parent = Some(parent);
        self
    }
}

// -----------------------------------------------------------------------
// Policy
// -----------------------------------------------------------------------

/// Tunables shared by every agent in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorationPolicy {
    /// Moves between checkpoints.
    pub checkpoint_interval: u32,
    /// Agents scoring below this wait twice at a checkpoint.
    pub low_score_threshold: i64,
    /// Consecutive rejected move picks before an agent gives up.
    pub max_failed_moves: u32,
}

impl Default for ExplorationPolicy {
    fn default() -> Self {
        Self::from(&HuntConfig::default())
    }
}

impl From<&HuntConfig> for ExplorationPolicy {
    fn from(config: &HuntConfig) -> Self {
        Self {
            checkpoint_interval: config.checkpoint.interval,
            low_score_threshold: config.checkpoint.low_score_threshold,
            max_failed_moves: config.agents.max_failed_moves,
        }
    }
}

// -----------------------------------------------------------------------
// Report
// -----------------------------------------------------------------------

/// Final state of an agent once its task has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReport {
    /// The agent.
    pub id: AgentId,
    /// Agent that spawned it, if any.
    pub parent: Option<AgentId>,
    /// Final score.
    pub score: i64,
    /// Moves made.
    pub moves: u32,
    /// Treasures this agent consumed.
    pub treasures_collected: u32,
    /// Last cell occupied.
    pub position: Position,
    /// Why it stopped.
    pub reason: TerminationReason,
}

// -----------------------------------------------------------------------
// Explorer
// -----------------------------------------------------------------------

/// An agent's private state.
#[derive(Debug)]
pub struct Explorer {
    id: AgentId,
    parent: Option<AgentId>,
    position: Position,
    score: i64,
    moves: u32,
    treasures_collected: u32,
    visited: HashSet<Position>,
    rng: StdRng,
}

impl Explorer {
    /// Create an explorer on an `grid_size`×`grid_size` board.
    ///
    /// With a `seed`, the explorer's random stream depends only on the seed
    /// and its id. The starting cell is marked visited but not consumed.
    pub fn new(spec: &AgentSpec, grid_size: u32, seed: Option<u64>) -> Self {
        let mut rng = agent_rng(seed, spec.id);
        let position = spec.start.unwrap_or_else(|| {
            Position::new(
                rng.random_range(0..grid_size.max(1)),
                rng.random_range(0..grid_size.max(1)),
            )
        });
        let mut visited = HashSet::new();
        visited.insert(position);
        Self {
            id: spec.id,
            parent: spec.parent,
            position,
            score: 0,
            moves: 0,
            treasures_collected: 0,
            visited,
            rng,
        }
    }

    /// The agent's id.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Current cell.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current score.
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Moves made so far.
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    /// Whether the agent has stood on `position`.
    pub fn has_visited(&self, position: Position) -> bool {
        self.visited.contains(&position)
    }

    /// Whether any in-bounds neighbor is still unvisited.
    pub fn has_open_neighbor(&self, grid_size: u32) -> bool {
        Direction::ALL.iter().any(|&direction| {
            self.position
                .step(direction, grid_size)
                .is_some_and(|next| !self.visited.contains(&next))
        })
    }

    /// Pick the next cell by random walk.
    ///
    /// Returns `None` once the agent has nowhere to go: no unvisited
    /// neighbor exists, or `max_failed_moves` consecutive picks were
    /// rejected.
    pub fn choose_step(&mut self, grid_size: u32, max_failed_moves: u32) -> Option<Position> {
        let mut failures: u32 = 0;
        loop {
            let direction = *Direction::ALL.choose(&mut self.rng)?;
            if let Some(next) = self.position.step(direction, grid_size) {
                if !self.visited.contains(&next) {
                    return Some(next);
                }
            }
            failures = failures.saturating_add(1);
            if failures >= max_failed_moves || !self.has_open_neighbor(grid_size) {
                return None;
            }
        }
    }

    fn advance(&mut self, to: Position) {
        self.position = to;
        self.visited.insert(to);
        self.moves = self.moves.saturating_add(1);
    }

    /// Run the exploration loop until the agent terminates.
    ///
    /// The barrier membership is released when this returns, whether the
    /// agent finished normally or hit an error.
    pub(crate) async fn explore(
        mut self,
        ctx: Arc<HuntContext>,
        membership: Membership,
    ) -> Result<AgentReport, WorldError> {
        let grid_size = ctx.grid.size();
        let policy = ctx.policy;

        info!(
            agent_id = %self.id,
            parent = ?self.parent,
            position = %self.position,
            "agent exploring"
        );
        ctx.sink.on_event(&HuntEvent::AgentStarted {
            agent: self.id,
            parent: self.parent,
            position: self.position,
        });

        let reason = loop {
            if ctx.outcome.remaining_treasures() == 0 {
                break TerminationReason::TreasuresExhausted;
            }

            let Some(target) = self.choose_step(grid_size, policy.max_failed_moves) else {
                ctx.sink.on_event(&HuntEvent::AgentStuck {
                    agent: self.id,
                    position: self.position,
                    moves: self.moves,
                });
                break TerminationReason::Stuck;
            };
            self.advance(target);

            let cell = ctx.grid.consume(target, &ctx.outcome).await?;
            match cell.kind {
                CellKind::Treasure => {
                    self.score = self.score.saturating_add(i64::from(cell.value));
                    self.treasures_collected = self.treasures_collected.saturating_add(1);
                    ctx.sink.on_event(&HuntEvent::TreasureCollected {
                        agent: self.id,
                        position: target,
                        value: cell.value,
                        score: self.score,
                    });
                }
                CellKind::Trap => {
                    self.score = self.score.saturating_add(i64::from(cell.value));
                    ctx.sink.on_event(&HuntEvent::TrapTriggered {
                        agent: self.id,
                        position: target,
                        penalty: cell.value,
                        score: self.score,
                    });
                }
                CellKind::Resurrection => {
                    let spawned = ctx.spawner.spawn_child(self.id);
                    ctx.sink.on_event(&HuntEvent::ResurrectionFound {
                        agent: self.id,
                        position: target,
                        spawned,
                    });
                }
                CellKind::DeadlyTrap => {
                    ctx.sink.on_event(&HuntEvent::DeadlyTrap {
                        agent: self.id,
                        position: target,
                    });
                    break TerminationReason::Killed;
                }
                CellKind::Empty => {}
            }

            ctx.outcome.report_score(self.id, self.score).await;

            if self.moves.checked_rem(policy.checkpoint_interval) == Some(0) {
                let pass = rendezvous_at_checkpoint(
                    &membership,
                    self.score,
                    policy.low_score_threshold,
                )
                .await;
                ctx.sink.on_event(&HuntEvent::CheckpointHeld {
                    agent: self.id,
                    moves: self.moves,
                    score: self.score,
                    pass,
                });
            }

            tokio::task::yield_now().await;
        };

        drop(membership);

        debug!(
            agent_id = %self.id,
            score = self.score,
            moves = self.moves,
            reason = %reason,
            "agent finished"
        );
        ctx.sink.on_event(&HuntEvent::AgentFinished {
            agent: self.id,
            reason,
            score: self.score,
            moves: self.moves,
        });

        Ok(AgentReport {
            id: self.id,
            parent: self.parent,
            score: self.score,
            moves: self.moves,
            treasures_collected: self.treasures_collected,
            position: self.position,
            reason,
        })
    }
}

/// Build an agent's private random stream.
fn agent_rng(seed: Option<u64>, id: AgentId) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ id.into_inner().wrapping_mul(SEED_MIX)),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn explorer_at(x: u32, y: u32) -> Explorer {
        let spec = AgentSpec::new(AgentId(0)).starting_at(Position::new(x, y));
        Explorer::new(&spec, 3, Some(11))
    }

    #[test]
    fn start_cell_is_visited() {
        let explorer = explorer_at(1, 1);
        assert!(explorer.has_visited(Position::new(1, 1)));
        assert_eq!(explorer.moves(), 0);
        assert_eq!(explorer.score(), 0);
    }

    #[test]
    fn single_cell_grid_has_nowhere_to_go() {
        let spec = AgentSpec::new(AgentId(0)).starting_at(Position::new(0, 0));
        let mut explorer = Explorer::new(&spec, 1, Some(3));
        assert!(!explorer.has_open_neighbor(1));
        assert_eq!(explorer.choose_step(1, 64), None);
    }

    #[test]
    fn steps_are_adjacent_in_bounds_and_fresh() {
        let mut explorer = explorer_at(0, 0);
        let mut steps = 0;
        while let Some(next) = explorer.choose_step(3, 64) {
            assert!(next.within(3));
            assert!(!explorer.has_visited(next));
            let dx = next.x.abs_diff(explorer.position().x);
            let dy = next.y.abs_diff(explorer.position().y);
            assert_eq!(dx + dy, 1);
            explorer.advance(next);
            steps += 1;
        }
        assert!(steps >= 1);
        assert!(steps <= 8);
        assert_eq!(explorer.moves(), steps);
    }

    #[test]
    fn fully_explored_board_stops_the_agent() {
        let mut explorer = explorer_at(0, 0);
        explorer.advance(Position::new(0, 1));
        explorer.advance(Position::new(1, 1));
        explorer.advance(Position::new(1, 0));
        assert!(explorer.has_open_neighbor(3));
        explorer.advance(Position::new(2, 0));
        explorer.advance(Position::new(2, 1));
        explorer.advance(Position::new(2, 2));
        explorer.advance(Position::new(1, 2));
        explorer.advance(Position::new(0, 2));
        assert!(!explorer.has_open_neighbor(3));
        assert_eq!(explorer.choose_step(3, 1_000), None);
    }

    #[test]
    fn seeded_agents_pick_reproducible_starts() {
        let spec = AgentSpec::new(AgentId(7));
        let a = Explorer::new(&spec, 50, Some(42));
        let b = Explorer::new(&spec, 50, Some(42));
        assert_eq!(a.position(), b.position());
        assert!(a.position().within(50));
    }

    #[test]
    fn policy_follows_config() {
        let mut config = HuntConfig::default();
        config.checkpoint.interval = 3;
        config.checkpoint.low_score_threshold = 10;
        config.agents.max_failed_moves = 9;
        let policy = ExplorationPolicy::from(&config);
        assert_eq!(policy.checkpoint_interval, 3);
        assert_eq!(policy.low_score_threshold, 10);
        assert_eq!(policy.max_failed_moves, 9);
    }
}
