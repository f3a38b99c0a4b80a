//! End-to-end hunts over hand-built and generated grids.
//!
//! Hand-built boards pin down exact outcomes (single treasure, deadly
//! neighbors, a resurrection stone). Generated boards run large cohorts
//! on a multi-threaded runtime to check the shared-state properties that
//! must hold under any interleaving.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hunt_core::{
    AgentSpec, Coordinator, EventSink, ExplorationPolicy, HuntConfig, HuntEvent, HuntResult,
};
use hunt_types::{AgentId, Cell, Position, TerminationReason};
use hunt_world::{GridLayout, GridStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::timeout;

const LIMIT: Duration = Duration::from_secs(30);

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<HuntEvent>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<HuntEvent> {
        self.events.lock().unwrap().clone()
    }

    fn count(&self, pred: impl Fn(&HuntEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&self, event: &HuntEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn grid(size: u32, cells: Vec<Cell>) -> Arc<GridStore> {
    Arc::new(GridStore::from_cells(size, cells).unwrap())
}

async fn run_single(
    grid: Arc<GridStore>,
    start: Position,
    sink: Arc<RecordingSink>,
) -> HuntResult {
    let coordinator = Coordinator::new(&HuntConfig::default(), grid).with_sink(sink);
    let cohort = vec![AgentSpec::new(AgentId(0)).starting_at(start)];
    timeout(LIMIT, coordinator.run(cohort))
        .await
        .expect("hunt timed out")
        .unwrap()
}

#[tokio::test]
async fn single_cell_grid_leaves_agent_stuck() {
    let sink = Arc::new(RecordingSink::default());
    let board = grid(1, vec![Cell::treasure(42)]);
    let result = run_single(board, Position::new(0, 0), Arc::clone(&sink)).await;

    let agent = result.agent(AgentId(0)).unwrap();
    assert_eq!(agent.reason, TerminationReason::Stuck);
    assert_eq!(agent.moves, 0);
    assert_eq!(result.remaining_treasures, 1);
    assert_eq!(result.best_score, 0);
    assert_eq!(result.winner, None);
    assert_eq!(sink.count(|e| matches!(e, HuntEvent::AgentStuck { .. })), 1);
}

#[tokio::test]
async fn lone_agent_finds_the_only_treasure() {
    let sink = Arc::new(RecordingSink::default());
    let board = grid(
        2,
        vec![Cell::EMPTY, Cell::treasure(30), Cell::EMPTY, Cell::EMPTY],
    );
    let result = run_single(board, Position::new(0, 0), Arc::clone(&sink)).await;

    assert_eq!(result.best_score, 30);
    assert_eq!(result.winner, Some(AgentId(0)));
    assert_eq!(result.remaining_treasures, 0);
    assert_eq!(result.treasures_collected(), 1);

    let agent = result.agent(AgentId(0)).unwrap();
    assert_eq!(agent.score, 30);
    assert_eq!(agent.treasures_collected, 1);
    assert_eq!(agent.reason, TerminationReason::TreasuresExhausted);
    assert!(sink.events().contains(&HuntEvent::TreasureCollected {
        agent: AgentId(0),
        position: Position::new(0, 1),
        value: 30,
        score: 30,
    }));
}

#[tokio::test]
async fn deadly_neighbors_end_the_agent_on_first_move() {
    let sink = Arc::new(RecordingSink::default());
    let board = grid(
        2,
        vec![
            Cell::EMPTY,
            Cell::deadly_trap(),
            Cell::deadly_trap(),
            Cell::treasure(40),
        ],
    );
    let result = run_single(board, Position::new(0, 0), Arc::clone(&sink)).await;

    let agent = result.agent(AgentId(0)).unwrap();
    assert_eq!(agent.reason, TerminationReason::Killed);
    assert_eq!(agent.moves, 1);
    assert_eq!(agent.score, 0);
    assert_eq!(result.remaining_treasures, 1);
    assert_eq!(result.winner, None);
    assert_eq!(sink.count(|e| matches!(e, HuntEvent::DeadlyTrap { .. })), 1);
    assert_eq!(
        sink.count(|e| matches!(e, HuntEvent::TreasureCollected { .. })),
        0
    );
}

#[tokio::test]
async fn trap_lowers_score_without_being_consumed() {
    let sink = Arc::new(RecordingSink::default());
    // Treasure under the start cell keeps the hunt alive while the agent
    // walks the rest of the board.
    let board = grid(
        2,
        vec![Cell::treasure(50), Cell::trap(20), Cell::trap(20), Cell::EMPTY],
    );
    let board_handle = Arc::clone(&board);
    let result = run_single(board, Position::new(0, 0), Arc::clone(&sink)).await;

    let agent = result.agent(AgentId(0)).unwrap();
    assert_eq!(agent.reason, TerminationReason::Stuck);
    assert_eq!(agent.moves, 3);
    assert_eq!(agent.score, -40);
    assert_eq!(result.winner, None);
    assert_eq!(
        board_handle.cell_at(Position::new(0, 1)).await.unwrap(),
        Cell::trap(20)
    );
    assert_eq!(sink.count(|e| matches!(e, HuntEvent::TrapTriggered { .. })), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn resurrection_adds_exactly_one_agent_and_is_joined() {
    let sink = Arc::new(RecordingSink::default());
    // The treasure sits under the parent's start cell, which the parent
    // never consumes, so the parent keeps walking until it reaches the stone.
    let board = grid(
        2,
        vec![
            Cell::treasure(25),
            Cell::resurrection(),
            Cell::EMPTY,
            Cell::EMPTY,
        ],
    );
    let result = run_single(board, Position::new(0, 0), Arc::clone(&sink)).await;

    assert_eq!(result.agents.len(), 2);
    assert_eq!(result.spawned, 1);
    let child = result.agent(AgentId(1)).expect("spawned agent was joined");
    assert_eq!(child.parent, Some(AgentId(0)));
    assert_eq!(
        result.agents.iter().map(|a| a.treasures_collected).sum::<u32>(),
        result.treasures_collected()
    );
    assert_eq!(
        sink.count(|e| matches!(
            e,
            HuntEvent::ResurrectionFound {
                agent: AgentId(0),
                spawned: AgentId(1),
                ..
            }
        )),
        1
    );
    assert_eq!(
        sink.count(|e| matches!(
            e,
            HuntEvent::AgentStarted {
                parent: Some(AgentId(0)),
                ..
            }
        )),
        1
    );
}

#[tokio::test]
async fn off_board_start_is_rejected() {
    let coordinator = Coordinator::new(&HuntConfig::default(), grid(1, vec![Cell::EMPTY]));
    let cohort = vec![AgentSpec::new(AgentId(0)).starting_at(Position::new(3, 0))];
    assert!(coordinator.run(cohort).await.is_err());
}

#[tokio::test]
async fn board_without_treasure_ends_immediately() {
    let board = Arc::new(GridStore::empty(4).unwrap());
    let result = Coordinator::new(&HuntConfig::default(), board)
        .run_cohort(3)
        .await
        .unwrap();
    assert_eq!(result.agents.len(), 3);
    assert!(result.agents.iter().all(|a| a.moves == 0));
    assert!(
        result
            .agents
            .iter()
            .all(|a| a.reason == TerminationReason::TreasuresExhausted)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_treasure_has_exactly_one_finder() {
    let size = 8;
    let board = grid(size, vec![Cell::treasure(10); 64]);
    let mut config = HuntConfig::default();
    config.grid.seed = Some(7);
    let sink = Arc::new(RecordingSink::default());

    let result = timeout(
        LIMIT,
        Coordinator::new(&config, board)
            .with_sink(Arc::clone(&sink) as Arc<dyn EventSink>)
            .run_cohort(8),
    )
    .await
    .expect("hunt timed out")
    .unwrap();

    let collected: u32 = result.agents.iter().map(|a| a.treasures_collected).sum();
    assert_eq!(collected, result.treasures_collected());
    assert_eq!(collected + result.remaining_treasures, 64);
    for agent in &result.agents {
        assert_eq!(agent.score, i64::from(agent.treasures_collected) * 10);
    }

    // No cell was reported as found twice.
    let mut found: Vec<Position> = sink
        .events()
        .iter()
        .filter_map(|e| match e {
            HuntEvent::TreasureCollected { position, .. } => Some(*position),
            _ => None,
        })
        .collect();
    let total = found.len();
    found.sort();
    found.dedup();
    assert_eq!(found.len(), total);
    assert_eq!(u32::try_from(total).unwrap(), collected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn generated_hunt_keeps_shared_state_consistent() {
    let mut config = HuntConfig::default();
    config.grid.seed = Some(2024);
    config.checkpoint.interval = 2;
    let mut rng = StdRng::seed_from_u64(2024);
    let board = Arc::new(GridStore::generate(12, &GridLayout::default(), &mut rng).unwrap());
    let sink = Arc::new(RecordingSink::default());

    let coordinator = Coordinator::new(&config, board).with_sink(Arc::clone(&sink) as Arc<dyn EventSink>);
    let outcome = coordinator.outcome();

    // Sample the shared counters while the hunt runs.
    let done = Arc::new(AtomicBool::new(false));
    let watcher = {
        let done = Arc::clone(&done);
        let outcome = Arc::clone(&outcome);
        tokio::spawn(async move {
            let mut remaining = Vec::new();
            let mut best = Vec::new();
            while !done.load(Ordering::Acquire) {
                remaining.push(outcome.remaining_treasures());
                best.push(outcome.leader().await.best_score);
                tokio::task::yield_now().await;
            }
            (remaining, best)
        })
    };

    let result = timeout(LIMIT, coordinator.run_cohort(6))
        .await
        .expect("hunt deadlocked")
        .unwrap();
    done.store(true, Ordering::Release);
    let (remaining, best) = watcher.await.unwrap();

    assert!(remaining.windows(2).all(|w| w[0] >= w[1]));
    assert!(best.windows(2).all(|w| w[0] <= w[1]));

    let collected: u32 = result.agents.iter().map(|a| a.treasures_collected).sum();
    assert_eq!(collected, result.treasures_collected());
    assert_eq!(
        usize::try_from(result.spawned).unwrap(),
        sink.count(|e| matches!(e, HuntEvent::ResurrectionFound { .. }))
    );
    assert_eq!(result.agents.len(), 6 + usize::try_from(result.spawned).unwrap());

    // Ids are unique across the initial cohort and spawned agents.
    let mut ids: Vec<AgentId> = result.agents.iter().map(|a| a.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), result.agents.len());

    match result.winner {
        Some(winner) => {
            assert!(result.best_score > 0);
            assert!(result.agent(winner).is_some());
        }
        None => assert_eq!(result.best_score, 0),
    }
    let best_final = result.agents.iter().map(|a| a.score).max().unwrap_or(0);
    assert!(result.best_score >= best_final);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn low_scorers_double_wait_without_deadlock() {
    let mut config = HuntConfig::default();
    config.grid.seed = Some(99);
    let policy = ExplorationPolicy {
        checkpoint_interval: 1,
        low_score_threshold: i64::MAX,
        max_failed_moves: 32,
    };
    let mut rng = StdRng::seed_from_u64(99);
    let board = Arc::new(GridStore::generate(10, &GridLayout::default(), &mut rng).unwrap());
    let sink = Arc::new(RecordingSink::default());

    let result = timeout(
        LIMIT,
        Coordinator::new(&config, board)
            .with_policy(policy)
            .with_sink(Arc::clone(&sink) as Arc<dyn EventSink>)
            .run_cohort(5),
    )
    .await
    .expect("checkpoint rendezvous deadlocked")
    .unwrap();

    assert!(result.agents.len() >= 5);
    let singles = sink.count(|e| {
        matches!(
            e,
            HuntEvent::CheckpointHeld {
                pass: hunt_core::CheckpointPass::Single,
                ..
            }
        )
    });
    assert_eq!(singles, 0);
}
