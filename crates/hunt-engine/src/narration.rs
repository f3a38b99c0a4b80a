//! Console narration of hunt events and the closing summary.

use hunt_core::{CheckpointPass, EventSink, HuntEvent, HuntResult};

/// Render an event as one narration line.
///
/// Starts, single-pass checkpoints, and finishes are logged but not
/// narrated, so they return `None`.
pub fn narrate(event: &HuntEvent) -> Option<String> {
    let line = match event {
        HuntEvent::TreasureCollected {
            agent,
            position,
            value,
            score,
        } => format!(
            "-> Adventurer {agent} collected treasure at {position} for +{value} points. New score: {score}"
        ),
        HuntEvent::TrapTriggered {
            agent,
            position,
            penalty,
            score,
        } => format!(
            "-> Adventurer {agent} hit a trap at {position} for {penalty} points. New score: {score}"
        ),
        HuntEvent::ResurrectionFound {
            agent,
            position,
            spawned,
        } => format!(
            "-> Adventurer {agent} found a Resurrection Stone at {position}. Spawning adventurer {spawned}."
        ),
        HuntEvent::DeadlyTrap { agent, position } => {
            format!("-> Adventurer {agent} encountered a Deadly Trap at {position}. Terminating.")
        }
        HuntEvent::CheckpointHeld {
            agent,
            score,
            pass: CheckpointPass::Double,
            ..
        } => format!("-> Adventurer {agent} is waiting at checkpoint with low score ({score})."),
        HuntEvent::AgentStuck {
            agent,
            position,
            moves,
        } => format!("-> Adventurer {agent} is stuck at {position} after {moves} moves."),
        HuntEvent::AgentStarted { .. }
        | HuntEvent::CheckpointHeld { .. }
        | HuntEvent::AgentFinished { .. } => return None,
    };
    Some(line)
}

/// Closing lines printed once every agent has finished.
pub fn summary(result: &HuntResult) -> Vec<String> {
    let winner = match result.winner {
        Some(winner) => format!(
            "-> Winner: Adventurer {winner} with score {}",
            result.best_score
        ),
        None => "-> No winner: no adventurer scored above zero".to_owned(),
    };
    vec![
        "> Treasure hunt completed.".to_owned(),
        winner,
        format!(
            "-> Treasures collected: {} of {}. Adventurers: {} ({} spawned).",
            result.treasures_collected(),
            result.initial_treasures,
            result.agents.len(),
            result.spawned
        ),
    ]
}

/// Prints narrated events to stdout as they happen.
#[derive(Debug, Clone, Copy, Default)]
pub struct NarrationSink;

impl EventSink for NarrationSink {
    fn on_event(&self, event: &HuntEvent) {
        if let Some(line) = narrate(event) {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use hunt_types::{AgentId, Position, RunId, TerminationReason};

    use super::*;

    fn result_with(winner: Option<AgentId>, best_score: i64) -> HuntResult {
        HuntResult {
            run_id: RunId::new(),
            winner,
            best_score,
            initial_treasures: 12,
            remaining_treasures: 3,
            spawned: 1,
            agents: Vec::new(),
        }
    }

    #[test]
    fn treasure_line() {
        let event = HuntEvent::TreasureCollected {
            agent: AgentId(3),
            position: Position::new(2, 5),
            value: 40,
            score: 90,
        };
        assert_eq!(
            narrate(&event).as_deref(),
            Some("-> Adventurer 3 collected treasure at (2,5) for +40 points. New score: 90")
        );
    }

    #[test]
    fn trap_line_shows_negative_penalty() {
        let event = HuntEvent::TrapTriggered {
            agent: AgentId(1),
            position: Position::new(0, 0),
            penalty: -15,
            score: -15,
        };
        assert_eq!(
            narrate(&event).as_deref(),
            Some("-> Adventurer 1 hit a trap at (0,0) for -15 points. New score: -15")
        );
    }

    #[test]
    fn only_low_score_checkpoints_are_narrated() {
        let held = |pass| HuntEvent::CheckpointHeld {
            agent: AgentId(2),
            moves: 10,
            score: 20,
            pass,
        };
        assert_eq!(narrate(&held(CheckpointPass::Single)), None);
        assert_eq!(
            narrate(&held(CheckpointPass::Double)).as_deref(),
            Some("-> Adventurer 2 is waiting at checkpoint with low score (20).")
        );
    }

    #[test]
    fn lifecycle_events_are_silent() {
        let started = HuntEvent::AgentStarted {
            agent: AgentId(0),
            parent: None,
            position: Position::new(1, 1),
        };
        let finished = HuntEvent::AgentFinished {
            agent: AgentId(0),
            reason: TerminationReason::Stuck,
            score: 0,
            moves: 4,
        };
        assert_eq!(narrate(&started), None);
        assert_eq!(narrate(&finished), None);
    }

    #[test]
    fn summary_names_the_winner() {
        let lines = summary(&result_with(Some(AgentId(4)), 130));
        assert_eq!(lines.first().map(String::as_str), Some("> Treasure hunt completed."));
        assert_eq!(
            lines.get(1).map(String::as_str),
            Some("-> Winner: Adventurer 4 with score 130")
        );
        assert_eq!(
            lines.get(2).map(String::as_str),
            Some("-> Treasures collected: 9 of 12. Adventurers: 0 (1 spawned).")
        );
    }

    #[test]
    fn summary_without_winner() {
        let lines = summary(&result_with(None, 0));
        assert!(lines.iter().any(|line| line.starts_with("-> No winner")));
    }
}
