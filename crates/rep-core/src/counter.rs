//! Edge-triggered squat counter.

use serde::Serialize;

use crate::sink::OutputSink;

/// Whether the body is currently below squat depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SquatState {
    #[default]
    NotSquatting,
    Squatting,
}

impl SquatState {
    pub fn is_squatting(self) -> bool {
        self == SquatState::Squatting
    }
}

/// Two-state machine that counts each `NotSquatting -> Squatting` edge.
#[derive(Debug, Clone, Default)]
pub struct SquatStateMachine {
    state: SquatState,
    reps: u64,
}

impl SquatStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one frame. Returns the new total when a rep starts.
    pub fn step(&mut self, ratio: f64, threshold: f64) -> Option<u64> {
        let next = if ratio > threshold {
            SquatState::Squatting
        } else {
            SquatState::NotSquatting
        };

        let rep = match (self.state, next) {
            (SquatState::NotSquatting, SquatState::Squatting) => {
                self.reps += 1;
                Some(self.reps)
            }
            _ => None,
        };
        self.state = next;
        rep
    }

    pub fn state(&self) -> SquatState {
        self.state
    }

    pub fn reps(&self) -> u64 {
        self.reps
    }
}

/// Write a newly detected rep to the text and log sinks.
pub fn emit_rep(sink: &mut dyn OutputSink, total: u64) {
    sink.set_text(&total.to_string());
    sink.log_line(&format!("Squat Detected! Total Squats: {total}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn test_counts_rising_edges_only() {
        let mut machine = SquatStateMachine::new();
        let reps: Vec<Option<u64>> = [0.1, 0.2, 0.05, 0.3]
            .into_iter()
            .map(|ratio| machine.step(ratio, 0.15))
            .collect();
        assert_eq!(reps, vec![None, Some(1), None, Some(2)]);
        assert_eq!(machine.reps(), 2);
    }

    #[test]
    fn test_sustained_squat_counts_once() {
        let mut machine = SquatStateMachine::new();
        for _ in 0..20 {
            machine.step(0.3, 0.15);
        }
        assert_eq!(machine.reps(), 1);
        assert!(machine.state().is_squatting());
    }

    #[test]
    fn test_equal_to_threshold_is_not_squatting() {
        let mut machine = SquatStateMachine::new();
        assert_eq!(machine.step(0.15, 0.15), None);
        assert_eq!(machine.state(), SquatState::NotSquatting);
    }

    #[test]
    fn test_starts_not_squatting() {
        let mut machine = SquatStateMachine::new();
        assert_eq!(machine.state(), SquatState::NotSquatting);
        assert_eq!(machine.step(0.3, 0.15), Some(1));
    }

    #[test]
    fn test_emit_rep_writes_both_sinks() {
        let mut sink = MemorySink::default();
        emit_rep(&mut sink, 12);
        assert_eq!(sink.text(), Some("12"));
        assert_eq!(sink.lines(), &["Squat Detected! Total Squats: 12".to_string()]);
    }
}
