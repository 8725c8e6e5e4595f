//! `DecisionMaker`: picks the best candidate action by benefit/cost.

use crate::domain::action::Action;
use crate::domain::state::State;

/// Selects among candidate actions by `benefit / max(cost, 0.1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionMaker;

impl DecisionMaker {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Picks the highest-scoring candidate. Ties resolve to the first in
    /// input order. An empty candidate list yields `maintain` at confidence
    /// 0.5.
    #[must_use]
    pub fn decide(&self, _current: &State, candidates: &[Action]) -> (Action, f64) {
        let Some(best) = candidates
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| {
                a.score()
                    .partial_cmp(&b.score())
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(ib.cmp(ia))
            })
            .map(|(_, action)| *action)
        else {
            return (Action::maintain(0.5), 0.5);
        };
        let confidence = (best.score() / 2.0).clamp(0.0, 1.0);
        (best, confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::action::ActionType;
    use std::time::Duration;

    fn state() -> State {
        State::new(0.0, Duration::from_millis(100), 0.5).unwrap()
    }

    #[test]
    fn empty_candidates_yield_maintain() {
        let (action, confidence) = DecisionMaker::new().decide(&state(), &[]);
        assert_eq!(action.kind, ActionType::Maintain);
        assert_eq!(confidence, 0.5);
    }

    #[test]
    fn picks_highest_score() {
        let low = Action::new(ActionType::Maintain, 0.0, 1.0, 1.0);
        let high = Action::new(ActionType::PhaseNudge, 0.5, 1.0, 4.0);
        let (chosen, _) = DecisionMaker::new().decide(&state(), &[low, high]);
        assert_eq!(chosen.kind, ActionType::PhaseNudge);
    }

    #[test]
    fn ties_resolve_to_first_input_order() {
        let first = Action::new(ActionType::PhaseNudge, 0.1, 1.0, 2.0);
        let second = Action::new(ActionType::FrequencyLock, 0.1, 1.0, 2.0);
        let (chosen, _) = DecisionMaker::new().decide(&state(), &[first, second]);
        assert_eq!(chosen.kind, ActionType::PhaseNudge);
    }

    #[test]
    fn confidence_is_clamped() {
        let huge = Action::new(ActionType::PhaseNudge, 0.1, 0.1, 100.0);
        let (_, confidence) = DecisionMaker::new().decide(&state(), &[huge]);
        assert_eq!(confidence, 1.0);
    }
}
