//! Regret-matching node for one information set (discounted CFR+).

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::SolverError;
use crate::game_state::{AbstractAction, Action, GameState};

/// Discount exponent applied to accumulated regret between visits.
pub const REGRET_DISCOUNT_EXP: f64 = 1.5;
/// Discount exponent applied to accumulated strategy mass between visits.
pub const STRATEGY_DISCOUNT_EXP: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct InfoSet {
    actions: Vec<(AbstractAction, Action)>,
    regret_sum: Vec<f64>,
    strategy_sum: Vec<f64>,
    last_t: u32,
}

impl InfoSet {
    /// Builds the node for the information set `state` is in. The action set
    /// is fixed from here on.
    pub fn new(state: &GameState) -> Self {
        let mut actions = Vec::with_capacity(6);
        state.legal_actions(&mut actions);
        debug_assert!(!actions.is_empty(), "information set without legal actions");
        let n = actions.len();
        InfoSet {
            actions,
            regret_sum: vec![0.0; n],
            strategy_sum: vec![0.0; n],
            last_t: 1,
        }
    }

    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn actions(&self) -> &[(AbstractAction, Action)] {
        &self.actions
    }

    pub fn regret_sum(&self) -> &[f64] {
        &self.regret_sum
    }

    pub fn strategy_sum(&self) -> &[f64] {
        &self.strategy_sum
    }

    pub fn last_t(&self) -> u32 {
        self.last_t
    }

    /// Writes the regret-matching strategy into `out`, replacing its contents.
    pub fn current_strategy(&self, out: &mut Vec<f64>) {
        out.clear();
        let positive_sum: f64 = self.regret_sum.iter().map(|r| r.max(0.0)).sum();
        if positive_sum > 0.0 {
            out.extend(self.regret_sum.iter().map(|r| r.max(0.0) / positive_sum));
        } else {
            let uniform = 1.0 / self.num_actions() as f64;
            out.resize(self.num_actions(), uniform);
        }
    }

    pub fn get_strategy(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.num_actions());
        self.current_strategy(&mut out);
        out
    }

    /// Discounts the stored regret by `(last_t / t)^1.5`, adds `deltas` and
    /// floors the result at zero.
    pub fn update_regret(&mut self, deltas: &[f64], t: u32) {
        if deltas.len() != self.regret_sum.len() {
            panic!(
                "{}",
                SolverError::ArithmeticPrecondition(format!(
                    "{} regret deltas for {} actions",
                    deltas.len(),
                    self.regret_sum.len()
                ))
            );
        }
        let discount = self.discount(t, REGRET_DISCOUNT_EXP);
        for (regret, delta) in self.regret_sum.iter_mut().zip(deltas) {
            *regret = (discount * *regret + delta).max(0.0);
        }
    }

    /// Discounts the accumulated strategy by `(last_t / t)^2` and adds the
    /// current strategy weighted by `reach_prob`.
    pub fn update_average_strategy(&mut self, reach_prob: f64, t: u32) {
        if !(0.0..=1.0).contains(&reach_prob) {
            panic!(
                "{}",
                SolverError::ArithmeticPrecondition(format!(
                    "reach probability {} outside [0, 1]",
                    reach_prob
                ))
            );
        }
        let discount = self.discount(t, STRATEGY_DISCOUNT_EXP);
        let sigma = self.get_strategy();
        for (mass, p) in self.strategy_sum.iter_mut().zip(sigma) {
            *mass = *mass * discount + reach_prob * p;
        }
    }

    /// Records `t` as the last iteration this node was visited.
    pub fn update_last_t(&mut self, t: u32) {
        self.last_t = t;
    }

    fn discount(&self, t: u32, exponent: f64) -> f64 {
        assert!(t > 0, "iteration clock starts at 1");
        (self.last_t as f64 / t as f64).powf(exponent)
    }

    /// Draws an action from the current strategy; returns it with its probability.
    pub fn sample_action<R: Rng>(&self, rng: &mut R) -> (Action, f64) {
        let strategy = self.get_strategy();
        let distribution = match WeightedIndex::new(&strategy) {
            Ok(distribution) => distribution,
            Err(e) => panic!(
                "{}",
                SolverError::ArithmeticPrecondition(format!("unsampleable strategy {:?}: {}", strategy, e))
            ),
        };
        let chosen = distribution.sample(rng);
        (self.actions[chosen].1, strategy[chosen])
    }

    /// Normalized accumulated strategy, uniform while no mass has accumulated.
    pub fn average_strategy(&self) -> Vec<f64> {
        let total: f64 = self.strategy_sum.iter().sum();
        if total > 0.0 {
            self.strategy_sum.iter().map(|s| s / total).collect()
        } else {
            vec![1.0 / self.num_actions() as f64; self.num_actions()]
        }
    }

    /// `(label, probability)` pairs of the average strategy, in action order.
    pub fn labeled_average_strategy(&self) -> Vec<(&'static str, f64)> {
        self.actions
            .iter()
            .zip(self.average_strategy())
            .map(|((abstract_action, _), p)| (abstract_action.label(), p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Deal;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// First preflop decision: fold, call, full_pot, 2x_pot.
    fn preflop_node() -> InfoSet {
        let mut state = GameState::new(Deal::new());
        let mut rng = StdRng::seed_from_u64(7);
        let _undo = state.apply_chance(&mut rng);
        InfoSet::new(&state)
    }

    #[test]
    fn initial_strategy_is_uniform() {
        let node = preflop_node();
        assert_eq!(node.num_actions(), 4);
        for p in node.get_strategy() {
            assert!((p - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn regret_matching_is_proportional_to_positive_regret() {
        let mut node = preflop_node();
        node.update_regret(&[3.0, 1.0, -4.0, 0.0], 1);
        let strategy = node.get_strategy();
        assert!((strategy[0] - 0.75).abs() < 1e-12);
        assert!((strategy[1] - 0.25).abs() < 1e-12);
        assert_eq!(strategy[2], 0.0);
        assert_eq!(strategy[3], 0.0);
    }

    #[test]
    fn regret_is_floored_at_zero() {
        let mut node = preflop_node();
        node.update_regret(&[-10.0, 5.0, 0.0, 0.0], 1);
        node.update_regret(&[3.0, -20.0, 0.0, 0.0], 1);
        assert_eq!(node.regret_sum(), &[3.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn regret_discount_uses_last_visit() {
        let mut node = preflop_node();
        node.update_regret(&[8.0, 0.0, 0.0, 0.0], 1);
        node.update_last_t(1);
        node.update_regret(&[0.0, 0.0, 0.0, 0.0], 4);
        // 8 * (1/4)^1.5 = 1
        assert!((node.regret_sum()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn average_strategy_discount_uses_last_visit() {
        let mut node = preflop_node();
        node.update_average_strategy(1.0, 1);
        node.update_last_t(1);
        node.update_average_strategy(0.0, 2);
        // 0.25 * (1/2)^2
        for &mass in node.strategy_sum() {
            assert!((mass - 0.0625).abs() < 1e-12);
        }
    }

    #[test]
    fn average_strategy_sums_to_one() {
        let mut node = preflop_node();
        for t in 1..20 {
            node.update_regret(&[t as f64, 1.0, -2.0, 0.5], t);
            node.update_average_strategy(0.5, t);
            node.update_last_t(t);
        }
        let total: f64 = node.average_strategy().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(node.average_strategy()[0] > node.average_strategy()[2]);
    }

    #[test]
    #[should_panic(expected = "regret deltas")]
    fn delta_length_mismatch_panics() {
        let mut node = preflop_node();
        node.update_regret(&[1.0], 1);
    }

    #[test]
    #[should_panic(expected = "reach probability")]
    fn reach_probability_out_of_range_panics() {
        let mut node = preflop_node();
        node.update_average_strategy(1.5, 1);
    }

    #[test]
    fn sampling_never_picks_zero_probability_action() {
        let mut node = preflop_node();
        node.update_regret(&[0.0, 2.0, 0.0, 0.0], 1);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let (action, prob) = node.sample_action(&mut rng);
            assert_eq!(action, Action::CALL);
            assert_eq!(prob, 1.0);
        }
    }

    #[test]
    fn sampling_follows_current_strategy() {
        let mut node = preflop_node();
        node.update_regret(&[3.0, 1.0, 0.0, 0.0], 1);
        let mut rng = StdRng::seed_from_u64(11);
        let draws = 4000;
        let mut folds = 0;
        for _ in 0..draws {
            let (action, prob) = node.sample_action(&mut rng);
            if action == Action::FOLD {
                folds += 1;
                assert!((prob - 0.75).abs() < 1e-12);
            } else {
                assert_eq!(action, Action::CALL);
                assert!((prob - 0.25).abs() < 1e-12);
            }
        }
        let frequency = folds as f64 / draws as f64;
        assert!((frequency - 0.75).abs() < 0.03, "fold frequency {}", frequency);
    }

    #[test]
    fn average_strategy_accumulates_current_strategy() {
        let mut node = preflop_node();
        node.update_regret(&[3.0, 1.0, 0.0, 0.0], 1);
        node.update_average_strategy(0.5, 1);
        assert_eq!(node.strategy_sum(), &[0.375, 0.125, 0.0, 0.0]);
    }

    #[test]
    fn labels_follow_action_order() {
        let node = preflop_node();
        let labels: Vec<&str> = node.labeled_average_strategy().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["fold", "call", "full_pot", "2x_pot"]);
    }
}
