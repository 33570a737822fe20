//! External-sampling Monte Carlo CFR over the full heads-up game.
//!
//! Each iteration walks the tree once per player. Chance and the opponent's
//! decisions are sampled; the traversing player's decisions are branched over
//! every legal action and only the traversing player's nodes are updated.
//! The single root `GameState` is mutated on the way down and restored by
//! undo on the way back up.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::buffer_pool::BufferPool;
use crate::game_state::GameState;
use crate::info_set::InfoSet;
use crate::packing::{BuildInfoKeyHasher, InfoKey};

pub type RegretTable = HashMap<InfoKey, InfoSet, BuildInfoKeyHasher>;

/// Buffers of each kind created up front; a hand rarely nests deeper.
const POOL_DEPTH: usize = 64;

#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub seed: u64,
    /// Entries reserved per player table so training does not rehash.
    pub table_capacity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            seed: 12345,
            table_capacity: 5_000_000,
        }
    }
}

/// Node counters gathered during traversal. Purely informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraversalStats {
    pub terminal_nodes: u64,
    pub chance_nodes: u64,
    pub sampled_nodes: u64,
    pub branched_nodes: u64,
    pub info_sets_created: u64,
}

pub struct Solver {
    state: GameState,
    tables: [RegretTable; 2],
    rng: StdRng,
    pool: BufferPool,
    iterations: u32,
    stats: TraversalStats,
}

/// Finds or creates the node for `key`. Takes fields separately so the
/// caller can keep using the RNG while holding the node.
fn lookup<'a>(
    tables: &'a mut [RegretTable; 2],
    stats: &mut TraversalStats,
    state: &GameState,
    player: usize,
    key: InfoKey,
) -> &'a mut InfoSet {
    tables[player].entry(key).or_insert_with(|| {
        stats.info_sets_created += 1;
        InfoSet::new(state)
    })
}

impl Solver {
    pub fn new(state: GameState, config: &SolverConfig) -> Self {
        let table = || RegretTable::with_capacity_and_hasher(config.table_capacity, Default::default());
        Solver {
            state,
            tables: [table(), table()],
            rng: StdRng::seed_from_u64(config.seed),
            pool: BufferPool::preallocated(POOL_DEPTH),
            iterations: 0,
            stats: TraversalStats::default(),
        }
    }

    /// Runs `num_iterations` iterations, each traversing once for player 0
    /// then once for player 1. Successive calls continue the iteration clock.
    pub fn train(&mut self, num_iterations: u32) {
        for _ in 0..num_iterations {
            let t = self.iterations + 1;
            for player in 0..2 {
                self.traverse(player, 1.0, 1.0, t);
            }
            self.iterations = t;
        }
        log::debug!(
            "trained to iteration {}: {} / {} info sets, {:?}",
            self.iterations,
            self.tables[0].len(),
            self.tables[1].len(),
            self.stats
        );
    }

    fn traverse(&mut self, player: usize, pi_own: f64, pi_opp: f64, t: u32) -> f64 {
        if self.state.is_terminal() {
            self.stats.terminal_nodes += 1;
            return self.state.get_rewards(player);
        }

        if self.state.is_chance_node() {
            self.stats.chance_nodes += 1;
            let undo = self.state.apply_chance(&mut self.rng);
            let utility = self.traverse(player, pi_own, pi_opp, t);
            self.state.undo_chance(undo);
            return utility;
        }

        let acting = self.state.active_player();
        let key = self.state.get_id(acting);

        if acting != player {
            self.stats.sampled_nodes += 1;
            let node = lookup(&mut self.tables, &mut self.stats, &self.state, acting, key);
            let (action, prob) = node.sample_action(&mut self.rng);
            let undo = self.state.apply_action(action);
            let utility = self.traverse(player, pi_own, pi_opp * prob, t);
            self.state.undo_action(undo);
            return utility;
        }

        self.stats.branched_nodes += 1;
        let mut actions = self.pool.actions.take();
        let mut probs = self.pool.probs.take();
        let mut deltas = self.pool.deltas.take();
        {
            let node = lookup(&mut self.tables, &mut self.stats, &self.state, player, key);
            actions.extend_from_slice(node.actions());
            node.current_strategy(&mut probs);
        }

        let mut node_utility = 0.0;
        for (&(_, action), &prob) in actions.iter().zip(probs.iter()) {
            let undo = self.state.apply_action(action);
            let utility = self.traverse(player, pi_own * prob, pi_opp, t);
            self.state.undo_action(undo);
            node_utility += prob * utility;
            deltas.push(utility);
        }
        for delta in deltas.iter_mut() {
            *delta = pi_opp * (*delta - node_utility);
        }

        let node = lookup(&mut self.tables, &mut self.stats, &self.state, player, key);
        node.update_regret(&deltas, t);
        node.update_average_strategy(pi_own, t);
        node.update_last_t(t);

        self.pool.actions.give(actions);
        self.pool.probs.give(probs);
        self.pool.deltas.give(deltas);

        node_utility
    }

    // -----------------------------------------------------------------------
    // Read-only views
    // -----------------------------------------------------------------------

    /// Completed iterations across all `train` calls.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn stats(&self) -> &TraversalStats {
        &self.stats
    }

    /// The root state; fully unwound whenever `train` is not running.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn table(&self, player: usize) -> &RegretTable {
        &self.tables[player]
    }

    pub fn info_sets(&self, player: usize) -> impl Iterator<Item = (&InfoKey, &InfoSet)> + '_ {
        self.tables[player].iter()
    }

    pub fn info_set_count(&self, player: usize) -> usize {
        self.tables[player].len()
    }

    pub fn info_set(&self, player: usize, key: &InfoKey) -> Option<&InfoSet> {
        self.tables[player].get(key)
    }
}
