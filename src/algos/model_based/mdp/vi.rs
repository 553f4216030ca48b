use super::common::{backup, greedy_action, init_values, sweep};
use crate::common::defs::{Policy, Solution};
use crate::config::SolverConfig;
use crate::envs::grid_world::Grid;
use std::convert::Infallible;

/// Value iteration: `V[s] = max_a (r + γ·V[s'])` over the legal actions until
/// the values settle, then `policy` is filled with the greedy action of every
/// non-terminal state.
pub fn value_iteration(grid: &Grid, policy: &mut Policy, cfg: &SolverConfig) -> Solution {
    let mut values = init_values(grid, 0.);

    let convergence = sweep(&mut values, cfg, "value iteration", |s, values| {
        Ok::<_, Infallible>(
            grid.legal_actions(s)
                .iter()
                .map(|&a| backup(grid, values, s, a, cfg.gamma))
                .max_by(f64::total_cmp),
        )
    })
    .unwrap_or_else(|e| match e {});

    for s in grid.non_terminal_states() {
        if let Some((a, _)) = greedy_action(grid, &values, s, cfg.gamma) {
            policy.insert(s, a);
        }
    }

    Solution {
        values,
        convergence,
    }
}
