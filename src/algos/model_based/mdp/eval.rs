use super::common::{backup, sweep, windy_backup};
use crate::common::defs::{Convergence, Policy, ValueFunction};
use crate::config::SolverConfig;
use crate::envs::grid_world::Grid;
use crate::error::Result;
use std::convert::Infallible;

/// Iterative policy evaluation with deterministic transitions.
///
/// Updates `values` in place: `V[s] = r + γ·V[s']` for every non-terminal
/// state the policy covers.
pub fn policy_evaluation(
    grid: &Grid,
    policy: &Policy,
    values: &mut ValueFunction,
    cfg: &SolverConfig,
) -> Convergence {
    sweep(values, cfg, "policy evaluation", |s, values| {
        Ok::<_, Infallible>(
            policy
                .get(&s)
                .filter(|_| !grid.is_terminal(s))
                .map(|&a| backup(grid, values, s, a, cfg.gamma)),
        )
    })
    .unwrap_or_else(|e| match e {})
}

/// Iterative policy evaluation where the intended action only executes with
/// probability `cfg.windy`.
pub fn policy_evaluation_windy(
    grid: &Grid,
    policy: &Policy,
    values: &mut ValueFunction,
    cfg: &SolverConfig,
) -> Result<Convergence> {
    sweep(values, cfg, "windy policy evaluation", |s, values| {
        match policy.get(&s) {
            Some(&a) if !grid.is_terminal(s) => {
                windy_backup(grid, values, s, a, cfg.windy, cfg.gamma).map(Some)
            }
            _ => Ok(None),
        }
    })
}
