use super::common::{greedy_action, init_values, windy_backup};
use super::eval::{policy_evaluation, policy_evaluation_windy};
use crate::common::defs::{Convergence, Policy, Solution, ValueFunction};
use crate::common::utils::arg_max;
use crate::config::SolverConfig;
use crate::envs::grid_world::{Action, Grid, State};
use crate::error::{GridError, Result};
use std::convert::Infallible;
use tracing::{debug, warn};

/// Policy iteration. `policy` is improved in place; the values of the final
/// policy are returned.
///
/// Improvement tries every action, legal or not, so staying put competes with
/// the legal moves.
pub fn policy_iteration(grid: &Grid, policy: &mut Policy, cfg: &SolverConfig) -> Solution {
    let mut values = init_values(grid, 0.);
    let mut convergence = Convergence::default();

    while convergence.iterations < cfg.max_iter {
        convergence.iterations += 1;

        policy_evaluation(grid, policy, &mut values, cfg);
        let changed = improve(grid, policy, |s| {
            Ok::<_, Infallible>(greedy_action(grid, &values, s, cfg.gamma))
        })
        .unwrap_or_else(|e| match e {});

        debug!(iteration = convergence.iterations, changed, "policy improvement");
        if changed == 0 {
            convergence.converged = true;
            break;
        }
    }

    finish(values, convergence, cfg, "policy iteration")
}

/// Policy iteration under windy transitions.
///
/// Candidates are restricted to the legal actions of each state; the wind
/// distribution is not defined for anything else.
pub fn policy_iteration_windy(
    grid: &Grid,
    policy: &mut Policy,
    cfg: &SolverConfig,
) -> Result<Solution> {
    let mut values = init_values(grid, 0.);
    let mut convergence = Convergence::default();

    while convergence.iterations < cfg.max_iter {
        convergence.iterations += 1;

        policy_evaluation_windy(grid, policy, &mut values, cfg)?;
        let changed = improve(grid, policy, |s| {
            let scored = grid
                .legal_actions(s)
                .iter()
                .map(|&a| windy_backup(grid, &values, s, a, cfg.windy, cfg.gamma).map(|v| (a, v)))
                .collect::<Result<Vec<_>>>()?;
            Ok::<_, GridError>(arg_max(scored))
        })?;

        debug!(iteration = convergence.iterations, changed, "windy policy improvement");
        if changed == 0 {
            convergence.converged = true;
            break;
        }
    }

    Ok(finish(values, convergence, cfg, "windy policy iteration"))
}

/// Rewrites every non-terminal policy entry with `best(s)` and counts the
/// entries that changed.
fn improve<E, F>(grid: &Grid, policy: &mut Policy, mut best: F) -> std::result::Result<usize, E>
where
    F: FnMut(State) -> std::result::Result<Option<(Action, f64)>, E>,
{
    let mut changed = 0;
    for (&s, a) in policy.iter_mut() {
        if grid.is_terminal(s) {
            continue;
        }
        if let Some((new_a, _)) = best(s)? {
            if new_a != *a {
                *a = new_a;
                changed += 1;
            }
        }
    }

    Ok(changed)
}

fn finish(
    values: ValueFunction,
    convergence: Convergence,
    cfg: &SolverConfig,
    name: &str,
) -> Solution {
    if !convergence.converged {
        warn!(
            max_iter = cfg.max_iter,
            "{name}: the maximum number of iterations has been reached"
        );
    }

    Solution {
        values,
        convergence,
    }
}
