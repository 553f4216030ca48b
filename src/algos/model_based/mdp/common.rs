use crate::common::defs::{Convergence, Policy, ValueFunction};
use crate::common::utils::{arg_max, check_probability};
use crate::config::SolverConfig;
use crate::envs::grid_world::{Action, Grid, State};
use crate::error::{GridError, Result};
use rand::prelude::*;
use tracing::{debug, warn};

/// `v0` for non-terminal states, 0 for terminal ones.
pub fn init_values(grid: &Grid, v0: f64) -> ValueFunction {
    grid.all_states()
        .into_iter()
        .map(|s| (s, if grid.is_terminal(s) { 0. } else { v0 }))
        .collect()
}

/// Uniform [0, 1) for non-terminal states, 0 for terminal ones.
pub fn random_values<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> ValueFunction {
    grid.all_states()
        .into_iter()
        .map(|s| (s, if grid.is_terminal(s) { 0. } else { rng.gen() }))
        .collect()
}

/// A uniformly chosen legal action for every non-terminal state.
pub fn random_policy<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Policy {
    grid.non_terminal_states()
        .into_iter()
        .filter_map(|s| grid.legal_actions(s).choose(rng).map(|&a| (s, a)))
        .collect()
}

pub fn value_of(values: &ValueFunction, state: State) -> f64 {
    values.get(&state).copied().unwrap_or(0.)
}

/// `r + γ·V[s']` for one action.
pub fn backup(grid: &Grid, values: &ValueFunction, state: State, action: Action, gamma: f64) -> f64 {
    let (next, r) = grid.transition(state, action);
    r + gamma * value_of(values, next)
}

/// Greedy action over the full enumeration. Illegal actions stay put.
pub fn greedy_action(
    grid: &Grid,
    values: &ValueFunction,
    state: State,
    gamma: f64,
) -> Option<(Action, f64)> {
    arg_max(
        Action::ALL
            .into_iter()
            .map(|a| (a, backup(grid, values, state, a, gamma))),
    )
}

/// Execution probabilities of the legal actions when `intended` is chosen.
///
/// The intended action keeps `windy`; the rest is split evenly across the
/// other legal actions.
pub fn windy_weights(
    grid: &Grid,
    state: State,
    intended: Action,
    windy: f64,
) -> Result<Vec<(Action, f64)>> {
    let windy = check_probability(windy)?;
    let legal = grid.legal_actions(state);
    if !legal.contains(&intended) || (legal.len() < 2 && windy < 1.) {
        return Err(GridError::IllDefinedStochasticPolicy {
            state,
            intended,
            legal: legal.to_vec(),
            windy,
        });
    }

    let others = if legal.len() > 1 {
        (1. - windy) / (legal.len() - 1) as f64
    } else {
        0.
    };

    Ok(legal
        .iter()
        .map(|&a| (a, if a == intended { windy } else { others }))
        .collect())
}

/// Expected backup when `intended` is subject to wind.
pub fn windy_backup(
    grid: &Grid,
    values: &ValueFunction,
    state: State,
    intended: Action,
    windy: f64,
    gamma: f64,
) -> Result<f64> {
    Ok(windy_weights(grid, state, intended, windy)?
        .into_iter()
        .map(|(a, p)| p * backup(grid, values, state, a, gamma))
        .sum())
}

/// In-place sweeps over the states of `values` until the largest change in a
/// sweep drops below the threshold.
///
/// `update` returns the new value of a state, or `None` to leave it alone.
/// Running out of iterations is reported through [`Convergence`], not as an
/// error.
pub fn sweep<E, F>(
    values: &mut ValueFunction,
    cfg: &SolverConfig,
    name: &str,
    mut update: F,
) -> std::result::Result<Convergence, E>
where
    F: FnMut(State, &ValueFunction) -> std::result::Result<Option<f64>, E>,
{
    let states = values.keys().copied().collect::<Vec<_>>();
    let mut convergence = Convergence::default();

    while convergence.iterations < cfg.max_iter {
        convergence.iterations += 1;

        let mut biggest_change = 0f64;
        for &s in &states {
            if let Some(v) = update(s, values)? {
                let old = values.insert(s, v).unwrap_or(0.);
                biggest_change = biggest_change.max((old - v).abs());
            }
        }

        debug!(
            iteration = convergence.iterations,
            biggest_change, "{name} sweep"
        );
        if biggest_change < cfg.threshold {
            convergence.converged = true;
            break;
        }
    }

    if !convergence.converged {
        warn!(
            max_iter = cfg.max_iter,
            "{name}: the maximum number of iterations has been reached"
        );
    }

    Ok(convergence)
}
