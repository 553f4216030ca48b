//! Episode generators. Each one drives the grid cursor from a start state to
//! a terminal state and turns the collected rewards into discounted returns.
//!
//! The returned samples are in forward time order and hold `G_t`, the return
//! following the action taken at step `t`. Terminal states never appear: their
//! value is 0 by definition.

use crate::common::defs::Policy;
use crate::common::utils::check_probability;
use crate::config::EpisodeConfig;
use crate::envs::grid_world::{Action, Grid, State};
use crate::error::{GridError, Result};
use itertools::Itertools;
use rand::prelude::*;
use std::collections::BTreeSet;
use tracing::warn;

/// Reward that ends an exploring-starts episode revisiting a state, spread
/// over the number of steps taken.
pub const REVISIT_PENALTY: f64 = -10.;

/// Keeps `action` with probability `windy`, otherwise picks uniformly among
/// the other `candidates`. Without alternatives `action` is returned.
pub fn random_windy<R: Rng + ?Sized>(
    action: Action,
    windy: f64,
    candidates: &[Action],
    rng: &mut R,
) -> Action {
    if rng.gen::<f64>() < windy {
        return action;
    }

    let alternatives = candidates
        .iter()
        .copied()
        .filter(|&a| a != action)
        .collect_vec();

    alternatives.choose(rng).copied().unwrap_or(action)
}

/// Random non-terminal start, then the policy under wind until the episode
/// ends.
pub fn play_episode<R: Rng + ?Sized>(
    grid: &mut Grid,
    policy: &Policy,
    cfg: &EpisodeConfig,
    rng: &mut R,
) -> Result<Vec<(State, f64)>> {
    let start = random_start(grid, rng)?;
    grid.set_state(start);

    let steps = follow_policy(grid, policy, cfg, rng)?;

    Ok(discounted_returns(steps, cfg.gamma)
        .into_iter()
        .map(|((s, _), g)| (s, g))
        .collect())
}

/// Exploring starts: random non-terminal start and a uniformly random first
/// action from the full enumeration, then the policy without wind.
///
/// Landing on an already visited state ends the episode with
/// `REVISIT_PENALTY / steps`, which keeps cyclic policies from looping.
pub fn play_episode_es<R: Rng + ?Sized>(
    grid: &mut Grid,
    policy: &Policy,
    cfg: &EpisodeConfig,
    rng: &mut R,
) -> Result<Vec<(State, Action, f64)>> {
    let mut s = random_start(grid, rng)?;
    grid.set_state(s);
    let mut a = Action::ALL[rng.gen_range(0..Action::ALL.len())];

    let mut seen = BTreeSet::from([s]);
    let mut steps = vec![];
    loop {
        let r = grid.make_move(a);
        let next = grid.current_state();

        if seen.contains(&next) {
            let taken = (steps.len() + 1) as f64;
            steps.push(((s, a), REVISIT_PENALTY / taken));
            break;
        }

        steps.push(((s, a), r));
        if grid.game_over() {
            break;
        }

        s = next;
        a = intended(policy, s)?;
        seen.insert(s);
    }

    Ok(discounted_returns(steps, cfg.gamma)
        .into_iter()
        .map(|((s, a), g)| (s, a, g))
        .collect())
}

/// Starts from the grid's start state; every action, the first one included,
/// goes through [`random_windy`].
pub fn play_episode_fixed_start<R: Rng + ?Sized>(
    grid: &mut Grid,
    policy: &Policy,
    cfg: &EpisodeConfig,
    rng: &mut R,
) -> Result<Vec<(State, Action, f64)>> {
    grid.reset();

    let steps = follow_policy(grid, policy, cfg, rng)?;

    Ok(discounted_returns(steps, cfg.gamma)
        .into_iter()
        .map(|((s, a), g)| (s, a, g))
        .collect())
}

fn random_start<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Result<State> {
    grid.non_terminal_states()
        .choose(rng)
        .copied()
        .ok_or(GridError::NoStartState)
}

fn intended(policy: &Policy, state: State) -> Result<Action> {
    policy
        .get(&state)
        .copied()
        .ok_or(GridError::MissingPolicy { state })
}

/// Follows the windy policy from the cursor, collecting `((s_t, a_t), r_t+1)`.
fn follow_policy<R: Rng + ?Sized>(
    grid: &mut Grid,
    policy: &Policy,
    cfg: &EpisodeConfig,
    rng: &mut R,
) -> Result<Vec<((State, Action), f64)>> {
    let windy = check_probability(cfg.windy)?;

    let mut steps = vec![];
    while !grid.game_over() {
        if steps.len() >= cfg.max_steps {
            warn!(
                max_steps = cfg.max_steps,
                state = %grid.current_state(),
                "episode truncated"
            );
            break;
        }

        let s = grid.current_state();
        let a = random_windy(intended(policy, s)?, windy, grid.legal_actions(s), rng);
        let r = grid.make_move(a);
        steps.push(((s, a), r));
    }

    Ok(steps)
}

/// `G_t = r_t+1 + γ·G_t+1`, accumulated backwards from the end of the episode.
fn discounted_returns<K>(steps: Vec<(K, f64)>, gamma: f64) -> Vec<(K, f64)> {
    let mut g = 0.;
    let mut returns = steps
        .into_iter()
        .rev()
        .map(|(k, r)| {
            g = r + gamma * g;
            (k, g)
        })
        .collect_vec();
    returns.reverse();

    returns
}
