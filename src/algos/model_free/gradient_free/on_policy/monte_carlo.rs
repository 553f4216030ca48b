use super::episodes::{play_episode, play_episode_es, play_episode_fixed_start};
use crate::common::defs::{Policy, QTable, ValueFunction};
use crate::common::utils::arg_max;
use crate::config::EpisodeConfig;
use crate::envs::grid_world::{Action, Grid, State};
use crate::error::Result;
use itertools::Itertools;
use rand::prelude::*;
use std::collections::BTreeMap;
use std::hash::Hash;
use tracing::debug;

/// Which occurrences of a key inside one episode contribute a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    First,
    Every,
}

/// Observed returns per state, or per state-action pair.
#[derive(Debug, Clone)]
pub struct Returns<K> {
    returns: BTreeMap<K, Vec<f64>>,
}

impl<K: Copy + Ord + Hash> Returns<K> {
    pub fn new() -> Self {
        Self {
            returns: BTreeMap::new(),
        }
    }

    /// Starts every key with an empty buffer.
    pub fn with_keys(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            returns: keys.into_iter().map(|k| (k, vec![])).collect(),
        }
    }

    /// Appends the returns of one episode and hands back the keys touched.
    pub fn record(&mut self, samples: &[(K, f64)], visit: Visit) -> Vec<K> {
        let samples = match visit {
            Visit::First => samples.iter().unique_by(|(k, _)| *k).collect_vec(),
            Visit::Every => samples.iter().collect_vec(),
        };

        for &&(k, g) in &samples {
            self.returns.entry(k).or_default().push(g);
        }

        samples.into_iter().map(|&(k, _)| k).unique().collect()
    }

    pub fn get(&self, key: &K) -> &[f64] {
        self.returns.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn mean(&self, key: &K) -> Option<f64> {
        let rs = self.get(key);
        (!rs.is_empty()).then(|| rs.iter().sum::<f64>() / rs.len() as f64)
    }

    /// Averages of every key with at least one return.
    pub fn means(&self) -> BTreeMap<K, f64> {
        self.returns
            .keys()
            .filter_map(|k| self.mean(k).map(|m| (*k, m)))
            .collect()
    }
}

impl<K: Copy + Ord + Hash> Default for Returns<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Monte Carlo prediction: averages the random-start returns of `policy`.
///
/// Terminal states and states never visited are 0.
pub fn mc_prediction<R: Rng + ?Sized>(
    grid: &mut Grid,
    policy: &Policy,
    episodes: usize,
    visit: Visit,
    cfg: &EpisodeConfig,
    rng: &mut R,
) -> Result<ValueFunction> {
    let mut returns = Returns::with_keys(grid.non_terminal_states());
    for e in 0..episodes {
        let samples = play_episode(grid, policy, cfg, rng)?;
        debug!(episode = e, len = samples.len(), "prediction episode");
        returns.record(&samples, visit);
    }

    let means = returns.means();
    Ok(grid
        .all_states()
        .into_iter()
        .map(|s| (s, means.get(&s).copied().unwrap_or(0.)))
        .collect())
}

/// Zero for every legal action of every non-terminal state.
pub fn init_q(grid: &Grid) -> QTable {
    grid.non_terminal_states()
        .into_iter()
        .flat_map(|s| grid.legal_actions(s).iter().map(move |&a| ((s, a), 0.)))
        .collect()
}

/// Best known action at `state`. Ties go to the earlier action.
pub fn greedy_action(q: &QTable, state: State) -> Option<(Action, f64)> {
    arg_max(
        q.range((state, Action::Up)..=(state, Action::Right))
            .map(|(&(_, a), &v)| (a, v)),
    )
}

/// `V[s] = max_a Q(s, a)`, 0 for terminal states.
pub fn values_from_q(grid: &Grid, q: &QTable) -> ValueFunction {
    grid.all_states()
        .into_iter()
        .map(|s| (s, greedy_action(q, s).map_or(0., |(_, v)| v)))
        .collect()
}

/// Monte Carlo control with exploring starts. `policy` is made greedy in Q
/// after every episode.
///
/// Q only ever holds the legal pairs of [`init_q`]. An episode opened with an
/// illegal action ends on the spot with the revisit penalty and updates
/// nothing.
pub fn mc_control_es<R: Rng + ?Sized>(
    grid: &mut Grid,
    policy: &mut Policy,
    episodes: usize,
    cfg: &EpisodeConfig,
    rng: &mut R,
) -> Result<QTable> {
    mc_control(grid, policy, episodes, rng, |grid, policy, rng| {
        play_episode_es(grid, policy, cfg, rng)
    })
}

/// Monte Carlo control without exploring starts: every episode leaves the
/// grid's start state and exploration comes from the wind alone.
pub fn mc_control_fixed_start<R: Rng + ?Sized>(
    grid: &mut Grid,
    policy: &mut Policy,
    episodes: usize,
    cfg: &EpisodeConfig,
    rng: &mut R,
) -> Result<QTable> {
    mc_control(grid, policy, episodes, rng, |grid, policy, rng| {
        play_episode_fixed_start(grid, policy, cfg, rng)
    })
}

fn mc_control<R, F>(
    grid: &mut Grid,
    policy: &mut Policy,
    episodes: usize,
    rng: &mut R,
    mut play: F,
) -> Result<QTable>
where
    R: Rng + ?Sized,
    F: FnMut(&mut Grid, &Policy, &mut R) -> Result<Vec<(State, Action, f64)>>,
{
    let mut q = init_q(grid);
    let mut returns = Returns::new();

    for e in 0..episodes {
        let samples = play(&mut *grid, &*policy, &mut *rng)?
            .into_iter()
            .map(|(s, a, g)| ((s, a), g))
            .collect_vec();
        debug!(episode = e, len = samples.len(), "control episode");

        for key in returns.record(&samples, Visit::First) {
            if let (Some(slot), Some(m)) = (q.get_mut(&key), returns.mean(&key)) {
                *slot = m;
            }
        }

        for s in samples.iter().map(|&((s, _), _)| s).unique() {
            if let Some((a, _)) = greedy_action(&q, s) {
                policy.insert(s, a);
            }
        }
    }

    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algos::model_based::mdp::{
        init_values, policy_evaluation, random_policy, value_iteration,
    };
    use crate::config::SolverConfig;
    use crate::envs::grid_world::standard_grid;
    use float_eq::*;
    use rand::rngs::StdRng;

    fn toy_episodes() -> Vec<Vec<(usize, f64)>> {
        vec![
            vec![(1, -6.059), (4, -3.4), (1, -1.), (2, -1.)],
            vec![(1, -3.), (4, -0.)],
            vec![(2, -3.)],
        ]
    }

    #[test]
    fn toy_example_with_first_visit() {
        let mut returns = Returns::new();
        for ep in toy_episodes() {
            returns.record(&ep, Visit::First);
        }

        assert_float_eq!(returns.mean(&1).unwrap(), (-6.059 - 3.) / 2., abs <= 1e-9);
        assert_float_eq!(returns.mean(&2).unwrap(), (-1. - 3.) / 2., abs <= 1e-9);
        assert_float_eq!(returns.mean(&4).unwrap(), -3.4 / 2., abs <= 1e-9);
        assert!(returns.mean(&3).is_none());
    }

    #[test]
    fn toy_example_with_every_visit() {
        let mut returns = Returns::new();
        for ep in toy_episodes() {
            returns.record(&ep, Visit::Every);
        }

        assert_eq!(returns.get(&1).len(), 3);
        assert_float_eq!(
            returns.mean(&1).unwrap(),
            (-6.059 - 1. - 3.) / 3.,
            abs <= 1e-9
        );
        assert_eq!(returns.means().len(), 3);
    }

    #[test]
    fn record_reports_touched_keys_once() {
        let mut returns = Returns::with_keys([1, 2, 3, 4]);

        let touched = returns.record(&toy_episodes()[0], Visit::Every);

        assert_eq!(touched, vec![1, 4, 2]);
        assert!(returns.get(&3).is_empty());
    }

    #[test]
    fn q_table_starts_at_legal_actions() {
        let grid = standard_grid();
        let q = init_q(&grid);

        assert_eq!(q.len(), 21);
        assert!(q.values().all(|&v| v == 0.));
        assert!(!q.contains_key(&(State::new(2, 0), Action::Left)));
    }

    #[test]
    fn greedy_action_reads_one_state() {
        let mut q = QTable::new();
        q.insert((State::new(0, 0), Action::Down), 0.5);
        q.insert((State::new(0, 0), Action::Right), 0.5);
        q.insert((State::new(0, 1), Action::Left), 9.);

        assert_eq!(
            greedy_action(&q, State::new(0, 0)),
            Some((Action::Down, 0.5))
        );
        assert_eq!(greedy_action(&q, State::new(1, 0)), None);
    }

    #[test]
    fn prediction_matches_policy_evaluation() {
        let mut grid = standard_grid();
        let rng = &mut StdRng::seed_from_u64(2718);
        let mut policy = Policy::new();
        value_iteration(&grid, &mut policy, &SolverConfig::default());
        let mut expected = init_values(&grid, 0.);
        policy_evaluation(&grid, &policy, &mut expected, &SolverConfig::default());
        let cfg = EpisodeConfig {
            windy: 1.,
            ..Default::default()
        };

        let v = mc_prediction(&mut grid, &policy, 500, Visit::First, &cfg, rng).unwrap();

        assert_float_eq!(
            v.values().copied().collect::<Vec<_>>(),
            expected.values().copied().collect::<Vec<_>>(),
            abs_all <= 1e-6
        );
    }

    #[test]
    fn exploring_starts_control_learns_goal_approach() {
        let mut grid = standard_grid();
        let rng = &mut StdRng::seed_from_u64(2718);
        let mut policy = random_policy(&grid, rng);

        let q = mc_control_es(&mut grid, &mut policy, 2000, &EpisodeConfig::default(), rng)
            .unwrap();

        assert_eq!(policy[&State::new(0, 2)], Action::Right);
        assert_eq!(policy[&State::new(0, 1)], Action::Right);
        assert_eq!(policy[&State::new(1, 2)], Action::Up);
        assert_float_eq!(q[&(State::new(0, 2), Action::Right)], 1., abs <= 1e-9);
        assert_eq!(q.len(), init_q(&grid).len());
        assert!(q.keys().all(|(s, a)| grid.legal_actions(*s).contains(a)));
        let v = values_from_q(&grid, &q);
        assert_float_eq!(v[&State::new(0, 3)], 0., abs <= 1e-12);
    }

    #[test]
    fn fixed_start_control_finds_top_route() {
        let mut grid = standard_grid();
        let rng = &mut StdRng::seed_from_u64(2718);
        let mut policy = random_policy(&grid, rng);
        let cfg = EpisodeConfig {
            windy: 0.8,
            ..Default::default()
        };

        mc_control_fixed_start(&mut grid, &mut policy, 5000, &cfg, rng).unwrap();

        for (s, a) in [
            ((2, 0), Action::Up),
            ((1, 0), Action::Up),
            ((0, 0), Action::Right),
            ((0, 1), Action::Right),
            ((0, 2), Action::Right),
        ] {
            assert_eq!(policy[&State::from(s)], a, "at {s:?}");
        }
    }
}
