extern crate float_eq;
extern crate gridworld_rl;
mod common;

use assertor::*;
use common::*;
use float_eq::*;
use gridworld_rl::algos::model_based::mdp::*;
use gridworld_rl::algos::model_free::gradient_free::on_policy::*;
use gridworld_rl::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use rstest::rstest;

#[rstest]
#[case(Visit::First)]
#[case(Visit::Every)]
fn windless_returns_match_evaluation(#[case] visit: Visit) {
    let mut grid = negative_grid(-0.1);
    let rng = &mut StdRng::seed_from_u64(SEED);
    let policy = optimal_policy();
    let mut expected = init_values(&grid, 0.);
    policy_evaluation(&grid, &policy, &mut expected, &SolverConfig::default());
    let cfg = EpisodeConfig {
        windy: 1.,
        ..Default::default()
    };

    let v = mc_prediction(&mut grid, &policy, 300, visit, &cfg, rng).unwrap();

    assert_float_eq!(values_vec(&v), values_vec(&expected), abs_all <= 1e-6);
}

#[test]
fn windy_returns_sit_below_windless_ones() {
    let mut grid = standard_grid();
    let rng = &mut StdRng::seed_from_u64(SEED);
    let policy = optimal_policy();
    let calm = EpisodeConfig {
        windy: 1.,
        ..Default::default()
    };
    let windy = EpisodeConfig {
        windy: 0.5,
        ..Default::default()
    };

    let v_calm = mc_prediction(&mut grid, &policy, 500, Visit::First, &calm, rng).unwrap();
    let v_windy = mc_prediction(&mut grid, &policy, 500, Visit::First, &windy, rng).unwrap();

    for s in [State::new(0, 0), State::new(0, 1), State::new(2, 0)] {
        assert!(v_windy[&s] < v_calm[&s], "{s}: {} vs {}", v_windy[&s], v_calm[&s]);
    }
}

#[test]
fn control_leaves_terminals_out_of_the_policy() {
    let mut grid = standard_grid();
    let rng = &mut StdRng::seed_from_u64(SEED);
    let mut policy = random_policy(&grid, rng);

    let q = mc_control_es(&mut grid, &mut policy, 200, &EpisodeConfig::default(), rng).unwrap();

    assert_that!(policy.len()).is_equal_to(9);
    assert!(q.keys().all(|(s, _)| !grid.is_terminal(*s)));
    let rendered = ui::render_policy(&policy, &grid);
    assert_that!(rendered.lines().count()).is_equal_to(6);
}

#[test]
fn missing_policy_entry_is_reported() {
    let mut grid = standard_grid();
    let rng = &mut StdRng::seed_from_u64(SEED);
    let mut policy = optimal_policy();
    policy.remove(&State::new(2, 0));

    let err = mc_control_fixed_start(&mut grid, &mut policy, 1, &EpisodeConfig::default(), rng)
        .unwrap_err();

    assert!(matches!(err, GridError::MissingPolicy { state } if state == State::new(2, 0)));
}
