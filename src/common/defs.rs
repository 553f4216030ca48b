use crate::envs::grid_world::{Action, State};
use std::collections::BTreeMap;

/// State values. Terminal states hold 0.
pub type ValueFunction = BTreeMap<State, f64>;

/// Deterministic tabular policy over non-terminal states.
pub type Policy = BTreeMap<State, Action>;

pub type QTable = BTreeMap<(State, Action), f64>;

/// Outcome of an iterative solver loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Convergence {
    pub converged: bool,
    pub iterations: usize,
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub values: ValueFunction,
    pub convergence: Convergence,
}
