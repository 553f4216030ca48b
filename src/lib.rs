//! Tabular reinforcement learning on a small gridworld: dynamic programming
//! (policy evaluation, policy iteration, value iteration) and Monte Carlo
//! prediction and control, with optional windy transitions.

extern crate itertools;
extern crate rand;
extern crate serde;
extern crate serde_json;

pub mod algos;
pub mod common;
pub mod config;
pub mod envs;
pub mod error;
pub mod ui;

pub use common::defs::{Convergence, Policy, QTable, Solution, ValueFunction};
pub use config::{Config, EpisodeConfig, SolverConfig};
pub use envs::grid_world::{negative_grid, standard_grid, Action, Grid, State};
pub use error::{GridError, Result};
