//! Dynamic programming over the gridworld model (Sutton & Barto 2018, ch. 4).
//!
//! Every solver reads the model through [`Grid::transition`], so a shared
//! `&Grid` is all they need; the agent cursor is left alone.
//!
//! [`Grid::transition`]: crate::envs::grid_world::Grid::transition

pub mod common;
pub mod eval;
pub mod pi;
pub mod vi;

pub use common::{init_values, random_policy, random_values};
pub use eval::{policy_evaluation, policy_evaluation_windy};
pub use pi::{policy_iteration, policy_iteration_windy};
pub use vi::value_iteration;
