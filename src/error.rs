use crate::envs::grid_world::{Action, State};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Debug, Error)]
pub enum GridError {
    /// An undo landed on a cell the grid does not know about.
    #[error("Undoing {action:?} from {from} lands on unknown cell {state}")]
    OffGrid {
        action: Action,
        from: State,
        state: State,
    },

    /// Windy transition weights cannot be split for this state.
    #[error("Ill-defined stochastic policy at {state}: intended {intended:?}, legal {legal:?}, windy {windy}")]
    IllDefinedStochasticPolicy {
        state: State,
        intended: Action,
        legal: Vec<Action>,
        windy: f64,
    },

    #[error("Probability {value} is outside [0, 1]")]
    InvalidProbability { value: f64 },

    #[error("Discount factor {value} is outside (0, 1]")]
    InvalidDiscount { value: f64 },

    #[error("Solver setting {name} = {value} would never converge")]
    InvalidSetting { name: &'static str, value: f64 },

    #[error("No policy entry for non-terminal state {state}")]
    MissingPolicy { state: State },

    #[error("Grid has no non-terminal state to start an episode from")]
    NoStartState,

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
