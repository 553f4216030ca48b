pub mod episodes;
pub mod monte_carlo;

pub use episodes::{play_episode, play_episode_es, play_episode_fixed_start, random_windy};
pub use monte_carlo::{
    greedy_action, init_q, mc_control_es, mc_control_fixed_start, mc_prediction, values_from_q,
    Returns, Visit,
};
