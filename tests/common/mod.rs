use gridworld_rl::*;

#[allow(dead_code)]
pub const SEED: u64 = 2718;

/// Shortest route to +1 on the 3x4 board, going round the top.
#[allow(dead_code)]
pub fn optimal_policy() -> Policy {
    use Action::*;

    Policy::from([
        (State::new(0, 0), Right),
        (State::new(0, 1), Right),
        (State::new(0, 2), Right),
        (State::new(1, 0), Up),
        (State::new(1, 2), Up),
        (State::new(2, 0), Up),
        (State::new(2, 1), Right),
        (State::new(2, 2), Up),
        (State::new(2, 3), Left),
    ])
}

/// First legal action everywhere: a valid but poor starting point.
#[allow(dead_code)]
pub fn first_legal_policy(grid: &Grid) -> Policy {
    grid.non_terminal_states()
        .into_iter()
        .map(|s| (s, grid.legal_actions(s)[0]))
        .collect()
}

#[allow(dead_code)]
pub fn values_vec(values: &ValueFunction) -> Vec<f64> {
    values.values().copied().collect()
}
