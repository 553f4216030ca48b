use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A cell of the grid, `(row, col)`. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub row: i32,
    pub col: i32,
}

impl State {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn shifted(self, action: Action) -> Self {
        let (dr, dc) = action.delta();
        Self::new(self.row + dr, self.col + dc)
    }
}

impl From<(i32, i32)> for State {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Full action enumeration, in tie-break order.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// `(row, col)` delta.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    pub const fn inverse(self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            Action::Up => '↑',
            Action::Down => '↓',
            Action::Left => '←',
            Action::Right => '→',
        }
    }
}

pub type Rewards = BTreeMap<State, f64>;
pub type LegalActions = BTreeMap<State, Vec<Action>>;

/// Tabular gridworld with an agent cursor.
///
/// A state is terminal iff it has no entry in the legal action table. Cells
/// that appear in neither table (walls, off-grid) are unknown.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    start: State,
    cursor: State,
    rewards: Rewards,
    actions: LegalActions,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, start: State) -> Self {
        Self {
            rows,
            cols,
            start,
            cursor: start,
            rewards: Rewards::new(),
            actions: LegalActions::new(),
        }
    }

    pub fn set(&mut self, rewards: Rewards, actions: LegalActions) {
        self.rewards = rewards;
        self.actions = actions;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> State {
        self.start
    }

    pub fn current_state(&self) -> State {
        self.cursor
    }

    /// Repositions the cursor. No legality check is made.
    pub fn set_state(&mut self, state: State) {
        self.cursor = state;
    }

    pub fn reset(&mut self) {
        self.cursor = self.start;
    }

    /// Legal actions at `state`, empty for terminal and unknown cells.
    pub fn legal_actions(&self, state: State) -> &[Action] {
        self.actions.get(&state).map_or(&[], Vec::as_slice)
    }

    /// Legal actions at the cursor.
    pub fn actions(&self) -> &[Action] {
        self.legal_actions(self.cursor)
    }

    pub fn reward(&self, state: State) -> f64 {
        self.rewards.get(&state).copied().unwrap_or(0.)
    }

    pub fn is_terminal(&self, state: State) -> bool {
        !self.actions.contains_key(&state)
    }

    pub fn game_over(&self) -> bool {
        self.is_terminal(self.cursor)
    }

    pub fn is_known(&self, state: State) -> bool {
        self.rewards.contains_key(&state) || self.actions.contains_key(&state)
    }

    pub fn all_states(&self) -> BTreeSet<State> {
        self.rewards
            .keys()
            .chain(self.actions.keys())
            .copied()
            .collect()
    }

    pub fn non_terminal_states(&self) -> Vec<State> {
        self.actions.keys().copied().collect()
    }

    /// Pure form of [`Grid::make_move`]: where `action` takes the agent from
    /// `state` and the reward collected there. The cursor is not touched.
    pub fn transition(&self, state: State, action: Action) -> (State, f64) {
        let next = if self.legal_actions(state).contains(&action) {
            state.shifted(action)
        } else {
            state
        };

        (next, self.reward(next))
    }

    /// Moves the cursor and returns the reward of the landing cell.
    ///
    /// An action that is not legal at the cursor is a no-op, yet the reward
    /// of the (unchanged) cell is still returned. Callers are expected to only
    /// request legal actions; nothing here validates that.
    pub fn make_move(&mut self, action: Action) -> f64 {
        let (next, reward) = self.transition(self.cursor, action);
        self.cursor = next;

        reward
    }

    /// Applies the inverse of `action` to the cursor.
    ///
    /// Fails without moving when the target is not a known cell. Undoing an
    /// illegal move is not a round trip: the move never happened, so the undo
    /// displaces the cursor or fails.
    pub fn undo_move(&mut self, action: Action) -> Result<()> {
        let target = self.cursor.shifted(action.inverse());
        if !self.is_known(target) {
            return Err(GridError::OffGrid {
                action,
                from: self.cursor,
                state: target,
            });
        }

        self.cursor = target;
        Ok(())
    }
}

/// The 3x4 example board without step cost.
///
/// ```text
/// .  .  .  1
/// .  x  . -1
/// s  .  .  .
/// ```
pub fn standard_grid() -> Grid {
    negative_grid(0.)
}

/// The 3x4 example board where every non-terminal cell costs `step_cost`.
pub fn negative_grid(step_cost: f64) -> Grid {
    use Action::*;

    let mut grid = Grid::new(3, 4, State::new(2, 0));

    let rewards = Rewards::from([
        (State::new(0, 0), step_cost),
        (State::new(0, 1), step_cost),
        (State::new(0, 2), step_cost),
        (State::new(0, 3), 1.),
        (State::new(1, 0), step_cost),
        (State::new(1, 2), step_cost),
        (State::new(1, 3), -1.),
        (State::new(2, 0), step_cost),
        (State::new(2, 1), step_cost),
        (State::new(2, 2), step_cost),
        (State::new(2, 3), step_cost),
    ]);

    let actions = LegalActions::from([
        (State::new(0, 0), vec![Down, Right]),
        (State::new(0, 1), vec![Left, Right]),
        (State::new(0, 2), vec![Left, Down, Right]),
        (State::new(1, 0), vec![Up, Down]),
        (State::new(1, 2), vec![Up, Down, Right]),
        (State::new(2, 0), vec![Up, Right]),
        (State::new(2, 1), vec![Left, Right]),
        (State::new(2, 2), vec![Left, Right, Up]),
        (State::new(2, 3), vec![Left, Up]),
    ]);

    grid.set(rewards, actions);
    grid
}
