//! Plain-text rendering of value functions and policies laid out on the grid.

use crate::common::defs::{Policy, ValueFunction};
use crate::envs::grid_world::{Grid, State};
use itertools::Itertools;

const SEPARATOR: &str = "---------------------------";

pub fn render_values(values: &ValueFunction, grid: &Grid) -> String {
    render(grid, |s| {
        let v = values.get(&s).copied().unwrap_or(0.);
        if v >= 0. {
            format!(" {v:.2}|")
        } else {
            format!("{v:.2}|")
        }
    })
}

/// States without a policy entry (terminal, walls) are left blank.
pub fn render_policy(policy: &Policy, grid: &Grid) -> String {
    render(grid, |s| match policy.get(&s) {
        Some(a) => format!("  {}  |", a.glyph()),
        None => "     |".to_string(),
    })
}

pub fn render_value_policy(values: &ValueFunction, policy: &Policy, grid: &Grid) -> String {
    format!(
        "Value function\n{}\n\nPolicy\n{}",
        render_values(values, grid),
        render_policy(policy, grid)
    )
}

fn render(grid: &Grid, cell: impl Fn(State) -> String) -> String {
    (0..grid.rows() as i32)
        .flat_map(|row| {
            let line = (0..grid.cols() as i32)
                .map(|col| cell(State::new(row, col)))
                .join("");
            [SEPARATOR.to_string(), line]
        })
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::grid_world::{standard_grid, Action};

    fn optimal() -> (ValueFunction, Policy) {
        use Action::*;

        let values = ValueFunction::from([
            (State::new(0, 0), 0.81),
            (State::new(0, 1), 0.9),
            (State::new(0, 2), 1.),
            (State::new(0, 3), 0.),
            (State::new(1, 0), 0.729),
            (State::new(1, 2), 0.9),
            (State::new(1, 3), 0.),
            (State::new(2, 0), 0.6561),
            (State::new(2, 1), 0.729),
            (State::new(2, 2), 0.81),
            (State::new(2, 3), 0.729),
        ]);
        let policy = Policy::from([
            (State::new(0, 0), Right),
            (State::new(0, 1), Right),
            (State::new(0, 2), Right),
            (State::new(1, 0), Up),
            (State::new(1, 2), Up),
            (State::new(2, 0), Up),
            (State::new(2, 1), Right),
            (State::new(2, 2), Up),
            (State::new(2, 3), Left),
        ]);

        (values, policy)
    }

    #[test]
    fn values_grid() {
        let (values, _) = optimal();

        insta::assert_snapshot!(render_values(&values, &standard_grid()), @r###"
        ---------------------------
         0.81| 0.90| 1.00| 0.00|
        ---------------------------
         0.73| 0.00| 0.90| 0.00|
        ---------------------------
         0.66| 0.73| 0.81| 0.73|
        "###);
    }

    #[test]
    fn negative_values_lose_the_pad() {
        let values = ValueFunction::from([
            (State::new(0, 0), -0.1),
            (State::new(1, 2), -1.25),
            (State::new(2, 3), 0.5),
        ]);

        insta::assert_snapshot!(render_values(&values, &standard_grid()), @r###"
        ---------------------------
        -0.10| 0.00| 0.00| 0.00|
        ---------------------------
         0.00| 0.00|-1.25| 0.00|
        ---------------------------
         0.00| 0.00| 0.00| 0.50|
        "###);
    }

    #[test]
    fn policy_grid() {
        let (_, policy) = optimal();

        insta::assert_snapshot!(render_policy(&policy, &standard_grid()), @r###"
        ---------------------------
          →  |  →  |  →  |     |
        ---------------------------
          ↑  |     |  ↑  |     |
        ---------------------------
          ↑  |  →  |  ↑  |  ←  |
        "###);
    }

    #[test]
    fn combined_render_has_both_sections() {
        let (values, policy) = optimal();
        let grid = standard_grid();

        let out = render_value_policy(&values, &policy, &grid);

        assert!(out.starts_with("Value function\n"));
        assert!(out.contains(&format!(
            "\n\nPolicy\n{}",
            render_policy(&policy, &grid)
        )));
        assert_eq!(out.lines().filter(|l| *l == SEPARATOR).count(), 6);
    }
}
