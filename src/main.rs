use gridworld_rl::algos::model_based::mdp::*;
use gridworld_rl::algos::model_free::gradient_free::on_policy::*;
use gridworld_rl::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    info!(?config, "starting");
    let rng = &mut match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let grid = standard_grid();
    let mut policy = random_policy(&grid, rng);
    let sol = policy_iteration(&grid, &mut policy, &config.solver);
    info!(convergence = ?sol.convergence, "policy iteration");
    println!("{}\n", ui::render_value_policy(&sol.values, &policy, &grid));

    let mut policy = random_policy(&grid, rng);
    let sol = policy_iteration_windy(&grid, &mut policy, &config.solver)?;
    info!(convergence = ?sol.convergence, windy = config.solver.windy, "windy policy iteration");
    println!("{}\n", ui::render_value_policy(&sol.values, &policy, &grid));

    let neg = negative_grid(-0.1);
    let mut policy = Policy::new();
    let sol = value_iteration(&neg, &mut policy, &config.solver);
    info!(convergence = ?sol.convergence, "value iteration");
    println!("{}\n", ui::render_value_policy(&sol.values, &policy, &neg));

    let mut grid = standard_grid();
    let values = mc_prediction(&mut grid, &policy, 200, Visit::First, &config.episodes, rng)?;
    info!("monte carlo prediction");
    println!("{}\n", ui::render_values(&values, &grid));

    let mut policy = random_policy(&grid, rng);
    let q = mc_control_es(&mut grid, &mut policy, 2000, &config.episodes, rng)?;
    info!(entries = q.len(), "monte carlo control, exploring starts");
    let v = values_from_q(&grid, &q);
    println!("{}\n", ui::render_value_policy(&v, &policy, &grid));

    let mut policy = random_policy(&grid, rng);
    let q = mc_control_fixed_start(&mut grid, &mut policy, 5000, &config.episodes, rng)?;
    info!(entries = q.len(), "monte carlo control, fixed start");
    let v = values_from_q(&grid, &q);
    println!("{}", ui::render_value_policy(&v, &policy, &grid));

    Ok(())
}
