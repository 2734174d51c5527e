use control::{ConstantController, Controller, IdentityObserver, LowPassObserver, Prbs, SignalController};
use physics::{
    AcrobotConfig, CartConfig, Cell, EnvError, GridAction, InvertedPendulumConfig,
};
use rollout::{
    create_acrobot_environment, create_cart_environment, create_grid_world_environment,
    create_inverted_pendulum_environment, simulate, EpisodeEnd, Rollout, RolloutError,
};

fn slow_cart() -> CartConfig {
    CartConfig { dt: 1.0 / 50.0, ..CartConfig::default() }
}

#[test]
fn budget_without_termination_records_k_plus_one_observations() -> anyhow::Result<()> {
    let mut env = create_cart_environment(slow_cart(), None, None)?;
    let mut idle = ConstantController::new(vec![0.0]);
    let record = Rollout::new(&mut env).controller(&mut idle).max_steps(50).simulate()?;

    assert_eq!(record.observations().len(), 51);
    assert_eq!(record.actions().len(), 50);
    assert_eq!(record.rewards().len(), 50);
    assert!(record.estimated_observations().is_empty());
    assert!(record.frames().is_empty());
    assert_eq!(record.end(), EpisodeEnd::BudgetExhausted);
    Ok(())
}

#[test]
fn seeded_random_rollouts_are_reproducible() -> anyhow::Result<()> {
    let run = |seed| -> anyhow::Result<_> {
        let mut env = create_inverted_pendulum_environment(InvertedPendulumConfig::default(), None, None)?;
        Ok(Rollout::new(&mut env).max_steps(100).seed(Some(seed)).simulate()?)
    };
    let a = run(16)?;
    let b = run(16)?;
    assert_eq!(a.observations(), b.observations());
    assert_eq!(a.actions(), b.actions());
    assert_ne!(run(17)?.actions(), a.actions());
    Ok(())
}

#[test]
fn deterministic_controller_gives_identical_trajectories() -> anyhow::Result<()> {
    let run = || -> anyhow::Result<_> {
        let mut env = create_acrobot_environment(AcrobotConfig::default(), None, None)?;
        let mut prbs = SignalController::new(Prbs::new(6, 1.0, 3, 11)?, 0.2)?;
        Ok(Rollout::new(&mut env).controller(&mut prbs).seed(Some(5)).max_steps(120).simulate()?)
    };
    let a = run()?;
    let b = run()?;
    assert_eq!(a.observations(), b.observations());
    assert_eq!(a.actions(), b.actions());
    assert_eq!(a.rewards(), b.rewards());
    Ok(())
}

#[test]
fn controller_and_observer_run_once_per_step() -> anyhow::Result<()> {
    let mut env = create_cart_environment(slow_cart(), None, None)?;
    let mut calls = 0;
    let mut push = |_: &Vec<f64>| {
        calls += 1;
        vec![10.0]
    };
    let mut observer = IdentityObserver;
    let record = Rollout::new(&mut env)
        .controller(&mut push)
        .observer(&mut observer)
        .simulate()?;

    assert_eq!(record.end(), EpisodeEnd::Terminated);
    assert!(record.steps() < 200);
    assert!(record.observations().last().map_or(false, |obs| obs[0] >= 9.0));
    assert_eq!(calls, record.steps());
    assert_eq!(record.estimated_observations(), record.observations());
    Ok(())
}

#[test]
fn low_pass_estimates_lag_the_observations() -> anyhow::Result<()> {
    let mut env = create_cart_environment(slow_cart(), None, None)?;
    let mut push = ConstantController::new(vec![10.0]);
    let mut observer = LowPassObserver::new(0.2)?;
    let record = Rollout::new(&mut env)
        .controller(&mut push)
        .observer(&mut observer)
        .max_steps(20)
        .simulate()?;

    let estimates = record.estimated_observations();
    assert_eq!(estimates.len(), record.observations().len());
    assert_eq!(estimates[0], record.observations()[0]);
    let (last_estimate, last_obs) = (&estimates[20], &record.observations()[20]);
    assert!(last_estimate[0] < last_obs[0]);
    Ok(())
}

#[test]
fn wrapper_limit_truncates_the_rollout() -> anyhow::Result<()> {
    let mut env = create_grid_world_environment(None, None)?;
    let mut bump = ConstantController::new(GridAction::Down);
    let record = Rollout::new(&mut env).controller(&mut bump).simulate()?;
    assert_eq!(record.steps(), 20);
    assert_eq!(record.end(), EpisodeEnd::Truncated);
    assert!(record.observations().iter().all(|cell| *cell == Cell::new(6, 6)));
    assert_eq!(record.total_reward(), 0.0);
    Ok(())
}

#[test]
fn scripted_grid_world_path_reaches_the_goal() -> anyhow::Result<()> {
    use GridAction::{Left, Up};

    let mut env = create_grid_world_environment(None, None)?;
    let mut plan = vec![Up, Left, Left, Left, Left, Left, Up].into_iter();
    let mut follow = |_: &Cell| plan.next().unwrap_or(Up);
    let record = simulate(&mut env, Some(&mut follow), None, 500, Some(0))?;

    assert_eq!(record.end(), EpisodeEnd::Terminated);
    assert_eq!(record.steps(), 7);
    assert_eq!(record.observations().last(), Some(&Cell::new(1, 4)));
    assert!((record.total_reward() - 0.685).abs() < 1e-12);
    Ok(())
}

#[test]
fn default_grid_world_controller_samples_legal_moves() -> anyhow::Result<()> {
    let mut env = create_grid_world_environment(None, None)?;
    let record = Rollout::new(&mut env).simulate()?;
    assert!(record.steps() <= 20);
    assert!(record.actions().iter().all(|a| GridAction::ALL.contains(a)));
    Ok(())
}

#[test]
fn zero_step_rollout_records_only_the_reset() -> anyhow::Result<()> {
    let mut env = create_cart_environment(CartConfig::default(), None, None)?;
    let record = Rollout::new(&mut env).max_steps(0).simulate()?;
    assert_eq!(record.observations().len(), 1);
    assert!(record.actions().is_empty());
    assert_eq!(record.end(), EpisodeEnd::BudgetExhausted);
    Ok(())
}

#[test]
fn malformed_actions_surface_as_errors() -> anyhow::Result<()> {
    let mut env = create_cart_environment(CartConfig::default(), None, None)?;
    let mut wrong = ConstantController::new(vec![1.0, 1.0]);
    let err = Rollout::new(&mut env).controller(&mut wrong).simulate().unwrap_err();
    assert!(matches!(
        err,
        RolloutError::Env(EnvError::ShapeMismatch { expected: 1, actual: 2 })
    ));
    Ok(())
}

#[test]
fn record_exports_to_json_without_frames() -> anyhow::Result<()> {
    let mut env = create_cart_environment(slow_cart(), Some(render::RenderMode::RgbArray), None)?;
    let mut push = ConstantController::new(vec![10.0]);
    let record = Rollout::new(&mut env).controller(&mut push).simulate()?;
    assert!(!record.frames().is_empty());

    let json: serde_json::Value = serde_json::from_str(&record.to_json()?)?;
    assert_eq!(json["end"], "terminated");
    assert_eq!(
        json["observations"].as_array().map(Vec::len),
        Some(record.observations().len())
    );
    assert_eq!(json["actions"][0][0], 10.0);
    assert!(json.get("frames").is_none());
    Ok(())
}

#[test]
fn controllers_are_reset_between_rollouts() -> anyhow::Result<()> {
    let mut prbs = SignalController::new(Prbs::new(5, 1.0, 1, 2)?, 0.02)?;
    let mut actions = Vec::new();
    for _ in 0..2 {
        let mut env = create_cart_environment(slow_cart(), None, None)?;
        let record = Rollout::new(&mut env).controller(&mut prbs).max_steps(10).simulate()?;
        actions.push(record.actions().to_vec());
    }
    assert_eq!(actions[0], actions[1]);
    Controller::<Vec<f64>, Vec<f64>>::reset(&mut prbs);
    assert_eq!(Controller::<Vec<f64>, Vec<f64>>::act(&mut prbs, &vec![]), actions[0][0]);
    Ok(())
}
