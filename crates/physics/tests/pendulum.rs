use std::f64::consts::PI;

use physics::pendulum::angular_acceleration;
use physics::{EnvError, Environment, PendulumConfig, PendulumEnv, ResetOptions, Space};
use render::RenderMode;

fn at(theta: f64, theta_dot: f64) -> ResetOptions {
    ResetOptions::with_state(vec![theta, theta_dot])
}

#[test]
fn upright_at_rest_is_an_equilibrium() -> anyhow::Result<()> {
    let mut env = PendulumEnv::new(PendulumConfig::default(), None)?;
    let (obs, _) = env.reset(None, Some(&at(0.0, 0.0)))?;
    assert_eq!(obs, vec![1.0, 0.0, 0.0]);
    for _ in 0..50 {
        let step = env.step(&vec![0.0])?;
        assert_eq!(step.reward, 0.0);
        assert!(!step.terminated && !step.truncated);
    }
    assert_eq!(env.state(), Some([0.0, 0.0]));
    Ok(())
}

#[test]
fn one_step_follows_semi_implicit_euler() -> anyhow::Result<()> {
    let config = PendulumConfig::default();
    let mut env = PendulumEnv::new(config.clone(), None)?;
    env.reset(None, Some(&at(0.3, -0.5)))?;
    let step = env.step(&vec![1.5])?;

    let theta_dot = -0.5 + angular_acceleration(&config, 0.3, 1.5) * config.dt;
    let theta = 0.3 + theta_dot * config.dt;
    let [got_theta, got_theta_dot] = env.state().unwrap_or_default();
    assert!((got_theta - theta).abs() < 1e-12);
    assert!((got_theta_dot - theta_dot).abs() < 1e-12);
    assert!((step.observation[0] - theta.cos()).abs() < 1e-12);
    assert!((step.observation[1] - theta.sin()).abs() < 1e-12);

    // The cost is charged on the state the action was applied to.
    let cost = 0.3 * 0.3 + 0.1 * 0.25 + 0.001 * 1.5 * 1.5;
    assert!((step.reward + cost).abs() < 1e-12);
    Ok(())
}

#[test]
fn torque_is_clamped_before_it_is_charged() -> anyhow::Result<()> {
    let mut clamped = PendulumEnv::new(PendulumConfig::default(), None)?;
    let mut limit = PendulumEnv::new(PendulumConfig::default(), None)?;
    clamped.reset(None, Some(&at(0.0, 0.0)))?;
    limit.reset(None, Some(&at(0.0, 0.0)))?;
    let a = clamped.step(&vec![1e6])?;
    let b = limit.step(&vec![2.0])?;
    assert_eq!(a, b);
    assert!((a.reward + 0.004).abs() < 1e-12);
    Ok(())
}

#[test]
fn speed_is_clamped_and_angle_wrapped() -> anyhow::Result<()> {
    let mut env = PendulumEnv::new(PendulumConfig::default(), None)?;
    env.reset(None, Some(&at(PI - 0.01, 7.9)))?;
    for _ in 0..200 {
        let step = env.step(&vec![2.0])?;
        assert!(step.observation[2].abs() <= 8.0);
        assert!(env.observation_space().contains(&step.observation));
        let [theta, _] = env.state().unwrap_or_default();
        assert!(theta > -PI && theta <= PI, "theta {theta} not wrapped");
    }
    Ok(())
}

#[test]
fn seeded_resets_cover_the_full_circle() -> anyhow::Result<()> {
    let mut env = PendulumEnv::new(PendulumConfig::default(), None)?;
    let (first, _) = env.reset(Some(5), None)?;
    let (again, _) = env.reset(Some(5), None)?;
    assert_eq!(first, again);

    let mut angles = Vec::new();
    for seed in 0..200 {
        env.reset(Some(seed), None)?;
        let [theta, theta_dot] = env.state().unwrap_or_default();
        assert!(theta_dot.abs() <= 1.0);
        angles.push(theta);
    }
    assert!(angles.iter().any(|t| *t > 2.0) && angles.iter().any(|t| *t < -2.0));

    env.reset(Some(1), Some(&ResetOptions::with_bounds(-0.1, 0.1)))?;
    let [theta, theta_dot] = env.state().unwrap_or_default();
    assert!(theta.abs() <= 0.1 && theta_dot.abs() <= 0.1);
    Ok(())
}

#[test]
fn lifecycle_and_configuration_errors() -> anyhow::Result<()> {
    let mut env = PendulumEnv::new(PendulumConfig::default(), None)?;
    assert!(matches!(env.step(&vec![0.0]), Err(EnvError::InvalidLifecycle(_))));
    assert!(matches!(
        env.reset(None, Some(&ResetOptions::with_state(vec![0.0; 3]))),
        Err(EnvError::ShapeMismatch { expected: 2, actual: 3 })
    ));
    assert!(matches!(
        PendulumEnv::new(PendulumConfig { max_torque: 0.0, ..PendulumConfig::default() }, None),
        Err(EnvError::InvalidConfiguration(_))
    ));
    Ok(())
}

#[test]
fn renders_a_square_frame() -> anyhow::Result<()> {
    let mut env = PendulumEnv::new(PendulumConfig::default(), Some(RenderMode::RgbArray))?;
    env.reset(Some(0), None)?;
    let frames = env.render()?;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].dimensions(), (500, 500));
    Ok(())
}
