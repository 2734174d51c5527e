//! # Rollout application
//!
//! Builds the selected system in the standard wrapper stack, picks the
//! controller and observer requested on the command line, runs one rollout
//! and exports the result.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context, Result};
use control::{
    ConstantController, Controller, IdentityObserver, LowPassObserver, Multisine, Observer, Prbs,
    SignalController, Sine,
};
use image::ImageFormat;
use physics::{
    AcrobotConfig, CartConfig, Cell, Environment, GridWorldConfig, InvertedPendulumConfig,
    PendulumConfig,
};
use render::RenderMode;
use rollout::{
    create_acrobot_environment, create_cart_environment, create_grid_world_environment,
    create_inverted_pendulum_environment, create_pendulum_environment, Rollout, TrajectoryRecord,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cli::{Cli, ObserverKind, Policy, System};

type VectorController = Box<dyn Controller<Vec<f64>, Vec<f64>>>;
type VectorObserver = Box<dyn Observer<Vec<f64>>>;

/// Runs the rollout described by `cli`.
///
/// # Errors
///
/// Returns an error for invalid configuration files or parameters, failed
/// rollouts and failed exports.
pub fn run(cli: &Cli) -> Result<()> {
    let render_mode = cli.renders().then_some(RenderMode::RgbArray);
    tracing::info!(system = ?cli.system, policy = ?cli.policy, steps = cli.steps, "starting rollout");

    match cli.system {
        System::Cart => {
            let config: CartConfig = load_config(cli.config.as_deref())?;
            let dt = config.dt;
            let mut env = create_cart_environment(config, render_mode, cli.budget)
                .context("failed to build the cart")?;
            run_continuous(&mut env, dt, cli)
        }
        System::InvertedPendulum => {
            let config: InvertedPendulumConfig = load_config(cli.config.as_deref())?;
            let dt = config.dt;
            let mut env = create_inverted_pendulum_environment(config, render_mode, cli.budget)
                .context("failed to build the inverted pendulum")?;
            run_continuous(&mut env, dt, cli)
        }
        System::Pendulum => {
            let config: PendulumConfig = load_config(cli.config.as_deref())?;
            let dt = config.dt;
            let mut env = create_pendulum_environment(config, render_mode, cli.budget)
                .context("failed to build the pendulum")?;
            run_continuous(&mut env, dt, cli)
        }
        System::Acrobot => {
            let config: AcrobotConfig = load_config(cli.config.as_deref())?;
            let dt = config.dt;
            let mut env = create_acrobot_environment(config, render_mode, cli.budget)
                .context("failed to build the acrobot")?;
            run_continuous(&mut env, dt, cli)
        }
        System::GridWorld => run_grid_world(cli, render_mode),
    }
}

fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
}

/// Controller for single-input continuous systems, `None` for the random default.
fn build_controller(cli: &Cli, dt: f64) -> Result<Option<VectorController>> {
    let controller: VectorController = match cli.policy {
        Policy::Random => return Ok(None),
        Policy::Constant => Box::new(ConstantController::new(vec![cli.amplitude])),
        Policy::Sine => Box::new(SignalController::new(
            Sine::new(cli.amplitude, cli.frequency, 0.0)?,
            dt,
        )?),
        Policy::Multisine => {
            let signal = if cli.random_phase {
                Multisine::random_phase(cli.amplitude, cli.frequency, cli.harmonics, cli.seed)?
            } else {
                Multisine::schroeder(cli.amplitude, cli.frequency, cli.harmonics)?
            };
            Box::new(SignalController::new(signal, dt)?)
        }
        Policy::Prbs => Box::new(SignalController::new(
            Prbs::new(cli.prbs_order, cli.amplitude, cli.hold, cli.seed)?,
            dt,
        )?),
    };
    Ok(Some(controller))
}

fn run_continuous<E>(env: &mut E, dt: f64, cli: &Cli) -> Result<()>
where
    E: Environment<Observation = Vec<f64>, Action = Vec<f64>>,
{
    let mut controller = build_controller(cli, dt).context("invalid policy parameters")?;
    let mut observer: Option<VectorObserver> = match cli.observer {
        ObserverKind::Off => None,
        ObserverKind::Identity => Some(Box::new(IdentityObserver)),
        ObserverKind::LowPass => Some(Box::new(LowPassObserver::new(cli.alpha)?)),
    };

    let mut rollout = Rollout::new(env).max_steps(cli.steps).seed(Some(cli.seed));
    if let Some(controller) = controller.as_deref_mut() {
        rollout = rollout.controller(controller);
    }
    if let Some(observer) = observer.as_deref_mut() {
        rollout = rollout.observer(observer);
    }
    let record = rollout.simulate().context("rollout failed")?;
    export(&record, cli)
}

fn run_grid_world(cli: &Cli, render_mode: Option<RenderMode>) -> Result<()> {
    if cli.policy != Policy::Random {
        bail!("the grid world only supports the random policy");
    }
    let budget = match cli.config.as_deref() {
        Some(path) => Some(load_config::<GridWorldConfig>(Some(path))?.max_steps),
        None => None,
    };
    let mut env = create_grid_world_environment(render_mode, cli.budget.or(budget))
        .context("failed to build the grid world")?;

    let mut observer: Option<Box<dyn Observer<Cell>>> = match cli.observer {
        ObserverKind::Off => None,
        ObserverKind::Identity => Some(Box::new(IdentityObserver)),
        ObserverKind::LowPass => bail!("the low-pass observer needs continuous observations"),
    };
    let mut rollout = Rollout::new(&mut env).max_steps(cli.steps).seed(Some(cli.seed));
    if let Some(observer) = observer.as_deref_mut() {
        rollout = rollout.observer(observer);
    }
    let record = rollout.simulate().context("rollout failed")?;
    export(&record, cli)
}

fn export<O: Serialize, A: Serialize>(record: &TrajectoryRecord<O, A>, cli: &Cli) -> Result<()> {
    println!(
        "{} steps, return {:.3}, ended: {:?}",
        record.steps(),
        record.total_reward(),
        record.end()
    );

    if let Some(path) = &cli.output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        record.write_json(BufWriter::new(file))?;
        tracing::info!(path = %path.display(), "wrote trajectory record");
    }

    if let Some(dir) = &cli.frames_dir {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        for (i, frame) in record.frames().iter().enumerate() {
            let path = dir.join(format!("frame_{i:04}.png"));
            frame
                .save_with_format(&path, ImageFormat::Png)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        tracing::info!(count = record.frames().len(), dir = %dir.display(), "wrote frames");
    }
    Ok(())
}
