use std::f64::consts::TAU;

use control::{
    ConstantController, Controller, IdentityObserver, LowPassObserver, Multisine, Observer, Prbs,
    RandomController, Signal, SignalController, SignalError, Sine, SumOfSines,
};
use physics::{BoxSpace, Space};

fn play<S: Signal>(controller: &mut SignalController<S>, steps: usize) -> Vec<f64> {
    (0..steps)
        .map(|_| Controller::<(), Vec<f64>>::act(controller, &())[0])
        .collect()
}

#[test]
fn constant_controller_ignores_observation() {
    let mut controller = ConstantController::new(vec![0.5]);
    assert_eq!(controller.act(&vec![1.0, 2.0]), vec![0.5]);
    assert_eq!(controller.act(&vec![-3.0, 0.0]), vec![0.5]);
}

#[test]
fn random_controller_samples_inside_the_action_space() -> anyhow::Result<()> {
    let space = BoxSpace::symmetric(vec![10.0])?;
    let mut controller = RandomController::new(space.clone(), Some(16));
    let actions: Vec<Vec<f64>> = (0..100).map(|_| controller.act(&vec![0.0, 0.0])).collect();
    assert!(actions.iter().all(|a| space.contains(a)));
    assert!(actions.windows(2).any(|w| w[0] != w[1]));
    Ok(())
}

#[test]
fn sine_controller_follows_closed_form() -> anyhow::Result<()> {
    let dt = 0.02;
    let mut controller = SignalController::new(Sine::new(2.0, 0.5, 0.0)?, dt)?;
    let values = play(&mut controller, 50);
    for (i, value) in values.iter().enumerate() {
        let expected = 2.0 * (TAU * 0.5 * i as f64 * dt).sin();
        assert!((value - expected).abs() < 1e-12);
    }
    assert_eq!(controller.step(), 50);

    Controller::<(), Vec<f64>>::reset(&mut controller);
    assert_eq!(play(&mut controller, 50), values);
    Ok(())
}

#[test]
fn sum_of_sines_adds_components() -> anyhow::Result<()> {
    let a = Sine::new(1.0, 0.3, 0.1)?;
    let b = Sine::new(0.5, 1.7, -0.4)?;
    let sum = SumOfSines::new(vec![a, b])?;
    for step in 0..100 {
        let expected = a.value(step, 0.05) + b.value(step, 0.05);
        assert!((sum.value(step, 0.05) - expected).abs() < 1e-12);
    }
    assert_eq!(SumOfSines::new(vec![]), Err(SignalError::Empty));
    Ok(())
}

#[test]
fn multisine_never_exceeds_amplitude() -> anyhow::Result<()> {
    let schroeder = Multisine::schroeder(3.0, 0.2, 8)?;
    let random = Multisine::random_phase(3.0, 0.2, 8, 42)?;
    for step in 0..2000 {
        assert!(schroeder.value(step, 0.01).abs() <= 3.0 + 1e-9);
        assert!(random.value(step, 0.01).abs() <= 3.0 + 1e-9);
    }
    // All harmonics line up at t = 0 only without phase shifts.
    assert!(schroeder.value(0, 0.01) < 3.0);
    Ok(())
}

#[test]
fn random_phase_multisine_is_reproducible() -> anyhow::Result<()> {
    let a = Multisine::random_phase(1.0, 0.1, 5, 7)?;
    let b = Multisine::random_phase(1.0, 0.1, 5, 7)?;
    let c = Multisine::random_phase(1.0, 0.1, 5, 8)?;
    assert_eq!(a, b);
    assert_ne!(a.phases(), c.phases());
    assert!(Multisine::schroeder(1.0, 0.1, 0).is_err());
    Ok(())
}

#[test]
fn prbs_is_deterministic_and_balanced() -> anyhow::Result<()> {
    let order = 7;
    let a = Prbs::new(order, 1.5, 1, 99)?;
    let b = Prbs::new(order, 1.5, 1, 99)?;
    assert_eq!(a, b);
    assert_eq!(a.period(), 127);

    // A maximal-length sequence has one more one than zeros per period.
    let ones = a.bits().iter().filter(|bit| **bit).count();
    assert_eq!(ones, 64);

    for step in 0..300 {
        let value = a.value(step, 0.1);
        assert!(value == 1.5 || value == -1.5);
        assert_eq!(value, a.value(step + 127, 0.1));
    }
    Ok(())
}

#[test]
fn prbs_holds_each_bit() -> anyhow::Result<()> {
    let fast = Prbs::new(5, 1.0, 1, 3)?;
    let slow = Prbs::new(5, 1.0, 4, 3)?;
    for step in 0..200 {
        assert_eq!(slow.value(step, 0.1), fast.value(step / 4, 0.1));
    }
    let mut controller = SignalController::new(slow, 0.1)?;
    let values = play(&mut controller, 8);
    assert_eq!(values[0], values[3]);
    assert_eq!(values[4], values[7]);
    Ok(())
}

#[test]
fn prbs_rejects_bad_parameters() {
    assert_eq!(Prbs::new(1, 1.0, 1, 0), Err(SignalError::InvalidOrder(1)));
    assert_eq!(Prbs::new(17, 1.0, 1, 0), Err(SignalError::InvalidOrder(17)));
    assert_eq!(Prbs::new(8, 1.0, 0, 0), Err(SignalError::ZeroHold));
    assert!(Prbs::new(8, -1.0, 1, 0).is_err());
}

#[test]
fn signal_controller_rejects_bad_time_step() -> anyhow::Result<()> {
    let sine = Sine::new(1.0, 1.0, 0.0)?;
    assert!(matches!(
        SignalController::new(sine, 0.0),
        Err(SignalError::NonPositive { name: "dt", .. })
    ));
    Ok(())
}

#[test]
fn boxed_signals_can_be_chosen_at_runtime() -> anyhow::Result<()> {
    let signal: Box<dyn Signal> = Box::new(Prbs::new(4, 2.0, 1, 0)?);
    let mut controller = SignalController::new(signal, 0.05)?;
    assert!(play(&mut controller, 30).iter().all(|v| v.abs() == 2.0));
    Ok(())
}

#[test]
fn identity_observer_passes_through() {
    let mut observer = IdentityObserver;
    assert_eq!(observer.observe(&vec![1.0, -2.0]), vec![1.0, -2.0]);
}

#[test]
fn low_pass_observer_smooths_towards_measurement() -> anyhow::Result<()> {
    let mut observer = LowPassObserver::new(0.5)?;
    assert_eq!(observer.observe(&vec![4.0]), vec![4.0]);
    assert_eq!(observer.observe(&vec![0.0]), vec![2.0]);
    assert_eq!(observer.observe(&vec![0.0]), vec![1.0]);

    observer.reset();
    assert_eq!(observer.observe(&vec![-8.0]), vec![-8.0]);

    assert!(LowPassObserver::new(0.0).is_err());
    assert!(LowPassObserver::new(1.5).is_err());
    Ok(())
}
