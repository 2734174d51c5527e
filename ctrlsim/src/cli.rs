use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum System {
    Cart,
    InvertedPendulum,
    Pendulum,
    Acrobot,
    GridWorld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Uniform samples from the action space
    Random,
    /// Constant action equal to the amplitude
    Constant,
    Sine,
    /// Schroeder-phased harmonic sweep
    Multisine,
    /// Pseudo-random binary sequence
    Prbs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ObserverKind {
    #[value(name = "none")]
    Off,
    Identity,
    LowPass,
}

/// Run one closed-loop rollout of a simulated control system.
#[derive(Parser, Debug)]
#[command(name = "ctrlsim", version)]
pub struct Cli {
    /// System to simulate
    #[arg(long, value_enum, default_value_t = System::Cart)]
    pub system: System,

    /// Maximum number of rollout steps
    #[arg(long, default_value_t = 500)]
    pub steps: usize,

    /// Per-episode step limit of the environment (system default if omitted)
    #[arg(long)]
    pub budget: Option<usize>,

    /// Seed for the environment and any random policy
    #[arg(long, default_value_t = 16)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = Policy::Random)]
    pub policy: Policy,

    /// Signal amplitude, or the action of the constant policy
    #[arg(long, default_value_t = 1.0)]
    pub amplitude: f64,

    /// Sine frequency or multisine base frequency in Hz
    #[arg(long, default_value_t = 0.5)]
    pub frequency: f64,

    /// Number of multisine harmonics
    #[arg(long, default_value_t = 8)]
    pub harmonics: usize,

    /// Draw multisine phases at random instead of using Schroeder phases
    #[arg(long)]
    pub random_phase: bool,

    /// Shift register order of the PRBS (2 to 16)
    #[arg(long, default_value_t = 8)]
    pub prbs_order: u32,

    /// Steps each PRBS bit is held for
    #[arg(long, default_value_t = 1)]
    pub hold: usize,

    #[arg(long, value_enum, default_value_t = ObserverKind::Off)]
    pub observer: ObserverKind,

    /// Smoothing factor of the low-pass observer
    #[arg(long, default_value_t = 0.3)]
    pub alpha: f64,

    /// JSON file with the system configuration
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Render frames as RGB arrays
    #[arg(long)]
    pub render: bool,

    /// Write rendered frames as PNG files into this directory (implies --render)
    #[arg(long, value_name = "DIR")]
    pub frames_dir: Option<PathBuf>,

    /// Write the trajectory record as JSON
    #[arg(long, value_name = "JSON")]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn renders(&self) -> bool {
        self.render || self.frames_dir.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_a_random_cart() {
        let cli = Cli::try_parse_from(["ctrlsim"]).unwrap();
        assert_eq!(cli.system, System::Cart);
        assert_eq!(cli.policy, Policy::Random);
        assert_eq!(cli.observer, ObserverKind::Off);
        assert_eq!((cli.steps, cli.seed), (500, 16));
        assert!(!cli.renders());
    }

    #[test]
    fn kebab_case_values_parse() {
        let cli = Cli::try_parse_from([
            "ctrlsim",
            "--system",
            "inverted-pendulum",
            "--policy",
            "prbs",
            "--prbs-order",
            "10",
            "--observer",
            "low-pass",
            "--frames-dir",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.system, System::InvertedPendulum);
        assert_eq!(cli.policy, Policy::Prbs);
        assert_eq!(cli.prbs_order, 10);
        assert_eq!(cli.observer, ObserverKind::LowPass);
        assert!(cli.renders());

        let cli = Cli::try_parse_from(["ctrlsim", "--system", "grid-world", "--observer", "none"]).unwrap();
        assert_eq!(cli.system, System::GridWorld);
        assert_eq!(cli.observer, ObserverKind::Off);
    }

    #[test]
    fn unknown_system_is_rejected() {
        assert!(Cli::try_parse_from(["ctrlsim", "--system", "mountain-car"]).is_err());
        let cli = Cli::try_parse_from(["ctrlsim", "--system", "pendulum"]).unwrap();
        assert_eq!(cli.system, System::Pendulum);
    }
}
