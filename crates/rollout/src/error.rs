use physics::EnvError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RolloutError {
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("failed to export trajectory: {0}")]
    Export(#[from] serde_json::Error),
}
