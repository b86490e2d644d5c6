//! Error types for scrctl

use openracing_scr_driver::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Could not resolve server address: {0}")]
    Resolve(String),

    #[error("Server did not acknowledge identification after {attempts} attempts")]
    HandshakeFailed { attempts: u32 },

    #[error("Invalid stage {0}: expected 0 (warm-up), 1 (qualifying), 2 (race) or 3 (unknown)")]
    InvalidStage(u8),

    #[error("Invalid control configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ClientError::Resolve(_) | ClientError::Transport(_) => 2,
            ClientError::HandshakeFailed { .. } => 3,
            ClientError::InvalidStage(_) | ClientError::Config(_) => 4,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
