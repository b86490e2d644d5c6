//! Typed client configuration.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::ClientError;

/// Race stage announced by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    WarmUp,
    Qualifying,
    Race,
    #[default]
    Unknown,
}

impl TryFrom<u8> for Stage {
    type Error = ClientError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Stage::WarmUp),
            1 => Ok(Stage::Qualifying),
            2 => Ok(Stage::Race),
            3 => Ok(Stage::Unknown),
            other => Err(ClientError::InvalidStage(other)),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::WarmUp => "warm-up",
            Stage::Qualifying => "qualifying",
            Stage::Race => "race",
            Stage::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Parse a stage number for clap.
pub fn parse_stage(value: &str) -> Result<Stage, String> {
    let number: u8 = value
        .parse()
        .map_err(|e| format!("stage must be a number: {e}"))?;
    Stage::try_from(number).map_err(|e| e.to_string())
}

/// Everything the session needs to reach and drive against a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Client identifier prefixed to the identification message.
    pub client_id: String,
    pub max_episodes: u32,
    /// Telemetry datagrams per episode before a restart is requested; 0 = unlimited.
    pub max_steps: u64,
    pub track: Option<String>,
    pub stage: Stage,
    /// Identification attempts before giving up; `None` retries forever.
    pub connect_attempts: Option<u32>,
    pub recv_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3001,
            client_id: "SCR".to_string(),
            max_episodes: 1,
            max_steps: 0,
            track: None,
            stage: Stage::Unknown,
            connect_attempts: None,
            recv_timeout: Duration::from_secs(1),
        }
    }
}

impl ClientConfig {
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Step limit, if one is set.
    pub fn step_limit(&self) -> Option<u64> {
        (self.max_steps > 0).then_some(self.max_steps)
    }
}
