//! scrctl - Simulated Car Racing driver client
//!
//! Connects to an SCR race server over UDP, identifies itself and drives the
//! car with the PID controller until the race ends.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use openracing_scr_driver::ControlConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrctl::config::parse_stage;
use scrctl::{ClientConfig, ClientError, Session, SessionSummary, Stage, UdpTransport, output};

#[derive(Parser, Debug)]
#[command(name = "scrctl")]
#[command(about = "Autonomous driver client for the Simulated Car Racing server")]
#[command(version)]
#[command(long_about = "
scrctl identifies itself to an SCR race server, then answers every telemetry
datagram with one driving action computed by a PID controller. It runs until
the server shuts the race down or the requested number of episodes is done.

Controller tuning can be overridden with a YAML file via --driver-config.
")]
struct Cli {
    /// Race server host
    #[arg(long, default_value = "localhost", env = "SCR_HOST")]
    host: String,

    /// Race server port
    #[arg(short, long, default_value_t = 3001, env = "SCR_PORT")]
    port: u16,

    /// Client identifier sent with the identification message
    #[arg(long, default_value = "SCR")]
    id: String,

    /// Episodes to run before exiting
    #[arg(long, alias = "maxEpisodes", default_value_t = 1)]
    max_episodes: u32,

    /// Telemetry datagrams per episode before requesting a restart (0 = unlimited)
    #[arg(long, alias = "maxSteps", default_value_t = 0)]
    max_steps: u64,

    /// Track name, for logging only
    #[arg(long)]
    track: Option<String>,

    /// Race stage: 0 warm-up, 1 qualifying, 2 race, 3 unknown
    #[arg(long, default_value = "3", value_parser = parse_stage)]
    stage: Stage,

    /// Log every datagram sent and received
    #[arg(long)]
    debug: bool,

    /// Give up after this many unanswered identification attempts
    #[arg(long)]
    connect_attempts: Option<u32>,

    /// YAML file overriding controller tuning
    #[arg(long, value_name = "PATH")]
    driver_config: Option<PathBuf>,

    /// Output format (human-readable or JSON)
    #[arg(long, help = "Output in JSON format for machine parsing")]
    json: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match (self.verbose, self.debug) {
            (0, false) => "warn",
            (1, false) => "info",
            (0..=2, _) => "debug",
            _ => "trace",
        }
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            host: self.host.clone(),
            port: self.port,
            client_id: self.id.clone(),
            max_episodes: self.max_episodes,
            max_steps: self.max_steps,
            track: self.track.clone(),
            stage: self.stage,
            connect_attempts: self.connect_attempts,
            ..ClientConfig::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = cli.log_level();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "scrctl={log_level},openracing_scr_driver={log_level},openracing_scr_protocol={log_level}"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(&cli).await {
        Ok(summary) => {
            output::print_summary(&summary, cli.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let code = e
                .downcast_ref::<ClientError>()
                .map_or(1, ClientError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: &Cli) -> Result<SessionSummary> {
    let control = match &cli.driver_config {
        Some(path) => ControlConfig::load(path)
            .map_err(ClientError::from)
            .with_context(|| format!("loading driver config {}", path.display()))?,
        None => ControlConfig::default(),
    };

    let config = cli.client_config();
    let transport = UdpTransport::connect(&config.host, config.port).await?;
    tracing::info!(server = %transport.server_addr(), "Connecting to race server");

    let mut session = Session::new(transport, config, control);
    Ok(session.run().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["scrctl"])?;
        assert_eq!(cli.id, "SCR");
        assert_eq!(cli.max_episodes, 1);
        assert_eq!(cli.max_steps, 0);
        assert_eq!(cli.stage, Stage::Unknown);
        assert!(cli.track.is_none());
        assert!(cli.connect_attempts.is_none());
        assert!(!cli.debug);
        assert_eq!(cli.log_level(), "warn");
        Ok(())
    }

    #[test]
    fn parse_camel_case_aliases() -> TestResult {
        let cli = Cli::try_parse_from(["scrctl", "--maxEpisodes", "3", "--maxSteps", "1000"])?;
        assert_eq!(cli.max_episodes, 3);
        assert_eq!(cli.max_steps, 1000);
        Ok(())
    }

    #[test]
    fn parse_full_session_options() -> TestResult {
        let cli = Cli::try_parse_from([
            "scrctl",
            "--host",
            "10.0.0.2",
            "--port",
            "3002",
            "--id",
            "SCR1",
            "--track",
            "e-track-4",
            "--stage",
            "2",
            "--connect-attempts",
            "5",
        ])?;
        let config = cli.client_config();
        assert_eq!(config.server_addr(), "10.0.0.2:3002");
        assert_eq!(config.client_id, "SCR1");
        assert_eq!(config.track.as_deref(), Some("e-track-4"));
        assert_eq!(config.stage, Stage::Race);
        assert_eq!(config.connect_attempts, Some(5));
        Ok(())
    }

    #[test]
    fn parse_rejects_unknown_stage() {
        let parsed = Cli::try_parse_from(["scrctl", "--stage", "4"]);
        assert!(matches!(parsed, Err(e) if e.kind() == clap::error::ErrorKind::ValueValidation));
    }

    #[test]
    fn parse_verbose_levels() -> TestResult {
        assert_eq!(Cli::try_parse_from(["scrctl", "-v"])?.log_level(), "info");
        assert_eq!(Cli::try_parse_from(["scrctl", "-vv"])?.log_level(), "debug");
        assert_eq!(Cli::try_parse_from(["scrctl", "-vvv"])?.log_level(), "trace");
        assert_eq!(Cli::try_parse_from(["scrctl", "--debug"])?.log_level(), "debug");
        Ok(())
    }
}
