//! Identification handshake and the episode loop.
//!
//! A session identifies itself to the server, then runs episodes until the
//! server shuts down or the configured episode count is reached. Every
//! telemetry datagram is one control tick answered with exactly one action.

use openracing_scr_driver::{ControlConfig, Driver, TickOutcome};
use openracing_scr_protocol::{
    ActionCommand, CarState, ServerFrame, decode, encode, init_message,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::DatagramTransport;

/// Largest datagram the server sends, with headroom for opponent sensors.
pub const MAX_DATAGRAM_SIZE: usize = 2048;

/// What a finished session did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub episodes: u32,
    /// Telemetry datagrams answered with an action.
    pub ticks: u64,
    /// Telemetry datagrams that could not be decoded or projected.
    pub skipped: u64,
    /// Receive timeouts waited through while racing.
    pub timeouts: u64,
    pub server_shutdown: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handshake {
    Identified,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EpisodeEnd {
    Restart,
    Shutdown,
}

pub struct Session<T> {
    transport: T,
    config: ClientConfig,
    control: ControlConfig,
    summary: SessionSummary,
    buf: Vec<u8>,
}

impl<T: DatagramTransport> Session<T> {
    pub fn new(transport: T, config: ClientConfig, control: ControlConfig) -> Self {
        Self {
            transport,
            config,
            control,
            summary: SessionSummary::default(),
            buf: vec![0; MAX_DATAGRAM_SIZE],
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Run episodes until shutdown or the episode limit.
    pub async fn run(&mut self) -> ClientResult<SessionSummary> {
        info!(
            client_id = %self.config.client_id,
            track = self.config.track.as_deref().unwrap_or("unknown"),
            stage = %self.config.stage,
            max_episodes = self.config.max_episodes,
            max_steps = self.config.max_steps,
            "Starting session"
        );

        while self.summary.episodes < self.config.max_episodes {
            if self.identify().await? == Handshake::Shutdown {
                self.summary.server_shutdown = true;
                break;
            }

            let end = self.run_episode().await?;
            self.summary.episodes = self.summary.episodes.saturating_add(1);
            info!(
                episode = self.summary.episodes,
                ticks = self.summary.ticks,
                "Episode finished"
            );

            if end == EpisodeEnd::Shutdown {
                self.summary.server_shutdown = true;
                break;
            }
        }

        Ok(self.summary.clone())
    }

    async fn identify(&mut self) -> ClientResult<Handshake> {
        let init = init_message(&self.config.client_id, &self.control.rangefinder_angles);
        let mut attempts: u32 = 0;

        loop {
            if let Some(limit) = self.config.connect_attempts
                && attempts >= limit
            {
                return Err(ClientError::HandshakeFailed { attempts });
            }
            attempts = attempts.saturating_add(1);

            debug!(message = %init, attempt = attempts, "Sending identification");
            self.transport.send(init.as_bytes()).await?;

            let Some(len) = self
                .transport
                .recv(&mut self.buf, self.config.recv_timeout)
                .await?
            else {
                debug!(attempt = attempts, "No reply to identification");
                continue;
            };

            let datagram = self.buf.get(..len).unwrap_or_default();
            match ServerFrame::classify(datagram) {
                ServerFrame::Identified => {
                    info!(attempts, "Client identified");
                    return Ok(Handshake::Identified);
                }
                ServerFrame::Shutdown => {
                    info!("Server shut down before identification");
                    return Ok(Handshake::Shutdown);
                }
                other => debug!(frame = ?other, "Ignoring datagram while identifying"),
            }
        }
    }

    async fn run_episode(&mut self) -> ClientResult<EpisodeEnd> {
        let mut driver = Driver::new(self.control.clone());
        let step_limit = self.config.step_limit();
        let mut steps: u64 = 0;

        loop {
            let Some(len) = self
                .transport
                .recv(&mut self.buf, self.config.recv_timeout)
                .await?
            else {
                self.summary.timeouts = self.summary.timeouts.saturating_add(1);
                warn!("No telemetry from server, waiting");
                continue;
            };

            let datagram = self.buf.get(..len).unwrap_or_default();
            let raw = match ServerFrame::classify(datagram) {
                ServerFrame::Shutdown => {
                    info!("Server requested shutdown");
                    return Ok(EpisodeEnd::Shutdown);
                }
                ServerFrame::Restart => {
                    info!("Server restarted the race");
                    return Ok(EpisodeEnd::Restart);
                }
                ServerFrame::Identified => {
                    debug!("Duplicate identification acknowledgement");
                    continue;
                }
                ServerFrame::Telemetry(raw) => raw,
            };

            steps = steps.saturating_add(1);
            let reply = if step_limit.is_some_and(|limit| steps >= limit) {
                info!(steps, "Step limit reached, requesting restart");
                driver.action().with_restart_request()
            } else {
                match tick(&mut driver, raw) {
                    Some(action) => action,
                    None => {
                        self.summary.skipped = self.summary.skipped.saturating_add(1);
                        continue;
                    }
                }
            };

            let wire = encode(&reply);
            debug!(action = %String::from_utf8_lossy(&wire), "Sending action");
            self.transport.send(&wire).await?;
            self.summary.ticks = self.summary.ticks.saturating_add(1);
        }
    }
}

/// Decode, project and drive one telemetry datagram.
fn tick(driver: &mut Driver, raw: &[u8]) -> Option<ActionCommand> {
    debug!(telemetry = %String::from_utf8_lossy(raw), "Received telemetry");

    let record = match decode(raw) {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "Skipping undecodable datagram");
            return None;
        }
    };
    let state = match CarState::from_record(&record) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "Skipping telemetry with unusable fields");
            return None;
        }
    };

    let outcome: TickOutcome = driver.drive(&state);
    debug!(?outcome, "Tick complete");
    Some(*driver.action())
}
