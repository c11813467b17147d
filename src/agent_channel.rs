//! Talking to one external agent process over its standard input and output.
//!
//! Each request is two lines (`COLOR <id>`, `MOVE BOARD:<cells>`) and the answer is the next line
//! the agent writes, read under a deadline by a dedicated reader thread.

use std::fmt::Display;
use std::io::{BufRead, BufReader, Write};
use std::process::{ChildStdin, ChildStdout};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use tracing::{debug, instrument, warn};

use crate::agent::Agent;
use crate::board::Side;
use crate::configuration::Configuration;
use crate::process::AgentProcess;
use crate::protocol::{move_request, AGENT_ERROR_PREFIX};

/// Why a move request did not produce a candidate move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// No line arrived before the deadline.
    Timeout(Duration),
    /// The agent could not be talked to, or answered nothing usable.
    Communication(String),
}

impl Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::Timeout(d) => write!(f, "no response within {d:?}"),
            ChannelError::Communication(cause) => write!(f, "communication error: {cause}"),
        }
    }
}

impl std::error::Error for ChannelError {}

/// Anything able to answer move requests for one side.
///
/// [`AgentChannel`] is the production implementation; the arbiter only depends on this trait.
pub trait MoveSource {
    /// Player name used in logs and outcome reasons.
    fn name(&self) -> &str;

    /// Ask for the next move given the serialized board. Returns the trimmed, unvalidated answer.
    fn request_move(&mut self, board_snapshot: &str) -> Result<String, ChannelError>;
}

/// Line based connection to one agent process, bound to one side for one match.
///
/// The process is killed when the channel is dropped, on a timeout, or on [`terminate`].
///
/// [`terminate`]: AgentChannel::terminate
#[derive(Debug)]
pub struct AgentChannel {
    name: String,
    side: Side,
    stdin: ChildStdin,
    lines: Receiver<std::io::Result<String>>,
    response_timeout: Duration,
    process: AgentProcess,
}

impl AgentChannel {
    /// Launch `agent` to play `side`.
    #[instrument(skip_all, fields(agent = %agent.name, %side))]
    pub fn spawn(agent: &Agent, side: Side, config: &Configuration) -> anyhow::Result<Self> {
        let (command, args) = agent.command_line();
        let mut process = AgentProcess::launch(&command, &args, config.debug_agent_stderr)
            .with_context(|| format!("could not launch agent '{}'", agent.name))?;
        let (stdin, stdout) = process
            .take_pipes()
            .ok_or_else(|| anyhow!("agent process has no stdio pipes"))?;

        let name = format!("{side}({}) - {}", side.protocol_id(), agent.name);
        let lines = spawn_line_reader(&name, stdout)?;

        Ok(AgentChannel {
            name,
            side,
            stdin,
            lines,
            response_timeout: config.response_timeout,
            process,
        })
    }

    /// Side this agent plays.
    pub fn side(&self) -> Side {
        self.side
    }

    /// OS id of the agent process.
    pub fn process_id(&self) -> u32 {
        self.process.id()
    }

    /// True once the agent process has been killed and reaped.
    pub fn is_terminated(&self) -> bool {
        self.process.is_terminated()
    }

    /// Forcibly stop the agent. Calling it again is a no-op.
    pub fn terminate(&mut self) -> anyhow::Result<()> {
        self.process
            .try_kill()
            .with_context(|| format!("could not terminate {}", self.name))
    }

    fn send(&mut self, msg: &str) -> std::io::Result<()> {
        self.stdin.write_all(msg.as_bytes())?;
        self.stdin.flush()
    }

    fn kill_after_failure(&mut self) {
        if let Err(e) = self.terminate() {
            warn!("{e:#}");
        }
    }
}

impl MoveSource for AgentChannel {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(player = %self.name))]
    fn request_move(&mut self, board_snapshot: &str) -> Result<String, ChannelError> {
        // lines already received after the previous answer are stale; a late one that arrives
        // after this request is sent is taken as the answer
        while let Ok(stale) = self.lines.try_recv() {
            debug!(?stale, "discarding unrequested output");
        }

        let request = move_request(self.side, board_snapshot);
        if let Err(e) = self.send(&request) {
            self.kill_after_failure();
            return Err(ChannelError::Communication(format!(
                "could not send request: {e}"
            )));
        }
        debug!(request = request.trim_end(), "sent");

        // the deadline starts with the read
        let line = match self.lines.recv_timeout(self.response_timeout) {
            Ok(Ok(line)) => line,
            Ok(Err(e)) => {
                self.kill_after_failure();
                return Err(ChannelError::Communication(format!(
                    "could not read response: {e}"
                )));
            }
            Err(RecvTimeoutError::Timeout) => {
                self.kill_after_failure();
                return Err(ChannelError::Timeout(self.response_timeout));
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.kill_after_failure();
                return Err(ChannelError::Communication(
                    "agent closed its output".to_string(),
                ));
            }
        };

        let response = line.trim();
        debug!(response, "received");
        if response.is_empty() {
            self.kill_after_failure();
            return Err(ChannelError::Communication(
                "agent returned an empty move".to_string(),
            ));
        }
        if response.starts_with(AGENT_ERROR_PREFIX) {
            self.kill_after_failure();
            return Err(ChannelError::Communication(format!(
                "agent reported an error: {response}"
            )));
        }
        Ok(response.to_string())
    }
}

/// Forward every line of `stdout` to the returned receiver from a dedicated thread.
///
/// The thread ends on end of file, on a read error (sent once), or when the receiver is gone.
fn spawn_line_reader(
    name: &str,
    stdout: ChildStdout,
) -> anyhow::Result<Receiver<std::io::Result<String>>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(format!("reader {name}"))
        .spawn(move || {
            let mut reader = BufReader::new(stdout);
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.send(Ok(line)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        break;
                    }
                }
            }
        })
        .context("could not start agent reader thread")?;
    Ok(rx)
}
