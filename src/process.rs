use std::os::unix::process::CommandExt;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{self, Context};
use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tracing::{error, trace};

/// Owns one agent process and every process it starts.
///
/// The agent leads its own process group; killing it kills the whole group. The group is killed
/// on drop if it was not terminated before.
#[derive(Debug)]
pub struct AgentProcess {
    child: Child,
    cleaned_up: bool,
}

impl AgentProcess {
    /// Spawn `command` with piped stdin/stdout. Stderr is inherited when `allow_stderr` is set,
    /// discarded otherwise.
    pub fn launch(command: &str, args: &[String], allow_stderr: bool) -> anyhow::Result<Self> {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .process_group(0);
        if !allow_stderr {
            cmd.stderr(Stdio::null());
        }
        let child = cmd
            .spawn()
            .with_context(|| format!("command '{command}' could not be started"))?;
        trace!(pid = child.id(), command, "agent process started");

        Ok(AgentProcess {
            child,
            cleaned_up: false,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Both pipes, once. Returns `None` on the second call.
    pub fn take_pipes(&mut self) -> Option<(ChildStdin, ChildStdout)> {
        Some((self.child.stdin.take()?, self.child.stdout.take()?))
    }

    /// Kill the process group and reap the leader. Does nothing if already done.
    pub fn try_kill(&mut self) -> anyhow::Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        // the leader is not reaped yet, so its pid still names the group
        let group = Pid::from_raw(self.child.id() as i32);
        match killpg(group, Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => {
                return Err(e).context("could not kill process group");
            }
        }
        let status = self.child.wait().context("could not reap process")?;
        self.cleaned_up = true;
        trace!(pid = self.child.id(), %status, "agent process group terminated");
        Ok(())
    }

    pub fn is_terminated(&self) -> bool {
        self.cleaned_up
    }
}

impl Drop for AgentProcess {
    fn drop(&mut self) {
        if let Err(e) = self.try_kill() {
            error!(pid = self.child.id(), "could not kill agent process on drop: {e:#}");
        }
    }
}
