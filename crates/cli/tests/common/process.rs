//! Helpers for running the `autoreload` binary

use anyhow::{Context, Result};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// Running `autoreload` child process, killed on drop
pub struct AutoreloadProcess {
    child: Child,
}

impl AutoreloadProcess {
    /// Spawn the binary in `working_dir` with `args`
    pub fn spawn(working_dir: impl AsRef<Path>, args: &[&str]) -> Result<Self> {
        let child = Command::new(env!("CARGO_BIN_EXE_autoreload"))
            .args(args)
            .current_dir(working_dir.as_ref())
            .env("RUST_LOG", "info")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn autoreload")?;

        Ok(Self { child })
    }

    /// Deliver SIGINT, as Ctrl-C would
    pub fn interrupt(&self) -> Result<()> {
        kill(Pid::from_raw(self.child.id() as i32), Signal::SIGINT)
            .context("Failed to send SIGINT")?;
        Ok(())
    }

    /// Wait for exit, failing after `timeout`
    pub fn wait_timeout(&mut self, timeout: Duration) -> Result<ExitStatus> {
        let start = Instant::now();
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Ok(status);
            }
            if start.elapsed() > timeout {
                anyhow::bail!("autoreload still running after {:?}", timeout);
            }
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    /// Everything written to stderr, once the process has exited
    pub fn stderr(&mut self) -> String {
        let mut output = String::new();
        if let Some(mut stderr) = self.child.stderr.take() {
            let _ = stderr.read_to_string(&mut output);
        }
        output
    }
}

impl Drop for AutoreloadProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
