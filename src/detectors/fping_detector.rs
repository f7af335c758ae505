use crate::conf::Conf;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::info;

/// Probe every 6 seconds without retries, loop forever and print a per target
/// summary to stderr every 60 seconds.
pub const PROBE_FLAGS: [&str; 7] = [
    "--backoff=1",
    "--timestamp",
    "--retry=0",
    "--tos=0",
    "--squiet=60",
    "--period=6000",
    "--loop",
];

#[derive(Debug, Clone)]
pub struct FpingDetector {
    path: PathBuf,
    targets: Vec<String>,
}

impl FpingDetector {
    pub fn new(path: impl Into<PathBuf>, targets: Vec<String>) -> Self {
        Self {
            path: path.into(),
            targets,
        }
    }

    pub fn from_conf(conf: &Conf) -> Self {
        Self::new(&conf.fping_path, conf.targets.clone())
    }

    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(PROBE_FLAGS.len() + self.targets.len());
        args.extend(PROBE_FLAGS.iter().map(|f| f.to_string()));
        args.extend(self.targets.iter().cloned());
        args
    }

    pub fn spawn(&self) -> Result<FpingProcess> {
        let args = self.build_args();
        info!("Start {} with {} targets", self.path.display(), self.targets.len());

        let mut child = Command::new(&self.path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("start fping {}", self.path.display()))?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("fping stderr pipe unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("fping stdout pipe unavailable"))?;

        Ok(FpingProcess {
            child,
            stderr: Some(BufReader::new(stderr)),
            stdout: BufReader::new(stdout),
        })
    }
}

/// A running fping with its output pipes.
#[derive(Debug)]
pub struct FpingProcess {
    child: Child,
    stderr: Option<BufReader<ChildStderr>>,
    stdout: BufReader<ChildStdout>,
}

impl FpingProcess {
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Hand out the stderr stream, only the first call gets it.
    pub fn take_stderr(&mut self) -> Option<BufReader<ChildStderr>> {
        self.stderr.take()
    }

    /// Read the single line fping leaves on stdout. `None` if stdout closed empty.
    pub async fn read_summary(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self
            .stdout
            .read_line(&mut line)
            .await
            .context("read fping stdout")?;
        if n == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end().to_string()))
    }

    pub async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self.child.wait().await.context("wait fping exit")?;
        Ok(status)
    }
}
