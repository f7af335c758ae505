use crate::detectors::{parse_line, FpingProcess};
use crate::reporter::Sink;
use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub lines: u64,
    pub skipped: u64,
    pub written: u64,
}

/// Parse every line of `reader` and write the measurements, until the stream closes.
///
/// Lines that don't match fping's summary layout are skipped. The first failed
/// write stops the loop and is returned.
pub async fn collect<R, S>(reader: R, sink: &mut S) -> Result<Stats>
where
    R: AsyncBufRead + Unpin,
    S: Sink,
{
    let mut stats = Stats::default();
    let mut lines = reader.split(b'\n');

    while let Some(raw) = lines.next_segment().await.context("read fping stderr")? {
        stats.lines += 1;
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim_end_matches('\r');
        match parse_line(&line) {
            Ok(Some(measurement)) => {
                sink.write(&measurement).await?;
                stats.written += 1;
            }
            Ok(None) => (),
            Err(e) => {
                warn!("Skip fping line {:?}, err:{}", line, e);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}

/// Drive fping until its stderr closes, then log what it left on stdout and reap it.
pub async fn run<S: Sink>(mut process: FpingProcess, sink: &mut S) -> Result<Stats> {
    let stderr = process
        .take_stderr()
        .ok_or_else(|| anyhow!("fping stderr already taken"))?;
    info!("Start collect, fping pid:{:?}", process.id());

    let stats = collect(stderr, sink).await?;
    info!(
        "fping stderr closed, lines:{}, skipped:{}, written:{}",
        stats.lines, stats.skipped, stats.written
    );

    match process.read_summary().await? {
        Some(line) => info!("stdout: {}", line),
        None => warn!("fping stdout closed without output"),
    }

    let status = process.wait().await?;
    if status.success() {
        info!("fping exited, {}", status);
    } else {
        warn!("fping exited, {}", status);
    }

    Ok(stats)
}
