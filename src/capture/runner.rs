//! Capture runner - reads raw capture records from a receiver process or stdin

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Where raw capture records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    /// Newline-delimited records on our own stdin
    Stdin,
    /// Receiver program writing records to its stdout
    Command { program: String, args: Vec<String> },
}

/// Forwards raw capture records from a source to a channel
pub struct CaptureRunner {
    source: CaptureSource,
    running: Arc<AtomicBool>,
    records_received: Arc<AtomicU64>,
    lines_skipped: Arc<AtomicU64>,
}

impl CaptureRunner {
    pub fn new(source: CaptureSource) -> Self {
        Self {
            source,
            running: Arc::new(AtomicBool::new(false)),
            records_received: Arc::new(AtomicU64::new(0)),
            lines_skipped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Read records until the source closes, sending each one to `tx`
    pub async fn run(&self, tx: mpsc::Sender<Vec<u8>>) -> Result<()> {
        match &self.source {
            CaptureSource::Stdin => {
                info!("Reading capture records from stdin");
                self.forward(BufReader::new(tokio::io::stdin()), tx).await
            }
            CaptureSource::Command { program, args } => {
                self.run_command(program, args, tx).await
            }
        }
    }

    async fn run_command(
        &self,
        program: &str,
        args: &[String],
        tx: mpsc::Sender<Vec<u8>>,
    ) -> Result<()> {
        info!("Starting receiver: {} {}", program, args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn receiver {}", program))?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to capture receiver stdout")?;

        let stderr = child
            .stderr
            .take()
            .context("Failed to capture receiver stderr")?;

        // Receivers print status to stderr, not just errors
        let stderr_handle = tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if !line.is_empty() {
                    info!("receiver: {}", line);
                }
            }
        });

        let result = self.forward(BufReader::new(stdout), tx).await;

        let _ = child.kill().await;
        let _ = stderr_handle.await;

        result
    }

    /// Forward every record line of `reader` to `tx`
    pub async fn forward<R>(&self, reader: R, tx: mpsc::Sender<Vec<u8>>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.running.store(true, Ordering::SeqCst);

        let mut segments = reader.split(b'\n');
        let mut first_record = true;

        while self.running.load(Ordering::SeqCst) {
            match segments.next_segment().await {
                Ok(Some(line)) => {
                    let Some(record) = record_line(&line) else {
                        self.lines_skipped.fetch_add(1, Ordering::Relaxed);
                        continue;
                    };
                    if first_record {
                        info!("First capture record received");
                        first_record = false;
                    }
                    self.records_received.fetch_add(1, Ordering::Relaxed);
                    if tx.send(record.to_vec()).await.is_err() {
                        warn!("Channel closed, stopping capture");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Capture source closed");
                    break;
                }
                Err(e) => {
                    error!("Error reading capture source: {}", e);
                    self.running.store(false, Ordering::SeqCst);
                    return Err(e).context("Failed to read capture record");
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);

        debug!(
            "Capture stopped. Records: {}, Skipped lines: {}",
            self.records_received(),
            self.lines_skipped()
        );

        Ok(())
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn records_received(&self) -> u64 {
        self.records_received.load(Ordering::Relaxed)
    }

    pub fn lines_skipped(&self) -> u64 {
        self.lines_skipped.load(Ordering::Relaxed)
    }
}

/// Trim a raw line; blank lines and `#` comments carry no record
fn record_line(line: &[u8]) -> Option<&[u8]> {
    let start = line.iter().position(|b| !b.is_ascii_whitespace())?;
    let end = line.iter().rposition(|b| !b.is_ascii_whitespace())?;
    let line = &line[start..=end];
    if line.starts_with(b"#") {
        return None;
    }
    Some(line)
}
