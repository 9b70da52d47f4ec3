//! Where jobs come from.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::{LinesStream, ReceiverStream};
use tokio_stream::StreamExt;
use tracing::warn;

use super::SyncJob;
use crate::errors::SyncError;

/// A stream of jobs for the orchestrator.
///
/// `None` means the source is exhausted. An `Err` item reports a job that could not be
/// read; the source stays usable afterwards.
#[async_trait]
pub trait JobSource: Send {
    async fn next_job(&mut self) -> Option<Result<SyncJob, SyncError>>;
}

/// Reads newline-delimited JSON jobs, one per line.
pub struct LineJobSource<R> {
    lines: LinesStream<R>,
    line_number: usize,
}

impl<R> LineJobSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: LinesStream::new(reader.lines()),
            line_number: 0,
        }
    }
}

impl LineJobSource<tokio::io::BufReader<tokio::io::Stdin>> {
    /// Jobs from standard input.
    pub fn stdin() -> Self {
        Self::new(tokio::io::BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R> JobSource for LineJobSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_job(&mut self) -> Option<Result<SyncJob, SyncError>> {
        loop {
            let line = match self.lines.next().await? {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Failed to read job input");
                    return None;
                }
            };
            self.line_number += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            return Some(serde_json::from_str(line).map_err(|e| {
                SyncError::job(format!("line {}: {}", self.line_number, e))
            }));
        }
    }
}

/// Receives jobs dispatched in-process.
pub struct ChannelJobSource {
    jobs: ReceiverStream<SyncJob>,
}

impl ChannelJobSource {
    pub fn new(receiver: mpsc::Receiver<SyncJob>) -> Self {
        Self {
            jobs: ReceiverStream::new(receiver),
        }
    }

    /// Create a source together with the sender that feeds it.
    pub fn channel(buffer: usize) -> (mpsc::Sender<SyncJob>, Self) {
        let (sender, receiver) = mpsc::channel(buffer);
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl JobSource for ChannelJobSource {
    async fn next_job(&mut self) -> Option<Result<SyncJob, SyncError>> {
        self.jobs.next().await.map(Ok)
    }
}
