//! Line-oriented file source and sink.
//!
//! The input format is one JSON array of oplog entries per line; the
//! sink writes one statement per line.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use oplog2sql_core::oplog::Oplog;
use oplog2sql_core::pipeline::{BoxError, Sink, Source};

/// Reads change records from a JSON-lines file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Source for FileSource {
    async fn read(
        &mut self,
        shutdown: CancellationToken,
        records: mpsc::Sender<Oplog>,
    ) -> Result<(), BoxError> {
        let file = File::open(&self.path).await?;
        let mut lines = BufReader::new(file).lines();
        loop {
            let line = tokio::select! {
                _ = shutdown.cancelled() => return Ok(()),
                line = lines.next_line() => line?,
            };
            let Some(line) = line else {
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }
            let batch: Vec<Oplog> = serde_json::from_str(&line)?;
            for record in batch {
                let delivered = tokio::select! {
                    _ = shutdown.cancelled() => return Ok(()),
                    sent = records.send(record) => sent.is_ok(),
                };
                if !delivered {
                    return Ok(());
                }
            }
        }
    }
}

/// Writes statements to a file, one per line.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn write(
        &mut self,
        shutdown: CancellationToken,
        mut batches: mpsc::Receiver<Vec<String>>,
    ) -> Result<(), BoxError> {
        let file = File::create(&self.path).await?;
        let mut writer = BufWriter::new(file);
        loop {
            let batch = tokio::select! {
                _ = shutdown.cancelled() => break,
                batch = batches.recv() => match batch {
                    Some(batch) => batch,
                    None => break,
                },
            };
            for statement in &batch {
                writer.write_all(statement.as_bytes()).await?;
                writer.write_all(b"\n").await?;
            }
        }
        writer.flush().await?;
        Ok(())
    }
}
