//! Source → translator → sink plumbing.
//!
//! Three cooperating tasks joined by bounded in-order channels: a source
//! task producing decoded oplog entries, the translator loop running on
//! the caller's task as the single owner of the schema catalog, and a
//! sink task consuming statement batches. Every channel interaction is
//! raced against a cancellation token so all stages return promptly on
//! shutdown.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::error::TranslateError;
use crate::oplog::Oplog;
use crate::translator::Translator;

/// Queue depth between pipeline stages.
const CHANNEL_CAPACITY: usize = 64;

/// Boxed error for adapter failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Produces decoded oplog entries in source order.
///
/// Implementations send into `records` until the source is exhausted,
/// `shutdown` fires, or the receiving side goes away. A closed channel
/// means the pipeline is stopping and is not an error.
#[async_trait]
pub trait Source: Send {
    async fn read(
        &mut self,
        shutdown: CancellationToken,
        records: mpsc::Sender<Oplog>,
    ) -> Result<(), BoxError>;
}

/// Consumes statement batches in emission order.
///
/// `batches` closes when the translator is done; implementations drain it
/// and return. The first write/execution failure is terminal.
#[async_trait]
pub trait Sink: Send {
    async fn write(
        &mut self,
        shutdown: CancellationToken,
        batches: mpsc::Receiver<Vec<String>>,
    ) -> Result<(), BoxError>;
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source failed")]
    Source(#[source] BoxError),

    #[error("sink failed")]
    Sink(#[source] BoxError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("pipeline task panicked")]
    Join(#[from] tokio::task::JoinError),
}

/// A single source → translator → sink run.
pub struct Pipeline {
    source: Box<dyn Source>,
    sink: Box<dyn Sink>,
    translator: Translator,
}

impl Pipeline {
    pub fn new(source: Box<dyn Source>, sink: Box<dyn Sink>, translator: Translator) -> Self {
        Self {
            source,
            sink,
            translator,
        }
    }

    /// Run to completion or cancellation.
    ///
    /// A translation error stops all stages and is returned after both
    /// tasks have been joined. Batches are only ever sent whole; a record
    /// that fails to translate contributes nothing to the sink stream.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), PipelineError> {
        let Self {
            mut source,
            mut sink,
            mut translator,
        } = self;

        let stages = shutdown.child_token();
        let (record_tx, mut record_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (batch_tx, batch_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let source_token = stages.clone();
        let source_task =
            tokio::spawn(async move { source.read(source_token, record_tx).await });

        let sink_token = stages.clone();
        let sink_task = tokio::spawn(async move { sink.write(sink_token, batch_rx).await });

        let mut failure = None;
        loop {
            let record = tokio::select! {
                _ = stages.cancelled() => break,
                record = record_rx.recv() => match record {
                    Some(record) => record,
                    None => break,
                },
            };
            match translator.process(&record) {
                Ok(batch) => {
                    let delivered = tokio::select! {
                        _ = stages.cancelled() => break,
                        sent = batch_tx.send(batch) => sent.is_ok(),
                    };
                    if !delivered {
                        break;
                    }
                }
                Err(err) => {
                    error!(%err, "translation failed, stopping pipeline");
                    failure = Some(err);
                    break;
                }
            }
        }
        if failure.is_some() {
            stages.cancel();
        }
        // Closing the channels lets a blocked source send fail out and the
        // sink drain to completion.
        drop(record_rx);
        drop(batch_tx);

        let source_result = source_task.await?;
        let sink_result = sink_task.await?;
        if let Some(err) = failure {
            return Err(err.into());
        }
        source_result.map_err(PipelineError::Source)?;
        sink_result.map_err(PipelineError::Sink)?;
        Ok(())
    }
}
