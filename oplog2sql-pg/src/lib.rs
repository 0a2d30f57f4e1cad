//! PostgreSQL statement sink.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use oplog2sql_core::pipeline::{BoxError, Sink};

const MAX_CONNECTIONS: u32 = 25;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Executes translated statements against PostgreSQL, one at a time and
/// in emission order. The first execution error is terminal.
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    /// Connect and verify the database answers.
    pub async fn connect(uri: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(uri)
            .await?;
        info!("connected to PostgreSQL");
        Ok(Self { pool })
    }
}

#[async_trait]
impl Sink for PostgresSink {
    async fn write(
        &mut self,
        shutdown: CancellationToken,
        mut batches: mpsc::Receiver<Vec<String>>,
    ) -> Result<(), BoxError> {
        loop {
            let batch = tokio::select! {
                _ = shutdown.cancelled() => return Ok(()),
                batch = batches.recv() => match batch {
                    Some(batch) => batch,
                    None => return Ok(()),
                },
            };
            for statement in &batch {
                debug!(%statement, "executing");
                sqlx::query(statement).execute(&self.pool).await?;
            }
        }
    }
}
