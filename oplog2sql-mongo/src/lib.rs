//! Tailable oplog source backed by MongoDB.
//!
//! Streams `local.oplog.rs` in two phases: a `$natural`-ordered scan of
//! the entries that already exist, then a tailable-await cursor that
//! follows new entries from the newest pre-scan timestamp onward. The
//! second phase runs until cancellation, so a pipeline fed by this source
//! is effectively unbounded.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{ClientOptions, CursorType, FindOneOptions, FindOptions};
use mongodb::{Client, Collection, Cursor};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use oplog2sql_core::oplog::{Oplog, OP_DELETE, OP_INSERT, OP_UPDATE};
use oplog2sql_core::pipeline::{BoxError, Source};

/// The oplog's own namespace; entries about it are never forwarded.
const OPLOG_NS: &str = "local.oplog.rs";

/// Server-side wait per poll of the tailable cursor.
const MAX_AWAIT: Duration = Duration::from_secs(1);

const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Streams change records from a MongoDB replica-set member's oplog.
pub struct MongoSource {
    client: Client,
}

impl MongoSource {
    /// Connect directly to the given member and verify it answers.
    pub async fn connect(uri: &str) -> Result<Self, mongodb::error::Error> {
        let mut options = ClientOptions::parse(uri).await?;
        options.direct_connection = Some(true);
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        info!("connected to MongoDB");
        Ok(Self { client })
    }

    fn oplog_collection(&self) -> Collection<Document> {
        self.client.database("local").collection("oplog.rs")
    }
}

#[async_trait]
impl Source for MongoSource {
    async fn read(
        &mut self,
        shutdown: CancellationToken,
        records: mpsc::Sender<Oplog>,
    ) -> Result<(), BoxError> {
        let collection = self.oplog_collection();

        // Remember where the oplog currently ends so the tail phase can
        // pick up exactly after the scan phase.
        let newest = collection
            .find_one(
                doc! {},
                FindOneOptions::builder().sort(doc! { "$natural": -1 }).build(),
            )
            .await?;
        let resume_after = newest.as_ref().and_then(|entry| entry.get_timestamp("ts").ok());

        info!("processing existing oplog entries");
        let options = FindOptions::builder().sort(doc! { "$natural": 1 }).build();
        let mut cursor = collection.find(doc! {}, options).await?;
        while let Some(document) = next_document(&mut cursor, &shutdown).await? {
            let Some(record) = decode_entry(document) else {
                continue;
            };
            if !deliver(&records, &shutdown, record).await {
                return Ok(());
            }
        }
        if shutdown.is_cancelled() {
            return Ok(());
        }

        let Some(resume_after) = resume_after else {
            warn!("oplog is empty, nothing to tail");
            return Ok(());
        };

        info!("tailing new oplog entries");
        let options = FindOptions::builder()
            .cursor_type(CursorType::TailableAwait)
            .max_await_time(MAX_AWAIT)
            .no_cursor_timeout(true)
            .sort(doc! { "$natural": 1 })
            .build();
        let mut cursor = collection
            .find(doc! { "ts": { "$gt": resume_after } }, options)
            .await?;
        while let Some(document) = next_document(&mut cursor, &shutdown).await? {
            let Some(record) = decode_entry(document) else {
                continue;
            };
            if !deliver(&records, &shutdown, record).await {
                return Ok(());
            }
        }
        Ok(())
    }
}

/// Pull the next document, racing the cursor against cancellation.
async fn next_document(
    cursor: &mut Cursor<Document>,
    shutdown: &CancellationToken,
) -> Result<Option<Document>, BoxError> {
    tokio::select! {
        _ = shutdown.cancelled() => Ok(None),
        document = cursor.next() => match document {
            Some(document) => Ok(Some(document?)),
            None => Ok(None),
        },
    }
}

async fn deliver(
    records: &mpsc::Sender<Oplog>,
    shutdown: &CancellationToken,
    record: Oplog,
) -> bool {
    tokio::select! {
        _ = shutdown.cancelled() => false,
        sent = records.send(record) => sent.is_ok(),
    }
}

/// Convert a raw oplog document into the wire model.
///
/// Returns `None`, with a warning, for entries that must not be
/// forwarded: the oplog's own namespace, non-CRUD operations (noops,
/// commands), and documents that do not decode.
fn decode_entry(document: Document) -> Option<Oplog> {
    match document.get_str("op") {
        Ok(OP_INSERT | OP_UPDATE | OP_DELETE) => {}
        Ok(op) => {
            warn!(op, "skipping non-CRUD oplog entry");
            return None;
        }
        Err(_) => {
            warn!("skipping oplog entry without an operation tag");
            return None;
        }
    }
    match document.get_str("ns") {
        Ok(ns) if !ns.is_empty() && ns != OPLOG_NS => {}
        Ok(ns) => {
            warn!(ns, "skipping oplog entry for internal namespace");
            return None;
        }
        Err(_) => {
            warn!("skipping oplog entry without a namespace");
            return None;
        }
    }
    let json = Bson::Document(document).into_relaxed_extjson();
    match serde_json::from_value(json) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(%err, "skipping undecodable oplog entry");
            None
        }
    }
}
