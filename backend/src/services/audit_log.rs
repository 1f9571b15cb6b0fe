//! Audit trail of authentication events. An observability side channel, not a
//! gate: writes are fire-and-forget and a failed write never blocks or fails
//! the authentication flow that triggered it.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::audit_log::{AuditAction, AuditLogEntry};
use crate::store::{DocumentStore, StoreError};

const SESSION_LOGS_COLLECTION: &str = "session_logs";

/// Write sink for audit entries. Append-only; implementations must tolerate
/// duplicate-key races without corrupting prior entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, key: &str, entry: AuditLogEntry) -> anyhow::Result<()>;
}

/// Sink backed by the keyed document store.
pub struct DocumentAuditSink {
    store: Arc<dyn DocumentStore>,
}

impl DocumentAuditSink {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuditSink for DocumentAuditSink {
    async fn append(&self, key: &str, entry: AuditLogEntry) -> anyhow::Result<()> {
        let document = serde_json::to_value(&entry)?;
        match self.store.create(SESSION_LOGS_COLLECTION, key, document).await {
            Ok(()) => Ok(()),
            // A lost duplicate-key race leaves the earlier entry intact; the
            // trail stays append-only either way.
            Err(StoreError::AlreadyExists { .. }) => {
                tracing::warn!(key, "duplicate audit entry key; keeping earlier entry");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Clone)]
pub struct AuditLogService {
    sink: Arc<dyn AuditSink>,
    /// Disambiguates entries for the same subject within the same
    /// millisecond, so entry keys never collide under rapid repeated events.
    sequence: Arc<AtomicU64>,
}

impl AuditLogService {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records one authentication event, best-effort. Returns immediately;
    /// the write happens off the authorization path.
    pub fn record(&self, subject_id: &str, action: AuditAction, metadata: Map<String, Value>) {
        let timestamp = Utc::now();
        let key = self.entry_key(subject_id, timestamp.timestamp_millis());
        let entry = AuditLogEntry {
            subject_id: subject_id.to_string(),
            action,
            timestamp,
            metadata,
        };

        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(err) = sink.append(&key, entry).await {
                tracing::warn!(
                    error = ?err,
                    key = %key,
                    "Failed to record session audit log"
                );
            }
        });
    }

    fn entry_key(&self, subject_id: &str, unix_millis: i64) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}_{}_{}", subject_id, unix_millis, sequence)
    }
}
