//! SQLite-backed content gateway.
//!
//! # Responsibility
//! - Store one JSON document per content domain.
//! - Keep SQL details inside the gateway boundary.
//!
//! # Invariants
//! - Write paths call `ContentDocument::validate()` before SQL mutations.
//! - Read paths reject invalid persisted documents instead of masking them.
//! - Document bodies are never logged.

use super::{ContentGateway, GatewayError, GatewayResult};
use crate::model::{ContentDocument, ContentDomain};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::time::Instant;

/// Gateway over the `content_documents` table of a migrated connection.
pub struct SqliteContentGateway<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContentGateway<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Inserts the domain default document when no row exists yet.
    ///
    /// Returns `true` when a row was inserted.
    pub fn seed_defaults<D: ContentDocument>(&self) -> GatewayResult<bool> {
        let body = serde_json::to_string(&D::defaults())?;
        let inserted = self.conn.execute(
            "INSERT INTO content_documents (domain, body)
             VALUES (?1, ?2)
             ON CONFLICT(domain) DO NOTHING;",
            params![D::DOMAIN.as_str(), body],
        )?;
        info!(
            "event=content_seed module=gateway status=ok domain={} inserted={}",
            D::DOMAIN,
            inserted > 0
        );
        Ok(inserted > 0)
    }

    /// Last write time in epoch milliseconds, `None` when never written.
    pub fn updated_at(&self, domain: ContentDomain) -> GatewayResult<Option<i64>> {
        let updated_at = self
            .conn
            .query_row(
                "SELECT updated_at FROM content_documents WHERE domain = ?1;",
                [domain.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated_at)
    }

    /// Number of successful saves recorded for `domain`.
    pub fn save_count(&self, domain: ContentDomain) -> GatewayResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM content_save_log WHERE domain = ?1;",
            [domain.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn write_document(&self, domain: ContentDomain, body: &str) -> GatewayResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO content_documents (domain, body)
             VALUES (?1, ?2)
             ON CONFLICT(domain) DO UPDATE SET
                body = excluded.body,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![domain.as_str(), body],
        )?;
        tx.execute(
            "INSERT INTO content_save_log (domain, body_bytes) VALUES (?1, ?2);",
            params![domain.as_str(), body.len() as i64],
        )?;
        tx.commit()?;
        Ok(())
    }
}

impl<D: ContentDocument> ContentGateway<D> for SqliteContentGateway<'_> {
    fn fetch(&self) -> GatewayResult<D> {
        let started_at = Instant::now();
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM content_documents WHERE domain = ?1;",
                [D::DOMAIN.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let result = body
            .ok_or(GatewayError::NotFound(D::DOMAIN))
            .and_then(|body| {
                let doc: D = serde_json::from_str(&body)?;
                doc.validate()?;
                Ok(doc)
            });

        match &result {
            Ok(_) => info!(
                "event=content_fetch module=gateway status=ok domain={} duration_ms={}",
                D::DOMAIN,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=content_fetch module=gateway status=error domain={} duration_ms={} error={}",
                D::DOMAIN,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn save(&self, doc: &D) -> GatewayResult<()> {
        let started_at = Instant::now();
        let result = doc
            .validate()
            .map_err(GatewayError::from)
            .and_then(|()| serde_json::to_string(doc).map_err(GatewayError::from))
            .and_then(|body| self.write_document(D::DOMAIN, &body));

        match &result {
            Ok(()) => info!(
                "event=content_save module=gateway status=ok domain={} duration_ms={}",
                D::DOMAIN,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=content_save module=gateway status=error domain={} duration_ms={} error={}",
                D::DOMAIN,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}
