//! Content schema migrations.
//!
//! # Invariants
//! - Steps are listed in strictly increasing `version` order.
//! - `PRAGMA user_version` always equals the last applied step.
//! - Pending steps run in one transaction; a failing step rolls back all of them.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, Transaction};

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "content_documents",
        sql: include_str!("0001_content_documents.sql"),
    },
    SchemaStep {
        version: 2,
        name: "content_save_log",
        sql: include_str!("0002_content_save_log.sql"),
    },
];

/// Schema version this binary migrates up to.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Schema version recorded in the database file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the schema up to `latest_version()`.
///
/// Databases written by a newer binary are refused rather than downgraded.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let to_version = latest_version();

    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }
    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        if let Err(err) = run_step(&tx, step) {
            error!(
                "event=db_migrate module=db status=error version={} name={} error={}",
                step.version, step.name, err
            );
            return Err(DbError::Migration {
                version: step.version,
                source: err,
            });
        }
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, to_version
    );
    Ok(())
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> rusqlite::Result<()> {
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)
}
