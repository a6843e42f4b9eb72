//! Remote content gateway contracts and implementations.
//!
//! # Responsibility
//! - Define whole-document fetch/save for one content domain.
//! - Keep transport and storage details out of the edit session.
//!
//! # Invariants
//! - `save` replaces server state unconditionally (last-writer-wins); there is
//!   no conflict detection, partial patch or optimistic-lock token.
//! - Saving the same document twice yields the same server state.

use crate::db::DbError;
use crate::model::{ContentDocument, ContentDomain, DocumentValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryGateway;
pub use sqlite::SqliteContentGateway;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Read/write endpoint pair for the document of one domain.
pub trait ContentGateway<D: ContentDocument> {
    /// Retrieves the authoritative server copy.
    fn fetch(&self) -> GatewayResult<D>;

    /// Persists the full document, overwriting server state.
    fn save(&self, doc: &D) -> GatewayResult<()>;
}

/// Gateway failure for fetch or save.
#[derive(Debug)]
pub enum GatewayError {
    /// No document exists yet for the domain.
    NotFound(ContentDomain),
    /// The document violates its invariants and was not written.
    Validation(DocumentValidationError),
    /// Stored or submitted JSON does not match the document shape.
    Serialization(serde_json::Error),
    Db(DbError),
    /// Transport-level failure (unreachable endpoint, rejected request, ...).
    Unavailable(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(domain) => write!(f, "content not found: {domain}"),
            Self::Validation(err) => write!(f, "invalid content: {err}"),
            Self::Serialization(err) => write!(f, "content serialization failed: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "content endpoint unavailable: {message}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DocumentValidationError> for GatewayError {
    fn from(value: DocumentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
