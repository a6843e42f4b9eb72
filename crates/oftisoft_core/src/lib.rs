//! Core content editing logic for the Oftisoft dashboard.
//! This crate is the single source of truth for content document invariants.

pub mod config;
pub mod db;
pub mod gateway;
pub mod hydration;
pub mod logging;
pub mod model;
pub mod notify;
pub mod preview;
pub mod session;
pub mod store;

pub use config::EditorConfig;
pub use db::{open_db, open_db_in_memory, Connection, DbError, DbResult};
pub use gateway::{
    ContentGateway, GatewayError, GatewayResult, InMemoryGateway, SqliteContentGateway,
};
pub use hydration::{HydrationController, HydrationOutcome, HydrationState};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::{
    CollectionKey, ContentDocument, ContentDomain, DocumentValidationError, Merge, SectionKey,
    SubEntity,
};
pub use notify::{Notification, NotificationCenter, NotificationLevel};
pub use preview::{BuiltinIconRegistry, IconId, IconMap, IconRegistry, Preview, ResolvedIcon};
pub use session::{
    ConfirmationKind, ConfirmationRequest, EditSession, SaveTicket, Selection, SessionError,
    ViewState,
};
pub use store::ContentStore;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
