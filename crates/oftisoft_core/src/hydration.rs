//! One-shot hydration of the edit buffer from server data.
//!
//! # Invariants
//! - `Unhydrated -> Hydrated` happens at most once per controller (session).
//! - There is no transition back; a new session needs a new controller.
//! - The decision is taken from the controller's own state, never re-derived
//!   from store contents, so later fetch resolutions cannot clobber edits.

use crate::model::ContentDocument;
use crate::store::ContentStore;
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationState {
    Unhydrated,
    Hydrated,
}

/// Result of offering a fetched document to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationOutcome {
    /// The document was copied into the store.
    Applied,
    /// The session was already hydrated; the document was dropped.
    Ignored,
}

#[derive(Debug)]
pub struct HydrationController {
    state: HydrationState,
    ignored_offers: u32,
    failed_fetches: u32,
}

impl Default for HydrationController {
    fn default() -> Self {
        Self::new()
    }
}

impl HydrationController {
    pub fn new() -> Self {
        Self {
            state: HydrationState::Unhydrated,
            ignored_offers: 0,
            failed_fetches: 0,
        }
    }

    pub fn state(&self) -> HydrationState {
        self.state
    }

    pub fn is_hydrated(&self) -> bool {
        self.state == HydrationState::Hydrated
    }

    /// Fetch resolutions dropped because the session was already hydrated.
    pub fn ignored_offers(&self) -> u32 {
        self.ignored_offers
    }

    pub fn failed_fetches(&self) -> u32 {
        self.failed_fetches
    }

    /// Offers a freshly fetched document; applies it only on first offer.
    pub fn offer<D: ContentDocument>(
        &mut self,
        store: &mut ContentStore<D>,
        doc: D,
    ) -> HydrationOutcome {
        match self.state {
            HydrationState::Unhydrated => {
                store.set_content(doc);
                self.state = HydrationState::Hydrated;
                info!(
                    "event=hydrate module=hydration status=ok domain={}",
                    D::DOMAIN
                );
                HydrationOutcome::Applied
            }
            HydrationState::Hydrated => {
                self.ignored_offers += 1;
                debug!(
                    "event=hydrate module=hydration status=skip domain={} reason=already_hydrated ignored={}",
                    D::DOMAIN,
                    self.ignored_offers
                );
                HydrationOutcome::Ignored
            }
        }
    }

    /// Records a failed fetch; the controller stays where it is.
    pub fn record_failure(&mut self, domain: &str, error: &dyn std::error::Error) {
        self.failed_fetches += 1;
        warn!(
            "event=hydrate module=hydration status=error domain={} state={:?} failures={} error={}",
            domain, self.state, self.failed_fetches, error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{HydrationController, HydrationOutcome, HydrationState};
    use crate::gateway::GatewayError;
    use crate::model::community::{CommunityContent, CommunityHeaderPatch, HEADER};
    use crate::model::{ContentDocument, ContentDomain};
    use crate::store::ContentStore;

    #[test]
    fn applies_first_offer_only() {
        let mut controller = HydrationController::new();
        let mut store = ContentStore::<CommunityContent>::new();
        assert_eq!(controller.state(), HydrationState::Unhydrated);

        let first = controller.offer(&mut store, CommunityContent::defaults());
        assert_eq!(first, HydrationOutcome::Applied);
        store.update_section(
            HEADER,
            CommunityHeaderPatch {
                badge: Some("Edited".to_string()),
                ..CommunityHeaderPatch::default()
            },
        );

        for _ in 0..3 {
            let again = controller.offer(&mut store, CommunityContent::defaults());
            assert_eq!(again, HydrationOutcome::Ignored);
        }
        assert_eq!(controller.ignored_offers(), 3);
        assert_eq!(store.current().expect("hydrated").header.badge, "Edited");
    }

    #[test]
    fn failures_keep_controller_unhydrated() {
        let mut controller = HydrationController::new();
        let error = GatewayError::NotFound(ContentDomain::Community);
        controller.record_failure("community", &error);
        controller.record_failure("community", &error);
        assert_eq!(controller.state(), HydrationState::Unhydrated);
        assert_eq!(controller.failed_fetches(), 2);
    }
}
