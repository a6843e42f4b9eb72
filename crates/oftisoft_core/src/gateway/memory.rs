//! In-process gateway standing in for a remote content server.
//!
//! Clones share one server copy, so several sessions (or a test and the
//! session it drives) observe the same state. The edit loop is
//! single-threaded, so state lives in `Rc<RefCell<_>>`.

use super::{ContentGateway, GatewayError, GatewayResult};
use crate::model::ContentDocument;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
struct ServerState<D> {
    document: Option<D>,
    fetch_calls: u32,
    save_calls: u32,
    fail_fetches: bool,
    fail_next_saves: u32,
}

/// Shared-handle gateway backed by an in-memory document.
#[derive(Debug)]
pub struct InMemoryGateway<D> {
    state: Rc<RefCell<ServerState<D>>>,
}

impl<D> Clone for InMemoryGateway<D> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<D: ContentDocument> InMemoryGateway<D> {
    /// Server that already holds `document`.
    pub fn with_document(document: D) -> Self {
        Self::from_state(Some(document))
    }

    /// Server with no document for the domain; fetches fail with `NotFound`.
    pub fn empty() -> Self {
        Self::from_state(None)
    }

    fn from_state(document: Option<D>) -> Self {
        Self {
            state: Rc::new(RefCell::new(ServerState {
                document,
                fetch_calls: 0,
                save_calls: 0,
                fail_fetches: false,
                fail_next_saves: 0,
            })),
        }
    }

    /// Current server-side document.
    pub fn document(&self) -> Option<D> {
        self.state.borrow().document.clone()
    }

    /// Overwrites server state directly, as another editor would.
    pub fn replace_document(&self, document: D) {
        self.state.borrow_mut().document = Some(document);
    }

    pub fn fetch_calls(&self) -> u32 {
        self.state.borrow().fetch_calls
    }

    pub fn save_calls(&self) -> u32 {
        self.state.borrow().save_calls
    }

    /// Makes every fetch fail until turned off again.
    pub fn set_fetch_failing(&self, failing: bool) {
        self.state.borrow_mut().fail_fetches = failing;
    }

    /// Makes the next `count` saves fail with `Unavailable`.
    pub fn fail_next_saves(&self, count: u32) {
        self.state.borrow_mut().fail_next_saves = count;
    }
}

impl<D: ContentDocument> ContentGateway<D> for InMemoryGateway<D> {
    fn fetch(&self) -> GatewayResult<D> {
        let mut state = self.state.borrow_mut();
        state.fetch_calls += 1;
        if state.fail_fetches {
            return Err(GatewayError::Unavailable("fetch rejected".to_string()));
        }
        state
            .document
            .clone()
            .ok_or(GatewayError::NotFound(D::DOMAIN))
    }

    fn save(&self, doc: &D) -> GatewayResult<()> {
        let mut state = self.state.borrow_mut();
        state.save_calls += 1;
        if state.fail_next_saves > 0 {
            state.fail_next_saves -= 1;
            return Err(GatewayError::Unavailable("save rejected".to_string()));
        }
        state.document = Some(doc.clone());
        Ok(())
    }
}
