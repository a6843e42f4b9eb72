//! Content edit session: the lifetime of one open editor view.
//!
//! # Responsibility
//! - Tie store, gateway and hydration controller together for one domain.
//! - Gate saves on hydration and on the single in-flight save.
//! - Route destructive actions (delete, reset) through confirmation requests.
//! - Convert every failure into a notification at this boundary.
//!
//! # Invariants
//! - The gateway's `save` is never called before hydration.
//! - At most one save is in flight; a second attempt is refused, not queued.
//! - A failed save leaves the local document untouched.
//! - Store deletions/resets happen only after `confirm()`.
//! - Selection never points at an item removed by a confirmed action.

use crate::gateway::{ContentGateway, GatewayError, GatewayResult};
use crate::hydration::{HydrationController, HydrationOutcome};
use crate::model::{new_entity_id, CollectionKey, ContentDocument, Merge, SectionKey, SubEntity};
use crate::notify::{Notification, NotificationCenter};
use crate::preview::{IconRegistry, Preview};
use crate::store::ContentStore;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Errors returned by session operations.
#[derive(Debug)]
pub enum SessionError {
    /// The session has not been hydrated yet.
    NotHydrated,
    /// A save is already in flight.
    SaveInFlight,
    /// `confirm` was called with nothing pending.
    NoPendingConfirmation,
    /// The save ticket does not belong to the in-flight save.
    StaleSaveTicket,
    /// Fetch or save failed at the gateway.
    Gateway(GatewayError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotHydrated => write!(f, "content is not loaded yet"),
            Self::SaveInFlight => write!(f, "a save is already in progress"),
            Self::NoPendingConfirmation => write!(f, "no action is awaiting confirmation"),
            Self::StaleSaveTicket => write!(f, "save ticket does not match the in-flight save"),
            Self::Gateway(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GatewayError> for SessionError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

/// What the editor should render right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No document yet; show a non-interactive loading affordance.
    Loading,
    Ready {
        /// Save trigger must be disabled while true.
        saving: bool,
        /// Local edits differ from the last synced document.
        dirty: bool,
    },
}

/// Sub-entity currently selected in the editor UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub collection: &'static str,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationKind {
    Reset,
    Delete {
        collection: &'static str,
        id: String,
    },
}

/// Destructive action awaiting explicit user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub title: String,
    pub description: String,
    pub kind: ConfirmationKind,
}

type ConfirmAction<D> = Box<dyn FnOnce(&mut ContentStore<D>) -> bool>;

struct PendingConfirmation<D> {
    request: ConfirmationRequest,
    on_confirm: ConfirmAction<D>,
}

/// Snapshot handed out by `begin_save`, redeemed by `complete_save`.
#[derive(Debug)]
pub struct SaveTicket<D> {
    id: u64,
    document: D,
}

impl<D> SaveTicket<D> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Document to send to the write endpoint.
    pub fn document(&self) -> &D {
        &self.document
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveState {
    Idle,
    InFlight { ticket: u64 },
}

/// Generic edit session for the document `D` of one content domain.
pub struct EditSession<D: ContentDocument, G: ContentGateway<D>> {
    session_id: Uuid,
    store: ContentStore<D>,
    gateway: G,
    hydration: HydrationController,
    save_state: SaveState,
    last_ticket: u64,
    last_synced: Option<D>,
    selection: Option<Selection>,
    pending: Option<PendingConfirmation<D>>,
    notifications: NotificationCenter,
}

impl<D: ContentDocument, G: ContentGateway<D>> EditSession<D, G> {
    /// Starts a new, unhydrated session over `gateway`.
    pub fn new(gateway: G) -> Self {
        let session_id = Uuid::new_v4();
        info!(
            "event=session_open module=session status=ok domain={} session={}",
            D::DOMAIN,
            session_id
        );
        Self {
            session_id,
            store: ContentStore::new(),
            gateway,
            hydration: HydrationController::new(),
            save_state: SaveState::Idle,
            last_ticket: 0,
            last_synced: None,
            selection: None,
            pending: None,
            notifications: NotificationCenter::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn store(&self) -> &ContentStore<D> {
        &self.store
    }

    /// Current local document, `None` until hydrated.
    pub fn document(&self) -> Option<&D> {
        self.store.current()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn hydration(&self) -> &HydrationController {
        &self.hydration
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydration.is_hydrated()
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.save_state, SaveState::InFlight { .. })
    }

    /// Whether the save trigger should be enabled.
    pub fn can_save(&self) -> bool {
        self.is_hydrated() && self.store.is_loaded() && !self.is_saving()
    }

    pub fn is_dirty(&self) -> bool {
        match (self.store.current(), self.last_synced.as_ref()) {
            (Some(current), Some(synced)) => current != synced,
            _ => false,
        }
    }

    pub fn view_state(&self) -> ViewState {
        if !self.is_hydrated() || !self.store.is_loaded() {
            return ViewState::Loading;
        }
        ViewState::Ready {
            saving: self.is_saving(),
            dirty: self.is_dirty(),
        }
    }

    /// Fetches through the gateway and offers the result for hydration.
    ///
    /// Calling this again after hydration re-fetches but never overwrites
    /// local edits.
    pub fn hydrate(&mut self) -> Result<HydrationOutcome, SessionError> {
        match self.gateway.fetch() {
            Ok(doc) => Ok(self.on_fetch_resolved(doc)),
            Err(err) => {
                self.on_fetch_failed(&err);
                Err(SessionError::Gateway(err))
            }
        }
    }

    /// Event entry point for hosts that perform the fetch themselves.
    pub fn on_fetch_resolved(&mut self, doc: D) -> HydrationOutcome {
        let outcome = self.hydration.offer(&mut self.store, doc);
        if outcome == HydrationOutcome::Applied {
            self.last_synced = self.store.current().cloned();
        }
        outcome
    }

    /// Records a failed fetch; the session keeps showing `Loading`.
    pub fn on_fetch_failed(&mut self, error: &GatewayError) {
        self.hydration.record_failure(D::DOMAIN.as_str(), error);
        if !self.is_hydrated() {
            self.notifications.push(Notification::info(format!(
                "Still loading {} content.",
                D::DOMAIN
            )));
        }
    }

    /// Saves the local document through the gateway.
    ///
    /// Refused before hydration and while another save is in flight; neither
    /// refusal touches the gateway.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let ticket = self.begin_save()?;
        let result = self.gateway.save(ticket.document());
        self.complete_save(ticket, result)
    }

    /// Marks a save as in flight and snapshots the document to send.
    pub fn begin_save(&mut self) -> Result<SaveTicket<D>, SessionError> {
        if !self.is_hydrated() {
            warn!(
                "event=session_save module=session status=skip domain={} session={} reason=not_hydrated",
                D::DOMAIN,
                self.session_id
            );
            return Err(SessionError::NotHydrated);
        }
        if self.is_saving() {
            debug!(
                "event=session_save module=session status=skip domain={} session={} reason=in_flight",
                D::DOMAIN,
                self.session_id
            );
            return Err(SessionError::SaveInFlight);
        }
        let document = self.store.current().cloned().ok_or(SessionError::NotHydrated)?;

        self.last_ticket += 1;
        self.save_state = SaveState::InFlight {
            ticket: self.last_ticket,
        };
        info!(
            "event=session_save module=session status=start domain={} session={} ticket={}",
            D::DOMAIN,
            self.session_id,
            self.last_ticket
        );
        Ok(SaveTicket {
            id: self.last_ticket,
            document,
        })
    }

    /// Resolves the in-flight save with the write endpoint's result.
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket<D>,
        result: GatewayResult<()>,
    ) -> Result<(), SessionError> {
        if self.save_state != (SaveState::InFlight { ticket: ticket.id }) {
            return Err(SessionError::StaleSaveTicket);
        }
        self.save_state = SaveState::Idle;

        match result {
            Ok(()) => {
                info!(
                    "event=session_save module=session status=ok domain={} session={} ticket={}",
                    D::DOMAIN,
                    self.session_id,
                    ticket.id
                );
                self.last_synced = Some(ticket.document);
                self.notifications.push(Notification::success(format!(
                    "{} content saved.",
                    capitalize(D::DOMAIN.as_str())
                )));
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=session_save module=session status=error domain={} session={} ticket={} error={}",
                    D::DOMAIN,
                    self.session_id,
                    ticket.id,
                    err
                );
                self.notifications.push(Notification::error(format!(
                    "Failed to save {} content: {err}",
                    D::DOMAIN
                )));
                Err(SessionError::Gateway(err))
            }
        }
    }

    pub fn update_section<S: Merge>(&mut self, key: SectionKey<D, S>, patch: S::Patch) -> bool {
        self.store.update_section(key, patch)
    }

    pub fn add_item<T: SubEntity>(&mut self, key: CollectionKey<D, T>, item: T) -> bool {
        self.store.add_item(key, item)
    }

    /// Adds an item built around a freshly generated id; returns that id.
    pub fn add_new_item<T: SubEntity>(
        &mut self,
        key: CollectionKey<D, T>,
        build: impl FnOnce(String) -> T,
    ) -> Option<String> {
        let id = new_entity_id(key.id_prefix());
        let item = build(id.clone());
        self.store.add_item(key, item).then_some(id)
    }

    pub fn update_item<T: SubEntity + Merge>(
        &mut self,
        key: CollectionKey<D, T>,
        id: &str,
        patch: T::Patch,
    ) -> bool {
        self.store.update_item(key, id, patch)
    }

    pub fn move_item<T: SubEntity>(
        &mut self,
        key: CollectionKey<D, T>,
        id: &str,
        index: usize,
    ) -> bool {
        self.store.move_item(key, id, index)
    }

    /// Selects an existing item; unknown ids leave the selection unchanged.
    pub fn select<T: SubEntity>(&mut self, key: CollectionKey<D, T>, id: &str) -> bool {
        let exists = self
            .store
            .current()
            .and_then(|doc| key.find(doc, id))
            .is_some();
        if exists {
            self.selection = Some(Selection {
                collection: key.name(),
                id: id.to_string(),
            });
        }
        exists
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Asks for confirmation before discarding all unsaved edits.
    pub fn request_reset(&mut self) -> Result<&ConfirmationRequest, SessionError> {
        if !self.is_hydrated() {
            return Err(SessionError::NotHydrated);
        }
        let request = ConfirmationRequest {
            title: "Reset to defaults?".to_string(),
            description: format!(
                "All {} content, including unsaved changes, will be replaced with the defaults.",
                D::DOMAIN
            ),
            kind: ConfirmationKind::Reset,
        };
        Ok(self.raise(request, reset_action()))
    }

    /// Asks for confirmation before deleting the item `id`, described by `label`.
    pub fn request_delete<T: SubEntity + 'static>(
        &mut self,
        key: CollectionKey<D, T>,
        id: &str,
        label: &str,
    ) -> Result<&ConfirmationRequest, SessionError> {
        if !self.is_hydrated() {
            return Err(SessionError::NotHydrated);
        }
        let request = ConfirmationRequest {
            title: format!("Delete \"{label}\"?"),
            description: format!("\"{label}\" will be removed from {}.", key.name()),
            kind: ConfirmationKind::Delete {
                collection: key.name(),
                id: id.to_string(),
            },
        };
        Ok(self.raise(request, delete_action(key, id.to_string())))
    }

    pub fn pending_confirmation(&self) -> Option<&ConfirmationRequest> {
        self.pending.as_ref().map(|pending| &pending.request)
    }

    /// Runs the pending destructive action; returns whether the store changed.
    pub fn confirm(&mut self) -> Result<bool, SessionError> {
        let pending = self
            .pending
            .take()
            .ok_or(SessionError::NoPendingConfirmation)?;
        let changed = (pending.on_confirm)(&mut self.store);

        match &pending.request.kind {
            ConfirmationKind::Reset => self.selection = None,
            ConfirmationKind::Delete { collection, id } => {
                let selected = self
                    .selection
                    .as_ref()
                    .is_some_and(|sel| sel.collection == *collection && sel.id == *id);
                if selected {
                    self.selection = None;
                }
            }
        }

        info!(
            "event=session_confirm module=session status=ok domain={} session={} action={} changed={}",
            D::DOMAIN,
            self.session_id,
            action_label(&pending.request.kind),
            changed
        );
        Ok(changed)
    }

    /// Drops the pending request without touching the store.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                debug!(
                    "event=session_confirm module=session status=skip domain={} session={} action={} reason=cancelled",
                    D::DOMAIN,
                    self.session_id,
                    action_label(&pending.request.kind)
                );
                true
            }
            None => false,
        }
    }

    fn raise(
        &mut self,
        request: ConfirmationRequest,
        on_confirm: ConfirmAction<D>,
    ) -> &ConfirmationRequest {
        let pending = self
            .pending
            .insert(PendingConfirmation { request, on_confirm });
        &pending.request
    }
}

impl<D: Preview, G: ContentGateway<D>> EditSession<D, G> {
    /// Live preview of the local, possibly unsaved, document.
    pub fn preview(&self, icons: &dyn IconRegistry) -> Option<D::View> {
        self.store.current().map(|doc| doc.project(icons))
    }
}

fn reset_action<D: ContentDocument>() -> ConfirmAction<D> {
    Box::new(|store: &mut ContentStore<D>| {
        store.reset_to_defaults();
        true
    })
}

fn delete_action<D: ContentDocument, T: SubEntity + 'static>(
    key: CollectionKey<D, T>,
    id: String,
) -> ConfirmAction<D> {
    Box::new(move |store: &mut ContentStore<D>| store.delete_item(key, &id))
}

fn action_label(kind: &ConfirmationKind) -> &'static str {
    match kind {
        ConfirmationKind::Reset => "reset",
        ConfirmationKind::Delete { .. } => "delete",
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{capitalize, ConfirmationKind, EditSession, SessionError, ViewState};
    use crate::hydration::HydrationOutcome;
    use crate::gateway::InMemoryGateway;
    use crate::model::community::{CommunityContent, CommunityLink, LINKS, STATS};
    use crate::model::ContentDocument;

    fn hydrated_session() -> EditSession<CommunityContent, InMemoryGateway<CommunityContent>> {
        let mut session = EditSession::new(InMemoryGateway::with_document(
            CommunityContent::defaults(),
        ));
        session.hydrate().expect("hydrate should succeed");
        session
    }

    #[test]
    fn capitalize_handles_empty_and_ascii() {
        assert_eq!(capitalize("community"), "Community");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn begin_save_refuses_second_ticket_until_completed() {
        let mut session = hydrated_session();
        let ticket = session.begin_save().expect("first ticket");
        assert!(!session.can_save());
        assert_eq!(
            session.view_state(),
            ViewState::Ready {
                saving: true,
                dirty: false
            }
        );
        assert!(matches!(
            session.begin_save(),
            Err(SessionError::SaveInFlight)
        ));
        assert!(matches!(session.save(), Err(SessionError::SaveInFlight)));

        session.complete_save(ticket, Ok(())).expect("complete");
        assert!(session.can_save());
    }

    #[test]
    fn complete_save_rejects_stale_ticket() {
        let mut session = hydrated_session();
        let first = session.begin_save().expect("first ticket");
        session.complete_save(first, Ok(())).expect("complete first");

        let second = session.begin_save().expect("second ticket");
        let forged = super::SaveTicket {
            id: second.id() + 1,
            document: CommunityContent::defaults(),
        };
        assert!(matches!(
            session.complete_save(forged, Ok(())),
            Err(SessionError::StaleSaveTicket)
        ));
        assert!(session.is_saving());
        session.complete_save(second, Ok(())).expect("complete second");
    }

    #[test]
    fn new_request_replaces_pending_one() {
        let mut session = hydrated_session();
        session
            .request_delete(LINKS, "link-discord", "Discord")
            .expect("request delete");
        let request = session.request_reset().expect("request reset");
        assert_eq!(request.kind, ConfirmationKind::Reset);
        assert!(session.cancel());
        assert!(!session.cancel());
        assert!(matches!(
            session.confirm(),
            Err(SessionError::NoPendingConfirmation)
        ));
    }

    #[test]
    fn destructive_requests_need_hydration() {
        let mut session =
            EditSession::<CommunityContent, _>::new(InMemoryGateway::with_document(
                CommunityContent::defaults(),
            ));
        assert!(matches!(
            session.request_reset(),
            Err(SessionError::NotHydrated)
        ));
        assert!(matches!(
            session.request_delete(STATS, "stat-members", "Members"),
            Err(SessionError::NotHydrated)
        ));
        assert!(session.pending_confirmation().is_none());
    }

    #[test]
    fn ignored_offer_keeps_synced_snapshot() {
        let mut session = hydrated_session();
        assert_eq!(session.last_synced, Some(CommunityContent::defaults()));

        let outcome = session.on_fetch_resolved(CommunityContent::default());
        assert_eq!(outcome, HydrationOutcome::Ignored);
        assert_eq!(session.last_synced, Some(CommunityContent::defaults()));
        assert!(!session.is_dirty());
        assert!(session.can_save());
    }

    #[test]
    fn add_new_item_generates_prefixed_id() {
        let mut session = hydrated_session();
        let id = session
            .add_new_item(LINKS, |id| {
                CommunityLink::new(id, "Reddit", "https://reddit.com/r/oftisoft", "reddit")
            })
            .expect("item should be added");
        assert!(id.starts_with("link-"));
        assert!(session.is_dirty());
        assert!(session.select(LINKS, &id));
        assert_eq!(session.selection().map(|s| s.id.as_str()), Some(id.as_str()));
    }
}
