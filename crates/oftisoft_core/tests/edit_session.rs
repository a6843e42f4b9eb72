use oftisoft_core::model::community::{
    CommunityContent, CommunityHeader, CommunityHeaderPatch, CommunityLink, CommunityLinkPatch,
    HEADER, LINKS, STATS,
};
use oftisoft_core::{
    ContentDocument, EditSession, GatewayError, HydrationOutcome, HydrationState,
    InMemoryGateway, NotificationLevel, SessionError, ViewState,
};

type CommunitySession = EditSession<CommunityContent, InMemoryGateway<CommunityContent>>;

fn badge_only(badge: &str) -> CommunityContent {
    CommunityContent {
        header: CommunityHeader {
            badge: badge.to_string(),
            ..CommunityHeader::default()
        },
        links: Vec::new(),
        stats: Vec::new(),
    }
}

fn session_over(doc: CommunityContent) -> (CommunitySession, InMemoryGateway<CommunityContent>) {
    let gateway = InMemoryGateway::with_document(doc);
    (EditSession::new(gateway.clone()), gateway)
}

#[test]
fn add_then_cancel_then_confirm_delete() {
    let (mut session, _gateway) = session_over(badge_only("X"));
    assert!(session.document().is_none());
    assert!(!session.is_hydrated());

    session.hydrate().unwrap();
    assert_eq!(session.document().unwrap().header.badge, "X");
    assert!(session.is_hydrated());

    let link = CommunityLink::new("link-1", "Discord", "https://discord.gg/x", "discord");
    assert!(session.add_item(LINKS, link));
    assert_eq!(session.document().unwrap().links.len(), 1);

    session.request_delete(LINKS, "link-1", "Discord").unwrap();
    assert!(session.cancel());
    assert_eq!(session.document().unwrap().links.len(), 1);

    session.request_delete(LINKS, "link-1", "Discord").unwrap();
    assert!(session.confirm().unwrap());
    assert!(session.document().unwrap().links.is_empty());
}

#[test]
fn later_fetches_never_overwrite_local_edits() {
    let (mut session, gateway) = session_over(badge_only("server"));
    assert_eq!(session.hydrate().unwrap(), HydrationOutcome::Applied);

    session.update_section(
        HEADER,
        CommunityHeaderPatch {
            badge: Some("local".to_string()),
            ..CommunityHeaderPatch::default()
        },
    );

    gateway.replace_document(badge_only("refetched"));
    for _ in 0..3 {
        assert_eq!(session.hydrate().unwrap(), HydrationOutcome::Ignored);
    }
    assert_eq!(
        session.on_fetch_resolved(badge_only("late")),
        HydrationOutcome::Ignored
    );

    assert_eq!(session.document().unwrap().header.badge, "local");
    assert_eq!(session.hydration().state(), HydrationState::Hydrated);
    assert_eq!(session.hydration().ignored_offers(), 4);
    assert_eq!(gateway.fetch_calls(), 4);
}

#[test]
fn save_before_hydration_never_reaches_gateway() {
    let (mut session, gateway) = session_over(CommunityContent::defaults());

    assert!(!session.can_save());
    assert!(matches!(session.save(), Err(SessionError::NotHydrated)));
    assert!(matches!(session.begin_save(), Err(SessionError::NotHydrated)));
    assert_eq!(gateway.save_calls(), 0);
    assert_eq!(session.view_state(), ViewState::Loading);
}

#[test]
fn saving_twice_without_edits_yields_same_server_state() {
    let (mut session, gateway) = session_over(CommunityContent::defaults());
    session.hydrate().unwrap();
    session.update_item(
        STATS,
        "stat-members",
        oftisoft_core::model::community::CommunityStatPatch {
            value: Some("12k+".to_string()),
            ..Default::default()
        },
    );
    assert!(session.is_dirty());

    session.save().unwrap();
    let after_first = gateway.document().unwrap();
    session.save().unwrap();
    let after_second = gateway.document().unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(gateway.save_calls(), 2);
    assert!(!session.is_dirty());

    let notifications = session.notifications_mut().take_pending();
    assert_eq!(notifications.len(), 2);
    assert!(notifications
        .iter()
        .all(|n| n.level == NotificationLevel::Success && n.message == "Community content saved."));
}

#[test]
fn failed_save_keeps_local_edits_and_notifies() {
    let (mut session, gateway) = session_over(CommunityContent::defaults());
    session.hydrate().unwrap();
    session.update_item(
        LINKS,
        "link-github",
        CommunityLinkPatch {
            title: Some("GitHub org".to_string()),
            ..CommunityLinkPatch::default()
        },
    );
    let edited = session.document().unwrap().clone();

    gateway.fail_next_saves(1);
    let err = session.save().unwrap_err();
    assert!(matches!(err, SessionError::Gateway(GatewayError::Unavailable(_))));

    assert_eq!(session.document().unwrap(), &edited);
    assert_eq!(gateway.document().unwrap(), CommunityContent::defaults());
    assert!(session.is_dirty());
    assert!(session.can_save());

    let last = session.notifications().last().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert!(last.message.starts_with("Failed to save community content"));

    session.save().unwrap();
    assert_eq!(gateway.document().unwrap(), edited);
}

#[test]
fn delete_and_reset_wait_for_confirmation() {
    let (mut session, _gateway) = session_over(CommunityContent::defaults());
    session.hydrate().unwrap();
    session.update_section(
        HEADER,
        CommunityHeaderPatch {
            title: Some("Edited".to_string()),
            ..CommunityHeaderPatch::default()
        },
    );

    let request = session.request_reset().unwrap();
    assert_eq!(request.title, "Reset to defaults?");
    assert_eq!(session.document().unwrap().header.title, "Edited");

    assert!(session.confirm().unwrap());
    assert_eq!(session.document().unwrap(), &CommunityContent::defaults());
    assert!(session.pending_confirmation().is_none());

    session.request_delete(STATS, "stat-rating", "Average rating").unwrap();
    assert_eq!(session.document().unwrap().stats.len(), 3);
    assert!(session.confirm().unwrap());
    assert_eq!(session.document().unwrap().stats.len(), 2);
}

#[test]
fn confirmed_delete_clears_matching_selection_only() {
    let (mut session, _gateway) = session_over(CommunityContent::defaults());
    session.hydrate().unwrap();

    assert!(session.select(LINKS, "link-discord"));
    session.request_delete(LINKS, "link-twitter", "Twitter").unwrap();
    session.confirm().unwrap();
    assert_eq!(session.selection().unwrap().id, "link-discord");

    session.request_delete(LINKS, "link-discord", "Discord").unwrap();
    session.confirm().unwrap();
    assert!(session.selection().is_none());

    assert!(!session.select(LINKS, "link-discord"));
    assert!(session.selection().is_none());
}

#[test]
fn confirming_delete_of_missing_item_reports_no_change() {
    let (mut session, _gateway) = session_over(CommunityContent::defaults());
    session.hydrate().unwrap();

    session.request_delete(LINKS, "link-unknown", "Unknown").unwrap();
    assert!(!session.confirm().unwrap());
    assert_eq!(session.document().unwrap().links.len(), 3);
}

#[test]
fn fetch_failure_keeps_loading_until_a_later_fetch_succeeds() {
    let (mut session, gateway) = session_over(CommunityContent::defaults());
    gateway.set_fetch_failing(true);

    assert!(matches!(
        session.hydrate(),
        Err(SessionError::Gateway(GatewayError::Unavailable(_)))
    ));
    assert_eq!(session.view_state(), ViewState::Loading);
    assert_eq!(session.hydration().failed_fetches(), 1);
    assert_eq!(
        session.notifications().last().unwrap().level,
        NotificationLevel::Info
    );

    gateway.set_fetch_failing(false);
    assert_eq!(session.hydrate().unwrap(), HydrationOutcome::Applied);
    assert_eq!(
        session.view_state(),
        ViewState::Ready {
            saving: false,
            dirty: false
        }
    );
}

#[test]
fn host_driven_save_completes_with_external_result() {
    let (mut session, gateway) = session_over(CommunityContent::defaults());
    session.on_fetch_resolved(CommunityContent::defaults());
    assert_eq!(gateway.fetch_calls(), 0);

    let ticket = session.begin_save().unwrap();
    assert!(session.is_saving());
    assert!(matches!(session.save(), Err(SessionError::SaveInFlight)));

    session
        .complete_save(ticket, Err(GatewayError::Unavailable("timeout".to_string())))
        .unwrap_err();
    assert!(!session.is_saving());
    assert_eq!(gateway.save_calls(), 0);
}

#[test]
fn sessions_do_not_share_local_state() {
    let gateway = InMemoryGateway::with_document(CommunityContent::defaults());
    let mut first: CommunitySession = EditSession::new(gateway.clone());
    let mut second: CommunitySession = EditSession::new(gateway.clone());
    first.hydrate().unwrap();
    second.hydrate().unwrap();

    first.update_section(
        HEADER,
        CommunityHeaderPatch {
            badge: Some("first".to_string()),
            ..CommunityHeaderPatch::default()
        },
    );

    assert_ne!(first.session_id(), second.session_id());
    assert_eq!(
        second.document().unwrap().header.badge,
        CommunityContent::defaults().header.badge
    );
}
