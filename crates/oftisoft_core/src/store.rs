//! In-memory edit buffer for one content document.
//!
//! # Responsibility
//! - Hold the locally edited copy of one domain document.
//! - Apply section patches and sub-entity add/update/move/delete mutations.
//!
//! # Invariants
//! - Every mutator is a silent no-op (returns `false`) while no document is
//!   loaded.
//! - Sub-entity ids stay unique within their collection.
//! - Wholesale replacement and destructive mutators are crate-private so that
//!   only hydration and confirmed requests can reach them.

use crate::model::{CollectionKey, ContentDocument, Merge, SectionKey, SubEntity};
use log::debug;

/// Exclusive, single-session holder of the document being edited.
#[derive(Debug, Clone)]
pub struct ContentStore<D> {
    current: Option<D>,
}

impl<D: ContentDocument> Default for ContentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ContentDocument> ContentStore<D> {
    /// Creates an empty store; nothing is editable until hydration.
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn current(&self) -> Option<&D> {
        self.current.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the items of one collection, empty while nothing is loaded.
    pub fn items<T>(&self, key: CollectionKey<D, T>) -> &[T] {
        match self.current.as_ref() {
            Some(doc) => key.items(doc),
            None => &[],
        }
    }

    pub(crate) fn set_content(&mut self, doc: D) {
        self.current = Some(doc);
    }

    /// Shallow-merges `patch` into one section.
    pub fn update_section<S: Merge>(&mut self, key: SectionKey<D, S>, patch: S::Patch) -> bool {
        let Some(doc) = self.current.as_mut() else {
            log_skip("update_section", D::DOMAIN.as_str(), key.name(), "empty_store");
            return false;
        };
        key.get_mut(doc).merge(patch);
        true
    }

    /// Appends `item`; the caller supplies its id.
    ///
    /// Blank ids and ids already present in the collection are rejected.
    pub fn add_item<T: SubEntity>(&mut self, key: CollectionKey<D, T>, item: T) -> bool {
        let Some(doc) = self.current.as_mut() else {
            log_skip("add_item", D::DOMAIN.as_str(), key.name(), "empty_store");
            return false;
        };
        if item.id().trim().is_empty() {
            log_skip("add_item", D::DOMAIN.as_str(), key.name(), "blank_id");
            return false;
        }
        let items = key.items_mut(doc);
        if items.iter().any(|existing| existing.id() == item.id()) {
            log_skip("add_item", D::DOMAIN.as_str(), key.name(), "duplicate_id");
            return false;
        }
        items.push(item);
        true
    }

    /// Merges `patch` into the item whose id matches.
    pub fn update_item<T: SubEntity + Merge>(
        &mut self,
        key: CollectionKey<D, T>,
        id: &str,
        patch: T::Patch,
    ) -> bool {
        let Some(doc) = self.current.as_mut() else {
            log_skip("update_item", D::DOMAIN.as_str(), key.name(), "empty_store");
            return false;
        };
        match key.items_mut(doc).iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.merge(patch);
                true
            }
            None => {
                log_skip("update_item", D::DOMAIN.as_str(), key.name(), "not_found");
                false
            }
        }
    }

    /// Moves the item to display position `index` (clamped), shifting the others.
    ///
    /// Collections with an explicit `order` field are positioned by that
    /// field and renumbered from 1 afterwards, so the move shows in previews.
    pub fn move_item<T: SubEntity>(
        &mut self,
        key: CollectionKey<D, T>,
        id: &str,
        index: usize,
    ) -> bool {
        let Some(doc) = self.current.as_mut() else {
            log_skip("move_item", D::DOMAIN.as_str(), key.name(), "empty_store");
            return false;
        };
        let items = key.items_mut(doc);

        // Stable: entities without `order` keep insertion order.
        let mut display: Vec<usize> = (0..items.len()).collect();
        display.sort_by_key(|&slot| items[slot].order());
        let Some(from) = display.iter().position(|&slot| items[slot].id() == id) else {
            log_skip("move_item", D::DOMAIN.as_str(), key.name(), "not_found");
            return false;
        };
        let to = index.min(display.len() - 1);
        if from == to {
            return false;
        }
        let moved = display.remove(from);
        display.insert(to, moved);

        let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
        items.extend(display.iter().filter_map(|&slot| slots[slot].take()));
        for (position, item) in items.iter_mut().enumerate() {
            item.set_order(position as u32 + 1);
        }
        true
    }

    pub(crate) fn delete_item<T: SubEntity>(&mut self, key: CollectionKey<D, T>, id: &str) -> bool {
        let Some(doc) = self.current.as_mut() else {
            log_skip("delete_item", D::DOMAIN.as_str(), key.name(), "empty_store");
            return false;
        };
        let items = key.items_mut(doc);
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            log_skip("delete_item", D::DOMAIN.as_str(), key.name(), "not_found");
            return false;
        }
        true
    }

    pub(crate) fn reset_to_defaults(&mut self) {
        self.current = Some(D::defaults());
    }
}

fn log_skip(op: &str, domain: &str, target: &str, reason: &str) {
    debug!(
        "event=store_mutation module=store status=skip op={} domain={} target={} reason={}",
        op, domain, target, reason
    );
}

#[cfg(test)]
mod tests {
    use super::ContentStore;
    use crate::model::community::{
        CommunityContent, CommunityHeaderPatch, CommunityLink, CommunityLinkPatch, HEADER, LINKS,
    };
    use crate::model::privacy::{PrivacyContent, SECTIONS};
    use crate::model::ContentDocument;

    fn link(id: &str, title: &str) -> CommunityLink {
        CommunityLink::new(id, title, "https://example.com", "globe")
    }

    fn loaded_store() -> ContentStore<CommunityContent> {
        let mut store = ContentStore::new();
        store.set_content(CommunityContent::default());
        store
    }

    #[test]
    fn mutators_are_noops_before_content_is_loaded() {
        let mut store = ContentStore::<CommunityContent>::new();
        assert!(!store.is_loaded());
        assert!(!store.update_section(HEADER, CommunityHeaderPatch::default()));
        assert!(!store.add_item(LINKS, link("link-1", "Discord")));
        assert!(!store.update_item(LINKS, "link-1", CommunityLinkPatch::default()));
        assert!(!store.move_item(LINKS, "link-1", 0));
        assert!(!store.delete_item(LINKS, "link-1"));
        assert!(store.current().is_none());
        assert!(store.items(LINKS).is_empty());
    }

    #[test]
    fn update_section_merges_only_present_fields() {
        let mut store = loaded_store();
        store.update_section(
            HEADER,
            CommunityHeaderPatch {
                title: Some("Title".to_string()),
                ..CommunityHeaderPatch::default()
            },
        );
        assert!(store.update_section(
            HEADER,
            CommunityHeaderPatch {
                badge: Some("New".to_string()),
                ..CommunityHeaderPatch::default()
            },
        ));
        let header = &store.current().expect("loaded").header;
        assert_eq!(header.badge, "New");
        assert_eq!(header.title, "Title");
    }

    #[test]
    fn add_item_rejects_duplicate_and_blank_ids() {
        let mut store = loaded_store();
        assert!(store.add_item(LINKS, link("link-1", "Discord")));
        assert!(!store.add_item(LINKS, link("link-1", "Other")));
        assert!(!store.add_item(LINKS, link("  ", "Blank")));
        assert_eq!(store.items(LINKS).len(), 1);
        assert_eq!(store.items(LINKS)[0].title, "Discord");
    }

    #[test]
    fn update_and_delete_ignore_unknown_ids() {
        let mut store = loaded_store();
        store.add_item(LINKS, link("link-1", "Discord"));
        let patch = CommunityLinkPatch {
            title: Some("Renamed".to_string()),
            ..CommunityLinkPatch::default()
        };
        assert!(!store.update_item(LINKS, "missing", patch.clone()));
        assert!(!store.delete_item(LINKS, "missing"));
        assert!(store.update_item(LINKS, "link-1", patch));
        assert_eq!(store.items(LINKS)[0].title, "Renamed");
        assert!(store.delete_item(LINKS, "link-1"));
        assert!(store.items(LINKS).is_empty());
    }

    #[test]
    fn move_item_reorders_and_clamps_index() {
        let mut store = loaded_store();
        for (id, title) in [("a", "A"), ("b", "B"), ("c", "C")] {
            store.add_item(LINKS, link(id, title));
        }
        assert!(store.move_item(LINKS, "a", 99));
        let order: Vec<&str> = store.items(LINKS).iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);

        assert!(store.move_item(LINKS, "a", 0));
        assert!(!store.move_item(LINKS, "a", 0), "same position is a no-op");
        let order: Vec<&str> = store.items(LINKS).iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn move_item_renumbers_explicitly_ordered_sections() {
        let mut store = ContentStore::<PrivacyContent>::new();
        store.set_content(PrivacyContent::defaults());
        assert!(store.is_loaded());

        assert!(store.move_item(SECTIONS, "section-security", 0));
        let placed: Vec<(&str, u32)> = store
            .items(SECTIONS)
            .iter()
            .map(|section| (section.id.as_str(), section.order))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("section-security", 1),
                ("section-collection", 2),
                ("section-usage", 3)
            ]
        );
        assert!(!store.move_item(SECTIONS, "section-security", 0));
    }

    #[test]
    fn move_item_uses_display_position_when_storage_order_differs() {
        let mut store = ContentStore::<PrivacyContent>::new();
        let mut doc = PrivacyContent::defaults();
        doc.sections.reverse();
        store.set_content(doc);

        assert!(!store.move_item(SECTIONS, "section-collection", 0));
        assert!(store.move_item(SECTIONS, "section-collection", 5));
        let ids: Vec<&str> = store.items(SECTIONS).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["section-usage", "section-security", "section-collection"]);
    }

    #[test]
    fn reset_to_defaults_replaces_local_edits() {
        let mut store = ContentStore::<PrivacyContent>::new();
        store.set_content(PrivacyContent::default());
        assert!(store.items(SECTIONS).is_empty());

        store.reset_to_defaults();
        assert_eq!(store.current(), Some(&PrivacyContent::defaults()));
    }
}
