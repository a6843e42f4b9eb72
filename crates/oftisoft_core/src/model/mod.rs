//! Content document model shared by every editor domain.
//!
//! # Responsibility
//! - Define the contract every editable content document satisfies.
//! - Provide typed section/collection keys used by store mutators.
//! - Host the concrete community/pricing/privacy/status document shapes.
//!
//! # Invariants
//! - A document is a singleton per `ContentDomain`.
//! - Sub-entity ids are unique within their parent collection.
//! - Patches only overwrite fields that are present.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Declares a struct together with its all-optional patch companion and the
/// `Merge` impl that applies it. A leading `key` field is carried by the
/// struct but excluded from the patch so merges can never change identity.
macro_rules! patchable {
    (
        $(#[$meta:meta])*
        pub struct $name:ident / $patch:ident {
            $(key $key:ident: $kty:ty,)?
            $( $(#[$fmeta:meta])* pub $field:ident : $ty:ty, )*
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $(pub $key: $kty,)?
            $( $(#[$fmeta])* pub $field: $ty, )*
        }

        #[doc = concat!("Partial update for [`", stringify!($name), "`]; absent fields are left untouched.")]
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $patch {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl $crate::model::Merge for $name {
            type Patch = $patch;

            fn merge(&mut self, patch: $patch) {
                $(
                    if let Some(value) = patch.$field {
                        self.$field = value;
                    }
                )*
            }
        }
    };
}

/// Declares a `CollectionKey` constant for one `Vec` field of a document.
macro_rules! collection_key {
    ($(#[$meta:meta])* $name:ident: $doc:ty => $field:ident: $item:ty, prefix = $prefix:literal) => {
        $(#[$meta])*
        pub const $name: $crate::model::CollectionKey<$doc, $item> = {
            fn get(doc: &$doc) -> &Vec<$item> {
                &doc.$field
            }
            fn get_mut(doc: &mut $doc) -> &mut Vec<$item> {
                &mut doc.$field
            }
            $crate::model::CollectionKey::new(stringify!($field), $prefix, get, get_mut)
        };
    };
}

/// Declares a `SectionKey` constant for one struct field of a document.
macro_rules! section_key {
    ($(#[$meta:meta])* $name:ident: $doc:ty => $field:ident: $section:ty) => {
        $(#[$meta])*
        pub const $name: $crate::model::SectionKey<$doc, $section> = {
            fn get(doc: &$doc) -> &$section {
                &doc.$field
            }
            fn get_mut(doc: &mut $doc) -> &mut $section {
                &mut doc.$field
            }
            $crate::model::SectionKey::new(stringify!($field), get, get_mut)
        };
    };
}

pub(crate) use {collection_key, patchable, section_key};

pub mod community;
pub mod pricing;
pub mod privacy;
pub mod status;

/// One editable marketing page/section of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentDomain {
    Community,
    Pricing,
    Privacy,
    Status,
}

impl ContentDomain {
    pub const ALL: [ContentDomain; 4] = [
        ContentDomain::Community,
        ContentDomain::Pricing,
        ContentDomain::Privacy,
        ContentDomain::Status,
    ];

    /// Stable id used for storage rows and log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::Pricing => "pricing",
            Self::Privacy => "privacy",
            Self::Status => "status",
        }
    }

    /// Parses a domain id; surrounding whitespace and case are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "community" => Some(Self::Community),
            "pricing" => Some(Self::Pricing),
            "privacy" => Some(Self::Privacy),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

impl Display for ContentDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-document contract shared by all content domains.
pub trait ContentDocument:
    Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static
{
    /// Domain this document type belongs to.
    const DOMAIN: ContentDomain;

    /// Hard-coded document used for explicit, confirmed resets and seeding.
    fn defaults() -> Self;

    /// Checks document invariants before persistence.
    fn validate(&self) -> Result<(), DocumentValidationError>;
}

/// Member of a collection inside a content document.
pub trait SubEntity {
    fn id(&self) -> &str;

    /// Entities without an activation flag are always active.
    fn is_active(&self) -> bool {
        true
    }

    /// Explicit display position, `None` when insertion order is display order.
    fn order(&self) -> Option<u32> {
        None
    }

    /// Rewrites the explicit display position; no-op without an `order` field.
    fn set_order(&mut self, _order: u32) {}
}

/// Shallow merge of an all-optional patch into a value.
pub trait Merge {
    type Patch;

    fn merge(&mut self, patch: Self::Patch);
}

/// Typed address of one struct-valued section inside document `D`.
pub struct SectionKey<D, S> {
    name: &'static str,
    get: fn(&D) -> &S,
    get_mut: fn(&mut D) -> &mut S,
}

impl<D, S> SectionKey<D, S> {
    pub const fn new(name: &'static str, get: fn(&D) -> &S, get_mut: fn(&mut D) -> &mut S) -> Self {
        Self { name, get, get_mut }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get<'a>(&self, doc: &'a D) -> &'a S {
        (self.get)(doc)
    }

    pub(crate) fn get_mut<'a>(&self, doc: &'a mut D) -> &'a mut S {
        (self.get_mut)(doc)
    }
}

impl<D, S> Clone for SectionKey<D, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D, S> Copy for SectionKey<D, S> {}

impl<D, S> Debug for SectionKey<D, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SectionKey").field(&self.name).finish()
    }
}

/// Typed address of one sub-entity collection inside document `D`.
pub struct CollectionKey<D, T> {
    name: &'static str,
    id_prefix: &'static str,
    get: fn(&D) -> &Vec<T>,
    get_mut: fn(&mut D) -> &mut Vec<T>,
}

impl<D, T> CollectionKey<D, T> {
    pub const fn new(
        name: &'static str,
        id_prefix: &'static str,
        get: fn(&D) -> &Vec<T>,
        get_mut: fn(&mut D) -> &mut Vec<T>,
    ) -> Self {
        Self {
            name,
            id_prefix,
            get,
            get_mut,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Prefix used when generating fresh ids for this collection.
    pub fn id_prefix(&self) -> &'static str {
        self.id_prefix
    }

    pub fn items<'a>(&self, doc: &'a D) -> &'a [T] {
        (self.get)(doc).as_slice()
    }

    pub(crate) fn items_mut<'a>(&self, doc: &'a mut D) -> &'a mut Vec<T> {
        (self.get_mut)(doc)
    }
}

impl<D, T: SubEntity> CollectionKey<D, T> {
    pub fn find<'a>(&self, doc: &'a D, id: &str) -> Option<&'a T> {
        self.items(doc).iter().find(|item| item.id() == id)
    }
}

impl<D, T> Clone for CollectionKey<D, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D, T> Copy for CollectionKey<D, T> {}

impl<D, T> Debug for CollectionKey<D, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CollectionKey").field(&self.name).finish()
    }
}

/// Generates a fresh sub-entity id of the form `<prefix>-<uuid>`.
pub fn new_entity_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

/// Document invariant violations detected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    BlankId {
        collection: &'static str,
    },
    DuplicateId {
        collection: &'static str,
        id: String,
    },
    InvalidField {
        field: &'static str,
        id: Option<String>,
        reason: &'static str,
    },
}

impl DocumentValidationError {
    pub(crate) fn invalid(field: &'static str, id: Option<&str>, reason: &'static str) -> Self {
        Self::InvalidField {
            field,
            id: id.map(str::to_string),
            reason,
        }
    }
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId { collection } => write!(f, "{collection}: item id must not be blank"),
            Self::DuplicateId { collection, id } => {
                write!(f, "{collection}: duplicate item id `{id}`")
            }
            Self::InvalidField {
                field,
                id: Some(id),
                reason,
            } => write!(f, "{field} of `{id}` {reason}"),
            Self::InvalidField {
                field,
                id: None,
                reason,
            } => write!(f, "{field} {reason}"),
        }
    }
}

impl Error for DocumentValidationError {}

/// Checks that every id in `items` is non-blank and unique.
pub(crate) fn validate_ids<T: SubEntity>(
    collection: &'static str,
    items: &[T],
) -> Result<(), DocumentValidationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        let id = item.id();
        if id.trim().is_empty() {
            return Err(DocumentValidationError::BlankId { collection });
        }
        if !seen.insert(id) {
            return Err(DocumentValidationError::DuplicateId {
                collection,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{new_entity_id, validate_ids, ContentDomain, DocumentValidationError, SubEntity};

    struct Item(&'static str);

    impl SubEntity for Item {
        fn id(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn domain_ids_roundtrip_through_parse() {
        for domain in ContentDomain::ALL {
            assert_eq!(ContentDomain::parse(domain.as_str()), Some(domain));
        }
        assert_eq!(ContentDomain::parse(" Pricing "), Some(ContentDomain::Pricing));
        assert_eq!(ContentDomain::parse("finance"), None);
    }

    #[test]
    fn new_entity_id_uses_prefix_and_is_unique() {
        let a = new_entity_id("link");
        let b = new_entity_id("link");
        assert!(a.starts_with("link-"));
        assert_ne!(a, b);
    }

    #[test]
    fn validate_ids_rejects_blank_and_duplicate() {
        let blank = validate_ids("links", &[Item(" ")]).expect_err("blank id must fail");
        assert_eq!(blank, DocumentValidationError::BlankId { collection: "links" });

        let duplicate =
            validate_ids("links", &[Item("a"), Item("a")]).expect_err("duplicate id must fail");
        assert!(matches!(duplicate, DocumentValidationError::DuplicateId { .. }));

        validate_ids("links", &[Item("a"), Item("b")]).expect("unique ids pass");
    }
}
