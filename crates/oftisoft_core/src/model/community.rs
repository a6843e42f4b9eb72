//! Community page document.
//!
//! # Invariants
//! - Link URLs use `http(s)://` or `mailto:` schemes.
//! - Link and stat ids are unique within their collection.

use super::{
    collection_key, patchable, section_key, validate_ids, ContentDocument, ContentDomain,
    DocumentValidationError, SubEntity,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LINK_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://\S+|mailto:\S+@\S+)$").expect("valid link url regex"));

patchable! {
    /// Hero copy shown above the community links.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CommunityHeader / CommunityHeaderPatch {
        pub badge: String,
        pub title: String,
        pub description: String,
    }
}

patchable! {
    /// External community channel (Discord, GitHub, ...).
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CommunityLink / CommunityLinkPatch {
        key id: String,
        pub title: String,
        pub description: String,
        pub url: String,
        /// Symbolic icon name, resolved by the preview projector.
        pub icon: String,
        /// Free-form member count label, e.g. `12k+`.
        #[serde(default)]
        pub members: String,
        #[serde(default = "default_true")]
        pub is_active: bool,
    }
}

patchable! {
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CommunityStat / CommunityStatPatch {
        key id: String,
        pub label: String,
        pub value: String,
        pub icon: String,
    }
}

impl SubEntity for CommunityLink {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl SubEntity for CommunityStat {
    fn id(&self) -> &str {
        &self.id
    }
}

impl CommunityLink {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            url: url.into(),
            icon: icon.into(),
            members: String::new(),
            is_active: true,
        }
    }
}

impl CommunityStat {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            icon: icon.into(),
        }
    }
}

/// Content of the public community page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityContent {
    pub header: CommunityHeader,
    #[serde(default)]
    pub links: Vec<CommunityLink>,
    #[serde(default)]
    pub stats: Vec<CommunityStat>,
}

section_key!(HEADER: CommunityContent => header: CommunityHeader);
collection_key!(LINKS: CommunityContent => links: CommunityLink, prefix = "link");
collection_key!(STATS: CommunityContent => stats: CommunityStat, prefix = "stat");

impl ContentDocument for CommunityContent {
    const DOMAIN: ContentDomain = ContentDomain::Community;

    fn defaults() -> Self {
        Self {
            header: CommunityHeader {
                badge: "Community".to_string(),
                title: "Join the Oftisoft community".to_string(),
                description: "Connect with creators and buyers, share feedback and get help."
                    .to_string(),
            },
            links: vec![
                CommunityLink {
                    description: "Chat with the team and other creators.".to_string(),
                    ..CommunityLink::new("link-discord", "Discord", "https://discord.gg/oftisoft", "discord")
                },
                CommunityLink {
                    description: "Report issues and browse open source tooling.".to_string(),
                    ..CommunityLink::new("link-github", "GitHub", "https://github.com/oftisoft", "github")
                },
                CommunityLink {
                    description: "Product news and release announcements.".to_string(),
                    ..CommunityLink::new("link-twitter", "Twitter", "https://twitter.com/oftisoft", "twitter")
                },
            ],
            stats: vec![
                CommunityStat::new("stat-members", "Members", "10k+", "users"),
                CommunityStat::new("stat-products", "Products", "2,500+", "download"),
                CommunityStat::new("stat-rating", "Average rating", "4.9", "star"),
            ],
        }
    }

    fn validate(&self) -> Result<(), DocumentValidationError> {
        validate_ids(LINKS.name(), &self.links)?;
        validate_ids(STATS.name(), &self.stats)?;
        for link in &self.links {
            if !LINK_URL_RE.is_match(link.url.trim()) {
                return Err(DocumentValidationError::invalid(
                    "links.url",
                    Some(&link.id),
                    "must be an http(s) or mailto URL",
                ));
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::{CommunityContent, CommunityLink, CommunityLinkPatch, LINKS};
    use crate::model::{ContentDocument, DocumentValidationError, Merge};

    #[test]
    fn defaults_are_valid() {
        CommunityContent::defaults()
            .validate()
            .expect("default community content should validate");
    }

    #[test]
    fn rejects_non_http_link_url() {
        let mut doc = CommunityContent::defaults();
        doc.links[0].url = "javascript:alert(1)".to_string();
        let err = doc.validate().expect_err("unsafe scheme must fail");
        assert!(matches!(
            err,
            DocumentValidationError::InvalidField { field: "links.url", .. }
        ));
    }

    #[test]
    fn link_patch_only_touches_present_fields() {
        let mut link = CommunityLink::new("link-1", "Discord", "https://discord.gg/x", "discord");
        link.merge(CommunityLinkPatch {
            title: Some("Discord server".to_string()),
            is_active: Some(false),
            ..CommunityLinkPatch::default()
        });
        assert_eq!(link.id, "link-1");
        assert_eq!(link.title, "Discord server");
        assert_eq!(link.url, "https://discord.gg/x");
        assert!(!link.is_active);
    }

    #[test]
    fn deserializes_camel_case_json_with_missing_collections() {
        let doc: CommunityContent = serde_json::from_str(
            r#"{"header":{"badge":"X","title":"","description":""},
                "links":[{"id":"link-1","title":"Discord","description":"","url":"https://d.gg","icon":"discord","isActive":false}]}"#,
        )
        .expect("json should parse");
        assert_eq!(doc.header.badge, "X");
        assert!(doc.stats.is_empty());
        let link = LINKS.find(&doc, "link-1").expect("link present");
        assert!(!link.is_active);
        assert!(link.members.is_empty());
    }

    #[test]
    fn patch_deserializes_from_partial_json() {
        let patch: CommunityLinkPatch =
            serde_json::from_str(r#"{"isActive":true,"members":"5k"}"#).expect("patch parses");
        assert_eq!(patch.is_active, Some(true));
        assert_eq!(patch.members.as_deref(), Some("5k"));
        assert!(patch.title.is_none());
    }
}
