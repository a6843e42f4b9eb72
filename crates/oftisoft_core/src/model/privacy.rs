//! Privacy policy page document.
//!
//! Sections carry an explicit `order`; display order follows it rather than
//! insertion order.

use super::{
    collection_key, patchable, section_key, validate_ids, ContentDocument, ContentDomain,
    DocumentValidationError, SubEntity,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

patchable! {
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PrivacyHeader / PrivacyHeaderPatch {
        pub title: String,
        pub description: String,
        /// `YYYY-MM-DD`; blank when never published.
        #[serde(default)]
        pub last_updated: String,
    }
}

patchable! {
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PrivacySection / PrivacySectionPatch {
        key id: String,
        pub title: String,
        pub content: String,
        pub icon: String,
        #[serde(default)]
        pub order: u32,
        #[serde(default = "default_true")]
        pub is_active: bool,
    }
}

patchable! {
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PrivacyContact / PrivacyContactPatch {
        #[serde(default)]
        pub email: String,
        #[serde(default)]
        pub address: String,
    }
}

impl SubEntity for PrivacySection {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn order(&self) -> Option<u32> {
        Some(self.order)
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

impl PrivacySection {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        icon: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            icon: icon.into(),
            order,
            is_active: true,
        }
    }
}

/// Content of the public privacy policy page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyContent {
    pub header: PrivacyHeader,
    #[serde(default)]
    pub sections: Vec<PrivacySection>,
    #[serde(default)]
    pub contact: PrivacyContact,
}

section_key!(HEADER: PrivacyContent => header: PrivacyHeader);
section_key!(CONTACT: PrivacyContent => contact: PrivacyContact);
collection_key!(SECTIONS: PrivacyContent => sections: PrivacySection, prefix = "section");

impl ContentDocument for PrivacyContent {
    const DOMAIN: ContentDomain = ContentDomain::Privacy;

    fn defaults() -> Self {
        Self {
            header: PrivacyHeader {
                title: "Privacy Policy".to_string(),
                description: "How Oftisoft collects, uses and protects your data.".to_string(),
                last_updated: String::new(),
            },
            sections: vec![
                PrivacySection::new(
                    "section-collection",
                    "Information we collect",
                    "Account details, purchase history and the data you choose to share.",
                    "database",
                    1,
                ),
                PrivacySection::new(
                    "section-usage",
                    "How we use information",
                    "To deliver purchases, process payouts and improve the marketplace.",
                    "eye",
                    2,
                ),
                PrivacySection::new(
                    "section-security",
                    "Security",
                    "Payment data is handled by certified processors and never stored by us.",
                    "shield",
                    3,
                ),
            ],
            contact: PrivacyContact {
                email: "privacy@oftisoft.com".to_string(),
                address: String::new(),
            },
        }
    }

    fn validate(&self) -> Result<(), DocumentValidationError> {
        validate_ids(SECTIONS.name(), &self.sections)?;
        let last_updated = self.header.last_updated.trim();
        if !last_updated.is_empty() && !ISO_DATE_RE.is_match(last_updated) {
            return Err(DocumentValidationError::invalid(
                "header.lastUpdated",
                None,
                "must be formatted as YYYY-MM-DD",
            ));
        }
        let email = self.contact.email.trim();
        if !email.is_empty() && !EMAIL_RE.is_match(email) {
            return Err(DocumentValidationError::invalid(
                "contact.email",
                None,
                "must be an email address",
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::PrivacyContent;
    use crate::model::{ContentDocument, DocumentValidationError};

    #[test]
    fn defaults_are_valid() {
        PrivacyContent::defaults()
            .validate()
            .expect("default privacy content should validate");
    }

    #[test]
    fn rejects_malformed_contact_email_and_date() {
        let mut doc = PrivacyContent::defaults();
        doc.contact.email = "privacy at oftisoft".to_string();
        assert!(matches!(
            doc.validate(),
            Err(DocumentValidationError::InvalidField { field: "contact.email", .. })
        ));

        let mut doc = PrivacyContent::defaults();
        doc.header.last_updated = "March 3rd".to_string();
        assert!(matches!(
            doc.validate(),
            Err(DocumentValidationError::InvalidField { field: "header.lastUpdated", .. })
        ));

        doc.header.last_updated = "2026-03-03".to_string();
        doc.validate().expect("iso date passes");
    }
}
