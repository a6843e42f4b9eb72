//! Read-only projection of a (possibly unsaved) document for display.
//!
//! # Responsibility
//! - Drop inactive sub-entities, keeping original relative order.
//! - Resolve symbolic icon names through `IconRegistry`.
//! - Copy text fields verbatim; no sanitization happens here.
//!
//! The same projection serves the in-dashboard live preview and the public
//! page renderer, so both show identical content for the same document.

use crate::model::community::{CommunityContent, CommunityHeader};
use crate::model::pricing::{BillingInterval, PricingContent, PricingHeader};
use crate::model::privacy::{PrivacyContact, PrivacyContent, PrivacyHeader};
use crate::model::status::{
    Incident, IncidentSeverity, IncidentStatus, StatusContent, StatusHeader, SystemStatus,
};
use crate::model::{ContentDocument, SubEntity};
use serde::Serialize;
use std::fmt::Debug;

mod icon;

pub use icon::{resolve_icon, BuiltinIconRegistry, IconId, IconMap, IconRegistry, ResolvedIcon};

/// Documents that can be projected into a display-ready view.
pub trait Preview: ContentDocument {
    type View: Debug + Clone + PartialEq + Serialize;

    /// Pure transform; never touches the document or any external state.
    fn project(&self, icons: &dyn IconRegistry) -> Self::View;
}

/// Active items of `items`, in their original relative order.
pub fn active_items<T: SubEntity>(items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().filter(|item| item.is_active())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPreview {
    pub header: CommunityHeader,
    pub links: Vec<LinkCard>,
    pub stats: Vec<StatTile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub members: String,
    pub icon: ResolvedIcon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatTile {
    pub id: String,
    pub label: String,
    pub value: String,
    pub icon: ResolvedIcon,
}

impl Preview for CommunityContent {
    type View = CommunityPreview;

    fn project(&self, icons: &dyn IconRegistry) -> CommunityPreview {
        CommunityPreview {
            header: self.header.clone(),
            links: active_items(&self.links)
                .map(|link| LinkCard {
                    id: link.id.clone(),
                    title: link.title.clone(),
                    description: link.description.clone(),
                    url: link.url.clone(),
                    members: link.members.clone(),
                    icon: resolve_icon(&link.icon, icons),
                })
                .collect(),
            stats: active_items(&self.stats)
                .map(|stat| StatTile {
                    id: stat.id.clone(),
                    label: stat.label.clone(),
                    value: stat.value.clone(),
                    icon: resolve_icon(&stat.icon, icons),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPreview {
    pub header: PricingHeader,
    pub plans: Vec<PlanCard>,
    pub faqs: Vec<FaqItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCard {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Display price such as `$19/mo` or `Free`.
    pub price_label: String,
    pub features: Vec<String>,
    pub cta_label: String,
    pub is_popular: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl Preview for PricingContent {
    type View = PricingPreview;

    fn project(&self, _icons: &dyn IconRegistry) -> PricingPreview {
        PricingPreview {
            header: self.header.clone(),
            plans: active_items(&self.plans)
                .map(|plan| PlanCard {
                    id: plan.id.clone(),
                    name: plan.name.clone(),
                    description: plan.description.clone(),
                    price_label: price_label(plan.price, &plan.currency, plan.interval),
                    features: plan.features.clone(),
                    cta_label: plan.cta_label.clone(),
                    is_popular: plan.is_popular,
                })
                .collect(),
            faqs: active_items(&self.faqs)
                .map(|faq| FaqItem {
                    id: faq.id.clone(),
                    question: faq.question.clone(),
                    answer: faq.answer.clone(),
                })
                .collect(),
        }
    }
}

fn price_label(price: f64, currency: &str, interval: BillingInterval) -> String {
    if price == 0.0 {
        return "Free".to_string();
    }
    let amount = if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    };
    let amount = match currency {
        "USD" => format!("${amount}"),
        "EUR" => format!("€{amount}"),
        "GBP" => format!("£{amount}"),
        other => format!("{other} {amount}"),
    };
    match interval {
        BillingInterval::Monthly => format!("{amount}/mo"),
        BillingInterval::Yearly => format!("{amount}/yr"),
        BillingInterval::Lifetime => amount,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPreview {
    pub header: PrivacyHeader,
    pub sections: Vec<SectionBlock>,
    pub contact: PrivacyContact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBlock {
    pub id: String,
    pub title: String,
    pub content: String,
    pub icon: ResolvedIcon,
}

impl Preview for PrivacyContent {
    type View = PrivacyPreview;

    fn project(&self, icons: &dyn IconRegistry) -> PrivacyPreview {
        let mut sections: Vec<_> = active_items(&self.sections).collect();
        // Stable: equal `order` values keep insertion order.
        sections.sort_by_key(|section| section.order);
        PrivacyPreview {
            header: self.header.clone(),
            sections: sections
                .into_iter()
                .map(|section| SectionBlock {
                    id: section.id.clone(),
                    title: section.title.clone(),
                    content: section.content.clone(),
                    icon: resolve_icon(&section.icon, icons),
                })
                .collect(),
            contact: self.contact.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPreview {
    pub header: StatusHeader,
    /// Worst status across visible systems.
    pub overall: SystemStatus,
    pub systems: Vec<SystemRow>,
    /// Unresolved incidents, newest first.
    pub open_incidents: Vec<IncidentRow>,
    /// Resolved incidents, newest first.
    pub past_incidents: Vec<IncidentRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: SystemStatus,
    pub uptime: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    pub created_at: i64,
    pub resolved_at: Option<i64>,
}

impl Preview for StatusContent {
    type View = StatusPreview;

    fn project(&self, _icons: &dyn IconRegistry) -> StatusPreview {
        let systems: Vec<SystemRow> = active_items(&self.systems)
            .map(|system| SystemRow {
                id: system.id.clone(),
                name: system.name.clone(),
                description: system.description.clone(),
                status: system.status,
                uptime: system.uptime,
            })
            .collect();
        let overall = systems
            .iter()
            .map(|system| system.status)
            .max_by_key(|status| status_rank(*status))
            .unwrap_or(SystemStatus::Operational);

        let mut incidents: Vec<_> = self.incidents.iter().collect();
        incidents.sort_by_key(|incident| std::cmp::Reverse(incident.created_at));
        let (past, open): (Vec<_>, Vec<_>) = incidents
            .into_iter()
            .partition(|incident| incident.is_resolved());
        let to_row = |incident: &Incident| IncidentRow {
            id: incident.id.clone(),
            title: incident.title.clone(),
            description: incident.description.clone(),
            severity: incident.severity,
            status: incident.status,
            created_at: incident.created_at,
            resolved_at: incident.resolved_at,
        };

        StatusPreview {
            header: self.header.clone(),
            overall,
            systems,
            open_incidents: open.into_iter().map(to_row).collect(),
            past_incidents: past.into_iter().map(to_row).collect(),
        }
    }
}

fn status_rank(status: SystemStatus) -> u8 {
    match status {
        SystemStatus::Operational => 0,
        SystemStatus::Maintenance => 1,
        SystemStatus::Degraded => 2,
        SystemStatus::PartialOutage => 3,
        SystemStatus::MajorOutage => 4,
    }
}
