//! System status page document.
//!
//! # Invariants
//! - `uptime` is a percentage within `0..=100`.
//! - A resolved incident has `resolved_at >= created_at`.
//! - Timestamps are Unix epoch milliseconds.

use super::{
    collection_key, patchable, section_key, validate_ids, ContentDocument, ContentDomain,
    DocumentValidationError, SubEntity,
};
use serde::{Deserialize, Serialize};

/// Health of one monitored system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    Operational,
    Degraded,
    PartialOutage,
    MajorOutage,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    Minor,
    Major,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Investigating,
    Identified,
    Monitoring,
    Resolved,
}

patchable! {
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StatusHeader / StatusHeaderPatch {
        pub title: String,
        pub description: String,
    }
}

patchable! {
    /// Monitored platform component (API, checkout, downloads, ...).
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SystemNode / SystemNodePatch {
        key id: String,
        pub name: String,
        #[serde(default)]
        pub description: String,
        pub status: SystemStatus,
        /// Percentage over the trailing 90 days.
        pub uptime: f64,
        #[serde(default = "default_true")]
        pub is_active: bool,
    }
}

patchable! {
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Incident / IncidentPatch {
        key id: String,
        pub title: String,
        #[serde(default)]
        pub description: String,
        pub severity: IncidentSeverity,
        pub status: IncidentStatus,
        pub created_at: i64,
        #[serde(default)]
        pub resolved_at: Option<i64>,
    }
}

impl SubEntity for SystemNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl SubEntity for Incident {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SystemNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            status: SystemStatus::Operational,
            uptime: 100.0,
            is_active: true,
        }
    }
}

impl Incident {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        severity: IncidentSeverity,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            severity,
            status: IncidentStatus::Investigating,
            created_at,
            resolved_at: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == IncidentStatus::Resolved
    }
}

/// Content of the public status page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusContent {
    pub header: StatusHeader,
    #[serde(default)]
    pub systems: Vec<SystemNode>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

section_key!(HEADER: StatusContent => header: StatusHeader);
collection_key!(SYSTEMS: StatusContent => systems: SystemNode, prefix = "system");
collection_key!(INCIDENTS: StatusContent => incidents: Incident, prefix = "incident");

impl ContentDocument for StatusContent {
    const DOMAIN: ContentDomain = ContentDomain::Status;

    fn defaults() -> Self {
        Self {
            header: StatusHeader {
                title: "System Status".to_string(),
                description: "Live availability of the Oftisoft marketplace.".to_string(),
            },
            systems: vec![
                SystemNode::new("system-api", "API"),
                SystemNode::new("system-checkout", "Checkout"),
                SystemNode::new("system-downloads", "Downloads & licensing"),
                SystemNode::new("system-dashboard", "Creator dashboard"),
            ],
            incidents: Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), DocumentValidationError> {
        validate_ids(SYSTEMS.name(), &self.systems)?;
        validate_ids(INCIDENTS.name(), &self.incidents)?;
        for system in &self.systems {
            if !(0.0..=100.0).contains(&system.uptime) {
                return Err(DocumentValidationError::invalid(
                    "systems.uptime",
                    Some(&system.id),
                    "must be a percentage between 0 and 100",
                ));
            }
        }
        for incident in &self.incidents {
            match (incident.is_resolved(), incident.resolved_at) {
                (true, None) => {
                    return Err(DocumentValidationError::invalid(
                        "incidents.resolvedAt",
                        Some(&incident.id),
                        "is required once the incident is resolved",
                    ));
                }
                (_, Some(resolved_at)) if resolved_at < incident.created_at => {
                    return Err(DocumentValidationError::invalid(
                        "incidents.resolvedAt",
                        Some(&incident.id),
                        "must not be earlier than createdAt",
                    ));
                }
                _ => {}
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
    use super::{Incident, IncidentPatch, IncidentSeverity, IncidentStatus, StatusContent};
    use crate::model::{ContentDocument, DocumentValidationError, Merge};

    #[test]
    fn defaults_are_valid() {
        StatusContent::defaults()
            .validate()
            .expect("default status content should validate");
    }

    #[test]
    fn rejects_uptime_outside_percentage_range() {
        let mut doc = StatusContent::defaults();
        doc.systems[0].uptime = 100.5;
        assert!(matches!(
            doc.validate(),
            Err(DocumentValidationError::InvalidField { field: "systems.uptime", .. })
        ));
    }

    #[test]
    fn resolved_incident_requires_ordered_resolution_time() {
        let mut doc = StatusContent::defaults();
        let mut incident = Incident::new("incident-1", "Checkout errors", IncidentSeverity::Major, 2_000);
        incident.merge(IncidentPatch {
            status: Some(IncidentStatus::Resolved),
            ..IncidentPatch::default()
        });
        doc.incidents.push(incident);
        assert!(doc.validate().is_err(), "missing resolvedAt must fail");

        doc.incidents[0].resolved_at = Some(1_000);
        assert!(doc.validate().is_err(), "resolvedAt before createdAt must fail");

        doc.incidents[0].resolved_at = Some(3_000);
        doc.validate().expect("ordered resolution passes");
    }
}
