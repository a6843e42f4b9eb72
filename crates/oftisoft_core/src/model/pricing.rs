//! Pricing page document.
//!
//! # Invariants
//! - Plan prices are finite and non-negative.
//! - Plan currency is a three-letter uppercase ISO code.

use super::{
    collection_key, patchable, section_key, validate_ids, ContentDocument, ContentDomain,
    DocumentValidationError, SubEntity,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CURRENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency regex"));

/// Billing cadence of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    Monthly,
    Yearly,
    /// Pay once, own forever.
    Lifetime,
}

patchable! {
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PricingHeader / PricingHeaderPatch {
        pub badge: String,
        pub title: String,
        pub description: String,
    }
}

patchable! {
    /// One purchasable plan card.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PricingPlan / PricingPlanPatch {
        key id: String,
        pub name: String,
        pub description: String,
        pub price: f64,
        pub currency: String,
        pub interval: BillingInterval,
        #[serde(default)]
        pub features: Vec<String>,
        pub cta_label: String,
        /// Highlighted as the recommended plan.
        #[serde(default)]
        pub is_popular: bool,
        #[serde(default = "default_true")]
        pub is_active: bool,
    }
}

patchable! {
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PricingFaq / PricingFaqPatch {
        key id: String,
        pub question: String,
        pub answer: String,
        #[serde(default = "default_true")]
        pub is_active: bool,
    }
}

impl SubEntity for PricingPlan {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl SubEntity for PricingFaq {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl PricingPlan {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            currency: "USD".to_string(),
            interval: BillingInterval::Monthly,
            features: Vec::new(),
            cta_label: "Get started".to_string(),
            is_popular: false,
            is_active: true,
        }
    }
}

impl PricingFaq {
    pub fn new(id: impl Into<String>, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
            is_active: true,
        }
    }
}

/// Content of the public pricing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingContent {
    pub header: PricingHeader,
    #[serde(default)]
    pub plans: Vec<PricingPlan>,
    #[serde(default)]
    pub faqs: Vec<PricingFaq>,
}

section_key!(HEADER: PricingContent => header: PricingHeader);
collection_key!(PLANS: PricingContent => plans: PricingPlan, prefix = "plan");
collection_key!(FAQS: PricingContent => faqs: PricingFaq, prefix = "faq");

impl ContentDocument for PricingContent {
    const DOMAIN: ContentDomain = ContentDomain::Pricing;

    fn defaults() -> Self {
        Self {
            header: PricingHeader {
                badge: "Pricing".to_string(),
                title: "Simple pricing for every creator".to_string(),
                description: "Start selling for free and upgrade as you grow.".to_string(),
            },
            plans: vec![
                PricingPlan {
                    description: "Everything you need to publish your first products.".to_string(),
                    features: vec![
                        "Up to 10 products".to_string(),
                        "Standard payouts".to_string(),
                    ],
                    ..PricingPlan::new("plan-starter", "Starter", 0.0)
                },
                PricingPlan {
                    description: "For growing stores with licensing needs.".to_string(),
                    features: vec![
                        "Unlimited products".to_string(),
                        "License key management".to_string(),
                        "Coupons and bundles".to_string(),
                    ],
                    is_popular: true,
                    ..PricingPlan::new("plan-pro", "Pro", 19.0)
                },
                PricingPlan {
                    description: "Dedicated support and custom payout schedules.".to_string(),
                    features: vec![
                        "Everything in Pro".to_string(),
                        "Priority support".to_string(),
                        "Team seats".to_string(),
                    ],
                    cta_label: "Contact sales".to_string(),
                    ..PricingPlan::new("plan-business", "Business", 49.0)
                },
            ],
            faqs: vec![
                PricingFaq::new(
                    "faq-fees",
                    "Are there transaction fees?",
                    "Starter includes a 5% fee; paid plans have no platform fee.",
                ),
                PricingFaq::new(
                    "faq-cancel",
                    "Can I cancel anytime?",
                    "Yes. Your plan stays active until the end of the billing period.",
                ),
            ],
        }
    }

    fn validate(&self) -> Result<(), DocumentValidationError> {
        validate_ids(PLANS.name(), &self.plans)?;
        validate_ids(FAQS.name(), &self.faqs)?;
        for plan in &self.plans {
            if !plan.price.is_finite() || plan.price < 0.0 {
                return Err(DocumentValidationError::invalid(
                    "plans.price",
                    Some(&plan.id),
                    "must be a finite, non-negative amount",
                ));
            }
            if !CURRENCY_RE.is_match(&plan.currency) {
                return Err(DocumentValidationError::invalid(
                    "plans.currency",
                    Some(&plan.id),
                    "must be a three-letter uppercase currency code",
                ));
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
