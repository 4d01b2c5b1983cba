//! Payment gateway configuration.

use serde::{Deserialize, Serialize};

/// Public key and plan codes for subscription checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Gateway public key.
    #[serde(default)]
    pub public_key: String,
    /// Plan codes per paid tier.
    #[serde(default)]
    pub plans: PlanCodes,
}

/// Yearly and monthly plan codes for each paid tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanCodes {
    #[serde(default)]
    pub tier1: String,
    #[serde(default)]
    pub tier2: String,
    #[serde(default)]
    pub tier3: String,
    #[serde(default)]
    pub tier4: String,
    #[serde(default)]
    pub premium: String,
    #[serde(default)]
    pub tier1_monthly: String,
    #[serde(default)]
    pub tier2_monthly: String,
    #[serde(default)]
    pub tier3_monthly: String,
    #[serde(default)]
    pub tier4_monthly: String,
    #[serde(default)]
    pub premium_monthly: String,
}

impl BillingConfig {
    pub(crate) fn required_keys(&self) -> Vec<(&'static str, &str)> {
        let p = &self.plans;
        vec![
            ("billing.public_key", self.public_key.as_str()),
            ("billing.plans.tier1", p.tier1.as_str()),
            ("billing.plans.tier2", p.tier2.as_str()),
            ("billing.plans.tier3", p.tier3.as_str()),
            ("billing.plans.tier4", p.tier4.as_str()),
            ("billing.plans.premium", p.premium.as_str()),
            ("billing.plans.tier1_monthly", p.tier1_monthly.as_str()),
            ("billing.plans.tier2_monthly", p.tier2_monthly.as_str()),
            ("billing.plans.tier3_monthly", p.tier3_monthly.as_str()),
            ("billing.plans.tier4_monthly", p.tier4_monthly.as_str()),
            ("billing.plans.premium_monthly", p.premium_monthly.as_str()),
        ]
    }
}
