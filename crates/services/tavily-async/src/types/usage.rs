//! Types for the Tavily `/usage` endpoint (used as a health probe)

use serde::{Deserialize, Serialize};

/// Usage counters for the API key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyUsage {
    /// Credits used by this key in the current period
    #[serde(default)]
    pub usage: Option<u64>,
    /// Credit limit for this key, if any
    #[serde(default)]
    pub limit: Option<u64>,
}

/// Account-level plan usage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUsage {
    /// Plan name
    #[serde(default)]
    pub current_plan: Option<String>,
    /// Plan credits used
    #[serde(default)]
    pub plan_usage: Option<u64>,
    /// Plan credit limit
    #[serde(default)]
    pub plan_limit: Option<u64>,
    /// Pay-as-you-go credits used
    #[serde(default)]
    pub paygo_usage: Option<u64>,
    /// Pay-as-you-go limit
    #[serde(default)]
    pub paygo_limit: Option<u64>,
}

/// Response body for `GET /usage`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageResponse {
    /// Key usage
    #[serde(default)]
    pub key: Option<KeyUsage>,
    /// Account usage
    #[serde(default)]
    pub account: Option<AccountUsage>,
}

impl UsageResponse {
    /// Remaining plan credits, when both counters are reported
    #[must_use]
    pub fn remaining_plan_credits(&self) -> Option<u64> {
        let account = self.account.as_ref()?;
        Some(account.plan_limit?.saturating_sub(account.plan_usage?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_credits_saturates() {
        let resp: UsageResponse = serde_json::from_value(serde_json::json!({
            "key": {"usage": 150, "limit": null},
            "account": {"current_plan": "Researcher", "plan_usage": 1200, "plan_limit": 1000}
        }))
        .unwrap();
        assert_eq!(resp.remaining_plan_credits(), Some(0));
        assert_eq!(resp.key.unwrap().usage, Some(150));
    }

    #[test]
    fn remaining_credits_unknown_without_account() {
        assert_eq!(UsageResponse::default().remaining_plan_credits(), None);
    }
}
