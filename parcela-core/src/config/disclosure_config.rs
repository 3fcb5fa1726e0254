use serde::{Deserialize, Serialize};

use super::defaults;

/// Disclosure policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclosureConfig {
    /// Free teaser entries per response.
    pub teaser_size: usize,
    /// Suggested top-up in the payment prompt.
    pub suggested_topup: u32,
}

impl Default for DisclosureConfig {
    fn default() -> Self {
        Self {
            teaser_size: defaults::DEFAULT_TEASER_SIZE,
            suggested_topup: defaults::DEFAULT_SUGGESTED_TOPUP,
        }
    }
}
