//! Giving / donation models

use serde::{Deserialize, Serialize};

/// A recorded donation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: u64,
    pub amount: f64,
    pub purpose: String,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub created_at: Option<String>,
}
