//! Prayer request models

use serde::{Deserialize, Serialize};

/// Status of a submitted prayer request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrayerStatus {
    Pending,
    Praying,
    Answered,
}

/// Prayer request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRequest {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub request_text: String,
    #[serde(default)]
    pub is_urgent: bool,
    pub status: PrayerStatus,
    pub created_at: Option<String>,
}
