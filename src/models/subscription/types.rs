use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Submission review states. `pending` is the initial state; the other
/// three are conceptually terminal, but no transition out of them is
/// blocked. The write path stays permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Approved => "approved",
            SubscriptionStatus::Rejected => "rejected",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<SubscriptionStatus> {
        match s {
            "pending" => Some(SubscriptionStatus::Pending),
            "approved" => Some(SubscriptionStatus::Approved),
            "rejected" => Some(SubscriptionStatus::Rejected),
            "cancelled" => Some(SubscriptionStatus::Cancelled),
            _ => None,
        }
    }
}

/// One user's submitted data against a form. `data` and `submitted_at`
/// are immutable after creation; only `status` (and with it `updated_at`)
/// changes.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub id: i64,
    pub form_id: i64,
    pub user_id: i64,
    pub status: SubscriptionStatus,
    pub data: Map<String, Value>,
    pub submitted_at: String,
    pub updated_at: String,
}

/// Optional filters for the review listing; combined with AND.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscriptionFilter {
    pub form_id: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<SubscriptionStatus>,
}

// --- request DTOs -----------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SubmitInput {
    pub form_id: i64,
    pub data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: SubscriptionStatus,
}
