use serde::{Deserialize, Serialize};

// Sentinel package id for passes that are bounded by date only.
pub const UNLIMITED_PACKAGE_ID: &str = "unlimited";

pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

// Catalog definition of a purchasable package.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageTemplate {
    pub id: String,
    pub name: String,
    // None only for the unlimited sentinel.
    pub session_count: Option<u32>,
    // None means the package never expires by date.
    pub duration_days: Option<u32>,
    pub description: Option<String>,
}

impl PackageTemplate {
    pub fn unlimited() -> Self {
        Self {
            id: UNLIMITED_PACKAGE_ID.to_string(),
            name: "Unlimited".to_string(),
            session_count: None,
            duration_days: None,
            description: None,
        }
    }
}

// A guest's purchased instance of a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub package_id: String,
    pub name: String,
    pub session_count: Option<u32>,
    pub duration_days: Option<u32>,
    pub description: Option<String>,
    pub start_date: u64,
    pub end_date: Option<u64>,
    pub remaining_sessions: Option<u32>,
}

impl LedgerEntry {
    pub fn is_unlimited(&self) -> bool {
        self.package_id == UNLIMITED_PACKAGE_ID
    }

    pub fn has_remaining_sessions(&self) -> bool {
        matches!(self.remaining_sessions, Some(remaining) if remaining > 0)
    }
}

// All entries held for one guest, in assignment order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuestLedger {
    pub guest_id: String,
    // Bumped by the store on every write.
    pub version: i64,
    pub entries: Vec<LedgerEntry>,
}

// Ledger split computed on read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    pub active: Vec<LedgerEntry>,
    pub expired: Vec<LedgerEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    // Trainer who owns the appointment.
    pub user_id: String,
    pub client_name: String,
    pub date: String,
    pub notes: String,
    pub guest_id: Option<String>,
    pub attended: bool,
    // Ledger entry id, not the template id.
    #[serde(rename = "packageId")]
    pub package_id: Option<String>,
}

// Caller identity as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct VerifiedIdentity {
    pub uid: String,
}

// Client record owned by one trainer. Deleting only deactivates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    // Booked dates as sent by the client, without duplicates.
    pub appointments: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub exercise_name: String,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub notes: String,
}

// Workout for one guest on one training day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExercisePlan {
    pub id: String,
    pub user_id: String,
    pub guest_id: String,
    // Copied from the guest record when the plan is written.
    pub guest_name: String,
    pub workout_day: String,
    pub exercises: Vec<Exercise>,
    pub created_at: u64,
}
