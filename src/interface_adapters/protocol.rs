use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::{LedgerEntry, PackageTemplate};

// Request payload for creating a catalog package. Counts are signed on the
// wire so negative values reach validation instead of failing to decode.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest {
    pub name: Option<String>,
    pub session_count: Option<i64>,
    pub duration_days: Option<i64>,
    pub description: Option<String>,
}

// Partial update for a catalog package; absent fields keep stored values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub session_count: Option<i64>,
    pub duration_days: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PackageResponse {
    pub message: String,
    pub package: PackageTemplate,
}

// Request payload for assigning a package to a guest.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPackageRequest {
    pub guest_id: Option<String>,
    pub package_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssignPackageResponse {
    pub message: String,
    pub package: LedgerEntry,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestPackagesResponse {
    pub active_packages: Vec<LedgerEntry>,
    pub expired_packages: Vec<LedgerEntry>,
}

// Attendance toggle for one ledger entry. `attended` stays untyped so a
// non-boolean value is reported as a bad request instead of a decode failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    pub attended: Option<Value>,
    pub package_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceResponse {
    pub message: String,
    pub updated_package: LedgerEntry,
}

// Request payload for booking an appointment.
#[derive(Debug, Default, Deserialize)]
pub struct CreateAppointmentRequest {
    pub client_name: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
    pub guest_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateAppointmentResponse {
    pub id: String,
    pub message: String,
    pub guest_id: Option<String>,
    #[serde(rename = "packageId")]
    pub package_id: Option<String>,
}

// Partial appointment edit; absent fields keep stored values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub client_name: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
    pub guest_id: Option<String>,
    pub attended: Option<bool>,
    #[serde(rename = "packageId")]
    pub package_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateAppointmentResponse {
    pub message: String,
    pub attended: bool,
}

// Request payload for registering a guest.
#[derive(Debug, Default, Deserialize)]
pub struct CreateGuestRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateGuestResponse {
    pub id: String,
    pub message: String,
}

// Profile edit; absent or empty fields keep stored values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGuestRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GuestAppointmentRequest {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveGuestAppointmentRequest {
    pub old_date: Option<String>,
    pub new_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GuestAppointmentDate {
    pub date: String,
    pub notes: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestAppointmentsResponse {
    pub guest_id: String,
    pub guest_name: String,
    pub appointments: Vec<GuestAppointmentDate>,
}

// One exercise line as sent by clients; validated before it is stored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ExerciseInput {
    pub exercise_name: Option<String>,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateExercisePlanRequest {
    pub guest_id: Option<String>,
    pub workout_day: Option<String>,
    pub exercises: Option<Vec<ExerciseInput>>,
}

// Plan edit: day and exercises are replaced; guest moves only when given.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExercisePlanRequest {
    pub guest_id: Option<String>,
    pub workout_day: Option<String>,
    pub exercises: Option<Vec<ExerciseInput>>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
