use axum::extract::{Path, State};
use axum::{http::StatusCode, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::errors::LedgerError;
use crate::interface_adapters::auth::AuthenticatedTrainer;
use crate::interface_adapters::handlers::error_response;
use crate::interface_adapters::protocol::{
    AssignPackageRequest, AssignPackageResponse, ErrorResponse, GuestPackagesResponse,
    UpdateAttendanceRequest, UpdateAttendanceResponse,
};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::apply_attendance::ApplyAttendanceUseCase;
use crate::use_cases::assign_package::AssignPackageUseCase;
use crate::use_cases::classify_packages::ClassifyPackagesUseCase;

type HandlerError = (StatusCode, Json<ErrorResponse>);

// Handler for assigning a catalog package to a guest.
#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id))]
pub async fn assign_package(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AssignPackageRequest>,
) -> Result<Json<AssignPackageResponse>, HandlerError> {
    let use_case = AssignPackageUseCase {
        clock: SystemClock,
        catalog: state.catalog.clone(),
        ledgers: state.ledgers.clone(),
    };

    let entry = use_case
        .execute(
            payload.guest_id.as_deref().unwrap_or_default(),
            payload.package_id.as_deref().unwrap_or_default(),
        )
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(AssignPackageResponse {
        message: "Package assigned successfully".to_string(),
        package: entry,
    }))
}

// Handler returning a guest's packages split into active and expired.
#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn guest_packages(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
) -> Result<Json<GuestPackagesResponse>, HandlerError> {
    let use_case = ClassifyPackagesUseCase {
        clock: SystemClock,
        ledgers: state.ledgers.clone(),
    };

    let classification = use_case
        .execute(&guest_id)
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(GuestPackagesResponse {
        active_packages: classification.active,
        expired_packages: classification.expired,
    }))
}

// Handler for attendance toggles against one ledger entry.
#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn update_attendance(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
    Json(payload): Json<UpdateAttendanceRequest>,
) -> Result<Json<UpdateAttendanceResponse>, HandlerError> {
    let Some(Value::Bool(attended)) = payload.attended else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "attended must be a boolean",
        ));
    };

    let use_case = ApplyAttendanceUseCase {
        ledgers: state.ledgers.clone(),
    };
    let entry = use_case
        .execute(
            &guest_id,
            payload.package_id.as_deref().unwrap_or_default(),
            attended,
        )
        .await
        .map_err(map_ledger_error)?;

    Ok(Json(UpdateAttendanceResponse {
        message: "Package updated successfully".to_string(),
        updated_package: entry,
    }))
}

fn map_ledger_error(err: LedgerError) -> HandlerError {
    match err {
        LedgerError::TemplateNotFound => error_response(StatusCode::NOT_FOUND, "Package not found"),
        LedgerError::LedgerNotFound => {
            error_response(StatusCode::NOT_FOUND, "No packages found for this guest")
        }
        LedgerError::EntryNotFound => {
            error_response(StatusCode::NOT_FOUND, "Package not found for this guest")
        }
        LedgerError::InvalidArgument(message) => {
            error_response(StatusCode::BAD_REQUEST, &message)
        }
        LedgerError::Conflict => error_response(
            StatusCode::CONFLICT,
            "Package was modified concurrently, retry the request",
        ),
        LedgerError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
    }
}
