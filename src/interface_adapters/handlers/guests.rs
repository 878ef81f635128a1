use axum::extract::{Path, State};
use axum::{http::StatusCode, Json};
use std::sync::Arc;

use crate::domain::entities::Guest;
use crate::domain::errors::GuestError;
use crate::domain::ports::GuestStore;
use crate::interface_adapters::auth::AuthenticatedTrainer;
use crate::interface_adapters::handlers::error_response;
use crate::interface_adapters::protocol::{
    CreateGuestRequest, CreateGuestResponse, ErrorResponse, GuestAppointmentRequest,
    GuestAppointmentsResponse, MessageResponse, MoveGuestAppointmentRequest, UpdateGuestRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::manage_guests::ManageGuestsUseCase;

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn guests(state: &AppState) -> ManageGuestsUseCase<Arc<dyn GuestStore>> {
    ManageGuestsUseCase {
        guests: state.guests.clone(),
    }
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id))]
pub async fn create_guest(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateGuestRequest>,
) -> Result<(StatusCode, Json<CreateGuestResponse>), HandlerError> {
    let guest = guests(&state)
        .create(&trainer.user_id, payload)
        .await
        .map_err(map_guest_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGuestResponse {
            id: guest.id,
            message: "Guest created successfully".to_string(),
        }),
    ))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id))]
pub async fn list_guests(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Guest>>, HandlerError> {
    let listed = guests(&state)
        .list(&trainer.user_id)
        .await
        .map_err(map_guest_error)?;
    Ok(Json(listed))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn get_guest(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
) -> Result<Json<Guest>, HandlerError> {
    let guest = guests(&state)
        .get(&trainer.user_id, &guest_id)
        .await
        .map_err(map_guest_error)?;
    Ok(Json(guest))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn update_guest(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
    Json(payload): Json<UpdateGuestRequest>,
) -> Result<Json<MessageResponse>, HandlerError> {
    guests(&state)
        .update(&trainer.user_id, &guest_id, payload)
        .await
        .map_err(map_guest_error)?;
    Ok(message("Guest updated successfully"))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn deactivate_guest(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
) -> Result<Json<MessageResponse>, HandlerError> {
    guests(&state)
        .deactivate(&trainer.user_id, &guest_id)
        .await
        .map_err(map_guest_error)?;
    Ok(message("Guest deactivated successfully"))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn restore_guest(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
) -> Result<Json<MessageResponse>, HandlerError> {
    guests(&state)
        .restore(&trainer.user_id, &guest_id)
        .await
        .map_err(map_guest_error)?;
    Ok(message("Guest restored successfully"))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn guest_appointments(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
) -> Result<Json<GuestAppointmentsResponse>, HandlerError> {
    let listed = guests(&state)
        .appointments(&trainer.user_id, &guest_id)
        .await
        .map_err(map_guest_error)?;
    Ok(Json(listed))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn add_guest_appointment(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
    Json(payload): Json<GuestAppointmentRequest>,
) -> Result<Json<MessageResponse>, HandlerError> {
    guests(&state)
        .add_appointment(&trainer.user_id, &guest_id, payload.date)
        .await
        .map_err(map_guest_error)?;
    Ok(message("Appointment added to guest successfully"))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn move_guest_appointment(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
    Json(payload): Json<MoveGuestAppointmentRequest>,
) -> Result<Json<MessageResponse>, HandlerError> {
    guests(&state)
        .move_appointment(&trainer.user_id, &guest_id, payload)
        .await
        .map_err(map_guest_error)?;
    Ok(message("Guest appointment updated successfully"))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn remove_guest_appointment(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
    Json(payload): Json<GuestAppointmentRequest>,
) -> Result<Json<MessageResponse>, HandlerError> {
    guests(&state)
        .remove_appointment(&trainer.user_id, &guest_id, payload.date)
        .await
        .map_err(map_guest_error)?;
    Ok(message("Guest appointment removed successfully"))
}

fn map_guest_error(err: GuestError) -> HandlerError {
    match err {
        GuestError::NotFound => error_response(StatusCode::NOT_FOUND, "Guest not found"),
        GuestError::Forbidden => error_response(StatusCode::FORBIDDEN, "Unauthorized"),
        GuestError::InvalidArgument(message) => error_response(StatusCode::BAD_REQUEST, &message),
        GuestError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
    }
}
