use axum::extract::{Path, State};
use axum::{http::StatusCode, Json};
use std::sync::Arc;

use crate::domain::entities::Appointment;
use crate::domain::errors::AppointmentError;
use crate::domain::ports::{AppointmentStore, GuestStore, LedgerStore};
use crate::interface_adapters::auth::AuthenticatedTrainer;
use crate::interface_adapters::handlers::error_response;
use crate::interface_adapters::protocol::{
    CreateAppointmentRequest, CreateAppointmentResponse, ErrorResponse, MessageResponse,
    UpdateAppointmentRequest, UpdateAppointmentResponse,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::appointments::AppointmentsUseCase;

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn appointments(
    state: &AppState,
) -> AppointmentsUseCase<Arc<dyn AppointmentStore>, Arc<dyn LedgerStore>, Arc<dyn GuestStore>> {
    AppointmentsUseCase {
        appointments: state.appointments.clone(),
        ledgers: state.ledgers.clone(),
        guests: state.guests.clone(),
    }
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id))]
pub async fn create_appointment(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<CreateAppointmentResponse>), HandlerError> {
    let appointment = appointments(&state)
        .create(&trainer.user_id, payload)
        .await
        .map_err(map_appointment_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAppointmentResponse {
            id: appointment.id,
            message: "Appointment created successfully".to_string(),
            guest_id: appointment.guest_id,
            package_id: appointment.package_id,
        }),
    ))
}

// The path segment names the trainer whose appointments are listed.
#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id))]
pub async fn list_appointments(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Appointment>>, HandlerError> {
    let listed = appointments(&state)
        .list(&trainer.user_id, &user_id)
        .await
        .map_err(map_appointment_error)?;
    Ok(Json(listed))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, appointment_id = %appointment_id))]
pub async fn update_appointment(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<Json<UpdateAppointmentResponse>, HandlerError> {
    let updated = appointments(&state)
        .update(&trainer.user_id, &appointment_id, payload)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(UpdateAppointmentResponse {
        message: "Appointment updated successfully".to_string(),
        attended: updated.attended,
    }))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, appointment_id = %appointment_id))]
pub async fn delete_appointment(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<MessageResponse>, HandlerError> {
    appointments(&state)
        .delete(&trainer.user_id, &appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(MessageResponse {
        message: "Appointment deleted successfully".to_string(),
    }))
}

fn map_appointment_error(err: AppointmentError) -> HandlerError {
    match err {
        AppointmentError::NotFound => {
            error_response(StatusCode::NOT_FOUND, "Appointment not found")
        }
        AppointmentError::Forbidden => error_response(StatusCode::FORBIDDEN, "Unauthorized"),
        AppointmentError::InvalidArgument(message) => {
            error_response(StatusCode::BAD_REQUEST, &message)
        }
        AppointmentError::StorageFailure => {
            error_response(StatusCode::BAD_GATEWAY, "storage error")
        }
    }
}
