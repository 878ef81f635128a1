use axum::extract::{Path, State};
use axum::{http::StatusCode, Json};
use std::sync::Arc;

use crate::domain::entities::ExercisePlan;
use crate::domain::errors::PlanError;
use crate::domain::ports::{ExercisePlanStore, GuestStore};
use crate::interface_adapters::auth::AuthenticatedTrainer;
use crate::interface_adapters::handlers::error_response;
use crate::interface_adapters::protocol::{
    CreateExercisePlanRequest, ErrorResponse, MessageResponse, UpdateExercisePlanRequest,
};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::exercise_plans::ExercisePlansUseCase;

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn plans(
    state: &AppState,
) -> ExercisePlansUseCase<SystemClock, Arc<dyn ExercisePlanStore>, Arc<dyn GuestStore>> {
    ExercisePlansUseCase {
        clock: SystemClock,
        plans: state.plans.clone(),
        guests: state.guests.clone(),
    }
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id))]
pub async fn create_plan(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateExercisePlanRequest>,
) -> Result<(StatusCode, Json<ExercisePlan>), HandlerError> {
    let plan = plans(&state)
        .create(&trainer.user_id, payload)
        .await
        .map_err(map_plan_error)?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id))]
pub async fn list_plans(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ExercisePlan>>, HandlerError> {
    let listed = plans(&state)
        .list(&trainer.user_id)
        .await
        .map_err(map_plan_error)?;
    Ok(Json(listed))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id))]
pub async fn guest_plans(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
) -> Result<Json<Vec<ExercisePlan>>, HandlerError> {
    let listed = plans(&state)
        .list_for_guest(&trainer.user_id, &guest_id)
        .await
        .map_err(map_plan_error)?;
    Ok(Json(listed))
}

// Scoped to the caller like every other plan listing.
#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, workout_day = %workout_day))]
pub async fn day_plans(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(workout_day): Path<String>,
) -> Result<Json<Vec<ExercisePlan>>, HandlerError> {
    let listed = plans(&state)
        .list_for_day(&trainer.user_id, &workout_day)
        .await
        .map_err(map_plan_error)?;
    Ok(Json(listed))
}

// The first segment is a guest id here and a plan id on the single-segment route.
#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, guest_id = %guest_id, workout_day = %workout_day))]
pub async fn guest_day_plans(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path((guest_id, workout_day)): Path<(String, String)>,
) -> Result<Json<Vec<ExercisePlan>>, HandlerError> {
    let listed = plans(&state)
        .list_for_guest_day(&trainer.user_id, &guest_id, &workout_day)
        .await
        .map_err(map_plan_error)?;
    Ok(Json(listed))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, plan_id = %plan_id))]
pub async fn get_plan(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<String>,
) -> Result<Json<ExercisePlan>, HandlerError> {
    let plan = plans(&state)
        .get(&trainer.user_id, &plan_id)
        .await
        .map_err(map_plan_error)?;
    Ok(Json(plan))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, plan_id = %plan_id))]
pub async fn update_plan(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<String>,
    Json(payload): Json<UpdateExercisePlanRequest>,
) -> Result<Json<MessageResponse>, HandlerError> {
    plans(&state)
        .update(&trainer.user_id, &plan_id, payload)
        .await
        .map_err(map_plan_error)?;

    Ok(Json(MessageResponse {
        message: "Exercise plan updated successfully".to_string(),
    }))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, plan_id = %plan_id))]
pub async fn delete_plan(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<String>,
) -> Result<Json<MessageResponse>, HandlerError> {
    plans(&state)
        .delete(&trainer.user_id, &plan_id)
        .await
        .map_err(map_plan_error)?;

    Ok(Json(MessageResponse {
        message: "Exercise plan deleted successfully".to_string(),
    }))
}

fn map_plan_error(err: PlanError) -> HandlerError {
    match err {
        PlanError::NotFound => error_response(StatusCode::NOT_FOUND, "Exercise plan not found"),
        PlanError::GuestNotFound => error_response(StatusCode::NOT_FOUND, "Guest not found"),
        PlanError::Forbidden => error_response(StatusCode::FORBIDDEN, "Unauthorized"),
        PlanError::InvalidArgument(message) => error_response(StatusCode::BAD_REQUEST, &message),
        PlanError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
    }
}
