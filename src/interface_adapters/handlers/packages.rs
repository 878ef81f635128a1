use axum::extract::{Path, State};
use axum::{http::StatusCode, Json};
use std::sync::Arc;

use crate::domain::entities::PackageTemplate;
use crate::domain::errors::CatalogError;
use crate::domain::ports::CatalogStore;
use crate::interface_adapters::auth::AuthenticatedTrainer;
use crate::interface_adapters::handlers::error_response;
use crate::interface_adapters::protocol::{
    CreatePackageRequest, ErrorResponse, MessageResponse, PackageResponse, UpdatePackageRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::manage_catalog::ManageCatalogUseCase;

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn catalog(state: &AppState) -> ManageCatalogUseCase<Arc<dyn CatalogStore>> {
    ManageCatalogUseCase {
        catalog: state.catalog.clone(),
    }
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id))]
pub async fn list_packages(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PackageTemplate>>, HandlerError> {
    let templates = catalog(&state).list().await.map_err(map_catalog_error)?;
    Ok(Json(templates))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id))]
pub async fn create_package(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePackageRequest>,
) -> Result<(StatusCode, Json<PackageResponse>), HandlerError> {
    let template = catalog(&state)
        .create(payload)
        .await
        .map_err(map_catalog_error)?;

    Ok((
        StatusCode::CREATED,
        Json(PackageResponse {
            message: "Package created successfully".to_string(),
            package: template,
        }),
    ))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, package_id = %package_id))]
pub async fn get_package(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
) -> Result<Json<PackageTemplate>, HandlerError> {
    let template = catalog(&state)
        .get(&package_id)
        .await
        .map_err(map_catalog_error)?;
    Ok(Json(template))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, package_id = %package_id))]
pub async fn update_package(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
    Json(payload): Json<UpdatePackageRequest>,
) -> Result<Json<PackageResponse>, HandlerError> {
    let template = catalog(&state)
        .update(&package_id, payload)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(PackageResponse {
        message: "Package updated successfully".to_string(),
        package: template,
    }))
}

#[tracing::instrument(skip_all, fields(user_id = %trainer.user_id, package_id = %package_id))]
pub async fn delete_package(
    trainer: AuthenticatedTrainer,
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
) -> Result<Json<MessageResponse>, HandlerError> {
    catalog(&state)
        .delete(&package_id)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(MessageResponse {
        message: "Package deleted successfully".to_string(),
    }))
}

fn map_catalog_error(err: CatalogError) -> HandlerError {
    match err {
        CatalogError::NotFound => error_response(StatusCode::NOT_FOUND, "Package not found"),
        CatalogError::InvalidArgument(message) => {
            error_response(StatusCode::BAD_REQUEST, &message)
        }
        CatalogError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
    }
}
