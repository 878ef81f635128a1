use thiserror::Error;

// Domain-level errors for package ledger workflows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("package template not found")]
    TemplateNotFound,
    #[error("guest has no packages")]
    LedgerNotFound,
    #[error("package not found for guest")]
    EntryNotFound,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("ledger was modified concurrently")]
    Conflict,
    #[error("storage error")]
    StorageFailure,
}

// Errors for package catalog administration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("package template not found")]
    NotFound,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("storage error")]
    StorageFailure,
}

// Errors for appointment workflows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppointmentError {
    #[error("appointment not found")]
    NotFound,
    #[error("appointment belongs to another trainer")]
    Forbidden,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("storage error")]
    StorageFailure,
}

// Failures reported by the identity provider port.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid token")]
    InvalidToken,
    #[error("identity provider unavailable")]
    Unavailable,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuestError {
    #[error("guest not found")]
    NotFound,
    #[error("guest belongs to another trainer")]
    Forbidden,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("storage error")]
    StorageFailure,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("exercise plan not found")]
    NotFound,
    #[error("guest not found")]
    GuestNotFound,
    #[error("exercise plan or guest belongs to another trainer")]
    Forbidden,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("storage error")]
    StorageFailure,
}
