use crate::interface_adapters::handlers::appointments::{
    create_appointment, delete_appointment, list_appointments, update_appointment,
};
use crate::interface_adapters::handlers::exercise_plans::{
    create_plan, day_plans, delete_plan, get_plan, guest_day_plans, guest_plans, list_plans,
    update_plan,
};
use crate::interface_adapters::handlers::guests::{
    add_guest_appointment, create_guest, deactivate_guest, get_guest, guest_appointments,
    list_guests, move_guest_appointment, remove_guest_appointment, restore_guest, update_guest,
};
use crate::interface_adapters::handlers::health;
use crate::interface_adapters::handlers::ledger::{
    assign_package, guest_packages, update_attendance,
};
use crate::interface_adapters::handlers::packages::{
    create_package, delete_package, get_package, list_packages, update_package,
};
use crate::interface_adapters::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    // Static segments win over `{package_id}`, so assignPackage is not shadowed.
    // `/api/appointments/{id}` is a trainer id for GET and an appointment id otherwise.
    // `/api/exercise-plans/{id}` is a plan id; with a second segment it is a guest id.
    Router::new()
        .route("/", get(health))
        .route("/api/packages", get(list_packages).post(create_package))
        .route("/api/packages/assignPackage", post(assign_package))
        .route(
            "/api/packages/user-packages/{guest_id}",
            get(guest_packages).put(update_attendance),
        )
        .route(
            "/api/packages/{package_id}",
            get(get_package).put(update_package).delete(delete_package),
        )
        .route("/api/appointments", post(create_appointment))
        .route(
            "/api/appointments/{id}",
            get(list_appointments)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route("/api/guests", get(list_guests).post(create_guest))
        .route(
            "/api/guests/{guest_id}",
            get(get_guest).put(update_guest).delete(deactivate_guest),
        )
        .route("/api/guests/{guest_id}/restore", put(restore_guest))
        .route(
            "/api/guests/{guest_id}/appointments",
            get(guest_appointments).post(add_guest_appointment),
        )
        .route(
            "/api/guests/{guest_id}/update-appointment",
            put(move_guest_appointment),
        )
        .route(
            "/api/guests/{guest_id}/remove-appointment",
            put(remove_guest_appointment),
        )
        .route("/api/exercise-plans", get(list_plans).post(create_plan))
        .route("/api/exercise-plans/guest/{guest_id}", get(guest_plans))
        .route("/api/exercise-plans/all/{workout_day}", get(day_plans))
        .route(
            "/api/exercise-plans/{id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .route("/api/exercise-plans/{id}/{workout_day}", get(guest_day_plans))
        .with_state(state)
}
