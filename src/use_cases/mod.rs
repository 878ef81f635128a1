pub mod appointments;
pub mod apply_attendance;
pub mod assign_package;
pub mod classify_packages;
pub mod exercise_plans;
pub mod manage_catalog;
pub mod manage_guests;
pub mod select_package;

#[cfg(test)]
pub(crate) mod test_support;
