use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::entities::{
    Appointment, Exercise, ExercisePlan, Guest, GuestLedger, LedgerEntry, PackageTemplate,
};
use crate::domain::ports::{
    AppointmentStore, CatalogStore, ExercisePlanStore, GuestStore, LedgerStore,
};

// PostgreSQL-backed package catalog.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pub db: PgPool,
}

// PostgreSQL-backed guest ledgers. Entries live in one JSONB array per guest,
// guarded by a version column for conditional writes.
#[derive(Clone)]
pub struct PostgresLedgerStore {
    pub db: PgPool,
}

// PostgreSQL-backed appointment records.
#[derive(Clone)]
pub struct PostgresAppointmentStore {
    pub db: PgPool,
}

// PostgreSQL-backed guests. Booked dates are a TEXT[] column edited in place.
#[derive(Clone)]
pub struct PostgresGuestStore {
    pub db: PgPool,
}

// PostgreSQL-backed exercise plans with exercises in a JSONB column.
#[derive(Clone)]
pub struct PostgresExercisePlanStore {
    pub db: PgPool,
}

// JSONB columns are written as bound text cast with `::jsonb` and read back
// through `::text`.
fn encode_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn decode_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

fn column_to_u32(row: &PgRow, column: &str) -> Result<Option<u32>, String> {
    let value: Option<i32> = row.try_get(column).map_err(|e| e.to_string())?;
    value
        .map(|v| u32::try_from(v).map_err(|_| format!("negative {column}: {v}")))
        .transpose()
}

fn u32_to_column(value: Option<u32>) -> Result<Option<i32>, String> {
    value
        .map(|v| i32::try_from(v).map_err(|_| format!("value out of range: {v}")))
        .transpose()
}

fn template_from_row(row: &PgRow) -> Result<PackageTemplate, String> {
    Ok(PackageTemplate {
        id: row.try_get("id").map_err(|e| e.to_string())?,
        name: row.try_get("name").map_err(|e| e.to_string())?,
        session_count: column_to_u32(row, "session_count")?,
        duration_days: column_to_u32(row, "duration_days")?,
        description: row.try_get("description").map_err(|e| e.to_string())?,
    })
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn list(&self) -> Result<Vec<PackageTemplate>, String> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, session_count, duration_days, description
            FROM package_templates
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        rows.iter().map(template_from_row).collect()
    }

    async fn get(&self, template_id: &str) -> Result<Option<PackageTemplate>, String> {
        let row = sqlx::query(
            r#"
            SELECT id, name, session_count, duration_days, description
            FROM package_templates
            WHERE id = $1
            "#,
        )
        .bind(template_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        row.as_ref().map(template_from_row).transpose()
    }

    async fn insert(&self, template: PackageTemplate) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO package_templates (id, name, session_count, duration_days, description)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&template.id)
        .bind(&template.name)
        .bind(u32_to_column(template.session_count)?)
        .bind(u32_to_column(template.duration_days)?)
        .bind(&template.description)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(())
    }

    async fn update(&self, template: PackageTemplate) -> Result<bool, String> {
        let result = sqlx::query(
            r#"
            UPDATE package_templates
            SET name = $2, session_count = $3, duration_days = $4, description = $5
            WHERE id = $1
            "#,
        )
        .bind(&template.id)
        .bind(&template.name)
        .bind(u32_to_column(template.session_count)?)
        .bind(u32_to_column(template.duration_days)?)
        .bind(&template.description)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, template_id: &str) -> Result<bool, String> {
        let result = sqlx::query("DELETE FROM package_templates WHERE id = $1")
            .bind(template_id)
            .execute(&self.db)
            .await
            .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn get(&self, guest_id: &str) -> Result<Option<GuestLedger>, String> {
        let row = sqlx::query(
            "SELECT guest_id, version, entries::text AS entries FROM guest_ledgers WHERE guest_id = $1",
        )
        .bind(guest_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        let Some(row) = row else {
            return Ok(None);
        };
        let entries_json: String = row.try_get("entries").map_err(|e| e.to_string())?;
        let entries: Vec<LedgerEntry> = decode_json(&entries_json)?;

        Ok(Some(GuestLedger {
            guest_id: row.try_get("guest_id").map_err(|e| e.to_string())?,
            version: row.try_get("version").map_err(|e| e.to_string())?,
            entries,
        }))
    }

    async fn append(&self, guest_id: &str, entry: LedgerEntry) -> Result<(), String> {
        let entries_json = encode_json(&[entry])?;

        // Single upsert so concurrent assignments never drop each other's entry.
        sqlx::query(
            r#"
            INSERT INTO guest_ledgers (guest_id, version, entries)
            VALUES ($1, 1, $2::jsonb)
            ON CONFLICT (guest_id) DO UPDATE SET
                entries = guest_ledgers.entries || EXCLUDED.entries,
                version = guest_ledgers.version + 1
            "#,
        )
        .bind(guest_id)
        .bind(entries_json)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(())
    }

    async fn replace(
        &self,
        guest_id: &str,
        expected_version: i64,
        entries: Vec<LedgerEntry>,
    ) -> Result<bool, String> {
        let entries_json = encode_json(&entries)?;

        let result = sqlx::query(
            r#"
            UPDATE guest_ledgers
            SET entries = $3::jsonb, version = version + 1
            WHERE guest_id = $1 AND version = $2
            "#,
        )
        .bind(guest_id)
        .bind(expected_version)
        .bind(entries_json)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }
}

fn appointment_from_row(row: &PgRow) -> Result<Appointment, String> {
    Ok(Appointment {
        id: row.try_get("id").map_err(|e| e.to_string())?,
        user_id: row.try_get("user_id").map_err(|e| e.to_string())?,
        client_name: row.try_get("client_name").map_err(|e| e.to_string())?,
        date: row.try_get("date").map_err(|e| e.to_string())?,
        notes: row.try_get("notes").map_err(|e| e.to_string())?,
        guest_id: row.try_get("guest_id").map_err(|e| e.to_string())?,
        attended: row.try_get("attended").map_err(|e| e.to_string())?,
        package_id: row.try_get("package_id").map_err(|e| e.to_string())?,
    })
}

#[async_trait]
impl AppointmentStore for PostgresAppointmentStore {
    async fn insert(&self, appointment: Appointment) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO appointments
                (id, user_id, client_name, date, notes, guest_id, attended, package_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&appointment.id)
        .bind(&appointment.user_id)
        .bind(&appointment.client_name)
        .bind(&appointment.date)
        .bind(&appointment.notes)
        .bind(&appointment.guest_id)
        .bind(appointment.attended)
        .bind(&appointment.package_id)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(())
    }

    async fn get(&self, appointment_id: &str) -> Result<Option<Appointment>, String> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, client_name, date, notes, guest_id, attended, package_id
            FROM appointments
            WHERE id = $1
            "#,
        )
        .bind(appointment_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        row.as_ref().map(appointment_from_row).transpose()
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Appointment>, String> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, client_name, date, notes, guest_id, attended, package_id
            FROM appointments
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        rows.iter().map(appointment_from_row).collect()
    }

    async fn update(&self, appointment: Appointment) -> Result<bool, String> {
        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET client_name = $2, date = $3, notes = $4, guest_id = $5,
                attended = $6, package_id = $7
            WHERE id = $1
            "#,
        )
        .bind(&appointment.id)
        .bind(&appointment.client_name)
        .bind(&appointment.date)
        .bind(&appointment.notes)
        .bind(&appointment.guest_id)
        .bind(appointment.attended)
        .bind(&appointment.package_id)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, appointment_id: &str) -> Result<bool, String> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(appointment_id)
            .execute(&self.db)
            .await
            .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }
}

fn guest_from_row(row: &PgRow) -> Result<Guest, String> {
    Ok(Guest {
        id: row.try_get("id").map_err(|e| e.to_string())?,
        user_id: row.try_get("user_id").map_err(|e| e.to_string())?,
        name: row.try_get("name").map_err(|e| e.to_string())?,
        email: row.try_get("email").map_err(|e| e.to_string())?,
        phone: row.try_get("phone").map_err(|e| e.to_string())?,
        notes: row.try_get("notes").map_err(|e| e.to_string())?,
        is_active: row.try_get("is_active").map_err(|e| e.to_string())?,
        appointments: row.try_get("appointments").map_err(|e| e.to_string())?,
    })
}

#[async_trait]
impl GuestStore for PostgresGuestStore {
    async fn insert(&self, guest: Guest) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO guests (id, user_id, name, email, phone, notes, is_active, appointments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&guest.id)
        .bind(&guest.user_id)
        .bind(&guest.name)
        .bind(&guest.email)
        .bind(&guest.phone)
        .bind(&guest.notes)
        .bind(guest.is_active)
        .bind(&guest.appointments)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(())
    }

    async fn get(&self, guest_id: &str) -> Result<Option<Guest>, String> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, email, phone, notes, is_active, appointments
            FROM guests
            WHERE id = $1
            "#,
        )
        .bind(guest_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        row.as_ref().map(guest_from_row).transpose()
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Guest>, String> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, email, phone, notes, is_active, appointments
            FROM guests
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        rows.iter().map(guest_from_row).collect()
    }

    async fn update(&self, guest: Guest) -> Result<bool, String> {
        let result = sqlx::query(
            r#"
            UPDATE guests
            SET name = $2, email = $3, phone = $4, notes = $5, is_active = $6
            WHERE id = $1
            "#,
        )
        .bind(&guest.id)
        .bind(&guest.name)
        .bind(&guest.email)
        .bind(&guest.phone)
        .bind(&guest.notes)
        .bind(guest.is_active)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }

    async fn add_appointment_date(&self, guest_id: &str, date: &str) -> Result<bool, String> {
        let result = sqlx::query(
            r#"
            UPDATE guests
            SET appointments = CASE
                WHEN $2 = ANY(appointments) THEN appointments
                ELSE array_append(appointments, $2)
            END
            WHERE id = $1
            "#,
        )
        .bind(guest_id)
        .bind(date)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }

    async fn replace_appointment_date(
        &self,
        guest_id: &str,
        old_date: &str,
        new_date: &str,
    ) -> Result<bool, String> {
        let result = sqlx::query(
            r#"
            UPDATE guests
            SET appointments = array_append(array_remove(appointments, $2), $3)
            WHERE id = $1
            "#,
        )
        .bind(guest_id)
        .bind(old_date)
        .bind(new_date)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_appointment_date(&self, guest_id: &str, date: &str) -> Result<bool, String> {
        let result = sqlx::query(
            "UPDATE guests SET appointments = array_remove(appointments, $2) WHERE id = $1",
        )
        .bind(guest_id)
        .bind(date)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }
}

fn plan_from_row(row: &PgRow) -> Result<ExercisePlan, String> {
    let exercises_json: String = row.try_get("exercises").map_err(|e| e.to_string())?;
    let exercises: Vec<Exercise> = decode_json(&exercises_json)?;
    let created_at: i64 = row.try_get("created_at").map_err(|e| e.to_string())?;

    Ok(ExercisePlan {
        id: row.try_get("id").map_err(|e| e.to_string())?,
        user_id: row.try_get("user_id").map_err(|e| e.to_string())?,
        guest_id: row.try_get("guest_id").map_err(|e| e.to_string())?,
        guest_name: row.try_get("guest_name").map_err(|e| e.to_string())?,
        workout_day: row.try_get("workout_day").map_err(|e| e.to_string())?,
        exercises,
        created_at: u64::try_from(created_at)
            .map_err(|_| format!("negative created_at: {created_at}"))?,
    })
}

fn epoch_to_column(value: u64) -> Result<i64, String> {
    i64::try_from(value).map_err(|_| format!("value out of range: {value}"))
}

#[async_trait]
impl ExercisePlanStore for PostgresExercisePlanStore {
    async fn insert(&self, plan: ExercisePlan) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO exercise_plans
                (id, user_id, guest_id, guest_name, workout_day, exercises, created_at)
            VALUES ($1, $2, $3, $4, $5, $6::jsonb, $7)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.user_id)
        .bind(&plan.guest_id)
        .bind(&plan.guest_name)
        .bind(&plan.workout_day)
        .bind(encode_json(&plan.exercises)?)
        .bind(epoch_to_column(plan.created_at)?)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(())
    }

    async fn get(&self, plan_id: &str) -> Result<Option<ExercisePlan>, String> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, guest_id, guest_name, workout_day,
                   exercises::text AS exercises, created_at
            FROM exercise_plans
            WHERE id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        row.as_ref().map(plan_from_row).transpose()
    }

    async fn list(
        &self,
        user_id: &str,
        guest_id: Option<&str>,
        workout_day: Option<&str>,
    ) -> Result<Vec<ExercisePlan>, String> {
        // NULL filters match every row.
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, guest_id, guest_name, workout_day,
                   exercises::text AS exercises, created_at
            FROM exercise_plans
            WHERE user_id = $1
              AND ($2::text IS NULL OR guest_id = $2)
              AND ($3::text IS NULL OR workout_day = $3)
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .bind(guest_id)
        .bind(workout_day)
        .fetch_all(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        rows.iter().map(plan_from_row).collect()
    }

    async fn update(&self, plan: ExercisePlan) -> Result<bool, String> {
        let result = sqlx::query(
            r#"
            UPDATE exercise_plans
            SET guest_id = $2, guest_name = $3, workout_day = $4, exercises = $5::jsonb
            WHERE id = $1
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.guest_id)
        .bind(&plan.guest_name)
        .bind(&plan.workout_day)
        .bind(encode_json(&plan.exercises)?)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, plan_id: &str) -> Result<bool, String> {
        let result = sqlx::query("DELETE FROM exercise_plans WHERE id = $1")
            .bind(plan_id)
            .execute(&self.db)
            .await
            .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() == 1)
    }
}
