use uuid::Uuid;

use crate::domain::entities::{Exercise, ExercisePlan, Guest};
use crate::domain::errors::PlanError;
use crate::domain::ports::{Clock, ExercisePlanStore, GuestStore};
use crate::interface_adapters::protocol::{
    CreateExercisePlanRequest, ExerciseInput, UpdateExercisePlanRequest,
};

// Per-guest workout plans, visible only to the trainer who wrote them.
pub struct ExercisePlansUseCase<C, P, G> {
    pub clock: C,
    pub plans: P,
    pub guests: G,
}

impl<C, P, G> ExercisePlansUseCase<C, P, G>
where
    C: Clock,
    P: ExercisePlanStore,
    G: GuestStore,
{
    pub async fn create(
        &self,
        caller_id: &str,
        payload: CreateExercisePlanRequest,
    ) -> Result<ExercisePlan, PlanError> {
        let guest_id = required(payload.guest_id, "guest_id")?;
        let workout_day = required(payload.workout_day, "workout_day")?;
        let exercises = exercises(payload.exercises)?;
        let guest = self.owned_guest(caller_id, &guest_id).await?;

        let plan = ExercisePlan {
            id: Uuid::new_v4().to_string(),
            user_id: caller_id.to_string(),
            guest_id: guest.id,
            guest_name: guest.name,
            workout_day,
            exercises,
            created_at: self.clock.now_epoch_seconds(),
        };

        self.plans
            .insert(plan.clone())
            .await
            .map_err(storage_failure("insert"))?;
        tracing::info!(plan_id = %plan.id, guest_id = %plan.guest_id, "exercise plan created");

        Ok(plan)
    }

    pub async fn list(&self, caller_id: &str) -> Result<Vec<ExercisePlan>, PlanError> {
        self.plans
            .list(caller_id, None, None)
            .await
            .map_err(storage_failure("list"))
    }

    pub async fn list_for_guest(
        &self,
        caller_id: &str,
        guest_id: &str,
    ) -> Result<Vec<ExercisePlan>, PlanError> {
        self.owned_guest(caller_id, guest_id).await?;
        self.plans
            .list(caller_id, Some(guest_id), None)
            .await
            .map_err(storage_failure("list"))
    }

    pub async fn list_for_guest_day(
        &self,
        caller_id: &str,
        guest_id: &str,
        workout_day: &str,
    ) -> Result<Vec<ExercisePlan>, PlanError> {
        self.owned_guest(caller_id, guest_id).await?;
        self.plans
            .list(caller_id, Some(guest_id), Some(workout_day))
            .await
            .map_err(storage_failure("list"))
    }

    // Every plan of the caller for one training day, across guests.
    pub async fn list_for_day(
        &self,
        caller_id: &str,
        workout_day: &str,
    ) -> Result<Vec<ExercisePlan>, PlanError> {
        self.plans
            .list(caller_id, None, Some(workout_day))
            .await
            .map_err(storage_failure("list"))
    }

    pub async fn get(&self, caller_id: &str, plan_id: &str) -> Result<ExercisePlan, PlanError> {
        self.owned(caller_id, plan_id).await
    }

    pub async fn update(
        &self,
        caller_id: &str,
        plan_id: &str,
        payload: UpdateExercisePlanRequest,
    ) -> Result<ExercisePlan, PlanError> {
        let workout_day = required(payload.workout_day, "workout_day")?;
        let exercises = exercises(payload.exercises)?;
        let stored = self.owned(caller_id, plan_id).await?;

        let (guest_id, guest_name) = match payload.guest_id.filter(|id| !id.trim().is_empty()) {
            Some(guest_id) => {
                let guest = self.owned_guest(caller_id, &guest_id).await?;
                (guest.id, guest.name)
            }
            None => (stored.guest_id, stored.guest_name),
        };

        let updated = ExercisePlan {
            guest_id,
            guest_name,
            workout_day,
            exercises,
            ..stored
        };

        let found = self
            .plans
            .update(updated.clone())
            .await
            .map_err(storage_failure("update"))?;
        if !found {
            return Err(PlanError::NotFound);
        }
        tracing::info!(plan_id, "exercise plan updated");

        Ok(updated)
    }

    pub async fn delete(&self, caller_id: &str, plan_id: &str) -> Result<(), PlanError> {
        self.owned(caller_id, plan_id).await?;

        let removed = self
            .plans
            .remove(plan_id)
            .await
            .map_err(storage_failure("remove"))?;
        if !removed {
            return Err(PlanError::NotFound);
        }
        tracing::info!(plan_id, "exercise plan deleted");

        Ok(())
    }

    async fn owned(&self, caller_id: &str, plan_id: &str) -> Result<ExercisePlan, PlanError> {
        let plan = self
            .plans
            .get(plan_id)
            .await
            .map_err(storage_failure("get"))?
            .ok_or(PlanError::NotFound)?;

        if plan.user_id != caller_id {
            return Err(PlanError::Forbidden);
        }

        Ok(plan)
    }

    async fn owned_guest(&self, caller_id: &str, guest_id: &str) -> Result<Guest, PlanError> {
        let guest = self
            .guests
            .get(guest_id)
            .await
            .map_err(storage_failure("get_guest"))?
            .ok_or(PlanError::GuestNotFound)?;

        if guest.user_id != caller_id {
            return Err(PlanError::Forbidden);
        }

        Ok(guest)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, PlanError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| PlanError::InvalidArgument(format!("{field} is required")))
}

fn exercises(inputs: Option<Vec<ExerciseInput>>) -> Result<Vec<Exercise>, PlanError> {
    let inputs = inputs.filter(|inputs| !inputs.is_empty()).ok_or_else(|| {
        PlanError::InvalidArgument("at least one exercise is required".to_string())
    })?;

    inputs.into_iter().map(exercise).collect()
}

fn exercise(input: ExerciseInput) -> Result<Exercise, PlanError> {
    Ok(Exercise {
        exercise_name: required(input.exercise_name, "exercise_name")?,
        sets: count(input.sets, "sets")?,
        reps: count(input.reps, "reps")?,
        weight: input.weight,
        notes: input.notes.unwrap_or_default(),
    })
}

fn count(value: Option<i64>, field: &str) -> Result<Option<u32>, PlanError> {
    value
        .map(|value| {
            u32::try_from(value).map_err(|_| {
                PlanError::InvalidArgument(format!("{field} must be a non-negative integer"))
            })
        })
        .transpose()
}

fn storage_failure(operation: &'static str) -> impl Fn(String) -> PlanError {
    move |err| {
        tracing::error!(error = %err, operation, "exercise plan store failed");
        PlanError::StorageFailure
    }
}
