use tracing::{info, instrument, warn};

use super::{
    dto::{ReminderSchedule, ReminderSetting},
    repo,
    schedule::is_valid_time,
};
use crate::{
    api::ApiClient,
    error::{ClientError, ClientResult},
};

/// The saved schedule, or the default day when none can be loaded.
#[instrument(skip(api))]
pub async fn load_schedule(api: &ApiClient) -> ClientResult<ReminderSchedule> {
    match repo::fetch(api).await {
        Ok(schedule) => Ok(schedule),
        Err(ClientError::SessionExpired) => Err(ClientError::SessionExpired),
        Err(e) => {
            warn!(error = %e, "reminder schedule unavailable, using defaults");
            Ok(ReminderSchedule::defaults())
        }
    }
}

pub fn validate_setting(schedule: &ReminderSchedule, push_token: Option<&str>) -> ClientResult<ReminderSetting> {
    let mut errors = Vec::new();
    let push_token = push_token.map(str::trim).unwrap_or_default();

    if schedule.reminder_gap <= 0 {
        errors.push("reminder gap must be positive".to_string());
    }
    if schedule.schedule.is_empty() {
        errors.push("schedule has no reminders".to_string());
    }
    if push_token.is_empty() {
        errors.push("push notifications are not enabled".to_string());
    }
    if !is_valid_time(&schedule.wake_up_time) || !is_valid_time(&schedule.sleep_time) {
        errors.push("times must be HH:mm".to_string());
    }
    if schedule.schedule.iter().any(|slot| !is_valid_time(&slot.time)) {
        errors.push("schedule contains an invalid time".to_string());
    }

    if !errors.is_empty() {
        return Err(ClientError::Validation(errors));
    }
    Ok(ReminderSetting {
        wake_up_time: schedule.wake_up_time.clone(),
        sleep_time: schedule.sleep_time.clone(),
        reminder_gap: schedule.reminder_gap,
        expo_push_token: push_token.to_string(),
        schedule: schedule.schedule.clone(),
    })
}

#[instrument(skip(api, schedule, push_token))]
pub async fn save_setting(api: &ApiClient, schedule: &ReminderSchedule, push_token: Option<&str>) -> ClientResult<()> {
    let setting = validate_setting(schedule, push_token)?;
    repo::save(api, &setting).await?;
    info!(slots = setting.schedule.len(), "reminder setting saved");
    Ok(())
}
