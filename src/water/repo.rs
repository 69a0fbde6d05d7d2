use tracing::instrument;

use super::dto::{ReminderSchedule, ReminderSetting};
use crate::{api::ApiClient, error::ClientResult};

#[instrument(skip(api))]
pub async fn fetch(api: &ApiClient) -> ClientResult<ReminderSchedule> {
    api.get("/water-reminders/reminder-schedule").await
}

#[instrument(skip(api, setting), fields(slots = setting.schedule.len()))]
pub async fn save(api: &ApiClient, setting: &ReminderSetting) -> ClientResult<()> {
    api.post_unit("/water-reminders/reminder-setting", setting).await
}
