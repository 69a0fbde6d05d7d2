use serde::{Deserialize, Serialize};

/// A reminder at `time` ("HH:mm") to drink `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSlot {
    pub time: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSchedule {
    pub wake_up_time: String,
    pub sleep_time: String,
    /// Minutes between reminders.
    pub reminder_gap: i64,
    #[serde(default)]
    pub schedule: Vec<ReminderSlot>,
}

/// Body of `POST /water-reminders/reminder-setting`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSetting {
    pub wake_up_time: String,
    pub sleep_time: String,
    pub reminder_gap: i64,
    pub expo_push_token: String,
    pub schedule: Vec<ReminderSlot>,
}
