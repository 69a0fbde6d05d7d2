//! Water intake: reminder schedules and the daily glass tracker.

pub mod dto;
mod glasses;
pub mod repo;
pub mod schedule;
mod services;

pub use dto::{ReminderSchedule, ReminderSetting, ReminderSlot};
pub use glasses::{WaterGlasses, GLASS_COUNT, GLASS_ML};
pub use schedule::{generate, is_valid_time, parse_time};
pub use services::{load_schedule, save_setting, validate_setting};
