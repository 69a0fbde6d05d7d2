//! Water reminder schedule generation.
//!
//! Times are "HH:mm" on a 24-hour clock. The first reminder is five minutes
//! after waking, then one every interval while still before bedtime.

use lazy_static::lazy_static;
use regex::Regex;

use super::dto::{ReminderSchedule, ReminderSlot};
use crate::error::{ClientError, ClientResult};

pub const SERVING: &str = "250ml";
pub const DEFAULT_WAKE_UP: &str = "06:00";
pub const DEFAULT_SLEEP: &str = "23:00";
pub const DEFAULT_GAP_MINUTES: i64 = 90;

const FIRST_REMINDER_DELAY: i64 = 5;

/// Minutes since midnight for a strict "HH:mm" time.
pub fn parse_time(value: &str) -> ClientResult<i64> {
    lazy_static! {
        static ref TIME_RE: Regex = Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").unwrap();
    }
    let caps = TIME_RE
        .captures(value)
        .ok_or_else(|| ClientError::InvalidTime(value.to_string()))?;
    let hours: i64 = caps[1]
        .parse()
        .map_err(|_| ClientError::InvalidTime(value.to_string()))?;
    let minutes: i64 = caps[2]
        .parse()
        .map_err(|_| ClientError::InvalidTime(value.to_string()))?;
    Ok(hours * 60 + minutes)
}

pub fn is_valid_time(value: &str) -> bool {
    parse_time(value).is_ok()
}

fn format_time(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Reminder slots between `wake_up` and `sleep`. Empty when there is no
/// room before bedtime.
pub fn generate(wake_up: &str, sleep: &str, interval_minutes: i64) -> ClientResult<Vec<ReminderSlot>> {
    if interval_minutes <= 0 {
        return Err(ClientError::InvalidInterval(interval_minutes));
    }
    let wake = parse_time(wake_up)?;
    let sleep = parse_time(sleep)?;

    let mut slots = Vec::new();
    let mut current = wake + FIRST_REMINDER_DELAY;
    while current < sleep {
        slots.push(ReminderSlot {
            time: format_time(current),
            amount: SERVING.to_string(),
        });
        match current.checked_add(interval_minutes) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(slots)
}

impl ReminderSchedule {
    pub fn generate(wake_up: &str, sleep: &str, reminder_gap: i64) -> ClientResult<Self> {
        Ok(Self {
            schedule: generate(wake_up, sleep, reminder_gap)?,
            wake_up_time: wake_up.to_string(),
            sleep_time: sleep.to_string(),
            reminder_gap,
        })
    }

    pub fn defaults() -> Self {
        Self {
            wake_up_time: DEFAULT_WAKE_UP.to_string(),
            sleep_time: DEFAULT_SLEEP.to_string(),
            reminder_gap: DEFAULT_GAP_MINUTES,
            schedule: generate(DEFAULT_WAKE_UP, DEFAULT_SLEEP, DEFAULT_GAP_MINUTES)
                .unwrap_or_default(),
        }
    }

    /// Moves the wake-up time and regenerates every slot.
    pub fn set_wake_up(&mut self, time: &str) -> ClientResult<()> {
        *self = Self::generate(time, &self.sleep_time, self.reminder_gap)?;
        Ok(())
    }

    pub fn set_sleep(&mut self, time: &str) -> ClientResult<()> {
        *self = Self::generate(&self.wake_up_time, time, self.reminder_gap)?;
        Ok(())
    }

    pub fn set_gap(&mut self, minutes: i64) -> ClientResult<()> {
        *self = Self::generate(&self.wake_up_time, &self.sleep_time, minutes)?;
        Ok(())
    }

    /// Edits one slot in place; the rest of the schedule is kept.
    pub fn set_slot_time(&mut self, index: usize, time: &str) -> ClientResult<()> {
        parse_time(time)?;
        let slot = self.schedule.get_mut(index).ok_or(ClientError::NotFound)?;
        slot.time = time.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_day_has_twelve_reminders() {
        let slots = generate("06:00", "23:00", 90).unwrap();
        assert_eq!(slots.len(), 12);
        assert_eq!(slots[0].time, "06:05");
        assert_eq!(slots[1].time, "07:35");
        assert_eq!(slots[11].time, "22:35");
        assert!(slots.iter().all(|s| s.amount == "250ml"));
        for pair in slots.windows(2) {
            let gap = parse_time(&pair[1].time).unwrap() - parse_time(&pair[0].time).unwrap();
            assert_eq!(gap, 90);
        }
    }

    #[test]
    fn no_room_before_sleep_is_empty() {
        assert!(generate("08:00", "08:00", 60).unwrap().is_empty());
        assert!(generate("22:00", "07:00", 60).unwrap().is_empty());
        assert!(generate("08:00", "08:05", 60).unwrap().is_empty());
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        assert!(matches!(
            generate("06:00", "23:00", 0),
            Err(ClientError::InvalidInterval(0))
        ));
        assert!(matches!(
            generate("06:00", "23:00", -15),
            Err(ClientError::InvalidInterval(-15))
        ));
    }

    #[test]
    fn huge_interval_yields_only_the_first_slot() {
        let slots = generate("06:00", "23:00", i64::MAX).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].time, "06:05");
        assert_eq!(generate("06:00", "23:00", 24 * 60).unwrap().len(), 1);
    }

    #[test]
    fn malformed_times_are_rejected() {
        for bad in ["6:00", "24:00", "12:60", "12-30", "", "12:30 "] {
            assert!(
                matches!(parse_time(bad), Err(ClientError::InvalidTime(_))),
                "{bad:?} should be invalid"
            );
        }
        assert_eq!(parse_time("23:59").unwrap(), 1439);
    }

    #[test]
    fn generation_is_repeatable() {
        assert_eq!(
            generate("07:10", "21:45", 45).unwrap(),
            generate("07:10", "21:45", 45).unwrap()
        );
    }

    #[test]
    fn changing_settings_regenerates_slots() {
        let mut schedule = ReminderSchedule::defaults();
        schedule.set_gap(120).unwrap();
        assert_eq!(schedule.reminder_gap, 120);
        assert_eq!(schedule.schedule.len(), 9);

        schedule.set_wake_up("08:00").unwrap();
        assert_eq!(schedule.schedule[0].time, "08:05");

        schedule.set_sleep("10:00").unwrap();
        assert_eq!(schedule.schedule.len(), 1);

        assert!(schedule.set_gap(0).is_err());
        assert_eq!(schedule.reminder_gap, 120);
    }

    #[test]
    fn slot_edit_keeps_other_slots() {
        let mut schedule = ReminderSchedule::defaults();
        schedule.set_slot_time(1, "07:50").unwrap();
        assert_eq!(schedule.schedule[1].time, "07:50");
        assert_eq!(schedule.schedule[2].time, "09:05");
        assert!(schedule.set_slot_time(1, "7:50").is_err());
        assert!(schedule.set_slot_time(99, "07:50").is_err());
    }
}
