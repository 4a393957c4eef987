use chrono::{Duration, NaiveTime};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

const SLOT_FORMAT: &str = "%H:%M";

/// 予約可能な時間帯 (表示用)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    pub available: bool,
}

/// 営業時間から時間帯を生成する設定
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotSchedule {
    opening: NaiveTime,
    closing: NaiveTime,
    interval: Duration,
}

impl SlotSchedule {
    pub fn new(
        opening: NaiveTime,
        closing: NaiveTime,
        interval_minutes: u32,
    ) -> Result<Self, ScheduleError> {
        if interval_minutes == 0 {
            return Err(ScheduleError::ZeroInterval);
        }
        if opening > closing {
            return Err(ScheduleError::ClosingBeforeOpening);
        }
        Ok(Self {
            opening,
            closing,
            interval: Duration::minutes(interval_minutes as i64),
        })
    }

    pub fn parse(
        opening: &str,
        closing: &str,
        interval_minutes: u32,
    ) -> Result<Self, ScheduleError> {
        Self::new(
            parse_slot(opening)?,
            parse_slot(closing)?,
            interval_minutes,
        )
    }

    /// 開店から閉店まで (閉店時刻を含む) の時間帯
    pub fn time_slots(&self) -> Vec<TimeSlot> {
        let mut slots = Vec::new();
        let mut time = self.opening;
        while time <= self.closing {
            slots.push(TimeSlot {
                time: time.format(SLOT_FORMAT).to_string(),
                available: true,
            });
            let (next, wrapped) = time.overflowing_add_signed(self.interval);
            if wrapped != 0 {
                break;
            }
            time = next;
        }
        slots
    }

    pub fn contains(&self, label: &str) -> bool {
        self.time_slots().iter().any(|slot| slot.time == label)
    }
}

impl Default for SlotSchedule {
    fn default() -> Self {
        Self {
            opening: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            closing: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            interval: Duration::minutes(30),
        }
    }
}

fn parse_slot(label: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(label, SLOT_FORMAT)
        .map_err(|_| ScheduleError::InvalidTime(label.to_owned()))
}

/// 予約受付期間 (ISO 形式の日付文字列で比較する)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingWindow {
    min_date: Option<String>,
    max_date: Option<String>,
}

impl BookingWindow {
    pub fn new(min_date: Option<String>, max_date: Option<String>) -> Self {
        Self { min_date, max_date }
    }

    pub fn contains(&self, date: &str) -> bool {
        let after_min = self.min_date.as_deref().map_or(true, |min| date >= min);
        let before_max = self.max_date.as_deref().map_or(true, |max| date <= max);
        after_min && before_max
    }
}

#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[display(fmt = "Invalid time label: {}", _0)]
    InvalidTime(#[error(not(source))] String),
    #[display(fmt = "Slot interval must be positive")]
    ZeroInterval,
    #[display(fmt = "Closing time is before opening time")]
    ClosingBeforeOpening,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_time_slots() {
        let slots = SlotSchedule::default().time_slots();
        let labels = slots.iter().map(|s| s.time.as_str()).collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec!["18:00", "18:30", "19:00", "19:30", "20:00", "20:30", "21:00", "21:30", "22:00"]
        );
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn test_parse_schedule() {
        let schedule = SlotSchedule::parse("11:30", "13:00", 45).unwrap();
        let labels = schedule
            .time_slots()
            .into_iter()
            .map(|s| s.time)
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["11:30", "12:15", "13:00"]);
        assert!(schedule.contains("12:15"));
        assert!(!schedule.contains("12:00"));
    }

    #[test]
    fn test_schedule_runs_to_midnight_without_wrapping() {
        let schedule = SlotSchedule::parse("23:00", "23:59", 30).unwrap();
        assert_eq!(schedule.time_slots().len(), 2);
    }

    #[test]
    fn test_invalid_schedule() {
        assert_eq!(
            SlotSchedule::parse("6pm", "22:00", 30),
            Err(ScheduleError::InvalidTime("6pm".to_owned()))
        );
        assert_eq!(
            SlotSchedule::parse("22:00", "18:00", 30),
            Err(ScheduleError::ClosingBeforeOpening)
        );
        assert_eq!(
            SlotSchedule::parse("18:00", "22:00", 0),
            Err(ScheduleError::ZeroInterval)
        );
    }

    #[test]
    fn test_booking_window() {
        let window = BookingWindow::new(
            Some("2024-07-24".to_owned()),
            Some("2024-07-31".to_owned()),
        );
        assert!(window.contains("2024-07-24"));
        assert!(window.contains("2024-07-31"));
        assert!(!window.contains("2024-07-23"));
        assert!(!window.contains("2024-08-01"));
        assert!(BookingWindow::default().contains("1999-01-01"));
    }
}
