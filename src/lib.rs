use config::{Config, ConfigError};
use serde::Deserialize;

use crate::domain::{BookingWindow, ScheduleError, SlotSchedule};

pub mod domain;

#[derive(Clone, Debug, Deserialize)]
pub struct DinerConfig {
    pub logger: Logger,
    pub schedule: Schedule,
    #[serde(default)]
    pub booking: Booking,
    pub form: Form,
}

impl DinerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("logger.level", "INFO")?
            .set_default("schedule.opening", "18:00")?
            .set_default("schedule.closing", "22:00")?
            .set_default("schedule.interval_minutes", 30)?
            .set_default("form.default_max_party_size", 12)?
            .add_source(config::File::with_name("diner.toml").required(false))
            .add_source(
                config::Environment::with_prefix("DINER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<DinerConfig>()
    }

    /// 営業時間設定から時間帯カタログを組み立てる
    pub fn slot_schedule(&self) -> Result<SlotSchedule, ScheduleError> {
        SlotSchedule::parse(
            &self.schedule.opening,
            &self.schedule.closing,
            self.schedule.interval_minutes,
        )
    }

    /// 予約受付期間 (未設定なら制限なし)
    pub fn booking_window(&self) -> Option<BookingWindow> {
        match (&self.booking.min_date, &self.booking.max_date) {
            (None, None) => None,
            (min, max) => Some(BookingWindow::new(min.clone(), max.clone())),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub level: Level,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Schedule {
    pub opening: String,
    pub closing: String,
    pub interval_minutes: u32,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Booking {
    pub min_date: Option<String>,
    pub max_date: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Form {
    pub default_max_party_size: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DinerConfig {
        DinerConfig {
            logger: Logger { level: Level::INFO },
            schedule: Schedule {
                opening: "18:00".to_owned(),
                closing: "22:00".to_owned(),
                interval_minutes: 30,
            },
            booking: Booking::default(),
            form: Form {
                default_max_party_size: 12,
            },
        }
    }

    #[test]
    fn test_slot_schedule_from_config() {
        let schedule = config().slot_schedule().unwrap();
        assert_eq!(schedule, SlotSchedule::default());
    }

    #[test]
    fn test_booking_window_from_config() {
        let mut config = config();
        assert_eq!(config.booking_window(), None);
        config.booking.max_date = Some("2024-07-31".to_owned());
        let window = config.booking_window().unwrap();
        assert!(window.contains("2024-07-24"));
        assert!(!window.contains("2024-08-01"));
    }

    #[test]
    fn test_level_conversion() {
        assert_eq!(tracing::Level::from(&Level::WARN), tracing::Level::WARN);
    }
}
