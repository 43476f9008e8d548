//! Daily routine block generation.
//!
//! Expands a user's routine preferences (sleep, wake routine, meals) into
//! fixed [`TimeBlock`]s for a given calendar date, and defines the
//! active-hours window the gap engine works against.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timeline::{BlockKind, TimeBlock};

fn default_sleep_start() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 0, 0).expect("valid time")
}

fn default_sleep_end() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 0, 0).expect("valid time")
}

fn default_lunch_time() -> NaiveTime {
    NaiveTime::from_hms_opt(13, 0, 0).expect("valid time")
}

fn default_dinner_time() -> NaiveTime {
    NaiveTime::from_hms_opt(19, 30, 0).expect("valid time")
}

fn default_wake_routine_mins() -> i64 {
    30
}

fn default_breakfast_mins() -> i64 {
    30
}

fn default_meal_mins() -> i64 {
    45
}

fn default_max_study_block_mins() -> i64 {
    90
}

fn default_min_break_after_study() -> i64 {
    15
}

/// A user's daily-routine preferences.
///
/// Supplied by the caller per user; immutable for the duration of one
/// composition call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineConfig {
    #[serde(default = "default_sleep_start")]
    pub sleep_start: NaiveTime,
    #[serde(default = "default_sleep_end")]
    pub sleep_end: NaiveTime,
    #[serde(default = "default_wake_routine_mins")]
    pub wake_routine_mins: i64,
    #[serde(default = "default_breakfast_mins")]
    pub breakfast_mins: i64,
    #[serde(default = "default_lunch_time")]
    pub lunch_time: NaiveTime,
    #[serde(default = "default_meal_mins")]
    pub lunch_mins: i64,
    #[serde(default = "default_dinner_time")]
    pub dinner_time: NaiveTime,
    #[serde(default = "default_meal_mins")]
    pub dinner_mins: i64,
    #[serde(default = "default_max_study_block_mins")]
    pub max_study_block_mins: i64,
    #[serde(default = "default_min_break_after_study")]
    pub min_break_after_study: i64,
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            sleep_start: default_sleep_start(),
            sleep_end: default_sleep_end(),
            wake_routine_mins: default_wake_routine_mins(),
            breakfast_mins: default_breakfast_mins(),
            lunch_time: default_lunch_time(),
            lunch_mins: default_meal_mins(),
            dinner_time: default_dinner_time(),
            dinner_mins: default_meal_mins(),
            max_study_block_mins: default_max_study_block_mins(),
            min_break_after_study: default_min_break_after_study(),
        }
    }
}

impl RoutineConfig {
    /// Whether the nightly sleep interval crosses midnight
    /// (e.g. 23:00-06:00, as opposed to the same-day 01:00-06:00 case).
    fn sleep_crosses_midnight(&self) -> bool {
        self.sleep_start >= self.sleep_end
    }
}

fn at(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(time).and_utc()
}

/// Generates fixed routine blocks for calendar dates.
pub struct RoutineGenerator {
    config: RoutineConfig,
}

impl RoutineGenerator {
    pub fn new(config: RoutineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoutineConfig {
        &self.config
    }

    /// Active hours for a day: wake time (after the wake routine) to the
    /// start of the night's sleep.
    ///
    /// When `sleep_start < sleep_end` the nightly sleep interval reads as
    /// same-day (e.g. 01:00-06:00), so tonight's sleep start rolls to the
    /// next day to keep the wake-to-sleep window positive.
    pub fn active_hours(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let wake = at(date, self.config.sleep_end) + Duration::minutes(self.config.wake_routine_mins);

        let sleep = if self.config.sleep_crosses_midnight() {
            at(date, self.config.sleep_start)
        } else {
            at(date + Duration::days(1), self.config.sleep_start)
        };

        (wake, sleep)
    }

    /// Generate all fixed routine blocks for a date: the previous night's
    /// sleep, wake routine, breakfast, lunch, dinner, and the coming night's
    /// sleep.
    pub fn generate_blocks(&self, date: NaiveDate) -> Vec<TimeBlock> {
        let cfg = &self.config;
        let mut blocks = Vec::with_capacity(6);

        let mut push_fixed = |start: DateTime<Utc>, end: DateTime<Utc>, kind: BlockKind| {
            if end > start {
                blocks.push(TimeBlock::fixed(start, end, kind));
            }
        };

        // Morning sleep: started the previous evening when the interval
        // crosses midnight, otherwise entirely within this date.
        let sleep_end = at(date, cfg.sleep_end);
        let morning_sleep_start = if cfg.sleep_crosses_midnight() {
            at(date - Duration::days(1), cfg.sleep_start)
        } else {
            at(date, cfg.sleep_start)
        };
        push_fixed(morning_sleep_start, sleep_end, BlockKind::Sleep);

        // Wake routine, then breakfast directly after it
        let wake_end = sleep_end + Duration::minutes(cfg.wake_routine_mins);
        push_fixed(sleep_end, wake_end, BlockKind::WakeRoutine);
        push_fixed(
            wake_end,
            wake_end + Duration::minutes(cfg.breakfast_mins),
            BlockKind::Breakfast,
        );

        let lunch_start = at(date, cfg.lunch_time);
        push_fixed(
            lunch_start,
            lunch_start + Duration::minutes(cfg.lunch_mins),
            BlockKind::Lunch,
        );

        let dinner_start = at(date, cfg.dinner_time);
        push_fixed(
            dinner_start,
            dinner_start + Duration::minutes(cfg.dinner_mins),
            BlockKind::Dinner,
        );

        // Tonight's sleep always ends at sleep_end tomorrow; its start rolls
        // to tomorrow as well when the interval does not cross midnight.
        let tonight_start = if cfg.sleep_crosses_midnight() {
            at(date, cfg.sleep_start)
        } else {
            at(date + Duration::days(1), cfg.sleep_start)
        };
        push_fixed(
            tonight_start,
            at(date + Duration::days(1), cfg.sleep_end),
            BlockKind::Sleep,
        );

        blocks
    }
}
