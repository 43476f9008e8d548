//! # Studyflow Core Library
//!
//! Core scheduling logic for Studyflow: turns a student's fixed commitments
//! (sleep and meal routine, university classes) and pending work items into
//! day and week schedules, identifies unscheduled gaps suitable for study,
//! and delegates optimal task placement to an external constraint-solving
//! engine run as a subprocess.
//!
//! ## Architecture
//!
//! - **Timeline**: `TimeBlock`/`Gap` value types and the interval algebra
//!   (overlap merging, gap detection, duration classification)
//! - **Priority**: deadline-driven priority calculation and elevation for
//!   work items, pure over an explicit `now`
//! - **Routine**: expands a user's daily-routine preferences into fixed
//!   calendar blocks, including midnight-crossing sleep
//! - **Composer**: per-day and per-week schedule composition with derived
//!   study statistics
//! - **Slots**: codec between absolute datetimes and the optimizer's flat
//!   30-minute slot indices
//! - **Bridge**: subprocess wire protocol to the optimizer, with timeout
//!   enforcement and a typed failure taxonomy
//!
//! Nothing in this crate persists state or renders UI; all values are
//! constructed per request and discarded with the response.

pub mod bridge;
pub mod composer;
pub mod error;
pub mod priority;
pub mod routine;
pub mod slots;
pub mod timeline;

pub use bridge::{
    FixedSlotInput, FixedSlotOutput, OptimizerBridge, ScheduleRequest, ScheduleResult, TaskInput,
};
pub use composer::{compose_day, compose_week, fixed_slots_for_window, DaySchedule, DayStats};
pub use error::{BlockError, EngineError, EngineResult};
pub use priority::{
    calculate_priority, compare_priority, elevated_priority, is_overdue, should_elevate,
    sort_by_priority, PriorityLevel, WorkItem,
};
pub use routine::{RoutineConfig, RoutineGenerator};
pub use slots::{to_slot_index, to_timestamp, SLOTS_PER_DAY, SLOT_MINUTES};
pub use timeline::{
    find_deep_work_slots, find_gaps, find_gaps_default, merge_overlapping_blocks, BlockKind, Gap,
    GapKind, TimeBlock,
};
