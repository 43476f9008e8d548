//! Day and week schedule composition.
//!
//! For one date: expand the routine into fixed blocks, union them with the
//! caller's class blocks, restrict to the active-hours window, merge
//! overlaps, and compute the day's gaps. Week composition repeats this per
//! day; the seven days share no state, so they could run concurrently, and
//! the sequential loop here is just the simplest valid schedule.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::bridge::FixedSlotInput;
use crate::routine::{RoutineConfig, RoutineGenerator};
use crate::slots::{duration_slots, to_slot_index};
use crate::timeline::{find_gaps_default, merge_overlapping_blocks, Gap, GapKind, TimeBlock};

/// Derived statistics for one composed day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DayStats {
    pub total_study_minutes: i64,
    pub deep_work_minutes: i64,
    pub has_deep_work_opportunity: bool,
    pub gap_count: usize,
}

/// Complete composed schedule for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    /// Merged fixed blocks intersecting the active-hours window
    pub blocks: Vec<TimeBlock>,
    /// Unscheduled time within the window, 15-minute minimum
    pub gaps: Vec<Gap>,
}

impl DaySchedule {
    /// Total unscheduled minutes available for study.
    pub fn total_study_minutes(&self) -> i64 {
        self.gaps.iter().map(Gap::duration_minutes).sum()
    }

    /// Minutes in gaps classified as deep work (> 60 min).
    pub fn deep_work_minutes(&self) -> i64 {
        self.gaps
            .iter()
            .filter(|g| g.kind == GapKind::DeepWork)
            .map(Gap::duration_minutes)
            .sum()
    }

    /// Whether any gap reaches the 90-minute opportunity threshold.
    pub fn has_deep_work_opportunity(&self) -> bool {
        self.gaps.iter().any(Gap::is_deep_work_opportunity)
    }

    /// Gaps long enough for sustained focused work.
    pub fn deep_work_opportunities(&self, min_duration_minutes: i64) -> Vec<&Gap> {
        self.gaps
            .iter()
            .filter(|g| g.duration_minutes() >= min_duration_minutes)
            .collect()
    }

    pub fn stats(&self) -> DayStats {
        DayStats {
            total_study_minutes: self.total_study_minutes(),
            deep_work_minutes: self.deep_work_minutes(),
            has_deep_work_opportunity: self.has_deep_work_opportunity(),
            gap_count: self.gaps.len(),
        }
    }
}

/// Compose one day's schedule from the routine and the day's class blocks.
///
/// `class_blocks` are already expressed as fixed blocks for this date.
pub fn compose_day(
    date: NaiveDate,
    config: &RoutineConfig,
    class_blocks: &[TimeBlock],
) -> DaySchedule {
    let generator = RoutineGenerator::new(config.clone());
    let (day_start, day_end) = generator.active_hours(date);

    let mut all_blocks = generator.generate_blocks(date);
    all_blocks.extend_from_slice(class_blocks);

    // Only blocks intersecting the active window matter for gap detection
    all_blocks.retain(|b| b.overlaps(day_start, day_end));

    let merged = merge_overlapping_blocks(&all_blocks);
    let gaps = find_gaps_default(&merged, day_start, day_end);

    DaySchedule {
        date,
        blocks: merged,
        gaps,
    }
}

/// Compose seven consecutive days starting at `start_date`.
///
/// `classes_for` supplies the fixed class blocks for each date.
pub fn compose_week(
    start_date: NaiveDate,
    config: &RoutineConfig,
    classes_for: impl Fn(NaiveDate) -> Vec<TimeBlock>,
) -> Vec<DaySchedule> {
    (0..7)
        .map(|offset| {
            let date = start_date + Duration::days(offset);
            compose_day(date, config, &classes_for(date))
        })
        .collect()
}

/// Unroll every fixed block over an optimization window into one
/// [`FixedSlotInput`] per occupied 30-minute slot.
///
/// Slot indices are relative to midnight of `start_date` (slot 0).
pub fn fixed_slots_for_window(
    start_date: NaiveDate,
    num_days: i64,
    config: &RoutineConfig,
    classes_for: impl Fn(NaiveDate) -> Vec<TimeBlock>,
) -> Vec<FixedSlotInput> {
    let mut fixed_slots = Vec::new();

    for offset in 0..num_days {
        let date = start_date + Duration::days(offset);
        let schedule = compose_day(date, config, &classes_for(date));

        for block in schedule.blocks.iter().filter(|b| b.is_fixed) {
            let first = to_slot_index(block.start, start_date);
            for i in 0..duration_slots(block.duration_minutes()) {
                fixed_slots.push(FixedSlotInput::blocked(first + i));
            }
        }
    }

    fixed_slots
}
