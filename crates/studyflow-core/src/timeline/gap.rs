//! Gap detection and classification.
//!
//! Identifies unscheduled time between blocks within a day's active-hours
//! window and classifies it by duration for appropriate task assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::block::TimeBlock;

/// Largest duration (exclusive) still classified as a micro gap
pub const MICRO_GAP_MAX_MINUTES: i64 = 30;
/// Largest duration (inclusive) still classified as a standard gap
pub const STANDARD_GAP_MAX_MINUTES: i64 = 60;
/// Minimum duration for a gap to count as a deep work opportunity
pub const DEEP_WORK_OPPORTUNITY_MINUTES: i64 = 90;
/// Default minimum gap duration worth reporting
pub const DEFAULT_MIN_GAP_MINUTES: i64 = 15;

/// Size category of an unscheduled gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    /// < 30 minutes, fits quick review work
    Micro,
    /// 30-60 minutes, fits practice problems
    Standard,
    /// > 60 minutes, fits conceptual learning (90+ ideal)
    DeepWork,
}

impl GapKind {
    /// Classify a gap by its duration in minutes.
    pub fn from_minutes(minutes: i64) -> Self {
        if minutes < MICRO_GAP_MAX_MINUTES {
            Self::Micro
        } else if minutes <= STANDARD_GAP_MAX_MINUTES {
            Self::Standard
        } else {
            Self::DeepWork
        }
    }

    /// Suggested task kind for a gap of this size.
    ///
    /// A heuristic default, not a hard constraint.
    pub fn suggested_task_kind(&self) -> &'static str {
        match self {
            Self::Micro => "revision",
            Self::Standard => "practice",
            Self::DeepWork => "study",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Micro => "micro",
            Self::Standard => "standard",
            Self::DeepWork => "deep_work",
        }
    }
}

/// An unscheduled interval within the active-hours window.
///
/// Derived, never persisted; recomputed on demand from the day's blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub kind: GapKind,
    pub suggested_task_kind: String,
}

impl Gap {
    fn from_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let kind = GapKind::from_minutes((end - start).num_minutes());
        Self {
            start,
            end,
            kind,
            suggested_task_kind: kind.suggested_task_kind().to_string(),
        }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether this gap is long enough for sustained focused work (90+ min).
    ///
    /// Stricter than the [`GapKind::DeepWork`] classification boundary: a
    /// 61-minute gap classifies as deep work but is not an opportunity.
    pub fn is_deep_work_opportunity(&self) -> bool {
        self.duration_minutes() >= DEEP_WORK_OPPORTUNITY_MINUTES
    }

    /// Check if this gap can fit a task of given duration
    pub fn can_fit(&self, minutes: i64) -> bool {
        self.duration_minutes() >= minutes
    }
}

/// Find all gaps between blocks within `[day_start, day_end]`.
///
/// Expects merged, non-overlapping blocks (see
/// [`merge_overlapping_blocks`](super::block::merge_overlapping_blocks)).
/// Emits the gap before the first block, between consecutive blocks, and
/// after the last block, each only if it lasts at least `min_gap_minutes`.
/// With no blocks the entire window is one gap, subject to the same minimum.
///
/// With `min_gap_minutes = 0`, gaps and blocks clipped to the window exactly
/// tile it.
pub fn find_gaps(
    blocks: &[TimeBlock],
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
    min_gap_minutes: i64,
) -> Vec<Gap> {
    let mut gaps = Vec::new();

    let mut push_if_long_enough = |start: DateTime<Utc>, end: DateTime<Utc>| {
        if end > start && (end - start).num_minutes() >= min_gap_minutes {
            gaps.push(Gap::from_interval(start, end));
        }
    };

    if blocks.is_empty() {
        push_if_long_enough(day_start, day_end);
        return gaps;
    }

    let mut sorted: Vec<&TimeBlock> = blocks.iter().collect();
    sorted.sort_by_key(|b| b.start);

    // Gap before the first block
    if sorted[0].start > day_start {
        push_if_long_enough(day_start, sorted[0].start.min(day_end));
    }

    // Gaps between consecutive blocks
    for pair in sorted.windows(2) {
        let gap_start = pair[0].end.max(day_start);
        let gap_end = pair[1].start.min(day_end);
        push_if_long_enough(gap_start, gap_end);
    }

    // Gap after the last block
    let last = sorted[sorted.len() - 1];
    if last.end < day_end {
        push_if_long_enough(last.end.max(day_start), day_end);
    }

    gaps
}

/// Find gaps with the default 15-minute minimum.
pub fn find_gaps_default(
    blocks: &[TimeBlock],
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
) -> Vec<Gap> {
    find_gaps(blocks, day_start, day_end, DEFAULT_MIN_GAP_MINUTES)
}

/// Find gaps long enough for deep work (90+ minutes by default).
///
/// Filters by raw duration, independent of the Micro/Standard/DeepWork
/// classification.
pub fn find_deep_work_slots(
    blocks: &[TimeBlock],
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
    min_duration_minutes: i64,
) -> Vec<Gap> {
    find_gaps_default(blocks, day_start, day_end)
        .into_iter()
        .filter(|gap| gap.duration_minutes() >= min_duration_minutes)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::block::BlockKind;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, min, 0).unwrap()
    }

    fn class(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeBlock {
        TimeBlock::fixed(start, end, BlockKind::Class)
    }

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(GapKind::from_minutes(15), GapKind::Micro);
        assert_eq!(GapKind::from_minutes(29), GapKind::Micro);
        assert_eq!(GapKind::from_minutes(30), GapKind::Standard);
        assert_eq!(GapKind::from_minutes(60), GapKind::Standard);
        assert_eq!(GapKind::from_minutes(61), GapKind::DeepWork);
        assert_eq!(GapKind::from_minutes(960), GapKind::DeepWork);
    }

    #[test]
    fn test_suggested_task_kinds() {
        assert_eq!(GapKind::Micro.suggested_task_kind(), "revision");
        assert_eq!(GapKind::Standard.suggested_task_kind(), "practice");
        assert_eq!(GapKind::DeepWork.suggested_task_kind(), "study");
    }

    #[test]
    fn test_empty_day_is_one_gap() {
        let gaps = find_gaps_default(&[], at(7, 0), at(23, 0));

        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].duration_minutes(), 960);
        assert_eq!(gaps[0].kind, GapKind::DeepWork);
        assert!(gaps[0].is_deep_work_opportunity());
    }

    #[test]
    fn test_two_class_day() {
        let blocks = vec![class(at(9, 0), at(10, 30)), class(at(13, 0), at(13, 45))];

        let gaps = find_gaps_default(&blocks, at(7, 0), at(23, 0));
        assert_eq!(gaps.len(), 3);

        assert_eq!(gaps[0].start, at(7, 0));
        assert_eq!(gaps[0].duration_minutes(), 120);
        assert_eq!(gaps[1].start, at(10, 30));
        assert_eq!(gaps[1].duration_minutes(), 150);
        assert_eq!(gaps[2].start, at(13, 45));
        assert_eq!(gaps[2].duration_minutes(), 555);

        assert!(gaps.iter().all(|g| g.kind == GapKind::DeepWork));
    }

    #[test]
    fn test_min_gap_filtering() {
        // 10-minute hole between classes is below the default minimum
        let blocks = vec![class(at(9, 0), at(10, 0)), class(at(10, 10), at(11, 0))];

        let gaps = find_gaps_default(&blocks, at(9, 0), at(11, 0));
        assert!(gaps.is_empty());

        let gaps = find_gaps(&blocks, at(9, 0), at(11, 0), 0);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].duration_minutes(), 10);
        assert_eq!(gaps[0].kind, GapKind::Micro);
    }

    #[test]
    fn test_deep_work_opportunity_boundary() {
        // 61 minutes classifies as deep work but is not an opportunity
        let blocks = vec![class(at(10, 1), at(23, 0))];
        let gaps = find_gaps_default(&blocks, at(9, 0), at(23, 0));

        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].duration_minutes(), 61);
        assert_eq!(gaps[0].kind, GapKind::DeepWork);
        assert!(!gaps[0].is_deep_work_opportunity());
    }

    #[test]
    fn test_find_deep_work_slots() {
        let blocks = vec![class(at(9, 0), at(10, 30)), class(at(11, 30), at(21, 45))];

        // 07:00-09:00 qualifies (120 min); 10:30-11:30 (60) and 21:45-23:00 (75) do not
        let slots = find_deep_work_slots(&blocks, at(7, 0), at(23, 0), 90);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, at(7, 0));
    }

    #[test]
    fn test_gaps_tile_window_with_zero_minimum() {
        let blocks = vec![class(at(9, 0), at(10, 30)), class(at(13, 0), at(13, 45))];
        let day_start = at(7, 0);
        let day_end = at(23, 0);

        let gaps = find_gaps(&blocks, day_start, day_end, 0);

        let block_total: i64 = blocks.iter().map(|b| b.duration_minutes()).sum();
        let gap_total: i64 = gaps.iter().map(|g| g.duration_minutes()).sum();
        assert_eq!(block_total + gap_total, (day_end - day_start).num_minutes());
    }
}
