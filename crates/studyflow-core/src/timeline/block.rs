//! Time block value type and interval algebra.
//!
//! A [`TimeBlock`] is a half-open calendar interval `[start, end)`. Fixed
//! blocks (classes, sleep, meals) are immutable inputs to gap computation;
//! non-fixed blocks represent movable study sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BlockError;

/// What a time block represents on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Sleep,
    WakeRoutine,
    Breakfast,
    Lunch,
    Dinner,
    /// University class from the timetable
    Class,
    /// Movable study session
    Study,
    Break,
    Other,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::WakeRoutine => "wake_routine",
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Class => "class",
            Self::Study => "study",
            Self::Break => "break",
            Self::Other => "other",
        }
    }
}

/// A scheduled interval on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_fixed: bool,
    pub kind: BlockKind,
}

impl TimeBlock {
    /// Create a new time block.
    ///
    /// # Panics
    /// Panics if `end <= start`. Use [`try_new`](Self::try_new) for a
    /// non-panicking version.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, is_fixed: bool, kind: BlockKind) -> Self {
        Self::try_new(start, end, is_fixed, kind)
            .expect("TimeBlock::new: end must be greater than start")
    }

    /// Create a new time block, validating the interval invariant.
    pub fn try_new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        is_fixed: bool,
        kind: BlockKind,
    ) -> Result<Self, BlockError> {
        if end <= start {
            return Err(BlockError::InvalidTimeRange { start, end });
        }
        Ok(Self {
            start,
            end,
            is_fixed,
            kind,
        })
    }

    /// Fixed block shorthand (classes, sleep, meals).
    pub fn fixed(start: DateTime<Utc>, end: DateTime<Utc>, kind: BlockKind) -> Self {
        Self::new(start, end, true, kind)
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this block overlaps a time range
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// Merge overlapping or touching blocks into non-overlapping ones.
///
/// Sorts by start time and sweeps left to right; a block is folded into the
/// previous one when its start is at or before the previous end (touching
/// counts as overlapping). The merged block keeps the earlier block's kind,
/// extends the end, and is fixed if either input was fixed. Output is sorted
/// and non-overlapping.
pub fn merge_overlapping_blocks(blocks: &[TimeBlock]) -> Vec<TimeBlock> {
    if blocks.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<TimeBlock> = blocks.to_vec();
    sorted.sort_by_key(|b| b.start);

    let mut merged: Vec<TimeBlock> = vec![sorted[0]];

    for block in &sorted[1..] {
        let last = merged.last_mut().expect("merged is never empty");

        if block.start <= last.end {
            last.end = last.end.max(block.end);
            last.is_fixed = last.is_fixed || block.is_fixed;
        } else {
            merged.push(*block);
        }
    }

    merged
}
