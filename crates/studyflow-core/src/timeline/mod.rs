//! Time-block and gap algebra.
//!
//! This module provides:
//! - The [`TimeBlock`] value type and overlap-merging sweep
//! - Gap detection within a day's active-hours window
//! - Duration-based gap classification and deep work opportunity checks

mod block;
mod gap;

pub use block::{merge_overlapping_blocks, BlockKind, TimeBlock};
pub use gap::{
    find_deep_work_slots, find_gaps, find_gaps_default, Gap, GapKind,
    DEEP_WORK_OPPORTUNITY_MINUTES, DEFAULT_MIN_GAP_MINUTES, MICRO_GAP_MAX_MINUTES,
    STANDARD_GAP_MAX_MINUTES,
};
