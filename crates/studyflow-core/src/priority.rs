//! Task priority calculation and deadline-driven elevation.
//!
//! Priorities live on a 0-100 scale with named tiers. Deadline checks use an
//! explicit `now` parameter so the engine stays a pure function of its inputs
//! rather than reading a process-wide clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named priority tiers, highest last.
///
/// Overdue is the ceiling; elevation never decreases an already-higher
/// priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    FreeTime,
    RegularStudy,
    Assignment,
    RevisionDue,
    UrgentLab,
    ExamPrep,
    DueToday,
    Overdue,
}

impl PriorityLevel {
    /// Numeric value on the 0-100 scale.
    pub fn value(&self) -> i32 {
        match self {
            Self::FreeTime => 10,
            Self::RegularStudy => 50,
            Self::Assignment => 60,
            Self::RevisionDue => 65,
            Self::UrgentLab => 75,
            Self::ExamPrep => 85,
            Self::DueToday => 90,
            Self::Overdue => 100,
        }
    }
}

/// A pending work item handed in by the caller.
///
/// Values are assumed already validated; `priority` is the stored value and
/// may be overridden by [`effective_priority`](Self::effective_priority).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: i64,
    pub name: String,
    /// Free-form task kind ("assignment", "study", ...); unknown kinds get
    /// the regular-study default
    pub kind: String,
    pub duration_minutes: i64,
    pub priority: i32,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_exam_related: bool,
    #[serde(default)]
    pub is_lab_urgent: bool,
}

impl WorkItem {
    /// Stored priority overridden to Overdue (100) when the deadline has
    /// passed.
    pub fn effective_priority(&self, now: DateTime<Utc>) -> i32 {
        if is_overdue(self.deadline, now) {
            PriorityLevel::Overdue.value()
        } else {
            self.priority
        }
    }
}

/// Calculate priority for a task from its attributes.
///
/// Precedence, first match wins: deadline passed, deadline today, exam
/// related, urgent lab, then a per-kind default.
pub fn calculate_priority(
    kind: &str,
    deadline: Option<DateTime<Utc>>,
    is_exam_related: bool,
    is_lab_urgent: bool,
    now: DateTime<Utc>,
) -> i32 {
    if let Some(deadline) = deadline {
        if deadline < now {
            return PriorityLevel::Overdue.value();
        }
        if deadline.date_naive() == now.date_naive() {
            return PriorityLevel::DueToday.value();
        }
    }

    if is_exam_related {
        return PriorityLevel::ExamPrep.value();
    }

    if is_lab_urgent {
        return PriorityLevel::UrgentLab.value();
    }

    default_priority_for_kind(kind)
}

/// Per-kind default priority; unknown kinds fall back to regular study.
pub fn default_priority_for_kind(kind: &str) -> i32 {
    match kind {
        "assignment" | "lab_work" => PriorityLevel::Assignment.value(),
        "revision" => PriorityLevel::RevisionDue.value(),
        "study" | "practice" | "deep_work" => PriorityLevel::RegularStudy.value(),
        "free_time" | "break" => PriorityLevel::FreeTime.value(),
        _ => PriorityLevel::RegularStudy.value(),
    }
}

/// Check if a deadline has strictly passed. No deadline is never overdue.
pub fn is_overdue(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match deadline {
        Some(deadline) => now > deadline,
        None => false,
    }
}

/// Check whether a task's priority should be elevated for its deadline.
///
/// Elevation is a one-way ratchet: a task already at or above the target
/// tier is left unchanged. Only Overdue and DueToday trigger elevation.
pub fn should_elevate(current_priority: i32, deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    let Some(deadline) = deadline else {
        return false;
    };

    if deadline < now {
        return current_priority < PriorityLevel::Overdue.value();
    }

    if deadline.date_naive() == now.date_naive() {
        return current_priority < PriorityLevel::DueToday.value();
    }

    false
}

/// Target priority an elevated task lands on. Overdue wins over DueToday.
pub fn elevated_priority(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i32 {
    let Some(deadline) = deadline else {
        return PriorityLevel::RegularStudy.value();
    };

    if deadline < now {
        PriorityLevel::Overdue.value()
    } else if deadline.date_naive() == now.date_naive() {
        PriorityLevel::DueToday.value()
    } else {
        PriorityLevel::RegularStudy.value()
    }
}

/// Stable descending sort by effective priority; ties preserve input order.
pub fn sort_by_priority(items: &mut [WorkItem], now: DateTime<Utc>) {
    items.sort_by(|a, b| b.effective_priority(now).cmp(&a.effective_priority(now)));
}

/// Compare two items by effective priority.
///
/// Negative means `a` ranks first. Callers must only rely on the sign, not
/// on a three-way -1/0/1 contract.
pub fn compare_priority(a: &WorkItem, b: &WorkItem, now: DateTime<Utc>) -> i32 {
    b.effective_priority(now) - a.effective_priority(now)
}
