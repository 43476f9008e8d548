//! Bridge to the external optimization engine via subprocess.
//!
//! Serializes a scheduling request, runs the optimizer as a child process,
//! enforces a timeout, parses its response, and maps failures into the
//! [`EngineError`] taxonomy. The wire protocol is a single JSON document in
//! each direction: request on stdin, response on stdout (or, on non-zero
//! exit, the same response shape on stderr).
//!
//! Each call owns exactly one child process; there is no pooling. The child
//! is spawned with `kill_on_drop`, so a timeout or caller-side cancellation
//! terminates it rather than leaking a running optimizer.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::priority::WorkItem;
use crate::slots::{duration_slots, to_slot_index, SLOTS_PER_DAY};

/// Default time limit for one optimizer run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Characters of raw engine output kept for parse-error diagnostics
const RAW_OUTPUT_LIMIT: usize = 500;

fn neg_one() -> i64 {
    -1
}

fn default_energy_level() -> i32 {
    5
}

/// A schedulable task in the engine's flat representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration_slots: i64,
    /// Priority 0-100
    pub priority: i32,
    /// Deadline slot index, -1 if none
    #[serde(default = "neg_one")]
    pub deadline_slot: i64,
    #[serde(default)]
    pub is_fixed: bool,
    /// Preferred energy level: 0=any, 1=low, 2=medium, 3=peak
    #[serde(default)]
    pub preferred_energy: i32,
}

impl TaskInput {
    /// Build a task input from a pending work item.
    ///
    /// The deadline is mapped to a slot index when it falls inside the
    /// optimization window `[reference, reference + num_days)`, otherwise
    /// the engine sees no deadline. The priority sent is the effective one,
    /// so overdue items arrive already elevated.
    pub fn from_work_item(
        item: &WorkItem,
        reference: chrono::NaiveDate,
        num_days: i64,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let deadline_slot = item
            .deadline
            .map(|d| to_slot_index(d, reference))
            .filter(|&slot| slot >= 0 && slot < num_days * SLOTS_PER_DAY)
            .unwrap_or(-1);

        Self {
            id: item.id,
            name: item.name.clone(),
            kind: item.kind.clone(),
            duration_slots: duration_slots(item.duration_minutes),
            priority: item.effective_priority(now),
            deadline_slot,
            is_fixed: false,
            preferred_energy: 0,
        }
    }
}

/// A pre-occupied 30-minute slot handed to the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FixedSlotInput {
    pub slot_index: i64,
    /// Owning task ID, -1 for blocked-but-unassigned slots
    #[serde(default = "neg_one")]
    pub task_id: i64,
    /// Energy level 1-5
    #[serde(default = "default_energy_level")]
    pub energy_level: i32,
    #[serde(default)]
    pub is_fixed: bool,
}

impl FixedSlotInput {
    /// A slot blocked by a fixed calendar entry, owned by no task.
    pub fn blocked(slot_index: i64) -> Self {
        Self {
            slot_index,
            task_id: -1,
            energy_level: default_energy_level(),
            is_fixed: true,
        }
    }
}

/// One placed slot in the engine's answer.
///
/// Opaque beyond structural validation; the engine decides placement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FixedSlotOutput {
    #[serde(default)]
    pub slot_index: i64,
    #[serde(default = "neg_one")]
    pub task_id: i64,
    #[serde(default = "default_energy_level")]
    pub energy_level: i32,
    #[serde(default)]
    pub is_fixed: bool,
}

/// The request document written to the engine's stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub tasks: Vec<TaskInput>,
    pub fixed_slots: Vec<FixedSlotInput>,
    pub num_days: i64,
}

/// The response document read from the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub success: bool,
    #[serde(default)]
    pub error_message: String,
    /// Structured error code emitted by newer engine builds; older builds
    /// only set `error_message`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default)]
    pub num_slots: i64,
    #[serde(default)]
    pub slots: Vec<FixedSlotOutput>,
}

/// Classify a structured engine error code.
fn classify_error_code(code: &str, timeout: Duration) -> Option<EngineError> {
    match code.to_ascii_lowercase().as_str() {
        "no_solution" => Some(EngineError::NoSolution),
        "timeout" => Some(EngineError::Timeout {
            timeout_secs: timeout.as_secs_f64(),
        }),
        "memory" => Some(EngineError::Memory),
        _ => None,
    }
}

/// Compatibility shim: keyword-match the engine's free-text error message.
///
/// Only used when the response carries no structured `error_code`. The
/// keyword set mirrors what existing engine builds emit.
fn classify_error_message(message: &str, timeout: Duration) -> EngineError {
    let lowered = message.to_ascii_lowercase();

    if lowered.contains("no solution") || lowered.contains("no valid") {
        EngineError::NoSolution
    } else if lowered.contains("timeout") {
        EngineError::Timeout {
            timeout_secs: timeout.as_secs_f64(),
        }
    } else if lowered.contains("memory") {
        EngineError::Memory
    } else {
        EngineError::Unknown {
            message: if message.is_empty() {
                "scheduling failed".to_string()
            } else {
                message.to_string()
            },
        }
    }
}

/// Translate a failed engine response into a typed error.
fn translate_failure(result: &ScheduleResult, timeout: Duration) -> EngineError {
    if let Some(code) = &result.error_code {
        if let Some(err) = classify_error_code(code, timeout) {
            return err;
        }
    }
    classify_error_message(&result.error_message, timeout)
}

fn truncate_raw(output: &str) -> String {
    output.chars().take(RAW_OUTPUT_LIMIT).collect()
}

/// Handle to the external optimizer executable.
///
/// Construct one explicitly and pass it to callers that need it; there is
/// no process-global instance.
#[derive(Debug, Clone)]
pub struct OptimizerBridge {
    engine_path: PathBuf,
    timeout: Duration,
}

impl OptimizerBridge {
    /// Create a bridge for the engine at `engine_path`.
    ///
    /// If the path does not exist as given, the platform executable suffix
    /// is probed (`engine` -> `engine.exe` on Windows).
    pub fn new(engine_path: impl Into<PathBuf>) -> Self {
        let mut engine_path: PathBuf = engine_path.into();

        if !engine_path.exists() && !std::env::consts::EXE_EXTENSION.is_empty() {
            let with_suffix = engine_path.with_extension(std::env::consts::EXE_EXTENSION);
            if with_suffix.exists() {
                engine_path = with_suffix;
            }
        }

        Self {
            engine_path,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the default time limit for this bridge's calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn engine_path(&self) -> &Path {
        &self.engine_path
    }

    fn validate_engine(&self) -> EngineResult<()> {
        if !self.engine_path.exists() {
            return Err(EngineError::EngineNotFound {
                path: self.engine_path.clone(),
            });
        }
        Ok(())
    }

    /// Run the engine with this bridge's configured timeout.
    pub async fn optimize(
        &self,
        tasks: Vec<TaskInput>,
        fixed_slots: Vec<FixedSlotInput>,
        num_days: i64,
    ) -> EngineResult<ScheduleResult> {
        self.optimize_with_timeout(tasks, fixed_slots, num_days, self.timeout)
            .await
    }

    /// Run the engine with a per-call timeout.
    pub async fn optimize_with_timeout(
        &self,
        tasks: Vec<TaskInput>,
        fixed_slots: Vec<FixedSlotInput>,
        num_days: i64,
        timeout: Duration,
    ) -> EngineResult<ScheduleResult> {
        self.validate_engine()?;

        let request = ScheduleRequest {
            tasks,
            fixed_slots,
            num_days,
        };
        let payload = serde_json::to_string(&request).map_err(|e| EngineError::Unknown {
            message: format!("failed to serialize request: {e}"),
        })?;

        debug!(
            tasks = request.tasks.len(),
            fixed_slots = request.fixed_slots.len(),
            num_days,
            "invoking optimizer engine"
        );

        let mut child = Command::new(&self.engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EngineError::EngineNotFound {
                        path: self.engine_path.clone(),
                    }
                } else {
                    EngineError::Unknown {
                        message: format!("failed to spawn engine: {e}"),
                    }
                }
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| EngineError::Unknown {
            message: "engine stdin was not captured".to_string(),
        })?;

        let exchange = async move {
            stdin.write_all(payload.as_bytes()).await?;
            stdin.shutdown().await?;
            drop(stdin);
            child.wait_with_output().await
        };

        // Dropping the exchange future on timeout drops the child handle,
        // which kills the process (kill_on_drop above).
        let output = match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(EngineError::Unknown {
                    message: format!("engine i/o failed: {e}"),
                })
            }
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs_f64(), "optimizer engine timed out");
                return Err(EngineError::Timeout {
                    timeout_secs: timeout.as_secs_f64(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, "optimizer engine exited with failure");

            // The engine may report failures as a response document on stderr
            return Err(match serde_json::from_str::<ScheduleResult>(stderr.trim()) {
                Ok(result) => translate_failure(&result, timeout),
                Err(_) => EngineError::Unknown {
                    message: format!(
                        "engine exited with {}: {}",
                        output.status,
                        stderr.trim()
                    ),
                },
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let result: ScheduleResult =
            serde_json::from_str(stdout.trim()).map_err(|e| EngineError::ParseError {
                message: e.to_string(),
                raw_output: truncate_raw(&stdout),
            })?;

        if !result.success {
            return Err(translate_failure(&result, timeout));
        }

        debug!(num_slots = result.num_slots, "optimizer returned schedule");
        Ok(result)
    }
}
