//! Integration tests for the optimizer bridge against fake engine scripts.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use studyflow_core::{EngineError, FixedSlotInput, OptimizerBridge, TaskInput};

fn write_engine(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn sample_task() -> TaskInput {
    TaskInput {
        id: 0,
        name: "Read chapter 4".to_string(),
        kind: "study".to_string(),
        duration_slots: 2,
        priority: 50,
        deadline_slot: -1,
        is_fixed: false,
        preferred_energy: 0,
    }
}

#[tokio::test]
async fn successful_run_round_trips_the_protocol() {
    let dir = tempfile::tempdir().unwrap();
    // Echo a canned schedule after consuming the request
    let engine = write_engine(
        &dir,
        "engine",
        r#"cat > /dev/null
printf '%s' '{"success": true, "error_message": "", "num_slots": 2, "slots": [{"slot_index": 18, "task_id": 0, "energy_level": 3, "is_fixed": false}, {"slot_index": 19, "task_id": 0, "energy_level": 3, "is_fixed": false}]}'"#,
    );

    let bridge = OptimizerBridge::new(&engine);
    let result = bridge
        .optimize(vec![sample_task()], vec![FixedSlotInput::blocked(0)], 7)
        .await
        .expect("engine run should succeed");

    assert!(result.success);
    assert_eq!(result.num_slots, 2);
    assert_eq!(result.slots.len(), 2);
    assert_eq!(result.slots[0].slot_index, 18);
    assert_eq!(result.slots[0].task_id, 0);
}

#[tokio::test]
async fn missing_executable_fails_before_spawn() {
    let bridge = OptimizerBridge::new("/nonexistent/studyflow-engine");
    let err = bridge
        .optimize(vec![sample_task()], Vec::new(), 7)
        .await
        .expect_err("missing engine must fail");

    match err {
        EngineError::EngineNotFound { path } => {
            assert_eq!(path, PathBuf::from("/nonexistent/studyflow-engine"));
        }
        other => panic!("expected EngineNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn infeasible_problem_maps_to_no_solution() {
    let dir = tempfile::tempdir().unwrap();
    // Failure response on stderr with a non-zero exit, as the engine does
    let engine = write_engine(
        &dir,
        "engine",
        r#"cat > /dev/null
printf '%s' '{"success": false, "error_message": "No solution found for the given constraints", "num_slots": 0, "slots": []}' >&2
exit 2"#,
    );

    let bridge = OptimizerBridge::new(&engine);
    let err = bridge
        .optimize(vec![sample_task()], Vec::new(), 7)
        .await
        .expect_err("infeasible problem must fail");

    assert!(matches!(err, EngineError::NoSolution));
    assert!(err.suggestion().contains("deadlines"));
}

#[tokio::test]
async fn structured_error_code_is_preferred() {
    let dir = tempfile::tempdir().unwrap();
    let engine = write_engine(
        &dir,
        "engine",
        r#"cat > /dev/null
printf '%s' '{"success": false, "error_message": "solver gave up", "error_code": "memory", "num_slots": 0, "slots": []}'"#,
    );

    let bridge = OptimizerBridge::new(&engine);
    let err = bridge
        .optimize(vec![sample_task()], Vec::new(), 7)
        .await
        .expect_err("failed response must translate");

    assert!(matches!(err, EngineError::Memory));
}

#[tokio::test]
async fn malformed_output_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let engine = write_engine(
        &dir,
        "engine",
        r#"cat > /dev/null
printf '%s' 'this is not a schedule'"#,
    );

    let bridge = OptimizerBridge::new(&engine);
    let err = bridge
        .optimize(vec![sample_task()], Vec::new(), 7)
        .await
        .expect_err("garbage output must fail");

    match err {
        EngineError::ParseError { raw_output, .. } => {
            assert!(raw_output.contains("this is not a schedule"));
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_stderr_is_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let engine = write_engine(
        &dir,
        "engine",
        r#"cat > /dev/null
echo 'assertion failed in solver.c:120' >&2
exit 1"#,
    );

    let bridge = OptimizerBridge::new(&engine);
    let err = bridge
        .optimize(vec![sample_task()], Vec::new(), 7)
        .await
        .expect_err("crashing engine must fail");

    match err {
        EngineError::Unknown { message } => {
            assert!(message.contains("solver.c:120"));
        }
        other => panic!("expected Unknown, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_engine_times_out_and_is_terminated() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("engine.pid");
    // exec keeps the recorded pid pointing at the sleeping process
    let engine = write_engine(
        &dir,
        "engine",
        &format!(
            "echo $$ > {}\ncat > /dev/null\nexec sleep 30",
            pid_file.display()
        ),
    );

    let bridge = OptimizerBridge::new(&engine).with_timeout(Duration::from_millis(300));
    let started = Instant::now();
    let err = bridge
        .optimize(vec![sample_task()], Vec::new(), 7)
        .await
        .expect_err("slow engine must time out");

    assert!(matches!(err, EngineError::Timeout { .. }));
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "timeout must not wait for the engine to finish"
    );

    // The child must no longer be running (killed, possibly not yet reaped)
    let pid: i32 = fs::read_to_string(&pid_file).unwrap().trim().parse().unwrap();
    let mut terminated = false;
    for _ in 0..40 {
        match fs::read_to_string(format!("/proc/{pid}/stat")) {
            Err(_) => {
                terminated = true;
                break;
            }
            Ok(stat) if stat.contains(") Z ") => {
                terminated = true;
                break;
            }
            Ok(_) => tokio::time::sleep(Duration::from_millis(50)).await,
        }
    }
    assert!(terminated, "engine process leaked past the timeout");
}

#[tokio::test]
async fn per_call_timeout_overrides_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let engine = write_engine(
        &dir,
        "engine",
        r#"cat > /dev/null
sleep 1
printf '%s' '{"success": true, "error_message": "", "num_slots": 0, "slots": []}'"#,
    );

    // Default would time out; the per-call override gives it room
    let bridge = OptimizerBridge::new(&engine).with_timeout(Duration::from_millis(100));
    let result = bridge
        .optimize_with_timeout(vec![sample_task()], Vec::new(), 7, Duration::from_secs(10))
        .await
        .expect("generous per-call timeout should succeed");

    assert!(result.success);
}
