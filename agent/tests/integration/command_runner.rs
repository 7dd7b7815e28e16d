//! `TokioCommandRunner` against real `sh` processes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::time::{Duration, Instant};

use compose_agent::application::ports::{CommandRunner, ProcessOutput, RunError};
use compose_agent::infra::TokioCommandRunner;
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

const GENEROUS: Duration = Duration::from_secs(20);

fn read_pid(dir: &Path) -> i32 {
    std::fs::read_to_string(dir.join("bg.pid"))
        .expect("pid file")
        .trim()
        .parse()
        .expect("numeric pid")
}

/// A killed orphan may linger as a zombie until init reaps it.
fn is_zombie(pid: i32) -> bool {
    std::fs::read_to_string(format!("/proc/{pid}/stat"))
        .ok()
        .and_then(|stat| {
            let (_, rest) = stat.rsplit_once(')')?;
            rest.trim_start().chars().next()
        })
        .is_some_and(|state| state == 'Z' || state == 'X')
}

/// Whether `pid` is gone before `limit` elapses.
async fn exits_within(pid: i32, limit: Duration) -> bool {
    let started = Instant::now();
    while started.elapsed() < limit {
        match signal::kill(Pid::from_raw(pid), None) {
            Err(Errno::ESRCH) => return true,
            Ok(()) if is_zombie(pid) => return true,
            _ => tokio::time::sleep(Duration::from_millis(50)).await,
        }
    }
    false
}

async fn sh(cwd: &Path, script: &str, timeout: Duration) -> ProcessOutput {
    TokioCommandRunner::default()
        .run_in(cwd, "sh", &["-c", script], timeout)
        .await
        .expect("sh should start")
}

#[tokio::test]
async fn test_captures_stdout_stderr_and_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let out = sh(dir.path(), "echo out; echo err >&2; exit 3", GENEROUS).await;

    assert_eq!(out.exit_code, Some(3));
    assert_eq!(out.stdout, b"out\n");
    assert_eq!(out.stderr, b"err\n");
    assert!(!out.timed_out);
}

#[tokio::test]
async fn test_runs_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("compose.yaml"), "services: {}\n").unwrap();
    let out = sh(dir.path(), "ls", GENEROUS).await;

    assert_eq!(out.exit_code, Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("compose.yaml"));
}

#[tokio::test]
async fn test_arguments_are_not_shell_interpreted() {
    let dir = tempfile::tempdir().unwrap();
    let out = TokioCommandRunner::default()
        .run_in(dir.path(), "echo", &["a;", "touch", "pwned"], GENEROUS)
        .await
        .unwrap();

    assert_eq!(out.stdout, b"a; touch pwned\n");
    assert!(!dir.path().join("pwned").exists());
}

#[tokio::test]
async fn test_timeout_kills_process_group_and_keeps_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let started = Instant::now();
    let out = sh(
        dir.path(),
        "sleep 30 >/dev/null 2>&1 & echo $! > bg.pid; echo start; sleep 30; echo never",
        Duration::from_millis(500),
    )
    .await;

    assert!(out.timed_out);
    assert_eq!(out.exit_code, None);
    assert_eq!(out.stdout, b"start\n");
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "runner waited {:?}",
        started.elapsed()
    );

    let pid = read_pid(dir.path());
    assert!(
        exits_within(pid, Duration::from_secs(5)).await,
        "background process {pid} survived the timeout"
    );
}

#[tokio::test]
async fn test_exit_is_reported_even_if_grandchild_holds_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let runner = TokioCommandRunner::new(Duration::from_millis(200));
    let started = Instant::now();
    let out = runner
        .run_in(
            dir.path(),
            "sh",
            &["-c", "sleep 30 & echo $! > bg.pid; echo done"],
            GENEROUS,
        )
        .await
        .unwrap();

    let pid = read_pid(dir.path());
    let _ = signal::kill(Pid::from_raw(pid), Signal::SIGKILL);

    assert!(!out.timed_out);
    assert_eq!(out.exit_code, Some(0));
    assert_eq!(out.stdout, b"done\n");
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "runner waited {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_output_is_capped_per_stream() {
    let dir = tempfile::tempdir().unwrap();
    let out = TokioCommandRunner::default()
        .with_output_limit(1024)
        .run_in(
            dir.path(),
            "sh",
            &["-c", "head -c 100000 /dev/zero; head -c 10 /dev/zero >&2"],
            GENEROUS,
        )
        .await
        .unwrap();

    assert_eq!(out.exit_code, Some(0));
    assert_eq!(out.stdout.len(), 1024);
    assert_eq!(out.stderr.len(), 10);
}

#[tokio::test]
async fn test_invalid_utf8_output_is_returned_as_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let out = sh(dir.path(), r"printf 'ok\377'", GENEROUS).await;
    assert_eq!(out.stdout, b"ok\xff");
}

#[tokio::test]
async fn test_large_output_does_not_deadlock() {
    let dir = tempfile::tempdir().unwrap();
    let out = sh(
        dir.path(),
        "i=0; while [ $i -lt 20000 ]; do echo line-$i; echo err-$i >&2; i=$((i+1)); done",
        GENEROUS,
    )
    .await;

    assert_eq!(out.exit_code, Some(0));
    assert_eq!(String::from_utf8_lossy(&out.stdout).lines().count(), 20000);
    assert_eq!(String::from_utf8_lossy(&out.stderr).lines().count(), 20000);
}

#[tokio::test]
async fn test_missing_program_is_spawn_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TokioCommandRunner::default()
        .run_in(dir.path(), "definitely-not-a-real-binary-4f1c", &[], GENEROUS)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Spawn { .. }), "{err:?}");
}

#[tokio::test]
async fn test_missing_directory_is_working_directory_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone");
    let err = TokioCommandRunner::default()
        .run_in(&missing, "sh", &["-c", "true"], GENEROUS)
        .await
        .unwrap_err();

    let RunError::WorkingDirectory { path, reason } = err else {
        panic!("expected WorkingDirectory, got {err:?}");
    };
    assert_eq!(path, missing);
    assert_eq!(reason, "does not exist");
}

#[tokio::test]
async fn test_file_as_directory_is_working_directory_error() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let err = TokioCommandRunner::default()
        .run_in(file.path(), "sh", &["-c", "true"], GENEROUS)
        .await
        .unwrap_err();
    assert!(
        matches!(&err, RunError::WorkingDirectory { reason, .. } if reason == "not a directory"),
        "{err:?}"
    );
}
