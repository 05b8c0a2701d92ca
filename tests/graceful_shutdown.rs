//! Process-level shutdown tests.
//!
//! **What We're Testing:**
//! 1. SIGTERM (docker stop, systemctl stop) triggers the graceful path
//! 2. The graceful path removes the workspace and exits cleanly

#![cfg(unix)]

use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

fn spawn_worker(data_dir: &Path) -> Child {
    Command::new(env!("CARGO_BIN_EXE_funceble_worker"))
        .args(["--host", "127.0.0.1", "--port", "0", "--data-dir"])
        .arg(data_dir)
        .env_remove("WORKER_PORT")
        .env_remove("WORKER_HOST")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap()
}

fn workspace_count(data_dir: &Path) -> usize {
    std::fs::read_dir(data_dir).unwrap().count()
}

fn wait_for_exit(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(status) = child.try_wait().unwrap() {
            return Some(status);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    None
}

fn send_signal(child: &Child, signal: &str) {
    let status = Command::new("kill")
        .args([signal, &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());
}

fn assert_signal_removes_workspace(signal: &str) {
    let data_dir = TempDir::new().unwrap();
    let mut child = spawn_worker(data_dir.path());

    let deadline = Instant::now() + Duration::from_secs(10);
    while workspace_count(data_dir.path()) == 0 {
        if Instant::now() >= deadline {
            let _ = child.kill();
            panic!("workspace never appeared");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    // Give the server a moment to reach its serve loop
    std::thread::sleep(Duration::from_millis(300));

    send_signal(&child, signal);
    let Some(status) = wait_for_exit(&mut child, Duration::from_secs(10)) else {
        let _ = child.kill();
        panic!("worker did not exit after {}", signal);
    };

    assert!(status.success(), "exit status after {}: {:?}", signal, status);
    assert_eq!(workspace_count(data_dir.path()), 0, "workspace left behind");
}

#[test]
fn test_sigterm_removes_workspace() {
    assert_signal_removes_workspace("-TERM");
}

#[test]
fn test_sigint_removes_workspace() {
    assert_signal_removes_workspace("-INT");
}
