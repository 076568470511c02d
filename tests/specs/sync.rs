// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live synchronization specs: propagation, drain on signal, log output.

use super::prelude::*;
use nix::sys::signal::Signal;
use std::fs;

#[test]
fn propagates_a_file_then_drains_on_sigint() {
    let scratch = tempfile::tempdir().unwrap();
    let a = scratch.path().join("a");
    let b = scratch.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("t.txt"), b"mirrored bytes").unwrap();

    let daemon = Daemon::spawn(scratch.path(), 50, &[a.as_path(), b.as_path()]);

    let propagated = wait_for(SPEC_WAIT_MAX, || b.join("t.txt").exists());
    assert!(propagated, "file should appear under the second root");
    assert_eq!(fs::read(b.join("t.txt")).unwrap(), b"mirrored bytes");

    daemon.signal(Signal::SIGINT);
    let (status, stdout) = daemon.wait_exit(SPEC_WAIT_MAX);

    assert!(status.success(), "clean drain should exit zero");
    assert!(stdout.contains("Synchronization started"));
    assert!(stdout.contains("draining"));
    assert!(stdout.contains("Synchronization stopped"));
}

#[test]
fn deletion_reaches_the_other_root() {
    let scratch = tempfile::tempdir().unwrap();
    let a = scratch.path().join("a");
    let b = scratch.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("doomed.txt"), b"short lived").unwrap();

    let daemon = Daemon::spawn(scratch.path(), 50, &[a.as_path(), b.as_path()]);

    assert!(wait_for(SPEC_WAIT_MAX, || b.join("doomed.txt").exists()));
    fs::remove_file(a.join("doomed.txt")).unwrap();
    assert!(
        wait_for(SPEC_WAIT_MAX, || !b.join("doomed.txt").exists()),
        "deletion should propagate to the second root"
    );

    daemon.signal(Signal::SIGTERM);
    let (status, _) = daemon.wait_exit(SPEC_WAIT_MAX);
    assert!(status.success(), "SIGTERM should drain like SIGINT");
}

#[test]
fn writes_structured_log_records() {
    let scratch = tempfile::tempdir().unwrap();
    let a = scratch.path().join("a");
    let b = scratch.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("t.txt"), b"logged").unwrap();

    let daemon = Daemon::spawn(scratch.path(), 50, &[a.as_path(), b.as_path()]);
    assert!(wait_for(SPEC_WAIT_MAX, || b.join("t.txt").exists()));
    daemon.signal(Signal::SIGINT);
    let (status, _) = daemon.wait_exit(SPEC_WAIT_MAX);
    assert!(status.success());

    let log = fs::read_to_string(scratch.path().join("log.txt")).unwrap();
    assert!(log.contains("record inserted"), "log: {log}");
    assert!(log.contains("file built"), "log: {log}");
}
