// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument contract: bad invocations fail fast with a nonzero exit.

use assert_cmd::Command;

fn lockstep() -> Command {
    Command::cargo_bin("lockstep").expect("binary should be built")
}

#[test]
fn no_arguments_fails() {
    lockstep().assert().failure();
}

#[test]
fn single_root_fails() {
    let a = tempfile::tempdir().unwrap();
    lockstep().arg("100").arg(a.path()).assert().failure();
}

#[test]
fn non_numeric_tick_fails() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    lockstep()
        .arg("soon")
        .arg(a.path())
        .arg(b.path())
        .assert()
        .failure();
}

#[test]
fn zero_tick_fails() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    lockstep()
        .arg("0")
        .arg(a.path())
        .arg(b.path())
        .assert()
        .failure();
}

#[test]
fn nonexistent_root_fails() {
    let a = tempfile::tempdir().unwrap();
    lockstep()
        .arg("100")
        .arg(a.path())
        .arg(a.path().join("missing"))
        .assert()
        .failure();
}
