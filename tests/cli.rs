//! End-to-end CLI tests
//!
//! Each test runs the binary against an isolated data directory via the
//! ROOMLEDGER_DATA_DIR override.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn roomledger(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("roomledger").unwrap();
    cmd.env("ROOMLEDGER_DATA_DIR", dir.path());
    cmd
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    roomledger(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").exists());
}

#[test]
fn full_lifecycle() {
    let dir = TempDir::new().unwrap();

    roomledger(&dir).arg("init").assert().success();

    roomledger(&dir)
        .args(["member", "add", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added member: Alice"));
    roomledger(&dir)
        .args(["member", "add", "Bob"])
        .assert()
        .success();

    roomledger(&dir)
        .args(["member", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice").and(predicate::str::contains("Bob")));

    // Alice pays 20.00 split across the whole household; Bob owes 10.00
    roomledger(&dir)
        .args([
            "expense",
            "add",
            "Alice",
            "20.00",
            "Utilities",
            "--date",
            "2025-03-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Split 2 ways"));

    roomledger(&dir)
        .args(["balance", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$10.00"));

    // Overpayment is refused
    roomledger(&dir)
        .args([
            "settle", "record", "Bob", "Alice", "10.01", "--date", "2025-03-02",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds"));

    // Exact repayment is accepted
    roomledger(&dir)
        .args([
            "settle", "record", "Bob", "Alice", "10.00", "--date", "2025-03-02",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob paid Alice $10.00"));

    roomledger(&dir)
        .args(["balance", "plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settled up"));
}

#[test]
fn balance_check_reports_healthy_ledger() {
    let dir = TempDir::new().unwrap();

    roomledger(&dir).arg("init").assert().success();
    roomledger(&dir)
        .args(["member", "add", "Alice"])
        .assert()
        .success();
    roomledger(&dir)
        .args(["member", "add", "Bob"])
        .assert()
        .success();
    roomledger(&dir)
        .args([
            "expense", "add", "Alice", "20.00", "Utilities", "--date", "2025-03-01",
        ])
        .assert()
        .success();

    roomledger(&dir)
        .args(["balance", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ledger OK"));
}

#[test]
fn self_settlement_refused() {
    let dir = TempDir::new().unwrap();

    roomledger(&dir).arg("init").assert().success();
    roomledger(&dir)
        .args(["member", "add", "Alice"])
        .assert()
        .success();

    roomledger(&dir)
        .args(["settle", "record", "Alice", "Alice", "5.00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot settle with yourself"));
}

#[test]
fn member_removal_blocked_by_history() {
    let dir = TempDir::new().unwrap();

    roomledger(&dir).arg("init").assert().success();
    roomledger(&dir)
        .args(["member", "add", "Alice"])
        .assert()
        .success();
    roomledger(&dir)
        .args(["member", "add", "Bob"])
        .assert()
        .success();
    roomledger(&dir)
        .args([
            "expense", "add", "Alice", "12.00", "Pizza", "--date", "2025-03-05",
        ])
        .assert()
        .success();

    roomledger(&dir)
        .args(["member", "remove", "Bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cannot remove Bob"));

    roomledger(&dir)
        .args(["member", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob"));
}
