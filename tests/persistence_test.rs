#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: create and process a payment
    let csv1 = common::command_file(&[
        "create, p1, 100.0, USD, first run, user-1",
        "process, p1, , , , user-1",
    ]);
    let output1 = Command::new(cargo_bin!("paytrail"))
        .arg(csv1.path())
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    let payment_id = stdout1
        .lines()
        .nth(1)
        .and_then(|line| line.split(',').nth(1))
        .expect("created row")
        .to_string();

    // 2. Second run: complete it by raw id against the same DB
    let row = format!("complete, {payment_id}, , , , user-2");
    let csv2 = common::command_file(&[row.as_str()]);
    let output2 = Command::new(cargo_bin!("paytrail"))
        .arg(csv2.path())
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());

    // The recovered trail holds all three entries
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert_eq!(stdout2.lines().count(), 4);
    assert!(stdout2.contains(",completed,user-2,"));
}
