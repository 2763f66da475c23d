use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ledger(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ledger").expect("bin");
    cmd.env("HOUSEHOLD_LEDGER_DIR", dir).env_remove("RUST_LOG");
    cmd
}

fn add(dir: &Path, args: &[&str]) -> String {
    let output = ledger(dir)
        .arg("txn")
        .arg("add")
        .args(args)
        .output()
        .expect("run");
    assert!(output.status.success(), "txn add {:?} failed", args);
    String::from_utf8(output.stdout).expect("utf8")
}

fn created_id(stdout: &str) -> String {
    stdout
        .lines()
        .find_map(|l| l.trim().strip_prefix("ID:"))
        .map(|id| id.trim().to_string())
        .expect("id line")
}

fn seed(dir: &Path) -> String {
    add(dir, &["Salary", "3000", "--income", "--date", "2025-01-05"]);
    add(dir, &["Rent", "1000", "-c", "housing", "--date", "2025-01-06"]);
    let water = add(
        dir,
        &["Water", "500", "-c", "bills", "--date", "2025-01-20", "--status", "pending"],
    );
    created_id(&water)
}

#[test]
fn init_creates_config() {
    let temp = TempDir::new().unwrap();

    ledger(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    assert!(temp.path().join("config.json").exists());

    ledger(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}

#[test]
fn patrimony_ignores_unpaid_bills() {
    let temp = TempDir::new().unwrap();
    seed(temp.path());

    ledger(temp.path())
        .args(["report", "patrimony"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$2000.00"))
        .stdout(predicate::str::contains("$500.00"));
}

#[test]
fn next_month_shows_carryover() {
    let temp = TempDir::new().unwrap();
    seed(temp.path());

    ledger(temp.path())
        .args(["report", "month", "2025-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unpaid from earlier months: $500.00"))
        .stdout(predicate::str::contains("No transactions this month."));
}

#[test]
fn pay_settles_once() {
    let temp = TempDir::new().unwrap();
    let water = seed(temp.path());

    ledger(temp.path())
        .args(["txn", "pay", &water])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked as paid"));

    ledger(temp.path())
        .args(["txn", "pay", &water])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot settle"));

    ledger(temp.path())
        .args(["report", "patrimony"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$1500.00"));
}

#[test]
fn zero_amount_is_rejected() {
    let temp = TempDir::new().unwrap();

    ledger(temp.path())
        .args(["txn", "add", "Nothing", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than zero"));
}

#[test]
fn salary_cannot_have_goal() {
    let temp = TempDir::new().unwrap();

    ledger(temp.path())
        .args(["goal", "set", "salary", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot have a budget goal"));

    ledger(temp.path())
        .args(["goal", "set", "groceries", "500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal for Groceries: $500.00 per month"));
}

#[test]
fn config_rejects_unusable_date_formats() {
    let temp = TempDir::new().unwrap();

    ledger(temp.path())
        .args(["config", "--date-format", "%Q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));

    ledger(temp.path())
        .args(["config", "--export-date-format", "%d/%m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not read back"));
    assert!(!temp.path().join("config.json").exists());

    seed(temp.path());
    ledger(temp.path())
        .args(["export", "csv", "--month", "2025-01"])
        .assert()
        .success();
}

#[test]
fn csv_export_of_month() {
    let temp = TempDir::new().unwrap();
    seed(temp.path());
    let out = temp.path().join("january.csv");

    ledger(temp.path())
        .args(["export", "csv", "--month", "2025-01", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 transactions"));

    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,description,amount,direction,status");
    assert_eq!(lines[1], "05/01/2025,Salary,3000.00,Inflow,Settled");
    assert_eq!(lines[3], "20/01/2025,Water,500.00,Outflow,Pending");
}

#[test]
fn recurring_launch_records_first_of_month() {
    let temp = TempDir::new().unwrap();

    ledger(temp.path())
        .args(["recurring", "add", "Internet", "45.90"])
        .assert()
        .success();

    ledger(temp.path())
        .args(["recurring", "launch", "internet", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded Internet for 2025-03"));

    ledger(temp.path())
        .args(["txn", "list", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-01"))
        .stdout(predicate::str::contains("-$45.90"));
}

#[test]
fn audit_lists_mutations() {
    let temp = TempDir::new().unwrap();
    seed(temp.path());

    ledger(temp.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Transaction"))
        .stdout(predicate::str::contains("Showing 3 of 3 entries"));
}
