use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const BIN_NAME: &str = "travel-ledger";

fn ledger_command(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("TRAVEL_LEDGER_DATA_DIR", dir.path());
    cmd.env("RUST_LOG", "off");
    cmd
}

fn init_trip(dir: &TempDir) {
    ledger_command(dir)
        .args([
            "init",
            "--start",
            "2024-01-15",
            "--end",
            "2024-01-20",
            "--budget",
            "10,000,000",
        ])
        .assert()
        .success()
        .stdout(contains("Planned trip").and(contains("6 days")));
}

/// Run `activity add` and return the printed activity id
fn add_activity(dir: &TempDir, args: &[&str]) -> String {
    let output = ledger_command(dir)
        .args(["activity", "add"])
        .args(args)
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Planned activity "))
        .and_then(|rest| rest.split(':').next())
        .map(str::to_string)
        .expect("activity id printed")
}

#[test]
fn test_commands_require_a_trip() {
    let dir = TempDir::new().unwrap();
    ledger_command(&dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(contains("travel-ledger init"));
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    init_trip(&dir);

    ledger_command(&dir)
        .args(["init", "--start", "2024-02-01", "--budget", "1,000,000"])
        .assert()
        .failure()
        .stderr(contains("--force"));

    ledger_command(&dir)
        .args([
            "init",
            "--start",
            "2024-02-01",
            "--budget",
            "1,000,000",
            "--force",
        ])
        .assert()
        .success()
        .stdout(contains("7 days"));
}

#[test]
fn test_expense_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_trip(&dir);

    ledger_command(&dir)
        .args([
            "expense",
            "add",
            "150,000",
            "food",
            "--description",
            "Pho breakfast",
            "--date",
            "2024-01-15 08:00",
        ])
        .assert()
        .success()
        .stdout(contains("Recorded expense exp-"));

    ledger_command(&dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(contains("Pho breakfast").and(contains("150,000.00 VND")));

    ledger_command(&dir)
        .args(["expense", "add", "-5", "food"])
        .assert()
        .failure();
}

#[test]
fn test_activity_cost_flows_into_categories() {
    let dir = TempDir::new().unwrap();
    init_trip(&dir);

    let id = add_activity(
        &dir,
        &[
            "Seafood dinner",
            "--type",
            "restaurant",
            "--start",
            "2024-01-16 19:00",
            "--estimate",
            "600,000",
            "--actual",
            "650,000",
        ],
    );

    ledger_command(&dir)
        .args(["categories", "--json"])
        .assert()
        .success()
        .stdout(contains("65000000"));

    ledger_command(&dir)
        .args(["activity", "cost", &id, "700,000"])
        .assert()
        .success();

    ledger_command(&dir)
        .args(["categories", "--json"])
        .assert()
        .success()
        .stdout(contains("70000000").and(contains("65000000").not()));

    ledger_command(&dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(contains("1 expense(s)"));
}

#[test]
fn test_activity_clear_cost_and_delete() {
    let dir = TempDir::new().unwrap();
    init_trip(&dir);

    let id = add_activity(
        &dir,
        &["Ha Long cruise", "--type", "tour", "--actual", "2,500,000"],
    );

    ledger_command(&dir)
        .args(["activity", "clear-cost", &id])
        .assert()
        .success();
    ledger_command(&dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(contains("No expenses recorded"));

    ledger_command(&dir)
        .args(["activity", "delete", &id])
        .assert()
        .success()
        .stdout(contains("Deleted activity"));
    ledger_command(&dir)
        .args(["activity", "list"])
        .assert()
        .success()
        .stdout(contains("Ha Long cruise").not());
}

#[test]
fn test_status_and_summary() {
    let dir = TempDir::new().unwrap();
    init_trip(&dir);
    add_activity(&dir, &["Night market", "--estimate", "200,000", "--actual", "250,000"]);

    ledger_command(&dir)
        .args(["status", "--on", "2024-01-17"])
        .assert()
        .success()
        .stdout(contains("6 total").and(contains("250,000.00 VND")));

    ledger_command(&dir)
        .args(["summary", "--on", "2024-01-17"])
        .assert()
        .success()
        .stdout(contains("Activity Costs").and(contains("Night market")));
}

#[test]
fn test_export_formats() {
    let dir = TempDir::new().unwrap();
    init_trip(&dir);
    ledger_command(&dir)
        .args(["expense", "add", "80,000", "transport", "-d", "Grab to old quarter"])
        .assert()
        .success();

    ledger_command(&dir)
        .args(["export", "--format", "csv"])
        .assert()
        .success()
        .stdout(
            contains("ID,Date,Category,Description,Amount,Currency").and(contains("80000.00")),
        );

    ledger_command(&dir)
        .args(["export", "--format", "yaml"])
        .assert()
        .success()
        .stdout(contains("schema_version"));

    let out = dir.path().join("ledger.json");
    ledger_command(&dir)
        .args(["export", "--format", "json", "--pretty", "--output"])
        .arg(&out)
        .assert()
        .success();
    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(contents.contains("Grab to old quarter"));
}

#[test]
fn test_config_show_and_set() {
    let dir = TempDir::new().unwrap();

    ledger_command(&dir)
        .args(["config", "set", "default_currency", "usd"])
        .assert()
        .success();

    ledger_command(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("default_currency:  USD"));

    ledger_command(&dir)
        .args(["config", "set", "warning_threshold", "150"])
        .assert()
        .failure();
}
