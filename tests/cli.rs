use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn splitbook(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("splitbook").unwrap();
    cmd.env("SPLITBOOK_DATA_DIR", dir.path())
        .env_remove("SPLITBOOK_MEMBER")
        .env_remove("RUST_LOG");
    cmd
}

/// Alice, Bob and Carol in a group called Trip, acting as Alice
fn trip() -> TempDir {
    let dir = TempDir::new().unwrap();
    splitbook(&dir).arg("init").assert().success();
    for name in ["Alice", "Bob", "Carol"] {
        splitbook(&dir)
            .args(["member", "add", name])
            .assert()
            .success();
    }
    splitbook(&dir)
        .args(["member", "use", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Now acting as Alice"));
    splitbook(&dir)
        .args(["group", "create", "Trip"])
        .assert()
        .success();
    for name in ["Bob", "Carol"] {
        splitbook(&dir)
            .args(["group", "add-member", "Trip", name])
            .assert()
            .success();
    }
    dir
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    splitbook(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    splitbook(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized."));
}

#[test]
fn test_equal_split_and_settle() {
    let dir = trip();

    splitbook(&dir)
        .args(["expense", "add", "Dinner", "90", "--group", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added expense: Dinner ($90.00"));

    splitbook(&dir)
        .args(["balance", "--group", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice  is owed $60.00"))
        .stdout(predicate::str::contains("Bob    owes $30.00"));

    splitbook(&dir)
        .args(["settle", "suggest", "--group", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob pays Alice $30.00"))
        .stdout(predicate::str::contains("Carol pays Alice $30.00"));

    splitbook(&dir)
        .args(["settle", "record", "Bob", "Alice", "25", "--group", "Trip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("settlement amount mismatch"));

    splitbook(&dir)
        .args(["--as", "Bob", "settle", "record", "Bob", "Alice", "30", "-g", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded: Bob paid Alice $30.00"));

    splitbook(&dir)
        .args(["balance", "--group", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice  is owed $30.00"))
        .stdout(predicate::str::contains("Bob    settled up"));
}

#[test]
fn test_percentage_split_must_sum_to_100() {
    let dir = trip();

    splitbook(&dir)
        .args([
            "expense", "add", "Hotel", "100", "--group", "Trip", "--method", "percentage",
            "--share", "Alice=50", "--share", "Bob=30", "--share", "Carol=19.5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "percentages must sum to 100 (got 99.5)",
        ));
}

#[test]
fn test_itemized_friend_expense() {
    let dir = trip();

    splitbook(&dir)
        .args([
            "expense", "add", "Groceries", "30", "--with", "Bob", "--item", "Coffee:10:Alice",
            "--item", "Snacks:20:Alice,Bob",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Itemized"));

    splitbook(&dir)
        .arg("balance")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob owes you $10.00"));
}

#[test]
fn test_only_payer_can_delete() {
    let dir = trip();

    let output = splitbook(&dir)
        .args(["expense", "add", "Taxi", "12", "--group", "Trip"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix("ID: "))
        .unwrap()
        .to_string();

    splitbook(&dir)
        .args(["--as", "Carol", "expense", "delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only the member who paid"));

    splitbook(&dir)
        .args(["expense", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted expense: Taxi"));
}

#[test]
fn test_missing_acting_member() {
    let dir = TempDir::new().unwrap();
    splitbook(&dir).arg("init").assert().success();

    splitbook(&dir)
        .args(["group", "create", "Flat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no acting member"));
}

#[test]
fn test_csv_export_to_stdout() {
    let dir = trip();
    splitbook(&dir)
        .args(["expense", "add", "Dinner", "90", "--group", "Trip"])
        .assert()
        .success();

    splitbook(&dir)
        .args(["export", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "expense_id,date,group,description,category,method,payer,member,amount,percentage,settled",
        ))
        .stdout(predicate::str::contains("Trip,Dinner,general,equal,Alice,Carol,30.00,,false"));
}

#[test]
fn test_audit_lists_changes() {
    let dir = trip();

    splitbook(&dir)
        .args(["audit", "--entity", "group"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATE Group"))
        .stdout(predicate::str::contains("CREATE Group"))
        .stdout(predicate::str::contains("Member").not());
}

#[test]
fn test_oversized_exact_shares_rejected() {
    let dir = trip();

    splitbook(&dir)
        .args([
            "expense", "add", "Island", "100", "--group", "Trip", "--method", "exact",
            "--share", "Alice=90000000000000000", "--share", "Bob=90000000000000000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error: amount too large"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_unknown_split_method_is_validation_error() {
    let dir = trip();

    splitbook(&dir)
        .args(["expense", "add", "Lunch", "30", "--group", "Trip", "--method", "shares"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Validation error: unsupported split method: shares",
        ));
}
