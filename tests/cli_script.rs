use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn script(home: &std::path::Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("fintrack")
        .unwrap()
        .env("FINTRACK_CLI_SCRIPT", "1")
        .env("FINTRACK_HOME", home)
        .env_remove("RUST_LOG")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_records_transactions_and_reports_balance() {
    let home = tempfile::tempdir().unwrap();
    let input = "\
txn add expense 50 food --date 2024-01-05 --desc groceries
txn add income 2000 income --date 2024-01-01
report balance
report categories
exit
";
    script(home.path(), input)
        .success()
        .stdout(contains("Transaction").and(contains("added")))
        .stdout(contains("Total balance: +$1950.00"))
        .stdout(contains("Food & Dining").and(contains("100.0%")));
}

#[test]
fn data_survives_between_sessions() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "txn add expense 12.50 transport --desc bus\nexit\n").success();
    script(home.path(), "txn recent\nexit\n")
        .success()
        .stdout(contains("Transportation").and(contains("bus")));
    assert!(home.path().join("data").join("transactions.json").exists());
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "budgte list\nexit\n")
        .success()
        .stdout(contains("Did you mean `budget`?"));
}

#[test]
fn invalid_arguments_are_reported_and_the_script_continues() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "txn add expense -5 food\ntxn add expense 5 salary\nreport balance\n")
        .success()
        .stderr(contains("is not a positive amount"))
        .stderr(contains("unknown category `salary`"))
        .stdout(contains("Total balance: +$0.00"));
}

#[test]
fn export_writes_a_snapshot_file_that_imports_back() {
    let home = tempfile::tempdir().unwrap();
    let export = home.path().join("export.json");
    let input = format!(
        "txn add income 300 income --date 2024-03-01\nbudget add food 100 --month 2024-03\nexport {}\nreset\nimport {}\nbudget list --all\nreport balance\n",
        export.display(),
        export.display()
    );
    script(home.path(), &input)
        .success()
        .stdout(contains("Imported 1 transactions and 1 budgets."))
        .stdout(contains("Total balance: +$300.00"));

    let json = std::fs::read_to_string(&export).unwrap();
    assert!(json.contains("\"schemaVersion\": 1"));
}

#[test]
fn backups_can_be_listed_and_restored() {
    let home = tempfile::tempdir().unwrap();
    let input = "\
txn add income 10 income
backup nightly
reset
backup list
";
    script(home.path(), input)
        .success()
        .stdout(contains("Backup snapshot_").and(contains("nightly")))
        .stdout(contains("All data cleared."));

    let backups = std::fs::read_dir(home.path().join("backups")).unwrap();
    let name = backups
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .find(|name| name.starts_with("snapshot_"))
        .unwrap();

    script(home.path(), &format!("backup restore {name}\nreport balance\n"))
        .success()
        .stdout(contains("Total balance: +$10.00"));
}

#[test]
fn reports_can_be_emitted_as_json() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "report cashflow weekly --json\n")
        .success()
        .stdout(contains("\"income\": 0.0").and(contains("\"label\"")));
}

#[test]
fn settings_change_the_currency_symbol() {
    let home = tempfile::tempdir().unwrap();
    script(
        home.path(),
        "settings set currency EUR \nsettings show\ntxn add income 5 income\nreport balance\n",
    )
    .success()
    .stdout(contains("currency       : EUR"))
    .stdout(contains("Total balance: +EUR5.00"));
}

#[test]
fn transaction_list_groups_under_day_headers() {
    let home = tempfile::tempdir().unwrap();
    script(
        home.path(),
        "txn add expense 50 food --date 2024-01-05 --desc groceries\ntxn list\n",
    )
    .success()
    .stdout(contains("Fri 05 Jan 2024"))
    .stdout(contains("2024-01-05").and(contains("groceries")));
}

#[test]
fn trend_rejects_month_counts_beyond_the_cap() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "report trend 3300000\nreport trend 0\nreport trend 120\n")
        .success()
        .stderr(contains("`3300000` is not a month count between 1 and 120"))
        .stderr(contains("`0` is not a month count"));
}

#[test]
fn command_words_ignore_case_and_accept_aliases() {
    let home = tempfile::tempdir().unwrap();
    script(
        home.path(),
        "TXN add income 40 income\ntransactions recent\nhelp quit\nquit\nreport balance\n",
    )
    .success()
    .stdout(contains("Help: exit").and(contains("Aliases    : quit, q")))
    .stdout(contains("Total balance").not());
}
