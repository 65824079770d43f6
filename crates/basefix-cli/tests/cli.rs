use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LOG: &str = "\
[ RUN      ] CompletionTest.Member
curBaseFile:
    file:///home/ci/lsp/test/cases/t1.cj
  check inBase={old}
  check result={new}
[  FAILED  ] CompletionTest.Member
[ RUN      ] CompletionTest.Gone
curBaseFile:
    file:///home/ci/lsp/test/cases/gone.cj
  check inBase={a}
  check result={b}
[  FAILED  ] CompletionTest.Gone
";

fn project(log: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("cases")).unwrap();
    fs::write(temp.path().join("cases/t1.cj"), "{old}").unwrap();
    fs::write(temp.path().join("build_log.txt"), log).unwrap();
    temp
}

fn basefix(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("basefix").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn fix_uses_default_log_in_working_directory() {
    let temp = project(LOG);

    basefix(temp.path())
        .arg("fix")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated file: ./cases/t1.cj"))
        .stdout(predicate::str::contains("File not found: ./cases/gone.cj"))
        .stdout(predicate::str::contains("Fixed 1 test case"));

    assert_eq!(
        fs::read_to_string(temp.path().join("cases/t1.cj")).unwrap(),
        "{new}"
    );
    assert!(!temp.path().join("cases/gone.cj").exists());
}

#[test]
fn fix_twice_is_idempotent() {
    let temp = project(LOG);
    basefix(temp.path()).arg("fix").assert().success();
    basefix(temp.path())
        .arg("fix")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed 1 test case"));
    assert_eq!(
        fs::read_to_string(temp.path().join("cases/t1.cj")).unwrap(),
        "{new}"
    );
}

#[test]
fn fix_with_explicit_log_and_root() {
    let temp = project(LOG);
    let logs = TempDir::new().unwrap();
    let log_path = logs.path().join("ci.log");
    fs::write(&log_path, LOG).unwrap();

    Command::cargo_bin("basefix")
        .unwrap()
        .arg("fix")
        .arg(&log_path)
        .arg("--root")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed 1 test case"));

    assert_eq!(
        fs::read_to_string(temp.path().join("cases/t1.cj")).unwrap(),
        "{new}"
    );
}

#[test]
fn fix_missing_log_ends_cleanly() {
    let temp = TempDir::new().unwrap();
    basefix(temp.path())
        .arg("fix")
        .assert()
        .success()
        .stderr(predicate::str::contains("Log file not found: build_log.txt"));
}

#[test]
fn fix_no_records() {
    let temp = project("nothing to see here\n");
    basefix(temp.path())
        .arg("fix")
        .assert()
        .success()
        .stdout(predicate::str::diff("Fixed 0 test cases\n"));
    assert_eq!(
        fs::read_to_string(temp.path().join("cases/t1.cj")).unwrap(),
        "{old}"
    );
}

#[test]
fn fix_diff_does_not_write() {
    let temp = project(LOG);
    basefix(temp.path())
        .args(["fix", "--diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would update file: ./cases/t1.cj"))
        .stdout(predicate::str::contains("-{old}"))
        .stdout(predicate::str::contains("+{new}"))
        .stdout(predicate::str::contains("Fixed 0 test cases"));
    assert_eq!(
        fs::read_to_string(temp.path().join("cases/t1.cj")).unwrap(),
        "{old}"
    );
}

#[test]
fn fix_json_report() {
    let temp = project(LOG);
    let output = basefix(temp.path())
        .args(["fix", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["fixed"], 1);
    assert_eq!(value["outcomes"][0]["status"], "updated");
    assert_eq!(value["outcomes"][1]["status"], "missing");
    assert_eq!(value["outcomes"][1]["path"], "./cases/gone.cj");
}

#[test]
fn fix_reset_on_new_path_skips_stale_pairing() {
    let log = "\
curBaseFile:
file:///ci/test/cases/other.cj
inBase={x}
curBaseFile:
file:///ci/test/cases/t1.cj
result={stale}
";
    let temp = project(log);
    basefix(temp.path())
        .args(["fix", "--reset-on-new-path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed 0 test cases"));
    assert_eq!(
        fs::read_to_string(temp.path().join("cases/t1.cj")).unwrap(),
        "{old}"
    );

    basefix(temp.path())
        .arg("fix")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed 1 test case"));
    assert_eq!(
        fs::read_to_string(temp.path().join("cases/t1.cj")).unwrap(),
        "{stale}"
    );
}

#[test]
fn fix_harness_order_with_either_policy() {
    let log = "\
inBase={old}
result={new}
curTestFile:
file:///home/ci/lsp/test/src/t1.cj
curBaseFile:
file:///home/ci/lsp/test/cases/t1.cj
";
    for extra in [None, Some("--reset-on-new-path")] {
        let temp = project(log);
        let mut cmd = basefix(temp.path());
        cmd.arg("fix");
        if let Some(flag) = extra {
            cmd.arg(flag);
        }
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Updated file: ./cases/t1.cj"))
            .stdout(predicate::str::contains("Fixed 1 test case"));
        assert_eq!(
            fs::read_to_string(temp.path().join("cases/t1.cj")).unwrap(),
            "{new}"
        );
    }
}

#[test]
fn fix_custom_anchor() {
    let log = "curBaseFile:\nfile:///ci/fixtures/cases/t1.cj\ninBase={old}\nresult={new}\n";
    let temp = project(log);
    basefix(temp.path())
        .args(["fix", "--anchor", "fixtures"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated file: ./cases/t1.cj"));
}

#[test]
fn fix_rejects_bad_anchor() {
    let temp = project(LOG);
    basefix(temp.path())
        .args(["fix", "--anchor", "a/b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --anchor"));
}

#[test]
fn scan_lists_records_without_writing() {
    let temp = project(LOG);
    basefix(temp.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("./cases/t1.cj | inBase={old} -> {new}"))
        .stdout(predicate::str::contains("2 record(s)"));
    assert_eq!(
        fs::read_to_string(temp.path().join("cases/t1.cj")).unwrap(),
        "{old}"
    );
}

#[test]
fn scan_json() {
    let temp = project(LOG);
    let output = basefix(temp.path())
        .args(["scan", "--json", "--pretty"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[1]["fixture_path"], "./cases/gone.cj");
}
