use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

#[test]
fn compile_writes_three_artifacts() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    cmd.arg("compile")
        .arg(fixture("fixtures/policies.csv"))
        .arg("--out-dir")
        .arg(path_as_str(dir.path()))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "compile_summary rows=4 addresses=3 services=4 policies=4 opaque_services=2 warnings=0",
        ));

    let addresses = fs::read_to_string(dir.path().join("addresses.txt")).expect("addresses");
    assert_eq!(
        addresses,
        "\
config firewall address
    edit \"WebSrv\"
        set subnet 10.0.0.0 255.255.255.0
    next
end

config firewall address
    edit \"DnsSrv\"
        set subnet 192.168.10.53 255.255.255.255
    next
end

config firewall address
    edit \"MgmtNet\"
        set subnet 172.16.0.0 255.255.0.0
    next
end
"
    );

    let services = fs::read_to_string(dir.path().join("services.txt")).expect("services");
    let names: Vec<_> = services
        .lines()
        .filter_map(|l| l.trim().strip_prefix("edit "))
        .collect();
    assert_eq!(names, vec!["\"TCP-443\"", "\"UDP-53\"", "\"TCP-53\"", "\"TCP-22\""]);
    assert!(services.contains("        set udp-portrange 53\n"));

    let policies = fs::read_to_string(dir.path().join("policies.txt")).expect("policies");
    let ids: Vec<_> = policies
        .lines()
        .filter_map(|l| l.trim().strip_prefix("edit "))
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert!(policies.contains("        set service \"TCP-443\"\n"));
    assert!(policies.contains("        set dstaddr \"203.0.113.5/32\"\n"));
    assert!(policies.contains("        set service \"TCP-22\" \"HTTPS\"\n"));
}

#[test]
fn compile_reports_warnings_on_stderr() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    cmd.arg("compile")
        .arg(fixture("fixtures/bad-cidr.csv"))
        .arg("--out-dir")
        .arg(path_as_str(dir.path()))
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "warning: row 1: source subnet '10.0.0.0/33' for 'WebSrv' skipped",
        ))
        .stderr(predicate::str::contains("[unresolved_address]"));

    let policies = fs::read_to_string(dir.path().join("policies.txt")).expect("policies");
    assert!(policies.contains("set srcaddr \"WebSrv\""));
    let addresses = fs::read_to_string(dir.path().join("addresses.txt")).expect("addresses");
    assert!(addresses.contains("edit \"DbSrv\""));
    assert!(!addresses.contains("WebSrv"));
}

#[test]
fn compile_aborts_on_bad_cidr_when_requested() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    cmd.arg("compile")
        .arg(fixture("fixtures/bad-cidr.csv"))
        .arg("--out-dir")
        .arg(path_as_str(dir.path()))
        .arg("--on-invalid-cidr")
        .arg("abort")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "row 1: invalid source subnet '10.0.0.0/33'",
        ));

    assert!(!dir.path().join("policies.txt").exists());
}

#[test]
fn compile_fails_on_missing_required_field() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    cmd.arg("compile")
        .arg(fixture("fixtures/missing-service.csv"))
        .arg("--out-dir")
        .arg(path_as_str(dir.path()))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "row 2 (line 3): missing required field 'Service'",
        ));
}

#[test]
fn compile_strict_fails_after_writing() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    cmd.arg("compile")
        .arg(fixture("fixtures/conflict.csv"))
        .arg("--out-dir")
        .arg(path_as_str(dir.path()))
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("[address_conflict]"))
        .stderr(predicate::str::contains(
            "compile failed in strict mode: 1 warnings",
        ));

    assert!(dir.path().join("addresses.txt").exists());
}

#[test]
fn compile_conflict_error_mode() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    cmd.arg("compile")
        .arg(fixture("fixtures/conflict.csv"))
        .arg("--out-dir")
        .arg(path_as_str(dir.path()))
        .arg("--on-address-conflict")
        .arg("error")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "source address 'WebSrv' is already defined as 10.0.0.0/24",
        ));
}

#[test]
fn compile_applies_settings_file() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("policygen.toml");
    fs::write(
        &config,
        "[policy]\nsrcintf = \"port1\"\ndstintf = \"port2\"\n",
    )
    .expect("write settings");
    let out_dir = dir.path().join("out");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    cmd.arg("compile")
        .arg(fixture("fixtures/policies.tsv"))
        .arg("--out-dir")
        .arg(path_as_str(&out_dir))
        .arg("--config")
        .arg(path_as_str(&config))
        .assert()
        .success();

    let policies = fs::read_to_string(out_dir.join("policies.txt")).expect("policies");
    assert!(policies.contains("        set srcintf \"port1\"\n"));
    assert!(policies.contains("        set dstintf \"port2\"\n"));
    assert!(policies.contains("        set service \"ALL\"\n"));
    let addresses = fs::read_to_string(out_dir.join("addresses.txt")).expect("addresses");
    assert_eq!(addresses, "");
}

#[test]
fn compile_json_includes_records_and_artifacts() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    let assert = cmd
        .arg("compile")
        .arg(fixture("fixtures/policies-semicolon.csv"))
        .arg("--out-dir")
        .arg(path_as_str(dir.path()))
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("json report");
    assert_eq!(report["summary"]["policies"], 2);
    assert_eq!(report["output"]["records"][1]["destination"]["kind"], "literal");
    assert_eq!(report["output"]["service_objects"][1]["name"], "UDP-53");
    assert_eq!(report["artifacts"].as_array().map(Vec::len), Some(3));
}

#[test]
fn compile_print_echoes_all_cli() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    cmd.arg("compile")
        .arg(fixture("fixtures/policies.csv"))
        .arg("--out-dir")
        .arg(path_as_str(dir.path()))
        .arg("--print")
        .assert()
        .success()
        .stdout(predicate::str::contains("config firewall address"))
        .stdout(predicate::str::contains("config firewall service custom"))
        .stdout(predicate::str::contains("config firewall policy"));
}

#[test]
fn compile_refuses_to_overwrite_input() {
    let dir = tempdir().expect("tempdir");
    let sheet = dir.path().join("policies.txt");
    fs::copy(fixture("fixtures/policies.csv"), &sheet).expect("copy sheet");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    cmd.arg("compile")
        .arg(path_as_str(&sheet))
        .arg("--out-dir")
        .arg(path_as_str(dir.path()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite input sheet"));

    let untouched = fs::read_to_string(&sheet).expect("sheet");
    assert!(untouched.starts_with("Policy Name,"));
    assert!(!dir.path().join("addresses.txt").exists());
}

#[test]
fn compile_reads_workbook_like_csv() {
    let csv_dir = tempdir().expect("tempdir");
    let xlsx_dir = tempdir().expect("tempdir");

    for (sheet, dir) in [
        ("fixtures/policies.csv", &csv_dir),
        ("fixtures/policies.xlsx", &xlsx_dir),
    ] {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
        cmd.arg("compile")
            .arg(fixture(sheet))
            .arg("--out-dir")
            .arg(path_as_str(dir.path()))
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "compile_summary rows=4 addresses=3 services=4 policies=4 opaque_services=2 warnings=0",
            ));
    }

    for artifact in ["addresses.txt", "services.txt", "policies.txt"] {
        let from_csv = fs::read_to_string(csv_dir.path().join(artifact)).expect("csv artifact");
        let from_xlsx =
            fs::read_to_string(xlsx_dir.path().join(artifact)).expect("xlsx artifact");
        assert_eq!(from_xlsx, from_csv, "{artifact} differs");
    }
}

#[test]
fn compile_rejects_header_only_sheet_missing_columns() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fgt-policygen"));
    cmd.arg("compile")
        .arg(fixture("fixtures/header-only.csv"))
        .arg("--out-dir")
        .arg(path_as_str(dir.path()))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "header row: missing required field 'Destination Address'",
        ));

    assert!(!dir.path().join("policies.txt").exists());
}
