use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &tempfile::TempDir, extra_simulation: &str) -> PathBuf {
    let toml = format!(
        r#"
[sensors]
# wide enough for the footprints to overlap
radii = [20.0, 20.0, 20.0]

[pd]
intersection_outer = 0.45
intersection_center = 0.45

[simulation]
dt = 0.02
ticks = 40
{extra_simulation}

[logging]
level = "warn"
"#
    );
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn linesim(cfg: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("linesim_cli").unwrap();
    cmd.env_remove("RUST_LOG").arg("--config").arg(cfg);
    cmd
}

#[rstest]
#[case(&["self-check"], 0, "OK: config valid", "stdout")]
#[case(&["run"], 0, "ticks: 40", "stdout")]
#[case(&["run", "--ticks", "7", "--layout", "gap"], 0, "layout: gap", "stdout")]
#[case(&["run", "--layout", "maze"], 4, "Unknown layout 'maze'", "stderr")]
#[case(&["probe", "--x", "300", "--y", "300"], 0, "1.0000 [blank]", "stdout")]
#[case(&["probe", "--x", "-10", "--y", "5"], 0, "[outside]", "stdout")]
#[case(&["probe", "--x", "1", "--y", "1", "--radius", "0"], 1, "probe radius must be > 0", "stderr")]
#[case(&["fly"], 2, "unrecognized subcommand", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    let mut cmd = linesim(&cfg);
    cmd.args(args);

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("linesim_cli")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("self-check"));
}

#[test]
fn missing_config_file_is_explained() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("nope.toml");
    linesim(&cfg)
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read config file"));
}

#[rstest]
#[case("dt = 0.0", "simulation.dt must be > 0")]
#[case("controller = \"warp\"", "could not be parsed")]
fn bad_config_values_are_rejected(#[case] line: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let text = format!("[simulation]\nticks = 5\n{}\n", if line.starts_with("dt") {
        line.to_string()
    } else {
        format!("dt = 0.02\n{line}")
    });
    let cfg = dir.path().join("bad.toml");
    fs::write(&cfg, text).unwrap();
    linesim(&cfg)
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(needle));
}

#[test]
fn json_run_emits_one_record_per_tick_then_a_summary() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    let out = linesim(&cfg)
        .args(["--json", "run", "--ticks", "5"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 6);
    for (i, rec) in lines[..5].iter().enumerate() {
        assert_eq!(rec["tick"], i as u64);
        assert_eq!(rec["readings"].as_array().map(Vec::len), Some(3));
        assert_eq!(rec["state"], "pd_line_follow");
    }
    let summary = &lines[5]["summary"];
    assert_eq!(summary["ticks"], 5);
    assert_eq!(summary["layout"], "oval");
    assert_eq!(summary["transitions"], 0);
}

#[test]
fn json_errors_are_structured() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    let out = linesim(&cfg)
        .args(["--json", "run", "--layout", "maze"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(4));
    let stderr = String::from_utf8(out.stderr).unwrap();
    let last = stderr.lines().last().expect("error line");
    let v: serde_json::Value = serde_json::from_str(last).expect("json error");
    assert_eq!(v["reason"], "WorldError");
}

#[test]
fn probe_on_the_line_is_dark() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    let out = linesim(&cfg)
        .args(["--json", "probe", "--x", "100", "--y", "300", "--radius", "11"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value =
        serde_json::from_str(String::from_utf8(out.stdout).unwrap().trim()).unwrap();
    assert_eq!(v["tile"], "vertical");
    let b = v["brightness"].as_f64().unwrap();
    assert!(b < 0.1, "{b}");
    assert_eq!(v["closest"][0].as_f64(), Some(100.0));
}

#[test]
fn log_file_is_written_when_configured() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("sim.log");
    let text = format!(
        "[simulation]\ndt = 0.02\nticks = 3\n\n[logging]\nfile = {:?}\nlevel = \"info\"\n",
        log.display().to_string()
    );
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, text).unwrap();
    linesim(&cfg).arg("run").assert().success();
    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("scenario ready"), "{contents}");
}
