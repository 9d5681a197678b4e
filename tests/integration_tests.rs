use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn cookiecutter_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cookiecutter"))
}

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn cli_help_flag() {
    let output = cookiecutter_cmd()
        .arg("--help")
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cookiecutter"));
    assert!(stdout.contains("make-library"));
    assert!(stdout.contains("batch"));
}

#[test]
fn cli_version_flag() {
    let output = cookiecutter_cmd()
        .arg("--version")
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_missing_subcommand() {
    let output = cookiecutter_cmd().output().expect("Failed to execute");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"));
}

#[test]
fn make_library_missing_k() {
    let output = cookiecutter_cmd()
        .args(["make-library", "-i", "x.fa", "-o", "lib.tsv"])
        .output()
        .expect("Failed to execute");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--k"));
}

#[test]
fn make_library_zero_k() {
    let output = cookiecutter_cmd()
        .args(["make-library", "-i", "x.fa", "-o", "lib.tsv", "-k", "0"])
        .output()
        .expect("Failed to execute");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 1"));
}

#[test]
fn make_library_writes_sorted_library() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("lib.tsv");

    let output = cookiecutter_cmd()
        .arg("make-library")
        .arg("-i")
        .arg(fixture_path("headerless.fa"))
        .arg("-o")
        .arg(&out)
        .args(["-k", "4", "--sort", "--quiet"])
        .output()
        .expect("Failed to execute");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "ACGT\t6\nCGTA\t2\nGTAC\t2\nTACG\t2\n"
    );
}

#[test]
fn make_library_reports_progress_unless_quiet() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("lib.tsv");

    let output = cookiecutter_cmd()
        .arg("make-library")
        .arg("-i")
        .arg(fixture_path("simple.fa"))
        .arg("-o")
        .arg(&out)
        .args(["-k", "4"])
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("k-length"));
    assert!(stderr.contains("16 k-mers"));
}

#[test]
fn make_library_reads_stdin() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("lib.tsv");

    let mut child = cookiecutter_cmd()
        .args(["make-library", "-i", "-", "-k", "4", "--sort", "--quiet", "-o"])
        .arg(&out)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b">seq\nATCG\n")
        .expect("Failed to write to stdin");

    let output = child.wait_with_output().expect("Failed to wait");
    assert!(output.status.success());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "ATCG\t1\nCGAT\t1\n");
}

#[test]
fn make_library_missing_input_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("lib.tsv");

    let output = cookiecutter_cmd()
        .args(["make-library", "-i", "/nonexistent/input.fa", "-k", "4", "-o"])
        .arg(&out)
        .output()
        .expect("Failed to execute");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Problem parsing arguments"));
    assert!(!out.exists());
}

#[test]
fn batch_dry_run_prints_commands() {
    let output = cookiecutter_cmd()
        .args([
            "batch", "-c", "rm_reads", "-1", "a_1.fq,b_1.fq", "-2", "a_2.fq,b_2.fq", "-o", "out",
            "-f", "lib.tsv", "--dry-run",
        ])
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "rm_reads -o out --fragments lib.tsv --polyG 23 --length 50 --mq 20 -1 a_1.fq -2 a_2.fq",
            "rm_reads -o out --fragments lib.tsv --polyG 23 --length 50 --mq 20 -1 b_1.fq -2 b_2.fq",
        ]
    );
}

#[test]
fn batch_unequal_pairs_fail_before_launching() {
    let output = cookiecutter_cmd()
        .args([
            "batch", "-c", "remove", "-1", "a_1.fq,b_1.fq", "-2", "a_2.fq", "-o", "out", "-f",
            "lib.tsv", "--dry-run",
        ])
        .output()
        .expect("Failed to execute");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn batch_unknown_tool_is_rejected() {
    let output = cookiecutter_cmd()
        .args(["batch", "-c", "dust", "-i", "a.fq", "-o", "out", "-f", "lib.tsv"])
        .output()
        .expect("Failed to execute");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("rm_reads"));
}

#[cfg(unix)]
fn fake_tool(dir: &Path, name: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, "#!/bin/sh\ncase \"$*\" in\n  *bad*) exit 1 ;;\nesac\nexit 0\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn batch_runs_tools_and_writes_report() {
    let dir = TempDir::new().unwrap();
    let tools = dir.path().join("bin");
    std::fs::create_dir(&tools).unwrap();
    fake_tool(&tools, "remove");
    let library = dir.path().join("lib.tsv");
    std::fs::write(&library, "ATCG\t1\n").unwrap();
    let report = dir.path().join("report.json");

    let output = cookiecutter_cmd()
        .args(["batch", "-c", "remove", "-i", "a.fq,b.fq,c.fq", "-P", "2", "--quiet", "-o"])
        .arg(dir.path().join("out"))
        .arg("-f")
        .arg(&library)
        .arg("--tool-dir")
        .arg(&tools)
        .arg("--report")
        .arg(&report)
        .output()
        .expect("Failed to execute");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["launched"], 3);
    assert_eq!(value["succeeded"], 3);
    assert_eq!(value["failed"], 0);
    assert_eq!(value["concurrency"], 2);
    assert!(value["peak_in_flight"].as_u64().unwrap() <= 2);
}

#[cfg(unix)]
#[test]
fn batch_with_failed_jobs_exits_with_status_three() {
    let dir = TempDir::new().unwrap();
    fake_tool(dir.path(), "extract");
    let library = dir.path().join("lib.tsv");
    std::fs::write(&library, "ATCG\t1\n").unwrap();

    let output = cookiecutter_cmd()
        .args(["batch", "-c", "extract", "-i", "good.fq,bad.fq", "-o", "out", "-f"])
        .arg(&library)
        .arg("--tool-dir")
        .arg(dir.path())
        .output()
        .expect("Failed to execute");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 succeeded, 1 failed"));
    assert!(stderr.contains("bad.fq"));
}

#[test]
fn batch_missing_library_is_a_configuration_error() {
    let output = cookiecutter_cmd()
        .args([
            "batch", "-c", "remove", "-i", "a.fq", "-o", "out", "-f", "/nonexistent/lib.tsv",
        ])
        .output()
        .expect("Failed to execute");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("/nonexistent/lib.tsv"));
}
