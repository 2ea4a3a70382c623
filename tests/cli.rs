use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn taskwright(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taskwright").expect("bin");
    cmd.env_remove("ENV")
        .env_remove("APP_NAME")
        .env_remove("PORT")
        .env_remove("TARGET")
        .env_remove("RUST_LOG")
        .arg("--project-dir")
        .arg(project);
    cmd
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(".python-version"), "3.12.4\n").expect("version file");
    fs::create_dir(dir.path().join("environments")).expect("environments");
    fs::write(
        dir.path().join("environments").join("dev.env"),
        "DEMO_CONFIG=true\nDEMO_DATABASE_URL=sqlite:///demo.db\n",
    )
    .expect("dev.env");
    dir
}

#[test]
fn help_lists_every_task() {
    let output = Command::cargo_bin("taskwright")
        .expect("bin")
        .arg("--help")
        .output()
        .expect("help");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    for task in [
        "install", "run", "format", "lint", "typecheck", "check", "shell", "docker-run", "clean",
        "help",
    ] {
        assert!(text.contains(task), "missing {task} in help");
    }
}

#[test]
fn dockerfile_prints_both_stages() {
    let dir = project();
    taskwright(dir.path())
        .arg("dockerfile")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("FROM python:3.12.4-slim AS base"))
        .stdout(predicate::str::contains("FROM base AS development"))
        .stdout(predicate::str::contains("pipenv install --deploy --system"));
}

#[test]
fn dockerfile_write_creates_file() {
    let dir = project();
    taskwright(dir.path())
        .args(["dockerfile", "--write"])
        .assert()
        .success();
    let text = fs::read_to_string(dir.path().join("Dockerfile")).expect("Dockerfile");
    assert!(text.contains("EXPOSE 8000"));
}

#[test]
fn env_falls_back_to_dev_file() {
    let dir = project();
    taskwright(dir.path())
        .args(["--env", "staging", "env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DEMO_DATABASE_URL"))
        .stdout(predicate::str::contains("sqlite:///demo.db").not())
        .stdout(predicate::str::contains("has no file"));
}

#[test]
fn env_without_any_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    taskwright(dir.path())
        .arg("env")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No environment file found"));
}

#[test]
fn docker_run_dry_run_plans_replace_and_start() {
    let dir = project();
    let output = taskwright(dir.path())
        .args(["--json", "--dry-run", "--app-name", "demo-api", "docker-run", "--stage", "production"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["task"], "docker-run");
    assert_eq!(report["dry_run"], true);
    let commands: Vec<&str> = report["steps"]
        .as_array()
        .expect("steps")
        .iter()
        .map(|s| s["command"].as_str().expect("command"))
        .collect();
    assert_eq!(commands[0], "docker stop demo-api");
    assert_eq!(commands[1], "docker rm demo-api");
    assert!(commands[2].contains("--target production -t demo-api:production"));
    assert!(commands[3].contains("-p 8000:8000 -e ENV=dev demo-api:production"));
    assert_eq!(report["message"], "demo-api is running at http://localhost:8000");
}

#[test]
fn docker_run_reads_settings_from_environment() {
    let dir = project();
    let output = Command::cargo_bin("taskwright")
        .expect("bin")
        .env_remove("APP_NAME")
        .env_remove("RUST_LOG")
        .env("TARGET", "production")
        .env("ENV", "qa")
        .env("PORT", "9000")
        .arg("--project-dir")
        .arg(dir.path())
        .args(["--dry-run", "--json", "docker-run"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    let commands: Vec<&str> = report["steps"]
        .as_array()
        .expect("steps")
        .iter()
        .map(|s| s["command"].as_str().expect("command"))
        .collect();
    assert!(commands.iter().any(|c| c.contains("--target production")));
    assert!(commands.iter().any(|c| c.contains("-p 9000:9000")));
    assert!(commands.iter().any(|c| c.contains("-e ENV=qa")));
}

#[test]
fn env_selector_cannot_leave_environments_dir() {
    let dir = project();
    taskwright(dir.path())
        .args(["--env", "../secrets", "env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid ENV"));
}

#[test]
fn docker_run_rejects_unknown_stage() {
    let dir = project();
    taskwright(dir.path())
        .args(["--dry-run", "docker-run", "--stage", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown build stage"));
}

#[test]
fn clean_on_empty_project_exits_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    taskwright(dir.path())
        .args(["--app-name", "taskwright-clean-test-absent", "clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean complete"));
}

#[test]
fn run_without_environment_fails_before_serving() {
    let dir = project();
    let output = taskwright(dir.path())
        .args(["--json", "run"])
        .output()
        .expect("run");
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    let steps = report["steps"].as_array().expect("steps");
    assert!(steps
        .iter()
        .all(|s| !s["command"].as_str().unwrap_or("").contains("uvicorn")));
}

#[test]
fn install_dry_run_lists_provisioning_steps() {
    let dir = project();
    taskwright(dir.path())
        .args(["--dry-run", "install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pyenv install --skip-existing 3.12.4"))
        .stdout(predicate::str::contains("PIPENV_VENV_IN_PROJECT=1 pipenv install --dev"));
}

#[test]
fn check_dry_run_orders_steps() {
    let dir = project();
    let output = taskwright(dir.path())
        .args(["--dry-run", "check"])
        .output()
        .expect("check");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    let isort = text.find("isort src").expect("isort");
    let black = text.find("black src").expect("black");
    let flake8 = text.find("flake8 src").expect("flake8");
    let mypy = text.find("mypy src").expect("mypy");
    assert!(isort < black && black < flake8 && flake8 < mypy);
}
