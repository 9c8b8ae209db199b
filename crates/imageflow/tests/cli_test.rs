#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 外部から影響を受ける環境変数
const ISOLATED_VARS: &[&str] = &[
    "CIRCLECI",
    "CIRCLE_BRANCH",
    "IMAGEFLOW_CONFIG_PATH",
    "DATASOURCE",
    "LOOKUP_NAME",
    "LOOKUP_TYPE",
    "VERSION_SCHEME",
    "START_VERSION",
    "IMAGE",
    "BUILD_ARG",
    "IGNORED_VERSIONS",
    "BUILD_ONLY",
    "LAST_ONLY",
    "LATEST_ONLY",
    "FORCE",
    "FORCE_UNSTABLE",
    "DOCKER_BIN",
    "DOCKERFILE",
    "TAG_CHECK",
    "HUB_API",
];

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("releases.json"),
            r#"{
                "releases": [
                    {"version": "v1.0.0"},
                    {"version": "1.1.0"},
                    {"version": "2.0.0-rc.1"},
                    {"version": "not-a-version"}
                ]
            }"#,
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn releases(&self) -> String {
        self.path().join("releases.json").display().to_string()
    }

    fn docker_log(&self) -> PathBuf {
        self.path().join("docker.log")
    }

    /// 呼び出しを記録し、`fail_version` のビルドだけ失敗する docker の代替
    #[cfg(unix)]
    fn fake_docker(&self, fail_version: Option<&str>) -> String {
        use std::os::unix::fs::PermissionsExt;

        let fail = fail_version
            .map(|v| format!("case \"$*\" in build*={v}\\ *) echo \"build failed\" >&2; exit 1;; esac\n"))
            .unwrap_or_default();
        let script = format!(
            "#!/bin/sh\necho \"$*\" >> \"{}\"\n{}echo \"ok $1\"\n",
            self.docker_log().display(),
            fail
        );

        let path = self.path().join("fake-docker");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    fn docker_calls(&self) -> Vec<String> {
        fs::read_to_string(self.docker_log())
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("imageflow").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env("RUST_LOG", "warn")
            .env("NO_COLOR", "1");
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    fn file_source_args(&self, subcommand: &str) -> Command {
        let mut cmd = self.command();
        cmd.args([
            subcommand,
            "--datasource",
            "file",
            "--lookup-name",
            &self.releases(),
            "--image",
            "renovate/yarn",
            "--force",
        ]);
        cmd
    }
}

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    let ws = Workspace::new();
    ws.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_cli_version() {
    let ws = Workspace::new();
    ws.command()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("imageflow"));
}

#[test]
fn test_build_help_lists_options() {
    let ws = Workspace::new();
    ws.command()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--datasource"))
        .stdout(predicate::str::contains("--last-only"))
        .stdout(predicate::str::contains("--force-unstable"));
}

#[test]
fn test_plan_json() {
    let ws = Workspace::new();
    let output = ws
        .file_source_args("plan")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let plan: serde_json::Value = serde_json::from_slice(&output).unwrap();
    // force のみ: 安定版すべて + 最新の不安定版
    assert_eq!(
        plan["versions"],
        serde_json::json!(["1.0.0", "1.1.0", "2.0.0-rc.1"])
    );
    assert_eq!(plan["latestStableVersion"], "1.1.0");
}

#[test]
fn test_plan_reads_config_file() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("imageflow.yaml"),
        format!(
            "datasource: file\nlookup_name: {}\nimage: renovate/yarn\nforce: true\nlast_only: true\n",
            ws.releases()
        ),
    )
    .unwrap();

    ws.command()
        .args(["plan", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.0.0-rc.1"))
        .stdout(predicate::str::contains("1.0.0").not());
}

#[test]
fn test_config_path_env_var_is_used() {
    let ws = Workspace::new();
    let config = ws.path().join("custom.yaml");
    fs::write(
        &config,
        format!(
            "datasource: file\nlookup_name: {}\nimage: renovate/yarn\nforce: true\n",
            ws.releases()
        ),
    )
    .unwrap();

    ws.command()
        .args(["plan", "--json"])
        .env("IMAGEFLOW_CONFIG_PATH", &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("1.1.0"));
}

#[test]
fn test_missing_config_path_env_var_falls_back() {
    let ws = Workspace::new();
    ws.file_source_args("plan")
        .arg("--json")
        .env("IMAGEFLOW_CONFIG_PATH", ws.path().join("missing.yaml"))
        .env("RUST_LOG", "warn")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.1.0"))
        .stderr(predicate::str::contains("missing file"));
}

#[test]
fn test_missing_explicit_config_is_error() {
    let ws = Workspace::new();
    ws.file_source_args("plan")
        .args(["--config", "missing.yaml"])
        .assert()
        .failure();
}

#[test]
fn test_missing_required_config() {
    let ws = Workspace::new();
    ws.command()
        .args(["plan", "--datasource", "npm", "--lookup-name", "yarn"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IMAGE"));
}

#[test]
fn test_image_with_tag_is_rejected() {
    let ws = Workspace::new();
    ws.command()
        .args([
            "plan",
            "--datasource",
            "npm",
            "--lookup-name",
            "yarn",
            "--image",
            "renovate/yarn:latest",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("タグを含めないでください"));
}

#[test]
fn test_lookup_failure_is_fatal() {
    let ws = Workspace::new();
    ws.command()
        .args([
            "build",
            "--datasource",
            "file",
            "--lookup-name",
            "missing.json",
            "--image",
            "renovate/yarn",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error in imageflow"));
}

#[test]
fn test_unknown_datasource_is_fatal() {
    let ws = Workspace::new();
    ws.command()
        .args([
            "plan",
            "--datasource",
            "pypi",
            "--lookup-name",
            "requests",
            "--image",
            "renovate/requests",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error in imageflow"));
}

#[cfg(unix)]
#[test]
fn test_build_and_push_all() {
    let ws = Workspace::new();
    let docker = ws.fake_docker(None);

    ws.file_source_args("build")
        .args(["--docker-bin", &docker])
        .assert()
        .success()
        .stdout(predicate::str::contains("結果サマリー"));

    let calls = ws.docker_calls();
    assert_eq!(
        calls,
        vec![
            "build --build-arg YARN_VERSION=1.0.0 -t renovate/yarn:1.0.0 .",
            "push renovate/yarn:1.0.0",
            "build --build-arg YARN_VERSION=1.1.0 -t renovate/yarn:1.1.0 .",
            "push renovate/yarn:1.1.0",
            "tag renovate/yarn:1.1.0 renovate/yarn:latest",
            "push renovate/yarn:latest",
            "build --build-arg YARN_VERSION=2.0.0-rc.1 -t renovate/yarn:2.0.0-rc.1 .",
            "push renovate/yarn:2.0.0-rc.1",
        ]
    );
}

#[cfg(unix)]
#[test]
fn test_partial_failure_exits_non_zero() {
    let ws = Workspace::new();
    let docker = ws.fake_docker(Some("1.1.0"));

    ws.file_source_args("build")
        .args(["--docker-bin", &docker])
        .assert()
        .failure()
        .stdout(predicate::str::contains("ビルド失敗 (1): 1.1.0"));

    let calls = ws.docker_calls();
    // 失敗後も続行し、失敗したバージョンはプッシュしない
    assert!(calls.contains(&"push renovate/yarn:2.0.0-rc.1".to_string()));
    assert!(!calls.contains(&"push renovate/yarn:1.1.0".to_string()));
    assert!(!calls.iter().any(|c| c.contains(":latest")));
}

#[cfg(unix)]
#[test]
fn test_build_only_from_env() {
    let ws = Workspace::new();
    let docker = ws.fake_docker(None);

    ws.file_source_args("build")
        .env("BUILD_ONLY", "true")
        .env("DOCKER_BIN", &docker)
        .assert()
        .success();

    let calls = ws.docker_calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.starts_with("build ")));
}

#[cfg(unix)]
#[test]
fn test_ci_branch_builds_latest_only_without_push() {
    let ws = Workspace::new();
    let docker = ws.fake_docker(None);

    ws.command()
        .args([
            "build",
            "--datasource",
            "file",
            "--lookup-name",
            &ws.releases(),
            "--image",
            "renovate/yarn",
            "--docker-bin",
            &docker,
        ])
        .env("CIRCLECI", "true")
        .env("CIRCLE_BRANCH", "renovate/yarn-2.x")
        .assert()
        .success()
        .stderr(predicate::str::contains("CI のブランチビルドを検出"));

    assert_eq!(
        ws.docker_calls(),
        vec!["build --build-arg YARN_VERSION=2.0.0-rc.1 -t renovate/yarn:2.0.0-rc.1 ."]
    );
}

#[cfg(unix)]
#[test]
fn test_nothing_to_build_still_prints_summary() {
    let ws = Workspace::new();
    let releases = ws.path().join("empty.json");
    fs::write(&releases, r#"{"releases": [{"version": "nightly"}]}"#).unwrap();
    let docker = ws.fake_docker(None);

    ws.command()
        .args([
            "build",
            "--datasource",
            "file",
            "--lookup-name",
            &releases.display().to_string(),
            "--image",
            "renovate/yarn",
            "--docker-bin",
            &docker,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ビルドが必要なバージョンはありません"))
        .stdout(predicate::str::contains("ビルド成功 (0): -"))
        .stdout(predicate::str::contains("ビルド失敗 (0): -"));

    assert!(ws.docker_calls().is_empty());
}
