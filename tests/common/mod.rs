//! Common test utilities for ursync CLI tests.
//!
//! `TestEnv` isolates each test: its own config home, its own catalog, and
//! a fake `rsync` first on `PATH` that records its arguments instead of
//! transferring anything.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Exit status of the fake rsync (default 0).
pub const FAKE_RSYNC_EXIT: &str = "FAKE_RSYNC_EXIT";

const FAKE_RSYNC: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "rsync  version 3.2.7  protocol version 31"
    exit 0
fi
printf '%s\n' "$*" >> "$URSYNC_TEST_RSYNC_LOG"
exit "${FAKE_RSYNC_EXIT:-0}"
"#;

#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

pub struct TestEnv {
    pub root: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let env = Self {
            root,
            bin: PathBuf::from(env!("CARGO_BIN_EXE_ursync")),
        };
        fs::create_dir_all(env.config_dir()).expect("config dir");
        fs::create_dir_all(env.path("home")).expect("home dir");
        env.install_fake_rsync();
        env
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// `$XDG_CONFIG_HOME/ursync`
    pub fn config_dir(&self) -> PathBuf {
        self.path("config").join("ursync")
    }

    /// Create a directory under the test root and return its path as text.
    pub fn dir(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::create_dir_all(&path).expect("create dir");
        path.display().to_string()
    }

    /// Write the default catalog (`$XDG_CONFIG_HOME/ursync/sites.toml`).
    pub fn write_catalog(&self, content: &str) -> PathBuf {
        let path = self.config_dir().join("sites.toml");
        fs::write(&path, content).expect("write catalog");
        path
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.config_dir().join("config.toml");
        fs::write(&path, content).expect("write config");
        path
    }

    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, content).expect("write file");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap_or_default()
    }

    /// One line per fake rsync call (its argument list joined by spaces).
    pub fn rsync_calls(&self) -> Vec<String> {
        self.read("rsync.log").lines().map(str::to_string).collect()
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let path = format!(
            "{}:{}",
            self.path("bin").display(),
            std::env::var("PATH").unwrap_or_default()
        );

        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.root.path())
            .args(args)
            .env("PATH", path)
            .env("HOME", self.path("home"))
            .env("XDG_CONFIG_HOME", self.path("config"))
            .env("URSYNC_TEST_RSYNC_LOG", self.path("rsync.log"))
            .env("URSYNC_NO_COLOR", "1")
            .env("LANG", "C")
            .env_remove("URSYNC_CATALOG")
            .env_remove("URSYNC_VERBOSITY")
            .env_remove("URSYNC_PROBE_TIMEOUT")
            .env_remove("RUST_LOG");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        to_result(cmd.output().expect("failed to execute ursync"))
    }

    fn install_fake_rsync(&self) {
        let path = self.write_file("bin/rsync", FAKE_RSYNC);
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod");
    }
}

fn to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// A `local -> local` site with `-a`.
pub fn local_site(id: &str, source: &str, destination: &str) -> String {
    format!(
        r#"
[[site]]
id = "{id}"
name = "Site {id}"
source = {{ type = "local", path = "{source}" }}
destination = {{ type = "local", path = "{destination}" }}
flags = [{{ name = "a" }}]
"#
    )
}

/// Notification scripts that append `<outcome> <ids>` to `log`.
pub fn notifications(log: &Path) -> String {
    format!(
        r#"
[[notification]]
type = "success"
command = "echo success %ID >> {log}"

[[notification]]
type = "failure"
command = "echo failure %ID >> {log}"
"#,
        log = log.display()
    )
}
