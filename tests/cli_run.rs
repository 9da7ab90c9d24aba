#![cfg(unix)]

mod common;

use std::fs;

use common::*;

#[test]
fn run_transfers_sites_in_order_and_notifies_once() {
    let env = TestEnv::new();
    let src = env.dir("src");
    let dst = env.dir("dst");
    let log = env.path("notify.log");
    let mut catalog = notifications(&log);
    catalog.push_str(&local_site("b", &src, &dst));
    catalog.push_str(&local_site("a", &src, &dst));
    env.write_catalog(&catalog);

    let result = env.run(&["run", "b", "a"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(
        env.rsync_calls(),
        [format!("-a {}/ {}", src, dst), format!("-a {}/ {}", src, dst)]
    );
    assert_eq!(env.read("notify.log"), "success b, a\n");
}

#[test]
fn run_with_failing_rsync_exits_nonzero_and_sends_failure() {
    let env = TestEnv::new();
    let src = env.dir("src");
    let dst = env.dir("dst");
    let log = env.path("notify.log");
    let mut catalog = notifications(&log);
    catalog.push_str(&local_site("docs", &src, &dst));
    env.write_catalog(&catalog);

    let result = env.run_with_env(&["run", "docs"], &[(FAKE_RSYNC_EXIT, "23")]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("docs failed"), "{}", result.stderr);
    assert_eq!(env.read("notify.log"), "failure docs\n");
}

#[test]
fn run_rejects_unknown_sites_before_transferring() {
    let env = TestEnv::new();
    let src = env.dir("src");
    env.write_catalog(&local_site("docs", &src, &src));

    let result = env.run(&["run", "docs", "nope"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("site 'nope' does not exist in the catalog"));
    assert!(env.rsync_calls().is_empty());
}

#[test]
fn run_dry_run_passes_the_flag_through() {
    let env = TestEnv::new();
    let src = env.dir("src");
    let dst = env.dir("dst");
    env.write_catalog(&local_site("docs", &src, &dst));

    let result = env.run(&["run", "-n", "docs"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(env.rsync_calls(), [format!("-a --dry-run {}/ {}", src, dst)]);
    assert!(result.stderr.contains("No success notification script found"));
}

#[test]
fn run_snapshot_rotates_the_last_link() {
    let env = TestEnv::new();
    let src = env.dir("src");
    let dst = env.dir("backup");
    env.dir("backup/daily.0");
    env.write_catalog(&format!(
        r#"
[[site]]
id = "snap"
name = "Snapshots"
source = {{ type = "local", path = "{src}" }}
destination = {{ type = "local", path = "{dst}", snapshot = true }}
params = {{ snap_base = "daily." }}
"#
    ));

    let result = env.run(&["run", "snap"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(
        env.rsync_calls(),
        [format!(
            "--link-dest {dst}/last {src}/ {dst}/daily.1",
            src = src,
            dst = dst
        )]
    );
    let link = fs::read_link(env.path("backup/last")).unwrap();
    assert_eq!(link.display().to_string(), format!("{}/daily.1", dst));
}

#[test]
fn run_without_a_terminal_skips_prompted_sites() {
    let env = TestEnv::new();
    let src = env.dir("src");
    let dst = env.dir("dst");
    let log = env.path("notify.log");
    let mut catalog = notifications(&log);
    catalog.push_str(&local_site("docs", &src, &dst));
    env.write_catalog(&catalog);

    let result = env.run(&["run", "-p", "docs"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stderr.contains("Skipping all commands"));
    assert!(env.rsync_calls().is_empty());
    assert!(!log.exists());
}

#[test]
fn run_json_streams_events() {
    let env = TestEnv::new();
    let src = env.dir("src");
    let dst = env.dir("dst");
    env.write_catalog(&local_site("docs", &src, &dst));

    let result = env.run(&["--json", "run", "docs"]);

    assert!(result.success, "{}", result.combined_output());
    let events: Vec<serde_json::Value> = result
        .stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let names: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        [
            "start",
            "compiled",
            "invocation_started",
            "site_finished",
            "notification_missing",
            "complete"
        ]
    );
    assert_eq!(events[5]["exit_code"], 0);
}

#[test]
fn run_without_rsync_is_fatal() {
    let env = TestEnv::new();
    let src = env.dir("src");
    env.write_catalog(&local_site("docs", &src, &src));
    fs::remove_file(env.path("bin/rsync")).unwrap();

    let result = env.run_with_env(&["run", "docs"], &[("PATH", "/nonexistent")]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("rsync not found"), "{}", result.stderr);
}
