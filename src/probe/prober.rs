//! Prober port
//!
//! Abstracts the external collaborators the resolver consults (network
//! reachability, remote shell, mount table, device metadata) so resolution
//! can be tested without a network or attached devices.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::remote::RemoteSpec;

/// Default per-probe timeout (seconds)
pub const DEFAULT_PROBE_TIMEOUT: u64 = 5;

/// Credentials for ssh-based probes.
#[derive(Debug, Clone, Copy)]
pub struct SshAuth<'a> {
    pub port: &'a str,
    pub key: &'a str,
}

/// External reachability checks.
///
/// Implementations:
/// - `SystemProber` - runs ping, ssh and gio
/// - test fakes with scripted answers
pub trait Prober {
    /// Low-latency reachability check of a host.
    fn ping(&self, host: &str) -> bool;

    /// Whether `remote.path` is a directory on the remote host.
    fn remote_dir_exists(&self, remote: &RemoteSpec, auth: SshAuth<'_>) -> bool;

    /// Whether `path` is a mount point.
    fn is_mount_point(&self, path: &Path) -> bool;

    /// Device metadata for a path or URI. Failures return the error output
    /// so that two failing queries can still be compared.
    fn device_info(&self, location: &str) -> String;

    /// Numeric id of the current user (for session-specific gvfs paths).
    fn uid(&self) -> u32;
}

/// Prober backed by the real system tools.
#[derive(Debug, Clone)]
pub struct SystemProber {
    timeout: Duration,
}

impl Default for SystemProber {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_PROBE_TIMEOUT))
    }
}

impl SystemProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_secs(&self) -> String {
        self.timeout.as_secs().max(1).to_string()
    }
}

impl Prober for SystemProber {
    fn ping(&self, host: &str) -> bool {
        let mut cmd = Command::new("ping");
        cmd.args(["-c", "1", "-w", &self.timeout_secs(), host]);
        let reachable = run_bounded(cmd, self.timeout).is_some_and(|out| out.success);
        tracing::debug!(host, reachable, "ping probe");
        reachable
    }

    fn remote_dir_exists(&self, remote: &RemoteSpec, auth: SshAuth<'_>) -> bool {
        let mut cmd = Command::new("ssh");
        cmd.args(["-p", auth.port, "-i", auth.key])
            .args(["-o", "BatchMode=yes"])
            .arg("-o")
            .arg(format!("ConnectTimeout={}", self.timeout_secs()))
            .arg(remote.destination())
            .arg(remote.dir_test_command());
        let exists = run_bounded(cmd, self.timeout).is_some_and(|out| out.success);
        tracing::debug!(remote = %remote, exists, "remote directory probe");
        exists
    }

    fn is_mount_point(&self, path: &Path) -> bool {
        is_mount_point(path)
    }

    fn device_info(&self, location: &str) -> String {
        let mut cmd = Command::new("gio");
        cmd.args(["info", location]);
        match run_bounded(cmd, self.timeout) {
            Some(out) => out.output,
            None => format!("gio info {}: timed out", location),
        }
    }

    fn uid(&self) -> u32 {
        current_uid()
    }
}

/// Captured result of a bounded child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedOutput {
    pub success: bool,
    /// stdout followed by stderr
    pub output: String,
}

/// Run a command, killing it if it outlives `timeout`.
///
/// Returns `None` when the command cannot be spawned or times out; both are
/// negative probe results.
pub fn run_bounded(mut cmd: Command, timeout: Duration) -> Option<BoundedOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!(program = ?cmd.get_program(), error = %e, "probe spawn failed");
            return None;
        }
    };

    // read both pipes while waiting so a chatty probe cannot fill them and stall
    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let mut output = collect(stdout);
                output.push_str(&collect(stderr));
                return Some(BoundedOutput {
                    success: status.success(),
                    output,
                });
            }
            Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(25)),
            Ok(None) => {
                tracing::debug!(program = ?cmd.get_program(), "probe timed out");
                let _ = child.kill();
                let _ = child.wait();
                // readers finish once every holder of the pipe exits; not joined
                return None;
            }
            Err(_) => return None,
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let _ = pipe.read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// A path is a mount point when it sits on a different device than its
/// parent, or when it is its own parent (the filesystem root).
#[cfg(unix)]
pub fn is_mount_point(path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    let Ok(meta) = fs::symlink_metadata(path) else {
        return false;
    };
    if meta.file_type().is_symlink() || !meta.is_dir() {
        return false;
    }
    let Ok(parent) = fs::metadata(path.join("..")) else {
        return false;
    };
    meta.dev() != parent.dev() || meta.ino() == parent.ino()
}

#[cfg(not(unix))]
pub fn is_mount_point(path: &Path) -> bool {
    fs::metadata(path).is_ok() && path.parent().is_none()
}

#[cfg(unix)]
fn current_uid() -> u32 {
    rustix::process::getuid().as_raw()
}

#[cfg(not(unix))]
fn current_uid() -> u32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_a_mount_point() {
        #[cfg(unix)]
        assert!(is_mount_point(Path::new("/")));
    }

    #[test]
    fn plain_directory_is_not_a_mount_point() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        assert!(!is_mount_point(&nested));
    }

    #[test]
    fn missing_path_is_not_a_mount_point() {
        assert!(!is_mount_point(Path::new("/definitely/not/here")));
    }

    #[test]
    fn run_bounded_reports_exit_status() {
        #[cfg(unix)]
        {
            let ok = run_bounded(Command::new("true"), Duration::from_secs(5)).unwrap();
            assert!(ok.success);
            let failed = run_bounded(Command::new("false"), Duration::from_secs(5)).unwrap();
            assert!(!failed.success);
        }
    }

    #[test]
    fn run_bounded_captures_output() {
        #[cfg(unix)]
        {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", "echo out; echo err >&2"]);
            let out = run_bounded(cmd, Duration::from_secs(5)).unwrap();
            assert_eq!(out.output, "out\nerr\n");
        }
    }

    #[test]
    fn run_bounded_reads_output_larger_than_a_pipe_buffer() {
        #[cfg(unix)]
        {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", "head -c 200000 /dev/zero | tr '\\0' x"]);
            let started = Instant::now();
            let out = run_bounded(cmd, Duration::from_secs(5)).unwrap();
            assert!(out.success);
            assert_eq!(out.output.len(), 200_000);
            assert!(started.elapsed() < Duration::from_secs(5));
        }
    }

    #[test]
    fn run_bounded_kills_slow_commands() {
        #[cfg(unix)]
        {
            let mut cmd = Command::new("sleep");
            cmd.arg("10");
            let started = Instant::now();
            assert!(run_bounded(cmd, Duration::from_millis(200)).is_none());
            assert!(started.elapsed() < Duration::from_secs(5));
        }
    }

    #[test]
    fn missing_program_is_a_negative_result() {
        let cmd = Command::new("ursync-no-such-probe-binary");
        assert!(run_bounded(cmd, Duration::from_secs(1)).is_none());
    }
}
