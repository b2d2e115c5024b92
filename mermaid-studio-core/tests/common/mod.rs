//! Fake renderers: small shell scripts that accept mermaid-cli's flags and
//! behave in one scripted way, so the bridge can be tested without mmdc.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub struct FakeRenderer {
    pub dir: TempDir,
    pub script: PathBuf,
}

impl FakeRenderer {
    /// Arguments from the last invocation, one per line.
    pub fn args_log(&self) -> PathBuf {
        self.dir.path().join("args.txt")
    }

    /// Copy of the scratch input as the renderer saw it.
    pub fn input_log(&self) -> PathBuf {
        self.dir.path().join("input.mmd")
    }

    pub fn pid_file(&self) -> PathBuf {
        self.dir.path().join("pid")
    }

    pub fn logged_args(&self) -> Vec<String> {
        std::fs::read_to_string(self.args_log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn logged_pid(&self) -> Option<u32> {
        std::fs::read_to_string(self.pid_file())
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::new(width, height).save(path).unwrap();
}

fn install(dir: TempDir, body: &str) -> FakeRenderer {
    let script = dir.path().join("fake-mmdc");
    std::fs::write(&script, body).unwrap();
    make_executable(&script);
    FakeRenderer { dir, script }
}

#[cfg(unix)]
pub fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

fn header(dir: &Path) -> String {
    format!(
        r#"#!/bin/sh
printf '%s\n' "$@" > '{args}'
echo $$ > '{pid}'
in=""
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -i) in="$2"; shift 2 ;;
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
"#,
        args = dir.join("args.txt").display(),
        pid = dir.join("pid").display(),
    )
}

/// Copies the input aside and writes a `width`×`height` PNG to `-o`.
pub fn succeeding(width: u32, height: u32) -> FakeRenderer {
    succeeding_after(Duration::ZERO, width, height)
}

/// Like `succeeding`, but sleeps first.
pub fn succeeding_after(delay: Duration, width: u32, height: u32) -> FakeRenderer {
    let dir = TempDir::new().unwrap();
    let fixture = dir.path().join("fixture.png");
    write_png(&fixture, width, height);

    let mut body = header(dir.path());
    if !delay.is_zero() {
        body.push_str(&format!("sleep {}\n", delay.as_secs_f64()));
    }
    body.push_str(&format!(
        "cp \"$in\" '{input}'\ncp '{fixture}' \"$out\"\n",
        input = dir.path().join("input.mmd").display(),
        fixture = fixture.display(),
    ));
    install(dir, &body)
}

/// Prints `stderr` verbatim on the error stream and exits with `code`.
pub fn failing(stderr: &str, code: i32) -> FakeRenderer {
    let dir = TempDir::new().unwrap();
    let mut body = header(dir.path());
    let quoted = stderr.replace('\'', r"'\''");
    body.push_str(&format!("printf '%s' '{}' >&2\nexit {}\n", quoted, code));
    install(dir, &body)
}

/// Exits 0 without writing anything.
pub fn silent() -> FakeRenderer {
    let dir = TempDir::new().unwrap();
    let mut body = header(dir.path());
    body.push_str("exit 0\n");
    install(dir, &body)
}

/// Never finishes. `exec` so the recorded PID is the process that hangs.
pub fn hanging() -> FakeRenderer {
    let dir = TempDir::new().unwrap();
    let mut body = header(dir.path());
    body.push_str("exec sleep 60\n");
    install(dir, &body)
}

/// Never finishes, and leaves a background helper in the tree the way
/// mermaid-cli leaves a browser. The helper's PID lands in `helper_pid`.
pub fn hanging_with_helper() -> FakeRenderer {
    hanging_with("sleep 60 &\necho $! > '{helper}'\nwait\n")
}

/// Like `hanging_with_helper`, but the helper starts its own session, as a
/// detached browser does, so it is outside the renderer's process group.
pub fn hanging_with_detached_helper() -> FakeRenderer {
    hanging_with("setsid sleep 60 &\necho $! > '{helper}'\nwait\n")
}

fn hanging_with(tail: &str) -> FakeRenderer {
    let dir = TempDir::new().unwrap();
    let mut body = header(dir.path());
    body.push_str(&tail.replace("{helper}", &dir.path().join("helper_pid").display().to_string()));
    install(dir, &body)
}

/// True once `pid` is gone or only a zombie awaiting reaping.
#[cfg(target_os = "linux")]
pub fn process_gone(pid: u32) -> bool {
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Err(_) => true,
        Ok(stat) => stat
            .rsplit_once(')')
            .map(|(_, rest)| rest.trim_start().starts_with('Z'))
            .unwrap_or(false),
    }
}

/// Poll until the renderer has written its PID.
pub async fn wait_for_pid(fake: &FakeRenderer) -> u32 {
    wait_for_pid_file(&fake.pid_file()).await
}

/// Poll until the renderer's background helper has started.
pub async fn wait_for_helper(fake: &FakeRenderer) -> u32 {
    wait_for_pid_file(&fake.dir.path().join("helper_pid")).await
}

async fn wait_for_pid_file(path: &Path) -> u32 {
    for _ in 0..200 {
        let pid = std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok());
        if let Some(pid) = pid {
            return pid;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("{} never written", path.display());
}

/// Poll `process_gone` for up to five seconds.
#[cfg(target_os = "linux")]
pub async fn wait_until_gone(pid: u32) -> bool {
    for _ in 0..100 {
        if process_gone(pid) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

/// Kill a leftover test process so a failing test does not leak it.
#[cfg(unix)]
pub fn reap(pid: u32) {
    let _ = std::process::Command::new("kill").arg("-9").arg(pid.to_string()).status();
}
