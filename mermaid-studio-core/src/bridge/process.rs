//! The renderer child and everything it starts.
//!
//! mermaid-cli is a node script that launches a headless browser, and the
//! browser is started detached in its own session. Killing the direct child
//! is not enough: on cancel, timeout or drop the whole tree goes, found by
//! parent PID before anything is killed, plus the child's process group on
//! unix for anything that was reparented already.

use std::io;
use std::process::Output;

use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

pub(crate) struct RendererProcess {
    child: Child,
    pid: Option<u32>,
    reaped: bool,
}

impl RendererProcess {
    /// Spawn `command` as the leader of a new process group.
    pub(crate) fn spawn(command: &mut Command) -> io::Result<Self> {
        #[cfg(unix)]
        command.process_group(0);

        let child = command.kill_on_drop(true).spawn()?;
        let pid = child.id();
        Ok(Self {
            child,
            pid,
            reaped: false,
        })
    }

    /// Wait for exit while draining both pipes.
    pub(crate) async fn wait_with_output(&mut self) -> io::Result<Output> {
        let mut stdout = self.child.stdout.take();
        let mut stderr = self.child.stderr.take();

        let read_stdout = async {
            let mut buf = Vec::new();
            if let Some(pipe) = stdout.as_mut() {
                pipe.read_to_end(&mut buf).await?;
            }
            Ok::<_, io::Error>(buf)
        };
        let read_stderr = async {
            let mut buf = Vec::new();
            if let Some(pipe) = stderr.as_mut() {
                pipe.read_to_end(&mut buf).await?;
            }
            Ok::<_, io::Error>(buf)
        };

        let (status, stdout, stderr) =
            tokio::try_join!(self.child.wait(), read_stdout, read_stderr)?;
        self.reaped = true;

        Ok(Output {
            status,
            stdout,
            stderr,
        })
    }

    /// Kill the whole tree and reap the direct child.
    pub(crate) async fn terminate(&mut self) {
        if let Some(pid) = self.pid {
            kill_tree(pid);
        }
        if let Err(e) = self.child.kill().await {
            tracing::debug!("Renderer already gone: {}", e);
        }
        self.reaped = true;
    }
}

impl Drop for RendererProcess {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        if let Some(pid) = self.pid {
            kill_tree(pid);
        }
    }
}

/// SIGKILL `root`, its descendants and its process group.
fn kill_tree(root: u32) {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let root = Pid::from_u32(root);
    let mut tree = vec![root];
    let mut next = 0;
    while next < tree.len() {
        let parent = tree[next];
        for (pid, process) in system.processes() {
            if process.parent() == Some(parent) && !tree.contains(pid) {
                tree.push(*pid);
            }
        }
        next += 1;
    }

    // Leaves first, so nothing gets a chance to respawn a child.
    for pid in tree.iter().rev() {
        if let Some(process) = system.process(*pid) {
            let _ = process.kill();
        }
    }

    kill_group(root.as_u32());

    if tree.len() > 1 {
        tracing::debug!("Killed renderer tree of {} processes", tree.len());
    }
}

#[cfg(unix)]
fn kill_group(leader: u32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid as UnixPid;

    let Ok(raw) = i32::try_from(leader) else {
        return;
    };
    // ESRCH just means the group is already empty.
    if let Err(e) = killpg(UnixPid::from_raw(raw), Signal::SIGKILL) {
        tracing::trace!("killpg({}): {}", raw, e);
    }
}

#[cfg(not(unix))]
fn kill_group(_leader: u32) {}
