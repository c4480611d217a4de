use std::{
    process::{Child, Stdio},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread,
};

use crate::{
    append_backend_error_log, append_backend_log, backend_port, launch_plan, process_control,
    AtomicFlagGuard, BackendConfig, LaunchPlan, BACKEND_EXIT_POLL_INTERVAL,
};

#[derive(Debug, Default)]
struct TrackedBackend {
    child: Option<Child>,
    port: Option<u16>,
}

/// Owns the backend child process and the port it was started on.
#[derive(Debug)]
pub(crate) struct BackendSupervisor {
    config: BackendConfig,
    tracked: Arc<Mutex<TrackedBackend>>,
    is_spawning: AtomicBool,
    is_quitting: AtomicBool,
}

fn lock_tracked(tracked: &Mutex<TrackedBackend>) -> MutexGuard<'_, TrackedBackend> {
    tracked.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BackendSupervisor {
    pub(crate) fn new(config: BackendConfig) -> Self {
        Self {
            config,
            tracked: Arc::new(Mutex::new(TrackedBackend::default())),
            is_spawning: AtomicBool::new(false),
            is_quitting: AtomicBool::new(false),
        }
    }

    pub(crate) fn current_port(&self) -> Option<u16> {
        lock_tracked(&self.tracked).port
    }

    pub(crate) fn is_running(&self) -> bool {
        lock_tracked(&self.tracked).child.is_some()
    }

    pub(crate) fn is_spawning(&self) -> bool {
        self.is_spawning.load(Ordering::Acquire)
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.is_quitting.load(Ordering::Acquire)
    }

    pub(crate) fn mark_quitting(&self) {
        self.is_quitting.store(true, Ordering::Release);
    }

    /// Returns the port of the running backend, or `Ok(None)` when there is
    /// no backend directory to launch from.
    pub(crate) fn start(&self) -> Result<Option<u16>, String> {
        let Some(_spawn_guard) = AtomicFlagGuard::try_set(&self.is_spawning) else {
            return Err("Backend spawn already in progress.".to_string());
        };

        if let Some(port) = self.running_port() {
            return Ok(Some(port));
        }

        if !self.config.backend_dir.is_dir() {
            append_backend_error_log(&format!(
                "missing backend directory {}, skipping backend spawn",
                self.config.backend_dir.display()
            ));
            return Ok(None);
        }

        let port = backend_port::resolve_backend_port(self.config.port_override.as_deref());
        let plan = LaunchPlan::resolve(&self.config, port);
        lock_tracked(&self.tracked).port = Some(port);

        match self.spawn_backend(&plan) {
            Ok(()) => Ok(Some(port)),
            Err(error) => {
                lock_tracked(&self.tracked).port = None;
                append_backend_error_log(&format!("failed to start: {error}"));
                Err(error)
            }
        }
    }

    pub(crate) fn stop(&self) {
        let child = {
            let mut tracked = lock_tracked(&self.tracked);
            tracked.port = None;
            tracked.child.take()
        };
        if let Some(mut process) = child {
            append_backend_log(&format!("stopping backend process pid={}", process.id()));
            process_control::stop_child_process(&mut process);
        }
    }

    fn running_port(&self) -> Option<u16> {
        let tracked = lock_tracked(&self.tracked);
        tracked.child.as_ref().and(tracked.port)
    }

    fn spawn_backend(&self, plan: &LaunchPlan) -> Result<(), String> {
        let mut command = plan.command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|error| {
            format!(
                "Failed to spawn backend process with command {:?}: {}",
                launch_plan::build_debug_command(plan),
                error
            )
        })?;

        if let Some(stdout) = child.stdout.take() {
            process_control::forward_output_lines(stdout, "stdout", append_backend_log);
        }
        if let Some(stderr) = child.stderr.take() {
            process_control::forward_output_lines(stderr, "stderr", append_backend_error_log);
        }

        let pid = child.id();
        append_backend_log(&format!(
            "spawned backend pid={pid} port={} command={:?}",
            plan.port,
            launch_plan::build_debug_command(plan)
        ));
        lock_tracked(&self.tracked).child = Some(child);
        spawn_exit_watcher(Arc::clone(&self.tracked), pid);
        Ok(())
    }
}

fn spawn_exit_watcher(tracked: Arc<Mutex<TrackedBackend>>, pid: u32) {
    let spawn_result = thread::Builder::new()
        .name("backend-exit-watcher".to_string())
        .spawn(move || loop {
            thread::sleep(BACKEND_EXIT_POLL_INTERVAL);

            let mut guard = lock_tracked(&tracked);
            let Some(child) = guard.child.as_mut().filter(|child| child.id() == pid) else {
                // Stopped or replaced by a newer spawn.
                return;
            };
            match child.try_wait() {
                Ok(Some(status)) => {
                    guard.child = None;
                    guard.port = None;
                    drop(guard);
                    match status.code() {
                        Some(code) => append_backend_log(&format!("exited with code {code}")),
                        None => append_backend_log(&format!("exited: {status}")),
                    }
                    return;
                }
                Ok(None) => {}
                Err(error) => {
                    drop(guard);
                    append_backend_error_log(&format!(
                        "failed to poll backend process status: {error}"
                    ));
                    return;
                }
            }
        });
    if let Err(error) = spawn_result {
        append_backend_error_log(&format!("failed to spawn backend exit watcher: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf, time::Duration};

    use super::*;

    fn supervisor_for(backend_dir: PathBuf, python: &str) -> BackendSupervisor {
        BackendSupervisor::new(BackendConfig {
            backend_dir,
            python_override: Some(python.to_string()),
            port_override: Some("5999".to_string()),
        })
    }

    #[test]
    fn start_skips_spawn_when_backend_dir_is_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let supervisor = supervisor_for(dir.path().join("missing"), "python3");

        assert_eq!(supervisor.start(), Ok(None));
        assert_eq!(supervisor.current_port(), None);
        assert!(!supervisor.is_running());
    }

    #[test]
    fn spawn_failure_leaves_supervisor_retryable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let supervisor = supervisor_for(
            dir.path().to_path_buf(),
            "/definitely/not/a/python/interpreter",
        );

        let error = supervisor.start().expect_err("spawn should fail");
        assert!(error.contains("Failed to spawn backend process"));
        assert_eq!(supervisor.current_port(), None);
        assert!(!supervisor.is_spawning());
        assert!(supervisor.start().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn child_exit_clears_tracked_process_and_port() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("app.py"), "").expect("write entrypoint");
        // `sh -u app.py` runs the empty script and exits immediately.
        let supervisor = supervisor_for(dir.path().to_path_buf(), "sh");

        assert_eq!(supervisor.start(), Ok(Some(5999)));

        let mut cleared = false;
        for _ in 0..40 {
            if supervisor.current_port().is_none() && !supervisor.is_running() {
                cleared = true;
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
        assert!(cleared, "exit watcher should clear state after child exit");
    }

    #[cfg(unix)]
    #[test]
    fn stop_terminates_running_child() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("app.py"), "sleep 30\n").expect("write entrypoint");
        let supervisor = supervisor_for(dir.path().to_path_buf(), "sh");

        assert_eq!(supervisor.start(), Ok(Some(5999)));
        assert!(supervisor.is_running());
        assert_eq!(supervisor.start(), Ok(Some(5999)));

        supervisor.stop();
        assert!(!supervisor.is_running());
        assert_eq!(supervisor.current_port(), None);
    }
}
