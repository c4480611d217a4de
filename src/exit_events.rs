use std::sync::atomic::{AtomicBool, Ordering};

use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{append_shutdown_log, backend_supervisor::BackendSupervisor, toggle_shortcut};

/// Set once teardown has run so `ExitRequested` followed by `Exit` cleans up once.
#[derive(Default)]
pub(crate) struct ExitCleanupState {
    done: AtomicBool,
}

impl ExitCleanupState {
    fn try_begin(&self) -> bool {
        !self.done.swap(true, Ordering::AcqRel)
    }
}

fn run_exit_cleanup(app_handle: &AppHandle, reason: &str) {
    if let Some(cleanup) = app_handle.try_state::<ExitCleanupState>() {
        if !cleanup.try_begin() {
            return;
        }
    }

    let supervisor = app_handle.state::<BackendSupervisor>();
    supervisor.mark_quitting();
    if supervisor.is_running() {
        append_shutdown_log(&format!("{reason}, stopping backend"));
        supervisor.stop();
    } else {
        append_shutdown_log(&format!("{reason}, no backend to stop"));
    }
    toggle_shortcut::unregister_all_shortcuts(app_handle, append_shutdown_log);
}

pub(crate) fn handle_exit_requested(app_handle: &AppHandle, _api: &ExitRequestApi) {
    run_exit_cleanup(app_handle, "exit requested");
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    run_exit_cleanup(app_handle, "exit event received");
}
