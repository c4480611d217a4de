use std::thread;

use tauri::{AppHandle, Manager};

use crate::{
    append_backend_error_log, append_desktop_log, append_shutdown_log,
    backend_supervisor::BackendSupervisor, startup_task, tray_actions, window_actions,
    TrayMenuState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrayRestartDecision {
    IgnoreBecauseSpawnInProgress,
    ProceedWithRestart,
}

fn decide_tray_restart(spawn_in_progress: bool) -> TrayRestartDecision {
    if spawn_in_progress {
        TrayRestartDecision::IgnoreBecauseSpawnInProgress
    } else {
        TrayRestartDecision::ProceedWithRestart
    }
}

fn set_restart_item_enabled(app_handle: &AppHandle, enabled: bool) {
    let Some(tray_state) = app_handle.try_state::<TrayMenuState>() else {
        return;
    };
    if let Err(error) = tray_state.restart_backend_item.set_enabled(enabled) {
        append_desktop_log(&format!(
            "failed to update tray menu state for {}: {error}",
            tray_actions::TRAY_MENU_RESTART_BACKEND
        ));
    }
}

fn restart_backend(app_handle: &AppHandle) {
    let state = app_handle.state::<BackendSupervisor>();
    match decide_tray_restart(state.is_spawning()) {
        TrayRestartDecision::IgnoreBecauseSpawnInProgress => {
            append_desktop_log("tray restart ignored: backend spawn already in progress");
            return;
        }
        TrayRestartDecision::ProceedWithRestart => {}
    }
    append_desktop_log("tray requested backend restart");
    set_restart_item_enabled(app_handle, false);

    let app_handle = app_handle.clone();
    thread::spawn(move || {
        let supervisor = app_handle.state::<BackendSupervisor>();
        supervisor.stop();
        let started_port = match supervisor.start() {
            Ok(port) => port,
            Err(error) => {
                append_backend_error_log(&format!("backend restart from tray failed: {error}"));
                None
            }
        };
        startup_task::connect_quick_entry(
            &app_handle,
            startup_task::renderer_backend_port(started_port),
            append_desktop_log,
        );
        set_restart_item_enabled(&app_handle, true);
    });
}

pub fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::ToggleWindow) => {
            window_actions::toggle_main_window(app_handle, append_desktop_log)
        }
        Some(tray_actions::TrayMenuAction::RestartBackend) => restart_backend(app_handle),
        Some(tray_actions::TrayMenuAction::Quit) => {
            let state = app_handle.state::<BackendSupervisor>();
            state.mark_quitting();
            append_shutdown_log("tray quit requested, exiting desktop process");
            app_handle.exit(0);
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::{decide_tray_restart, TrayRestartDecision};

    #[test]
    fn decide_tray_restart_blocks_while_spawn_in_progress() {
        assert_eq!(
            decide_tray_restart(true),
            TrayRestartDecision::IgnoreBecauseSpawnInProgress
        );
    }

    #[test]
    fn decide_tray_restart_allows_when_idle() {
        assert_eq!(
            decide_tray_restart(false),
            TrayRestartDecision::ProceedWithRestart
        );
    }
}
