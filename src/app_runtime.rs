use std::sync::Arc;

use tauri::{Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_startup_log, backend_supervisor::BackendSupervisor,
    entry_host::TauriEntryHost, exit_events, logging, main_window, quick_entry::QuickEntry,
    startup_task, toggle_shortcut, tray_setup, window_actions, BackendConfig, MAIN_WINDOW_LABEL,
};

pub(crate) fn run() {
    let dotenv_result = dotenvy::dotenv();
    logging::init_logging();
    if let Ok(path) = dotenv_result {
        append_startup_log(&format!("loaded environment from {}", path.display()));
    }

    let config = BackendConfig::from_env();
    append_startup_log(&format!(
        "desktop process starting, backend dir: {}",
        config.backend_dir.display()
    ));

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _args, _cwd| {
            append_desktop_log("second instance launched, focusing existing window");
            window_actions::show_main_window(app_handle, append_desktop_log);
        }))
        .plugin(toggle_shortcut::plugin())
        .manage(BackendSupervisor::new(config))
        .manage(exit_events::ExitCleanupState::default())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::hide_window,
            crate::desktop_bridge_commands::resize_window,
            crate::desktop_bridge_commands::get_backend_port,
            crate::desktop_bridge_commands::quick_entry_snapshot,
            crate::desktop_bridge_commands::quick_entry_set_text,
            crate::desktop_bridge_commands::quick_entry_submit,
            crate::desktop_bridge_commands::quick_entry_select_calendar,
            crate::desktop_bridge_commands::quick_entry_cycle_calendar,
        ])
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            match event {
                WindowEvent::CloseRequested { api, .. } => {
                    let app_handle = window.app_handle();
                    let state = app_handle.state::<BackendSupervisor>();
                    if state.is_quitting() {
                        return;
                    }

                    api.prevent_close();
                    window_actions::hide_main_window(app_handle, append_desktop_log);
                }
                WindowEvent::Focused(false) => {
                    window_actions::apply_visibility_trigger(
                        window.app_handle(),
                        window_actions::VisibilityTrigger::Blur,
                        append_desktop_log,
                    );
                }
                _ => {}
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            app.manage(QuickEntry::new(Arc::new(TauriEntryHost::new(
                app_handle.clone(),
            ))));

            main_window::create_main_window(&app_handle, append_startup_log)?;

            if let Err(error) = tray_setup::setup_tray(&app_handle) {
                append_startup_log(&format!("failed to initialize tray: {error}"));
            }
            toggle_shortcut::register_toggle_shortcut(&app_handle, append_startup_log);
            startup_task::spawn_startup_task(app_handle, append_startup_log);
            Ok(())
        })
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(error) => {
            append_startup_log(&format!("failed to build desktop application: {error}"));
            return;
        }
    };

    app.run(|app_handle, event| match event {
        RunEvent::ExitRequested { api, .. } => {
            exit_events::handle_exit_requested(app_handle, &api);
        }
        RunEvent::Exit => {
            exit_events::handle_exit_event(app_handle);
        }
        _ => {}
    });
}
