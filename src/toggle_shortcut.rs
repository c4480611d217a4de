use tauri::{plugin::TauriPlugin, AppHandle, Wry};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

use crate::{append_desktop_log, window_actions, TOGGLE_SHORTCUT};

pub(crate) fn plugin() -> TauriPlugin<Wry> {
    tauri_plugin_global_shortcut::Builder::new()
        .with_handler(|app_handle, _shortcut, event| {
            if event.state() == ShortcutState::Pressed {
                window_actions::toggle_main_window(app_handle, append_desktop_log);
            }
        })
        .build()
}

pub(crate) fn register_toggle_shortcut<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    match app_handle.global_shortcut().register(TOGGLE_SHORTCUT) {
        Ok(()) => log(&format!("registered global shortcut {TOGGLE_SHORTCUT}")),
        Err(error) => log(&format!(
            "failed to register global shortcut {TOGGLE_SHORTCUT}: {error}"
        )),
    }
}

pub(crate) fn unregister_all_shortcuts<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    if let Err(error) = app_handle.global_shortcut().unregister_all() {
        log(&format!("failed to unregister global shortcuts: {error}"));
    }
}
