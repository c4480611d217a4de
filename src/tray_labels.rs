use tauri::{AppHandle, Manager};

use crate::{tray_actions, TrayMenuState, MAIN_WINDOW_LABEL};

pub fn update_tray_menu_labels<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    update_tray_menu_labels_with_visibility(app_handle, None, log);
}

pub fn update_tray_menu_labels_with_visibility<F>(
    app_handle: &AppHandle,
    visible_override: Option<bool>,
    log: F,
) where
    F: Fn(&str),
{
    let Some(tray_state) = app_handle.try_state::<TrayMenuState>() else {
        return;
    };

    let effective_visible = visible_override.unwrap_or_else(|| {
        app_handle
            .get_webview_window(MAIN_WINDOW_LABEL)
            .and_then(|window| window.is_visible().ok())
            .unwrap_or(false)
    });

    if let Err(error) = tray_state
        .toggle_item
        .set_text(tray_actions::toggle_label(effective_visible))
    {
        log(&format!(
            "failed to update tray menu text for {}: {}",
            tray_actions::TRAY_MENU_TOGGLE_WINDOW,
            error
        ));
    }
}
