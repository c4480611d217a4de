use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, backend_supervisor::BackendSupervisor, entry_state::EntrySnapshot,
    quick_entry::QuickEntry, window_actions, ResizePayload,
};

fn quick_entry(app_handle: &AppHandle) -> QuickEntry {
    app_handle.state::<QuickEntry>().inner().clone()
}

#[tauri::command]
pub(crate) fn hide_window(app_handle: AppHandle) {
    window_actions::hide_main_window(&app_handle, append_desktop_log);
}

#[tauri::command]
pub(crate) fn resize_window(app_handle: AppHandle, payload: ResizePayload) {
    let Some(size) = payload.size() else {
        append_desktop_log("resize_window ignored: width and height are both required");
        return;
    };
    window_actions::resize_main_window(&app_handle, size, append_desktop_log);
}

#[tauri::command]
pub(crate) fn get_backend_port(app_handle: AppHandle) -> Option<u16> {
    app_handle.state::<BackendSupervisor>().current_port()
}

#[tauri::command]
pub(crate) fn quick_entry_snapshot(app_handle: AppHandle) -> EntrySnapshot {
    quick_entry(&app_handle).snapshot()
}

#[tauri::command]
pub(crate) async fn quick_entry_set_text(app_handle: AppHandle, text: String, seq: u64) {
    quick_entry(&app_handle).set_text(text, seq);
}

#[tauri::command]
pub(crate) async fn quick_entry_submit(app_handle: AppHandle) {
    quick_entry(&app_handle).submit().await;
}

#[tauri::command]
pub(crate) async fn quick_entry_select_calendar(app_handle: AppHandle, calendar_id: String) {
    quick_entry(&app_handle).select_calendar(calendar_id).await;
}

#[tauri::command]
pub(crate) async fn quick_entry_cycle_calendar(app_handle: AppHandle, step: i32) {
    quick_entry(&app_handle).cycle_calendar(step).await;
}
