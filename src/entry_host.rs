use tauri::{AppHandle, Emitter};

use crate::{
    append_desktop_log, entry_state::EntrySnapshot, quick_entry::EntryHost, window_actions,
    WindowSize, ENTRY_STATE_EVENT, MAIN_WINDOW_LABEL,
};

/// Routes controller output to the main webview and window.
pub(crate) struct TauriEntryHost {
    app_handle: AppHandle,
}

impl TauriEntryHost {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl EntryHost for TauriEntryHost {
    fn publish(&self, snapshot: &EntrySnapshot) {
        if let Err(error) = self
            .app_handle
            .emit_to(MAIN_WINDOW_LABEL, ENTRY_STATE_EVENT, snapshot)
        {
            append_desktop_log(&format!("failed to emit {ENTRY_STATE_EVENT}: {error}"));
        }
    }

    fn resize_window(&self, size: WindowSize) {
        window_actions::resize_main_window(&self.app_handle, size, append_desktop_log);
    }

    fn hide_window(&self) {
        window_actions::hide_main_window(&self.app_handle, append_desktop_log);
    }
}
