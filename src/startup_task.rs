use std::{sync::Arc, thread};

use tauri::{AppHandle, Manager};

use crate::{
    backend_config::backend_base_url, backend_http::BackendClient,
    backend_supervisor::BackendSupervisor, quick_entry::QuickEntry,
    RENDERER_BACKEND_PORT_FALLBACK,
};

/// Port the renderer talks to. Without a supervised backend the controller
/// assumes one was started by hand on the renderer's default port.
pub(crate) fn renderer_backend_port(started_port: Option<u16>) -> u16 {
    started_port.unwrap_or(RENDERER_BACKEND_PORT_FALLBACK)
}

pub(crate) fn connect_quick_entry<F>(app_handle: &AppHandle, port: u16, log: F)
where
    F: Fn(&str),
{
    let client = match backend_base_url(port)
        .and_then(|url| BackendClient::new(url).map_err(|error| error.to_string()))
    {
        Ok(client) => client,
        Err(error) => {
            log(&format!("failed to build backend client for port {port}: {error}"));
            return;
        }
    };
    log(&format!("quick entry connected to {}", client.base_url()));

    let quick_entry = app_handle.state::<QuickEntry>().inner().clone();
    tauri::async_runtime::spawn(async move {
        quick_entry.attach_backend(Arc::new(client));
    });
}

/// Starts the backend off the main thread, then points the quick-entry
/// controller at whichever port it ended up on.
pub(crate) fn spawn_startup_task<F>(app_handle: AppHandle, log: F)
where
    F: Fn(&str) + Send + 'static,
{
    thread::spawn(move || {
        let supervisor = app_handle.state::<BackendSupervisor>();
        let started_port = match supervisor.start() {
            Ok(Some(port)) => {
                log(&format!("backend launched on port {port}"));
                Some(port)
            }
            Ok(None) => {
                log("backend directory not found, expecting an externally started backend");
                None
            }
            Err(error) => {
                log(&format!("backend launch failed: {error}"));
                None
            }
        };

        connect_quick_entry(&app_handle, renderer_backend_port(started_port), &log);
    });
}
