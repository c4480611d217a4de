#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod backend_config;
mod backend_http;
mod backend_port;
mod backend_supervisor;
mod calendar_options;
mod calendar_retry;
mod desktop_bridge_commands;
mod entry_host;
mod entry_state;
mod exit_events;
mod http_response;
mod launch_plan;
mod logging;
mod main_window;
mod process_control;
mod quick_entry;
mod startup_task;
mod toggle_shortcut;
mod tray_actions;
mod tray_labels;
mod tray_menu_handler;
mod tray_setup;
mod window_actions;

pub(crate) use app_constants::*;
pub(crate) use app_types::{AtomicFlagGuard, ResizePayload, TrayMenuState, WindowSize};
pub(crate) use backend_config::BackendConfig;
pub(crate) use launch_plan::LaunchPlan;
pub(crate) use logging::{
    append_backend_error_log, append_backend_log, append_desktop_log, append_shutdown_log,
    append_startup_log,
};

fn main() {
    app_runtime::run();
}
