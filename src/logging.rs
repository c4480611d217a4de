use tracing_subscriber::EnvFilter;

use crate::LOG_FILTER_ENV;

const DEFAULT_LOG_FILTER: &str = "info,tao=warn,wry=warn";

pub(crate) fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
    {
        eprintln!("failed to initialize logging: {error}");
    }
}

pub(crate) fn append_startup_log(message: &str) {
    tracing::info!(target: "cumo::startup", "{message}");
}

pub(crate) fn append_desktop_log(message: &str) {
    tracing::info!(target: "cumo::desktop", "{message}");
}

pub(crate) fn append_shutdown_log(message: &str) {
    tracing::info!(target: "cumo::shutdown", "{message}");
}

pub(crate) fn append_backend_log(message: &str) {
    tracing::info!(target: "cumo::backend", "{message}");
}

pub(crate) fn append_backend_error_log(message: &str) {
    tracing::warn!(target: "cumo::backend", "{message}");
}
