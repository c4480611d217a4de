use std::{
    env,
    path::{Path, PathBuf},
};

use url::Url;

use crate::{BACKEND_DIR_ENV, BACKEND_PORT_ENV, PYTHON_ENV};

/// Supervisor settings collected from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BackendConfig {
    pub(crate) backend_dir: PathBuf,
    pub(crate) python_override: Option<String>,
    pub(crate) port_override: Option<String>,
}

impl BackendConfig {
    pub(crate) fn from_env() -> Self {
        let backend_dir = non_empty_env(BACKEND_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_backend_dir);

        Self {
            backend_dir,
            python_override: non_empty_env(PYTHON_ENV),
            port_override: non_empty_env(BACKEND_PORT_ENV),
        }
    }

    pub(crate) fn python_executable(&self) -> String {
        resolve_python_executable(self.python_override.as_deref(), &self.backend_dir)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_backend_dir() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("backend")
}

pub(crate) fn venv_python_path(backend_dir: &Path) -> PathBuf {
    if cfg!(target_os = "windows") {
        backend_dir.join("venv").join("Scripts").join("python.exe")
    } else {
        backend_dir.join("venv").join("bin").join("python")
    }
}

pub(crate) fn platform_default_python() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}

pub(crate) fn resolve_python_executable(python_override: Option<&str>, backend_dir: &Path) -> String {
    if let Some(python) = python_override.filter(|value| !value.trim().is_empty()) {
        return python.to_string();
    }

    let venv_python = venv_python_path(backend_dir);
    if venv_python.is_file() {
        return venv_python.to_string_lossy().to_string();
    }

    platform_default_python().to_string()
}

pub(crate) fn backend_base_url(port: u16) -> Result<Url, String> {
    Url::parse(&format!("http://127.0.0.1:{port}/"))
        .map_err(|error| format!("Invalid backend URL for port {port}: {error}"))
}
