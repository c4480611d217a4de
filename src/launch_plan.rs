use std::{env, path::PathBuf, process::Command};

use crate::{BackendConfig, BACKEND_ENTRYPOINT, BACKEND_PORT_ENV};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchPlan {
    pub(crate) cmd: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
    pub(crate) port: u16,
}

impl LaunchPlan {
    pub(crate) fn resolve(config: &BackendConfig, port: u16) -> Self {
        Self {
            cmd: config.python_executable(),
            args: vec!["-u".to_string(), BACKEND_ENTRYPOINT.to_string()],
            cwd: config.backend_dir.clone(),
            port,
        }
    }

    pub(crate) fn env_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            (BACKEND_PORT_ENV, self.port.to_string()),
            ("PYTHONUNBUFFERED", "1".to_string()),
            (
                "PYTHONIOENCODING",
                env::var("PYTHONIOENCODING").unwrap_or_else(|_| "utf-8".to_string()),
            ),
        ]
    }

    pub(crate) fn command(&self) -> Command {
        let mut command = Command::new(&self.cmd);
        command.args(&self.args).current_dir(&self.cwd);
        for (key, value) in self.env_vars() {
            command.env(key, value);
        }
        command
    }
}

pub(crate) fn build_debug_command(plan: &LaunchPlan) -> Vec<String> {
    let mut parts = vec![plan.cmd.clone()];
    parts.extend(plan.args.clone());
    parts
}
