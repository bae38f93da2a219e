//! Facts about the host that help the model pick the right commands

use std::path::PathBuf;
use sysinfo::System;

use crate::subprocess::PlatformFamily;

/// Snapshot of the environment, taken once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentContext {
    /// `std::env::consts::OS` of the running binary.
    pub platform: String,
    pub current_directory: Option<PathBuf>,
    pub os_info: Option<String>,
    pub shell: Option<String>,
    pub user: Option<String>,
}

impl EnvironmentContext {
    /// Gather everything that can be found. Missing facts are left out, never errors.
    pub fn gather() -> Self {
        let platform = std::env::consts::OS;
        let lookup = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        let context = Self {
            platform: platform.to_string(),
            current_directory: std::env::current_dir().ok(),
            os_info: os_description(platform),
            shell: shell_for(platform, lookup),
            user: user_for(platform, lookup),
        };
        tracing::debug!("Environment context: {:?}", context);
        context
    }

    /// Render as the block inserted into the generation prompt.
    pub fn format(&self) -> String {
        let mut parts = Vec::new();

        if !self.platform.is_empty() {
            parts.push(format!("Platform: {}", self.platform));
        }
        if let Some(dir) = &self.current_directory {
            parts.push(format!("Current directory: {}", dir.display()));
        }
        if let Some(os) = &self.os_info {
            parts.push(format!("OS: {os}"));
        }
        if let Some(shell) = &self.shell {
            parts.push(format!("Shell: {shell}"));
        }
        if let Some(user) = &self.user {
            parts.push(format!("User: {user}"));
        }

        if parts.is_empty() {
            return String::new();
        }
        format!("Environment context:\n{}", parts.join("\n"))
    }
}

fn os_description(platform: &str) -> Option<String> {
    let long = System::long_os_version();
    let kernel = System::kernel_version();

    match PlatformFamily::from_os(platform) {
        Some(PlatformFamily::Windows) => Some(long.unwrap_or_else(|| "Windows".to_string())),
        Some(PlatformFamily::Unix) => match (long, kernel) {
            (Some(long), Some(kernel)) => Some(format!("{long} (kernel {kernel})")),
            (long, kernel) => long.or(kernel),
        },
        None => Some(platform.to_string()),
    }
}

fn shell_for(platform: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    let shell = match PlatformFamily::from_os(platform) {
        Some(PlatformFamily::Windows) => {
            if lookup("PSModulePath").is_some() {
                "PowerShell".to_string()
            } else {
                "cmd.exe".to_string()
            }
        }
        Some(PlatformFamily::Unix) => lookup("SHELL").unwrap_or_else(|| "/bin/bash".to_string()),
        None => "unknown".to_string(),
    };
    Some(shell)
}

fn user_for(platform: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    match PlatformFamily::from_os(platform) {
        Some(PlatformFamily::Windows) => lookup("USERNAME"),
        _ => lookup("USER").or_else(|| lookup("USERNAME")),
    }
}
