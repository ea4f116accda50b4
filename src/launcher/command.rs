//! Process launcher implementation.
//!
//! Starts a configured program with the URL as its last argument and does
//! not wait for it to exit. Each child is reaped by a short-lived background
//! thread once it exits.

use std::io::ErrorKind;
use std::process::{Child, Command, Stdio};
use std::thread;

use tracing::{debug, warn};

use crate::error::{Result, RouterError};
use crate::types::{AppId, LaunchTargets};

use super::Launcher;

/// Program and leading arguments for one application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCommand {
    /// Executable name or path
    pub program: String,
    /// Arguments placed before the URL
    pub args: Vec<String>,
}

impl AppCommand {
    /// Create a command with no extra arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument placed before the URL
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Launcher that spawns one local program per application.
pub struct CommandLauncher {
    primary: AppCommand,
    secondary: AppCommand,
}

impl CommandLauncher {
    /// Create a launcher from two commands
    pub fn new(primary: AppCommand, secondary: AppCommand) -> Self {
        Self { primary, secondary }
    }

    /// Create a launcher whose programs are the target identifiers
    pub fn from_targets(targets: &LaunchTargets) -> Self {
        Self::new(
            AppCommand::new(targets.primary.clone()),
            AppCommand::new(targets.secondary.clone()),
        )
    }

    fn command(&self, app: AppId) -> &AppCommand {
        match app {
            AppId::Primary => &self.primary,
            AppId::Secondary => &self.secondary,
        }
    }
}

impl Launcher for CommandLauncher {
    fn identifier(&self, app: AppId) -> &str {
        &self.command(app).program
    }

    fn launch(&self, url: &str, app: AppId) -> Result<()> {
        let cmd = self.command(app);
        debug!(app = %app, program = %cmd.program, url, "spawning application");

        let spawned = Command::new(&cmd.program)
            .args(&cmd.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => {
                reap(child, &cmd.program);
                Ok(())
            }
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
                Err(RouterError::AppNotFound {
                    app,
                    identifier: cmd.program.clone(),
                    message: e.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Wait for a detached child on a background thread so it does not linger
/// as a zombie
fn reap(mut child: Child, program: &str) {
    let pid = child.id();
    let spawned = thread::Builder::new()
        .name(format!("reap-{}", pid))
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "application exited"),
            Err(e) => warn!(pid, error = %e, "failed to wait for application"),
        });
    if let Err(e) = spawned {
        warn!(pid, program, error = %e, "failed to start reaper thread");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        let launcher = CommandLauncher::from_targets(&LaunchTargets::new("chromium", "firefox"));
        assert_eq!(launcher.identifier(AppId::Primary), "chromium");
        assert_eq!(launcher.identifier(AppId::Secondary), "firefox");
    }

    #[test]
    fn test_missing_program_is_app_not_found() {
        let launcher = CommandLauncher::new(
            AppCommand::new("/nonexistent/uri-router-primary"),
            AppCommand::new("/nonexistent/uri-router-secondary"),
        );
        match launcher.launch("https://example.com", AppId::Secondary) {
            Err(RouterError::AppNotFound {
                app, identifier, ..
            }) => {
                assert_eq!(app, AppId::Secondary);
                assert_eq!(identifier, "/nonexistent/uri-router-secondary");
            }
            other => panic!("expected AppNotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_existing_program() {
        let launcher = CommandLauncher::new(AppCommand::new("true"), AppCommand::new("true"));
        assert!(launcher.launch("https://example.com", AppId::Primary).is_ok());
    }

    /// Zombie children of this process, read from `/proc`
    #[cfg(target_os = "linux")]
    fn zombie_children() -> usize {
        let me = std::process::id().to_string();
        std::fs::read_dir("/proc")
            .unwrap()
            .filter_map(|entry| std::fs::read_to_string(entry.ok()?.path().join("stat")).ok())
            .filter(|stat| {
                // Fields after the parenthesized command name: state, ppid, ...
                let Some((_, rest)) = stat.rsplit_once(')') else {
                    return false;
                };
                let mut fields = rest.split_whitespace();
                fields.next() == Some("Z") && fields.next() == Some(me.as_str())
            })
            .count()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_exited_children_are_reaped() {
        let launcher = CommandLauncher::new(AppCommand::new("true"), AppCommand::new("true"));
        for _ in 0..5 {
            launcher.launch("https://example.com", AppId::Primary).unwrap();
        }

        let mut remaining = zombie_children();
        for _ in 0..50 {
            if remaining == 0 {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(100));
            remaining = zombie_children();
        }
        assert_eq!(remaining, 0, "zombie children after 5 launches");
    }

    #[test]
    fn test_app_command_args() {
        let cmd = AppCommand::new("open").arg("-a").arg("Safari");
        assert_eq!(cmd.args, vec!["-a".to_string(), "Safari".to_string()]);
    }
}
