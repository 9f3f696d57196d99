use std::collections::HashSet;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::AppConfig;
use crate::error::OpenError;

/// Opens a file in a program outside the browser.
///
/// Implementations block until the program exits.
pub trait Opener {
    fn open(&self, path: &Path) -> Result<(), OpenError>;
}

/// Tries a list of command lines in order until one exits successfully.
#[derive(Debug, Clone)]
pub struct CommandOpener {
    programs: Vec<String>,
}

impl CommandOpener {
    /// Repeated command lines are dropped, keeping the first occurrence.
    pub fn new(mut programs: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        programs.retain(|program| seen.insert(program.clone()));
        Self { programs }
    }

    /// `$VISUAL`, `$EDITOR`, the configured editors, then the platform opener.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut programs: Vec<String> = ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .filter(|value| !value.trim().is_empty())
            .collect();
        programs.extend(config.editors());
        programs.push(system_opener().to_string());
        Self::new(programs)
    }

    pub fn programs(&self) -> &[String] {
        &self.programs
    }

    fn run(command_line: &str, path: &Path) -> bool {
        let mut parts = command_line.split_whitespace();
        let Some(program) = parts.next() else {
            return false;
        };
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();
        match status {
            Ok(status) if status.success() => true,
            Ok(status) => {
                tracing::debug!(program, %status, "opener exited unsuccessfully");
                false
            }
            Err(e) => {
                tracing::debug!(program, error = %e, "opener failed to start");
                false
            }
        }
    }
}

impl Opener for CommandOpener {
    fn open(&self, path: &Path) -> Result<(), OpenError> {
        for command_line in &self.programs {
            if Self::run(command_line, path) {
                tracing::info!(program = %command_line, path = %path.display(), "opened file");
                return Ok(());
            }
        }
        tracing::warn!(path = %path.display(), "no program could open file");
        Err(OpenError::NoProgram {
            path: path.to_path_buf(),
        })
    }
}

fn system_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_ends_with_system_opener() {
        let opener = CommandOpener::from_config(&AppConfig::default());
        assert_eq!(opener.programs().last().unwrap(), system_opener());
        assert!(opener.programs().iter().any(|p| p == "nano"));
    }

    #[test]
    fn repeated_programs_are_tried_once() {
        let opener = CommandOpener::new(vec![
            "vim".into(),
            "nano".into(),
            "vim".into(),
            "code --wait".into(),
            "nano".into(),
        ]);
        assert_eq!(opener.programs(), ["vim", "nano", "code --wait"]);
    }

    #[test]
    fn empty_program_list_fails() {
        let opener = CommandOpener::new(Vec::new());
        let err = opener.open(Path::new("/tmp/x")).unwrap_err();
        assert!(matches!(err, OpenError::NoProgram { .. }));
    }

    #[test]
    fn missing_programs_are_skipped() {
        let opener = CommandOpener::new(vec![
            "   ".into(),
            "definitely-not-a-real-editor-binary".into(),
        ]);
        assert!(opener.open(Path::new("/tmp/x")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn first_successful_program_wins() {
        let opener = CommandOpener::new(vec![
            "false".into(),
            "definitely-not-a-real-editor-binary".into(),
            "true --ignored-flag".into(),
        ]);
        assert!(opener.open(Path::new("/tmp/x")).is_ok());
    }
}
