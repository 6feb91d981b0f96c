//! Opening freshly created notes for editing.
//!
//! Launch strategy is picked once per invocation: an explicitly configured
//! editor, the platform's default opener (Windows), the first terminal editor
//! found on `PATH`, or simply printing the path.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Terminal editors tried, in order, when nothing else is configured.
pub const FALLBACK_EDITORS: &[&str] = &["nano", "vi"];

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },

    #[error("Editor command is empty")]
    EmptyCommand,

    #[error("Failed to write note path: {0}")]
    Output(#[source] io::Error),
}

pub trait EditorLauncher {
    /// Short human-readable name, used in logs.
    fn name(&self) -> String;

    fn launch(&self, path: &Path) -> Result<(), LaunchError>;
}

/// Command from `--editor`, the config file or `$EDITOR`.
///
/// The command is split on whitespace so values like `code --wait` work; the
/// note path is appended as the last argument.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplicitEditor {
    command: String,
}

impl ExplicitEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl EditorLauncher for ExplicitEditor {
    fn name(&self) -> String {
        self.command.clone()
    }

    fn launch(&self, path: &Path) -> Result<(), LaunchError> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or(LaunchError::EmptyCommand)?;
        let mut cmd = Command::new(program);
        cmd.args(parts).arg(path);
        run_to_completion(program, cmd)
    }
}

/// The operating system's default handler for the file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlatformOpener;

impl EditorLauncher for PlatformOpener {
    fn name(&self) -> String {
        "platform default".to_string()
    }

    fn launch(&self, path: &Path) -> Result<(), LaunchError> {
        open::that(path).map_err(|source| LaunchError::Spawn {
            program: self.name(),
            source,
        })
    }
}

/// A terminal editor discovered on `PATH`.
#[derive(Clone, Debug, PartialEq)]
pub struct FallbackEditor {
    program: PathBuf,
}

impl FallbackEditor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl EditorLauncher for FallbackEditor {
    fn name(&self) -> String {
        self.program.display().to_string()
    }

    fn launch(&self, path: &Path) -> Result<(), LaunchError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(path);
        run_to_completion(&self.name(), cmd)
    }
}

/// Does not launch anything; tells the user where the note is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrintPath;

impl EditorLauncher for PrintPath {
    fn name(&self) -> String {
        "print path".to_string()
    }

    fn launch(&self, path: &Path) -> Result<(), LaunchError> {
        write_path(&mut io::stdout().lock(), path).map_err(LaunchError::Output)
    }
}

/// A closed pipe (e.g. `| head`) is not an error for a purely informational line.
fn write_path(out: &mut impl Write, path: &Path) -> io::Result<()> {
    match writeln!(out, "Note created: {}", path.display()).and_then(|_| out.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Choose a launcher for this machine.
pub fn resolve_launcher(editor: Option<&str>) -> Box<dyn EditorLauncher> {
    resolve_launcher_with(editor, cfg!(windows), |program| which::which(program).ok())
}

/// Like [`resolve_launcher`] with the platform and `PATH` lookup injected.
pub fn resolve_launcher_with<F>(
    editor: Option<&str>,
    windows: bool,
    lookup: F,
) -> Box<dyn EditorLauncher>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if let Some(command) = editor.filter(|cmd| !cmd.trim().is_empty()) {
        return Box::new(ExplicitEditor::new(command));
    }
    if windows {
        return Box::new(PlatformOpener);
    }
    FALLBACK_EDITORS
        .iter()
        .copied()
        .find_map(lookup)
        .map(|program| Box::new(FallbackEditor::new(program)) as Box<dyn EditorLauncher>)
        .unwrap_or_else(|| Box::new(PrintPath))
}

fn run_to_completion(program: &str, mut cmd: Command) -> Result<(), LaunchError> {
    log::debug!("Launching {cmd:?}");
    let status = cmd.status().map_err(|source| LaunchError::Spawn {
        program: program.to_string(),
        source,
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(LaunchError::ExitStatus {
            program: program.to_string(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nothing_on_path(_: &str) -> Option<PathBuf> {
        None
    }

    #[test]
    fn explicit_editor_wins() {
        let launcher = resolve_launcher_with(Some("code --wait"), true, |_| {
            Some(PathBuf::from("/usr/bin/nano"))
        });
        assert_eq!(launcher.name(), "code --wait");
    }

    #[test]
    fn blank_editor_is_ignored() {
        let launcher = resolve_launcher_with(Some("   "), false, nothing_on_path);
        assert_eq!(launcher.name(), "print path");
    }

    #[test]
    fn windows_uses_platform_opener() {
        let launcher = resolve_launcher_with(None, true, nothing_on_path);
        assert_eq!(launcher.name(), "platform default");
    }

    #[test]
    fn falls_back_to_first_editor_on_path() {
        let launcher = resolve_launcher_with(None, false, |program| {
            (program == "vi").then(|| PathBuf::from("/usr/bin/vi"))
        });
        assert_eq!(launcher.name(), "/usr/bin/vi");

        let launcher = resolve_launcher_with(None, false, |program| {
            Some(PathBuf::from(format!("/bin/{program}")))
        });
        assert_eq!(launcher.name(), "/bin/nano");
    }

    #[test]
    fn prints_path_when_no_editor_available() {
        let launcher = resolve_launcher_with(None, false, nothing_on_path);
        assert_eq!(launcher.name(), "print path");
        assert!(launcher.launch(Path::new("/tmp/x.md")).is_ok());
    }

    struct FailingWriter(io::ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(self.0))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(self.0))
        }
    }

    #[test]
    fn writes_note_path_line() {
        let mut out = Vec::new();
        write_path(&mut out, Path::new("/notes/2024-03-05-plan.md")).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Note created: /notes/2024-03-05-plan.md\n"
        );
    }

    #[test]
    fn closed_stdout_is_not_an_error() {
        let mut out = FailingWriter(io::ErrorKind::BrokenPipe);
        assert!(write_path(&mut out, Path::new("note.md")).is_ok());

        let mut out = FailingWriter(io::ErrorKind::PermissionDenied);
        assert!(write_path(&mut out, Path::new("note.md")).is_err());
    }

    #[test]
    fn missing_program_reports_spawn_error() {
        let editor = ExplicitEditor::new("definitely-not-an-editor-binary-42");
        let err = editor.launch(Path::new("note.md")).unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failing_editor_reports_exit_status() {
        let editor = ExplicitEditor::new("false");
        let err = editor.launch(Path::new("note.md")).unwrap_err();
        assert!(matches!(err, LaunchError::ExitStatus { .. }));
    }
}
