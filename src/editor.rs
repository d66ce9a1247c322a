use std::ffi::OsString;
use std::path::Path;
use std::str::FromStr;

use crate::error::AppError;

const EMEDITOR_PATH: &str = r"C:\Program Files (x86)\EmEditor\EmEditor.exe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Editor {
    Notepad,
    VsCode,
    EmEditor,
}

impl FromStr for Editor {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notepad" => Ok(Editor::Notepad),
            "vscode" => Ok(Editor::VsCode),
            "emeditor" => Ok(Editor::EmEditor),
            other => Err(AppError::UnsupportedEditor(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Editor {
    /// Build the command that opens `file` in this editor.
    pub fn command(self, file: &Path) -> LaunchCommand {
        let file = file.as_os_str().to_os_string();
        match self {
            Editor::Notepad => LaunchCommand {
                program: "notepad".into(),
                args: vec![file],
            },
            // `code` is a .cmd shim on Windows and needs the shell to resolve
            Editor::VsCode if cfg!(windows) => LaunchCommand {
                program: "cmd".into(),
                args: vec!["/C".into(), "code".into(), file],
            },
            Editor::VsCode => LaunchCommand {
                program: "code".into(),
                args: vec![file],
            },
            Editor::EmEditor => LaunchCommand {
                program: EMEDITOR_PATH.into(),
                args: vec![file],
            },
        }
    }
}

/// Starts a process without waiting for it to exit.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, command: &LaunchCommand) -> std::io::Result<()>;
}

pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, command: &LaunchCommand) -> std::io::Result<()> {
        let child = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()?;
        tracing::info!(
            "Launched {} (pid {:?})",
            command.program.to_string_lossy(),
            child.id()
        );
        Ok(())
    }
}

/// Resolve `name` and open the buffer file with it.
pub fn open(launcher: &dyn ProcessLauncher, name: &str, file: &Path) -> Result<(), AppError> {
    let editor: Editor = name.parse()?;
    launcher
        .launch(&editor.command(file))
        .map_err(AppError::EditorLaunch)
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingLauncher;
    use super::*;

    #[test]
    fn parses_known_editors() {
        assert_eq!("notepad".parse::<Editor>().unwrap(), Editor::Notepad);
        assert_eq!("vscode".parse::<Editor>().unwrap(), Editor::VsCode);
        assert_eq!("emeditor".parse::<Editor>().unwrap(), Editor::EmEditor);
    }

    #[test]
    fn rejects_unknown_and_miscased_names() {
        assert!(matches!(
            "vim".parse::<Editor>(),
            Err(AppError::UnsupportedEditor(name)) if name == "vim"
        ));
        assert!("Notepad".parse::<Editor>().is_err());
        assert!("".parse::<Editor>().is_err());
    }

    #[test]
    fn every_editor_opens_the_buffer_file() {
        let file = Path::new("/tmp/buffer/text.txt");
        for editor in [Editor::Notepad, Editor::VsCode, Editor::EmEditor] {
            let cmd = editor.command(file);
            assert_eq!(cmd.args.last().unwrap().as_os_str(), file.as_os_str());
        }
        assert_eq!(Editor::EmEditor.command(file).program, EMEDITOR_PATH);
    }

    #[test]
    fn open_launches_exactly_once() {
        let launcher = RecordingLauncher::default();
        open(&launcher, "notepad", Path::new("text.txt")).unwrap();
        let calls = launcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "notepad");
    }

    #[test]
    fn unknown_editor_never_launches() {
        let launcher = RecordingLauncher::default();
        let err = open(&launcher, "nano", Path::new("text.txt")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedEditor(_)));
        assert!(launcher.calls().is_empty());
    }

    #[test]
    fn launch_failure_is_reported() {
        let launcher = RecordingLauncher::failing();
        let err = open(&launcher, "vscode", Path::new("text.txt")).unwrap_err();
        assert!(matches!(err, AppError::EditorLaunch(_)));
    }
}
