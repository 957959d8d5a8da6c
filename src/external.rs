use crate::command::{CommandFactory, CommandLine, ExecutableCommand, ExitCode};
use crate::env::ShellState;
use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

/// Starts an external program and waits for it to finish.
pub trait Launcher {
    /// Runs `program` with `argv` (including `argv[0]`) inside `cwd`.
    fn launch(
        &self,
        program: &Path,
        argv: &[String],
        cwd: &Path,
        state: &ShellState,
    ) -> Result<ExitCode>;
}

/// Launches real child processes inheriting the shell's standard streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(
        &self,
        program: &Path,
        argv: &[String],
        cwd: &Path,
        state: &ShellState,
    ) -> Result<ExitCode> {
        use std::os::unix::process::CommandExt;

        let mut cmd = std::process::Command::new(program);
        if let Some((arg0, args)) = argv.split_first() {
            cmd.arg0(arg0).args(args);
        }
        let exit_status = cmd
            .envs(state.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(cwd)
            .spawn()
            .with_context(|| format!("failed to spawn {}", program.display()))?
            .wait()?;
        match exit_status.code() {
            Some(x) => Ok(x),
            None => Ok(terminated_by_signal(exit_status)),
        }
    }
}

fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = exit_status.signal() {
        128 + signal
    } else if exit_status.core_dumped() {
        255
    } else {
        -1
    }
}

/// Command that is not a builtin, resolved to an executable on disk.
pub struct ExternalCommand {
    program: PathBuf,
    argv: Vec<String>,
    launcher: Rc<dyn Launcher>,
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        // The child writes straight to the terminal.
        stdout.flush()?;
        self.launcher
            .launch(&self.program, &self.argv, state.current_dir.path(), state)
    }
}

/// Creates [`ExternalCommand`]s for names found on the search path.
pub struct ExternalFactory {
    launcher: Rc<dyn Launcher>,
}

impl ExternalFactory {
    pub fn new(launcher: Rc<dyn Launcher>) -> Self {
        Self { launcher }
    }
}

impl CommandFactory for ExternalFactory {
    fn try_create(
        &self,
        state: &ShellState,
        line: &CommandLine,
    ) -> Option<Box<dyn ExecutableCommand>> {
        let name = line.name()?;
        let program = resolve(state, name)?;
        Some(Box::new(ExternalCommand {
            program,
            argv: line.argv.clone(),
            launcher: Rc::clone(&self.launcher),
        }))
    }
}

/// Resolves `name` against the `PATH` currently visible to `state`.
///
/// A relative name containing `/`, such as `./prog`, is taken relative to the
/// tracked working directory rather than the process's own.
pub fn resolve(state: &ShellState, name: &str) -> Option<PathBuf> {
    if name.contains('/') && Path::new(name).is_relative() {
        let joined = state.current_dir.path().join(name);
        return find_command_path(OsStr::new(""), joined.to_str()?);
    }
    let search_paths = state.get_var("PATH").unwrap_or_default();
    find_command_path(OsStr::new(&search_paths), name)
}

/// Resolve a command path the way a typical shell would.
///
/// - A name containing `/` is taken as a path and returned if it is an
///   executable file; `search_paths` is not consulted.
/// - Otherwise each non-empty entry of the colon-separated `search_paths` is
///   tried in order and the first executable `dir/name` wins.
/// - An empty name never resolves.
pub fn find_command_path(search_paths: &OsStr, name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    if name.contains('/') {
        let path = Path::new(name);
        return is_executable(path).then(|| path.to_path_buf());
    }
    find_in_path(search_paths, name)
}

fn find_in_path(search_paths: &OsStr, cmd: &str) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(cmd))
        .find(|path| is_executable(path))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
