use crate::command::{CommandFactory, CommandLine, ExecutableCommand, ExitCode};
use crate::env::ShellState;
use crate::error::ShellError;
use crate::external;
use crate::interpreter::Factory;
use crate::lexer;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are executed directly in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Builds the command from a line whose first word is [`BuiltinCommand::name`].
    ///
    /// `EarlyExit` carries text to print instead of running the command, such
    /// as `--help` output or a usage error.
    fn parse(line: &CommandLine) -> Result<Self, EarlyExit>;

    /// Executes the command using the provided output stream and shell state.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode>;
}

/// Parses the positional arguments of `line` with [`argh`].
fn parse_args<T: FromArgs>(line: &CommandLine) -> Result<T, EarlyExit> {
    let name = line.name().unwrap_or_default();
    let args: Vec<&str> = line.args().iter().map(String::as_str).collect();
    T::from_args(&[name], &args)
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        match <T as BuiltinCommand>::execute(*self, stdout, state) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stdout, "{e}")?;
                Ok(1)
            }
        }
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, _state: &mut ShellState) -> Result<ExitCode> {
        stdout.write_all(self.output.as_bytes())?;
        if !self.output.ends_with('\n') {
            writeln!(stdout)?;
        }
        Ok(if self.is_error { 1 } else { 0 })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn builtin_name(&self) -> Option<&'static str> {
        Some(T::name())
    }

    fn try_create(
        &self,
        _state: &ShellState,
        line: &CommandLine,
    ) -> Option<Box<dyn ExecutableCommand>> {
        if line.name() != Some(T::name()) {
            return None;
        }
        Some(match T::parse(line) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

#[derive(FromArgs)]
/// Leave the shell. Only an exit status of 0 is supported.
pub struct Exit {
    #[argh(positional, greedy)]
    /// exit status; the shell stops only when the first operand is 0. Later operands are ignored.
    pub operands: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn parse(line: &CommandLine) -> Result<Self, EarlyExit> {
        parse_args(line)
    }

    fn execute(self, _stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        let status = self.operands.first().ok_or(ShellError::MissingArgument("exit"))?;
        if status == "0" {
            state.should_exit = true;
        }
        Ok(0)
    }
}

/// Write the arguments to standard output, separated by spaces and followed by a newline.
///
/// Arguments are taken from the raw line rather than the generic argument
/// vector, so options such as `-n` or `--help` are printed like any other word.
pub struct Echo {
    pub args: Vec<String>,
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn parse(line: &CommandLine) -> Result<Self, EarlyExit> {
        let args = lexer::split_command(&line.raw)
            .map(|(_, rest)| lexer::tokenize(rest))
            .unwrap_or_default();
        Ok(Self { args })
    }

    fn execute(self, stdout: &mut dyn Write, _state: &mut ShellState) -> Result<ExitCode> {
        writeln!(stdout, "{}", self.args.join(" "))?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn parse(line: &CommandLine) -> Result<Self, EarlyExit> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        writeln!(stdout, "{}", state.current_dir.path().to_string_lossy())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to: absolute, relative, or `~` for $HOME.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn parse(line: &CommandLine) -> Result<Self, EarlyExit> {
        parse_args(line)
    }

    fn execute(self, _stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        let target = self.target.ok_or(ShellError::MissingArgument("cd"))?;
        let home = state.get_var("HOME");
        state.current_dir.change(&target, home.as_deref())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Describe how a command name would be interpreted.
pub struct Type {
    #[argh(positional, greedy)]
    /// command name to look up; only the first one is used.
    pub names: Vec<String>,
}

impl BuiltinCommand for Type {
    fn name() -> &'static str {
        "type"
    }

    fn parse(line: &CommandLine) -> Result<Self, EarlyExit> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        let command = self
            .names
            .into_iter()
            .next()
            .ok_or(ShellError::MissingArgument("type"))?;
        if state.builtins.contains(&command) {
            writeln!(stdout, "{command} is a shell builtin")?;
            return Ok(0);
        }
        match external::resolve(state, &command) {
            Some(path) => {
                writeln!(stdout, "{command} is {}", path.display())?;
                Ok(0)
            }
            None => {
                writeln!(stdout, "{command}: not found")?;
                Ok(1)
            }
        }
    }
}
