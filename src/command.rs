use crate::env::ShellState;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// One parsed input line: the raw text and the argument vector lexed from it.
///
/// `argv[0]`, when present, is the command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub raw: String,
    pub argv: Vec<String>,
}

impl CommandLine {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            argv: crate::lexer::tokenize(raw),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// Positional arguments following the command name.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command, writing its output to `stdout`.
    fn execute(self: Box<Self>, stdout: &mut dyn Write, state: &mut ShellState)
    -> Result<ExitCode>;
}

/// Factory that tries to create a command from a parsed line.
///
/// Returns `None` when the factory doesn't recognize the command name.
pub trait CommandFactory {
    /// Name of the builtin this factory creates, if it creates one.
    fn builtin_name(&self) -> Option<&'static str> {
        None
    }

    /// Attempt to create a command instance for the provided line.
    fn try_create(
        &self,
        state: &ShellState,
        line: &CommandLine,
    ) -> Option<Box<dyn ExecutableCommand>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_splits_name_and_args() {
        let line = CommandLine::parse("type  'echo' ls");
        assert_eq!(line.name(), Some("type"));
        assert_eq!(line.args(), ["echo", "ls"]);
        assert_eq!(line.raw, "type  'echo' ls");
    }

    #[test]
    fn empty_command_line() {
        let line = CommandLine::parse("   ");
        assert_eq!(line.name(), None);
        assert!(line.args().is_empty());
    }
}
