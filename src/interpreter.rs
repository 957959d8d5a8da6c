use crate::command::{CommandFactory, CommandLine, ExitCode};
use crate::env::ShellState;
use crate::error::ShellError;
use crate::external::{ExternalFactory, Launcher};
use crate::input::{EditorReader, LineReader, PlainReader, ReadOutcome};
use std::io::{IsTerminal, Write};
use std::rc::Rc;

/// Prompt written before every line is read.
pub const PROMPT: &str = "$ ";

/// Factory allows creating instances of builtin commands.
///
/// Implements [`CommandFactory`] for every builtin type `T`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// The interpreter maintains a [`ShellState`] and a list of [`CommandFactory`]
/// objects that are queried in order to create commands by name. Builtins come
/// first, so they shadow executables of the same name. See [`Default`] for the
/// factories included out of the box.
///
/// Example
/// ```
/// use minishell::Interpreter;
/// let mut sh = Interpreter::default();
/// let code = sh.run_line("echo 'hello   world'").unwrap();
/// assert_eq!(code, 0);
/// ```
pub struct Interpreter {
    state: ShellState,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    ///
    /// The builtin table is taken from the factories that report a builtin name.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        let builtins = commands.iter().filter_map(|f| f.builtin_name()).collect();
        Self {
            state: ShellState::new(builtins),
            commands,
        }
    }

    /// The default builtins, with external programs started through `launcher`.
    pub fn with_launcher(launcher: Rc<dyn Launcher>) -> Self {
        use crate::builtin::*;
        Self::new(vec![
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<Echo>::default()),
            Box::new(Factory::<Pwd>::default()),
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Type>::default()),
            Box::new(ExternalFactory::new(launcher)),
        ])
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    /// True once `exit 0` has run.
    pub fn should_exit(&self) -> bool {
        self.state.should_exit
    }

    /// Run one input line, writing builtin output to standard output.
    ///
    /// Returns the command's exit code, or an error if an external command
    /// could not be started.
    pub fn run_line(&mut self, line: &str) -> anyhow::Result<ExitCode> {
        self.run_line_with_output(line, &mut std::io::stdout())
    }

    pub(crate) fn run_line_with_output(
        &mut self,
        raw: &str,
        out: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        let line = CommandLine::parse(raw);
        let Some(name) = line.name() else {
            return Ok(0);
        };

        let created = self
            .commands
            .iter()
            .find_map(|factory| factory.try_create(&self.state, &line));
        let code = match created {
            Some(cmd) => cmd.execute(out, &mut self.state)?,
            None => {
                writeln!(out, "{}", ShellError::CommandNotFound(name.to_string()))?;
                127
            }
        };
        out.flush()?;
        Ok(code)
    }

    /// Read-Eval-Print Loop on the process's standard streams.
    ///
    /// Uses a line editor when standard input is a terminal and plain line
    /// reads otherwise.
    pub fn repl(&mut self) -> anyhow::Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        if stdin.is_terminal() {
            self.repl_with(&mut EditorReader::new()?, &mut stdout)
        } else {
            self.repl_with(&mut PlainReader::new(stdin.lock()), &mut stdout)
        }
    }

    /// Runs lines from `reader` until `exit 0` or end of input.
    ///
    /// End of input is treated like `exit 0`. A command that fails to start
    /// is reported and the loop goes on.
    pub fn repl_with(
        &mut self,
        reader: &mut dyn LineReader,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        while !self.state.should_exit {
            match reader.read_line(PROMPT, out)? {
                ReadOutcome::Line(line) => {
                    if let Err(e) = self.run_line_with_output(&line, out) {
                        writeln!(out, "{e:#}")?;
                        out.flush()?;
                    }
                }
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => {
                    self.state.should_exit = true;
                }
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `exit`, `echo`, `pwd`, `cd`, `type`
    /// - external command launcher
    fn default() -> Self {
        Self::with_launcher(Rc::new(crate::external::ProcessLauncher))
    }
}
