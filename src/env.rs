use crate::workdir::WorkingDirectory;
use std::collections::{BTreeSet, HashMap};
use std::env as stdenv;

/// Names of the commands implemented inside the shell.
///
/// Fixed when the interpreter is built; used both to dispatch and to answer `type`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltinTable {
    names: BTreeSet<&'static str>,
}

impl BuiltinTable {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }
}

impl FromIterator<&'static str> for BuiltinTable {
    fn from_iter<I: IntoIterator<Item = &'static str>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Mutable state shared by all commands of one interpreter.
///
/// - `vars`: variables set by the shell itself; they shadow the process
///   environment and are passed on to external commands.
/// - `current_dir`: the tracked working directory.
/// - `builtins`: the builtin names known to this interpreter.
/// - `should_exit`: set by `exit 0`; the command loop stops once it is true.
#[derive(Debug, Clone)]
pub struct ShellState {
    pub vars: HashMap<String, String>,
    pub current_dir: WorkingDirectory,
    pub builtins: BuiltinTable,
    pub should_exit: bool,
}

impl ShellState {
    /// Starts in the process's current directory with no overrides.
    pub fn new(builtins: BuiltinTable) -> Self {
        Self {
            vars: HashMap::new(),
            current_dir: WorkingDirectory::from_process(),
            builtins,
            should_exit: false,
        }
    }

    /// Get the value of a variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to the live process
    /// environment so that changes made outside the shell are seen immediately.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override a variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}
