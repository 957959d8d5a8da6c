use thiserror::Error;

/// User-facing failures of the shell.
///
/// The `Display` text of every variant is exactly the message printed to the
/// user, so callers can write the error as-is followed by a newline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    /// Neither a builtin nor an executable on the search path.
    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// `cd` target that does not exist as a directory.
    #[error("cd: {0}: No such file or directory")]
    DirectoryNotFound(String),

    /// `cd ~` while `HOME` is unset.
    #[error("cd: HOME not set")]
    HomeNotSet,

    /// A builtin was invoked without its required operand.
    #[error("{0}: missing argument")]
    MissingArgument(&'static str),
}
