//! A small interactive command interpreter.
//!
//! Input lines are split into words by a quote- and escape-aware lexer, then
//! dispatched either to one of the builtins (`exit`, `echo`, `pwd`, `cd`,
//! `type`) or to an external program found on `PATH`.
//!
//! The main entry point is [`Interpreter`]. The public modules expose the
//! lexer, the shell state and the traits used to plug in commands and process
//! launchers.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
pub mod external;
pub mod input;
mod interpreter;
pub mod lexer;
pub mod workdir;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{Interpreter, PROMPT};
