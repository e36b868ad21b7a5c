//! forksh: a small interactive shell.
//!
//! Lines are parsed into a [`CommandNode`](shell::parser::ast::CommandNode)
//! tree and run by the [`Executor`](shell::executor::Executor): builtins in
//! the shell's own process, everything else in forked children wired
//! together with pipes and redirections.

pub mod shell;
pub mod utils;
