use std::os::unix::io::RawFd;
use std::path::Path;

use log::debug;
use nix::fcntl::{self, OFlag};
use nix::sys::stat::Mode;
use nix::unistd;

use super::process::SyscallError;
use crate::shell::parser::ast::SimpleCommand;

/// A standard stream slot a command may redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Input,
    Output,
    Error,
}

impl Stream {
    pub fn fd(&self) -> RawFd {
        match self {
            Stream::Input => libc::STDIN_FILENO,
            Stream::Output => libc::STDOUT_FILENO,
            Stream::Error => libc::STDERR_FILENO,
        }
    }

    pub fn flags(&self) -> OFlag {
        match self {
            Stream::Input => OFlag::O_RDONLY,
            Stream::Output | Stream::Error => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND,
        }
    }
}

/// Owner read/write for files the shell creates.
fn create_mode() -> Mode {
    Mode::S_IRUSR | Mode::S_IWUSR
}

/// The configured targets of a command, in the order they are applied.
pub fn targets(command: &SimpleCommand) -> Vec<(Stream, &Path)> {
    [
        (Stream::Input, command.input.as_deref()),
        (Stream::Output, command.output.as_deref()),
        (Stream::Error, command.error.as_deref()),
    ]
    .into_iter()
    .filter_map(|(stream, path)| path.map(|path| (stream, path)))
    .collect()
}

/// Opens `path` and moves it onto the stream's slot.
pub fn redirect(stream: Stream, path: &Path) -> Result<(), SyscallError> {
    let target = path.display().to_string();
    let fd = fcntl::open(path, stream.flags(), create_mode())
        .map_err(|errno| SyscallError::with_target("open", target.clone(), errno))?;

    // open may hand back the slot itself when it was closed beforehand
    if fd != stream.fd() {
        unistd::dup2(fd, stream.fd())
            .map_err(|errno| SyscallError::with_target("dup2", target.clone(), errno))?;
        unistd::close(fd).map_err(|errno| SyscallError::with_target("close", target, errno))?;
    }

    debug!("{:?} redirected to {}", stream, path.display());
    Ok(())
}

/// Applies every redirection of `command`, ending the process on failure.
///
/// Only call this in a process that is about to exec.
pub fn setup(command: &SimpleCommand) {
    for (stream, path) in targets(command) {
        if let Err(err) = redirect(stream, path) {
            err.fatal();
        }
    }
}
