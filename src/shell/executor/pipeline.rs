use std::os::unix::io::{IntoRawFd, RawFd};

use log::{debug, info, warn};
use nix::sys::wait::wait;
use nix::unistd::{self, ForkResult, Pid};

use super::error::ExecError;
use super::launcher;
use super::process::{self, SyscallError};
use super::redirect;
use super::simple;
use super::status::Status;
use crate::shell::parser::ast::{CommandNode, Operator, SimpleCommand};

/// Runs a command tree from the shell's own process.
///
/// A pipe node forks one branch per side and returns once both are reaped.
/// A bare leaf goes through [`simple::execute_simple`] so that the shell is
/// never replaced by the program it runs.
pub fn execute_complex(node: &CommandNode) -> Result<Status, ExecError> {
    match node {
        CommandNode::Leaf(command) => simple::execute_simple(command),
        CommandNode::Pipe {
            operator: Operator::Pipe,
            left,
            right,
        } => run_pipe(left, right),
        CommandNode::Pipe {
            operator: Operator::Unsupported(symbol),
            ..
        } => Err(ExecError::UnsupportedOperator(symbol.clone())),
    }
}

/// Body of a forked branch. Never returns: the branch execs or exits.
fn run_branch(node: &CommandNode) -> ! {
    match node {
        CommandNode::Leaf(command) if command.builtin.is_builtin() => {
            // cd/exit in a throwaway process would have no visible effect
            debug!("builtin {:?} ignored inside a pipeline", command.program());
            process::terminate(1)
        }
        CommandNode::Leaf(command) => exec_leaf(command),
        CommandNode::Pipe {
            operator: Operator::Pipe,
            left,
            right,
        } => match run_pipe(left, right) {
            Ok(status) if status.is_success() => process::terminate(0),
            Ok(_) => process::terminate(1),
            Err(err) => {
                process::report(&err);
                process::terminate(1)
            }
        },
        CommandNode::Pipe {
            operator: Operator::Unsupported(symbol),
            ..
        } => {
            process::report(&ExecError::UnsupportedOperator(symbol.clone()));
            process::terminate(1)
        }
    }
}

fn exec_leaf(command: &SimpleCommand) -> ! {
    redirect::setup(command);
    launcher::launch(&command.tokens);
    process::terminate(1)
}

fn run_pipe(left: &CommandNode, right: &CommandNode) -> Result<Status, ExecError> {
    let (read_end, write_end) = unistd::pipe().map_err(|errno| {
        let err = SyscallError::new("pipe", errno);
        process::report(&err);
        ExecError::Pipe(err)
    })?;
    let (read_fd, write_fd) = (read_end.into_raw_fd(), write_end.into_raw_fd());
    debug!("pipe r={} w={} for {} | {}", read_fd, write_fd, left, right);

    process::flush_stdio();
    let left_pid = spawn_branch(left, write_fd, libc::STDOUT_FILENO, read_fd);
    let right_pid = spawn_branch(right, read_fd, libc::STDIN_FILENO, write_fd);

    // both ends must be gone here or the reader never sees end of input
    for fd in [read_fd, write_fd] {
        if let Err(errno) = unistd::close(fd) {
            SyscallError::new("close", errno).fatal();
        }
    }

    reap(&[left_pid, right_pid]);
    Ok(Status::SUCCESS)
}

/// Forks a branch whose `slot` is wired to `keep`; `unused` is the other
/// end of the same pipe and is closed in the child.
fn spawn_branch(node: &CommandNode, keep: RawFd, slot: RawFd, unused: RawFd) -> Pid {
    // SAFETY: the child rewires descriptors, then execs or exits.
    match unsafe { unistd::fork() } {
        Ok(ForkResult::Child) => {
            if let Err(err) = attach(keep, slot, unused) {
                err.fatal();
            }
            run_branch(node)
        }
        Ok(ForkResult::Parent { child }) => {
            debug!("forked {} for {}", child, node);
            child
        }
        Err(errno) => SyscallError::new("fork", errno).fatal(),
    }
}

fn attach(keep: RawFd, slot: RawFd, unused: RawFd) -> Result<(), SyscallError> {
    unistd::dup2(keep, slot).map_err(|errno| SyscallError::new("dup2", errno))?;
    unistd::close(unused).map_err(|errno| SyscallError::new("close", errno))?;
    if keep != slot {
        unistd::close(keep).map_err(|errno| SyscallError::new("close", errno))?;
    }
    Ok(())
}

/// Waits until every pid in `children` has been reaped, in exit order.
fn reap(children: &[Pid]) {
    let mut pending = children.to_vec();

    while !pending.is_empty() {
        let wait_status = match process::syscall(wait) {
            Ok(wait_status) => wait_status,
            Err(errno) => SyscallError::new("wait", errno).fatal(),
        };
        let Some(pid) = wait_status.pid() else {
            continue;
        };

        match pending.iter().position(|child| *child == pid) {
            Some(index) => {
                pending.swap_remove(index);
                let status = Status::from_wait(wait_status);
                if status.is_success() {
                    info!("pipeline stage {} exited with {}", pid, status);
                } else {
                    warn!("pipeline stage {} exited with {}", pid, status);
                }
            }
            None => warn!("reaped unrelated child {}", pid),
        }
    }
}
