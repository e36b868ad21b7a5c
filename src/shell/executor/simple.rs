use log::{debug, info};
use nix::sys::wait::waitpid;
use nix::unistd::{self, ForkResult};

use super::builtins;
use super::error::ExecError;
use super::launcher;
use super::process::{self, SyscallError};
use super::redirect;
use super::status::Status;
use crate::shell::parser::ast::{Builtin, SimpleCommand};

/// Runs one command that is not part of a pipeline.
///
/// Builtins run in the calling process. External programs run in a forked
/// child which the caller waits for.
pub fn execute_simple(command: &SimpleCommand) -> Result<Status, ExecError> {
    match command.builtin {
        Builtin::ChangeDirectory => {
            builtins::change_directory(&command.tokens)?;
            Ok(Status::SUCCESS)
        }
        Builtin::Exit => Ok(builtins::exit()),
        Builtin::None => Ok(run_external(command)),
    }
}

fn run_external(command: &SimpleCommand) -> Status {
    process::flush_stdio();

    // SAFETY: the child only sets up descriptors and execs or exits.
    match unsafe { unistd::fork() } {
        Ok(ForkResult::Child) => {
            redirect::setup(command);
            launcher::launch(&command.tokens);
            process::terminate(1)
        }
        Ok(ForkResult::Parent { child }) => {
            debug!("forked {} for {:?}", child, command.tokens);
            match process::syscall(|| waitpid(child, None)) {
                Ok(wait_status) => {
                    let status = Status::from_wait(wait_status);
                    let program = command.program().unwrap_or_default();
                    info!("{} ({}) finished with {}", child, program, status);
                    status
                }
                Err(errno) => SyscallError::new("wait", errno).fatal(),
            }
        }
        Err(errno) => SyscallError::new("fork", errno).fatal(),
    }
}
