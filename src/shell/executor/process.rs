use std::fmt;
use std::io::{self, Write};

use log::{error, warn};
use nix::errno::Errno;

/// A failed system call, with the operation name and what it acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyscallError {
    pub operation: &'static str,
    pub target: Option<String>,
    pub errno: Errno,
}

impl SyscallError {
    pub fn new(operation: &'static str, errno: Errno) -> Self {
        Self {
            operation,
            target: None,
            errno,
        }
    }

    pub fn with_target(operation: &'static str, target: impl Into<String>, errno: Errno) -> Self {
        Self {
            operation,
            target: Some(target.into()),
            errno,
        }
    }

    /// Reports the error and ends the current process with status 1.
    pub fn fatal(&self) -> ! {
        report(self);
        terminate(1)
    }
}

impl fmt::Display for SyscallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} {}: {}", self.operation, target, self.errno.desc()),
            None => write!(f, "{}: {}", self.operation, self.errno.desc()),
        }
    }
}

impl std::error::Error for SyscallError {}

/// Writes a diagnostic to stderr and to the log.
pub fn report(err: &impl fmt::Display) {
    error!("{}", err);
    eprintln!("forksh: {}", err);
}

/// Ends the current process without running exit handlers or flushing
/// stdio buffers inherited from the parent.
pub fn terminate(code: i32) -> ! {
    // SAFETY: _exit touches no process state the caller could still observe
    unsafe { libc::_exit(code) }
}

/// Flushes our own buffered output so a forked child cannot repeat it.
pub fn flush_stdio() {
    if let Err(e) = io::stdout().flush() {
        warn!("flush stdout before fork: {}", e);
    }
}

/// Retries a call interrupted by a signal.
pub fn syscall<F, T>(f: F) -> nix::Result<T>
where
    F: Fn() -> nix::Result<T>,
{
    loop {
        match f() {
            Err(Errno::EINTR) => continue,
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_display_names_operation_and_target() {
        let err = SyscallError::with_target("open", "out.txt", Errno::EACCES);
        assert_eq!(err.to_string(), "open out.txt: Permission denied");
        let err = SyscallError::new("fork", Errno::EAGAIN);
        assert!(err.to_string().starts_with("fork: "));
    }

    #[test]
    fn test_syscall_retries_interrupted_calls() {
        let attempts = Cell::new(0);
        let result = syscall(|| {
            attempts.set(attempts.get() + 1);
            if attempts.get() < 3 {
                Err(Errno::EINTR)
            } else {
                Ok(attempts.get())
            }
        });
        assert_eq!(result, Ok(3));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_terminate_ends_child_with_code() {
        use nix::sys::wait::{waitpid, WaitStatus};
        use nix::unistd::{fork, ForkResult};

        // SAFETY: the child only calls _exit
        match unsafe { fork() }.unwrap() {
            ForkResult::Child => terminate(7),
            ForkResult::Parent { child } => {
                let status = syscall(|| waitpid(child, None)).unwrap();
                assert_eq!(status, WaitStatus::Exited(child, 7));
            }
        }
    }

    #[test]
    fn test_syscall_passes_other_errors_through() {
        assert_eq!(syscall(|| -> nix::Result<()> { Err(Errno::ECHILD) }), Err(Errno::ECHILD));
    }
}
