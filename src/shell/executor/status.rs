use std::fmt;

use nix::sys::wait::WaitStatus;

/// Outcome of one command line as seen by the shell loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The command ran; the shell keeps reading input.
    Exited(i32),
    /// `exit` was run in the shell's own process.
    Terminate,
}

impl Status {
    pub const SUCCESS: Status = Status::Exited(0);
    pub const FAILURE: Status = Status::Exited(1);

    /// Maps a reaped child to its exit code, `128 + signo` for signal deaths.
    pub fn from_wait(status: WaitStatus) -> Self {
        match status {
            WaitStatus::Exited(_, code) => Status::Exited(code),
            WaitStatus::Signaled(_, signal, _) => Status::Exited(128 + signal as i32),
            _ => Status::FAILURE,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Exited(0))
    }

    /// Exit code the shell process should use for this status.
    pub fn code(&self) -> i32 {
        match self {
            Status::Exited(code) => *code,
            Status::Terminate => 0,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Exited(code) => write!(f, "exit code {}", code),
            Status::Terminate => write!(f, "terminate"),
        }
    }
}
