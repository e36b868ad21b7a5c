use std::fmt;

use super::builtins::BuiltinError;
use super::process::SyscallError;

/// Errors handed back to the shell's own process. Everything else that can
/// go wrong while running a command ends the process it happens in.
#[derive(Debug)]
pub enum ExecError {
    Builtin(BuiltinError),
    Pipe(SyscallError),
    UnsupportedOperator(String),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Builtin(err) => write!(f, "{}", err),
            ExecError::Pipe(err) => write!(f, "{}", err),
            ExecError::UnsupportedOperator(op) => write!(f, "operator {} is not supported", op),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Builtin(err) => Some(err),
            ExecError::Pipe(err) => Some(err),
            ExecError::UnsupportedOperator(_) => None,
        }
    }
}

impl From<BuiltinError> for ExecError {
    fn from(err: BuiltinError) -> Self {
        ExecError::Builtin(err)
    }
}
