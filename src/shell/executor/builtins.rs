use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, error};
use nix::errno::Errno;
use nix::unistd;

use super::status::Status;

/// Longest directory path `cd` will try to enter.
pub const MAX_PATH_LEN: usize = libc::PATH_MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltinError {
    MissingCommand,
    MissingArgument,
    NotChangeDirectory(String),
    PathTooLong(PathBuf),
    CurrentDir(Errno),
    ChangeDir { path: PathBuf, errno: Errno },
}

impl fmt::Display for BuiltinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltinError::MissingCommand => write!(f, "cd: empty command"),
            BuiltinError::MissingArgument => write!(f, "cd: missing directory argument"),
            BuiltinError::NotChangeDirectory(program) => write!(f, "cd: called as {}", program),
            BuiltinError::PathTooLong(path) => write!(
                f,
                "cd: path longer than {} bytes: {}",
                MAX_PATH_LEN,
                path.display()
            ),
            BuiltinError::CurrentDir(errno) => {
                write!(f, "cd: cannot read working directory: {}", errno.desc())
            }
            BuiltinError::ChangeDir { path, errno } => {
                write!(f, "changing directory {}: {}", path.display(), errno.desc())
            }
        }
    }
}

impl std::error::Error for BuiltinError {}

/// `cd <dir>` in the calling process.
///
/// Absolute arguments are used as given; relative ones are joined onto the
/// current working directory. A failed change leaves the shell running.
pub fn change_directory(tokens: &[String]) -> Result<(), BuiltinError> {
    let argument = cd_argument(tokens)?;
    let target = resolve_target(argument, unistd::getcwd)?;

    if let Err(errno) = unistd::chdir(&target) {
        let err = BuiltinError::ChangeDir {
            path: target,
            errno,
        };
        error!("{}", err);
        return Err(err);
    }

    debug!("working directory is now {}", target.display());
    Ok(())
}

/// `exit`: asks the shell loop to stop. The shell process exits with 0.
pub fn exit() -> Status {
    debug!("exit requested");
    Status::Terminate
}

fn cd_argument(tokens: &[String]) -> Result<&str, BuiltinError> {
    let program = tokens.first().ok_or(BuiltinError::MissingCommand)?;
    if program != "cd" {
        return Err(BuiltinError::NotChangeDirectory(program.clone()));
    }
    tokens
        .get(1)
        .map(String::as_str)
        .ok_or(BuiltinError::MissingArgument)
}

/// Computes where `cd argument` goes. `cwd` is only consulted for relative
/// arguments.
pub fn resolve_target<F>(argument: &str, cwd: F) -> Result<PathBuf, BuiltinError>
where
    F: FnOnce() -> nix::Result<PathBuf>,
{
    let path = Path::new(argument);
    let target = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd().map_err(BuiltinError::CurrentDir)?.join(path)
    };

    if target.as_os_str().len() >= MAX_PATH_LEN {
        return Err(BuiltinError::PathTooLong(target));
    }
    Ok(target)
}
