use std::ffi::CString;

use log::{debug, error, warn};
use nix::errno::Errno;
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::unistd;

/// Replaces the current process with `tokens[0]`, searched in `PATH`.
///
/// Only returns when the exec did not happen, after printing
/// `<program>: <reason>` to stderr.
pub fn launch(tokens: &[String]) -> Errno {
    let Some(program) = tokens.first() else {
        eprintln!("forksh: empty command");
        return Errno::EINVAL;
    };

    let args = match tokens
        .iter()
        .map(|token| CString::new(token.as_bytes()))
        .collect::<Result<Vec<CString>, _>>()
    {
        Ok(args) => args,
        Err(e) => {
            error!("{}: {}", program, e);
            eprintln!("{}: argument contains a NUL byte", program);
            return Errno::EINVAL;
        }
    };

    // the Rust runtime ignores SIGPIPE and exec would pass that on
    // SAFETY: restoring the default disposition installs no handler
    if let Err(errno) = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) } {
        warn!("restore SIGPIPE for {}: {}", program, errno);
    }

    debug!("exec {:?}", tokens);
    match unistd::execvp(&args[0], &args) {
        Ok(never) => match never {},
        Err(errno) => {
            error!("exec {} failed: {}", program, errno);
            eprintln!("{}: {}", program, errno.desc());
            errno
        }
    }
}
