pub mod builtins;
mod error;
#[allow(clippy::module_inception)]
mod executor;
pub mod launcher;
pub mod pipeline;
mod process;
pub mod redirect;
pub mod simple;
mod status;

pub use builtins::BuiltinError;
pub use error::ExecError;
pub use executor::Executor;
pub use process::SyscallError;
pub use status::Status;
