//! Server process lifecycle
//!
//! The supervisor owns the child process handle for one invocation;
//! durable state lives in `.mcinit/` so later invocations can find
//! the server again. One writer per server directory is assumed; the
//! state files are not locked.

pub mod manager;
pub mod process;
pub mod state;

pub use manager::Manager;
pub use process::Process;
pub use state::{ProcessState, ProcessStatus, StateFile};
