//! Typed wrappers over the POSIX C library, one per call.
//!
//! Every wrapper clears `errno`, performs exactly one library call and reports failure as [`Errno`]. Nothing here
//! retries on `EINTR` or hides partial transfers.

pub mod caps;
pub mod conf;
pub mod config;
pub mod env;
pub mod error_report;
pub mod fs;
pub mod io;
pub mod job;
pub mod mm;
pub mod mq;
pub mod net;
pub mod process;
pub mod resource;
pub mod sem;
pub mod signal;
pub mod time;
pub mod timer;
pub mod user;
pub mod util;

mod ffi;

pub use structures::error::Errno;

/// Setups the environment: installs the logger and resolves the capability table.
pub fn install() -> Result<(), log::SetLoggerError> {
    log::set_logger(&util::RustLogger)?;
    log::set_max_level(config::log_level());
    let table = caps::table();
    log::debug!(
        "capabilities: {}",
        table
            .iter()
            .map(|(feature, on)| format!("{feature}={on}"))
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(())
}
