//! The exported wrappers, one module per family.
//!
//! Each module lists its wrappers in an `EXPORTS` table.

pub mod byteorder;
pub mod clock;
pub mod conf;
pub mod dir;
pub mod env;
pub mod fs;
pub mod io;
pub mod ipc;
pub mod job;
pub mod mm;
pub mod netdb;
pub mod process;
pub mod resource;
pub mod select;
pub mod signal;
pub mod sockaddr;
pub mod socket;
pub mod time;
pub mod timer;
pub mod user;

use crate::Export;

pub static EXPORT_TABLES: &[&[Export]] = &[
    env::EXPORTS,
    process::EXPORTS,
    fs::EXPORTS,
    dir::EXPORTS,
    io::EXPORTS,
    select::EXPORTS,
    mm::EXPORTS,
    sockaddr::EXPORTS,
    netdb::EXPORTS,
    socket::EXPORTS,
    user::EXPORTS,
    job::EXPORTS,
    time::EXPORTS,
    signal::EXPORTS,
    conf::EXPORTS,
    ipc::EXPORTS,
    clock::EXPORTS,
    timer::EXPORTS,
    resource::EXPORTS,
    byteorder::EXPORTS,
];

/// Builds an optional timeout from host seconds and microseconds. `#f` seconds means no timeout.
pub(crate) fn timeval(sec: Option<i64>, usec: i64) -> Option<structures::time::Timeval> {
    sec.map(|tv_sec| structures::time::Timeval {
        tv_sec,
        tv_usec: usec,
    })
}
