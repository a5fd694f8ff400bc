use crate::Export;
use libc::{c_int, c_long};
use macros::export;
use posix::conf;
use structures::{error::Errno, misc::UtsName};

/// The value of a system limit, or `#f` when it is indeterminate.
#[export]
fn sysconf(name: c_int) -> Result<Option<c_long>, Errno> {
    conf::sysconf(name)
}

#[export]
fn pathconf(path: &[u8], name: c_int) -> Result<Option<c_long>, Errno> {
    conf::pathconf(path, name)
}

#[export]
fn fpathconf(fd: c_int, name: c_int) -> Result<Option<c_long>, Errno> {
    conf::fpathconf(fd, name)
}

#[export]
fn confstr(name: c_int) -> Result<Vec<u8>, Errno> {
    conf::confstr(name)
}

#[export]
fn uname() -> Result<UtsName, Errno> {
    conf::uname()
}

pub const EXPORTS: &[Export] = &[SYSCONF, PATHCONF, FPATHCONF, CONFSTR, UNAME];
