use crate::{Export, List};
use libc::c_int;
use macros::export;
use posix::env;
use structures::error::Errno;

#[export]
fn errno() -> c_int {
    env::errno().0
}

/// The message for `errnum`, or `#f` if the number is unknown.
#[export]
fn strerror(errnum: c_int) -> Option<Vec<u8>> {
    env::strerror(errnum).ok()
}

#[export]
fn getenv(name: &[u8]) -> Result<Option<Vec<u8>>, Errno> {
    env::getenv(name)
}

#[export]
fn setenv(name: &[u8], value: &[u8], overwrite: bool) -> bool {
    env::setenv(name, value, overwrite).is_ok()
}

#[export]
fn unsetenv(name: &[u8]) -> bool {
    env::unsetenv(name).is_ok()
}

#[export]
fn environ() -> List<Vec<u8>> {
    List(env::environ())
}

pub const EXPORTS: &[Export] = &[ERRNO, STRERROR, GETENV, SETENV, UNSETENV, ENVIRON];
