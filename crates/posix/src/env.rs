use crate::{
    ffi, posix_bi,
    util::{c_path, clear_errno},
};
use libc::c_int;
use structures::{error::Errno, util::c_bytes};

/// Returns the calling thread's current `errno`.
#[inline]
pub fn errno() -> Errno {
    Errno::last()
}

/// Returns the message for `errnum`, failing if the C library flags the number as unknown.
pub fn strerror(errnum: c_int) -> Result<Vec<u8>, Errno> {
    clear_errno();
    let message = unsafe { libc::strerror(errnum) };
    match Errno::last() {
        Errno(0) => Ok(unsafe { c_bytes(message) }),
        err => Err(err),
    }
}

pub fn getenv(name: &[u8]) -> Result<Option<Vec<u8>>, Errno> {
    let name = c_path(name)?;
    unsafe {
        let value = libc::getenv(name.as_ptr());
        match value.is_null() {
            true => Ok(None),
            false => Ok(Some(c_bytes(value))),
        }
    }
}

pub fn setenv(name: &[u8], value: &[u8], overwrite: bool) -> Result<(), Errno> {
    let name = c_path(name)?;
    let value = c_path(value)?;
    unsafe { posix_bi!(libc::setenv(name.as_ptr(), value.as_ptr(), overwrite as c_int)) }
}

pub fn unsetenv(name: &[u8]) -> Result<(), Errno> {
    let name = c_path(name)?;
    unsafe { posix_bi!(libc::unsetenv(name.as_ptr())) }
}

/// Returns every `NAME=VALUE` entry of the environment, in order.
pub fn environ() -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    unsafe {
        let mut cursor = ffi::environ;
        if cursor.is_null() {
            return out;
        }
        while !(*cursor).is_null() {
            out.push(c_bytes(*cursor));
            cursor = cursor.add(1);
        }
    }
    out
}
