use crate::{ffi, posix_bi, util::{c_path, clear_errno}};
use libc::{c_int, c_long};
use structures::{FromNative, error::Errno, misc::UtsName};

/// The `confstr` name of the default search path for standard utilities.
pub const CS_PATH: c_int = 0;

/// Distinguishes an indeterminate limit, reported as -1 without `errno`, from a failure.
fn limit(value: c_long) -> Result<Option<c_long>, Errno> {
    match (value, Errno::last()) {
        (-1, Errno(0)) => Ok(None),
        (-1, err) => Err(err),
        (n, _) => Ok(Some(n)),
    }
}

pub fn sysconf(name: c_int) -> Result<Option<c_long>, Errno> {
    clear_errno();
    limit(unsafe { libc::sysconf(name) })
}

pub fn pathconf(path: &[u8], name: c_int) -> Result<Option<c_long>, Errno> {
    let path = c_path(path)?;
    clear_errno();
    limit(unsafe { libc::pathconf(path.as_ptr(), name) })
}

pub fn fpathconf(fd: c_int, name: c_int) -> Result<Option<c_long>, Errno> {
    clear_errno();
    limit(unsafe { libc::fpathconf(fd, name) })
}

/// Returns a configuration-defined string. A name without a value yields an empty string.
pub fn confstr(name: c_int) -> Result<Vec<u8>, Errno> {
    clear_errno();
    let len = unsafe { ffi::confstr(name, std::ptr::null_mut(), 0) };
    if len == 0 {
        return match Errno::last() {
            Errno(0) => Ok(Vec::new()),
            err => Err(err),
        };
    }
    let mut buf = vec![0u8; len];
    unsafe { ffi::confstr(name, buf.as_mut_ptr().cast(), len) };
    buf.truncate(len - 1);
    Ok(buf)
}

pub fn uname() -> Result<UtsName, Errno> {
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    unsafe { posix_bi!(libc::uname(&mut uts))? };
    UtsName::from_native(uts)
}
