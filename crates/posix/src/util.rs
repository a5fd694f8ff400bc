use crate::error_report::ErrorReport;
use libc::c_char;
use std::{ffi::CString, io::Write};
use structures::error::Errno;

/// Clears `errno` of the calling thread.
#[inline]
pub fn clear_errno() {
    unsafe {
        #[cfg(target_os = "linux")]
        {
            *libc::__errno_location() = 0;
        }
        #[cfg(not(target_os = "linux"))]
        {
            *libc::__error() = 0;
        }
    }
}

/// Converts a POSIX function that returns something like what `read()`/`write()` returns to
/// [`Result<Integer, Errno>`] in Rust. `errno` is cleared before the call.
#[macro_export]
macro_rules! posix_num {
    ($x:expr) => {{
        $crate::util::clear_errno();
        match $x {
            -1 => Err(Errno::last()),
            n => Ok(n as _),
        }
    }};
}

/// Like [`posix_num!`], but discards the successful return value.
#[macro_export]
macro_rules! posix_bi {
    ($x:expr) => {{
        $crate::util::clear_errno();
        match $x {
            -1 => Err(Errno::last()),
            _ => Ok(()),
        }
    }};
}

/// Converts a POSIX function that returns a null pointer on failure.
#[macro_export]
macro_rules! posix_ptr {
    ($x:expr) => {{
        $crate::util::clear_errno();
        let ptr = $x;
        match ptr.is_null() {
            true => Err(Errno::last()),
            false => Ok(ptr),
        }
    }};
}

/// Converts from a Rust byte slice to a NUL-terminated C string.
///
/// Fails with `EINVAL` if `dat` contains an interior NUL byte.
pub fn c_path(dat: &[u8]) -> Result<CString, Errno> {
    CString::new(dat).map_err(|_| Errno::EINVAL)
}

/// An owned, null-terminated `char *[]`, as taken by `execve`.
#[derive(Debug)]
pub struct CStrArray {
    _strings: Vec<CString>,
    pointers: Vec<*const c_char>,
}
impl CStrArray {
    pub fn new<S: AsRef<[u8]>>(items: &[S]) -> Result<Self, Errno> {
        let strings = items
            .iter()
            .map(|x| c_path(x.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let mut pointers: Vec<*const c_char> = strings.iter().map(|x| x.as_ptr()).collect();
        pointers.push(std::ptr::null());
        Ok(Self {
            _strings: strings,
            pointers,
        })
    }

    pub fn as_ptr(&self) -> *const *const c_char {
        self.pointers.as_ptr()
    }
}

/// Resolves the effective transfer size of a buffer-size-aware call.
///
/// An explicit `size` larger than the buffer fails with `EINVAL`, before anything reaches the kernel.
#[inline]
pub fn transfer_size(capacity: usize, size: Option<usize>) -> Result<usize, Errno> {
    match size {
        Some(n) if n > capacity => Err(Errno::EINVAL),
        Some(n) => Ok(n),
        None => Ok(capacity),
    }
}

#[derive(Debug)]
pub struct RustLogger;
impl log::Log for RustLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn flush(&self) {}

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let content = format!(
            "[{}] {}: {}\n",
            record.level(),
            record.module_path().unwrap_or("posixglue"),
            record.args()
        );
        _ = ErrorReport.write_all(content.as_bytes());
    }
}
