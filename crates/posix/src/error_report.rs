//! Last-resort reporting to standard error.

use std::io::Write;

/// Standard error, written with plain `write(2)` calls.
///
/// Unlike [`std::io::Stderr`] it takes no locks and touches no thread-local state, so the logger and the signal
/// bubble may use it at any point.
#[derive(Debug, Clone, Copy)]
pub struct ErrorReport;
impl Write for ErrorReport {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = unsafe { libc::write(libc::STDERR_FILENO, buf.as_ptr().cast(), buf.len()) };
        usize::try_from(n).map_err(|_| std::io::Error::last_os_error())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Writes `posixglue: fatal: <what>` and exits without unwinding or running destructors.
#[cold]
pub fn fatal(what: std::fmt::Arguments) -> ! {
    _ = writeln!(ErrorReport, "posixglue: fatal: {what}");
    fast_fail()
}

/// Exits with status 101 immediately.
#[cold]
pub fn fast_fail() -> ! {
    unsafe { libc::_exit(101) }
}
