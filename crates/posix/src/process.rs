use crate::{
    posix_bi, posix_num,
    util::{CStrArray, c_path},
};
use libc::{c_int, c_uint, pid_t};
use structures::{
    error::Errno,
    process::{WaitOptions, WaitStatus},
};

#[inline]
pub fn getpid() -> pid_t {
    unsafe { libc::getpid() }
}

#[inline]
pub fn getppid() -> pid_t {
    unsafe { libc::getppid() }
}

/// Runs `command` through the shell, returning the raw wait status.
///
/// With no command, reports whether a shell is available (nonzero if so).
pub fn system(command: Option<&[u8]>) -> Result<c_int, Errno> {
    let command = command.map(c_path).transpose()?;
    let ptr = command.as_ref().map_or(std::ptr::null(), |x| x.as_ptr());
    unsafe { posix_num!(libc::system(ptr)) }
}

/// # Safety
/// In a multi-threaded process the child may only call async-signal-safe functions before `exec`.
pub unsafe fn fork() -> Result<pid_t, Errno> {
    unsafe { posix_num!(libc::fork()) }
}

/// Replaces the process image. Returns only on failure.
pub fn execv<S: AsRef<[u8]>>(path: &[u8], argv: &[S]) -> Errno {
    let exec = || -> Result<(), Errno> {
        let path = c_path(path)?;
        let argv = CStrArray::new(argv)?;
        unsafe { posix_bi!(libc::execv(path.as_ptr(), argv.as_ptr())) }
    };
    exec().err().unwrap_or(Errno::EIO)
}

/// Replaces the process image with an explicit environment. Returns only on failure.
pub fn execve<S: AsRef<[u8]>, E: AsRef<[u8]>>(path: &[u8], argv: &[S], envp: &[E]) -> Errno {
    let exec = || -> Result<(), Errno> {
        let path = c_path(path)?;
        let argv = CStrArray::new(argv)?;
        let envp = CStrArray::new(envp)?;
        unsafe {
            posix_bi!(libc::execve(
                path.as_ptr(),
                argv.as_ptr(),
                envp.as_ptr()
            ))
        }
    };
    exec().err().unwrap_or(Errno::EIO)
}

/// Replaces the process image, searching `PATH` for `file`. Returns only on failure.
pub fn execvp<S: AsRef<[u8]>>(file: &[u8], argv: &[S]) -> Errno {
    let exec = || -> Result<(), Errno> {
        let file = c_path(file)?;
        let argv = CStrArray::new(argv)?;
        unsafe { posix_bi!(libc::execvp(file.as_ptr(), argv.as_ptr())) }
    };
    exec().err().unwrap_or(Errno::EIO)
}

/// Waits for a child. Returns [`None`] when `WNOHANG` is given and no child has changed state.
pub fn waitpid(pid: pid_t, options: WaitOptions) -> Result<Option<(pid_t, WaitStatus)>, Errno> {
    let mut status = 0;
    let pid: pid_t = unsafe { posix_num!(libc::waitpid(pid, &mut status, options.bits()))? };
    match pid {
        0 if options.contains(WaitOptions::WNOHANG) => Ok(None),
        pid => Ok(Some((pid, WaitStatus(status)))),
    }
}

pub fn wait() -> Result<(pid_t, WaitStatus), Errno> {
    let mut status = 0;
    let pid = unsafe { posix_num!(libc::wait(&mut status))? };
    Ok((pid, WaitStatus(status)))
}

pub fn raise(signum: c_int) -> Result<(), Errno> {
    crate::util::clear_errno();
    match unsafe { libc::raise(signum) } {
        0 => Ok(()),
        _ => Err(Errno::last()),
    }
}

pub fn kill(pid: pid_t, signum: c_int) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::kill(pid, signum)) }
}

/// Suspends until a signal is caught.
pub fn pause() {
    unsafe {
        libc::pause();
    }
}

/// Schedules `SIGALRM`, returning the seconds left on the previous alarm.
pub fn alarm(seconds: c_uint) -> c_uint {
    unsafe { libc::alarm(seconds) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_reports_exit_status() {
        let status = WaitStatus(system(Some(b"exit 7")).unwrap());
        assert!(status.exited());
        assert_eq!(status.exit_status(), 7);
    }

    #[test]
    fn fork_and_waitpid() {
        let pid = unsafe { fork() }.unwrap();
        if pid == 0 {
            unsafe { libc::_exit(3) };
        }
        let (waited, status) = waitpid(pid, WaitOptions::empty()).unwrap().unwrap();
        assert_eq!(waited, pid);
        assert_eq!(status.exit_status(), 3);
    }

    #[test]
    fn waitpid_on_unknown_child_is_echild() {
        assert_eq!(waitpid(-424242, WaitOptions::WNOHANG), Err(Errno::ECHILD));
    }

    #[test]
    fn kill_with_signal_zero_probes_self() {
        assert_eq!(kill(getpid(), 0), Ok(()));
    }

    #[test]
    fn execv_of_missing_file_returns() {
        assert_eq!(execv(b"/nonexistent/posixglue", &[b"x"]), Errno::ENOENT);
        assert_eq!(execv(b"/bin/\0sh", &[b"x"]), Errno::EINVAL);
    }
}
