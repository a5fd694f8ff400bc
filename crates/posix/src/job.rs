use crate::{ffi, posix_bi, posix_num};
use libc::{c_char, c_int, pid_t};
use structures::error::Errno;

/// Returns the pathname of the controlling terminal.
pub fn ctermid() -> Vec<u8> {
    let mut buf = [0 as c_char; 64];
    unsafe { ffi::ctermid(buf.as_mut_ptr()) };
    structures::util::array_bytes(&buf)
}

pub fn setsid() -> Result<pid_t, Errno> {
    unsafe { posix_num!(libc::setsid()) }
}

pub fn getsid(pid: pid_t) -> Result<pid_t, Errno> {
    unsafe { posix_num!(libc::getsid(pid)) }
}

pub fn getpgrp() -> pid_t {
    unsafe { libc::getpgrp() }
}

pub fn setpgid(pid: pid_t, pgid: pid_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::setpgid(pid, pgid)) }
}

pub fn tcgetpgrp(fd: c_int) -> Result<pid_t, Errno> {
    unsafe { posix_num!(libc::tcgetpgrp(fd)) }
}

pub fn tcsetpgrp(fd: c_int, pgrp: pid_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::tcsetpgrp(fd, pgrp)) }
}

pub fn tcgetsid(fd: c_int) -> Result<pid_t, Errno> {
    unsafe { posix_num!(ffi::tcgetsid(fd)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_of_self() {
        assert_eq!(getsid(0), getsid(crate::process::getpid()));
        assert!(getpgrp() > 0);
        assert_eq!(getsid(-5), Err(Errno::ESRCH));
    }

    #[test]
    fn terminal_calls_on_a_pipe() {
        let (r, w) = crate::io::pipe().unwrap();
        assert_eq!(tcgetpgrp(r), Err(Errno::ENOTTY));
        assert_eq!(tcgetsid(r), Err(Errno::ENOTTY));
        crate::io::close(r).unwrap();
        crate::io::close(w).unwrap();
    }

    #[test]
    fn ctermid_names_a_device() {
        assert!(ctermid().starts_with(b"/dev/"));
    }
}
