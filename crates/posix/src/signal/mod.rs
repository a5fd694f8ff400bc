pub mod bubble;

use crate::posix_num;
use libc::c_int;
use structures::{FromNative, ToNative, error::Errno, signal::SigInfo, time::Timespec};

fn single_set(signum: c_int) -> Result<libc::sigset_t, Errno> {
    let mut set: libc::sigset_t = unsafe { std::mem::zeroed() };
    unsafe {
        libc::sigemptyset(&mut set);
        crate::posix_bi!(libc::sigaddset(&mut set, signum))?;
    }
    Ok(set)
}

/// Waits for `signum`, which must be blocked, and returns the signal number with its information.
pub fn sigwaitinfo(signum: c_int) -> Result<(c_int, SigInfo), Errno> {
    let set = single_set(signum)?;
    let mut info: libc::siginfo_t = unsafe { std::mem::zeroed() };
    let signo: c_int = unsafe { posix_num!(libc::sigwaitinfo(&set, &mut info))? };
    Ok((signo, SigInfo::from_native(info)?))
}

/// Like [`sigwaitinfo`], but gives up with `EAGAIN` after `timeout`.
pub fn sigtimedwait(signum: c_int, timeout: Timespec) -> Result<(c_int, SigInfo), Errno> {
    let set = single_set(signum)?;
    let timeout = timeout.to_native()?;
    let mut info: libc::siginfo_t = unsafe { std::mem::zeroed() };
    let signo: c_int = unsafe { posix_num!(libc::sigtimedwait(&set, &mut info, &timeout))? };
    Ok((signo, SigInfo::from_native(info)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_in_this_thread(signum: c_int) {
        let set = single_set(signum).unwrap();
        unsafe { libc::pthread_sigmask(libc::SIG_BLOCK, &set, std::ptr::null_mut()) };
    }

    #[test]
    fn timed_wait_receives_pending_signal() {
        // Test threads are not reused, so the mask dies with this one.
        block_in_this_thread(libc::SIGUSR2);
        unsafe { libc::pthread_kill(libc::pthread_self(), libc::SIGUSR2) };
        let (signo, info) = sigtimedwait(libc::SIGUSR2, Timespec::default()).unwrap();
        assert_eq!(signo, libc::SIGUSR2);
        assert_eq!(info.signo, libc::SIGUSR2);
        assert_eq!(info.trapno, None);
    }

    #[test]
    fn timed_wait_times_out() {
        block_in_this_thread(libc::SIGURG);
        let timeout = Timespec {
            tv_sec: 0,
            tv_nsec: 1_000,
        };
        assert_eq!(sigtimedwait(libc::SIGURG, timeout), Err(Errno::EAGAIN));
    }

    #[test]
    fn invalid_signal_number() {
        assert_eq!(sigwaitinfo(1000).unwrap_err(), Errno::EINVAL);
    }
}
