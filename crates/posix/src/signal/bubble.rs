//! The signal bubble: a process-wide latch that collects asynchronous signals so a single-threaded host can poll
//! for them.
//!
//! While the bubble is active, every signal is blocked in the thread that started it, and a counting handler is
//! installed for each catchable signal. [`acquire`] briefly opens the mask so that pending signals run the handler,
//! after which [`delivered`] reports and clears each counter.

use crate::posix_bi;
use libc::c_int;
use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicBool, AtomicU32, Ordering},
};
use structures::{error::Errno, signal::NSIG};

static ARRIVED: [AtomicU32; NSIG] = [const { AtomicU32::new(0) }; NSIG];
static ACTIVE: AtomicBool = AtomicBool::new(false);
static SAVED: Mutex<Vec<(c_int, libc::sigaction)>> = Mutex::new(Vec::new());

extern "C" fn count_signal(signum: c_int) {
    if let Some(counter) = ARRIVED.get(signum as usize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

fn full_set() -> libc::sigset_t {
    let mut set: libc::sigset_t = unsafe { std::mem::zeroed() };
    unsafe { libc::sigfillset(&mut set) };
    set
}

fn mask(how: c_int) -> Result<(), Errno> {
    let set = full_set();
    match unsafe { libc::pthread_sigmask(how, &set, std::ptr::null_mut()) } {
        0 => Ok(()),
        err => Err(Errno(err)),
    }
}

/// Activates the bubble. Fails with `EBUSY` if it is already active.
pub fn init() -> Result<(), Errno> {
    if ACTIVE
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(Errno::EBUSY);
    }
    if let Err(err) = mask(libc::SIG_BLOCK) {
        ACTIVE.store(false, Ordering::Release);
        return Err(err);
    }

    let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
    action.sa_sigaction = count_signal as extern "C" fn(c_int) as libc::sighandler_t;
    action.sa_flags = libc::SA_RESTART | libc::SA_NOCLDSTOP;
    action.sa_mask = full_set();

    let mut saved = SAVED.lock().unwrap_or_else(PoisonError::into_inner);
    saved.clear();
    for signum in 1..NSIG as c_int {
        ARRIVED[signum as usize].store(0, Ordering::Relaxed);
        if signum == libc::SIGKILL || signum == libc::SIGSTOP {
            continue;
        }
        let mut old: libc::sigaction = unsafe { std::mem::zeroed() };
        // Signals reserved by the C library refuse new handlers; they are simply left alone.
        if unsafe { posix_bi!(libc::sigaction(signum, &action, &mut old)) }.is_ok() {
            saved.push((signum, old));
        }
    }
    log::debug!("signal bubble active, {} handlers installed", saved.len());
    Ok(())
}

/// Lets pending signals through, then blocks them again. Fails with `EINVAL` if the bubble is not active.
pub fn acquire() -> Result<(), Errno> {
    if !ACTIVE.load(Ordering::Acquire) {
        return Err(Errno::EINVAL);
    }
    mask(libc::SIG_UNBLOCK)?;
    mask(libc::SIG_BLOCK)
}

/// Reports whether `signum` arrived since it was last queried, and clears its latch.
pub fn delivered(signum: c_int) -> Result<bool, Errno> {
    if signum <= 0 {
        return Err(Errno::EINVAL);
    }
    let counter = ARRIVED.get(signum as usize).ok_or(Errno::EINVAL)?;
    Ok(counter.swap(0, Ordering::Relaxed) != 0)
}

/// Deactivates the bubble: restores the dispositions that [`init`] replaced and unblocks every signal.
pub fn finish() -> Result<(), Errno> {
    if !ACTIVE.load(Ordering::Acquire) {
        return Err(Errno::EINVAL);
    }
    let mut saved = SAVED.lock().unwrap_or_else(PoisonError::into_inner);
    for (signum, old) in saved.drain(..) {
        if let Err(err) = unsafe { posix_bi!(libc::sigaction(signum, &old, std::ptr::null_mut())) } {
            log::warn!("cannot restore the handler of signal {signum}: {err}");
        }
    }
    for counter in &ARRIVED {
        counter.store(0, Ordering::Relaxed);
    }
    mask(libc::SIG_UNBLOCK)?;
    ACTIVE.store(false, Ordering::Release);
    log::debug!("signal bubble finished");
    Ok(())
}

#[cfg(test)]
fn is_active() -> bool {
    ACTIVE.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    static BUBBLE_TEST: Mutex<()> = Mutex::new(());

    #[test]
    fn delivery_latches_once() {
        let _guard = BUBBLE_TEST.lock().unwrap_or_else(PoisonError::into_inner);
        init().unwrap();
        unsafe { libc::pthread_kill(libc::pthread_self(), libc::SIGUSR1) };
        assert_eq!(delivered(libc::SIGUSR1), Ok(false));
        acquire().unwrap();
        assert_eq!(delivered(libc::SIGUSR1), Ok(true));
        assert_eq!(delivered(libc::SIGUSR1), Ok(false));
        finish().unwrap();
        assert!(!is_active());
    }

    #[test]
    fn lifecycle_is_guarded() {
        let _guard = BUBBLE_TEST.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(acquire(), Err(Errno::EINVAL));
        assert_eq!(finish(), Err(Errno::EINVAL));
        init().unwrap();
        assert_eq!(init(), Err(Errno::EBUSY));
        assert_eq!(delivered(0), Err(Errno::EINVAL));
        assert_eq!(delivered(NSIG as c_int), Err(Errno::EINVAL));
        finish().unwrap();
    }

    #[test]
    fn finish_restores_previous_handlers() {
        let _guard = BUBBLE_TEST.lock().unwrap_or_else(PoisonError::into_inner);
        let disposition = |signum| unsafe {
            let mut old: libc::sigaction = std::mem::zeroed();
            libc::sigaction(signum, std::ptr::null(), &mut old);
            old.sa_sigaction
        };
        let before = disposition(libc::SIGCHLD);
        init().unwrap();
        assert_ne!(disposition(libc::SIGCHLD), before);
        finish().unwrap();
        assert_eq!(disposition(libc::SIGCHLD), before);
    }
}
