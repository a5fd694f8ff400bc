use crate::Export;
use libc::c_int;
use macros::export;
use posix::signal::{self, bubble};
use structures::{error::Errno, signal::SigInfo, time::Timespec};

// -== Signal bubble ==-

/// Starts collecting signals. `-EBUSY` if collection is already running.
#[export]
fn signal_bub_init() -> Result<(), Errno> {
    bubble::init()
}

/// Lets pending signals reach their counters.
#[export]
fn signal_bub_acquire() -> Result<(), Errno> {
    bubble::acquire()
}

#[export]
fn signal_bub_delivered(signum: c_int) -> Result<bool, Errno> {
    bubble::delivered(signum)
}

#[export]
fn signal_bub_final() -> Result<(), Errno> {
    bubble::finish()
}

// -== Synchronous waits ==-

/// `(signo . siginfo)`.
#[export(requires = RealtimeSignals)]
fn sigwaitinfo(signum: c_int) -> Result<(c_int, SigInfo), Errno> {
    signal::sigwaitinfo(signum)
}

#[export(requires = RealtimeSignals)]
fn sigtimedwait(signum: c_int, timeout: Timespec) -> Result<(c_int, SigInfo), Errno> {
    signal::sigtimedwait(signum, timeout)
}

pub const EXPORTS: &[Export] = &[
    SIGNAL_BUB_INIT,
    SIGNAL_BUB_ACQUIRE,
    SIGNAL_BUB_DELIVERED,
    SIGNAL_BUB_FINAL,
    SIGWAITINFO,
    SIGTIMEDWAIT,
];
