use crate::Export;
use libc::{clockid_t, pid_t};
use macros::export;
use posix::time;
use structures::{error::Errno, time::Timespec};

#[export]
fn clock_getres(id: clockid_t) -> Result<Timespec, Errno> {
    time::clock_getres(id)
}

/// `[sec nsec]`.
#[export]
fn clock_gettime(id: clockid_t) -> Result<Timespec, Errno> {
    time::clock_gettime(id)
}

#[export]
fn clock_settime(id: clockid_t, value: Timespec) -> Result<(), Errno> {
    time::clock_settime(id, value)
}

/// `(clock-id . #f)`.
#[export(requires = CpuClocks)]
fn clock_getcpuclockid(pid: pid_t) -> Result<(clockid_t, bool), Errno> {
    time::clock_getcpuclockid(pid).map(|id| (id, false))
}

pub const EXPORTS: &[Export] = &[CLOCK_GETRES, CLOCK_GETTIME, CLOCK_SETTIME, CLOCK_GETCPUCLOCKID];
