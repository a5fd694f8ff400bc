use crate::{ffi, posix_bi, util::c_path};
use libc::{c_char, clockid_t, pid_t, time_t};
use std::ffi::CString;
use structures::{
    FromNative, ToNative,
    error::Errno,
    time::{Itimerval, ItimerWhich, Timespec, Timeval, Tm, Tms},
};

/// Size of the output buffer of [`strftime`].
pub const STRFTIME_BUFFER: usize = 512;

// -== Process and calendar time ==-

/// Returns the processor time used so far, in `CLOCKS_PER_SEC` units, or [`None`] if unavailable.
pub fn clock() -> Option<libc::clock_t> {
    match unsafe { ffi::clock() } {
        -1 => None,
        t => Some(t),
    }
}

pub fn time() -> Option<time_t> {
    match unsafe { libc::time(std::ptr::null_mut()) } {
        -1 => None,
        t => Some(t),
    }
}

pub fn times() -> Option<Tms> {
    let mut tms: libc::tms = unsafe { std::mem::zeroed() };
    match unsafe { libc::times(&mut tms) } {
        -1 => None,
        _ => Tms::from_native(tms).ok(),
    }
}

pub fn gettimeofday() -> Result<Timeval, Errno> {
    let mut tv = libc::timeval {
        tv_sec: 0,
        tv_usec: 0,
    };
    unsafe { posix_bi!(libc::gettimeofday(&mut tv, std::ptr::null_mut()))? };
    Timeval::from_native(tv)
}

pub fn localtime(t: time_t) -> Option<Tm> {
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    let ptr = unsafe { libc::localtime_r(&t, &mut tm) };
    match ptr.is_null() {
        true => None,
        false => Tm::from_native(tm).ok(),
    }
}

pub fn gmtime(t: time_t) -> Option<Tm> {
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    let ptr = unsafe { libc::gmtime_r(&t, &mut tm) };
    match ptr.is_null() {
        true => None,
        false => Tm::from_native(tm).ok(),
    }
}

/// Interprets `tm` as local time.
pub fn timelocal(tm: Tm) -> Option<time_t> {
    let mut native = tm.to_native().ok()?;
    match unsafe { libc::mktime(&mut native) } {
        -1 => None,
        t => Some(t),
    }
}

/// Interprets `tm` as UTC.
pub fn timegm(tm: Tm) -> Option<time_t> {
    let mut native = tm.to_native().ok()?;
    match unsafe { ffi::timegm(&mut native) } {
        -1 => None,
        t => Some(t),
    }
}

/// Formats `tm` through `fmt` into a buffer of [`STRFTIME_BUFFER`] bytes.
///
/// Returns [`None`] if the result does not fit. An empty result is not an error.
pub fn strftime(fmt: &[u8], tm: Tm) -> Result<Option<Vec<u8>>, Errno> {
    let fmt = c_path(fmt)?;
    let zone = tm.zone.clone().map(CString::new).transpose().map_err(|_| Errno::EINVAL)?;
    let mut native = tm.to_native()?;
    if let Some(zone) = &zone {
        native.tm_zone = zone.as_ptr();
    }

    let mut buf = [0 as c_char; STRFTIME_BUFFER];
    buf[0] = 1;
    let len = unsafe { libc::strftime(buf.as_mut_ptr(), buf.len(), fmt.as_ptr(), &native) };
    match (len, buf[0]) {
        (0, 0) => Ok(Some(Vec::new())),
        (0, _) => Ok(None),
        (n, _) => Ok(Some(buf[..n].iter().map(|&c| c as u8).collect())),
    }
}

/// Returns the offset of local time from UTC at `t`, in seconds.
pub fn gmt_offset(t: time_t) -> Option<i64> {
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    unsafe {
        if libc::gmtime_r(&t, &mut tm).is_null() {
            return None;
        }
        tm.tm_isdst = -1;
        match libc::mktime(&mut tm) {
            -1 => None,
            gmt => Some(t - gmt),
        }
    }
}

/// Sleeps for `req`, returning whatever remains if the sleep was interrupted.
pub fn nanosleep(req: Timespec) -> Result<Timespec, Errno> {
    let req = req.to_native()?;
    let mut rem = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    unsafe { posix_bi!(libc::nanosleep(&req, &mut rem))? };
    Timespec::from_native(rem)
}

// -== Interval timers ==-

/// Arms an interval timer, returning the previous setting.
pub fn setitimer(which: ItimerWhich, new: Itimerval) -> Result<Itimerval, Errno> {
    let which = which.to_native()?;
    let new = new.to_native()?;
    let mut old: libc::itimerval = unsafe { std::mem::zeroed() };
    unsafe { posix_bi!(libc::setitimer(which as _, &new, &mut old))? };
    Itimerval::from_native(old)
}

pub fn getitimer(which: ItimerWhich) -> Result<Itimerval, Errno> {
    let which = which.to_native()?;
    let mut cur: libc::itimerval = unsafe { std::mem::zeroed() };
    unsafe { posix_bi!(libc::getitimer(which as _, &mut cur))? };
    Itimerval::from_native(cur)
}

// -== Clocks ==-

pub fn clock_getres(id: clockid_t) -> Result<Timespec, Errno> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    unsafe { posix_bi!(libc::clock_getres(id, &mut ts))? };
    Timespec::from_native(ts)
}

pub fn clock_gettime(id: clockid_t) -> Result<Timespec, Errno> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    unsafe { posix_bi!(libc::clock_gettime(id, &mut ts))? };
    Timespec::from_native(ts)
}

pub fn clock_settime(id: clockid_t, value: Timespec) -> Result<(), Errno> {
    let ts = value.to_native()?;
    unsafe { posix_bi!(libc::clock_settime(id, &ts)) }
}

/// Returns the CPU-time clock of a process. The library reports failure as a return value, not through `errno`.
pub fn clock_getcpuclockid(pid: pid_t) -> Result<clockid_t, Errno> {
    let mut id: clockid_t = 0;
    match unsafe { ffi::clock_getcpuclockid(pid, &mut id) } {
        0 => Ok(id),
        err => Err(Errno(err)),
    }
}
