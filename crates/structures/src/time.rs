use crate::{FromNative, ToNative, error::Errno, unixvariants, util::c_opt_bytes};
use bitflags::bitflags;
use libc::c_int;

unixvariants! {
    pub struct ItimerWhich: c_int {
        const ITIMER_REAL;
        const ITIMER_VIRTUAL;
        const ITIMER_PROF;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct TimerFlags: c_int {
        const TIMER_ABSTIME = libc::TIMER_ABSTIME;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timespec {
    pub tv_sec: i64,
    pub tv_nsec: i64,
}
impl FromNative for Timespec {
    type Native = libc::timespec;

    fn from_native(native: Self::Native) -> Result<Self, Errno> {
        Ok(Self {
            tv_sec: native.tv_sec as _,
            tv_nsec: native.tv_nsec as _,
        })
    }
}
impl ToNative for Timespec {
    type Native = libc::timespec;

    fn to_native(self) -> Result<Self::Native, Errno> {
        if !(0..1_000_000_000).contains(&self.tv_nsec) {
            return Err(Errno::EINVAL);
        }
        Ok(libc::timespec {
            tv_sec: self.tv_sec as _,
            tv_nsec: self.tv_nsec as _,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timeval {
    pub tv_sec: i64,
    pub tv_usec: i64,
}
impl FromNative for Timeval {
    type Native = libc::timeval;

    fn from_native(native: libc::timeval) -> Result<Self, Errno> {
        Ok(Self {
            tv_sec: native.tv_sec as _,
            tv_usec: native.tv_usec as _,
        })
    }
}
impl ToNative for Timeval {
    type Native = libc::timeval;

    fn to_native(self) -> Result<libc::timeval, Errno> {
        Ok(libc::timeval {
            tv_sec: self.tv_sec as _,
            tv_usec: self.tv_usec as _,
        })
    }
}

/// An interval timer setting for `setitimer`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Itimerval {
    pub interval: Timeval,
    pub value: Timeval,
}
impl FromNative for Itimerval {
    type Native = libc::itimerval;

    fn from_native(native: libc::itimerval) -> Result<Self, Errno> {
        Ok(Self {
            interval: Timeval::from_native(native.it_interval)?,
            value: Timeval::from_native(native.it_value)?,
        })
    }
}
impl ToNative for Itimerval {
    type Native = libc::itimerval;

    fn to_native(self) -> Result<libc::itimerval, Errno> {
        Ok(libc::itimerval {
            it_interval: self.interval.to_native()?,
            it_value: self.value.to_native()?,
        })
    }
}

/// A POSIX timer setting for `timer_settime`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Itimerspec {
    pub interval: Timespec,
    pub value: Timespec,
}
impl FromNative for Itimerspec {
    type Native = libc::itimerspec;

    fn from_native(native: libc::itimerspec) -> Result<Self, Errno> {
        Ok(Self {
            interval: Timespec::from_native(native.it_interval)?,
            value: Timespec::from_native(native.it_value)?,
        })
    }
}
impl ToNative for Itimerspec {
    type Native = libc::itimerspec;

    fn to_native(self) -> Result<libc::itimerspec, Errno> {
        Ok(libc::itimerspec {
            it_interval: self.interval.to_native()?,
            it_value: self.value.to_native()?,
        })
    }
}

/// Process times, in clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tms {
    pub utime: i64,
    pub stime: i64,
    pub cutime: i64,
    pub cstime: i64,
}
impl FromNative for Tms {
    type Native = libc::tms;

    fn from_native(native: libc::tms) -> Result<Self, Errno> {
        Ok(Self {
            utime: native.tms_utime as _,
            stime: native.tms_stime as _,
            cutime: native.tms_cutime as _,
            cstime: native.tms_cstime as _,
        })
    }
}

/// Broken-down time.
///
/// `gmtoff` and `zone` are [`None`] when the platform's `struct tm` lacks them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tm {
    pub sec: i32,
    pub min: i32,
    pub hour: i32,
    pub mday: i32,
    pub mon: i32,
    pub year: i32,
    pub wday: i32,
    pub yday: i32,
    pub isdst: bool,
    pub gmtoff: Option<i64>,
    pub zone: Option<Vec<u8>>,
}
impl FromNative for Tm {
    type Native = libc::tm;

    fn from_native(native: libc::tm) -> Result<Self, Errno> {
        Ok(Self {
            sec: native.tm_sec,
            min: native.tm_min,
            hour: native.tm_hour,
            mday: native.tm_mday,
            mon: native.tm_mon,
            year: native.tm_year,
            wday: native.tm_wday,
            yday: native.tm_yday,
            isdst: native.tm_isdst > 0,
            gmtoff: Some(native.tm_gmtoff as _),
            // Zone names returned by the C library live in static storage.
            zone: unsafe { c_opt_bytes(native.tm_zone) },
        })
    }
}
impl ToNative for Tm {
    type Native = libc::tm;

    fn to_native(self) -> Result<libc::tm, Errno> {
        let mut native: libc::tm = unsafe { std::mem::zeroed() };
        native.tm_sec = self.sec;
        native.tm_min = self.min;
        native.tm_hour = self.hour;
        native.tm_mday = self.mday;
        native.tm_mon = self.mon;
        native.tm_year = self.year;
        native.tm_wday = self.wday;
        native.tm_yday = self.yday;
        native.tm_isdst = self.isdst as c_int;
        native.tm_gmtoff = self.gmtoff.unwrap_or(0) as _;
        Ok(native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timespec_rejects_out_of_range_nanos() {
        let ts = Timespec {
            tv_sec: 1,
            tv_nsec: 1_000_000_000,
        };
        assert_eq!(ts.to_native().map(|_| ()), Err(Errno::EINVAL));
    }

    #[test]
    fn tm_copies_every_field() {
        let mut native: libc::tm = unsafe { std::mem::zeroed() };
        native.tm_sec = 1;
        native.tm_min = 2;
        native.tm_hour = 3;
        native.tm_mday = 4;
        native.tm_mon = 5;
        native.tm_year = 106;
        native.tm_wday = 6;
        native.tm_yday = 7;
        native.tm_isdst = 1;
        native.tm_gmtoff = -3600;
        native.tm_zone = c"XYZ".as_ptr();

        let tm = Tm::from_native(native).unwrap();
        assert_eq!(
            (tm.sec, tm.min, tm.hour, tm.mday, tm.mon, tm.year, tm.wday, tm.yday),
            (1, 2, 3, 4, 5, 106, 6, 7)
        );
        assert!(tm.isdst);
        assert_eq!(tm.gmtoff, Some(-3600));
        assert_eq!(tm.zone.as_deref(), Some(&b"XYZ"[..]));
    }
}
