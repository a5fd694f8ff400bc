use crate::{FromNative, error::Errno};

/// Number of signal numbers, including the unused zero.
pub const NSIG: usize = 65;

/// Signal information, in the field order the host sees it.
///
/// Fields are [`None`] when the platform's `siginfo_t` does not expose them portably.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SigInfo {
    pub signo: i32,
    pub errno: i32,
    pub code: i32,
    pub trapno: Option<i64>,
    pub pid: Option<i64>,
    pub uid: Option<i64>,
    pub status: Option<i64>,
    pub utime: Option<i64>,
    pub stime: Option<i64>,
    pub value_int: Option<i64>,
    pub value_ptr: Option<usize>,
    pub int: Option<i64>,
    pub ptr: Option<usize>,
    pub overrun: Option<i64>,
    pub timerid: Option<i64>,
    pub addr: Option<usize>,
    pub band: Option<i64>,
    pub fd: Option<i64>,
    pub addr_lsb: Option<i64>,
}
impl FromNative for SigInfo {
    type Native = libc::siginfo_t;

    fn from_native(native: libc::siginfo_t) -> Result<Self, Errno> {
        // The union members overlap; which ones are meaningful depends on `si_code`, and the host decides that.
        unsafe {
            let value = native.si_value().sival_ptr as usize;
            Ok(Self {
                signo: native.si_signo,
                errno: native.si_errno,
                code: native.si_code,
                pid: Some(native.si_pid() as _),
                uid: Some(native.si_uid() as _),
                status: Some(native.si_status() as _),
                utime: Some(native.si_utime() as _),
                stime: Some(native.si_stime() as _),
                value_int: Some(value as i32 as _),
                value_ptr: Some(value),
                int: Some(value as i32 as _),
                ptr: Some(value),
                addr: Some(native.si_addr() as usize),
                ..Self::default()
            })
        }
    }
}
