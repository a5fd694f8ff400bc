use crate::{posix_bi, posix_num};
use libc::{c_int, clockid_t, timer_t};
use structures::{
    FromNative, ToNative,
    error::Errno,
    ipc::SigEvent,
    time::{Itimerspec, TimerFlags},
};

/// Creates a POSIX timer on `clock`. Without `event`, expiry raises `SIGALRM`.
pub fn timer_create(clock: clockid_t, event: Option<SigEvent>) -> Result<timer_t, Errno> {
    let event = event.map(SigEvent::to_native).transpose()?;
    let event_ptr = event
        .as_ref()
        .map_or(std::ptr::null_mut(), |x| x as *const libc::sigevent as *mut _);
    let mut id: timer_t = std::ptr::null_mut();
    unsafe { posix_bi!(libc::timer_create(clock, event_ptr, &mut id))? };
    Ok(id)
}

/// # Safety
/// `id` must be a live timer and must not be used afterwards.
pub unsafe fn timer_delete(id: timer_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::timer_delete(id)) }
}

/// Arms or disarms a timer, returning the previous setting.
///
/// # Safety
/// `id` must be a live timer.
pub unsafe fn timer_settime(id: timer_t, flags: TimerFlags, new: Itimerspec) -> Result<Itimerspec, Errno> {
    let new = new.to_native()?;
    let mut old: libc::itimerspec = unsafe { std::mem::zeroed() };
    unsafe { posix_bi!(libc::timer_settime(id, flags.bits(), &new, &mut old))? };
    Itimerspec::from_native(old)
}

/// # Safety
/// `id` must be a live timer.
pub unsafe fn timer_gettime(id: timer_t) -> Result<Itimerspec, Errno> {
    let mut cur: libc::itimerspec = unsafe { std::mem::zeroed() };
    unsafe { posix_bi!(libc::timer_gettime(id, &mut cur))? };
    Itimerspec::from_native(cur)
}

/// # Safety
/// `id` must be a live timer.
pub unsafe fn timer_getoverrun(id: timer_t) -> Result<c_int, Errno> {
    unsafe { posix_num!(libc::timer_getoverrun(id)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structures::time::Timespec;

    #[test]
    fn disarmed_timer_reports_old_setting() {
        let event = SigEvent {
            notify: libc::SIGEV_NONE,
            signo: 0,
        };
        let id = timer_create(libc::CLOCK_MONOTONIC, Some(event)).unwrap();
        let armed = Itimerspec {
            interval: Timespec::default(),
            value: Timespec {
                tv_sec: 60,
                tv_nsec: 0,
            },
        };
        unsafe {
            assert_eq!(
                timer_settime(id, TimerFlags::empty(), armed),
                Ok(Itimerspec::default())
            );
            let cur = timer_gettime(id).unwrap();
            assert!(cur.value.tv_sec <= 60 && cur.value > Timespec::default());
            let old = timer_settime(id, TimerFlags::empty(), Itimerspec::default()).unwrap();
            assert!(old.value.tv_sec <= 60);
            assert_eq!(timer_gettime(id).unwrap(), Itimerspec::default());
            assert_eq!(timer_getoverrun(id), Ok(0));
            timer_delete(id).unwrap();
        }
    }

    #[test]
    fn invalid_clock() {
        assert_eq!(timer_create(1234, None).unwrap_err(), Errno::EINVAL);
    }
}
