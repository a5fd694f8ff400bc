use crate::Export;
use libc::{c_int, clockid_t, timer_t};
use macros::export;
use posix::timer;
use structures::{
    error::Errno,
    ipc::SigEvent,
    time::{Itimerspec, TimerFlags},
};

/// `(timer . #f)`. Without an event, expiry raises `SIGALRM`.
#[export(requires = Timers)]
fn timer_create(clock: clockid_t, event: Option<SigEvent>) -> Result<(timer_t, bool), Errno> {
    timer::timer_create(clock, event).map(|id| (id, false))
}

#[export(requires = Timers)]
unsafe fn timer_delete(id: timer_t) -> Result<(), Errno> {
    unsafe { timer::timer_delete(id) }
}

/// Returns the setting the timer had before.
#[export(requires = Timers)]
unsafe fn timer_settime(id: timer_t, flags: TimerFlags, new: Itimerspec) -> Result<Itimerspec, Errno> {
    unsafe { timer::timer_settime(id, flags, new) }
}

#[export(requires = Timers)]
unsafe fn timer_gettime(id: timer_t) -> Result<Itimerspec, Errno> {
    unsafe { timer::timer_gettime(id) }
}

#[export(requires = Timers)]
unsafe fn timer_getoverrun(id: timer_t) -> Result<c_int, Errno> {
    unsafe { timer::timer_getoverrun(id) }
}

pub const EXPORTS: &[Export] = &[
    TIMER_CREATE,
    TIMER_DELETE,
    TIMER_SETTIME,
    TIMER_GETTIME,
    TIMER_GETOVERRUN,
];

#[cfg(test)]
mod tests {
    use crate::{Value, invoke};

    fn int(n: impl Into<i128>) -> Value {
        Value::Integer(n.into())
    }

    fn spec(interval: (i64, i64), value: (i64, i64)) -> Value {
        Value::Struct(vec![
            Value::Struct(vec![int(interval.0), int(interval.1)]),
            Value::Struct(vec![int(value.0), int(value.1)]),
        ])
    }

    #[test]
    fn silent_timer_lifecycle() {
        let event = Value::Struct(vec![int(libc::SIGEV_NONE), int(0)]);
        let created = invoke("timer_create", &mut [int(libc::CLOCK_MONOTONIC), event]).unwrap();
        let Value::Pair(id, tail) = created else {
            panic!("timer_create returned {created}");
        };
        assert_eq!(*tail, Value::Bool(false));
        let id = *id;

        let armed = spec((0, 0), (60, 0));
        let old = invoke("timer_settime", &mut [id.clone(), int(0), armed]);
        assert_eq!(old, Ok(spec((0, 0), (0, 0))));

        let current = invoke("timer_gettime", &mut [id.clone()]).unwrap();
        let Value::Struct(ref halves) = current else {
            panic!("timer_gettime returned {current}");
        };
        assert!(matches!(halves[1], Value::Struct(ref v) if v[0] != int(0) || v[1] != int(0)));
        assert_eq!(invoke("timer_getoverrun", &mut [id.clone()]), Ok(int(0)));
        assert_eq!(invoke("timer_delete", &mut [id]), Ok(int(0)));
    }
}
