use crate::{Export, Value};
use libc::time_t;
use macros::export;
use posix::time;
use structures::{
    error::Errno,
    time::{ItimerWhich, Itimerval, Timespec, Tm, Tms},
};

// -== Process and calendar time ==-

#[export]
fn clock() -> Option<f64> {
    time::clock().map(|t| t as f64)
}

#[export]
fn time() -> Option<f64> {
    time::time().map(|t| t as f64)
}

#[export]
fn times() -> Option<Tms> {
    time::times()
}

/// `(sec . usec)`.
#[export]
fn gettimeofday() -> Result<(i64, i64), Errno> {
    time::gettimeofday().map(|tv| (tv.tv_sec, tv.tv_usec))
}

#[export]
fn localtime(t: f64) -> Option<Tm> {
    time::localtime(t as time_t)
}

#[export]
fn gmtime(t: f64) -> Option<Tm> {
    time::gmtime(t as time_t)
}

#[export]
fn timelocal(tm: Tm) -> Option<f64> {
    time::timelocal(tm).map(|t| t as f64)
}

#[export]
fn timegm(tm: Tm) -> Option<f64> {
    time::timegm(tm).map(|t| t as f64)
}

/// `#f` when the formatted text does not fit the output buffer.
#[export]
fn strftime(fmt: &[u8], tm: Tm) -> Result<Option<Vec<u8>>, Errno> {
    time::strftime(fmt, tm)
}

/// Returns the unslept remainder as `(sec . nsec)`, with `#f` standing for a zero component.
#[export]
fn nanosleep(sec: i64, nsec: i64) -> Result<(Option<i64>, Option<i64>), Errno> {
    let rem = time::nanosleep(Timespec {
        tv_sec: sec,
        tv_nsec: nsec,
    })?;
    let nonzero = |x: i64| (x != 0).then_some(x);
    Ok((nonzero(rem.tv_sec), nonzero(rem.tv_nsec)))
}

// -== Clock snapshots ==-

/// `#(megaseconds seconds microseconds)` since the epoch.
#[export]
fn current_time() -> Result<Value, Errno> {
    let now = time::gettimeofday()?;
    Ok(Value::Vector(vec![
        Value::Integer((now.tv_sec / 1_000_000).into()),
        Value::Integer((now.tv_sec % 1_000_000).into()),
        Value::Integer(now.tv_usec.into()),
    ]))
}

/// Offset of local time from UTC, in seconds, at `t`. `t` is either a number of seconds or a `current_time`
/// vector.
#[export]
fn gmt_offset(t: &Value) -> Result<Option<i64>, Errno> {
    let seconds = match t {
        Value::Vector(parts) => match parts.as_slice() {
            [Value::Integer(mega), Value::Integer(secs), ..] => mega
                .checked_mul(1_000_000)
                .and_then(|x| x.checked_add(*secs))
                .ok_or(Errno::EOVERFLOW)?,
            _ => return Err(Errno::EINVAL),
        },
        Value::Integer(n) => *n,
        Value::Flonum(x) => *x as i128,
        _ => return Err(Errno::EINVAL),
    };
    let seconds = time_t::try_from(seconds).map_err(|_| Errno::EOVERFLOW)?;
    Ok(time::gmt_offset(seconds))
}

fn local_now() -> Option<Tm> {
    time::time().and_then(time::localtime)
}

/// `#(year month day)` of the local date, with the month counted from 1.
#[export]
fn current_time_fixnums() -> Option<Value> {
    let tm = local_now()?;
    Some(Value::Vector(vec![
        Value::Integer((tm.year + 1900).into()),
        Value::Integer((tm.mon + 1).into()),
        Value::Integer(tm.mday.into()),
    ]))
}

/// `#(year month day hour minute second)` of the local time.
#[export]
fn current_time_fixnums_2() -> Option<Value> {
    let tm = local_now()?;
    Some(Value::Vector(
        [tm.year + 1900, tm.mon + 1, tm.mday, tm.hour, tm.min, tm.sec]
            .into_iter()
            .map(|x| Value::Integer(x.into()))
            .collect(),
    ))
}

// -== Interval timers ==-

/// Arms an interval timer and returns its previous setting.
#[export]
fn setitimer(which: ItimerWhich, new: Itimerval) -> Result<Itimerval, Errno> {
    time::setitimer(which, new)
}

#[export]
fn getitimer(which: ItimerWhich) -> Result<Itimerval, Errno> {
    time::getitimer(which)
}

pub const EXPORTS: &[Export] = &[
    CLOCK,
    TIME,
    TIMES,
    GETTIMEOFDAY,
    LOCALTIME,
    GMTIME,
    TIMELOCAL,
    TIMEGM,
    STRFTIME,
    NANOSLEEP,
    CURRENT_TIME,
    GMT_OFFSET,
    CURRENT_TIME_FIXNUMS,
    CURRENT_TIME_FIXNUMS_2,
    SETITIMER,
    GETITIMER,
];
