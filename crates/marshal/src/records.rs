//! Host encodings of native records.
//!
//! Records travel as positional structs whose fields follow the native structure's order. Nested time values are
//! themselves two-field records.

use crate::{Expected, FromHost, List, ToHost, Value};
use structures::{
    fs::Stat,
    ipc::{MqAttr, SigEvent},
    misc::UtsName,
    net::{AddrInfo, AddrInfoHints, HostEnt, NetEnt, ProtoEnt, ServEnt},
    process::{RLimit, RUsage},
    signal::SigInfo,
    time::{Itimerspec, Itimerval, Timespec, Timeval, Tm, Tms},
    user::{Group, Passwd},
};

/// Borrows the fields of a record that must have exactly `N` of them.
pub fn fields<const N: usize>(value: &Value) -> Result<&[Value; N], Expected> {
    match value {
        Value::Struct(fields) => fields
            .as_slice()
            .try_into()
            .map_err(|_| Expected("a record with a different number of fields")),
        _ => Err(Expected("a record")),
    }
}

macro_rules! record {
    ($($field:expr),* $(,)?) => {
        Value::Struct(vec![$(ToHost::to_host($field)),*])
    };
}

fn pointer(addr: Option<usize>) -> Value {
    addr.map_or(Value::Bool(false), Value::Pointer)
}

// -== Time ==-

impl ToHost for Timespec {
    fn to_host(self) -> Value {
        record![self.tv_sec, self.tv_nsec]
    }
}
impl<'a> FromHost<'a> for Timespec {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let [sec, nsec] = fields(value)?;
        Ok(Self {
            tv_sec: FromHost::from_host(sec)?,
            tv_nsec: FromHost::from_host(nsec)?,
        })
    }
}

impl ToHost for Timeval {
    fn to_host(self) -> Value {
        record![self.tv_sec, self.tv_usec]
    }
}
impl<'a> FromHost<'a> for Timeval {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let [sec, usec] = fields(value)?;
        Ok(Self {
            tv_sec: FromHost::from_host(sec)?,
            tv_usec: FromHost::from_host(usec)?,
        })
    }
}

impl ToHost for Itimerval {
    fn to_host(self) -> Value {
        record![self.interval, self.value]
    }
}
impl<'a> FromHost<'a> for Itimerval {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let [interval, value] = fields(value)?;
        Ok(Self {
            interval: FromHost::from_host(interval)?,
            value: FromHost::from_host(value)?,
        })
    }
}

impl ToHost for Itimerspec {
    fn to_host(self) -> Value {
        record![self.interval, self.value]
    }
}
impl<'a> FromHost<'a> for Itimerspec {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let [interval, value] = fields(value)?;
        Ok(Self {
            interval: FromHost::from_host(interval)?,
            value: FromHost::from_host(value)?,
        })
    }
}

/// Clock ticks, as flonums.
impl ToHost for Tms {
    fn to_host(self) -> Value {
        record![
            self.utime as f64,
            self.stime as f64,
            self.cutime as f64,
            self.cstime as f64,
        ]
    }
}

impl ToHost for Tm {
    fn to_host(self) -> Value {
        record![
            self.sec,
            self.min,
            self.hour,
            self.mday,
            self.mon,
            self.year,
            self.wday,
            self.yday,
            self.isdst,
            self.gmtoff,
            self.zone,
        ]
    }
}
impl<'a> FromHost<'a> for Tm {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let [sec, min, hour, mday, mon, year, wday, yday, isdst, gmtoff, zone] = fields(value)?;
        let isdst = match *isdst {
            Value::Bool(x) => x,
            Value::Integer(n) => n > 0,
            _ => return Err(Expected("a boolean or integer daylight saving flag")),
        };
        Ok(Self {
            sec: FromHost::from_host(sec)?,
            min: FromHost::from_host(min)?,
            hour: FromHost::from_host(hour)?,
            mday: FromHost::from_host(mday)?,
            mon: FromHost::from_host(mon)?,
            year: FromHost::from_host(year)?,
            wday: FromHost::from_host(wday)?,
            yday: FromHost::from_host(yday)?,
            isdst,
            gmtoff: FromHost::from_host(gmtoff)?,
            zone: FromHost::from_host(zone)?,
        })
    }
}

// -== Files and processes ==-

impl ToHost for Stat {
    fn to_host(self) -> Value {
        record![
            self.mode,
            self.ino,
            self.dev,
            self.nlink,
            self.uid,
            self.gid,
            self.size,
            self.atime.tv_sec,
            self.atime.tv_nsec,
            self.mtime.tv_sec,
            self.mtime.tv_nsec,
            self.ctime.tv_sec,
            self.ctime.tv_nsec,
            self.blocks,
            self.blksize,
        ]
    }
}

impl ToHost for RLimit {
    fn to_host(self) -> Value {
        record![self.cur, self.max]
    }
}
impl<'a> FromHost<'a> for RLimit {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let [cur, max] = fields(value)?;
        Ok(Self {
            cur: FromHost::from_host(cur)?,
            max: FromHost::from_host(max)?,
        })
    }
}

impl ToHost for RUsage {
    fn to_host(self) -> Value {
        record![
            self.utime,
            self.stime,
            self.maxrss,
            self.ixrss,
            self.idrss,
            self.isrss,
            self.minflt,
            self.majflt,
            self.nswap,
            self.inblock,
            self.oublock,
            self.msgsnd,
            self.msgrcv,
            self.nsignals,
            self.nvcsw,
            self.nivcsw,
        ]
    }
}

impl ToHost for SigInfo {
    fn to_host(self) -> Value {
        record![
            self.signo,
            self.errno,
            self.code,
            self.trapno,
            self.pid,
            self.uid,
            self.status,
            self.utime,
            self.stime,
            self.value_int,
            pointer(self.value_ptr),
            self.int,
            pointer(self.ptr),
            self.overrun,
            self.timerid,
            pointer(self.addr),
            self.band,
            self.fd,
            self.addr_lsb,
        ]
    }
}

impl ToHost for UtsName {
    fn to_host(self) -> Value {
        record![
            self.sysname,
            self.nodename,
            self.release,
            self.version,
            self.machine,
        ]
    }
}

impl ToHost for Passwd {
    fn to_host(self) -> Value {
        record![
            self.name,
            self.passwd,
            self.uid,
            self.gid,
            self.gecos,
            self.dir,
            self.shell,
        ]
    }
}

impl ToHost for Group {
    fn to_host(self) -> Value {
        record![self.name, self.gid, List(self.members)]
    }
}

// -== IPC ==-

impl ToHost for MqAttr {
    fn to_host(self) -> Value {
        record![self.flags, self.maxmsg, self.msgsize, self.curmsgs]
    }
}
impl<'a> FromHost<'a> for MqAttr {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let [flags, maxmsg, msgsize, curmsgs] = fields(value)?;
        Ok(Self {
            flags: FromHost::from_host(flags)?,
            maxmsg: FromHost::from_host(maxmsg)?,
            msgsize: FromHost::from_host(msgsize)?,
            curmsgs: FromHost::from_host(curmsgs)?,
        })
    }
}

impl<'a> FromHost<'a> for SigEvent {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let [notify, signo] = fields(value)?;
        Ok(Self {
            notify: FromHost::from_host(notify)?,
            signo: FromHost::from_host(signo)?,
        })
    }
}

// -== Network databases ==-

impl ToHost for HostEnt {
    fn to_host(self) -> Value {
        let first = self.first_addr().map(<[u8]>::to_vec);
        record![
            self.name,
            List(self.aliases),
            self.addrtype,
            self.length,
            List(self.addrs),
            first,
        ]
    }
}

impl ToHost for ProtoEnt {
    fn to_host(self) -> Value {
        record![self.name, List(self.aliases), self.proto]
    }
}

impl ToHost for ServEnt {
    fn to_host(self) -> Value {
        record![self.name, List(self.aliases), self.port, self.proto]
    }
}

impl ToHost for NetEnt {
    fn to_host(self) -> Value {
        record![self.name, List(self.aliases), self.addrtype, self.net]
    }
}

impl ToHost for AddrInfo {
    fn to_host(self) -> Value {
        record![
            self.flags,
            self.family,
            self.socktype,
            self.protocol,
            self.addr.len(),
            self.addr,
            self.canonname,
        ]
    }
}

impl<'a> FromHost<'a> for AddrInfoHints {
    fn from_host(value: &'a Value) -> Result<Self, Expected> {
        let [flags, family, socktype, protocol] = fields(value)?;
        Ok(Self {
            flags: FromHost::from_host(flags)?,
            family: FromHost::from_host(family)?,
            socktype: FromHost::from_host(socktype)?,
            protocol: FromHost::from_host(protocol)?,
        })
    }
}
