use crate::{FromNative, ToNative, error::Errno};

/// Message queue attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MqAttr {
    pub flags: i64,
    pub maxmsg: i64,
    pub msgsize: i64,
    pub curmsgs: i64,
}
impl FromNative for MqAttr {
    type Native = libc::mq_attr;

    fn from_native(native: libc::mq_attr) -> Result<Self, Errno> {
        Ok(Self {
            flags: native.mq_flags as _,
            maxmsg: native.mq_maxmsg as _,
            msgsize: native.mq_msgsize as _,
            curmsgs: native.mq_curmsgs as _,
        })
    }
}
impl ToNative for MqAttr {
    type Native = libc::mq_attr;

    fn to_native(self) -> Result<libc::mq_attr, Errno> {
        let mut native: libc::mq_attr = unsafe { std::mem::zeroed() };
        native.mq_flags = self.flags as _;
        native.mq_maxmsg = self.maxmsg as _;
        native.mq_msgsize = self.msgsize as _;
        native.mq_curmsgs = self.curmsgs as _;
        Ok(native)
    }
}

/// The notification part of a `sigevent` the host may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigEvent {
    pub notify: i32,
    pub signo: i32,
}
impl ToNative for SigEvent {
    type Native = libc::sigevent;

    fn to_native(self) -> Result<libc::sigevent, Errno> {
        let mut native: libc::sigevent = unsafe { std::mem::zeroed() };
        native.sigev_notify = self.notify;
        native.sigev_signo = self.signo;
        Ok(native)
    }
}
