use crate::{posix_bi, posix_num, util::c_path};
use libc::{c_int, c_uint, mode_t, mqd_t};
use structures::{FromNative, ToNative, error::Errno, ipc::MqAttr, time::Timespec};

/// Opens a message queue. `attr` only matters when the queue is created.
pub fn mq_open(name: &[u8], oflag: c_int, mode: mode_t, attr: Option<MqAttr>) -> Result<mqd_t, Errno> {
    let name = c_path(name)?;
    let attr = attr.map(MqAttr::to_native).transpose()?;
    let attr_ptr = attr.as_ref().map_or(std::ptr::null(), |x| x as *const libc::mq_attr);
    unsafe { posix_num!(libc::mq_open(name.as_ptr(), oflag, mode, attr_ptr)) }
}

pub fn mq_close(mqd: mqd_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::mq_close(mqd)) }
}

pub fn mq_unlink(name: &[u8]) -> Result<(), Errno> {
    let name = c_path(name)?;
    unsafe { posix_bi!(libc::mq_unlink(name.as_ptr())) }
}

pub fn mq_send(mqd: mqd_t, msg: &[u8], prio: c_uint) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::mq_send(mqd, msg.as_ptr().cast(), msg.len(), prio)) }
}

/// Like [`mq_send`], but gives up with `ETIMEDOUT` at the absolute `CLOCK_REALTIME` instant `deadline`.
pub fn mq_timedsend(mqd: mqd_t, msg: &[u8], prio: c_uint, deadline: Timespec) -> Result<(), Errno> {
    let deadline = deadline.to_native()?;
    unsafe {
        posix_bi!(libc::mq_timedsend(
            mqd,
            msg.as_ptr().cast(),
            msg.len(),
            prio,
            &deadline
        ))
    }
}

/// Receives the oldest message of the highest priority into `buf`, returning its length and priority.
pub fn mq_receive(mqd: mqd_t, buf: &mut [u8]) -> Result<(usize, c_uint), Errno> {
    let mut prio: c_uint = 0;
    let len = unsafe {
        posix_num!(libc::mq_receive(
            mqd,
            buf.as_mut_ptr().cast(),
            buf.len(),
            &mut prio
        ))?
    };
    Ok((len, prio))
}

pub fn mq_timedreceive(mqd: mqd_t, buf: &mut [u8], deadline: Timespec) -> Result<(usize, c_uint), Errno> {
    let deadline = deadline.to_native()?;
    let mut prio: c_uint = 0;
    let len = unsafe {
        posix_num!(libc::mq_timedreceive(
            mqd,
            buf.as_mut_ptr().cast(),
            buf.len(),
            &mut prio,
            &deadline
        ))?
    };
    Ok((len, prio))
}

/// Updates the queue flags, returning the attributes in effect before.
pub fn mq_setattr(mqd: mqd_t, attr: MqAttr) -> Result<MqAttr, Errno> {
    let new = attr.to_native()?;
    let mut old: libc::mq_attr = unsafe { std::mem::zeroed() };
    unsafe { posix_bi!(libc::mq_setattr(mqd, &new, &mut old))? };
    MqAttr::from_native(old)
}

pub fn mq_getattr(mqd: mqd_t) -> Result<MqAttr, Errno> {
    let mut attr: libc::mq_attr = unsafe { std::mem::zeroed() };
    unsafe { posix_bi!(libc::mq_getattr(mqd, &mut attr))? };
    MqAttr::from_native(attr)
}
