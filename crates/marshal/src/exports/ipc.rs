use crate::Export;
use libc::{c_int, c_uint, mode_t, mqd_t, sem_t};
use macros::export;
use posix::{mq, sem};
use structures::{error::Errno, ipc::MqAttr, time::Timespec};

// -== Message queues ==-

#[export(requires = MessageQueues)]
fn mq_open(name: &[u8], oflag: c_int, mode: mode_t, attr: Option<MqAttr>) -> Result<mqd_t, Errno> {
    mq::mq_open(name, oflag, mode, attr)
}

#[export(requires = MessageQueues)]
fn mq_close(mqd: mqd_t) -> Result<(), Errno> {
    mq::mq_close(mqd)
}

#[export(requires = MessageQueues)]
fn mq_unlink(name: &[u8]) -> Result<(), Errno> {
    mq::mq_unlink(name)
}

#[export(requires = MessageQueues)]
fn mq_send(mqd: mqd_t, msg: &[u8], prio: c_uint) -> Result<(), Errno> {
    mq::mq_send(mqd, msg, prio)
}

#[export(requires = MessageQueues)]
fn mq_timedsend(mqd: mqd_t, msg: &[u8], prio: c_uint, deadline: Timespec) -> Result<(), Errno> {
    mq::mq_timedsend(mqd, msg, prio, deadline)
}

/// `(length . priority)`.
#[export(requires = MessageQueues)]
fn mq_receive(mqd: mqd_t, buf: &mut [u8]) -> Result<(usize, c_uint), Errno> {
    mq::mq_receive(mqd, buf)
}

#[export(requires = MessageQueues)]
fn mq_timedreceive(mqd: mqd_t, buf: &mut [u8], deadline: Timespec) -> Result<(usize, c_uint), Errno> {
    mq::mq_timedreceive(mqd, buf, deadline)
}

/// Returns the attributes in effect before the change.
#[export(requires = MessageQueues)]
fn mq_setattr(mqd: mqd_t, attr: MqAttr) -> Result<MqAttr, Errno> {
    mq::mq_setattr(mqd, attr)
}

#[export(requires = MessageQueues)]
fn mq_getattr(mqd: mqd_t) -> Result<MqAttr, Errno> {
    mq::mq_getattr(mqd)
}

// -== Shared memory ==-

#[export(requires = SharedMemory)]
fn shm_open(name: &[u8], oflag: c_int, mode: mode_t) -> Result<c_int, Errno> {
    sem::shm_open(name, oflag, mode)
}

#[export(requires = SharedMemory)]
fn shm_unlink(name: &[u8]) -> Result<(), Errno> {
    sem::shm_unlink(name)
}

// -== Semaphores ==-

#[export(requires = Semaphores)]
fn sizeof_sem_t() -> usize {
    sem::sizeof_sem_t()
}

#[export(requires = Semaphores)]
fn sem_open(name: &[u8], oflag: c_int, mode: mode_t, value: c_uint) -> Result<*mut sem_t, Errno> {
    sem::sem_open(name, oflag, mode, value)
}

#[export(requires = Semaphores)]
unsafe fn sem_close(sem: *mut sem_t) -> Result<(), Errno> {
    unsafe { sem::sem_close(sem) }
}

#[export(requires = Semaphores)]
fn sem_unlink(name: &[u8]) -> Result<(), Errno> {
    sem::sem_unlink(name)
}

/// Initializes an unnamed semaphore in place and hands the same pointer back.
#[export(requires = Semaphores)]
unsafe fn sem_init(sem: *mut sem_t, pshared: bool, value: c_uint) -> Result<*mut sem_t, Errno> {
    unsafe { sem::sem_init(sem, pshared, value)? };
    Ok(sem)
}

#[export(requires = Semaphores)]
unsafe fn sem_destroy(sem: *mut sem_t) -> Result<(), Errno> {
    unsafe { sem::sem_destroy(sem) }
}

#[export(requires = Semaphores)]
unsafe fn sem_post(sem: *mut sem_t) -> Result<(), Errno> {
    unsafe { sem::sem_post(sem) }
}

#[export(requires = Semaphores)]
unsafe fn sem_wait(sem: *mut sem_t) -> Result<(), Errno> {
    unsafe { sem::sem_wait(sem) }
}

/// `#f` if the semaphore could not be taken without blocking.
#[export(requires = Semaphores)]
unsafe fn sem_trywait(sem: *mut sem_t) -> Result<bool, Errno> {
    unsafe { sem::sem_trywait(sem) }
}

/// `#f` once `deadline`, an absolute `CLOCK_REALTIME` instant, has passed.
#[export(requires = Semaphores)]
unsafe fn sem_timedwait(sem: *mut sem_t, deadline: Timespec) -> Result<bool, Errno> {
    unsafe { sem::sem_timedwait(sem, deadline) }
}

/// `(value . #f)`.
#[export(requires = Semaphores)]
unsafe fn sem_getvalue(sem: *mut sem_t) -> Result<(c_int, bool), Errno> {
    unsafe { sem::sem_getvalue(sem) }.map(|v| (v, false))
}

pub const EXPORTS: &[Export] = &[
    MQ_OPEN,
    MQ_CLOSE,
    MQ_UNLINK,
    MQ_SEND,
    MQ_TIMEDSEND,
    MQ_RECEIVE,
    MQ_TIMEDRECEIVE,
    MQ_SETATTR,
    MQ_GETATTR,
    SHM_OPEN,
    SHM_UNLINK,
    SIZEOF_SEM_T,
    SEM_OPEN,
    SEM_CLOSE,
    SEM_UNLINK,
    SEM_INIT,
    SEM_DESTROY,
    SEM_POST,
    SEM_WAIT,
    SEM_TRYWAIT,
    SEM_TIMEDWAIT,
    SEM_GETVALUE,
];
