use crate::{Export, FromHostMut, List, Value};
use libc::{c_int, c_ulong, c_void, mode_t, off_t};
use macros::export;
use posix::io::{self, ControlArg};
use structures::{
    error::Errno,
    fs::{LockfCmd, OpenFlags, Whence},
};

// -== Descriptors ==-

#[export]
fn open(path: &[u8], flags: OpenFlags, mode: mode_t) -> Result<c_int, Errno> {
    io::open(path, flags, mode)
}

#[export]
fn close(fd: c_int) -> Result<(), Errno> {
    io::close(fd)
}

#[export]
fn dup(fd: c_int) -> Result<c_int, Errno> {
    io::dup(fd)
}

#[export]
fn dup2(old: c_int, new: c_int) -> Result<(), Errno> {
    io::dup2(old, new).map(drop)
}

/// `(read . write)`.
#[export]
fn pipe() -> Result<(c_int, c_int), Errno> {
    io::pipe()
}

#[export]
fn mkfifo(path: &[u8], mode: mode_t) -> Result<(), Errno> {
    io::mkfifo(path, mode)
}

#[export]
fn truncate(path: &[u8], len: off_t) -> Result<(), Errno> {
    io::truncate(path, len)
}

#[export]
fn ftruncate(fd: c_int, len: off_t) -> Result<(), Errno> {
    io::ftruncate(fd, len)
}

#[export]
fn lockf(fd: c_int, cmd: LockfCmd, len: off_t) -> Result<(), Errno> {
    io::lockf(fd, cmd, len)
}

// -== Transfers ==-

#[export]
fn read(fd: c_int, buf: &mut [u8], size: Option<usize>) -> Result<usize, Errno> {
    io::read(fd, buf, size)
}

#[export]
fn write(fd: c_int, buf: &[u8], size: Option<usize>) -> Result<usize, Errno> {
    io::write(fd, buf, size)
}

#[export]
fn pread(fd: c_int, buf: &mut [u8], size: Option<usize>, off: off_t) -> Result<usize, Errno> {
    io::pread(fd, buf, size, off)
}

#[export]
fn pwrite(fd: c_int, buf: &[u8], size: Option<usize>, off: off_t) -> Result<usize, Errno> {
    io::pwrite(fd, buf, size, off)
}

#[export]
fn lseek(fd: c_int, off: off_t, whence: Whence) -> Result<off_t, Errno> {
    io::lseek(fd, off, whence)
}

/// Scatters into a list of buffers, each filled in place.
#[export]
fn readv(fd: c_int, bufs: &mut Value) -> Result<usize, Errno> {
    let items = bufs.list_items_mut().ok_or(Errno::EINVAL)?;
    let mut bufs = items
        .into_iter()
        .map(<&mut [u8]>::from_host_mut)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| Errno::EINVAL)?;
    io::readv(fd, &mut bufs)
}

#[export]
fn writev(fd: c_int, bufs: List<&[u8]>) -> Result<usize, Errno> {
    io::writev(fd, &bufs.0)
}

// -== Control ==-

/// Reads the optional third argument of `fcntl` and `ioctl`: `#f`, an integer, a pointer or a buffer.
fn control_arg(arg: &mut Value) -> Result<ControlArg<'_>, Errno> {
    match arg {
        Value::Bool(false) => Ok(ControlArg::None),
        Value::Integer(n) => c_int::try_from(*n)
            .map(ControlArg::Int)
            .map_err(|_| Errno::EINVAL),
        Value::Pointer(addr) => Ok(ControlArg::Ptr(*addr as *mut c_void)),
        other => <&mut [u8]>::from_host_mut(other)
            .map(ControlArg::Buf)
            .map_err(|_| Errno::EINVAL),
    }
}

#[export]
unsafe fn fcntl(fd: c_int, cmd: c_int, arg: &mut Value) -> Result<c_int, Errno> {
    unsafe { io::fcntl(fd, cmd, control_arg(arg)?) }
}

#[export]
unsafe fn ioctl(fd: c_int, request: c_ulong, arg: &mut Value) -> Result<c_int, Errno> {
    unsafe { io::ioctl(fd, request, control_arg(arg)?) }
}

#[export]
fn fd_set_non_blocking(fd: c_int) -> Result<c_int, Errno> {
    io::set_nonblocking(fd, true)
}

#[export]
fn fd_unset_non_blocking(fd: c_int) -> Result<c_int, Errno> {
    io::set_nonblocking(fd, false)
}

#[export]
fn fd_ref_non_blocking(fd: c_int) -> Result<bool, Errno> {
    io::nonblocking(fd)
}

#[export]
fn fd_set_close_on_exec(fd: c_int) -> Result<c_int, Errno> {
    io::set_cloexec(fd, true)
}

#[export]
fn fd_unset_close_on_exec(fd: c_int) -> Result<c_int, Errno> {
    io::set_cloexec(fd, false)
}

#[export]
fn fd_ref_close_on_exec(fd: c_int) -> Result<bool, Errno> {
    io::cloexec(fd)
}

pub const EXPORTS: &[Export] = &[
    OPEN,
    CLOSE,
    DUP,
    DUP2,
    PIPE,
    MKFIFO,
    TRUNCATE,
    FTRUNCATE,
    LOCKF,
    READ,
    WRITE,
    PREAD,
    PWRITE,
    LSEEK,
    READV,
    WRITEV,
    FCNTL,
    IOCTL,
    FD_SET_NON_BLOCKING,
    FD_UNSET_NON_BLOCKING,
    FD_REF_NON_BLOCKING,
    FD_SET_CLOSE_ON_EXEC,
    FD_UNSET_CLOSE_ON_EXEC,
    FD_REF_CLOSE_ON_EXEC,
];
