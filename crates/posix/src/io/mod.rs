mod select;

pub use select::*;

use crate::{
    posix_bi, posix_num,
    util::{c_path, transfer_size},
};
use libc::{c_int, c_ulong, c_void, mode_t, off_t};
use structures::{
    ToNative,
    error::Errno,
    fs::{LockfCmd, OpenFlags, Whence},
};

// -== Descriptors ==-

pub fn open(path: &[u8], flags: OpenFlags, mode: mode_t) -> Result<c_int, Errno> {
    let path = c_path(path)?;
    unsafe { posix_num!(libc::open(path.as_ptr(), flags.bits(), mode as c_int)) }
}

pub fn close(fd: c_int) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::close(fd)) }
}

pub fn dup(fd: c_int) -> Result<c_int, Errno> {
    unsafe { posix_num!(libc::dup(fd)) }
}

pub fn dup2(old: c_int, new: c_int) -> Result<c_int, Errno> {
    unsafe { posix_num!(libc::dup2(old, new)) }
}

/// Returns the `(read, write)` ends of a new pipe.
pub fn pipe() -> Result<(c_int, c_int), Errno> {
    let mut fds = [-1; 2];
    unsafe { posix_bi!(libc::pipe(fds.as_mut_ptr()))? };
    Ok((fds[0], fds[1]))
}

pub fn mkfifo(path: &[u8], mode: mode_t) -> Result<(), Errno> {
    let path = c_path(path)?;
    unsafe { posix_bi!(libc::mkfifo(path.as_ptr(), mode)) }
}

pub fn truncate(path: &[u8], len: off_t) -> Result<(), Errno> {
    let path = c_path(path)?;
    unsafe { posix_bi!(libc::truncate(path.as_ptr(), len)) }
}

pub fn ftruncate(fd: c_int, len: off_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::ftruncate(fd, len)) }
}

pub fn lockf(fd: c_int, cmd: LockfCmd, len: off_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::lockf(fd, cmd.to_native()?, len)) }
}

// -== Transfers ==-

pub fn read(fd: c_int, buf: &mut [u8], size: Option<usize>) -> Result<usize, Errno> {
    let size = transfer_size(buf.len(), size)?;
    unsafe { posix_num!(libc::read(fd, buf.as_mut_ptr().cast(), size)) }
}

pub fn write(fd: c_int, buf: &[u8], size: Option<usize>) -> Result<usize, Errno> {
    let size = transfer_size(buf.len(), size)?;
    unsafe { posix_num!(libc::write(fd, buf.as_ptr().cast(), size)) }
}

pub fn pread(fd: c_int, buf: &mut [u8], size: Option<usize>, off: off_t) -> Result<usize, Errno> {
    let size = transfer_size(buf.len(), size)?;
    unsafe { posix_num!(libc::pread(fd, buf.as_mut_ptr().cast(), size, off)) }
}

pub fn pwrite(fd: c_int, buf: &[u8], size: Option<usize>, off: off_t) -> Result<usize, Errno> {
    let size = transfer_size(buf.len(), size)?;
    unsafe { posix_num!(libc::pwrite(fd, buf.as_ptr().cast(), size, off)) }
}

pub fn lseek(fd: c_int, off: off_t, whence: Whence) -> Result<off_t, Errno> {
    unsafe { posix_num!(libc::lseek(fd, off, whence.to_native()?)) }
}

pub fn readv(fd: c_int, bufs: &mut [&mut [u8]]) -> Result<usize, Errno> {
    let iov: Vec<libc::iovec> = bufs
        .iter_mut()
        .map(|buf| libc::iovec {
            iov_base: buf.as_mut_ptr().cast(),
            iov_len: buf.len(),
        })
        .collect();
    unsafe { posix_num!(libc::readv(fd, iov.as_ptr(), iov.len() as c_int)) }
}

pub fn writev(fd: c_int, bufs: &[&[u8]]) -> Result<usize, Errno> {
    let iov: Vec<libc::iovec> = bufs
        .iter()
        .map(|buf| libc::iovec {
            iov_base: buf.as_ptr() as *mut c_void,
            iov_len: buf.len(),
        })
        .collect();
    unsafe { posix_num!(libc::writev(fd, iov.as_ptr(), iov.len() as c_int)) }
}

// -== Control ==-

/// The third argument of `fcntl` and `ioctl`.
#[derive(Debug)]
pub enum ControlArg<'a> {
    None,
    Int(c_int),
    Buf(&'a mut [u8]),
    Ptr(*mut c_void),
}

/// # Safety
/// With [`ControlArg::Ptr`], the pointer must be valid for whatever `cmd` does with it.
pub unsafe fn fcntl(fd: c_int, cmd: c_int, arg: ControlArg) -> Result<c_int, Errno> {
    unsafe {
        match arg {
            ControlArg::None => posix_num!(libc::fcntl(fd, cmd)),
            ControlArg::Int(x) => posix_num!(libc::fcntl(fd, cmd, x)),
            ControlArg::Buf(buf) => posix_num!(libc::fcntl(fd, cmd, buf.as_mut_ptr())),
            ControlArg::Ptr(ptr) => posix_num!(libc::fcntl(fd, cmd, ptr)),
        }
    }
}

/// # Safety
/// The argument must be valid for whatever `request` does with it.
pub unsafe fn ioctl(fd: c_int, request: c_ulong, arg: ControlArg) -> Result<c_int, Errno> {
    unsafe {
        match arg {
            ControlArg::None => posix_num!(libc::ioctl(fd, request as _)),
            ControlArg::Int(x) => posix_num!(libc::ioctl(fd, request as _, x)),
            ControlArg::Buf(buf) => posix_num!(libc::ioctl(fd, request as _, buf.as_mut_ptr())),
            ControlArg::Ptr(ptr) => posix_num!(libc::ioctl(fd, request as _, ptr)),
        }
    }
}

fn update_flag(fd: c_int, get: c_int, set: c_int, flag: c_int, on: bool) -> Result<c_int, Errno> {
    unsafe {
        let flags: c_int = posix_num!(libc::fcntl(fd, get))?;
        let flags = match on {
            true => flags | flag,
            false => flags & !flag,
        };
        posix_num!(libc::fcntl(fd, set, flags))
    }
}

fn test_flag(fd: c_int, get: c_int, flag: c_int) -> Result<bool, Errno> {
    let flags: c_int = unsafe { posix_num!(libc::fcntl(fd, get))? };
    Ok(flags & flag != 0)
}

/// Sets or clears `O_NONBLOCK`, returning what the final `fcntl` returns.
pub fn set_nonblocking(fd: c_int, on: bool) -> Result<c_int, Errno> {
    update_flag(fd, libc::F_GETFL, libc::F_SETFL, libc::O_NONBLOCK, on)
}

pub fn nonblocking(fd: c_int) -> Result<bool, Errno> {
    test_flag(fd, libc::F_GETFL, libc::O_NONBLOCK)
}

/// Sets or clears `FD_CLOEXEC`, returning what the final `fcntl` returns.
pub fn set_cloexec(fd: c_int, on: bool) -> Result<c_int, Errno> {
    update_flag(fd, libc::F_GETFD, libc::F_SETFD, libc::FD_CLOEXEC, on)
}

pub fn cloexec(fd: c_int) -> Result<bool, Errno> {
    test_flag(fd, libc::F_GETFD, libc::FD_CLOEXEC)
}
