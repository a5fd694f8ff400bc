use crate::{Export, Void};
use libc::{DIR, c_int, c_long};
use macros::export;
use posix::fs;
use structures::error::Errno;

#[export]
fn opendir(path: &[u8]) -> Result<*mut DIR, Errno> {
    fs::opendir(path)
}

#[export]
fn fdopendir(fd: c_int) -> Result<*mut DIR, Errno> {
    fs::fdopendir(fd)
}

/// The next entry name, or `#f` once the stream is exhausted (and closed).
#[export]
unsafe fn readdir(dir: *mut DIR) -> Result<Option<Vec<u8>>, Errno> {
    unsafe { fs::readdir(dir) }
}

#[export]
unsafe fn closedir(dir: *mut DIR) -> Result<(), Errno> {
    unsafe { fs::closedir(dir) }
}

#[export]
unsafe fn rewinddir(dir: *mut DIR) -> Void {
    unsafe { fs::rewinddir(dir) };
    Void
}

#[export]
unsafe fn telldir(dir: *mut DIR) -> Result<c_long, Errno> {
    unsafe { fs::telldir(dir) }
}

#[export]
unsafe fn seekdir(dir: *mut DIR, pos: c_long) -> Void {
    unsafe { fs::seekdir(dir, pos) };
    Void
}

pub const EXPORTS: &[Export] = &[OPENDIR, FDOPENDIR, READDIR, CLOSEDIR, REWINDDIR, TELLDIR, SEEKDIR];
