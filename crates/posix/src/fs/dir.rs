use crate::{posix_bi, posix_num, posix_ptr, util::c_path};
use libc::{DIR, c_int, c_long};
use structures::error::Errno;

pub fn opendir(path: &[u8]) -> Result<*mut DIR, Errno> {
    let path = c_path(path)?;
    unsafe { posix_ptr!(libc::opendir(path.as_ptr())) }
}

pub fn fdopendir(fd: c_int) -> Result<*mut DIR, Errno> {
    unsafe { posix_ptr!(libc::fdopendir(fd)) }
}

/// Reads the next entry name, or [`None`] at the end of the stream.
///
/// The stream is closed once it reaches its end or fails, and `dir` must not be used again afterwards.
///
/// # Safety
/// `dir` must be an open directory stream.
pub unsafe fn readdir(dir: *mut DIR) -> Result<Option<Vec<u8>>, Errno> {
    unsafe {
        crate::util::clear_errno();
        let entry = libc::readdir(dir);
        if entry.is_null() {
            let errno = Errno::last();
            libc::closedir(dir);
            log::debug!("closed directory stream {dir:p} at end of entries");
            return match errno {
                Errno(0) => Ok(None),
                err => Err(err),
            };
        }
        let name = &(*entry).d_name;
        Ok(Some(structures::util::array_bytes(name)))
    }
}

/// Closes a directory stream. A null stream is accepted and ignored.
///
/// # Safety
/// `dir` must be null or an open directory stream.
pub unsafe fn closedir(dir: *mut DIR) -> Result<(), Errno> {
    if dir.is_null() {
        return Ok(());
    }
    unsafe { posix_bi!(libc::closedir(dir)) }
}

/// # Safety
/// `dir` must be an open directory stream.
pub unsafe fn rewinddir(dir: *mut DIR) {
    unsafe { libc::rewinddir(dir) }
}

/// # Safety
/// `dir` must be an open directory stream.
pub unsafe fn telldir(dir: *mut DIR) -> Result<c_long, Errno> {
    unsafe { posix_num!(libc::telldir(dir)) }
}

/// # Safety
/// `dir` must be an open directory stream and `pos` a value `telldir` returned for it.
pub unsafe fn seekdir(dir: *mut DIR, pos: c_long) {
    unsafe { libc::seekdir(dir, pos) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::ffi::OsStrExt;

    #[test]
    fn readdir_lists_entries_then_closes() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("one"), b"").unwrap();
        std::fs::write(tmp.path().join("two"), b"").unwrap();

        let dir = opendir(tmp.path().as_os_str().as_bytes()).unwrap();
        let mut names = Vec::new();
        while let Some(name) = unsafe { readdir(dir) }.unwrap() {
            names.push(name);
        }
        names.sort();
        assert_eq!(
            names,
            vec![b".".to_vec(), b"..".to_vec(), b"one".to_vec(), b"two".to_vec()]
        );
    }

    #[test]
    fn rewind_restarts_the_stream() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = opendir(tmp.path().as_os_str().as_bytes()).unwrap();
        let first = unsafe { readdir(dir) }.unwrap();
        let pos = unsafe { telldir(dir) }.unwrap();
        unsafe { rewinddir(dir) };
        assert_eq!(unsafe { readdir(dir) }.unwrap(), first);
        unsafe { seekdir(dir, pos) };
        unsafe { closedir(dir) }.unwrap();
    }

    #[test]
    fn closedir_accepts_null() {
        assert_eq!(unsafe { closedir(std::ptr::null_mut()) }, Ok(()));
    }

    #[test]
    fn opendir_missing_is_enoent() {
        assert_eq!(opendir(b"/nonexistent/posixglue").unwrap_err(), Errno::ENOENT);
    }
}
