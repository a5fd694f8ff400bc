mod dir;

pub use dir::*;

use crate::{ffi, posix_bi, posix_num, posix_ptr, util::c_path};
use libc::{c_int, gid_t, mode_t, uid_t};
use structures::{
    FromNative, ToNative,
    error::Errno,
    fs::{AccessMode, FileKind, Stat},
    time::Timeval,
    util::c_bytes,
};

const READLINK_INITIAL: usize = 1024;
const GETCWD_INITIAL: usize = 256;

// -== File Status ==-

pub fn stat(path: &[u8]) -> Result<Stat, Errno> {
    let path = c_path(path)?;
    unsafe {
        let mut native = std::mem::zeroed();
        posix_bi!(libc::stat(path.as_ptr(), &mut native))?;
        Stat::from_native(native)
    }
}

pub fn lstat(path: &[u8]) -> Result<Stat, Errno> {
    let path = c_path(path)?;
    unsafe {
        let mut native = std::mem::zeroed();
        posix_bi!(libc::lstat(path.as_ptr(), &mut native))?;
        Stat::from_native(native)
    }
}

pub fn fstat(fd: c_int) -> Result<Stat, Errno> {
    unsafe {
        let mut native = std::mem::zeroed();
        posix_bi!(libc::fstat(fd, &mut native))?;
        Stat::from_native(native)
    }
}

/// Calls `stat` when `follow` is set, `lstat` otherwise.
#[inline]
pub fn stat_follow(path: &[u8], follow: bool) -> Result<Stat, Errno> {
    match follow {
        true => stat(path),
        false => lstat(path),
    }
}

pub fn file_is(path: &[u8], follow: bool, kind: FileKind) -> Result<bool, Errno> {
    Ok(stat_follow(path, follow)?.is(kind))
}

/// Checks accessibility. Denials the caller expects (`EACCES`, `EROFS`, `ETXTBSY`) are reported as `false`.
pub fn access(path: &[u8], mode: AccessMode) -> Result<bool, Errno> {
    let path = c_path(path)?;
    match unsafe { posix_bi!(libc::access(path.as_ptr(), mode.bits())) } {
        Ok(()) => Ok(true),
        Err(Errno::EACCES | Errno::EROFS | Errno::ETXTBSY) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Checks existence. A missing file or a non-directory path component is reported as `false`.
pub fn file_exists(path: &[u8], follow: bool) -> Result<bool, Errno> {
    match stat_follow(path, follow) {
        Ok(_) => Ok(true),
        Err(Errno::ENOENT | Errno::ENOTDIR) => Ok(false),
        Err(err) => Err(err),
    }
}

pub fn directory_exists(path: &[u8], follow: bool) -> Result<bool, Errno> {
    match stat_follow(path, follow) {
        Ok(st) => Ok(st.is(FileKind::S_IFDIR)),
        Err(Errno::ENOENT | Errno::ENOTDIR) => Ok(false),
        Err(err) => Err(err),
    }
}

// -== Attributes ==-

pub fn chown(path: &[u8], owner: uid_t, group: gid_t) -> Result<(), Errno> {
    let path = c_path(path)?;
    unsafe { posix_bi!(libc::chown(path.as_ptr(), owner, group)) }
}

pub fn lchown(path: &[u8], owner: uid_t, group: gid_t) -> Result<(), Errno> {
    let path = c_path(path)?;
    unsafe { posix_bi!(libc::lchown(path.as_ptr(), owner, group)) }
}

pub fn fchown(fd: c_int, owner: uid_t, group: gid_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::fchown(fd, owner, group)) }
}

pub fn chmod(path: &[u8], mode: mode_t) -> Result<(), Errno> {
    let path = c_path(path)?;
    unsafe { posix_bi!(libc::chmod(path.as_ptr(), mode)) }
}

pub fn fchmod(fd: c_int, mode: mode_t) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::fchmod(fd, mode)) }
}

/// Sets the file mode creation mask, returning the previous one.
#[inline]
pub fn umask(mask: mode_t) -> mode_t {
    unsafe { libc::umask(mask) }
}

/// Reads the file mode creation mask, leaving it unchanged.
pub fn getumask() -> mode_t {
    unsafe {
        let mask = libc::umask(0);
        libc::umask(mask);
        mask
    }
}

pub fn utime(path: &[u8], atime: i64, mtime: i64) -> Result<(), Errno> {
    let path = c_path(path)?;
    let times = ffi::utimbuf {
        actime: atime as _,
        modtime: mtime as _,
    };
    unsafe { posix_bi!(ffi::utime(path.as_ptr(), &times)) }
}

pub fn utimes(path: &[u8], atime: Timeval, mtime: Timeval) -> Result<(), Errno> {
    let path = c_path(path)?;
    let times = [atime.to_native()?, mtime.to_native()?];
    unsafe { posix_bi!(libc::utimes(path.as_ptr(), times.as_ptr())) }
}

pub fn lutimes(path: &[u8], atime: Timeval, mtime: Timeval) -> Result<(), Errno> {
    let path = c_path(path)?;
    let times = [atime.to_native()?, mtime.to_native()?];
    unsafe { posix_bi!(ffi::lutimes(path.as_ptr(), times.as_ptr())) }
}

pub fn futimes(fd: c_int, atime: Timeval, mtime: Timeval) -> Result<(), Errno> {
    let times = [atime.to_native()?, mtime.to_native()?];
    unsafe { posix_bi!(ffi::futimes(fd, times.as_ptr())) }
}

// -== Names ==-

pub fn link(old: &[u8], new: &[u8]) -> Result<(), Errno> {
    let old = c_path(old)?;
    let new = c_path(new)?;
    unsafe { posix_bi!(libc::link(old.as_ptr(), new.as_ptr())) }
}

pub fn symlink(target: &[u8], linkpath: &[u8]) -> Result<(), Errno> {
    let target = c_path(target)?;
    let linkpath = c_path(linkpath)?;
    unsafe { posix_bi!(libc::symlink(target.as_ptr(), linkpath.as_ptr())) }
}

pub fn readlink(path: &[u8]) -> Result<Vec<u8>, Errno> {
    readlink_sized(path, READLINK_INITIAL)
}

/// `readlink` with a doubling buffer. A result that fills the buffer exactly may be truncated, so it is retried.
fn readlink_sized(path: &[u8], initial: usize) -> Result<Vec<u8>, Errno> {
    let path = c_path(path)?;
    let mut buf = vec![0u8; initial.max(1)];
    loop {
        let len: usize = unsafe {
            posix_num!(libc::readlink(
                path.as_ptr(),
                buf.as_mut_ptr().cast(),
                buf.len()
            ))?
        };
        if len < buf.len() {
            buf.truncate(len);
            return Ok(buf);
        }
        buf.resize(buf.len() * 2, 0);
    }
}

pub fn realpath(path: &[u8]) -> Result<Vec<u8>, Errno> {
    let path = c_path(path)?;
    unsafe {
        let resolved = posix_ptr!(libc::realpath(path.as_ptr(), std::ptr::null_mut()))?;
        let out = c_bytes(resolved);
        libc::free(resolved.cast());
        Ok(out)
    }
}

pub fn unlink(path: &[u8]) -> Result<(), Errno> {
    let path = c_path(path)?;
    unsafe { posix_bi!(libc::unlink(path.as_ptr())) }
}

pub fn remove(path: &[u8]) -> Result<(), Errno> {
    let path = c_path(path)?;
    unsafe { posix_bi!(libc::remove(path.as_ptr())) }
}

pub fn rename(old: &[u8], new: &[u8]) -> Result<(), Errno> {
    let old = c_path(old)?;
    let new = c_path(new)?;
    unsafe { posix_bi!(libc::rename(old.as_ptr(), new.as_ptr())) }
}

pub fn mkdir(path: &[u8], mode: mode_t) -> Result<(), Errno> {
    let path = c_path(path)?;
    unsafe { posix_bi!(libc::mkdir(path.as_ptr(), mode)) }
}

pub fn rmdir(path: &[u8]) -> Result<(), Errno> {
    let path = c_path(path)?;
    unsafe { posix_bi!(libc::rmdir(path.as_ptr())) }
}

// -== Working Directory ==-

pub fn getcwd() -> Result<Vec<u8>, Errno> {
    getcwd_sized(GETCWD_INITIAL)
}

/// `getcwd` with a buffer that doubles for as long as the call fails with `ERANGE`.
fn getcwd_sized(initial: usize) -> Result<Vec<u8>, Errno> {
    let mut buf = vec![0u8; initial.max(1)];
    loop {
        match unsafe { posix_ptr!(libc::getcwd(buf.as_mut_ptr().cast(), buf.len())) } {
            Ok(ptr) => return Ok(unsafe { c_bytes(ptr) }),
            Err(Errno::ERANGE) => buf.resize(buf.len() * 2, 0),
            Err(err) => return Err(err),
        }
    }
}

pub fn chdir(path: &[u8]) -> Result<(), Errno> {
    let path = c_path(path)?;
    unsafe { posix_bi!(libc::chdir(path.as_ptr())) }
}

pub fn fchdir(fd: c_int) -> Result<(), Errno> {
    unsafe { posix_bi!(libc::fchdir(fd)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::ffi::OsStrExt;

    fn bytes(path: &std::path::Path) -> Vec<u8> {
        path.as_os_str().as_bytes().to_vec()
    }

    #[test]
    fn stat_reports_size_and_kind() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data");
        std::fs::write(&file, b"hello").unwrap();

        let st = stat(&bytes(&file)).unwrap();
        assert_eq!(st.size, 5);
        assert!(st.is(FileKind::S_IFREG));
        assert!(file_is(&bytes(dir.path()), true, FileKind::S_IFDIR).unwrap());
    }

    #[test]
    fn follow_flag_selects_lstat() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        let link_path = dir.path().join("link");
        std::fs::write(&target, b"").unwrap();
        symlink(&bytes(&target), &bytes(&link_path)).unwrap();

        assert!(file_is(&bytes(&link_path), false, FileKind::S_IFLNK).unwrap());
        assert!(file_is(&bytes(&link_path), true, FileKind::S_IFREG).unwrap());
    }

    #[test]
    fn missing_files_are_false_not_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = bytes(&dir.path().join("missing"));
        assert_eq!(file_exists(&missing, true), Ok(false));
        assert_eq!(directory_exists(&missing, true), Ok(false));

        let file = dir.path().join("plain");
        std::fs::write(&file, b"").unwrap();
        let mut below_file = bytes(&file);
        below_file.extend_from_slice(b"/child");
        assert_eq!(file_exists(&below_file, true), Ok(false));
        assert_eq!(directory_exists(&bytes(&file), true), Ok(false));
        assert_eq!(stat(&missing).unwrap_err(), Errno::ENOENT);
    }

    #[test]
    fn readlink_longer_than_initial_guess() {
        let dir = tempfile::tempdir().unwrap();
        let target = vec![b'x'; 2000];
        let link_path = bytes(&dir.path().join("long"));
        symlink(&target, &link_path).unwrap();

        assert_eq!(readlink(&link_path).unwrap(), target);
        assert_eq!(readlink_sized(&link_path, 1).unwrap(), target);
        assert_eq!(readlink_sized(&link_path, 2000).unwrap(), target);
    }

    #[test]
    fn getcwd_grows_buffer() {
        let expected = bytes(&std::env::current_dir().unwrap());
        assert_eq!(getcwd_sized(1).unwrap(), expected);
        assert_eq!(getcwd().unwrap(), expected);
    }

    #[test]
    fn rename_and_unlink() {
        let dir = tempfile::tempdir().unwrap();
        let a = bytes(&dir.path().join("a"));
        let b = bytes(&dir.path().join("b"));
        std::fs::write(dir.path().join("a"), b"x").unwrap();

        rename(&a, &b).unwrap();
        assert_eq!(file_exists(&a, true), Ok(false));
        unlink(&b).unwrap();
        assert_eq!(unlink(&b), Err(Errno::ENOENT));
    }

    #[test]
    fn mkdir_rmdir_and_realpath() {
        let dir = tempfile::tempdir().unwrap();
        let sub = bytes(&dir.path().join("sub"));
        mkdir(&sub, 0o755).unwrap();
        assert_eq!(mkdir(&sub, 0o755), Err(Errno::EEXIST));

        let mut dotted = sub.clone();
        dotted.extend_from_slice(b"/../sub");
        let canonical = bytes(&std::fs::canonicalize(dir.path().join("sub")).unwrap());
        assert_eq!(realpath(&dotted).unwrap(), canonical);
        rmdir(&sub).unwrap();
    }

    #[test]
    fn utimes_sets_times() {
        let dir = tempfile::tempdir().unwrap();
        let file = bytes(&dir.path().join("f"));
        std::fs::write(dir.path().join("f"), b"").unwrap();
        let atime = Timeval {
            tv_sec: 1_000_000,
            tv_usec: 0,
        };
        let mtime = Timeval {
            tv_sec: 2_000_000,
            tv_usec: 0,
        };
        utimes(&file, atime, mtime).unwrap();
        let st = stat(&file).unwrap();
        assert_eq!(st.atime.tv_sec, 1_000_000);
        assert_eq!(st.mtime.tv_sec, 2_000_000);

        utime(&file, 5, 6).unwrap();
        let st = stat(&file).unwrap();
        assert_eq!((st.atime.tv_sec, st.mtime.tv_sec), (5, 6));
    }

    #[test]
    fn access_to_missing_file_is_error() {
        assert_eq!(
            access(b"/nonexistent/posixglue", AccessMode::R_OK),
            Err(Errno::ENOENT)
        );
        assert_eq!(access(b"/", AccessMode::R_OK), Ok(true));
    }
}
