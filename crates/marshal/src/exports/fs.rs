use crate::Export;
use libc::{c_int, gid_t, mode_t, uid_t};
use macros::export;
use posix::fs;
use structures::{
    error::Errno,
    fs::{AccessMode, FileKind, Stat},
    time::{Timespec, Timeval},
};

// -== File Status ==-

#[export]
fn stat(path: &[u8]) -> Result<Stat, Errno> {
    fs::stat(path)
}

#[export]
fn lstat(path: &[u8]) -> Result<Stat, Errno> {
    fs::lstat(path)
}

#[export]
fn fstat(fd: c_int) -> Result<Stat, Errno> {
    fs::fstat(fd)
}

#[export]
fn file_size(path: &[u8]) -> Result<i64, Errno> {
    fs::stat(path).map(|st| st.size)
}

#[export]
fn file_is_directory(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::file_is(path, follow, FileKind::S_IFDIR)
}

#[export]
fn file_is_char_device(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::file_is(path, follow, FileKind::S_IFCHR)
}

#[export]
fn file_is_block_device(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::file_is(path, follow, FileKind::S_IFBLK)
}

#[export]
fn file_is_regular_file(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::file_is(path, follow, FileKind::S_IFREG)
}

#[export]
fn file_is_symbolic_link(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::file_is(path, follow, FileKind::S_IFLNK)
}

#[export]
fn file_is_socket(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::file_is(path, follow, FileKind::S_IFSOCK)
}

#[export]
fn file_is_fifo(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::file_is(path, follow, FileKind::S_IFIFO)
}

// Message queues, semaphores and shared memory objects never show up as distinct file types on Linux.

#[export]
fn file_is_message_queue(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::stat_follow(path, follow).map(|_| false)
}

#[export]
fn file_is_semaphore(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::stat_follow(path, follow).map(|_| false)
}

#[export]
fn file_is_shared_memory(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::stat_follow(path, follow).map(|_| false)
}

#[export]
fn access(path: &[u8], mode: AccessMode) -> Result<bool, Errno> {
    fs::access(path, mode)
}

#[export]
fn file_exists(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::file_exists(path, follow)
}

#[export]
fn directory_exists(path: &[u8], follow: bool) -> Result<bool, Errno> {
    fs::directory_exists(path, follow)
}

fn sec_nsec(time: Timespec) -> (i64, i64) {
    (time.tv_sec, time.tv_nsec)
}

#[export]
fn file_atime(path: &[u8], follow: bool) -> Result<(i64, i64), Errno> {
    fs::stat_follow(path, follow).map(|st| sec_nsec(st.atime))
}

#[export]
fn file_mtime(path: &[u8], follow: bool) -> Result<(i64, i64), Errno> {
    fs::stat_follow(path, follow).map(|st| sec_nsec(st.mtime))
}

#[export]
fn file_ctime(path: &[u8], follow: bool) -> Result<(i64, i64), Errno> {
    fs::stat_follow(path, follow).map(|st| sec_nsec(st.ctime))
}

// -== Attributes ==-

#[export]
fn chown(path: &[u8], owner: uid_t, group: gid_t) -> Result<(), Errno> {
    fs::chown(path, owner, group)
}

#[export]
fn fchown(fd: c_int, owner: uid_t, group: gid_t) -> Result<(), Errno> {
    fs::fchown(fd, owner, group)
}

#[export]
fn lchown(path: &[u8], owner: uid_t, group: gid_t) -> Result<(), Errno> {
    fs::lchown(path, owner, group)
}

#[export]
fn chmod(path: &[u8], mode: mode_t) -> Result<(), Errno> {
    fs::chmod(path, mode)
}

#[export]
fn fchmod(fd: c_int, mode: mode_t) -> Result<(), Errno> {
    fs::fchmod(fd, mode)
}

#[export]
fn umask(mask: mode_t) -> mode_t {
    fs::umask(mask)
}

#[export]
fn getumask() -> mode_t {
    fs::getumask()
}

#[export]
fn utime(path: &[u8], atime: i64, mtime: i64) -> Result<(), Errno> {
    fs::utime(path, atime, mtime)
}

fn timevals(asec: i64, ausec: i64, msec: i64, musec: i64) -> (Timeval, Timeval) {
    (
        Timeval {
            tv_sec: asec,
            tv_usec: ausec,
        },
        Timeval {
            tv_sec: msec,
            tv_usec: musec,
        },
    )
}

#[export]
fn utimes(path: &[u8], asec: i64, ausec: i64, msec: i64, musec: i64) -> Result<(), Errno> {
    let (atime, mtime) = timevals(asec, ausec, msec, musec);
    fs::utimes(path, atime, mtime)
}

#[export]
fn lutimes(path: &[u8], asec: i64, ausec: i64, msec: i64, musec: i64) -> Result<(), Errno> {
    let (atime, mtime) = timevals(asec, ausec, msec, musec);
    fs::lutimes(path, atime, mtime)
}

#[export]
fn futimes(fd: c_int, asec: i64, ausec: i64, msec: i64, musec: i64) -> Result<(), Errno> {
    let (atime, mtime) = timevals(asec, ausec, msec, musec);
    fs::futimes(fd, atime, mtime)
}

// -== Names ==-

#[export]
fn link(old: &[u8], new: &[u8]) -> Result<(), Errno> {
    fs::link(old, new)
}

#[export]
fn symlink(target: &[u8], linkpath: &[u8]) -> Result<(), Errno> {
    fs::symlink(target, linkpath)
}

#[export]
fn readlink(path: &[u8]) -> Result<Vec<u8>, Errno> {
    fs::readlink(path)
}

#[export]
fn realpath(path: &[u8]) -> Result<Vec<u8>, Errno> {
    fs::realpath(path)
}

#[export]
fn unlink(path: &[u8]) -> Result<(), Errno> {
    fs::unlink(path)
}

#[export]
fn remove(path: &[u8]) -> Result<(), Errno> {
    fs::remove(path)
}

#[export]
fn rename(old: &[u8], new: &[u8]) -> Result<(), Errno> {
    fs::rename(old, new)
}

#[export]
fn mkdir(path: &[u8], mode: mode_t) -> Result<(), Errno> {
    fs::mkdir(path, mode)
}

#[export]
fn rmdir(path: &[u8]) -> Result<(), Errno> {
    fs::rmdir(path)
}

#[export]
fn getcwd() -> Result<Vec<u8>, Errno> {
    fs::getcwd()
}

#[export]
fn chdir(path: &[u8]) -> Result<(), Errno> {
    fs::chdir(path)
}

#[export]
fn fchdir(fd: c_int) -> Result<(), Errno> {
    fs::fchdir(fd)
}

pub const EXPORTS: &[Export] = &[
    STAT,
    LSTAT,
    FSTAT,
    FILE_SIZE,
    FILE_IS_DIRECTORY,
    FILE_IS_CHAR_DEVICE,
    FILE_IS_BLOCK_DEVICE,
    FILE_IS_REGULAR_FILE,
    FILE_IS_SYMBOLIC_LINK,
    FILE_IS_SOCKET,
    FILE_IS_FIFO,
    FILE_IS_MESSAGE_QUEUE,
    FILE_IS_SEMAPHORE,
    FILE_IS_SHARED_MEMORY,
    ACCESS,
    FILE_EXISTS,
    DIRECTORY_EXISTS,
    FILE_ATIME,
    FILE_MTIME,
    FILE_CTIME,
    CHOWN,
    FCHOWN,
    LCHOWN,
    CHMOD,
    FCHMOD,
    UMASK,
    GETUMASK,
    UTIME,
    UTIMES,
    LUTIMES,
    FUTIMES,
    LINK,
    SYMLINK,
    READLINK,
    REALPATH,
    UNLINK,
    REMOVE,
    RENAME,
    MKDIR,
    RMDIR,
    GETCWD,
    CHDIR,
    FCHDIR,
];

#[cfg(test)]
mod tests {
    use crate::{Value, invoke};
    use std::os::unix::ffi::OsStrExt;

    fn path_value(path: &std::path::Path) -> Value {
        Value::Bytevector(path.as_os_str().as_bytes().to_vec())
    }

    #[test]
    fn stat_record_has_fifteen_fields() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data");
        std::fs::write(&file, b"12345").unwrap();
        let Value::Struct(fields) = invoke("stat", &mut [path_value(&file)]).unwrap() else {
            panic!("stat did not return a record");
        };
        assert_eq!(fields.len(), 15);
        assert_eq!(fields[6], Value::Integer(5));
        assert_eq!(
            invoke("file_size", &mut [path_value(&file)]),
            Ok(Value::Integer(5))
        );
    }

    #[test]
    fn file_kind_predicates_follow_links_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path(), &link).unwrap();
        let check = |name: &str, follow: bool| {
            invoke(name, &mut [path_value(&link), Value::Bool(follow)]).unwrap()
        };
        assert_eq!(check("file_is_directory", true), Value::Bool(true));
        assert_eq!(check("file_is_directory", false), Value::Bool(false));
        assert_eq!(check("file_is_symbolic_link", false), Value::Bool(true));
        assert_eq!(check("file_is_char_device", true), Value::Bool(false));
        assert_eq!(check("file_is_message_queue", true), Value::Bool(false));
        assert_eq!(
            invoke("file_is_char_device", &mut [
                Value::Bytevector(b"/dev/null".to_vec()),
                Value::Bool(true)
            ]),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn existence_checks_swallow_enoent() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing/deeper");
        let args = |path: &std::path::Path| [path_value(path), Value::Bool(true)];
        assert_eq!(invoke("file_exists", &mut args(&missing)), Ok(Value::Bool(false)));
        assert_eq!(invoke("directory_exists", &mut args(dir.path())), Ok(Value::Bool(true)));
        assert_eq!(
            invoke("stat", &mut [path_value(&missing)]),
            Ok(Value::Integer(-(libc::ENOENT as i128)))
        );
    }

    #[test]
    fn utimes_sets_times_seen_by_file_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("touched");
        std::fs::write(&file, b"").unwrap();
        let ret = invoke(
            "utimes",
            &mut [
                path_value(&file),
                Value::Integer(1_000),
                Value::Integer(0),
                Value::Integer(2_000),
                Value::Integer(500_000),
            ],
        );
        assert_eq!(ret, Ok(Value::Integer(0)));
        assert_eq!(
            invoke("file_mtime", &mut [path_value(&file), Value::Bool(true)]),
            Ok(Value::cons(Value::Integer(2_000), Value::Integer(500_000_000)))
        );
    }

    #[test]
    fn names_and_links() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        std::fs::write(&target, b"").unwrap();
        invoke("symlink", &mut [path_value(&target), path_value(&link)]).unwrap();
        assert_eq!(invoke("readlink", &mut [path_value(&link)]), Ok(path_value(&target)));
        let sub = dir.path().join("sub");
        invoke("mkdir", &mut [path_value(&sub), Value::Integer(0o700)]).unwrap();
        assert_eq!(
            invoke("rmdir", &mut [path_value(&sub)]),
            Ok(Value::Integer(0))
        );
        assert_eq!(
            invoke("rmdir", &mut [path_value(&sub)]),
            Ok(Value::Integer(-(libc::ENOENT as i128)))
        );
    }
}
