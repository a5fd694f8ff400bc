use crate::{FromNative, error::Errno, time::Timespec, unixvariants};
use bitflags::bitflags;
use libc::c_int;

/// File status, in the field order the host sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub mode: u32,
    pub ino: u64,
    pub dev: u64,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: i64,
    pub atime: Timespec,
    pub mtime: Timespec,
    pub ctime: Timespec,
    pub blocks: i64,
    pub blksize: i64,
}
impl Stat {
    /// Returns `true` if the file type bits of this status equal `kind`.
    #[inline]
    pub fn is(&self, kind: FileKind) -> bool {
        self.mode & libc::S_IFMT == kind.0
    }
}
impl FromNative for Stat {
    type Native = libc::stat;

    fn from_native(stat: libc::stat) -> Result<Self, Errno> {
        Ok(Self {
            mode: stat.st_mode as _,
            ino: stat.st_ino as _,
            dev: stat.st_dev as _,
            nlink: stat.st_nlink as _,
            uid: stat.st_uid,
            gid: stat.st_gid,
            size: stat.st_size as _,
            atime: Timespec {
                tv_sec: stat.st_atime as _,
                tv_nsec: stat.st_atime_nsec as _,
            },
            mtime: Timespec {
                tv_sec: stat.st_mtime as _,
                tv_nsec: stat.st_mtime_nsec as _,
            },
            ctime: Timespec {
                tv_sec: stat.st_ctime as _,
                tv_nsec: stat.st_ctime_nsec as _,
            },
            blocks: stat.st_blocks as _,
            blksize: stat.st_blksize as _,
        })
    }
}

unixvariants! {
    /// A file type, as encoded in the `S_IFMT` bits of a mode.
    pub struct FileKind: u32 {
        const S_IFDIR;
        const S_IFCHR;
        const S_IFBLK;
        const S_IFREG;
        const S_IFLNK;
        const S_IFSOCK;
        const S_IFIFO;
    }
}

unixvariants! {
    pub struct Whence: c_int {
        const SEEK_SET;
        const SEEK_CUR;
        const SEEK_END;
        const SEEK_DATA;
        const SEEK_HOLE;
    }
}

unixvariants! {
    pub struct LockfCmd: c_int {
        const F_ULOCK;
        const F_LOCK;
        const F_TLOCK;
        const F_TEST;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct AccessMode: c_int {
        const R_OK = libc::R_OK;
        const W_OK = libc::W_OK;
        const X_OK = libc::X_OK;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct OpenFlags: c_int {
        const O_RDONLY = libc::O_RDONLY;
        const O_WRONLY = libc::O_WRONLY;
        const O_RDWR = libc::O_RDWR;
        const O_CREAT = libc::O_CREAT;
        const O_EXCL = libc::O_EXCL;
        const O_NOCTTY = libc::O_NOCTTY;
        const O_TRUNC = libc::O_TRUNC;
        const O_APPEND = libc::O_APPEND;
        const O_NONBLOCK = libc::O_NONBLOCK;
        const O_DIRECTORY = libc::O_DIRECTORY;
        const O_NOFOLLOW = libc::O_NOFOLLOW;
        const O_CLOEXEC = libc::O_CLOEXEC;
    }
}
