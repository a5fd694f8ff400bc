use std::fmt;

/// An `errno` value as reported by the C library.
///
/// Unlike the enumerations declared with [`unixvariants!`](crate::unixvariants), any native value is accepted here,
/// since the kernel may report codes this crate does not name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Errno(pub i32);

macro_rules! errnos {
    ($($name:ident),* $(,)?) => {
        impl Errno {
            $(
                pub const $name: Self = Self(libc::$name);
            )*

            /// Returns the symbolic name of this error, if it is a known one.
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$name => Some(stringify!($name)),)*
                    _ => None,
                }
            }
        }
    };
}

errnos!(
    EPERM, ENOENT, ESRCH, EINTR, EIO, ENXIO, E2BIG, ENOEXEC, EBADF, ECHILD, EAGAIN, ENOMEM, EACCES,
    EFAULT, EBUSY, EEXIST, EXDEV, ENODEV, ENOTDIR, EISDIR, EINVAL, ENFILE, EMFILE, ENOTTY, ETXTBSY,
    EFBIG, ENOSPC, ESPIPE, EROFS, EMLINK, EPIPE, EDOM, ERANGE, EDEADLK, ENAMETOOLONG, ENOLCK,
    ENOSYS, ENOTEMPTY, ELOOP, ENOMSG, EOVERFLOW, ENOTSOCK, EDESTADDRREQ, EMSGSIZE, EPROTOTYPE,
    ENOPROTOOPT, EPROTONOSUPPORT, EOPNOTSUPP, EAFNOSUPPORT, EADDRINUSE, EADDRNOTAVAIL, ENETDOWN,
    ENETUNREACH, ECONNABORTED, ECONNRESET, ENOBUFS, EISCONN, ENOTCONN, ETIMEDOUT, ECONNREFUSED,
    EHOSTUNREACH, EALREADY, EINPROGRESS,
);

impl Errno {
    /// Returns the calling thread's current `errno`.
    pub fn last() -> Self {
        std::io::Error::last_os_error()
            .raw_os_error()
            .map(Self)
            .unwrap_or(Self::EIO)
    }

    /// Returns the value the host boundary reports for this error, which is always strictly negative.
    pub const fn encoded(self) -> i64 {
        -(self.0 as i64)
    }
}
impl From<std::io::Error> for Errno {
    fn from(value: std::io::Error) -> Self {
        match value.raw_os_error() {
            Some(x) => Self(x),
            None => Self::EIO,
        }
    }
}
impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = std::io::Error::from_raw_os_error(self.0);
        match self.name() {
            Some(name) => write!(f, "{name}: {message}"),
            None => write!(f, "errno {}: {message}", self.0),
        }
    }
}
impl std::error::Error for Errno {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_is_negative() {
        assert_eq!(Errno::ENOENT.encoded(), -(libc::ENOENT as i64));
        assert!(Errno::EPERM.encoded() < 0);
    }

    #[test]
    fn names_known_codes_only() {
        assert_eq!(Errno::EINVAL.name(), Some("EINVAL"));
        assert_eq!(Errno(100_000).name(), None);
        assert!(Errno(100_000).to_string().starts_with("errno 100000"));
    }

    #[test]
    fn from_io_error_keeps_raw_code() {
        let err = std::io::Error::from_raw_os_error(libc::EBADF);
        assert_eq!(Errno::from(err), Errno::EBADF);
        let err = std::io::Error::other("not an os error");
        assert_eq!(Errno::from(err), Errno::EIO);
    }
}
